//! Command-line configuration. Grounded on `rsarvar1a-blits-rs`'s
//! `LTPServerOptions`: a `clap::Parser` struct of `Option<T>` flags that
//! only override an `EngineConfig` default when actually supplied, one
//! `*_config()` builder method assembling the engine's configuration from
//! them.

use std::time::Duration;

use clap::Parser;
use gomoku_engine::EngineConfig;

/// Flags exposed here correspond to the parameters spec.md §9's Open
/// Questions explicitly say should be tunable rather than hard-coded to a
/// single "canonical" value: response deadline, opening-book depth, max
/// search depth, pondering, and log level.
#[derive(Clone, Debug, Parser)]
#[command(name = "gomoku-cli", about = "Gomoku decision-core line-protocol driver")]
pub struct CliOptions {
    /// Log level passed to `env_logger` (error, warn, info, debug, trace).
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// Wall-clock budget for one decision, in milliseconds.
    #[arg(long)]
    pub response_deadline_ms: Option<u64>,

    /// Maximum iterative-deepening depth.
    #[arg(long)]
    pub max_depth: Option<u8>,

    /// Stone count at/under which the opening book is consulted.
    #[arg(long)]
    pub opening_book_max_moves: Option<u32>,

    /// Depth the time-banked TT-warming pass works up to.
    #[arg(long)]
    pub tt_warmup_depth: Option<u8>,

    /// Disables the pondering subsystem.
    #[arg(long, default_value_t = false)]
    pub no_ponder: bool,
}

impl CliOptions {
    pub fn engine_config(&self) -> EngineConfig {
        let mut config = EngineConfig::default();

        if let Some(ms) = self.response_deadline_ms {
            config.response_deadline = Duration::from_millis(ms);
        }
        if let Some(depth) = self.max_depth {
            config.max_depth = depth;
        }
        if let Some(moves) = self.opening_book_max_moves {
            config.opening_book_max_moves = moves;
        }
        if let Some(depth) = self.tt_warmup_depth {
            config.tt_warmup_depth = depth;
        }
        if self.no_ponder {
            config.pondering_enabled = false;
        }

        config
    }
}
