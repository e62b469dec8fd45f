//! The protocol-facing game session: owns the board and the long-lived
//! [`Engine`], and translates wire-level requests into calls against them.
//! Grounded on `original_source/src/main.py`'s `GameContext` (one object
//! per the same five methods: `initialize_board`, `get_opening_move`,
//! `process_opponent_move`, `get_best_move`, `process_board`), with
//! `get_about_info` folded in as `about`.
//!
//! We always play `Player::One` — the wire protocol's `s=1` already means
//! "our own stone" (spec.md §6), which lines up with `Player::from_wire`
//! one-to-one, so no remapping is needed anywhere in this module.

use gomoku_core::{Board, Player};
use gomoku_engine::{Engine, EngineConfig};

use crate::protocol::AboutInfo;

pub struct Session {
    board: Option<Board>,
    engine: Engine,
    name: String,
    version: String,
    author: String,
    country: Option<String>,
}

impl Session {
    pub fn new(config: EngineConfig, name: String, version: String, author: String, country: Option<String>) -> Self {
        Self {
            board: None,
            engine: Engine::new(config),
            name,
            version,
            author,
            country,
        }
    }

    /// `START N`. `size` has already been parsed as non-negative; a size of
    /// zero is rejected here (the `ConfigError` role, spec.md §7).
    pub fn initialize_board(&mut self, size: u16) -> Result<(), gomoku_core::BoardError> {
        let board = Board::new(size, size)?;
        self.board = Some(board);
        Ok(())
    }

    /// `BEGIN`: play the opening move as `Player::One`. `None` if `START`
    /// was never sent.
    pub fn opening_move(&mut self) -> Option<(u16, u16)> {
        self.play_our_move()
    }

    /// `TURN x,y`: record the opponent's move, then reply. Out-of-bounds or
    /// already-occupied coordinates are logged and otherwise ignored
    /// (spec.md §7's `InvalidState` role) rather than rejected on the wire.
    pub fn process_opponent_move(&mut self, x: u16, y: u16) -> Option<(u16, u16)> {
        self.record_opponent_move(x, y);
        self.play_our_move()
    }

    /// `BOARD` ... `DONE`: rebuild the board from scratch from the supplied
    /// stones, then reply with our move.
    pub fn replace_board(&mut self, stones: &[(u16, u16, u8)]) -> Option<(u16, u16)> {
        let (width, height) = {
            let board = self.board.as_ref()?;
            (board.width(), board.height())
        };
        let mut fresh = match Board::new(width, height) {
            Ok(board) => board,
            Err(err) => {
                log::error!("failed to rebuild board from BOARD command: {err}");
                return None;
            }
        };

        for &(x, y, s) in stones {
            if !fresh.in_bounds(x, y) {
                log::warn!("BOARD stone ({x},{y}) is out of bounds, ignoring");
                continue;
            }
            let Some(player) = Player::from_wire(s) else {
                log::warn!("BOARD stone ({x},{y}) has an unrecognized stone type {s}, ignoring");
                continue;
            };
            if let Err(err) = fresh.place_stone(x, y, player) {
                log::warn!("BOARD stone ({x},{y},{s}) rejected: {err}");
            }
        }

        self.board = Some(fresh);
        self.play_our_move()
    }

    pub fn about(&self) -> AboutInfo {
        AboutInfo {
            name: self.name.clone(),
            version: self.version.clone(),
            author: self.author.clone(),
            country: self.country.clone(),
            www: None,
            email: None,
        }
    }

    fn record_opponent_move(&mut self, x: u16, y: u16) {
        let Some(board) = self.board.as_mut() else {
            return;
        };
        if !board.in_bounds(x, y) {
            log::warn!("opponent move ({x},{y}) is out of bounds, ignoring");
            return;
        }
        match board.place_stone(x, y, Player::Two) {
            Ok(()) => self.engine.notify_opponent_move((x, y)),
            Err(err) => log::warn!("opponent move ({x},{y}) rejected: {err}"),
        }
    }

    fn play_our_move(&mut self) -> Option<(u16, u16)> {
        let board = self.board.as_mut()?;
        let mv = self.engine.get_best_move(board, Player::One);
        if let Err(err) = board.place_stone(mv.0, mv.1, Player::One) {
            log::error!("engine returned an illegal move {mv:?}: {err}");
        }
        Some(mv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn fast_config() -> EngineConfig {
        EngineConfig {
            response_deadline: Duration::from_millis(50),
            safety_margin: Duration::from_millis(10),
            pondering_enabled: false,
            ..EngineConfig::default()
        }
    }

    #[test]
    fn a_fresh_session_has_no_board_until_start() {
        let mut session = Session::new(fast_config(), "n".into(), "v".into(), "a".into(), None);
        assert_eq!(session.opening_move(), None);
    }

    #[test]
    fn start_then_begin_opens_at_the_center() {
        let mut session = Session::new(fast_config(), "n".into(), "v".into(), "a".into(), None);
        session.initialize_board(15).unwrap();
        let mv = session.opening_move().unwrap();
        assert_eq!(mv, (7, 7));
    }

    #[test]
    fn out_of_bounds_opponent_move_is_ignored_not_rejected() {
        let mut session = Session::new(fast_config(), "n".into(), "v".into(), "a".into(), None);
        session.initialize_board(15).unwrap();
        let mv = session.process_opponent_move(999, 999);
        assert!(mv.is_some());
    }

    #[test]
    fn about_reports_the_configured_identity() {
        let session = Session::new(fast_config(), "Foo".into(), "1.2.3".into(), "Bar".into(), Some("FR".into()));
        let info = session.about();
        assert_eq!(info.name, "Foo");
        assert_eq!(info.version, "1.2.3");
        assert_eq!(info.country.as_deref(), Some("FR"));
    }
}
