pub mod counter;
pub mod scanner;

pub use counter::{ThreatCounter, ThreatCounts};
pub use scanner::{scan_board_threats, ThreatRecord, ThreatReport};
