//! Wire protocol commands (spec.md §6). A line becomes exactly one
//! `Command`; `BOARD`'s trailing `x,y,s` lines are folded in by the parser
//! before the command reaches the session, since the protocol table treats
//! the whole "BOARD ... DONE" block as a single request.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start { size: u16 },
    Begin,
    Turn { x: u16, y: u16 },
    Board { stones: Vec<(u16, u16, u8)> },
    End,
    About,
    /// A recognized keyword with the wrong shape of arguments, or a line
    /// that doesn't name any known command. Unknown commands are ignored
    /// (spec.md §6); malformed arguments to a known command are parse
    /// errors (handled by the parser returning `Err` instead of this).
    Unknown,
}
