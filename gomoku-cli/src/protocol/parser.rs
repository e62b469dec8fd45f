//! Line-by-line parsing of the wire protocol (spec.md §6). Grounded on
//! `original_source/src/communication/protocol/parser.py`'s
//! `ProtocolParser`, re-expressed as `Result`-returning free functions
//! instead of a stateful class, since there is no parser state to carry
//! between calls.

use std::fmt;

use super::commands::Command;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError(pub String);

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ParseError {}

/// Parses one top-level protocol line. `Ok(None)` means the line was blank
/// and should produce no response; an unrecognized keyword yields
/// `Command::Unknown` rather than an error, per spec.md §6 ("unknown
/// commands are ignored").
pub fn parse_line(line: &str) -> Result<Option<Command>, ParseError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let mut parts = line.splitn(2, char::is_whitespace);
    let keyword = parts.next().unwrap_or("").to_ascii_uppercase();
    let rest = parts.next().unwrap_or("").trim();

    let command = match keyword.as_str() {
        "START" => Command::Start { size: parse_size(rest)? },
        "BEGIN" => Command::Begin,
        "TURN" => {
            let (x, y) = parse_coordinate(rest, "TURN")?;
            Command::Turn { x, y }
        }
        "BOARD" => Command::Board { stones: Vec::new() },
        "END" => Command::End,
        "ABOUT" => Command::About,
        _ => Command::Unknown,
    };
    Ok(Some(command))
}

/// Parses one `x,y,s` line of a `BOARD` block. `Ok(None)` means the
/// terminating `DONE` was seen.
pub fn parse_board_line(line: &str) -> Result<Option<(u16, u16, u8)>, ParseError> {
    let line = line.trim();
    if line.eq_ignore_ascii_case("DONE") {
        return Ok(None);
    }

    let mut fields = line.split(',');
    let x = fields.next().ok_or_else(|| invalid_board_line(line))?;
    let y = fields.next().ok_or_else(|| invalid_board_line(line))?;
    let s = fields.next().ok_or_else(|| invalid_board_line(line))?;
    if fields.next().is_some() {
        return Err(invalid_board_line(line));
    }

    let x: u16 = x.trim().parse().map_err(|_| invalid_board_line(line))?;
    let y: u16 = y.trim().parse().map_err(|_| invalid_board_line(line))?;
    let s: u8 = s.trim().parse().map_err(|_| invalid_board_line(line))?;
    if s != 1 && s != 2 {
        return Err(invalid_board_line(line));
    }
    Ok(Some((x, y, s)))
}

fn parse_size(rest: &str) -> Result<u16, ParseError> {
    rest.trim()
        .parse::<u16>()
        .map_err(|_| ParseError(format!("invalid START argument: {rest}")))
}

fn parse_coordinate(rest: &str, keyword: &str) -> Result<(u16, u16), ParseError> {
    let mut fields = rest.split(',');
    let invalid = || ParseError(format!("invalid {keyword} argument: {rest}"));

    let x = fields.next().ok_or_else(invalid)?;
    let y = fields.next().ok_or_else(invalid)?;
    if fields.next().is_some() {
        return Err(invalid());
    }
    let x: u16 = x.trim().parse().map_err(|_| invalid())?;
    let y: u16 = y.trim().parse().map_err(|_| invalid())?;
    Ok((x, y))
}

fn invalid_board_line(line: &str) -> ParseError {
    ParseError(format!("invalid board line: {line}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_line_parses_to_nothing() {
        assert_eq!(parse_line("").unwrap(), None);
        assert_eq!(parse_line("   ").unwrap(), None);
    }

    #[test]
    fn start_parses_its_size() {
        assert_eq!(parse_line("START 19").unwrap(), Some(Command::Start { size: 19 }));
    }

    #[test]
    fn start_with_garbage_is_a_parse_error() {
        assert!(parse_line("START abc").is_err());
    }

    #[test]
    fn turn_parses_a_coordinate() {
        assert_eq!(parse_line("TURN 3,4").unwrap(), Some(Command::Turn { x: 3, y: 4 }));
    }

    #[test]
    fn turn_is_case_insensitive_in_its_keyword() {
        assert_eq!(parse_line("turn 3,4").unwrap(), Some(Command::Turn { x: 3, y: 4 }));
    }

    #[test]
    fn unknown_keyword_is_not_an_error() {
        assert_eq!(parse_line("WHATEVER 1 2").unwrap(), Some(Command::Unknown));
    }

    #[test]
    fn board_line_parses_a_stone() {
        assert_eq!(parse_board_line("2,3,1").unwrap(), Some((2, 3, 1)));
    }

    #[test]
    fn board_line_done_terminates() {
        assert_eq!(parse_board_line("DONE").unwrap(), None);
        assert_eq!(parse_board_line("done").unwrap(), None);
    }

    #[test]
    fn board_line_rejects_an_invalid_stone_type() {
        assert!(parse_board_line("2,3,9").is_err());
    }
}
