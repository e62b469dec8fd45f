//! The line-protocol driver (spec.md §6). Grounded on `rsarvar1a-blits-rs`'s
//! `LTPServer::run`: read a line from stdin, dispatch it, write whatever
//! response(s) it produced to stdout, repeat. `BOARD`'s trailing stone
//! lines are read inline by the same loop, mirroring
//! `original_source/src/communication/manager.py`'s
//! `read_board_command`.

mod options;
mod protocol;
mod session;

use std::io::{self, BufRead, Write};

use anyhow::Result;
use clap::Parser;

use options::CliOptions;
use protocol::{Command, ParseError, Response};
use session::Session;

const BRAIN_NAME: &str = "Gomokucaracha";
const BRAIN_AUTHOR: &str = "Santiago Eliott Paul-Antoine";
const BRAIN_COUNTRY: &str = "FR";

fn main() -> Result<()> {
    let options = CliOptions::parse();
    init_logger(options.log_level.as_deref());

    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let mut session = Session::new(
        options.engine_config(),
        BRAIN_NAME.to_string(),
        env!("CARGO_PKG_VERSION").to_string(),
        BRAIN_AUTHOR.to_string(),
        Some(BRAIN_COUNTRY.to_string()),
    );

    loop {
        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            break;
        }

        match dispatch_line(&mut session, &mut reader, &line) {
            Outcome::Responses(responses) => {
                for response in responses {
                    writeln!(out, "{}", response.to_line())?;
                }
                out.flush()?;
            }
            Outcome::Terminate => break,
        }
    }

    Ok(())
}

enum Outcome {
    Responses(Vec<Response>),
    Terminate,
}

fn dispatch_line(session: &mut Session, reader: &mut impl BufRead, line: &str) -> Outcome {
    let command = match protocol::parser::parse_line(line) {
        Ok(Some(command)) => command,
        Ok(None) => return Outcome::Responses(Vec::new()),
        Err(err) => return Outcome::Responses(vec![parse_error_response(&err)]),
    };

    let command = match command {
        Command::Board { .. } => match read_board_stones(reader) {
            Ok(stones) => Command::Board { stones },
            Err(err) => return Outcome::Responses(vec![parse_error_response(&err)]),
        },
        other => other,
    };

    match command {
        Command::Start { size } => Outcome::Responses(vec![handle_start(session, size)]),
        Command::Begin => Outcome::Responses(vec![handle_begin(session)]),
        Command::Turn { x, y } => Outcome::Responses(vec![handle_turn(session, x, y)]),
        Command::Board { stones } => Outcome::Responses(vec![handle_board(session, &stones)]),
        Command::About => Outcome::Responses(vec![handle_about(session)]),
        Command::End => Outcome::Terminate,
        Command::Unknown => Outcome::Responses(Vec::new()),
    }
}

/// Reads the `x,y,s` lines that follow a `BOARD` command until `DONE`.
fn read_board_stones(reader: &mut impl BufRead) -> Result<Vec<(u16, u16, u8)>, ParseError> {
    let mut stones = Vec::new();
    loop {
        let mut line = String::new();
        let bytes_read = reader
            .read_line(&mut line)
            .map_err(|err| ParseError(err.to_string()))?;
        if bytes_read == 0 {
            break;
        }
        match protocol::parser::parse_board_line(&line)? {
            Some(stone) => stones.push(stone),
            None => break,
        }
    }
    Ok(stones)
}

fn handle_start(session: &mut Session, size: u16) -> Response {
    if size == 0 {
        log::error!("START with non-positive size {size}");
        return Response::Error(format!("invalid board size {size}"));
    }
    match session.initialize_board(size) {
        Ok(()) => Response::Ok,
        Err(err) => {
            log::error!("START failed: {err}");
            Response::Error(err.to_string())
        }
    }
}

fn handle_begin(session: &mut Session) -> Response {
    match session.opening_move() {
        Some((x, y)) => Response::Move(x, y),
        None => no_game_in_progress(),
    }
}

fn handle_turn(session: &mut Session, x: u16, y: u16) -> Response {
    match session.process_opponent_move(x, y) {
        Some((mx, my)) => Response::Move(mx, my),
        None => no_game_in_progress(),
    }
}

fn handle_board(session: &mut Session, stones: &[(u16, u16, u8)]) -> Response {
    match session.replace_board(stones) {
        Some((x, y)) => Response::Move(x, y),
        None => no_game_in_progress(),
    }
}

fn handle_about(session: &Session) -> Response {
    Response::About(session.about())
}

fn no_game_in_progress() -> Response {
    Response::Error("no game in progress, send START first".to_string())
}

fn parse_error_response(err: &ParseError) -> Response {
    Response::Error(format!("Parse error: {err}"))
}

fn init_logger(log_level: Option<&str>) {
    let filter = log_level.unwrap_or("info");
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();
}
