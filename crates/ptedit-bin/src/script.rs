//! Command script parsing: one command per line.
//!
//! ```text
//! # comment
//! type hello
//! left
//! char space
//! enter
//! backspace
//! exit
//! ```

use core_actions::{Command, Direction};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScriptError {
    #[error("unknown command `{0}`")]
    Unknown(String),
    #[error("`char` expects exactly one character, got `{0}`")]
    BadChar(String),
    #[error("`{0}` takes no argument")]
    UnexpectedArgument(String),
    #[error("`type` needs text")]
    MissingText,
}

/// Commands for one script line. Blank lines and `#` comments yield none.
pub fn parse_line(line: &str) -> Result<Vec<Command>, ScriptError> {
    let body = line.trim_end_matches(['\r', '\n']).trim_start();
    if body.is_empty() || body.starts_with('#') {
        return Ok(Vec::new());
    }
    let (word, arg) = body.split_once(' ').unwrap_or((body, ""));
    let bare = |command: Command| {
        if arg.trim().is_empty() {
            Ok(vec![command])
        } else {
            Err(ScriptError::UnexpectedArgument(word.to_string()))
        }
    };
    match word {
        "up" => bare(Command::Move(Direction::Up)),
        "down" => bare(Command::Move(Direction::Down)),
        "left" => bare(Command::Move(Direction::Left)),
        "right" => bare(Command::Move(Direction::Right)),
        "enter" => bare(Command::InsertNewline),
        "backspace" => bare(Command::Delete),
        "exit" => bare(Command::Exit),
        "char" => {
            let arg = arg.trim();
            if arg == "space" {
                return Ok(vec![Command::InsertChar(' ')]);
            }
            let mut chars = arg.chars();
            match (chars.next(), chars.next()) {
                (Some(ch), None) => Ok(vec![Command::InsertChar(ch)]),
                _ => Err(ScriptError::BadChar(arg.to_string())),
            }
        }
        "type" if arg.is_empty() => Err(ScriptError::MissingText),
        "type" => Ok(arg.chars().map(Command::InsertChar).collect()),
        other => Err(ScriptError::Unknown(other.to_string())),
    }
}
