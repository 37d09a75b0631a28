//! Parsing of terminal input lines.
//!
//! A plain line is typed into the input box and submitted. Lines starting
//! with `/` are commands; rows are addressed by their displayed number.

use std::str::FromStr;

use thiserror::Error;

pub const HELP: &str = "\
<text>       add a task
/add         add the text already in the input
/edit N      change the task text of row N
/delete N    delete row N
/list        redraw the list
/help        show this help
/quit        exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Type the text into the input and press Add.
    Submit(String),
    /// Press Add with whatever is in the input.
    Add,
    Edit(usize),
    Delete(usize),
    List,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command: /{0} (try /help)")]
    Unknown(String),

    #[error("/{0} needs a row number")]
    MissingRow(&'static str),

    #[error("not a row number: {0}")]
    BadRow(String),
}

fn row(name: &'static str, arg: &str) -> Result<usize, CommandError> {
    if arg.is_empty() {
        return Err(CommandError::MissingRow(name));
    }
    arg.parse()
        .map_err(|_| CommandError::BadRow(arg.to_string()))
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let Some(rest) = line.strip_prefix('/') else {
            return Ok(Command::Submit(line.to_string()));
        };

        let (name, arg) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
        let arg = arg.trim();
        match name {
            "add" | "a" => Ok(Command::Add),
            "edit" | "e" => row("edit", arg).map(Command::Edit),
            "delete" | "d" => row("delete", arg).map(Command::Delete),
            "list" | "l" => Ok(Command::List),
            "help" | "h" | "?" => Ok(Command::Help),
            "quit" | "q" => Ok(Command::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}
