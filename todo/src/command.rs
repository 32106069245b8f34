//! Line commands understood by the CLI front end.

use crate::types::TodoId;
use thiserror::Error;

/// Help text listing every command
pub const HELP: &str = "\
commands:
  add <text>     add a todo (most recent first)
  edit <id>      start editing a todo
  save <text>    save the todo being edited
  cancel         stop editing
  toggle <id>    mark a todo complete or incomplete
  rm <id>        delete a todo
  ls             show the list
  json           show the list as JSON
  help           show this help
  quit           leave";

/// A parsed command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Type into the add form and submit
    Add(String),
    /// Select a row for editing
    Edit(TodoId),
    /// Type into the edit form and submit
    Save(String),
    /// Drop the edit selection
    Cancel,
    /// Click a row
    Toggle(TodoId),
    /// Click a row's delete icon
    Remove(TodoId),
    /// Render the list
    List,
    /// Dump the latest snapshot as JSON
    Json,
    /// Show [`HELP`]
    Help,
    /// Exit
    Quit,
}

/// Reasons a line is not a command
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    /// First word is not a known command
    #[error("unknown command `{0}` (try `help`)")]
    Unknown(String),

    /// Command needs an id and got none
    #[error("`{0}` expects a todo id")]
    MissingId(&'static str),

    /// Id argument is not a number
    #[error("`{0}` is not a todo id")]
    InvalidId(String),
}

impl Command {
    /// Parse one input line
    ///
    /// Returns `Ok(None)` for a blank line. Text after `add ` or `save ` is
    /// kept verbatim, blank or not; judging it is the store's job.
    ///
    /// # Errors
    ///
    /// Returns a [`CommandError`] describing why the line was not understood.
    pub fn parse(line: &str) -> Result<Option<Self>, CommandError> {
        let line = line.trim_end_matches(['\r', '\n']).trim_start();
        if line.trim_end().is_empty() {
            return Ok(None);
        }

        let (verb, rest) = line.split_once(' ').unwrap_or((line.trim_end(), ""));

        let command = match verb.to_ascii_lowercase().as_str() {
            "add" | "a" => Self::Add(rest.to_string()),
            "save" | "s" => Self::Save(rest.to_string()),
            "edit" | "e" => Self::Edit(id_arg("edit", rest)?),
            "toggle" | "t" | "done" => Self::Toggle(id_arg("toggle", rest)?),
            "rm" | "delete" | "del" => Self::Remove(id_arg("rm", rest)?),
            "cancel" => Self::Cancel,
            "ls" | "list" => Self::List,
            "json" => Self::Json,
            "help" | "?" => Self::Help,
            "quit" | "q" | "exit" => Self::Quit,
            _ => return Err(CommandError::Unknown(verb.to_string())),
        };
        Ok(Some(command))
    }
}

fn id_arg(command: &'static str, rest: &str) -> Result<TodoId, CommandError> {
    let raw = rest.trim();
    if raw.is_empty() {
        return Err(CommandError::MissingId(command));
    }
    raw.parse()
        .map_err(|_| CommandError::InvalidId(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_lines_are_skipped() {
        assert_eq!(Command::parse(""), Ok(None));
        assert_eq!(Command::parse("   \n"), Ok(None));
    }

    #[test]
    fn add_keeps_text_verbatim() {
        assert_eq!(
            Command::parse("add  buy milk \n"),
            Ok(Some(Command::Add(" buy milk ".to_string())))
        );
        assert_eq!(Command::parse("add"), Ok(Some(Command::Add(String::new()))));
        assert_eq!(
            Command::parse("add    "),
            Ok(Some(Command::Add("   ".to_string())))
        );
    }

    #[test]
    fn id_commands() {
        assert_eq!(
            Command::parse("toggle #3"),
            Ok(Some(Command::Toggle(TodoId::new(3))))
        );
        assert_eq!(Command::parse("rm 4"), Ok(Some(Command::Remove(TodoId::new(4)))));
        assert_eq!(Command::parse("EDIT 5"), Ok(Some(Command::Edit(TodoId::new(5)))));
    }

    #[test]
    fn bad_input_is_reported() {
        assert_eq!(Command::parse("rm"), Err(CommandError::MissingId("rm")));
        assert_eq!(
            Command::parse("toggle x"),
            Err(CommandError::InvalidId("x".to_string()))
        );
        assert_eq!(
            Command::parse("fly away"),
            Err(CommandError::Unknown("fly".to_string()))
        );
    }
}
