//! Line-oriented front end: each stdin line is one UI event.

use std::str::FromStr;

use tracing::{info, instrument};

use crate::clients::UserManagerClient;
use crate::domain::{FormField, UserId};
use crate::error::{InputError, ManagerError};

pub const HELP: &str = "\
Commands:
  set <field> <value>   firstName|lastName|email|department (or first|last|dept)
  submit                add the user, or save the edit
  edit <id>             load a listed user into the form
  delete <id>           delete a listed user
  cancel | clear        empty the form and leave edit mode
  refresh               fetch the list again
  help                  show this text
  quit                  exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputCommand {
    Set { field: FormField, value: String },
    Submit,
    Edit(UserId),
    Delete(UserId),
    Clear,
    Refresh,
    Help,
    Quit,
}

impl FromStr for InputCommand {
    type Err = InputError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match word {
            "set" => {
                let (field, value) = match rest.split_once(char::is_whitespace) {
                    Some((field, value)) => (field, value.trim()),
                    None if !rest.is_empty() => (rest, ""),
                    None => return Err(InputError::MissingArgument("set")),
                };
                Ok(InputCommand::Set {
                    field: field.parse()?,
                    value: value.to_string(),
                })
            }
            "submit" => Ok(InputCommand::Submit),
            "edit" => parse_id(rest, "edit").map(InputCommand::Edit),
            "delete" => parse_id(rest, "delete").map(InputCommand::Delete),
            "cancel" | "clear" => Ok(InputCommand::Clear),
            "refresh" => Ok(InputCommand::Refresh),
            "help" => Ok(InputCommand::Help),
            "quit" | "exit" => Ok(InputCommand::Quit),
            other => Err(InputError::UnknownCommand(other.to_string())),
        }
    }
}

fn parse_id(arg: &str, command: &'static str) -> Result<UserId, InputError> {
    if arg.is_empty() {
        return Err(InputError::MissingArgument(command));
    }
    arg.parse().map_err(|_| InputError::InvalidId(arg.to_string()))
}

/// What the terminal loop should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    /// Text for the user that is not part of the rendered screen.
    Notice(String),
    Quit,
}

/// Dispatches one command to the manager.
///
/// Rejected submits and unknown ids become notices; only a dead actor is an
/// error.
#[instrument(skip(client))]
pub async fn execute(client: &UserManagerClient, command: InputCommand) -> Result<Outcome, ManagerError> {
    match command {
        InputCommand::Set { field, value } => client.change_field(field, value).await?,
        InputCommand::Submit => match client.submit().await {
            Ok(()) => {}
            Err(ManagerError::Rejected(reason)) => return Ok(Outcome::Notice(reason.to_string())),
            Err(e) => return Err(e),
        },
        InputCommand::Edit(id) => {
            if !client.start_edit(id).await? {
                return Ok(Outcome::Notice(format!("No user with id {}", id)));
            }
        }
        InputCommand::Delete(id) => client.delete(id).await?,
        InputCommand::Clear => client.clear().await?,
        InputCommand::Refresh => client.mount().await?,
        InputCommand::Help => return Ok(Outcome::Notice(HELP.to_string())),
        InputCommand::Quit => {
            info!("Quit requested");
            return Ok(Outcome::Quit);
        }
    }
    Ok(Outcome::Continue)
}
