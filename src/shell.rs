//! Line commands for the terminal host.
//!
//! Each stdin line becomes a [`Command`]: most map straight onto an
//! `Action`, the rest drive the location's history or end the session.

use std::fmt;

use crate::core::action::{Action, OAuthProvider};
use crate::core::state::Theme;

pub const HELP: &str = "\
commands:
  go <path>                       navigate (e.g. go /blog)
  back | forward                  history
  render                          re-render the current route
  login <email> <password>
  register <email> <password> <name...>
  oauth <google|microsoft|x>
  logout
  theme [light|dark|rose|ocean|forest]
  edit <slug> | cancel | preview
  title <text> | excerpt <text> | body <text>
  tag <name> | untag <name>
  publish                         create or save the draft
  delete <slug>
  profile <name>
  click <data-action>             fire a button from the page (e.g. click edit:merhaba)
  help | quit";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Dispatch(Action),
    Back,
    Forward,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellError {
    Unknown(String),
    Usage(&'static str),
}

impl fmt::Display for ShellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShellError::Unknown(cmd) => write!(f, "unknown command: {cmd} (try `help`)"),
            ShellError::Usage(usage) => write!(f, "usage: {usage}"),
        }
    }
}

impl std::error::Error for ShellError {}

fn dispatch(action: Action) -> Result<Option<Command>, ShellError> {
    Ok(Some(Command::Dispatch(action)))
}

/// Parses one line. Blank lines parse to `None`.
pub fn parse(line: &str) -> Result<Option<Command>, ShellError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (name, rest) = match line.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (line, ""),
    };
    let args: Vec<&str> = rest.split_whitespace().collect();

    let required = |usage: &'static str| {
        if rest.is_empty() {
            Err(ShellError::Usage(usage))
        } else {
            Ok(rest.to_string())
        }
    };

    match name {
        "go" => dispatch(Action::Navigate(required("go <path>")?)),
        "back" => Ok(Some(Command::Back)),
        "forward" => Ok(Some(Command::Forward)),
        "render" => dispatch(Action::Render),
        "login" => match args.as_slice() {
            [email, password] => dispatch(Action::Login {
                email: email.to_string(),
                password: password.to_string(),
            }),
            _ => Err(ShellError::Usage("login <email> <password>")),
        },
        "register" => match args.as_slice() {
            [email, password, name @ ..] if !name.is_empty() => dispatch(Action::Register {
                name: name.join(" "),
                email: email.to_string(),
                password: password.to_string(),
            }),
            _ => Err(ShellError::Usage("register <email> <password> <name...>")),
        },
        "oauth" => match OAuthProvider::parse(rest) {
            Some(provider) => dispatch(Action::OAuthDemo(provider)),
            None => Err(ShellError::Usage("oauth <google|microsoft|x>")),
        },
        "logout" => dispatch(Action::Logout),
        "theme" if rest.is_empty() => dispatch(Action::CycleTheme),
        "theme" => match Theme::parse(rest) {
            Some(theme) => dispatch(Action::SetTheme(theme)),
            None => Err(ShellError::Usage("theme [light|dark|rose|ocean|forest]")),
        },
        "edit" => dispatch(Action::EditPost(required("edit <slug>")?)),
        "cancel" => dispatch(Action::CancelEdit),
        "preview" => dispatch(Action::TogglePreview),
        "title" => dispatch(Action::SetTitle(rest.to_string())),
        "excerpt" => dispatch(Action::SetExcerpt(rest.to_string())),
        "body" => dispatch(Action::EditorInput(rest.to_string())),
        "tag" => dispatch(Action::AddTag(required("tag <name>")?)),
        "untag" => dispatch(Action::RemoveTag(required("untag <name>")?)),
        "publish" => dispatch(Action::SubmitPost),
        "delete" => dispatch(Action::DeletePost(required("delete <slug>")?)),
        "profile" => dispatch(Action::UpdateProfile {
            name: required("profile <name>")?,
        }),
        "click" => match Action::from_trigger(rest) {
            Some(action) => dispatch(action),
            None => Err(ShellError::Usage("click <data-action>")),
        },
        "help" => Ok(Some(Command::Help)),
        "quit" | "exit" => Ok(Some(Command::Quit)),
        other => Err(ShellError::Unknown(other.to_string())),
    }
}
