//! Command classification and the built-in simple commands
//!
//! A message is addressed to the agent when it starts with one of the trigger
//! prefixes followed by a space. After the prefix, an exact match against the
//! closed command set selects a simple command handled without the model;
//! anything else is a setup or task message.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::AgentResult;
use crate::session::{Session, SessionStore};

/// Trigger prefixes that address a message to the agent, case-sensitive
pub const TRIGGER_PREFIXES: [&str; 6] = ["meow", "dev", "jr", "jd", "juniordev", "junior"];

static PREFIX_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!("^/({}) ", TRIGGER_PREFIXES.join("|"))).expect("static prefix regex")
});

static SIMPLE_COMMAND_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        "^/({}) ({})$",
        TRIGGER_PREFIXES.join("|"),
        SimpleCommand::NAMES.join("|")
    ))
    .expect("static command regex")
});

/// The closed set of directives handled without invoking the model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimpleCommand {
    /// Truncate the session's event history
    Reset,
    /// Delete the session entirely
    Leave,
    /// Print current identity and configuration
    Whoami,
}

impl SimpleCommand {
    /// Command names as they appear after the trigger prefix
    pub const NAMES: [&'static str; 3] = ["reset", "leave", "whoami"];

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "reset" => Some(SimpleCommand::Reset),
            "leave" => Some(SimpleCommand::Leave),
            "whoami" => Some(SimpleCommand::Whoami),
            _ => None,
        }
    }
}

/// True iff the message is addressed to the agent at all
pub fn has_trigger(text: &str) -> bool {
    PREFIX_REGEX.is_match(text)
}

/// True iff the message is exactly a trigger plus one simple command name
pub fn has_simple_command(text: &str) -> bool {
    SIMPLE_COMMAND_REGEX.is_match(text)
}

/// Extract the simple command, if the message is exactly one
pub fn parse_simple_command(text: &str) -> Option<SimpleCommand> {
    SIMPLE_COMMAND_REGEX
        .captures(text)
        .and_then(|caps| caps.get(2))
        .and_then(|m| SimpleCommand::from_name(m.as_str()))
}

/// Remove a matched trigger prefix; unaddressed text passes through unchanged
pub fn strip_trigger(text: &str) -> String {
    PREFIX_REGEX.replace(text, "").into_owned()
}

/// Run a simple command against the session and return its confirmation text.
///
/// Confirmations are not folded back into the event history: `reset` would
/// immediately repopulate the history it just emptied and `leave` would
/// resurrect the session it just deleted.
pub async fn handle_simple_command(
    command: SimpleCommand,
    session: &Session,
    store: &dyn SessionStore,
) -> AgentResult<String> {
    match command {
        SimpleCommand::Reset => {
            store.truncate_events(session.id).await?;
            tracing::info!(chat_id = session.id, "session history reset");
            Ok("chat reset! meeooow 😺".to_string())
        }

        SimpleCommand::Leave => {
            store.delete(session.id).await?;
            tracing::info!(chat_id = session.id, "session deleted");
            Ok("leaved! meeooow 👋😿".to_string())
        }

        SimpleCommand::Whoami => {
            let (owner, name) = match &session.repo {
                Some(repo) => (repo.owner.as_str(), repo.name.as_str()),
                None => ("unset", "unset"),
            };
            Ok(format!(
                "whoami\nchat.id: {}\nchat.repo_owner: {}\nchat.repo_name: {}",
                session.id, owner, name
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_knows_if_a_message_has_a_trigger() {
        assert!(has_trigger("/dev howdy junior dev!!"));
        assert!(has_trigger("/jr howdy junior dev!!"));
        assert!(!has_trigger("howdy someone else!!"));
        assert!(!has_trigger("/JR howdy")); // case-sensitive
        assert!(!has_trigger("/jr")); // prefix must be followed by a space
    }

    #[test]
    fn test_knows_if_a_message_has_a_simple_command() {
        assert!(!has_simple_command("howdy!!"));
        assert!(!has_simple_command("/jr howdy!!"));
        assert!(!has_simple_command("reset"));
        assert!(has_simple_command("/jr reset"));
        assert!(has_simple_command("/jr leave"));
        assert!(has_simple_command("/meow whoami"));
    }

    #[test]
    fn test_parses_simple_commands() {
        assert_eq!(parse_simple_command("howdy!!"), None);
        assert_eq!(parse_simple_command("/jr howdy!!"), None);
        assert_eq!(parse_simple_command("reset"), None);
        assert_eq!(parse_simple_command("/jr reset"), Some(SimpleCommand::Reset));
        assert_eq!(parse_simple_command("/jr leave"), Some(SimpleCommand::Leave));
        // a trigger with extra words is a task message, not a simple command
        assert_eq!(parse_simple_command("/jr reset the counter"), None);
    }

    #[test]
    fn test_strips_the_trigger_prefix() {
        assert_eq!(strip_trigger("/jr howdy junior dev!!"), "howdy junior dev!!");
        assert_eq!(strip_trigger("/juniordev fix the header"), "fix the header");
        assert_eq!(strip_trigger("laters"), "laters");
    }
}
