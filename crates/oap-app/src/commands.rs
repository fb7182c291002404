//! Slash-command parsing for the interactive shell.

use oap_common::{ChatId, ToolMode};

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Plain text, sent to the assistant.
    Send(String),
    New,
    Chats,
    Open(ChatId),
    Delete(ChatId),
    Rename(ChatId, String),
    Tools(ToolMode),
    Status,
    Help,
    Quit,
}

pub const HELP: &str = "\
Commands:
  /new                  start a new chat
  /chats                list saved chats
  /open <id>            open a saved chat
  /delete <id>          delete a chat
  /rename <id> <title>  rename a chat
  /tools on|off         enable or disable tools
  /status               show chat, tool and usage status
  /help                 show this help
  /quit                 exit
Anything else is sent to the assistant.";

/// Parse one input line. Blank lines yield `Ok(None)`.
pub fn parse(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let Some(rest) = line.strip_prefix('/') else {
        return Ok(Some(Command::Send(line.to_string())));
    };

    let (name, args) = match rest.split_once(char::is_whitespace) {
        Some((name, args)) => (name, args.trim()),
        None => (rest, ""),
    };

    let command = match name {
        "new" => Command::New,
        "chats" => Command::Chats,
        "open" => Command::Open(chat_id(name, args)?),
        "delete" => Command::Delete(chat_id(name, args)?),
        "rename" => {
            let (id, title) = args
                .split_once(char::is_whitespace)
                .ok_or_else(|| "usage: /rename <id> <title>".to_string())?;
            Command::Rename(ChatId::new(id), title.trim().to_string())
        }
        "tools" => match args {
            "on" => Command::Tools(ToolMode::Enabled),
            "off" => Command::Tools(ToolMode::Disabled),
            _ => return Err("usage: /tools on|off".to_string()),
        },
        "status" => Command::Status,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(format!("unknown command: /{other} (try /help)")),
    };
    Ok(Some(command))
}

fn chat_id(command: &str, args: &str) -> Result<ChatId, String> {
    match args.split_whitespace().next() {
        Some(id) => Ok(ChatId::new(id)),
        None => Err(format!("usage: /{command} <id>")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_sent() {
        assert_eq!(
            parse("  apply to Adult Day Care ").unwrap(),
            Some(Command::Send("apply to Adult Day Care".into()))
        );
        assert_eq!(parse("   ").unwrap(), None);
    }

    #[test]
    fn parses_commands_with_arguments() {
        assert_eq!(parse("/open c42").unwrap(), Some(Command::Open(ChatId::new("c42"))));
        assert_eq!(
            parse("/rename c42  Food truck permit").unwrap(),
            Some(Command::Rename(ChatId::new("c42"), "Food truck permit".into()))
        );
        assert_eq!(
            parse("/tools on").unwrap(),
            Some(Command::Tools(ToolMode::Enabled))
        );
        assert_eq!(parse("/quit").unwrap(), Some(Command::Quit));
    }

    #[test]
    fn rejects_bad_usage() {
        assert!(parse("/open").is_err());
        assert!(parse("/rename c42").is_err());
        assert!(parse("/tools maybe").is_err());
        assert!(parse("/frobnicate").is_err());
    }
}
