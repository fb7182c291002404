//! Line-oriented chat shell over stdin/stdout.

use std::sync::Arc;

use oap_ai::{McpToolProvider, ToolProvider};
use oap_common::{ChatError, Role};
use oap_session::{ConversationSession, Selection};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, warn};

use crate::commands::{self, Command, HELP};

pub struct Shell {
    session: ConversationSession,
    tools: Arc<McpToolProvider>,
}

impl Shell {
    pub fn new(session: ConversationSession, tools: Arc<McpToolProvider>) -> Self {
        Self { session, tools }
    }

    pub fn session(&self) -> &ConversationSession {
        &self.session
    }

    /// Read commands until `/quit` or end of input.
    pub async fn run(&self) -> Result<(), ChatError> {
        println!("oap-chat {}. Type /help for commands.", env!("CARGO_PKG_VERSION"));
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        while let Some(line) = lines.next_line().await? {
            let command = match commands::parse(&line) {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(usage) => {
                    println!("{usage}");
                    continue;
                }
            };
            if command == Command::Quit {
                break;
            }
            self.handle(command).await;
        }

        self.tools.disconnect().await;
        debug!("shell closed");
        Ok(())
    }

    pub async fn handle(&self, command: Command) {
        match command {
            Command::Send(text) => match self.session.send_user_message(&text).await {
                Ok(reply) => {
                    println!("\nassistant> {}\n", reply.message.text);
                    if let Some(failure) = reply.failure {
                        debug!(error = %failure, "reply is a fallback");
                    }
                }
                Err(e) => println!("{e}"),
            },
            Command::New => {
                self.session.new_chat();
                println!("Started a new chat.");
            }
            Command::Chats => {
                if let Err(e) = self.session.load_chats().await {
                    warn!(error = %e, "failed to load chats");
                    println!("Could not load chats: {e}");
                    return;
                }
                self.print_chats();
            }
            Command::Open(id) => match self.session.select_chat(&id).await {
                Ok(Selection::Skipped) => println!("Chat {id} is open with a reply in progress."),
                Ok(Selection::Reloaded { .. }) => self.print_log(),
                Ok(Selection::Superseded) => {}
                Err(e) => println!("Could not open chat {id}: {e}"),
            },
            Command::Delete(id) => match self.session.delete_chat(&id).await {
                Ok(()) => println!("Deleted chat {id}."),
                Err(e) => println!("Could not delete chat {id}: {e}"),
            },
            Command::Rename(id, title) => match self.session.rename_chat(&id, &title).await {
                Ok(record) => println!("Renamed chat {id} to {:?}.", record.display_title()),
                Err(e) => println!("Could not rename chat {id}: {e}"),
            },
            Command::Tools(mode) => {
                let status = self.session.set_tool_mode(mode).await;
                println!("Tools {}; server {status}.", if mode.is_enabled() { "on" } else { "off" });
                if let Some(reason) = self.tools.last_error() {
                    println!("Last connection error: {reason}");
                }
            }
            Command::Status => self.print_status(),
            Command::Help => println!("{HELP}"),
            Command::Quit => {}
        }
    }

    fn print_chats(&self) {
        let chats = self.session.chats();
        if chats.is_empty() {
            println!("No saved chats.");
            return;
        }
        let current = self.session.current_chat().id;
        for chat in chats {
            let marker = if current.as_ref() == Some(&chat.id) { "*" } else { " " };
            println!(
                "{marker} {}  {}  ({})",
                chat.id,
                chat.display_title(),
                chat.updated_at.format("%Y-%m-%d %H:%M")
            );
        }
    }

    fn print_log(&self) {
        let chat = self.session.current_chat();
        println!("--- {} ---", chat.title);
        for message in self.session.messages() {
            let who = match message.role {
                Role::User => "you",
                Role::Model => "assistant",
            };
            println!("{who}> {}", message.text);
        }
    }

    fn print_status(&self) {
        let chat = self.session.current_chat();
        match &chat.id {
            Some(id) => println!("Chat: {} ({id})", chat.title),
            None => println!("Chat: new (not saved yet)"),
        }
        println!("Messages: {}", self.session.messages().len());
        println!(
            "Tools: {} ({} at {})",
            if self.session.tool_mode().is_enabled() { "on" } else { "off" },
            self.tools.status(),
            self.tools.server_url()
        );
        let usage = self.session.usage();
        println!(
            "Tokens: {} in / {} out over {} calls",
            usage.total().input_tokens,
            usage.total().output_tokens,
            usage.call_count()
        );
    }
}
