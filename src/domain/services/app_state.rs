#[cfg(test)]
#[path = "app_state_test.rs"]
mod tests;

use anyhow::Result;
use owo_colors::OwoColorize;
use tokio::sync::mpsc;

use crate::domain::models::Action;
use crate::domain::models::Chat;
use crate::domain::models::Event;
use crate::domain::models::Identity;
use crate::domain::models::Message;
use crate::domain::models::Sender;
use crate::domain::models::SlashCommand;

pub const WELCOME_TEXT: &str =
    "Start a conversation with your AI assistant. Ask questions, get help, or just chat!";

pub fn help_text() -> String {
    let text = r#"
COMMANDS:
- /new (/n) - Start a new conversation.
- /chats (/l) - List your conversations, newest first.
- /open NUMBER (/o) - Open a conversation from the list.
- /help (/h) - Print this help.
- /quit (/q, /exit) - Exit.
    "#;

    return text.trim().to_string();
}

pub fn format_chat(number: usize, chat: &Chat, is_current: bool) -> String {
    let marker = if is_current { "*" } else { " " };
    return format!(
        "{marker} {number}. {} ({})",
        chat.title,
        chat.created_at_local()
    );
}

pub fn format_message(message: &Message, identity: &Identity, colors: bool) -> String {
    let label = match message.sender {
        Sender::User => identity.display_label(),
        Sender::Bot => "Assistant".to_string(),
    };

    if !colors {
        return format!("{label}: {}", message.text);
    }

    if message.sender == Sender::User {
        return format!("{}: {}", label.cyan().bold(), message.text);
    }
    return format!("{}: {}", label.green().bold(), message.text);
}

/// What the terminal UI knows about the session, rebuilt from the events the
/// session sends.
pub struct AppState {
    pub identity: Identity,
    pub chats: Vec<Chat>,
    pub current_chat: Option<Chat>,
    pub waiting_for_backend: bool,
    pub colors: bool,
}

impl AppState {
    pub fn new(identity: Identity) -> AppState {
        return AppState {
            identity,
            chats: vec![],
            current_chat: None,
            waiting_for_backend: false,
            colors: false,
        };
    }

    /// Applies a session event and returns the lines to print for it.
    pub fn handle_event(&mut self, event: Event) -> Vec<String> {
        match event {
            Event::ChatChanged(chat) => {
                let heading = match &chat {
                    Some(chat) => chat.title.to_string(),
                    None => "New Conversation".to_string(),
                };
                self.current_chat = chat;

                return vec![format!("── {heading} ──")];
            }
            Event::HistoryChanged(chats) => {
                self.chats = chats;
                return vec![];
            }
            Event::MessageAppended(message) => {
                // The terminal already shows what the user typed.
                if message.sender == Sender::User {
                    return vec![];
                }
                return vec![format_message(&message, &self.identity, self.colors)];
            }
            Event::MessagesReplaced(messages) => {
                if messages.is_empty() {
                    return vec![WELCOME_TEXT.to_string()];
                }

                return messages
                    .iter()
                    .map(|message| return format_message(message, &self.identity, self.colors))
                    .collect::<Vec<String>>();
            }
            Event::SendingChanged(is_sending) => {
                self.waiting_for_backend = is_sending;
                if is_sending {
                    return vec!["Assistant is typing...".to_string()];
                }
                return vec![];
            }
        }
    }

    fn list_chats(&self) -> Vec<String> {
        if self.chats.is_empty() {
            return vec!["You have no conversations yet.".to_string()];
        }

        let current_id = self
            .current_chat
            .as_ref()
            .map(|chat| return chat.id.to_string());

        return self
            .chats
            .iter()
            .enumerate()
            .map(|(idx, chat)| {
                let is_current = current_id.as_deref() == Some(chat.id.as_str());
                return format_chat(idx + 1, chat, is_current);
            })
            .collect::<Vec<String>>();
    }

    /// Handles a line typed by the user. Returns whether the UI should exit,
    /// and the lines to print.
    pub fn handle_input(
        &mut self,
        text: &str,
        tx: &mpsc::UnboundedSender<Action>,
    ) -> Result<(bool, Vec<String>)> {
        let text = text.trim();
        if text.is_empty() {
            return Ok((false, vec![]));
        }

        if let Some(command) = SlashCommand::parse(text) {
            if command.is_quit() {
                return Ok((true, vec![]));
            }

            if command.is_help() {
                let lines = help_text()
                    .split('\n')
                    .map(|line| return line.to_string())
                    .collect::<Vec<String>>();
                return Ok((false, lines));
            }

            if command.is_list_chats() {
                return Ok((false, self.list_chats()));
            }

            if command.is_new_chat() {
                tx.send(Action::NewChat())?;
                return Ok((false, vec![]));
            }

            if command.is_open_chat() {
                let chat = command
                    .chat_number()
                    .and_then(|number| return self.chats.get(number - 1));
                if let Some(chat) = chat {
                    tx.send(Action::OpenChat(chat.clone()))?;
                    return Ok((false, vec![]));
                }

                return Ok((
                    false,
                    vec!["No conversation with that number. Use /chats to list them.".to_string()],
                ));
            }
        }

        if self.waiting_for_backend {
            return Ok((
                false,
                vec!["Still waiting for the assistant to reply.".to_string()],
            ));
        }

        self.waiting_for_backend = true;
        tx.send(Action::Send(text.to_string()))?;

        return Ok((false, vec![]));
    }
}
