#[cfg(test)]
#[path = "chat_session_test.rs"]
mod tests;

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::infer_sender;
use crate::domain::models::Chat;
use crate::domain::models::ChatStore;
use crate::domain::models::Event;
use crate::domain::models::Identity;
use crate::domain::models::Message;
use crate::domain::models::ReplyRequest;
use crate::domain::models::ReplyService;
use crate::domain::models::Sender;
use crate::domain::models::SessionState;

pub const SEND_ERROR_TEXT: &str = "Sorry, I encountered an error. Please try again.";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SendOutcome {
    /// Blank input, or another send was still waiting for its reply.
    Ignored,
    Replied,
    /// A step failed and the error turn was appended instead of a reply.
    Failed,
}

struct PendingWrite {
    chat_id: String,
    content: String,
    sender: Sender,
}

/// Background task saving messages one at a time, in the order they were
/// queued.
struct Writer {
    tx: mpsc::UnboundedSender<PendingWrite>,
    handle: JoinHandle<()>,
}

impl Writer {
    fn spawn(store: Arc<dyn ChatStore>) -> Writer {
        let (tx, mut rx) = mpsc::unbounded_channel::<PendingWrite>();
        let handle = tokio::spawn(async move {
            while let Some(write) = rx.recv().await {
                if let Err(err) = store
                    .insert_message(&write.chat_id, &write.content, write.sender)
                    .await
                {
                    tracing::error!(
                        error = ?err,
                        chat_id = %write.chat_id,
                        role = write.sender.role(),
                        "Failed to save message"
                    );
                }
            }
        });

        return Writer { tx, handle };
    }
}

/// Owns the state of one conversation and talks to the chat store and the
/// reply webhook on behalf of the UI. Every change to the state is reported
/// as an [`Event`].
pub struct ChatSession {
    identity: Identity,
    store: Arc<dyn ChatStore>,
    replies: Arc<dyn ReplyService>,
    tx: mpsc::UnboundedSender<Event>,
    state: SessionState,
    writer: Option<Writer>,
}

impl ChatSession {
    pub fn new(
        identity: Identity,
        store: Arc<dyn ChatStore>,
        replies: Arc<dyn ReplyService>,
        tx: mpsc::UnboundedSender<Event>,
    ) -> ChatSession {
        return ChatSession {
            identity,
            store,
            replies,
            tx,
            state: SessionState::default(),
            writer: None,
        };
    }

    pub fn state(&self) -> &SessionState {
        return &self.state;
    }

    fn emit(&self, event: Event) {
        if self.tx.send(event).is_err() {
            tracing::debug!("No UI is listening for session events");
        }
    }

    fn push_message(&mut self, message: Message) {
        self.state.messages.push(message.clone());
        self.emit(Event::MessageAppended(message));
    }

    fn replace_messages(&mut self, messages: Vec<Message>) {
        self.state.messages = messages.clone();
        self.emit(Event::MessagesReplaced(messages));
    }

    fn set_current_chat(&mut self, chat: Option<Chat>) {
        self.state.current_chat = chat.clone();
        self.emit(Event::ChatChanged(chat));
    }

    fn set_sending(&mut self, is_sending: bool) {
        self.state.is_sending = is_sending;
        self.emit(Event::SendingChanged(is_sending));
    }

    pub async fn send_message(&mut self, text: &str) -> SendOutcome {
        let text = text.trim();
        if text.is_empty() || self.state.is_sending {
            return SendOutcome::Ignored;
        }

        self.push_message(Message::new(Sender::User, text));
        self.set_sending(true);

        let outcome = match self.exchange(text).await {
            Ok(()) => SendOutcome::Replied,
            Err(err) => {
                tracing::error!(error = ?err, "Failed to send message");
                self.push_message(Message::new(Sender::Bot, SEND_ERROR_TEXT));
                SendOutcome::Failed
            }
        };

        self.set_sending(false);
        return outcome;
    }

    async fn exchange(&mut self, text: &str) -> Result<()> {
        let chat_id = match self.state.current_chat_id() {
            Some(id) => Some(id),
            None => self.create_chat(text).await?,
        };

        if let Some(id) = &chat_id {
            self.persist(id, text, Sender::User);
        }

        let payload = self
            .replies
            .reply(ReplyRequest::new(text, chat_id.clone()))
            .await?;
        let reply = payload.text();
        self.push_message(Message::new(Sender::Bot, &reply));

        if let Some(id) = &chat_id {
            self.persist(id, &reply, Sender::Bot);
        }

        return Ok(());
    }

    async fn create_chat(&mut self, text: &str) -> Result<Option<String>> {
        let title = Chat::title_from(text);
        let created = self.store.create_chat(&self.identity.id, &title).await?;

        if let Some(chat) = created {
            let id = chat.id.to_string();
            self.state.chat_history.insert(0, chat.clone());
            self.emit(Event::HistoryChanged(self.state.chat_history.clone()));
            self.set_current_chat(Some(chat));

            return Ok(Some(id));
        }

        tracing::warn!(
            title = %title,
            "Chat was not created, this turn will not be saved"
        );
        return Ok(None);
    }

    /// Queues a message to be saved in the background. Failures are logged
    /// and otherwise ignored; the message stays on screen either way.
    fn persist(&mut self, chat_id: &str, content: &str, sender: Sender) {
        let store = &self.store;
        let writer = self
            .writer
            .get_or_insert_with(|| return Writer::spawn(Arc::clone(store)));

        let write = PendingWrite {
            chat_id: chat_id.to_string(),
            content: content.to_string(),
            sender,
        };
        if writer.tx.send(write).is_err() {
            tracing::error!(chat_id = chat_id, "Message writer has stopped, message not saved");
        }
    }

    /// Waits for every queued save to finish.
    pub async fn settle_persistence(&mut self) {
        if let Some(writer) = self.writer.take() {
            drop(writer.tx);
            if let Err(err) = writer.handle.await {
                tracing::error!(error = ?err, "Message writer did not complete");
            }
        }
    }

    pub async fn load_chat(&mut self, chat: Chat) {
        let chat_id = chat.id.to_string();
        self.set_current_chat(Some(chat));

        let messages = match self.store.list_messages(&chat_id).await {
            Ok(stored) => stored
                .iter()
                .enumerate()
                .map(|(idx, msg)| {
                    let sender = infer_sender(idx, &msg.content, msg.role.as_deref());
                    return Message::persisted(&msg.id, sender, &msg.content, msg.created_at.clone());
                })
                .collect::<Vec<Message>>(),
            Err(err) => {
                tracing::error!(error = ?err, chat_id = %chat_id, "Failed to load chat messages");
                vec![]
            }
        };

        self.replace_messages(messages);
    }

    /// Refreshes the user's chat list, and opens the newest chat when none is
    /// active yet.
    pub async fn load_history(&mut self) {
        let chats = match self.store.list_chats(&self.identity.id).await {
            Ok(chats) => chats,
            Err(err) => {
                tracing::error!(error = ?err, "Failed to load chat history");
                return;
            }
        };

        self.state.chat_history = chats;
        self.emit(Event::HistoryChanged(self.state.chat_history.clone()));

        if self.state.is_fresh() {
            if let Some(latest) = self.state.chat_history.first().cloned() {
                self.load_chat(latest).await;
            }
        }
    }

    pub fn start_new_chat(&mut self) {
        self.set_current_chat(None);
        self.replace_messages(vec![]);
    }
}
