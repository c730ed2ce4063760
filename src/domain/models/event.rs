use super::Chat;
use super::Message;

/// State changes reported by the chat session so the UI can redraw.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    ChatChanged(Option<Chat>),
    HistoryChanged(Vec<Chat>),
    MessageAppended(Message),
    MessagesReplaced(Vec<Message>),
    SendingChanged(bool),
}
