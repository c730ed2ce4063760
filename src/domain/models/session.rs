use super::Chat;
use super::Message;

/// In-memory state of one chat session. No active chat means the session is
/// fresh and `messages` only holds turns composed since then.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionState {
    pub current_chat: Option<Chat>,
    pub messages: Vec<Message>,
    /// The user's chats, newest first.
    pub chat_history: Vec<Chat>,
    pub is_sending: bool,
}

impl SessionState {
    pub fn is_fresh(&self) -> bool {
        return self.current_chat.is_none();
    }

    pub fn current_chat_id(&self) -> Option<String> {
        return self
            .current_chat
            .as_ref()
            .map(|chat| return chat.id.to_string());
    }
}
