use anyhow::Result;
use async_trait::async_trait;
use serde_derive::Deserialize;
use serde_derive::Serialize;

use super::Chat;
use super::Sender;

/// A message as the backend stores it. `role` is `None` only when the backend
/// schema predates the role column; a null role comes back as `Some("")`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredMessage {
    pub id: String,
    pub content: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[async_trait]
pub trait ChatStore: Send + Sync {
    /// Chats owned by the user, newest first.
    async fn list_chats(&self, user_id: &str) -> Result<Vec<Chat>>;

    /// Creates a chat. `Ok(None)` means the backend answered but declined to
    /// create it, errors are reserved for transport failures.
    async fn create_chat(&self, user_id: &str, title: &str) -> Result<Option<Chat>>;

    /// Messages of a chat, oldest first.
    async fn list_messages(&self, chat_id: &str) -> Result<Vec<StoredMessage>>;

    async fn insert_message(&self, chat_id: &str, content: &str, sender: Sender) -> Result<()>;
}
