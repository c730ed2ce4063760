//! In-memory stand-ins for the chat store and the reply webhook.

use std::sync::Arc;
use std::sync::Mutex;

use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Notify;

use crate::domain::models::Chat;
use crate::domain::models::ChatStore;
use crate::domain::models::Identity;
use crate::domain::models::ReplyPayload;
use crate::domain::models::ReplyRequest;
use crate::domain::models::ReplyService;
use crate::domain::models::Sender;
use crate::domain::models::StoredMessage;

#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub enum CreateBehavior {
    #[default]
    Creates,
    Declines,
    Fails,
}

#[derive(Default)]
pub struct FakeStore {
    pub chats: Vec<Chat>,
    pub messages: Vec<StoredMessage>,
    pub create: CreateBehavior,
    pub fail_reads: bool,
    /// When set, user messages are not recorded until the gate opens.
    pub user_insert_gate: Option<Arc<Notify>>,
    pub created_titles: Mutex<Vec<String>>,
    pub inserted: Mutex<Vec<(String, String, Sender)>>,
}

impl FakeStore {
    pub fn inserted(&self) -> Vec<(String, String, Sender)> {
        return self.inserted.lock().unwrap().clone();
    }

    pub fn created_titles(&self) -> Vec<String> {
        return self.created_titles.lock().unwrap().clone();
    }
}

#[async_trait]
impl ChatStore for FakeStore {
    async fn list_chats(&self, user_id: &str) -> Result<Vec<Chat>> {
        assert_eq!(user_id, "user-1");
        if self.fail_reads {
            bail!("connection refused");
        }

        return Ok(self.chats.clone());
    }

    async fn create_chat(&self, user_id: &str, title: &str) -> Result<Option<Chat>> {
        assert_eq!(user_id, "user-1");
        let mut titles = self.created_titles.lock().unwrap();
        titles.push(title.to_string());

        match self.create {
            CreateBehavior::Creates => {
                return Ok(Some(Chat {
                    id: format!("chat-{}", titles.len()),
                    title: title.to_string(),
                    created_at: "2024-03-02T10:15:00+00:00".to_string(),
                }));
            }
            CreateBehavior::Declines => return Ok(None),
            CreateBehavior::Fails => bail!("connection reset by peer"),
        }
    }

    async fn list_messages(&self, _chat_id: &str) -> Result<Vec<StoredMessage>> {
        if self.fail_reads {
            bail!("connection refused");
        }

        return Ok(self.messages.clone());
    }

    async fn insert_message(&self, chat_id: &str, content: &str, sender: Sender) -> Result<()> {
        if let (Sender::User, Some(gate)) = (sender, &self.user_insert_gate) {
            gate.notified().await;
        }

        self.inserted
            .lock()
            .unwrap()
            .push((chat_id.to_string(), content.to_string(), sender));

        return Ok(());
    }
}

pub struct FakeReplies {
    pub payload: Option<Value>,
    pub gate: Option<Arc<Notify>>,
    pub requests: Mutex<Vec<ReplyRequest>>,
}

impl FakeReplies {
    pub fn with_payload(payload: Value) -> FakeReplies {
        return FakeReplies {
            payload: Some(payload),
            gate: None,
            requests: Mutex::new(vec![]),
        };
    }

    pub fn failing() -> FakeReplies {
        return FakeReplies {
            payload: None,
            gate: None,
            requests: Mutex::new(vec![]),
        };
    }

    pub fn requests(&self) -> Vec<ReplyRequest> {
        return self.requests.lock().unwrap().clone();
    }
}

#[async_trait]
impl ReplyService for FakeReplies {
    async fn reply(&self, request: ReplyRequest) -> Result<ReplyPayload> {
        self.requests.lock().unwrap().push(request);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        match &self.payload {
            Some(payload) => return Ok(ReplyPayload::new(payload.clone())),
            None => bail!("Failed to get response from bot"),
        }
    }
}

pub fn identity() -> Identity {
    return Identity {
        id: "user-1".to_string(),
        email: "ada@example.com".to_string(),
        display_name: "".to_string(),
    };
}
