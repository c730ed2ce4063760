#[cfg(test)]
#[path = "reply_test.rs"]
mod tests;

use anyhow::Result;
use async_trait::async_trait;
use serde_derive::Deserialize;
use serde_derive::Serialize;
use serde_json::Value;

pub const REPLY_FALLBACK_TEXT: &str = "Sorry, I could not process your request.";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyRequest {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chat_id: Option<String>,
}

impl ReplyRequest {
    pub fn new(message: &str, chat_id: Option<String>) -> ReplyRequest {
        return ReplyRequest {
            message: message.to_string(),
            chat_id,
        };
    }
}

/// Raw JSON returned by the reply webhook. Workflows either answer with a
/// list of items carrying `text` or `output`, or with an object carrying
/// `response`.
#[derive(Clone, Debug, PartialEq)]
pub struct ReplyPayload(Value);

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    return value
        .and_then(|e| return e.as_str())
        .filter(|e| return !e.is_empty());
}

impl ReplyPayload {
    pub fn new(value: Value) -> ReplyPayload {
        return ReplyPayload(value);
    }

    pub fn text(&self) -> String {
        let first = self.0.get(0);

        let text = non_empty_str(first.and_then(|e| return e.get("text")))
            .or_else(|| return non_empty_str(first.and_then(|e| return e.get("output"))))
            .or_else(|| return non_empty_str(self.0.get("response")))
            .unwrap_or(REPLY_FALLBACK_TEXT);

        return text.to_string();
    }
}

#[async_trait]
pub trait ReplyService: Send + Sync {
    async fn reply(&self, request: ReplyRequest) -> Result<ReplyPayload>;
}
