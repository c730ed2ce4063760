#[cfg(test)]
#[path = "message_test.rs"]
mod tests;

use serde_derive::Deserialize;
use serde_derive::Serialize;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

impl Sender {
    /// Value of the `role` column a message from this sender is stored with.
    pub fn role(&self) -> &'static str {
        match self {
            Sender::User => return "user",
            Sender::Bot => return "assistant",
        }
    }

    pub fn from_role(role: &str) -> Sender {
        if role == "user" {
            return Sender::User;
        }

        return Sender::Bot;
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: Option<String>,
    pub sender: Sender,
    pub text: String,
    pub timestamp: Option<String>,
}

impl Message {
    /// A locally composed message that the backend has not stored yet.
    pub fn new(sender: Sender, text: &str) -> Message {
        return Message {
            id: None,
            sender,
            text: text.to_string(),
            timestamp: None,
        };
    }

    pub fn persisted(id: &str, sender: Sender, text: &str, timestamp: Option<String>) -> Message {
        return Message {
            id: Some(id.to_string()),
            sender,
            text: text.to_string(),
            timestamp,
        };
    }

    pub fn is_saved(&self) -> bool {
        return self.id.is_some();
    }
}
