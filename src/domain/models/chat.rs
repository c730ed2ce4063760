#[cfg(test)]
#[path = "chat_test.rs"]
mod tests;

use chrono::DateTime;
use chrono::Local;
use serde_derive::Deserialize;
use serde_derive::Serialize;

/// Titles longer than this many characters are cut and suffixed with `...`.
pub const TITLE_MAX_CHARS: usize = 30;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chat {
    pub id: String,
    pub title: String,
    pub created_at: String,
}

impl Chat {
    pub fn title_from(text: &str) -> String {
        if text.chars().count() <= TITLE_MAX_CHARS {
            return text.to_string();
        }

        let truncated = text.chars().take(TITLE_MAX_CHARS).collect::<String>();
        return format!("{truncated}...");
    }

    /// Creation time in the local timezone, or the raw value when the backend
    /// sent something that isn't RFC 3339.
    pub fn created_at_local(&self) -> String {
        if let Ok(created_at) = DateTime::parse_from_rfc3339(&self.created_at) {
            return created_at
                .with_timezone(&Local)
                .format("%b %-d, %H:%M")
                .to_string();
        }

        return self.created_at.to_string();
    }
}
