#[cfg(test)]
#[path = "graphql_test.rs"]
mod tests;

use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_derive::Deserialize;
use serde_derive::Serialize;
use serde_json::json;
use serde_json::Value;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Chat;
use crate::domain::models::ChatStore;
use crate::domain::models::Credential;
use crate::domain::models::Sender;
use crate::domain::models::StoredMessage;

const USER_CHATS: &str = r#"
query UserChats($userId: uuid!) {
  chats(where: { user_id: { _eq: $userId } }, order_by: { created_at: desc }) {
    id
    title
    created_at
  }
}"#;

const CREATE_CHAT: &str = r#"
mutation CreateChat($userId: uuid!, $title: String!) {
  insert_chats_one(object: { user_id: $userId, title: $title }) {
    id
    title
    created_at
  }
}"#;

const CHAT_MESSAGES: &str = r#"
query ChatMessages($chatId: uuid!) {
  messages(where: { chat_id: { _eq: $chatId } }, order_by: { created_at: asc }) {
    id
    content
    role
    created_at
  }
}"#;

// Backends created before the role column existed reject any selection of
// it, so these variants leave it out.
const CHAT_MESSAGES_LEGACY: &str = r#"
query ChatMessagesLegacy($chatId: uuid!) {
  messages(where: { chat_id: { _eq: $chatId } }, order_by: { created_at: asc }) {
    id
    content
    created_at
  }
}"#;

const INSERT_MESSAGE: &str = r#"
mutation InsertMessage($chatId: uuid!, $content: String!, $role: String!) {
  insert_messages_one(object: { chat_id: $chatId, content: $content, role: $role }) {
    id
  }
}"#;

const INSERT_MESSAGE_LEGACY: &str = r#"
mutation InsertMessageLegacy($chatId: uuid!, $content: String!) {
  insert_messages_one(object: { chat_id: $chatId, content: $content }) {
    id
  }
}"#;

#[derive(Debug, Clone, PartialEq, Serialize)]
struct GraphQLRequest<'a> {
    query: &'a str,
    variables: Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct GraphQLError {
    message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
struct GraphQLResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQLError>,
}

impl<T> GraphQLResponse<T> {
    fn has_errors(&self) -> bool {
        return !self.errors.is_empty();
    }

    /// Whether the backend rejected the operation because it doesn't know
    /// about the `role` column.
    fn is_missing_role(&self) -> bool {
        return self
            .errors
            .iter()
            .any(|e| return e.message.to_lowercase().contains("role"));
    }

    fn error_message(&self) -> String {
        return self
            .errors
            .iter()
            .map(|e| return e.message.to_string())
            .collect::<Vec<String>>()
            .join("; ");
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct ChatsData {
    chats: Vec<Chat>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct CreateChatData {
    insert_chats_one: Option<Chat>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct MessagesData {
    messages: Vec<StoredMessage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct InsertMessageData {
    insert_messages_one: Option<Value>,
}

/// Chat storage on a Hasura-style GraphQL endpoint.
pub struct GraphQLStore {
    url: String,
    credential: Credential,
    client: reqwest::Client,
}

impl Default for GraphQLStore {
    fn default() -> GraphQLStore {
        return GraphQLStore::new(&Config::get(ConfigKey::GraphqlUrl), Credential::from_config());
    }
}

impl GraphQLStore {
    pub fn new(url: &str, credential: Credential) -> GraphQLStore {
        return GraphQLStore {
            url: url.to_string(),
            credential,
            client: reqwest::Client::new(),
        };
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: Value,
    ) -> Result<GraphQLResponse<T>> {
        if self.url.is_empty() {
            bail!("GraphQL URL is not defined");
        }

        let mut req = self
            .client
            .post(&self.url)
            .json(&GraphQLRequest { query, variables });

        req = match &self.credential {
            Credential::Bearer(token) => req.bearer_auth(token),
            Credential::AdminSecret(secret) => req.header("x-hasura-admin-secret", secret),
            Credential::Anonymous => req,
        };

        let res = req.send().await?;
        let status = res.status();
        if !status.is_success() {
            tracing::error!(status = status.as_u16(), "GraphQL request failed");
            bail!("GraphQL request failed with status {status}");
        }

        return Ok(res.json::<GraphQLResponse<T>>().await?);
    }
}

#[async_trait]
impl ChatStore for GraphQLStore {
    async fn list_chats(&self, user_id: &str) -> Result<Vec<Chat>> {
        let res = self
            .execute::<ChatsData>(USER_CHATS, json!({ "userId": user_id }))
            .await?;
        if res.has_errors() {
            bail!("Failed to list chats: {}", res.error_message());
        }

        return Ok(res.data.map(|e| return e.chats).unwrap_or_default());
    }

    async fn create_chat(&self, user_id: &str, title: &str) -> Result<Option<Chat>> {
        let res = self
            .execute::<CreateChatData>(
                CREATE_CHAT,
                json!({ "userId": user_id, "title": title }),
            )
            .await?;
        if res.has_errors() {
            tracing::warn!(errors = %res.error_message(), "Backend refused to create chat");
        }

        return Ok(res.data.and_then(|e| return e.insert_chats_one));
    }

    async fn list_messages(&self, chat_id: &str) -> Result<Vec<StoredMessage>> {
        let variables = json!({ "chatId": chat_id });
        let res = self
            .execute::<MessagesData>(CHAT_MESSAGES, variables.clone())
            .await?;

        if res.is_missing_role() {
            tracing::debug!(chat_id = chat_id, "Backend has no role column, refetching without it");
            let res = self
                .execute::<MessagesData>(CHAT_MESSAGES_LEGACY, variables)
                .await?;
            if res.has_errors() {
                bail!("Failed to list messages: {}", res.error_message());
            }

            return Ok(res.data.map(|e| return e.messages).unwrap_or_default());
        }

        if res.has_errors() {
            bail!("Failed to list messages: {}", res.error_message());
        }

        // The role column exists, so an empty role is still an explicit one.
        let messages = res
            .data
            .map(|e| return e.messages)
            .unwrap_or_default()
            .into_iter()
            .map(|mut msg| {
                msg.role = Some(msg.role.unwrap_or_default());
                return msg;
            })
            .collect::<Vec<StoredMessage>>();

        return Ok(messages);
    }

    async fn insert_message(&self, chat_id: &str, content: &str, sender: Sender) -> Result<()> {
        let mut res = self
            .execute::<InsertMessageData>(
                INSERT_MESSAGE,
                json!({ "chatId": chat_id, "content": content, "role": sender.role() }),
            )
            .await?;

        if res.is_missing_role() {
            tracing::debug!(chat_id = chat_id, "Backend has no role column, saving without it");
            res = self
                .execute::<InsertMessageData>(
                    INSERT_MESSAGE_LEGACY,
                    json!({ "chatId": chat_id, "content": content }),
                )
                .await?;
        }

        if res.has_errors() {
            bail!("Failed to save message: {}", res.error_message());
        }

        return Ok(());
    }
}
