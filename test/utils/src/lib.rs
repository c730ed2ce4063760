use serde_json::json;
use serde_json::Value;

/// A `chats` query response as the GraphQL backend returns it, newest first.
pub fn chats_fixture() -> Value {
    return json!({
        "data": {
            "chats": [
                {
                    "id": "8c0c2a44-7f2e-4bd5-9a3c-0d3c1f4e2b10",
                    "title": "Help me write an email to my...",
                    "created_at": "2024-03-02T10:15:00.000000+00:00"
                },
                {
                    "id": "1f9e4b0c-3a77-4c4e-8a2f-6f7e9d3c2a01",
                    "title": "Explain a complex topic",
                    "created_at": "2024-03-01T08:00:00.000000+00:00"
                }
            ]
        }
    });
}

/// A `messages` query response including the `role` column.
pub fn messages_fixture() -> Value {
    return json!({
        "data": {
            "messages": [
                {
                    "id": "m-1",
                    "content": "Explain a complex topic",
                    "role": "user",
                    "created_at": "2024-03-01T08:00:01.000000+00:00"
                },
                {
                    "id": "m-2",
                    "content": "Sure. Which topic would you like explained?",
                    "role": "assistant",
                    "created_at": "2024-03-01T08:00:03.000000+00:00"
                },
                {
                    "id": "m-3",
                    "content": "Quantum entanglement",
                    "role": "user",
                    "created_at": "2024-03-01T08:01:10.000000+00:00"
                }
            ]
        }
    });
}

/// The same conversation as `messages_fixture`, from a backend without the
/// `role` column.
pub fn legacy_messages_fixture() -> Value {
    return json!({
        "data": {
            "messages": [
                {
                    "id": "m-1",
                    "content": "help me write code",
                    "created_at": "2024-03-01T08:00:01.000000+00:00"
                },
                {
                    "id": "m-2",
                    "content": "here is the code",
                    "created_at": "2024-03-01T08:00:03.000000+00:00"
                }
            ]
        }
    });
}

/// Hasura's validation error for a query that selects a column the table
/// does not have.
pub fn missing_role_error_fixture() -> Value {
    return json!({
        "errors": [
            {
                "message": "field 'role' not found in type: 'messages'",
                "extensions": {
                    "path": "$.selectionSet.messages.selectionSet.role",
                    "code": "validation-failed"
                }
            }
        ]
    });
}
