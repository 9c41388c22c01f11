use chrono::Utc;
use serde::{ Serialize, Deserialize };
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Bot,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub text: String,
    pub timestamp: i64,
}

impl Message {
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            text: text.into(),
            timestamp: Utc::now().timestamp_millis(),
        }
    }
}

/// Append-only, in-memory conversation. One per widget session, never persisted.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    pub messages: Vec<Message>,
}

impl Conversation {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            messages: Vec::new(),
        }
    }

    pub fn push_user(&mut self, text: impl Into<String>) {
        self.messages.push(Message::new(Role::User, text));
    }

    pub fn push_bot(&mut self, text: impl Into<String>) {
        self.messages.push(Message::new(Role::Bot, text));
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

/// Widget -> gateway request body.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

/// Gateway -> backend request body, derived 1:1 from ChatRequest.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BackendQuery {
    pub query: String,
}

/// Gateway success body. Always delivered with HTTP 200.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatReply {
    pub reply: String,
}

/// Gateway validation failure body, delivered with HTTP 400.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatError {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversation_appends_in_arrival_order() {
        let mut convo = Conversation::new();
        convo.push_user("bonjour");
        convo.push_bot("salut");
        assert_eq!(convo.len(), 2);
        assert_eq!(convo.messages[0].role, Role::User);
        assert_eq!(convo.messages[1].role, Role::Bot);
        assert_eq!(convo.messages[1].text, "salut");
    }

    #[test]
    fn message_ids_are_unique() {
        let a = Message::new(Role::User, "a");
        let b = Message::new(Role::User, "a");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn role_serializes_lowercase() {
        let msg = Message::new(Role::Bot, "hi");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["role"], "bot");
    }
}
