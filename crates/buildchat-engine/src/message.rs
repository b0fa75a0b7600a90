//! Conversation messages.
//!
//! A [`Message`] is created once and never mutated afterwards. Ids are
//! generated at creation time and are unique within a session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Who a message came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// Typed locally by the user.
    User,
    /// Produced from a task endpoint response.
    System,
}

impl Sender {
    /// Lowercase name, also used as the id prefix.
    pub fn as_str(self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::System => "system",
        }
    }
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single entry in the conversation log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    id: String,
    sender: Sender,
    text: String,
    created_at: DateTime<Utc>,
}

impl Message {
    /// Create a message with a freshly generated id.
    pub fn new(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            id: format!("{sender}-{}", Uuid::new_v4()),
            sender,
            text: text.into(),
            created_at: Utc::now(),
        }
    }

    /// Create a user message.
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Sender::User, text)
    }

    /// Create a system message.
    pub fn system(text: impl Into<String>) -> Self {
        Self::new(Sender::System, text)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn sender(&self) -> Sender {
        self.sender
    }

    /// Display text, whitespace preserved.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Whether this message was typed by the user.
    pub fn is_user(&self) -> bool {
        self.sender == Sender::User
    }
}
