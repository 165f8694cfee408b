pub mod catalog;
pub mod config;
pub mod dispense;
pub mod error;
pub mod gemini;
pub mod intent;
pub mod language;
pub mod ollama;
pub mod orchestrator;
pub mod prompt;
pub mod responder;
pub mod rig;
pub mod server;

use serde::{Deserialize, Serialize};

/// One prior turn of the conversation, replayed by the caller on every
/// request. There is no server-side session store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub role: Role,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl ConversationMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}
