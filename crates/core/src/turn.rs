//! A single completed exchange: the user's query and the engine's output.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub query: String,
    pub output: String,
    pub recorded_at: DateTime<Utc>,
}

impl ConversationTurn {
    pub fn new(query: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            output: output.into(),
            recorded_at: Utc::now(),
        }
    }
}
