//! Windowed conversation memory.
//!
//! Holds at most `window` turns; appending past the limit evicts the oldest
//! turn first. The memory has a single owner (the query pipeline) and is
//! mutated only after a query completes.

use mcpilot_core::turn::ConversationTurn;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::debug;

/// Default number of turns kept.
pub const DEFAULT_WINDOW: usize = 5;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationMemory {
    window: usize,
    turns: VecDeque<ConversationTurn>,
}

impl ConversationMemory {
    /// Create an empty memory keeping the last `window` turns (at least one).
    pub fn new(window: usize) -> Self {
        let window = window.max(1);
        Self {
            window,
            turns: VecDeque::with_capacity(window),
        }
    }

    /// Record a completed turn, evicting the oldest when full.
    pub fn push(&mut self, query: impl Into<String>, output: impl Into<String>) {
        if self.turns.len() == self.window {
            if let Some(evicted) = self.turns.pop_front() {
                debug!(query = %evicted.query, "Evicting oldest conversation turn");
            }
        }
        self.turns.push_back(ConversationTurn::new(query, output));
    }

    /// Turns from oldest to newest.
    pub fn turns(&self) -> impl Iterator<Item = &ConversationTurn> {
        self.turns.iter()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// Render as `Human: <query>` / `AI: <output>` lines, oldest first.
    /// An empty memory renders as the empty string.
    pub fn render(&self) -> String {
        self.turns
            .iter()
            .map(|turn| format!("Human: {}\nAI: {}", turn.query, turn.output))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for ConversationMemory {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_turns_in_order() {
        let mut memory = ConversationMemory::new(5);
        memory.push("list tools", "[\"a: b\"]");
        memory.push("call a", "{\"ok\":true}");
        assert_eq!(
            memory.render(),
            "Human: list tools\nAI: [\"a: b\"]\nHuman: call a\nAI: {\"ok\":true}"
        );
    }

    #[test]
    fn empty_memory_renders_empty() {
        assert_eq!(ConversationMemory::default().render(), "");
    }

    #[test]
    fn evicts_oldest_past_window() {
        let k = 3;
        let mut memory = ConversationMemory::new(k);
        for i in 0..=k {
            memory.push(format!("q{i}"), format!("o{i}"));
        }
        assert_eq!(memory.len(), k);
        let queries: Vec<_> = memory.turns().map(|t| t.query.as_str()).collect();
        assert_eq!(queries, vec!["q1", "q2", "q3"]);
        assert!(!memory.render().contains("q0"));
    }

    #[test]
    fn zero_window_keeps_one_turn() {
        let mut memory = ConversationMemory::new(0);
        memory.push("a", "1");
        memory.push("b", "2");
        assert_eq!(memory.window(), 1);
        assert_eq!(memory.turns().next().unwrap().query, "b");
    }

    #[test]
    fn serializes_for_inspection() {
        let mut memory = ConversationMemory::new(2);
        memory.push("a", "1");
        let json = serde_json::to_value(&memory).unwrap();
        assert_eq!(json["window"], 2);
        assert_eq!(json["turns"][0]["query"], "a");
    }
}
