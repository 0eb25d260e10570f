//! Conversation memory for mcpilot.
//!
//! Only the last few turns of a session are kept; they are rendered as
//! plain text into every decision prompt.

pub mod window;

pub use window::ConversationMemory;
