//! Completion-service clients for mcpilot.
//!
//! [`OpenAiCompatProvider`] implements `mcpilot_core::Provider` for any
//! OpenAI-compatible `/chat/completions` endpoint, one request per call.
//! [`CompletionClient`] wraps a provider with the retry policy and turns
//! the reply into a JSON directive.

pub mod completion;
pub mod openai_compat;

pub use completion::CompletionClient;
pub use openai_compat::OpenAiCompatProvider;
