//! # mcpilot Core
//!
//! Domain types, traits, and error definitions for the mcpilot
//! action-resolution engine. This crate has **no network dependencies**:
//! it defines the model that the transport, provider, and agent crates
//! implement against.
//!
//! ## Layout
//!
//! - [`capability`]: the catalog of tools, resources, and prompts discovered
//!   from a capability registry
//! - [`action`]: the strict tagged form of a model's decision directive
//! - [`dispatch`]: ordered results of executing actions
//! - [`provider`] / [`transport`]: the two network seams
//! - [`retry`]: the retry policy shared by both network clients

pub mod action;
pub mod capability;
pub mod dispatch;
pub mod error;
pub mod message;
pub mod provider;
pub mod retry;
pub mod transport;
pub mod turn;

// Re-export key types at crate root for ergonomics
pub use action::{ActionRecord, Decision, ListKind};
pub use capability::{CapabilityCatalog, PromptInfo, Resource, Tool};
pub use dispatch::{DispatchEntry, DispatchOutcome, DispatchResult, ToolInvocation};
pub use error::{ProviderError, TransportError};
pub use message::{Message, Role, SessionId};
pub use provider::{Provider, ProviderRequest, ProviderResponse};
pub use retry::{Backoff, RetryPolicy};
pub use transport::{JsonMap, Transport};
pub use turn::ConversationTurn;
