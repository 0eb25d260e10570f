//! Capability registry client for mcpilot.
//!
//! - [`HttpTransport`]: JSON-RPC 2.0 requests over HTTP POST with a fixed
//!   retry delay; failures collapse into an empty result
//! - [`discover`]: builds the session's capability catalog from
//!   `tools/list`, `resources/list` and `prompts/list`

pub mod discovery;
pub mod transport;

pub use discovery::discover;
pub use transport::{HttpTransport, JsonRpcRequest, JsonRpcResponse};
