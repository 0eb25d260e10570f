//! Transport trait, the abstraction over the capability registry.
//!
//! A transport speaks the registry's JSON-RPC methods (`tools/list`,
//! `resources/list`, `prompts/list`, `tools/call`, `resources/read`).
//! `call` never fails: every failure mode collapses into an empty map,
//! which callers must read as "no data".

use async_trait::async_trait;

/// A JSON object, the shape of every registry result.
pub type JsonMap = serde_json::Map<String, serde_json::Value>;

/// Registry methods used by the engine.
pub mod methods {
    pub const TOOLS_LIST: &str = "tools/list";
    pub const RESOURCES_LIST: &str = "resources/list";
    pub const PROMPTS_LIST: &str = "prompts/list";
    pub const TOOLS_CALL: &str = "tools/call";
    pub const RESOURCES_READ: &str = "resources/read";
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Invoke `method` with `params`.
    ///
    /// `endpoint` overrides the configured registry URL for this call only.
    /// Returns the envelope's `result` object, or an empty map when the
    /// call could not be completed.
    async fn call(&self, method: &str, params: JsonMap, endpoint: Option<&str>) -> JsonMap;
}
