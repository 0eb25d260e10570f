//! The query pipeline — the heart of mcpilot.
//!
//! Each query goes through one **Resolve → Dispatch → Format** pass:
//!
//! 1. **Resolve**: render the decision prompt (catalog, memory, query) and
//!    ask the completion service what to do
//! 2. **Dispatch**: run the resulting actions against the catalog; the
//!    first matching tool call ends the pass and is performed through
//!    `tools/call`
//! 3. **Format**: ask the completion service to reshape the raw result,
//!    falling back to the raw JSON
//! 4. **Remember**: append `(query, output)` to the conversation memory
//!
//! No failure escapes a pass: the caller always gets an output string.

pub mod dispatcher;
pub mod formatter;
pub mod pipeline;
pub mod prompt;
pub mod resolver;

#[cfg(test)]
mod test_helpers;

pub use dispatcher::ActionDispatcher;
pub use formatter::{NO_ACTION_MESSAGE, ResultFormatter};
pub use pipeline::QueryPipeline;
pub use prompt::PromptTemplate;
pub use resolver::{ActionResolver, interpret};
