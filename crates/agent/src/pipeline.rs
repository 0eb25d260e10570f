//! The query pipeline: resolve, dispatch, format, remember.
//!
//! One pipeline is one session. The catalog is discovered once when the
//! pipeline is built and never refreshed; the memory is the only state
//! that changes between queries, and only after a query has its output.

use crate::dispatcher::ActionDispatcher;
use crate::formatter::ResultFormatter;
use crate::prompt::PromptTemplate;
use crate::resolver::ActionResolver;
use mcpilot_config::{AppConfig, ConfigError};
use mcpilot_core::action::Decision;
use mcpilot_core::capability::CapabilityCatalog;
use mcpilot_core::dispatch::{DispatchOutcome, DispatchResult};
use mcpilot_core::message::SessionId;
use mcpilot_core::provider::Provider;
use mcpilot_core::transport::Transport;
use mcpilot_mcp::{HttpTransport, discover};
use mcpilot_memory::ConversationMemory;
use mcpilot_providers::{CompletionClient, OpenAiCompatProvider};
use serde_json::Value;
use std::sync::Arc;
use tracing::{Instrument, debug, info, info_span};

pub struct QueryPipeline {
    /// Identifies this session in logs
    session: SessionId,

    /// Capabilities discovered at startup
    catalog: CapabilityCatalog,

    /// Recent turns, rendered into every decision prompt
    memory: ConversationMemory,

    resolver: ActionResolver,
    dispatcher: ActionDispatcher,
    formatter: ResultFormatter,

    /// Number of queries answered so far
    turns: u64,
}

impl QueryPipeline {
    /// Build the pipeline described by `config` and discover the catalog.
    ///
    /// Fails only when no API key is configured. An unreachable registry
    /// yields an empty catalog.
    pub async fn connect(config: &AppConfig) -> Result<Self, ConfigError> {
        let provider: Arc<dyn Provider> = Arc::new(OpenAiCompatProvider::from_config(config)?);
        let transport: Arc<dyn Transport> = Arc::new(HttpTransport::from_config(config));
        info!(
            registry = %config.default_mcp_server,
            model = %config.default_model,
            "Connecting to capability registry"
        );
        Ok(Self::assemble(provider, transport, config).await)
    }

    /// Build a pipeline over the given provider and transport, discovering
    /// the catalog through `transport`.
    pub async fn assemble(
        provider: Arc<dyn Provider>,
        transport: Arc<dyn Transport>,
        config: &AppConfig,
    ) -> Self {
        let catalog = discover(transport.as_ref(), None).await;
        let completion = Arc::new(CompletionClient::from_config(provider, config));

        Self::new(
            catalog,
            ConversationMemory::new(config.memory_window),
            ActionResolver::new(
                Arc::clone(&completion),
                PromptTemplate::new(config.instruction_template()),
            ),
            ActionDispatcher::new(transport),
            ResultFormatter::new(completion, PromptTemplate::new(config.formatter_template())),
        )
    }

    pub fn new(
        catalog: CapabilityCatalog,
        memory: ConversationMemory,
        resolver: ActionResolver,
        dispatcher: ActionDispatcher,
        formatter: ResultFormatter,
    ) -> Self {
        Self {
            session: SessionId::new(),
            catalog,
            memory,
            resolver,
            dispatcher,
            formatter,
            turns: 0,
        }
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session
    }

    pub fn catalog(&self) -> &CapabilityCatalog {
        &self.catalog
    }

    pub fn memory(&self) -> &ConversationMemory {
        &self.memory
    }

    /// Answer `query` and remember the turn.
    pub async fn run(&mut self, query: &str) -> String {
        self.turns += 1;
        let span = info_span!("query", session = %self.session, turn = self.turns);
        let output = self.answer(query).instrument(span).await;
        self.memory.push(query, output.clone());
        output
    }

    /// Answer `query` without touching memory.
    pub async fn answer(&self, query: &str) -> String {
        info!(query, "Processing query");

        let records = match self
            .resolver
            .decide(query, &self.catalog, &self.memory)
            .await
        {
            Decision::Finish(output) => {
                info!(output = %output, "Query finished without dispatch");
                return output;
            }
            Decision::Actions(records) => records,
        };

        let result = match self.dispatcher.dispatch(&records, &self.catalog).await {
            DispatchOutcome::Completed(result) => result,
            DispatchOutcome::Invoke(invocation) => {
                let reply = self.dispatcher.invoke(&invocation).await;
                let mut result = DispatchResult::new();
                result.push_payload(Value::Object(reply));
                result
            }
        };
        debug!(entries = result.len(), "Dispatch complete");

        let output = self.formatter.format(&result).await;
        info!(output_len = output.len(), "Query answered");
        output
    }
}
