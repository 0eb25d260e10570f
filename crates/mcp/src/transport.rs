//! JSON-RPC 2.0 over HTTP POST.
//!
//! Every call makes up to three attempts one second apart, each bounded by
//! its own timeout. Whatever goes wrong (connection error, timeout,
//! non-200 status, unparseable body) is logged and retried; once the
//! attempts are spent the call returns an empty map.

use async_trait::async_trait;
use mcpilot_config::AppConfig;
use mcpilot_core::error::TransportError;
use mcpilot_core::retry::RetryPolicy;
use mcpilot_core::transport::{JsonMap, Transport};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, warn};

/// JSON-RPC 2.0 request message.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub method: String,
    pub params: JsonMap,
    pub id: u64,
}

impl JsonRpcRequest {
    pub fn new(method: &str, params: JsonMap) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params,
            id: 1,
        }
    }
}

/// JSON-RPC 2.0 response message (success or error).
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcResponse {
    #[serde(default)]
    pub jsonrpc: Option<String>,
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    #[serde(default)]
    pub result: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<JsonRpcError>,
}

/// JSON-RPC 2.0 error object.
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcError {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
}

/// A capability registry reached over HTTP.
pub struct HttpTransport {
    endpoint: String,
    client: reqwest::Client,
    retry: RetryPolicy,
}

impl HttpTransport {
    /// Create a transport for `endpoint` with a per-attempt `timeout`.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            endpoint: normalize_endpoint(&endpoint.into()),
            client,
            retry: RetryPolicy::fixed(3, Duration::from_secs(1)),
        }
    }

    /// Create the transport described by `config`.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(&config.default_mcp_server, config.transport.timeout())
            .with_retry_policy(config.transport.retry_policy())
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// One POST of `request` to `url`.
    async fn attempt(&self, url: &str, request: &JsonRpcRequest) -> Result<JsonMap, TransportError> {
        let method = &request.method;
        let response = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TransportError::Timeout {
                        method: method.clone(),
                    }
                } else {
                    TransportError::Network {
                        method: method.clone(),
                        reason: e.to_string(),
                    }
                }
            })?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| TransportError::Network {
            method: method.clone(),
            reason: e.to_string(),
        })?;

        if status != 200 {
            return Err(TransportError::Status {
                method: method.clone(),
                status,
                body,
            });
        }

        let envelope: JsonRpcResponse =
            serde_json::from_str(&body).map_err(|e| TransportError::MalformedBody {
                method: method.clone(),
                reason: e.to_string(),
            })?;

        if let Some(err) = &envelope.error {
            warn!(method = %method, code = err.code, message = %err.message, "Registry returned a JSON-RPC error");
        }

        match envelope.result {
            Some(serde_json::Value::Object(result)) => Ok(result),
            Some(other) => {
                warn!(method = %method, result = %other, "Registry result is not an object, ignoring it");
                Ok(JsonMap::new())
            }
            None => Ok(JsonMap::new()),
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn call(&self, method: &str, params: JsonMap, endpoint: Option<&str>) -> JsonMap {
        let url = match endpoint {
            Some(endpoint) => normalize_endpoint(endpoint),
            None => self.endpoint.clone(),
        };
        let request = JsonRpcRequest::new(method, params);
        debug!(method, url = %url, params = %serde_json::Value::Object(request.params.clone()), "Sending registry request");

        match self.retry.run(method, |_| self.attempt(&url, &request)).await {
            Ok(result) => {
                debug!(method, result = %serde_json::Value::Object(result.clone()), "Registry request succeeded");
                result
            }
            Err(_) => {
                error!(method, "Registry request failed, returning empty result");
                JsonMap::new()
            }
        }
    }
}

/// Ensure the endpoint ends with a path separator.
pub fn normalize_endpoint(endpoint: &str) -> String {
    if endpoint.ends_with('/') {
        endpoint.to_string()
    } else {
        format!("{endpoint}/")
    }
}
