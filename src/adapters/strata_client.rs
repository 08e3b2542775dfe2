//! Strata Gateway Client
//!
//! HTTP client for the tool gateway. It serves as the catalog the forms are
//! built from and as the invocation port submissions are handed to.

use crate::config::GatewaySettings;
use crate::domain::{GatewayHealth, Tool, ToolCatalogPort};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use toolform_engine::{InvocationRequest, ToolInvoker, ValueTree};
use tracing::{debug, info, warn};

/// Header carrying the per-invocation correlation id
pub const REQUEST_ID_HEADER: &str = "X-Request-ID";

#[derive(Debug, Deserialize)]
struct ListToolsResponse {
    tools: Vec<Tool>,
}

#[derive(Debug, Serialize)]
struct InvokeBody<'a> {
    tool: &'a str,
    input: &'a ValueTree,
}

#[derive(Debug, Deserialize)]
struct InvokeResponse {
    success: bool,
    result: Option<Value>,
    error: Option<String>,
}

pub struct StrataClient {
    base_url: String,
    client: Client,
    api_key: Option<String>,
}

impl StrataClient {
    pub fn new(settings: &GatewaySettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()
            .context("Failed to build gateway HTTP client")?;

        Ok(Self {
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            client,
            api_key: settings.resolve_api_key(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(api_key) => builder.header("Authorization", format!("Bearer {}", api_key)),
            None => builder,
        }
    }

    /// Pass 2xx responses through, turn anything else into an error
    async fn check_status(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let text = response.text().await.unwrap_or_default();
        Err(anyhow::anyhow!(
            "Gateway returned error {}: {}",
            status,
            error_detail(&text)
        ))
    }

    pub async fn health(&self) -> Result<GatewayHealth> {
        let response = self
            .authorize(self.client.get(self.endpoint("health")))
            .send()
            .await
            .with_context(|| format!("Failed to reach gateway at {}", self.base_url))?;
        let health = Self::check_status(response).await?.json().await?;
        Ok(health)
    }
}

/// FastAPI-style `{"detail": ...}` bodies are reduced to the detail text
fn error_detail(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| match value.get("detail") {
            Some(Value::String(detail)) => Some(detail.clone()),
            Some(other) => Some(other.to_string()),
            None => None,
        })
        .unwrap_or_else(|| body.to_string())
}

#[async_trait]
impl ToolCatalogPort for StrataClient {
    async fn list_tools(&self) -> Result<Vec<Tool>> {
        let response = self
            .authorize(self.client.get(self.endpoint("tools")))
            .send()
            .await
            .with_context(|| format!("Failed to reach gateway at {}", self.base_url))?;
        let list: ListToolsResponse = Self::check_status(response).await?.json().await?;

        info!("Gateway {} offers {} tools", self.base_url, list.tools.len());
        for tool in &list.tools {
            debug!("  - {}: {}", tool.name, tool.description);
        }
        Ok(list.tools)
    }
}

#[async_trait]
impl ToolInvoker for StrataClient {
    async fn invoke(&self, request: &InvocationRequest) -> Result<Value> {
        let body = InvokeBody {
            tool: &request.tool,
            input: &request.arguments,
        };
        debug!(
            "POST {} tool={} [{}]",
            self.endpoint("invoke"),
            request.tool,
            request.correlation_id
        );

        let response = self
            .authorize(self.client.post(self.endpoint("invoke")).json(&body))
            .header(REQUEST_ID_HEADER, &request.correlation_id)
            .send()
            .await
            .with_context(|| format!("Failed to reach gateway at {}", self.base_url))?;
        let reply: InvokeResponse = Self::check_status(response).await?.json().await?;

        if reply.success {
            return Ok(reply.result.unwrap_or(Value::Null));
        }

        let message = reply
            .error
            .unwrap_or_else(|| format!("Tool '{}' reported failure", request.tool));
        warn!("Tool '{}' failed [{}]: {}", request.tool, request.correlation_id, message);
        Err(anyhow::anyhow!(message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(base_url: &str) -> GatewaySettings {
        GatewaySettings {
            base_url: base_url.to_string(),
            timeout_seconds: 5,
            api_key: Some("secret".to_string()),
            api_key_env: None,
        }
    }

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let client = StrataClient::new(&settings("http://gateway:8080/")).unwrap();
        assert_eq!(client.base_url(), "http://gateway:8080");
        assert_eq!(client.endpoint("tools"), "http://gateway:8080/tools");
    }

    #[test]
    fn test_invoke_response_ignores_echoed_tool() {
        let reply: InvokeResponse = serde_json::from_str(
            r#"{"tool":"calc","success":false,"result":null,"error":"boom"}"#,
        )
        .unwrap();
        assert!(!reply.success);
        assert!(reply.result.is_none());
        assert_eq!(reply.error.as_deref(), Some("boom"));
    }

    #[test]
    fn test_error_detail() {
        assert_eq!(error_detail(r#"{"detail":"Tool not found: x"}"#), "Tool not found: x");
        assert_eq!(error_detail(r#"{"detail":[{"loc":["body"]}]}"#), r#"[{"loc":["body"]}]"#);
        assert_eq!(error_detail("Bad Gateway"), "Bad Gateway");
    }
}
