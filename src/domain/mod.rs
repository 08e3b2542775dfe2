use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A tool as advertised by the gateway catalog
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Tool {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// JSON Schema describing the tool's parameters
    #[serde(default = "empty_schema", alias = "input_schema", alias = "inputSchema")]
    pub schema: Value,
}

fn empty_schema() -> Value {
    Value::Object(Default::default())
}

/// Gateway liveness report
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct GatewayHealth {
    pub status: String,
    /// Number of tools the gateway has indexed
    #[serde(default)]
    pub tools: usize,
}

#[async_trait]
pub trait ToolCatalogPort: Send + Sync {
    async fn list_tools(&self) -> anyhow::Result<Vec<Tool>>;

    async fn get_tool(&self, name: &str) -> anyhow::Result<Tool> {
        self.list_tools()
            .await?
            .into_iter()
            .find(|tool| tool.name == name)
            .ok_or_else(|| anyhow::anyhow!("Tool not found: {}", name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tool_schema_aliases() {
        let tool: Tool = serde_json::from_value(json!({
            "name": "search",
            "inputSchema": { "type": "object" }
        }))
        .unwrap();
        assert_eq!(tool.description, "");
        assert_eq!(tool.schema, json!({ "type": "object" }));

        let bare: Tool = serde_json::from_value(json!({ "name": "ping" })).unwrap();
        assert_eq!(bare.schema, json!({}));
    }
}
