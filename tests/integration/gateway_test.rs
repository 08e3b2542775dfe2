use super::common;

use common::fake_gateway::{sample_tools, FakeGateway, BROKEN_TOOL};
use serde_json::json;
use std::sync::Arc;
use toolform::adapters::strata_client::StrataClient;
use toolform::commands::{invoke_tool, FormEdits};
use toolform::cli::Assignment;
use toolform::config::{FormSettings, GatewaySettings};
use toolform::domain::ToolCatalogPort;
use toolform_engine::{FormSession, KeyPath, SchemaNode};

fn client(gateway: &FakeGateway) -> Arc<StrataClient> {
    let settings = GatewaySettings {
        base_url: gateway.base_url.clone(),
        timeout_seconds: 5,
        api_key: Some("secret".to_string()),
        api_key_env: None,
    };
    Arc::new(StrataClient::new(&settings).unwrap())
}

fn path(s: &str) -> KeyPath {
    KeyPath::parse(s).unwrap()
}

#[tokio::test]
async fn test_health() {
    let gateway = FakeGateway::start(sample_tools()).await;

    let health = client(&gateway).health().await.unwrap();

    assert_eq!(health.status, "ok");
    assert_eq!(health.tools, 3);
}

#[tokio::test]
async fn test_list_tools() {
    let gateway = FakeGateway::start(sample_tools()).await;

    let tools = client(&gateway).list_tools().await.unwrap();

    let names: Vec<&str> = tools.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["calc", "search", BROKEN_TOOL]);
    assert_eq!(tools[0].schema["required"], json!(["n"]));
}

#[tokio::test]
async fn test_form_submission_round_trip() {
    let gateway = FakeGateway::start(sample_tools()).await;
    let client = client(&gateway);
    let tool = client.get_tool("calc").await.unwrap();

    let mut form = FormSession::new("calc", Arc::new(SchemaNode::from_value(&tool.schema)), client.clone());
    form.set(&path("n"), json!(5)).unwrap();
    let result = form.submit().await.unwrap();

    assert_eq!(result, json!({ "echo": { "n": 5, "ok": false } }));

    let invocations = gateway.invocations();
    assert_eq!(invocations.len(), 1);
    assert_eq!(invocations[0].body, json!({ "tool": "calc", "input": { "n": 5, "ok": false } }));
    assert_eq!(invocations[0].authorization.as_deref(), Some("Bearer secret"));
    assert_eq!(invocations[0].request_id.as_deref().map(str::len), Some(36));
}

#[tokio::test]
async fn test_each_submission_gets_fresh_request_id() {
    let gateway = FakeGateway::start(sample_tools()).await;
    let client = client(&gateway);
    let tool = client.get_tool("calc").await.unwrap();
    let mut form = FormSession::new("calc", Arc::new(SchemaNode::from_value(&tool.schema)), client.clone());

    form.submit().await.unwrap();
    form.submit().await.unwrap();

    let ids: Vec<String> = gateway
        .invocations()
        .into_iter()
        .filter_map(|i| i.request_id)
        .collect();
    assert_eq!(ids.len(), 2);
    assert_ne!(ids[0], ids[1]);
}

#[tokio::test]
async fn test_nested_edits_reach_gateway() {
    let gateway = FakeGateway::start(sample_tools()).await;
    let client = client(&gateway);
    let edits = FormEdits {
        variants: vec![],
        set: vec![],
        input: vec![
            Assignment { path: path("query"), value: "rust".to_string() },
            Assignment { path: path("filters.lang"), value: "fr".to_string() },
            Assignment { path: path("filters.tags"), value: "a, b ,,c".to_string() },
        ],
    };

    invoke_tool(client.as_ref(), client.clone(), &FormSettings::default(), "search", &edits)
        .await
        .unwrap();

    assert_eq!(
        gateway.invocations()[0].body["input"],
        json!({ "query": "rust", "filters": { "lang": "fr", "tags": ["a", "b", "c"] } })
    );
}

#[tokio::test]
async fn test_missing_required_never_reaches_gateway() {
    let gateway = FakeGateway::start(sample_tools()).await;
    let client = client(&gateway);

    let err = invoke_tool(client.as_ref(), client.clone(), &FormSettings::default(), "search", &FormEdits::default())
        .await
        .unwrap_err();

    assert!(format!("{:#}", err).contains("Missing required field: query"));
    assert!(gateway.invocations().is_empty());
}

#[tokio::test]
async fn test_tool_failure_is_surfaced_and_values_kept() {
    let gateway = FakeGateway::start(sample_tools()).await;
    let client = client(&gateway);
    let tool = client.get_tool(BROKEN_TOOL).await.unwrap();
    let mut form = FormSession::new(BROKEN_TOOL, Arc::new(SchemaNode::from_value(&tool.schema)), client.clone());
    form.edit(&path("note"), "keep me").unwrap();

    let err = form.submit().await.unwrap_err();

    assert_eq!(err.to_string(), "Invocation failed: Upstream error 500: boom");
    let invocations = gateway.invocations();
    assert_eq!(invocations.len(), 1);
    assert_eq!(invocations[0].body["input"], json!({ "note": "keep me" }));
    assert_eq!(form.get(&path("note")), Some(&json!("keep me")));
}

#[tokio::test]
async fn test_unknown_tool_maps_http_error() {
    let gateway = FakeGateway::start(sample_tools()).await;
    let client = client(&gateway);
    let schema = Arc::new(SchemaNode::from_value(&json!({ "type": "object" })));
    let mut form = FormSession::new("ghost", schema, client.clone());

    let err = form.submit().await.unwrap_err();

    assert!(err.to_string().contains("404"));
    assert!(err.to_string().contains("Tool not found: ghost"));
}

#[tokio::test]
async fn test_unreachable_gateway() {
    let settings = GatewaySettings {
        base_url: "http://127.0.0.1:1".to_string(),
        timeout_seconds: 2,
        api_key: None,
        api_key_env: None,
    };
    let client = StrataClient::new(&settings).unwrap();

    let err = client.list_tools().await.unwrap_err();

    assert!(err.to_string().contains("Failed to reach gateway"));
}
