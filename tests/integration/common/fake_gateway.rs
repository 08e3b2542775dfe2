use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

/// Tool whose invocations always fail upstream
pub const BROKEN_TOOL: &str = "broken";

/// One `POST /invoke` as the gateway saw it
#[derive(Debug, Clone)]
pub struct RecordedInvocation {
    pub body: Value,
    pub request_id: Option<String>,
    pub authorization: Option<String>,
}

struct GatewayState {
    tools: Vec<Value>,
    invocations: Mutex<Vec<RecordedInvocation>>,
}

/// In-process stand-in for the Strata gateway
pub struct FakeGateway {
    pub addr: SocketAddr,
    pub base_url: String,
    state: Arc<GatewayState>,
}

impl FakeGateway {
    pub async fn start(tools: Vec<Value>) -> Self {
        let state = Arc::new(GatewayState {
            tools,
            invocations: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/health", get(health))
            .route("/tools", get(list_tools))
            .route("/invoke", post(invoke))
            .with_state(state.clone());

        // Start server on random port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        FakeGateway { addr, base_url, state }
    }

    pub fn invocations(&self) -> Vec<RecordedInvocation> {
        self.state.invocations.lock().unwrap().clone()
    }
}

/// The tools most tests run against
pub fn sample_tools() -> Vec<Value> {
    vec![
        json!({
            "name": "calc",
            "description": "Toy calculator",
            "schema": {
                "type": "object",
                "properties": {
                    "n": { "type": "integer" },
                    "ok": { "type": "boolean" }
                },
                "required": ["n"]
            }
        }),
        json!({
            "name": "search",
            "description": "Document search",
            "schema": {
                "type": "object",
                "properties": {
                    "query": { "type": "string" },
                    "filters": {
                        "type": "object",
                        "properties": {
                            "lang": { "type": "string", "enum": ["en", "fr"] },
                            "tags": { "type": "array", "items": { "type": "string" } }
                        }
                    }
                },
                "required": ["query"]
            }
        }),
        json!({
            "name": BROKEN_TOOL,
            "description": "Always fails",
            "schema": {
                "type": "object",
                "properties": { "note": { "type": "string" } }
            }
        }),
    ]
}

async fn health(State(state): State<Arc<GatewayState>>) -> Json<Value> {
    Json(json!({ "status": "ok", "tools": state.tools.len() }))
}

async fn list_tools(State(state): State<Arc<GatewayState>>) -> Json<Value> {
    Json(json!({ "tools": state.tools }))
}

async fn invoke(
    State(state): State<Arc<GatewayState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    state.invocations.lock().unwrap().push(RecordedInvocation {
        body: body.clone(),
        request_id: header("x-request-id"),
        authorization: header("authorization"),
    });

    let tool = body["tool"].as_str().unwrap_or_default().to_string();
    if !state.tools.iter().any(|t| t["name"] == tool.as_str()) {
        return Err((
            StatusCode::NOT_FOUND,
            Json(json!({ "detail": format!("Tool not found: {}", tool) })),
        ));
    }

    if tool == BROKEN_TOOL {
        return Ok(Json(json!({
            "tool": tool,
            "success": false,
            "error": "Upstream error 500: boom"
        })));
    }

    Ok(Json(json!({
        "tool": tool,
        "success": true,
        "result": { "echo": body["input"] }
    })))
}
