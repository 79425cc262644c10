//! HTTP hosting for registered tools: a discovery document and one POST
//! endpoint per tool.

use anyhow::{Context, Result};
use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use serde_json::{Value, json};
use std::{net::SocketAddr, sync::Arc};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use weather_tool_core::{ToolDefinition, ToolError, ToolRegistry};

#[derive(Debug, Serialize)]
struct DiscoveryFunction {
    #[serde(flatten)]
    definition: ToolDefinition,
    endpoint: String,
    http_method: &'static str,
}

#[derive(Debug, Serialize)]
struct Discovery {
    functions: Vec<DiscoveryFunction>,
}

pub fn router(registry: Arc<ToolRegistry>) -> Router {
    Router::new()
        .route("/discovery", get(discovery))
        .route("/tools/{name}", post(execute))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(registry)
}

pub async fn serve(port: u16, registry: ToolRegistry) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!("Weather tool service running on port {port}");
    info!("Discovery endpoint available at http://localhost:{port}/discovery");

    axum::serve(listener, router(Arc::new(registry)))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}

async fn health() -> &'static str {
    "OK"
}

async fn discovery(State(registry): State<Arc<ToolRegistry>>) -> Json<Discovery> {
    let functions = registry
        .definitions()
        .map(|definition| DiscoveryFunction {
            endpoint: format!("/tools/{}", definition.name),
            http_method: "POST",
            definition: definition.clone(),
        })
        .collect();

    Json(Discovery { functions })
}

async fn execute(
    State(registry): State<Arc<ToolRegistry>>,
    Path(name): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(body) = body.map_err(|rejection| ToolError::InvalidInput(rejection.body_text()))?;
    let result = registry.call(&name, parameters(body)).await?;
    Ok(Json(result))
}

/// Tool hosts wrap arguments as `{"parameters": {...}}`; a bare object is accepted too.
fn parameters(body: Value) -> Value {
    match body {
        Value::Object(mut map) if map.get("parameters").is_some_and(Value::is_object) => {
            map.remove("parameters").unwrap_or_default()
        }
        other => other,
    }
}

struct ApiError(ToolError);

impl From<ToolError> for ApiError {
    fn from(err: ToolError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, summary) = match &self.0 {
            ToolError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "Invalid parameters"),
            ToolError::UnknownTool(_) => (StatusCode::NOT_FOUND, "Tool not found"),
            ToolError::Execution(_) | ToolError::Duplicate(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Tool execution failed")
            }
        };

        let details = self.0.to_string();
        if status.is_server_error() {
            error!(%details, "tool call failed");
        } else {
            warn!(%details, "tool call rejected");
        }

        let body = json!({
            "success": false,
            "error": summary,
            "details": details,
        });

        (status, Json(body)).into_response()
    }
}
