//! Informational HTTP endpoints

use super::AppState;
use axum::Json;
use axum::extract::State;
use chrono::Local;
use localmind_application::{HostTelemetry, InferenceClient};
use localmind_domain::DemoScenario;
use serde::Serialize;
use serde_json::{Value, json};
use tracing::debug;

/// `GET /health`
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

#[derive(Debug, Serialize)]
pub struct SystemInfo {
    #[serde(flatten)]
    pub telemetry: HostTelemetry,
    pub brave_api: &'static str,
    pub timestamp: String,
}

/// `GET /api/system`
pub async fn system<C: InferenceClient + 'static>(
    State(state): State<AppState<C>>,
) -> Json<SystemInfo> {
    let telemetry = state.telemetry.snapshot().await;
    Json(SystemInfo {
        telemetry,
        brave_api: if state.research.has_web_search() {
            "Active"
        } else {
            "Not configured"
        },
        timestamp: Local::now().to_rfc3339(),
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelEntry {
    pub id: String,
    pub size: Option<&'static str>,
    pub context: Option<&'static str>,
    /// Names of the agents bound to this model
    pub role: String,
    pub available: bool,
}

/// `GET /api/models`
///
/// Availability comes from the runtime's installed tags; an unreachable
/// runtime reports every model unavailable.
pub async fn models<C: InferenceClient + 'static>(
    State(state): State<AppState<C>>,
) -> Json<Vec<ModelEntry>> {
    let installed = state.client.available_models().await.unwrap_or_else(|e| {
        debug!("Model availability unknown: {}", e);
        Vec::new()
    });

    let entries = state
        .research
        .registry()
        .models()
        .into_iter()
        .map(|(model, agents)| {
            let info = model.info();
            ModelEntry {
                id: model.as_str().to_string(),
                size: info.map(|i| i.size),
                context: info.map(|i| i.context),
                role: agents.join(" & "),
                available: installed.iter().any(|tag| model.matches_installed(tag)),
            }
        })
        .collect();
    Json(entries)
}

/// `GET /api/scenarios`
pub async fn scenarios() -> Json<&'static [DemoScenario]> {
    Json(DemoScenario::catalog())
}
