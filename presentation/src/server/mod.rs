//! HTTP / WebSocket server
//!
//! Routes:
//! - `GET /ws` research runs over WebSocket ([`relay`])
//! - `GET /health`, `/api/system`, `/api/models`, `/api/scenarios`
//! - everything else from the static dashboard directory, when configured

pub mod protocol;
pub mod relay;
pub mod routes;

use axum::Router;
use axum::routing::get;
use localmind_application::{InferenceClient, RunResearchUseCase, TelemetryProbe};
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// Shared, read-only state handed to every handler and connection
pub struct AppState<C: InferenceClient + 'static> {
    pub research: RunResearchUseCase<C>,
    pub client: Arc<C>,
    pub telemetry: Arc<dyn TelemetryProbe>,
}

impl<C: InferenceClient + 'static> Clone for AppState<C> {
    fn clone(&self) -> Self {
        Self {
            research: self.research.clone(),
            client: Arc::clone(&self.client),
            telemetry: Arc::clone(&self.telemetry),
        }
    }
}

impl<C: InferenceClient + 'static> AppState<C> {
    pub fn new(
        research: RunResearchUseCase<C>,
        client: Arc<C>,
        telemetry: Arc<dyn TelemetryProbe>,
    ) -> Self {
        Self {
            research,
            client,
            telemetry,
        }
    }
}

/// Server wiring options
#[derive(Debug, Clone, Default)]
pub struct ServerOptions {
    /// Serve the dashboard from this directory
    pub static_dir: Option<PathBuf>,
}

/// Build the application router
pub fn router<C: InferenceClient + 'static>(state: AppState<C>, options: &ServerOptions) -> Router {
    let mut app = Router::new()
        .route("/ws", get(relay::ws_handler::<C>))
        .route("/health", get(routes::health))
        .route("/api/system", get(routes::system::<C>))
        .route("/api/models", get(routes::models::<C>))
        .route("/api/scenarios", get(routes::scenarios))
        .with_state(state);

    if let Some(dir) = &options.static_dir {
        info!("Serving static files from {}", dir.display());
        app = app.fallback_service(ServeDir::new(dir));
    }

    app.layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Bind `address` and serve until `shutdown` resolves
pub async fn serve(
    address: &str,
    app: Router,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), ServerError> {
    let listener = TcpListener::bind(address)
        .await
        .map_err(|source| ServerError::Bind {
            address: address.to_string(),
            source,
        })?;
    info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}
