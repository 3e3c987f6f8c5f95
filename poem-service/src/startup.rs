//! Application startup and lifecycle management.

use crate::config::PoemConfig;
use crate::handlers::{
    health::{health_check, readiness_check},
    metrics::metrics,
    poems::{generate_poem, poem_options},
};
use crate::services::providers::gemini::{GeminiConfig, GeminiTextProvider};
use crate::services::providers::TextProvider;
use crate::services::PoemGenerator;
use axum::{
    http::{HeaderName, Request},
    middleware::from_fn,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{
    security_headers::security_headers_middleware,
    tracing::{request_id_middleware, REQUEST_ID_HEADER},
};
use std::any::Any;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared application state. Built once at startup and cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<PoemGenerator>,
}

impl AppState {
    pub fn new(generator: PoemGenerator) -> Self {
        Self {
            generator: Arc::new(generator),
        }
    }

    /// Wire up the Gemini provider if a key is configured. A missing key is
    /// not an error: the service starts and reports "No AI service available"
    /// per request.
    pub fn from_config(config: &PoemConfig) -> Result<Self, AppError> {
        let settings = &config.gemini;

        let generator = match settings.api_key.as_ref().filter(|_| settings.has_api_key()) {
            Some(api_key) => {
                let provider = GeminiTextProvider::new(GeminiConfig {
                    api_key: api_key.clone(),
                    model: settings.model.clone(),
                    api_base: settings.api_base.clone(),
                    timeout: settings.timeout(),
                })
                .map_err(|e| AppError::ConfigError(anyhow::anyhow!(e)))?;

                tracing::info!(model = %settings.model, "Initialized Gemini text provider");
                PoemGenerator::new(Arc::new(provider) as Arc<dyn TextProvider>)
            }
            None => {
                tracing::warn!("GEMINI_API_KEY not set; poem generation is unavailable");
                PoemGenerator::unconfigured()
            }
        };

        Ok(Self::new(generator))
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/generate-poem", post(generate_poem))
        .route("/poem-options", get(poem_options))
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .route("/metrics", get(metrics))
        .with_state(state)
        .layer(CatchPanicLayer::custom(handle_panic))
        // Add tracing layer
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .layer(from_fn(security_headers_middleware))
        .layer(open_cors())
}

/// A panic anywhere below the router becomes a generic 500 instead of a
/// dropped connection.
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };

    AppError::InternalError(anyhow::anyhow!("handler panicked: {}", message)).into_response()
}

/// Any origin, method and header, with credentials. Origins, methods and
/// headers are mirrored back because a literal `*` is not allowed alongside
/// credentials.
fn open_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
        .expose_headers([HeaderName::from_static(REQUEST_ID_HEADER)])
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application with the given configuration.
    pub async fn build(config: PoemConfig) -> Result<Self, AppError> {
        let state = AppState::from_config(&config)?;
        Self::build_with_state(config, state).await
    }

    /// Build with a pre-made state, e.g. one holding a mock provider.
    pub async fn build_with_state(config: PoemConfig, state: AppState) -> Result<Self, AppError> {
        // port 0 = random port for testing
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("poem-service listening on port {}", port);

        Ok(Self {
            port,
            listener,
            router: build_router(state),
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until a shutdown signal arrives.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| {
                tracing::error!("HTTP server error: {}", e);
                std::io::Error::other(format!("HTTP server error: {}", e))
            })
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
