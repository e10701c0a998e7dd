mod config;
mod dto;
mod error;
mod extract;
mod handlers;
mod services;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::body::Body;
use axum::http::{Request, Response};
use axum::routing::{get, post};
use axum::Router;
use diabetes_models::{LoadError, ModelStore};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::config::{ServerConfig, StartupPolicy};
use crate::error::AppError;

pub struct ServerState {
    /// `Err` only when started with [`StartupPolicy::Degraded`].
    pub models: Result<ModelStore, LoadError>,
}

impl ServerState {
    pub fn new(models: Result<ModelStore, LoadError>) -> Self {
        Self { models }
    }

    pub fn store(&self) -> Result<&ModelStore, AppError> {
        self.models.as_ref().map_err(|e| {
            error!("Prediction requested but models are not loaded: {}", e);
            AppError::Unavailable(format!("models not loaded: {}", e))
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .compact()
        .init();

    let config = ServerConfig::from_env()?;
    let state = Arc::new(init_server_state(&config)?);
    let app = router(state);

    let addr = config.bind_addr();
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_server_state(config: &ServerConfig) -> Result<ServerState> {
    let models = ModelStore::load(&config.lr_model_path, &config.dt_model_path);

    match (&models, config.startup_policy) {
        (Ok(_), _) => info!("Models loaded successfully"),
        (Err(e), StartupPolicy::FailFast) => {
            error!("Critical error loading models: {}", e);
            return Err(anyhow::anyhow!("failed to load models: {}", e));
        }
        (Err(e), StartupPolicy::Degraded) => {
            error!("Critical error loading models: {}", e);
            warn!("Starting in degraded mode: /predict will answer 503");
        }
    }

    Ok(ServerState::new(models))
}

pub fn router(state: Arc<ServerState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request<Body>| {
            tracing::info_span!(
                "request",
                id = %Uuid::new_v4(),
                method = %req.method(),
                uri = %req.uri(),
                version = ?req.version(),
            )
        })
        .on_response(|res: &Response<Body>, latency: Duration, _span: &tracing::Span| {
            info!(
                latency = %format!("{} ms", latency.as_millis()),
                status = %res.status().as_u16(),
                "finished processing request"
            );
        });

    let logged_routes = Router::new()
        .route("/predict", post(handlers::predict::predict))
        .layer(trace_layer);

    Router::new()
        .merge(logged_routes)
        .route("/health", get(handlers::health))
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    fn config_with(policy: Option<&str>, lr_path: &str) -> ServerConfig {
        let models = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../models");
        let dt_path = models.join("dt_pipeline.onnx").display().to_string();
        let lr_path = lr_path.to_string();
        let policy = policy.map(String::from);

        ServerConfig::from_lookup(move |key| match key {
            "LR_MODEL_PATH" => Some(lr_path.clone()),
            "DT_MODEL_PATH" => Some(dt_path.clone()),
            "STARTUP_POLICY" => policy.clone(),
            _ => None,
        })
        .unwrap()
    }

    #[test]
    fn test_missing_model_fails_fast_by_default() {
        let config = config_with(None, "/nonexistent/lr_pipeline.onnx");
        assert_eq!(config.startup_policy, StartupPolicy::FailFast);

        let err = init_server_state(&config).err().unwrap();
        assert!(err.to_string().contains("/nonexistent/lr_pipeline.onnx"));
    }

    #[test]
    fn test_missing_model_degraded_keeps_failed_store() {
        let config = config_with(Some("degraded"), "/nonexistent/lr_pipeline.onnx");

        let state = init_server_state(&config).unwrap();
        assert!(matches!(state.models, Err(LoadError::Io { .. })));
        assert!(matches!(state.store(), Err(AppError::Unavailable(_))));
    }

    #[test]
    fn test_bundled_models_load_under_either_policy() {
        let models = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../models");
        let lr_path = models.join("lr_pipeline.onnx").display().to_string();

        for policy in [None, Some("degraded")] {
            let state = init_server_state(&config_with(policy, &lr_path)).unwrap();
            assert!(state.store().is_ok());
        }
    }
}
