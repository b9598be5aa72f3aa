use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{Method, StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::{any, get};
use axum::{Json, Router};
use serde_json::Value;
use tower_http::cors::CorsLayer;

use quickplan_core::GenerationError;
use quickplan_core::client::ENDPOINT_PATH;
use quickplan_core::plan::{ApiKeySource, PlanRequest, StrategicPlan, generate_plan};
use quickplan_core::provider::{GeminiProvider, PlanProvider};

use crate::config::QuickplanConfig;

/// Message returned for any provider or parse failure.
const GENERATION_FAILED: &str = "Failed to generate strategic plan from Gemini API.";

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

pub struct AppError {
    status: StatusCode,
    message: String,
}

impl AppError {
    pub fn method_not_allowed() -> Self {
        Self {
            status: StatusCode::METHOD_NOT_ALLOWED,
            message: "Method Not Allowed".to_string(),
        }
    }
}

impl From<GenerationError> for AppError {
    fn from(err: GenerationError) -> Self {
        match err {
            GenerationError::InvalidInput(message) => Self {
                status: StatusCode::BAD_REQUEST,
                message,
            },
            GenerationError::MissingConfiguration(_) => Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: err.to_string(),
            },
            GenerationError::UpstreamFailure | GenerationError::MalformedResponse => Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: GENERATION_FAILED.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let body = serde_json::json!({ "message": self.message });
        if self.status == StatusCode::METHOD_NOT_ALLOWED {
            return (self.status, [(header::ALLOW, "POST")], Json(body)).into_response();
        }
        (self.status, Json(body)).into_response()
    }
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Shared endpoint state. Nothing in it is mutated by requests.
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn PlanProvider>,
    pub api_key: ApiKeySource,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route(ENDPOINT_PATH, any(generate))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub async fn run_serve(config: &QuickplanConfig) -> Result<()> {
    let provider = GeminiProvider::new(&config.provider_url, &config.model);
    let api_key = config.api_key_source();
    if api_key.resolve().is_none() {
        tracing::warn!(
            variable = api_key.variable(),
            "provider credential is not set; generation requests will fail until it is"
        );
    }

    let app = build_router(AppState {
        provider: Arc::new(provider),
        api_key,
    });
    let addr: SocketAddr = format!("{}:{}", config.bind, config.port).parse()?;
    tracing::info!(model = %config.model, "quickplan serve listening on http://{addr}{ENDPOINT_PATH}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("quickplan serve shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn healthz() -> &'static str {
    "ok"
}

async fn generate(
    State(state): State<AppState>,
    method: Method,
    body: Bytes,
) -> Result<Json<StrategicPlan>, AppError> {
    if method != Method::POST {
        return Err(AppError::method_not_allowed());
    }

    // A body that is not JSON carries no mission or vision; the service
    // reports the credential check first and then the missing input.
    let value: Value = serde_json::from_slice(&body).unwrap_or_else(|e| {
        tracing::debug!(error = %e, "request body is not JSON");
        Value::Null
    });
    let request = PlanRequest::from_json_body(&value);

    let plan = generate_plan(state.provider.as_ref(), &state.api_key, &request).await?;
    Ok(Json(plan))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
