//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the LC handlers
//! - Wire up middleware (tracing, request ID, timeout)
//! - Serve over plain TCP or TLS with graceful shutdown

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;
use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::ListenerConfig;
use crate::http::request::{propagate_request_id_layer, set_request_id_layer, LcQuery};
use crate::http::response::{ApiError, SubmitResponse};
use crate::lc::LcService;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub lc: LcService,
}

/// HTTP facade over the LC operations.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    pub fn new(config: &ListenerConfig, lc: LcService) -> Self {
        let router = Self::build_router(config, AppState { lc });
        Self { router }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ListenerConfig, state: AppState) -> Router {
        Router::new()
            .route("/requestLC", post(request_lc))
            .route("/issueLC", post(issue_lc))
            .route("/acceptLC", post(accept_lc))
            .route("/getLC", post(get_lc))
            .route("/getLCHistory", post(get_lc_history))
            .route("/health", get(health))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(set_request_id_layer())
                    .layer(TraceLayer::new_for_http())
                    .layer(propagate_request_id_layer())
                    .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout_secs))),
            )
    }

    /// The router, for embedding or in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve on `listener` until `shutdown` resolves.
    pub async fn run<F>(self, listener: TcpListener, shutdown: F) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Serve over TLS on `addr` until `shutdown` resolves.
    pub async fn run_tls<F>(
        self,
        addr: SocketAddr,
        tls: axum_server::tls_rustls::RustlsConfig,
        shutdown: F,
    ) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let handle = axum_server::Handle::new();
        let stopper = handle.clone();
        tokio::spawn(async move {
            shutdown.await;
            stopper.graceful_shutdown(Some(Duration::from_secs(30)));
        });

        tracing::info!(address = %addr, "HTTPS server starting");
        axum_server::bind_rustls(addr, tls)
            .handle(handle)
            .serve(self.router.into_make_service())
            .await?;

        tracing::info!("HTTPS server stopped");
        Ok(())
    }
}

fn json_body(payload: Result<Json<Value>, JsonRejection>) -> Result<Value, ApiError> {
    let Json(body) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    // Strict JSON: top-level objects and arrays only; the payload itself is opaque.
    if !(body.is_object() || body.is_array()) {
        return Err(ApiError::BadRequest(
            "request body must be a JSON object or array".to_string(),
        ));
    }
    Ok(body)
}

fn lc_query(payload: Result<Json<LcQuery>, JsonRejection>) -> Result<String, ApiError> {
    let Json(query) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    if query.lc_id.trim().is_empty() {
        return Err(ApiError::BadRequest("lcId must not be empty".to_string()));
    }
    Ok(query.lc_id)
}

async fn request_lc(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<SubmitResponse>, ApiError> {
    state.lc.request_lc(&json_body(payload)?).await?;
    Ok(Json(SubmitResponse::new("requestLC")))
}

async fn issue_lc(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<SubmitResponse>, ApiError> {
    state.lc.issue_lc(&json_body(payload)?).await?;
    Ok(Json(SubmitResponse::new("issueLC")))
}

async fn accept_lc(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<SubmitResponse>, ApiError> {
    state.lc.accept_lc(&json_body(payload)?).await?;
    Ok(Json(SubmitResponse::new("acceptLC")))
}

async fn get_lc(
    State(state): State<AppState>,
    payload: Result<Json<LcQuery>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let lc_id = lc_query(payload)?;
    Ok(Json(state.lc.get_lc(&lc_id).await?))
}

async fn get_lc_history(
    State(state): State<AppState>,
    payload: Result<Json<LcQuery>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let lc_id = lc_query(payload)?;
    Ok(Json(state.lc.get_lc_history(&lc_id).await?))
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({ "status": "ok" })))
}
