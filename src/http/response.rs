//! Response bodies and error mapping.
//!
//! # Responsibilities
//! - Define the JSON acknowledgement for submit routes
//! - Map core errors to HTTP status codes and a structured body
//!
//! # Design Decisions
//! - Identity missing → 403; the caller must provision first
//! - Gateway unreachable or undecodable results → 502, timeouts → 504
//! - Contract rejections → 422 with the contract's message

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::lc::{LcError, SUBMITTED_MESSAGE};
use crate::ledger::CallError;

/// Body returned by the submit routes.
#[derive(Debug, Clone, Serialize)]
pub struct SubmitResponse {
    pub message: &'static str,
    pub function: &'static str,
}

impl SubmitResponse {
    pub fn new(function: &'static str) -> Self {
        Self {
            message: SUBMITTED_MESSAGE,
            function,
        }
    }
}

/// Structured error body.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<&'static str>,
    pub message: String,
}

/// Errors a handler can return.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Lc(LcError),
}

impl From<LcError> for ApiError {
    fn from(e: LcError) -> Self {
        Self::Lc(e)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Lc(LcError::UndecodableResult { .. }) => StatusCode::BAD_GATEWAY,
            Self::Lc(LcError::Call(e)) => match e {
                CallError::IdentityNotFound(_) => StatusCode::FORBIDDEN,
                CallError::ConnectFailed(_) => StatusCode::BAD_GATEWAY,
                CallError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
                CallError::ContractInvocationFailed { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                CallError::Aborted => StatusCode::SERVICE_UNAVAILABLE,
                CallError::Config(_) | CallError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    fn body(&self) -> ErrorBody {
        match self {
            Self::BadRequest(message) => ErrorBody {
                error: "bad_request",
                stage: None,
                message: message.clone(),
            },
            Self::Lc(e @ LcError::UndecodableResult { .. }) => ErrorBody {
                error: "undecodable_result",
                stage: None,
                message: e.to_string(),
            },
            Self::Lc(LcError::Call(e)) => ErrorBody {
                error: e.kind(),
                stage: e.stage().map(|s| s.as_str()),
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = ?self, "Request failed");
        }
        (status, Json(self.body())).into_response()
    }
}
