//! Request identification and body types.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID) unless the caller sent one
//! - Echo the ID back on the response
//! - Define the JSON bodies accepted by the query routes
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing

use axum::http::HeaderName;
use serde::Deserialize;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};

/// Header carrying the request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

fn request_id_header() -> HeaderName {
    HeaderName::from_static(X_REQUEST_ID)
}

/// Layer assigning an ID to requests that lack one.
pub fn set_request_id_layer() -> SetRequestIdLayer<MakeRequestUuid> {
    SetRequestIdLayer::new(request_id_header(), MakeRequestUuid)
}

/// Layer copying the request ID onto the response.
pub fn propagate_request_id_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::new(request_id_header())
}

/// Body of `/getLC` and `/getLCHistory`.
#[derive(Debug, Clone, Deserialize)]
pub struct LcQuery {
    #[serde(rename = "lcId")]
    pub lc_id: String,
}
