//! HTTP facade subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (Axum setup, middleware, handlers)
//!     → request.rs (request ID, query bodies)
//!     → LcService (ledger call)
//!     → response.rs (acknowledgement or structured error)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{LcQuery, X_REQUEST_ID};
pub use response::{ApiError, ErrorBody, SubmitResponse};
pub use server::{AppState, HttpServer};
