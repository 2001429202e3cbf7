//! Transaction gateway subsystem.
//!
//! # Data Flow
//! ```text
//! TransactionRequest + CallMode
//!     → client.rs  (profile, credential lookup, timeouts)
//!     → gateway.rs (LedgerGateway → LedgerConnection → Contract)
//!     → rest.rs    (HTTP gateway binding) or a test double
//!     → raw result bytes
//! ```

pub mod client;
pub mod gateway;
pub mod rest;
pub mod types;

pub use client::TransactionClient;
pub use gateway::{ConnectOptions, Contract, LedgerConnection, LedgerGateway};
pub use rest::HttpLedgerGateway;
pub use types::{
    CallError, CallMode, CallResult, CallStage, GatewayError, GatewayResult, TransactionRequest,
};
