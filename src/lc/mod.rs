//! Letter-of-credit operations.
//!
//! Thin mapping from the five LC operations onto ledger calls: three submit
//! the request body as the single argument, two evaluate by LC id and
//! decode the result as JSON.

pub mod service;

pub use service::{LcError, LcResult, LcService, SUBMITTED_MESSAGE};
