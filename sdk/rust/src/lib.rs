//! Client for the LC gateway HTTP API.

pub mod client;

pub use client::{ApiErrorBody, LcClient, SdkError, SubmitReceipt};
