//! Certificate authority client subsystem.
//!
//! # Data Flow
//! ```text
//! NetworkProfile.certificate_authority (url, caName, TLS roots)
//!     → client.rs  enroll:   CSR  → POST /api/v1/enroll   (basic auth)
//!                  register: JSON → POST /api/v1/register (registrar token)
//!     → Enrollment / one-time secret
//! ```
//!
//! # Security Constraints
//! - Private keys are generated locally and never leave the process
//! - Secrets and tokens are never logged

pub mod client;
pub mod types;

pub use client::{CaClient, FabricCaClient};
pub use types::{CaError, CaResult, Enrollment, RegistrationRequest, CLIENT_ROLE};
