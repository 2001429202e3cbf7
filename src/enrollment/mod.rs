//! Identity provisioning.
//!
//! # Data Flow
//! ```text
//! bootstrap_admin(org)
//!     → store.exists("admin-<org>")?  yes → AlreadyEnrolled
//!     → profile → CA enroll(bootstrap id, secret) → store.put
//!
//! register_and_enroll_user(org, label)
//!     → store.exists(label)?          yes → AlreadyEnrolled
//!     → store.get("admin-<org>")      absent → AdminMissing
//!     → CA register (as admin) → CA enroll(label, secret) → store.put
//!
//! provision(org, label) = bootstrap_admin, then register_and_enroll_user
//! ```
//!
//! # Design Decisions
//! - One label is provisioned by at most one task at a time in a process
//! - The store's no-clobber put guards against other processes
//! - Failures leave the store untouched

pub mod service;
pub mod types;

pub use service::{admin_label, EnrollmentService};
pub use types::{CaStage, ProvisionOutcome, ProvisionReport, ProvisioningError, ProvisioningResult};
