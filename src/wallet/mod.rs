//! Identity store ("wallet") subsystem.
//!
//! # Data Flow
//! ```text
//! Enrollment service (provisioning)
//!     → put(record)            (no-clobber, fails with AlreadyExists)
//!
//! Transaction client (every call)
//!     → get(label)             (lock-free read of an immutable record)
//! ```
//!
//! # Security Constraints
//! - Private keys are never logged (`CredentialRecord`'s Debug redacts them)
//! - Records are never overwritten or deleted by this crate

pub mod filesystem;
pub mod store;
pub mod types;

pub use filesystem::FileSystemWallet;
pub use store::{IdentityStore, InMemoryWallet};
pub use types::{
    validate_label, CredentialRecord, WalletError, WalletResult, X509_CREDENTIAL_TYPE,
};
