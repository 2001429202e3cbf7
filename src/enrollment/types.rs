//! Provisioning outcomes and error definitions.

use std::fmt;
use thiserror::Error;

use crate::ca::CaError;
use crate::profile::ProfileError;
use crate::wallet::WalletError;

/// What a provisioning call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisionOutcome {
    /// A new credential was issued and stored.
    Enrolled,
    /// The label was already in the store; nothing was contacted.
    AlreadyEnrolled,
}

impl ProvisionOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Enrolled => "enrolled",
            Self::AlreadyEnrolled => "already_enrolled",
        }
    }
}

impl fmt::Display for ProvisionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of the two-phase `provision` flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProvisionReport {
    pub admin: ProvisionOutcome,
    pub user: ProvisionOutcome,
}

/// CA round trip that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaStage {
    Register,
    Enroll,
}

impl fmt::Display for CaStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Register => f.write_str("register"),
            Self::Enroll => f.write_str("enroll"),
        }
    }
}

/// Errors that abort a provisioning run. Nothing is written to the store
/// when one of these is returned.
#[derive(Debug, Error)]
pub enum ProvisioningError {
    /// The organization's network profile is missing or unusable.
    #[error(transparent)]
    Config(#[from] ProfileError),

    /// A user was requested before the organization's admin was enrolled.
    #[error("admin identity '{label}' for organization '{organization}' is not enrolled; bootstrap the admin first")]
    AdminMissing { organization: String, label: String },

    /// The certificate authority refused or failed a request.
    ///
    /// `registered` is true when the CA already holds a registration for
    /// `label` (register succeeded, enroll did not).
    #[error("CA {stage} failed for '{label}': {source}")]
    Ca {
        stage: CaStage,
        label: String,
        registered: bool,
        #[source]
        source: CaError,
    },

    /// The identity store failed.
    #[error(transparent)]
    Store(#[from] WalletError),
}

/// Result type for provisioning operations.
pub type ProvisioningResult<T> = Result<T, ProvisioningError>;
