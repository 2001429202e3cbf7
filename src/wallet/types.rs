//! Credential records and wallet errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Credential scheme tag carried by every record this gateway writes.
pub const X509_CREDENTIAL_TYPE: &str = "X.509";

/// Current on-disk entry version (matches the Fabric file-system wallet).
pub const WALLET_ENTRY_VERSION: u32 = 1;

/// One enrolled identity.
///
/// Records are immutable once written; the store never overwrites one.
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialRecord {
    /// Unique key within the store (e.g. "BuyerUser", "admin-buyer").
    pub label: String,
    /// PEM-encoded X.509 certificate.
    pub certificate: String,
    /// PEM-encoded PKCS#8 private key.
    pub private_key: String,
    /// MSP identifier of the owning organization (e.g. "buyerMSP").
    pub organization_id: String,
    /// Credential scheme tag, always "X.509" here.
    pub credential_type: String,
}

impl CredentialRecord {
    /// Build an X.509 record.
    pub fn x509(
        label: impl Into<String>,
        certificate: impl Into<String>,
        private_key: impl Into<String>,
        organization_id: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            certificate: certificate.into(),
            private_key: private_key.into(),
            organization_id: organization_id.into(),
            credential_type: X509_CREDENTIAL_TYPE.to_string(),
        }
    }

    pub(crate) fn to_entry(&self) -> WalletEntry {
        WalletEntry {
            credentials: EntryCredentials {
                certificate: self.certificate.clone(),
                private_key: self.private_key.clone(),
            },
            msp_id: self.organization_id.clone(),
            credential_type: self.credential_type.clone(),
            version: WALLET_ENTRY_VERSION,
        }
    }

    pub(crate) fn from_entry(label: &str, entry: WalletEntry) -> Self {
        Self {
            label: label.to_string(),
            certificate: entry.credentials.certificate,
            private_key: entry.credentials.private_key,
            organization_id: entry.msp_id,
            credential_type: entry.credential_type,
        }
    }
}

// Private keys must never reach the logs.
impl std::fmt::Debug for CredentialRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialRecord")
            .field("label", &self.label)
            .field("organization_id", &self.organization_id)
            .field("credential_type", &self.credential_type)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

/// Serialized form of one wallet file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct WalletEntry {
    pub credentials: EntryCredentials,
    #[serde(rename = "mspId")]
    pub msp_id: String,
    #[serde(rename = "type")]
    pub credential_type: String,
    #[serde(default = "default_version")]
    pub version: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct EntryCredentials {
    pub certificate: String,
    pub private_key: String,
}

fn default_version() -> u32 {
    WALLET_ENTRY_VERSION
}

/// Errors that can occur during wallet operations.
#[derive(Debug, Error)]
pub enum WalletError {
    /// No record stored under the label.
    #[error("identity '{0}' not found in wallet")]
    NotFound(String),

    /// A record already exists under the label; records are never overwritten.
    #[error("identity '{0}' already exists in wallet")]
    AlreadyExists(String),

    /// The label cannot be used as a wallet key.
    #[error("invalid identity label '{label}': {reason}")]
    InvalidLabel { label: String, reason: &'static str },

    /// Backing storage failed.
    #[error("wallet I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored entry could not be (de)serialized.
    #[error("malformed wallet entry '{label}': {source}")]
    Serialization {
        label: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Result type for wallet operations.
pub type WalletResult<T> = Result<T, WalletError>;

/// Check that a label is usable as a wallet key (and a file stem).
pub fn validate_label(label: &str) -> WalletResult<()> {
    let invalid = |reason| {
        Err(WalletError::InvalidLabel {
            label: label.to_string(),
            reason,
        })
    };

    if label.is_empty() {
        return invalid("must not be empty");
    }
    if label.starts_with('.') {
        return invalid("must not start with '.'");
    }
    if !label
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '@' | '-'))
    {
        return invalid("only ASCII letters, digits, '.', '_', '@' and '-' are allowed");
    }
    Ok(())
}
