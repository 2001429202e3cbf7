//! Network profile types and error definitions.

use std::path::PathBuf;
use thiserror::Error;

/// One organization's static view of the ledger network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkProfile {
    /// Profile name as declared in the file.
    pub name: String,
    /// Organization id the profile was loaded for (e.g. "buyer").
    pub organization: String,
    /// MSP identifier of the organization (e.g. "buyerMSP").
    pub msp_id: String,
    /// The organization's certificate authority.
    pub certificate_authority: CaInfo,
    /// Peers belonging to the organization, in declaration order.
    pub peers: Vec<PeerInfo>,
}

/// Certificate authority endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaInfo {
    /// Key of the CA entry in the profile (e.g. "ca.buyer.example.com").
    pub name: String,
    /// Base URL of the CA REST API.
    pub url: String,
    /// Name of the CA instance served at `url` (Fabric `caname`).
    pub ca_name: String,
    /// PEM trust anchors for the CA's TLS certificate. Never empty.
    pub tls_ca_certs: Vec<String>,
    /// Whether the CA's TLS certificate is verified.
    pub verify: bool,
}

/// Peer endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerInfo {
    pub name: String,
    pub url: String,
    pub tls_ca_certs: Vec<String>,
    /// TLS server name to expect when it differs from the URL host.
    pub ssl_target_name_override: Option<String>,
}

/// Errors that can occur while loading a network profile.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// The profile file could not be located or read.
    #[error("network profile for '{organization}' not found at {}: {source}", path.display())]
    NotFound {
        organization: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The profile was read but is unusable.
    #[error("network profile for '{organization}' is malformed: {reason}")]
    Malformed { organization: String, reason: String },
}

impl ProfileError {
    pub(crate) fn malformed(organization: &str, reason: impl Into<String>) -> Self {
        Self::Malformed {
            organization: organization.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type for profile operations.
pub type ProfileResult<T> = Result<T, ProfileError>;
