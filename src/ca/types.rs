//! CA request/response types and error definitions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::crypto::CryptoError;

/// Role given to operating identities.
pub const CLIENT_ROLE: &str = "client";

/// Certificate and key issued by an `enroll` call.
#[derive(Clone, PartialEq, Eq)]
pub struct Enrollment {
    /// PEM-encoded X.509 certificate.
    pub certificate: String,
    /// PEM-encoded PKCS#8 private key (generated locally, never sent).
    pub private_key: String,
}

impl std::fmt::Debug for Enrollment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Enrollment")
            .field("certificate", &self.certificate)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

/// Parameters of a `register` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistrationRequest {
    #[serde(rename = "id")]
    pub enrollment_id: String,
    #[serde(rename = "type")]
    pub role: String,
    pub affiliation: String,
    /// How many times the returned secret may be used to enroll.
    pub max_enrollments: u32,
}

impl RegistrationRequest {
    /// A client identity whose secret is good for exactly one enrollment.
    pub fn client(enrollment_id: impl Into<String>) -> Self {
        Self {
            enrollment_id: enrollment_id.into(),
            role: CLIENT_ROLE.to_string(),
            affiliation: String::new(),
            max_enrollments: 1,
        }
    }
}

/// Fabric CA response envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct CaResponse<T> {
    #[serde(default)]
    pub success: bool,
    pub result: Option<T>,
    #[serde(default)]
    pub errors: Vec<CaMessage>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CaMessage {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EnrollResult {
    /// Base64 of the PEM certificate.
    #[serde(rename = "Cert")]
    pub cert: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RegisterResult {
    pub secret: String,
}

/// Errors that can occur while talking to a certificate authority.
#[derive(Debug, Error)]
pub enum CaError {
    /// The CA could not be reached.
    #[error("CA unreachable at {url}: {message}")]
    Unreachable { url: String, message: String },

    /// The CA did not answer in time.
    #[error("CA request timed out after {0} seconds")]
    Timeout(u64),

    /// The CA answered with an error (bad secret, duplicate registration...).
    #[error("CA rejected the request (HTTP {status}): {message}")]
    Rejected { status: u16, message: String },

    /// The CA answered with something that is not a valid envelope.
    #[error("invalid CA response: {0}")]
    InvalidResponse(String),

    /// The CA endpoint or its trust anchors are unusable.
    #[error("invalid CA endpoint configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Crypto(#[from] CryptoError),
}

/// Result type for CA operations.
pub type CaResult<T> = Result<T, CaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_wire_format() {
        let json = serde_json::to_value(RegistrationRequest::client("BuyerUser")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "BuyerUser",
                "type": "client",
                "affiliation": "",
                "max_enrollments": 1
            })
        );
    }

    #[test]
    fn test_envelope_with_errors() {
        let envelope: CaResponse<RegisterResult> = serde_json::from_str(
            r#"{"success":false,"result":null,"errors":[{"code":74,"message":"Identity 'BuyerUser' is already registered"}],"messages":[]}"#,
        )
        .unwrap();
        assert!(!envelope.success);
        assert!(envelope.result.is_none());
        assert_eq!(envelope.errors[0].code, 74);
    }
}
