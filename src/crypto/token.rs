//! Identity-signed request tokens.
//!
//! Format (Fabric CA "ECDSA token"):
//! ```text
//! payload = METHOD "." b64(path) "." b64(body) "." b64(cert_pem)
//! token   = b64(cert_pem) "." b64(sign(payload))
//! ```
//! All base64 is standard alphabet with padding.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::crypto::keys::{sign_message, CryptoResult};

/// Build the signed payload for a request.
pub fn token_payload(method: &str, path: &str, body: &[u8], certificate_pem: &str) -> String {
    format!(
        "{}.{}.{}.{}",
        method.to_ascii_uppercase(),
        STANDARD.encode(path.as_bytes()),
        STANDARD.encode(body),
        STANDARD.encode(certificate_pem.as_bytes()),
    )
}

/// Create an `Authorization` token for a request made as the given identity.
pub fn auth_token(
    certificate_pem: &str,
    private_key_pem: &str,
    method: &str,
    path: &str,
    body: &[u8],
) -> CryptoResult<String> {
    let payload = token_payload(method, path, body, certificate_pem);
    let signature = sign_message(private_key_pem, payload.as_bytes())?;
    Ok(format!(
        "{}.{}",
        STANDARD.encode(certificate_pem.as_bytes()),
        STANDARD.encode(signature)
    ))
}
