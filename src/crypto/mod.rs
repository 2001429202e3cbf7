//! Identity cryptography: P-256 keys, certificate requests, signed tokens.
//!
//! # Security Constraints
//! - Private keys exist only as PEM strings handed to the wallet
//! - Never log private keys or tokens

pub mod keys;
pub mod token;

pub use keys::{
    generate_certificate_request, sign_message, CertificateRequest, CryptoError, CryptoResult,
};
pub use token::auth_token;
