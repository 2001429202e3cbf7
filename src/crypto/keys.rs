//! Key generation, certificate requests and ECDSA signing.
//!
//! Fabric identities use P-256 keys with ECDSA-SHA256 signatures, and
//! Fabric components reject high-S signatures, so every signature produced
//! here is normalized to low-S.

use openssl::bn::{BigNum, BigNumContext};
use openssl::ec::{EcGroup, EcKey};
use openssl::ecdsa::EcdsaSig;
use openssl::hash::MessageDigest;
use openssl::nid::Nid;
use openssl::pkey::{PKey, Private};
use openssl::sha::sha256;
use openssl::x509::{X509NameBuilder, X509ReqBuilder};
use std::cmp::Ordering;
use thiserror::Error;

/// Errors from key handling.
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("OpenSSL error: {0}")]
    OpenSsl(#[from] openssl::error::ErrorStack),

    #[error("PEM output is not UTF-8")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// Result type for crypto operations.
pub type CryptoResult<T> = Result<T, CryptoError>;

/// A freshly generated key and the certificate request for it.
pub struct CertificateRequest {
    /// PKCS#8 PEM of the new private key.
    pub private_key_pem: String,
    /// PKCS#10 PEM to send to the CA.
    pub csr_pem: String,
}

impl std::fmt::Debug for CertificateRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CertificateRequest")
            .field("csr_pem", &self.csr_pem)
            .field("private_key_pem", &"<redacted>")
            .finish()
    }
}

/// Generate a P-256 key and a CSR whose subject CN is `common_name`.
pub fn generate_certificate_request(common_name: &str) -> CryptoResult<CertificateRequest> {
    let group = EcGroup::from_curve_name(Nid::X9_62_PRIME256V1)?;
    let pkey = PKey::from_ec_key(EcKey::generate(&group)?)?;

    let mut name = X509NameBuilder::new()?;
    name.append_entry_by_nid(Nid::COMMONNAME, common_name)?;
    let name = name.build();

    let mut req = X509ReqBuilder::new()?;
    req.set_version(0)?;
    req.set_subject_name(&name)?;
    req.set_pubkey(&pkey)?;
    req.sign(&pkey, MessageDigest::sha256())?;

    Ok(CertificateRequest {
        private_key_pem: String::from_utf8(pkey.private_key_to_pem_pkcs8()?)?,
        csr_pem: String::from_utf8(req.build().to_pem()?)?,
    })
}

/// Sign `message` (hashed with SHA-256) with a PEM EC private key.
///
/// Returns a DER-encoded, low-S ECDSA signature.
pub fn sign_message(private_key_pem: &str, message: &[u8]) -> CryptoResult<Vec<u8>> {
    let key: PKey<Private> = PKey::private_key_from_pem(private_key_pem.as_bytes())?;
    let ec = key.ec_key()?;
    let digest = sha256(message);
    let sig = EcdsaSig::sign(&digest, &ec)?;

    let mut ctx = BigNumContext::new()?;
    let mut order = BigNum::new()?;
    ec.group().order(&mut order, &mut ctx)?;
    let mut half_order = BigNum::new()?;
    half_order.rshift1(&order)?;

    let s = if sig.s().ucmp(&half_order) == Ordering::Greater {
        let mut low = BigNum::new()?;
        low.checked_sub(&order, sig.s())?;
        low
    } else {
        sig.s().to_owned()?
    };

    let normalized = EcdsaSig::from_private_components(sig.r().to_owned()?, s)?;
    Ok(normalized.to_der()?)
}
