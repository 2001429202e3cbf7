//! Fabric CA REST client.
//!
//! # Responsibilities
//! - `enroll`: generate a key + CSR locally, exchange it for a certificate
//! - `register`: create an identity, authenticated by a registrar's token
//! - Trust the CA's TLS roots from the network profile; enforce timeouts

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::ca::types::{
    CaError, CaResponse, CaResult, EnrollResult, Enrollment, RegisterResult, RegistrationRequest,
};
use crate::crypto::{auth_token, generate_certificate_request};
use crate::profile::CaInfo;
use crate::wallet::CredentialRecord;

/// The two CA operations the enrollment service needs.
#[async_trait]
pub trait CaClient: Send + Sync {
    /// Exchange an enrollment ID and secret for a certificate and key.
    async fn enroll(&self, ca: &CaInfo, enrollment_id: &str, secret: &str) -> CaResult<Enrollment>;

    /// Register a new identity as `registrar`, returning its one-time secret.
    async fn register(
        &self,
        ca: &CaInfo,
        request: &RegistrationRequest,
        registrar: &CredentialRecord,
    ) -> CaResult<String>;
}

/// [`CaClient`] speaking the Fabric CA REST protocol over HTTPS.
#[derive(Debug, Clone)]
pub struct FabricCaClient {
    timeout: Duration,
}

impl FabricCaClient {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    fn http_client(&self, ca: &CaInfo) -> CaResult<reqwest::Client> {
        let mut builder = reqwest::Client::builder().timeout(self.timeout);
        for pem in &ca.tls_ca_certs {
            let root = reqwest::Certificate::from_pem(pem.as_bytes()).map_err(|e| {
                CaError::Config(format!("bad TLS root for CA '{}': {}", ca.name, e))
            })?;
            builder = builder.add_root_certificate(root);
        }
        if !ca.verify {
            builder = builder.danger_accept_invalid_certs(true);
        }
        builder
            .build()
            .map_err(|e| CaError::Config(format!("cannot build HTTP client: {}", e)))
    }

    fn endpoint(ca: &CaInfo, operation: &str) -> CaResult<url::Url> {
        let mut url = url::Url::parse(&ca.url)
            .map_err(|e| CaError::Config(format!("invalid CA url '{}': {}", ca.url, e)))?;
        let path = format!("{}/api/v1/{}", url.path().trim_end_matches('/'), operation);
        url.set_path(&path);
        Ok(url)
    }

    fn transport_error(&self, url: &url::Url, e: reqwest::Error) -> CaError {
        if e.is_timeout() {
            CaError::Timeout(self.timeout.as_secs())
        } else {
            CaError::Unreachable {
                url: url.to_string(),
                message: e.to_string(),
            }
        }
    }

    async fn read_envelope<T: DeserializeOwned>(
        &self,
        url: &url::Url,
        response: reqwest::Response,
    ) -> CaResult<T> {
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| self.transport_error(url, e))?;

        let envelope: CaResponse<T> = match serde_json::from_str(&text) {
            Ok(envelope) => envelope,
            Err(_) if !status.is_success() => {
                return Err(CaError::Rejected {
                    status: status.as_u16(),
                    message: text,
                })
            }
            Err(e) => return Err(CaError::InvalidResponse(e.to_string())),
        };

        if !status.is_success() || !envelope.success {
            let message = if envelope.errors.is_empty() {
                text
            } else {
                envelope
                    .errors
                    .iter()
                    .map(|m| format!("[{}] {}", m.code, m.message))
                    .collect::<Vec<_>>()
                    .join("; ")
            };
            return Err(CaError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        envelope
            .result
            .ok_or_else(|| CaError::InvalidResponse("missing result".to_string()))
    }
}

#[async_trait]
impl CaClient for FabricCaClient {
    async fn enroll(&self, ca: &CaInfo, enrollment_id: &str, secret: &str) -> CaResult<Enrollment> {
        let request = generate_certificate_request(enrollment_id)?;
        let url = Self::endpoint(ca, "enroll")?;
        let body = serde_json::json!({
            "certificate_request": request.csr_pem,
            "caname": ca.ca_name,
        });

        tracing::debug!(ca = %ca.name, enrollment_id = %enrollment_id, "Sending enroll request");
        let response = self
            .http_client(ca)?
            .post(url.clone())
            .basic_auth(enrollment_id, Some(secret))
            .json(&body)
            .send()
            .await
            .map_err(|e| self.transport_error(&url, e))?;

        let result: EnrollResult = self.read_envelope(&url, response).await?;
        let pem = STANDARD
            .decode(result.cert.trim())
            .map_err(|e| CaError::InvalidResponse(format!("certificate is not base64: {}", e)))?;
        let certificate = String::from_utf8(pem)
            .map_err(|_| CaError::InvalidResponse("certificate is not UTF-8 PEM".to_string()))?;

        tracing::info!(ca = %ca.name, enrollment_id = %enrollment_id, "Enrollment succeeded");
        Ok(Enrollment {
            certificate,
            private_key: request.private_key_pem,
        })
    }

    async fn register(
        &self,
        ca: &CaInfo,
        request: &RegistrationRequest,
        registrar: &CredentialRecord,
    ) -> CaResult<String> {
        let url = Self::endpoint(ca, "register")?;
        let mut body = serde_json::to_value(request)
            .map_err(|e| CaError::InvalidResponse(format!("cannot encode request: {}", e)))?;
        body["caname"] = serde_json::Value::String(ca.ca_name.clone());
        let body = serde_json::to_vec(&body)
            .map_err(|e| CaError::InvalidResponse(format!("cannot encode request: {}", e)))?;

        let token = auth_token(
            &registrar.certificate,
            &registrar.private_key,
            "POST",
            url.path(),
            &body,
        )?;

        tracing::debug!(
            ca = %ca.name,
            enrollment_id = %request.enrollment_id,
            registrar = %registrar.label,
            "Sending register request"
        );
        let response = self
            .http_client(ca)?
            .post(url.clone())
            .header(AUTHORIZATION, token)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| self.transport_error(&url, e))?;

        let result: RegisterResult = self.read_envelope(&url, response).await?;
        tracing::info!(
            ca = %ca.name,
            enrollment_id = %request.enrollment_id,
            "Registration succeeded"
        );
        Ok(result.secret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ca(url: &str) -> CaInfo {
        CaInfo {
            name: "ca.buyer.example.com".to_string(),
            url: url.to_string(),
            ca_name: "ca-buyer".to_string(),
            tls_ca_certs: Vec::new(),
            verify: false,
        }
    }

    #[test]
    fn test_endpoint_paths() {
        let url = FabricCaClient::endpoint(&ca("https://localhost:7054"), "enroll").unwrap();
        assert_eq!(url.as_str(), "https://localhost:7054/api/v1/enroll");

        let url = FabricCaClient::endpoint(&ca("https://ca.local/fabric/"), "register").unwrap();
        assert_eq!(url.path(), "/fabric/api/v1/register");
    }

    #[test]
    fn test_bad_tls_root_is_config_error() {
        let mut info = ca("https://localhost:7054");
        info.tls_ca_certs.push("not a certificate".to_string());
        let client = FabricCaClient::new(Duration::from_secs(1));
        assert!(matches!(client.http_client(&info), Err(CaError::Config(_))));
    }

    #[tokio::test]
    async fn test_unreachable_ca() {
        // Port 9 (discard) on localhost is closed in test environments.
        let client = FabricCaClient::new(Duration::from_secs(2));
        let err = client
            .enroll(&ca("http://127.0.0.1:9"), "admin", "adminpw")
            .await
            .unwrap_err();
        assert!(matches!(err, CaError::Unreachable { .. } | CaError::Timeout(_)));
    }
}
