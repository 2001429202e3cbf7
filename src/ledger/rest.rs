//! JSON-over-HTTPS binding to a Fabric gateway endpoint.
//!
//! # Protocol
//! ```text
//! POST   /v1/sessions                                   {mspId, discovery} → {sessionId}
//! POST   /v1/channels/{channel}/contracts/{name}/submit   {function, args} → raw result
//! POST   /v1/channels/{channel}/contracts/{name}/evaluate {function, args} → raw result
//! DELETE /v1/sessions/{sessionId}
//! ```
//! Every request is sent over mutual TLS with the caller's certificate and
//! carries an `Authorization` token signed with the caller's key. When the
//! peer's `ssl-target-name-override` differs from the URL host, requests are
//! addressed to the override name, which is resolved to the URL host's
//! address.

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use crate::crypto::auth_token;
use crate::ledger::gateway::{ConnectOptions, Contract, LedgerConnection, LedgerGateway};
use crate::ledger::types::{GatewayError, GatewayResult};
use crate::profile::NetworkProfile;
use crate::wallet::CredentialRecord;

const SESSION_HEADER: &str = "x-session-id";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionRequest<'a> {
    msp_id: &'a str,
    discovery: DiscoveryOptions,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DiscoveryOptions {
    enabled: bool,
    as_localhost: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionResponse {
    session_id: String,
}

#[derive(Debug, Serialize)]
struct InvokeRequest<'a> {
    function: &'a str,
    args: &'a [String],
}

/// [`LedgerGateway`] reaching the network through an HTTP gateway service.
#[derive(Debug, Clone)]
pub struct HttpLedgerGateway {
    /// Explicit endpoint; derived from the profile's first peer when unset.
    gateway_url: Option<String>,
    /// Upper bound for any single HTTP exchange.
    request_timeout: Duration,
}

impl HttpLedgerGateway {
    pub fn new(gateway_url: Option<String>, request_timeout: Duration) -> Self {
        Self {
            gateway_url,
            request_timeout,
        }
    }

    /// Resolve the gateway base URL for `profile`.
    pub fn endpoint(&self, profile: &NetworkProfile, as_localhost: bool) -> GatewayResult<url::Url> {
        if let Some(explicit) = &self.gateway_url {
            return url::Url::parse(explicit)
                .map_err(|e| GatewayError::Config(format!("invalid gateway url '{}': {}", explicit, e)));
        }

        let peer = profile.peers.first().ok_or_else(|| {
            GatewayError::Config(format!(
                "profile for '{}' lists no peers and no gateway_url is configured",
                profile.organization
            ))
        })?;

        let mapped = if let Some(rest) = peer.url.strip_prefix("grpcs://") {
            format!("https://{}", rest)
        } else if let Some(rest) = peer.url.strip_prefix("grpc://") {
            format!("http://{}", rest)
        } else {
            peer.url.clone()
        };
        let mut url = url::Url::parse(&mapped)
            .map_err(|e| GatewayError::Config(format!("invalid peer url '{}': {}", peer.url, e)))?;
        if as_localhost {
            url.set_host(Some("localhost"))
                .map_err(|e| GatewayError::Config(format!("cannot rewrite host of '{}': {}", peer.url, e)))?;
        }
        Ok(url)
    }

    /// TLS server name the peer presents when it differs from `base`'s host.
    ///
    /// Only applies to endpoints derived from the profile; an explicit
    /// `gateway_url` is used exactly as configured.
    pub fn server_name_override<'a>(&self, profile: &'a NetworkProfile, base: &url::Url) -> Option<&'a str> {
        if self.gateway_url.is_some() {
            return None;
        }
        let name = profile.peers.first()?.ssl_target_name_override.as_deref()?;
        (base.host_str() != Some(name)).then_some(name)
    }

    fn http_client(
        &self,
        profile: &NetworkProfile,
        identity: &CredentialRecord,
        pinned: Option<(&str, SocketAddr)>,
    ) -> GatewayResult<reqwest::Client> {
        let client_identity =
            reqwest::Identity::from_pkcs8_pem(identity.certificate.as_bytes(), identity.private_key.as_bytes())
                .map_err(|e| GatewayError::Config(format!("unusable credential '{}': {}", identity.label, e)))?;

        let mut builder = reqwest::Client::builder()
            .timeout(self.request_timeout)
            .identity(client_identity);
        if let Some((name, addr)) = pinned {
            builder = builder.resolve(name, addr);
        }
        for pem in profile.peers.iter().flat_map(|p| p.tls_ca_certs.iter()) {
            let root = reqwest::Certificate::from_pem(pem.as_bytes())
                .map_err(|e| GatewayError::Config(format!("bad peer TLS root: {}", e)))?;
            builder = builder.add_root_certificate(root);
        }
        builder
            .build()
            .map_err(|e| GatewayError::Config(format!("cannot build HTTP client: {}", e)))
    }
}

#[async_trait]
impl LedgerGateway for HttpLedgerGateway {
    async fn connect(
        &self,
        profile: &NetworkProfile,
        identity: &CredentialRecord,
        options: ConnectOptions,
    ) -> GatewayResult<Box<dyn LedgerConnection>> {
        let mut base = self.endpoint(profile, options.as_localhost)?;
        let pinned = match self.server_name_override(profile, &base) {
            Some(name) => {
                let addr = pin_server_name(&mut base, name).await?;
                Some((name, addr))
            }
            None => None,
        };
        let session = Session {
            client: self.http_client(profile, identity, pinned)?,
            base,
            identity: identity.clone(),
            id: String::new(),
        };

        let body = serde_json::to_vec(&SessionRequest {
            msp_id: &identity.organization_id,
            discovery: DiscoveryOptions {
                enabled: options.discovery_enabled,
                as_localhost: options.as_localhost,
            },
        })
        .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;

        let bytes = session.send(Method::POST, &["v1", "sessions"], body).await?;
        let response: SessionResponse = serde_json::from_slice(&bytes)
            .map_err(|e| GatewayError::InvalidResponse(format!("bad session response: {}", e)))?;

        tracing::debug!(
            endpoint = %session.base,
            label = %identity.label,
            "Gateway session opened"
        );
        Ok(Box::new(HttpConnection {
            session: Arc::new(Session {
                id: response.session_id,
                ..session
            }),
        }))
    }
}

/// Address `base` by `server_name` while still dialing its original host.
///
/// Returns the socket address the name must resolve to.
async fn pin_server_name(base: &mut url::Url, server_name: &str) -> GatewayResult<SocketAddr> {
    let port = base
        .port_or_known_default()
        .ok_or_else(|| GatewayError::Config(format!("gateway url '{}' has no port", base)))?;
    let addr = match base.host() {
        Some(url::Host::Ipv4(ip)) => SocketAddr::new(ip.into(), port),
        Some(url::Host::Ipv6(ip)) => SocketAddr::new(ip.into(), port),
        Some(url::Host::Domain(host)) => tokio::net::lookup_host((host, port))
            .await
            .map_err(|e| GatewayError::Unreachable {
                endpoint: base.to_string(),
                message: format!("cannot resolve '{}': {}", host, e),
            })?
            .next()
            .ok_or_else(|| GatewayError::Unreachable {
                endpoint: base.to_string(),
                message: format!("'{}' resolved to no addresses", host),
            })?,
        None => return Err(GatewayError::Config(format!("gateway url '{}' has no host", base))),
    };

    base.set_host(Some(server_name)).map_err(|e| {
        GatewayError::Config(format!("invalid ssl-target-name-override '{}': {}", server_name, e))
    })?;
    tracing::debug!(server_name = %server_name, addr = %addr, "Pinned gateway TLS server name");
    Ok(addr)
}

/// State shared by a connection and the contract handles it hands out.
struct Session {
    client: reqwest::Client,
    base: url::Url,
    identity: CredentialRecord,
    id: String,
}

impl Session {
    fn url(&self, segments: &[&str]) -> GatewayResult<url::Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| GatewayError::Config(format!("gateway url '{}' cannot be a base", self.base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send(&self, method: Method, segments: &[&str], body: Vec<u8>) -> GatewayResult<Vec<u8>> {
        let url = self.url(segments)?;
        let token = auth_token(
            &self.identity.certificate,
            &self.identity.private_key,
            method.as_str(),
            url.path(),
            &body,
        )?;

        let mut request = self
            .client
            .request(method, url.clone())
            .header(AUTHORIZATION, token);
        if !self.id.is_empty() {
            request = request.header(SESSION_HEADER, &self.id);
        }
        if !body.is_empty() {
            request = request.header(CONTENT_TYPE, "application/json").body(body);
        }

        let response = request.send().await.map_err(|e| GatewayError::Unreachable {
            endpoint: url.to_string(),
            message: e.to_string(),
        })?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| GatewayError::Unreachable {
            endpoint: url.to_string(),
            message: e.to_string(),
        })?;

        if !status.is_success() {
            return Err(GatewayError::Rejected {
                status: status.as_u16(),
                message: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }
        Ok(bytes.to_vec())
    }
}

struct HttpConnection {
    session: Arc<Session>,
}

#[async_trait]
impl LedgerConnection for HttpConnection {
    fn contract(&self, channel: &str, contract: &str) -> Box<dyn Contract> {
        Box::new(HttpContract {
            session: self.session.clone(),
            channel: channel.to_string(),
            name: contract.to_string(),
        })
    }

    async fn disconnect(self: Box<Self>) -> GatewayResult<()> {
        let id = self.session.id.clone();
        self.session
            .send(Method::DELETE, &["v1", "sessions", &id], Vec::new())
            .await?;
        tracing::debug!(session = %id, "Gateway session closed");
        Ok(())
    }
}

struct HttpContract {
    session: Arc<Session>,
    channel: String,
    name: String,
}

impl HttpContract {
    async fn invoke(&self, action: &str, function: &str, args: &[String]) -> GatewayResult<Vec<u8>> {
        let body = serde_json::to_vec(&InvokeRequest { function, args })
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;
        self.session
            .send(
                Method::POST,
                &["v1", "channels", &self.channel, "contracts", &self.name, action],
                body,
            )
            .await
    }
}

#[async_trait]
impl Contract for HttpContract {
    async fn submit_transaction(&self, function: &str, args: &[String]) -> GatewayResult<Vec<u8>> {
        self.invoke("submit", function, args).await
    }

    async fn evaluate_transaction(&self, function: &str, args: &[String]) -> GatewayResult<Vec<u8>> {
        self.invoke("evaluate", function, args).await
    }
}
