//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Environment variable overriding `ca.bootstrap_secret`.
pub const BOOTSTRAP_SECRET_ENV_VAR: &str = "LC_GATEWAY_CA_BOOTSTRAP_SECRET";

/// Root configuration for the LC gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// HTTP facade listener (bind address, TLS).
    pub listener: ListenerConfig,

    /// Identity store location.
    pub wallet: WalletConfig,

    /// Where connection profiles live.
    pub network: NetworkConfig,

    /// Certificate authority bootstrap settings.
    pub ca: CaConfig,

    /// Transaction gateway settings.
    pub ledger: LedgerConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:4000").
    pub bind_address: String,

    /// Optional TLS configuration.
    pub tls: Option<TlsConfig>,

    /// Total time allowed for one HTTP request, in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:4000".to_string(),
            tls: None,
            request_timeout_secs: 120,
        }
    }
}

/// TLS configuration for the listener.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TlsConfig {
    /// Path to certificate file (PEM).
    pub cert_path: String,

    /// Path to private key file (PEM).
    pub key_path: String,
}

/// File-system wallet configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WalletConfig {
    /// Directory holding one `<label>.id` file per identity.
    pub path: PathBuf,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("wallet"),
        }
    }
}

/// Connection profile lookup.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Root of the `peerOrganizations` tree produced by the network scripts.
    pub profiles_dir: PathBuf,

    /// DNS domain the organizations live under (`<org>.<domain>`).
    pub domain: String,

    /// Explicit profile paths per organization; these win over `profiles_dir`.
    pub profiles: HashMap<String, PathBuf>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            profiles_dir: PathBuf::from("hlf-network/organizations"),
            domain: "example.com".to_string(),
            profiles: HashMap::new(),
        }
    }
}

/// Certificate authority configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CaConfig {
    /// Enrollment ID of the CA's bootstrap registrar.
    pub bootstrap_enrollment_id: String,

    /// Secret of the bootstrap registrar. Prefer the
    /// `LC_GATEWAY_CA_BOOTSTRAP_SECRET` environment variable.
    pub bootstrap_secret: String,

    /// Timeout for each CA request in seconds.
    pub request_timeout_secs: u64,
}

impl Default for CaConfig {
    fn default() -> Self {
        Self {
            bootstrap_enrollment_id: "admin".to_string(),
            // Fabric CA sample default; override via environment in real deployments.
            bootstrap_secret: "adminpw".to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl CaConfig {
    /// The bootstrap secret, taking the environment override into account.
    pub fn resolved_bootstrap_secret(&self) -> String {
        std::env::var(BOOTSTRAP_SECRET_ENV_VAR).unwrap_or_else(|_| self.bootstrap_secret.clone())
    }
}

/// Transaction gateway configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Organization whose connection profile is used for calls.
    pub organization: String,

    /// Wallet label the HTTP facade acts under.
    pub identity: String,

    /// Channel the contract is deployed to.
    pub channel: String,

    /// Contract (chaincode) name.
    pub contract: String,

    /// Gateway endpoint; derived from the organization's first peer when unset.
    pub gateway_url: Option<String>,

    /// Let the gateway discover endorsers instead of using a static peer list.
    pub discovery_enabled: bool,

    /// Map discovered container host names to localhost.
    pub as_localhost: bool,

    /// Connection establishment timeout in seconds.
    pub connect_timeout_secs: u64,

    /// Submit/evaluate timeout in seconds.
    pub invoke_timeout_secs: u64,

    /// Session teardown timeout in seconds.
    pub disconnect_timeout_secs: u64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            organization: "buyer".to_string(),
            identity: "BuyerUser".to_string(),
            channel: "mychannel".to_string(),
            contract: "tfbc".to_string(),
            gateway_url: None,
            discovery_enabled: true,
            as_localhost: true,
            connect_timeout_secs: 10,
            invoke_timeout_secs: 60,
            disconnect_timeout_secs: 10,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
