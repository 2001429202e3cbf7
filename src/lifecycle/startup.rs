//! Startup orchestration.
//!
//! # Responsibilities
//! - Load and validate configuration
//! - Initialize subsystems in dependency order
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Subsystems initialize in order, not concurrently
//! - Listeners start last (traffic only when ready)

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::ca::FabricCaClient;
use crate::config::{GatewayConfig, CONFIG_PATH_ENV_VAR, DEFAULT_CONFIG_PATH};
use crate::enrollment::EnrollmentService;
use crate::lc::LcService;
use crate::ledger::{HttpLedgerGateway, TransactionClient};
use crate::profile::ProfileLoader;
use crate::wallet::{FileSystemWallet, IdentityStore};

/// Config path from `LC_GATEWAY_CONFIG`, else the default.
pub fn config_path(explicit: Option<PathBuf>) -> PathBuf {
    explicit
        .or_else(|| std::env::var_os(CONFIG_PATH_ENV_VAR).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// Components shared by the gateway binaries.
pub struct Components {
    pub store: Arc<dyn IdentityStore>,
    pub profiles: Arc<ProfileLoader>,
}

impl Components {
    pub fn new(config: &GatewayConfig) -> Self {
        tracing::info!(path = %config.wallet.path.display(), "Using file-system wallet");
        Self {
            store: Arc::new(FileSystemWallet::new(config.wallet.path.clone())),
            profiles: Arc::new(ProfileLoader::new(config.network.clone())),
        }
    }

    /// Enrollment service talking to the Fabric CA.
    pub fn enrollment(&self, config: &GatewayConfig) -> EnrollmentService {
        let ca = Arc::new(FabricCaClient::new(Duration::from_secs(config.ca.request_timeout_secs)));
        EnrollmentService::new(self.store.clone(), self.profiles.clone(), ca, config.ca.clone())
    }

    /// LC service calling through the HTTP ledger gateway.
    pub fn lc_service(&self, config: &GatewayConfig) -> LcService {
        let ledger = &config.ledger;
        let gateway = Arc::new(HttpLedgerGateway::new(
            ledger.gateway_url.clone(),
            // Each phase has its own deadline in the transaction client; this
            // only bounds a single exchange.
            Duration::from_secs(
                ledger
                    .connect_timeout_secs
                    .max(ledger.invoke_timeout_secs)
                    .max(ledger.disconnect_timeout_secs),
            ),
        ));
        let client = TransactionClient::new(
            self.profiles.clone(),
            self.store.clone(),
            gateway,
            ledger.clone(),
        );
        LcService::new(Arc::new(client))
    }
}
