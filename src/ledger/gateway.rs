//! Ledger handle traits.
//!
//! A call walks three handles: the gateway opens a connection for one
//! identity, the connection hands out contract handles, and the contract
//! runs transactions. Each connection is closed with `disconnect`.

use async_trait::async_trait;

use crate::ledger::types::GatewayResult;
use crate::profile::NetworkProfile;
use crate::wallet::CredentialRecord;

/// Options applied when opening a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectOptions {
    /// Let the gateway discover endorsing peers.
    pub discovery_enabled: bool,
    /// Rewrite discovered host names to localhost.
    pub as_localhost: bool,
}

impl Default for ConnectOptions {
    fn default() -> Self {
        Self {
            discovery_enabled: true,
            as_localhost: true,
        }
    }
}

/// Opens ledger connections.
#[async_trait]
pub trait LedgerGateway: Send + Sync {
    async fn connect(
        &self,
        profile: &NetworkProfile,
        identity: &CredentialRecord,
        options: ConnectOptions,
    ) -> GatewayResult<Box<dyn LedgerConnection>>;
}

/// An open connection acting as one identity.
#[async_trait]
pub trait LedgerConnection: Send + Sync {
    /// Handle for `contract` deployed on `channel`.
    fn contract(&self, channel: &str, contract: &str) -> Box<dyn Contract>;

    /// Release the connection.
    async fn disconnect(self: Box<Self>) -> GatewayResult<()>;
}

/// A deployed contract.
#[async_trait]
pub trait Contract: Send + Sync {
    /// Endorse, order and commit; returns the function's result.
    async fn submit_transaction(&self, function: &str, args: &[String]) -> GatewayResult<Vec<u8>>;

    /// Read-only query; returns the function's result.
    async fn evaluate_transaction(&self, function: &str, args: &[String]) -> GatewayResult<Vec<u8>>;
}
