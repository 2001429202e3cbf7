//! Transaction gateway client.
//!
//! # Responsibilities
//! - Resolve the caller's credential before touching the network
//! - Run exactly one connect → invoke → disconnect cycle per call
//! - Bound each phase with its own timeout
//!
//! # Design Decisions
//! - No pooling, reuse or retries; errors are returned with their stage
//! - The connection is closed whatever the invocation outcome, even when the
//!   caller stops waiting for the result

use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tracing::Instrument;

use crate::config::LedgerConfig;
use crate::ledger::gateway::{ConnectOptions, LedgerGateway};
use crate::ledger::types::{CallError, CallMode, CallResult, CallStage, TransactionRequest};
use crate::observability::metrics;
use crate::profile::{NetworkProfile, ProfileLoader};
use crate::wallet::{CredentialRecord, IdentityStore, WalletError};

/// Makes ledger calls as identities held in an [`IdentityStore`].
pub struct TransactionClient {
    profiles: Arc<ProfileLoader>,
    store: Arc<dyn IdentityStore>,
    gateway: Arc<dyn LedgerGateway>,
    config: LedgerConfig,
}

impl TransactionClient {
    pub fn new(
        profiles: Arc<ProfileLoader>,
        store: Arc<dyn IdentityStore>,
        gateway: Arc<dyn LedgerGateway>,
        config: LedgerConfig,
    ) -> Self {
        Self {
            profiles,
            store,
            gateway,
            config,
        }
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Build a request for the configured channel, contract and identity.
    pub fn request(&self, function: &str, argument_payload: impl Into<String>) -> TransactionRequest {
        TransactionRequest {
            identity_label: self.config.identity.clone(),
            channel_name: self.config.channel.clone(),
            contract_name: self.config.contract.clone(),
            function_name: function.to_string(),
            argument_payload: argument_payload.into(),
        }
    }

    /// Invoke `request.function_name` and return its raw result.
    #[tracing::instrument(
        skip(self, request),
        fields(
            label = %request.identity_label,
            channel = %request.channel_name,
            function = %request.function_name,
            mode = %mode
        )
    )]
    pub async fn call(&self, request: &TransactionRequest, mode: CallMode) -> CallResult<Vec<u8>> {
        let start = Instant::now();
        let result = self.call_inner(request, mode).await;

        let outcome = match &result {
            Ok(_) => "ok",
            Err(e) => e.kind(),
        };
        metrics::record_call(&request.function_name, mode.as_str(), outcome, start);
        match &result {
            Ok(bytes) => tracing::info!(
                bytes = bytes.len(),
                elapsed_ms = start.elapsed().as_millis() as u64,
                "Ledger call completed"
            ),
            Err(e) => tracing::warn!(error = %e, kind = e.kind(), "Ledger call failed"),
        }
        result
    }

    async fn call_inner(&self, request: &TransactionRequest, mode: CallMode) -> CallResult<Vec<u8>> {
        let profile = self.profiles.load(&self.config.organization).await?;

        let identity = match self.store.get(&request.identity_label).await {
            Ok(record) => record,
            Err(WalletError::NotFound(label)) => return Err(CallError::IdentityNotFound(label)),
            Err(e) => return Err(CallError::Store(e)),
        };

        // The session runs on its own task so a dropped caller cannot skip
        // the disconnect.
        let session = CallSession {
            gateway: self.gateway.clone(),
            profile,
            identity,
            request: request.clone(),
            mode,
            options: ConnectOptions {
                discovery_enabled: self.config.discovery_enabled,
                as_localhost: self.config.as_localhost,
            },
            connect_secs: self.config.connect_timeout_secs,
            invoke_secs: self.config.invoke_timeout_secs,
            disconnect_secs: self.config.disconnect_timeout_secs,
        };
        match tokio::spawn(session.run().in_current_span()).await {
            Ok(result) => result,
            Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
            Err(_) => Err(CallError::Aborted),
        }
    }
}

/// Everything one connect → invoke → disconnect cycle needs, owned.
struct CallSession {
    gateway: Arc<dyn LedgerGateway>,
    profile: Arc<NetworkProfile>,
    identity: CredentialRecord,
    request: TransactionRequest,
    mode: CallMode,
    options: ConnectOptions,
    connect_secs: u64,
    invoke_secs: u64,
    disconnect_secs: u64,
}

impl CallSession {
    async fn run(self) -> CallResult<Vec<u8>> {
        let request = &self.request;
        let connection = match timeout(
            Duration::from_secs(self.connect_secs),
            self.gateway.connect(&self.profile, &self.identity, self.options),
        )
        .await
        {
            Ok(Ok(connection)) => connection,
            Ok(Err(e)) => return Err(CallError::ConnectFailed(e)),
            Err(_) => {
                return Err(CallError::Timeout {
                    stage: CallStage::Connect,
                    secs: self.connect_secs,
                })
            }
        };
        metrics::connection_opened();

        let contract = connection.contract(&request.channel_name, &request.contract_name);
        let args = [request.argument_payload.clone()];
        let invoked = timeout(Duration::from_secs(self.invoke_secs), async {
            match self.mode {
                CallMode::Submit => contract.submit_transaction(&request.function_name, &args).await,
                CallMode::Evaluate => contract.evaluate_transaction(&request.function_name, &args).await,
            }
        })
        .await;
        drop(contract);

        match timeout(Duration::from_secs(self.disconnect_secs), connection.disconnect()).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::warn!(error = %e, "Ledger disconnect failed"),
            Err(_) => tracing::warn!(secs = self.disconnect_secs, "Ledger disconnect timed out"),
        }
        metrics::connection_closed();

        match invoked {
            Ok(Ok(bytes)) => Ok(bytes),
            Ok(Err(source)) => Err(CallError::ContractInvocationFailed {
                function: request.function_name.clone(),
                source,
            }),
            Err(_) => Err(CallError::Timeout {
                stage: CallStage::Invoke,
                secs: self.invoke_secs,
            }),
        }
    }
}
