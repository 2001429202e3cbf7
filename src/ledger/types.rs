//! Transaction request types and error definitions.

use std::fmt;
use thiserror::Error;

use crate::crypto::CryptoError;
use crate::profile::ProfileError;
use crate::wallet::WalletError;

/// One contract invocation made under a stored identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRequest {
    /// Wallet label of the identity the call is made as.
    pub identity_label: String,
    pub channel_name: String,
    pub contract_name: String,
    pub function_name: String,
    /// Opaque single argument, passed through untouched.
    pub argument_payload: String,
}

/// How the contract function is invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallMode {
    /// Endorse, order and commit; changes ledger state.
    Submit,
    /// Run against one peer's state; no ledger change.
    Evaluate,
}

impl CallMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Submit => "submit",
            Self::Evaluate => "evaluate",
        }
    }
}

impl fmt::Display for CallMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Phase of a call that ran out of time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallStage {
    Connect,
    Invoke,
}

impl CallStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Connect => "connect",
            Self::Invoke => "invoke",
        }
    }
}

impl fmt::Display for CallStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised by a [`LedgerGateway`](crate::ledger::LedgerGateway)
/// implementation.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("gateway unreachable at {endpoint}: {message}")]
    Unreachable { endpoint: String, message: String },

    /// The gateway answered with an error (endorsement failure, contract error).
    #[error("gateway rejected the request (HTTP {status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("invalid gateway response: {0}")]
    InvalidResponse(String),

    /// Endpoint or TLS material cannot be used.
    #[error("invalid gateway configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Crypto(#[from] CryptoError),
}

/// Result type for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Errors returned by [`TransactionClient::call`](crate::ledger::TransactionClient::call).
#[derive(Debug, Error)]
pub enum CallError {
    /// The configured organization's profile is missing or unusable.
    #[error(transparent)]
    Config(#[from] ProfileError),

    /// No credential is stored under the requested label.
    #[error("identity '{0}' is not enrolled; register it before making calls")]
    IdentityNotFound(String),

    /// The identity store failed while reading the credential.
    #[error(transparent)]
    Store(WalletError),

    #[error("failed to connect to the ledger gateway: {0}")]
    ConnectFailed(#[source] GatewayError),

    #[error("contract function '{function}' failed: {source}")]
    ContractInvocationFailed {
        function: String,
        #[source]
        source: GatewayError,
    },

    #[error("ledger {stage} timed out after {secs} seconds")]
    Timeout { stage: CallStage, secs: u64 },

    /// The call's task was cancelled, which only happens on runtime shutdown.
    #[error("ledger call aborted before completing")]
    Aborted,
}

impl CallError {
    /// Short machine-readable kind, used in metrics and error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::IdentityNotFound(_) => "identity_not_found",
            Self::Store(_) => "store",
            Self::ConnectFailed(_) => "connect_failed",
            Self::ContractInvocationFailed { .. } => "contract_invocation_failed",
            Self::Timeout { .. } => "timeout",
            Self::Aborted => "aborted",
        }
    }

    /// Lifecycle stage the error belongs to, when there is one.
    pub fn stage(&self) -> Option<CallStage> {
        match self {
            Self::ConnectFailed(_) => Some(CallStage::Connect),
            Self::ContractInvocationFailed { .. } => Some(CallStage::Invoke),
            Self::Timeout { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

/// Result type for ledger calls.
pub type CallResult<T> = Result<T, CallError>;
