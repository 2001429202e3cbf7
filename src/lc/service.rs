//! LC service.

use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

use crate::ledger::{CallError, CallMode, TransactionClient};

/// Acknowledgement returned by the submit operations.
pub const SUBMITTED_MESSAGE: &str = "Transaction has been submitted successfully";

const REQUEST_LC: &str = "requestLC";
const ISSUE_LC: &str = "issueLC";
const ACCEPT_LC: &str = "acceptLC";
const GET_LC: &str = "getLC";
const GET_LC_HISTORY: &str = "getLCHistory";

#[derive(Debug, Error)]
pub enum LcError {
    #[error(transparent)]
    Call(#[from] CallError),

    /// A query returned bytes that are not JSON.
    #[error("'{function}' returned a result that is not JSON: {source}")]
    UndecodableResult {
        function: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

pub type LcResult<T> = Result<T, LcError>;

/// The five LC operations.
#[derive(Clone)]
pub struct LcService {
    client: Arc<TransactionClient>,
}

impl LcService {
    pub fn new(client: Arc<TransactionClient>) -> Self {
        Self { client }
    }

    pub async fn request_lc(&self, body: &Value) -> LcResult<()> {
        self.submit(REQUEST_LC, body).await
    }

    pub async fn issue_lc(&self, body: &Value) -> LcResult<()> {
        self.submit(ISSUE_LC, body).await
    }

    pub async fn accept_lc(&self, body: &Value) -> LcResult<()> {
        self.submit(ACCEPT_LC, body).await
    }

    pub async fn get_lc(&self, lc_id: &str) -> LcResult<Value> {
        self.evaluate(GET_LC, lc_id).await
    }

    pub async fn get_lc_history(&self, lc_id: &str) -> LcResult<Value> {
        self.evaluate(GET_LC_HISTORY, lc_id).await
    }

    async fn submit(&self, function: &'static str, body: &Value) -> LcResult<()> {
        let request = self.client.request(function, body.to_string());
        self.client.call(&request, CallMode::Submit).await?;
        Ok(())
    }

    async fn evaluate(&self, function: &'static str, lc_id: &str) -> LcResult<Value> {
        let request = self.client.request(function, lc_id);
        let bytes = self.client.call(&request, CallMode::Evaluate).await?;
        serde_json::from_slice(&bytes).map_err(|source| LcError::UndecodableResult { function, source })
    }
}
