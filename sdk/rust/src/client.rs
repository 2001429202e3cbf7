use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Acknowledgement returned by the submit routes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitReceipt {
    pub message: String,
    pub function: String,
}

/// Structured error body returned by the gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub error: String,
    #[serde(default)]
    pub stage: Option<String>,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The gateway answered with a non-success status.
    #[error("gateway returned {status}: {body}")]
    Api { status: StatusCode, body: String },
}

impl SdkError {
    /// The structured error body, when the gateway sent one.
    pub fn api_error(&self) -> Option<ApiErrorBody> {
        match self {
            Self::Api { body, .. } => serde_json::from_str(body).ok(),
            Self::Http(_) => None,
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Http(e) => e.status(),
        }
    }
}

pub struct LcClient {
    client: Client,
    base_url: String,
}

impl LcClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Submit a new letter-of-credit request.
    pub async fn request_lc(&self, lc: &Value) -> Result<SubmitReceipt, SdkError> {
        self.post("/requestLC", lc).await
    }

    pub async fn issue_lc(&self, lc: &Value) -> Result<SubmitReceipt, SdkError> {
        self.post("/issueLC", lc).await
    }

    pub async fn accept_lc(&self, lc: &Value) -> Result<SubmitReceipt, SdkError> {
        self.post("/acceptLC", lc).await
    }

    /// Current state of one LC.
    pub async fn get_lc(&self, lc_id: &str) -> Result<Value, SdkError> {
        self.post("/getLC", &serde_json::json!({ "lcId": lc_id })).await
    }

    pub async fn get_lc_history(&self, lc_id: &str) -> Result<Value, SdkError> {
        self.post("/getLCHistory", &serde_json::json!({ "lcId": lc_id })).await
    }

    async fn post<T: serde::de::DeserializeOwned>(&self, path: &str, body: &Value) -> Result<T, SdkError> {
        let resp = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .json(body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await?;
            return Err(SdkError::Api { status, body });
        }
        Ok(resp.json().await?)
    }
}
