//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Check that the configured identity is a usable wallet label
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use crate::config::schema::GatewayConfig;
use crate::wallet::validate_label;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }
    if config.listener.request_timeout_secs == 0 {
        errors.push(ValidationError::new("listener.request_timeout_secs", "must be > 0"));
    }

    if config.wallet.path.as_os_str().is_empty() {
        errors.push(ValidationError::new("wallet.path", "must not be empty"));
    }

    if config.network.domain.trim().is_empty() {
        errors.push(ValidationError::new("network.domain", "must not be empty"));
    }

    if config.ca.bootstrap_enrollment_id.trim().is_empty() {
        errors.push(ValidationError::new("ca.bootstrap_enrollment_id", "must not be empty"));
    }
    if config.ca.request_timeout_secs == 0 {
        errors.push(ValidationError::new("ca.request_timeout_secs", "must be > 0"));
    }

    let ledger = &config.ledger;
    for (field, value) in [
        ("ledger.organization", &ledger.organization),
        ("ledger.channel", &ledger.channel),
        ("ledger.contract", &ledger.contract),
    ] {
        if value.trim().is_empty() {
            errors.push(ValidationError::new(field, "must not be empty"));
        }
    }
    if let Err(e) = validate_label(&ledger.identity) {
        errors.push(ValidationError::new("ledger.identity", e.to_string()));
    }
    if let Some(gateway_url) = &ledger.gateway_url {
        if let Err(e) = url::Url::parse(gateway_url) {
            errors.push(ValidationError::new(
                "ledger.gateway_url",
                format!("'{}' is not a URL: {}", gateway_url, e),
            ));
        }
    }
    if ledger.connect_timeout_secs == 0 {
        errors.push(ValidationError::new("ledger.connect_timeout_secs", "must be > 0"));
    }
    if ledger.invoke_timeout_secs == 0 {
        errors.push(ValidationError::new("ledger.invoke_timeout_secs", "must be > 0"));
    }

    if ledger.disconnect_timeout_secs == 0 {
        errors.push(ValidationError::new("ledger.disconnect_timeout_secs", "must be > 0"));
    }

    // The facade must not give up on a call the ledger client is still running.
    let call_budget =
        ledger.connect_timeout_secs + ledger.invoke_timeout_secs + ledger.disconnect_timeout_secs;
    if config.listener.request_timeout_secs != 0 && config.listener.request_timeout_secs <= call_budget {
        errors.push(ValidationError::new(
            "listener.request_timeout_secs",
            format!(
                "must exceed ledger connect + invoke + disconnect timeouts ({})",
                call_budget
            ),
        ));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
