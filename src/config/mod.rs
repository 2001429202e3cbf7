//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! lc-gateway.toml (path from LC_GATEWAY_CONFIG)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → GatewayConfig (validated, immutable)
//!     → handed by value/Arc to each component's constructor
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; no hot reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - No process-global state: the wallet path, profile locations and
//!   bootstrap credentials are threaded into components explicitly

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_or_default, ConfigError, CONFIG_PATH_ENV_VAR, DEFAULT_CONFIG_PATH};
pub use schema::{
    CaConfig, GatewayConfig, LedgerConfig, ListenerConfig, NetworkConfig, ObservabilityConfig,
    TlsConfig, WalletConfig,
};
