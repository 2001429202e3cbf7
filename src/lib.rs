//! Letter-of-credit ledger gateway library.

pub mod ca;
pub mod config;
pub mod crypto;
pub mod enrollment;
pub mod http;
pub mod lc;
pub mod ledger;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod profile;
pub mod wallet;

pub use config::schema::GatewayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
