//! Network profile subsystem.
//!
//! # Data Flow
//! ```text
//! connection-<org>.json (Fabric connection profile)
//!     → loader.rs (locate, read, cache per organization)
//!     → parser.rs (extract MSP id, CA, peers; reject missing CA fields)
//!     → Arc<NetworkProfile> (immutable, shared by enrollment and calls)
//! ```

pub mod loader;
pub mod parser;
pub mod types;

pub use loader::ProfileLoader;
pub use parser::parse_profile;
pub use types::{CaInfo, NetworkProfile, PeerInfo, ProfileError, ProfileResult};
