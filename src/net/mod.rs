//! Network layer subsystem.
//!
//! The HTTP facade listens on plain TCP, or on TLS when
//! `listener.tls` is configured (tls.rs).

pub mod tls;
