//! Ambient plumbing shared by tfagate crates.
//!
//! Environment config loading, the generic JSON error type, health probes,
//! request-id propagation and tracing initialisation.

pub mod config;
pub mod error;
pub mod health;
pub mod middleware;
pub mod tracing;
