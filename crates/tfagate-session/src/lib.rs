//! Typed web session for the second-factor gate.
//!
//! The host application keeps an opaque session per browser; this crate gives the
//! gate a typed view of the two facts it needs (who is logged in, and whether the
//! second factor is still owed), the middleware that loads and persists it, and
//! the `ClientIp` extractor used to bind challenge tokens to an address.

pub mod client_ip;
pub mod cookie;
pub mod layer;
pub mod session;
pub mod store;
