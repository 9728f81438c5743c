//! Request-path policy for sessions that still owe the second factor.
//!
//! Pure and synchronous: it reads only the session flag and the path, so it can
//! run in front of every protected route without touching storage.

/// Challenge page.
pub const GATEWAY_PATH: &str = "/2fa_gateway";
/// Code submission endpoint.
pub const VERIFY_PATH: &str = "/2fa_gateway/verify";
/// Manual reset endpoint.
pub const CLEAR_PATH: &str = "/2fa_gateway/clear";
/// Host logout route; always reachable.
pub const LOGOUT_PATH: &str = "/logout";
/// Static assets are never gated.
pub const STATIC_PREFIX: &str = "/static/";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Allow,
    /// Redirect to [`GATEWAY_PATH`] with a warning.
    Deny,
}

fn is_allow_listed(path: &str) -> bool {
    matches!(path, LOGOUT_PATH | GATEWAY_PATH | VERIFY_PATH | CLEAR_PATH)
}

pub fn decide(must_verify: bool, path: &str) -> GateDecision {
    if !must_verify || path.starts_with(STATIC_PREFIX) || is_allow_listed(path) {
        GateDecision::Allow
    } else {
        GateDecision::Deny
    }
}
