use axum::{extract::Request, middleware::Next, response::Response};

use tfagate_session::session::{FlashMessage, Session, redirect_found};

use crate::domain::gate::{GATEWAY_PATH, GateDecision, decide};
use crate::domain::types::MSG_CHALLENGE_REQUIRED;

/// Holds every request of a session that still owes the second factor at the
/// gateway, except for the allow-listed paths and static assets.
///
/// Must run inside the session layer.
pub async fn two_factor_lock(session: Session, request: Request, next: Next) -> Response {
    match decide(session.must_verify(), request.uri().path()) {
        GateDecision::Allow => next.run(request).await,
        GateDecision::Deny => {
            tracing::debug!(path = %request.uri().path(), "request held at second-factor gate");
            session.push_message(FlashMessage::warning(MSG_CHALLENGE_REQUIRED));
            redirect_found(GATEWAY_PATH)
        }
    }
}
