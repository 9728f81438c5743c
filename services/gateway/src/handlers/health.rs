use axum::extract::State;
use axum::http::StatusCode;

use crate::state::AppState;

/// `GET /readyz`: ready once the token store answers.
pub async fn readyz(State(state): State<AppState>) -> StatusCode {
    match state.db.ping().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "readiness probe: database unreachable");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
