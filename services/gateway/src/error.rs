use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use tfagate_session::session::Unauthenticated;

/// Gateway service error variants.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("not logged in")]
    Unauthenticated,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl GatewayError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl From<Unauthenticated> for GatewayError {
    fn from(_: Unauthenticated) -> Self {
        Self::Unauthenticated
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        match self {
            Self::Unauthenticated => Unauthenticated.into_response(),
            Self::Internal(ref e) => {
                // Storage failures end here; log the anyhow chain so the cause is traceable.
                tracing::error!(error = ?e, kind = "INTERNAL", "internal error");
                let body = serde_json::json!({
                    "kind": self.kind(),
                    "message": self.to_string(),
                });
                (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(body)).into_response()
            }
        }
    }
}
