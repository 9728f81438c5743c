use axum::http::StatusCode;

/// `GET /healthz`: liveness. Never touches a backend.
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}
