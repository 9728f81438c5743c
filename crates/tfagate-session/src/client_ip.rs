//! Client address extractor.

use std::net::{IpAddr, SocketAddr};

use axum::extract::{ConnectInfo, FromRequestParts};
use http::request::Parts;

use tfagate_core::error::AppError;

const X_FORWARDED_FOR: &str = "x-forwarded-for";
const X_REAL_IP: &str = "x-real-ip";

/// Address a challenge token is bound to.
///
/// Resolution order: first hop of `X-Forwarded-For`, then `X-Real-IP`, then the
/// socket peer (requires `into_make_service_with_connect_info`). Rejects with 400
/// when none is available.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientIp(pub IpAddr);

fn header_ip(parts: &Parts, name: &str) -> Option<IpAddr> {
    let raw = parts.headers.get(name)?.to_str().ok()?;
    raw.split(',').next()?.trim().parse().ok()
}

fn resolve(parts: &Parts) -> Option<IpAddr> {
    header_ip(parts, X_FORWARDED_FOR)
        .or_else(|| header_ip(parts, X_REAL_IP))
        .or_else(|| {
            parts
                .extensions
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.ip())
        })
}

impl<S> FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = AppError;

    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let ip = resolve(parts);
        async move { ip.map(ClientIp).ok_or(AppError::BadRequest) }
    }
}
