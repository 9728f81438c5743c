//! Typed session state and the request-scoped handle handlers work with.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::extract::FromRequestParts;
use axum::http::{HeaderValue, StatusCode, header::LOCATION};
use axum::response::{IntoResponse, Response};
use http::request::Parts;
use serde::{Deserialize, Serialize};

use tfagate_core::error::AppError;
use tfagate_domain::id::Principal;

/// Where unauthenticated requests are sent.
pub const ENTRY_PATH: &str = "/";

/// Severity of a one-shot notice shown on the next rendered page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlashKind {
    Success,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashMessage {
    pub kind: FlashKind,
    pub text: String,
}

impl FlashMessage {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Success,
            text: text.into(),
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Warning,
            text: text.into(),
        }
    }
}

/// Persisted form of a session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionData {
    /// Set by first-factor login. `None` means the visitor is not logged in.
    pub user_id: Option<Principal>,
    /// The second factor is still owed before protected routes are reachable.
    #[serde(default)]
    pub must_verify_2fa: bool,
    #[serde(default)]
    pub messages: Vec<FlashMessage>,
}

/// Returned when a gate entry point runs without a logged-in principal.
///
/// Responds with a redirect to the entry page; a default identity is never substituted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("no principal in session")]
pub struct Unauthenticated;

impl IntoResponse for Unauthenticated {
    fn into_response(self) -> Response {
        redirect_found(ENTRY_PATH)
    }
}

/// `302 Found` to `location`.
pub fn redirect_found(location: &'static str) -> Response {
    (
        StatusCode::FOUND,
        [(LOCATION, HeaderValue::from_static(location))],
    )
        .into_response()
}

#[derive(Debug)]
struct Inner {
    data: SessionData,
    dirty: bool,
}

/// Request-scoped view of the session.
///
/// Cloning shares the same state. Mutations are recorded so the session layer
/// knows whether to write the session back once the handler has returned.
#[derive(Debug, Clone)]
pub struct Session {
    inner: Arc<Mutex<Inner>>,
}

impl Session {
    pub fn new(data: SessionData) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner { data, dirty: false })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn principal(&self) -> Option<Principal> {
        self.lock().data.user_id
    }

    /// Resolve the logged-in principal or fail with [`Unauthenticated`].
    pub fn require_principal(&self) -> Result<Principal, Unauthenticated> {
        self.principal().ok_or(Unauthenticated)
    }

    /// Owned by first-factor login; exposed for hosts and tests.
    pub fn set_principal(&self, principal: Principal) {
        let mut inner = self.lock();
        inner.data.user_id = Some(principal);
        inner.dirty = true;
    }

    pub fn must_verify(&self) -> bool {
        self.lock().data.must_verify_2fa
    }

    /// Owned by first-factor login; exposed for hosts and tests.
    pub fn mark_must_verify(&self) {
        let mut inner = self.lock();
        inner.data.must_verify_2fa = true;
        inner.dirty = true;
    }

    pub fn clear_must_verify(&self) {
        let mut inner = self.lock();
        if inner.data.must_verify_2fa {
            inner.data.must_verify_2fa = false;
            inner.dirty = true;
        }
    }

    pub fn push_message(&self, message: FlashMessage) {
        let mut inner = self.lock();
        inner.data.messages.push(message);
        inner.dirty = true;
    }

    /// Drain pending notices for rendering.
    pub fn take_messages(&self) -> Vec<FlashMessage> {
        let mut inner = self.lock();
        if inner.data.messages.is_empty() {
            return Vec::new();
        }
        inner.dirty = true;
        std::mem::take(&mut inner.data.messages)
    }

    pub fn is_dirty(&self) -> bool {
        self.lock().dirty
    }

    pub fn snapshot(&self) -> SessionData {
        self.lock().data.clone()
    }
}

impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = AppError;

    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let session = parts.extensions.get::<Session>().cloned();
        async move {
            session.ok_or_else(|| AppError::Internal(anyhow::anyhow!("session layer not installed")))
        }
    }
}
