//! Middleware that scopes a [`Session`] to one request.
//!
//! The session is loaded before the inner service runs and written back after it
//! returns, whatever the status, so flag changes made by handlers or by the gate
//! are never lost on an early-return path.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::CookieJar;
use rand::RngExt;

use tfagate_core::error::AppError;

use crate::cookie::{SESSION_COOKIE, SessionCookieConfig, set_session_cookie};
use crate::session::{Session, SessionData};
use crate::store::SessionStore;

/// Session id length in characters.
pub const SESSION_ID_LEN: usize = 32;

const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

pub fn new_session_id() -> String {
    let mut rng = rand::rng();
    (0..SESSION_ID_LEN)
        .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
        .collect()
}

/// State for [`session_layer`].
#[derive(Debug, Clone)]
pub struct SessionManager<S> {
    pub store: S,
    pub cookie: SessionCookieConfig,
}

impl<S: SessionStore> SessionManager<S> {
    pub fn new(store: S, cookie: SessionCookieConfig) -> Self {
        Self { store, cookie }
    }
}

/// Apply with `axum::middleware::from_fn_with_state(manager, session_layer::<S>)`.
pub async fn session_layer<S>(
    State(manager): State<SessionManager<S>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response
where
    S: SessionStore,
{
    let existing = jar.get(SESSION_COOKIE).map(|c| c.value().to_owned());

    let loaded = match &existing {
        Some(id) => match manager.store.load(id).await {
            Ok(data) => data,
            Err(e) => return AppError::Internal(anyhow::Error::new(e).context("load session")).into_response(),
        },
        None => None,
    };

    let (id, data, fresh) = match (existing, loaded) {
        (Some(id), Some(data)) => (id, data, false),
        // Unknown or expired ids are replaced rather than adopted.
        (Some(_), None) => {
            tracing::debug!("unknown session id replaced");
            (new_session_id(), SessionData::default(), true)
        }
        (None, _) => (new_session_id(), SessionData::default(), true),
    };

    let session = Session::new(data);
    request.extensions_mut().insert(session.clone());

    let response = next.run(request).await;

    if !session.is_dirty() {
        return response;
    }

    if let Err(e) = manager.store.save(&id, &session.snapshot()).await {
        return AppError::Internal(anyhow::Error::new(e).context("save session")).into_response();
    }

    if fresh {
        let jar = set_session_cookie(CookieJar::new(), id, &manager.cookie);
        return (jar, response).into_response();
    }

    response
}
