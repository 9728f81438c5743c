use axum::{
    Router,
    middleware::{from_fn, from_fn_with_state},
    routing::get,
};
use tower_http::trace::TraceLayer;

use tfagate_core::health::healthz;
use tfagate_core::middleware::{propagate_request_id_layer, request_id_layer};
use tfagate_session::layer::{SessionManager, session_layer};
use tfagate_session::store::SessionStore;

use crate::domain::gate::{CLEAR_PATH, GATEWAY_PATH, VERIFY_PATH};
use crate::handlers::gateway::{clear_challenge, gateway_page, verify_challenge};
use crate::handlers::health::readyz;
use crate::middleware::two_factor_lock;
use crate::state::AppState;

pub fn build_router<S: SessionStore>(state: AppState, sessions: SessionManager<S>) -> Router {
    build_router_with(state, sessions, Router::new())
}

/// Gateway routes merged with the host's protected routes, all behind the gate.
pub fn build_router_with<S: SessionStore>(
    state: AppState,
    sessions: SessionManager<S>,
    protected: Router<AppState>,
) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Second-factor gateway
        .route(GATEWAY_PATH, get(gateway_page))
        .route(VERIFY_PATH, get(verify_challenge))
        .route(CLEAR_PATH, get(clear_challenge).post(clear_challenge))
        .merge(protected)
        // innermost first: the gate needs the session loaded around it
        .layer(from_fn(two_factor_lock))
        .layer(from_fn_with_state(sessions, session_layer::<S>))
        .layer(TraceLayer::new_for_http())
        .layer(propagate_request_id_layer())
        .layer(request_id_layer())
        .with_state(state)
}
