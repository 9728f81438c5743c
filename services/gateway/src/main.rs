use std::net::SocketAddr;

use sea_orm::Database;
use tracing::info;

use tfagate_core::config::Config;
use tfagate_core::tracing::init_tracing;
use tfagate_gateway::config::GatewayConfig;
use tfagate_gateway::infra::delivery::HttpDelivery;
use tfagate_gateway::infra::session::RedisSessionStore;
use tfagate_gateway::infra::sweeper::spawn_expired_token_sweeper;
use tfagate_gateway::router::build_router;
use tfagate_gateway::state::AppState;
use tfagate_session::layer::SessionManager;

#[tokio::main]
async fn main() {
    init_tracing();

    let config = GatewayConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let redis_cfg = deadpool_redis::Config::from_url(&config.redis_url);
    let redis = redis_cfg
        .create_pool(Some(deadpool_redis::Runtime::Tokio1))
        .expect("failed to create Redis pool");

    let delivery = HttpDelivery::new(config.delivery_url.clone(), config.delivery_timeout())
        .expect("failed to build delivery client");

    let state = AppState { db, delivery };

    spawn_expired_token_sweeper(state.token_repo(), config.sweep_interval());

    let sessions = SessionManager::new(
        RedisSessionStore {
            pool: redis,
            ttl_secs: config.session_ttl_secs,
        },
        config.cookie(),
    );

    let router = build_router(state, sessions);
    let addr = format!("0.0.0.0:{}", config.gateway_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("2fa gateway listening on {addr}");
    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("server error");
}
