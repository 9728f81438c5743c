use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinHandle;

use crate::infra::db::DbChallengeTokenRepository;
use crate::usecase::clear::PurgeExpiredUseCase;

/// Periodically deletes expired challenge tokens so superseded rows do not pile up.
pub fn spawn_expired_token_sweeper(
    tokens: DbChallengeTokenRepository,
    every: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let usecase = PurgeExpiredUseCase { tokens };
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            match usecase.execute(Utc::now()).await {
                Ok(0) => {}
                Ok(purged) => tracing::info!(purged, "expired challenge tokens purged"),
                Err(e) => tracing::warn!(error = %e, "challenge token sweep failed"),
            }
        }
    })
}
