use std::net::IpAddr;

use chrono::{DateTime, Utc};

use tfagate_domain::id::Principal;

use crate::domain::repository::ChallengeTokenRepository;
use crate::error::GatewayError;

// ── ClearChallenge ───────────────────────────────────────────────────────────

/// Manual reset: drop every token for (principal, ip) so the next gateway
/// visit issues and delivers a new one.
pub struct ClearChallengeUseCase<T: ChallengeTokenRepository> {
    pub tokens: T,
}

impl<T: ChallengeTokenRepository> ClearChallengeUseCase<T> {
    pub async fn execute(
        &self,
        principal: Principal,
        client_ip: IpAddr,
    ) -> Result<u64, GatewayError> {
        let removed = self.tokens.delete_all(principal, client_ip).await?;
        tracing::debug!(principal = %principal, removed, "challenge tokens cleared");
        Ok(removed)
    }
}

// ── PurgeExpired ─────────────────────────────────────────────────────────────

pub struct PurgeExpiredUseCase<T: ChallengeTokenRepository> {
    pub tokens: T,
}

impl<T: ChallengeTokenRepository> PurgeExpiredUseCase<T> {
    pub async fn execute(&self, now: DateTime<Utc>) -> Result<u64, GatewayError> {
        self.tokens.purge_expired(now).await
    }
}
