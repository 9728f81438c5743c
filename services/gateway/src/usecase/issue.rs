use std::net::IpAddr;

use chrono::{DateTime, Duration, Utc};
use rand::RngExt;

use tfagate_domain::id::{ChallengeTokenId, Principal};

use crate::domain::repository::{ChallengeTokenRepository, DeliveryPort};
use crate::domain::types::{ChallengeToken, TOKEN_LEN, TOKEN_TTL_SECS};
use crate::error::GatewayError;

/// Charset for generating challenge codes (uppercase alphanumeric).
const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

pub fn generate_code() -> String {
    let mut rng = rand::rng();
    (0..TOKEN_LEN)
        .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
        .collect()
}

/// Single case used for both storage and comparison. Nothing else is normalized.
pub fn canonicalize(code: &str) -> String {
    code.to_ascii_uppercase()
}

/// Creates a fresh token for (principal, ip) and hands it to the delivery channel.
///
/// Borrowing so that the gateway visit and the verifier can reuse their own ports.
pub struct IssueTokenUseCase<'a, T, D>
where
    T: ChallengeTokenRepository,
    D: DeliveryPort,
{
    pub tokens: &'a T,
    pub delivery: &'a D,
}

impl<T, D> IssueTokenUseCase<'_, T, D>
where
    T: ChallengeTokenRepository,
    D: DeliveryPort,
{
    pub async fn execute(
        &self,
        principal: Principal,
        client_ip: IpAddr,
        now: DateTime<Utc>,
    ) -> Result<ChallengeToken, GatewayError> {
        let token = ChallengeToken {
            id: ChallengeTokenId::new(),
            principal,
            token: canonicalize(&generate_code()),
            client_ip,
            expires_at: now + Duration::seconds(TOKEN_TTL_SECS),
            delivered: false,
            created_at: now,
        };

        // Issuance is complete once persisted; delivery cannot fail it.
        self.tokens.insert(&token).await?;
        tracing::info!(
            principal = %principal,
            token_id = %token.id,
            client_ip = %client_ip,
            "challenge token issued"
        );
        self.delivery.dispatch(&token);
        Ok(token)
    }
}
