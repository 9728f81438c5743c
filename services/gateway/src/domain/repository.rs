#![allow(async_fn_in_trait)]

use std::net::IpAddr;

use chrono::{DateTime, Utc};

use tfagate_domain::id::{ChallengeTokenId, Principal};

use crate::domain::types::ChallengeToken;
use crate::error::GatewayError;

/// Read-only view of second-factor enrollments.
pub trait EnrollmentRepository: Send + Sync {
    /// `true` iff an enrollment record exists. Absence is not an error.
    async fn is_enabled(&self, principal: Principal) -> Result<bool, GatewayError>;
}

/// Storage for outstanding challenge tokens.
///
/// Codes passed in are already canonical; implementations compare them verbatim.
pub trait ChallengeTokenRepository: Send + Sync {
    /// A token for (principal, ip) with `expires_at > now`, if any.
    async fn find_live(
        &self,
        principal: Principal,
        client_ip: IpAddr,
        now: DateTime<Utc>,
    ) -> Result<Option<ChallengeToken>, GatewayError>;

    /// Plain insert. No dedup against existing rows for the same pair.
    async fn insert(&self, token: &ChallengeToken) -> Result<(), GatewayError>;

    /// Match on principal, ip and code jointly. Expired tokens are returned too.
    async fn find_for_verification(
        &self,
        principal: Principal,
        client_ip: IpAddr,
        code: &str,
    ) -> Result<Option<ChallengeToken>, GatewayError>;

    /// Compare-and-delete: `true` only for the single caller that removed the row.
    async fn delete(&self, id: ChallengeTokenId) -> Result<bool, GatewayError>;

    /// Remove every token for (principal, ip). Returns the number removed.
    async fn delete_all(
        &self,
        principal: Principal,
        client_ip: IpAddr,
    ) -> Result<u64, GatewayError>;

    /// Remove tokens with `expires_at <= now`. Returns the number removed.
    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, GatewayError>;
}

/// Out-of-band notification that a token is waiting to be sent.
///
/// Fire-and-forget: implementations must not block the caller on the network
/// and must swallow their own failures.
pub trait DeliveryPort: Send + Sync {
    fn dispatch(&self, token: &ChallengeToken);
}

/// Finalisation hook run after a successful verification.
pub trait LoginRecorder: Send + Sync {
    async fn record(&self, principal: Principal, client_ip: IpAddr) -> Result<(), GatewayError>;
}
