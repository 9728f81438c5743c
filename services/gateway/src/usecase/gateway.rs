use std::net::IpAddr;

use chrono::{DateTime, Utc};

use tfagate_domain::id::Principal;

use crate::domain::repository::{ChallengeTokenRepository, DeliveryPort, EnrollmentRepository};
use crate::domain::types::GatewayOutcome;
use crate::error::GatewayError;
use crate::usecase::issue::IssueTokenUseCase;

/// Visit to the challenge page: make sure a live token exists for the caller.
pub struct OpenGatewayUseCase<E, T, D>
where
    E: EnrollmentRepository,
    T: ChallengeTokenRepository,
    D: DeliveryPort,
{
    pub enrollments: E,
    pub tokens: T,
    pub delivery: D,
}

impl<E, T, D> OpenGatewayUseCase<E, T, D>
where
    E: EnrollmentRepository,
    T: ChallengeTokenRepository,
    D: DeliveryPort,
{
    pub async fn execute(
        &self,
        principal: Principal,
        client_ip: IpAddr,
        now: DateTime<Utc>,
    ) -> Result<GatewayOutcome, GatewayError> {
        // 1. Enrollment removed since login → nothing to verify
        if !self.enrollments.is_enabled(principal).await? {
            return Ok(GatewayOutcome::NotEnrolled);
        }

        // 2. Reuse a live token; a fresh one is only issued when none exists
        if self
            .tokens
            .find_live(principal, client_ip, now)
            .await?
            .is_some()
        {
            return Ok(GatewayOutcome::ChallengePending { issued: false });
        }

        IssueTokenUseCase {
            tokens: &self.tokens,
            delivery: &self.delivery,
        }
        .execute(principal, client_ip, now)
        .await?;

        Ok(GatewayOutcome::ChallengePending { issued: true })
    }
}
