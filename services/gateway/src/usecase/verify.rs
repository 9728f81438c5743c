use std::net::IpAddr;

use chrono::{DateTime, Utc};

use tfagate_domain::id::Principal;

use crate::domain::repository::{ChallengeTokenRepository, DeliveryPort, LoginRecorder};
use crate::domain::types::VerificationOutcome;
use crate::error::GatewayError;
use crate::usecase::issue::{IssueTokenUseCase, canonicalize};

pub struct VerifyChallengeInput {
    pub principal: Principal,
    pub client_ip: IpAddr,
    pub code: String,
    pub now: DateTime<Utc>,
}

/// Checks a submitted code against the persisted token for the same
/// principal and address.
///
/// The caller owns the session: on [`VerificationOutcome::Success`] it must clear
/// the must-verify flag.
pub struct VerifyChallengeUseCase<T, D, L>
where
    T: ChallengeTokenRepository,
    D: DeliveryPort,
    L: LoginRecorder,
{
    pub tokens: T,
    pub delivery: D,
    pub logins: L,
}

impl<T, D, L> VerifyChallengeUseCase<T, D, L>
where
    T: ChallengeTokenRepository,
    D: DeliveryPort,
    L: LoginRecorder,
{
    pub async fn execute(
        &self,
        input: VerifyChallengeInput,
    ) -> Result<VerificationOutcome, GatewayError> {
        let VerifyChallengeInput {
            principal,
            client_ip,
            code,
            now,
        } = input;

        // 1. Lookup by all three fields; the code is compared in canonical case
        let code = canonicalize(&code);
        let Some(token) = self
            .tokens
            .find_for_verification(principal, client_ip, &code)
            .await?
        else {
            tracing::debug!(principal = %principal, "challenge code rejected");
            return Ok(VerificationOutcome::Invalid);
        };

        // 2. Expired → supersede, then reissue and redeliver; the caller sees the same
        //    answer as a wrong code. Losing the delete means another request superseded it.
        if token.is_expired(now) {
            if !self.tokens.delete(token.id).await? {
                tracing::debug!(principal = %principal, token_id = %token.id, "expired challenge already superseded");
                return Ok(VerificationOutcome::Invalid);
            }
            IssueTokenUseCase {
                tokens: &self.tokens,
                delivery: &self.delivery,
            }
            .execute(principal, client_ip, now)
            .await?;
            tracing::debug!(principal = %principal, token_id = %token.id, "expired challenge reissued");
            return Ok(VerificationOutcome::ExpiredAndReissued);
        }

        // 3. Consume. Only the caller whose delete removed the row wins a concurrent race.
        if !self.tokens.delete(token.id).await? {
            tracing::debug!(principal = %principal, token_id = %token.id, "challenge already consumed");
            return Ok(VerificationOutcome::Invalid);
        }

        // 4. Record the login; the token is already gone, so failure here is not fatal
        if let Err(e) = self.logins.record(principal, client_ip).await {
            tracing::warn!(error = %e, principal = %principal, "failed to record login");
        }

        tracing::info!(principal = %principal, client_ip = %client_ip, "second factor verified");
        Ok(VerificationOutcome::Success)
    }
}
