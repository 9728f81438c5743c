use std::net::IpAddr;

use chrono::{DateTime, Utc};

use tfagate_domain::id::{ChallengeTokenId, Principal};

/// Time-bound, address-bound, single-use second-factor code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChallengeToken {
    pub id: ChallengeTokenId,
    pub principal: Principal,
    /// Canonical (upper-case) code.
    pub token: String,
    pub client_ip: IpAddr,
    pub expires_at: DateTime<Utc>,
    pub delivered: bool,
    pub created_at: DateTime<Utc>,
}

impl ChallengeToken {
    /// Still usable at `now`: strictly before the expiry instant.
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }

    /// Past its expiry at `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

/// Result of checking a submitted code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationOutcome {
    /// No token matched (wrong, foreign or already consumed code). Nothing changed.
    Invalid,
    /// The code matched an expired token; a fresh one was issued and dispatched.
    ExpiredAndReissued,
    /// The token was consumed and the second factor is satisfied.
    Success,
}

impl VerificationOutcome {
    /// Plain-text body for the verify endpoint.
    ///
    /// Expired and invalid codes share a body so callers cannot tell them apart.
    pub fn as_body(self) -> &'static str {
        match self {
            Self::Success => "0",
            Self::Invalid | Self::ExpiredAndReissued => "1",
        }
    }
}

/// Result of a visit to the gateway page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayOutcome {
    /// The principal has no enrollment; the second factor is trivially satisfied.
    NotEnrolled,
    /// A live token exists for the caller, newly issued or not.
    ChallengePending { issued: bool },
}

/// Challenge code length in characters.
pub const TOKEN_LEN: usize = 8;

/// Challenge token time-to-live in seconds.
pub const TOKEN_TTL_SECS: i64 = 3600;

/// Flash text shown after a gate denial.
pub const MSG_CHALLENGE_REQUIRED: &str = "You need to complete the 2fa challenge first.";

/// Flash text shown after a successful verification.
pub const MSG_LOGGED_IN: &str = "You've been successfully logged in.";

/// Flash text shown after tokens were cleared.
pub const MSG_CODE_RESENT: &str = "A new code has been generated and sent to you.";
