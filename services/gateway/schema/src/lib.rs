//! sea-orm entities for the gateway's tables.

pub mod challenge_tokens;
pub mod login_ips;
pub mod tfa_enrollments;
