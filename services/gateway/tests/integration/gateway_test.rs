use chrono::{Duration, Utc};

use tfagate_gateway::domain::types::{GatewayOutcome, TOKEN_LEN, TOKEN_TTL_SECS};
use tfagate_gateway::error::GatewayError;
use tfagate_gateway::usecase::clear::{ClearChallengeUseCase, PurgeExpiredUseCase};
use tfagate_gateway::usecase::gateway::OpenGatewayUseCase;

use crate::helpers::{
    FailingTokenRepo, MockDelivery, MockEnrollmentRepo, MockTokenRepo, other_ip, test_ip,
    test_principal, test_token,
};

fn gateway(
    tokens: MockTokenRepo,
    delivery: MockDelivery,
) -> OpenGatewayUseCase<MockEnrollmentRepo, MockTokenRepo, MockDelivery> {
    OpenGatewayUseCase {
        enrollments: MockEnrollmentRepo::with(test_principal()),
        tokens,
        delivery,
    }
}

#[tokio::test]
async fn should_skip_challenge_when_not_enrolled() {
    let tokens = MockTokenRepo::empty();
    let delivery = MockDelivery::default();
    let rows = tokens.tokens_handle();
    let sent = delivery.dispatched_handle();

    let uc = OpenGatewayUseCase {
        enrollments: MockEnrollmentRepo::empty(),
        tokens,
        delivery,
    };

    let outcome = uc.execute(test_principal(), test_ip(), Utc::now()).await.unwrap();

    assert_eq!(outcome, GatewayOutcome::NotEnrolled);
    assert!(rows.lock().unwrap().is_empty());
    assert!(sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_issue_and_dispatch_on_first_visit() {
    let now = Utc::now();
    let tokens = MockTokenRepo::empty();
    let delivery = MockDelivery::default();
    let rows = tokens.tokens_handle();
    let sent = delivery.dispatched_handle();

    let outcome = gateway(tokens, delivery)
        .execute(test_principal(), test_ip(), now)
        .await
        .unwrap();

    assert_eq!(outcome, GatewayOutcome::ChallengePending { issued: true });

    let rows = rows.lock().unwrap();
    assert_eq!(rows.len(), 1);
    let token = &rows[0];
    assert_eq!(token.principal, test_principal());
    assert_eq!(token.client_ip, test_ip());
    assert_eq!(token.token.len(), TOKEN_LEN);
    assert_eq!(token.token, token.token.to_ascii_uppercase());
    assert_eq!(token.expires_at, now + Duration::seconds(TOKEN_TTL_SECS));
    assert!(!token.delivered);

    let sent = sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].id, token.id);
}

#[tokio::test]
async fn should_reuse_live_token_on_repeat_visit() {
    let now = Utc::now();
    let tokens = MockTokenRepo::empty();
    let delivery = MockDelivery::default();
    let rows = tokens.tokens_handle();
    let sent = delivery.dispatched_handle();
    let uc = gateway(tokens, delivery);

    uc.execute(test_principal(), test_ip(), now).await.unwrap();
    let outcome = uc
        .execute(test_principal(), test_ip(), now + Duration::minutes(10))
        .await
        .unwrap();

    assert_eq!(outcome, GatewayOutcome::ChallengePending { issued: false });
    assert_eq!(rows.lock().unwrap().len(), 1);
    assert_eq!(sent.lock().unwrap().len(), 1, "no redelivery for a live token");
}

#[tokio::test]
async fn should_issue_per_address() {
    let now = Utc::now();
    let tokens = MockTokenRepo::new(vec![test_token(now)]);
    let rows = tokens.tokens_handle();

    let outcome = gateway(tokens, MockDelivery::default())
        .execute(test_principal(), other_ip(), now)
        .await
        .unwrap();

    assert_eq!(outcome, GatewayOutcome::ChallengePending { issued: true });
    let rows = rows.lock().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].client_ip, other_ip());
}

#[tokio::test]
async fn should_issue_when_only_expired_tokens_remain() {
    let issued_at = Utc::now() - Duration::hours(2);
    let tokens = MockTokenRepo::new(vec![test_token(issued_at)]);
    let rows = tokens.tokens_handle();

    let outcome = gateway(tokens, MockDelivery::default())
        .execute(test_principal(), test_ip(), Utc::now())
        .await
        .unwrap();

    assert_eq!(outcome, GatewayOutcome::ChallengePending { issued: true });
    assert_eq!(rows.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn should_treat_expiry_instant_as_not_live() {
    let now = Utc::now();
    let tokens = MockTokenRepo::new(vec![test_token(now - Duration::seconds(TOKEN_TTL_SECS))]);

    let outcome = gateway(tokens, MockDelivery::default())
        .execute(test_principal(), test_ip(), now)
        .await
        .unwrap();

    assert_eq!(outcome, GatewayOutcome::ChallengePending { issued: true });
}

#[tokio::test]
async fn should_reissue_exactly_one_token_after_clear() {
    let now = Utc::now();
    let stale = test_token(now);
    let tokens = MockTokenRepo::new(vec![stale.clone(), test_token(now)]);
    let delivery = MockDelivery::default();
    let rows = tokens.tokens_handle();
    let sent = delivery.dispatched_handle();

    let removed = ClearChallengeUseCase {
        tokens: tokens.clone(),
    }
    .execute(test_principal(), test_ip())
    .await
    .unwrap();
    assert_eq!(removed, 2);
    assert!(rows.lock().unwrap().is_empty());

    let outcome = gateway(tokens, delivery)
        .execute(test_principal(), test_ip(), now)
        .await
        .unwrap();

    assert_eq!(outcome, GatewayOutcome::ChallengePending { issued: true });
    let rows = rows.lock().unwrap();
    assert_eq!(rows.len(), 1);
    assert_ne!(rows[0].id, stale.id);
    assert_eq!(sent.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_clear_only_the_callers_address() {
    let now = Utc::now();
    let mut foreign = test_token(now);
    foreign.client_ip = other_ip();
    let tokens = MockTokenRepo::new(vec![test_token(now), foreign.clone()]);
    let rows = tokens.tokens_handle();

    let removed = ClearChallengeUseCase { tokens }
        .execute(test_principal(), test_ip())
        .await
        .unwrap();

    assert_eq!(removed, 1);
    assert_eq!(*rows.lock().unwrap(), vec![foreign]);
}

#[tokio::test]
async fn should_succeed_clearing_when_nothing_exists() {
    let removed = ClearChallengeUseCase {
        tokens: MockTokenRepo::empty(),
    }
    .execute(test_principal(), test_ip())
    .await
    .unwrap();
    assert_eq!(removed, 0);
}

#[tokio::test]
async fn should_purge_only_expired_tokens() {
    let now = Utc::now();
    let live = test_token(now);
    let tokens = MockTokenRepo::new(vec![test_token(now - Duration::hours(2)), live.clone()]);
    let rows = tokens.tokens_handle();

    let purged = PurgeExpiredUseCase { tokens }.execute(now).await.unwrap();

    assert_eq!(purged, 1);
    assert_eq!(*rows.lock().unwrap(), vec![live]);
}

#[tokio::test]
async fn should_propagate_storage_failure() {
    let delivery = MockDelivery::default();
    let sent = delivery.dispatched_handle();
    let uc = OpenGatewayUseCase {
        enrollments: MockEnrollmentRepo::with(test_principal()),
        tokens: FailingTokenRepo,
        delivery,
    };

    let err = uc
        .execute(test_principal(), test_ip(), Utc::now())
        .await
        .unwrap_err();

    assert!(matches!(err, GatewayError::Internal(_)));
    assert!(sent.lock().unwrap().is_empty());
}
