use chrono::{Duration, Utc};

use tfagate_gateway::domain::types::VerificationOutcome;
use tfagate_gateway::error::GatewayError;
use tfagate_gateway::usecase::verify::{VerifyChallengeInput, VerifyChallengeUseCase};

use crate::helpers::{
    FailingTokenRepo, MockDelivery, MockLoginRecorder, MockTokenRepo, TEST_CODE, other_ip,
    test_ip, test_principal, test_token,
};
use tfagate_domain::id::Principal;

fn input(code: &str) -> VerifyChallengeInput {
    VerifyChallengeInput {
        principal: test_principal(),
        client_ip: test_ip(),
        code: code.to_owned(),
        now: Utc::now(),
    }
}

fn verifier(
    tokens: MockTokenRepo,
    delivery: MockDelivery,
    logins: MockLoginRecorder,
) -> VerifyChallengeUseCase<MockTokenRepo, MockDelivery, MockLoginRecorder> {
    VerifyChallengeUseCase {
        tokens,
        delivery,
        logins,
    }
}

#[tokio::test]
async fn should_accept_code_case_insensitively_once() {
    let tokens = MockTokenRepo::new(vec![test_token(Utc::now())]);
    let logins = MockLoginRecorder::default();
    let rows = tokens.tokens_handle();
    let recorded = logins.recorded_handle();
    let uc = verifier(tokens, MockDelivery::default(), logins);

    let first = uc.execute(input("ab12cd34")).await.unwrap();
    assert_eq!(first, VerificationOutcome::Success);
    assert_eq!(first.as_body(), "0");
    assert!(rows.lock().unwrap().is_empty(), "token must be consumed");
    assert_eq!(*recorded.lock().unwrap(), vec![(test_principal(), test_ip())]);

    let second = uc.execute(input(TEST_CODE)).await.unwrap();
    assert_eq!(second, VerificationOutcome::Invalid);
    assert_eq!(second.as_body(), "1");
    assert_eq!(recorded.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_reject_wrong_code_without_side_effects() {
    let token = test_token(Utc::now());
    let tokens = MockTokenRepo::new(vec![token.clone()]);
    let delivery = MockDelivery::default();
    let logins = MockLoginRecorder::default();
    let rows = tokens.tokens_handle();
    let sent = delivery.dispatched_handle();
    let recorded = logins.recorded_handle();

    let outcome = verifier(tokens, delivery, logins)
        .execute(input("ZZZZZZZZ"))
        .await
        .unwrap();

    assert_eq!(outcome, VerificationOutcome::Invalid);
    assert_eq!(*rows.lock().unwrap(), vec![token]);
    assert!(sent.lock().unwrap().is_empty());
    assert!(recorded.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_reject_empty_code() {
    let tokens = MockTokenRepo::new(vec![test_token(Utc::now())]);
    let outcome = verifier(tokens, MockDelivery::default(), MockLoginRecorder::default())
        .execute(input(""))
        .await
        .unwrap();
    assert_eq!(outcome, VerificationOutcome::Invalid);
}

#[tokio::test]
async fn should_reject_code_from_another_address() {
    let tokens = MockTokenRepo::new(vec![test_token(Utc::now())]);
    let rows = tokens.tokens_handle();
    let uc = verifier(tokens, MockDelivery::default(), MockLoginRecorder::default());

    let outcome = uc
        .execute(VerifyChallengeInput {
            client_ip: other_ip(),
            ..input(TEST_CODE)
        })
        .await
        .unwrap();

    assert_eq!(outcome, VerificationOutcome::Invalid);
    assert_eq!(rows.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_reject_code_of_another_principal() {
    let tokens = MockTokenRepo::new(vec![test_token(Utc::now())]);
    let uc = verifier(tokens, MockDelivery::default(), MockLoginRecorder::default());

    let outcome = uc
        .execute(VerifyChallengeInput {
            principal: Principal(7),
            ..input(TEST_CODE)
        })
        .await
        .unwrap();

    assert_eq!(outcome, VerificationOutcome::Invalid);
}

#[tokio::test]
async fn should_reissue_when_code_expired() {
    let stale = test_token(Utc::now() - Duration::hours(2));
    let tokens = MockTokenRepo::new(vec![stale.clone()]);
    let delivery = MockDelivery::default();
    let logins = MockLoginRecorder::default();
    let rows = tokens.tokens_handle();
    let sent = delivery.dispatched_handle();
    let recorded = logins.recorded_handle();

    let outcome = verifier(tokens, delivery, logins)
        .execute(input(TEST_CODE))
        .await
        .unwrap();

    assert_eq!(outcome, VerificationOutcome::ExpiredAndReissued);
    assert_eq!(outcome.as_body(), "1", "indistinguishable from a wrong code");
    assert!(recorded.lock().unwrap().is_empty());

    let rows = rows.lock().unwrap();
    assert!(rows.iter().all(|t| t.id != stale.id), "expired token must be superseded");
    let fresh: Vec<_> = rows.iter().collect();
    assert_eq!(fresh.len(), 1);
    assert!(fresh[0].expires_at > Utc::now());

    let sent = sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].id, fresh[0].id);
}

#[tokio::test]
async fn should_not_match_expired_code_twice() {
    let tokens = MockTokenRepo::new(vec![test_token(Utc::now() - Duration::hours(2))]);
    let delivery = MockDelivery::default();
    let rows = tokens.tokens_handle();
    let sent = delivery.dispatched_handle();
    let uc = verifier(tokens, delivery, MockLoginRecorder::default());

    let first = uc.execute(input(TEST_CODE)).await.unwrap();
    let second = uc.execute(input(TEST_CODE)).await.unwrap();

    assert_eq!(first, VerificationOutcome::ExpiredAndReissued);
    assert_eq!(second, VerificationOutcome::Invalid);
    assert_eq!(rows.lock().unwrap().len(), 1, "only the reissued token remains");
    assert_eq!(sent.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_reject_padded_code() {
    let tokens = MockTokenRepo::new(vec![test_token(Utc::now())]);
    let rows = tokens.tokens_handle();

    let outcome = verifier(tokens, MockDelivery::default(), MockLoginRecorder::default())
        .execute(input(" ab12cd34 "))
        .await
        .unwrap();

    assert_eq!(outcome, VerificationOutcome::Invalid);
    assert_eq!(rows.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_accept_until_expiry_instant() {
    let now = Utc::now();
    let mut token = test_token(now);
    token.expires_at = now;
    let tokens = MockTokenRepo::new(vec![token]);

    let outcome = verifier(tokens, MockDelivery::default(), MockLoginRecorder::default())
        .execute(VerifyChallengeInput {
            now,
            ..input(TEST_CODE)
        })
        .await
        .unwrap();

    assert_eq!(outcome, VerificationOutcome::Success);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn should_let_only_one_concurrent_verification_win() {
    let tokens = MockTokenRepo::new(vec![test_token(Utc::now())]);
    let logins = MockLoginRecorder::default();
    let recorded = logins.recorded_handle();
    let uc = verifier(tokens, MockDelivery::default(), logins);

    let (a, b) = tokio::join!(uc.execute(input(TEST_CODE)), uc.execute(input(TEST_CODE)));
    let outcomes = [a.unwrap(), b.unwrap()];

    let wins = outcomes
        .iter()
        .filter(|o| **o == VerificationOutcome::Success)
        .count();
    assert_eq!(wins, 1, "outcomes: {outcomes:?}");
    assert!(outcomes.contains(&VerificationOutcome::Invalid));
    assert_eq!(recorded.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_succeed_even_when_login_recording_fails() {
    let tokens = MockTokenRepo::new(vec![test_token(Utc::now())]);
    let rows = tokens.tokens_handle();

    let outcome = verifier(tokens, MockDelivery::default(), MockLoginRecorder::failing())
        .execute(input(TEST_CODE))
        .await
        .unwrap();

    assert_eq!(outcome, VerificationOutcome::Success);
    assert!(rows.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_propagate_storage_failure() {
    let uc = VerifyChallengeUseCase {
        tokens: FailingTokenRepo,
        delivery: MockDelivery::default(),
        logins: MockLoginRecorder::default(),
    };

    let err = uc.execute(input(TEST_CODE)).await.unwrap_err();
    assert!(matches!(err, GatewayError::Internal(_)));
}
