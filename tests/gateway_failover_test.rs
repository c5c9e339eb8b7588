//! Provider failover exercised through the full agent pipeline.
//!
//! The gateway walks the provider list in order; these tests check that
//! the ordering, the attempt trail, and the error mapping all survive the
//! trip through router, agent, and runtime.
//!
//! ## Test Coverage
//!
//! 1. Transient primary failure falls through to the secondary
//! 2. Hanging primary hits its attempt timeout and fails over
//! 3. Exhaustion of every provider surfaces as service unavailable
//! 4. Fatal provider error aborts without trying the secondary

mod common;

use std::sync::Arc;

use common::{build_router, seeded_store, succeeding_provider, transient_provider};
use counsel::adapters::providers::{MockBehavior, MockProvider};
use counsel::domain::models::AttemptOutcome;
use counsel::domain::ports::LlmProvider;
use counsel::{AgentError, Domain};
use serde_json::Value;

const QUERY: &str = "summarize our privacy policy";

fn rows() -> Vec<(&'static str, &'static str, &'static str, &'static str)> {
    vec![
        (
            "pol-1",
            "Our privacy policy limits customer data access to the support team",
            "policy-handbook",
            "policy_documents",
        ),
        (
            "pol-2",
            "The privacy policy requires annual review of every data processor",
            "policy-handbook",
            "policy_documents",
        ),
    ]
}

#[tokio::test]
async fn test_transient_primary_fails_over_to_secondary() {
    let store = seeded_store(&rows()).await;
    let router = build_router(
        store,
        vec![
            transient_provider("primary", "503 service overloaded"),
            succeeding_provider("secondary", "Answer from the fallback model."),
        ],
    );

    let response = router
        .handle(QUERY, Value::Null)
        .await
        .expect("secondary should answer");

    assert_eq!(response.domain, Domain::Policy);
    assert_eq!(response.text, "Answer from the fallback model.");
    assert_eq!(response.provider_used, "secondary");

    assert_eq!(response.provider_attempts.len(), 2);
    assert_eq!(response.provider_attempts[0].provider, "primary");
    assert!(matches!(
        response.provider_attempts[0].outcome,
        AttemptOutcome::TransientError(_)
    ));
    assert_eq!(response.provider_attempts[1].provider, "secondary");
    assert_eq!(response.provider_attempts[1].outcome, AttemptOutcome::Success);
}

#[tokio::test]
async fn test_hanging_primary_times_out_and_fails_over() {
    let store = seeded_store(&rows()).await;
    let primary: Arc<dyn LlmProvider> =
        Arc::new(MockProvider::new("primary", vec![MockBehavior::Hang]).with_timeout_secs(1));
    let router = build_router(
        store,
        vec![
            primary,
            succeeding_provider("secondary", "Answer after the timeout."),
        ],
    );

    let response = router
        .handle(QUERY, Value::Null)
        .await
        .expect("secondary should answer after the timeout");

    assert_eq!(response.provider_used, "secondary");
    match &response.provider_attempts[0].outcome {
        AttemptOutcome::TransientError(reason) => assert!(reason.contains("timed out")),
        other => panic!("expected a timeout attempt, got {other:?}"),
    }
}

#[tokio::test]
async fn test_all_transient_surfaces_as_service_unavailable() {
    let store = seeded_store(&rows()).await;
    let router = build_router(
        store,
        vec![
            transient_provider("primary", "503 service overloaded"),
            transient_provider("secondary", "upstream rate limited"),
        ],
    );

    let err = router.handle(QUERY, Value::Null).await.unwrap_err();
    assert!(matches!(err, AgentError::ServiceUnavailable(_)));
}

#[tokio::test]
async fn test_fatal_error_aborts_without_trying_secondary() {
    let store = seeded_store(&rows()).await;
    let secondary = Arc::new(MockProvider::succeeding("secondary", "never reached"));
    let router = build_router(
        store,
        vec![
            Arc::new(MockProvider::new(
                "primary",
                vec![MockBehavior::Fatal("401 unauthorized".to_string())],
            )),
            Arc::clone(&secondary) as Arc<dyn LlmProvider>,
        ],
    );

    let err = router.handle(QUERY, Value::Null).await.unwrap_err();
    assert!(matches!(err, AgentError::FatalProvider { .. }));
    assert_eq!(secondary.calls(), 0);
}
