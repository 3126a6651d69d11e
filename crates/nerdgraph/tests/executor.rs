use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use serde::Deserialize;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

use nerdgraph::{
    CancellationToken, ClientConfig, ConfigError, ErrorClassifier, HttpTransport,
    HttpTransportBuilder, QueryError, QueryExecutor, RetryPolicy, RetryStrategy, TransportError,
    Variables,
};

const ACTOR_QUERY: &str = "query { actor { user { id } } }";
const TAG_MUTATION: &str =
    "mutation($guid: EntityGuid!) { taggingDeleteTagFromEntity(guid: $guid, tagKeys: []) { errors { message } } }";

#[derive(Debug, Deserialize)]
struct ActorResponse {
    actor: Actor,
}

#[derive(Debug, Deserialize)]
struct Actor {
    user: User,
}

#[derive(Debug, Deserialize)]
struct User {
    id: u64,
}

struct SequenceResponder {
    counter: Arc<AtomicUsize>,
}

impl Respond for SequenceResponder {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        let attempt = self.counter.fetch_add(1, Ordering::SeqCst);
        if attempt == 0 {
            ResponseTemplate::new(500).set_body_string("upstream failure")
        } else {
            ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": {"actor": {"user": {"id": 2}}}
            }))
        }
    }
}

struct CountingResponder {
    counter: Arc<AtomicUsize>,
    status: u16,
    body: serde_json::Value,
}

impl Respond for CountingResponder {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        self.counter.fetch_add(1, Ordering::SeqCst);
        ResponseTemplate::new(self.status).set_body_json(self.body.clone())
    }
}

fn fast_retry() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 3,
        base_delay: Duration::from_millis(1),
        max_delay: Duration::from_millis(5),
        max_jitter: Duration::ZERO,
        strategy: RetryStrategy::IdempotentOnly,
    }
}

fn executor(server: &MockServer) -> (QueryExecutor, HttpTransport) {
    let transport = HttpTransportBuilder::new(server.uri())
        .with_api_key("NRAK-TEST")
        .with_retry_policy(fast_retry())
        .build()
        .expect("transport");
    (QueryExecutor::new(transport.clone()), transport)
}

#[tokio::test]
async fn execute_query_success() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/"))
        .and(header("api-key", "NRAK-TEST"))
        .and(body_json(serde_json::json!({
            "query": ACTOR_QUERY,
            "variables": {},
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": {"actor": {"user": {"id": 1}}}
        })))
        .mount(&server)
        .await;

    let (executor, transport) = executor(&server);
    let response: ActorResponse = executor
        .execute(&CancellationToken::new(), ACTOR_QUERY, Variables::new())
        .await
        .expect("query should succeed");

    assert_eq!(response.actor.user.id, 1);
    let metrics = transport.metrics();
    assert_eq!(metrics.requests_total, 1);
    assert_eq!(metrics.requests_success, 1);
}

#[tokio::test]
async fn execute_query_graphql_errors_are_classified() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": null,
            "errors": [{
                "message": "Request timed out",
                "path": ["actor", "user"],
                "extensions": {"errorClass": "TIMEOUT"}
            }]
        })))
        .mount(&server)
        .await;

    let (executor, _) = executor(&server);
    let err = executor
        .execute::<ActorResponse>(&CancellationToken::new(), ACTOR_QUERY, Variables::new())
        .await
        .expect_err("should surface GraphQL errors");

    assert!(err.is_retryable());
    assert!(!err.is_not_found());
    assert_eq!(err.to_string(), "Request timed out");
}

#[tokio::test]
async fn execute_query_unauthorized_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "errors": [{"message": "Invalid API key"}]
        })))
        .mount(&server)
        .await;

    let (executor, _) = executor(&server);
    let err = executor
        .execute::<ActorResponse>(&CancellationToken::new(), ACTOR_QUERY, Variables::new())
        .await
        .expect_err("should be unauthorized");

    match &err {
        QueryError::Api { errors, status } => {
            assert_eq!(*status, 401);
            assert!(errors.is_unauthorized(*status));
        }
        other => panic!("expected API error, got {other:?}"),
    }
    assert!(err.is_unauthorized());
}

#[tokio::test]
async fn execute_query_retries_on_500() {
    let server = MockServer::start().await;
    let counter = Arc::new(AtomicUsize::new(0));

    Mock::given(method("POST"))
        .respond_with(SequenceResponder {
            counter: counter.clone(),
        })
        .mount(&server)
        .await;

    let (executor, transport) = executor(&server);
    let response: ActorResponse = executor
        .execute(&CancellationToken::new(), ACTOR_QUERY, Variables::new())
        .await
        .expect("retry should succeed");

    assert_eq!(response.actor.user.id, 2);
    assert_eq!(counter.load(Ordering::SeqCst), 2);
    assert_eq!(transport.metrics().requests_retried, 1);
}

#[tokio::test]
async fn execute_mutation_is_not_retried() {
    let server = MockServer::start().await;
    let counter = Arc::new(AtomicUsize::new(0));

    Mock::given(method("POST"))
        .respond_with(CountingResponder {
            counter: counter.clone(),
            status: 503,
            body: serde_json::json!({"message": "unavailable"}),
        })
        .mount(&server)
        .await;

    let (executor, _) = executor(&server);
    let mut variables = Variables::new();
    variables.insert("guid".into(), serde_json::json!("MXxBUE18"));
    let err = executor
        .execute::<serde_json::Value>(&CancellationToken::new(), TAG_MUTATION, variables)
        .await
        .expect_err("503 should fail");

    assert!(matches!(
        err,
        QueryError::Transport(TransportError::HttpStatus { status: 503, .. })
    ));
    assert_eq!(counter.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn cancellation_aborts_in_flight_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"data": {"actor": {"user": {"id": 3}}}}))
                .set_delay(Duration::from_secs(10)),
        )
        .mount(&server)
        .await;

    let (executor, _) = executor(&server);
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });

    let started = std::time::Instant::now();
    let err = executor
        .execute::<ActorResponse>(&cancel, ACTOR_QUERY, Variables::new())
        .await
        .expect_err("should be cancelled");

    assert!(err.is_cancelled());
    assert!(err.api_errors().is_none());
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn concurrent_requests_keep_errors_separate() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_json(serde_json::json!({
            "query": ACTOR_QUERY,
            "variables": {"which": "bad"},
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "errors": [{"message": "Entity Not Found"}]
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_json(serde_json::json!({
            "query": ACTOR_QUERY,
            "variables": {"which": "good"},
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": {"actor": {"user": {"id": 9}}}
        })))
        .mount(&server)
        .await;

    let (executor, _) = executor(&server);
    let cancel = CancellationToken::new();
    let vars = |which: &str| {
        let mut variables = Variables::new();
        variables.insert("which".into(), serde_json::json!(which));
        variables
    };

    let (bad, good) = tokio::join!(
        executor.execute::<ActorResponse>(&cancel, ACTOR_QUERY, vars("bad")),
        executor.execute::<ActorResponse>(&cancel, ACTOR_QUERY, vars("good")),
    );

    assert!(bad.expect_err("not found").is_not_found());
    assert_eq!(good.expect("good request").actor.user.id, 9);
}

#[test]
fn transport_from_config_requires_api_key() {
    let err = HttpTransport::from_config(&ClientConfig::default()).expect_err("no key");
    assert_eq!(err, ConfigError::MissingApiKey);

    let transport =
        HttpTransport::from_config(&ClientConfig::new("NRAK-1").with_graphql_url("http://127.0.0.1:1/graphql"))
            .expect("transport");
    assert_eq!(transport.endpoint(), "http://127.0.0.1:1/graphql");
}
