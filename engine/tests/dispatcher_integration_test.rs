//! Integration tests for the provider chain
//!
//! Every tier talks to a wiremock server, so these cover the real wire
//! formats as well as failover order.

use serde_json::json;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use wiremock::{
    matchers::{body_partial_json, header, method, path},
    Mock, MockServer, ResponseTemplate,
};

use medarion_engine::config::{AiMode, GatewayConfig};
use medarion_engine::llm::dispatcher::{AttemptOutcome, DispatchOutcome, Dispatcher};
use medarion_engine::llm::{
    direct::DirectProvider, primary::PrimaryGatewayProvider, self_hosted::SelfHostedProvider,
    InferenceProvider, ProviderError,
};

const PRIMARY_PATH: &str = "/api/ai/query";

fn live_config() -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.ai_mode = AiMode::Live;
    config.direct.enabled = true;
    config
}

fn primary(server: &MockServer, timeout: Duration) -> Box<dyn InferenceProvider> {
    Box::new(PrimaryGatewayProvider::new(
        format!("{}{}", server.uri(), PRIMARY_PATH),
        timeout,
    ))
}

fn self_hosted(server: &MockServer) -> Box<dyn InferenceProvider> {
    Box::new(SelfHostedProvider::new(
        server.uri(),
        "mistral",
        Duration::from_secs(5),
    ))
}

fn direct(server: &MockServer, key: Option<&str>) -> Box<dyn InferenceProvider> {
    Box::new(DirectProvider::new(
        server.uri(),
        key.map(str::to_string),
        Duration::from_secs(5),
    ))
}

async fn mount_answer(server: &MockServer, route: &str, answer: &str) {
    Mock::given(method("POST"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "success": true, "answer": answer })),
        )
        .mount(server)
        .await;
}

async fn mount_status(server: &MockServer, route: &str, status: u16) {
    Mock::given(method("POST"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_primary_answer_wins() {
    let primary_server = MockServer::start().await;
    let secondary_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(PRIMARY_PATH))
        .and(body_partial_json(json!({ "topK": 5 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "answer": "RISK SCORE: 62",
            "sources": [{ "title": "Market report" }]
        })))
        .expect(1)
        .mount(&primary_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&secondary_server)
        .await;

    let dispatcher = Dispatcher::new(vec![
        primary(&primary_server, Duration::from_secs(5)),
        self_hosted(&secondary_server),
    ]);

    let outcome = dispatcher
        .dispatch("Assess risk", &live_config(), &CancellationToken::new())
        .await;

    match outcome {
        DispatchOutcome::Answered {
            text, provider_id, ..
        } => {
            assert_eq!(text, "RISK SCORE: 62");
            assert_eq!(provider_id, "primary");
        }
        other => panic!("Expected an answer, got {:?}", other),
    }
}

#[tokio::test]
async fn test_failover_stops_at_second_tier() {
    let primary_server = MockServer::start().await;
    let secondary_server = MockServer::start().await;
    let direct_server = MockServer::start().await;

    mount_status(&primary_server, PRIMARY_PATH, 500).await;

    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_partial_json(json!({
            "query": "Assess risk",
            "prompt": "Assess risk",
            "model": "mistral",
            "stream": false
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "response": "From the local model" })),
        )
        .expect(1)
        .mount(&secondary_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&direct_server)
        .await;

    let dispatcher = Dispatcher::new(vec![
        direct(&direct_server, None),
        self_hosted(&secondary_server),
        primary(&primary_server, Duration::from_secs(5)),
    ]);

    let outcome = dispatcher
        .dispatch("Assess risk", &live_config(), &CancellationToken::new())
        .await;

    assert_eq!(outcome.provider_id(), Some("self_hosted"));
    let attempts = outcome.attempts();
    assert_eq!(attempts.len(), 2);
    assert_eq!(
        attempts[0].outcome,
        AttemptOutcome::Failed(ProviderError::HttpStatus(500))
    );
    assert!(attempts[1].outcome.is_accepted());
}

#[tokio::test]
async fn test_primary_503_is_upstream_unavailable() {
    let primary_server = MockServer::start().await;
    mount_status(&primary_server, PRIMARY_PATH, 503).await;

    let provider = PrimaryGatewayProvider::new(
        format!("{}{}", primary_server.uri(), PRIMARY_PATH),
        Duration::from_secs(5),
    );

    let result = provider.complete("Hello", Duration::from_secs(5)).await;
    assert_eq!(result, Err(ProviderError::UpstreamUnavailable));
}

#[tokio::test]
async fn test_null_sources_still_answer() {
    let primary_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(PRIMARY_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "answer": "RISK SCORE: 62",
            "sources": null,
            "choices": null
        })))
        .mount(&primary_server)
        .await;

    let provider = primary(&primary_server, Duration::from_secs(5));
    let result = provider.complete("Hello", Duration::from_secs(5)).await;
    assert_eq!(result, Ok("RISK SCORE: 62".to_string()));
}

/// A 2xx reply flagged `success: false` fails the tier even when it carries an answer
#[tokio::test]
async fn test_success_false_is_a_failure() {
    let primary_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(PRIMARY_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "success": false, "answer": "Model offline" })),
        )
        .mount(&primary_server)
        .await;

    let provider = primary(&primary_server, Duration::from_secs(5));
    let result = provider.complete("Hello", Duration::from_secs(5)).await;
    assert!(matches!(result, Err(ProviderError::MalformedBody(_))));
}

#[tokio::test]
async fn test_stub_answer_is_rejected() {
    let primary_server = MockServer::start().await;
    let direct_server = MockServer::start().await;

    mount_answer(&primary_server, PRIMARY_PATH, "This is a Demo Answer for testing").await;

    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(header("X-API-Key", "secret-key"))
        .and(body_partial_json(json!({
            "query": "Question",
            "messages": [{ "role": "user", "content": "Question" }],
            "max_tokens": 1000
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "content": "Real answer from the direct API" } }]
        })))
        .expect(1)
        .mount(&direct_server)
        .await;

    let dispatcher = Dispatcher::new(vec![
        primary(&primary_server, Duration::from_secs(5)),
        direct(&direct_server, Some("secret-key")),
    ]);

    let outcome = dispatcher
        .dispatch("Question", &live_config(), &CancellationToken::new())
        .await;

    match outcome {
        DispatchOutcome::Answered {
            text,
            provider_id,
            attempts,
        } => {
            assert_eq!(text, "Real answer from the direct API");
            assert_eq!(provider_id, "direct");
            assert_eq!(
                attempts[0].outcome,
                AttemptOutcome::Failed(ProviderError::RejectedAnswer("demo answer"))
            );
        }
        other => panic!("Expected an answer, got {:?}", other),
    }
}

#[tokio::test]
async fn test_demo_mode_only_tries_primary() {
    let primary_server = MockServer::start().await;
    let secondary_server = MockServer::start().await;

    mount_status(&primary_server, PRIMARY_PATH, 500).await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "response": "unused" })))
        .expect(0)
        .mount(&secondary_server)
        .await;

    let dispatcher = Dispatcher::new(vec![
        primary(&primary_server, Duration::from_secs(5)),
        self_hosted(&secondary_server),
    ]);

    let outcome = dispatcher
        .dispatch("Hello", &GatewayConfig::default(), &CancellationToken::new())
        .await;

    assert!(outcome.is_exhausted());
    assert_eq!(outcome.attempts().len(), 1);
}

#[tokio::test]
async fn test_slow_primary_times_out_and_fails_over() {
    let primary_server = MockServer::start().await;
    let secondary_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(PRIMARY_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "success": true, "answer": "too late" }))
                .set_delay(Duration::from_secs(10)),
        )
        .mount(&primary_server)
        .await;
    mount_answer(&secondary_server, "/api/generate", "Local answer").await;

    let primary_timeout = Duration::from_millis(300);
    let dispatcher = Dispatcher::new(vec![
        primary(&primary_server, primary_timeout),
        self_hosted(&secondary_server),
    ]);

    let started = Instant::now();
    let outcome = dispatcher
        .dispatch("Hello", &live_config(), &CancellationToken::new())
        .await;

    assert_eq!(outcome.provider_id(), Some("self_hosted"));
    assert_eq!(
        outcome.attempts()[0].outcome,
        AttemptOutcome::Failed(ProviderError::Timeout(primary_timeout))
    );
    assert!(started.elapsed() < Duration::from_secs(3));
}

#[tokio::test]
async fn test_cancellation_aborts_in_flight_call() {
    let primary_server = MockServer::start().await;
    let secondary_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(PRIMARY_PATH))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(10)))
        .mount(&primary_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "response": "unused" })))
        .expect(0)
        .mount(&secondary_server)
        .await;

    let dispatcher = Dispatcher::new(vec![
        primary(&primary_server, Duration::from_secs(30)),
        self_hosted(&secondary_server),
    ]);

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        trigger.cancel();
    });

    let started = Instant::now();
    let outcome = dispatcher.dispatch("Hello", &live_config(), &cancel).await;

    assert!(outcome.is_exhausted());
    assert_eq!(outcome.attempts().len(), 1);
    assert_eq!(
        outcome.attempts()[0].outcome,
        AttemptOutcome::Failed(ProviderError::Cancelled)
    );
    assert!(started.elapsed() < Duration::from_secs(3));
}

#[tokio::test]
async fn test_from_config_builds_configured_tiers() {
    let mut config = live_config();
    config.secondary_endpoint = Some("http://localhost:11434".to_string());
    config.direct.endpoint = Some("http://localhost:8000".to_string());

    let dispatcher = Dispatcher::from_config(&config, reqwest::Client::new());
    let ids: Vec<&str> = dispatcher.providers().map(|p| p.id()).collect();
    assert_eq!(ids, vec!["primary", "self_hosted", "direct"]);

    let minimal = Dispatcher::from_config(&GatewayConfig::default(), reqwest::Client::new());
    assert_eq!(minimal.providers().count(), 1);
}

#[tokio::test]
async fn test_health_probes() {
    let primary_server = MockServer::start().await;
    let secondary_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/ai/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "ok" })))
        .mount(&primary_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&secondary_server)
        .await;

    let dispatcher = Dispatcher::new(vec![
        primary(&primary_server, Duration::from_secs(5)),
        self_hosted(&secondary_server),
    ]);

    let health = dispatcher.check_health().await;
    assert_eq!(health.len(), 2);
    assert_eq!(health[0].0, "primary");
    assert!(health[0].2);
    assert_eq!(health[1].0, "self_hosted");
    assert!(!health[1].2);
}
