//! HTTP contract tests against the router, without a socket.

use axum::Router;
use axum::body::{Body, Bytes};
use axum::http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use strictly_bulls::{
    ErrorBody, GuessResponse, Health, PastGuessesResponse, Phase, ScriptedSecrets, ServiceConfig,
    SessionController, SessionManager, SessionView, StartResponse, router,
};
use strictly_bulls_cows::{AttemptLimit, AttemptsRemaining, Code, Outcome};
use tower::ServiceExt;

const ORIGIN: &str = "http://localhost:5173";

fn app_with(secret: &str, config: &ServiceConfig) -> Router {
    let secret = Code::parse(secret).expect("valid secret");
    let controller = SessionController::new(SessionManager::with_secrets(Arc::new(
        ScriptedSecrets::fixed(secret),
    )));
    router(controller, config)
}

fn app(secret: &str) -> Router {
    app_with(secret, &ServiceConfig::default())
}

async fn send(app: &Router, method: Method, uri: &str) -> (StatusCode, Bytes) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("infallible");
    let status = response.status();
    let body = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    (status, body)
}

async fn send_json<T: DeserializeOwned>(app: &Router, method: Method, uri: &str) -> (StatusCode, T) {
    let (status, body) = send(app, method, uri).await;
    let value = serde_json::from_slice(&body)
        .unwrap_or_else(|e| panic!("{uri}: {e}: {}", String::from_utf8_lossy(&body)));
    (status, value)
}

#[tokio::test]
async fn test_health_routes() {
    let app = app("4827");
    for uri in ["/", "/health"] {
        let (status, health): (_, Health) = send_json(&app, Method::GET, uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(health.status, "ok");
    }
}

#[tokio::test]
async fn test_start_then_win() {
    let app = app("4827");

    let (status, start): (_, StartResponse) =
        send_json(&app, Method::POST, "/start?limit=10").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(start.attempt_limit, AttemptLimit::Ten);
    assert_eq!(start.attempts_remaining, AttemptsRemaining::Limited(10));
    assert!(start.past_guesses.is_empty());

    let (status, guess): (_, GuessResponse) =
        send_json(&app, Method::POST, "/guess?guess=1234").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!((guess.digits_correct, guess.positions_correct), (2, 0));
    assert_eq!(guess.outcome, Outcome::InProgress);

    let (_, win): (_, GuessResponse) = send_json(&app, Method::POST, "/guess?guess=4827").await;
    assert_eq!(win.outcome, Outcome::Won);
    assert_eq!(win.result.as_deref(), Some("You Win!"));
    assert_eq!(win.secret.map(|s| s.to_string()).as_deref(), Some("4827"));
}

#[tokio::test]
async fn test_start_defaults() {
    let app = app("4827");

    let (_, start): (_, StartResponse) = send_json(&app, Method::POST, "/start").await;
    assert_eq!(start.attempt_limit, AttemptLimit::Ten);

    let (_, start): (_, StartResponse) =
        send_json(&app, Method::POST, "/start?unlimited=true").await;
    assert_eq!(start.attempt_limit, AttemptLimit::Unlimited);
    assert_eq!(start.attempts_remaining, AttemptsRemaining::Unlimited);

    // An explicit limit wins over the legacy flag.
    let (_, start): (_, StartResponse) =
        send_json(&app, Method::POST, "/start?limit=20&unlimited=true").await;
    assert_eq!(start.attempt_limit, AttemptLimit::Twenty);
}

#[tokio::test]
async fn test_configured_default_limit() {
    let config = ServiceConfig::from_toml("default_attempt_limit = 15").expect("config");
    let app = app_with("4827", &config);

    let (_, start): (_, StartResponse) = send_json(&app, Method::POST, "/start").await;
    assert_eq!(start.attempt_limit, AttemptLimit::Fifteen);
}

#[tokio::test]
async fn test_invalid_limit_is_bad_request() {
    let app = app("4827");

    for uri in [
        "/start?limit=7",
        "/start?limit=-1",
        "/start?limit=abc",
        "/start?limit=10&limit=15",
        "/start?unlimited=maybe",
    ] {
        let (status, body): (_, ErrorBody) = send_json(&app, Method::POST, uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body.error, "InvalidConfiguration", "{uri}");
    }

    // No session was started by any of them.
    let (_, view): (_, SessionView) = send_json(&app, Method::GET, "/state").await;
    assert_eq!(view.phase, Phase::NotStarted);
}

#[tokio::test]
async fn test_repeated_guess_is_conflict() {
    let app = app("4827");
    send(&app, Method::POST, "/start?limit=10").await;
    send(&app, Method::POST, "/guess?guess=1234").await;

    let (status, body): (_, ErrorBody) = send_json(&app, Method::POST, "/guess?guess=1234").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body.error, "RepeatedGuess");
    assert_eq!(body.message, "Guess already made: 1234");

    let (_, view): (_, SessionView) = send_json(&app, Method::GET, "/state").await;
    assert_eq!(view.guesses.len(), 1);
    assert_eq!(view.attempts_remaining, Some(AttemptsRemaining::Limited(9)));
}

#[tokio::test]
async fn test_guess_errors() {
    let app = app("4827");

    let (status, body): (_, ErrorBody) = send_json(&app, Method::POST, "/guess?guess=1234").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body.error, "SessionNotActive");
    assert_eq!(body.message, "Game not started");

    send(&app, Method::POST, "/start?limit=10").await;

    let (status, body): (_, ErrorBody) = send_json(&app, Method::POST, "/guess?guess=12a3").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body.error, "MalformedGuess");

    let (status, body): (_, ErrorBody) = send_json(&app, Method::POST, "/guess?guess=1123").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body.error, "DuplicateDigits");

    for uri in ["/guess", "/guess?guess=", "/guess?guess=1234&guess=5678"] {
        let (status, body): (_, ErrorBody) = send_json(&app, Method::POST, uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body.error, "MalformedGuess", "{uri}");
    }

    send(&app, Method::POST, "/guess?guess=4827").await;
    let (status, body): (_, ErrorBody) = send_json(&app, Method::POST, "/guess?guess=1234").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body.error, "SessionNotActive");
}

#[tokio::test]
async fn test_past_guesses_shape() {
    let app = app("4827");
    send(&app, Method::POST, "/start?limit=10").await;
    send(&app, Method::POST, "/guess?guess=1234").await;
    send(&app, Method::POST, "/guess?guess=7840").await;

    let (status, body) = send(&app, Method::GET, "/past_guesses").await;
    assert_eq!(status, StatusCode::OK);

    let json: serde_json::Value = serde_json::from_slice(&body).expect("json");
    let list = json["past_guesses"].as_array().expect("past_guesses array");
    assert_eq!(list.len(), 2);
    assert_eq!(list[0]["guess"], "1234");
    assert_eq!(list[0]["digits_correct"], 2);
    assert_eq!(list[0]["positions_correct"], 0);
    assert_eq!(list[1]["guess"], "7840");
    assert_eq!(list[1]["digits_correct"], 3);
    assert_eq!(list[1]["positions_correct"], 1);
}

#[tokio::test]
async fn test_state_and_reset() {
    let app = app("4827");

    let (_, view): (_, SessionView) = send_json(&app, Method::GET, "/state").await;
    assert_eq!(view.phase, Phase::NotStarted);

    send(&app, Method::POST, "/start?limit=15").await;
    send(&app, Method::POST, "/guess?guess=1234").await;

    let (_, view): (_, SessionView) = send_json(&app, Method::GET, "/state").await;
    assert_eq!(view.phase, Phase::Playing);
    assert_eq!(view.attempts_remaining, Some(AttemptsRemaining::Limited(14)));
    assert_eq!(view.guesses.len(), 1);
    assert!(view.secret.is_none());

    let (status, _) = send(&app, Method::POST, "/reset").await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, view): (_, SessionView) = send_json(&app, Method::GET, "/state").await;
    assert_eq!(view.phase, Phase::NotStarted);

    let (_, history): (_, PastGuessesResponse) =
        send_json(&app, Method::GET, "/past_guesses").await;
    assert!(history.past_guesses.is_empty());
}

#[tokio::test]
async fn test_players_are_isolated() {
    let app = app("4827");
    send(&app, Method::POST, "/start?limit=10&player=alice").await;
    send(&app, Method::POST, "/guess?guess=1234&player=alice").await;

    let (status, _) = send(&app, Method::POST, "/guess?guess=1234&player=bob").await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, alice): (_, PastGuessesResponse) =
        send_json(&app, Method::GET, "/past_guesses?player=alice").await;
    let (_, default): (_, PastGuessesResponse) =
        send_json(&app, Method::GET, "/past_guesses").await;
    assert_eq!(alice.past_guesses.len(), 1);
    assert!(default.past_guesses.is_empty());
}

#[tokio::test]
async fn test_cors_allowed_origin() {
    let config = ServiceConfig::from_toml(&format!("allowed_origins = [{ORIGIN:?}]")).expect("config");
    let app = app_with("4827", &config);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/start")
                .header(header::ORIGIN, ORIGIN)
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("infallible");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).map(|v| v.as_bytes()),
        Some(ORIGIN.as_bytes())
    );

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::GET)
                .uri("/health")
                .header(header::ORIGIN, "http://evil.example")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("infallible");
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
}
