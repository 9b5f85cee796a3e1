//! Tests for the retrying client against a local HTTP server.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use insightful_error::HttpErrorKind;
use insightful_rate_limit::{RateLimiter, RetryPolicy, RetryingClient};
use reqwest::header::HeaderMap;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

#[derive(Clone, Default)]
struct Hits {
    count: Arc<AtomicUsize>,
    at: Arc<Mutex<Vec<Instant>>>,
}

impl Hits {
    fn record(&self) -> usize {
        self.at.lock().unwrap().push(Instant::now());
        self.count.fetch_add(1, Ordering::SeqCst)
    }

    fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

async fn spawn_server(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

fn fast_client(limiter: RateLimiter) -> RetryingClient {
    let policy = RetryPolicy::default()
        .with_backoff_factor(0.01)
        .with_timeout(Duration::from_secs(5));
    RetryingClient::new(Arc::new(limiter), policy).unwrap()
}

#[tokio::test]
async fn test_always_500_makes_exactly_three_attempts() {
    let hits = Hits::default();
    let router = Router::new()
        .route(
            "/fail",
            get(|State(hits): State<Hits>| async move {
                hits.record();
                (StatusCode::INTERNAL_SERVER_ERROR, "boom")
            }),
        )
        .with_state(hits.clone());
    let base = spawn_server(router).await;

    let client = fast_client(RateLimiter::unlimited());
    let err = client
        .get(&format!("{}/fail", base), &HeaderMap::new(), &[])
        .await
        .unwrap_err();

    assert_eq!(hits.count(), 3);
    assert_eq!(err.status(), Some(500));
}

#[tokio::test]
async fn test_retry_after_honored_then_success() {
    let hits = Hits::default();
    let router = Router::new()
        .route(
            "/limited",
            get(|State(hits): State<Hits>| async move {
                let response: Response = if hits.record() == 0 {
                    (StatusCode::TOO_MANY_REQUESTS, [("Retry-After", "2")], "slow down")
                        .into_response()
                } else {
                    Json(json!([{"name": "Slack", "usage": 10}])).into_response()
                };
                response
            }),
        )
        .with_state(hits.clone());
    let base = spawn_server(router).await;

    let client = fast_client(RateLimiter::unlimited());
    let body = client
        .get(&format!("{}/limited", base), &HeaderMap::new(), &[])
        .await
        .unwrap();

    assert_eq!(body, json!([{"name": "Slack", "usage": 10}]));
    assert_eq!(hits.count(), 2);
    let at = hits.at.lock().unwrap().clone();
    assert!(at[1].duration_since(at[0]) >= Duration::from_secs(2));
}

#[tokio::test]
async fn test_missing_retry_after_defaults_to_twice_request_delay() {
    let hits = Hits::default();
    let router = Router::new()
        .route(
            "/limited",
            get(|State(hits): State<Hits>| async move {
                let response: Response = if hits.record() == 0 {
                    StatusCode::TOO_MANY_REQUESTS.into_response()
                } else {
                    Json(json!([])).into_response()
                };
                response
            }),
        )
        .with_state(hits.clone());
    let base = spawn_server(router).await;

    let client = fast_client(RateLimiter::new(Duration::from_millis(150)));
    client
        .get(&format!("{}/limited", base), &HeaderMap::new(), &[])
        .await
        .unwrap();

    let at = hits.at.lock().unwrap().clone();
    assert!(at[1].duration_since(at[0]) >= Duration::from_millis(300));
}

#[tokio::test]
async fn test_persistent_429_exhausts_budget() {
    let hits = Hits::default();
    let router = Router::new()
        .route(
            "/limited",
            get(|State(hits): State<Hits>| async move {
                hits.record();
                (StatusCode::TOO_MANY_REQUESTS, [("Retry-After", "0")], "")
            }),
        )
        .with_state(hits.clone());
    let base = spawn_server(router).await;

    let client = fast_client(RateLimiter::unlimited());
    let err = client
        .get(&format!("{}/limited", base), &HeaderMap::new(), &[])
        .await
        .unwrap_err();

    assert_eq!(hits.count(), 3);
    assert!(matches!(err.kind(), HttpErrorKind::RateLimited { .. }));
}

#[tokio::test]
async fn test_recovers_after_transient_failure() {
    let hits = Hits::default();
    let router = Router::new()
        .route(
            "/flaky",
            get(|State(hits): State<Hits>| async move {
                let response: Response = if hits.record() == 0 {
                    StatusCode::BAD_GATEWAY.into_response()
                } else {
                    Json(json!({"ok": true})).into_response()
                };
                response
            }),
        )
        .with_state(hits.clone());
    let base = spawn_server(router).await;

    let client = fast_client(RateLimiter::unlimited());
    let body = client
        .get(&format!("{}/flaky", base), &HeaderMap::new(), &[])
        .await
        .unwrap();

    assert_eq!(body["ok"], true);
    assert_eq!(hits.count(), 2);
}

#[tokio::test]
async fn test_undecodable_body_is_not_retried() {
    let hits = Hits::default();
    let router = Router::new()
        .route(
            "/html",
            get(|State(hits): State<Hits>| async move {
                hits.record();
                "<html>not json</html>"
            }),
        )
        .with_state(hits.clone());
    let base = spawn_server(router).await;

    let client = fast_client(RateLimiter::unlimited());
    let err = client
        .get(&format!("{}/html", base), &HeaderMap::new(), &[])
        .await
        .unwrap_err();

    assert_eq!(hits.count(), 1);
    assert!(matches!(err.kind(), HttpErrorKind::Decode(_)));
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = fast_client(RateLimiter::unlimited());
    let err = client
        .get(&format!("http://{}/gone", addr), &HeaderMap::new(), &[])
        .await
        .unwrap_err();

    assert!(matches!(err.kind(), HttpErrorKind::Transport(_)));
}

#[tokio::test]
async fn test_query_params_and_headers_forwarded() {
    let router = Router::new().route(
        "/echo",
        get(
            |headers: axum::http::HeaderMap,
             axum::extract::Query(params): axum::extract::Query<
                std::collections::HashMap<String, String>,
            >| async move {
                Json(json!({
                    "auth": headers.get("authorization").and_then(|v| v.to_str().ok()),
                    "employeeId": params.get("employeeId"),
                }))
            },
        ),
    );
    let base = spawn_server(router).await;

    let mut headers = HeaderMap::new();
    headers.insert("Authorization", "Bearer secret".parse().unwrap());

    let client = fast_client(RateLimiter::unlimited());
    let body = client
        .get(
            &format!("{}/echo", base),
            &headers,
            &[("employeeId", "emp-7".to_string())],
        )
        .await
        .unwrap();

    assert_eq!(body["auth"], "Bearer secret");
    assert_eq!(body["employeeId"], "emp-7");
}

#[tokio::test]
async fn test_oversized_retry_after_falls_back_to_default_wait() {
    let hits = Hits::default();
    let router = Router::new()
        .route(
            "/limited",
            get(|State(hits): State<Hits>| async move {
                let response: Response = if hits.record() == 0 {
                    (StatusCode::TOO_MANY_REQUESTS, [("Retry-After", "1e20")], "slow down")
                        .into_response()
                } else {
                    Json(json!([{"name": "Zoom", "usage": 4}])).into_response()
                };
                response
            }),
        )
        .with_state(hits.clone());
    let base = spawn_server(router).await;

    let client = fast_client(RateLimiter::new(Duration::from_millis(50)));
    let body = client
        .get(&format!("{}/limited", base), &HeaderMap::new(), &[])
        .await
        .unwrap();

    assert_eq!(body, json!([{"name": "Zoom", "usage": 4}]));
    let at = hits.at.lock().unwrap().clone();
    let gap = at[1].duration_since(at[0]);
    assert!(gap >= Duration::from_millis(100), "gap {gap:?}");
    assert!(gap < Duration::from_secs(5), "gap {gap:?}");
}

#[tokio::test]
async fn test_rate_limit_consumes_attempt_without_advancing_backoff() {
    let hits = Hits::default();
    let router = Router::new()
        .route(
            "/mixed",
            get(|State(hits): State<Hits>| async move {
                let response: Response = match hits.record() {
                    0 => (StatusCode::TOO_MANY_REQUESTS, [("Retry-After", "0")], "slow down")
                        .into_response(),
                    1 => (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response(),
                    _ => Json(json!([])).into_response(),
                };
                response
            }),
        )
        .with_state(hits.clone());
    let base = spawn_server(router).await;

    let policy = RetryPolicy::default()
        .with_backoff_factor(0.5)
        .with_jitter_ratio(0.0)
        .with_timeout(Duration::from_secs(5));
    let client = RetryingClient::new(Arc::new(RateLimiter::unlimited()), policy).unwrap();
    let body = client
        .get(&format!("{}/mixed", base), &HeaderMap::new(), &[])
        .await
        .unwrap();

    assert_eq!(body, json!([]));
    assert_eq!(hits.count(), 3);
    let at = hits.at.lock().unwrap().clone();
    let gap = at[2].duration_since(at[1]);
    assert!(gap >= Duration::from_millis(500), "backoff after 500 was {gap:?}");
    assert!(gap < Duration::from_millis(1000), "backoff advanced a tier: {gap:?}");
}
