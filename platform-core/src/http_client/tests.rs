#![allow(clippy::disallowed_methods)] // unwrap() is acceptable in tests

use super::*;
use crate::error::Error;
use crate::pool::PoolConfig;
use crate::retry_strategy::RetryConfig;
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use reqwest::{Method, StatusCode};
use std::time::Duration;
use url::Url;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn url(s: &str) -> Url {
    Url::parse(s).unwrap()
}

#[test]
fn test_http_config_defaults() {
    let config = HttpConfig::default();
    assert_eq!(config.retry_config.max_attempts, 5);
    assert_eq!(config.pool.max_total, 100);
    assert!(config.call_timeout.is_none());
    assert!(config.validate().is_ok());
}

#[test]
fn test_http_config_validation() {
    let zero_timeout = HttpConfig {
        call_timeout: Some(Duration::ZERO),
        ..Default::default()
    };
    assert_eq!(
        zero_timeout.validate().unwrap_err().field_name(),
        "call_timeout"
    );

    let bad_pool = HttpConfig {
        pool: PoolConfig {
            max_per_route: 0,
            ..Default::default()
        },
        ..Default::default()
    };
    assert_eq!(bad_pool.validate().unwrap_err().field_name(), "max_per_route");

    let bad_retry = HttpConfig {
        retry_config: RetryConfig {
            max_attempts: 0,
            ..Default::default()
        },
        ..Default::default()
    };
    assert!(matches!(HttpClient::new(bad_retry), Err(Error::Config(_))));

    let short = HttpConfig {
        call_timeout: Some(Duration::from_secs(1)),
        ..Default::default()
    };
    assert!(short.validate().unwrap().has_warnings());
}

#[test]
fn test_request_idempotency() {
    let get = HttpRequest::get(url("http://localhost/a"));
    assert!(get.is_idempotent());

    let post = HttpRequest::post(url("http://localhost/a")).body("x");
    assert!(!post.is_idempotent());
    assert_eq!(post.method, Method::POST);
}

#[test]
fn test_json_body_keeps_explicit_content_type() {
    let request = HttpRequest::post(url("http://localhost/a"))
        .header(
            CONTENT_TYPE,
            HeaderValue::from_static("application/json; charset=UTF-8"),
        )
        .json_body(&serde_json::json!({"dataId": 12}))
        .unwrap();
    assert_eq!(
        request.headers.get(CONTENT_TYPE).unwrap(),
        "application/json; charset=UTF-8"
    );
    assert_eq!(request.body.as_deref(), Some(br#"{"dataId":12}"#.as_slice()));

    let defaulted = HttpRequest::post(url("http://localhost/a"))
        .json_body(&serde_json::json!([]))
        .unwrap();
    assert_eq!(
        defaulted.headers.get(CONTENT_TYPE).unwrap(),
        "application/json"
    );
}

#[test]
fn test_http_response_accessors() {
    let response = HttpResponse::new(
        StatusCode::OK,
        Default::default(),
        br#"{"sign":"abc"}"#.to_vec(),
    );
    assert_eq!(response.text(), r#"{"sign":"abc"}"#);
    let value: serde_json::Value = response.json().unwrap();
    assert_eq!(value["sign"], "abc");

    let broken = HttpResponse::new(StatusCode::OK, Default::default(), b"{".to_vec());
    assert!(matches!(
        broken.json::<serde_json::Value>(),
        Err(Error::Parse(_))
    ));
}

#[tokio::test]
async fn test_execute_post_returns_any_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ok"))
        .and(header("content-type", "application/json"))
        .and(body_json(serde_json::json!({"a": 1})))
        .respond_with(ResponseTemplate::new(200).set_body_string("fine"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpClient::new(HttpConfig::default()).unwrap();
    let base = url(&server.uri());

    let ok = client
        .execute(
            HttpRequest::post(base.join("/ok").unwrap())
                .json_body(&serde_json::json!({"a": 1}))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(ok.status(), StatusCode::OK);
    assert_eq!(ok.text(), "fine");

    let broken = client
        .execute(HttpRequest::post(base.join("/broken").unwrap()).body("{}"))
        .await
        .unwrap();
    assert_eq!(broken.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_sequential_requests_reuse_connection() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let client = HttpClient::new(HttpConfig::default()).unwrap();
    let target = url(&server.uri());
    for _ in 0..3 {
        client.execute(HttpRequest::get(target.clone())).await.unwrap();
    }

    let stats = client.pool().stats();
    assert_eq!(stats.live, 1);
    assert_eq!(stats.idle, 1);
}

#[tokio::test]
async fn test_response_size_limit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("x".repeat(64)))
        .mount(&server)
        .await;

    let client = HttpClient::new(HttpConfig {
        max_response_size: 16,
        ..Default::default()
    })
    .unwrap();
    let err = client
        .execute(HttpRequest::get(url(&server.uri())))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidRequest(_)));
    assert_eq!(client.pool().stats().live, 0);
}

#[tokio::test]
async fn test_call_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let client = HttpClient::new(HttpConfig {
        call_timeout: Some(Duration::from_millis(100)),
        ..Default::default()
    })
    .unwrap();
    let err = client
        .execute(HttpRequest::get(url(&server.uri())))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Timeout(_)));
}

#[tokio::test]
async fn test_shutdown_cancels_calls() {
    let client = HttpClient::new(HttpConfig::default()).unwrap();
    client.shutdown();
    let err = client
        .execute(HttpRequest::get(url("http://127.0.0.1:9/")))
        .await
        .unwrap_err();
    assert!(err.as_cancelled().is_some());
}
