#![cfg(feature = "server")]

use std::time::{Duration, Instant};

use axum::{routing::get, Json, Router};

use reqwest::StatusCode;
use serde_json::json;
use simple_oauth2_core::{
    fetch_provider_metadata, Endpoint, HttpRequest, HttpTransport, Method, Oauth2Error,
    ProviderSettings, ReqwestTransport,
};
use simple_oauth2_testing::configuration_response;
use simple_oauth2_testing::mock_idp::MockIdpServer;
use tokio::net::TcpListener;

async fn start_server() -> ProviderSettings {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(MockIdpServer::serve(listener));

    ProviderSettings::from_raw(
        "mock-idp",
        &json!({
            "CLIENT_ID": "mock-idp",
            "BASE_URL": format!("http://{addr}"),
            "REDIRECT_URI": "http://localhost:3000/callback",
        }),
    )
    .unwrap()
}

#[tokio::test]
async fn discovery_over_http() {
    let settings = start_server().await;

    let metadata = fetch_provider_metadata(&settings).await.unwrap();

    assert_eq!(metadata.token_endpoint, "https://example.com/token");
    assert!(metadata.supports_signing_alg("HS256"));
}

#[tokio::test]
async fn token_and_unknown_paths_over_http() {
    let settings = start_server().await;
    let transport = ReqwestTransport::new(Duration::from_secs(5)).unwrap();

    let mut form = simple_oauth2_core::http::Form::new();
    form.insert("code".to_string(), "mock-idpabcde".to_string());
    let response = transport
        .send(HttpRequest {
            method: Method::Post,
            url: settings.endpoint_url(Endpoint::Token).unwrap().to_string(),
            form: Some(form),
            timeout: None,
        })
        .await
        .unwrap();
    assert_eq!(response.status, StatusCode::OK);
    let body: serde_json::Value = response.json().unwrap();
    assert_eq!(body["access_token"], "abcdefghijklmnopqrstuwxz");

    let response = transport
        .send(HttpRequest {
            method: Method::Get,
            url: settings.endpoint_url(Endpoint::Logout).unwrap().to_string(),
            form: None,
            timeout: None,
        })
        .await
        .unwrap();
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let err = response.error_for_status().unwrap_err();
    assert_eq!(err.request_body_json(), Some(json!({"detail": "Not found."})));
}

#[tokio::test]
async fn discovery_honors_provider_timeout() {
    let app = Router::new().route(
        "/.well-known/openid-configuration",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(3)).await;
            Json(configuration_response())
        }),
    );
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await });

    let settings = ProviderSettings::from_raw(
        "slow-idp",
        &json!({
            "CLIENT_ID": "slow-idp",
            "BASE_URL": format!("http://{addr}"),
            "REDIRECT_URI": "http://localhost:3000/callback",
            "TIMEOUT": 1,
        }),
    )
    .unwrap();

    let started = Instant::now();
    let result = fetch_provider_metadata(&settings).await;

    assert!(matches!(result, Err(Oauth2Error::Transport(_))));
    assert!(started.elapsed() < Duration::from_secs(3));
}
