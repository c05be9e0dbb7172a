//! Failure injection tests: unreachable backends, non-JSON answers and the
//! routes that degrade gracefully.

use laserkongen_proxy::ProxyConfig;
use serde_json::json;

mod common;

use common::{client, json, unreachable_backend_url, MockBackend, TestProxy};

#[tokio::test]
async fn unreachable_backend_yields_generic_500() {
    let proxy = TestProxy::start(&unreachable_backend_url().await).await;

    let res = client().get(proxy.url("/api/products")).send().await.unwrap();
    let (status, body) = json(res).await;
    assert_eq!(status, 500);
    assert_eq!(body, json!({"message": "Server error while contacting backend"}));
}

#[tokio::test]
async fn non_json_backend_answer_counts_as_unreachable() {
    let backend = MockBackend::start(200, "<html>Bad gateway</html>").await;
    let proxy = TestProxy::start(&backend.url()).await;

    let res = client().get(proxy.url("/api/settings/site")).send().await.unwrap();
    let (status, body) = json(res).await;
    assert_eq!(status, 500);
    assert_eq!(body["message"], "Server error while contacting backend");
    assert!(body.get("error").is_none());
    assert_eq!(backend.call_count(), 1);
}

#[tokio::test]
async fn error_details_are_exposed_only_when_configured() {
    let mut config = ProxyConfig::default();
    config.backend.base_url = unreachable_backend_url().await;
    config.observability.metrics_enabled = false;
    config.observability.expose_error_details = true;
    let proxy = TestProxy::start_with(config).await;

    let res = client().get(proxy.url("/api/products")).send().await.unwrap();
    let (status, body) = json(res).await;
    assert_eq!(status, 500);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("backend request failed"));
}

#[tokio::test]
async fn logout_succeeds_even_when_backend_is_down() {
    let proxy = TestProxy::start(&unreachable_backend_url().await).await;

    let res = client()
        .post(proxy.url("/api/users/logout"))
        .header("Authorization", "Bearer t")
        .send()
        .await
        .unwrap();
    let (status, body) = json(res).await;
    assert_eq!(status, 200);
    assert_eq!(body, json!({"message": "Logout successful"}));
}

#[tokio::test]
async fn logout_succeeds_even_when_backend_errors() {
    let backend = MockBackend::start(500, r#"{"message":"Session store offline"}"#).await;
    let proxy = TestProxy::start(&backend.url()).await;

    let res = client()
        .post(proxy.url("/api/users/logout"))
        .send()
        .await
        .unwrap();
    let (status, body) = json(res).await;
    assert_eq!(status, 200);
    assert_eq!(body, json!({"message": "Logout successful"}));
    assert_eq!(backend.call_count(), 1);
}

#[tokio::test]
async fn vipps_test_degrades_to_placeholder_when_backend_is_down() {
    let proxy = TestProxy::start(&unreachable_backend_url().await).await;

    let res = client()
        .post(proxy.url("/api/settings/payments/vipps/test"))
        .header("Authorization", "Bearer admin")
        .send()
        .await
        .unwrap();
    let (status, body) = json(res).await;
    assert_eq!(status, 200);
    assert_eq!(
        body,
        json!({
            "message": "Testing capability will be available soon",
            "success": true,
            "testMode": true,
        })
    );
}

#[tokio::test]
async fn vipps_test_relays_real_backend_answers() {
    let backend = MockBackend::start(502, r#"{"message":"Vipps rejected credentials"}"#).await;
    let proxy = TestProxy::start(&backend.url()).await;

    let res = client()
        .post(proxy.url("/api/settings/payments/vipps/test"))
        .header("Authorization", "Bearer admin")
        .json(&json!({"environment": "test"}))
        .send()
        .await
        .unwrap();
    let (status, body) = json(res).await;
    assert_eq!(status, 502);
    assert_eq!(body, json!({"message": "Vipps rejected credentials"}));
}

#[tokio::test]
async fn slow_backend_times_out_as_unreachable() {
    let mut config = ProxyConfig::default();
    config.backend.timeout_secs = 1;
    config.observability.metrics_enabled = false;

    // A listener that accepts connections but never answers.
    let silent = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    config.backend.base_url = format!("http://{}", silent.local_addr().unwrap());
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = silent.accept().await {
            held.push(socket);
        }
    });

    let proxy = TestProxy::start_with(config).await;
    let res = client().get(proxy.url("/api/products")).send().await.unwrap();
    let (status, body) = json(res).await;
    assert_eq!(status, 500);
    assert_eq!(body["message"], "Server error while contacting backend");
}
