//! HTTP surface integration tests.
//!
//! The only HTTP surface is the WebSocket upgrade; plain requests are
//! rejected and any origin is allowed.

mod fixtures;
use fixtures::TestServer;

#[tokio::test]
async fn test_plain_get_is_rejected() {
    // テスト項目: Upgrade ヘッダーのない GET はクライアントエラーになる
    // given (前提条件):
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    // when (操作):
    let response = client
        .get(format!("{}/api/health", server.base_url()))
        .send()
        .await
        .expect("Failed to send request");

    // then (期待する結果):
    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn test_post_is_rejected() {
    // テスト項目: GET 以外のメソッドはクライアントエラーになる
    // given (前提条件):
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    // when (操作):
    let response = client
        .post(server.base_url())
        .body(r#"{"data":"hi"}"#)
        .send()
        .await
        .expect("Failed to send request");

    // then (期待する結果):
    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn test_cors_preflight_allows_any_origin() {
    // テスト項目: 任意のオリジンからのプリフライトが許可される
    // given (前提条件):
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    // when (操作):
    let response = client
        .request(reqwest::Method::OPTIONS, server.base_url())
        .header("Origin", "http://example.com")
        .header("Access-Control-Request-Method", "GET")
        .send()
        .await
        .expect("Failed to send request");

    // then (期待する結果):
    assert!(response.status().is_success());
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}
