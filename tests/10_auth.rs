mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

use common::TestServer;

#[tokio::test]
async fn health_endpoint_responds() -> Result<()> {
    let server = TestServer::spawn().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/health", server.base_url))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<Value>().await?;
    assert_eq!(body["status"], "success");
    assert_eq!(body["data"]["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn register_returns_created_without_password() -> Result<()> {
    let server = TestServer::spawn().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(server.url("/auth/register"))
        .json(&json!({ "name": "Alice", "email": "alice@x.com", "password": "pw1" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let body = res.json::<Value>().await?;
    assert_eq!(body["status"], "success");
    assert_eq!(body["data"]["email"], "alice@x.com");
    assert_eq!(body["data"]["role"], "member");
    // The hash must never appear in a response
    assert!(body["data"].get("password").is_none());
    assert!(body["data"].get("password_hash").is_none());
    Ok(())
}

#[tokio::test]
async fn register_validates_and_rejects_duplicates() -> Result<()> {
    let server = TestServer::spawn().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(server.url("/auth/register"))
        .json(&json!({ "email": "a@x.com", "password": "pw" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = res.json::<Value>().await?;
    assert_eq!(body["message"], "Name, email, and password are required");

    common::register_user(&server, "Alice", "alice@x.com", "pw1", None).await?;
    let res = client
        .post(server.url("/auth/register"))
        .json(&json!({ "name": "Imposter", "email": "alice@x.com", "password": "pw2" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body = res.json::<Value>().await?;
    assert_eq!(body["message"], "User with this email already exists");
    Ok(())
}

#[tokio::test]
async fn login_roundtrip_and_me() -> Result<()> {
    let server = TestServer::spawn().await?;
    let user_id = common::register_user(&server, "Alice", "alice@x.com", "pw1", None).await?;

    let client = common::login(&server, "alice@x.com", "pw1").await?;
    let me = client.current_user().await;
    assert!(me.is_success());
    let data = me.data.expect("me data");
    assert_eq!(data["user_id"].as_i64(), Some(user_id));
    assert_eq!(data["email"], "alice@x.com");
    assert_eq!(data["role"], "member");
    Ok(())
}

#[tokio::test]
async fn login_failures_return_401_without_token() -> Result<()> {
    let server = TestServer::spawn().await?;
    common::register_user(&server, "Alice", "alice@x.com", "pw1", None).await?;
    let client = reqwest::Client::new();

    for payload in [
        json!({ "email": "alice@x.com", "password": "wrong" }),
        json!({ "email": "nobody@x.com", "password": "pw1" }),
    ] {
        let res = client
            .post(server.url("/auth/login"))
            .json(&payload)
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let body = res.json::<Value>().await?;
        assert_eq!(body["message"], "Invalid credentials");
        assert!(body.get("token").is_none());
    }
    Ok(())
}

#[tokio::test]
async fn protected_routes_reject_missing_and_bad_tokens() -> Result<()> {
    let server = TestServer::spawn().await?;
    let client = reqwest::Client::new();

    let res = client.get(server.url("/auth/me")).send().await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body = res.json::<Value>().await?;
    assert_eq!(body["message"], "No token provided");

    let res = client
        .get(server.url("/auth/me"))
        .bearer_auth("not-a-real-token")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body = res.json::<Value>().await?;
    assert_eq!(body["message"], "Invalid token");
    Ok(())
}

#[tokio::test]
async fn change_password_flow() -> Result<()> {
    let server = TestServer::spawn().await?;
    let (client, _) = common::signup(&server, "Alice", "alice@x.com", "pw1", None).await?;

    let envelope = client.change_password("wrong", "pw2").await;
    assert!(!envelope.is_success());
    assert_eq!(
        envelope.message.as_deref(),
        Some("Current password is incorrect")
    );

    let envelope = client.change_password("pw1", "pw2").await;
    assert!(envelope.is_success());

    // Old password no longer works, new one does
    let mut stale = server.client();
    let envelope = stale.login("alice@x.com", "pw1").await;
    assert!(!envelope.is_success());
    common::login(&server, "alice@x.com", "pw2").await?;
    Ok(())
}
