mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::Value;

use common::TestServer;

#[tokio::test]
async fn listing_users_is_admin_only() -> Result<()> {
    let server = TestServer::spawn().await?;
    let (member, _) = common::signup(&server, "Member", "member@x.com", "pw", None).await?;
    let (admin, _) = common::signup(&server, "Admin", "admin@x.com", "pw", Some("admin")).await?;

    let envelope = member.get_users().await;
    assert!(!envelope.is_success());
    assert_eq!(
        envelope.message.as_deref(),
        Some("Insufficient permissions")
    );

    let envelope = admin.get_users().await;
    assert!(envelope.is_success());
    let users = envelope.data.expect("data")["users"]
        .as_array()
        .expect("users array")
        .clone();
    assert_eq!(users.len(), 2);
    assert!(users.iter().all(|u| u.get("password_hash").is_none()));
    Ok(())
}

#[tokio::test]
async fn profiles_are_visible_to_self_and_admin_only() -> Result<()> {
    let server = TestServer::spawn().await?;
    let (alice, alice_id) = common::signup(&server, "Alice", "alice@x.com", "pw", None).await?;
    let (bob, bob_id) = common::signup(&server, "Bob", "bob@x.com", "pw", None).await?;
    let (admin, _) = common::signup(&server, "Admin", "admin@x.com", "pw", Some("admin")).await?;

    let envelope = bob.get_user(alice_id).await;
    assert!(!envelope.is_success());
    assert_eq!(
        envelope.message.as_deref(),
        Some("Insufficient permissions")
    );

    let envelope = alice.get_user(alice_id).await;
    assert!(envelope.is_success());

    let envelope = admin.get_user(bob_id).await;
    assert!(envelope.is_success());
    assert_eq!(envelope.data.expect("data")["user"]["email"], "bob@x.com");
    Ok(())
}

#[tokio::test]
async fn profile_lists_actual_membership_roles() -> Result<()> {
    let server = TestServer::spawn().await?;
    let (alice, alice_id) = common::signup(&server, "Alice", "alice@x.com", "pw", None).await?;
    let (_, bob_id) = common::signup(&server, "Bob", "bob@x.com", "pw", None).await?;

    let envelope = alice.create_project("Apollo", "moonshot").await;
    let project_id = envelope.data.expect("project")["project_id"]
        .as_i64()
        .expect("id");
    alice
        .add_project_member(project_id, bob_id, "viewer")
        .await;

    let envelope = alice.get_user(alice_id).await;
    let projects = envelope.data.expect("data")["user"]["projects"].clone();
    assert_eq!(projects[0]["name"], "Apollo");
    assert_eq!(projects[0]["role"], "owner");

    let bob = common::login(&server, "bob@x.com", "pw").await?;
    let envelope = bob.get_user(bob_id).await;
    let projects = envelope.data.expect("data")["user"]["projects"].clone();
    assert_eq!(projects[0]["role"], "viewer");
    Ok(())
}

#[tokio::test]
async fn update_user_checks_identity_and_email_uniqueness() -> Result<()> {
    let server = TestServer::spawn().await?;
    let (alice, alice_id) = common::signup(&server, "Alice", "alice@x.com", "pw", None).await?;
    let (bob, bob_id) = common::signup(&server, "Bob", "bob@x.com", "pw", None).await?;

    // Not your profile
    let envelope = bob.update_user(alice_id, Some("Hacked"), None).await;
    assert!(!envelope.is_success());

    let envelope = alice.update_user(alice_id, Some("Alice Cooper"), None).await;
    assert!(envelope.is_success());
    assert_eq!(envelope.data.expect("data")["name"], "Alice Cooper");

    // Taking someone else's email conflicts
    let http = reqwest::Client::new();
    let res = http
        .patch(server.url(&format!("/users/{bob_id}")))
        .bearer_auth(bob.token().expect("token"))
        .json(&serde_json::json!({ "email": "alice@x.com" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body = res.json::<Value>().await?;
    assert_eq!(body["message"], "User with this email already exists");
    Ok(())
}
