//! End-to-end collaboration walkthrough, driven through the client SDK:
//! register, login, create a project and a task, comment on it - and the
//! same steps without a token are all rejected.

mod common;

use anyhow::Result;

use common::TestServer;

#[tokio::test]
async fn full_collaboration_walkthrough() -> Result<()> {
    let server = TestServer::spawn().await?;

    let envelope = server
        .client()
        .register("Alice", "alice@x.com", "pw1", None)
        .await;
    assert!(envelope.is_success());

    let mut alice = server.client();
    let envelope = alice.login("alice@x.com", "pw1").await;
    assert!(envelope.is_success());
    assert!(envelope.token.is_some());
    assert_eq!(
        envelope.data.as_ref().expect("data")["user"]["email"],
        "alice@x.com"
    );

    let envelope = alice.create_project("P", "first project").await;
    assert!(envelope.is_success());
    let project_id = envelope.data.expect("project")["project_id"]
        .as_i64()
        .expect("project_id");

    let envelope = alice
        .create_task(project_id, "T1", "first task", Some("todo"), None)
        .await;
    assert!(envelope.is_success());
    let task = envelope.data.expect("task");
    assert_eq!(task["status"], "todo");
    let task_id = task["task_id"].as_i64().expect("task_id");

    let envelope = alice.add_task_comment(task_id, "kicking this off").await;
    assert!(envelope.is_success());

    let envelope = alice.get_task_comments(task_id).await;
    assert!(envelope.is_success());
    let comments = envelope.data.expect("data")["comments"].clone();
    assert_eq!(comments.as_array().expect("comments").len(), 1);

    // Every step fails without a token
    let anonymous = server.client();
    for envelope in [
        anonymous.current_user().await,
        anonymous.create_project("P2", "d").await,
        anonymous.create_task(project_id, "T2", "d", None, None).await,
        anonymous.add_task_comment(task_id, "sneaky").await,
        anonymous.get_task_comments(task_id).await,
    ] {
        assert!(!envelope.is_success());
        assert_eq!(envelope.message.as_deref(), Some("No token provided"));
    }
    Ok(())
}
