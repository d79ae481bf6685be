use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;

use synergysphere_api::client::ApiClient;
use synergysphere_api::{routes, store::Store};

pub struct TestServer {
    pub base_url: String,
}

impl TestServer {
    /// Spawn the full router in-process on a free port. Every caller gets a
    /// fresh, empty store, so tests stay independent.
    pub async fn spawn() -> Result<Self> {
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind test port")?;

        let app = routes::app(Arc::new(Store::new()));
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("test server");
        });

        let server = Self {
            base_url: format!("http://127.0.0.1:{}", port),
        };
        server.wait_ready(Duration::from_secs(5)).await?;
        Ok(server)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(25)).await;
        }
        anyhow::bail!(
            "server did not become ready on {} within {:?}",
            self.base_url,
            timeout
        )
    }

    #[allow(dead_code)]
    pub fn client(&self) -> ApiClient {
        ApiClient::new(self.base_url.clone())
    }

    #[allow(dead_code)]
    pub fn url(&self, path: &str) -> String {
        format!("{}/api/v1{}", self.base_url, path)
    }
}

/// Register a user and return their id.
#[allow(dead_code)]
pub async fn register_user(
    server: &TestServer,
    name: &str,
    email: &str,
    password: &str,
    role: Option<&str>,
) -> Result<i64> {
    let envelope = server.client().register(name, email, password, role).await;
    anyhow::ensure!(
        envelope.is_success(),
        "register failed: {:?}",
        envelope.message
    );
    envelope
        .data
        .as_ref()
        .and_then(|data| data["user_id"].as_i64())
        .context("register response missing user_id")
}

/// Log in and return a client carrying the bearer token.
#[allow(dead_code)]
pub async fn login(server: &TestServer, email: &str, password: &str) -> Result<ApiClient> {
    let mut client = server.client();
    let envelope = client.login(email, password).await;
    anyhow::ensure!(envelope.is_success(), "login failed: {:?}", envelope.message);
    anyhow::ensure!(client.token().is_some(), "login returned no token");
    Ok(client)
}

/// Register + login in one step.
#[allow(dead_code)]
pub async fn signup(
    server: &TestServer,
    name: &str,
    email: &str,
    password: &str,
    role: Option<&str>,
) -> Result<(ApiClient, i64)> {
    let user_id = register_user(server, name, email, password, role).await?;
    let client = login(server, email, password).await?;
    Ok((client, user_id))
}
