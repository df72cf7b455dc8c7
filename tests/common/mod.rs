use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::{json, Value};

static SERVER: OnceLock<TestServer> = OnceLock::new();

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        // Spawn the already-built binary to keep start fast during tests
        let mut cmd = Command::new("target/debug/matterbook-api");
        cmd.env("MATTERBOOK_PORT", port.to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        // Inherit environment so the server sees DATABASE_URL and JWT_SECRET
        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self { port, base_url, child })
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
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!(
            "server did not become ready on {} within {:?}",
            self.base_url,
            timeout
        )
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
    }
}

/// Returns None (skipping the test) when no database is configured; the
/// server cannot come up without one.
pub async fn ensure_server() -> Result<Option<&'static TestServer>> {
    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("DATABASE_URL not set; skipping integration test");
        return Ok(None);
    }

    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(15)).await?;
    Ok(Some(server))
}

/// Unique-per-run email so repeated test runs never trip the signup
/// uniqueness constraint
pub fn unique_email(prefix: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{}-{}@example.test", prefix, nanos)
}

/// Sign up a fresh firm user and return (token, user id)
pub async fn signup_firm(
    client: &reqwest::Client,
    base_url: &str,
    email: &str,
) -> Result<(String, String)> {
    let res = client
        .post(format!("{}/api/auth/signup", base_url))
        .json(&json!({
            "email": email,
            "password": "password123",
            "first_name": "Test",
            "last_name": "Lawyer",
            "firm_name": "Test & Partners"
        }))
        .send()
        .await?;
    anyhow::ensure!(res.status() == StatusCode::OK, "signup failed: {}", res.status());

    let body: Value = res.json().await?;
    let token = body["data"]["token"].as_str().context("missing token")?.to_string();
    let user_id = body["data"]["user"]["id"].as_str().context("missing user id")?.to_string();
    Ok((token, user_id))
}

/// Create a customer under the given firm token and return its id
pub async fn create_customer(
    client: &reqwest::Client,
    base_url: &str,
    token: &str,
    body: Value,
) -> Result<String> {
    let res = client
        .post(format!("{}/api/customers", base_url))
        .bearer_auth(token)
        .json(&body)
        .send()
        .await?;
    anyhow::ensure!(
        res.status() == StatusCode::CREATED,
        "customer create failed: {}",
        res.status()
    );

    let body: Value = res.json().await?;
    Ok(body["data"]["id"].as_str().context("missing customer id")?.to_string())
}

/// Create a matter under a customer and return its id
pub async fn create_matter(
    client: &reqwest::Client,
    base_url: &str,
    token: &str,
    customer_id: &str,
    name: &str,
) -> Result<String> {
    let res = client
        .post(format!("{}/api/customers/{}/matters", base_url, customer_id))
        .bearer_auth(token)
        .json(&json!({
            "name": name,
            "description": "Integration test matter",
            "status": "Active"
        }))
        .send()
        .await?;
    anyhow::ensure!(
        res.status() == StatusCode::CREATED,
        "matter create failed: {}",
        res.status()
    );

    let body: Value = res.json().await?;
    Ok(body["data"]["id"].as_str().context("missing matter id")?.to_string())
}
