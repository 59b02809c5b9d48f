//! ZeroTier Controller API Client
//!
//! Outbound proxy to the local controller service. The gateway does not
//! model controller documents; responses pass through as raw JSON.

use anyhow::{Context, Result};
use reqwest::Client;
use serde_json::{json, Value};
use std::path::Path;
use std::time::Duration;
use tracing::info;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Clone)]
pub struct ControllerClient {
    client: Client,
    base_url: String,
}

impl ControllerClient {
    /// Build a client against `zt_address` (host:port of the controller
    /// service), authenticating with the token in `<zt_home>/authtoken.secret`.
    pub fn new(zt_address: &str, zt_home: &Path) -> Result<Self> {
        let token_path = zt_home.join("authtoken.secret");
        let token = std::fs::read_to_string(&token_path)
            .with_context(|| format!("Cannot read auth token from {}", token_path.display()))?;
        let token = token.trim().to_string();

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .default_headers({
                let mut headers = reqwest::header::HeaderMap::new();
                headers.insert(
                    "X-ZT1-Auth",
                    token.parse().context("Invalid controller auth token")?,
                );
                headers
            })
            .build()
            .context("Failed to build controller HTTP client")?;

        let base_url = format!("http://{}", zt_address);
        info!("🌐 Controller API client initialized (base: {})", base_url);

        Ok(Self { client, base_url })
    }

    #[inline]
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json(&self, path: &str) -> Result<Value> {
        let resp = self
            .client
            .get(self.url(path))
            .send()
            .await
            .with_context(|| format!("GET {} failed", path))?;

        if !resp.status().is_success() {
            anyhow::bail!("GET {} returned {}", path, resp.status());
        }

        resp.json::<Value>()
            .await
            .with_context(|| format!("GET {} returned invalid JSON", path))
    }

    async fn post_json(&self, path: &str, body: &Value) -> Result<Value> {
        let resp = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .with_context(|| format!("POST {} failed", path))?;

        if !resp.status().is_success() {
            anyhow::bail!("POST {} returned {}", path, resp.status());
        }

        resp.json::<Value>()
            .await
            .with_context(|| format!("POST {} returned invalid JSON", path))
    }

    async fn delete(&self, path: &str) -> Result<()> {
        let resp = self
            .client
            .delete(self.url(path))
            .send()
            .await
            .with_context(|| format!("DELETE {} failed", path))?;

        if !resp.status().is_success() {
            anyhow::bail!("DELETE {} returned {}", path, resp.status());
        }

        Ok(())
    }

    /// Reachability probe with a tighter deadline than regular calls. Used
    /// by startup validation and the periodic watchdog.
    pub async fn check_connection(&self) -> bool {
        self.client
            .get(self.url("/status"))
            .timeout(HEALTH_TIMEOUT)
            .send()
            .await
            .map(|r| r.status().is_success())
            .unwrap_or(false)
    }

    pub async fn status(&self) -> Result<Value> {
        self.get_json("/status").await
    }

    pub async fn list_networks(&self) -> Result<Value> {
        self.get_json("/controller/network").await
    }

    pub async fn create_network(&self, name: &str, description: &str) -> Result<Value> {
        let body = json!({
            "config": {
                "name": name,
                "description": description,
                "private": true,
                "enableBroadcast": true,
                "v4AssignMode": { "zt": true },
            }
        });
        self.post_json("/controller/network", &body).await
    }

    pub async fn get_network(&self, network_id: &str) -> Result<Value> {
        self.get_json(&format!("/controller/network/{}", network_id))
            .await
    }

    pub async fn update_network(&self, network_id: &str, config: &Value) -> Result<Value> {
        self.post_json(&format!("/controller/network/{}", network_id), config)
            .await
    }

    pub async fn delete_network(&self, network_id: &str) -> Result<()> {
        self.delete(&format!("/controller/network/{}", network_id))
            .await
    }

    pub async fn list_members(&self, network_id: &str) -> Result<Value> {
        self.get_json(&format!("/controller/network/{}/member", network_id))
            .await
    }

    pub async fn get_member(&self, network_id: &str, member_id: &str) -> Result<Value> {
        self.get_json(&format!(
            "/controller/network/{}/member/{}",
            network_id, member_id
        ))
        .await
    }

    pub async fn update_member(
        &self,
        network_id: &str,
        member_id: &str,
        config: &Value,
    ) -> Result<Value> {
        self.post_json(
            &format!("/controller/network/{}/member/{}", network_id, member_id),
            config,
        )
        .await
    }

    pub async fn delete_member(&self, network_id: &str, member_id: &str) -> Result<()> {
        self.delete(&format!(
            "/controller/network/{}/member/{}",
            network_id, member_id
        ))
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_client() -> (ControllerClient, TempDir) {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("authtoken.secret"), "testtoken\n").unwrap();
        // Port 1 is never listening; calls would fail fast if made
        let client = ControllerClient::new("127.0.0.1:1", dir.path()).unwrap();
        (client, dir)
    }

    #[test]
    fn test_new_requires_token_file() {
        let dir = TempDir::new().unwrap();
        assert!(ControllerClient::new("127.0.0.1:9993", dir.path()).is_err());
    }

    #[test]
    fn test_token_trimmed_and_urls_formed() {
        let (client, _dir) = create_test_client();
        assert_eq!(client.base_url, "http://127.0.0.1:1");
        assert_eq!(
            client.url("/controller/network/1234567890abcdef"),
            "http://127.0.0.1:1/controller/network/1234567890abcdef"
        );
    }

    #[tokio::test]
    async fn test_check_connection_unreachable() {
        let (client, _dir) = create_test_client();
        assert!(!client.check_connection().await);
    }
}
