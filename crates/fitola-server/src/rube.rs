//! Rube MCP gateway client. Forwards recipe-hub discovery queries upstream
//! and relays the JSON verbatim.

use fitola_config::GatewayConfig;
use fitola_core::{FitolaError, Result};
use std::time::Duration;
use tracing::{debug, warn};

pub struct RubeClient {
    base_url: String,
    token: Option<String>,
    client: reqwest::Client,
}

impl RubeClient {
    /// Build from config. The base URL must be `https://`.
    pub fn new(config: &GatewayConfig) -> Result<Self> {
        if !config.base_url.starts_with("https://") {
            return Err(FitolaError::ConfigValidation {
                field: "gateway.base_url".into(),
                reason: "RUBE_MCP_BASE_URL must use https.".into(),
            });
        }
        Self::from_parts(
            &config.base_url,
            config.token.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    /// Build without the scheme check (tests, local proxies).
    pub fn from_parts(base_url: &str, token: Option<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FitolaError::GatewayTransport(e.to_string()))?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.is_empty()),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// `GET {base}/recipe-hub/discover` with the caller's query parameters.
    pub async fn discover(&self, query: &[(String, String)]) -> Result<serde_json::Value> {
        let token = self.token.as_ref().ok_or(FitolaError::GatewayNotConfigured)?;
        let url = format!("{}/recipe-hub/discover", self.base_url);
        debug!(url = %url, params = query.len(), "forwarding recipe discovery");

        let resp = self
            .client
            .get(&url)
            .query(query)
            .bearer_auth(token)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, url = %url, "rube request failed");
                FitolaError::GatewayTransport(e.to_string())
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FitolaError::GatewayStatus {
                status: status.as_u16(),
            });
        }

        let body = resp
            .text()
            .await
            .map_err(|e| FitolaError::GatewayTransport(e.to_string()))?;
        serde_json::from_str(&body).map_err(|_| FitolaError::GatewayInvalidJson)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_plain_http() {
        let config = GatewayConfig {
            base_url: "http://rube.app".into(),
            ..Default::default()
        };
        assert!(matches!(
            RubeClient::new(&config),
            Err(FitolaError::ConfigValidation { .. })
        ));
    }

    #[test]
    fn test_empty_token_treated_as_missing() {
        let client =
            RubeClient::from_parts("https://rube.app/", Some(String::new()), Duration::from_secs(1))
                .unwrap();
        assert!(!client.has_token());
        assert_eq!(client.base_url(), "https://rube.app");
    }

    #[tokio::test]
    async fn test_missing_token_fails_before_request() {
        let client = RubeClient::new(&GatewayConfig::default()).unwrap();
        assert!(matches!(
            client.discover(&[]).await,
            Err(FitolaError::GatewayNotConfigured)
        ));
    }
}
