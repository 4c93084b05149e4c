//! HTTP client for the Sansay XML status page.
//!
//! One [`SansayClient`] is shared by every collection cycle; each cycle
//! performs exactly one GET through [`SansayClient::fetch`].

use crate::config::SansayConfig;
use crate::error::{FetchError, Result};
use bytes::Bytes;
use reqwest::{Client, Url};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Sansay status page client.
#[derive(Clone)]
pub struct SansayClient {
    client: Client,
    config: SansayConfig,
}

impl SansayClient {
    /// Create a new client.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use sansay_exporter::client::SansayClient;
    /// use sansay_exporter::config::SansayConfig;
    ///
    /// let config = SansayConfig {
    ///     target: "10.0.0.5".to_string(),
    ///     username: "admin".to_string(),
    ///     password: "secret".to_string(),
    ///     verify_tls: false,
    ///     timeout_seconds: 10,
    /// };
    /// let client = SansayClient::new(config).unwrap();
    /// ```
    pub fn new(config: SansayConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .danger_accept_invalid_certs(!config.verify_tls)
            .build()?;

        Ok(Self { client, config })
    }

    /// The configured default target.
    pub fn default_target(&self) -> &str {
        &self.config.target
    }

    /// Fetch the raw status document from `target`.
    ///
    /// The response status is only logged: the body of a non-2xx answer is
    /// still handed back to the caller for parsing.
    pub async fn fetch(&self, target: &str) -> std::result::Result<Bytes, FetchError> {
        let url = normalize_target(target)?;
        debug!("Fetching status document from: {}", url);

        let request = self
            .client
            .get(url)
            .basic_auth(&self.config.username, Some(&self.config.password))
            .build()
            .map_err(FetchError::Request)?;

        let response = self
            .client
            .execute(request)
            .await
            .map_err(FetchError::Transport)?;

        let status = response.status();
        info!(status_code = status.as_u16(), "Received HTTP response");
        if !status.is_success() {
            warn!("Non-success status from {}: {}", target, status);
        }

        let body = response.bytes().await.map_err(FetchError::Body)?;
        debug!("Raw response for {}: {} bytes", target, body.len());
        Ok(body)
    }
}

/// Turn a bare host or URL into an absolute URL, defaulting to plain HTTP.
pub fn normalize_target(target: &str) -> std::result::Result<Url, FetchError> {
    let target = target.trim();
    let url = if target.starts_with("http://") || target.starts_with("https://") {
        target.to_string()
    } else {
        format!("http://{}", target)
    };

    Url::parse(&url).map_err(|source| FetchError::InvalidUrl { url, source })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_host_gets_http_scheme() {
        let url = normalize_target("10.0.0.5").unwrap();
        assert_eq!(url.as_str(), "http://10.0.0.5/");
    }

    #[test]
    fn test_host_with_path_and_port() {
        let url = normalize_target("switch.local:8888/SSConfig/webresources/stats").unwrap();
        assert_eq!(url.scheme(), "http");
        assert_eq!(url.port(), Some(8888));
        assert_eq!(url.path(), "/SSConfig/webresources/stats");
    }

    #[test]
    fn test_https_is_kept() {
        let url = normalize_target("https://switch.local/stats").unwrap();
        assert_eq!(url.scheme(), "https");
    }

    #[test]
    fn test_malformed_target() {
        let err = normalize_target("http://[::1").unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl { .. }));
    }

    #[test]
    fn test_empty_target_is_malformed() {
        assert!(matches!(
            normalize_target(""),
            Err(FetchError::InvalidUrl { .. })
        ));
    }
}
