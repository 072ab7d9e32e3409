//! Existence probing for catalog pages.
//!
//! A probe answers one question: does a page exist at this URL? The answer is
//! always a plain `bool`. Transport failures, timeouts and non-success statuses
//! all collapse to `false` so callers never handle probe errors.

pub mod url;

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use coursenav_core::{AppConfig, Error};

pub use url::{UrlError, cache_key, canonicalize};

/// Asynchronous existence check.
#[async_trait]
pub trait ExistenceProbe: Send + Sync {
    /// Whether the resource at `id` exists. Never fails.
    async fn probe(&self, id: &str) -> bool;
}

/// Configuration for the HTTP probe.
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    /// User agent string (default: "course-nav/0.1")
    pub user_agent: String,

    /// Request timeout (default: 20s)
    pub timeout: Duration,

    /// Maximum number of redirects to follow (default: 5)
    pub max_redirects: usize,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self { user_agent: "course-nav/0.1".to_string(), timeout: Duration::from_millis(20_000), max_redirects: 5 }
    }
}

impl From<&AppConfig> for ProbeConfig {
    fn from(config: &AppConfig) -> Self {
        Self { user_agent: config.user_agent.clone(), timeout: config.timeout(), ..Default::default() }
    }
}

/// Probe that issues an HTTP `HEAD` and treats any 2xx as "exists".
#[derive(Debug, Clone)]
pub struct HttpProbe {
    http: Client,
    config: ProbeConfig,
}

impl HttpProbe {
    /// Create a new probe with the given configuration.
    pub fn new(config: ProbeConfig) -> Result<Self, Error> {
        let http = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .use_rustls_tls()
            .build()
            .map_err(|e| Error::Probe(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http, config })
    }

    /// Get reference to the configuration.
    pub fn config(&self) -> &ProbeConfig {
        &self.config
    }

    /// Issue the request, surfacing transport failures.
    ///
    /// Returns the response status on any completed exchange.
    pub async fn check(&self, id: &str) -> Result<StatusCode, Error> {
        let url = canonicalize(id).map_err(|e| Error::InvalidUrl(e.to_string()))?;
        let start = Instant::now();

        tracing::debug!(url = %url, "network request");
        let response = self.http.head(url.as_str()).send().await.map_err(|e| {
            if e.is_timeout() {
                Error::Probe(format!("timeout after {:?}: {url}", self.config.timeout))
            } else {
                Error::Probe(format!("network error: {e}"))
            }
        })?;

        let status = response.status();
        tracing::debug!(url = %url, status = status.as_u16(), elapsed_ms = start.elapsed().as_millis() as u64, "network response");
        Ok(status)
    }
}

#[async_trait]
impl ExistenceProbe for HttpProbe {
    async fn probe(&self, id: &str) -> bool {
        match self.check(id).await {
            Ok(status) => status.is_success(),
            Err(e) => {
                tracing::warn!(id, error = %e, "probe failed; treating as not found");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    const PAGE: &str = "/content/2024-fall-compsci-61a-lec-001";

    /// Serve a single request with `status` and an empty body. Returns the page URL.
    async fn serve_once(status: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 4096];
            let mut read = 0;
            loop {
                let n = socket.read(&mut buf[read..]).await.unwrap();
                read += n;
                if n == 0 || buf[..read].windows(4).any(|w| w == b"\r\n\r\n") {
                    break;
                }
            }
            let response = format!("HTTP/1.1 {status}\r\ncontent-length: 0\r\nconnection: close\r\n\r\n");
            socket.write_all(response.as_bytes()).await.unwrap();
        });

        format!("http://{addr}{PAGE}")
    }

    #[test]
    fn test_probe_config_default() {
        let config = ProbeConfig::default();
        assert_eq!(config.user_agent, "course-nav/0.1");
        assert_eq!(config.timeout, Duration::from_millis(20_000));
        assert_eq!(config.max_redirects, 5);
    }

    #[test]
    fn test_probe_config_from_app_config() {
        let app = AppConfig { user_agent: "tester/1".into(), timeout_ms: 1500, ..Default::default() };
        let config = ProbeConfig::from(&app);
        assert_eq!(config.user_agent, "tester/1");
        assert_eq!(config.timeout, Duration::from_millis(1500));
    }

    #[tokio::test]
    async fn test_http_probe_new() {
        assert!(HttpProbe::new(ProbeConfig::default()).is_ok());
    }

    #[tokio::test]
    async fn test_invalid_identifier_is_not_found() {
        let probe = HttpProbe::new(ProbeConfig::default()).unwrap();
        assert!(matches!(probe.check("ftp://example.edu/x").await, Err(Error::InvalidUrl(_))));
        assert!(!probe.probe("ftp://example.edu/x").await);
        assert!(!probe.probe("").await);
    }

    #[tokio::test]
    async fn test_success_status_exists() {
        let probe = HttpProbe::new(ProbeConfig::default()).unwrap();
        let url = serve_once("200 OK").await;
        assert!(probe.probe(&url).await);
    }

    #[tokio::test]
    async fn test_not_found_status_is_absent() {
        let probe = HttpProbe::new(ProbeConfig::default()).unwrap();
        let url = serve_once("404 Not Found").await;
        assert_eq!(probe.check(&url).await.unwrap(), StatusCode::NOT_FOUND);

        let url = serve_once("404 Not Found").await;
        assert!(!probe.probe(&url).await);
    }

    #[tokio::test]
    async fn test_connection_refused_is_absent() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let probe = HttpProbe::new(ProbeConfig::default()).unwrap();
        let url = format!("http://{addr}{PAGE}");
        assert!(matches!(probe.check(&url).await, Err(Error::Probe(_))));
        assert!(!probe.probe(&url).await);
    }
}
