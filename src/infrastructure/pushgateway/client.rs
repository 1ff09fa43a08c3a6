//! HTTP client for the Prometheus Pushgateway.

use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use reqwest::header::CONTENT_TYPE;
use reqwest::{StatusCode, Url};

use crate::error::{AppError, Result};
use crate::metrics::BlockHeightMetrics;
use crate::tasks::MetricsPusher;

/// Content type of the Prometheus text exposition format
const TEXT_FORMAT_CONTENT_TYPE: &str = "text/plain; version=0.0.4";

/// Upper bound on a single push request
const PUSH_TIMEOUT_SECS: u64 = 30;

/// Pushes a registry to a Pushgateway under a fixed job name.
///
/// Every push is a `PUT`, replacing all metrics previously pushed under the
/// same grouping key.
#[derive(Clone)]
pub struct PushGatewayClient {
    http: reqwest::Client,
    base_url: String,
    job: String,
}

impl PushGatewayClient {
    pub fn new(base_url: &str, job: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(PUSH_TIMEOUT_SECS))
            .build()?;

        Ok(Self::with_client(http, base_url, job))
    }

    pub fn with_client(http: reqwest::Client, base_url: &str, job: &str) -> Self {
        Self {
            http,
            base_url: normalize_base_url(base_url),
            job: job.to_string(),
        }
    }

    /// Full push URL: `<base>/metrics/job/<job>`.
    pub fn push_url(&self) -> Result<Url> {
        if self.job.is_empty() {
            return Err(AppError::InvalidPushUrl("job name is empty".to_string()));
        }

        let mut url = Url::parse(&self.base_url).map_err(|e| {
            AppError::InvalidPushUrl(format!("invalid Pushgateway URL {:?}: {}", self.base_url, e))
        })?;
        if url.cannot_be_a_base() || url.host_str().is_none() {
            return Err(AppError::InvalidPushUrl(format!(
                "invalid Pushgateway URL {:?}",
                self.base_url
            )));
        }

        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                AppError::InvalidPushUrl(format!("invalid Pushgateway URL {:?}", self.base_url))
            })?;
            segments.pop_if_empty().push("metrics");
            if self.job.contains('/') {
                segments
                    .push("job@base64")
                    .push(&URL_SAFE_NO_PAD.encode(self.job.as_bytes()));
            } else {
                segments.push("job").push(&self.job);
            }
        }

        Ok(url)
    }

    /// Push the current contents of `metrics`.
    pub async fn push_metrics(&self, metrics: &BlockHeightMetrics) -> Result<()> {
        let url = self.push_url()?;
        let body = metrics.encode()?;

        let response = self
            .http
            .put(url)
            .header(CONTENT_TYPE, TEXT_FORMAT_CONTENT_TYPE)
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::OK || status == StatusCode::ACCEPTED {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(AppError::PushRejected {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl MetricsPusher for PushGatewayClient {
    async fn push(&self, metrics: &BlockHeightMetrics) -> Result<()> {
        tracing::info!(
            push_url = %self.base_url,
            job = %self.job,
            "Pushing metrics to Pushgateway"
        );
        self.push_metrics(metrics).await
    }
}

/// Default to `http://` when no scheme is given and drop trailing slashes.
fn normalize_base_url(url: &str) -> String {
    let url = if url.contains("://") {
        url.to_string()
    } else {
        format!("http://{}", url)
    };
    url.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str, job: &str) -> PushGatewayClient {
        PushGatewayClient::with_client(reqwest::Client::new(), base_url, job)
    }

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(normalize_base_url("gateway:9091"), "http://gateway:9091");
        assert_eq!(normalize_base_url("https://gw.example/"), "https://gw.example");
        assert_eq!(normalize_base_url("http://gw:9091//"), "http://gw:9091");
    }

    #[test]
    fn test_push_url_plain_job() {
        let url = client("http://gateway:9091", "oula_block_height")
            .push_url()
            .unwrap();
        assert_eq!(url.as_str(), "http://gateway:9091/metrics/job/oula_block_height");
    }

    #[test]
    fn test_push_url_keeps_base_path() {
        let url = client("http://gateway:9091/prefix/", "height").push_url().unwrap();
        assert_eq!(url.as_str(), "http://gateway:9091/prefix/metrics/job/height");
    }

    #[test]
    fn test_push_url_escapes_job() {
        let url = client("http://gateway:9091", "block height").push_url().unwrap();
        assert_eq!(url.as_str(), "http://gateway:9091/metrics/job/block%20height");
    }

    #[test]
    fn test_push_url_base64_for_slash() {
        let url = client("http://gateway:9091", "a/b").push_url().unwrap();
        assert_eq!(url.as_str(), "http://gateway:9091/metrics/job@base64/YS9i");
    }

    #[test]
    fn test_empty_base_url_fails_at_push_time() {
        let c = client("", "oula_block_height");
        assert!(matches!(c.push_url(), Err(AppError::InvalidPushUrl(_))));
    }

    #[test]
    fn test_empty_job_is_rejected() {
        let c = client("http://gateway:9091", "");
        assert!(matches!(c.push_url(), Err(AppError::InvalidPushUrl(ref m)) if m.contains("job")));
    }

    #[tokio::test]
    async fn test_push_with_invalid_url_returns_error() {
        let metrics = BlockHeightMetrics::new().unwrap();
        tokio_test::assert_err!(client("", "job").push_metrics(&metrics).await);
    }
}
