use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, Url};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TransportResponse {
    pub(crate) status: u16,
    pub(crate) body: String,
}

#[async_trait]
pub(crate) trait CommandTransport: Send + Sync {
    /// Issues one GET. Credentials travel in the URL's userinfo.
    async fn get(&self, url: &Url) -> anyhow::Result<TransportResponse>;
}

pub(crate) struct HttpTransport {
    client: Client,
    timeout: Duration,
}

impl HttpTransport {
    pub(crate) fn new(timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build http client")?;
        Ok(Self { client, timeout })
    }

    fn describe_error(&self, err: reqwest::Error, shown: &str) -> anyhow::Error {
        if err.is_timeout() {
            return anyhow::anyhow!(
                "request to {shown} timed out after {}ms",
                self.timeout.as_millis()
            );
        }
        if err.is_connect() {
            return anyhow::Error::new(err).context(format!("failed to connect to {shown}"));
        }
        anyhow::Error::new(err).context(format!("request to {shown} failed"))
    }
}

#[async_trait]
impl CommandTransport for HttpTransport {
    async fn get(&self, url: &Url) -> anyhow::Result<TransportResponse> {
        let shown = redact_url(url);
        tracing::debug!(url = %shown, "sending command request");
        let response = self
            .client
            .get(url.clone())
            .header("Connection", "close")
            .send()
            .await
            .map_err(|err| self.describe_error(err, &shown))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|err| self.describe_error(err, &shown))?;
        tracing::debug!(url = %shown, status, body_len = body.len(), "command response received");
        Ok(TransportResponse { status, body })
    }
}

/// URL with the password masked, for logs and error messages.
pub(crate) fn redact_url(url: &Url) -> String {
    let mut shown = url.clone();
    if shown.password().is_some() {
        let _ = shown.set_password(Some("***"));
    }
    shown.to_string()
}
