use bytes::Bytes;
use futures::Stream;
use std::pin::Pin;
use thiserror::Error;

use crate::io_struct::GeneratePayload;

/// Errors from the upstream generation API. Both variants are fatal for the
/// request and surface as exactly one decorated `error` event.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("Failed to reach the generation API. Status code: {code}. Response: {body}")]
    Status { code: u16, body: String },

    #[error("Connection error: {0}")]
    Connection(#[from] reqwest::Error),
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub upstream_url: String,
    pub default_model: String,
    pub timeout: u64,
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub client: reqwest::Client,
    pub upstream_url: String,
    pub default_model: String,
}

impl AppState {
    pub fn new(config: &AppConfig) -> anyhow::Result<Self> {
        // Connect/read timeouts only; an overall deadline would cut off long
        // generation streams.
        let client = reqwest::Client::builder()
            .connect_timeout(std::time::Duration::from_secs(config.timeout))
            .read_timeout(std::time::Duration::from_secs(config.timeout))
            .build()?;
        Ok(Self {
            client,
            upstream_url: config.upstream_url.clone(),
            default_model: config.default_model.clone(),
        })
    }

    /// Opens the streaming generation call. Returns the raw byte-chunk stream
    /// on HTTP 200; any other status or a transport failure is an error.
    pub async fn connect_generate(
        &self,
        model: &str,
        prompt: &str,
    ) -> Result<Pin<Box<dyn Stream<Item = Result<Bytes, reqwest::Error>> + Send>>, UpstreamError>
    {
        let payload = GeneratePayload {
            model,
            prompt,
            stream: true,
        };
        log::debug!(
            "Sending request to generation API at {} with model {}",
            self.upstream_url,
            model
        );
        let resp = self
            .client
            .post(&self.upstream_url)
            .json(&payload)
            .send()
            .await?;
        let status = resp.status();
        log::debug!("Generation API response status: {}", status);
        if status != reqwest::StatusCode::OK {
            let body = resp.text().await.unwrap_or_default();
            return Err(UpstreamError::Status {
                code: status.as_u16(),
                body,
            });
        }
        Ok(Box::pin(resp.bytes_stream()))
    }
}
