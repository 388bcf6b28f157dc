//! HTTP client used for downloading releases
//!
//! Transport failures (timeouts, refused connections) are retried with
//! exponential backoff. Any HTTP status other than success is final.

use crate::error::SelfUpdateError;
use reqwest::Client;
use std::time::Duration;

/// Release binaries are large; give the download room
const TIMEOUT: Duration = Duration::from_secs(30);

const USER_AGENT: &str = concat!("nvm-prune/", env!("CARGO_PKG_VERSION"));

/// Retries after the first attempt
const RETRIES: u32 = 3;

/// First backoff delay, doubled after every failed attempt
const BASE_DELAY: Duration = Duration::from_millis(100);

/// reqwest client that downloads a release asset
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new() -> Result<Self, SelfUpdateError> {
        let client = Client::builder()
            .timeout(TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| SelfUpdateError::Client {
                message: e.to_string(),
            })?;
        Ok(Self { client })
    }

    /// Download the full body of `url`
    pub async fn get_bytes(&self, url: &str) -> Result<Vec<u8>, SelfUpdateError> {
        let response = self.send(url).await?;
        if !response.status().is_success() {
            return Err(SelfUpdateError::network(
                url,
                format!("HTTP {}", response.status()),
            ));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| SelfUpdateError::network(url, format!("failed to read body: {}", e)))?;
        Ok(body.to_vec())
    }

    /// Send a GET, retrying transport failures
    async fn send(&self, url: &str) -> Result<reqwest::Response, SelfUpdateError> {
        let mut delay = BASE_DELAY;
        let mut attempt = 0;

        loop {
            let err = match self.client.get(url).send().await {
                Ok(response) => return Ok(response),
                Err(e) => e,
            };

            if attempt == RETRIES {
                return Err(if err.is_timeout() {
                    SelfUpdateError::Timeout {
                        url: url.to_string(),
                    }
                } else {
                    SelfUpdateError::network(url, err.to_string())
                });
            }

            tracing::debug!(url, attempt, error = %err, "download failed, retrying");
            tokio::time::sleep(delay).await;
            delay *= 2;
            attempt += 1;
        }
    }
}
