//! Governed HTTP access to the NCBI services
//!
//! Every call goes through the shared [`RateLimiter`] first. Upstream 429
//! responses are absorbed here: the gateway waits for the advertised
//! `Retry-After` and then repeats the whole call, limiter included.

use std::time::Duration;

use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tokio::time::sleep;
use tracing::{debug, instrument, warn};

use crate::config::ClientConfig;
use crate::error::{PubMedError, Result};
use crate::rate_limit::RateLimiter;

/// HTTP verb used for a governed call
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HttpMethod {
    /// Parameters go into the query string
    Get,
    /// Parameters go into a form body; used for long identifier lists
    Post,
}

/// Rate-limited HTTP gateway shared by the PubMed and PMC clients
#[derive(Clone, Debug)]
pub struct Gateway {
    client: Client,
    rate_limiter: RateLimiter,
    api_params: Vec<(String, String)>,
    default_retry_after: Duration,
}

impl Gateway {
    /// Build a gateway with its own HTTP client and a rate limiter derived from `config`
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.effective_user_agent())
            .timeout(config.timeout)
            .build()?;

        Ok(Self::with_client(client, config, config.create_rate_limiter()))
    }

    /// Build a gateway around an existing HTTP client and limiter
    pub fn with_client(client: Client, config: &ClientConfig, rate_limiter: RateLimiter) -> Self {
        Self {
            client,
            rate_limiter,
            api_params: config.build_api_params(),
            default_retry_after: config.default_retry_after,
        }
    }

    pub fn rate_limiter(&self) -> &RateLimiter {
        &self.rate_limiter
    }

    pub fn http_client(&self) -> &Client {
        &self.client
    }

    /// Issue one governed call and return the successful response
    ///
    /// # Errors
    ///
    /// * `PubMedError::RequestError` - connection or timeout failure (not retried)
    /// * `PubMedError::ApiError` - any non-success status other than 429
    #[instrument(skip(self, params), fields(url = %url, method = ?method))]
    pub async fn call(
        &self,
        url: &str,
        params: &[(&str, String)],
        method: HttpMethod,
    ) -> Result<Response> {
        let mut merged: Vec<(String, String)> = params
            .iter()
            .map(|(key, value)| (key.to_string(), value.clone()))
            .collect();
        merged.extend(self.api_params.iter().cloned());

        loop {
            self.rate_limiter.acquire().await;

            let request = match method {
                HttpMethod::Get => self.client.get(build_url(url, &merged)),
                HttpMethod::Post => self.client.post(url).form(&merged),
            };

            let response = request.send().await.map_err(|err| {
                warn!(error = %err, "Request failed");
                PubMedError::from(err)
            })?;

            let status = response.status();
            if status == StatusCode::TOO_MANY_REQUESTS {
                let wait = retry_after(response.headers()).unwrap_or(self.default_retry_after);
                // Release the connection before backing off
                drop(response);
                warn!(
                    wait_secs = wait.as_secs_f64(),
                    "NCBI rate limit exceeded despite local limiting, backing off"
                );
                sleep(wait).await;
                continue;
            }

            if !status.is_success() {
                warn!("API request failed with status: {}", status);
                return Err(PubMedError::ApiError {
                    status: status.as_u16(),
                    message: status
                        .canonical_reason()
                        .unwrap_or("Unknown error")
                        .to_string(),
                });
            }

            debug!("Request completed successfully");
            return Ok(response);
        }
    }

    /// Governed call returning the response body as text
    pub async fn call_text(
        &self,
        url: &str,
        params: &[(&str, String)],
        method: HttpMethod,
    ) -> Result<String> {
        let response = self.call(url, params, method).await?;
        Ok(response.text().await?)
    }

    /// Governed call decoding the response body as JSON
    pub async fn call_json<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, String)],
        method: HttpMethod,
    ) -> Result<T> {
        let text = self.call_text(url, params, method).await?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// Append url-encoded parameters to `url`
fn build_url(url: &str, params: &[(String, String)]) -> String {
    if params.is_empty() {
        return url.to_string();
    }

    let separator = if url.contains('?') { '&' } else { '?' };
    let query: Vec<String> = params
        .iter()
        .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
        .collect();

    format!("{}{}{}", url, separator, query.join("&"))
}

/// `Retry-After` in delta-seconds form; HTTP-date values are not honored
fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}
