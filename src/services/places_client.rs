use std::time::Duration;

use reqwest::StatusCode;
use serde_json::Value;

use crate::error::{PlannerError, Result};

pub(crate) const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api/place";
const MAX_RETRIES: usize = 3;
const INITIAL_BACKOFF: Duration = Duration::from_millis(250);

/// Thin HTTP client for the Places web service
#[derive(Clone, Debug)]
pub(crate) struct PlacesHttpClient {
    api_key: String,
    base_url: String,
    timeout: Duration,
}

impl PlacesHttpClient {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn set_base_url(&mut self, base_url: impl Into<String>) {
        self.base_url = base_url.into();
    }

    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn endpoint_url(&self, endpoint: &str) -> String {
        build_endpoint_url(&self.base_url, endpoint)
    }

    /// GET a JSON endpoint, retrying rate limits and server errors with backoff
    pub async fn get_json(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<Value> {
        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|err| PlannerError::Config(format!("Failed to build HTTP client: {err}")))?;

        let request_url = self.endpoint_url(endpoint);
        let mut attempt = 0;
        let mut backoff = INITIAL_BACKOFF;

        loop {
            let response = client
                .get(&request_url)
                .query(params)
                .query(&[("key", self.api_key.as_str())])
                .send()
                .await
                .map_err(|err| {
                    if err.is_timeout() {
                        PlannerError::Timeout(format!("Places request timed out: {err}"))
                    } else {
                        PlannerError::PlaceLookup(format!("HTTP request failed: {err}"))
                    }
                })?;

            let status = response.status();
            let headers = response.headers().clone();
            let response_text = response.text().await.map_err(|err| {
                PlannerError::PlaceLookup(format!("Failed to read response: {err}"))
            })?;

            if status == StatusCode::TOO_MANY_REQUESTS {
                let retry_after_duration = headers
                    .get(reqwest::header::RETRY_AFTER)
                    .and_then(|value| value.to_str().ok())
                    .and_then(|value| value.parse::<u64>().ok())
                    .map(Duration::from_secs)
                    .unwrap_or(backoff);

                if attempt < MAX_RETRIES {
                    tokio::time::sleep(retry_after_duration).await;
                    attempt += 1;
                    backoff *= 2;
                    continue;
                }

                return Err(PlannerError::RateLimit {
                    retry_after: retry_after_duration.as_secs().max(1),
                });
            }

            if status.is_server_error() && attempt < MAX_RETRIES {
                tokio::time::sleep(backoff).await;
                attempt += 1;
                backoff *= 2;
                continue;
            }

            if !status.is_success() {
                let api_message = serde_json::from_str::<Value>(&response_text)
                    .ok()
                    .and_then(|body| {
                        body.get("error_message")
                            .and_then(|value| value.as_str())
                            .map(|s| s.to_string())
                    })
                    .unwrap_or(response_text);

                return Err(PlannerError::PlaceLookup(format!(
                    "HTTP {} error: {}",
                    status, api_message
                )));
            }

            return serde_json::from_str(&response_text).map_err(|err| {
                PlannerError::PlaceLookup(format!("Failed to parse JSON: {err}"))
            });
        }
    }
}

fn build_endpoint_url(base_url: &str, endpoint: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        endpoint.trim_start_matches('/')
    )
}
