use std::future::Future;

use reqwest::StatusCode;
use serde_json::Value;

use homework_common::config::AppConfig;
use homework_common::error::FetchError;

/// Source of raw homework status payloads.
pub trait HomeworkSource: Send + Sync {
    /// Fetch statuses changed since `from_date` (unix seconds). The payload is
    /// returned undecoded beyond JSON; shape checks belong to the validator.
    fn fetch(&self, from_date: i64) -> impl Future<Output = Result<Value, FetchError>> + Send;
}

/// HTTP client for the Practicum homework statuses endpoint.
#[derive(Debug, Clone)]
pub struct PracticumClient {
    http: reqwest::Client,
    endpoint: String,
    token: String,
}

impl PracticumClient {
    pub fn new(http: reqwest::Client, endpoint: String, token: String) -> Self {
        Self {
            http,
            endpoint,
            token,
        }
    }

    pub fn from_config(http: reqwest::Client, config: &AppConfig) -> Self {
        Self::new(
            http,
            config.practicum_endpoint.clone(),
            config.credentials.practicum_token.clone(),
        )
    }
}

impl HomeworkSource for PracticumClient {
    async fn fetch(&self, from_date: i64) -> Result<Value, FetchError> {
        tracing::debug!(endpoint = %self.endpoint, from_date, "Requesting homework statuses");

        let response = self
            .http
            .get(&self.endpoint)
            .header(reqwest::header::AUTHORIZATION, format!("OAuth {}", self.token))
            .query(&[("from_date", from_date)])
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::Status(status.as_u16()));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))
    }
}
