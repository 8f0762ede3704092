use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use tracing::{debug, error, info};

use crate::error::{HomeworkError, Result};

/// Source of homework status answers.
#[async_trait]
pub trait HomeworkApi: Send + Sync {
    /// Fetch the statuses changed since `from_date` (Unix seconds).
    async fn get_api_answer(&self, from_date: i64) -> Result<Value>;
}

pub struct PracticumClient {
    client: reqwest::Client,
    endpoint: String,
    token: String,
}

impl PracticumClient {
    pub fn new(endpoint: &str, token: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            token: token.to_string(),
        })
    }
}

#[async_trait]
impl HomeworkApi for PracticumClient {
    async fn get_api_answer(&self, from_date: i64) -> Result<Value> {
        let params = format!("from_date={}", from_date);
        info!("Requesting {} ({})", self.endpoint, params);

        let response = self
            .client
            .get(&self.endpoint)
            .header("Authorization", format!("OAuth {}", self.token))
            .query(&[("from_date", from_date)])
            .send()
            .await
            .map_err(|e| {
                error!("Request to API failed: {}. Params: {}", e, params);
                HomeworkError::Transport {
                    params: params.clone(),
                    source: Box::new(e),
                }
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            error!(
                "Endpoint {} with {} returned status {}",
                self.endpoint, params, status
            );
            return Err(HomeworkError::UnexpectedStatus(status.as_u16()));
        }

        let body = response.text().await.map_err(|e| {
            error!("Failed to read API response body: {}. Params: {}", e, params);
            HomeworkError::Transport {
                params: params.clone(),
                source: Box::new(e),
            }
        })?;

        let answer = serde_json::from_str(&body).map_err(|e| {
            error!("API response is not valid JSON: {}", e);
            HomeworkError::MalformedResponse(e)
        })?;
        debug!("API answer received ({} bytes)", body.len());
        Ok(answer)
    }
}
