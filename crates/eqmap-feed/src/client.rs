use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use crate::error::FeedError;

const USER_AGENT: &str = "eqmap/0.1 (listings-map)";

/// HTTP client for the listings feed.
///
/// Issues exactly one GET per call and never retries: a failed load is
/// terminal for the map session that asked for it.
pub struct FeedClient {
    client: Client,
}

impl FeedClient {
    /// # Errors
    ///
    /// Returns [`FeedError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64) -> Result<Self, FeedError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client })
    }

    /// Fetches the feed and returns its top-level records unvalidated.
    ///
    /// # Errors
    ///
    /// - [`FeedError::InvalidUrl`]: `url` does not parse.
    /// - [`FeedError::Http`]: network or TLS failure.
    /// - [`FeedError::UnexpectedStatus`]: any non-2xx status.
    /// - [`FeedError::Deserialize`]: the body is not JSON.
    /// - [`FeedError::UnexpectedShape`]: the body is JSON but not an array.
    pub async fn fetch_records(&self, url: &str) -> Result<Vec<Value>, FeedError> {
        let parsed = reqwest::Url::parse(url).map_err(|e| FeedError::InvalidUrl {
            url: url.to_owned(),
            reason: e.to_string(),
        })?;

        let response = self.client.get(parsed).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        let body = response.text().await?;
        let value = serde_json::from_str::<Value>(&body).map_err(|e| FeedError::Deserialize {
            context: format!("listings feed from {url}"),
            source: e,
        })?;

        match value {
            Value::Array(records) => Ok(records),
            other => Err(FeedError::UnexpectedShape {
                url: url.to_owned(),
                reason: format!("expected a JSON array, got {}", json_kind(&other)),
            }),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
