use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid feed URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("unexpected feed shape from {url}: {reason}")]
    UnexpectedShape { url: String, reason: String },
}

impl FeedError {
    /// `true` when the server answered but the body was unusable.
    ///
    /// Everything else means the feed could not be reached at all.
    #[must_use]
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            FeedError::Deserialize { .. } | FeedError::UnexpectedShape { .. }
        )
    }
}
