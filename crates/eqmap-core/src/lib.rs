pub mod listing;
pub mod options;
pub mod tier;

use thiserror::Error;

pub use listing::{LatLng, Listing, ListingStatus};
pub use options::{MapOptions, MarkerKind, StatusFilter};
pub use tier::{classify, PriceTier, TierStyle, TierStyles};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse map options: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid map option `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}
