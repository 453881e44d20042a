pub mod client;
pub mod coerce;
pub mod error;
pub mod validate;

pub use client::FeedClient;
pub use error::FeedError;
pub use validate::{validate_feed, validate_record, ListingFilter, Rejection, ValidatedFeed};
