//! The validated listing record every downstream component consumes.
//!
//! A [`Listing`] only exists once the feed validator has accepted a raw
//! record: it is always published, always has finite in-range coordinates,
//! and always carries a non-empty street address, city, and state.

use serde::{Deserialize, Serialize};

/// A geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    #[must_use]
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// `true` when both components are finite and inside the WGS84 range.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

impl From<[f64; 2]> for LatLng {
    fn from([lat, lng]: [f64; 2]) -> Self {
        Self { lat, lng }
    }
}

/// Sale status as published in the feed.
///
/// The feed uses `"Sold"` and `"Available"`; anything else is preserved
/// verbatim so status filters can still match it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListingStatus {
    Sold,
    Available,
    Other(String),
}

impl ListingStatus {
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            s if s.eq_ignore_ascii_case("sold") => ListingStatus::Sold,
            s if s.eq_ignore_ascii_case("available") => ListingStatus::Available,
            s => ListingStatus::Other(s.to_string()),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            ListingStatus::Sold => "Sold",
            ListingStatus::Available => "Available",
            ListingStatus::Other(s) => s,
        }
    }
}

impl std::fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub street_address: String,
    pub city: String,
    pub state: String,
    pub position: LatLng,
    pub status: ListingStatus,
    /// `None` when the feed value is missing or not a finite number.
    pub price: Option<f64>,
    /// Raw `priceRange` label from the feed, if any.
    pub price_range: Option<String>,
    pub year_sold: Option<String>,
    pub image_url: Option<String>,
    /// External listing reference (the feed's `ZillowURL`).
    pub listing_url: Option<String>,
    pub neighborhood: Option<String>,
}

impl Listing {
    /// `"{street}, {city}, {state}"`, used by popups and tooltips.
    #[must_use]
    pub fn full_address(&self) -> String {
        format!("{}, {}, {}", self.street_address, self.city, self.state)
    }
}
