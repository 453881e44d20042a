//! The in-page options object a host page passes to mount a map.
//!
//! Options arrive as JSON with camelCase keys. Every key except
//! `mapContainerId` and `feedUrl` has a default. [`MapOptions::from_json`]
//! parses and validates in one step; validation errors name the key.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::listing::{LatLng, ListingStatus};
use crate::tier::{PriceTier, TierStyle, TierStyles};
use crate::ConfigError;

const MAX_ZOOM: u8 = 20;
const MAX_PADDING_PX: u32 = 512;

/// Which listing statuses survive validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusFilter {
    All,
    Only(ListingStatus),
}

impl StatusFilter {
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("all") {
            StatusFilter::All
        } else {
            StatusFilter::Only(ListingStatus::parse(raw))
        }
    }

    #[must_use]
    pub fn matches(&self, status: &ListingStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => wanted == status,
        }
    }
}

/// How each marker is drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerKind {
    /// The tier's icon or color.
    #[default]
    Tier,
    /// A status-colored pill showing the abbreviated price.
    Pill,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapOptions {
    pub map_container_id: String,
    pub feed_url: String,
    pub status_filter: StatusFilter,
    pub tier_styles: TierStyles,
    pub default_center: LatLng,
    pub default_zoom: u8,
    /// Pixel padding applied on every side when fitting bounds.
    pub padding: u32,
    /// `name` attribute shared by the tier checkboxes.
    pub filter_selector: String,
    pub spinner_id: String,
    pub select_all_id: String,
    pub clear_all_id: String,
    /// Exact-match neighborhood filter; takes precedence over `city`.
    pub neighborhood: Option<String>,
    pub city: Option<String>,
    pub marker_kind: MarkerKind,
    pub inquire_href: String,
    pub map_title: Option<String>,
    pub show_legend: bool,
    pub tile_url: String,
    pub tile_attribution: String,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RawMapOptions {
    map_container_id: String,
    feed_url: String,
    #[serde(default = "default_status_filter")]
    status_filter: String,
    tier_styles: Option<BTreeMap<PriceTier, TierStyle>>,
    default_style: Option<TierStyle>,
    #[serde(default = "default_center")]
    default_center: [f64; 2],
    #[serde(default = "default_zoom")]
    default_zoom: u8,
    #[serde(default = "default_padding")]
    padding: u32,
    #[serde(default = "default_filter_selector")]
    filter_selector: String,
    #[serde(default = "default_spinner_id")]
    spinner_id: String,
    #[serde(default = "default_select_all_id")]
    select_all_id: String,
    #[serde(default = "default_clear_all_id")]
    clear_all_id: String,
    neighborhood: Option<String>,
    city: Option<String>,
    #[serde(default)]
    marker_kind: MarkerKind,
    #[serde(default = "default_inquire_href")]
    inquire_href: String,
    map_title: Option<String>,
    #[serde(default)]
    show_legend: bool,
    #[serde(default = "default_tile_url")]
    tile_url: String,
    #[serde(default = "default_tile_attribution")]
    tile_attribution: String,
    #[serde(default = "default_request_timeout_secs")]
    request_timeout_secs: u64,
}

fn default_status_filter() -> String {
    "Sold".to_string()
}

fn default_center() -> [f64; 2] {
    [41.661_315, -93.737_999]
}

fn default_zoom() -> u8 {
    11
}

fn default_padding() -> u32 {
    24
}

fn default_filter_selector() -> String {
    "soldPriceRange".to_string()
}

fn default_spinner_id() -> String {
    "sold-map-spinner".to_string()
}

fn default_select_all_id() -> String {
    "select-all-btn".to_string()
}

fn default_clear_all_id() -> String {
    "clear-all-btn".to_string()
}

fn default_inquire_href() -> String {
    "#wm-popup=/contact-us-popup".to_string()
}

fn default_tile_url() -> String {
    "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".to_string()
}

fn default_tile_attribution() -> String {
    "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors"
        .to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl MapOptions {
    /// Options with every default applied, for the given container and feed.
    #[must_use]
    pub fn new(map_container_id: impl Into<String>, feed_url: impl Into<String>) -> Self {
        Self {
            map_container_id: map_container_id.into(),
            feed_url: feed_url.into(),
            status_filter: StatusFilter::parse(&default_status_filter()),
            tier_styles: TierStyles::default(),
            default_center: LatLng::from(default_center()),
            default_zoom: default_zoom(),
            padding: default_padding(),
            filter_selector: default_filter_selector(),
            spinner_id: default_spinner_id(),
            select_all_id: default_select_all_id(),
            clear_all_id: default_clear_all_id(),
            neighborhood: None,
            city: None,
            marker_kind: MarkerKind::default(),
            inquire_href: default_inquire_href(),
            map_title: None,
            show_legend: false,
            tile_url: default_tile_url(),
            tile_attribution: default_tile_attribution(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }

    /// Parse and validate an options object.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when `json` is not a valid options
    /// object and [`ConfigError::Invalid`] when a value is out of range.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let raw: RawMapOptions = serde_json::from_str(json)?;
        let tier_styles = match raw.tier_styles {
            Some(table) => TierStyles::new(table, TierStyle::default()),
            None => TierStyles::default(),
        };
        let tier_styles = match raw.default_style {
            Some(fallback) => tier_styles.with_fallback(fallback),
            None => tier_styles,
        };

        let options = Self {
            map_container_id: raw.map_container_id,
            feed_url: raw.feed_url,
            status_filter: StatusFilter::parse(&raw.status_filter),
            tier_styles,
            default_center: LatLng::from(raw.default_center),
            default_zoom: raw.default_zoom,
            padding: raw.padding,
            filter_selector: raw.filter_selector,
            spinner_id: raw.spinner_id,
            select_all_id: raw.select_all_id,
            clear_all_id: raw.clear_all_id,
            neighborhood: location_filter(raw.neighborhood),
            city: location_filter(raw.city),
            marker_kind: raw.marker_kind,
            inquire_href: raw.inquire_href,
            map_title: raw.map_title.filter(|t| !t.trim().is_empty()),
            show_legend: raw.show_legend,
            tile_url: raw.tile_url,
            tile_attribution: raw.tile_attribution,
            request_timeout_secs: raw.request_timeout_secs,
        };
        options.validate()?;
        Ok(options)
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |key: &'static str, reason: String| Err(ConfigError::Invalid { key, reason });

        if self.map_container_id.trim().is_empty() {
            return invalid("mapContainerId", "must be non-empty".to_string());
        }
        let scheme_ok = self.feed_url.starts_with("https://") || self.feed_url.starts_with("http://");
        if !scheme_ok {
            return invalid(
                "feedUrl",
                format!("'{}' is not an http(s) URL", self.feed_url),
            );
        }
        if !self.default_center.is_valid() {
            return invalid(
                "defaultCenter",
                format!(
                    "[{}, {}] is not a valid latitude/longitude",
                    self.default_center.lat, self.default_center.lng
                ),
            );
        }
        if self.default_zoom > MAX_ZOOM {
            return invalid(
                "defaultZoom",
                format!("{} exceeds maximum zoom {MAX_ZOOM}", self.default_zoom),
            );
        }
        if self.padding > MAX_PADDING_PX {
            return invalid(
                "padding",
                format!("{}px exceeds {MAX_PADDING_PX}px", self.padding),
            );
        }
        if self.filter_selector.trim().is_empty() {
            return invalid("filterSelector", "must be non-empty".to_string());
        }
        if self.request_timeout_secs == 0 {
            return invalid("requestTimeoutSecs", "must be at least 1".to_string());
        }
        Ok(())
    }
}

/// `None`, blank, and `"All"` all mean "no location filter".
fn location_filter(raw: Option<String>) -> Option<String> {
    raw.map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case("all"))
}

#[cfg(test)]
#[path = "options_test.rs"]
mod tests;
