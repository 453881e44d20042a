//! Turns raw feed records into [`Listing`]s.
//!
//! This is the only place that knows what the feed looks like. Two shapes
//! are accepted:
//!
//! - **keyed**: an array of objects (`{"Publish": true, "Status": "Sold", ...}`)
//! - **positional**: an array whose first element is a header row of column
//!   names, followed by one array per listing
//!
//! Positional rows are zipped onto the header and then validated exactly
//! like keyed records. A record that fails validation is dropped and
//! counted; it never aborts the batch.

use eqmap_core::{LatLng, Listing, ListingStatus, MapOptions, StatusFilter};
use serde_json::{Map, Value};

use crate::coerce::{bool_like, field, number_like, price_like, string_like};

const PUBLISH: &[&str] = &["Publish", "publish"];
const STATUS: &[&str] = &["Status", "status"];
const LATITUDE: &[&str] = &["Latitude", "latitude", "lat"];
const LONGITUDE: &[&str] = &["Longitude", "longitude", "lng", "lon"];
const PRICE: &[&str] = &["Price", "price"];
const PRICE_RANGE: &[&str] = &["priceRange", "PriceRange"];
const STREET: &[&str] = &["streetAddress", "StreetAddress", "Address", "address"];
const CITY: &[&str] = &["City", "city"];
const STATE: &[&str] = &["State", "state"];
const IMAGE: &[&str] = &["imageURL", "ImageURL", "imageUrl"];
const LISTING_URL: &[&str] = &["ZillowURL", "zillowURL", "listingURL", "listingUrl"];
const YEAR_SOLD: &[&str] = &["yearSold", "YearSold"];
const NEIGHBORHOOD: &[&str] = &["Neighborhood", "neighborhood"];

/// Why a record was dropped.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("record is not an object")]
    NotARecord,
    #[error("record is not published")]
    Unpublished,
    #[error("status '{0}' does not match the status filter")]
    StatusMismatch(String),
    #[error("missing required field `{0}`")]
    MissingIdentity(&'static str),
    #[error("missing or zero coordinates")]
    MissingCoordinates,
    #[error("coordinates out of range")]
    InvalidCoordinates,
    #[error("outside the configured neighborhood or city")]
    OutsideLocation,
}

/// Record-level acceptance rules beyond the fixed publish/identity checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingFilter {
    pub status: StatusFilter,
    pub neighborhood: Option<String>,
    pub city: Option<String>,
}

impl ListingFilter {
    #[must_use]
    pub fn from_options(options: &MapOptions) -> Self {
        Self {
            status: options.status_filter.clone(),
            neighborhood: options.neighborhood.clone(),
            city: options.city.clone(),
        }
    }

    /// Neighborhood wins over city; with neither set every location passes.
    fn location_matches(&self, listing: &Listing) -> bool {
        if let Some(wanted) = &self.neighborhood {
            return listing.neighborhood.as_deref() == Some(wanted.as_str());
        }
        if let Some(wanted) = &self.city {
            return listing.city == *wanted;
        }
        true
    }
}

impl Default for ListingFilter {
    fn default() -> Self {
        Self {
            status: StatusFilter::Only(ListingStatus::Sold),
            neighborhood: None,
            city: None,
        }
    }
}

#[derive(Debug, Default)]
pub struct ValidatedFeed {
    pub listings: Vec<Listing>,
    pub rejected: usize,
}

/// Validates one keyed record.
///
/// # Errors
///
/// Returns the first [`Rejection`] that applies, checked in the order:
/// shape, publish flag, status, identity fields, coordinates, location.
pub fn validate_record(raw: &Value, filter: &ListingFilter) -> Result<Listing, Rejection> {
    let record = raw.as_object().ok_or(Rejection::NotARecord)?;

    if !bool_like(field(record, PUBLISH)) {
        return Err(Rejection::Unpublished);
    }

    let status = string_like(field(record, STATUS))
        .map_or_else(|| ListingStatus::Other(String::new()), |s| ListingStatus::parse(&s));
    if !filter.status.matches(&status) {
        return Err(Rejection::StatusMismatch(status.to_string()));
    }

    let street_address = required(record, STREET, "streetAddress")?;
    let city = required(record, CITY, "City")?;
    let state = required(record, STATE, "State")?;

    let position = coordinates(record)?;

    let listing = Listing {
        street_address,
        city,
        state,
        position,
        status,
        price: price_like(field(record, PRICE)),
        price_range: string_like(field(record, PRICE_RANGE)),
        year_sold: string_like(field(record, YEAR_SOLD)),
        image_url: string_like(field(record, IMAGE)),
        listing_url: string_like(field(record, LISTING_URL)),
        neighborhood: string_like(field(record, NEIGHBORHOOD)),
    };

    if !filter.location_matches(&listing) {
        return Err(Rejection::OutsideLocation);
    }
    Ok(listing)
}

/// Validates a whole feed, in either shape.
///
/// Never fails: bad records are counted in [`ValidatedFeed::rejected`].
#[must_use]
pub fn validate_feed(records: &[Value], filter: &ListingFilter) -> ValidatedFeed {
    let mut feed = ValidatedFeed::default();
    let mut accept = |index: usize, raw: &Value| match validate_record(raw, filter) {
        Ok(listing) => feed.listings.push(listing),
        Err(reason) => {
            tracing::debug!(index, %reason, "dropping feed record");
            feed.rejected += 1;
        }
    };

    match header_row(records) {
        Some(header) => {
            for (index, row) in records.iter().enumerate().skip(1) {
                match row {
                    Value::Array(cells) => accept(index, &zip_row(&header, cells)),
                    other => accept(index, other),
                }
            }
        }
        None => {
            for (index, raw) in records.iter().enumerate() {
                accept(index, raw);
            }
        }
    }
    feed
}

fn required(
    record: &Map<String, Value>,
    keys: &[&str],
    name: &'static str,
) -> Result<String, Rejection> {
    string_like(field(record, keys)).ok_or(Rejection::MissingIdentity(name))
}

/// Zero counts as missing: the feed writes `0` for ungeocoded rows.
fn coordinates(record: &Map<String, Value>) -> Result<LatLng, Rejection> {
    let lat = number_like(field(record, LATITUDE)).filter(|v| *v != 0.0);
    let lng = number_like(field(record, LONGITUDE)).filter(|v| *v != 0.0);
    let (Some(lat), Some(lng)) = (lat, lng) else {
        return Err(Rejection::MissingCoordinates);
    };
    let position = LatLng::new(lat, lng);
    if position.is_valid() {
        Ok(position)
    } else {
        Err(Rejection::InvalidCoordinates)
    }
}

/// Column names when the feed is positional: the first element is a
/// non-empty array of strings and at least one later element is a row array.
/// A stray string array ahead of keyed records is just a bad record.
fn header_row(records: &[Value]) -> Option<Vec<String>> {
    let (first, rest) = records.split_first()?;
    let cells = first.as_array().filter(|cells| !cells.is_empty())?;
    if !rest.iter().any(Value::is_array) {
        return None;
    }
    cells
        .iter()
        .map(|cell| cell.as_str().map(|s| s.trim().to_string()))
        .collect()
}

/// Builds a keyed record from a positional row.
fn zip_row(header: &[String], cells: &[Value]) -> Value {
    let record: Map<String, Value> = header
        .iter()
        .zip(cells)
        .filter(|(name, _)| !name.is_empty())
        .map(|(name, cell)| (name.clone(), cell.clone()))
        .collect();
    Value::Object(record)
}

#[cfg(test)]
#[path = "validate_test.rs"]
mod tests;
