//! Builds one map marker per validated listing.
//!
//! Building is pure: the factory reads the listing and the options it was
//! created from and returns a [`MarkerSpec`]. Adding the marker to a map is
//! the session's job.

use eqmap_core::{
    classify, LatLng, Listing, ListingStatus, MapOptions, MarkerKind, PriceTier, TierStyle,
    TierStyles,
};
use maud::{html, Markup};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

use crate::format::{format_price, format_price_for_pin};

const ICON_SIZE: (u32, u32) = (24, 36);
const ICON_ANCHOR: (i32, i32) = (12, 36);
const ICON_POPUP_ANCHOR: (i32, i32) = (0, -36);
const PILL_POPUP_ANCHOR: (i32, i32) = (0, -10);
const PILL_AVAILABLE_COLOR: &str = "#008000";
const PILL_DEFAULT_COLOR: &str = "#808080";

/// Bytes that could close a CSS `url('...')` or start a new declaration.
const CSS_URL_UNSAFE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'\'')
    .add(b'(')
    .add(b')')
    .add(b';')
    .add(b'\\');

/// Index of a marker within its session. Stable for the session lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MarkerId(pub usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkerVisual {
    Icon {
        url: String,
        size: (u32, u32),
        anchor: (i32, i32),
        popup_anchor: (i32, i32),
    },
    Dot {
        color: String,
    },
    Pill {
        label: String,
        color: String,
        popup_anchor: (i32, i32),
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarkerSpec {
    pub id: MarkerId,
    pub position: LatLng,
    /// Used only for filter lookups.
    pub tier: PriceTier,
    pub visual: MarkerVisual,
    pub popup_html: String,
    pub tooltip: String,
    pub alt: String,
}

#[derive(Debug, Clone, Copy)]
pub struct MarkerFactory<'a> {
    styles: &'a TierStyles,
    kind: MarkerKind,
    inquire_href: &'a str,
}

impl<'a> MarkerFactory<'a> {
    #[must_use]
    pub fn new(styles: &'a TierStyles, kind: MarkerKind, inquire_href: &'a str) -> Self {
        Self {
            styles,
            kind,
            inquire_href,
        }
    }

    #[must_use]
    pub fn from_options(options: &'a MapOptions) -> Self {
        Self::new(
            &options.tier_styles,
            options.marker_kind,
            &options.inquire_href,
        )
    }

    #[must_use]
    pub fn build(&self, id: MarkerId, listing: &Listing) -> MarkerSpec {
        let tier = classify(listing, self.styles);
        let price = format_price(listing.price);
        MarkerSpec {
            id,
            position: listing.position,
            tier,
            visual: self.visual(tier, listing),
            popup_html: self.popup(listing, &price).into_string(),
            tooltip: tooltip(listing, &price),
            alt: format!("{}, {}", listing.street_address, listing.city),
        }
    }

    fn visual(&self, tier: PriceTier, listing: &Listing) -> MarkerVisual {
        match self.kind {
            MarkerKind::Pill => MarkerVisual::Pill {
                label: format_price_for_pin(listing.price),
                color: match listing.status {
                    ListingStatus::Available => PILL_AVAILABLE_COLOR,
                    _ => PILL_DEFAULT_COLOR,
                }
                .to_string(),
                popup_anchor: PILL_POPUP_ANCHOR,
            },
            MarkerKind::Tier => style_visual(self.styles.style_for(tier)),
        }
    }

    fn popup(&self, listing: &Listing, price: &str) -> Markup {
        let background = listing.image_url.as_deref().map(|url| {
            let url = utf8_percent_encode(url, CSS_URL_UNSAFE);
            format!(
                "background-image: url('{url}'); background-size: cover; background-position: center;"
            )
        });
        let call_to_action = match listing.status {
            ListingStatus::Sold => "Inquire",
            _ => "Contact Agent",
        };

        html! {
            div class="map-listing-popup" {
                div class="map-listing-popup-content" style=[background] {
                    div class="map-listing-popup-content-overlay" {}
                    h4 class="text-white center" { (listing.full_address()) }
                    div class="map-listing-details" {
                        p { (price_lead(listing)) br; (price) }
                    }
                    div class="map-listing-popup-button-container" {
                        a href=(self.inquire_href) role="button" class="map-popup-button" {
                            (call_to_action)
                        }
                        @if let Some(url) = &listing.listing_url {
                            a href=(url) target="_blank" rel="noopener noreferrer"
                                role="button" class="map-popup-button" { "View Listing" }
                        }
                    }
                }
            }
        }
    }
}

/// Legend and marker visual for a configured style.
#[must_use]
pub fn style_visual(style: &TierStyle) -> MarkerVisual {
    match style {
        TierStyle::Icon { icon_url } => MarkerVisual::Icon {
            url: icon_url.clone(),
            size: ICON_SIZE,
            anchor: ICON_ANCHOR,
            popup_anchor: ICON_POPUP_ANCHOR,
        },
        TierStyle::Color { color } => MarkerVisual::Dot {
            color: color.clone(),
        },
    }
}

fn price_lead(listing: &Listing) -> String {
    match (&listing.status, &listing.year_sold) {
        (ListingStatus::Sold, Some(year)) => format!("Sold in {year} for"),
        (ListingStatus::Sold, None) => "Sold for".to_string(),
        _ => "Listed at".to_string(),
    }
}

fn tooltip(listing: &Listing, price: &str) -> String {
    format!("{} | {} {price}", listing.full_address(), price_lead(listing))
}

#[cfg(test)]
#[path = "marker_test.rs"]
mod tests;
