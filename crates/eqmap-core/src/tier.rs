//! Price-tier buckets and the marker style table.
//!
//! Buckets are half-open intervals `[lo, hi)` over the listing price in
//! dollars:
//!
//! | tier | range |
//! |------|-------|
//! | `Under $150k`   | `[0, 150_000)` |
//! | `$150k - $249k` | `[150_000, 250_000)` |
//! | `$250k - $499k` | `[250_000, 500_000)` |
//! | `$500k - $749k` | `[500_000, 750_000)` |
//! | `$750k - $999k` | `[750_000, 1_000_000)` |
//! | `$1m and up`    | `[1_000_000, ∞)` |
//!
//! Anything that cannot be bucketed (no price, negative, NaN) lands in
//! [`PriceTier::Other`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::listing::Listing;

const ICON_BASE: &str = "https://images.squarespace-cdn.com/content/5db1a8c2af0b1a1c3004a035";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PriceTier {
    Under150k,
    From150kTo249k,
    From250kTo499k,
    From500kTo749k,
    From750kTo999k,
    OneMillionAndUp,
    Other,
}

impl PriceTier {
    /// The six priced buckets in ascending order.
    pub const BUCKETS: [PriceTier; 6] = [
        PriceTier::Under150k,
        PriceTier::From150kTo249k,
        PriceTier::From250kTo499k,
        PriceTier::From500kTo749k,
        PriceTier::From750kTo999k,
        PriceTier::OneMillionAndUp,
    ];

    /// Every tier, priced buckets first.
    pub const ALL: [PriceTier; 7] = [
        PriceTier::Under150k,
        PriceTier::From150kTo249k,
        PriceTier::From250kTo499k,
        PriceTier::From500kTo749k,
        PriceTier::From750kTo999k,
        PriceTier::OneMillionAndUp,
        PriceTier::Other,
    ];

    /// Legend label; also the checkbox value and the feed's `priceRange`.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            PriceTier::Under150k => "Under $150k",
            PriceTier::From150kTo249k => "$150k - $249k",
            PriceTier::From250kTo499k => "$250k - $499k",
            PriceTier::From500kTo749k => "$500k - $749k",
            PriceTier::From750kTo999k => "$750k - $999k",
            PriceTier::OneMillionAndUp => "$1m and up",
            PriceTier::Other => "OTHER",
        }
    }

    /// Case-insensitive lookup by label. Surrounding whitespace is ignored.
    #[must_use]
    pub fn from_label(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL
            .into_iter()
            .find(|tier| tier.label().eq_ignore_ascii_case(raw))
    }

    #[must_use]
    pub fn from_price(price: f64) -> Self {
        if !price.is_finite() || price < 0.0 {
            return PriceTier::Other;
        }
        match price {
            p if p < 150_000.0 => PriceTier::Under150k,
            p if p < 250_000.0 => PriceTier::From150kTo249k,
            p if p < 500_000.0 => PriceTier::From250kTo499k,
            p if p < 750_000.0 => PriceTier::From500kTo749k,
            p if p < 1_000_000.0 => PriceTier::From750kTo999k,
            _ => PriceTier::OneMillionAndUp,
        }
    }
}

impl std::fmt::Display for PriceTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl TryFrom<String> for PriceTier {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        PriceTier::from_label(&value).ok_or_else(|| format!("unknown price tier '{value}'"))
    }
}

impl From<PriceTier> for String {
    fn from(tier: PriceTier) -> Self {
        tier.label().to_string()
    }
}

/// Visual for one tier: a hosted pin image or a plain color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TierStyle {
    Icon {
        #[serde(rename = "iconUrl")]
        icon_url: String,
    },
    Color {
        color: String,
    },
}

impl TierStyle {
    #[must_use]
    pub fn icon(url: impl Into<String>) -> Self {
        TierStyle::Icon {
            icon_url: url.into(),
        }
    }

    #[must_use]
    pub fn color(color: impl Into<String>) -> Self {
        TierStyle::Color {
            color: color.into(),
        }
    }
}

/// Plain black, distinct from every bucket icon so unknown tiers stand out.
impl Default for TierStyle {
    fn default() -> Self {
        TierStyle::color("#000000")
    }
}

/// Tier → style table with one guaranteed fallback entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierStyles {
    styles: BTreeMap<PriceTier, TierStyle>,
    fallback: TierStyle,
}

impl TierStyles {
    #[must_use]
    pub fn new(styles: BTreeMap<PriceTier, TierStyle>, fallback: TierStyle) -> Self {
        Self { styles, fallback }
    }

    #[must_use]
    pub fn with_fallback(mut self, fallback: TierStyle) -> Self {
        self.fallback = fallback;
        self
    }

    /// Style for `tier`; the fallback when the table has no entry.
    #[must_use]
    pub fn style_for(&self, tier: PriceTier) -> &TierStyle {
        self.styles.get(&tier).unwrap_or(&self.fallback)
    }

    #[must_use]
    pub fn contains(&self, tier: PriceTier) -> bool {
        self.styles.contains_key(&tier)
    }

    #[must_use]
    pub fn fallback(&self) -> &TierStyle {
        &self.fallback
    }

    /// Configured entries in tier order.
    pub fn iter(&self) -> impl Iterator<Item = (PriceTier, &TierStyle)> {
        self.styles.iter().map(|(tier, style)| (*tier, style))
    }
}

impl Default for TierStyles {
    fn default() -> Self {
        let icons = [
            (
                PriceTier::Under150k,
                "89a054d7-d05e-46dd-8cad-7976e8859ea7/1208040-A0E7E5.png",
            ),
            (
                PriceTier::From150kTo249k,
                "6242ece6-b2d8-4aba-9701-bf61cf062ee3/1208040-76D7C4.png",
            ),
            (
                PriceTier::From250kTo499k,
                "e3172350-8018-4d9b-b810-a61640ec9732/1208040-AED581.png",
            ),
            (
                PriceTier::From500kTo749k,
                "dc14b087-873b-4017-9d73-f70573139805/1208040-FFD54F.png",
            ),
            (
                PriceTier::From750kTo999k,
                "85122a0d-6caf-4b33-be07-8a3806cda25e/1208040-F48132.png",
            ),
            (
                PriceTier::OneMillionAndUp,
                "c553d3bf-9d91-4cb5-94e8-9579d1bd3011/1208040-7E57C2b.png",
            ),
        ];
        let styles = icons
            .into_iter()
            .map(|(tier, path)| (tier, TierStyle::icon(format!("{ICON_BASE}/{path}"))))
            .collect();
        Self::new(styles, TierStyle::default())
    }
}

/// Assigns a listing to its tier.
///
/// A `priceRange` label wins when it names a tier present in `styles`.
/// Otherwise the tier is derived from the price. A listing with neither a
/// usable price nor a recognised label is [`PriceTier::Other`].
#[must_use]
pub fn classify(listing: &Listing, styles: &TierStyles) -> PriceTier {
    let labelled = listing
        .price_range
        .as_deref()
        .and_then(PriceTier::from_label);
    if let Some(tier) = labelled.filter(|tier| styles.contains(*tier)) {
        return tier;
    }
    match listing.price.map(PriceTier::from_price) {
        Some(tier) if tier != PriceTier::Other => tier,
        _ => labelled.unwrap_or(PriceTier::Other),
    }
}

#[cfg(test)]
#[path = "tier_test.rs"]
mod tests;
