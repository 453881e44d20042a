//! Price-tier filter state and the visible-marker selection it drives.

use std::collections::BTreeSet;

use eqmap_core::PriceTier;

use crate::marker::{MarkerId, MarkerSpec};

/// The set of price tiers currently shown on the map.
///
/// [`toggle`](Self::toggle), [`select_all`](Self::select_all), and
/// [`clear_all`](Self::clear_all) are the only mutators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    active: BTreeSet<PriceTier>,
}

impl FilterState {
    #[must_use]
    pub fn all() -> Self {
        Self {
            active: PriceTier::ALL.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn from_active(tiers: impl IntoIterator<Item = PriceTier>) -> Self {
        Self {
            active: tiers.into_iter().collect(),
        }
    }

    /// Flips `tier` and returns whether it is now active.
    pub fn toggle(&mut self, tier: PriceTier) -> bool {
        if self.active.remove(&tier) {
            false
        } else {
            self.active.insert(tier);
            true
        }
    }

    pub fn select_all(&mut self) {
        self.active.extend(PriceTier::ALL);
    }

    pub fn clear_all(&mut self) {
        self.active.clear();
    }

    #[must_use]
    pub fn is_active(&self, tier: PriceTier) -> bool {
        self.active.contains(&tier)
    }

    pub fn active(&self) -> impl Iterator<Item = PriceTier> + '_ {
        self.active.iter().copied()
    }
}

/// Markers whose tier is active, in marker order. One pass over `markers`.
#[must_use]
pub fn visible_set(markers: &[MarkerSpec], state: &FilterState) -> Vec<MarkerId> {
    markers
        .iter()
        .filter(|m| state.is_active(m.tier))
        .map(|m| m.id)
        .collect()
}
