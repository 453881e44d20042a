//! The two capabilities a session drives: the map widget and the host page.
//!
//! Implementations wrap whatever actually renders (a Leaflet binding, a DOM
//! adapter); the session only ever talks to these traits. Page lookups for
//! elements that do not exist are expected to be silent no-ops.

use eqmap_core::{LatLng, PriceTier, TierStyle};

use crate::marker::{MarkerId, MarkerSpec};
use crate::viewport::Bounds;

pub trait MapSurface {
    fn add_tile_layer(&mut self, url_template: &str, attribution: &str);

    /// Adds the marker with its icon, popup, and tooltip bound.
    fn add_marker(&mut self, marker: &MarkerSpec);

    /// Removes the marker from the layer entirely, closing any open popup.
    fn remove_marker(&mut self, id: MarkerId);

    fn fit_bounds(&mut self, bounds: Bounds, padding: u32);

    fn set_view(&mut self, center: LatLng, zoom: u8);

    fn show_title(&mut self, _title: &str) {}
}

/// One filter checkbox as read from the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkbox {
    pub value: String,
    pub checked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegendEntry {
    pub tier: PriceTier,
    pub label: &'static str,
    pub style: TierStyle,
}

pub trait PageSurface {
    fn has_element(&self, id: &str) -> bool;

    /// Checkboxes in `group`, in document order.
    fn checkboxes(&self, group: &str) -> Vec<Checkbox>;

    fn set_checkbox(&mut self, group: &str, value: &str, checked: bool);

    /// Shows or hides an element, e.g. the loading indicator.
    fn set_visible(&mut self, id: &str, visible: bool);

    /// Plain-language notice for the visitor.
    fn show_notice(&mut self, message: &str);

    /// Writes the count badge next to the checkbox with `value`.
    fn set_tier_count(&mut self, group: &str, value: &str, count: usize);

    fn render_legend(&mut self, _entries: &[LegendEntry]) {}
}
