//! One listings map on one page, from mount to teardown.
//!
//! ```text
//! Uninitialized ──load()──▶ Loading ──┬─▶ Ready      (filter events stay here)
//!                                      ├─▶ Failed     (feed unreachable or malformed)
//!                                      └─▶ Cancelled  (token fired while loading)
//! ```
//!
//! The session is the only owner of marker-layer membership: markers are
//! built once when the feed arrives, and filter events only move them on
//! or off the map.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use eqmap_core::{MapOptions, PriceTier};
use eqmap_feed::{validate_feed, FeedClient, FeedError, ListingFilter};
use thiserror::Error;
use tokio::sync::Notify;

use crate::filter::{visible_set, FilterState};
use crate::marker::{MarkerFactory, MarkerId, MarkerSpec};
use crate::surface::{Checkbox, LegendEntry, MapSurface, PageSurface};
use crate::viewport::{Viewport, ViewportFitter};

const FAILURE_NOTICE: &str =
    "Sorry, we are unable to display the map. Please try again later and contact us if this error persists.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    FeedUnavailable,
    FeedMalformed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    Loading,
    Ready,
    Failed(FailureKind),
    Cancelled,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to load listings feed: {0}")]
    Feed(#[from] FeedError),

    #[error("session was cancelled while loading")]
    Cancelled,

    #[error("session has already started loading")]
    AlreadyStarted,

    #[error("session is not ready (state: {0:?})")]
    NotReady(SessionState),
}

/// A user action on the filter UI or map controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterEvent {
    CheckboxChanged { value: String, checked: bool },
    SelectAll,
    ClearAll,
    Recenter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadySummary {
    pub listings: usize,
    pub rejected: usize,
    pub visible: usize,
}

/// Cancels a session's in-flight load. Cloning shares the token.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    inner: Arc<CancelInner>,
}

#[derive(Debug, Default)]
struct CancelInner {
    cancelled: AtomicBool,
    notify: Notify,
}

impl CancelToken {
    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::SeqCst);
        self.inner.notify.notify_waiters();
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    /// Resolves once [`cancel`](Self::cancel) has been called.
    pub async fn cancelled(&self) {
        loop {
            let notified = self.inner.notify.notified();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }
}

pub struct MapSession<M, P> {
    options: MapOptions,
    map: M,
    page: P,
    state: SessionState,
    markers: Vec<MarkerSpec>,
    /// Indexed by `MarkerId`; `true` while the marker is on the map.
    on_map: Vec<bool>,
    filter: FilterState,
    tier_counts: BTreeMap<PriceTier, usize>,
    fitter: ViewportFitter,
    cancel: CancelToken,
}

impl<M: MapSurface, P: PageSurface> MapSession<M, P> {
    /// Attaches a session to the page.
    ///
    /// Returns `None` without touching `map` or `page` when the page has no
    /// element with the configured container id; the page simply does not
    /// carry this widget.
    pub fn mount(options: MapOptions, mut map: M, page: P) -> Option<Self> {
        if !page.has_element(&options.map_container_id) {
            tracing::info!(
                container = %options.map_container_id,
                "map container not on page; skipping"
            );
            return None;
        }

        map.add_tile_layer(&options.tile_url, &options.tile_attribution);
        map.set_view(options.default_center, options.default_zoom);
        if let Some(title) = &options.map_title {
            map.show_title(title);
        }

        Some(Self {
            fitter: ViewportFitter::from_options(&options),
            options,
            map,
            page,
            state: SessionState::Uninitialized,
            markers: Vec::new(),
            on_map: Vec::new(),
            filter: FilterState::all(),
            tier_counts: BTreeMap::new(),
            cancel: CancelToken::default(),
        })
    }

    /// Fetches the feed once and renders it.
    ///
    /// Zero valid listings is still a successful load.
    ///
    /// # Errors
    ///
    /// - [`SessionError::AlreadyStarted`]: `load` was already called.
    /// - [`SessionError::Feed`]: the feed could not be fetched or parsed;
    ///   the visitor has been shown a notice and the session is `Failed`.
    /// - [`SessionError::Cancelled`]: the cancel token fired first.
    pub async fn load(&mut self, client: &FeedClient) -> Result<ReadySummary, SessionError> {
        if self.state != SessionState::Uninitialized {
            return Err(SessionError::AlreadyStarted);
        }
        self.state = SessionState::Loading;
        self.page.set_visible(&self.options.spinner_id, true);

        let cancel = self.cancel.clone();
        let outcome = tokio::select! {
            biased;
            () = cancel.cancelled() => None,
            result = client.fetch_records(&self.options.feed_url) => Some(result),
        };

        self.page.set_visible(&self.options.spinner_id, false);

        match outcome {
            None => {
                self.state = SessionState::Cancelled;
                tracing::info!(feed_url = %self.options.feed_url, "map session cancelled while loading");
                Err(SessionError::Cancelled)
            }
            Some(Err(err)) => {
                let kind = if err.is_malformed() {
                    FailureKind::FeedMalformed
                } else {
                    FailureKind::FeedUnavailable
                };
                self.state = SessionState::Failed(kind);
                self.page.show_notice(FAILURE_NOTICE);
                tracing::warn!(error = %err, ?kind, "map session failed to load feed");
                Err(SessionError::Feed(err))
            }
            Some(Ok(records)) => Ok(self.become_ready(&records)),
        }
    }

    /// Applies a filter or control event and returns the visible marker count.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotReady`] unless the session is `Ready`.
    pub fn handle(&mut self, event: FilterEvent) -> Result<usize, SessionError> {
        if self.state != SessionState::Ready {
            return Err(SessionError::NotReady(self.state));
        }

        match event {
            FilterEvent::CheckboxChanged { value, checked } => {
                let Some(tier) = PriceTier::from_label(&value) else {
                    tracing::debug!(%value, "ignoring checkbox for unknown tier");
                    return Ok(self.visible_count());
                };
                if self.filter.is_active(tier) != checked {
                    self.filter.toggle(tier);
                }
            }
            FilterEvent::SelectAll => {
                self.filter.select_all();
                self.set_all_checkboxes(true);
            }
            FilterEvent::ClearAll => {
                self.filter.clear_all();
                self.set_all_checkboxes(false);
            }
            FilterEvent::Recenter => {
                self.recenter();
                return Ok(self.visible_count());
            }
        }

        self.sync_layer();
        let visible = self.visible_count();
        tracing::debug!(visible, "filter updated");
        Ok(visible)
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    #[must_use]
    pub fn markers(&self) -> &[MarkerSpec] {
        &self.markers
    }

    /// Ids of markers currently on the map, in marker order.
    pub fn visible(&self) -> impl Iterator<Item = MarkerId> + '_ {
        self.markers
            .iter()
            .filter(|m| self.on_map[m.id.0])
            .map(|m| m.id)
    }

    #[must_use]
    pub fn visible_count(&self) -> usize {
        self.on_map.iter().filter(|on| **on).count()
    }

    /// Validated listings per tier, fixed at load time.
    #[must_use]
    pub fn tier_counts(&self) -> &BTreeMap<PriceTier, usize> {
        &self.tier_counts
    }

    #[must_use]
    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    #[must_use]
    pub fn map(&self) -> &M {
        &self.map
    }

    #[must_use]
    pub fn page(&self) -> &P {
        &self.page
    }

    /// Re-fits the viewport to the visible markers.
    pub fn recenter(&mut self) -> Viewport {
        let on_map = &self.on_map;
        let points = self
            .markers
            .iter()
            .filter(|m| on_map[m.id.0])
            .map(|m| m.position);
        self.fitter.fit(&mut self.map, points)
    }

    fn become_ready(&mut self, records: &[serde_json::Value]) -> ReadySummary {
        let feed = validate_feed(records, &ListingFilter::from_options(&self.options));

        let factory = MarkerFactory::from_options(&self.options);
        self.markers = feed
            .listings
            .iter()
            .enumerate()
            .map(|(index, listing)| factory.build(MarkerId(index), listing))
            .collect();
        self.on_map = vec![false; self.markers.len()];

        self.tier_counts.clear();
        for marker in &self.markers {
            *self.tier_counts.entry(marker.tier).or_insert(0) += 1;
        }

        let checkboxes = self.page.checkboxes(&self.options.filter_selector);
        for checkbox in &checkboxes {
            let count = PriceTier::from_label(&checkbox.value)
                .and_then(|tier| self.tier_counts.get(&tier).copied())
                .unwrap_or(0);
            self.page
                .set_tier_count(&self.options.filter_selector, &checkbox.value, count);
        }
        self.filter = initial_filter(&checkboxes);

        if self.options.show_legend {
            let entries: Vec<LegendEntry> = self
                .options
                .tier_styles
                .iter()
                .map(|(tier, style)| LegendEntry {
                    tier,
                    label: tier.label(),
                    style: style.clone(),
                })
                .collect();
            self.page.render_legend(&entries);
        }

        self.state = SessionState::Ready;
        self.sync_layer();

        let summary = ReadySummary {
            listings: feed.listings.len(),
            rejected: feed.rejected,
            visible: self.visible_count(),
        };
        tracing::info!(
            listings = summary.listings,
            rejected = summary.rejected,
            visible = summary.visible,
            "map session ready"
        );
        summary
    }

    /// Brings layer membership in line with the filter, then re-fits.
    ///
    /// Hidden markers are removed from the layer, not made transparent.
    fn sync_layer(&mut self) {
        let mut wanted = vec![false; self.markers.len()];
        for id in visible_set(&self.markers, &self.filter) {
            wanted[id.0] = true;
        }

        for marker in &self.markers {
            let index = marker.id.0;
            match (self.on_map[index], wanted[index]) {
                (true, false) => self.map.remove_marker(marker.id),
                (false, true) => self.map.add_marker(marker),
                _ => {}
            }
        }
        self.on_map = wanted;
        self.recenter();
    }

    fn set_all_checkboxes(&mut self, checked: bool) {
        let group = &self.options.filter_selector;
        for checkbox in self.page.checkboxes(group) {
            self.page.set_checkbox(group, &checkbox.value, checked);
        }
    }
}

/// Mirrors the page: checked boxes are active, unchecked are not, and a
/// tier without any checkbox is active because nothing could re-enable it.
fn initial_filter(checkboxes: &[Checkbox]) -> FilterState {
    let mut present = Vec::new();
    let mut checked = Vec::new();
    for checkbox in checkboxes {
        if let Some(tier) = PriceTier::from_label(&checkbox.value) {
            present.push(tier);
            if checkbox.checked {
                checked.push(tier);
            }
        }
    }
    let unfilterable = PriceTier::ALL
        .into_iter()
        .filter(|tier| !present.contains(tier));
    FilterState::from_active(checked.into_iter().chain(unfilterable))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checkbox(value: &str, checked: bool) -> Checkbox {
        Checkbox {
            value: value.to_string(),
            checked,
        }
    }

    #[test]
    fn initial_filter_without_checkboxes_is_everything() {
        assert_eq!(initial_filter(&[]), FilterState::all());
    }

    #[test]
    fn initial_filter_mirrors_checked_state() {
        let state = initial_filter(&[
            checkbox("Under $150k", true),
            checkbox("$150k - $249k", false),
            checkbox("bogus", true),
        ]);
        assert!(state.is_active(PriceTier::Under150k));
        assert!(!state.is_active(PriceTier::From150kTo249k));
        assert!(state.is_active(PriceTier::OneMillionAndUp));
        assert!(state.is_active(PriceTier::Other));
    }

    #[tokio::test]
    async fn cancel_token_resolves_after_cancel() {
        let token = CancelToken::default();
        let waiter = token.clone();
        let handle = tokio::spawn(async move { waiter.cancelled().await });
        token.cancel();
        handle.await.unwrap();
        assert!(token.is_cancelled());
    }

    #[tokio::test]
    async fn cancel_token_already_cancelled_resolves_immediately() {
        let token = CancelToken::default();
        token.cancel();
        token.cancelled().await;
    }
}
