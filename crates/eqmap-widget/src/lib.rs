pub mod filter;
pub mod format;
pub mod marker;
pub mod session;
pub mod surface;
pub mod viewport;

pub use filter::{visible_set, FilterState};
pub use format::{format_price, format_price_for_pin};
pub use marker::{MarkerFactory, MarkerId, MarkerSpec, MarkerVisual};
pub use session::{
    CancelToken, FailureKind, FilterEvent, MapSession, ReadySummary, SessionError, SessionState,
};
pub use surface::{Checkbox, LegendEntry, MapSurface, PageSurface};
pub use viewport::{Bounds, Viewport, ViewportFitter};
