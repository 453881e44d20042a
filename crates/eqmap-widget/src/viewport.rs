//! Keeps the map framed on whatever markers are visible.

use eqmap_core::{LatLng, MapOptions};

use crate::surface::MapSurface;

/// Axis-aligned lat/lng rectangle. Does not handle antimeridian wrap; the
/// brokerage map never spans it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl Bounds {
    /// Smallest rectangle containing every point, or `None` for no points.
    #[must_use]
    pub fn enclosing(points: impl IntoIterator<Item = LatLng>) -> Option<Self> {
        points.into_iter().fold(None, |acc, p| {
            Some(match acc {
                None => Bounds {
                    south_west: p,
                    north_east: p,
                },
                Some(b) => Bounds {
                    south_west: LatLng::new(
                        b.south_west.lat.min(p.lat),
                        b.south_west.lng.min(p.lng),
                    ),
                    north_east: LatLng::new(
                        b.north_east.lat.max(p.lat),
                        b.north_east.lng.max(p.lng),
                    ),
                },
            })
        })
    }

    #[must_use]
    pub fn contains(&self, p: LatLng) -> bool {
        (self.south_west.lat..=self.north_east.lat).contains(&p.lat)
            && (self.south_west.lng..=self.north_east.lng).contains(&p.lng)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Viewport {
    Fit { bounds: Bounds, padding: u32 },
    Default { center: LatLng, zoom: u8 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportFitter {
    default_center: LatLng,
    default_zoom: u8,
    padding: u32,
}

impl ViewportFitter {
    #[must_use]
    pub fn new(default_center: LatLng, default_zoom: u8, padding: u32) -> Self {
        Self {
            default_center,
            default_zoom,
            padding,
        }
    }

    #[must_use]
    pub fn from_options(options: &MapOptions) -> Self {
        Self::new(options.default_center, options.default_zoom, options.padding)
    }

    /// The viewport for `points`: their padded bounds, or the default view
    /// when there are none.
    #[must_use]
    pub fn compute(&self, points: impl IntoIterator<Item = LatLng>) -> Viewport {
        match Bounds::enclosing(points) {
            Some(bounds) => Viewport::Fit {
                bounds,
                padding: self.padding,
            },
            None => Viewport::Default {
                center: self.default_center,
                zoom: self.default_zoom,
            },
        }
    }

    /// Computes and applies the viewport. Same input, same viewport.
    pub fn fit<M: MapSurface>(
        &self,
        map: &mut M,
        points: impl IntoIterator<Item = LatLng>,
    ) -> Viewport {
        let viewport = self.compute(points);
        match viewport {
            Viewport::Fit { bounds, padding } => map.fit_bounds(bounds, padding),
            Viewport::Default { center, zoom } => map.set_view(center, zoom),
        }
        viewport
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fitter() -> ViewportFitter {
        ViewportFitter::new(LatLng::new(41.661_315, -93.737_999), 11, 24)
    }

    #[test]
    fn enclosing_covers_all_points() {
        let points = [
            LatLng::new(41.60, -93.70),
            LatLng::new(41.75, -93.55),
            LatLng::new(41.52, -93.81),
        ];
        let bounds = Bounds::enclosing(points).unwrap();
        assert_eq!(bounds.south_west, LatLng::new(41.52, -93.81));
        assert_eq!(bounds.north_east, LatLng::new(41.75, -93.55));
        assert!(points.iter().all(|p| bounds.contains(*p)));
    }

    #[test]
    fn enclosing_single_point_is_degenerate() {
        let p = LatLng::new(41.6, -93.6);
        let bounds = Bounds::enclosing([p]).unwrap();
        assert_eq!(bounds.south_west, p);
        assert_eq!(bounds.north_east, p);
    }

    #[test]
    fn compute_empty_resets_to_default_view() {
        assert_eq!(
            fitter().compute(std::iter::empty()),
            Viewport::Default {
                center: LatLng::new(41.661_315, -93.737_999),
                zoom: 11
            }
        );
    }

    #[test]
    fn compute_applies_padding() {
        let viewport = fitter().compute([LatLng::new(41.6, -93.6), LatLng::new(41.7, -93.5)]);
        assert!(matches!(viewport, Viewport::Fit { padding: 24, .. }));
    }

    #[test]
    fn compute_is_idempotent() {
        let points = [LatLng::new(41.6, -93.6), LatLng::new(41.7, -93.5)];
        assert_eq!(fitter().compute(points), fitter().compute(points));
    }
}
