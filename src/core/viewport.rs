use serde::{Deserialize, Serialize};

use crate::core::GridRange;

/// Result of one zoom step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZoomOutcome {
    /// The level changed; geometry must be recomputed.
    Applied { zoom_level: i32 },
    /// The step would break the minimum-width invariant; the level is kept.
    Rejected { zoom_level: i32 },
    /// A zero delta; nothing to do.
    Unchanged,
}

impl ZoomOutcome {
    #[must_use]
    pub fn is_applied(self) -> bool {
        matches!(self, Self::Applied { .. })
    }
}

/// Pan offset in pixels plus integer zoom level applied on top of the grid range.
///
/// Panning is unbounded: curves grow at their margins as new area is exposed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Viewport {
    offset_x: f64,
    offset_y: f64,
    zoom_level: i32,
}

impl Viewport {
    #[must_use]
    pub fn offset(&self) -> (f64, f64) {
        (self.offset_x, self.offset_y)
    }

    #[must_use]
    pub fn zoom_level(&self) -> i32 {
        self.zoom_level
    }

    /// Moves the pan offset by `(dx, dy)` pixels.
    pub fn apply_pan(&mut self, dx: f64, dy: f64) {
        self.offset_x += dx;
        self.offset_y += dy;
    }

    /// Places the pan offset at an absolute position.
    pub fn set_offset(&mut self, offset_x: f64, offset_y: f64) {
        self.offset_x = offset_x;
        self.offset_y = offset_y;
    }

    /// Applies one zoom step against `base_range`.
    ///
    /// Only the sign of `delta` matters: positive shrinks the range by one
    /// unit per bound, negative grows it.
    pub fn apply_zoom_delta(&mut self, delta: i32, base_range: GridRange) -> ZoomOutcome {
        let step = delta.signum();
        if step == 0 {
            return ZoomOutcome::Unchanged;
        }
        let candidate = self.zoom_level.saturating_add(step);
        if !base_range.zoomed(candidate).satisfies_min_width() {
            return ZoomOutcome::Rejected {
                zoom_level: self.zoom_level,
            };
        }
        self.zoom_level = candidate;
        ZoomOutcome::Applied {
            zoom_level: candidate,
        }
    }

    /// Drops pan and zoom back to the configured range.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::{Viewport, ZoomOutcome};
    use crate::core::GridRange;

    #[test]
    fn zoom_in_stops_at_minimum_width() {
        let mut viewport = Viewport::default();
        let range = GridRange::default();
        for _ in 0..9 {
            assert!(viewport.apply_zoom_delta(1, range).is_applied());
        }
        assert_eq!(viewport.zoom_level(), 9);
        assert_eq!(
            viewport.apply_zoom_delta(1, range),
            ZoomOutcome::Rejected { zoom_level: 9 }
        );
        assert_eq!(viewport.zoom_level(), 9);
    }

    #[test]
    fn wheel_magnitude_collapses_to_one_step() {
        let mut viewport = Viewport::default();
        viewport.apply_zoom_delta(-120, GridRange::default());
        assert_eq!(viewport.zoom_level(), -1);
    }

    #[test]
    fn zero_delta_is_a_no_op() {
        let mut viewport = Viewport::default();
        assert_eq!(
            viewport.apply_zoom_delta(0, GridRange::default()),
            ZoomOutcome::Unchanged
        );
    }

    #[test]
    fn pan_is_unbounded() {
        let mut viewport = Viewport::default();
        viewport.apply_pan(1.0e6, -1.0e6);
        assert_eq!(viewport.offset(), (1.0e6, -1.0e6));
    }
}
