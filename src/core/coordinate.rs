use serde::{Deserialize, Serialize};

use crate::core::{CanvasSize, GridRange, Viewport};
use crate::error::{GraphError, GraphResult};

/// Upper bound of reference lines drawn per axis before the increment grows.
pub const MAX_REFERENCE_LINES: f64 = 35.0;

/// Returns the logical spacing between reference lines for `unit_count`
/// visible units: starts at one unit and doubles until at most
/// `MAX_REFERENCE_LINES` lines fit.
#[must_use]
pub fn reference_increment(unit_count: f64) -> f64 {
    let mut increment = 1.0;
    if !unit_count.is_finite() {
        return increment;
    }
    while unit_count / increment > MAX_REFERENCE_LINES {
        increment *= 2.0;
    }
    increment
}

/// Pixel geometry derived from a grid range, zoom level and canvas size.
///
/// A frame is only valid for the exact inputs it was built from; the session
/// rebuilds it whenever range, zoom or canvas size change.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoordinateFrame {
    range: GridRange,
    canvas: CanvasSize,
    units_gap_x: f64,
    units_gap_y: f64,
    origin_x: f64,
    origin_y: f64,
    increment_x: f64,
    increment_y: f64,
}

impl CoordinateFrame {
    pub fn new(base_range: GridRange, zoom_level: i32, canvas: CanvasSize) -> GraphResult<Self> {
        if !canvas.is_valid() {
            return Err(GraphError::InvalidViewport {
                width: canvas.width,
                height: canvas.height,
            });
        }
        let range = base_range.zoomed(zoom_level);
        range.validate()?;

        let units_gap_x = canvas.width_px() / range.unit_count_x();
        let units_gap_y = canvas.height_px() / range.unit_count_y();

        Ok(Self {
            range,
            canvas,
            units_gap_x,
            units_gap_y,
            origin_x: (0.5 - range.x_min) * units_gap_x,
            origin_y: (range.y_max + 0.5) * units_gap_y,
            increment_x: reference_increment(range.unit_count_x()),
            increment_y: reference_increment(range.unit_count_y()),
        })
    }

    /// Effective (zoomed) range this frame maps.
    #[must_use]
    pub fn range(&self) -> GridRange {
        self.range
    }

    #[must_use]
    pub fn canvas(&self) -> CanvasSize {
        self.canvas
    }

    /// Pixels per logical unit along X.
    #[must_use]
    pub fn units_gap_x(&self) -> f64 {
        self.units_gap_x
    }

    /// Pixels per logical unit along Y.
    #[must_use]
    pub fn units_gap_y(&self) -> f64 {
        self.units_gap_y
    }

    /// World-pixel position of logical `(0, 0)`.
    #[must_use]
    pub fn origin(&self) -> (f64, f64) {
        (self.origin_x, self.origin_y)
    }

    #[must_use]
    pub fn increment_x(&self) -> f64 {
        self.increment_x
    }

    #[must_use]
    pub fn increment_y(&self) -> f64 {
        self.increment_y
    }

    #[must_use]
    pub fn logical_to_pixel_x(&self, x: f64) -> f64 {
        self.origin_x + x * self.units_gap_x
    }

    /// Pixel Y grows downwards, so larger logical values map higher up.
    #[must_use]
    pub fn logical_to_pixel_y(&self, y: f64) -> f64 {
        self.origin_y - y * self.units_gap_y
    }

    #[must_use]
    pub fn pixel_to_logical_x(&self, px: f64) -> f64 {
        (px - self.origin_x) / self.units_gap_x
    }

    #[must_use]
    pub fn pixel_to_logical_y(&self, py: f64) -> f64 {
        (self.origin_y - py) / self.units_gap_y
    }

    /// Reference-line and axis placement for the panned viewport.
    #[must_use]
    pub fn grid_geometry(&self, viewport: &Viewport) -> GridGeometry {
        let width = self.canvas.width_px();
        let height = self.canvas.height_px();
        let (offset_x, offset_y) = viewport.offset();

        let x_lo = self.pixel_to_logical_x(offset_x);
        let x_hi = self.pixel_to_logical_x(width + offset_x);
        let vertical_lines = multiples_within(x_lo, x_hi, self.increment_x)
            .map(|value| GridLine {
                value,
                position_px: self.logical_to_pixel_x(value) - offset_x,
            })
            .collect();

        let y_lo = self.pixel_to_logical_y(height + offset_y);
        let y_hi = self.pixel_to_logical_y(offset_y);
        let horizontal_lines = multiples_within(y_lo, y_hi, self.increment_y)
            .map(|value| GridLine {
                value,
                position_px: self.logical_to_pixel_y(value) - offset_y,
            })
            .collect();

        let x_axis = self.origin_y - offset_y;
        let y_axis = self.origin_x - offset_x;

        GridGeometry {
            vertical_lines,
            horizontal_lines,
            x_axis_px: (x_axis > 0.0 && x_axis < height).then_some(x_axis),
            y_axis_px: (y_axis > 0.0 && y_axis < width).then_some(y_axis),
            x_label_anchor_px: x_axis.clamp(0.0, height),
            y_label_anchor_px: y_axis.clamp(0.0, width),
        }
    }
}

/// Non-zero multiples of `step` inside `[lo, hi]`, ascending.
fn multiples_within(lo: f64, hi: f64, step: f64) -> impl Iterator<Item = f64> {
    let first = (lo / step).ceil() as i64;
    let last = (hi / step).floor() as i64;
    (first..=last)
        .filter(|k| *k != 0)
        .map(move |k| k as f64 * step)
}

/// One reference line: its logical value and on-screen pixel coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridLine {
    pub value: f64,
    pub position_px: f64,
}

/// Screen-space grid layout for one draw pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridGeometry {
    /// Lines parallel to the Y axis, positioned along screen X.
    pub vertical_lines: Vec<GridLine>,
    /// Lines parallel to the X axis, positioned along screen Y.
    pub horizontal_lines: Vec<GridLine>,
    /// Screen Y of the X axis when it is on screen.
    pub x_axis_px: Option<f64>,
    /// Screen X of the Y axis when it is on screen.
    pub y_axis_px: Option<f64>,
    /// Screen Y where X tick labels are anchored, pinned to the canvas edge
    /// when the axis is scrolled away.
    pub x_label_anchor_px: f64,
    pub y_label_anchor_px: f64,
}
