use serde::{Deserialize, Serialize};

/// Pixel dimensions of the drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl CanvasSize {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }

    #[must_use]
    pub fn width_px(self) -> f64 {
        f64::from(self.width)
    }

    #[must_use]
    pub fn height_px(self) -> f64 {
        f64::from(self.height)
    }

    /// Closed-rectangle containment test in canvas pixels.
    #[must_use]
    pub fn contains(self, x: f64, y: f64) -> bool {
        (0.0..=self.width_px()).contains(&x) && (0.0..=self.height_px()).contains(&y)
    }
}

/// Sampled curve point in world-pixel space.
///
/// World pixels are canvas pixels before the pan offset is applied; the
/// on-screen position is `(x - offset_x, y - offset_y)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}
