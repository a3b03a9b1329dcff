use serde::{Deserialize, Serialize};

use crate::error::{GraphError, GraphResult};

/// Smallest logical width a zoomed range may keep on either axis.
pub const MIN_RANGE_WIDTH: f64 = 2.0;

/// Logical extent mapped onto the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridRange {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Default for GridRange {
    fn default() -> Self {
        Self {
            x_min: -10.0,
            x_max: 10.0,
            y_min: -10.0,
            y_max: 10.0,
        }
    }
}

impl GridRange {
    pub fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> GraphResult<Self> {
        let range = Self {
            x_min,
            x_max,
            y_min,
            y_max,
        };
        range.validate()?;
        Ok(range)
    }

    pub fn validate(self) -> GraphResult<()> {
        for (name, value) in [
            ("x_min", self.x_min),
            ("x_max", self.x_max),
            ("y_min", self.y_min),
            ("y_max", self.y_max),
        ] {
            if !value.is_finite() {
                return Err(GraphError::Configuration(format!(
                    "grid range bound `{name}` must be finite"
                )));
            }
        }
        if self.x_max <= self.x_min || self.y_max <= self.y_min {
            return Err(GraphError::Configuration(format!(
                "grid range must satisfy x_max > x_min and y_max > y_min, got x=[{}, {}] y=[{}, {}]",
                self.x_min, self.x_max, self.y_min, self.y_max
            )));
        }
        Ok(())
    }

    #[must_use]
    pub fn width(self) -> f64 {
        self.x_max - self.x_min
    }

    #[must_use]
    pub fn height(self) -> f64 {
        self.y_max - self.y_min
    }

    /// Number of unit cells spanned horizontally, both bounds included.
    #[must_use]
    pub fn unit_count_x(self) -> f64 {
        self.width() + 1.0
    }

    #[must_use]
    pub fn unit_count_y(self) -> f64 {
        self.height() + 1.0
    }

    /// Range shrunk (positive level) or grown (negative level) by `zoom_level`
    /// units on all four bounds.
    #[must_use]
    pub fn zoomed(self, zoom_level: i32) -> Self {
        let z = f64::from(zoom_level);
        Self {
            x_min: self.x_min + z,
            x_max: self.x_max - z,
            y_min: self.y_min + z,
            y_max: self.y_max - z,
        }
    }

    #[must_use]
    pub fn satisfies_min_width(self) -> bool {
        self.width() >= MIN_RANGE_WIDTH && self.height() >= MIN_RANGE_WIDTH
    }

    /// Whether both axes span the same number of units, which is what makes
    /// zooming proportional on a square canvas.
    #[must_use]
    pub fn is_proportional(self) -> bool {
        (self.unit_count_x() - self.unit_count_y()).abs() <= f64::EPSILON
    }
}

#[cfg(test)]
mod tests {
    use super::GridRange;

    #[test]
    fn default_range_is_symmetric_and_proportional() {
        let range = GridRange::default();
        assert_eq!(range.unit_count_x(), 21.0);
        assert!(range.is_proportional());
    }

    #[test]
    fn zoom_shrinks_every_bound() {
        let range = GridRange::default().zoomed(3);
        assert_eq!((range.x_min, range.x_max), (-7.0, 7.0));
        assert_eq!((range.y_min, range.y_max), (-7.0, 7.0));
    }

    #[test]
    fn inverted_range_is_rejected() {
        assert!(GridRange::new(1.0, -1.0, -1.0, 1.0).is_err());
        assert!(GridRange::new(-1.0, 1.0, 0.0, 0.0).is_err());
        assert!(GridRange::new(f64::NAN, 1.0, 0.0, 1.0).is_err());
    }

    #[test]
    fn stretched_range_is_not_proportional() {
        let range = GridRange::new(-20.0, 20.0, -5.0, 5.0).expect("valid range");
        assert!(!range.is_proportional());
    }
}
