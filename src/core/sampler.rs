use serde::{Deserialize, Serialize};

use crate::core::{CoordinateFrame, Evaluator, PixelPoint, Polyline};
use crate::error::FormulaError;

/// Horizontal pixel distance between two consecutive samples.
pub const SAMPLE_STEP_PX: f64 = 4.0;

/// What the sampler does once a curve leaves the visible band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BranchPolicy {
    /// Append one boundary point and stop sampling the curve. Curves that
    /// leave and later re-enter the canvas are truncated after the first exit;
    /// non-finite values abort the curve as a formula failure.
    #[default]
    StopAtFirstExit,
    /// Keep walking after an exit and open a new sub-path on re-entry.
    /// Non-finite values count as off-screen samples.
    Resume,
}

/// Result of sampling one curve.
///
/// A failed evaluation keeps whatever was sampled before it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SampleOutcome {
    pub polyline: Polyline,
    pub error: Option<FormulaError>,
}

impl SampleOutcome {
    fn failed(polyline: Polyline, error: FormulaError) -> Self {
        Self {
            polyline,
            error: Some(error),
        }
    }
}

/// Fixed-step curve sampler with branch-break handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Sampler {
    policy: BranchPolicy,
}

impl Sampler {
    #[must_use]
    pub fn new(policy: BranchPolicy) -> Self {
        Self { policy }
    }

    #[must_use]
    pub fn policy(&self) -> BranchPolicy {
        self.policy
    }

    /// Samples `evaluator` across the visible canvas width (zero pan offset).
    pub fn sample(&self, evaluator: &dyn Evaluator, frame: &CoordinateFrame) -> SampleOutcome {
        let (origin_x, _) = frame.origin();
        let canvas = frame.canvas();
        let height = canvas.height_px();
        let first = (-origin_x / SAMPLE_STEP_PX).round() as i64;
        let last = ((canvas.width_px() - origin_x) / SAMPLE_STEP_PX).round() as i64;

        let mut polyline = Polyline::new();
        let mut was_visible = false;
        let mut previous_x = origin_x;

        for i in first..=last {
            let world_x = origin_x + SAMPLE_STEP_PX * i as f64;
            let y = match world_pixel_y(evaluator, frame, world_x) {
                Ok(y) => y,
                Err(err) => return SampleOutcome::failed(polyline, err),
            };

            if !y.is_finite() && self.policy == BranchPolicy::StopAtFirstExit {
                let x = frame.pixel_to_logical_x(world_x);
                return SampleOutcome::failed(
                    polyline,
                    FormulaError::new(
                        evaluator.formula(),
                        format!("result is not a finite number at x = {x}"),
                    ),
                );
            }

            let visible = y.is_finite() && (0.0..=height).contains(&y);
            if visible {
                let point = PixelPoint::new(world_x, y);
                if was_visible {
                    polyline.push(point);
                } else {
                    polyline.start_segment(point);
                }
            } else if was_visible {
                let boundary_x = previous_x + SAMPLE_STEP_PX / 2.0;
                match world_pixel_y(evaluator, frame, boundary_x) {
                    Ok(boundary_y) if boundary_y.is_finite() => {
                        polyline.push(PixelPoint::new(boundary_x, boundary_y));
                    }
                    Ok(_) => {}
                    Err(err) => return SampleOutcome::failed(polyline, err),
                }
                if self.policy == BranchPolicy::StopAtFirstExit {
                    break;
                }
            }

            was_visible = visible;
            previous_x = world_x;
        }

        SampleOutcome {
            polyline,
            error: None,
        }
    }
}

/// Evaluates the curve at world-pixel column `world_x` and returns the
/// world-pixel row. The value may be non-finite.
pub(crate) fn world_pixel_y(
    evaluator: &dyn Evaluator,
    frame: &CoordinateFrame,
    world_x: f64,
) -> Result<f64, FormulaError> {
    let y = evaluator.eval(frame.pixel_to_logical_x(world_x))?;
    Ok(frame.logical_to_pixel_y(y))
}
