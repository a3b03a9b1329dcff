use tracing::trace;

use crate::core::sampler::{SAMPLE_STEP_PX, world_pixel_y};
use crate::core::{CoordinateFrame, CurveSeries, Evaluator, PixelPoint, Polyline, Viewport};

/// Grows cached polylines at the margins exposed by panning.
///
/// Only the newly visible strip is sampled, so a pan costs time proportional
/// to the pan distance rather than the canvas width. The visibility break
/// heuristic of the sampler is not applied here: a pole scrolled into view is
/// joined by a straight stroke until the next full resample.
#[derive(Debug, Clone, Copy, Default)]
pub struct IncrementalExtender;

impl IncrementalExtender {
    /// Extends `series` in place and returns the number of points added.
    pub fn extend(
        &self,
        series: &mut CurveSeries,
        frame: &CoordinateFrame,
        viewport: &Viewport,
    ) -> usize {
        let (polyline, evaluator) = series.geometry_mut();
        match evaluator {
            Some(evaluator) => self.extend_polyline(polyline, evaluator, frame, viewport),
            None => 0,
        }
    }

    pub fn extend_polyline(
        &self,
        polyline: &mut Polyline,
        evaluator: &dyn Evaluator,
        frame: &CoordinateFrame,
        viewport: &Viewport,
    ) -> usize {
        let canvas = frame.canvas();
        let (offset_x, offset_y) = viewport.offset();
        let on_screen = |point: &PixelPoint| canvas.contains(point.x - offset_x, point.y - offset_y);
        let mut added = 0;

        while let Some(first) = polyline.first().filter(on_screen) {
            let world_x = first.x - SAMPLE_STEP_PX;
            match world_pixel_y(evaluator, frame, world_x) {
                Ok(y) if y.is_finite() => {
                    polyline.push_front(PixelPoint::new(world_x, y));
                    added += 1;
                }
                outcome => {
                    trace!(
                        formula = evaluator.formula(),
                        world_x,
                        error = ?outcome.err(),
                        "edge extension stopped"
                    );
                    break;
                }
            }
        }

        while let Some(last) = polyline.last().filter(on_screen) {
            let world_x = last.x + SAMPLE_STEP_PX;
            match world_pixel_y(evaluator, frame, world_x) {
                Ok(y) if y.is_finite() => {
                    polyline.push(PixelPoint::new(world_x, y));
                    added += 1;
                }
                outcome => {
                    trace!(
                        formula = evaluator.formula(),
                        world_x,
                        error = ?outcome.err(),
                        "edge extension stopped"
                    );
                    break;
                }
            }
        }

        added
    }
}
