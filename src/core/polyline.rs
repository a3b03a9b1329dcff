use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::PixelPoint;

/// Pixel-space curve made of sub-paths.
///
/// Each sub-path is drawn as one connected stroke; the gap between two
/// sub-paths is a branch break. Points are ascending by `x` across the whole
/// polyline.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Polyline {
    segments: SmallVec<[VecDeque<PixelPoint>; 1]>,
}

impl Polyline {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn segments(&self) -> &[VecDeque<PixelPoint>] {
        &self.segments
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.iter().all(VecDeque::is_empty)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.iter().map(VecDeque::len).sum()
    }

    /// All points in ascending `x`, ignoring sub-path boundaries.
    pub fn points(&self) -> impl Iterator<Item = &PixelPoint> + '_ {
        self.segments.iter().flatten()
    }

    #[must_use]
    pub fn first(&self) -> Option<PixelPoint> {
        self.segments.first().and_then(|segment| segment.front().copied())
    }

    #[must_use]
    pub fn last(&self) -> Option<PixelPoint> {
        self.segments.last().and_then(|segment| segment.back().copied())
    }

    /// Opens a new sub-path starting at `point`.
    pub fn start_segment(&mut self, point: PixelPoint) {
        self.segments.push(VecDeque::from([point]));
    }

    /// Continues the current sub-path, opening one when the polyline is empty.
    pub fn push(&mut self, point: PixelPoint) {
        match self.segments.last_mut() {
            Some(segment) => segment.push_back(point),
            None => self.start_segment(point),
        }
    }

    /// Prepends to the first sub-path.
    pub fn push_front(&mut self, point: PixelPoint) {
        match self.segments.first_mut() {
            Some(segment) => segment.push_front(point),
            None => self.start_segment(point),
        }
    }

    /// Whether every point is strictly right of its predecessor.
    #[must_use]
    pub fn is_strictly_ascending(&self) -> bool {
        let mut previous: Option<f64> = None;
        for point in self.points() {
            if previous.is_some_and(|x| x >= point.x) {
                return false;
            }
            previous = Some(point.x);
        }
        true
    }
}
