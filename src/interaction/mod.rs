mod throttle;

pub use throttle::{DEFAULT_REDRAW_INTERVAL, RedrawThrottle, ThrottleState};

use serde::{Deserialize, Serialize};

use crate::core::Hit;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InteractionMode {
    Idle,
    Panning,
}

/// What a throttled pointer-move event ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerOutcome {
    /// Dropped inside the redraw window.
    Throttled,
    /// Nothing to do: panning and tooltips are both disabled or idle.
    Ignored,
    Panned { dx: f64, dy: f64, points_added: usize },
    TooltipShown(Hit),
    TooltipHidden,
    /// Hover miss with no tooltip on screen.
    NoHit,
}

/// Pointer state shared by pan and hover handling.
///
/// The drag anchor is stored in world pixels (pointer plus offset at press
/// time) so the offset during a drag is always `anchor - pointer`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractionState {
    mode: InteractionMode,
    drag_anchor_x: f64,
    drag_anchor_y: f64,
    cursor_x: f64,
    cursor_y: f64,
    hover: Option<Hit>,
}

impl Default for InteractionState {
    fn default() -> Self {
        Self {
            mode: InteractionMode::Idle,
            drag_anchor_x: 0.0,
            drag_anchor_y: 0.0,
            cursor_x: 0.0,
            cursor_y: 0.0,
            hover: None,
        }
    }
}

impl InteractionState {
    #[must_use]
    pub fn mode(self) -> InteractionMode {
        self.mode
    }

    #[must_use]
    pub fn is_panning(self) -> bool {
        self.mode == InteractionMode::Panning
    }

    #[must_use]
    pub fn cursor(self) -> (f64, f64) {
        (self.cursor_x, self.cursor_y)
    }

    #[must_use]
    pub fn drag_anchor(self) -> (f64, f64) {
        (self.drag_anchor_x, self.drag_anchor_y)
    }

    #[must_use]
    pub fn hover(self) -> Option<Hit> {
        self.hover
    }

    pub fn on_pan_start(&mut self, x: f64, y: f64, offset: (f64, f64)) {
        self.mode = InteractionMode::Panning;
        self.drag_anchor_x = x.trunc() + offset.0;
        self.drag_anchor_y = y.trunc() + offset.1;
    }

    pub fn on_pan_end(&mut self) {
        self.mode = InteractionMode::Idle;
    }

    pub fn on_pointer_move(&mut self, x: f64, y: f64) {
        self.cursor_x = x;
        self.cursor_y = y;
    }

    /// Offset delta that keeps the dragged world point under the pointer.
    ///
    /// Offsets stay whole pixels.
    #[must_use]
    pub fn drag_delta(self, x: f64, y: f64, offset: (f64, f64)) -> (f64, f64) {
        let target_x = (self.drag_anchor_x - x).trunc();
        let target_y = (self.drag_anchor_y - y).trunc();
        (target_x - offset.0, target_y - offset.1)
    }

    pub fn set_hover(&mut self, hit: Option<Hit>) {
        self.hover = hit;
    }

    pub fn clear_hover(&mut self) -> Option<Hit> {
        self.hover.take()
    }
}

#[cfg(test)]
mod tests {
    use super::{InteractionMode, InteractionState};
    use crate::core::{Hit, PixelPoint};

    #[test]
    fn drag_keeps_anchor_under_pointer() {
        let mut state = InteractionState::default();
        state.on_pan_start(100.0, 100.0, (10.0, -5.0));
        assert_eq!(state.mode(), InteractionMode::Panning);
        assert_eq!(state.drag_anchor(), (110.0, 95.0));

        // Pointer moves 30 px right and 20 px down.
        let (dx, dy) = state.drag_delta(130.0, 120.0, (10.0, -5.0));
        assert_eq!((dx, dy), (-30.0, -20.0));

        state.on_pan_end();
        assert!(!state.is_panning());
    }

    #[test]
    fn fractional_pointer_positions_keep_whole_offsets() {
        let mut state = InteractionState::default();
        state.on_pan_start(50.7, 20.2, (0.0, 0.0));
        let (dx, dy) = state.drag_delta(40.1, 20.9, (0.0, 0.0));
        assert_eq!((dx, dy), (9.0, 0.0));
    }

    #[test]
    fn hover_is_cleared_once() {
        let mut state = InteractionState::default();
        state.set_hover(Some(Hit {
            series_index: 0,
            point_index: 3,
            point: PixelPoint::new(1.0, 2.0),
        }));
        assert!(state.clear_hover().is_some());
        assert!(state.clear_hover().is_none());
    }
}
