//! graph-rs: single-variable function plotting engine.
//!
//! The crate maps a logical grid range onto a pixel canvas, samples formula
//! evaluators into polylines with discontinuity breaks, keeps those polylines
//! current while the view pans and zooms, and hit-tests the pointer for
//! tooltips. Drawing goes through the backend-agnostic `render::Renderer`
//! trait; hosts feed pointer, wheel and resize events into a `PlotSession`.

pub mod api;
pub mod core;
pub mod error;
pub mod interaction;
pub mod render;
pub mod telemetry;

pub use api::{GraphConfig, PlotSession};
pub use error::{FormulaError, GraphError, GraphResult};
