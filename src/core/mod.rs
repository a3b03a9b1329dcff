pub mod coordinate;
pub mod expression;
pub mod extender;
pub mod formula;
pub mod grid_range;
pub mod polyline;
pub mod sampler;
pub mod series;
pub mod tooltip;
pub mod types;
pub mod viewport;

pub use coordinate::{CoordinateFrame, GridGeometry, GridLine, MAX_REFERENCE_LINES};
pub use expression::ExpressionCompiler;
pub use extender::IncrementalExtender;
pub use formula::{Evaluator, FnEvaluator, FormulaCompiler};
pub use grid_range::{GridRange, MIN_RANGE_WIDTH};
pub use hit_test::{DEFAULT_HIT_HALF_BOX_PX, Hit, HitTester};
pub use polyline::Polyline;
pub use sampler::{BranchPolicy, SAMPLE_STEP_PX, SampleOutcome, Sampler};
pub use series::CurveSeries;
pub use tooltip::{TemplateToken, TooltipFields, TooltipTemplate};
pub use types::{CanvasSize, PixelPoint};
pub use viewport::{Viewport, ZoomOutcome};
