use crate::core::{Evaluator, Polyline};
use crate::error::FormulaError;
use crate::render::Color;

/// One plotted formula with its cached geometry.
///
/// A series whose formula failed to compile has no evaluator and an empty
/// polyline; one that failed mid-sampling keeps the partial polyline. Either
/// way the series stays in the session so indices match the submitted batch.
#[derive(Debug)]
pub struct CurveSeries {
    formula: String,
    color: Color,
    polyline: Polyline,
    evaluator: Option<Box<dyn Evaluator>>,
    error: Option<FormulaError>,
}

impl CurveSeries {
    #[must_use]
    pub fn new(formula: impl Into<String>, color: Color, evaluator: Box<dyn Evaluator>) -> Self {
        Self {
            formula: formula.into(),
            color,
            polyline: Polyline::new(),
            evaluator: Some(evaluator),
            error: None,
        }
    }

    /// Series for a formula the compiler rejected.
    #[must_use]
    pub fn failed(formula: impl Into<String>, color: Color, error: FormulaError) -> Self {
        Self {
            formula: formula.into(),
            color,
            polyline: Polyline::new(),
            evaluator: None,
            error: Some(error),
        }
    }

    #[must_use]
    pub fn formula(&self) -> &str {
        &self.formula
    }

    #[must_use]
    pub fn color(&self) -> Color {
        self.color
    }

    #[must_use]
    pub fn polyline(&self) -> &Polyline {
        &self.polyline
    }

    #[must_use]
    pub fn evaluator(&self) -> Option<&dyn Evaluator> {
        self.evaluator.as_deref()
    }

    /// Last compile or sampling failure, if any.
    #[must_use]
    pub fn error(&self) -> Option<&FormulaError> {
        self.error.as_ref()
    }

    #[must_use]
    pub fn is_plottable(&self) -> bool {
        self.evaluator.is_some()
    }

    /// Replaces the cached geometry after a full resample.
    pub fn replace_polyline(&mut self, polyline: Polyline, error: Option<FormulaError>) {
        self.polyline = polyline;
        self.error = error;
    }

    /// Split borrow used by the incremental extender.
    pub(crate) fn geometry_mut(&mut self) -> (&mut Polyline, Option<&dyn Evaluator>) {
        (&mut self.polyline, self.evaluator.as_deref())
    }
}
