use std::fmt;

use crate::error::FormulaError;

/// Compiled single-variable expression.
///
/// Implementations must be synchronous and free of side effects: the sampler
/// and extender call `eval` many times per redraw.
pub trait Evaluator: fmt::Debug {
    /// Source text the evaluator was compiled from.
    fn formula(&self) -> &str;

    /// Evaluates at logical `x`. Non-finite results are returned as-is; the
    /// caller decides how to treat them.
    fn eval(&self, x: f64) -> Result<f64, FormulaError>;
}

/// Expression compiler capability consumed by the plotting session.
pub trait FormulaCompiler {
    fn compile(&self, formula: &str) -> Result<Box<dyn Evaluator>, FormulaError>;
}

/// Adapts a Rust closure into an `Evaluator`, for hosts that already hold
/// native functions.
pub struct FnEvaluator<F> {
    formula: String,
    function: F,
}

impl<F> FnEvaluator<F>
where
    F: Fn(f64) -> f64,
{
    pub fn new(formula: impl Into<String>, function: F) -> Self {
        Self {
            formula: formula.into(),
            function,
        }
    }
}

impl<F> fmt::Debug for FnEvaluator<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnEvaluator")
            .field("formula", &self.formula)
            .finish_non_exhaustive()
    }
}

impl<F> Evaluator for FnEvaluator<F>
where
    F: Fn(f64) -> f64,
{
    fn formula(&self) -> &str {
        &self.formula
    }

    fn eval(&self, x: f64) -> Result<f64, FormulaError> {
        Ok((self.function)(x))
    }
}
