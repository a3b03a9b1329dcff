use std::cell::RefCell;
use std::rc::Rc;

use tracing::warn;

use crate::error::FormulaError;

/// Receives formula failures, one report per failed submission.
pub trait ErrorSink {
    fn report(&mut self, error: &FormulaError);
}

/// Sink that keeps every report.
///
/// Clones share one buffer, so a host can keep a handle while the session
/// owns another.
#[derive(Debug, Clone, Default)]
pub struct CollectingErrorSink {
    errors: Rc<RefCell<Vec<FormulaError>>>,
}

impl CollectingErrorSink {
    #[must_use]
    pub fn errors(&self) -> Vec<FormulaError> {
        self.errors.borrow().clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.borrow().is_empty()
    }

    pub fn drain(&self) -> Vec<FormulaError> {
        std::mem::take(&mut *self.errors.borrow_mut())
    }
}

impl ErrorSink for CollectingErrorSink {
    fn report(&mut self, error: &FormulaError) {
        self.errors.borrow_mut().push(error.clone());
    }
}

impl<F> ErrorSink for F
where
    F: FnMut(&FormulaError),
{
    fn report(&mut self, error: &FormulaError) {
        self(error);
    }
}

/// Routes a failure to the installed sink, or to the log when none is set.
pub(crate) fn dispatch(sink: &mut Option<Box<dyn ErrorSink>>, error: &FormulaError) {
    match sink {
        Some(sink) => sink.report(error),
        None => warn!(formula = %error.formula, message = %error.message, "formula failed"),
    }
}
