use std::io;
use std::sync::{Arc, Mutex};

use graph_rs::api::{CollectingErrorSink, GraphConfig, PlotSession};
use graph_rs::core::{CanvasSize, ZoomOutcome};
use graph_rs::render::NullRenderer;

fn build_session(width: u32, height: u32) -> PlotSession<NullRenderer> {
    PlotSession::new(
        NullRenderer::default(),
        GraphConfig::default(),
        CanvasSize::new(width, height),
    )
    .expect("session init")
}

/// Shared buffer a `fmt` subscriber writes into.
#[derive(Debug, Clone, Default)]
struct CapturedLog(Arc<Mutex<Vec<u8>>>);

impl CapturedLog {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().expect("log buffer")).into_owned()
    }
}

impl io::Write for CapturedLog {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().expect("log buffer").extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn with_captured_warnings(run: impl FnOnce()) -> String {
    let log = CapturedLog::default();
    let writer = log.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    tracing::subscriber::with_default(subscriber, run);
    log.contents()
}

#[test]
fn zoom_out_failure_reaches_the_error_sink() {
    let errors = CollectingErrorSink::default();
    let mut session = build_session(400, 400).with_error_sink(errors.clone());

    // ln(x + 11) is defined on the default range, but not at x = -11.5.
    session.draw_graphs(&["ln(x+11)"]).expect("draw graphs");
    assert!(errors.is_empty());
    assert!(!session.series()[0].polyline().is_empty());

    let outcome = session.wheel(-1).expect("zoom out");
    assert_eq!(outcome, ZoomOutcome::Applied);

    let reported = errors.errors();
    assert_eq!(reported.len(), 1);
    assert_eq!(reported[0].formula, "ln(x+11)");
    assert!(reported[0].message.contains("x = -11.5"), "{}", reported[0].message);
    assert_eq!(session.series()[0].error(), Some(&reported[0]));
}

#[test]
fn failure_that_clears_and_returns_is_reported_again() {
    let errors = CollectingErrorSink::default();
    let mut session = build_session(400, 400).with_error_sink(errors.clone());
    session.draw_graphs(&["ln(x+11)"]).expect("draw graphs");

    session.wheel(-1).expect("zoom out");
    session.wheel(1).expect("zoom back in");
    assert!(session.series()[0].error().is_none());
    assert_eq!(errors.len(), 1);

    session.wheel(-1).expect("zoom out again");
    assert_eq!(errors.len(), 2);
}

#[test]
fn resize_failure_reaches_the_error_sink() {
    let errors = CollectingErrorSink::default();
    let mut session = build_session(400, 400).with_error_sink(errors.clone());

    // Samples land on x = 1 only once the gap becomes 20 px.
    session.draw_graphs(&["ln(abs(x-1))"]).expect("draw graphs");
    assert!(errors.is_empty());

    assert!(session.resize(CanvasSize::new(420, 420)).expect("resize"));

    let reported = errors.errors();
    assert_eq!(reported.len(), 1);
    assert_eq!(reported[0].formula, "ln(abs(x-1))");
    assert!(session.series()[0].error().is_some());
}

#[test]
fn zoom_out_failure_without_a_sink_is_logged() {
    let mut session = build_session(400, 400);

    let log = with_captured_warnings(|| {
        session.draw_graphs(&["ln(x+11)"]).expect("draw graphs");
        session.wheel(-1).expect("zoom out");
    });

    assert_eq!(log.matches("formula failed").count(), 1, "{log}");
    assert!(log.contains("ln(x+11)"), "{log}");
    assert!(session.series()[0].error().is_some());
}

#[test]
fn resize_failure_without_a_sink_is_logged() {
    let mut session = build_session(400, 400);

    let log = with_captured_warnings(|| {
        session.draw_graphs(&["ln(abs(x-1))"]).expect("draw graphs");
        session.resize(CanvasSize::new(420, 420)).expect("resize");
    });

    assert_eq!(log.matches("formula failed").count(), 1, "{log}");
    assert!(log.contains("ln(abs(x-1))"), "{log}");
}
