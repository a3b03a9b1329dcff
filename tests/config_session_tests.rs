use std::time::Duration;

use graph_rs::api::{CollectingErrorSink, GraphConfig, PlotSession};
use graph_rs::core::{BranchPolicy, CanvasSize, Evaluator, FnEvaluator, FormulaCompiler};
use graph_rs::interaction::PointerOutcome;
use graph_rs::render::{Color, NullRenderer};
use graph_rs::{FormulaError, GraphError};

fn build_session(config: GraphConfig) -> PlotSession<NullRenderer> {
    PlotSession::new(NullRenderer::default(), config, CanvasSize::new(400, 400))
        .expect("session init")
}

#[test]
fn json_overrides_reach_the_session() {
    let config = GraphConfig::from_json_str(
        r##"{
            "grid_range": {"x_min": -5, "x_max": 5, "y_min": -5, "y_max": 5},
            "random_colors": false,
            "color_palette": ["#ff0000", "rgb(0, 128, 0)"],
            "tooltip": {"template": "y = <y(2)>"},
            "branch_policy": "resume"
        }"##,
    )
    .expect("config");
    assert_eq!(config.branch_policy, BranchPolicy::Resume);
    assert!(config.pan_enable);

    let mut session = build_session(config);
    session.draw_graphs(&["x", "x^2", "3"]).expect("draw graphs");

    let colors: Vec<Color> = session.series().iter().map(|s| s.color()).collect();
    assert_eq!(
        colors,
        vec![
            Color::rgb8(0xff, 0, 0),
            Color::rgb8(0, 0x80, 0),
            Color::rgb8(0xff, 0, 0)
        ]
    );
    assert_eq!(session.coordinate_frame().range().x_max, 5.0);

    // Gap is 400 / 11; the origin sits at 200.
    session
        .pointer_move(200.0, 200.0, Duration::ZERO)
        .expect("hover");
    let tooltip = session.tooltip().expect("tooltip");
    assert_eq!(tooltip.lines.len(), 1);
    assert!(tooltip.lines[0].starts_with("y = "));
}

#[test]
fn seeded_palette_is_reproducible_across_sessions() {
    let config = GraphConfig::default().with_random_colors(true, Some(7));
    let formulas = ["x", "-x", "x^2", "sin(x)"];

    let mut first = build_session(config.clone());
    first.draw_graphs(&formulas).expect("draw graphs");
    let mut second = build_session(config);
    second.draw_graphs(&formulas).expect("draw graphs");

    let first_colors: Vec<Color> = first.series().iter().map(|s| s.color()).collect();
    let second_colors: Vec<Color> = second.series().iter().map(|s| s.color()).collect();
    assert_eq!(first_colors, second_colors);
    assert!(
        first_colors
            .iter()
            .all(|color| first.config().color_palette.contains(color))
    );
}

#[test]
fn invalid_overrides_are_rejected() {
    let bad_template = GraphConfig::from_json_str(r#"{"tooltip": {"template": "<z(1)>"}}"#);
    assert!(matches!(bad_template, Err(GraphError::Configuration(_))));

    let empty_palette = GraphConfig::from_json_str(r#"{"color_palette": []}"#);
    assert!(empty_palette.is_err());

    let inverted = GraphConfig::from_json_str(r#"{"grid_range": {"x_min": 3, "x_max": 1}}"#);
    assert!(inverted.is_err());
}

#[test]
fn pan_disabled_pointer_drag_hovers_instead() {
    let config = GraphConfig::from_json_str(r#"{"pan_enable": false}"#).expect("config");
    let mut session = build_session(config);
    session.draw_graphs(&["x"]).expect("draw graphs");

    session.pointer_down(100.0, 100.0);
    let outcome = session
        .pointer_move(205.0, 195.0, Duration::ZERO)
        .expect("move");

    assert!(matches!(outcome, PointerOutcome::TooltipShown(_)));
    assert_eq!(session.viewport().offset(), (0.0, 0.0));
}

#[derive(Debug, Clone, Copy)]
struct NativeCompiler;

impl FormulaCompiler for NativeCompiler {
    fn compile(&self, formula: &str) -> Result<Box<dyn Evaluator>, FormulaError> {
        match formula {
            "double" => Ok(Box::new(FnEvaluator::new(formula, |x| 2.0 * x))),
            other => Err(FormulaError::new(other, "unknown native function")),
        }
    }
}

#[test]
fn custom_compiler_and_error_sink_are_used() {
    let errors = CollectingErrorSink::default();
    let mut session = build_session(GraphConfig::default())
        .with_compiler(NativeCompiler)
        .with_error_sink(errors.clone());

    session
        .draw_graphs(&["double", "x^2"])
        .expect("draw graphs");

    assert!(session.series()[0].is_plottable());
    assert!(!session.series()[0].polyline().is_empty());
    assert!(session.series()[1].error().is_some());
    assert_eq!(errors.drain().len(), 1);
    assert!(errors.is_empty());
}

#[test]
fn domain_error_under_default_policy_is_reported_once() {
    let errors = CollectingErrorSink::default();
    let mut session = build_session(GraphConfig::default()).with_error_sink(errors.clone());

    session.draw_graphs(&["sqrt(-x)"]).expect("draw graphs");
    assert_eq!(errors.len(), 1);
    assert!(!session.series()[0].polyline().is_empty());

    // Re-samples keep the error on the series without reporting it again.
    session.wheel(1).expect("zoom");
    assert_eq!(errors.len(), 1);
    assert!(session.series()[0].error().is_some());
}

#[test]
fn config_survives_a_json_round_trip() {
    let config = GraphConfig::default()
        .with_branch_policy(BranchPolicy::Resume)
        .with_redraw_interval_ms(16);
    let text = config.to_json_pretty().expect("serialize");
    let parsed = GraphConfig::from_json_str(&text).expect("parse");
    assert_eq!(parsed, config);
}
