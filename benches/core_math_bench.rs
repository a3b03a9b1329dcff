use criterion::{Criterion, criterion_group, criterion_main};
use graph_rs::api::{GraphConfig, PlotSession};
use graph_rs::core::{
    BranchPolicy, CanvasSize, CoordinateFrame, ExpressionCompiler, FormulaCompiler, GridRange,
    IncrementalExtender, Sampler, Viewport,
};
use graph_rs::render::NullRenderer;
use std::hint::black_box;

fn bench_coordinate_round_trip(c: &mut Criterion) {
    let frame = CoordinateFrame::new(GridRange::default(), 0, CanvasSize::new(1920, 1080))
        .expect("valid frame");

    c.bench_function("coordinate_round_trip", |b| {
        b.iter(|| {
            let px = frame.logical_to_pixel_x(black_box(4.321));
            let _ = frame.pixel_to_logical_x(px);
        })
    });
}

fn bench_sample_full_width_1920(c: &mut Criterion) {
    let frame = CoordinateFrame::new(GridRange::default(), 0, CanvasSize::new(1920, 1080))
        .expect("valid frame");
    let evaluator = ExpressionCompiler
        .compile("sin(x)*x/2 + 0.3*cos(3x)")
        .expect("formula compiles");
    let sampler = Sampler::new(BranchPolicy::Resume);

    c.bench_function("sample_full_width_1920", |b| {
        b.iter(|| {
            let outcome = sampler.sample(black_box(evaluator.as_ref()), black_box(&frame));
            black_box(outcome.polyline.len());
        })
    });
}

fn bench_extend_after_pan_200px(c: &mut Criterion) {
    let frame = CoordinateFrame::new(GridRange::default(), 0, CanvasSize::new(1920, 1080))
        .expect("valid frame");
    let evaluator = ExpressionCompiler
        .compile("x/2")
        .expect("formula compiles");
    let base = Sampler::default().sample(evaluator.as_ref(), &frame).polyline;
    let mut viewport = Viewport::default();
    viewport.apply_pan(200.0, 0.0);

    c.bench_function("extend_after_pan_200px", |b| {
        b.iter(|| {
            let mut polyline = base.clone();
            let added = IncrementalExtender.extend_polyline(
                &mut polyline,
                black_box(evaluator.as_ref()),
                &frame,
                &viewport,
            );
            black_box(added);
        })
    });
}

fn bench_session_hover_8_curves(c: &mut Criterion) {
    let config = GraphConfig::default().with_redraw_interval_ms(0);
    let mut session = PlotSession::new(NullRenderer::default(), config, CanvasSize::new(1600, 900))
        .expect("session init");
    session
        .draw_graphs(&["x", "-x", "x^2", "sin(x)", "cos(x)", "x/3", "3", "-2"])
        .expect("draw graphs");
    let mut now = std::time::Duration::ZERO;

    c.bench_function("session_hover_8_curves", |b| {
        b.iter(|| {
            now += std::time::Duration::from_millis(1);
            let _ = session
                .pointer_move(black_box(1_500.0), black_box(20.0), now)
                .expect("pointer move");
        })
    });
}

criterion_group!(
    benches,
    bench_coordinate_round_trip,
    bench_sample_full_width_1920,
    bench_extend_after_pan_200px,
    bench_session_hover_8_curves
);
criterion_main!(benches);
