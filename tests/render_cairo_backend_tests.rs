#![cfg(feature = "cairo-backend")]

use std::time::Duration;

use cairo::{Context, Format, ImageSurface};
use graph_rs::GraphError;
use graph_rs::api::{GraphConfig, PlotSession};
use graph_rs::core::CanvasSize;
use graph_rs::render::CairoRenderer;

#[test]
fn cairo_renderer_rejects_invalid_surface_size() {
    let err = CairoRenderer::new(0, 480).expect_err("invalid width must fail");
    assert!(matches!(err, GraphError::InvalidData(_)));
}

#[test]
fn cairo_renderer_draws_grid_curves_and_tooltip() {
    let renderer = CairoRenderer::new(400, 400).expect("renderer");
    let mut session = PlotSession::new(renderer, GraphConfig::default(), CanvasSize::new(400, 400))
        .expect("session init");
    session.draw_graphs(&["x", "x^2"]).expect("draw graphs");
    session
        .pointer_move(205.0, 195.0, Duration::ZERO)
        .expect("hover");

    let renderer = session.into_renderer();
    let stats = renderer.last_stats();

    assert_eq!(stats.lines_drawn, 82);
    assert_eq!(stats.paths_drawn, 2);
    assert_eq!(stats.circles_drawn, 1);
    assert_eq!(stats.rects_drawn, 1);
    assert_eq!(stats.texts_drawn, 42);

    let mut png = Vec::new();
    renderer.write_png(&mut png).expect("png");
    assert!(png.starts_with(&[0x89, b'P', b'N', b'G']));
}

#[test]
fn cairo_renderer_can_draw_on_external_context() {
    let renderer = CairoRenderer::new(600, 320).expect("renderer");
    let mut session = PlotSession::new(renderer, GraphConfig::default(), CanvasSize::new(600, 320))
        .expect("session init");
    session.draw_graphs(&["sin(x)"]).expect("draw graphs");

    let surface = ImageSurface::create(Format::ARgb32, 600, 320).expect("surface");
    let context = Context::new(&surface).expect("context");
    session
        .render_on_cairo_context(&context)
        .expect("render on external context");

    assert_eq!(session.renderer().last_stats().paths_drawn, 1);
}
