use graph_rs::api::{GraphConfig, PlotSession};
use graph_rs::core::{CanvasSize, CoordinateFrame, GridRange, MIN_RANGE_WIDTH, Viewport};
use graph_rs::render::NullRenderer;
use proptest::prelude::*;

proptest! {
    #[test]
    fn unit_gaps_cover_the_canvas_exactly(
        width in 50u32..2_000,
        height in 50u32..2_000,
        x_min in -50.0f64..-1.0,
        x_span in 2.0f64..100.0,
        y_min in -50.0f64..-1.0,
        y_span in 2.0f64..100.0,
        pixel in -500.0f64..2_500.0
    ) {
        let range = GridRange::new(x_min, x_min + x_span, y_min, y_min + y_span)
            .expect("valid range");
        let frame = CoordinateFrame::new(range, 0, CanvasSize::new(width, height))
            .expect("frame");

        prop_assert!((frame.units_gap_x() * range.unit_count_x() - f64::from(width)).abs() <= 1e-6);
        prop_assert!((frame.units_gap_y() * range.unit_count_y() - f64::from(height)).abs() <= 1e-6);

        let round_trip_x = frame.logical_to_pixel_x(frame.pixel_to_logical_x(pixel));
        let round_trip_y = frame.logical_to_pixel_y(frame.pixel_to_logical_y(pixel));
        prop_assert!((round_trip_x - pixel).abs() <= 1e-6);
        prop_assert!((round_trip_y - pixel).abs() <= 1e-6);

        // Half a unit of padding on each side.
        prop_assert!((frame.logical_to_pixel_x(range.x_min) - frame.units_gap_x() / 2.0).abs() <= 1e-6);
        prop_assert!((frame.logical_to_pixel_y(range.y_max) - frame.units_gap_y() / 2.0).abs() <= 1e-6);
    }

    #[test]
    fn zoom_never_breaks_the_minimum_width(
        deltas in proptest::collection::vec(-3i32..=3, 0..60)
    ) {
        let base = GridRange::default();
        let mut viewport = Viewport::default();
        for delta in deltas {
            viewport.apply_zoom_delta(delta, base);
            let effective = base.zoomed(viewport.zoom_level());
            prop_assert!(effective.width() >= MIN_RANGE_WIDTH);
            prop_assert!(effective.height() >= MIN_RANGE_WIDTH);
            prop_assert!(viewport.zoom_level() <= 9);
        }
    }

    #[test]
    fn curves_stay_ordered_along_x_through_any_pan_sequence(
        pans in proptest::collection::vec((-150.0f64..150.0, -150.0f64..150.0), 1..8)
    ) {
        let mut session = PlotSession::new(
            NullRenderer::default(),
            GraphConfig::default(),
            CanvasSize::new(400, 400),
        )
        .expect("session init");
        session.draw_graphs(&["x^2", "sin(x)", "x/3"]).expect("draw graphs");

        for (dx, dy) in pans {
            let before: Vec<usize> = session.series().iter().map(|s| s.polyline().len()).collect();
            let added = session.pan_by(dx.trunc(), dy.trunc()).expect("pan");
            let after: usize = session.series().iter().map(|s| s.polyline().len()).sum();

            prop_assert_eq!(after, before.iter().sum::<usize>() + added);
            for series in session.series() {
                prop_assert!(series.polyline().is_strictly_ascending());
            }
        }
    }

    #[test]
    fn grid_geometry_is_deterministic_and_on_screen(
        offset_x in -2_000.0f64..2_000.0,
        offset_y in -2_000.0f64..2_000.0,
        zoom_level in -20i32..=9
    ) {
        let canvas = CanvasSize::new(640, 480);
        let frame = CoordinateFrame::new(GridRange::default(), zoom_level, canvas)
            .expect("frame");
        let mut viewport = Viewport::default();
        viewport.set_offset(offset_x, offset_y);

        let first = frame.grid_geometry(&viewport);
        let second = frame.grid_geometry(&viewport);
        prop_assert_eq!(&first, &second);

        for line in &first.vertical_lines {
            prop_assert!(line.value != 0.0);
            prop_assert!(line.position_px >= -1e-6 && line.position_px <= 640.0 + 1e-6);
            prop_assert!((line.value / frame.increment_x()).fract().abs() <= 1e-9);
        }
        for line in &first.horizontal_lines {
            prop_assert!(line.value != 0.0);
            prop_assert!(line.position_px >= -1e-6 && line.position_px <= 480.0 + 1e-6);
        }
        prop_assert!(first.x_label_anchor_px >= 0.0 && first.x_label_anchor_px <= 480.0);
        prop_assert!(first.y_label_anchor_px >= 0.0 && first.y_label_anchor_px <= 640.0);
    }
}
