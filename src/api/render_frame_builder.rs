use crate::core::GridGeometry;
use crate::render::{
    CanvasLayerKind, CirclePrimitive, Color, LinePrimitive, PathPrimitive, RectPrimitive,
    RenderFrame, Renderer, TextHAlign, TextPrimitive,
};

use super::PlotSession;

const GRID_STROKE_WIDTH: f64 = 2.0;
const CURVE_STROKE_WIDTH: f64 = 2.0;
const TICK_HALF_LENGTH_PX: f64 = 5.0;
const TICK_LABEL_FONT_PX: f64 = 14.0;
/// Labels flip to the other side of an axis this close to the canvas edge.
const LABEL_FLIP_MARGIN_PX: f64 = 20.0;

const MARKER_RADIUS_PX: f64 = 3.0;
const TOOLTIP_BOX_WIDTH_PX: f64 = 150.0;
const TOOLTIP_LINE_HEIGHT_PX: f64 = 35.0;
const TOOLTIP_FONT_PX: f64 = 30.0;
const TOOLTIP_CORNER_RADIUS_PX: f64 = 5.0;
const TOOLTIP_SHADOW_BLUR_PX: f64 = 2.0;
const TOOLTIP_RIGHT_EDGE_ROOM_PX: f64 = 160.0;
const TOOLTIP_TOP_EDGE_ROOM_PX: f64 = 90.0;

impl<R: Renderer> PlotSession<R> {
    pub(super) fn build_render_frame(&self) -> RenderFrame {
        let mut frame =
            RenderFrame::new(self.canvas).with_font_family(self.config.font_family.clone());
        let geometry = self.frame.grid_geometry(&self.viewport);

        if self.config.reference_lines {
            self.append_reference_lines(&mut frame, &geometry);
        }
        self.append_axes(&mut frame, &geometry);
        self.append_curves(&mut frame);
        if self.config.tooltip.enable {
            self.append_tooltip(&mut frame);
        }

        frame
    }

    fn append_reference_lines(&self, frame: &mut RenderFrame, geometry: &GridGeometry) {
        let width = self.canvas.width_px();
        let height = self.canvas.height_px();
        let color = self.config.grid_colors.reference_lines;

        for line in &geometry.vertical_lines {
            frame.push_line(
                CanvasLayerKind::Grid,
                LinePrimitive::new(
                    line.position_px,
                    0.0,
                    line.position_px,
                    height,
                    GRID_STROKE_WIDTH,
                    color,
                ),
            );
        }
        for line in &geometry.horizontal_lines {
            frame.push_line(
                CanvasLayerKind::Grid,
                LinePrimitive::new(
                    0.0,
                    line.position_px,
                    width,
                    line.position_px,
                    GRID_STROKE_WIDTH,
                    color,
                ),
            );
        }
    }

    /// Axis lines, tick marks and tick labels.
    fn append_axes(&self, frame: &mut RenderFrame, geometry: &GridGeometry) {
        let width = self.canvas.width_px();
        let height = self.canvas.height_px();
        let axes = self.config.grid_colors.axes;
        let text_color = self.config.grid_colors.text;

        if let Some(y) = geometry.x_axis_px {
            frame.push_line(
                CanvasLayerKind::Axis,
                LinePrimitive::new(0.0, y, width, y, GRID_STROKE_WIDTH, axes),
            );
        }
        if let Some(x) = geometry.y_axis_px {
            frame.push_line(
                CanvasLayerKind::Axis,
                LinePrimitive::new(x, 0.0, x, height, GRID_STROKE_WIDTH, axes),
            );
        }

        let anchor_y = geometry.x_label_anchor_px;
        let x_label_offset = if anchor_y > LABEL_FLIP_MARGIN_PX {
            -10.0
        } else {
            20.0
        };
        for line in &geometry.vertical_lines {
            let x = line.position_px;
            frame.push_line(
                CanvasLayerKind::Axis,
                LinePrimitive::new(
                    x,
                    anchor_y - TICK_HALF_LENGTH_PX,
                    x,
                    anchor_y + TICK_HALF_LENGTH_PX,
                    GRID_STROKE_WIDTH,
                    axes,
                ),
            );
            if self.config.text {
                frame.push_text(
                    CanvasLayerKind::Axis,
                    TextPrimitive::new(
                        format_tick(line.value),
                        x,
                        anchor_y + x_label_offset,
                        TICK_LABEL_FONT_PX,
                        text_color,
                        TextHAlign::Center,
                    ),
                );
            }
        }

        let anchor_x = geometry.y_label_anchor_px;
        let (y_label_offset, y_label_align) = if anchor_x > width - LABEL_FLIP_MARGIN_PX {
            (-10.0, TextHAlign::Right)
        } else {
            (10.0, TextHAlign::Left)
        };
        for line in &geometry.horizontal_lines {
            let y = line.position_px;
            frame.push_line(
                CanvasLayerKind::Axis,
                LinePrimitive::new(
                    anchor_x - TICK_HALF_LENGTH_PX,
                    y,
                    anchor_x + TICK_HALF_LENGTH_PX,
                    y,
                    GRID_STROKE_WIDTH,
                    axes,
                ),
            );
            if self.config.text {
                frame.push_text(
                    CanvasLayerKind::Axis,
                    TextPrimitive::new(
                        format_tick(line.value),
                        anchor_x + y_label_offset,
                        y + 5.0,
                        TICK_LABEL_FONT_PX,
                        text_color,
                        y_label_align,
                    ),
                );
            }
        }
    }

    fn append_curves(&self, frame: &mut RenderFrame) {
        let (offset_x, offset_y) = self.viewport.offset();
        for series in &self.series {
            if series.polyline().is_empty() {
                continue;
            }
            let sub_paths = series
                .polyline()
                .segments()
                .iter()
                .map(|segment| {
                    segment
                        .iter()
                        .map(|point| (point.x - offset_x, point.y - offset_y))
                        .collect()
                })
                .collect();
            frame.push_path(
                CanvasLayerKind::Series,
                PathPrimitive::new(sub_paths, CURVE_STROKE_WIDTH, series.color()),
            );
        }
    }

    /// Marker disc plus a box in the series colour holding one text row per
    /// template line. The box flips left near the right edge and below the
    /// point near the top edge.
    fn append_tooltip(&self, frame: &mut RenderFrame) {
        let Some(tooltip) = self.tooltip() else {
            return;
        };
        let Some(series) = self.series.get(tooltip.series_index) else {
            return;
        };
        let color: Color = series.color();
        let (point_x, point_y) = (tooltip.screen_x, tooltip.screen_y);

        frame.push_circle(
            CanvasLayerKind::Tooltip,
            CirclePrimitive::new(point_x, point_y, MARKER_RADIUS_PX, color),
        );

        let box_x = if self.canvas.width_px() - point_x < TOOLTIP_RIGHT_EDGE_ROOM_PX {
            point_x - TOOLTIP_RIGHT_EDGE_ROOM_PX
        } else {
            point_x + 5.0
        };
        let box_y = if point_y < TOOLTIP_TOP_EDGE_ROOM_PX {
            point_y + 5.0
        } else {
            point_y - 85.0
        };
        let box_height = TOOLTIP_LINE_HEIGHT_PX * self.tooltip_template.line_count() as f64 + 5.0;

        let mut rect = RectPrimitive::new(box_x, box_y, TOOLTIP_BOX_WIDTH_PX, box_height, color)
            .with_shadow_blur(TOOLTIP_SHADOW_BLUR_PX);
        if self.config.tooltip.round_edges {
            rect = rect.with_corner_radius(TOOLTIP_CORNER_RADIUS_PX);
        }
        frame.push_rect(CanvasLayerKind::Tooltip, rect);

        for (index, line) in tooltip.lines.iter().enumerate() {
            if line.is_empty() {
                continue;
            }
            frame.push_text(
                CanvasLayerKind::Tooltip,
                TextPrimitive::new(
                    line.clone(),
                    box_x + 5.0,
                    box_y + 25.0 + TOOLTIP_LINE_HEIGHT_PX * index as f64,
                    TOOLTIP_FONT_PX,
                    self.config.tooltip.font_color,
                    TextHAlign::Left,
                )
                .with_max_width(self.config.tooltip.width),
            );
        }
    }
}

/// Tick values are multiples of a whole increment, so integers print
/// without a fractional part.
fn format_tick(value: f64) -> String {
    format!("{value}")
}
