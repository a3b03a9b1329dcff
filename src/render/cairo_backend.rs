use std::f64::consts::{FRAC_PI_2, TAU};

use cairo::{Context, Format, ImageSurface};
use pango::FontDescription;

use crate::error::{GraphError, GraphResult};
use crate::render::{
    CirclePrimitive, Color, LayerPrimitives, PathPrimitive, RectPrimitive, RenderFrame, Renderer,
    TextHAlign, TextPrimitive,
};

const SHADOW_COLOR: Color = Color::rgba(0.0, 0.0, 0.0, 0.25);
const SHADOW_OFFSET_PX: f64 = 1.0;

/// Primitive counts of the last frame drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CairoRenderStats {
    pub lines_drawn: usize,
    pub paths_drawn: usize,
    pub rects_drawn: usize,
    pub circles_drawn: usize,
    pub texts_drawn: usize,
}

/// Renderers that can paint a plot into a Cairo context owned by the host,
/// such as the one handed to a GTK `DrawingArea` draw function.
pub trait CairoContextRenderer {
    fn render_on_cairo_context(&mut self, context: &Context, frame: &RenderFrame)
    -> GraphResult<()>;
}

/// Cairo renderer with Pango text.
///
/// `Renderer::render` paints into an owned offscreen surface that can be
/// exported with [`CairoRenderer::write_png`].
#[derive(Debug)]
pub struct CairoRenderer {
    surface: ImageSurface,
    background: Color,
    last_stats: CairoRenderStats,
}

impl CairoRenderer {
    pub fn new(width: i32, height: i32) -> GraphResult<Self> {
        if width <= 0 || height <= 0 {
            return Err(GraphError::InvalidData(format!(
                "cairo surface needs a positive size, got {width}x{height}"
            )));
        }

        let surface = ImageSurface::create(Format::ARgb32, width, height)
            .map_err(|err| backend_error("create surface", err))?;
        Ok(Self {
            surface,
            background: Color::rgb(1.0, 1.0, 1.0),
            last_stats: CairoRenderStats::default(),
        })
    }

    #[must_use]
    pub fn surface(&self) -> &ImageSurface {
        &self.surface
    }

    #[must_use]
    pub fn clear_color(&self) -> Color {
        self.background
    }

    pub fn set_clear_color(&mut self, color: Color) -> GraphResult<()> {
        color.validate()?;
        self.background = color;
        Ok(())
    }

    #[must_use]
    pub fn last_stats(&self) -> CairoRenderStats {
        self.last_stats
    }

    pub fn write_png(&self, writer: &mut impl std::io::Write) -> GraphResult<()> {
        self.surface
            .write_to_png(writer)
            .map_err(|err| GraphError::InvalidData(format!("png export failed: {err}")))
    }

    fn paint_frame(&mut self, context: &Context, frame: &RenderFrame) -> GraphResult<()> {
        frame.validate()?;

        set_source(context, self.background);
        context
            .paint()
            .map_err(|err| backend_error("clear background", err))?;

        let mut painter = Painter {
            context,
            font_family: &frame.font_family,
            stats: CairoRenderStats::default(),
        };
        for layer in &frame.layers {
            painter.paint_layer(layer)?;
        }

        self.last_stats = painter.stats;
        Ok(())
    }
}

impl Renderer for CairoRenderer {
    fn render(&mut self, frame: &RenderFrame) -> GraphResult<()> {
        let context =
            Context::new(&self.surface).map_err(|err| backend_error("create context", err))?;
        self.paint_frame(&context, frame)
    }
}

impl CairoContextRenderer for CairoRenderer {
    fn render_on_cairo_context(
        &mut self,
        context: &Context,
        frame: &RenderFrame,
    ) -> GraphResult<()> {
        self.paint_frame(context, frame)
    }
}

/// Draws one frame's layers in order and counts what it drew.
struct Painter<'a> {
    context: &'a Context,
    font_family: &'a str,
    stats: CairoRenderStats,
}

impl Painter<'_> {
    fn paint_layer(&mut self, layer: &LayerPrimitives) -> GraphResult<()> {
        for line in &layer.lines {
            self.context.move_to(line.x1, line.y1);
            self.context.line_to(line.x2, line.y2);
            self.stroke(line.color, line.stroke_width, "line")?;
            self.stats.lines_drawn += 1;
        }
        for path in &layer.paths {
            self.paint_path(path)?;
        }
        for rect in &layer.rects {
            self.paint_rect(rect)?;
        }
        for circle in &layer.circles {
            self.paint_circle(circle)?;
        }
        for text in &layer.texts {
            self.paint_text(text);
        }
        Ok(())
    }

    /// Each sub-path starts with a move so breaks stay open.
    fn paint_path(&mut self, path: &PathPrimitive) -> GraphResult<()> {
        self.context.new_path();
        for sub_path in &path.sub_paths {
            for (index, &(x, y)) in sub_path.iter().enumerate() {
                if index == 0 {
                    self.context.move_to(x, y);
                } else {
                    self.context.line_to(x, y);
                }
            }
        }
        self.stroke(path.color, path.stroke_width, "curve")?;
        self.stats.paths_drawn += 1;
        Ok(())
    }

    fn paint_rect(&mut self, rect: &RectPrimitive) -> GraphResult<()> {
        if rect.shadow_blur > 0.0 {
            trace_rect(
                self.context,
                rect.x + SHADOW_OFFSET_PX,
                rect.y + SHADOW_OFFSET_PX,
                rect,
            );
            self.fill(SHADOW_COLOR, "tooltip shadow")?;
        }
        trace_rect(self.context, rect.x, rect.y, rect);
        self.fill(rect.fill_color, "tooltip box")?;
        self.stats.rects_drawn += 1;
        Ok(())
    }

    fn paint_circle(&mut self, circle: &CirclePrimitive) -> GraphResult<()> {
        self.context.new_sub_path();
        self.context.arc(circle.x, circle.y, circle.radius, 0.0, TAU);
        self.fill(circle.fill_color, "marker")?;
        self.stats.circles_drawn += 1;
        Ok(())
    }

    /// `text.y` is the baseline; Pango positions layouts by their top edge.
    fn paint_text(&mut self, text: &TextPrimitive) {
        let layout = pangocairo::functions::create_layout(self.context);
        let font = FontDescription::from_string(&format!(
            "{} {}px",
            self.font_family, text.font_size_px
        ));
        layout.set_font_description(Some(&font));
        if let Some(max_width) = text.max_width {
            layout.set_width((max_width * f64::from(pango::SCALE)) as i32);
            layout.set_ellipsize(pango::EllipsizeMode::End);
        }
        layout.set_text(&text.text);

        let width = f64::from(layout.pixel_size().0);
        let left = match text.h_align {
            TextHAlign::Left => text.x,
            TextHAlign::Center => text.x - width / 2.0,
            TextHAlign::Right => text.x - width,
        };
        let ascent = f64::from(layout.baseline()) / f64::from(pango::SCALE);

        set_source(self.context, text.color);
        self.context.move_to(left, text.y - ascent);
        pangocairo::functions::show_layout(self.context, &layout);
        self.stats.texts_drawn += 1;
    }

    fn stroke(&self, color: Color, width: f64, what: &str) -> GraphResult<()> {
        set_source(self.context, color);
        self.context.set_line_width(width);
        self.context
            .stroke()
            .map_err(|err| backend_error(&format!("stroke {what}"), err))
    }

    fn fill(&self, color: Color, what: &str) -> GraphResult<()> {
        set_source(self.context, color);
        self.context
            .fill()
            .map_err(|err| backend_error(&format!("fill {what}"), err))
    }
}

fn set_source(context: &Context, color: Color) {
    context.set_source_rgba(color.red, color.green, color.blue, color.alpha);
}

/// Adds a rectangle of `rect`'s size at `(x, y)` to the current path,
/// with corners rounded clockwise from the top-right when requested.
fn trace_rect(context: &Context, x: f64, y: f64, rect: &RectPrimitive) {
    let radius = rect
        .corner_radius
        .min(rect.width / 2.0)
        .min(rect.height / 2.0);
    if radius <= 0.0 {
        context.rectangle(x, y, rect.width, rect.height);
        return;
    }

    let (right, bottom) = (x + rect.width, y + rect.height);
    let corners = [
        (right - radius, y + radius),
        (right - radius, bottom - radius),
        (x + radius, bottom - radius),
        (x + radius, y + radius),
    ];
    context.new_sub_path();
    let mut start = -FRAC_PI_2;
    for (cx, cy) in corners {
        context.arc(cx, cy, radius, start, start + FRAC_PI_2);
        start += FRAC_PI_2;
    }
    context.close_path();
}

fn backend_error(action: &str, err: cairo::Error) -> GraphError {
    GraphError::InvalidData(format!("cairo failed to {action}: {err}"))
}
