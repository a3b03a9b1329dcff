use std::time::Duration;

use tracing::{debug, trace, warn};

use crate::core::{
    CanvasSize, CoordinateFrame, CurveSeries, ExpressionCompiler, FormulaCompiler, HitTester,
    IncrementalExtender, Sampler, TooltipFields, TooltipTemplate, Viewport, ZoomOutcome,
};
use crate::error::{FormulaError, GraphError, GraphResult};
use crate::interaction::{InteractionState, PointerOutcome, RedrawThrottle};
use crate::render::{Color, Renderer};

use super::error_sink::dispatch;
use super::{ErrorSink, GraphConfig, PalettePicker};

#[cfg(feature = "cairo-backend")]
use crate::render::CairoContextRenderer;

/// Tooltip currently on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct TooltipState {
    pub series_index: usize,
    /// On-screen position of the hovered point.
    pub screen_x: f64,
    pub screen_y: f64,
    pub logical_x: f64,
    pub logical_y: f64,
    pub lines: Vec<String>,
}

/// One plotting surface: configuration, coordinate grid, viewport, curves,
/// pointer state and the renderer that receives finished frames.
///
/// Every host event maps to one `&mut self` method. Handlers that change
/// nothing do not redraw.
pub struct PlotSession<R: Renderer> {
    pub(super) renderer: R,
    pub(super) config: GraphConfig,
    pub(super) canvas: CanvasSize,
    pub(super) viewport: Viewport,
    pub(super) frame: CoordinateFrame,
    pub(super) series: Vec<CurveSeries>,
    pub(super) interaction: InteractionState,
    pub(super) tooltip_template: TooltipTemplate,
    throttle: RedrawThrottle,
    sampler: Sampler,
    hit_tester: HitTester,
    compiler: Box<dyn FormulaCompiler>,
    error_sink: Option<Box<dyn ErrorSink>>,
    palette: PalettePicker,
}

impl<R: Renderer> PlotSession<R> {
    pub fn new(renderer: R, config: GraphConfig, canvas: CanvasSize) -> GraphResult<Self> {
        config.validate()?;
        if !canvas.is_valid() {
            return Err(GraphError::InvalidViewport {
                width: canvas.width,
                height: canvas.height,
            });
        }

        let frame = CoordinateFrame::new(config.grid_range, 0, canvas)?;
        let tooltip_template = TooltipTemplate::parse(&config.tooltip.template)?;
        if !config.grid_range.is_proportional() {
            warn!(
                x_units = config.grid_range.unit_count_x(),
                y_units = config.grid_range.unit_count_y(),
                "grid range is not proportional; reference lines are thinned per axis"
            );
        }

        let palette = if config.random_colors {
            PalettePicker::random(config.color_palette.clone(), config.random_seed)
        } else {
            PalettePicker::sequential(config.color_palette.clone())
        };

        debug!(
            width = canvas.width,
            height = canvas.height,
            x_min = config.grid_range.x_min,
            x_max = config.grid_range.x_max,
            "plot session created"
        );

        Ok(Self {
            renderer,
            canvas,
            viewport: Viewport::default(),
            frame,
            series: Vec::new(),
            interaction: InteractionState::default(),
            tooltip_template,
            throttle: RedrawThrottle::new(Duration::from_millis(config.redraw_interval_ms)),
            sampler: Sampler::new(config.branch_policy),
            hit_tester: HitTester::new(config.tooltip.hit_box_px),
            compiler: Box::new(ExpressionCompiler),
            error_sink: None,
            palette,
            config,
        })
    }

    /// Replaces the default expression compiler.
    #[must_use]
    pub fn with_compiler(mut self, compiler: impl FormulaCompiler + 'static) -> Self {
        self.compiler = Box::new(compiler);
        self
    }

    /// Routes formula failures to `sink` instead of the log.
    #[must_use]
    pub fn with_error_sink(mut self, sink: impl ErrorSink + 'static) -> Self {
        self.error_sink = Some(Box::new(sink));
        self
    }

    /// Discards all curves and plots `formulas` in their place.
    pub fn draw_graphs<S: AsRef<str>>(&mut self, formulas: &[S]) -> GraphResult<()> {
        debug!(count = formulas.len(), "draw graphs");
        self.series.clear();
        self.palette.reset();
        self.interaction.clear_hover();
        self.push_series(formulas);
        self.render()
    }

    /// Plots `formulas` after the existing curves, leaving those untouched.
    pub fn add_graphs<S: AsRef<str>>(&mut self, formulas: &[S]) -> GraphResult<()> {
        debug!(
            count = formulas.len(),
            existing = self.series.len(),
            "add graphs"
        );
        self.push_series(formulas);
        self.render()
    }

    pub fn pointer_down(&mut self, x: f64, y: f64) {
        if !self.config.pan_enable {
            return;
        }
        self.interaction.on_pan_start(x, y, self.viewport.offset());
        trace!(x, y, "pan start");
    }

    pub fn pointer_up(&mut self) {
        self.interaction.on_pan_end();
    }

    pub fn pointer_leave(&mut self) {
        self.interaction.on_pan_end();
    }

    /// Handles pointer motion at host timestamp `now`.
    ///
    /// Events inside the redraw window are dropped. A held button pans;
    /// otherwise the pointer is hit-tested for tooltips.
    pub fn pointer_move(&mut self, x: f64, y: f64, now: Duration) -> GraphResult<PointerOutcome> {
        if !self.config.pan_enable && !self.config.tooltip.enable {
            return Ok(PointerOutcome::Ignored);
        }
        if !self.throttle.try_acquire(now) {
            return Ok(PointerOutcome::Throttled);
        }
        self.interaction.on_pointer_move(x, y);

        if self.config.pan_enable && self.interaction.is_panning() {
            let (dx, dy) = self.interaction.drag_delta(x, y, self.viewport.offset());
            let points_added = self.pan_by(dx, dy)?;
            return Ok(PointerOutcome::Panned {
                dx,
                dy,
                points_added,
            });
        }

        if self.config.tooltip.enable {
            return self.update_hover(x, y);
        }

        Ok(PointerOutcome::Ignored)
    }

    /// Applies one wheel step. Only the sign of `delta` matters; positive
    /// zooms in.
    pub fn wheel(&mut self, delta: i32) -> GraphResult<ZoomOutcome> {
        if !self.config.zoom_enable {
            return Ok(ZoomOutcome::Unchanged);
        }

        let outcome = self.viewport.apply_zoom_delta(delta, self.config.grid_range);
        match outcome {
            ZoomOutcome::Applied { zoom_level } => {
                debug!(zoom_level, "zoom applied");
                self.frame = CoordinateFrame::new(self.config.grid_range, zoom_level, self.canvas)?;
                self.resample_all();
                self.render()?;
            }
            ZoomOutcome::Rejected { zoom_level } => {
                let rejected = GraphError::ViewportRejected {
                    zoom_level: zoom_level.saturating_add(delta.signum()),
                };
                debug!(zoom_level, error = %rejected, "zoom rejected");
            }
            ZoomOutcome::Unchanged => {}
        }
        Ok(outcome)
    }

    /// Adopts a new canvas size. Returns `false` when nothing changed.
    pub fn resize(&mut self, canvas: CanvasSize) -> GraphResult<bool> {
        if !self.config.change_on_resize || canvas == self.canvas {
            return Ok(false);
        }
        if !canvas.is_valid() {
            return Err(GraphError::InvalidViewport {
                width: canvas.width,
                height: canvas.height,
            });
        }

        debug!(
            width = canvas.width,
            height = canvas.height,
            "resize"
        );
        self.frame = CoordinateFrame::new(self.config.grid_range, self.viewport.zoom_level(), canvas)?;
        self.canvas = canvas;
        self.resample_all();
        self.render()?;
        Ok(true)
    }

    /// Moves the view by `(dx, dy)` pixels and grows curves into the exposed
    /// margins. Returns the number of points added.
    pub fn pan_by(&mut self, dx: f64, dy: f64) -> GraphResult<usize> {
        if dx == 0.0 && dy == 0.0 {
            return Ok(0);
        }

        self.viewport.apply_pan(dx, dy);
        self.interaction.clear_hover();
        let points_added: usize = self
            .series
            .iter_mut()
            .map(|series| IncrementalExtender.extend(series, &self.frame, &self.viewport))
            .sum();
        trace!(dx, dy, points_added, "pan");

        self.render()?;
        Ok(points_added)
    }

    /// Builds a frame from the current state and hands it to the renderer.
    pub fn render(&mut self) -> GraphResult<()> {
        let frame = self.build_render_frame();
        self.renderer.render(&frame).inspect_err(|err| {
            warn!(error = %err, "render failed");
        })
    }

    /// Renders into an external cairo context, for GTK draw callbacks.
    #[cfg(feature = "cairo-backend")]
    pub fn render_on_cairo_context(&mut self, context: &cairo::Context) -> GraphResult<()>
    where
        R: CairoContextRenderer,
    {
        let frame = self.build_render_frame();
        self.renderer.render_on_cairo_context(context, &frame)
    }

    #[must_use]
    pub fn series(&self) -> &[CurveSeries] {
        &self.series
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub fn coordinate_frame(&self) -> &CoordinateFrame {
        &self.frame
    }

    #[must_use]
    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    #[must_use]
    pub fn canvas(&self) -> CanvasSize {
        self.canvas
    }

    #[must_use]
    pub fn interaction(&self) -> InteractionState {
        self.interaction
    }

    /// `false` when the configured range maps different unit counts onto the
    /// two axes.
    #[must_use]
    pub fn is_proportional_zoom(&self) -> bool {
        self.config.grid_range.is_proportional()
    }

    /// Tooltip for the currently hovered point, if one is shown.
    #[must_use]
    pub fn tooltip(&self) -> Option<TooltipState> {
        let hit = self.interaction.hover()?;
        let series = self.series.get(hit.series_index)?;
        let (offset_x, offset_y) = self.viewport.offset();
        let logical_x = self.frame.pixel_to_logical_x(hit.point.x);
        let logical_y = self.frame.pixel_to_logical_y(hit.point.y);
        let lines = self.tooltip_template.render(&TooltipFields {
            x: logical_x,
            y: logical_y,
            formula: series.formula(),
        });
        Some(TooltipState {
            series_index: hit.series_index,
            screen_x: hit.point.x - offset_x,
            screen_y: hit.point.y - offset_y,
            logical_x,
            logical_y,
            lines,
        })
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    #[must_use]
    pub fn into_renderer(self) -> R {
        self.renderer
    }

    fn push_series<S: AsRef<str>>(&mut self, formulas: &[S]) {
        for formula in formulas {
            let formula = formula.as_ref();
            let color = self
                .palette
                .next_color()
                .unwrap_or(Color::rgb(0.0, 0.0, 0.0));

            let mut series = match self.compiler.compile(formula) {
                Ok(evaluator) => CurveSeries::new(formula, color, evaluator),
                Err(error) => {
                    dispatch(&mut self.error_sink, &error);
                    self.series.push(CurveSeries::failed(formula, color, error));
                    continue;
                }
            };

            if let Some(error) = self.resample(&mut series) {
                dispatch(&mut self.error_sink, &error);
            }
            trace!(
                formula,
                points = series.polyline().len(),
                sub_paths = series.polyline().segments().len(),
                "series sampled"
            );
            self.series.push(series);
        }
    }

    /// Re-samples every curve and reports failures that were not present
    /// before the new frame.
    fn resample_all(&mut self) {
        self.interaction.clear_hover();
        let mut series = std::mem::take(&mut self.series);
        let fresh_errors: Vec<FormulaError> = series
            .iter_mut()
            .filter_map(|curve| self.resample(curve))
            .collect();
        self.series = series;
        debug!(
            series = self.series.len(),
            new_errors = fresh_errors.len(),
            "resampled all curves"
        );
        for error in &fresh_errors {
            dispatch(&mut self.error_sink, error);
        }
    }

    /// Returns the evaluation error when this sample introduced one.
    fn resample(&self, series: &mut CurveSeries) -> Option<FormulaError> {
        let outcome = match series.evaluator() {
            Some(evaluator) => self.sampler.sample(evaluator, &self.frame),
            None => return None,
        };
        let had_error = series.error().is_some();
        series.replace_polyline(outcome.polyline, outcome.error);

        // The sampled strip covers exactly the unpanned canvas.
        if self.viewport.offset() != (0.0, 0.0) {
            IncrementalExtender.extend(series, &self.frame, &self.viewport);
        }
        if had_error {
            return None;
        }
        series.error().cloned()
    }

    fn update_hover(&mut self, x: f64, y: f64) -> GraphResult<PointerOutcome> {
        match self
            .hit_tester
            .find_hit(x, y, &self.series, &self.viewport)
        {
            Some(hit) if self.interaction.hover() == Some(hit) => {
                Ok(PointerOutcome::TooltipShown(hit))
            }
            Some(hit) => {
                trace!(
                    series_index = hit.series_index,
                    point_index = hit.point_index,
                    "hover hit"
                );
                self.interaction.set_hover(Some(hit));
                self.render()?;
                Ok(PointerOutcome::TooltipShown(hit))
            }
            None => {
                if self.interaction.clear_hover().is_some() {
                    self.render()?;
                    return Ok(PointerOutcome::TooltipHidden);
                }
                Ok(PointerOutcome::NoHit)
            }
        }
    }
}
