use crate::error::GraphResult;
use crate::render::{RenderFrame, Renderer};

/// No-op renderer used by tests and headless sessions.
///
/// It still validates frame content and keeps the last accepted frame so tests
/// can inspect the emitted geometry.
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub render_count: usize,
    pub last_line_count: usize,
    pub last_path_count: usize,
    pub last_text_count: usize,
    pub last_frame: Option<RenderFrame>,
}

impl Renderer for NullRenderer {
    fn render(&mut self, frame: &RenderFrame) -> GraphResult<()> {
        frame.validate()?;
        self.render_count += 1;
        self.last_line_count = frame.layers.iter().map(|layer| layer.lines.len()).sum();
        self.last_path_count = frame.layers.iter().map(|layer| layer.paths.len()).sum();
        self.last_text_count = frame.layers.iter().map(|layer| layer.texts.len()).sum();
        self.last_frame = Some(frame.clone());
        Ok(())
    }
}
