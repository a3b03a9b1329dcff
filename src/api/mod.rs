mod config;
mod error_sink;
mod palette;
mod render_frame_builder;
mod session;

pub use config::{GraphConfig, GridColors, TooltipConfig};
pub use error_sink::{CollectingErrorSink, ErrorSink};
pub use palette::PalettePicker;
pub use session::{PlotSession, TooltipState};
