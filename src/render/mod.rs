mod directive;
mod primitives;
mod recording_backend;
mod style_context;

pub use directive::{
    DrawDirective, FrameFinish, LegendPlacement, LegendRow, LegendSeed, SeriesStyle,
    TextPlacement, ViewAngles,
};
pub use primitives::{NdcRect, PadFrame, PrimitiveId, TextExtent};
pub use recording_backend::{BackendCall, DrawRecord, RecordingBackend};
pub use style_context::{StyleContext, StyleScope};

use crate::core::{FrameStyle, Layout};
use crate::error::PlotResult;

/// Canvas requested for one plot.
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasSpec {
    pub name: String,
    pub width: i32,
    pub height: i32,
    pub fix_aspect_ratio: bool,
    pub fill: Layout,
}

/// Pad requested inside the current canvas. Margins are fractions of the pad.
#[derive(Debug, Clone, PartialEq)]
pub struct PadSpec {
    pub id: u8,
    pub position: NdcRect,
    pub margin_top: f64,
    pub margin_bottom: f64,
    pub margin_left: f64,
    pub margin_right: f64,
    pub fill: Layout,
    pub frame: FrameStyle,
    pub palette: Option<i32>,
}

/// Capabilities the engine needs from a graphics backend.
///
/// Calls arrive strictly in order: one canvas, then per pad `create_pad`,
/// series draws, boxes and `finish_frame`. Queries refer to the most
/// recently created pad.
pub trait Backend {
    fn create_canvas(&mut self, spec: &CanvasSpec) -> PlotResult<()>;

    fn create_pad(&mut self, spec: &PadSpec) -> PlotResult<()>;

    /// Current ambient style registers.
    fn style(&self) -> StyleContext;

    fn apply_style(&mut self, context: &StyleContext);

    fn draw(&mut self, directive: &DrawDirective) -> PlotResult<PrimitiveId>;

    fn text_extent(&self, text: &str, font: i16, size: f32) -> TextExtent;

    fn pad_frame(&self) -> PadFrame;

    /// Invisible rectangle that box fitting must avoid.
    fn add_exclusion(&mut self, rect: NdcRect) -> PrimitiveId;

    fn remove_primitive(&mut self, id: PrimitiveId);

    /// Free rectangle of the requested NDC size that overlaps no primitive
    /// of the current pad.
    fn find_free_box(&self, width: f64, height: f64) -> Option<NdcRect>;

    fn draw_legend(&mut self, legend: &LegendPlacement) -> PlotResult<PrimitiveId>;

    fn draw_text(&mut self, text: &TextPlacement) -> PlotResult<PrimitiveId>;

    fn finish_frame(&mut self, finish: &FrameFinish) -> PlotResult<()>;
}
