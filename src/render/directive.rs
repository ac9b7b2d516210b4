use std::collections::BTreeMap;

use crate::core::{Axis, AxisKey, ColorIndex, Dataset, Layout, Range};

use super::primitives::NdcRect;

/// Fully resolved marker, line and fill attributes of one drawn series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesStyle {
    pub marker_color: ColorIndex,
    pub marker_style: i16,
    pub marker_size: f32,
    pub line_color: ColorIndex,
    pub line_style: i16,
    pub line_width: f32,
    pub fill_color: ColorIndex,
    pub fill_style: i16,
    pub fill_opacity: f32,
}

impl SeriesStyle {
    #[must_use]
    pub fn marker(&self) -> Layout {
        Layout::new(self.marker_color, self.marker_style, self.marker_size)
    }

    #[must_use]
    pub fn line(&self) -> Layout {
        Layout::new(self.line_color, self.line_style, self.line_width)
    }

    #[must_use]
    pub fn fill(&self) -> Layout {
        Layout::new(self.fill_color, self.fill_style, self.fill_opacity)
    }
}

/// 3-D view angles in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewAngles {
    pub theta: f64,
    pub phi: f64,
}

/// What a drawn series contributes to its pad's legend.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendSeed {
    /// `name_IN_input` of the backing series.
    pub ref_data: String,
    /// Raw label; tokens such as `<integral>` are still unsubstituted.
    pub label: String,
    pub draw_style: String,
    /// 1-based legend box index, `None` for the first legend.
    pub slot: Option<u8>,
}

/// One backend draw call. Later directives render on top of earlier ones.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawDirective {
    pub handle: Dataset,
    pub option: String,
    pub z_order: usize,
    pub style: SeriesStyle,
    /// Error-bar half width for this call only.
    pub error_bar_half_width: Option<f64>,
    pub contours: Option<u16>,
    pub view_angles: Option<ViewAngles>,
    pub defines_frame: bool,
    pub display_range_y: Range,
    /// printf-style format for `TEXT` drawing.
    pub text_format: Option<String>,
    pub legend: Option<LegendSeed>,
}

impl DrawDirective {
    #[must_use]
    pub fn new(handle: Dataset, option: impl Into<String>, style: SeriesStyle) -> Self {
        Self {
            handle,
            option: option.into(),
            z_order: 0,
            style,
            error_bar_half_width: None,
            contours: None,
            view_angles: None,
            defines_frame: false,
            display_range_y: Range::default(),
            text_format: None,
            legend: None,
        }
    }
}

/// One resolved legend row.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendRow {
    pub label: String,
    pub draw_style: String,
    pub marker: Layout,
    pub line: Layout,
    pub fill: Layout,
    pub text: Layout,
}

/// A legend box ready to be drawn at `rect`.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendPlacement {
    pub rect: NdcRect,
    pub title: Option<String>,
    pub num_columns: usize,
    pub rows: Vec<LegendRow>,
    pub border: Layout,
    pub fill: Layout,
    pub text: Layout,
}

/// A text box ready to be drawn at `rect`, one string per line.
#[derive(Debug, Clone, PartialEq)]
pub struct TextPlacement {
    pub rect: NdcRect,
    pub lines: Vec<String>,
    pub border: Layout,
    pub fill: Layout,
    pub text: Layout,
}

/// Final axis settings for the pad's authoritative drawn object.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameFinish {
    pub title: Option<String>,
    pub axes: BTreeMap<AxisKey, Axis>,
    pub is_2d: bool,
    pub redraw_axes: bool,
}
