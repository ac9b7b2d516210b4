use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::axis::{Axis, AxisKey};
use super::boxes::{BoxItem, LegendBox, TextBox};
use super::data::Data;
use super::layout::{ColorIndex, DrawingOption, Layout, styles};

/// Pad corners as fractions of the canvas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PadPosition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xlow: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ylow: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xup: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yup: Option<f64>,
}

/// Pad margins as fractions of the pad.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PadMargins {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bottom: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<f32>,
}

/// Styling of the frame around the data area.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<ColorIndex>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_style: Option<i16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_color: Option<ColorIndex>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_style: Option<i16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_width: Option<f32>,
}

/// Cyclic per-series defaults for one attribute group (marker, line or fill).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub(crate) struct CyclicDefaults {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) scale: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) colors: Option<Vec<ColorIndex>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) styles: Option<Vec<i16>>,
}

impl CyclicDefaults {
    fn is_unset(&self) -> bool {
        self.scale.is_none() && self.colors.is_none() && self.styles.is_none()
    }
}

/// Drawing-option alias used when a series sets none, per data kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub(crate) struct OptionDefaults {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) graph: Option<DrawingOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) hist: Option<DrawingOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) hist2d: Option<DrawingOption>,
}

/// One rectangular panel of a plot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pad {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) title: Option<String>,
    #[serde(default)]
    pub(crate) position: PadPosition,
    #[serde(default)]
    pub(crate) margins: PadMargins,
    #[serde(default, skip_serializing_if = "Layout::is_unset")]
    pub(crate) fill: Layout,
    #[serde(default)]
    pub(crate) frame: FrameStyle,
    #[serde(default, skip_serializing_if = "Layout::is_unset")]
    pub(crate) text: Layout,
    #[serde(default, skip_serializing_if = "CyclicDefaults::is_unset")]
    pub(crate) marker_defaults: CyclicDefaults,
    #[serde(default, skip_serializing_if = "CyclicDefaults::is_unset")]
    pub(crate) line_defaults: CyclicDefaults,
    #[serde(default, skip_serializing_if = "CyclicDefaults::is_unset")]
    pub(crate) fill_defaults: CyclicDefaults,
    #[serde(default)]
    pub(crate) option_defaults: OptionDefaults,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) palette: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) redraw_axes: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) ref_func: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub(crate) axes: BTreeMap<AxisKey, Axis>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub(crate) data: Vec<Data>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub(crate) boxes: Vec<BoxItem>,
}

impl Pad {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_position(mut self, xlow: f64, ylow: f64, xup: f64, yup: f64) -> Self {
        self.position = PadPosition {
            xlow: Some(xlow),
            ylow: Some(ylow),
            xup: Some(xup),
            yup: Some(yup),
        };
        self
    }

    #[must_use]
    pub fn with_margins(mut self, top: f32, bottom: f32, left: f32, right: f32) -> Self {
        self.margins = PadMargins {
            top: Some(top),
            bottom: Some(bottom),
            left: Some(left),
            right: Some(right),
        };
        self
    }

    #[must_use]
    pub fn with_palette(mut self, palette: i32) -> Self {
        self.palette = Some(palette);
        self
    }

    #[must_use]
    pub fn with_default_text_size(mut self, size: f32) -> Self {
        self.text.scale = Some(size);
        self
    }

    #[must_use]
    pub fn with_default_text_color(mut self, color: ColorIndex) -> Self {
        self.text.color = Some(color);
        self
    }

    #[must_use]
    pub fn with_default_text_font(mut self, font: i16) -> Self {
        self.text.style = Some(font);
        self
    }

    #[must_use]
    pub fn with_default_marker_size(mut self, size: f32) -> Self {
        self.marker_defaults.scale = Some(size);
        self
    }

    #[must_use]
    pub fn with_default_marker_colors(mut self, colors: Vec<ColorIndex>) -> Self {
        self.marker_defaults.colors = Some(colors);
        self
    }

    #[must_use]
    pub fn with_default_marker_styles(mut self, styles: Vec<i16>) -> Self {
        self.marker_defaults.styles = Some(styles);
        self
    }

    #[must_use]
    pub fn with_default_line_width(mut self, width: f32) -> Self {
        self.line_defaults.scale = Some(width);
        self
    }

    #[must_use]
    pub fn with_default_line_colors(mut self, colors: Vec<ColorIndex>) -> Self {
        self.line_defaults.colors = Some(colors);
        self
    }

    #[must_use]
    pub fn with_default_line_styles(mut self, styles: Vec<i16>) -> Self {
        self.line_defaults.styles = Some(styles);
        self
    }

    #[must_use]
    pub fn with_default_fill_opacity(mut self, opacity: f32) -> Self {
        self.fill_defaults.scale = Some(opacity);
        self
    }

    #[must_use]
    pub fn with_default_fill_colors(mut self, colors: Vec<ColorIndex>) -> Self {
        self.fill_defaults.colors = Some(colors);
        self
    }

    #[must_use]
    pub fn with_default_fill_styles(mut self, styles: Vec<i16>) -> Self {
        self.fill_defaults.styles = Some(styles);
        self
    }

    /// Sets marker, line and fill color lists at once.
    #[must_use]
    pub fn with_default_colors(self, colors: Vec<ColorIndex>) -> Self {
        self.with_default_marker_colors(colors.clone())
            .with_default_line_colors(colors.clone())
            .with_default_fill_colors(colors)
    }

    #[must_use]
    pub fn with_default_drawing_option_graph(mut self, option: DrawingOption) -> Self {
        self.option_defaults.graph = Some(option);
        self
    }

    #[must_use]
    pub fn with_default_drawing_option_hist(mut self, option: DrawingOption) -> Self {
        self.option_defaults.hist = Some(option);
        self
    }

    #[must_use]
    pub fn with_default_drawing_option_hist2d(mut self, option: DrawingOption) -> Self {
        self.option_defaults.hist2d = Some(option);
        self
    }

    #[must_use]
    pub fn with_fill(mut self, color: ColorIndex, style: i16) -> Self {
        self.fill.color = Some(color);
        self.fill.style = Some(style);
        self
    }

    #[must_use]
    pub fn with_transparent(mut self) -> Self {
        self.fill.style = Some(styles::FILL_HOLLOW);
        self
    }

    #[must_use]
    pub fn with_frame_fill(mut self, color: ColorIndex, style: i16) -> Self {
        self.frame.fill_color = Some(color);
        self.frame.fill_style = Some(style);
        self
    }

    #[must_use]
    pub fn with_frame_line(mut self, color: ColorIndex, style: i16, width: f32) -> Self {
        self.frame.line_color = Some(color);
        self.frame.line_style = Some(style);
        self.frame.line_width = Some(width);
        self
    }

    #[must_use]
    pub fn with_transparent_frame(mut self) -> Self {
        self.frame.fill_style = Some(styles::FILL_HOLLOW);
        self
    }

    #[must_use]
    pub fn with_redraw_axes(mut self, redraw: bool) -> Self {
        self.redraw_axes = Some(redraw);
        self
    }

    /// Reference function drawn beneath the series, e.g. `"1"`.
    #[must_use]
    pub fn with_ref_func(mut self, formula: impl Into<String>) -> Self {
        self.ref_func = Some(formula.into());
        self
    }

    #[must_use]
    pub fn with_axis(mut self, key: AxisKey, axis: Axis) -> Self {
        self.axes.insert(key, axis);
        self
    }

    #[must_use]
    pub fn with_data(mut self, data: Data) -> Self {
        self.data.push(data);
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: TextBox) -> Self {
        self.boxes.push(BoxItem::Text(text));
        self
    }

    #[must_use]
    pub fn with_legend(mut self, legend: LegendBox) -> Self {
        self.boxes.push(BoxItem::Legend(legend));
        self
    }

    /// Appends a series and returns its position in draw order.
    pub fn add_data(&mut self, data: Data) -> usize {
        self.data.push(data);
        self.data.len() - 1
    }

    pub fn add_text(&mut self, text: TextBox) {
        self.boxes.push(BoxItem::Text(text));
    }

    pub fn add_legend(&mut self, legend: LegendBox) {
        self.boxes.push(BoxItem::Legend(legend));
    }

    pub fn axis_mut(&mut self, key: AxisKey) -> &mut Axis {
        self.axes.entry(key).or_default()
    }

    /// Series in draw order.
    #[must_use]
    pub fn data(&self) -> &[Data] {
        &self.data
    }

    #[must_use]
    pub fn axis(&self, key: AxisKey) -> Option<&Axis> {
        self.axes.get(&key)
    }

    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    #[must_use]
    pub fn position(&self) -> PadPosition {
        self.position
    }

    #[must_use]
    pub fn margins(&self) -> PadMargins {
        self.margins
    }

    #[must_use]
    pub fn fill(&self) -> Layout {
        self.fill
    }

    #[must_use]
    pub fn frame(&self) -> FrameStyle {
        self.frame
    }
}

#[cfg(test)]
mod tests {
    use super::Pad;
    use crate::core::{Axis, AxisKey, Data, LegendBox, TextBox};

    #[test]
    fn pad_keeps_declared_order_of_series_and_boxes() {
        let mut pad = Pad::new()
            .with_data(Data::new("a", "in"))
            .with_legend(LegendBox::new())
            .with_text(TextBox::new("t"));
        assert_eq!(pad.add_data(Data::new("b", "in")), 1);
        let names: Vec<_> = pad.data().iter().map(Data::name).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(pad.boxes.len(), 2);
    }

    #[test]
    fn axis_mut_creates_missing_axis() {
        let mut pad = Pad::new();
        *pad.axis_mut(AxisKey::Y) = Axis::new().with_log(true);
        assert_eq!(pad.axis(AxisKey::Y).and_then(Axis::is_log), Some(true));
        assert!(pad.axis(AxisKey::X).is_none());
    }

    #[test]
    fn default_colors_fill_all_three_lists() {
        let pad = Pad::new().with_default_colors(vec![2, 4]);
        assert_eq!(pad.marker_defaults.colors, Some(vec![2, 4]));
        assert_eq!(pad.line_defaults.colors, Some(vec![2, 4]));
        assert_eq!(pad.fill_defaults.colors, Some(vec![2, 4]));
    }
}
