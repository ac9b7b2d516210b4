use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::data::unique_name;
use super::layout::{ColorIndex, Layout, styles};

/// Splits multi-line text box content.
pub const TEXT_LINE_DELIMITER: &str = " // ";

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub(crate) struct BoxPosition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) user_coordinates: Option<bool>,
}

/// Position and styling shared by every box kind; `K` carries the kind payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PadBox<K> {
    #[serde(default)]
    pub(crate) position: BoxPosition,
    #[serde(default, skip_serializing_if = "Layout::is_unset")]
    pub(crate) border: Layout,
    #[serde(default, skip_serializing_if = "Layout::is_unset")]
    pub(crate) fill: Layout,
    #[serde(default, skip_serializing_if = "Layout::is_unset")]
    pub(crate) text: Layout,
    pub(crate) content: K,
}

/// Payload of a text box.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextContent {
    pub(crate) text: String,
}

/// Payload of a legend box.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LegendContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) num_columns: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) default_draw_style: Option<String>,
    #[serde(default, skip_serializing_if = "Layout::is_unset")]
    pub(crate) default_marker: Layout,
    #[serde(default, skip_serializing_if = "Layout::is_unset")]
    pub(crate) default_line: Layout,
    #[serde(default, skip_serializing_if = "Layout::is_unset")]
    pub(crate) default_fill: Layout,
    /// Regenerated on every render from the drawn series.
    #[serde(skip)]
    pub(crate) entries: Vec<LegendEntry>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub(crate) user_entries: BTreeMap<u8, LegendEntry>,
}

pub type TextBox = PadBox<TextContent>;
pub type LegendBox = PadBox<LegendContent>;

/// Box stored in a pad, in declared order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoxItem {
    Text(TextBox),
    Legend(LegendBox),
}

impl<K> PadBox<K> {
    #[must_use]
    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.position.x = Some(x);
        self.position.y = Some(y);
        self
    }

    /// Interprets the position in the pad's data coordinates instead of NDC.
    #[must_use]
    pub fn with_user_coordinates(mut self, user_coordinates: bool) -> Self {
        self.position.user_coordinates = Some(user_coordinates);
        self
    }

    #[must_use]
    pub fn with_auto_placement(mut self) -> Self {
        self.position.x = None;
        self.position.y = None;
        self
    }

    #[must_use]
    pub fn with_border(mut self, color: ColorIndex, style: i16, width: f32) -> Self {
        self.border = Layout::new(color, style, width);
        self
    }

    #[must_use]
    pub fn with_border_color(mut self, color: ColorIndex) -> Self {
        self.border.color = Some(color);
        self
    }

    #[must_use]
    pub fn with_border_style(mut self, style: i16) -> Self {
        self.border.style = Some(style);
        self
    }

    #[must_use]
    pub fn with_border_width(mut self, width: f32) -> Self {
        self.border.scale = Some(width);
        self
    }

    #[must_use]
    pub fn with_text_layout(mut self, color: ColorIndex, font: i16, size: f32) -> Self {
        self.text = Layout::new(color, font, size);
        self
    }

    #[must_use]
    pub fn with_text_color(mut self, color: ColorIndex) -> Self {
        self.text.color = Some(color);
        self
    }

    #[must_use]
    pub fn with_text_font(mut self, font: i16) -> Self {
        self.text.style = Some(font);
        self
    }

    #[must_use]
    pub fn with_text_size(mut self, size: f32) -> Self {
        self.text.scale = Some(size);
        self
    }

    #[must_use]
    pub fn with_fill(mut self, color: ColorIndex, style: i16, opacity: f32) -> Self {
        self.fill = Layout::new(color, style, opacity);
        self
    }

    #[must_use]
    pub fn with_fill_color(mut self, color: ColorIndex) -> Self {
        self.fill.color = Some(color);
        self
    }

    #[must_use]
    pub fn with_fill_style(mut self, style: i16) -> Self {
        self.fill.style = Some(style);
        self
    }

    #[must_use]
    pub fn with_fill_opacity(mut self, opacity: f32) -> Self {
        self.fill.scale = Some(opacity);
        self
    }

    #[must_use]
    pub fn with_transparent(mut self) -> Self {
        self.fill.style = Some(styles::FILL_HOLLOW);
        self
    }

    /// Hides border and background; only the content is drawn.
    #[must_use]
    pub fn with_no_box(mut self) -> Self {
        self.border.scale = Some(0.0);
        self.fill.style = Some(styles::FILL_HOLLOW);
        self
    }

    /// Explicit anchor; `None` when either coordinate is unset (auto-placement).
    pub(crate) fn explicit_position(&self) -> Option<(f64, f64)> {
        Some((self.position.x?, self.position.y?))
    }

    pub(crate) fn is_user_coordinates(&self) -> bool {
        self.position.user_coordinates.unwrap_or(false)
    }
}

impl TextBox {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            content: TextContent { text: text.into() },
            ..Self::default()
        }
    }

    #[must_use]
    pub fn at(x: f64, y: f64, text: impl Into<String>) -> Self {
        Self::new(text).with_position(x, y)
    }

    #[must_use]
    pub fn with_content(mut self, text: impl Into<String>) -> Self {
        self.content.text = text.into();
        self
    }

    pub(crate) fn lines(&self) -> Vec<&str> {
        self.content.text.split(TEXT_LINE_DELIMITER).collect()
    }
}

impl LegendBox {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn at(x: f64, y: f64) -> Self {
        Self::new().with_position(x, y)
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.content.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_num_columns(mut self, columns: u8) -> Self {
        self.content.num_columns = Some(columns);
        self
    }

    /// Persistent override for the entry with this id.
    #[must_use]
    pub fn with_entry(mut self, id: u8, entry: LegendEntry) -> Self {
        self.content.user_entries.insert(id, entry);
        self
    }

    #[must_use]
    pub fn with_default_draw_style(mut self, draw_style: impl Into<String>) -> Self {
        self.content.default_draw_style = Some(draw_style.into());
        self
    }

    #[must_use]
    pub fn with_default_line_color(mut self, color: ColorIndex) -> Self {
        self.content.default_line.color = Some(color);
        self
    }

    #[must_use]
    pub fn with_default_line_style(mut self, style: i16) -> Self {
        self.content.default_line.style = Some(style);
        self
    }

    #[must_use]
    pub fn with_default_line_width(mut self, width: f32) -> Self {
        self.content.default_line.scale = Some(width);
        self
    }

    #[must_use]
    pub fn with_default_marker_color(mut self, color: ColorIndex) -> Self {
        self.content.default_marker.color = Some(color);
        self
    }

    #[must_use]
    pub fn with_default_marker_style(mut self, style: i16) -> Self {
        self.content.default_marker.style = Some(style);
        self
    }

    #[must_use]
    pub fn with_default_marker_size(mut self, size: f32) -> Self {
        self.content.default_marker.scale = Some(size);
        self
    }

    #[must_use]
    pub fn with_default_fill_color(mut self, color: ColorIndex) -> Self {
        self.content.default_fill.color = Some(color);
        self
    }

    #[must_use]
    pub fn with_default_fill_style(mut self, style: i16) -> Self {
        self.content.default_fill.style = Some(style);
        self
    }

    #[must_use]
    pub fn with_default_fill_opacity(mut self, opacity: f32) -> Self {
        self.content.default_fill.scale = Some(opacity);
        self
    }

    pub(crate) fn num_columns(&self) -> usize {
        usize::from(self.content.num_columns.unwrap_or(1).max(1))
    }
}

/// One legend row. Auto-generated rows reference their backing series; user
/// rows override them by matching that reference.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LegendEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) ref_data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) draw_style: Option<String>,
    #[serde(default, skip_serializing_if = "Layout::is_unset")]
    pub(crate) marker: Layout,
    #[serde(default, skip_serializing_if = "Layout::is_unset")]
    pub(crate) line: Layout,
    #[serde(default, skip_serializing_if = "Layout::is_unset")]
    pub(crate) fill: Layout,
    #[serde(default, skip_serializing_if = "Layout::is_unset")]
    pub(crate) text: Layout,
}

impl LegendEntry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[must_use]
    pub fn with_ref_data(mut self, name: &str, input_id: &str) -> Self {
        self.ref_data = Some(unique_name(name, input_id));
        self
    }

    /// Legend glyph options, e.g. `"l"`, `"ep"` or `"f"`.
    #[must_use]
    pub fn with_draw_style(mut self, draw_style: impl Into<String>) -> Self {
        self.draw_style = Some(draw_style.into());
        self
    }

    #[must_use]
    pub fn with_marker_color(mut self, color: ColorIndex) -> Self {
        self.marker.color = Some(color);
        self
    }

    #[must_use]
    pub fn with_marker_style(mut self, style: i16) -> Self {
        self.marker.style = Some(style);
        self
    }

    #[must_use]
    pub fn with_marker_size(mut self, size: f32) -> Self {
        self.marker.scale = Some(size);
        self
    }

    #[must_use]
    pub fn with_line_color(mut self, color: ColorIndex) -> Self {
        self.line.color = Some(color);
        self
    }

    #[must_use]
    pub fn with_line_style(mut self, style: i16) -> Self {
        self.line.style = Some(style);
        self
    }

    #[must_use]
    pub fn with_line_width(mut self, width: f32) -> Self {
        self.line.scale = Some(width);
        self
    }

    #[must_use]
    pub fn with_fill_color(mut self, color: ColorIndex) -> Self {
        self.fill.color = Some(color);
        self
    }

    #[must_use]
    pub fn with_fill_style(mut self, style: i16) -> Self {
        self.fill.style = Some(style);
        self
    }

    #[must_use]
    pub fn with_fill_opacity(mut self, opacity: f32) -> Self {
        self.fill.scale = Some(opacity);
        self
    }

    #[must_use]
    pub fn with_text_color(mut self, color: ColorIndex) -> Self {
        self.text.color = Some(color);
        self
    }

    #[must_use]
    pub fn with_text_font(mut self, font: i16) -> Self {
        self.text.style = Some(font);
        self
    }

    #[must_use]
    pub fn with_text_size(mut self, size: f32) -> Self {
        self.text.scale = Some(size);
        self
    }
}
