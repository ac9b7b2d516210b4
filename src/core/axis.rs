use serde::{Deserialize, Serialize};

use super::layout::ColorIndex;

/// Axis identifier inside a pad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AxisKey {
    X,
    Y,
    Z,
}

impl AxisKey {
    pub const ALL: [AxisKey; 3] = [AxisKey::X, AxisKey::Y, AxisKey::Z];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::X => "X",
            Self::Y => "Y",
            Self::Z => "Z",
        }
    }
}

/// Optional closed interval; either end may be left unset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Range {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

impl Range {
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    #[must_use]
    pub fn is_set(&self) -> bool {
        self.min.is_some() && self.max.is_some()
    }

    #[must_use]
    pub fn bounds(&self) -> Option<(f64, f64)> {
        Some((self.min?, self.max?))
    }
}

/// Font settings for axis titles or tick labels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AxisText {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font: Option<i16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<ColorIndex>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center: Option<bool>,
}

/// Axis configuration of one pad.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    #[serde(default, skip_serializing_if = "is_unset_range")]
    pub(crate) range: Range,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) num_divisions: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) max_digits: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) tick_length: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) axis_color: Option<ColorIndex>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) log: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) grid: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) opposite_ticks: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) time_format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) tick_orientation: Option<String>,
    #[serde(default, skip_serializing_if = "is_unset_text")]
    pub(crate) title_text: AxisText,
    #[serde(default, skip_serializing_if = "is_unset_text")]
    pub(crate) label_text: AxisText,
}

pub(crate) fn is_unset_range(range: &Range) -> bool {
    range.min.is_none() && range.max.is_none()
}

fn is_unset_text(text: &AxisText) -> bool {
    *text == AxisText::default()
}

impl Axis {
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
    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        self.range = Range::new(min, max);
        self
    }

    #[must_use]
    pub fn with_min_range(mut self, min: f64) -> Self {
        self.range.min = Some(min);
        self
    }

    #[must_use]
    pub fn with_max_range(mut self, max: f64) -> Self {
        self.range.max = Some(max);
        self
    }

    /// Sets axis line, title and label color at once.
    #[must_use]
    pub fn with_color(mut self, color: ColorIndex) -> Self {
        self.axis_color = Some(color);
        self.title_text.color = Some(color);
        self.label_text.color = Some(color);
        self
    }

    #[must_use]
    pub fn with_axis_color(mut self, color: ColorIndex) -> Self {
        self.axis_color = Some(color);
        self
    }

    #[must_use]
    pub fn with_num_divisions(mut self, divisions: i32) -> Self {
        self.num_divisions = Some(divisions);
        self
    }

    #[must_use]
    pub fn with_max_digits(mut self, digits: i32) -> Self {
        self.max_digits = Some(digits);
        self
    }

    #[must_use]
    pub fn with_tick_length(mut self, length: f32) -> Self {
        self.tick_length = Some(length);
        self
    }

    #[must_use]
    pub fn with_title_font(mut self, font: i16) -> Self {
        self.title_text.font = Some(font);
        self
    }

    #[must_use]
    pub fn with_label_font(mut self, font: i16) -> Self {
        self.label_text.font = Some(font);
        self
    }

    #[must_use]
    pub fn with_title_size(mut self, size: f32) -> Self {
        self.title_text.size = Some(size);
        self
    }

    #[must_use]
    pub fn with_label_size(mut self, size: f32) -> Self {
        self.label_text.size = Some(size);
        self
    }

    #[must_use]
    pub fn with_title_color(mut self, color: ColorIndex) -> Self {
        self.title_text.color = Some(color);
        self
    }

    #[must_use]
    pub fn with_label_color(mut self, color: ColorIndex) -> Self {
        self.label_text.color = Some(color);
        self
    }

    #[must_use]
    pub fn with_title_offset(mut self, offset: f32) -> Self {
        self.title_text.offset = Some(offset);
        self
    }

    #[must_use]
    pub fn with_label_offset(mut self, offset: f32) -> Self {
        self.label_text.offset = Some(offset);
        self
    }

    #[must_use]
    pub fn with_title_center(mut self, center: bool) -> Self {
        self.title_text.center = Some(center);
        self
    }

    #[must_use]
    pub fn with_label_center(mut self, center: bool) -> Self {
        self.label_text.center = Some(center);
        self
    }

    #[must_use]
    pub fn with_log(mut self, log: bool) -> Self {
        self.log = Some(log);
        self
    }

    #[must_use]
    pub fn with_grid(mut self, grid: bool) -> Self {
        self.grid = Some(grid);
        self
    }

    #[must_use]
    pub fn with_opposite_ticks(mut self, opposite: bool) -> Self {
        self.opposite_ticks = Some(opposite);
        self
    }

    #[must_use]
    pub fn with_time_format(mut self, format: impl Into<String>) -> Self {
        self.time_format = Some(format.into());
        self
    }

    #[must_use]
    pub fn with_tick_orientation(mut self, orientation: impl Into<String>) -> Self {
        self.tick_orientation = Some(orientation.into());
        self
    }

    // Read access for backends applying the finished axis to a frame.

    #[must_use]
    pub fn range(&self) -> Range {
        self.range
    }

    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    #[must_use]
    pub fn num_divisions(&self) -> Option<i32> {
        self.num_divisions
    }

    #[must_use]
    pub fn max_digits(&self) -> Option<i32> {
        self.max_digits
    }

    #[must_use]
    pub fn tick_length(&self) -> Option<f32> {
        self.tick_length
    }

    #[must_use]
    pub fn axis_color(&self) -> Option<ColorIndex> {
        self.axis_color
    }

    #[must_use]
    pub fn is_log(&self) -> Option<bool> {
        self.log
    }

    #[must_use]
    pub fn is_grid(&self) -> Option<bool> {
        self.grid
    }

    #[must_use]
    pub fn is_opposite_ticks(&self) -> Option<bool> {
        self.opposite_ticks
    }

    #[must_use]
    pub fn time_format(&self) -> Option<&str> {
        self.time_format.as_deref()
    }

    #[must_use]
    pub fn tick_orientation(&self) -> Option<&str> {
        self.tick_orientation.as_deref()
    }

    #[must_use]
    pub fn title_text(&self) -> AxisText {
        self.title_text
    }

    #[must_use]
    pub fn label_text(&self) -> AxisText {
        self.label_text
    }
}

#[cfg(test)]
mod tests {
    use super::{Axis, AxisKey, Range};

    #[test]
    fn range_bounds_need_both_ends() {
        assert_eq!(Range::new(1.0, 2.0).bounds(), Some((1.0, 2.0)));
        let half = Range {
            min: Some(1.0),
            max: None,
        };
        assert_eq!(half.bounds(), None);
        assert!(!half.is_set());
    }

    #[test]
    fn with_color_sets_line_title_and_labels() {
        let axis = Axis::new().with_color(4);
        assert_eq!(axis.axis_color(), Some(4));
        assert_eq!(axis.title_text().color, Some(4));
        assert_eq!(axis.label_text().color, Some(4));
    }

    #[test]
    fn empty_axis_serializes_without_keys() {
        let json = serde_json::to_value(Axis::new()).expect("serialize");
        assert_eq!(json, serde_json::json!({}));
        assert_eq!(AxisKey::Z.as_str(), "Z");
    }
}
