use serde::{Deserialize, Serialize};

use super::axis::{Range, is_unset_range};
use super::layout::{ColorIndex, DrawingOption, Layout};

/// Joins a series name and its input identifier into the dataset pool key.
pub const NAME_SEPARATOR: &str = "_IN_";

#[must_use]
pub fn unique_name(name: &str, input_id: &str) -> String {
    format!("{name}{NAME_SEPARATOR}{input_id}")
}

/// Normalization applied to histogram-like series before drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormMode {
    /// Divide by the sum of bin contents.
    Integral,
    /// Divide by the sum of bin contents and by each bin width.
    IntegralWidth,
}

/// Denominator reference of a ratio series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatioPayload {
    pub(crate) denom_name: String,
    pub(crate) denom_input_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) correlated: Option<bool>,
}

/// Closed set of series variants.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DataKind {
    #[default]
    Plain,
    Ratio(RatioPayload),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub(crate) struct LegendSlot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) slot: Option<u8>,
}

/// One drawable series reference plus its display overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Data {
    pub(crate) name: String,
    pub(crate) input_id: String,
    #[serde(default)]
    pub(crate) kind: DataKind,
    #[serde(default, skip_serializing_if = "is_unset_legend")]
    pub(crate) legend: LegendSlot,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) options: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) option_alias: Option<DrawingOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) text_format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) norm_mode: Option<NormMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) scale_factor: Option<f64>,
    #[serde(default, skip_serializing_if = "is_unset_range")]
    pub(crate) range_x: Range,
    #[serde(default, skip_serializing_if = "is_unset_range")]
    pub(crate) range_y: Range,
    #[serde(default, skip_serializing_if = "Layout::is_unset")]
    pub(crate) marker: Layout,
    #[serde(default, skip_serializing_if = "Layout::is_unset")]
    pub(crate) line: Layout,
    #[serde(default, skip_serializing_if = "Layout::is_unset")]
    pub(crate) fill: Layout,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) defines_frame: Option<bool>,
}

fn is_unset_legend(legend: &LegendSlot) -> bool {
    legend.label.is_none() && legend.slot.is_none()
}

impl Data {
    #[must_use]
    pub fn new(name: impl Into<String>, input_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            input_id: input_id.into(),
            ..Self::default()
        }
    }

    /// Ratio of `numerator / denominator`, both looked up in the dataset pool.
    #[must_use]
    pub fn ratio(
        name: impl Into<String>,
        input_id: impl Into<String>,
        denom_name: impl Into<String>,
        denom_input_id: impl Into<String>,
    ) -> Self {
        Self {
            kind: DataKind::Ratio(RatioPayload {
                denom_name: denom_name.into(),
                denom_input_id: denom_input_id.into(),
                correlated: None,
            }),
            ..Self::new(name, input_id)
        }
    }

    /// Copies every display override of `template` onto a new series reference.
    #[must_use]
    pub fn from_template(
        name: impl Into<String>,
        input_id: impl Into<String>,
        template: &Data,
    ) -> Self {
        Self {
            name: name.into(),
            input_id: input_id.into(),
            ..template.clone()
        }
    }

    #[must_use]
    pub fn with_input_id(mut self, input_id: impl Into<String>) -> Self {
        self.input_id = input_id.into();
        self
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.legend.label = Some(label.into());
        self
    }

    /// Routes the legend entry of this series to the legend box with this 1-based index.
    #[must_use]
    pub fn with_legend_slot(mut self, slot: u8) -> Self {
        self.legend.slot = Some(slot);
        self
    }

    #[must_use]
    pub fn with_options(mut self, options: impl Into<String>) -> Self {
        self.options = Some(options.into());
        self.option_alias = None;
        self
    }

    #[must_use]
    pub fn with_option_alias(mut self, alias: DrawingOption) -> Self {
        self.option_alias = Some(alias);
        self.options = None;
        self
    }

    #[must_use]
    pub fn without_options(mut self) -> Self {
        self.options = None;
        self.option_alias = None;
        self
    }

    #[must_use]
    pub fn with_text_format(mut self, format: impl Into<String>) -> Self {
        self.text_format = Some(format.into());
        self
    }

    #[must_use]
    pub fn with_normalize(mut self, use_width: bool) -> Self {
        self.norm_mode = Some(if use_width {
            NormMode::IntegralWidth
        } else {
            NormMode::Integral
        });
        self
    }

    #[must_use]
    pub fn with_scale_factor(mut self, factor: f64) -> Self {
        self.scale_factor = Some(factor);
        self
    }

    #[must_use]
    pub fn with_range_x(mut self, min: f64, max: f64) -> Self {
        self.range_x = Range::new(min, max);
        self
    }

    #[must_use]
    pub fn with_min_range_x(mut self, min: f64) -> Self {
        self.range_x.min = Some(min);
        self
    }

    #[must_use]
    pub fn with_max_range_x(mut self, max: f64) -> Self {
        self.range_x.max = Some(max);
        self
    }

    #[must_use]
    pub fn without_range_x(mut self) -> Self {
        self.range_x = Range::default();
        self
    }

    #[must_use]
    pub fn with_range_y(mut self, min: f64, max: f64) -> Self {
        self.range_y = Range::new(min, max);
        self
    }

    #[must_use]
    pub fn with_min_range_y(mut self, min: f64) -> Self {
        self.range_y.min = Some(min);
        self
    }

    #[must_use]
    pub fn with_max_range_y(mut self, max: f64) -> Self {
        self.range_y.max = Some(max);
        self
    }

    #[must_use]
    pub fn without_range_y(mut self) -> Self {
        self.range_y = Range::default();
        self
    }

    /// Sets marker, line and fill color at once.
    #[must_use]
    pub fn with_color(mut self, color: ColorIndex) -> Self {
        self.marker.color = Some(color);
        self.line.color = Some(color);
        self.fill.color = Some(color);
        self
    }

    #[must_use]
    pub fn with_marker(mut self, color: ColorIndex, style: i16, size: f32) -> Self {
        self.marker = Layout::new(color, style, size);
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
    pub fn with_line(mut self, color: ColorIndex, style: i16, width: f32) -> Self {
        self.line = Layout::new(color, style, width);
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

    /// Marks this series as the one whose axes are authoritative for the pad.
    #[must_use]
    pub fn with_defines_frame(mut self) -> Self {
        self.defines_frame = Some(true);
        self
    }

    /// Selects binomial error propagation for ratios. No effect on plain series.
    #[must_use]
    pub fn with_correlated_errors(mut self, correlated: bool) -> Self {
        if let DataKind::Ratio(payload) = &mut self.kind {
            payload.correlated = Some(correlated);
        }
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn input_id(&self) -> &str {
        &self.input_id
    }

    #[must_use]
    pub fn unique_name(&self) -> String {
        unique_name(&self.name, &self.input_id)
    }

    #[must_use]
    pub fn is_ratio(&self) -> bool {
        matches!(self.kind, DataKind::Ratio(_))
    }

    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.legend.label.as_deref()
    }

    pub(crate) fn denominator_unique_name(&self) -> Option<String> {
        match &self.kind {
            DataKind::Plain => None,
            DataKind::Ratio(payload) => {
                Some(unique_name(&payload.denom_name, &payload.denom_input_id))
            }
        }
    }

    pub(crate) fn is_correlated(&self) -> bool {
        match &self.kind {
            DataKind::Plain => false,
            DataKind::Ratio(payload) => payload.correlated.unwrap_or(false),
        }
    }

    pub(crate) fn defines_frame(&self) -> bool {
        self.defines_frame.unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::{Data, DataKind, NormMode, unique_name};

    #[test]
    fn unique_name_joins_with_reserved_separator() {
        let data = Data::new("pt", "run1");
        assert_eq!(data.unique_name(), "pt_IN_run1");
        assert_eq!(unique_name("a", "b"), "a_IN_b");
    }

    #[test]
    fn ratio_carries_denominator_key_and_correlation() {
        let ratio = Data::ratio("num", "in1", "den", "in2").with_correlated_errors(true);
        assert!(ratio.is_ratio());
        assert_eq!(ratio.denominator_unique_name().as_deref(), Some("den_IN_in2"));
        assert!(ratio.is_correlated());

        let plain = Data::new("x", "y").with_correlated_errors(true);
        assert_eq!(plain.kind, DataKind::Plain);
        assert!(!plain.is_correlated());
    }

    #[test]
    fn later_setters_overwrite_earlier_ones() {
        let data = Data::new("a", "b")
            .with_options("hist")
            .with_option_alias(crate::core::DrawingOption::Points)
            .with_normalize(false)
            .with_normalize(true);
        assert_eq!(data.options, None);
        assert!(data.option_alias.is_some());
        assert_eq!(data.norm_mode, Some(NormMode::IntegralWidth));
    }

    #[test]
    fn template_copies_overrides_but_not_identity() {
        let template = Data::new("t", "tin").with_marker(2, 21, 1.5).with_label("tmpl");
        let data = Data::from_template("a", "ain", &template);
        assert_eq!(data.unique_name(), "a_IN_ain");
        assert_eq!(data.marker, template.marker);
        assert_eq!(data.label(), Some("tmpl"));
    }

    #[test]
    fn ratio_kind_is_tagged_in_property_tree() {
        let json = serde_json::to_value(Data::ratio("n", "i", "d", "j")).expect("serialize");
        assert_eq!(json["kind"]["type"], "ratio");
        assert_eq!(json["kind"]["denom_name"], "d");
        assert!(json.get("marker").is_none());
    }
}
