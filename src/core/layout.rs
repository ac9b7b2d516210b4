use serde::{Deserialize, Serialize};

/// Backend palette index.
///
/// Negative values are legal in per-series overrides and pad palettes: they
/// shift the cyclic palette slot instead of naming a color.
pub type ColorIndex = i16;

/// Well-known backend color indices.
pub mod colors {
    use super::ColorIndex;

    pub const WHITE: ColorIndex = 0;
    pub const BLACK: ColorIndex = 1;
    pub const RED: ColorIndex = 632;
    pub const GREEN: ColorIndex = 416;
    pub const BLUE: ColorIndex = 600;
    pub const YELLOW: ColorIndex = 400;
    pub const MAGENTA: ColorIndex = 616;
    pub const CYAN: ColorIndex = 432;
    pub const ORANGE: ColorIndex = 800;
    pub const GRAY: ColorIndex = 920;
}

/// Well-known marker, line and fill style codes.
pub mod styles {
    pub const MARKER_FULL_CIRCLE: i16 = 20;
    pub const MARKER_FULL_SQUARE: i16 = 21;
    pub const MARKER_FULL_TRIANGLE_UP: i16 = 22;
    pub const MARKER_OPEN_CIRCLE: i16 = 24;
    pub const LINE_SOLID: i16 = 1;
    pub const LINE_DASHED: i16 = 2;
    pub const LINE_DOTTED: i16 = 3;
    pub const FILL_HOLLOW: i16 = 0;
    pub const FILL_SOLID: i16 = 1001;
}

/// Color / style / scale triple shared by markers, lines, fills and text.
///
/// `scale` is the marker size, line width, fill opacity or text size
/// depending on where the triple is used. `style` is the text font for text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<ColorIndex>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<i16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<f32>,
}

impl Layout {
    #[must_use]
    pub const fn new(color: ColorIndex, style: i16, scale: f32) -> Self {
        Self {
            color: Some(color),
            style: Some(style),
            scale: Some(scale),
        }
    }

    #[must_use]
    pub fn is_unset(&self) -> bool {
        self.color.is_none() && self.style.is_none() && self.scale.is_none()
    }
}

/// Named drawing-option aliases understood by every backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawingOption {
    // 1d options
    Points,
    PointsXerr,
    PointsEndcaps,
    PointsLine,
    Line,
    Curve,
    Band,
    BandLine,
    Hist,
    HistNoBorders,
    Fit,
    Bar,
    Area,
    AreaCurve,
    AreaLine,
    Boxes,
    BoxesOnly,
    Stars,
    Text,
    // 2d options
    Colz,
    Surf,
}

impl DrawingOption {
    /// Backend option string for this alias.
    ///
    /// `band`, `boxes`, `hist` and `none` are modifier tokens that the draw
    /// command builder rewrites before handing the string to the backend.
    #[must_use]
    pub const fn option_str(self) -> &'static str {
        match self {
            Self::Points => "EP X0",
            Self::PointsXerr => "EP",
            Self::PointsEndcaps => "E1 X0",
            Self::PointsLine => "LP X0",
            Self::Line => "L",
            Self::Curve => "C",
            Self::Band => "band",
            Self::BandLine => "band L",
            Self::Hist => "hist",
            Self::HistNoBorders => "hist ][",
            Self::Fit => "FUNC",
            Self::Bar => "B",
            Self::Area => "F",
            Self::AreaCurve => "CF",
            Self::AreaLine => "LF",
            Self::Boxes => "boxes",
            Self::BoxesOnly => "boxes none",
            Self::Stars => "P*",
            Self::Text => "TEXT",
            Self::Colz => "COLZ",
            Self::Surf => "SURF1",
        }
    }

    #[must_use]
    pub const fn is_2d(self) -> bool {
        matches!(self, Self::Colz | Self::Surf)
    }
}

#[cfg(test)]
mod tests {
    use super::{DrawingOption, Layout};

    #[test]
    fn unset_layout_serializes_to_empty_group() {
        let json = serde_json::to_value(Layout::default()).expect("serialize");
        assert_eq!(json, serde_json::json!({}));
        assert!(Layout::default().is_unset());
        assert!(!Layout::new(1, 20, 1.0).is_unset());
    }

    #[test]
    fn aliases_round_trip_through_snake_case_names() {
        let json = serde_json::to_value(DrawingOption::HistNoBorders).expect("serialize");
        assert_eq!(json, serde_json::json!("hist_no_borders"));
        assert!(DrawingOption::Colz.is_2d());
        assert!(!DrawingOption::Band.is_2d());
    }
}
