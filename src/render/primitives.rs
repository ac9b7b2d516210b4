use crate::error::{PlotError, PlotResult};

/// Opaque id of a primitive placed in the current pad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PrimitiveId(pub u32);

/// Axis-aligned rectangle in normalized pad coordinates (`x1 <= x2`, `y1 <= y2`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NdcRect {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl NdcRect {
    #[must_use]
    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Whole pad.
    #[must_use]
    pub const fn unit() -> Self {
        Self::new(0.0, 0.0, 1.0, 1.0)
    }

    #[must_use]
    pub fn width(self) -> f64 {
        self.x2 - self.x1
    }

    #[must_use]
    pub fn height(self) -> f64 {
        self.y2 - self.y1
    }

    #[must_use]
    pub fn is_degenerate(self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }

    /// Interiors overlap; touching edges do not count.
    #[must_use]
    pub fn intersects(self, other: Self) -> bool {
        self.x1 < other.x2 && other.x1 < self.x2 && self.y1 < other.y2 && other.y1 < self.y2
    }

    #[must_use]
    pub fn contains(self, other: Self) -> bool {
        self.x1 <= other.x1 && self.y1 <= other.y1 && other.x2 <= self.x2 && other.y2 <= self.y2
    }

    pub fn validate(self) -> PlotResult<()> {
        if !(self.x1.is_finite() && self.y1.is_finite() && self.x2.is_finite() && self.y2.is_finite())
        {
            return Err(PlotError::InvalidData(
                "box coordinates must be finite".to_owned(),
            ));
        }
        if self.x2 < self.x1 || self.y2 < self.y1 {
            return Err(PlotError::InvalidData(format!(
                "box corners are inverted: ({}, {}) .. ({}, {})",
                self.x1, self.y1, self.x2, self.y2
            )));
        }
        Ok(())
    }
}

/// Rendered text bounding box in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TextExtent {
    pub width_px: f64,
    pub height_px: f64,
}

/// Geometry of the active pad as the backend sees it after drawing.
///
/// `axis` is the data-axis rectangle in NDC; `user_x`/`user_y` are the data
/// coordinates at its edges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PadFrame {
    pub axis: NdcRect,
    pub user_x: (f64, f64),
    pub user_y: (f64, f64),
    pub log_x: bool,
    pub log_y: bool,
    pub width_px: f64,
    pub height_px: f64,
}

impl PadFrame {
    fn to_fraction(value: f64, (lo, hi): (f64, f64), log: bool) -> f64 {
        let (value, lo, hi) = if log && value > 0.0 && lo > 0.0 && hi > 0.0 {
            (value.log10(), lo.log10(), hi.log10())
        } else {
            (value, lo, hi)
        };
        if hi == lo { 0.0 } else { (value - lo) / (hi - lo) }
    }

    /// Data coordinates to NDC through the axis rectangle.
    #[must_use]
    pub fn user_to_ndc(&self, x: f64, y: f64) -> (f64, f64) {
        let fx = Self::to_fraction(x, self.user_x, self.log_x);
        let fy = Self::to_fraction(y, self.user_y, self.log_y);
        (
            self.axis.x1 + fx * self.axis.width(),
            self.axis.y1 + fy * self.axis.height(),
        )
    }

    #[must_use]
    pub fn px_to_ndc_x(&self, px: f64) -> f64 {
        if self.width_px > 0.0 { px / self.width_px } else { 0.0 }
    }

    #[must_use]
    pub fn px_to_ndc_y(&self, px: f64) -> f64 {
        if self.height_px > 0.0 { px / self.height_px } else { 0.0 }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::{NdcRect, PadFrame};

    #[test]
    fn touching_rects_do_not_intersect() {
        let left = NdcRect::new(0.0, 0.0, 0.5, 1.0);
        let right = NdcRect::new(0.5, 0.0, 1.0, 1.0);
        assert!(!left.intersects(right));
        assert!(left.intersects(NdcRect::new(0.4, 0.4, 0.6, 0.6)));
        assert!(NdcRect::unit().contains(left));
        assert!(NdcRect::new(1.0, 0.0, 0.0, 1.0).validate().is_err());
    }

    #[test]
    fn user_coordinates_map_through_axis_rect() {
        let frame = PadFrame {
            axis: NdcRect::new(0.1, 0.2, 0.9, 0.8),
            user_x: (0.0, 10.0),
            user_y: (1.0, 100.0),
            log_x: false,
            log_y: true,
            width_px: 800.0,
            height_px: 600.0,
        };
        let (x, y) = frame.user_to_ndc(5.0, 10.0);
        assert_relative_eq!(x, 0.5);
        assert_relative_eq!(y, 0.5);
        assert_relative_eq!(frame.px_to_ndc_x(80.0), 0.1);
    }
}
