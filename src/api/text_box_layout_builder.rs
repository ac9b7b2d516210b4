use crate::core::TextBox;
use crate::render::{NdcRect, PadFrame, StyleContext, TextPlacement};

use super::box_placement_resolver::{
    BoxAnchor, TickLengths, explicit_anchor, fallback_anchor, placement_margins,
};
use super::legend_layout_builder::BoxSize;

/// Estimated glyph width as a share of the font size.
const CHAR_WIDTH_FRACTION: f64 = 0.6;
const LINE_SPACING: f64 = 0.5;

fn font_size_px(font: i16, size: f32, frame: &PadFrame) -> f64 {
    if font.rem_euclid(10) == 3 {
        f64::from(size)
    } else {
        f64::from(size) * frame.height_px
    }
}

/// Size of a text box from its line count and longest line.
#[must_use]
pub fn text_box_size(lines: &[&str], font: i16, size: f32, frame: &PadFrame) -> BoxSize {
    let size_px = font_size_px(font, size, frame);
    let count = lines.len() as f64;
    let letters = lines
        .iter()
        .map(|line| line.chars().count())
        .max()
        .unwrap_or(0) as f64;
    BoxSize {
        width: frame.px_to_ndc_x(letters * CHAR_WIDTH_FRACTION * size_px),
        height: frame.px_to_ndc_y((count + LINE_SPACING * (count - 1.0).max(0.0)) * size_px),
    }
}

/// Geometry of a text box. Without an explicit position the box goes to the
/// upper-left corner of the axis rectangle; text boxes never search for
/// free space.
#[must_use]
pub fn layout_text_box(
    text_box: &TextBox,
    frame: &PadFrame,
    ctx: &StyleContext,
    ticks: TickLengths,
) -> TextPlacement {
    let font = text_box.text.style.unwrap_or(ctx.text_font);
    let size = text_box.text.scale.unwrap_or(ctx.text_size);
    let lines = text_box.lines();
    let box_size = text_box_size(&lines, font, size, frame);
    let anchor: BoxAnchor = match text_box.explicit_position() {
        Some((x, y)) => explicit_anchor(frame, x, y, text_box.is_user_coordinates()),
        None => fallback_anchor(frame, placement_margins(frame, ticks)),
    };
    let rect: NdcRect = anchor.rect(box_size);
    let mut text = text_box.text;
    text.style = Some(font);
    text.scale = Some(size);
    TextPlacement {
        rect,
        lines: lines.into_iter().map(str::to_owned).collect(),
        border: text_box.border,
        fill: text_box.fill,
        text,
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::layout_text_box;
    use crate::api::box_placement_resolver::TickLengths;
    use crate::core::TextBox;
    use crate::render::{NdcRect, PadFrame, StyleContext};

    fn frame() -> PadFrame {
        PadFrame {
            axis: NdcRect::new(0.1, 0.1, 0.9, 0.9),
            user_x: (0.0, 10.0),
            user_y: (0.0, 10.0),
            log_x: false,
            log_y: false,
            width_px: 800.0,
            height_px: 600.0,
        }
    }

    #[test]
    fn three_lines_take_four_line_heights() {
        let text = TextBox::at(0.2, 0.8, "ALICE // pp // 13 TeV").with_text_layout(1, 43, 24.0);
        let placement = layout_text_box(&text, &frame(), &StyleContext::default(), TickLengths { x: 0.03, y: 0.03 });
        assert_eq!(placement.lines, vec!["ALICE", "pp", "13 TeV"]);
        assert_relative_eq!(placement.rect.height(), 4.0 * 24.0 / 600.0);
        assert_relative_eq!(placement.rect.width(), 6.0 * 0.6 * 24.0 / 800.0);
        assert_relative_eq!(placement.rect.y2, 0.8);
        assert_relative_eq!(placement.rect.x1, 0.2);
    }

    #[test]
    fn user_coordinates_convert_through_the_frame() {
        let text = TextBox::at(5.0, 10.0, "x").with_user_coordinates(true);
        let placement = layout_text_box(&text, &frame(), &StyleContext::default(), TickLengths { x: 0.03, y: 0.03 });
        assert_relative_eq!(placement.rect.x1, 0.5);
        assert_relative_eq!(placement.rect.y2, 0.9);
    }

    #[test]
    fn unpositioned_text_goes_to_the_axis_corner() {
        let placement = layout_text_box(&TextBox::new("x"), &frame(), &StyleContext::default(), TickLengths { x: 0.03, y: 0.03 });
        assert!(placement.rect.x1 > 0.1);
        assert!(placement.rect.y2 < 0.9);
    }
}
