use crate::core::pad::CyclicDefaults;
use crate::core::{ColorIndex, Data, Layout, Pad, colors, styles};
use crate::render::{SeriesStyle, StyleContext};

/// Entry of a cyclic list at `index`, wrapping in both directions.
#[must_use]
pub fn cyclic_slot<T: Copy>(list: &[T], index: i64) -> Option<T> {
    if list.is_empty() {
        return None;
    }
    let len = i64::try_from(list.len()).ok()?;
    let slot = usize::try_from(index.rem_euclid(len)).ok()?;
    list.get(slot).copied()
}

/// Explicit value or list entry at `index`.
///
/// A negative value shifts the lookup to `index + value` and resolves again
/// from the list; a value that is still negative is treated as unresolved.
fn resolve_cyclic(explicit: Option<i16>, list: Option<&[i16]>, index: i64) -> Option<i16> {
    let list = list.unwrap_or_default();
    let value = explicit.or_else(|| cyclic_slot(list, index))?;
    if value >= 0 {
        return Some(value);
    }
    cyclic_slot(list, index + i64::from(value)).filter(|shifted| *shifted >= 0)
}

fn resolve_group(
    explicit: Layout,
    defaults: &CyclicDefaults,
    index: i64,
) -> (Option<ColorIndex>, Option<i16>, Option<f32>) {
    (
        resolve_cyclic(explicit.color, defaults.colors.as_deref(), index),
        resolve_cyclic(explicit.style, defaults.styles.as_deref(), index),
        explicit.scale.or(defaults.scale),
    )
}

/// Effective marker/line/fill attributes of `data` drawn at position `index`
/// of `pad`.
///
/// Each of the six cyclic lists resolves independently. Line and fill colors
/// fall back to the marker color, the marker color to black.
#[must_use]
pub fn resolve_series_style(pad: &Pad, data: &Data, index: usize, ctx: &StyleContext) -> SeriesStyle {
    let index = i64::try_from(index).unwrap_or(i64::MAX);
    let (marker_color, marker_style, marker_size) =
        resolve_group(data.marker, &pad.marker_defaults, index);
    let (line_color, line_style, line_width) = resolve_group(data.line, &pad.line_defaults, index);
    let (fill_color, fill_style, fill_opacity) =
        resolve_group(data.fill, &pad.fill_defaults, index);

    let marker_color = marker_color.unwrap_or(colors::BLACK);
    SeriesStyle {
        marker_color,
        marker_style: marker_style.unwrap_or(styles::MARKER_FULL_CIRCLE),
        marker_size: marker_size.unwrap_or(ctx.marker_size),
        line_color: line_color.unwrap_or(marker_color),
        line_style: line_style.unwrap_or(styles::LINE_SOLID),
        line_width: line_width.unwrap_or(ctx.line_width),
        fill_color: fill_color.unwrap_or(marker_color),
        fill_style: fill_style.unwrap_or(styles::FILL_HOLLOW),
        fill_opacity: fill_opacity.unwrap_or(1.0),
    }
}
