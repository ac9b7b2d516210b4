use smallvec::SmallVec;

use crate::render::Backend;

/// Reference string whose rendered width reserves room for one marker glyph.
const MARKER_PLACEHOLDER: &str = "AAA";
const MARKER_MARGIN_FRACTION: f64 = 1.0 / 3.0;
const ROW_SPACING: f64 = 0.5;

/// Box size in NDC of the active pad.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxSize {
    pub width: f64,
    pub height: f64,
}

/// Measured legend geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LegendMetrics {
    pub size: BoxSize,
    pub row_height: f64,
    pub marker_width: f64,
    pub rows: usize,
}

/// Sizes a legend from rendered label extents.
///
/// Labels fill columns round-robin. Height is
/// `(rows + 0.5 * (rows + 1)) * row_height`, width is the sum of the widest
/// label per column plus one marker reservation per column and a third of one
/// more. A title counts as an entry and drives the width when it is wider
/// than all columns together.
pub fn measure_legend<B: Backend + ?Sized>(
    backend: &B,
    labels: &[String],
    title: Option<&str>,
    num_columns: usize,
    font: i16,
    size: f32,
) -> LegendMetrics {
    let num_columns = num_columns.max(1);
    let frame = backend.pad_frame();
    let marker_px = backend.text_extent(MARKER_PLACEHOLDER, font, size).width_px;

    let mut row_height_px: f64 = 0.0;
    let mut column_widths: SmallVec<[f64; 4]> = SmallVec::from_elem(0.0, num_columns);
    for (index, label) in labels.iter().enumerate() {
        let extent = backend.text_extent(label, font, size);
        row_height_px = row_height_px.max(extent.height_px);
        let column = &mut column_widths[index % num_columns];
        *column = column.max(extent.width_px);
    }
    let mut title_width_px: f64 = 0.0;
    if let Some(title) = title {
        let extent = backend.text_extent(title, font, size);
        row_height_px = row_height_px.max(extent.height_px);
        title_width_px = extent.width_px;
    }

    let entries = labels.len() + usize::from(title.is_some());
    let rows = entries.div_ceil(num_columns);
    let columns_px: f64 = column_widths.iter().sum();
    let width_px = if title_width_px > columns_px {
        MARKER_MARGIN_FRACTION * marker_px + title_width_px
    } else {
        (num_columns as f64 + MARKER_MARGIN_FRACTION) * marker_px + columns_px
    };
    let row_height = frame.px_to_ndc_y(row_height_px);
    let rows_f = rows as f64;
    LegendMetrics {
        size: BoxSize {
            width: frame.px_to_ndc_x(width_px),
            height: (rows_f + ROW_SPACING * (rows_f + 1.0)) * row_height,
        },
        row_height,
        marker_width: frame.px_to_ndc_x(marker_px),
        rows,
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::measure_legend;
    use crate::core::Layout;
    use crate::render::{Backend, NdcRect, PadSpec, RecordingBackend};

    fn backend() -> RecordingBackend {
        let mut backend = RecordingBackend::new();
        backend
            .create_pad(&PadSpec {
                id: 1,
                position: NdcRect::unit(),
                margin_top: 0.05,
                margin_bottom: 0.12,
                margin_left: 0.12,
                margin_right: 0.05,
                fill: Layout::default(),
                frame: Default::default(),
                palette: None,
            })
            .expect("pad");
        backend
    }

    #[test]
    fn title_row_counts_and_can_drive_width() {
        let backend = backend();
        let labels = vec!["ab".to_owned()];
        let plain = measure_legend(&backend, &labels, None, 1, 43, 24.0);
        let titled = measure_legend(&backend, &labels, Some("a much longer title"), 1, 43, 24.0);
        assert_eq!(plain.rows, 1);
        assert_eq!(titled.rows, 2);
        let title_px = 0.58 * 19.0 * 24.0 - 0.25 * 3.0 * 24.0;
        let marker_px = 3.0 * 0.58 * 24.0;
        assert_relative_eq!(
            titled.size.width,
            (marker_px / 3.0 + title_px) / 710.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn columns_share_rows() {
        let backend = backend();
        let labels: Vec<String> = ["a", "b", "c", "d"].iter().map(|s| (*s).to_owned()).collect();
        let two = measure_legend(&backend, &labels, None, 2, 43, 24.0);
        assert_eq!(two.rows, 2);
        assert_relative_eq!(two.size.height, 3.5 * two.row_height);
    }
}
