//! Template/override merging.
//!
//! `base.merge(&overlay)` keeps every field the overlay leaves unset and takes
//! the overlay's value everywhere else. Nested groups recurse field by field,
//! keyed collections take the union of keys and recurse on shared keys, and
//! ordered collections (series, boxes, generated legend rows) are
//! concatenated with the base's elements first.

use std::collections::BTreeMap;

use super::axis::{Axis, AxisText, Range};
use super::boxes::{BoxPosition, LegendContent, LegendEntry, PadBox, TextContent};
use super::layout::Layout;
use super::pad::{CyclicDefaults, FrameStyle, OptionDefaults, Pad, PadMargins, PadPosition};
use super::plot::{Dimensions, Plot};

pub trait Merge {
    /// Combines `self` (base) with `overlay`; set overlay fields win.
    #[must_use]
    fn merge(&self, overlay: &Self) -> Self;
}

fn pick<T: Clone>(base: &Option<T>, overlay: &Option<T>) -> Option<T> {
    overlay.as_ref().or(base.as_ref()).cloned()
}

fn pick_name(base: &str, overlay: &str) -> String {
    if overlay.is_empty() {
        base.to_owned()
    } else {
        overlay.to_owned()
    }
}

pub(crate) fn merge_keyed<K, V>(base: &BTreeMap<K, V>, overlay: &BTreeMap<K, V>) -> BTreeMap<K, V>
where
    K: Ord + Clone,
    V: Merge + Clone,
{
    let mut merged = base.clone();
    for (key, value) in overlay {
        let combined = match base.get(key) {
            Some(existing) => existing.merge(value),
            None => value.clone(),
        };
        merged.insert(key.clone(), combined);
    }
    merged
}

pub(crate) fn concat<T: Clone>(base: &[T], overlay: &[T]) -> Vec<T> {
    base.iter().chain(overlay).cloned().collect()
}

impl Merge for Layout {
    fn merge(&self, overlay: &Self) -> Self {
        Self {
            color: pick(&self.color, &overlay.color),
            style: pick(&self.style, &overlay.style),
            scale: pick(&self.scale, &overlay.scale),
        }
    }
}

impl Merge for Range {
    fn merge(&self, overlay: &Self) -> Self {
        Self {
            min: pick(&self.min, &overlay.min),
            max: pick(&self.max, &overlay.max),
        }
    }
}

impl Merge for AxisText {
    fn merge(&self, overlay: &Self) -> Self {
        Self {
            font: pick(&self.font, &overlay.font),
            size: pick(&self.size, &overlay.size),
            color: pick(&self.color, &overlay.color),
            offset: pick(&self.offset, &overlay.offset),
            center: pick(&self.center, &overlay.center),
        }
    }
}

impl Merge for Axis {
    fn merge(&self, overlay: &Self) -> Self {
        Self {
            range: self.range.merge(&overlay.range),
            title: pick(&self.title, &overlay.title),
            num_divisions: pick(&self.num_divisions, &overlay.num_divisions),
            max_digits: pick(&self.max_digits, &overlay.max_digits),
            tick_length: pick(&self.tick_length, &overlay.tick_length),
            axis_color: pick(&self.axis_color, &overlay.axis_color),
            log: pick(&self.log, &overlay.log),
            grid: pick(&self.grid, &overlay.grid),
            opposite_ticks: pick(&self.opposite_ticks, &overlay.opposite_ticks),
            time_format: pick(&self.time_format, &overlay.time_format),
            tick_orientation: pick(&self.tick_orientation, &overlay.tick_orientation),
            title_text: self.title_text.merge(&overlay.title_text),
            label_text: self.label_text.merge(&overlay.label_text),
        }
    }
}

impl Merge for PadPosition {
    fn merge(&self, overlay: &Self) -> Self {
        Self {
            xlow: pick(&self.xlow, &overlay.xlow),
            ylow: pick(&self.ylow, &overlay.ylow),
            xup: pick(&self.xup, &overlay.xup),
            yup: pick(&self.yup, &overlay.yup),
        }
    }
}

impl Merge for PadMargins {
    fn merge(&self, overlay: &Self) -> Self {
        Self {
            top: pick(&self.top, &overlay.top),
            bottom: pick(&self.bottom, &overlay.bottom),
            left: pick(&self.left, &overlay.left),
            right: pick(&self.right, &overlay.right),
        }
    }
}

impl Merge for FrameStyle {
    fn merge(&self, overlay: &Self) -> Self {
        Self {
            fill_color: pick(&self.fill_color, &overlay.fill_color),
            fill_style: pick(&self.fill_style, &overlay.fill_style),
            line_color: pick(&self.line_color, &overlay.line_color),
            line_style: pick(&self.line_style, &overlay.line_style),
            line_width: pick(&self.line_width, &overlay.line_width),
        }
    }
}

impl Merge for CyclicDefaults {
    fn merge(&self, overlay: &Self) -> Self {
        Self {
            scale: pick(&self.scale, &overlay.scale),
            colors: pick(&self.colors, &overlay.colors),
            styles: pick(&self.styles, &overlay.styles),
        }
    }
}

impl Merge for OptionDefaults {
    fn merge(&self, overlay: &Self) -> Self {
        Self {
            graph: pick(&self.graph, &overlay.graph),
            hist: pick(&self.hist, &overlay.hist),
            hist2d: pick(&self.hist2d, &overlay.hist2d),
        }
    }
}

impl Merge for Pad {
    fn merge(&self, overlay: &Self) -> Self {
        Self {
            title: pick(&self.title, &overlay.title),
            position: self.position.merge(&overlay.position),
            margins: self.margins.merge(&overlay.margins),
            fill: self.fill.merge(&overlay.fill),
            frame: self.frame.merge(&overlay.frame),
            text: self.text.merge(&overlay.text),
            marker_defaults: self.marker_defaults.merge(&overlay.marker_defaults),
            line_defaults: self.line_defaults.merge(&overlay.line_defaults),
            fill_defaults: self.fill_defaults.merge(&overlay.fill_defaults),
            option_defaults: self.option_defaults.merge(&overlay.option_defaults),
            palette: pick(&self.palette, &overlay.palette),
            redraw_axes: pick(&self.redraw_axes, &overlay.redraw_axes),
            ref_func: pick(&self.ref_func, &overlay.ref_func),
            axes: merge_keyed(&self.axes, &overlay.axes),
            data: concat(&self.data, &overlay.data),
            boxes: concat(&self.boxes, &overlay.boxes),
        }
    }
}

impl Merge for Dimensions {
    fn merge(&self, overlay: &Self) -> Self {
        Self {
            width: pick(&self.width, &overlay.width),
            height: pick(&self.height, &overlay.height),
            fix_aspect_ratio: pick(&self.fix_aspect_ratio, &overlay.fix_aspect_ratio),
        }
    }
}

impl Merge for Plot {
    fn merge(&self, overlay: &Self) -> Self {
        Self {
            name: pick_name(&self.name, &overlay.name),
            group: pick_name(&self.group, &overlay.group),
            category: pick(&self.category, &overlay.category),
            template_name: pick(&self.template_name, &overlay.template_name),
            dimensions: self.dimensions.merge(&overlay.dimensions),
            fill: self.fill.merge(&overlay.fill),
            pads: merge_keyed(&self.pads, &overlay.pads),
        }
    }
}

impl Merge for LegendEntry {
    fn merge(&self, overlay: &Self) -> Self {
        Self {
            label: pick(&self.label, &overlay.label),
            ref_data: pick(&self.ref_data, &overlay.ref_data),
            draw_style: pick(&self.draw_style, &overlay.draw_style),
            marker: self.marker.merge(&overlay.marker),
            line: self.line.merge(&overlay.line),
            fill: self.fill.merge(&overlay.fill),
            text: self.text.merge(&overlay.text),
        }
    }
}

impl Merge for BoxPosition {
    fn merge(&self, overlay: &Self) -> Self {
        Self {
            x: pick(&self.x, &overlay.x),
            y: pick(&self.y, &overlay.y),
            user_coordinates: pick(&self.user_coordinates, &overlay.user_coordinates),
        }
    }
}

impl Merge for TextContent {
    fn merge(&self, overlay: &Self) -> Self {
        Self {
            text: pick_name(&self.text, &overlay.text),
        }
    }
}

impl Merge for LegendContent {
    fn merge(&self, overlay: &Self) -> Self {
        Self {
            title: pick(&self.title, &overlay.title),
            num_columns: pick(&self.num_columns, &overlay.num_columns),
            default_draw_style: pick(&self.default_draw_style, &overlay.default_draw_style),
            default_marker: self.default_marker.merge(&overlay.default_marker),
            default_line: self.default_line.merge(&overlay.default_line),
            default_fill: self.default_fill.merge(&overlay.default_fill),
            entries: concat(&self.entries, &overlay.entries),
            user_entries: merge_keyed(&self.user_entries, &overlay.user_entries),
        }
    }
}

impl<K: Merge> Merge for PadBox<K> {
    fn merge(&self, overlay: &Self) -> Self {
        Self {
            position: self.position.merge(&overlay.position),
            border: self.border.merge(&overlay.border),
            fill: self.fill.merge(&overlay.fill),
            text: self.text.merge(&overlay.text),
            content: self.content.merge(&overlay.content),
        }
    }
}
