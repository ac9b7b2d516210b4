mod axis_linker;
mod box_placement_resolver;
mod draw_command_builder;
mod legend_entry_resolver;
mod legend_layout_builder;
mod plot_library;
mod plot_painter;
mod plot_style;
mod style_defaults_resolver;
mod text_box_layout_builder;

pub use axis_linker::{AxisLinks, resolve_frame_axes};
pub use box_placement_resolver::{
    BoxAnchor, MARGIN_TICK_FRACTION, TickLengths, explicit_anchor, fallback_anchor, place_box,
    placement_margins,
};
pub use draw_command_builder::{BOXES_ERROR_HALF_WIDTH, PadDrawState, build_series_directives};
pub use legend_entry_resolver::{
    legend_rows, resolve_legend_entries, substitute_label_tokens, transient_entry,
};
pub use legend_layout_builder::{BoxSize, LegendMetrics, measure_legend};
pub use plot_library::PlotLibrary;
pub use plot_painter::{PlotPainter, RenderIssue, RenderedPlot};
pub use plot_style::{PlotStyle, PlotStyleContract};
pub use style_defaults_resolver::{cyclic_slot, resolve_series_style};
pub use text_box_layout_builder::{layout_text_box, text_box_size};
