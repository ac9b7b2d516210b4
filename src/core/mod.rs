pub mod axis;
pub mod boxes;
pub mod data;
pub mod dataset;
pub mod layout;
pub mod merge;
pub mod pad;
pub mod plot;
pub mod property_tree;

pub use axis::{Axis, AxisKey, AxisText, Range};
pub use boxes::{
    BoxItem, LegendBox, LegendContent, LegendEntry, PadBox, TEXT_LINE_DELIMITER, TextBox,
    TextContent,
};
pub use data::{Data, DataKind, NAME_SEPARATOR, NormMode, RatioPayload, unique_name};
pub use dataset::{
    CUT_DISABLED, Dataset, DatasetPool, Function, Graph, Histogram, cut_graph, cut_histogram,
};
pub use layout::{ColorIndex, DrawingOption, Layout, colors, styles};
pub use merge::Merge;
pub use pad::{FrameStyle, Pad, PadMargins, PadPosition};
pub use plot::{Dimensions, PAD_DEFAULTS_ID, Plot};
pub use property_tree::{PLOT_TREE_SCHEMA_V1, PlotTreeContractV1};
