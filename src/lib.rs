//! padplot: declarative multi-pad plot descriptions rendered onto an
//! abstract graphics backend.
//!
//! The crate splits into a property model with template/override merging
//! (`core`), the backend contract and the values handed to it (`render`),
//! and the engine that resolves styles, builds draw directives and places
//! legends (`api`).

pub mod api;
pub mod core;
pub mod error;
pub mod render;
pub mod telemetry;

pub use api::{PlotLibrary, PlotPainter, PlotStyle, RenderedPlot};
pub use core::{Merge, Plot};
pub use error::{PlotError, PlotResult};
