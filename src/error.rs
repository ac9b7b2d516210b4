use thiserror::Error;

pub type PlotResult<T> = Result<T, PlotError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlotError {
    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("plot `{plot}` needs {required} pads but the style only provides {available}")]
    StructuralMismatch {
        plot: String,
        required: u8,
        available: u8,
    },

    #[error("`{0}` is not available")]
    MissingData(String),

    #[error("dataset `{name}` is {found} instead of {expected}")]
    TypeMismatch {
        name: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("no drawing representation for `{0}`")]
    UnsupportedKind(String),

    #[error("property tree: {0}")]
    PropertyTree(String),
}
