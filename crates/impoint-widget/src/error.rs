//! Error types for the widget-facing layer.

use thiserror::Error;

use impoint_core::{CategoryError, Label};
use impoint_wire::WireError;

/// Errors raised while binding geometry to a category or deriving wire
/// buffers.
#[derive(Error, Debug)]
pub enum SyncError {
    /// Geometry and category disagree on the row count
    #[error("geometry has {points} points but the category codes {values} values")]
    SizeMismatch { points: usize, values: usize },

    #[error(transparent)]
    Category(#[from] CategoryError),

    #[error(transparent)]
    Wire(#[from] WireError),
}

/// Result type alias for sync bridge operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Validation failures for a lasso edit request.
///
/// These never escape as `Err`: the protocol folds them into an error
/// [`EditResult`](crate::edit::EditResult) carrying the message.
#[derive(Error, Debug)]
pub enum EditError {
    #[error("unsupported request kind: {0:?}")]
    UnsupportedKind(String),

    #[error("no selection mask attached to the request")]
    MissingMask,

    #[error("selection mask is not valid base64: {0}")]
    MaskEncoding(String),

    #[error("request names neither a label nor a code")]
    MissingTarget,

    #[error("unknown label: {0}")]
    UnknownLabel(Label),

    #[error("code {code} is not part of the coding (valid codes: 1..={max})")]
    UnknownCode { code: u16, max: u16 },

    #[error("code 0 is reserved for missing values and cannot be added")]
    ReservedCode,

    #[error(transparent)]
    Category(#[from] CategoryError),

    #[error(transparent)]
    Wire(#[from] WireError),
}
