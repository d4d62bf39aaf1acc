//! Error types for category construction and mutation.

use thiserror::Error;

use crate::label::Label;

/// Errors raised by label coding and category operations.
#[derive(Error, Debug)]
pub enum CategoryError {
    /// Malformed construction arguments
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An explicit label list does not cover every observed value
    #[error("label list does not cover observed values: {labels:?}")]
    LabelListIncomplete { labels: Vec<Label> },

    /// Current labels absent from a new label list under the `Error` policy
    #[error("labels absent from the new label list: {labels:?}")]
    LabelsMissing { labels: Vec<Label> },

    /// A new label list would drop every current label
    #[error("new label list would remove every current label")]
    AllLabelsRemoved,

    /// A bulk recode was validated against a stale label list
    #[error("label list does not match the current coding")]
    LabelListMismatch,

    /// A bulk recode changed the row count
    #[error("coded values have length {actual}, expected {expected}")]
    ShapeMismatch { expected: usize, actual: usize },

    /// A code outside `{0} ∪ [1, K]`
    #[error("code {code} is out of range (valid codes: 1..={max})")]
    OutOfRange { code: u16, max: u16 },

    /// A color component outside `[0, 1]`
    #[error("invalid color for label {label}: component {value} outside [0, 1]")]
    InvalidColor { label: String, value: f32 },
}

/// Result type alias for category operations.
pub type CategoryResult<T> = Result<T, CategoryError>;
