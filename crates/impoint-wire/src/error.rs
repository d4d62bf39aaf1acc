//! Error types for wire encoding and decoding.

use thiserror::Error;

/// Errors raised by the wire codec.
#[derive(Error, Debug)]
pub enum WireError {
    /// Geometry input is not an N x 3 array
    #[error("expected an N x 3 point array, got {rows} x {cols}")]
    Shape { rows: usize, cols: usize },

    /// A code exceeds the chosen packing width
    #[error("code {code} exceeds the maximum for {width}-bit packing")]
    Range { code: u32, width: u8 },

    /// A selection mask buffer is shorter than the point count requires
    #[error("selection mask needs {needed} bytes for {n} points, got {got}")]
    Truncated { n: usize, needed: usize, got: usize },
}

/// Result type alias for wire codec operations.
pub type WireResult<T> = Result<T, WireError>;
