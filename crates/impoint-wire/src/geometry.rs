//! Geometry packing: N x 3 single-precision points to contiguous bytes.

use ndarray::ArrayView2;

use crate::error::{WireError, WireResult};

/// Bytes per packed point (3 x f32).
pub const POINT_STRIDE: usize = 12;

/// Pack an N x 3 point array into row-major little-endian `f32` bytes.
///
/// Output length is `12 * N` regardless of the input's memory layout.
/// Byte-for-byte deterministic for a given input.
pub fn pack_geometry(points: ArrayView2<'_, f32>) -> WireResult<Vec<u8>> {
    if points.ncols() != 3 {
        return Err(WireError::Shape {
            rows: points.nrows(),
            cols: points.ncols(),
        });
    }

    let mut bytes = Vec::with_capacity(points.nrows() * POINT_STRIDE);
    for row in points.rows() {
        for &value in row {
            bytes.extend_from_slice(&value.to_le_bytes());
        }
    }
    Ok(bytes)
}
