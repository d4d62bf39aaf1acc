//! impoint-wire - Binary wire codec for point cloud widgets
//!
//! Pure, deterministic packing of the buffers a rendering surface reads
//! and writes:
//!
//! - **geometry**: `f32[N * 3]`, row-major, little-endian
//! - **codes**: `u16[N]` or `u32[N]`, little-endian, 0 = missing
//! - **selection mask**: packed bits, MSB first, `ceil(N / 8)` bytes
//!
//! Packing is byte-for-byte reproducible for a given input, so consumers
//! may decode by fixed offset.

pub mod codes;
pub mod error;
pub mod geometry;
pub mod mask;

pub use codes::{pack_codes, CodeWidth};
pub use error::{WireError, WireResult};
pub use geometry::{pack_geometry, POINT_STRIDE};
pub use mask::{pack_selection_mask, unpack_selection_mask};
