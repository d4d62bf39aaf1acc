//! Code packing: unsigned category codes to little-endian bytes.

use crate::error::{WireError, WireResult};

/// Element width for packed code buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeWidth {
    U16,
    U32,
}

impl CodeWidth {
    /// Largest code representable at this width.
    pub fn max(self) -> u32 {
        match self {
            CodeWidth::U16 => u16::MAX as u32,
            CodeWidth::U32 => u32::MAX,
        }
    }

    /// Bytes per packed element.
    pub fn stride(self) -> usize {
        match self {
            CodeWidth::U16 => 2,
            CodeWidth::U32 => 4,
        }
    }

    fn bits(self) -> u8 {
        match self {
            CodeWidth::U16 => 16,
            CodeWidth::U32 => 32,
        }
    }
}

/// Pack codes into contiguous little-endian bytes at the given width.
///
/// Fails with [`WireError::Range`] if any code exceeds the width's
/// maximum. Byte-for-byte deterministic.
pub fn pack_codes<T>(codes: &[T], width: CodeWidth) -> WireResult<Vec<u8>>
where
    T: Copy + Into<u32>,
{
    let mut bytes = Vec::with_capacity(codes.len() * width.stride());
    for &code in codes {
        let code: u32 = code.into();
        if code > width.max() {
            return Err(WireError::Range {
                code,
                width: width.bits(),
            });
        }
        match width {
            CodeWidth::U16 => bytes.extend_from_slice(&(code as u16).to_le_bytes()),
            CodeWidth::U32 => bytes.extend_from_slice(&code.to_le_bytes()),
        }
    }
    Ok(bytes)
}
