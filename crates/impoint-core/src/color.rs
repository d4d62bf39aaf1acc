//! Colors and the default categorical palette.

use serde::{Deserialize, Serialize};

use crate::error::{CategoryError, CategoryResult};

/// An RGB color with components in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    /// Create a color from RGB components.
    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Validate a caller-supplied `[r, g, b]` triple.
    pub fn try_rgb(label: &str, rgb: [f32; 3]) -> CategoryResult<Self> {
        for value in rgb {
            if !(0.0..=1.0).contains(&value) || value.is_nan() {
                return Err(CategoryError::InvalidColor {
                    label: label.to_string(),
                    value,
                });
            }
        }
        Ok(Self::rgb(rgb[0], rgb[1], rgb[2]))
    }

    /// Convert to array `[r, g, b]`.
    pub fn to_array(&self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

impl Default for Color {
    /// Mid-grey, also used for missing values (code 0).
    fn default() -> Self {
        Self::rgb(0.5, 0.5, 0.5)
    }
}

/// The fixed 20-color categorical palette, reused cyclically once exhausted.
pub const CATEGORICAL_PALETTE: [Color; 20] = [
    Color { r: 0.122, g: 0.467, b: 0.706 },
    Color { r: 0.682, g: 0.780, b: 0.910 },
    Color { r: 1.000, g: 0.498, b: 0.055 },
    Color { r: 1.000, g: 0.733, b: 0.471 },
    Color { r: 0.173, g: 0.627, b: 0.173 },
    Color { r: 0.596, g: 0.875, b: 0.541 },
    Color { r: 0.839, g: 0.153, b: 0.157 },
    Color { r: 1.000, g: 0.596, b: 0.588 },
    Color { r: 0.580, g: 0.404, b: 0.741 },
    Color { r: 0.773, g: 0.690, b: 0.835 },
    Color { r: 0.549, g: 0.337, b: 0.294 },
    Color { r: 0.769, g: 0.612, b: 0.580 },
    Color { r: 0.890, g: 0.467, b: 0.761 },
    Color { r: 0.969, g: 0.714, b: 0.824 },
    Color { r: 0.498, g: 0.498, b: 0.498 },
    Color { r: 0.780, g: 0.780, b: 0.780 },
    Color { r: 0.737, g: 0.741, b: 0.133 },
    Color { r: 0.859, g: 0.859, b: 0.553 },
    Color { r: 0.090, g: 0.745, b: 0.812 },
    Color { r: 0.620, g: 0.855, b: 0.898 },
];

/// The default color for the label at position `index` of a label list.
pub fn palette_color(index: usize) -> Color {
    CATEGORICAL_PALETTE[index % CATEGORICAL_PALETTE.len()]
}
