use serde::{Deserialize, Serialize};

/// One dominant color of an image.
///
/// `percentage` is the fraction (0.0..=1.0) of clustered pixels assigned to
/// this color. The entries for one image sum to 1.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorEntry {
    pub rgb: (u8, u8, u8),
    pub percentage: f64,
    pub hex: String,
}

impl ColorEntry {
    pub fn new(rgb: (u8, u8, u8), percentage: f64) -> Self {
        Self {
            rgb,
            percentage,
            hex: to_hex(rgb),
        }
    }

    pub fn channels(&self) -> [u8; 3] {
        [self.rgb.0, self.rgb.1, self.rgb.2]
    }
}

/// Lowercase `#rrggbb`.
pub fn to_hex(rgb: (u8, u8, u8)) -> String {
    format!("#{:02x}{:02x}{:02x}", rgb.0, rgb.1, rgb.2)
}

/// Round and clip a 0..=255 float centroid channel.
pub(crate) fn quantize_channel(value: f32) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, 255.0) as u8
}
