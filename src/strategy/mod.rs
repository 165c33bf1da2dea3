//! The three extraction strategies.
//!
//! Each one takes the flattened, already downscaled RGB pixels and returns
//! swatches sorted by proportion.

pub mod colorfulness;
pub mod dominant;
pub mod histogram;

use tracing::warn;

/// Saturation and value must both exceed this (8-bit scale) for a pixel to count as vibrant.
pub const VIBRANT_THRESHOLD: u8 = 50;

#[inline]
pub fn is_vibrant(hsv: [u8; 3]) -> bool {
    hsv[1] > VIBRANT_THRESHOLD && hsv[2] > VIBRANT_THRESHOLD
}

/// Positions of vibrant pixels in `hsv`, or every position when none qualify.
pub fn vibrant_indices(hsv: &[[u8; 3]]) -> Vec<usize> {
    let vibrant: Vec<usize> = hsv
        .iter()
        .enumerate()
        .filter(|(_, p)| is_vibrant(**p))
        .map(|(i, _)| i)
        .collect();

    if vibrant.is_empty() {
        warn!(pixels = hsv.len(), "no vibrant pixels, using the whole image");
        (0..hsv.len()).collect()
    } else {
        vibrant
    }
}
