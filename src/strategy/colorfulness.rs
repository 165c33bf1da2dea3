//! Colorfulness-ranked clustering.
//!
//! Vibrant pixels are scored with the Hasler-Süsstrunk opponent-channel
//! metric, the most colorful fifth is kept and clustered in LAB. Biases the
//! palette toward accent colors even when most of the image is muted.

use tracing::debug;

use crate::cluster::{LabSpace, kmeans};
use crate::color::{lab_to_rgb, rgb_to_hsv_buffer, rgb_to_lab_buffer, truncate_channels};
use crate::config::KMeansParams;
use crate::error::{PaletteError, Result};
use crate::strategy::vibrant_indices;
use crate::swatch::{Swatch, sort_by_proportion};

/// Share of vibrant pixels that goes on to clustering.
pub const TOP_FRACTION: f64 = 0.2;

/// `sqrt(rg^2 + yb^2)` with `rg = |R - G|` and `yb = |(R + G) / 2 - B|`.
pub fn colorfulness(rgb: [u8; 3]) -> f64 {
    let [r, g, b] = rgb.map(f64::from);
    let rg = (r - g).abs();
    let yb = (0.5 * (r + g) - b).abs();
    (rg * rg + yb * yb).sqrt()
}

/// The most colorful `TOP_FRACTION` of `pixels`, at least one.
fn most_colorful(pixels: &[[u8; 3]]) -> Vec<[u8; 3]> {
    let keep = ((pixels.len() as f64 * TOP_FRACTION) as usize).max(1);

    let mut scored: Vec<(f64, [u8; 3])> = pixels.iter().map(|&p| (colorfulness(p), p)).collect();
    scored.sort_by(|a, b| a.0.total_cmp(&b.0));

    scored[scored.len() - keep..].iter().map(|&(_, p)| p).collect()
}

pub fn extract(
    pixels: &[[u8; 3]],
    num_colors: usize,
    params: &KMeansParams,
    seed: u64,
) -> Result<Vec<Swatch>> {
    if pixels.is_empty() {
        return Err(PaletteError::EmptyImage);
    }

    let hsv = rgb_to_hsv_buffer(pixels);
    let vibrant: Vec<[u8; 3]> = vibrant_indices(&hsv).into_iter().map(|i| pixels[i]).collect();

    let top = most_colorful(&vibrant);
    let lab = rgb_to_lab_buffer(&top);

    let clustering = kmeans::<LabSpace>(&lab, num_colors, params, seed)?;
    let total = clustering.total() as f64;

    let mut swatches: Vec<Swatch> = clustering
        .centroids
        .iter()
        .zip(&clustering.counts)
        // LAB centroids are cut to 8 bits before going back to RGB, drift included.
        .map(|(&centroid, &count)| {
            Swatch::new(lab_to_rgb(truncate_channels(centroid)), count as f64 / total)
        })
        .collect();

    debug!(
        pixels = pixels.len(),
        vibrant = vibrant.len(),
        selected = top.len(),
        "colorfulness clusters extracted"
    );

    sort_by_proportion(&mut swatches);
    Ok(swatches)
}
