use tracing::debug;

use crate::cluster::{Clustering, RgbSpace, kmeans};
use crate::color::truncate_channels;
use crate::config::KMeansParams;
use crate::error::Result;
use crate::swatch::{Swatch, sort_by_proportion};

/// k-means over every pixel in RGB. Always returns exactly `num_colors`
/// swatches; clusters that end up empty are reported with proportion 0.
pub fn extract(
    pixels: &[[u8; 3]],
    num_colors: usize,
    params: &KMeansParams,
    seed: u64,
) -> Result<Vec<Swatch>> {
    let clustering = kmeans::<RgbSpace>(pixels, num_colors, params, seed)?;
    let mut swatches = swatches_from_clusters(&clustering);

    debug!(
        pixels = pixels.len(),
        empty_clusters = clustering.counts.iter().filter(|&&c| c == 0).count(),
        "dominant clusters extracted"
    );

    sort_by_proportion(&mut swatches);
    Ok(swatches)
}

/// One swatch per cluster index, empty clusters included with proportion 0.
fn swatches_from_clusters(clustering: &Clustering) -> Vec<Swatch> {
    let total = clustering.total() as f64;
    clustering
        .centroids
        .iter()
        .zip(&clustering.counts)
        .map(|(&centroid, &count)| Swatch::new(truncate_channels(centroid), count as f64 / total))
        .collect()
}
