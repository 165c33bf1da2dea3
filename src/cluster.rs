//! Seeded k-means over 8-bit color triples.
//!
//! The solver is `kmeans_colors`; a [`ColorSpace`] decides which `palette`
//! type the triples are embedded as while clustering. Centroids handed back
//! are recomputed as exact member means on the caller's 8-bit scale so the
//! strategies can quantize them without float drift from the solver.

use std::collections::HashSet;

use kmeans_colors::{Calculate, get_kmeans};
use palette::{Lab, Srgb};
use tracing::debug;

use crate::config::KMeansParams;
use crate::error::{PaletteError, Result};

/// Upper bound on clusters: the solver stores assignments as `u8`.
pub const MAX_CLUSTERS: usize = 256;

/// How 8-bit triples are laid out in the space k-means measures distances in.
pub trait ColorSpace {
    type Point: Calculate + Clone;

    fn embed(value: [u8; 3]) -> Self::Point;

    /// Map a solver point back onto the 8-bit scale (unquantized).
    fn project(point: &Self::Point) -> [f64; 3];
}

/// sRGB triples, clustered as `Srgb<f32>`.
pub struct RgbSpace;

impl ColorSpace for RgbSpace {
    type Point = Srgb;

    fn embed(value: [u8; 3]) -> Srgb {
        Srgb::new(value[0], value[1], value[2]).into_format()
    }

    fn project(point: &Srgb) -> [f64; 3] {
        [point.red, point.green, point.blue].map(|c| c as f64 * 255.0)
    }
}

/// 8-bit encoded LAB triples (see [`crate::color`]), clustered on that scale
/// as-is. `Lab` is only the container: L keeps its 0-255 range.
pub struct LabSpace;

impl ColorSpace for LabSpace {
    type Point = Lab;

    fn embed(value: [u8; 3]) -> Lab {
        Lab::new(value[0] as f32, value[1] as f32, value[2] as f32)
    }

    fn project(point: &Lab) -> [f64; 3] {
        [point.l as f64, point.a as f64, point.b as f64]
    }
}

/// Result of one clustering pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Clustering {
    /// Cluster index for every input point, in input order.
    pub assignments: Vec<usize>,
    /// Member count per cluster. May contain zeros.
    pub counts: Vec<usize>,
    /// Per-cluster mean on the 8-bit scale. Empty clusters keep the solver's centroid.
    pub centroids: Vec<[f64; 3]>,
}

impl Clustering {
    /// Number of clustered points.
    pub fn total(&self) -> usize {
        self.assignments.len()
    }
}

/// Cluster `values` into exactly `k` groups.
///
/// Fails when `k` is zero, above [`MAX_CLUSTERS`], or larger than the number
/// of distinct values (k-means++ cannot seed more centroids than that).
pub fn kmeans<S: ColorSpace>(
    values: &[[u8; 3]],
    k: usize,
    params: &KMeansParams,
    seed: u64,
) -> Result<Clustering> {
    if k == 0 || k > MAX_CLUSTERS {
        return Err(PaletteError::InvalidNumColors {
            value: k,
            max: MAX_CLUSTERS,
        });
    }

    let distinct = count_distinct(values, k);
    if distinct < k {
        return Err(PaletteError::ClusteringInfeasible {
            requested: k,
            available: distinct,
        });
    }

    let points: Vec<S::Point> = values.iter().map(|&v| S::embed(v)).collect();
    let result = get_kmeans(
        k,
        params.max_iterations,
        params.convergence,
        false,
        &points,
        seed,
    );
    debug!(points = points.len(), k, score = result.score, "k-means converged");

    let assignments: Vec<usize> = result.indices.iter().map(|&i| i as usize).collect();

    let mut counts = vec![0usize; k];
    let mut sums = vec![[0u64; 3]; k];
    for (value, &cluster) in values.iter().zip(&assignments) {
        counts[cluster] += 1;
        for c in 0..3 {
            sums[cluster][c] += value[c] as u64;
        }
    }

    let centroids = (0..k)
        .map(|i| {
            if counts[i] == 0 {
                S::project(&result.centroids[i])
            } else {
                let n = counts[i] as f64;
                sums[i].map(|s| s as f64 / n)
            }
        })
        .collect();

    Ok(Clustering {
        assignments,
        counts,
        centroids,
    })
}

/// Count distinct triples, stopping early once `enough` have been seen.
fn count_distinct(values: &[[u8; 3]], enough: usize) -> usize {
    let mut seen = HashSet::with_capacity(enough);
    for v in values {
        seen.insert(*v);
        if seen.len() >= enough {
            break;
        }
    }
    seen.len()
}
