//! Histogram peaks: the densest cells of a 3-D HSV histogram over vibrant pixels.
//!
//! Bins are fixed-width cubes, so two close colors on either side of a bin
//! edge come back as two smaller swatches. Selected bins that turn out empty
//! are dropped, which means fewer than `num_colors` swatches is a normal result.

use std::collections::BTreeMap;

use tracing::debug;

use crate::color::{HUE_RANGE, hsv_to_rgb, rgb_to_hsv_buffer};
use crate::config::HistogramBins;
use crate::error::{PaletteError, Result};
use crate::strategy::vibrant_indices;
use crate::swatch::{Swatch, sort_by_proportion};

const CHANNEL_RANGE: f64 = 256.0;

/// Evenly spaced edges over one axis, `bins + 1` of them, last one exact.
#[derive(Debug, Clone)]
struct Axis {
    edges: Vec<f64>,
}

impl Axis {
    fn new(bins: usize, hi: f64) -> Self {
        let step = hi / bins as f64;
        let mut edges: Vec<f64> = (0..=bins).map(|i| i as f64 * step).collect();
        edges[bins] = hi;
        Self { edges }
    }

    fn bins(&self) -> usize {
        self.edges.len() - 1
    }

    /// Index `i` such that `edges[i] <= value < edges[i + 1]`.
    fn locate(&self, value: u8) -> Option<usize> {
        let value = value as f64;
        if value < self.edges[0] || value >= self.edges[self.bins()] {
            return None;
        }
        Some(self.edges.partition_point(|&e| e <= value) - 1)
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Bin {
    count: usize,
    sum: [u64; 3],
}

struct Histogram {
    hue: Axis,
    sat: Axis,
    val: Axis,
    // Only occupied bins, keyed by row-major (h, s, v) index.
    bins: BTreeMap<usize, Bin>,
}

impl Histogram {
    fn new(grid: &HistogramBins) -> Self {
        Self {
            hue: Axis::new(grid.h_bins, HUE_RANGE as f64),
            sat: Axis::new(grid.s_bins, CHANNEL_RANGE),
            val: Axis::new(grid.v_bins, CHANNEL_RANGE),
            bins: BTreeMap::new(),
        }
    }

    fn add(&mut self, hsv: [u8; 3]) {
        let (Some(h), Some(s), Some(v)) = (
            self.hue.locate(hsv[0]),
            self.sat.locate(hsv[1]),
            self.val.locate(hsv[2]),
        ) else {
            return;
        };
        let index = (h * self.sat.bins() + s) * self.val.bins() + v;

        let bin = self.bins.entry(index).or_default();
        bin.count += 1;
        for c in 0..3 {
            bin.sum[c] += hsv[c] as u64;
        }
    }

    /// Up to `n` occupied bins, most populated first. Equal counts keep index order.
    fn peaks(&self, n: usize) -> Vec<Bin> {
        let mut ranked: Vec<Bin> = self.bins.values().copied().collect();
        ranked.sort_by(|a, b| b.count.cmp(&a.count));
        ranked.truncate(n);
        ranked
    }
}

pub fn extract(pixels: &[[u8; 3]], num_colors: usize, grid: &HistogramBins) -> Result<Vec<Swatch>> {
    grid.validate()?;
    if pixels.is_empty() {
        return Err(PaletteError::EmptyImage);
    }

    let hsv = rgb_to_hsv_buffer(pixels);
    let vibrant = vibrant_indices(&hsv);

    let mut histogram = Histogram::new(grid);
    for &i in &vibrant {
        histogram.add(hsv[i]);
    }

    let total = vibrant.len() as f64;
    let mut swatches: Vec<Swatch> = histogram
        .peaks(num_colors)
        .into_iter()
        .filter(|bin| bin.count > 0)
        .map(|bin| {
            let n = bin.count as u64;
            // Integer division truncates the mean like a byte cast.
            let mean = bin.sum.map(|s| (s / n) as u8);
            Swatch::new(hsv_to_rgb(mean), bin.count as f64 / total)
        })
        .collect();

    debug!(
        pixels = pixels.len(),
        vibrant = vibrant.len(),
        occupied_bins = histogram.bins.len(),
        swatches = swatches.len(),
        "histogram peaks extracted"
    );

    sort_by_proportion(&mut swatches);
    Ok(swatches)
}
