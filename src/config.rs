//! Extraction settings.
//!
//! A [`PaletteConfig`] can be built in code, starting from `Default`, or
//! loaded from JSON:
//!
//! ```
//! use palette_extract::{PaletteConfig, Strategy};
//!
//! let config = PaletteConfig::from_json_str(
//!     r#"{ "num_colors": 4, "strategy": { "name": "histogram_peaks", "h_bins": 8 } }"#,
//! )?;
//! assert_eq!(config.num_colors, 4);
//! assert!(matches!(config.strategy, Strategy::HistogramPeaks(bins) if bins.h_bins == 8));
//! # Ok::<(), palette_extract::PaletteError>(())
//! ```

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::cluster::MAX_CLUSTERS;
use crate::error::{PaletteError, Result};

/// Which extraction algorithm to run, with the options only that algorithm takes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "name")]
pub enum Strategy {
    /// k-means over every pixel in RGB.
    #[default]
    #[serde(rename = "kmeans")]
    KMeans,
    /// Densest bins of a 3-D HSV histogram over vibrant pixels.
    #[serde(rename = "histogram_peaks")]
    HistogramPeaks(HistogramBins),
    /// k-means in LAB over the most colorful fifth of vibrant pixels.
    #[serde(rename = "colorfullness")]
    Colorfulness,
}

impl Strategy {
    pub const KMEANS: &'static str = "kmeans";
    pub const HISTOGRAM_PEAKS: &'static str = "histogram_peaks";
    pub const COLORFULNESS: &'static str = "colorfullness";

    pub fn name(&self) -> &'static str {
        match self {
            Strategy::KMeans => Self::KMEANS,
            Strategy::HistogramPeaks(_) => Self::HISTOGRAM_PEAKS,
            Strategy::Colorfulness => Self::COLORFULNESS,
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parses a strategy name; histogram bins take their defaults.
impl FromStr for Strategy {
    type Err = PaletteError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            Self::KMEANS => Ok(Strategy::KMeans),
            Self::HISTOGRAM_PEAKS => Ok(Strategy::HistogramPeaks(HistogramBins::default())),
            Self::COLORFULNESS => Ok(Strategy::Colorfulness),
            other => Err(PaletteError::UnknownStrategy(other.to_string())),
        }
    }
}

/// Bin counts per HSV axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HistogramBins {
    pub h_bins: usize,
    pub s_bins: usize,
    pub v_bins: usize,
}

impl Default for HistogramBins {
    fn default() -> Self {
        Self {
            h_bins: 12,
            s_bins: 4,
            v_bins: 4,
        }
    }
}

impl HistogramBins {
    pub fn validate(&self) -> Result<()> {
        for (axis, value) in [("h", self.h_bins), ("s", self.s_bins), ("v", self.v_bins)] {
            if value == 0 {
                return Err(PaletteError::InvalidBinCount { axis, value });
            }
        }
        Ok(())
    }
}

/// Solver limits handed to `kmeans_colors`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KMeansParams {
    pub max_iterations: usize,
    /// Stop once centroids move less than this between iterations.
    pub convergence: f32,
}

impl Default for KMeansParams {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            convergence: 1e-4,
        }
    }
}

/// Everything one extraction call needs besides the image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PaletteConfig {
    /// Swatches to produce (exact for kmeans, an upper bound otherwise). Default 6.
    pub num_colors: usize,
    /// Longest side after downscaling. Smaller images are left alone. Default 200.
    pub resize_to: u32,
    /// Seed for k-means++ initialisation. Default 42.
    pub seed: u64,
    pub kmeans: KMeansParams,
    pub strategy: Strategy,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            num_colors: 6,
            resize_to: 200,
            seed: 42,
            kmeans: KMeansParams::default(),
            strategy: Strategy::default(),
        }
    }
}

impl PaletteConfig {
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_num_colors(mut self, num_colors: usize) -> Self {
        self.num_colors = num_colors;
        self
    }

    pub fn with_resize_to(mut self, resize_to: u32) -> Self {
        self.resize_to = resize_to;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Reject settings no strategy can run with.
    pub fn validate(&self) -> Result<()> {
        if self.num_colors == 0 || self.num_colors > MAX_CLUSTERS {
            return Err(PaletteError::InvalidNumColors {
                value: self.num_colors,
                max: MAX_CLUSTERS,
            });
        }
        if self.resize_to == 0 {
            return Err(PaletteError::InvalidParameter {
                parameter: "resize_to",
                value: self.resize_to.to_string(),
            });
        }
        if self.kmeans.max_iterations == 0 {
            return Err(PaletteError::InvalidParameter {
                parameter: "kmeans.max_iterations",
                value: "0".to_string(),
            });
        }
        if !self.kmeans.convergence.is_finite() || self.kmeans.convergence < 0.0 {
            return Err(PaletteError::InvalidParameter {
                parameter: "kmeans.convergence",
                value: self.kmeans.convergence.to_string(),
            });
        }
        if let Strategy::HistogramPeaks(bins) = &self.strategy {
            bins.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PaletteConfig::default();
        assert_eq!(config.num_colors, 6);
        assert_eq!(config.resize_to, 200);
        assert_eq!(config.seed, 42);
        assert_eq!(config.strategy, Strategy::KMeans);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_strategy_names() {
        assert_eq!("kmeans".parse::<Strategy>().unwrap(), Strategy::KMeans);
        assert_eq!(
            "histogram_peaks".parse::<Strategy>().unwrap(),
            Strategy::HistogramPeaks(HistogramBins::default())
        );
        assert_eq!("colorfullness".parse::<Strategy>().unwrap(), Strategy::Colorfulness);

        let err = "colorfulness".parse::<Strategy>().unwrap_err();
        assert!(matches!(err, PaletteError::UnknownStrategy(_)));
        assert!(err.is_config_error());

        for name in ["kmeans", "histogram_peaks", "colorfullness"] {
            assert_eq!(name.parse::<Strategy>().unwrap().to_string(), name);
        }
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(PaletteConfig::default().with_num_colors(0).validate().is_err());
        assert!(PaletteConfig::default().with_num_colors(257).validate().is_err());
        assert!(PaletteConfig::default().with_resize_to(0).validate().is_err());

        let bins = HistogramBins {
            h_bins: 12,
            s_bins: 0,
            v_bins: 4,
        };
        let err = PaletteConfig::default()
            .with_strategy(Strategy::HistogramPeaks(bins))
            .validate()
            .unwrap_err();
        assert!(matches!(err, PaletteError::InvalidBinCount { axis: "s", value: 0 }));
    }

    #[test]
    fn test_json_with_partial_fields() {
        let config = PaletteConfig::from_json_str(
            r#"{"num_colors": 3, "strategy": {"name": "histogram_peaks", "v_bins": 2}}"#,
        )
        .unwrap();
        assert_eq!(config.num_colors, 3);
        assert_eq!(config.resize_to, 200);
        assert_eq!(
            config.strategy,
            Strategy::HistogramPeaks(HistogramBins {
                h_bins: 12,
                s_bins: 4,
                v_bins: 2
            })
        );
    }

    #[test]
    fn test_json_rejects_unknown_input() {
        assert!(PaletteConfig::from_json_str(r#"{"colors": 3}"#).is_err());
        assert!(PaletteConfig::from_json_str(r#"{"strategy": {"name": "median_cut"}}"#).is_err());
        assert!(PaletteConfig::from_json_str(r#"{"num_colors": 0}"#).is_err());
    }

    #[test]
    fn test_json_round_trip() {
        let config = PaletteConfig::default()
            .with_strategy(Strategy::Colorfulness)
            .with_seed(7);
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains(r#""name":"colorfullness""#));
        assert_eq!(PaletteConfig::from_json_str(&json).unwrap(), config);
    }
}
