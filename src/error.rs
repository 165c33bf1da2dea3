use thiserror::Error;

/// Everything that can go wrong between receiving a buffer and handing back swatches.
#[derive(Error, Debug)]
pub enum PaletteError {
    #[error("num_colors must be between 1 and {max}, got {value}")]
    InvalidNumColors { value: usize, max: usize },

    #[error("Unknown strategy: {0} (expected kmeans, histogram_peaks or colorfullness)")]
    UnknownStrategy(String),

    #[error("Invalid bin count for {axis}: {value}")]
    InvalidBinCount { axis: &'static str, value: usize },

    #[error("Invalid parameter: {parameter} = {value}")]
    InvalidParameter { parameter: &'static str, value: String },

    #[error("Image has no pixels")]
    EmptyImage,

    #[error("Pixel buffer of {len} bytes does not match {width}x{height} RGB")]
    MalformedBuffer { width: u32, height: u32, len: usize },

    #[error("Cannot form {requested} clusters from {available} distinct points")]
    ClusteringInfeasible { requested: usize, available: usize },

    #[error("Invalid hex color: {0}")]
    InvalidHex(String),

    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PaletteError {
    /// True for errors raised by configuration checks before any pixel is touched.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            PaletteError::InvalidNumColors { .. }
                | PaletteError::UnknownStrategy(_)
                | PaletteError::InvalidBinCount { .. }
                | PaletteError::InvalidParameter { .. }
                | PaletteError::Config(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, PaletteError>;
