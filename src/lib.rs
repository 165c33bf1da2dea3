use image::{DynamicImage, RgbImage, imageops::FilterType};
use js_sys::{Array, Object, Reflect};
use tracing::{debug, instrument};
use wasm_bindgen::prelude::*;

pub mod cluster;
pub mod color;
pub mod config;
pub mod error;
#[cfg(feature = "native-bin")]
pub mod logger;
pub mod render;
pub mod strategy;
pub mod swatch;

pub use config::{HistogramBins, KMeansParams, PaletteConfig, Strategy};
pub use error::{PaletteError, Result};
pub use render::{BarSegment, layout_bar};
pub use swatch::{Swatch, sort_by_proportion, swatches_to_json};

// ------------------------------------------------------------
// Pixel preparation
// ------------------------------------------------------------

/// Flatten `img` to RGB triples, first shrinking it so the longest side is
/// at most `max_side` (aspect ratio kept, nearest-neighbour sampling).
/// Images that already fit are used as they are.
pub fn prepare_pixels(img: &DynamicImage, max_side: u32) -> Result<Vec<[u8; 3]>> {
    let rgb = img.to_rgb8();
    let (orig_w, orig_h) = rgb.dimensions();
    if orig_w == 0 || orig_h == 0 {
        return Err(PaletteError::EmptyImage);
    }

    let longest = orig_w.max(orig_h);
    let working: RgbImage = if longest > max_side {
        let ratio = max_side as f32 / longest as f32;
        let down_w = ((orig_w as f32) * ratio).round().max(1.0) as u32;
        let down_h = ((orig_h as f32) * ratio).round().max(1.0) as u32;
        debug!(orig_w, orig_h, down_w, down_h, "downscaling before extraction");
        image::imageops::resize(&rgb, down_w, down_h, FilterType::Nearest)
    } else {
        rgb
    };

    Ok(working.pixels().map(|p| p.0).collect())
}

// ------------------------------------------------------------
// Entry points
// ------------------------------------------------------------

/// Extract a palette from a decoded image.
///
/// Configuration is checked before any pixel is read. The result is sorted
/// by proportion, largest first.
#[instrument(skip_all, fields(strategy = %config.strategy, num_colors = config.num_colors))]
pub fn extract_palette(img: &DynamicImage, config: &PaletteConfig) -> Result<Vec<Swatch>> {
    config.validate()?;
    let pixels = prepare_pixels(img, config.resize_to)?;

    let swatches = match &config.strategy {
        Strategy::KMeans => {
            strategy::dominant::extract(&pixels, config.num_colors, &config.kmeans, config.seed)?
        }
        Strategy::HistogramPeaks(bins) => {
            strategy::histogram::extract(&pixels, config.num_colors, bins)?
        }
        Strategy::Colorfulness => {
            strategy::colorfulness::extract(&pixels, config.num_colors, &config.kmeans, config.seed)?
        }
    };

    debug!(swatches = swatches.len(), "palette extracted");
    Ok(swatches)
}

/// Same as [`extract_palette`] for a row-major RGB8 buffer the caller already holds.
pub fn extract_palette_from_raw(
    width: u32,
    height: u32,
    data: Vec<u8>,
    config: &PaletteConfig,
) -> Result<Vec<Swatch>> {
    let len = data.len();
    let buffer = RgbImage::from_raw(width, height, data).ok_or(PaletteError::MalformedBuffer {
        width,
        height,
        len,
    })?;
    extract_palette(&DynamicImage::ImageRgb8(buffer), config)
}

/// Decode an encoded image (PNG, JPEG, ...) and extract its palette.
pub fn palette_from_bytes(input: &[u8], config: &PaletteConfig) -> Result<Vec<Swatch>> {
    let img = image::load_from_memory(input)?;
    extract_palette(&img, config)
}

/// Extract a palette from encoded image bytes.
///
/// `strategy` is one of `kmeans`, `histogram_peaks` or `colorfullness`.
/// Returns an array of `{ rgb, hex, proportion, label }` objects sorted by
/// proportion.
#[wasm_bindgen(js_name = extractPalette)]
pub fn extract_palette_js(
    input: Vec<u8>,
    strategy: &str,
    num_colors: usize,
    resize_to: u32,
) -> std::result::Result<Array, JsValue> {
    let to_js = |e: PaletteError| JsValue::from_str(&e.to_string());

    let config = PaletteConfig {
        num_colors,
        resize_to,
        strategy: strategy.parse().map_err(to_js)?,
        ..PaletteConfig::default()
    };
    let swatches = palette_from_bytes(&input, &config).map_err(to_js)?;

    let result = Array::new();
    for swatch in &swatches {
        let rgb = Array::new();
        for channel in swatch.rgb() {
            rgb.push(&JsValue::from(channel));
        }
        let label = swatch.label().map(JsValue::from_str).unwrap_or(JsValue::NULL);

        let entry = Object::new();
        Reflect::set(&entry, &JsValue::from_str("rgb"), &rgb)?;
        Reflect::set(&entry, &JsValue::from_str("hex"), &JsValue::from_str(swatch.hex()))?;
        Reflect::set(&entry, &JsValue::from_str("proportion"), &JsValue::from_f64(swatch.proportion()))?;
        Reflect::set(&entry, &JsValue::from_str("label"), &label)?;
        result.push(&entry);
    }

    Ok(result)
}
