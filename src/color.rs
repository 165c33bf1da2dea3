//! Pixel-level color space transforms.
//!
//! All spaces are carried as `[u8; 3]` on the 8-bit scales used across the
//! crate:
//!
//! * RGB: sRGB, each channel 0-255.
//! * HSV: hue 0-179 (degrees halved), saturation and value 0-255.
//! * LAB: CIE L*a*b* (D65) encoded as `L * 255 / 100`, `a + 128`, `b + 128`.
//!
//! The conversions themselves go through `palette`, only the scaling lives here.

use palette::{FromColor, Hsv, IntoColor, Lab, Srgb};

use crate::error::{PaletteError, Result};

/// Number of hue steps on the 8-bit HSV scale.
pub const HUE_RANGE: f32 = 180.0;

// ------------------------------------------------------------
// RGB <-> HSV
// ------------------------------------------------------------

pub fn rgb_to_hsv(rgb: [u8; 3]) -> [u8; 3] {
    let srgb: Srgb<f32> = Srgb::new(rgb[0], rgb[1], rgb[2]).into_format();
    let hsv: Hsv = srgb.into_color();

    let mut hue = (hsv.hue.into_positive_degrees() / 2.0).round();
    if hue >= HUE_RANGE {
        hue -= HUE_RANGE;
    }

    [
        hue as u8,
        unit_to_u8(hsv.saturation),
        unit_to_u8(hsv.value),
    ]
}

pub fn hsv_to_rgb(hsv: [u8; 3]) -> [u8; 3] {
    let hsv = Hsv::new(
        hsv[0] as f32 * 2.0,
        hsv[1] as f32 / 255.0,
        hsv[2] as f32 / 255.0,
    );
    let srgb: Srgb<f32> = hsv.into_color();
    srgb_to_array(srgb)
}

// ------------------------------------------------------------
// RGB <-> LAB
// ------------------------------------------------------------

pub fn rgb_to_lab(rgb: [u8; 3]) -> [u8; 3] {
    let srgb: Srgb<f32> = Srgb::new(rgb[0], rgb[1], rgb[2]).into_format();
    let lab = Lab::from_color(srgb);
    [
        (lab.l * 255.0 / 100.0).round().clamp(0.0, 255.0) as u8,
        (lab.a + 128.0).round().clamp(0.0, 255.0) as u8,
        (lab.b + 128.0).round().clamp(0.0, 255.0) as u8,
    ]
}

/// Inverse of [`rgb_to_lab`]. Out-of-gamut results are clamped to sRGB.
pub fn lab_to_rgb(lab: [u8; 3]) -> [u8; 3] {
    srgb_to_array(Srgb::from_color(decode_lab(lab)))
}

/// Expand an 8-bit LAB triple into `palette`'s native units.
pub fn decode_lab(lab: [u8; 3]) -> Lab {
    Lab::new(
        lab[0] as f32 * 100.0 / 255.0,
        lab[1] as f32 - 128.0,
        lab[2] as f32 - 128.0,
    )
}

// ------------------------------------------------------------
// Buffer forms
// ------------------------------------------------------------

pub fn rgb_to_hsv_buffer(pixels: &[[u8; 3]]) -> Vec<[u8; 3]> {
    pixels.iter().map(|&p| rgb_to_hsv(p)).collect()
}

pub fn hsv_to_rgb_buffer(pixels: &[[u8; 3]]) -> Vec<[u8; 3]> {
    pixels.iter().map(|&p| hsv_to_rgb(p)).collect()
}

pub fn rgb_to_lab_buffer(pixels: &[[u8; 3]]) -> Vec<[u8; 3]> {
    pixels.iter().map(|&p| rgb_to_lab(p)).collect()
}

pub fn lab_to_rgb_buffer(pixels: &[[u8; 3]]) -> Vec<[u8; 3]> {
    pixels.iter().map(|&p| lab_to_rgb(p)).collect()
}

// ------------------------------------------------------------
// Helpers
// ------------------------------------------------------------

/// Drop the fractional part of each channel, saturating at the u8 bounds.
#[inline]
pub fn truncate_channels(values: [f64; 3]) -> [u8; 3] {
    values.map(|v| v.clamp(0.0, 255.0) as u8)
}

/// Lowercase `#rrggbb`.
pub fn to_hex(rgb: [u8; 3]) -> String {
    format!("#{:02x}{:02x}{:02x}", rgb[0], rgb[1], rgb[2])
}

/// Parse `#rrggbb` or `rrggbb`, any case.
pub fn parse_hex(s: &str) -> Result<[u8; 3]> {
    let hex = s.trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return Err(PaletteError::InvalidHex(s.to_string()));
    }
    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&hex[range], 16).map_err(|_| PaletteError::InvalidHex(s.to_string()))
    };
    Ok([channel(0..2)?, channel(2..4)?, channel(4..6)?])
}

#[inline]
fn unit_to_u8(v: f32) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

fn srgb_to_array(srgb: Srgb<f32>) -> [u8; 3] {
    [
        unit_to_u8(srgb.red),
        unit_to_u8(srgb.green),
        unit_to_u8(srgb.blue),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hsv_primaries() {
        assert_eq!(rgb_to_hsv([255, 0, 0]), [0, 255, 255]);
        assert_eq!(rgb_to_hsv([0, 255, 0]), [60, 255, 255]);
        assert_eq!(rgb_to_hsv([0, 0, 255]), [120, 255, 255]);
        assert_eq!(rgb_to_hsv([255, 255, 0]), [30, 255, 255]);
    }

    #[test]
    fn test_hsv_gray_has_no_saturation() {
        let hsv = rgb_to_hsv([128, 128, 128]);
        assert_eq!(hsv[1], 0);
        assert_eq!(hsv[2], 128);
    }

    #[test]
    fn test_hue_stays_below_180() {
        // Hue just under 360 degrees rounds to 180 and must wrap.
        let hsv = rgb_to_hsv([255, 0, 1]);
        assert!(hsv[0] < 180);
    }

    #[test]
    fn test_hsv_to_rgb_primaries() {
        assert_eq!(hsv_to_rgb([0, 255, 255]), [255, 0, 0]);
        assert_eq!(hsv_to_rgb([60, 255, 255]), [0, 255, 0]);
        assert_eq!(hsv_to_rgb([120, 255, 255]), [0, 0, 255]);
        assert_eq!(hsv_to_rgb([0, 0, 200]), [200, 200, 200]);
    }

    #[test]
    fn test_lab_black_and_white() {
        assert_eq!(rgb_to_lab([0, 0, 0]), [0, 128, 128]);
        let white = rgb_to_lab([255, 255, 255]);
        assert_eq!(white[0], 255);
        assert!((white[1] as i32 - 128).abs() <= 1);
        assert!((white[2] as i32 - 128).abs() <= 1);
    }

    #[test]
    fn test_lab_round_trip_drift_is_small() {
        // 8-bit LAB quantization moves dark channels by several values.
        for rgb in [[255, 0, 0], [12, 200, 80], [90, 90, 250], [240, 230, 10]] {
            let back = lab_to_rgb(rgb_to_lab(rgb));
            for c in 0..3 {
                assert!(
                    (back[c] as i32 - rgb[c] as i32).abs() <= 8,
                    "{rgb:?} -> {back:?}"
                );
            }
        }
        assert_eq!(lab_to_rgb(rgb_to_lab([12, 200, 80])), [19, 200, 79]);
    }

    #[test]
    fn test_buffers_preserve_length() {
        let pixels = vec![[1, 2, 3], [200, 100, 50], [0, 0, 0]];
        assert_eq!(rgb_to_hsv_buffer(&pixels).len(), 3);
        assert_eq!(hsv_to_rgb_buffer(&pixels).len(), 3);
        assert_eq!(rgb_to_lab_buffer(&pixels).len(), 3);
        assert_eq!(lab_to_rgb_buffer(&pixels).len(), 3);
    }

    #[test]
    fn test_truncate_channels() {
        assert_eq!(truncate_channels([12.99, 0.5, 254.999]), [12, 0, 254]);
        assert_eq!(truncate_channels([-3.0, 300.0, 7.0]), [0, 255, 7]);
    }

    #[test]
    fn test_hex() {
        assert_eq!(to_hex([255, 0, 0]), "#ff0000");
        assert_eq!(to_hex([1, 171, 205]), "#01abcd");
        assert_eq!(parse_hex("#01ABcd").unwrap(), [1, 171, 205]);
        assert_eq!(parse_hex("ff0000").unwrap(), [255, 0, 0]);
        assert!(parse_hex("#ff00").is_err());
        assert!(parse_hex("#gg0000").is_err());
    }
}
