use serde::Serialize;

use crate::color::to_hex;

/// One representative color and the share of sampled pixels it stands for.
///
/// `hex` is always derived from `rgb`, so both are only set through [`Swatch::new`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Swatch {
    rgb: [u8; 3],
    hex: String,
    proportion: f64,
    label: Option<String>,
}

impl Swatch {
    pub fn new(rgb: [u8; 3], proportion: f64) -> Self {
        Self {
            rgb,
            hex: to_hex(rgb),
            proportion,
            label: None,
        }
    }

    /// Attach caller annotation. The extractors never set one.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn rgb(&self) -> [u8; 3] {
        self.rgb
    }

    pub fn hex(&self) -> &str {
        &self.hex
    }

    pub fn proportion(&self) -> f64 {
        self.proportion
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

/// Stable sort, largest proportion first.
pub fn sort_by_proportion(swatches: &mut [Swatch]) {
    swatches.sort_by(|a, b| b.proportion.total_cmp(&a.proportion));
}

/// Serialize a palette as a JSON array.
pub fn swatches_to_json(swatches: &[Swatch]) -> serde_json::Result<String> {
    serde_json::to_string(swatches)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_follows_rgb() {
        let swatch = Swatch::new([255, 0, 0], 1.0);
        assert_eq!(swatch.hex(), "#ff0000");
        assert_eq!(swatch.label(), None);
    }

    #[test]
    fn test_sort_is_descending_and_stable() {
        let mut swatches = vec![
            Swatch::new([1, 1, 1], 0.2),
            Swatch::new([2, 2, 2], 0.5),
            Swatch::new([3, 3, 3], 0.2),
            Swatch::new([4, 4, 4], 0.1),
        ];
        sort_by_proportion(&mut swatches);
        let order: Vec<u8> = swatches.iter().map(|s| s.rgb()[0]).collect();
        assert_eq!(order, vec![2, 1, 3, 4]);
    }

    #[test]
    fn test_json_shape() {
        let swatches = vec![
            Swatch::new([255, 0, 0], 0.75),
            Swatch::new([0, 0, 255], 0.25).with_label("sky"),
        ];
        let json = swatches_to_json(&swatches).unwrap();
        assert_eq!(
            json,
            r##"[{"rgb":[255,0,0],"hex":"#ff0000","proportion":0.75,"label":null},{"rgb":[0,0,255],"hex":"#0000ff","proportion":0.25,"label":"sky"}]"##
        );
    }
}
