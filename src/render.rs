//! Proportional bar layout.
//!
//! Turns a sorted palette into runs of cells that fill an exact width. The
//! swatches are only read; the rounding fix-up is applied to the returned
//! runs.

use crate::error::{PaletteError, Result};
use crate::swatch::Swatch;

/// A run of `cells` consecutive cells painted `rgb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarSegment {
    pub rgb: [u8; 3],
    pub cells: usize,
}

/// Lay `swatches` out over `width` cells.
///
/// Each swatch gets `floor(width * proportion)` cells, and at least one if
/// its proportion is positive. Whatever is left over (or missing) after
/// rounding is settled on the last swatch with a positive proportion; if
/// the forced single cells overshoot `width`, the excess comes off the tail.
/// Swatches with proportion 0 never get a run. Unless every proportion is
/// 0, the runs add up to exactly `width`.
pub fn layout_bar(swatches: &[Swatch], width: usize) -> Result<Vec<BarSegment>> {
    if width == 0 {
        return Err(PaletteError::InvalidParameter {
            parameter: "width",
            value: "0".to_string(),
        });
    }

    let mut cells: Vec<usize> = swatches
        .iter()
        .map(|s| {
            let p = s.proportion();
            let n = (width as f64 * p).floor().max(0.0) as usize;
            if n == 0 && p > 0.0 { 1 } else { n }
        })
        .collect();

    if let Some(last) = swatches.iter().rposition(|s| s.proportion() > 0.0) {
        let assigned: usize = cells.iter().sum();
        if assigned < width {
            cells[last] += width - assigned;
        } else {
            let mut excess = assigned - width;
            for n in cells.iter_mut().rev() {
                if excess == 0 {
                    break;
                }
                let cut = excess.min(*n);
                *n -= cut;
                excess -= cut;
            }
        }
    }

    Ok(swatches
        .iter()
        .zip(cells)
        .filter(|(_, n)| *n > 0)
        .map(|(s, n)| BarSegment {
            rgb: s.rgb(),
            cells: n,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn total(segments: &[BarSegment]) -> usize {
        segments.iter().map(|s| s.cells).sum()
    }

    #[test]
    fn test_exact_split() {
        let swatches = vec![Swatch::new([1, 0, 0], 0.5), Swatch::new([2, 0, 0], 0.5)];
        let bar = layout_bar(&swatches, 10).unwrap();
        assert_eq!(
            bar,
            vec![
                BarSegment { rgb: [1, 0, 0], cells: 5 },
                BarSegment { rgb: [2, 0, 0], cells: 5 },
            ]
        );
    }

    #[test]
    fn test_rounding_goes_to_last_swatch() {
        let swatches = vec![
            Swatch::new([1, 0, 0], 0.34),
            Swatch::new([2, 0, 0], 0.33),
            Swatch::new([3, 0, 0], 0.33),
        ];
        let bar = layout_bar(&swatches, 10).unwrap();
        assert_eq!(bar.iter().map(|s| s.cells).collect::<Vec<_>>(), vec![3, 3, 4]);
    }

    #[test]
    fn test_tiny_swatch_gets_one_cell() {
        let swatches = vec![Swatch::new([1, 0, 0], 0.99), Swatch::new([2, 0, 0], 0.01)];
        let bar = layout_bar(&swatches, 20).unwrap();
        assert_eq!(bar.iter().map(|s| s.cells).collect::<Vec<_>>(), vec![19, 1]);
    }

    #[test]
    fn test_zero_proportion_has_no_run() {
        let swatches = vec![
            Swatch::new([1, 0, 0], 0.7),
            Swatch::new([2, 0, 0], 0.3),
            Swatch::new([3, 0, 0], 0.0),
        ];
        let bar = layout_bar(&swatches, 7).unwrap();
        assert_eq!(total(&bar), 7);
        assert!(bar.iter().all(|s| s.rgb != [3, 0, 0]));
    }

    #[test]
    fn test_overshoot_is_trimmed_from_tail() {
        let swatches: Vec<Swatch> = (0..5).map(|i| Swatch::new([i, 0, 0], 0.2)).collect();
        let bar = layout_bar(&swatches, 3).unwrap();
        assert_eq!(total(&bar), 3);
        assert_eq!(bar.iter().map(|s| s.rgb[0]).collect::<Vec<_>>(), vec![0, 1, 2]);
    }

    #[test]
    fn test_width_law_holds_across_widths() {
        let swatches = vec![
            Swatch::new([1, 0, 0], 0.41),
            Swatch::new([2, 0, 0], 0.27),
            Swatch::new([3, 0, 0], 0.18),
            Swatch::new([4, 0, 0], 0.09),
            Swatch::new([5, 0, 0], 0.05),
        ];
        for width in 1..=120 {
            assert_eq!(total(&layout_bar(&swatches, width).unwrap()), width, "width {width}");
        }
    }

    #[test]
    fn test_input_is_not_modified() {
        let swatches = vec![Swatch::new([1, 0, 0], 0.34), Swatch::new([2, 0, 0], 0.33)];
        let before = swatches.clone();
        layout_bar(&swatches, 10).unwrap();
        assert_eq!(swatches, before);
    }

    #[test]
    fn test_zero_width_is_rejected() {
        assert!(layout_bar(&[Swatch::new([0, 0, 0], 1.0)], 0).is_err());
    }

    #[test]
    fn test_empty_palette() {
        assert!(layout_bar(&[], 10).unwrap().is_empty());
    }
}
