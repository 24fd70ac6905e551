//! Speckle infilling for radar precipitation-rate composites.
//!
//! Radar composites arrive with small holes where individual scans were
//! rejected. Holes only a few cells wide ("speckle") are filled by
//! interpolation from their surroundings; genuinely unobserved regions
//! are left masked. Interpolation happens in log10(rate) space because
//! rain rates are closer to log-normal than normal. Rates at or below a
//! drizzle threshold have no finite log rate, so a single dry valid
//! neighbour forces the whole window to fill dry; radar encodes trace
//! rain as 0.03 mm/h, so real wet data never sits below the threshold.

use crate::grid::{invalid_cells, Mask, Plane};
use crate::{Float, Result};
use log::debug;

/// Window radius, in cells, used to judge whether a hole is speckle.
const SPECKLE_RADIUS: usize = 4;

/// A masked cell is speckle only if less than this fraction of its
/// window is masked.
const SPECKLE_FRACTION: Float = 0.3;

/// Window radius, in cells, of the interpolation mean.
const INTERP_RADIUS: usize = 2;

/// Rates at or below this (mm/h) count as dry.
const MIN_RATE_MMH: Float = 0.001;

/// Masked cells surrounded mostly by valid data.
fn find_speckle(invalid: &Mask) -> Mask {
    let (rows, cols) = invalid.shape();
    let mut speckle = Mask::none(rows, cols);
    for i in 0..rows {
        let i0 = i.saturating_sub(SPECKLE_RADIUS);
        let i1 = (i + SPECKLE_RADIUS).min(rows - 1);
        for j in 0..cols {
            if !invalid.is_masked(i, j) {
                continue;
            }
            let j0 = j.saturating_sub(SPECKLE_RADIUS);
            let j1 = (j + SPECKLE_RADIUS).min(cols - 1);
            let mut masked = 0usize;
            for wi in i0..=i1 {
                for wj in j0..=j1 {
                    if invalid.is_masked(wi, wj) {
                        masked += 1;
                    }
                }
            }
            let cells = (i1 - i0 + 1) * (j1 - j0 + 1);
            if (masked as Float) < SPECKLE_FRACTION * cells as Float {
                speckle.set(i, j, true);
            }
        }
    }
    speckle
}

/// Log-space mean of the valid cells in the interpolation window,
/// back-transformed to a rate. Any valid dry cell in the window, or a
/// window with no valid cell at all, fills dry.
fn interpolate(rates: &Plane<Float>, invalid: &Mask, i: usize, j: usize) -> Float {
    let (rows, cols) = rates.shape();
    let i0 = i.saturating_sub(INTERP_RADIUS);
    let i1 = (i + INTERP_RADIUS).min(rows - 1);
    let j0 = j.saturating_sub(INTERP_RADIUS);
    let j1 = (j + INTERP_RADIUS).min(cols - 1);
    let mut sum = 0.0;
    let mut n = 0u32;
    for wi in i0..=i1 {
        for wj in j0..=j1 {
            if invalid.is_masked(wi, wj) {
                continue;
            }
            let rate = rates.at(wi, wj);
            if rate <= MIN_RATE_MMH {
                return 0.0;
            }
            sum += rate.log10();
            n += 1;
        }
    }
    if n == 0 {
        0.0
    } else {
        (10.0 as Float).powf(sum / n as Float)
    }
}

/// Fill speckle holes in a precipitation-rate plane (mm/h).
///
/// Each speckle cell takes the geometric mean of the wet valid cells in
/// its interpolation window, or zero rate where a dry valid cell sits
/// in the window. Filled cells come back unmasked. Larger holes, and
/// every valid cell, pass through untouched.
pub fn fill_radar_holes(rates: &Plane<Float>, mask: &Mask) -> Result<(Plane<Float>, Mask)> {
    let invalid = invalid_cells(rates, Some(mask))?;
    let speckle = find_speckle(&invalid);
    let (rows, cols) = rates.shape();
    debug!(
        "fill_radar_holes: {} speckle cells in {}x{} composite",
        speckle.data().iter().filter(|&&s| s).count(),
        rows,
        cols
    );

    let mut out = rates.clone();
    let mut out_mask = mask.clone();
    for i in 0..rows {
        for j in 0..cols {
            if !speckle.is_masked(i, j) {
                continue;
            }
            out.set(i, j, interpolate(rates, &invalid, i, j));
            out_mask.set(i, j, false);
        }
    }
    Ok((out, out_mask))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn uniform_with_hole(rate: Float) -> (Plane<Float>, Mask) {
        let plane = Plane::filled(12, 12, rate);
        let mut mask = Mask::none(12, 12);
        mask.set(5, 5, true);
        (plane, mask)
    }

    #[test]
    fn single_cell_hole_is_filled_and_unmasked() {
        let (plane, mask) = uniform_with_hole(1.0);
        let (out, out_mask) = fill_radar_holes(&plane, &mask).unwrap();
        assert_relative_eq!(out.at(5, 5), 1.0, epsilon = 1e-5);
        assert!(!out_mask.any());
    }

    #[test]
    fn fill_happens_in_log_space() {
        let (mut plane, mask) = uniform_with_hole(1.0);
        // half the interpolation window at 10 mm/h: the log-space mean
        // is the geometric, not arithmetic, mean
        for i in 3..=7 {
            for j in 6..=7 {
                plane.set(i, j, 10.0);
            }
        }
        let (out, _) = fill_radar_holes(&plane, &mask).unwrap();
        let expected = (10.0 as Float).powf(10.0 / 24.0);
        assert_relative_eq!(out.at(5, 5), expected, epsilon = 1e-4);
    }

    #[test]
    fn one_dry_neighbour_forces_a_dry_fill() {
        let (mut plane, mask) = uniform_with_hole(1.0);
        plane.set(5, 6, 0.0);
        let (out, out_mask) = fill_radar_holes(&plane, &mask).unwrap();
        assert_relative_eq!(out.at(5, 5), 0.0);
        assert!(!out_mask.is_masked(5, 5));
        // the dry cell itself is valid data and passes through
        assert_relative_eq!(out.at(5, 6), 0.0);
    }

    #[test]
    fn dry_cell_outside_the_window_does_not_dry_the_fill() {
        let (mut plane, mask) = uniform_with_hole(1.0);
        plane.set(5, 8, 0.0);
        let (out, _) = fill_radar_holes(&plane, &mask).unwrap();
        assert_relative_eq!(out.at(5, 5), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn dry_surroundings_fill_with_zero_rate() {
        let (plane, mask) = uniform_with_hole(0.0005);
        let (out, out_mask) = fill_radar_holes(&plane, &mask).unwrap();
        assert_relative_eq!(out.at(5, 5), 0.0);
        assert!(!out_mask.is_masked(5, 5));
    }

    #[test]
    fn large_holes_stay_masked() {
        let plane: Plane<Float> = Plane::filled(12, 12, 1.0);
        let mut mask = Mask::none(12, 12);
        for i in 2..9 {
            for j in 2..9 {
                mask.set(i, j, true);
            }
        }
        let (out, out_mask) = fill_radar_holes(&plane, &mask).unwrap();
        assert_eq!(out_mask, mask);
        assert_eq!(out, plane);
    }

    #[test]
    fn nan_holes_are_treated_like_masked_holes() {
        let mut plane: Plane<Float> = Plane::filled(12, 12, 1.0);
        plane.set(5, 5, Float::NAN);
        let mask = Mask::none(12, 12);
        let (out, out_mask) = fill_radar_holes(&plane, &mask).unwrap();
        assert_relative_eq!(out.at(5, 5), 1.0, epsilon = 1e-5);
        assert!(!out_mask.any());
    }

    #[test]
    fn border_holes_are_filled_from_clamped_windows() {
        let plane: Plane<Float> = Plane::filled(12, 12, 1.0);
        let mut mask = Mask::none(12, 12);
        mask.set(0, 0, true);
        let (out, out_mask) = fill_radar_holes(&plane, &mask).unwrap();
        assert_relative_eq!(out.at(0, 0), 1.0, epsilon = 1e-5);
        assert!(!out_mask.any());
    }
}
