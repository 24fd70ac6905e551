//! Square-kernel neighbourhood averaging.
//!
//! For every cell the filter inspects the square window of side `2r+1`
//! centred on it and reports the sum, mean or valid-data fraction of the
//! window. Invalid neighbours (masked or NaN) contribute to neither the
//! sum nor the count; positions beyond the plane boundary contribute to
//! neither either. The window sums come from a summed-area table, so the
//! cost is O(rows * cols) regardless of the radius.

use crate::grid::{invalid_cells, GridValue, Mask, Plane};
use crate::{radius_in_cells, Float, GridError, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Normalisation applied to each cell's window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Unweighted sum of the valid neighbours.
    Sum,
    /// Sum divided by the count of valid neighbours.
    Mean,
    /// Count of valid neighbours divided by the in-bounds window size.
    Fraction,
}

impl FromStr for Mode {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Mode> {
        match s {
            "sum" => Ok(Mode::Sum),
            "mean" => Ok(Mode::Mean),
            "fraction" => Ok(Mode::Fraction),
            other => Err(GridError::InvalidMode(other.to_string())),
        }
    }
}

/// Per-call options for [`neighbourhood_average`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NeighbourhoodConfig {
    /// Physical search radius, in the same unit as the grid spacing.
    pub radius: Float,
    pub mode: Mode,
    /// Mask cells whose window held no valid neighbour; when false such
    /// cells carry a NaN (mean) or zero (sum/fraction) and stay
    /// unmasked.
    pub re_mask: bool,
}

/// Summed-area tables over the valid cells of a plane: one for the cell
/// values (invalid cells contribute zero) and one for the valid count.
struct AreaTable<T> {
    sums: Vec<T>,
    counts: Vec<u32>,
    cols: usize,
}

impl<T: GridValue> AreaTable<T> {
    fn build(plane: &Plane<T>, invalid: &Mask) -> AreaTable<T> {
        let (rows, cols) = plane.shape();
        let w = cols + 1;
        let mut sums = vec![T::zero(); (rows + 1) * w];
        let mut counts = vec![0u32; (rows + 1) * w];
        for i in 0..rows {
            for j in 0..cols {
                let (v, c) = if invalid.is_masked(i, j) {
                    (T::zero(), 0)
                } else {
                    (plane.at(i, j), 1)
                };
                sums[(i + 1) * w + j + 1] =
                    v + sums[i * w + j + 1] + sums[(i + 1) * w + j] - sums[i * w + j];
                // subtract first so the intermediate never underflows
                counts[(i + 1) * w + j + 1] =
                    c + (counts[i * w + j + 1] - counts[i * w + j]) + counts[(i + 1) * w + j];
            }
        }
        AreaTable { sums, counts, cols }
    }

    /// Window sum, valid count and in-bounds cell count for the
    /// inclusive cell rectangle [i0, i1] x [j0, j1].
    #[inline]
    fn window(&self, i0: usize, i1: usize, j0: usize, j1: usize) -> (T, u32, u32) {
        let w = self.cols + 1;
        let sum = self.sums[(i1 + 1) * w + j1 + 1] + self.sums[i0 * w + j0]
            - self.sums[i0 * w + j1 + 1]
            - self.sums[(i1 + 1) * w + j0];
        let count = (self.counts[(i1 + 1) * w + j1 + 1] - self.counts[i0 * w + j1 + 1])
            + self.counts[i0 * w + j0]
            - self.counts[(i1 + 1) * w + j0];
        let cells = ((i1 - i0 + 1) * (j1 - j0 + 1)) as u32;
        (sum, count, cells)
    }
}

/// Average (or sum, or valid-fraction) every cell's square
/// neighbourhood, excluding invalid cells from both numerator and
/// denominator.
///
/// `spacing` is the physical grid spacing used to turn `config.radius`
/// into a whole-cell radius. Returns the filtered plane and its output
/// mask; the inputs are untouched.
///
/// A masked cell's own output is still computed from its valid
/// neighbours; a NaN-valued cell's own output stays NaN.
pub fn neighbourhood_average<T: GridValue>(
    plane: &Plane<T>,
    mask: Option<&Mask>,
    spacing: Float,
    config: &NeighbourhoodConfig,
) -> Result<(Plane<T>, Mask)> {
    let r = radius_in_cells(config.radius, spacing)?;
    let invalid = invalid_cells(plane, mask)?;
    let (rows, cols) = plane.shape();
    debug!(
        "neighbourhood_average: {}x{} plane, radius {} cells, mode {:?}",
        rows, cols, r, config.mode
    );

    let table = AreaTable::build(plane, &invalid);
    let mut out = Plane::zeros(rows, cols);
    let mut out_mask = Mask::none(rows, cols);

    for i in 0..rows {
        let i0 = i.saturating_sub(r);
        let i1 = (i + r).min(rows - 1);
        for j in 0..cols {
            let j0 = j.saturating_sub(r);
            let j1 = (j + r).min(cols - 1);
            let (sum, count, cells) = table.window(i0, i1, j0, j1);
            let value = match config.mode {
                Mode::Sum => sum,
                Mode::Mean => {
                    if count > 0 {
                        sum / count as Float
                    } else {
                        T::invalid()
                    }
                }
                Mode::Fraction => T::from_float(count as Float / cells as Float),
            };
            out.set(i, j, value);
            if config.re_mask && (invalid.is_masked(i, j) || count == 0) {
                out_mask.set(i, j, true);
            }
        }
    }

    // A NaN payload marks a cell for which no value exists at all; its
    // own output position stays NaN whatever the window held.
    for (o, &v) in out.data_mut().iter_mut().zip(plane.data().iter()) {
        if v.is_invalid() {
            *o = T::invalid();
        }
    }

    Ok((out, out_mask))
}
