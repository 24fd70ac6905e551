//! Halo padding around a plane.
//!
//! Windowed and recursive operations misbehave at the grid edge if the
//! buffer simply stops there. Padding the plane with a halo of
//! replicated boundary values gives every cell a physically plausible
//! neighbourhood; the halo is stripped again once the operation is done.

use crate::grid::{GridValue, Mask, Plane};
use crate::{GridError, Result};

/// Pad a plane with `halo_y` extra rows above and below and `halo_x`
/// extra columns left and right, replicating the nearest real-grid
/// value into the halo. Returns a new plane; the input is untouched.
pub fn pad_with_halo<T: GridValue>(
    plane: &Plane<T>,
    halo_y: usize,
    halo_x: usize,
) -> Result<Plane<T>> {
    if halo_y == 0 || halo_x == 0 {
        return Err(GridError::InvalidHalo { halo_y, halo_x });
    }
    let (rows, cols) = plane.shape();
    let mut out = Plane::zeros(rows + 2 * halo_y, cols + 2 * halo_x);
    for i in 0..rows + 2 * halo_y {
        // clamp to the nearest real row/column
        let si = i.saturating_sub(halo_y).min(rows - 1);
        for j in 0..cols + 2 * halo_x {
            let sj = j.saturating_sub(halo_x).min(cols - 1);
            out.set(i, j, plane.at(si, sj));
        }
    }
    Ok(out)
}

/// Remove a halo of `halo_y` rows and `halo_x` columns from each side.
/// Inverse of [`pad_with_halo`] for matching halo sizes.
pub fn strip_halo<T: GridValue>(
    plane: &Plane<T>,
    halo_y: usize,
    halo_x: usize,
) -> Result<Plane<T>> {
    if halo_y == 0 || halo_x == 0 {
        return Err(GridError::InvalidHalo { halo_y, halo_x });
    }
    let (rows, cols) = plane.shape();
    if 2 * halo_y >= rows || 2 * halo_x >= cols {
        return Err(GridError::HaloTooLarge {
            halo_y,
            halo_x,
            rows,
            cols,
        });
    }
    let mut out = Plane::zeros(rows - 2 * halo_y, cols - 2 * halo_x);
    for i in 0..rows - 2 * halo_y {
        for j in 0..cols - 2 * halo_x {
            out.set(i, j, plane.at(i + halo_y, j + halo_x));
        }
    }
    Ok(out)
}

/// Pad a validity mask the same way values are padded: halo cells
/// inherit the validity of the nearest real cell.
pub fn pad_mask(mask: &Mask, halo_y: usize, halo_x: usize) -> Result<Mask> {
    if halo_y == 0 || halo_x == 0 {
        return Err(GridError::InvalidHalo { halo_y, halo_x });
    }
    let (rows, cols) = mask.shape();
    let mut out = Mask::none(rows + 2 * halo_y, cols + 2 * halo_x);
    for i in 0..rows + 2 * halo_y {
        let si = i.saturating_sub(halo_y).min(rows - 1);
        for j in 0..cols + 2 * halo_x {
            let sj = j.saturating_sub(halo_x).min(cols - 1);
            out.set(i, j, mask.is_masked(si, sj));
        }
    }
    Ok(out)
}
