//! Two-directional recursive smoothing.
//!
//! A separable exponential filter: a forward then a backward recursive
//! pass along x, then the same along y, repeated for a configurable
//! number of iterations. The backward pass consumes the forward result
//! and removes the directional lag a single pass would leave behind.
//!
//! Smoothing strength comes from a per-cell decay coefficient alpha in
//! (0, 1) per direction, supplied either as one scalar or as a full
//! field matching the unpadded grid. The plane is padded with a halo of
//! `2 * edge_width` replicated cells before the passes and stripped
//! afterwards, so the recursion warms up on plausible values instead of
//! the grid edge.
//!
//! Missing data never enters the recursion directly: the filter runs on
//! a value channel (invalid cells zeroed) and a weight channel (1 valid,
//! 0 invalid) and renormalises value by weight at the end. Substituting
//! zeros without the weight channel would drag every smoothed value near
//! a gap toward zero.

use crate::grid::halo::{pad_with_halo, strip_halo};
use crate::grid::{invalid_cells, GridValue, Mask, Plane};
use crate::{Axis, Float, GridError, Result};
use itertools::izip;
use log::debug;
use serde::{Deserialize, Serialize};

/// Per-call options for [`recursive_smooth`].
///
/// Exactly one of the scalar `alpha_*` here and the `alphas_*` field
/// argument of [`recursive_smooth`] must be given per direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SmootherConfig {
    pub alpha_x: Option<Float>,
    pub alpha_y: Option<Float>,
    pub iterations: usize,
    pub edge_width: usize,
}

impl SmootherConfig {
    /// Uniform smoothing in both directions.
    pub fn uniform(alpha_x: Float, alpha_y: Float, iterations: usize) -> SmootherConfig {
        SmootherConfig {
            alpha_x: Some(alpha_x),
            alpha_y: Some(alpha_y),
            iterations,
            edge_width: 1,
        }
    }

    /// Spatially varying coefficients supplied as fields.
    pub fn from_fields(iterations: usize) -> SmootherConfig {
        SmootherConfig {
            alpha_x: None,
            alpha_y: None,
            iterations,
            edge_width: 1,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.iterations < 1 {
            return Err(GridError::InvalidIterations(self.iterations));
        }
        if self.edge_width < 1 {
            return Err(GridError::InvalidEdgeWidth(self.edge_width));
        }
        Ok(())
    }
}

/// Resolve the decay coefficients for one direction into a field at the
/// padded grid shape.
///
/// A scalar is broadcast to every cell, halo included. A field must
/// match the unpadded data shape and is edge-replication padded, so the
/// halo inherits the boundary's smoothing strength. Every coefficient
/// must lie strictly inside (0, 1).
pub fn set_alphas(
    data_shape: (usize, usize),
    axis: Axis,
    alpha: Option<Float>,
    alphas: Option<&Plane<Float>>,
    edge_width: usize,
) -> Result<Plane<Float>> {
    let halo = 2 * edge_width;
    match (alpha, alphas) {
        (Some(_), Some(_)) => Err(GridError::AlphaOverSpecified { axis }),
        (None, None) => Err(GridError::AlphaUnset { axis }),
        (Some(a), None) => {
            if !(a > 0.0 && a < 1.0) {
                return Err(GridError::InvalidAlpha { axis, value: a });
            }
            let (rows, cols) = data_shape;
            Ok(Plane::filled(rows + 2 * halo, cols + 2 * halo, a))
        }
        (None, Some(field)) => {
            if field.shape() != data_shape {
                return Err(GridError::AlphaShapeMismatch {
                    axis,
                    expected: data_shape,
                    found: field.shape(),
                });
            }
            for &a in field.data() {
                if !(a > 0.0 && a < 1.0) {
                    return Err(GridError::InvalidAlpha { axis, value: a });
                }
            }
            pad_with_halo(field, halo, halo)
        }
    }
}

/// One forward recursive pass along `axis`, independently for every
/// line orthogonal to it: `out[0] = in[0]`,
/// `out[i] = (1 - a[i]) * in[i] + a[i] * out[i-1]`.
pub fn recurse_forward<T: GridValue>(grid: &Plane<T>, alphas: &Plane<Float>, axis: Axis) -> Plane<T> {
    if !cfg!(feature = "unchecked") {
        assert_eq!(grid.shape(), alphas.shape());
    }
    let (rows, cols) = grid.shape();
    let mut out = grid.clone();
    match axis {
        Axis::Y => {
            for i in 1..rows {
                for j in 0..cols {
                    let a = alphas.at(i, j);
                    let v = out.at(i, j) * (1.0 - a) + out.at(i - 1, j) * a;
                    out.set(i, j, v);
                }
            }
        }
        Axis::X => {
            for i in 0..rows {
                for j in 1..cols {
                    let a = alphas.at(i, j);
                    let v = out.at(i, j) * (1.0 - a) + out.at(i, j - 1) * a;
                    out.set(i, j, v);
                }
            }
        }
    }
    out
}

/// Mirror of [`recurse_forward`], scanning from the far end.
pub fn recurse_backward<T: GridValue>(
    grid: &Plane<T>,
    alphas: &Plane<Float>,
    axis: Axis,
) -> Plane<T> {
    if !cfg!(feature = "unchecked") {
        assert_eq!(grid.shape(), alphas.shape());
    }
    let (rows, cols) = grid.shape();
    let mut out = grid.clone();
    match axis {
        Axis::Y => {
            for i in (0..rows.saturating_sub(1)).rev() {
                for j in 0..cols {
                    let a = alphas.at(i, j);
                    let v = out.at(i, j) * (1.0 - a) + out.at(i + 1, j) * a;
                    out.set(i, j, v);
                }
            }
        }
        Axis::X => {
            for i in 0..rows {
                for j in (0..cols.saturating_sub(1)).rev() {
                    let a = alphas.at(i, j);
                    let v = out.at(i, j) * (1.0 - a) + out.at(i, j + 1) * a;
                    out.set(i, j, v);
                }
            }
        }
    }
    out
}

/// Run the full recursion on an already padded plane: forward/backward
/// along x, forward/backward along y, `iterations` times over.
pub fn run_recursion<T: GridValue>(
    padded: &Plane<T>,
    alphas_x: &Plane<Float>,
    alphas_y: &Plane<Float>,
    iterations: usize,
) -> Plane<T> {
    let mut out = padded.clone();
    for _ in 0..iterations {
        out = recurse_forward(&out, alphas_x, Axis::X);
        out = recurse_backward(&out, alphas_x, Axis::X);
        out = recurse_forward(&out, alphas_y, Axis::Y);
        out = recurse_backward(&out, alphas_y, Axis::Y);
    }
    out
}

/// Smooth a plane with the two-directional recursive filter.
///
/// Returns the smoothed plane and its output mask. Cells invalid on
/// input stay invalid on output: masked cells are masked, NaN cells are
/// NaN. Valid cells near a gap are renormalised through the weight
/// channel rather than biased toward zero. A cell whose weight smooths
/// to exactly zero (no valid data anywhere in reach) comes back invalid;
/// that is a soft degeneracy, not an error.
pub fn recursive_smooth<T: GridValue>(
    plane: &Plane<T>,
    mask: Option<&Mask>,
    config: &SmootherConfig,
    alphas_x: Option<&Plane<Float>>,
    alphas_y: Option<&Plane<Float>>,
) -> Result<(Plane<T>, Mask)> {
    config.validate()?;
    let ax = set_alphas(plane.shape(), Axis::X, config.alpha_x, alphas_x, config.edge_width)?;
    let ay = set_alphas(plane.shape(), Axis::Y, config.alpha_y, alphas_y, config.edge_width)?;
    let invalid = invalid_cells(plane, mask)?;
    let (rows, cols) = plane.shape();
    let halo = 2 * config.edge_width;
    debug!(
        "recursive_smooth: {}x{} plane, {} iterations, halo {}",
        rows, cols, config.iterations, halo
    );

    // value channel with gaps zeroed, weight channel carrying validity
    let mut values: Plane<T> = Plane::zeros(rows, cols);
    let mut weights: Plane<Float> = Plane::zeros(rows, cols);
    for i in 0..rows {
        for j in 0..cols {
            if !invalid.is_masked(i, j) {
                values.set(i, j, plane.at(i, j));
                weights.set(i, j, 1.0);
            }
        }
    }

    let padded_values = pad_with_halo(&values, halo, halo)?;
    let padded_weights = pad_with_halo(&weights, halo, halo)?;
    let smoothed_values = run_recursion(&padded_values, &ax, &ay, config.iterations);
    let smoothed_weights = run_recursion(&padded_weights, &ax, &ay, config.iterations);
    let values = strip_halo(&smoothed_values, halo, halo)?;
    let weights = strip_halo(&smoothed_weights, halo, halo)?;

    let mut out: Plane<T> = Plane::zeros(rows, cols);
    let mut out_mask = Mask::none(rows, cols);
    for (o, &v, &w) in izip!(out.data_mut().iter_mut(), values.data(), weights.data()) {
        *o = if w > 0.0 { v / w } else { T::invalid() };
    }
    for i in 0..rows {
        for j in 0..cols {
            if invalid.is_masked(i, j) {
                out_mask.set(i, j, true);
                if plane.at(i, j).is_invalid() {
                    out.set(i, j, T::invalid());
                }
            } else if !(weights.at(i, j) > 0.0) {
                out_mask.set(i, j, true);
            }
        }
    }

    Ok((out, out_mask))
}
