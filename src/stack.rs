//! Stacks of planes sharing one spatial grid.
//!
//! Real fields usually carry leading dimensions (time, realization,
//! percentile) over the same (y, x) grid. The filters are strictly 2D,
//! so a stack holds one plane per leading index together with its
//! optional mask and fans the filter out over the planes with rayon.
//! Planes are independent, which makes the fan-out embarrassingly
//! parallel.

use crate::grid::{GridValue, Mask, Plane};
use crate::nbhood::{neighbourhood_average, NeighbourhoodConfig};
use crate::recursive::{recursive_smooth, SmootherConfig};
use crate::{Float, GridError, Result};
use rayon::prelude::*;

/// A set of same-shaped planes with per-plane validity masks.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldStack<T = Float> {
    planes: Vec<Plane<T>>,
    masks: Vec<Option<Mask>>,
}

impl<T: GridValue> FieldStack<T> {
    /// Stack of unmasked planes. Errors on an empty set or on planes of
    /// differing shapes.
    pub fn new(planes: Vec<Plane<T>>) -> Result<FieldStack<T>> {
        let masks = vec![None; planes.len()];
        FieldStack::with_masks(planes, masks)
    }

    /// Stack with one optional mask per plane.
    pub fn with_masks(planes: Vec<Plane<T>>, masks: Vec<Option<Mask>>) -> Result<FieldStack<T>> {
        let first = match planes.first() {
            Some(p) => p.shape(),
            None => return Err(GridError::EmptyStack),
        };
        for plane in &planes[1..] {
            if plane.shape() != first {
                return Err(GridError::PlaneShapeMismatch {
                    expected: first,
                    found: plane.shape(),
                });
            }
        }
        assert_eq!(planes.len(), masks.len());
        for mask in masks.iter().flatten() {
            if mask.shape() != first {
                return Err(GridError::MaskShapeMismatch {
                    expected: first,
                    found: mask.shape(),
                });
            }
        }
        Ok(FieldStack { planes, masks })
    }

    pub fn len(&self) -> usize {
        self.planes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.planes.is_empty()
    }

    /// Shape shared by every plane in the stack.
    pub fn shape(&self) -> (usize, usize) {
        self.planes[0].shape()
    }

    pub fn plane(&self, i: usize) -> &Plane<T> {
        &self.planes[i]
    }

    pub fn mask(&self, i: usize) -> Option<&Mask> {
        self.masks[i].as_ref()
    }

    pub fn into_parts(self) -> (Vec<Plane<T>>, Vec<Option<Mask>>) {
        (self.planes, self.masks)
    }

    /// Apply [`neighbourhood_average`] to every plane in parallel.
    pub fn neighbourhood_average_all(
        &self,
        spacing: Float,
        config: &NeighbourhoodConfig,
    ) -> Result<FieldStack<T>> {
        let filtered: Vec<(Plane<T>, Mask)> = self
            .planes
            .par_iter()
            .zip(self.masks.par_iter())
            .map(|(plane, mask)| neighbourhood_average(plane, mask.as_ref(), spacing, config))
            .collect::<Result<_>>()?;
        Ok(Self::from_filtered(filtered))
    }

    /// Apply [`recursive_smooth`] to every plane in parallel. Scalar
    /// alphas come from `config`; spatially varying coefficient fields
    /// are shared across the stack.
    pub fn recursive_smooth_all(
        &self,
        config: &SmootherConfig,
        alphas_x: Option<&Plane<Float>>,
        alphas_y: Option<&Plane<Float>>,
    ) -> Result<FieldStack<T>> {
        let filtered: Vec<(Plane<T>, Mask)> = self
            .planes
            .par_iter()
            .zip(self.masks.par_iter())
            .map(|(plane, mask)| recursive_smooth(plane, mask.as_ref(), config, alphas_x, alphas_y))
            .collect::<Result<_>>()?;
        Ok(Self::from_filtered(filtered))
    }

    fn from_filtered(filtered: Vec<(Plane<T>, Mask)>) -> FieldStack<T> {
        let mut planes = Vec::with_capacity(filtered.len());
        let mut masks = Vec::with_capacity(filtered.len());
        for (plane, mask) in filtered {
            masks.push(if mask.any() { Some(mask) } else { None });
            planes.push(plane);
        }
        FieldStack { planes, masks }
    }
}
