//! Plane and mask containers plus the numeric trait the filters are
//! generic over.
//!
//! A `Plane` is a single 2D (y, x) slice of a gridded field, stored as a
//! flat row-major `Vec` for speed. Leading field dimensions (time,
//! realization) never appear here; see `crate::stack`.

pub mod halo;

use crate::{Float, GridError, Result};
use num_complex::Complex;
use num_traits::Zero;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Div, Mul, Sub};

/// One of the two spatial directions of a plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    /// Along a row (columns vary).
    X,
    /// Along a column (rows vary).
    Y,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
        }
    }
}

/// Cell values the filters can operate on: `Float` and `Complex<Float>`.
///
/// Windowed sums and the recursion only need addition, subtraction and
/// scaling by a real weight, so real and complex planes go through the
/// same code paths with no run-time type branching. "Invalid" is the NaN
/// payload of the type.
pub trait GridValue:
    Copy
    + Zero
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Float, Output = Self>
    + Div<Float, Output = Self>
    + PartialEq
    + fmt::Debug
    + Send
    + Sync
    + 'static
{
    fn from_float(v: Float) -> Self;
    /// The NaN payload used where no valid value can be produced.
    fn invalid() -> Self;
    /// True for NaN payloads (either component, for complex values).
    fn is_invalid(self) -> bool;
}

impl GridValue for Float {
    #[inline]
    fn from_float(v: Float) -> Self {
        v
    }
    #[inline]
    fn invalid() -> Self {
        Float::NAN
    }
    #[inline]
    fn is_invalid(self) -> bool {
        self.is_nan()
    }
}

impl GridValue for Complex<Float> {
    #[inline]
    fn from_float(v: Float) -> Self {
        Complex::new(v, 0.0)
    }
    #[inline]
    fn invalid() -> Self {
        Complex::new(Float::NAN, Float::NAN)
    }
    #[inline]
    fn is_invalid(self) -> bool {
        self.re.is_nan() || self.im.is_nan()
    }
}

/// A single 2D (y, x) slice of a gridded field.
///
/// Row-major flat storage; `rows` is the y extent, `cols` the x extent.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane<T = Float> {
    data: Vec<T>,
    rows: usize,
    cols: usize,
}

impl<T: GridValue> Plane<T> {
    /// All-zero plane.
    pub fn zeros(rows: usize, cols: usize) -> Plane<T> {
        Plane {
            data: vec![T::zero(); rows * cols],
            rows,
            cols,
        }
    }

    /// Plane filled with a single value.
    pub fn filled(rows: usize, cols: usize, value: T) -> Plane<T> {
        Plane {
            data: vec![value; rows * cols],
            rows,
            cols,
        }
    }

    /// Build from a flat row-major buffer.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<T>) -> Plane<T> {
        assert_eq!(data.len(), rows * cols);
        Plane { data, rows, cols }
    }

    /// Build from nested rows; handy for literal fixtures.
    pub fn from_rows(rows: &[Vec<T>]) -> Plane<T> {
        let ny = rows.len();
        let nx = rows.first().map_or(0, |r| r.len());
        let mut data = Vec::with_capacity(ny * nx);
        for row in rows {
            assert_eq!(row.len(), nx);
            data.extend_from_slice(row);
        }
        Plane {
            data,
            rows: ny,
            cols: nx,
        }
    }

    #[inline(always)]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline(always)]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline(always)]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    #[inline(always)]
    fn index(&self, row: usize, col: usize) -> usize {
        if !cfg!(feature = "unchecked") {
            assert!(row < self.rows && col < self.cols);
        }
        row * self.cols + col
    }

    #[inline(always)]
    pub fn at(&self, row: usize, col: usize) -> T {
        self.data[self.index(row, col)]
    }

    #[inline(always)]
    pub fn set(&mut self, row: usize, col: usize, value: T) {
        let i = self.index(row, col);
        self.data[i] = value;
    }

    /// Borrow one row as a slice.
    #[inline(always)]
    pub fn row(&self, row: usize) -> &[T] {
        let start = self.index(row, 0);
        &self.data[start..start + self.cols]
    }

    #[inline(always)]
    pub fn data(&self) -> &[T] {
        &self.data
    }

    #[inline(always)]
    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Error unless `other` has the same shape.
    pub fn check_same_shape<U: GridValue>(&self, other: &Plane<U>) -> Result<()> {
        if self.shape() != other.shape() {
            return Err(GridError::PlaneShapeMismatch {
                expected: self.shape(),
                found: other.shape(),
            });
        }
        Ok(())
    }
}

/// Validity mask for a plane: `true` marks an invalid cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Mask {
    data: Vec<bool>,
    rows: usize,
    cols: usize,
}

impl Mask {
    /// All-valid mask.
    pub fn none(rows: usize, cols: usize) -> Mask {
        Mask {
            data: vec![false; rows * cols],
            rows,
            cols,
        }
    }

    pub fn from_vec(rows: usize, cols: usize, data: Vec<bool>) -> Mask {
        assert_eq!(data.len(), rows * cols);
        Mask { data, rows, cols }
    }

    /// Build from nested rows of 0/1 flags (1 = invalid); mirrors how
    /// mask fixtures are usually written out.
    pub fn from_flags(rows: &[Vec<u8>]) -> Mask {
        let ny = rows.len();
        let nx = rows.first().map_or(0, |r| r.len());
        let mut data = Vec::with_capacity(ny * nx);
        for row in rows {
            assert_eq!(row.len(), nx);
            data.extend(row.iter().map(|&v| v != 0));
        }
        Mask {
            data,
            rows: ny,
            cols: nx,
        }
    }

    #[inline(always)]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline(always)]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline(always)]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    #[inline(always)]
    pub fn is_masked(&self, row: usize, col: usize) -> bool {
        if !cfg!(feature = "unchecked") {
            assert!(row < self.rows && col < self.cols);
        }
        self.data[row * self.cols + col]
    }

    #[inline(always)]
    pub fn set(&mut self, row: usize, col: usize, masked: bool) {
        if !cfg!(feature = "unchecked") {
            assert!(row < self.rows && col < self.cols);
        }
        self.data[row * self.cols + col] = masked;
    }

    #[inline(always)]
    pub fn data(&self) -> &[bool] {
        &self.data
    }

    /// True if any cell is masked.
    pub fn any(&self) -> bool {
        self.data.iter().any(|&m| m)
    }

    /// Cell-wise union with another mask of the same shape.
    pub fn union(&mut self, other: &Mask) {
        assert_eq!(self.shape(), other.shape());
        for (m, &o) in self.data.iter_mut().zip(other.data.iter()) {
            *m |= o;
        }
    }
}

/// Combined invalidity of a plane: the caller's mask (if any) unioned
/// with the plane's own NaN payloads. Masked and NaN cells are treated
/// identically by every filter.
pub fn invalid_cells<T: GridValue>(plane: &Plane<T>, mask: Option<&Mask>) -> Result<Mask> {
    if let Some(m) = mask {
        if m.shape() != plane.shape() {
            return Err(GridError::MaskShapeMismatch {
                expected: plane.shape(),
                found: m.shape(),
            });
        }
    }
    let mut out = Mask::none(plane.rows(), plane.cols());
    for (flag, &v) in out.data.iter_mut().zip(plane.data().iter()) {
        *flag = v.is_invalid();
    }
    if let Some(m) = mask {
        out.union(m);
    }
    Ok(out)
}

/// Uniformly spaced coordinate values along one axis.
///
/// `spacing` may be negative (descending coordinate axes occur in real
/// composites); only its magnitude matters for radius conversion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisCoords {
    pub origin: Float,
    pub spacing: Float,
}

impl AxisCoords {
    pub fn new(origin: Float, spacing: Float) -> AxisCoords {
        AxisCoords { origin, spacing }
    }

    /// Coordinate of the i-th grid point.
    #[inline]
    pub fn point(&self, i: usize) -> Float {
        self.origin + self.spacing * i as Float
    }

    /// Coordinates extended `halo` cells beyond the first point, by
    /// linear extrapolation of the spacing.
    pub fn pad(&self, halo: usize) -> AxisCoords {
        AxisCoords {
            origin: self.origin - self.spacing * halo as Float,
            spacing: self.spacing,
        }
    }

    /// Inverse of [`AxisCoords::pad`].
    pub fn strip(&self, halo: usize) -> AxisCoords {
        AxisCoords {
            origin: self.origin + self.spacing * halo as Float,
            spacing: self.spacing,
        }
    }
}

/// Convert a physical search radius into a whole number of grid cells.
///
/// The ratio is floored; a radius spanning less than one cell is a
/// configuration error, never silently clamped.
pub fn radius_in_cells(radius: Float, spacing: Float) -> Result<usize> {
    let cells = (radius / spacing).abs().floor();
    if !cells.is_finite() || cells < 1.0 {
        return Err(GridError::RadiusTooSmall { radius, spacing });
    }
    Ok(cells as usize)
}
