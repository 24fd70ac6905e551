//! Spatial filters for gridded meteorological fields.
//!
//! Two mask-aware filters over regular 2D (y, x) grids: square-window
//! neighbourhood averaging (`nbhood`) and a two-directional recursive
//! smoother (`recursive`). Both treat masked cells and NaN payloads the
//! same way: invalid, excluded from every window and every recursion.
//! Halo padding (`grid::halo`) is shared by both so that windows near
//! the grid edge see replicated boundary values instead of zeros.
//!
//! Fields with leading time/realization dimensions are handled as a
//! `stack::FieldStack` of independent planes. `infill` builds on the
//! neighbourhood machinery to patch small holes in radar composites.

pub mod error;
pub mod grid;
pub mod infill;
pub mod nbhood;
pub mod recursive;
pub mod stack;

// We use a type alias for f64/Float to easily support
// double and single precision.
#[cfg(feature = "dprec")]
pub type Float = f64;

#[cfg(not(feature = "dprec"))]
pub type Float = f32;

pub use crate::error::GridError;
pub use crate::grid::halo::{pad_with_halo, strip_halo};
pub use crate::grid::{radius_in_cells, Axis, AxisCoords, GridValue, Mask, Plane};
pub use crate::infill::fill_radar_holes;
pub use crate::nbhood::{neighbourhood_average, Mode, NeighbourhoodConfig};
pub use crate::recursive::{recursive_smooth, SmootherConfig};
pub use crate::stack::FieldStack;

/// Crate-wide result type.
pub type Result<T> = std::result::Result<T, GridError>;
