use crate::grid::Axis;
use crate::Float;
use thiserror::Error;

/// Errors raised by the filtering core.
///
/// Every variant is a configuration or shape problem detected before any
/// array computation starts. Degenerate numeric cases (windows with no
/// valid neighbours, zero-weight recursion denominators) are handled by
/// masking, never by raising.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GridError {
    #[error("Invalid alpha_{axis}: must be > 0 and < 1: {value}")]
    InvalidAlpha { axis: Axis, value: Float },

    #[error("A value for alpha_{axis} must be set if no alpha_{axis} field is supplied")]
    AlphaUnset { axis: Axis },

    #[error("An alpha_{axis} field and a single alpha_{axis} value were both supplied: supply exactly one")]
    AlphaOverSpecified { axis: Axis },

    #[error("Dimensions of alpha_{axis} field do not match the data grid: expected {expected:?}, got {found:?}")]
    AlphaShapeMismatch {
        axis: Axis,
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("Dimensions of mask do not match the data grid: expected {expected:?}, got {found:?}")]
    MaskShapeMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("Invalid number of iterations: must be >= 1: {0}")]
    InvalidIterations(usize),

    #[error("Invalid edge_width: must be >= 1: {0}")]
    InvalidEdgeWidth(usize),

    #[error("Invalid halo: must be >= 1 cell on each side: ({halo_y}, {halo_x})")]
    InvalidHalo { halo_y: usize, halo_x: usize },

    #[error("Halo ({halo_y}, {halo_x}) does not fit inside a {rows} x {cols} plane")]
    HaloTooLarge {
        halo_y: usize,
        halo_x: usize,
        rows: usize,
        cols: usize,
    },

    #[error("Radius {radius} spans less than one grid cell (spacing {spacing})")]
    RadiusTooSmall { radius: Float, spacing: Float },

    #[error("Neighbourhood mode option is invalid: {0}")]
    InvalidMode(String),

    #[error("Plane shapes differ: expected {expected:?}, got {found:?}")]
    PlaneShapeMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("A field stack requires at least one plane")]
    EmptyStack,
}
