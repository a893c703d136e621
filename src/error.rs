//! Error kinds surfaced at the engine boundary.
//!
//! All failures in the stepping core are programmer errors (§7): bad
//! shapes, out-of-range parameters, out-of-bounds source indices, or a
//! stepped-into instability. There is no retry path: callers get a
//! typed error with enough context to find the offending cell/step.

use thiserror::Error;

/// Errors the core can return. Every variant corresponds to one of the
/// four error kinds in spec §7.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FdtdError {
    /// A material or recording array's shape disagrees with `(nx, ny)`
    /// or `(n_steps, nx, ny)`.
    #[error("shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        expected: (usize, usize, usize),
        got: (usize, usize, usize),
    },

    /// A construction-time parameter violates an invariant (ε ≤ 0,
    /// σ < 0, empty/non-increasing time stamps, CFL violation,
    /// σ_max·dt/(2μ) > 1, ...).
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A source's injection index falls outside `[0,nx) x [0,ny)`.
    #[error("source {index} injects at ({x}, {y}), outside the ({nx}, {ny}) grid")]
    SourceOutOfBounds {
        index: usize,
        x: i64,
        y: i64,
        nx: usize,
        ny: usize,
    },

    /// A non-finite value (NaN/Inf) was observed in Ez, Hx, or Hy after
    /// a step.
    #[error("numerical instability at step {step}, cell ({i}, {j})")]
    NumericalInstability { step: usize, i: usize, j: usize },
}
