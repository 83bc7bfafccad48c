//! Fatal error kinds for simulation setup and execution.
//!
//! Every error here is unrecoverable at the point raised: the engine never
//! retries or substitutes defaults, and a failed run produces no partial log.

use thiserror::Error;

/// Errors that abort a simulation run.
#[derive(Debug, Error)]
pub enum SimulationError {
    /// Sampling preconditions violated (mean/min/max ordering or variance
    /// bound). Raised before any value is drawn.
    #[error("invalid sampling parameters: {reason}")]
    InvalidParameters { reason: String },

    /// Min-max normalization attempted over a zero-range sequence (all
    /// values equal, or fewer than two values).
    #[error("cannot min-max normalize a zero-range sequence of {len} value(s)")]
    DegenerateRange { len: usize },

    /// Two value structures with different taxonomy shapes were combined.
    /// Positional alignment is load-bearing, so this is fatal.
    #[error("value structure shape mismatch: expected [{expected}], found [{found}]")]
    ShapeMismatch { expected: String, found: String },
}
