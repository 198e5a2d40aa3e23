use thiserror::Error;

/// Error type returned by kernel operations that can give up on a single shape.
///
/// Callers processing many paths are expected to handle these per path, see
/// [render_paths](crate::orchestrator::render_paths).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum KernelError {
    #[error(transparent)]
    Untangle(#[from] UntangleError),

    #[error("clip walk exceeded {limit} iterations")]
    ClipIterationLimit { limit: usize },

    #[error("region walk exceeded {limit} iterations")]
    RegionIterationLimit { limit: usize },

    #[error("unsupported curve command: {command}")]
    UnsupportedCurve { command: &'static str },

    #[error(transparent)]
    BooleanEngine(#[from] BooleanEngineError),

    #[error("offset loop could not be resolved into regions")]
    UnresolvedOffset,
}

/// Reason a hit could not be classified into entry/exit transitions.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum UntangleFailure {
    /// Junction had a side count other than 2, 3 or 4.
    UnexpectedSideCount(usize),
    /// Sides could not be paired with each entry next to an exit.
    NoValidPairing,
}

/// One side of a hit, kept for diagnosing untangle failures.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SideDiagnostic {
    pub shape: usize,
    pub segment_index: usize,
    pub exit: bool,
    pub angle: f64,
}

/// Hit at `point` could not be untangled, carries every side that met there.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("cannot untangle hit at ({}, {}): {reason:?} with {} sides", .point.0, .point.1, .sides.len())]
pub struct UntangleError {
    pub reason: UntangleFailure,
    pub point: (f64, f64),
    pub sides: Vec<SideDiagnostic>,
}

/// Errors reported by a [BooleanEngine](crate::orchestrator::BooleanEngine) implementation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BooleanEngineError {
    #[error("operation not supported: {0}")]
    Unsupported(String),

    #[error("boolean operation failed: {0}")]
    Failed(String),
}
