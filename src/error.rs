//! Error types for the numeric core.

use thiserror::Error;

/// Result type alias using the crate's [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the numeric core.
///
/// All of these are local precondition violations raised at the point of
/// detection; nothing is retried or silently clamped. The caller decides
/// whether to abort or rebuild the computation with different parameters.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// An index or argument lies outside its valid domain.
    #[error("argument out of range: {0}")]
    ArgumentOutOfRange(String),

    /// Root refinement exceeded the iteration cap.
    #[error("root {root} of the degree-{degree} polynomial did not converge")]
    RootNotFound {
        /// Zero-based index of the root that failed to converge.
        root: usize,
        /// Degree of the polynomial whose root was sought.
        degree: i32,
    },

    /// A divisor's magnitude fell below the near-zero threshold.
    #[error("division by near-zero operand (|z| = {norm:e})")]
    DivisionByNearZero {
        /// Magnitude of the offending divisor.
        norm: f64,
    },

    /// A quadrature mesh was requested with an unsatisfiable configuration.
    #[error("invalid mesh configuration: {0}")]
    MeshConfig(String),

    /// A mapper was requested with unsatisfiable rank parameters.
    #[error("invalid mapper configuration: {0}")]
    MapperConfig(String),

    /// No registered mapper factory accepts the given symmetry.
    #[error("no suitable mapper factory could be found for the given symmetry")]
    NoSuitableMapper,
}
