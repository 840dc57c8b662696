//! Error types for the sim crate.

use thiserror::Error;

/// Errors produced while building operators and eigenvalue transformations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SimError {
    /// Operator type incompatible with the particle type of its field.
    #[error("Expecting {expected} operator, but received {got}")]
    InvalidOperatorType {
        /// Operator family the field admits.
        expected: &'static str,
        /// The requested operator type.
        got: String,
    },

    /// Coefficient tensor rank differs from the number of operator descriptions.
    #[error("Coefficient tensor has rank {rank} but the term has {descs} operator descriptions")]
    CoefficientRankMismatch {
        /// Rank of the coefficient tensor.
        rank: usize,
        /// Number of operator descriptions.
        descs: usize,
    },

    /// Coefficient tensor axis length differs from the site count of its field.
    #[error("Coefficient tensor axis {axis} has length {len}, expected {nsites} sites")]
    CoefficientShapeMismatch {
        /// The offending axis.
        axis: usize,
        /// Length of that axis.
        len: usize,
        /// Number of sites of the field associated with the axis.
        nsites: usize,
    },

    /// A Pauli string references a site outside its field.
    #[error("Pauli string references site {site} but the field only has {nsites} sites")]
    SiteOutOfRange {
        /// The offending site index.
        site: usize,
        /// Number of sites of the field.
        nsites: usize,
    },

    /// Rescaling factor must be finite and nonzero.
    #[error("Invalid rescaling factor {0}")]
    InvalidRescale(f64),

    /// Underlying IR operation failed.
    #[error("Circuit IR error: {0}")]
    Ir(#[from] qsp_ir::IrError),
}

/// Result type for sim operations.
pub type SimResult<T> = Result<T, SimError>;
