//! Error types for the IR crate.

use thiserror::Error;

use crate::field::ParticleType;

/// Errors that can occur in IR operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// Qubit index exceeds the number of lattice sites of its field.
    #[error("Qubit index {index} out of range for field with {nsites} sites")]
    QubitOutOfRange {
        /// The requested local index.
        index: usize,
        /// Number of sites of the field.
        nsites: usize,
    },

    /// A field cannot be addressed qubit-wise.
    #[error("Field of type {particle_type:?} with local dimension {local_dim} is not a two-level field")]
    NotTwoLevel {
        /// Particle type of the field.
        particle_type: ParticleType,
        /// Local dimension of the field.
        local_dim: usize,
    },

    /// Local dimension incompatible with the particle type.
    #[error("Invalid local dimension {local_dim} for particle type {particle_type:?}")]
    InvalidLocalDimension {
        /// Particle type of the field.
        particle_type: ParticleType,
        /// The requested local dimension.
        local_dim: usize,
    },

    /// Matrix dimension does not match what the context requires.
    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch {
        /// Expected dimension.
        expected: usize,
        /// Actual dimension.
        got: usize,
    },

    /// Joint Hilbert space dimension does not fit in a `usize`.
    #[error("Hilbert space of {nsites} sites is too large to represent")]
    HilbertSpaceTooLarge {
        /// Total number of sites spanned.
        nsites: usize,
    },

    /// Block encoding was queried before its encoding qubits were bound.
    #[error("Auxiliary qubits of '{gate_name}' have not been set")]
    AuxiliaryQubitsNotSet {
        /// Name of the gate.
        gate_name: String,
    },

    /// Wrong number of encoding qubits for a block-encoding method.
    #[error("Block-encoding method requires {expected} encoding qubits, got {got}")]
    EncodingQubitCount {
        /// Qubits required by the method.
        expected: usize,
        /// Qubits supplied.
        got: usize,
    },

    /// Projector pattern length does not match the encoding register.
    #[error("Projector has {got} bits but the encoding register has {expected} qubits")]
    ProjectorLength {
        /// Number of encoding qubits.
        expected: usize,
        /// Length of the supplied pattern.
        got: usize,
    },

    /// Inconsistent qubit wiring between gates or registers.
    #[error("Invalid wiring: {0}")]
    InvalidWiring(String),

    /// The same qubit appears twice on one gate.
    #[error("Duplicate qubit {qubit} on gate '{gate_name}'")]
    DuplicateQubit {
        /// The duplicated qubit.
        qubit: String,
        /// Name of the gate.
        gate_name: String,
    },

    /// A field touched by a circuit is missing from the declared field ordering.
    #[error("Field {field} is not part of the declared field ordering")]
    MissingField {
        /// Description of the missing field.
        field: String,
    },

    /// Operator is not Hermitian within tolerance.
    #[error("Operator is not Hermitian (max deviation {deviation:e})")]
    NotHermitian {
        /// Largest absolute entry of `H - H†`.
        deviation: f64,
    },

    /// Operator norm exceeds the block-encoding normalization.
    #[error("Operator norm {norm} exceeds block-encoding scale {scale}")]
    NormExceedsScale {
        /// Spectral norm of the operator.
        norm: f64,
        /// Configured normalization.
        scale: f64,
    },

    /// Normalization factor must be positive and finite.
    #[error("Invalid block-encoding scale {0}")]
    InvalidScale(f64),

    /// Rotation axis must be a nonzero vector.
    #[error("Rotation axis must be nonzero")]
    ZeroRotationAxis,

    /// Operator configuration has no matrix representation (yet).
    #[error("Unsupported operator configuration: {0}")]
    UnsupportedConfiguration(String),

    /// Operator type not allowed where it was encountered.
    #[error("Expecting {expected} operator, but received {got}")]
    UnexpectedOperatorType {
        /// Description of the admissible operator types.
        expected: String,
        /// The operator type that was found.
        got: String,
    },

    /// Wire permutation is not a permutation of the gate's wires.
    #[error("Invalid wire permutation {0:?}")]
    InvalidPermutation(Vec<usize>),
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
