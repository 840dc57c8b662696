//! QSP Intermediate Representation
//!
//! This crate provides the core data structures for describing quantum
//! many-body operators and the circuits acting on them: fields on lattices,
//! qubits addressing their sites, operators, gates and circuits. It forms the
//! foundation of `qsp-sim`, which adds concrete Hamiltonians, the
//! Jordan–Wigner encoding and the eigenvalue transformation engine.
//!
//! # Core Components
//!
//! - **Fields**: [`Field`] places identical degrees of freedom on the sites of
//!   a [`Lattice`] such as [`IntegerLattice`]
//! - **Qubits**: [`Qubit`] addresses one site of a two-level field
//! - **Operators**: the [`Operator`] trait and [`DenseOperator`]
//! - **Gates**: [`Gate`], covering [`StandardGate`]s, [`ControlledGate`],
//!   [`TimeEvolutionGate`], [`BlockEncodingGate`],
//!   [`ProjectorControlledPhaseShift`] and [`EigenvalueTransformationGate`]
//! - **Circuit**: [`Circuit`], an ordered gate list with dense simulation
//!
//! # Wire convention
//!
//! Matrices are little-endian: wire 0 of any wire list is the least
//! significant tensor factor. When a circuit is simulated over an ordered
//! list of fields, each field's sites occupy consecutive wires.
//!
//! # Example: Bell state
//!
//! ```rust
//! use qsp_ir::{Circuit, Field, IntegerLattice, ParticleType};
//!
//! let field = Field::new(ParticleType::Qubit, IntegerLattice::new([2], false));
//! let q = field.qubits().unwrap();
//!
//! let mut circuit = Circuit::new("bell_state");
//! circuit.h(&q[0]).unwrap();
//! circuit.cx(&q[0], &q[1]).unwrap();
//!
//! let u = circuit.as_matrix(&[field]).unwrap();
//! assert_eq!(u.dim(), (4, 4));
//! ```

pub mod block_encoding;
pub mod circuit;
pub mod error;
pub mod field;
pub mod gate;
pub mod matrix;
pub mod operator;
pub mod phase_shift;
pub mod qubit;
pub mod transform;

pub use block_encoding::{BlockEncodingGate, BlockEncodingMethod};
pub use circuit::{Circuit, Instruction};
pub use error::{IrError, IrResult};
pub use field::{Field, IntegerLattice, Lattice, ParticleType};
pub use gate::{ControlledGate, Gate, SingleQubitGate, StandardGate, TimeEvolutionGate};
pub use matrix::Matrix;
pub use operator::{DenseOperator, Operator, qubit_wires};
pub use phase_shift::ProjectorControlledPhaseShift;
pub use qubit::Qubit;
pub use transform::EigenvalueTransformationGate;
