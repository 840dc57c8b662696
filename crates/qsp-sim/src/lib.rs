//! `qsp-sim`: operators and eigenvalue transformations on top of `qsp-ir`.
//!
//! - **Field operators** in second quantization, turned into matrices through
//!   the Jordan–Wigner encoding
//! - **Pauli operators** and the Heisenberg and Ising lattice models
//! - **Eigenvalue transformation** (quantum signal processing) with a
//!   closed-form matrix that agrees with both the gate-level composition and
//!   an explicit circuit simulation
//!
//! # Quick start
//!
//! ```rust
//! use std::sync::Arc;
//! use qsp_ir::{BlockEncodingMethod, Field, IntegerLattice, ParticleType};
//! use qsp_ir::matrix::allclose;
//! use qsp_sim::hamiltonian::IsingHamiltonian;
//! use qsp_sim::qubitization::EigenvalueTransformation;
//!
//! let system = Field::new(ParticleType::Qubit, IntegerLattice::new([2], false));
//! let aux = Field::new(ParticleType::Qubit, IntegerLattice::new([2], false));
//! let h = IsingHamiltonian::new(system.clone(), 0.2, 0.1, 0.1).unwrap();
//!
//! let qsp = EigenvalueTransformation::new(
//!     Arc::new(h),
//!     BlockEncodingMethod::Wx,
//!     vec![aux.qubit(0).unwrap()],
//!     aux.qubit(1).unwrap(),
//!     vec![false],
//!     vec![0.3, -0.8],
//! ).unwrap();
//!
//! let closed = qsp.as_matrix().unwrap();
//! let simulated = qsp.as_circuit().unwrap().as_matrix(&[system, aux]).unwrap();
//! assert!(allclose(&closed, &simulated, 1e-10));
//! ```

pub mod error;
pub mod field_operator;
pub mod hamiltonian;
pub mod jordan_wigner;
pub mod pauli;
pub mod qubitization;

pub use error::{SimError, SimResult};
pub use field_operator::{FieldOperator, FieldOperatorTerm, IFODesc, IFOType, coupling_tensor};
pub use hamiltonian::{HeisenbergHamiltonian, HeisenbergParams, IsingHamiltonian};
pub use pauli::{PauliOp, PauliOperator, PauliString, PauliTerm};
pub use qubitization::EigenvalueTransformation;
