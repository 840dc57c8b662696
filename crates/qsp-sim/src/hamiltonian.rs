//! Lattice spin Hamiltonians.
//!
//! Both models sum nearest-neighbour couplings over the bonds of the field's
//! lattice (each bond counted once) plus uniform on-site fields:
//!
//! - Heisenberg: `H = Σ_{<i,k>} (Jx X_i X_k + Jy Y_i Y_k + Jz Z_i Z_k) + Σ_i (hx X_i + hy Y_i + hz Z_i)`
//! - Ising:      `H = Σ_{<i,k>} J Z_i Z_k + Σ_i (h Z_i + g X_i)`

use serde::{Deserialize, Serialize};

use qsp_ir::{Field, IrResult, Matrix, Operator};

use crate::error::{SimError, SimResult};
use crate::pauli::{PauliOp, PauliOperator, PauliTerm};

const AXES: [PauliOp; 3] = [PauliOp::X, PauliOp::Y, PauliOp::Z];

/// Bonds `(i, k)` with `i < k` of the field's lattice.
fn bonds(field: &Field) -> Vec<(usize, usize)> {
    let adj = field.lattice().adjacency_matrix();
    let n = field.nsites();
    (0..n)
        .flat_map(|i| (i + 1..n).map(move |k| (i, k)))
        .filter(|&(i, k)| adj[[i, k]] != 0)
        .collect()
}

fn check_factor(factor: f64) -> SimResult<()> {
    if factor.is_finite() && factor != 0.0 {
        Ok(())
    } else {
        Err(SimError::InvalidRescale(factor))
    }
}

/// Isotropic-lattice Heisenberg model with anisotropic couplings and a uniform field.
#[derive(Debug, Clone)]
pub struct HeisenbergHamiltonian {
    field: Field,
    j: [f64; 3],
    h: [f64; 3],
}

/// Plain-data parameters of a [`HeisenbergHamiltonian`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeisenbergParams {
    /// Couplings `(Jx, Jy, Jz)`.
    pub j: [f64; 3],
    /// Field strengths `(hx, hy, hz)`.
    pub h: [f64; 3],
}

impl HeisenbergHamiltonian {
    /// Heisenberg model on a two-level field.
    pub fn new(field: Field, j: [f64; 3], h: [f64; 3]) -> SimResult<Self> {
        field.require_two_level()?;
        Ok(Self { field, j, h })
    }

    /// Couplings `(Jx, Jy, Jz)`.
    pub fn j(&self) -> [f64; 3] {
        self.j
    }

    /// Field strengths `(hx, hy, hz)`.
    pub fn h(&self) -> [f64; 3] {
        self.h
    }

    /// Current parameters.
    pub fn params(&self) -> HeisenbergParams {
        HeisenbergParams {
            j: self.j,
            h: self.h,
        }
    }

    /// Multiply every parameter, and hence the operator, by `factor`.
    pub fn rescale(&mut self, factor: f64) -> SimResult<()> {
        check_factor(factor)?;
        self.j = self.j.map(|x| x * factor);
        self.h = self.h.map(|x| x * factor);
        Ok(())
    }

    /// The model as an explicit sum of Pauli strings.
    pub fn as_pauli_operator(&self) -> PauliOperator {
        let mut terms = Vec::new();
        for (i, k) in bonds(&self.field) {
            for (op, &j) in AXES.iter().zip(&self.j) {
                if j != 0.0 {
                    terms.push(PauliTerm::pair(i, k, *op, j));
                }
            }
        }
        for site in 0..self.field.nsites() {
            for (op, &h) in AXES.iter().zip(&self.h) {
                if h != 0.0 {
                    terms.push(PauliTerm::single(site, *op, h));
                }
            }
        }
        PauliOperator::from_validated(self.field.clone(), terms)
    }
}

impl Operator for HeisenbergHamiltonian {
    fn fields(&self) -> Vec<Field> {
        vec![self.field.clone()]
    }

    fn as_matrix(&self) -> IrResult<Matrix> {
        self.as_pauli_operator().as_matrix()
    }
}

/// Transverse-field Ising model.
#[derive(Debug, Clone)]
pub struct IsingHamiltonian {
    field: Field,
    j: f64,
    h: f64,
    g: f64,
}

impl IsingHamiltonian {
    /// Ising model with coupling `j`, longitudinal field `h` and transverse field `g`.
    pub fn new(field: Field, j: f64, h: f64, g: f64) -> SimResult<Self> {
        field.require_two_level()?;
        Ok(Self { field, j, h, g })
    }

    /// Coupling strength.
    pub fn j(&self) -> f64 {
        self.j
    }

    /// Longitudinal field.
    pub fn h(&self) -> f64 {
        self.h
    }

    /// Transverse field.
    pub fn g(&self) -> f64 {
        self.g
    }

    /// Multiply every parameter by `factor`.
    pub fn rescale(&mut self, factor: f64) -> SimResult<()> {
        check_factor(factor)?;
        self.j *= factor;
        self.h *= factor;
        self.g *= factor;
        Ok(())
    }

    /// The model as an explicit sum of Pauli strings.
    pub fn as_pauli_operator(&self) -> PauliOperator {
        let mut terms: Vec<PauliTerm> = bonds(&self.field)
            .into_iter()
            .map(|(i, k)| PauliTerm::pair(i, k, PauliOp::Z, self.j))
            .collect();
        for site in 0..self.field.nsites() {
            terms.push(PauliTerm::single(site, PauliOp::Z, self.h));
            terms.push(PauliTerm::single(site, PauliOp::X, self.g));
        }
        PauliOperator::from_validated(self.field.clone(), terms)
    }
}

impl Operator for IsingHamiltonian {
    fn fields(&self) -> Vec<Field> {
        vec![self.field.clone()]
    }

    fn as_matrix(&self) -> IrResult<Matrix> {
        self.as_pauli_operator().as_matrix()
    }
}
