//! Pauli-string operators on a qubit field.
//!
//! A Pauli operator is a sum of weighted Pauli strings:
//!
//!   H = Σ_k  c_k · P_k
//!
//! where each P_k is a tensor product of single-site Pauli operators
//! (I, X, Y, Z) on the sites of one field and c_k ∈ ℝ.
//!
//! # Example
//!
//! ```rust
//! use qsp_ir::{Field, IntegerLattice, Operator, ParticleType};
//! use qsp_sim::pauli::{PauliOp, PauliOperator, PauliString, PauliTerm};
//!
//! let field = Field::new(ParticleType::Qubit, IntegerLattice::new([2], false));
//!
//! // H = -1.0·Z₀Z₁  +  0.5·X₀
//! let h = PauliOperator::new(field, vec![
//!     PauliTerm::new(-1.0, PauliString::from_ops([(0, PauliOp::Z), (1, PauliOp::Z)])),
//!     PauliTerm::new( 0.5, PauliString::from_ops([(0, PauliOp::X)])),
//! ]).unwrap();
//! assert_eq!(h.n_terms(), 2);
//! assert_eq!(h.as_matrix().unwrap().dim(), (4, 4));
//! ```

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use qsp_ir::matrix::{Matrix, identity, kron_all};
use qsp_ir::{Field, IrResult, Operator, StandardGate};

use crate::error::{SimError, SimResult};

/// Single-site Pauli operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PauliOp {
    /// Identity.
    I,
    /// Pauli-X.
    X,
    /// Pauli-Y.
    Y,
    /// Pauli-Z.
    Z,
}

impl PauliOp {
    /// The 2x2 matrix of this operator.
    pub fn matrix(self) -> Matrix {
        match self {
            PauliOp::I => identity(2),
            PauliOp::X => StandardGate::X.matrix(),
            PauliOp::Y => StandardGate::Y.matrix(),
            PauliOp::Z => StandardGate::Z.matrix(),
        }
    }
}

/// A tensor product of Pauli operators on sites of a field.
///
/// Stored as a sorted `Vec<(site, PauliOp)>` with identity factors omitted.
/// Sites not listed are implicitly I.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PauliString {
    /// Non-identity factors, sorted by site index ascending.
    ops: Vec<(usize, PauliOp)>,
}

impl PauliString {
    /// Construct a PauliString from (site, op) pairs.
    ///
    /// Identity operators are dropped; the remaining ops are sorted by site.
    pub fn from_ops(ops: impl IntoIterator<Item = (usize, PauliOp)>) -> Self {
        let mut v: Vec<(usize, PauliOp)> = ops
            .into_iter()
            .filter(|(_, op)| *op != PauliOp::I)
            .collect();
        v.sort_by_key(|(site, _)| *site);
        Self { ops: v }
    }

    /// Return the non-identity (site, op) pairs, sorted by site index.
    pub fn ops(&self) -> &[(usize, PauliOp)] {
        &self.ops
    }

    /// True if there are no non-identity operators.
    pub fn is_identity(&self) -> bool {
        self.ops.is_empty()
    }

    /// The highest site index referenced, or `None` for an identity string.
    pub fn max_site(&self) -> Option<usize> {
        self.ops.last().map(|(site, _)| *site)
    }

    /// Matrix on `nsites` sites, site 0 being the least significant factor.
    pub fn as_matrix(&self, nsites: usize) -> SimResult<Matrix> {
        if let Some(site) = self.max_site().filter(|&s| s >= nsites) {
            return Err(SimError::SiteOutOfRange { site, nsites });
        }
        Ok(self.embed(nsites))
    }

    fn embed(&self, nsites: usize) -> Matrix {
        let mut factors = vec![PauliOp::I; nsites];
        for &(site, op) in &self.ops {
            factors[site] = op;
        }
        let matrices: Vec<Matrix> = factors.iter().rev().map(|op| op.matrix()).collect();
        kron_all(&matrices)
    }
}

/// A single weighted Pauli term: `coeff · pauli`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PauliTerm {
    /// Real coefficient.
    pub coeff: f64,
    /// The Pauli string.
    pub pauli: PauliString,
}

impl PauliTerm {
    /// Create a new term.
    pub fn new(coeff: f64, pauli: PauliString) -> Self {
        Self { coeff, pauli }
    }

    /// Shorthand: single-site term.
    pub fn single(site: usize, op: PauliOp, coeff: f64) -> Self {
        Self::new(coeff, PauliString::from_ops([(site, op)]))
    }

    /// Shorthand: two-site coupling `op ⊗ op`.
    pub fn pair(i: usize, k: usize, op: PauliOp, coeff: f64) -> Self {
        Self::new(coeff, PauliString::from_ops([(i, op), (k, op)]))
    }
}

/// Hermitian sum of Pauli strings on one qubit field.
#[derive(Debug, Clone)]
pub struct PauliOperator {
    field: Field,
    terms: Vec<PauliTerm>,
}

impl PauliOperator {
    /// Sum of `terms` acting on `field`.
    pub fn new(field: Field, terms: Vec<PauliTerm>) -> SimResult<Self> {
        field.require_two_level()?;
        let nsites = field.nsites();
        if let Some(site) = terms
            .iter()
            .filter_map(|t| t.pauli.max_site())
            .find(|&s| s >= nsites)
        {
            return Err(SimError::SiteOutOfRange { site, nsites });
        }
        Ok(Self { field, terms })
    }

    /// Skip validation; the caller guarantees a two-level field and in-range sites.
    pub(crate) fn from_validated(field: Field, terms: Vec<PauliTerm>) -> Self {
        Self { field, terms }
    }

    /// The field acted on.
    pub fn field(&self) -> &Field {
        &self.field
    }

    /// All terms.
    pub fn terms(&self) -> &[PauliTerm] {
        &self.terms
    }

    /// Number of terms.
    pub fn n_terms(&self) -> usize {
        self.terms.len()
    }

    /// Upper bound on the spectral norm: Σ |c_k|.
    pub fn lambda(&self) -> f64 {
        self.terms.iter().map(|t| t.coeff.abs()).sum()
    }
}

impl Operator for PauliOperator {
    fn fields(&self) -> Vec<Field> {
        vec![self.field.clone()]
    }

    fn as_matrix(&self) -> IrResult<Matrix> {
        let nsites = self.field.nsites();
        let mut h = Matrix::zeros((1 << nsites, 1 << nsites));
        for term in &self.terms {
            // site range was validated on construction
            h.scaled_add(Complex64::new(term.coeff, 0.0), &term.pauli.embed(nsites));
        }
        Ok(h)
    }
}
