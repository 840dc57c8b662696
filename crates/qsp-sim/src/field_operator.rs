//! Field operators in second quantization.
//!
//! A [`FieldOperatorTerm`] describes a sum like
//!
//!   Σ_{j,k} h_{j,k} a†_j a_k
//!
//! where each summation index is tied to a field and an operator type, and
//! the coefficients form a tensor with one axis per index. A
//! [`FieldOperator`] is a sum of such terms.

use ndarray::{ArrayD, Dimension};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use tracing::debug;

use qsp_ir::matrix::{Matrix, identity};
use qsp_ir::{Field, IrError, IrResult, Lattice, Operator, ParticleType};

use crate::error::{SimError, SimResult};
use crate::jordan_wigner::{annihilation_operators, creation_operators};

/// Individual field operator type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IFOType {
    /// Bosonic creation operator.
    BosonCreate,
    /// Bosonic annihilation operator.
    BosonAnnihil,
    /// Fermionic creation operator.
    FermiCreate,
    /// Fermionic annihilation operator.
    FermiAnnihil,
    /// "Real" Majorana operator.
    MajoranaRe,
    /// "Imaginary" Majorana operator.
    MajoranaIm,
}

/// Individual field operator description: a field and an operator type.
#[derive(Debug, Clone, PartialEq)]
pub struct IFODesc {
    field: Field,
    otype: IFOType,
}

impl IFODesc {
    /// Pair `otype` with `field`, checking that the field's particles admit it.
    pub fn new(field: Field, otype: IFOType) -> SimResult<Self> {
        let admissible = match field.particle_type() {
            ParticleType::Qudit => Some((
                "bosonic",
                [IFOType::BosonCreate, IFOType::BosonAnnihil],
            )),
            ParticleType::Fermion => Some((
                "fermionic",
                [IFOType::FermiCreate, IFOType::FermiAnnihil],
            )),
            ParticleType::Majorana => Some((
                "Majorana",
                [IFOType::MajoranaRe, IFOType::MajoranaIm],
            )),
            ParticleType::Qubit | ParticleType::Boson => None,
        };
        if let Some((expected, allowed)) = admissible {
            if !allowed.contains(&otype) {
                return Err(SimError::InvalidOperatorType {
                    expected,
                    got: format!("{otype:?}"),
                });
            }
        }
        Ok(Self { field, otype })
    }

    /// The field.
    pub fn field(&self) -> &Field {
        &self.field
    }

    /// The operator type.
    pub fn otype(&self) -> IFOType {
        self.otype
    }
}

/// One term of a field operator: operator descriptions and a coefficient tensor.
#[derive(Debug, Clone)]
pub struct FieldOperatorTerm {
    opdesc: Vec<IFODesc>,
    coeffs: ArrayD<Complex64>,
}

impl FieldOperatorTerm {
    /// Create a term; the tensor needs one axis per description, each as
    /// long as the site count of that description's field.
    pub fn new(opdesc: Vec<IFODesc>, coeffs: ArrayD<Complex64>) -> SimResult<Self> {
        if coeffs.ndim() != opdesc.len() {
            return Err(SimError::CoefficientRankMismatch {
                rank: coeffs.ndim(),
                descs: opdesc.len(),
            });
        }
        for (axis, (&len, desc)) in coeffs.shape().iter().zip(&opdesc).enumerate() {
            let nsites = desc.field.nsites();
            if len != nsites {
                return Err(SimError::CoefficientShapeMismatch { axis, len, nsites });
            }
        }
        Ok(Self { opdesc, coeffs })
    }

    /// Operator descriptions, one per tensor axis.
    pub fn opdesc(&self) -> &[IFODesc] {
        &self.opdesc
    }

    /// Coefficient tensor.
    pub fn coeffs(&self) -> &ArrayD<Complex64> {
        &self.coeffs
    }
}

/// Field operator in second-quantized form.
#[derive(Debug, Clone, Default)]
pub struct FieldOperator {
    terms: Vec<FieldOperatorTerm>,
}

impl FieldOperator {
    /// Sum of the given terms.
    pub fn new(terms: Vec<FieldOperatorTerm>) -> Self {
        Self { terms }
    }

    /// All terms.
    pub fn terms(&self) -> &[FieldOperatorTerm] {
        &self.terms
    }
}

impl Operator for FieldOperator {
    /// Distinct fields in order of first appearance.
    fn fields(&self) -> Vec<Field> {
        let mut fields: Vec<Field> = Vec::new();
        for desc in self.terms.iter().flat_map(|t| t.opdesc.iter()) {
            if !fields.contains(&desc.field) {
                fields.push(desc.field.clone());
            }
        }
        fields
    }

    /// Matrix representation via the Jordan–Wigner encoding.
    ///
    /// Only operators on a single fermionic field have one.
    fn as_matrix(&self) -> IrResult<Matrix> {
        let fields = self.fields();
        let field = match fields.as_slice() {
            [f] if f.particle_type() == ParticleType::Fermion => f,
            _ => {
                return Err(IrError::UnsupportedConfiguration(
                    "only operators on a single fermionic field can be represented as a matrix"
                        .to_string(),
                ));
            }
        };
        let nsites = field.nsites();
        debug!(nsites, terms = self.terms.len(), "assembling field operator");
        let clist = creation_operators(nsites);
        let alist = annihilation_operators(nsites);

        let dim = 1usize << nsites;
        let mut op = Matrix::zeros((dim, dim));
        for term in &self.terms {
            for (index, &coeff) in term.coeffs.indexed_iter() {
                if coeff == Complex64::new(0.0, 0.0) {
                    continue;
                }
                let mut fstring = identity(dim);
                for (desc, &site) in term.opdesc.iter().zip(index.slice()) {
                    let factor = match desc.otype {
                        IFOType::FermiCreate => &clist[site],
                        IFOType::FermiAnnihil => &alist[site],
                        other => {
                            return Err(IrError::UnexpectedOperatorType {
                                expected: "fermionic".to_string(),
                                got: format!("{other:?}"),
                            });
                        }
                    };
                    fstring = fstring.dot(factor);
                }
                op.scaled_add(coeff, &fstring);
            }
        }
        Ok(op)
    }
}

/// Coupling tensor `strength · A` from the lattice's adjacency matrix `A`.
///
/// Used as the coefficients of a nearest-neighbour hopping term
/// `Σ_{i,j} t_{ij} c†_i c_j`.
pub fn coupling_tensor(lattice: &dyn Lattice, strength: f64) -> ArrayD<Complex64> {
    lattice
        .adjacency_matrix()
        .mapv(|a| Complex64::new(strength * f64::from(a), 0.0))
        .into_dyn()
}
