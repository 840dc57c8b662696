//! The operator abstraction.

use std::fmt;

use crate::error::{IrError, IrResult};
use crate::field::Field;
use crate::matrix::Matrix;
use crate::qubit::Qubit;

/// A linear operator acting on the tensor product of one or more fields.
///
/// The matrix returned by [`Operator::as_matrix`] acts on the fields in the
/// order returned by [`Operator::fields`], with the first field's site 0 as
/// the least significant tensor factor.
pub trait Operator: fmt::Debug + Send + Sync {
    /// Fields the operator acts on nontrivially, without duplicates.
    fn fields(&self) -> Vec<Field>;

    /// Matrix representation on the fields' joint Hilbert space.
    fn as_matrix(&self) -> IrResult<Matrix>;
}

/// Every site of every field of `op` as a qubit, in field order.
pub fn qubit_wires(op: &dyn Operator) -> IrResult<Vec<Qubit>> {
    let mut wires = Vec::new();
    for field in op.fields() {
        wires.extend(field.qubits()?);
    }
    Ok(wires)
}

/// Operator given by an explicit matrix.
#[derive(Debug, Clone)]
pub struct DenseOperator {
    fields: Vec<Field>,
    matrix: Matrix,
}

impl DenseOperator {
    /// Wrap `matrix`, which must act on the joint space of `fields`.
    pub fn new(fields: Vec<Field>, matrix: Matrix) -> IrResult<Self> {
        let mut expected = 1usize;
        for (i, field) in fields.iter().enumerate() {
            if fields[..i].contains(field) {
                return Err(IrError::InvalidWiring(format!(
                    "field {field} listed twice on one operator"
                )));
            }
            let dim = field.hilbert_dim()?;
            expected = expected
                .checked_mul(dim)
                .ok_or(IrError::HilbertSpaceTooLarge {
                    nsites: fields.iter().map(Field::nsites).sum(),
                })?;
        }
        for dim in [matrix.nrows(), matrix.ncols()] {
            if dim != expected {
                return Err(IrError::DimensionMismatch { expected, got: dim });
            }
        }
        Ok(Self { fields, matrix })
    }

    /// The wrapped matrix.
    pub fn matrix(&self) -> &Matrix {
        &self.matrix
    }
}

impl Operator for DenseOperator {
    fn fields(&self) -> Vec<Field> {
        self.fields.clone()
    }

    fn as_matrix(&self) -> IrResult<Matrix> {
        Ok(self.matrix.clone())
    }
}
