//! Block encodings of Hermitian operators.
//!
//! A block encoding of `H` with normalization `α` is a unitary `U` on the
//! system register plus encoding qubits such that projecting the encoding
//! qubits onto |0…0⟩ leaves `H / α`. The encoding qubits are the most
//! significant factors of `U`, so `H / α` is the top-left block.

use std::sync::Arc;

use ndarray::{Array2, s};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{IrError, IrResult};
use crate::matrix::{HERMITIAN_TOLERANCE, Matrix, hermitian_function, hermitian_norm};
use crate::operator::{Operator, qubit_wires};
use crate::qubit::{Qubit, ensure_distinct};

/// Construction used to embed the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockEncodingMethod {
    /// `[[H, i√(I-H²)], [i√(I-H²), H]]`, an `X`-rotation by `arccos H`.
    Wx,
    /// The reflection `[[H, √(I-H²)], [√(I-H²), -H]]`.
    R,
}

impl BlockEncodingMethod {
    /// Every supported method.
    pub const ALL: [BlockEncodingMethod; 2] = [BlockEncodingMethod::Wx, BlockEncodingMethod::R];

    /// Size of the encoding register this method needs.
    #[inline]
    pub fn num_encoding_qubits(self) -> usize {
        match self {
            BlockEncodingMethod::Wx | BlockEncodingMethod::R => 1,
        }
    }

    /// Short name of the method.
    pub fn name(self) -> &'static str {
        match self {
            BlockEncodingMethod::Wx => "wx",
            BlockEncodingMethod::R => "r",
        }
    }
}

/// Block encoding gate of a Hermitian operator.
#[derive(Debug, Clone)]
pub struct BlockEncodingGate {
    h: Arc<dyn Operator>,
    method: BlockEncodingMethod,
    scale: f64,
    encoding_qubits: Option<Vec<Qubit>>,
}

impl BlockEncodingGate {
    /// Block-encode `h` with normalization 1.
    pub fn new(h: Arc<dyn Operator>, method: BlockEncodingMethod) -> Self {
        Self {
            h,
            method,
            scale: 1.0,
            encoding_qubits: None,
        }
    }

    /// Encode `h / scale` instead of `h`.
    #[must_use]
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// The encoded operator.
    pub fn encoded_operator(&self) -> &Arc<dyn Operator> {
        &self.h
    }

    /// The construction method.
    pub fn method(&self) -> BlockEncodingMethod {
        self.method
    }

    /// Normalization factor.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Bind the encoding qubits.
    ///
    /// They must match the method's register size, be distinct, and lie
    /// outside the operator's own register.
    pub fn set_auxiliary_qubits(&mut self, qubits: &[Qubit]) -> IrResult<()> {
        let expected = self.method.num_encoding_qubits();
        if qubits.len() != expected {
            return Err(IrError::EncodingQubitCount {
                expected,
                got: qubits.len(),
            });
        }
        ensure_distinct(qubits, "block_encoding")?;
        let system = self.system_wires()?;
        if let Some(q) = qubits.iter().find(|q| system.contains(q)) {
            return Err(IrError::InvalidWiring(format!(
                "encoding qubit {q} is part of the encoded operator's register"
            )));
        }
        self.encoding_qubits = Some(qubits.to_vec());
        Ok(())
    }

    /// The bound encoding qubits, if any.
    pub fn encoding_qubits(&self) -> Option<&[Qubit]> {
        self.encoding_qubits.as_deref()
    }

    /// Qubits of the encoded operator.
    pub fn system_wires(&self) -> IrResult<Vec<Qubit>> {
        qubit_wires(self.h.as_ref())
    }

    /// System wires followed by the encoding qubits.
    pub fn wires(&self) -> IrResult<Vec<Qubit>> {
        let encoding = self.bound_encoding_qubits()?;
        let mut wires = self.system_wires()?;
        wires.extend(encoding.iter().cloned());
        Ok(wires)
    }

    /// Number of wires, available before the encoding qubits are bound.
    pub fn num_wires(&self) -> IrResult<usize> {
        Ok(self.system_wires()?.len() + self.method.num_encoding_qubits())
    }

    fn bound_encoding_qubits(&self) -> IrResult<&[Qubit]> {
        self.encoding_qubits
            .as_deref()
            .ok_or_else(|| IrError::AuxiliaryQubitsNotSet {
                gate_name: "block_encoding".to_string(),
            })
    }

    /// `H / scale`, validated to be Hermitian with spectral norm at most one.
    pub fn normalized_operator(&self) -> IrResult<Matrix> {
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(IrError::InvalidScale(self.scale));
        }
        let h = self.h.as_matrix()? / Complex64::new(self.scale, 0.0);
        let expected = 1usize << self.system_wires()?.len();
        if h.nrows() != expected {
            return Err(IrError::DimensionMismatch {
                expected,
                got: h.nrows(),
            });
        }
        let norm = hermitian_norm(&h)?;
        if norm > 1.0 + HERMITIAN_TOLERANCE {
            return Err(IrError::NormExceedsScale {
                norm: norm * self.scale,
                scale: self.scale,
            });
        }
        Ok(h)
    }

    /// Unitary over [`BlockEncodingGate::wires`].
    pub fn as_matrix(&self) -> IrResult<Matrix> {
        self.bound_encoding_qubits()?;
        let h = self.normalized_operator()?;
        let d = h.nrows();
        debug!(
            method = self.method.name(),
            dim = d,
            scale = self.scale,
            "building block encoding"
        );
        let root = hermitian_function(&h, |lambda| {
            Complex64::new((1.0 - lambda * lambda).max(0.0).sqrt(), 0.0)
        })?;
        let (off_diagonal, lower_right) = match self.method {
            BlockEncodingMethod::Wx => (&root * Complex64::i(), h.clone()),
            BlockEncodingMethod::R => (root, -&h),
        };
        let mut u = Array2::zeros((2 * d, 2 * d));
        u.slice_mut(s![..d, ..d]).assign(&h);
        u.slice_mut(s![..d, d..]).assign(&off_diagonal);
        u.slice_mut(s![d.., ..d]).assign(&off_diagonal);
        u.slice_mut(s![d.., d..]).assign(&lower_right);
        Ok(u)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{Field, IntegerLattice, ParticleType};
    use crate::gate::StandardGate;
    use crate::matrix::{allclose, is_unitary, kron};
    use crate::operator::DenseOperator;

    fn setup(h: Matrix, nsites: usize) -> (Arc<dyn Operator>, Field, Field) {
        let system = Field::new(ParticleType::Qubit, IntegerLattice::new([nsites], false));
        let aux = Field::new(ParticleType::Qubit, IntegerLattice::new([2], false));
        let op = DenseOperator::new(vec![system.clone()], h).unwrap();
        (Arc::new(op), system, aux)
    }

    #[test]
    fn test_matrix_requires_auxiliary_qubits() {
        let h = StandardGate::Z.matrix() * Complex64::new(0.5, 0.0);
        let (op, _, aux) = setup(h, 1);
        let mut gate = BlockEncodingGate::new(op, BlockEncodingMethod::Wx);
        assert!(matches!(
            gate.as_matrix(),
            Err(IrError::AuxiliaryQubitsNotSet { .. })
        ));
        assert_eq!(gate.num_wires().unwrap(), 2);
        gate.set_auxiliary_qubits(&[aux.qubit(0).unwrap()]).unwrap();
        assert!(gate.as_matrix().is_ok());
    }

    #[test]
    fn test_encoding_qubit_validation() {
        let h = StandardGate::X.matrix() * Complex64::new(0.5, 0.0);
        let (op, system, aux) = setup(h, 1);
        let mut gate = BlockEncodingGate::new(op, BlockEncodingMethod::R);
        assert!(matches!(
            gate.set_auxiliary_qubits(&[aux.qubit(0).unwrap(), aux.qubit(1).unwrap()]),
            Err(IrError::EncodingQubitCount { expected: 1, got: 2 })
        ));
        assert!(matches!(
            gate.set_auxiliary_qubits(&[system.qubit(0).unwrap()]),
            Err(IrError::InvalidWiring(_))
        ));
    }

    #[test]
    fn test_top_left_block_is_operator() {
        let z = StandardGate::Z.matrix();
        let x = StandardGate::X.matrix();
        let h = (kron(&z, &x) * Complex64::new(0.3, 0.0)) + kron(&x, &z) * Complex64::new(0.2, 0.0);
        for method in BlockEncodingMethod::ALL {
            let (op, _, aux) = setup(h.clone(), 2);
            let mut gate = BlockEncodingGate::new(op, method);
            gate.set_auxiliary_qubits(&[aux.qubit(1).unwrap()]).unwrap();
            let u = gate.as_matrix().unwrap();
            assert!(is_unitary(&u, 1e-10), "{method:?} not unitary");
            assert!(allclose(&u.slice(s![..4, ..4]).to_owned(), &h, 1e-12));
        }
    }

    #[test]
    fn test_scale_normalizes_operator() {
        let h = StandardGate::Z.matrix() * Complex64::new(3.0, 0.0);
        let (op, _, aux) = setup(h.clone(), 1);
        let mut gate = BlockEncodingGate::new(op, BlockEncodingMethod::Wx);
        gate.set_auxiliary_qubits(&[aux.qubit(0).unwrap()]).unwrap();
        assert!(matches!(
            gate.as_matrix(),
            Err(IrError::NormExceedsScale { .. })
        ));
        let gate = gate.with_scale(4.0);
        let u = gate.as_matrix().unwrap();
        let expected = h / Complex64::new(4.0, 0.0);
        assert!(allclose(&u.slice(s![..2, ..2]).to_owned(), &expected, 1e-12));
        assert!(matches!(
            gate.with_scale(0.0).as_matrix(),
            Err(IrError::InvalidScale(_))
        ));
    }
}
