//! Eigenvalue transformation gate.
//!
//! Alternates projector-controlled phase shifts with calls to a block
//! encoding, realizing `R(θ_{k-1})·U·…·U·R(θ₀)·U` on the system register,
//! the encoding register and one ancilla.

use tracing::debug;

use crate::block_encoding::BlockEncodingGate;
use crate::circuit::Circuit;
use crate::error::{IrError, IrResult};
use crate::field::Field;
use crate::matrix::{Matrix, identity, kron};
use crate::phase_shift::ProjectorControlledPhaseShift;
use crate::qubit::{Qubit, ensure_distinct};

/// Eigenvalue transformation built from a block encoding and a phase shift.
///
/// Wires are the block encoding's wires followed by the phase shift's ancilla.
#[derive(Debug, Clone)]
pub struct EigenvalueTransformationGate {
    block: BlockEncodingGate,
    processing: ProjectorControlledPhaseShift,
    theta_seq: Vec<f64>,
}

impl EigenvalueTransformationGate {
    /// Combine `block` and `processing`, which must share their encoding qubits.
    pub fn new(
        block: BlockEncodingGate,
        processing: ProjectorControlledPhaseShift,
        theta_seq: Vec<f64>,
    ) -> IrResult<Self> {
        let encoding = block
            .encoding_qubits()
            .ok_or_else(|| IrError::AuxiliaryQubitsNotSet {
                gate_name: "block_encoding".to_string(),
            })?;
        if encoding != processing.encoding_qubits() {
            return Err(IrError::InvalidWiring(
                "block encoding and phase shift act on different encoding qubits".to_string(),
            ));
        }
        let gate = Self {
            block,
            processing,
            theta_seq,
        };
        ensure_distinct(&gate.wires()?, "eigenvalue_transformation")?;
        Ok(gate)
    }

    /// The block encoding.
    pub fn block_encoding(&self) -> &BlockEncodingGate {
        &self.block
    }

    /// The phase shift template; its own angle is ignored.
    pub fn processing(&self) -> &ProjectorControlledPhaseShift {
        &self.processing
    }

    /// Phase angles, applied in order.
    pub fn theta_seq(&self) -> &[f64] {
        &self.theta_seq
    }

    /// Replace the phase angles.
    pub fn set_theta_seq(&mut self, theta_seq: Vec<f64>) {
        self.theta_seq = theta_seq;
    }

    /// Block wires followed by the ancilla.
    pub fn wires(&self) -> IrResult<Vec<Qubit>> {
        let mut wires = self.block.wires()?;
        wires.push(self.processing.ancilla().clone());
        Ok(wires)
    }

    fn phase_shift(&self, theta: f64) -> ProjectorControlledPhaseShift {
        let mut shift = self.processing.clone();
        shift.set_theta(theta);
        shift
    }

    /// Unitary over [`EigenvalueTransformationGate::wires`], composed from
    /// the sub-gates' own matrices.
    pub fn as_matrix(&self) -> IrResult<Matrix> {
        let system_dim = 1usize << self.block.system_wires()?.len();
        let u = kron(&identity(2), &self.block.as_matrix()?);
        debug!(
            dim = u.nrows(),
            steps = self.theta_seq.len(),
            "composing eigenvalue transformation"
        );
        let mut w = u.clone();
        for (j, &theta) in self.theta_seq.iter().enumerate() {
            if j > 0 {
                w = u.dot(&w);
            }
            let phase = kron(&self.phase_shift(theta).as_matrix(), &identity(system_dim));
            w = phase.dot(&w);
        }
        Ok(w)
    }

    /// Gate-level circuit with every phase shift decomposed into a
    /// controlled phase gate on the ancilla.
    pub fn as_circuit(&self) -> IrResult<Circuit> {
        let mut circuit = Circuit::new("eigenvalue_transformation");
        circuit.append_gate(self.block.clone())?;
        for (j, &theta) in self.theta_seq.iter().enumerate() {
            if j > 0 {
                circuit.append_gate(self.block.clone())?;
            }
            circuit.append_gate(self.phase_shift(theta).as_controlled_gate()?)?;
        }
        Ok(circuit)
    }

    /// Matrix of [`EigenvalueTransformationGate::as_circuit`] over the given field ordering.
    pub fn circuit_matrix(&self, fields: &[Field]) -> IrResult<Matrix> {
        self.as_circuit()?.as_matrix(fields)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use num_complex::Complex64;

    use super::*;
    use crate::block_encoding::BlockEncodingMethod;
    use crate::field::{IntegerLattice, ParticleType};
    use crate::gate::StandardGate;
    use crate::matrix::{allclose, is_unitary};
    use crate::operator::{DenseOperator, Operator};

    struct Setup {
        system: Field,
        aux: Field,
        gate: EigenvalueTransformationGate,
    }

    fn setup(method: BlockEncodingMethod, theta_seq: Vec<f64>) -> Setup {
        let system = Field::new(ParticleType::Qubit, IntegerLattice::new([2], false));
        let aux = Field::new(ParticleType::Qubit, IntegerLattice::new([2], false));
        let x = StandardGate::X.matrix();
        let z = StandardGate::Z.matrix();
        let h = kron(&x, &z) * Complex64::new(0.4, 0.0) + kron(&z, &identity(2)) * Complex64::new(0.3, 0.0);
        let op: Arc<dyn Operator> = Arc::new(DenseOperator::new(vec![system.clone()], h).unwrap());
        let mut block = BlockEncodingGate::new(op, method);
        let enc = aux.qubit(0).unwrap();
        block.set_auxiliary_qubits(&[enc.clone()]).unwrap();
        let processing = ProjectorControlledPhaseShift::new(vec![enc], aux.qubit(1).unwrap()).unwrap();
        let gate = EigenvalueTransformationGate::new(block, processing, theta_seq).unwrap();
        Setup { system, aux, gate }
    }

    #[test]
    fn test_empty_sequence_is_padded_block() {
        let s = setup(BlockEncodingMethod::R, vec![]);
        let expected = kron(&identity(2), &s.gate.block_encoding().as_matrix().unwrap());
        assert!(allclose(&s.gate.as_matrix().unwrap(), &expected, 1e-14));
    }

    #[test]
    fn test_zero_phase_is_padded_block() {
        let s = setup(BlockEncodingMethod::Wx, vec![0.0]);
        let expected = kron(&identity(2), &s.gate.block_encoding().as_matrix().unwrap());
        assert!(allclose(&s.gate.as_matrix().unwrap(), &expected, 1e-14));
    }

    #[test]
    fn test_composition_matches_circuit() {
        for method in BlockEncodingMethod::ALL {
            let s = setup(method, vec![0.3, -1.1, 2.4, 0.05]);
            let composed = s.gate.as_matrix().unwrap();
            let simulated = s.gate.circuit_matrix(&[s.system.clone(), s.aux.clone()]).unwrap();
            assert!(is_unitary(&composed, 1e-10));
            assert!(allclose(&composed, &simulated, 1e-10), "{method:?}");
        }
    }

    #[test]
    fn test_circuit_length() {
        let s = setup(BlockEncodingMethod::R, vec![0.1, 0.2, 0.3]);
        // U, then (phase, U) pairs, then the final phase
        assert_eq!(s.gate.as_circuit().unwrap().len(), 6);
    }

    #[test]
    fn test_mismatched_encoding_qubits_rejected() {
        let s = setup(BlockEncodingMethod::R, vec![]);
        let q = s.aux.qubits().unwrap();
        let processing = ProjectorControlledPhaseShift::new(vec![q[1].clone()], q[0].clone()).unwrap();
        assert!(matches!(
            EigenvalueTransformationGate::new(s.gate.block_encoding().clone(), processing, vec![]),
            Err(IrError::InvalidWiring(_))
        ));
    }

    #[test]
    fn test_ancilla_inside_block_rejected() {
        let s = setup(BlockEncodingMethod::R, vec![]);
        let enc = s.aux.qubit(0).unwrap();
        let processing = ProjectorControlledPhaseShift::new(vec![enc], s.system.qubit(0).unwrap()).unwrap();
        assert!(matches!(
            EigenvalueTransformationGate::new(s.gate.block_encoding().clone(), processing, vec![]),
            Err(IrError::DuplicateQubit { .. })
        ));
    }
}
