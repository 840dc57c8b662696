//! Eigenvalue transformation by quantum signal processing.
//!
//! Given a block encoding `U` of a Hermitian `H` on the system register and
//! encoding qubits, and an ancilla, the transformation with phase angles
//! `θ₀ … θ_{k-1}` is
//!
//!   W(θ) = R(θ_{k-1}) · U · R(θ_{k-2}) · U · … · U · R(θ₀) · U
//!
//! where `R(θ)` is the projector-controlled phase shift. The block encoding
//! is applied once before the first phase, so an empty sequence leaves `U`.
//!
//! Matrices act on the wires `[system…, encoding…, ancilla]`, i.e. on
//! `ancilla ⊗ encoding ⊗ system`.

use std::sync::Arc;

use ndarray::{Array2, s};
use num_complex::Complex64;
use tracing::{debug, trace};

use qsp_ir::{
    BlockEncodingGate, BlockEncodingMethod, Circuit, EigenvalueTransformationGate, IrError,
    Matrix, Operator, ProjectorControlledPhaseShift, Qubit,
};

use crate::error::SimResult;

/// QSP eigenvalue transformation of a Hermitian operator.
#[derive(Debug, Clone)]
pub struct EigenvalueTransformation {
    block: BlockEncodingGate,
    phase: ProjectorControlledPhaseShift,
    theta_seq: Vec<f64>,
}

impl EigenvalueTransformation {
    /// Transformation of `h` block-encoded with `method` on `q_enc`, with
    /// phases on `q_anc` conditioned on the encoding qubits being in the
    /// basis state `projector` (`true` = |1⟩).
    pub fn new(
        h: Arc<dyn Operator>,
        method: BlockEncodingMethod,
        q_enc: Vec<Qubit>,
        q_anc: Qubit,
        projector: Vec<bool>,
        theta_seq: Vec<f64>,
    ) -> SimResult<Self> {
        let mut block = BlockEncodingGate::new(h, method);
        block.set_auxiliary_qubits(&q_enc)?;
        if block.system_wires()?.contains(&q_anc) {
            return Err(IrError::InvalidWiring(format!(
                "ancilla {q_anc} is part of the encoded operator's register"
            ))
            .into());
        }
        let phase = ProjectorControlledPhaseShift::new(q_enc, q_anc)?.with_projector(projector)?;
        Ok(Self {
            block,
            phase,
            theta_seq,
        })
    }

    /// Encode `h / scale` instead of `h`.
    #[must_use]
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.block = self.block.with_scale(scale);
        self
    }

    /// The block encoding `U`.
    pub fn block_encoding(&self) -> &BlockEncodingGate {
        &self.block
    }

    /// The phase shift template `R`; its own angle is ignored.
    pub fn phase_shift(&self) -> &ProjectorControlledPhaseShift {
        &self.phase
    }

    /// Phase angles, applied in order.
    pub fn theta_seq(&self) -> &[f64] {
        &self.theta_seq
    }

    /// Replace the phase angles; wiring and operator are unchanged.
    pub fn set_theta_seq(&mut self, theta_seq: Vec<f64>) {
        self.theta_seq = theta_seq;
    }

    /// System wires, then the encoding qubits, then the ancilla.
    pub fn wires(&self) -> SimResult<Vec<Qubit>> {
        let mut wires = self.block.wires()?;
        wires.push(self.phase.ancilla().clone());
        Ok(wires)
    }

    /// Closed-form matrix of the transformation.
    ///
    /// `W` is block diagonal in the ancilla: the ancilla-|0⟩ block is `U^k`
    /// and the ancilla-|1⟩ block interleaves `U` with the diagonal phase on
    /// the projector's rows.
    pub fn as_matrix(&self) -> SimResult<Matrix> {
        let u = self.block.as_matrix()?;
        let d = u.nrows();
        let num_system = self.block.system_wires()?.len();
        let pattern = self
            .phase
            .projector()
            .iter()
            .enumerate()
            .fold(0usize, |acc, (k, &bit)| acc | (usize::from(bit) << k));
        let projected_rows: Vec<usize> = (0..d).filter(|r| r >> num_system == pattern).collect();
        debug!(
            dim = 2 * d,
            steps = self.theta_seq.len(),
            "closed-form eigenvalue transformation"
        );

        let mut idle = u.clone();
        let mut active = u.clone();
        for (j, &theta) in self.theta_seq.iter().enumerate() {
            if j > 0 {
                idle = u.dot(&idle);
                active = u.dot(&active);
            }
            trace!(step = j, theta, "phase shift");
            let phase = Complex64::from_polar(1.0, theta);
            for &r in &projected_rows {
                active.row_mut(r).mapv_inplace(|z| z * phase);
            }
        }

        let mut w = Array2::zeros((2 * d, 2 * d));
        w.slice_mut(s![..d, ..d]).assign(&idle);
        w.slice_mut(s![d.., d..]).assign(&active);
        Ok(w)
    }

    /// Circuit applying the block encoding and phase shifts as individual gates.
    pub fn as_circuit(&self) -> SimResult<Circuit> {
        let mut circuit = Circuit::new("eigenvalue_transformation");
        circuit.append_gate(self.block.clone())?;
        for (j, &theta) in self.theta_seq.iter().enumerate() {
            if j > 0 {
                circuit.append_gate(self.block.clone())?;
            }
            let mut shift = self.phase.clone();
            shift.set_theta(theta);
            circuit.append_gate(shift)?;
        }
        Ok(circuit)
    }

    /// The equivalent single gate.
    pub fn as_gate(&self) -> SimResult<EigenvalueTransformationGate> {
        Ok(EigenvalueTransformationGate::new(
            self.block.clone(),
            self.phase.clone(),
            self.theta_seq.clone(),
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qsp_ir::matrix::{allclose, identity, is_unitary, kron};
    use qsp_ir::{Field, IntegerLattice, ParticleType};

    use crate::error::SimError;
    use crate::hamiltonian::IsingHamiltonian;

    struct Setup {
        system: Field,
        aux: Field,
        transform: EigenvalueTransformation,
    }

    fn setup(method: BlockEncodingMethod, projector: bool, theta_seq: Vec<f64>) -> Setup {
        let system = Field::new(ParticleType::Qubit, IntegerLattice::new([3], false));
        let aux = Field::new(ParticleType::Qubit, IntegerLattice::new([2], false));
        let h = IsingHamiltonian::new(system.clone(), 0.1, 0.05, 0.1).unwrap();
        let transform = EigenvalueTransformation::new(
            Arc::new(h),
            method,
            vec![aux.qubit(0).unwrap()],
            aux.qubit(1).unwrap(),
            vec![projector],
            theta_seq,
        )
        .unwrap();
        Setup {
            system,
            aux,
            transform,
        }
    }

    #[test]
    fn test_empty_sequence_is_padded_block() {
        let s = setup(BlockEncodingMethod::Wx, false, vec![]);
        let block = s.transform.block_encoding().as_matrix().unwrap();
        assert!(allclose(
            &s.transform.as_matrix().unwrap(),
            &kron(&identity(2), &block),
            1e-14
        ));
    }

    #[test]
    fn test_closed_form_matches_gate_and_circuit() {
        for method in BlockEncodingMethod::ALL {
            for projector in [false, true] {
                let s = setup(method, projector, vec![0.4, 1.7, -2.2]);
                let closed = s.transform.as_matrix().unwrap();
                assert!(is_unitary(&closed, 1e-10));
                let gate = s.transform.as_gate().unwrap().as_matrix().unwrap();
                assert!(allclose(&closed, &gate, 1e-10), "{method:?} gate");
                let fields = [s.system.clone(), s.aux.clone()];
                let circuit = s.transform.as_circuit().unwrap().as_matrix(&fields).unwrap();
                assert!(allclose(&closed, &circuit, 1e-10), "{method:?} circuit");
            }
        }
    }

    #[test]
    fn test_set_theta_seq_keeps_wiring() {
        let mut s = setup(BlockEncodingMethod::R, false, vec![0.1]);
        let wires = s.transform.wires().unwrap();
        let dim = s.transform.as_matrix().unwrap().nrows();
        s.transform.set_theta_seq(vec![0.5, 0.6, 0.7, 0.8]);
        assert_eq!(s.transform.wires().unwrap(), wires);
        assert_eq!(s.transform.as_matrix().unwrap().nrows(), dim);
        assert_eq!(s.transform.theta_seq(), &[0.5, 0.6, 0.7, 0.8]);
        assert_eq!(s.transform.as_circuit().unwrap().len(), 8);
    }

    #[test]
    fn test_wiring_validation() {
        let system = Field::new(ParticleType::Qubit, IntegerLattice::new([2], false));
        let aux = Field::new(ParticleType::Qubit, IntegerLattice::new([2], false));
        let h = Arc::new(IsingHamiltonian::new(system.clone(), 0.1, 0.1, 0.1).unwrap());
        let enc = aux.qubit(0).unwrap();
        let anc = aux.qubit(1).unwrap();
        let build = |q_enc: Vec<Qubit>, q_anc: Qubit, projector: Vec<bool>| {
            EigenvalueTransformation::new(
                h.clone(),
                BlockEncodingMethod::Wx,
                q_enc,
                q_anc,
                projector,
                vec![],
            )
        };
        assert!(matches!(
            build(vec![enc.clone(), anc.clone()], anc.clone(), vec![false]),
            Err(SimError::Ir(IrError::EncodingQubitCount { .. }))
        ));
        assert!(matches!(
            build(vec![enc.clone()], enc.clone(), vec![false]),
            Err(SimError::Ir(IrError::DuplicateQubit { .. }))
        ));
        assert!(matches!(
            build(vec![enc.clone()], system.qubit(0).unwrap(), vec![false]),
            Err(SimError::Ir(IrError::InvalidWiring(_)))
        ));
        assert!(matches!(
            build(vec![enc], anc, vec![false, true]),
            Err(SimError::Ir(IrError::ProjectorLength { .. }))
        ));
    }
}
