//! Projector-controlled phase shift.

use ndarray::Array2;
use num_complex::Complex64;

use crate::circuit::Circuit;
use crate::error::{IrError, IrResult};
use crate::gate::{ControlledGate, Gate, StandardGate};
use crate::matrix::Matrix;
use crate::qubit::{Qubit, ensure_distinct};

/// Phase `e^{iθ}` on the ancilla's |1⟩ component, applied only when the
/// encoding qubits are in the projector's basis state.
///
/// Wires are the encoding qubits followed by the ancilla.
#[derive(Debug, Clone)]
pub struct ProjectorControlledPhaseShift {
    encoding_qubits: Vec<Qubit>,
    ancilla: Qubit,
    projector: Vec<bool>,
    theta: f64,
}

impl ProjectorControlledPhaseShift {
    /// Phase shift projecting the encoding qubits onto |0…0⟩, with θ = 0.
    pub fn new(encoding_qubits: Vec<Qubit>, ancilla: Qubit) -> IrResult<Self> {
        if encoding_qubits.is_empty() {
            return Err(IrError::InvalidWiring(
                "projector-controlled phase shift needs at least one encoding qubit".to_string(),
            ));
        }
        let projector = vec![false; encoding_qubits.len()];
        let gate = Self {
            encoding_qubits,
            ancilla,
            projector,
            theta: 0.0,
        };
        ensure_distinct(&gate.wires(), "projector_phase_shift")?;
        Ok(gate)
    }

    /// Project onto an explicit basis state (`true` = |1⟩) of the encoding qubits.
    pub fn with_projector(mut self, projector: Vec<bool>) -> IrResult<Self> {
        if projector.len() != self.encoding_qubits.len() {
            return Err(IrError::ProjectorLength {
                expected: self.encoding_qubits.len(),
                got: projector.len(),
            });
        }
        self.projector = projector;
        Ok(self)
    }

    /// Current phase angle.
    pub fn theta(&self) -> f64 {
        self.theta
    }

    /// Set the phase angle.
    pub fn set_theta(&mut self, theta: f64) {
        self.theta = theta;
    }

    /// Encoding qubits.
    pub fn encoding_qubits(&self) -> &[Qubit] {
        &self.encoding_qubits
    }

    /// The ancilla receiving the phase.
    pub fn ancilla(&self) -> &Qubit {
        &self.ancilla
    }

    /// Projector bit pattern.
    pub fn projector(&self) -> &[bool] {
        &self.projector
    }

    /// Encoding qubits followed by the ancilla.
    pub fn wires(&self) -> Vec<Qubit> {
        let mut wires = self.encoding_qubits.clone();
        wires.push(self.ancilla.clone());
        wires
    }

    /// Diagonal unitary over [`ProjectorControlledPhaseShift::wires`].
    pub fn as_matrix(&self) -> Matrix {
        let m = self.encoding_qubits.len();
        let target = self.projector_index() | (1 << m);
        let phase = Complex64::from_polar(1.0, self.theta);
        let one = Complex64::new(1.0, 0.0);
        Array2::from_diag(&ndarray::Array1::from_shape_fn(2 << m, |i| {
            if i == target { phase } else { one }
        }))
    }

    /// Basis-state index of the projector on the encoding register.
    fn projector_index(&self) -> usize {
        self.projector
            .iter()
            .enumerate()
            .fold(0, |acc, (k, &bit)| acc | (usize::from(bit) << k))
    }

    /// The same operation as a phase gate on the ancilla, controlled on the projector pattern.
    pub fn as_controlled_gate(&self) -> IrResult<ControlledGate> {
        ControlledGate::new(
            Gate::standard(StandardGate::Phase(self.theta), self.ancilla.clone()),
            self.encoding_qubits.clone(),
        )?
        .with_pattern(self.projector.clone())
    }

    /// Single-instruction circuit of [`ProjectorControlledPhaseShift::as_controlled_gate`].
    pub fn as_circuit(&self) -> IrResult<Circuit> {
        let mut circuit = Circuit::new("projector_phase_shift");
        circuit.append_gate(self.as_controlled_gate()?)?;
        Ok(circuit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{Field, IntegerLattice, ParticleType};
    use crate::matrix::{allclose, identity, permute_wires};

    fn aux(n: usize) -> (Field, Vec<Qubit>) {
        let field = Field::new(ParticleType::Qubit, IntegerLattice::new([n], false));
        let qs = field.qubits().unwrap();
        (field, qs)
    }

    #[test]
    fn test_zero_angle_is_identity() {
        let (_, q) = aux(2);
        let gate = ProjectorControlledPhaseShift::new(vec![q[0].clone()], q[1].clone()).unwrap();
        assert!(allclose(&gate.as_matrix(), &identity(4), 0.0));
    }

    #[test]
    fn test_phase_on_projected_state_only() {
        let (_, q) = aux(3);
        let mut gate =
            ProjectorControlledPhaseShift::new(vec![q[0].clone(), q[1].clone()], q[2].clone())
                .unwrap()
                .with_projector(vec![true, false])
                .unwrap();
        gate.set_theta(0.9);
        let m = gate.as_matrix();
        let phase = Complex64::from_polar(1.0, 0.9);
        // ancilla = 1 (bit 2), encoding = 0b01
        assert_eq!(m[[0b101, 0b101]], phase);
        assert_eq!(m[[0b001, 0b001]], Complex64::new(1.0, 0.0));
        assert_eq!(m[[0b110, 0b110]], Complex64::new(1.0, 0.0));
    }

    #[test]
    fn test_controlled_gate_form_matches_up_to_wire_order() {
        let (_, q) = aux(3);
        let mut gate =
            ProjectorControlledPhaseShift::new(vec![q[0].clone(), q[1].clone()], q[2].clone())
                .unwrap()
                .with_projector(vec![false, true])
                .unwrap();
        gate.set_theta(-1.3);
        // controlled form orders wires as [ancilla, enc0, enc1]
        let controlled = gate.as_controlled_gate().unwrap().as_matrix().unwrap();
        let reordered = permute_wires(&controlled, &[1, 2, 0]).unwrap();
        assert!(allclose(&reordered, &gate.as_matrix(), 1e-14));
    }

    #[test]
    fn test_validation() {
        let (_, q) = aux(2);
        assert!(ProjectorControlledPhaseShift::new(vec![], q[0].clone()).is_err());
        assert!(matches!(
            ProjectorControlledPhaseShift::new(vec![q[0].clone()], q[0].clone()),
            Err(IrError::DuplicateQubit { .. })
        ));
        let gate = ProjectorControlledPhaseShift::new(vec![q[0].clone()], q[1].clone()).unwrap();
        assert!(matches!(
            gate.with_projector(vec![true, false]),
            Err(IrError::ProjectorLength { expected: 1, got: 2 })
        ));
    }
}
