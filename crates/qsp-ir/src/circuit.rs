//! Circuits as ordered gate lists, with dense simulation.

use ndarray::Array2;
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::error::{IrError, IrResult};
use crate::field::Field;
use crate::gate::{ControlledGate, Gate, StandardGate};
use crate::matrix::{Matrix, identity};
use crate::qubit::{Qubit, ensure_distinct};

/// A gate together with the wires it was appended on.
#[derive(Debug, Clone)]
pub struct Instruction {
    gate: Gate,
    wires: Vec<Qubit>,
}

impl Instruction {
    /// Bind `gate`, resolving and validating its wires.
    pub fn new(gate: Gate) -> IrResult<Self> {
        let wires = gate.wires()?;
        ensure_distinct(&wires, gate.name())?;
        Ok(Self { gate, wires })
    }

    /// The gate.
    pub fn gate(&self) -> &Gate {
        &self.gate
    }

    /// Wires of the gate, in the order of its matrix factors.
    pub fn wires(&self) -> &[Qubit] {
        &self.wires
    }
}

/// A quantum circuit.
///
/// Instructions are stored in time order: the first appended gate acts first.
#[derive(Debug, Clone, Default)]
pub struct Circuit {
    /// Name of the circuit.
    name: String,
    /// Instructions in application order.
    instructions: Vec<Instruction>,
}

impl Circuit {
    /// Create a new empty circuit.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            instructions: vec![],
        }
    }

    /// Get the circuit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of instructions.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Whether the circuit has no instructions.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Instructions in application order.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Append a gate.
    pub fn append_gate(&mut self, gate: impl Into<Gate>) -> IrResult<&mut Self> {
        self.instructions.push(Instruction::new(gate.into())?);
        Ok(self)
    }

    /// Append every instruction of another circuit.
    pub fn append_circuit(&mut self, other: &Circuit) -> &mut Self {
        self.instructions.extend(other.instructions.iter().cloned());
        self
    }

    /// Distinct fields touched by the circuit, in order of first appearance.
    pub fn fields(&self) -> Vec<Field> {
        let mut fields: Vec<Field> = Vec::new();
        for q in self.instructions.iter().flat_map(|inst| inst.wires.iter()) {
            if !fields.contains(q.field()) {
                fields.push(q.field().clone());
            }
        }
        fields
    }

    // =========================================================================
    // Standard gates
    // =========================================================================

    fn standard(&mut self, kind: StandardGate, qubit: &Qubit) -> IrResult<&mut Self> {
        self.append_gate(Gate::standard(kind, qubit.clone()))
    }

    /// Apply Pauli-X gate.
    pub fn x(&mut self, qubit: &Qubit) -> IrResult<&mut Self> {
        self.standard(StandardGate::X, qubit)
    }

    /// Apply Pauli-Y gate.
    pub fn y(&mut self, qubit: &Qubit) -> IrResult<&mut Self> {
        self.standard(StandardGate::Y, qubit)
    }

    /// Apply Pauli-Z gate.
    pub fn z(&mut self, qubit: &Qubit) -> IrResult<&mut Self> {
        self.standard(StandardGate::Z, qubit)
    }

    /// Apply Hadamard gate.
    pub fn h(&mut self, qubit: &Qubit) -> IrResult<&mut Self> {
        self.standard(StandardGate::H, qubit)
    }

    /// Apply S gate.
    pub fn s(&mut self, qubit: &Qubit) -> IrResult<&mut Self> {
        self.standard(StandardGate::S, qubit)
    }

    /// Apply S-dagger gate.
    pub fn sdg(&mut self, qubit: &Qubit) -> IrResult<&mut Self> {
        self.standard(StandardGate::Sdg, qubit)
    }

    /// Apply T gate.
    pub fn t(&mut self, qubit: &Qubit) -> IrResult<&mut Self> {
        self.standard(StandardGate::T, qubit)
    }

    /// Apply T-dagger gate.
    pub fn tdg(&mut self, qubit: &Qubit) -> IrResult<&mut Self> {
        self.standard(StandardGate::Tdg, qubit)
    }

    /// Apply Rx rotation.
    pub fn rx(&mut self, theta: f64, qubit: &Qubit) -> IrResult<&mut Self> {
        self.standard(StandardGate::Rx(theta), qubit)
    }

    /// Apply Ry rotation.
    pub fn ry(&mut self, theta: f64, qubit: &Qubit) -> IrResult<&mut Self> {
        self.standard(StandardGate::Ry(theta), qubit)
    }

    /// Apply Rz rotation.
    pub fn rz(&mut self, theta: f64, qubit: &Qubit) -> IrResult<&mut Self> {
        self.standard(StandardGate::Rz(theta), qubit)
    }

    /// Apply phase gate.
    pub fn p(&mut self, theta: f64, qubit: &Qubit) -> IrResult<&mut Self> {
        self.standard(StandardGate::Phase(theta), qubit)
    }

    /// Apply CNOT gate.
    pub fn cx(&mut self, control: &Qubit, target: &Qubit) -> IrResult<&mut Self> {
        let gate = ControlledGate::new(
            Gate::standard(StandardGate::X, target.clone()),
            vec![control.clone()],
        )?;
        self.append_gate(gate)
    }

    /// Apply controlled phase gate.
    pub fn cp(&mut self, theta: f64, control: &Qubit, target: &Qubit) -> IrResult<&mut Self> {
        let gate = ControlledGate::new(
            Gate::standard(StandardGate::Phase(theta), target.clone()),
            vec![control.clone()],
        )?;
        self.append_gate(gate)
    }

    // =========================================================================
    // Simulation
    // =========================================================================

    /// Unitary of the whole circuit over the joint space of `fields`.
    ///
    /// Each field's sites become consecutive wires, fields in the given
    /// order, so the first site of the first field is the least significant
    /// factor. Every field touched by the circuit must be listed; extra
    /// fields act as identity.
    pub fn as_matrix(&self, fields: &[Field]) -> IrResult<Matrix> {
        let mut offsets: FxHashMap<&Field, usize> = FxHashMap::default();
        let mut num_qubits = 0;
        for field in fields {
            field.require_two_level()?;
            if offsets.insert(field, num_qubits).is_some() {
                return Err(IrError::InvalidWiring(format!(
                    "field {field} listed twice in the field ordering"
                )));
            }
            num_qubits += field.nsites();
        }
        debug!(
            circuit = %self.name,
            instructions = self.instructions.len(),
            num_qubits,
            "simulating circuit"
        );

        let mut result = identity(1 << num_qubits);
        for inst in &self.instructions {
            let positions = inst
                .wires
                .iter()
                .map(|q| {
                    offsets
                        .get(q.field())
                        .map(|offset| offset + q.index())
                        .ok_or_else(|| IrError::MissingField {
                            field: q.field().to_string(),
                        })
                })
                .collect::<IrResult<Vec<_>>>()?;
            let local = inst.gate.as_matrix()?;
            let expected = 1usize << positions.len();
            if local.nrows() != expected {
                return Err(IrError::DimensionMismatch {
                    expected,
                    got: local.nrows(),
                });
            }
            trace!(gate = inst.gate.name(), ?positions, "applying gate");
            result = embed(&local, &positions, num_qubits).dot(&result);
        }
        Ok(result)
    }
}

/// Lift a gate matrix acting on `positions` to the full `num_qubits` space.
fn embed(local: &Matrix, positions: &[usize], num_qubits: usize) -> Matrix {
    let dim = 1usize << num_qubits;
    let scatter = |a: usize| {
        positions
            .iter()
            .enumerate()
            .fold(0usize, |acc, (k, &p)| acc | (((a >> k) & 1) << p))
    };
    let spread: Vec<usize> = (0..local.nrows()).map(scatter).collect();
    let mask = spread.iter().fold(0, |acc, &s| acc | s);
    let mut m = Array2::zeros((dim, dim));
    for rest in (0..dim).filter(|x| x & mask == 0) {
        for (a, &ra) in spread.iter().enumerate() {
            for (b, &rb) in spread.iter().enumerate() {
                m[[rest | ra, rest | rb]] = local[[a, b]];
            }
        }
    }
    m
}

#[cfg(test)]
mod tests {
    use num_complex::Complex64;

    use super::*;
    use crate::field::{IntegerLattice, ParticleType};
    use crate::matrix::{allclose, kron};

    fn qubits(n: usize) -> (Field, Vec<Qubit>) {
        let field = Field::new(ParticleType::Qubit, IntegerLattice::new([n], false));
        let qs = field.qubits().unwrap();
        (field, qs)
    }

    #[test]
    fn test_circuit_builder() {
        let (field, q) = qubits(2);
        let mut circuit = Circuit::new("bell");
        circuit.h(&q[0]).unwrap().cx(&q[0], &q[1]).unwrap();
        assert_eq!(circuit.name(), "bell");
        assert_eq!(circuit.len(), 2);
        assert!(!circuit.is_empty());
        assert_eq!(circuit.fields(), vec![field]);
    }

    #[test]
    fn test_bell_state_column() {
        let (field, q) = qubits(2);
        let mut circuit = Circuit::new("bell");
        circuit.h(&q[0]).unwrap().cx(&q[0], &q[1]).unwrap();
        let u = circuit.as_matrix(&[field]).unwrap();
        let s = std::f64::consts::FRAC_1_SQRT_2;
        assert!((u[[0, 0]] - Complex64::new(s, 0.0)).norm() < 1e-12);
        assert!((u[[3, 0]] - Complex64::new(s, 0.0)).norm() < 1e-12);
        assert!(u[[1, 0]].norm() < 1e-12);
        assert!(u[[2, 0]].norm() < 1e-12);
    }

    #[test]
    fn test_wire_placement_follows_field_order() {
        let (a, qa) = qubits(1);
        let (b, _) = qubits(1);
        let mut circuit = Circuit::new("x");
        circuit.x(&qa[0]).unwrap();
        let x = StandardGate::X.matrix();
        let ab = circuit.as_matrix(&[a.clone(), b.clone()]).unwrap();
        assert!(allclose(&ab, &kron(&identity(2), &x), 0.0));
        let ba = circuit.as_matrix(&[b, a]).unwrap();
        assert!(allclose(&ba, &kron(&x, &identity(2)), 0.0));
    }

    #[test]
    fn test_time_order() {
        let (field, q) = qubits(1);
        let mut circuit = Circuit::new("order");
        circuit.h(&q[0]).unwrap().s(&q[0]).unwrap();
        let expected = StandardGate::S.matrix().dot(&StandardGate::H.matrix());
        assert!(allclose(&circuit.as_matrix(&[field]).unwrap(), &expected, 1e-14));
    }

    #[test]
    fn test_reversed_cnot_embedding() {
        let (field, q) = qubits(3);
        let mut circuit = Circuit::new("cx");
        circuit.cx(&q[2], &q[0]).unwrap();
        let u = circuit.as_matrix(&[field]).unwrap();
        // |100⟩ → |101⟩
        assert_eq!(u[[0b101, 0b100]], Complex64::new(1.0, 0.0));
        assert_eq!(u[[0b011, 0b011]], Complex64::new(1.0, 0.0));
    }

    #[test]
    fn test_append_circuit() {
        let (field, q) = qubits(1);
        let mut a = Circuit::new("a");
        a.t(&q[0]).unwrap();
        let mut b = Circuit::new("b");
        b.t(&q[0]).unwrap();
        a.append_circuit(&b);
        assert_eq!(a.len(), 2);
        let expected = StandardGate::S.matrix();
        assert!(allclose(&a.as_matrix(&[field]).unwrap(), &expected, 1e-14));
    }

    #[test]
    fn test_field_ordering_errors() {
        let (a, qa) = qubits(1);
        let (b, _) = qubits(1);
        let mut circuit = Circuit::new("x");
        circuit.x(&qa[0]).unwrap();
        assert!(matches!(
            circuit.as_matrix(std::slice::from_ref(&b)),
            Err(IrError::MissingField { .. })
        ));
        assert!(matches!(
            circuit.as_matrix(&[a.clone(), a.clone()]),
            Err(IrError::InvalidWiring(_))
        ));
        let bosons = Field::with_local_dim(ParticleType::Boson, IntegerLattice::new([1], false), 3)
            .unwrap();
        assert!(matches!(
            circuit.as_matrix(&[a, bosons]),
            Err(IrError::NotTwoLevel { .. })
        ));
    }

    #[test]
    fn test_empty_circuit_is_identity() {
        let (field, _) = qubits(2);
        let circuit = Circuit::new("empty");
        assert!(circuit.is_empty());
        assert!(allclose(&circuit.as_matrix(&[field]).unwrap(), &identity(4), 0.0));
    }
}
