//! Quantum gate types.
//!
//! Every gate is bound to the qubits it acts on. [`Gate::as_matrix`] returns
//! the unitary over the gate's own [`Gate::wires`], wire 0 being the least
//! significant tensor factor.

use std::sync::Arc;

use ndarray::{array, s};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::block_encoding::BlockEncodingGate;
use crate::error::{IrError, IrResult};
use crate::field::Field;
use crate::matrix::{Matrix, expm_hermitian, identity};
use crate::operator::{Operator, qubit_wires};
use crate::phase_shift::ProjectorControlledPhaseShift;
use crate::qubit::{Qubit, ensure_distinct};
use crate::transform::EigenvalueTransformationGate;

/// Standard single-qubit gates with known semantics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum StandardGate {
    /// Identity gate.
    I,
    /// Pauli-X gate.
    X,
    /// Pauli-Y gate.
    Y,
    /// Pauli-Z gate.
    Z,
    /// Hadamard gate.
    H,
    /// S gate (sqrt(Z)).
    S,
    /// S-dagger gate.
    Sdg,
    /// T gate (fourth root of Z).
    T,
    /// T-dagger gate.
    Tdg,
    /// Rotation around X axis.
    Rx(f64),
    /// Rotation around Y axis.
    Ry(f64),
    /// Rotation around Z axis.
    Rz(f64),
    /// Phase gate `diag(1, e^{iθ})`.
    Phase(f64),
    /// Rotation `exp(-i θ/2 n·σ)` around a unit axis.
    Rotation {
        /// Rotation angle θ.
        angle: f64,
        /// Unit rotation axis (x, y, z).
        axis: [f64; 3],
    },
}

impl StandardGate {
    /// Rotation around an arbitrary axis; the axis is normalized.
    pub fn rotation(angle: f64, axis: [f64; 3]) -> IrResult<Self> {
        let norm = axis.iter().map(|a| a * a).sum::<f64>().sqrt();
        if norm == 0.0 || !norm.is_finite() {
            return Err(IrError::ZeroRotationAxis);
        }
        Ok(StandardGate::Rotation {
            angle,
            axis: axis.map(|a| a / norm),
        })
    }

    /// Get the name of this gate.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            StandardGate::I => "id",
            StandardGate::X => "x",
            StandardGate::Y => "y",
            StandardGate::Z => "z",
            StandardGate::H => "h",
            StandardGate::S => "s",
            StandardGate::Sdg => "sdg",
            StandardGate::T => "t",
            StandardGate::Tdg => "tdg",
            StandardGate::Rx(_) => "rx",
            StandardGate::Ry(_) => "ry",
            StandardGate::Rz(_) => "rz",
            StandardGate::Phase(_) => "p",
            StandardGate::Rotation { .. } => "rot",
        }
    }

    /// The 2x2 unitary of this gate.
    pub fn matrix(&self) -> Matrix {
        let c = |re: f64, im: f64| Complex64::new(re, im);
        let zero = c(0.0, 0.0);
        let one = c(1.0, 0.0);
        match *self {
            StandardGate::I => identity(2),
            StandardGate::X => array![[zero, one], [one, zero]],
            StandardGate::Y => array![[zero, c(0.0, -1.0)], [c(0.0, 1.0), zero]],
            StandardGate::Z => array![[one, zero], [zero, -one]],
            StandardGate::H => {
                let s = std::f64::consts::FRAC_1_SQRT_2;
                array![[c(s, 0.0), c(s, 0.0)], [c(s, 0.0), c(-s, 0.0)]]
            }
            StandardGate::S => StandardGate::Phase(std::f64::consts::FRAC_PI_2).matrix(),
            StandardGate::Sdg => StandardGate::Phase(-std::f64::consts::FRAC_PI_2).matrix(),
            StandardGate::T => StandardGate::Phase(std::f64::consts::FRAC_PI_4).matrix(),
            StandardGate::Tdg => StandardGate::Phase(-std::f64::consts::FRAC_PI_4).matrix(),
            StandardGate::Rx(theta) => rotation_matrix(theta, [1.0, 0.0, 0.0]),
            StandardGate::Ry(theta) => rotation_matrix(theta, [0.0, 1.0, 0.0]),
            StandardGate::Rz(theta) => rotation_matrix(theta, [0.0, 0.0, 1.0]),
            StandardGate::Phase(theta) => {
                array![[one, zero], [zero, Complex64::from_polar(1.0, theta)]]
            }
            StandardGate::Rotation { angle, axis } => rotation_matrix(angle, axis),
        }
    }
}

/// `exp(-i θ/2 (nx X + ny Y + nz Z))` for a unit axis `n`.
fn rotation_matrix(theta: f64, [nx, ny, nz]: [f64; 3]) -> Matrix {
    let (s, c) = (theta / 2.0).sin_cos();
    array![
        [Complex64::new(c, -s * nz), Complex64::new(-s * ny, -s * nx)],
        [Complex64::new(s * ny, -s * nx), Complex64::new(c, s * nz)]
    ]
}

/// A standard gate placed on one qubit.
#[derive(Debug, Clone, PartialEq)]
pub struct SingleQubitGate {
    /// The gate kind.
    pub kind: StandardGate,
    /// The qubit it acts on.
    pub qubit: Qubit,
}

impl SingleQubitGate {
    /// Place `kind` on `qubit`.
    pub fn new(kind: StandardGate, qubit: Qubit) -> Self {
        Self { kind, qubit }
    }
}

/// A gate applied only when its control qubits match a bit pattern.
///
/// Controls follow the target wires, so they are the most significant factors
/// of the matrix.
#[derive(Debug, Clone)]
pub struct ControlledGate {
    target: Box<Gate>,
    controls: Vec<Qubit>,
    pattern: Vec<bool>,
}

impl ControlledGate {
    /// Control `target` on all `controls` being in |1⟩.
    pub fn new(target: Gate, controls: Vec<Qubit>) -> IrResult<Self> {
        let pattern = vec![true; controls.len()];
        let gate = Self {
            target: Box::new(target),
            controls,
            pattern,
        };
        ensure_distinct(&gate.wires()?, "controlled")?;
        Ok(gate)
    }

    /// Activate on an explicit control pattern (`true` = |1⟩) instead.
    pub fn with_pattern(mut self, pattern: Vec<bool>) -> IrResult<Self> {
        if pattern.len() != self.controls.len() {
            return Err(IrError::ProjectorLength {
                expected: self.controls.len(),
                got: pattern.len(),
            });
        }
        self.pattern = pattern;
        Ok(self)
    }

    /// The wrapped gate.
    pub fn target(&self) -> &Gate {
        &self.target
    }

    /// Control qubits.
    pub fn controls(&self) -> &[Qubit] {
        &self.controls
    }

    /// Control pattern.
    pub fn pattern(&self) -> &[bool] {
        &self.pattern
    }

    /// Target wires followed by the control qubits.
    pub fn wires(&self) -> IrResult<Vec<Qubit>> {
        let mut wires = self.target.wires()?;
        wires.extend(self.controls.iter().cloned());
        Ok(wires)
    }

    /// Block-diagonal unitary: target on the active control block, identity elsewhere.
    pub fn as_matrix(&self) -> IrResult<Matrix> {
        let target = self.target.as_matrix()?;
        let dt = target.nrows();
        let mut m = identity(dt << self.controls.len());
        let active = self
            .pattern
            .iter()
            .enumerate()
            .fold(0usize, |acc, (k, &bit)| acc | (usize::from(bit) << k));
        let block = active * dt..(active + 1) * dt;
        m.slice_mut(s![block.clone(), block]).assign(&target);
        Ok(m)
    }
}

/// Time evolution `exp(-i t H)` under a Hamiltonian on qubit fields.
#[derive(Debug, Clone)]
pub struct TimeEvolutionGate {
    h: Arc<dyn Operator>,
    t: f64,
}

impl TimeEvolutionGate {
    /// Evolve under `h` for time `t`.
    pub fn new(h: Arc<dyn Operator>, t: f64) -> Self {
        Self { h, t }
    }

    /// The generating Hamiltonian.
    pub fn hamiltonian(&self) -> &Arc<dyn Operator> {
        &self.h
    }

    /// Evolution time.
    pub fn time(&self) -> f64 {
        self.t
    }

    /// Change the evolution time.
    pub fn set_time(&mut self, t: f64) {
        self.t = t;
    }

    /// Every qubit of the Hamiltonian's fields.
    pub fn wires(&self) -> IrResult<Vec<Qubit>> {
        qubit_wires(self.h.as_ref())
    }

    /// `exp(-i t H)`.
    pub fn as_matrix(&self) -> IrResult<Matrix> {
        let h = self.h.as_matrix()?;
        let expected = 1usize << self.wires()?.len();
        if h.nrows() != expected {
            return Err(IrError::DimensionMismatch {
                expected,
                got: h.nrows(),
            });
        }
        expm_hermitian(&h, self.t)
    }
}

/// A quantum gate bound to its qubits.
#[derive(Debug, Clone)]
pub enum Gate {
    /// Standard single-qubit gate.
    Single(SingleQubitGate),
    /// Controlled wrapper around another gate.
    Controlled(ControlledGate),
    /// Hamiltonian time evolution.
    TimeEvolution(TimeEvolutionGate),
    /// Block encoding of a Hermitian operator.
    BlockEncoding(BlockEncodingGate),
    /// Projector-controlled phase shift.
    PhaseShift(ProjectorControlledPhaseShift),
    /// Eigenvalue transformation by alternating phase shifts and block encodings.
    EigenvalueTransformation(EigenvalueTransformationGate),
}

impl Gate {
    /// Place a standard gate on a qubit.
    pub fn standard(kind: StandardGate, qubit: Qubit) -> Self {
        Gate::Single(SingleQubitGate::new(kind, qubit))
    }

    /// Get the name of this gate.
    pub fn name(&self) -> &str {
        match self {
            Gate::Single(g) => g.kind.name(),
            Gate::Controlled(_) => "controlled",
            Gate::TimeEvolution(_) => "time_evolution",
            Gate::BlockEncoding(_) => "block_encoding",
            Gate::PhaseShift(_) => "projector_phase_shift",
            Gate::EigenvalueTransformation(_) => "eigenvalue_transformation",
        }
    }

    /// Qubits the gate acts on, in the order of its matrix factors.
    pub fn wires(&self) -> IrResult<Vec<Qubit>> {
        match self {
            Gate::Single(g) => Ok(vec![g.qubit.clone()]),
            Gate::Controlled(g) => g.wires(),
            Gate::TimeEvolution(g) => g.wires(),
            Gate::BlockEncoding(g) => g.wires(),
            Gate::PhaseShift(g) => Ok(g.wires()),
            Gate::EigenvalueTransformation(g) => g.wires(),
        }
    }

    /// Number of wires.
    pub fn num_wires(&self) -> IrResult<usize> {
        match self {
            Gate::BlockEncoding(g) => g.num_wires(),
            _ => Ok(self.wires()?.len()),
        }
    }

    /// Distinct fields touched by the gate, in wire order.
    pub fn fields(&self) -> IrResult<Vec<Field>> {
        let mut fields: Vec<Field> = Vec::new();
        for q in self.wires()? {
            if !fields.contains(q.field()) {
                fields.push(q.field().clone());
            }
        }
        Ok(fields)
    }

    /// Unitary over [`Gate::wires`].
    pub fn as_matrix(&self) -> IrResult<Matrix> {
        match self {
            Gate::Single(g) => Ok(g.kind.matrix()),
            Gate::Controlled(g) => g.as_matrix(),
            Gate::TimeEvolution(g) => g.as_matrix(),
            Gate::BlockEncoding(g) => g.as_matrix(),
            Gate::PhaseShift(g) => Ok(g.as_matrix()),
            Gate::EigenvalueTransformation(g) => g.as_matrix(),
        }
    }
}

impl From<SingleQubitGate> for Gate {
    fn from(gate: SingleQubitGate) -> Self {
        Gate::Single(gate)
    }
}

impl From<ControlledGate> for Gate {
    fn from(gate: ControlledGate) -> Self {
        Gate::Controlled(gate)
    }
}

impl From<TimeEvolutionGate> for Gate {
    fn from(gate: TimeEvolutionGate) -> Self {
        Gate::TimeEvolution(gate)
    }
}

impl From<BlockEncodingGate> for Gate {
    fn from(gate: BlockEncodingGate) -> Self {
        Gate::BlockEncoding(gate)
    }
}

impl From<ProjectorControlledPhaseShift> for Gate {
    fn from(gate: ProjectorControlledPhaseShift) -> Self {
        Gate::PhaseShift(gate)
    }
}

impl From<EigenvalueTransformationGate> for Gate {
    fn from(gate: EigenvalueTransformationGate) -> Self {
        Gate::EigenvalueTransformation(gate)
    }
}
