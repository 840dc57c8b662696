//! Reference QSP scenario: a random Heisenberg chain with two auxiliary qubits.

use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{StandardNormal, Uniform};
use tracing::{debug, info};

use qsp_ir::matrix::{hermitian_norm, max_abs_diff};
use qsp_ir::{BlockEncodingMethod, Field, IntegerLattice, Operator, ParticleType};
use qsp_sim::{EigenvalueTransformation, HeisenbergHamiltonian, SimResult};

/// Normalization margin: the Hamiltonian is rescaled to spectral norm `1 / NORM_MARGIN`.
pub const NORM_MARGIN: f64 = 1.25;

/// System field, auxiliary field and a rescaled Heisenberg Hamiltonian.
#[derive(Debug, Clone)]
pub struct QspScenario {
    /// Periodic chain carrying the Hamiltonian.
    pub system: Field,
    /// Two-site register: encoding qubit on site 0, ancilla on site 1.
    pub aux: Field,
    /// The rescaled Hamiltonian.
    pub hamiltonian: Arc<HeisenbergHamiltonian>,
    /// Spectral norm before rescaling.
    pub original_norm: f64,
}

impl QspScenario {
    /// Random Heisenberg chain of `nsites` sites with couplings drawn from `seed`.
    pub fn heisenberg(nsites: usize, seed: u64) -> SimResult<Self> {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut normal = || rng.sample::<f64, _>(StandardNormal);
        let j = [normal(), normal(), normal()];
        let h = [normal(), normal(), normal()];

        let system = Field::new(ParticleType::Qubit, IntegerLattice::new([nsites], true));
        let aux = Field::new(ParticleType::Qubit, IntegerLattice::new([2], false));
        let mut hamiltonian = HeisenbergHamiltonian::new(system.clone(), j, h)?;
        let original_norm = hermitian_norm(&hamiltonian.as_matrix()?)?;
        hamiltonian.rescale(1.0 / (NORM_MARGIN * original_norm))?;
        info!(nsites, seed, original_norm, "built Heisenberg scenario");
        Ok(Self {
            system,
            aux,
            hamiltonian: Arc::new(hamiltonian),
            original_norm,
        })
    }

    /// Field ordering for circuit simulation.
    pub fn fields(&self) -> [Field; 2] {
        [self.system.clone(), self.aux.clone()]
    }

    /// Eigenvalue transformation projecting the encoding qubit onto |0⟩.
    pub fn transformation(
        &self,
        method: BlockEncodingMethod,
        theta_seq: Vec<f64>,
    ) -> SimResult<EigenvalueTransformation> {
        EigenvalueTransformation::new(
            self.hamiltonian.clone(),
            method,
            vec![self.aux.qubit(0)?],
            self.aux.qubit(1)?,
            vec![false],
            theta_seq,
        )
    }
}

/// `len` phase angles drawn uniformly from `[0, 2π)`.
pub fn random_phases(len: usize, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let angles = Uniform::new(0.0, 2.0 * std::f64::consts::PI);
    (0..len).map(|_| rng.sample(angles)).collect()
}

/// Largest deviations between the matrix paths for one sequence length.
#[derive(Debug, Clone)]
pub struct PathDeviation {
    /// Number of phase angles.
    pub steps: usize,
    /// Closed form against gate composition.
    pub gate: f64,
    /// Closed form against the simulated gate-level circuit.
    pub gate_circuit: f64,
    /// Closed form against the simulated circuit of the transformation itself.
    pub circuit: f64,
    /// Wall time for all four matrices.
    pub elapsed: Duration,
}

impl PathDeviation {
    /// Largest of the three deviations.
    pub fn max(&self) -> f64 {
        self.gate.max(self.gate_circuit).max(self.circuit)
    }
}

/// Compare every matrix path for each prefix `theta[..k]`, `k = 1..=theta.len()`.
pub fn compare_paths(
    qsp: &mut EigenvalueTransformation,
    fields: &[Field],
    theta: &[f64],
) -> SimResult<Vec<PathDeviation>> {
    let mut gate = qsp.as_gate()?;
    let mut report = Vec::with_capacity(theta.len());
    for steps in 1..=theta.len() {
        let start = Instant::now();
        qsp.set_theta_seq(theta[..steps].to_vec());
        gate.set_theta_seq(theta[..steps].to_vec());
        let closed = qsp.as_matrix()?;
        let composed = gate.as_matrix()?;
        let gate_circuit = gate.circuit_matrix(fields)?;
        let circuit = qsp.as_circuit()?.as_matrix(fields)?;
        let deviation = PathDeviation {
            steps,
            gate: max_abs_diff(&closed, &composed),
            gate_circuit: max_abs_diff(&closed, &gate_circuit),
            circuit: max_abs_diff(&closed, &circuit),
            elapsed: start.elapsed(),
        };
        debug!(steps, max = deviation.max(), "compared matrix paths");
        report.push(deviation);
    }
    Ok(report)
}
