//! Free-fermion hopping on a lattice, checked against its single-particle spectrum.

use num_complex::Complex64;
use tracing::info;

use qsp_ir::matrix::{Matrix, eigvalsh};
use qsp_ir::{Field, IntegerLattice, Lattice, Operator, ParticleType};
use qsp_sim::{FieldOperator, FieldOperatorTerm, IFODesc, IFOType, SimResult, coupling_tensor};

/// Many-body and single-particle spectra of a hopping Hamiltonian.
#[derive(Debug, Clone)]
pub struct HoppingSpectrum {
    /// Eigenvalues of the Jordan–Wigner many-body matrix, ascending.
    pub many_body: Vec<f64>,
    /// Eigenvalues of the single-particle coupling matrix, ascending.
    pub single_particle: Vec<f64>,
}

impl HoppingSpectrum {
    /// Occupation-number prediction: every subset sum of single-particle energies, ascending.
    pub fn predicted(&self) -> Vec<f64> {
        let n = self.single_particle.len();
        let mut levels: Vec<f64> = (0..1usize << n)
            .map(|mask| {
                (0..n)
                    .filter(|&k| (mask >> k) & 1 == 1)
                    .map(|k| self.single_particle[k])
                    .sum()
            })
            .collect();
        levels.sort_by(f64::total_cmp);
        levels
    }

    /// Largest deviation between the many-body spectrum and the prediction.
    pub fn deviation(&self) -> f64 {
        self.many_body
            .iter()
            .zip(self.predicted())
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max)
    }
}

/// `Σ_{ij} t A_{ij} c†_i c_j` on a fermion field over `lattice`.
pub fn hopping_operator(lattice: IntegerLattice, strength: f64) -> SimResult<FieldOperator> {
    let field = Field::new(ParticleType::Fermion, lattice);
    let t = coupling_tensor(field.lattice(), strength);
    let descs = vec![
        IFODesc::new(field.clone(), IFOType::FermiCreate)?,
        IFODesc::new(field, IFOType::FermiAnnihil)?,
    ];
    Ok(FieldOperator::new(vec![FieldOperatorTerm::new(descs, t)?]))
}

/// Diagonalize the hopping Hamiltonian in both pictures.
pub fn hopping_spectrum(lattice: IntegerLattice, strength: f64) -> SimResult<HoppingSpectrum> {
    let single: Matrix = lattice
        .adjacency_matrix()
        .mapv(|a| Complex64::new(strength * f64::from(a), 0.0));
    let op = hopping_operator(lattice, strength)?;
    let many_body = eigvalsh(&op.as_matrix()?)?;
    let single_particle = eigvalsh(&single)?;
    info!(modes = single_particle.len(), "diagonalized hopping Hamiltonian");
    Ok(HoppingSpectrum {
        many_body,
        single_particle,
    })
}
