//! Fields of identical quantum degrees of freedom placed on a lattice.
//!
//! A [`Field`] is a shared handle: cloning it yields the same field, and two
//! fields compare equal only if they are the same handle. Operators, qubits
//! and gates reference fields but never own the underlying data.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::qubit::Qubit;

/// Kind of particle living on each lattice site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParticleType {
    /// Two-level system.
    Qubit,
    /// d-level system.
    Qudit,
    /// Fermionic mode.
    Fermion,
    /// Majorana mode.
    Majorana,
    /// Bosonic mode (truncated to a finite local dimension).
    Boson,
}

impl ParticleType {
    /// Whether the local Hilbert space of this particle type is fixed to two levels.
    #[inline]
    pub fn is_two_level(self) -> bool {
        matches!(
            self,
            ParticleType::Qubit | ParticleType::Fermion | ParticleType::Majorana
        )
    }
}

/// Lattice collaborator: only the site count and the coupling structure are needed.
pub trait Lattice: fmt::Debug + Send + Sync {
    /// Number of lattice sites.
    fn nsites(&self) -> usize;

    /// Symmetric 0/1 adjacency matrix over the sites.
    fn adjacency_matrix(&self) -> Array2<u8>;
}

/// Hypercubic lattice with nearest-neighbour adjacency.
///
/// Sites are enumerated in row-major order over `shape`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegerLattice {
    shape: Vec<usize>,
    pbc: bool,
}

impl IntegerLattice {
    /// Create a lattice with the given extent per dimension.
    ///
    /// With `pbc` set, neighbours wrap around at the boundary.
    pub fn new(shape: impl Into<Vec<usize>>, pbc: bool) -> Self {
        Self {
            shape: shape.into(),
            pbc,
        }
    }

    /// Extent per dimension.
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Number of spatial dimensions.
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Whether periodic boundary conditions apply.
    pub fn pbc(&self) -> bool {
        self.pbc
    }

    fn index_to_coord(&self, mut index: usize) -> Vec<usize> {
        let mut coord = vec![0; self.shape.len()];
        for (d, &extent) in self.shape.iter().enumerate().rev() {
            coord[d] = index % extent;
            index /= extent;
        }
        coord
    }

    fn coord_to_index(&self, coord: &[usize]) -> usize {
        coord
            .iter()
            .zip(&self.shape)
            .fold(0, |acc, (&c, &extent)| acc * extent + c)
    }
}

impl Lattice for IntegerLattice {
    fn nsites(&self) -> usize {
        self.shape.iter().product()
    }

    fn adjacency_matrix(&self) -> Array2<u8> {
        let n = self.nsites();
        let mut adj = Array2::zeros((n, n));
        for site in 0..n {
            let coord = self.index_to_coord(site);
            for (d, &extent) in self.shape.iter().enumerate() {
                for forward in [false, true] {
                    let c = coord[d];
                    let neighbour = match (forward, self.pbc) {
                        (true, _) if c + 1 < extent => c + 1,
                        (true, true) => 0,
                        (false, _) if c > 0 => c - 1,
                        (false, true) => extent - 1,
                        _ => continue,
                    };
                    let mut nb = coord.clone();
                    nb[d] = neighbour;
                    let j = self.coord_to_index(&nb);
                    if j != site {
                        adj[[site, j]] = 1;
                    }
                }
            }
        }
        adj
    }
}

#[derive(Debug)]
struct FieldData {
    particle_type: ParticleType,
    lattice: Arc<dyn Lattice>,
    local_dim: usize,
}

/// A set of identical degrees of freedom on the sites of a lattice.
#[derive(Clone)]
pub struct Field {
    data: Arc<FieldData>,
}

impl Field {
    /// Create a field with local dimension 2.
    pub fn new(particle_type: ParticleType, lattice: impl Lattice + 'static) -> Self {
        Self::from_shared(particle_type, Arc::new(lattice), 2)
    }

    /// Create a field with an explicit local dimension.
    ///
    /// Two-level particle types only accept `local_dim == 2`; qudits and
    /// bosons need at least two levels.
    pub fn with_local_dim(
        particle_type: ParticleType,
        lattice: impl Lattice + 'static,
        local_dim: usize,
    ) -> IrResult<Self> {
        let valid = if particle_type.is_two_level() {
            local_dim == 2
        } else {
            local_dim >= 2
        };
        if !valid {
            return Err(IrError::InvalidLocalDimension {
                particle_type,
                local_dim,
            });
        }
        Ok(Self::from_shared(particle_type, Arc::new(lattice), local_dim))
    }

    fn from_shared(particle_type: ParticleType, lattice: Arc<dyn Lattice>, local_dim: usize) -> Self {
        Self {
            data: Arc::new(FieldData {
                particle_type,
                lattice,
                local_dim,
            }),
        }
    }

    /// Particle type of every site.
    #[inline]
    pub fn particle_type(&self) -> ParticleType {
        self.data.particle_type
    }

    /// The underlying lattice.
    pub fn lattice(&self) -> &dyn Lattice {
        self.data.lattice.as_ref()
    }

    /// Number of lattice sites.
    #[inline]
    pub fn nsites(&self) -> usize {
        self.data.lattice.nsites()
    }

    /// Dimension of the Hilbert space of a single site.
    #[inline]
    pub fn local_dim(&self) -> usize {
        self.data.local_dim
    }

    /// Dimension of the full Hilbert space: `local_dim ^ nsites`.
    pub fn hilbert_dim(&self) -> IrResult<usize> {
        u32::try_from(self.nsites())
            .ok()
            .and_then(|n| self.local_dim().checked_pow(n))
            .ok_or(IrError::HilbertSpaceTooLarge {
                nsites: self.nsites(),
            })
    }

    /// Ensure the field can be addressed qubit-wise.
    pub fn require_two_level(&self) -> IrResult<()> {
        if self.local_dim() == 2 {
            Ok(())
        } else {
            Err(IrError::NotTwoLevel {
                particle_type: self.particle_type(),
                local_dim: self.local_dim(),
            })
        }
    }

    /// Reference to the qubit at site `index`.
    pub fn qubit(&self, index: usize) -> IrResult<Qubit> {
        Qubit::new(self, index)
    }

    /// All sites of this field as qubits, in site order.
    pub fn qubits(&self) -> IrResult<Vec<Qubit>> {
        (0..self.nsites()).map(|i| Qubit::new(self, i)).collect()
    }

    /// Stable identity of the shared handle.
    fn addr(&self) -> usize {
        Arc::as_ptr(&self.data).cast::<()>() as usize
    }
}

impl PartialEq for Field {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }
}

impl Eq for Field {}

impl Hash for Field {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.addr().hash(state);
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("id", &format_args!("{:#x}", self.addr()))
            .field("particle_type", &self.data.particle_type)
            .field("nsites", &self.nsites())
            .field("local_dim", &self.data.local_dim)
            .finish()
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?}[{}]@{:#x}",
            self.particle_type(),
            self.nsites(),
            self.addr()
        )
    }
}
