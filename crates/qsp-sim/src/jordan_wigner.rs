//! Jordan–Wigner encoding of fermionic modes on qubits.
//!
//! The creation operator on site `i` of an `L`-site chain is
//!
//!   c†_i = I ⊗ … ⊗ I ⊗ σ⁺ ⊗ Z ⊗ … ⊗ Z
//!
//! with `i` parity factors `Z` on the lower sites. Site 0 is the least
//! significant tensor factor and `σ⁺ = |1⟩⟨0|`.

use ndarray::array;
use num_complex::Complex64;

use qsp_ir::StandardGate;
use qsp_ir::matrix::{Matrix, dagger, identity, kron};

use crate::error::{SimError, SimResult};

fn raising() -> Matrix {
    let zero = Complex64::new(0.0, 0.0);
    let one = Complex64::new(1.0, 0.0);
    array![[zero, zero], [one, zero]]
}

/// Creation operator `c†_i` on an `nsites`-mode register.
pub fn creation_operator(site: usize, nsites: usize) -> SimResult<Matrix> {
    if site >= nsites {
        return Err(SimError::SiteOutOfRange { site, nsites });
    }
    let z = StandardGate::Z.matrix();
    let id = identity(2);
    let up = raising();
    let mut c = identity(1);
    for j in 0..nsites {
        let factor = match j.cmp(&site) {
            std::cmp::Ordering::Less => &z,
            std::cmp::Ordering::Equal => &up,
            std::cmp::Ordering::Greater => &id,
        };
        c = kron(factor, &c);
    }
    Ok(c)
}

/// All creation operators `c†_0 … c†_{L-1}`.
pub fn creation_operators(nsites: usize) -> Vec<Matrix> {
    (0..nsites)
        .filter_map(|i| creation_operator(i, nsites).ok())
        .collect()
}

/// All annihilation operators `c_0 … c_{L-1}`, the adjoints of [`creation_operators`].
pub fn annihilation_operators(nsites: usize) -> Vec<Matrix> {
    creation_operators(nsites).iter().map(dagger).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use qsp_ir::matrix::allclose;

    #[test]
    fn test_single_mode() {
        let c = creation_operator(0, 1).unwrap();
        assert!(allclose(&c, &raising(), 0.0));
    }

    #[test]
    fn test_parity_string_on_lower_sites() {
        let c = creation_operator(1, 2).unwrap();
        let expected = kron(&raising(), &StandardGate::Z.matrix());
        assert!(allclose(&c, &expected, 0.0));
        // |01⟩ (site 0 occupied) → -|11⟩
        assert_eq!(c[[3, 1]], Complex64::new(-1.0, 0.0));
    }

    #[test]
    fn test_site_out_of_range() {
        assert!(matches!(
            creation_operator(3, 3),
            Err(SimError::SiteOutOfRange { site: 3, nsites: 3 })
        ));
        assert!(creation_operators(0).is_empty());
    }

    #[test]
    fn test_number_operator() {
        let c = creation_operators(3);
        let a = annihilation_operators(3);
        // n_1 = c†_1 c_1 is diagonal with bit 1 of the index
        let n1 = c[1].dot(&a[1]);
        for idx in 0..8 {
            let expected = ((idx >> 1) & 1) as f64;
            assert_eq!(n1[[idx, idx]], Complex64::new(expected, 0.0));
        }
    }
}
