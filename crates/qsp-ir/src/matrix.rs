//! Dense complex matrix utilities.
//!
//! All multi-qubit matrices follow the little-endian convention: wire 0 is
//! the least significant tensor factor, so `kron(b, a)` acts with `a` on
//! wire 0 and `b` on wire 1.

use nalgebra::{DMatrix, SymmetricEigen};
use ndarray::Array2;
use num_complex::Complex64;

use crate::error::{IrError, IrResult};

/// Dense complex matrix.
pub type Matrix = Array2<Complex64>;

/// Default absolute tolerance for matrix comparisons.
pub const DEFAULT_TOLERANCE: f64 = 1e-10;

/// Tolerance for accepting an input operator as Hermitian.
pub const HERMITIAN_TOLERANCE: f64 = 1e-8;

/// Identity matrix of the given dimension.
pub fn identity(dim: usize) -> Matrix {
    Array2::eye(dim)
}

/// Kronecker product `a ⊗ b`.
pub fn kron(a: &Matrix, b: &Matrix) -> Matrix {
    ndarray::linalg::kron(a, b)
}

/// Kronecker product of all factors, first factor most significant.
pub fn kron_all<'a>(factors: impl IntoIterator<Item = &'a Matrix>) -> Matrix {
    factors
        .into_iter()
        .fold(identity(1), |acc, factor| kron(&acc, factor))
}

/// Conjugate transpose.
pub fn dagger(m: &Matrix) -> Matrix {
    m.t().mapv(|z| z.conj())
}

/// Largest absolute entry of `a - b`, or `f64::INFINITY` if the shapes differ.
pub fn max_abs_diff(a: &Matrix, b: &Matrix) -> f64 {
    if a.dim() != b.dim() {
        return f64::INFINITY;
    }
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).norm())
        .fold(0.0, f64::max)
}

/// Whether `a` and `b` agree entrywise within the absolute tolerance `tol`.
pub fn allclose(a: &Matrix, b: &Matrix, tol: f64) -> bool {
    max_abs_diff(a, b) <= tol
}

/// Whether `m · m†` equals the identity within `tol`.
pub fn is_unitary(m: &Matrix, tol: f64) -> bool {
    m.is_square() && allclose(&m.dot(&dagger(m)), &identity(m.nrows()), tol)
}

/// Whether `m` equals its conjugate transpose within `tol`.
pub fn is_hermitian(m: &Matrix, tol: f64) -> bool {
    m.is_square() && allclose(m, &dagger(m), tol)
}

/// Number of qubits a `dim × dim` matrix acts on.
pub fn num_qubits_of(m: &Matrix) -> IrResult<usize> {
    let dim = m.nrows();
    if !m.is_square() || !dim.is_power_of_two() {
        return Err(IrError::DimensionMismatch {
            expected: dim.next_power_of_two(),
            got: m.ncols(),
        });
    }
    Ok(dim.trailing_zeros() as usize)
}

fn check_hermitian(h: &Matrix) -> IrResult<()> {
    if !h.is_square() {
        return Err(IrError::DimensionMismatch {
            expected: h.nrows(),
            got: h.ncols(),
        });
    }
    let deviation = max_abs_diff(h, &dagger(h));
    if deviation > HERMITIAN_TOLERANCE {
        return Err(IrError::NotHermitian { deviation });
    }
    Ok(())
}

fn eigh(h: &Matrix) -> IrResult<SymmetricEigen<Complex64, nalgebra::Dyn>> {
    check_hermitian(h)?;
    let n = h.nrows();
    Ok(SymmetricEigen::new(DMatrix::from_fn(n, n, |i, j| h[[i, j]])))
}

/// Apply a scalar function to a Hermitian matrix through its eigendecomposition.
///
/// Returns `V · diag(f(λ)) · V†`.
pub fn hermitian_function(h: &Matrix, f: impl Fn(f64) -> Complex64) -> IrResult<Matrix> {
    let eig = eigh(h)?;
    let n = h.nrows();
    let v = &eig.eigenvectors;
    let fvals: Vec<Complex64> = eig.eigenvalues.iter().map(|&lambda| f(lambda)).collect();
    Ok(Array2::from_shape_fn((n, n), |(i, j)| {
        (0..n).map(|k| v[(i, k)] * fvals[k] * v[(j, k)].conj()).sum()
    }))
}

/// Sorted eigenvalues of a Hermitian matrix.
pub fn eigvalsh(h: &Matrix) -> IrResult<Vec<f64>> {
    let mut vals: Vec<f64> = eigh(h)?.eigenvalues.iter().copied().collect();
    vals.sort_by(f64::total_cmp);
    Ok(vals)
}

/// Spectral norm of a Hermitian matrix (largest absolute eigenvalue).
pub fn hermitian_norm(h: &Matrix) -> IrResult<f64> {
    Ok(eigvalsh(h)?.into_iter().map(f64::abs).fold(0.0, f64::max))
}

/// `exp(-i t h)` for Hermitian `h`.
pub fn expm_hermitian(h: &Matrix, t: f64) -> IrResult<Matrix> {
    hermitian_function(h, |lambda| Complex64::from_polar(1.0, -t * lambda))
}

/// Reorder the wires of an operator on qubits.
///
/// Wire `k` of the result is wire `perm[k]` of `u`.
pub fn permute_wires(u: &Matrix, perm: &[usize]) -> IrResult<Matrix> {
    let n = num_qubits_of(u)?;
    let mut seen = vec![false; n];
    if perm.len() != n
        || perm
            .iter()
            .any(|&p| p >= n || std::mem::replace(&mut seen[p], true))
    {
        return Err(IrError::InvalidPermutation(perm.to_vec()));
    }
    let relabel = |x: usize| {
        perm.iter()
            .enumerate()
            .fold(0, |acc, (k, &p)| acc | (((x >> k) & 1) << p))
    };
    let dim = u.nrows();
    Ok(Array2::from_shape_fn((dim, dim), |(row, col)| {
        u[[relabel(row), relabel(col)]]
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    fn pauli_x() -> Matrix {
        array![[c(0.0, 0.0), c(1.0, 0.0)], [c(1.0, 0.0), c(0.0, 0.0)]]
    }

    fn pauli_z() -> Matrix {
        array![[c(1.0, 0.0), c(0.0, 0.0)], [c(0.0, 0.0), c(-1.0, 0.0)]]
    }

    #[test]
    fn test_kron_layout() {
        // Z on wire 1, X on wire 0
        let zx = kron(&pauli_z(), &pauli_x());
        assert_eq!(zx.dim(), (4, 4));
        assert_eq!(zx[[0, 1]], c(1.0, 0.0));
        assert_eq!(zx[[2, 3]], c(-1.0, 0.0));
        let all = kron_all([&pauli_z(), &pauli_x()]);
        assert!(allclose(&zx, &all, 0.0));
    }

    #[test]
    fn test_expm_matches_closed_form() {
        let t = 0.37;
        let u = expm_hermitian(&pauli_x(), t).unwrap();
        let expected = array![
            [c(t.cos(), 0.0), c(0.0, -t.sin())],
            [c(0.0, -t.sin()), c(t.cos(), 0.0)]
        ];
        assert!(allclose(&u, &expected, 1e-12));
        assert!(is_unitary(&u, 1e-12));
    }

    #[test]
    fn test_eigvalsh_and_norm() {
        let h = kron(&pauli_z(), &pauli_x()).mapv(|z| z * 0.5) + kron(&identity(2), &pauli_z());
        let vals = eigvalsh(&h).unwrap();
        assert_eq!(vals.len(), 4);
        assert!(vals.windows(2).all(|w| w[0] <= w[1]));
        let expected = (1.0f64 + 0.25).sqrt();
        assert!((hermitian_norm(&h).unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_non_hermitian_rejected() {
        let m = array![[c(0.0, 0.0), c(1.0, 0.0)], [c(0.0, 0.0), c(0.0, 0.0)]];
        assert!(matches!(
            hermitian_function(&m, |x| c(x, 0.0)),
            Err(IrError::NotHermitian { .. })
        ));
    }

    #[test]
    fn test_permute_wires_swaps_factors() {
        let zx = kron(&pauli_z(), &pauli_x());
        let xz = kron(&pauli_x(), &pauli_z());
        assert!(allclose(&permute_wires(&zx, &[1, 0]).unwrap(), &xz, 0.0));
        assert!(allclose(&permute_wires(&zx, &[0, 1]).unwrap(), &zx, 0.0));
        assert!(permute_wires(&zx, &[0, 0]).is_err());
        assert!(permute_wires(&zx, &[0]).is_err());
    }
}
