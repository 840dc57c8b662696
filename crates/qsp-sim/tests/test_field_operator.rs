//! Tests for the Jordan–Wigner encoding and second-quantized field operators.

use ndarray::{Array, IxDyn};
use num_complex::Complex64;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

use qsp_ir::matrix::{allclose, identity, is_hermitian};
use qsp_ir::{Field, IntegerLattice, Lattice, Matrix, Operator, ParticleType};
use qsp_sim::field_operator::{
    FieldOperator, FieldOperatorTerm, IFODesc, IFOType, coupling_tensor,
};
use qsp_sim::jordan_wigner::{annihilation_operators, creation_operators};

fn anticommutator(a: &Matrix, b: &Matrix) -> Matrix {
    a.dot(b) + b.dot(a)
}

fn fermion_field(shape: &[usize], pbc: bool) -> Field {
    Field::new(ParticleType::Fermion, IntegerLattice::new(shape.to_vec(), pbc))
}

fn hopping_descs(field: &Field) -> Vec<IFODesc> {
    vec![
        IFODesc::new(field.clone(), IFOType::FermiCreate).unwrap(),
        IFODesc::new(field.clone(), IFOType::FermiAnnihil).unwrap(),
    ]
}

// ---------------------------------------------------------------------------
// Canonical anticommutation relations
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn prop_canonical_anticommutation(nsites in 1usize..=5, i in 0usize..5, j in 0usize..5) {
        prop_assume!(i < nsites && j < nsites);
        let c = creation_operators(nsites);
        let a = annihilation_operators(nsites);
        let dim = 1 << nsites;
        let zero = Matrix::zeros((dim, dim));
        let delta = if i == j { identity(dim) } else { zero.clone() };
        prop_assert!(allclose(&anticommutator(&a[i], &c[j]), &delta, 0.0));
        prop_assert!(allclose(&anticommutator(&c[i], &c[j]), &zero, 0.0));
        prop_assert!(allclose(&anticommutator(&a[i], &a[j]), &zero, 0.0));
    }
}

// ---------------------------------------------------------------------------
// Field operator assembly
// ---------------------------------------------------------------------------

#[test]
fn hopping_matches_explicit_sum() {
    let mut rng = StdRng::seed_from_u64(17);
    for (shape, pbc) in [(vec![4], true), (vec![2, 2], false), (vec![5], false)] {
        let field = fermion_field(&shape, pbc);
        let nsites = field.nsites();
        let adj = field.lattice().adjacency_matrix();
        // random symmetric couplings on the lattice bonds
        let mut t = Array::zeros(IxDyn(&[nsites, nsites]));
        for i in 0..nsites {
            for j in i + 1..nsites {
                if adj[[i, j]] != 0 {
                    let v = Complex64::new(rng.sample(StandardNormal), 0.0);
                    t[[i, j].as_slice()] = v;
                    t[[j, i].as_slice()] = v;
                }
            }
        }
        let op = FieldOperator::new(vec![
            FieldOperatorTerm::new(hopping_descs(&field), t.clone()).unwrap(),
        ]);
        let m = op.as_matrix().unwrap();

        let c = creation_operators(nsites);
        let a = annihilation_operators(nsites);
        let mut expected = Matrix::zeros((1 << nsites, 1 << nsites));
        for i in 0..nsites {
            for j in 0..nsites {
                expected.scaled_add(t[[i, j].as_slice()], &c[i].dot(&a[j]));
            }
        }
        assert!(allclose(&m, &expected, 1e-12), "shape {shape:?}");
        assert!(is_hermitian(&m, 1e-12));
    }
}

#[test]
fn coupling_tensor_hopping_conserves_particle_number() {
    let field = fermion_field(&[4], true);
    let t = coupling_tensor(field.lattice(), -1.0);
    let op = FieldOperator::new(vec![FieldOperatorTerm::new(hopping_descs(&field), t).unwrap()]);
    let m = op.as_matrix().unwrap();
    for row in 0..16usize {
        for col in 0..16usize {
            if m[[row, col]].norm() > 0.0 {
                assert_eq!(row.count_ones(), col.count_ones());
            }
        }
    }
}

#[test]
fn terms_are_summed() {
    let field = fermion_field(&[3], false);
    let mut onsite = Array::zeros(IxDyn(&[3, 3]));
    for i in 0..3 {
        onsite[[i, i].as_slice()] = Complex64::new(0.5, 0.0);
    }
    let hop = coupling_tensor(field.lattice(), 0.25);
    let both = FieldOperator::new(vec![
        FieldOperatorTerm::new(hopping_descs(&field), onsite.clone()).unwrap(),
        FieldOperatorTerm::new(hopping_descs(&field), hop.clone()).unwrap(),
    ]);
    let separate_a = FieldOperator::new(vec![FieldOperatorTerm::new(hopping_descs(&field), onsite).unwrap()]);
    let separate_b = FieldOperator::new(vec![FieldOperatorTerm::new(hopping_descs(&field), hop).unwrap()]);
    let sum = separate_a.as_matrix().unwrap() + separate_b.as_matrix().unwrap();
    assert!(allclose(&both.as_matrix().unwrap(), &sum, 1e-14));
    assert_eq!(both.fields(), vec![field]);
}

#[test]
fn single_index_term_is_creation_operator() {
    let field = fermion_field(&[3], false);
    let mut coeffs = Array::zeros(IxDyn(&[3]));
    coeffs[[2].as_slice()] = Complex64::new(1.0, 0.0);
    let op = FieldOperator::new(vec![
        FieldOperatorTerm::new(
            vec![IFODesc::new(field.clone(), IFOType::FermiCreate).unwrap()],
            coeffs,
        )
        .unwrap(),
    ]);
    assert!(allclose(&op.as_matrix().unwrap(), &creation_operators(3)[2], 0.0));
}
