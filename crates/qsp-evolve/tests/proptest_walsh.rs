//! Property-based tests for the Z-string decomposition of diagonals.

use proptest::prelude::*;
use qsp_evolve::Hamiltonian;

fn arb_diagonal() -> impl Strategy<Value = Vec<f64>> {
    (1u32..=6).prop_flat_map(|n| proptest::collection::vec(-10.0_f64..10.0, 1usize << n))
}

proptest! {
    #[test]
    fn decomposition_reconstructs_diagonal(values in arb_diagonal()) {
        let n = values.len().trailing_zeros();
        let h = Hamiltonian::from_diagonal(&values);
        prop_assert!(h.is_diagonal());
        prop_assert!(h.min_qubits() <= n);

        let offset = Hamiltonian::diagonal_offset(&values);
        let back = h.diagonal(n).unwrap();
        for (v, b) in values.iter().zip(&back) {
            prop_assert!((v - (b + offset)).abs() < 1e-9);
        }
    }

    #[test]
    fn shifting_by_a_constant_changes_nothing(
        values in arb_diagonal(),
        shift in -5.0_f64..5.0,
    ) {
        let shifted: Vec<f64> = values.iter().map(|v| v + shift).collect();
        let a = Hamiltonian::from_diagonal(&values);
        let b = Hamiltonian::from_diagonal(&shifted);
        prop_assert_eq!(a.n_terms(), b.n_terms());
        for (ta, tb) in a.terms().iter().zip(b.terms()) {
            prop_assert_eq!(&ta.pauli, &tb.pauli);
            prop_assert!((ta.coeff - tb.coeff).abs() < 1e-9);
        }
    }
}
