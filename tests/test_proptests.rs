// tests/test_proptests.rs

use bandeig::{qr_eigs_band, reference_eigenvalues, tridiagonalize_band, BandMatrix};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn band_case() -> impl Strategy<Value = (usize, usize, u64)> {
    (1usize..16).prop_flat_map(|n| (Just(n), 0..n, any::<u64>()))
}

proptest! {
    #[test]
    fn test_reduction_preserves_trace((n, k, seed) in band_case()) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut a = BandMatrix::random(n, k, &mut rng).unwrap();
        let trace = a.trace();
        let form = tridiagonalize_band(&mut a);
        prop_assert!((form.trace() - trace).abs() < 1e-9 * (n as f64).max(1.0));
    }

    #[test]
    fn test_eigenvalues_match_dense_solver((n, k, seed) in band_case()) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut a = BandMatrix::random(n, k, &mut rng).unwrap();
        let want = reference_eigenvalues(&a);

        let results = qr_eigs_band(&mut a, 1e-12, 1000).unwrap();

        prop_assert_eq!(results.eigenvalues.len(), n);
        for (got, want) in results.eigenvalues.iter().zip(&want) {
            prop_assert!(
                (got - want).abs() <= 1e-8 * want.abs().max(1.0),
                "n={}, k={}: {} vs {}", n, k, got, want
            );
        }
    }
}
