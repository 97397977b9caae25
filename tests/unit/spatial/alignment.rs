//! Tests for projecting a weights matrix onto observation order

#[cfg(test)]
mod tests {
    use market_lisa::analysis::weights::build_weights_matrix;
    use market_lisa::spatial::alignment::AlignedWeights;
    use market_lisa::spatial::region::{FlowEdge, Observation};
    use ndarray::array;

    const TOLERANCE: f64 = 1e-12;

    fn chain_weights() -> market_lisa::SpatialWeights {
        build_weights_matrix(&[FlowEdge::new("A", "B", 1.0), FlowEdge::new("B", "C", 1.0)])
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < TOLERANCE
    }

    // Tests that rows and columns follow observation order, not matrix order
    // Verified by indexing the source matrix with observation positions directly
    #[test]
    fn test_alignment_follows_observation_order() {
        let weights = chain_weights();
        let observations = vec![
            Observation::new("B", 1.0),
            Observation::new("A", 2.0),
            Observation::new("X", 3.0),
        ];

        let aligned = AlignedWeights::new(&observations, &weights);
        let matrix = aligned.matrix();

        assert_eq!(matrix.dim(), (2, 2));
        // B splits its weight between A and C, and C is not observed
        assert!(close(matrix[[0, 1]], 0.5));
        assert!(close(matrix[[1, 0]], 1.0));
        assert!(close(matrix[[0, 0]], 0.0));
        assert_eq!(aligned.unmatched(), 1);
    }

    // Tests that regions missing from the weights are left out of the alignment
    // Verified by giving unmatched observations an all-zero row instead
    #[test]
    fn test_alignment_skips_unmatched() {
        let weights = chain_weights();
        let observations = vec![
            Observation::new("X", 9.0),
            Observation::new("C", 3.0),
            Observation::new("Y", 8.0),
            Observation::new("B", 1.0),
        ];

        let aligned = AlignedWeights::new(&observations, &weights);

        assert_eq!(aligned.matched(), &[1, 3]);
        assert_eq!(aligned.len(), 2);
        assert!(!aligned.is_empty());
        assert_eq!(aligned.unmatched(), 2);
        assert_eq!(aligned.values(&observations), vec![3.0, 1.0]);
        assert!(close(aligned.matrix()[[0, 1]], 1.0));
        assert!(close(aligned.matrix()[[1, 0]], 0.5));
    }

    // Tests the aggregate sums both statistics rely on
    // Verified by summing over the wrong axis
    #[test]
    fn test_alignment_sums() {
        let weights = chain_weights();
        let observations = vec![
            Observation::new("B", 1.0),
            Observation::new("A", 2.0),
            Observation::new("X", 3.0),
        ];
        let aligned = AlignedWeights::new(&observations, &weights);

        assert!(close(aligned.total_weight(), 1.5));

        let rows = aligned.row_sums();
        let cols = aligned.col_sums();
        let squared = aligned.squared_row_sums();
        assert_eq!(rows.len(), 2);
        for (actual, expected) in rows.iter().zip([0.5, 1.0]) {
            assert!(close(*actual, expected));
        }
        for (actual, expected) in cols.iter().zip([1.0, 0.5]) {
            assert!(close(*actual, expected));
        }
        for (actual, expected) in squared.iter().zip([0.25, 1.0]) {
            assert!(close(*actual, expected));
        }
    }

    // Tests the weighted neighbour sum
    // Verified by multiplying by the transpose instead
    #[test]
    fn test_spatial_lag() {
        let weights = chain_weights();
        let observations = vec![
            Observation::new("B", 1.0),
            Observation::new("A", 2.0),
            Observation::new("X", 3.0),
        ];
        let aligned = AlignedWeights::new(&observations, &weights);

        let lag = aligned.spatial_lag(&array![1.0, 2.0]);

        assert_eq!(lag.len(), 2);
        assert!(close(lag[0], 1.0));
        assert!(close(lag[1], 1.0));
    }

    // Tests that a full observation set reproduces the standardized matrix
    // Verified by skipping the diagonal check on matched rows
    #[test]
    fn test_alignment_full_overlap() {
        let weights = chain_weights();
        let observations = vec![
            Observation::new("A", 1.0),
            Observation::new("B", 2.0),
            Observation::new("C", 3.0),
        ];
        let aligned = AlignedWeights::new(&observations, &weights);

        assert_eq!(aligned.unmatched(), 0);
        assert_eq!(aligned.matched(), &[0, 1, 2]);
        assert_eq!(aligned.matrix(), weights.standardized());
        for i in 0..3 {
            assert!(close(aligned.matrix()[[i, i]], 0.0));
        }
    }

    // Tests alignment of an empty observation set
    // Verified by allocating the matrix at the weights size
    #[test]
    fn test_alignment_empty() {
        let aligned = AlignedWeights::new(&[], &chain_weights());

        assert_eq!(aligned.matrix().dim(), (0, 0));
        assert!(aligned.is_empty());
        assert!(close(aligned.total_weight(), 0.0));
    }
}
