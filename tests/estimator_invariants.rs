#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, Rng, SeedableRng};
    use tdmi_analysis::{
        binning::BinEdges,
        error::{BinningError, EstimatorError, TdmiAnalysisError},
        histogram::{mutual_information, JointHistogram},
        series::TimeSeries,
        surrogate::SurrogateGenerator,
    };

    fn random_series(length: usize, seed: u64) -> TimeSeries {
        let mut rng = StdRng::seed_from_u64(seed);

        TimeSeries::new((0..length).map(|_| rng.gen::<f64>()).collect(), 1.).unwrap()
    }

    #[test]
    pub fn test_mutual_information_is_non_negative() -> Result<(), TdmiAnalysisError> {
        for trial in 0..5 {
            let x = random_series(500, trial);
            let y = random_series(500, trial + 100);

            let x_edges = BinEdges::from_series(&x, 50., None)?;
            let y_edges = BinEdges::from_series(&y, 50., None)?;

            let mi = mutual_information(x.samples(), y.samples(), &x_edges, &y_edges)?;

            assert!(mi >= -1e-12);
        }

        Ok(())
    }

    #[test]
    pub fn test_histogram_counts_every_pair() -> Result<(), TdmiAnalysisError> {
        let x = random_series(250, 1);
        let y = random_series(250, 2);

        let x_edges = BinEdges::from_series(&x, 25., None)?;
        let y_edges = BinEdges::from_series(&y, 25., None)?;

        let histogram = JointHistogram::fill(x.samples(), y.samples(), &x_edges, &y_edges)?;

        assert_eq!(histogram.total(), 250);
        assert_eq!(histogram.counts().sum(), 250);

        Ok(())
    }

    #[test]
    pub fn test_empty_pairing_is_insufficient_data() -> Result<(), TdmiAnalysisError> {
        let x = random_series(100, 3);
        let edges = BinEdges::from_series(&x, 10., None)?;

        let result = mutual_information(&[], &[], &edges, &edges);

        assert!(matches!(result, Err(EstimatorError::InsufficientData)));

        Ok(())
    }

    #[test]
    pub fn test_unequal_lengths_are_rejected() -> Result<(), TdmiAnalysisError> {
        let x = random_series(100, 4);
        let edges = BinEdges::from_series(&x, 10., None)?;

        let result = mutual_information(x.samples(), &x.samples()[..50], &edges, &edges);

        assert!(matches!(result, Err(EstimatorError::SeriesAreNotSameLength)));

        Ok(())
    }

    #[test]
    pub fn test_bin_count_scales_inversely_with_occupancy() -> Result<(), TdmiAnalysisError> {
        let series = random_series(1000, 5);

        assert_eq!(BinEdges::from_series(&series, 50., None)?.len(), 20);
        assert_eq!(BinEdges::from_series(&series, 100., None)?.len(), 10);

        Ok(())
    }

    #[test]
    pub fn test_constant_series_is_degenerate() {
        let series = TimeSeries::new(vec![2.; 100], 1.).unwrap();

        let result = BinEdges::from_series(&series, 10., None);

        assert!(matches!(result, Err(BinningError::DegenerateSeries)));
    }

    #[test]
    pub fn test_non_positive_occupancy_is_rejected() {
        let series = random_series(100, 6);

        let result = BinEdges::from_series(&series, 0., None);

        assert!(matches!(result, Err(BinningError::NonPositiveOccupancy)));
    }

    #[test]
    pub fn test_shuffled_copy_carries_little_information() -> Result<(), TdmiAnalysisError> {
        let x = random_series(5000, 7);

        let mut surrogate = SurrogateGenerator::with_seed(1, 7);
        let shuffled = surrogate.shuffled(&x);

        // ten bins on both axes regardless of length
        let edges = BinEdges::from_series(&x, 500., None)?;

        let independent = mutual_information(x.samples(), shuffled.samples(), &edges, &edges)?;
        let dependent = mutual_information(x.samples(), x.samples(), &edges, &edges)?;

        assert!(independent < 0.05);
        assert!(dependent > independent);

        Ok(())
    }

    #[test]
    pub fn test_independence_bias_shrinks_with_length() -> Result<(), TdmiAnalysisError> {
        let short = random_series(500, 8);
        let long = random_series(5000, 9);

        let mut surrogate = SurrogateGenerator::with_seed(1, 8);
        let short_shuffled = surrogate.shuffled(&short);
        let long_shuffled = surrogate.shuffled(&long);

        // fixed ten-bin layout so only the sample count changes
        let short_edges = BinEdges::from_series(&short, 50., None)?;
        let long_edges = BinEdges::from_series(&long, 500., None)?;

        let short_mi = mutual_information(
            short.samples(), short_shuffled.samples(), &short_edges, &short_edges,
        )?;
        let long_mi = mutual_information(
            long.samples(), long_shuffled.samples(), &long_edges, &long_edges,
        )?;

        assert!(long_mi < short_mi);

        Ok(())
    }

    #[test]
    pub fn test_shuffle_preserves_marginal_distribution() {
        let x = random_series(1000, 10);

        let mut surrogate = SurrogateGenerator::with_seed(1, 11);
        let shuffled = surrogate.shuffled(&x);

        let mut original = x.samples().to_vec();
        let mut permuted = shuffled.samples().to_vec();
        original.sort_by(|a, b| a.total_cmp(b));
        permuted.sort_by(|a, b| a.total_cmp(b));

        assert_eq!(original, permuted);
        assert_ne!(x.samples(), shuffled.samples());
    }

    #[test]
    pub fn test_seeded_shuffles_are_reproducible() {
        let x = random_series(200, 12);

        let mut first = SurrogateGenerator::with_seed(1, 99);
        let mut second = SurrogateGenerator::with_seed(1, 99);

        assert_eq!(first.shuffled(&x), second.shuffled(&x));
    }
}
