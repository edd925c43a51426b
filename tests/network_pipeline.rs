#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};
    use tdmi_analysis::{
        connectivity::{ConnectivityMatrix, NeuronType},
        error::{TableError, TdmiAnalysisError},
        pipeline::{
            analyze_network, analyze_network_parallel, analyze_unit, AnalysisParameters,
        },
        series::TimeSeries,
        surrogate::SurrogateGenerator,
        synthetic::{coupled_pair, CoupledPairParameters},
        tdmi::LagRange,
    };

    fn test_network() -> (ConnectivityMatrix, Vec<NeuronType>) {
        let connectivity = ConnectivityMatrix::from_rows(vec![
            vec![0, 1, 1, 0],
            vec![0, 0, 1, 1],
            vec![1, 0, 0, 0],
            vec![0, 1, 0, 0],
        ]).unwrap();

        let types = vec![
            NeuronType::Excitatory,
            NeuronType::Excitatory,
            NeuronType::Inhibitory,
            NeuronType::Excitatory,
        ];

        (connectivity, types)
    }

    fn unit_source(index: usize) -> Result<(TimeSeries, TimeSeries), TdmiAnalysisError> {
        let params = CoupledPairParameters {
            length: 2000,
            delay: 4,
            coupling: 1.,
            noise_std: 0.5,
            ar_coefficient: 0.,
            dt: 1.,
        };

        let mut rng = StdRng::seed_from_u64(index as u64);

        Ok(coupled_pair(&params, &mut rng)?)
    }

    fn parameters() -> Result<AnalysisParameters, TdmiAnalysisError> {
        let mut params = AnalysisParameters::new(LagRange::new(10., 10., 1.)?);
        params.surrogate_seed = Some(42);

        Ok(params)
    }

    #[test]
    pub fn test_one_record_per_neuron_in_order() -> Result<(), TdmiAnalysisError> {
        let (connectivity, types) = test_network();
        let params = parameters()?;

        let table = analyze_network(unit_source, &connectivity, &types, &[0, 1, 2, 3], &params)?;

        assert_eq!(table.len(), 4);

        let indices: Vec<usize> = table.records().iter().map(|record| record.index).collect();
        assert_eq!(indices, vec![0, 1, 2, 3]);

        for record in table.records() {
            assert!(record.mean_rate.is_finite());
        }

        Ok(())
    }

    #[test]
    pub fn test_duplicate_target_is_fatal() -> Result<(), TdmiAnalysisError> {
        let (connectivity, types) = test_network();
        let params = parameters()?;

        let result = analyze_network(unit_source, &connectivity, &types, &[0, 0], &params);

        assert!(matches!(
            result,
            Err(TdmiAnalysisError::TableRelatedError(TableError::DuplicateIndex(0)))
        ));

        Ok(())
    }

    #[test]
    pub fn test_parallel_matches_sequential_with_seed() -> Result<(), TdmiAnalysisError> {
        let (connectivity, types) = test_network();
        let params = parameters()?;

        let sequential = analyze_network(unit_source, &connectivity, &types, &[0, 1, 2, 3], &params)?;
        let parallel = analyze_network_parallel(unit_source, &connectivity, &types, &[0, 1, 2, 3], &params)?;

        assert_eq!(sequential.records(), parallel.records());

        Ok(())
    }

    #[test]
    pub fn test_unit_detects_known_delay() -> Result<(), TdmiAnalysisError> {
        let (x, y) = unit_source(0)?;
        let params = parameters()?;

        let mut surrogate = SurrogateGenerator::with_seed(1, 42);
        let analysis = analyze_unit(&x, &y, &params, &mut surrogate)?;

        assert_eq!(analysis.profile.len(), 21);
        assert_eq!(analysis.null_profile.len(), 21);

        let (peak_lag, _) = analysis.corrected.peak().unwrap();
        assert!((peak_lag - 4.).abs() <= 1.);

        Ok(())
    }

    #[test]
    pub fn test_failed_fit_flags_record_instead_of_aborting() -> Result<(), TdmiAnalysisError> {
        let (connectivity, types) = test_network();

        let mut params = parameters()?;
        // an empty iteration budget forces every fit to fail
        params.fitting.max_iterations = 0;

        let table = analyze_network(unit_source, &connectivity, &types, &[0, 1], &params)?;

        assert_eq!(table.len(), 2);
        for record in table.records() {
            assert!(record.fit.is_none());
        }

        Ok(())
    }

    #[test]
    pub fn test_structural_fields_come_from_connectivity() -> Result<(), TdmiAnalysisError> {
        let (connectivity, types) = test_network();
        let params = parameters()?;

        let table = analyze_network(unit_source, &connectivity, &types, &[0], &params)?;
        let record = &table.records()[0];

        assert_eq!(record.neuron_type, NeuronType::Excitatory);
        assert_eq!(record.connections.total, 2);
        assert_eq!(record.connections.excitatory, 1);
        assert_eq!(record.connections.inhibitory, 1);

        Ok(())
    }
}
