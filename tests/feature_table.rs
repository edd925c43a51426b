#[cfg(test)]
mod tests {
    use tdmi_analysis::{
        connectivity::{ConnectionCounts, ConnectivityMatrix, NeuronType},
        error::{ConnectivityError, TableError},
        features::{write_profile, FeatureTable, NeuronFeatures},
        fitting::DecayFit,
        tdmi::{DelayPoint, DelayProfile},
    };

    fn record(index: usize, fit: Option<DecayFit>) -> NeuronFeatures {
        NeuronFeatures {
            index,
            neuron_type: NeuronType::Excitatory,
            mean_rate: 12.34567,
            connections: ConnectionCounts { total: 8, excitatory: 6, inhibitory: 2 },
            fit,
        }
    }

    #[test]
    pub fn test_duplicate_index_is_rejected() {
        let mut table = FeatureTable::new();

        table.insert(record(5, None)).unwrap();

        assert!(matches!(
            table.insert(record(5, None)),
            Err(TableError::DuplicateIndex(5))
        ));

        // the rejected write does not grow the table
        assert_eq!(table.len(), 1);
    }

    #[test]
    pub fn test_rows_serialize_in_insertion_order() -> Result<(), TableError> {
        let mut table = FeatureTable::new();

        for index in [3, 1, 2] {
            table.insert(record(index, None))?;
        }

        let mut serialized: Vec<u8> = Vec::new();
        table.write_delimited(&mut serialized, ',').unwrap();

        let output = String::from_utf8(serialized).unwrap();
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(
            lines[0],
            "index,type,mean_rate,num_connections,num_excitatory,num_inhibitory,snr,peak_lag,time_constant",
        );

        let first_columns: Vec<&str> = lines.iter()
            .skip(1)
            .map(|line| line.split(',').next().unwrap())
            .collect();
        assert_eq!(first_columns, vec!["3", "1", "2"]);

        Ok(())
    }

    #[test]
    pub fn test_numeric_formatting_and_missing_fit() -> Result<(), TableError> {
        let fit = DecayFit {
            peak_lag: 8.25,
            peak_amplitude: 0.35791,
            signal_noise_ratio: 17.123456,
            time_constant: 0.72,
            fit_residual: 0.01,
        };

        let mut table = FeatureTable::new();
        table.insert(record(0, Some(fit)))?;
        table.insert(record(1, None))?;

        let mut serialized: Vec<u8> = Vec::new();
        table.write_delimited(&mut serialized, ',').unwrap();

        let output = String::from_utf8(serialized).unwrap();
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines[1], "0,exc,12.3457,8,6,2,17.1235,8.2500,0.7200");
        assert_eq!(lines[2], "1,exc,12.3457,8,6,2,NaN,NaN,NaN");

        Ok(())
    }

    #[test]
    pub fn test_profile_writer_marks_missing_entries() {
        let profile = DelayProfile::from_points(vec![
            DelayPoint { lag: -1., mi: Some(0.015) },
            DelayPoint { lag: 0., mi: None },
            DelayPoint { lag: 1., mi: Some(0.25) },
        ]);

        let mut serialized: Vec<u8> = Vec::new();
        write_profile(&mut serialized, &profile).unwrap();

        let output = String::from_utf8(serialized).unwrap();
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines[0], "timelag,mi");
        assert_eq!(lines[1], "-1.0000,0.0150");
        assert_eq!(lines[2], "0.0000,NaN");
        assert_eq!(lines[3], "1.0000,0.2500");
    }

    #[test]
    pub fn test_connection_counts_split_by_target_type() -> Result<(), ConnectivityError> {
        let matrix = ConnectivityMatrix::from_rows(vec![
            vec![0, 1, 1, 1],
            vec![0, 0, 0, 0],
            vec![1, 0, 0, 0],
            vec![0, 1, 0, 0],
        ])?;

        let types = vec![
            NeuronType::Excitatory,
            NeuronType::Inhibitory,
            NeuronType::Excitatory,
            NeuronType::Inhibitory,
        ];

        let counts = matrix.connection_counts(0, &types)?;

        assert_eq!(counts.total, 3);
        assert_eq!(counts.excitatory, 1);
        assert_eq!(counts.inhibitory, 2);

        assert_eq!(matrix.incoming(0)?, vec![2]);

        Ok(())
    }

    #[test]
    pub fn test_ragged_connectivity_is_rejected() {
        let result = ConnectivityMatrix::from_rows(vec![
            vec![0, 1],
            vec![0],
        ]);

        assert!(matches!(result, Err(ConnectivityError::MatrixNotSquare)));
    }

    #[test]
    pub fn test_type_vector_length_must_match() {
        let matrix = ConnectivityMatrix::from_rows(vec![
            vec![0, 1],
            vec![1, 0],
        ]).unwrap();

        let result = matrix.connection_counts(0, &[NeuronType::Excitatory]);

        assert!(matches!(result, Err(ConnectivityError::TypeLengthMismatch)));
    }
}
