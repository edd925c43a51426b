#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};
    use rand_distr::{Distribution, Normal};
    use tdmi_analysis::{
        error::FittingError,
        fitting::{fit_decay, DecayModel, FittingSettings},
        tdmi::{DelayPoint, DelayProfile},
    };

    // samples the symmetric model on integer lags with additive noise
    fn model_profile(peak_lag: f64, amplitude: f64, tau: f64, noise_std: f64, seed: u64) -> DelayProfile {
        let mut rng = StdRng::seed_from_u64(seed);
        let normal = Normal::new(0., noise_std).unwrap();

        let points = (-20..=20)
            .map(|lag| {
                let lag = lag as f64;
                let value = amplitude * (-(lag - peak_lag).abs() / tau).exp()
                    + normal.sample(&mut rng);

                DelayPoint { lag, mi: Some(value) }
            })
            .collect();

        DelayProfile::from_points(points)
    }

    #[test]
    pub fn test_symmetric_fit_recovers_known_parameters() -> Result<(), FittingError> {
        let profile = model_profile(7., 2., 3., 0.02, 0);

        let settings = FittingSettings {
            model: DecayModel::Symmetric,
            ..FittingSettings::default()
        };

        let fit = fit_decay(&profile, &settings)?;

        assert!((fit.peak_lag - 7.).abs() <= 0.7);
        assert!((fit.peak_amplitude - 2.).abs() <= 0.2);
        assert!((fit.time_constant - 3.).abs() <= 0.3);
        assert!(fit.fit_residual < 0.1);
        assert!(fit.signal_noise_ratio > 2.);

        Ok(())
    }

    #[test]
    pub fn test_asymmetric_fit_matches_on_symmetric_data() -> Result<(), FittingError> {
        let profile = model_profile(7., 2., 3., 0.02, 1);

        let fit = fit_decay(&profile, &FittingSettings::default())?;

        // both flanks decay alike here, so the falling tau is recovered
        assert!((fit.peak_lag - 7.).abs() <= 1.);
        assert!((fit.peak_amplitude - 2.).abs() <= 0.3);
        assert!((fit.time_constant - 3.).abs() <= 0.6);

        Ok(())
    }

    #[test]
    pub fn test_fit_skips_missing_entries() -> Result<(), FittingError> {
        let mut profile = model_profile(7., 2., 3., 0.02, 2);

        let points: Vec<DelayPoint> = profile.points().iter()
            .map(|point| {
                if point.lag < -15. {
                    DelayPoint { lag: point.lag, mi: None }
                } else {
                    *point
                }
            })
            .collect();
        profile = DelayProfile::from_points(points);

        let settings = FittingSettings {
            model: DecayModel::Symmetric,
            ..FittingSettings::default()
        };

        let fit = fit_decay(&profile, &settings)?;

        assert!((fit.peak_lag - 7.).abs() <= 0.7);
        assert!((fit.time_constant - 3.).abs() <= 0.3);

        Ok(())
    }

    #[test]
    pub fn test_too_few_points_is_rejected() {
        let points = vec![
            DelayPoint { lag: -1., mi: Some(0.1) },
            DelayPoint { lag: 0., mi: Some(0.5) },
            DelayPoint { lag: 1., mi: Some(0.1) },
        ];
        let profile = DelayProfile::from_points(points);

        let settings = FittingSettings {
            model: DecayModel::Symmetric,
            ..FittingSettings::default()
        };

        assert!(matches!(
            fit_decay(&profile, &settings),
            Err(FittingError::TooFewPoints)
        ));
    }

    #[test]
    pub fn test_all_missing_profile_is_rejected() {
        let points = (-5..=5)
            .map(|lag| DelayPoint { lag: lag as f64, mi: None })
            .collect();
        let profile = DelayProfile::from_points(points);

        assert!(matches!(
            fit_decay(&profile, &FittingSettings::default()),
            Err(FittingError::TooFewPoints)
        ));
    }

    #[test]
    pub fn test_exhausted_iteration_budget_does_not_converge() {
        let profile = model_profile(7., 2., 3., 0.02, 3);

        let settings = FittingSettings {
            model: DecayModel::Symmetric,
            max_iterations: 0,
            ..FittingSettings::default()
        };

        assert!(matches!(
            fit_decay(&profile, &settings),
            Err(FittingError::FitDidNotConverge)
        ));
    }

    #[test]
    pub fn test_negative_profile_has_no_peak_to_fit() {
        // a profile that is pure negative noise cannot yield a positive peak
        let points = (-10..=10)
            .map(|lag| DelayPoint { lag: lag as f64, mi: Some(-1. - 0.01 * (lag as f64).abs()) })
            .collect();
        let profile = DelayProfile::from_points(points);

        let settings = FittingSettings {
            model: DecayModel::Symmetric,
            ..FittingSettings::default()
        };

        assert!(fit_decay(&profile, &settings).is_err());
    }
}
