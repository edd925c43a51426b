//! A tool to generate lag-coupled Gaussian series with known ground truth.

use std::result::Result;
use rand::Rng;
use rand_distr::{Distribution, Normal};
use crate::error::SeriesError;
use crate::series::TimeSeries;


/// Parameters for a pair of series where the second linearly mixes a
/// delayed copy of the first with additive Gaussian noise,
/// `y[t] = coupling * x[t - delay] + noise_std * n[t]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoupledPairParameters {
    /// Number of samples in each series
    pub length: usize,
    /// Delay applied to the first series, in samples
    pub delay: usize,
    /// Linear mixing coefficient
    pub coupling: f64,
    /// Standard deviation of the additive noise
    pub noise_std: f64,
    /// First-order autoregressive coefficient of the driving series,
    /// zero for white noise
    pub ar_coefficient: f64,
    /// Sampling step (ms)
    pub dt: f64,
}

impl Default for CoupledPairParameters {
    fn default() -> Self {
        CoupledPairParameters {
            length: 10_000,
            delay: 8,
            coupling: 0.8,
            noise_std: 1.,
            ar_coefficient: 0.5,
            dt: 1.,
        }
    }
}

/// Generates a coupled pair of series from the given parameters and
/// generator state, the driving series is a standard Gaussian process
/// (optionally AR(1) smoothed) and the driven series mixes its delayed
/// samples with fresh noise, so the mutual information between the two
/// peaks at the configured delay
pub fn coupled_pair<R: Rng>(
    params: &CoupledPairParameters,
    rng: &mut R,
) -> Result<(TimeSeries, TimeSeries), SeriesError> {
    if params.length == 0 {
        return Err(SeriesError::EmptySeries);
    }

    // unit-variance noise source shared by both series
    let normal = Normal::new(0., 1.).unwrap();

    let mut x: Vec<f64> = Vec::with_capacity(params.length);
    for i in 0..params.length {
        let noise: f64 = normal.sample(rng);
        let value = if i == 0 {
            noise
        } else {
            params.ar_coefficient * x[i - 1] + noise
        };

        x.push(value);
    }

    let y: Vec<f64> = (0..params.length)
        .map(|i| {
            let driven = if i >= params.delay {
                params.coupling * x[i - params.delay]
            } else {
                0.
            };

            driven + params.noise_std * normal.sample(rng)
        })
        .collect();

    Ok((TimeSeries::new(x, params.dt)?, TimeSeries::new(y, params.dt)?))
}

/// Samples a standard Gaussian series with no temporal structure, useful as
/// an independent control
pub fn white_noise<R: Rng>(
    length: usize,
    dt: f64,
    rng: &mut R,
) -> Result<TimeSeries, SeriesError> {
    if length == 0 {
        return Err(SeriesError::EmptySeries);
    }

    let normal = Normal::new(0., 1.).unwrap();

    TimeSeries::new((0..length).map(|_| normal.sample(rng)).collect(), dt)
}
