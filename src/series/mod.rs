//! Core time series representation along with basic descriptive statistics.

use std::result::Result;
use crate::error::SeriesError;


pub(crate) fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

pub(crate) fn std(values: &[f64], values_mean: f64) -> f64 {
    let sum_of_squares: f64 = values.iter()
        .map(|i| (i - values_mean).powf(2.0))
        .sum();

    (sum_of_squares / values.len() as f64).sqrt()
}

/// Calculates the Pearson correlation coefficient given two slices of the same length (if standard
/// deviation of either of the slices is 0, `f64::NAN` is returned)
pub fn pearsonr(x: &[f64], y: &[f64]) -> Result<f64, SeriesError> {
    if x.len() != y.len() {
        return Err(SeriesError::SeriesAreNotSameLength);
    }
    if x.is_empty() {
        return Err(SeriesError::EmptySeries);
    }

    let x_mean: f64 = mean(x);
    let y_mean: f64 = mean(y);

    let numerator: f64 = x.iter().zip(y.iter())
        .map(|(i, j)| (i - x_mean) * (j - y_mean))
        .sum();

    let x_sum_of_squares: f64 = x.iter().map(|i| (i - x_mean).powf(2.0)).sum();
    let y_sum_of_squares: f64 = y.iter().map(|i| (i - y_mean).powf(2.0)).sum();

    let denominator: f64 = (x_sum_of_squares * y_sum_of_squares).powf(0.5);

    Ok(numerator / denominator) // returns nan if x_std or y_std is 0
}

/// A finite, uniformly sampled time series, immutable once constructed,
/// either a spike-derived count series or a continuous field-potential-like
/// signal, with the sampling step given in milliseconds
///
/// Example functionality:
/// ```rust
/// use tdmi_analysis::series::TimeSeries;
///
///
/// let series = TimeSeries::new(vec![0., 1., 0., 1.], 0.5).unwrap();
///
/// assert_eq!(series.len(), 4);
/// assert_eq!(series.dt(), 0.5);
/// assert_eq!(series.mean(), 0.5);
///
/// // two spikes over 2 ms is 1000 spikes per second
/// assert_eq!(series.mean_rate(), 1000.);
///
/// // block averaging halves the length and doubles the step
/// let coarse = series.downsample(2).unwrap();
/// assert_eq!(coarse.samples(), &[0.5, 0.5]);
/// assert_eq!(coarse.dt(), 1.);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    samples: Vec<f64>,
    dt: f64,
}

impl TimeSeries {
    /// Builds a series from raw samples and a sampling step (ms), errors
    /// if the samples are empty or the step is not positive
    pub fn new(samples: Vec<f64>, dt: f64) -> Result<TimeSeries, SeriesError> {
        if samples.is_empty() {
            return Err(SeriesError::EmptySeries);
        }
        if dt <= 0. {
            return Err(SeriesError::NonPositiveTimestep);
        }

        Ok(TimeSeries { samples, dt })
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the series is empty, always `false` for a constructed series
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Sampling step (ms)
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Raw samples in order
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Total duration covered by the series (ms)
    pub fn duration(&self) -> f64 {
        self.samples.len() as f64 * self.dt
    }

    /// Mean of the samples
    pub fn mean(&self) -> f64 {
        mean(&self.samples)
    }

    /// Sample standard deviation (population form)
    pub fn std(&self) -> f64 {
        std(&self.samples, self.mean())
    }

    /// Minimum and maximum sample values
    pub fn min_max(&self) -> (f64, f64) {
        let mut minimum = f64::INFINITY;
        let mut maximum = f64::NEG_INFINITY;

        for i in self.samples.iter() {
            if *i < minimum {
                minimum = *i;
            }
            if *i > maximum {
                maximum = *i;
            }
        }

        (minimum, maximum)
    }

    /// Mean firing rate (spikes per second) when the series holds spike
    /// counts per sample, calculated as the total count over the duration
    pub fn mean_rate(&self) -> f64 {
        let total: f64 = self.samples.iter().sum();

        1000. * total / self.duration()
    }

    /// Averages consecutive blocks of `window` samples into one, resampling
    /// the series onto a coarser grid with step `window * dt`, trailing
    /// samples that do not fill a block are discarded
    pub fn downsample(&self, window: usize) -> Result<TimeSeries, SeriesError> {
        if window == 0 {
            return Err(SeriesError::InvalidDownsampleWindow);
        }

        let blocks = self.samples.len() / window;
        if blocks == 0 {
            return Err(SeriesError::EmptySeries);
        }

        let averaged: Vec<f64> = (0..blocks)
            .map(|i| {
                self.samples[i * window..(i + 1) * window].iter().sum::<f64>() / window as f64
            })
            .collect();

        TimeSeries::new(averaged, self.dt * window as f64)
    }
}
