//! A tool to estimate mutual information from a binned joint histogram.

use std::result::Result;
use ndarray::{Array1, Array2, Axis};
use crate::binning::BinEdges;
use crate::error::EstimatorError;


/// A 2-D histogram of occurrence counts over paired, time-aligned samples
///
/// Built once per lag from the overlapping region of two shifted series,
/// with bin edges fixed by the caller so they stay stable across lags.
#[derive(Debug, Clone)]
pub struct JointHistogram {
    counts: Array2<u64>,
    total: u64,
}

impl JointHistogram {
    /// Fills the histogram from two equal-length aligned slices, errors if
    /// the lengths differ or there are no paired samples
    pub fn fill(
        x: &[f64],
        y: &[f64],
        x_edges: &BinEdges,
        y_edges: &BinEdges,
    ) -> Result<JointHistogram, EstimatorError> {
        if x.len() != y.len() {
            return Err(EstimatorError::SeriesAreNotSameLength);
        }
        if x.is_empty() {
            return Err(EstimatorError::InsufficientData);
        }

        let mut counts: Array2<u64> = Array2::zeros((x_edges.len(), y_edges.len()));

        for (x_value, y_value) in x.iter().zip(y.iter()) {
            counts[[x_edges.index_of(*x_value), y_edges.index_of(*y_value)]] += 1;
        }

        Ok(JointHistogram { counts, total: x.len() as u64 })
    }

    /// Total number of paired samples counted
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Occurrence counts indexed by (x bin, y bin)
    pub fn counts(&self) -> &Array2<u64> {
        &self.counts
    }

    /// Calculates the plug-in mutual information estimate in bits,
    /// `sum p(i,j) * log2(p(i,j) / (p(i) * p(j)))` over non-empty joint
    /// bins, substituting empirical frequencies for the probabilities
    pub fn mutual_information(&self) -> f64 {
        let total = self.total as f64;

        let x_marginal: Array1<u64> = self.counts.sum_axis(Axis(1));
        let y_marginal: Array1<u64> = self.counts.sum_axis(Axis(0));

        let mut mi = 0.;

        for ((i, j), count) in self.counts.indexed_iter() {
            if *count == 0 {
                continue;
            }

            // zero joint count implies zero marginal contribution, so
            // marginals here are always non-zero
            let joint = *count as f64 / total;
            let p_x = x_marginal[i] as f64 / total;
            let p_y = y_marginal[j] as f64 / total;

            mi += joint * (joint / (p_x * p_y)).log2();
        }

        mi
    }
}

/// Calculates the plug-in mutual information in bits between two equal-length
/// aligned slices under the given bin edges, deterministic for fixed inputs
pub fn mutual_information(
    x: &[f64],
    y: &[f64],
    x_edges: &BinEdges,
    y_edges: &BinEdges,
) -> Result<f64, EstimatorError> {
    Ok(JointHistogram::fill(x, y, x_edges, y_edges)?.mutual_information())
}
