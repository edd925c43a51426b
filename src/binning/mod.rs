//! Adaptive histogram bin sizing driven by a target expected per-bin occupancy.

use std::result::Result;
use crate::error::BinningError;
use crate::series::TimeSeries;


/// Equal-width histogram bin edges over a closed value range
///
/// The number of bins is chosen from a target expected occupancy rather than
/// fixed ahead of time, so estimator bias stays comparable across series of
/// different lengths.
///
/// Example functionality:
/// ```rust
/// use tdmi_analysis::binning::BinEdges;
/// use tdmi_analysis::series::TimeSeries;
///
///
/// let samples: Vec<f64> = (0..1000).map(|i| i as f64).collect();
/// let series = TimeSeries::new(samples, 0.25).unwrap();
///
/// // 1000 samples at an expected occupancy of 50 gives 20 bins
/// let edges = BinEdges::from_series(&series, 50., None).unwrap();
/// assert_eq!(edges.len(), 20);
///
/// // doubling the occupancy halves the bin count
/// let edges = BinEdges::from_series(&series, 100., None).unwrap();
/// assert_eq!(edges.len(), 10);
///
/// // values clamp into the boundary bins
/// assert_eq!(edges.index_of(-10.), 0);
/// assert_eq!(edges.index_of(1e6), 9);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinEdges {
    minimum: f64,
    maximum: f64,
    count: usize,
}

impl BinEdges {
    /// Derives edges for the given series from a target expected per-bin
    /// occupancy, `bins = max(1, round(len / occupancy))`, spanning the
    /// series minimum to maximum unless a fixed range is supplied, errors
    /// on non-positive occupancy or a constant series
    pub fn from_series(
        series: &TimeSeries,
        expected_occupancy: f64,
        fixed_range: Option<(f64, f64)>,
    ) -> Result<BinEdges, BinningError> {
        if expected_occupancy <= 0. {
            return Err(BinningError::NonPositiveOccupancy);
        }
        if series.is_empty() {
            return Err(BinningError::EmptySeries);
        }

        let (minimum, maximum) = match fixed_range {
            Some(range) => range,
            None => series.min_max(),
        };

        if minimum >= maximum {
            return Err(BinningError::DegenerateSeries);
        }

        let count = (series.len() as f64 / expected_occupancy).round() as usize;
        let count = count.max(1);

        Ok(BinEdges { minimum, maximum, count })
    }

    /// Number of bins
    pub fn len(&self) -> usize {
        self.count
    }

    /// Whether there are no bins, always `false` for constructed edges
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Width of a single bin
    pub fn width(&self) -> f64 {
        (self.maximum - self.minimum) / self.count as f64
    }

    /// Lower and upper bounds of the binned range
    pub fn range(&self) -> (f64, f64) {
        (self.minimum, self.maximum)
    }

    /// Bin index for a value, values outside the range clamp into the
    /// boundary bins so paired-sample counts stay equal across lag shifts
    pub fn index_of(&self, value: f64) -> usize {
        if value <= self.minimum {
            return 0;
        }
        if value >= self.maximum {
            return self.count - 1;
        }

        let index = ((value - self.minimum) / self.width()) as usize;

        index.min(self.count - 1)
    }
}
