//! A set of tools to scan mutual information across a range of time delays.

use std::result::Result;
use crate::binning::BinEdges;
use crate::error::{ScanError, TdmiAnalysisError};
use crate::histogram::mutual_information;
use crate::series::TimeSeries;


/// A closed, signed range of time delays in physical time units (ms)
/// together with the scanning step
///
/// Example functionality:
/// ```rust
/// use tdmi_analysis::tdmi::LagRange;
///
///
/// let range = LagRange::new(5., 5., 1.).unwrap();
///
/// assert_eq!(range.num_lags(), 11);
/// assert_eq!(range.lag_at(0), -5.);
/// assert_eq!(range.lag_at(10), 5.);
///
/// assert!(LagRange::new(-1., 5., 1.).is_err());
/// assert!(LagRange::new(5., 5., 0.).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LagRange {
    negative: f64,
    positive: f64,
    step: f64,
}

impl LagRange {
    /// Builds a lag range spanning `[-negative, positive]` ms scanned at
    /// `step` ms, extents must be non-negative and the step positive
    pub fn new(negative: f64, positive: f64, step: f64) -> Result<LagRange, ScanError> {
        if negative < 0. || positive < 0. {
            return Err(ScanError::InvalidLagRange(
                String::from("extents must be non-negative")
            ));
        }
        if step <= 0. {
            return Err(ScanError::InvalidLagRange(
                String::from("step must be positive")
            ));
        }

        Ok(LagRange { negative, positive, step })
    }

    /// Negative extent (ms)
    pub fn negative(&self) -> f64 {
        self.negative
    }

    /// Positive extent (ms)
    pub fn positive(&self) -> f64 {
        self.positive
    }

    /// Scanning step (ms)
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Number of lags scanned, `floor((negative + positive) / step) + 1`
    pub fn num_lags(&self) -> usize {
        // the epsilon keeps spans that are exact multiples of the step from
        // losing their last lag to floating point rounding
        (((self.negative + self.positive) / self.step) + 1e-9).floor() as usize + 1
    }

    /// Lag value at the given ordinal, starting from `-negative`
    pub fn lag_at(&self, index: usize) -> f64 {
        index as f64 * self.step - self.negative
    }

    /// All lag values in increasing order
    pub fn lags(&self) -> Vec<f64> {
        (0..self.num_lags()).map(|i| self.lag_at(i)).collect()
    }
}

/// A single entry of a delay profile, `None` marks a lag whose shift left
/// too few paired samples to estimate from
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DelayPoint {
    /// Time delay (ms)
    pub lag: f64,
    /// Mutual information estimate (bits), missing if the overlap was empty
    pub mi: Option<f64>,
}

/// Mutual information as a function of time delay, ordered by increasing lag
#[derive(Debug, Clone, PartialEq)]
pub struct DelayProfile {
    points: Vec<DelayPoint>,
}

impl DelayProfile {
    /// Builds a profile directly from points, callers are expected to keep
    /// the points ordered by lag
    pub fn from_points(points: Vec<DelayPoint>) -> DelayProfile {
        DelayProfile { points }
    }

    /// Number of scanned lags
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the profile has no entries
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// All entries in lag order
    pub fn points(&self) -> &[DelayPoint] {
        &self.points
    }

    /// Entries that carry an estimate, as (lag, mi) pairs
    pub fn present(&self) -> Vec<(f64, f64)> {
        self.points.iter()
            .filter_map(|point| point.mi.map(|mi| (point.lag, mi)))
            .collect()
    }

    /// The (lag, mi) pair with the largest estimate, `None` if every
    /// entry is missing
    pub fn peak(&self) -> Option<(f64, f64)> {
        self.present().into_iter()
            .max_by(|a, b| a.1.total_cmp(&b.1))
    }

    /// Subtracts a baseline profile pointwise, lag for lag, an entry is
    /// missing in the output if it is missing in either input, errors if
    /// the profiles do not cover the same lags
    pub fn subtract(&self, baseline: &DelayProfile) -> Result<DelayProfile, ScanError> {
        if self.points.len() != baseline.points.len() {
            return Err(ScanError::ProfilesAreNotSameLength);
        }

        let points = self.points.iter().zip(baseline.points.iter())
            .map(|(point, base)| {
                if (point.lag - base.lag).abs() > f64::EPSILON * point.lag.abs().max(1.) {
                    return Err(ScanError::ProfilesAreNotSameLength);
                }

                let mi = match (point.mi, base.mi) {
                    (Some(value), Some(base_value)) => Some(value - base_value),
                    _ => None,
                };

                Ok(DelayPoint { lag: point.lag, mi })
            })
            .collect::<Result<Vec<DelayPoint>, ScanError>>()?;

        Ok(DelayProfile { points })
    }
}

/// Settings for a single delay scan
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanSettings {
    /// Target expected per-bin occupancy used to size histogram bins
    pub expected_occupancy: f64,
    /// Fixed binning range for the first series, series minimum to maximum if `None`
    pub x_range: Option<(f64, f64)>,
    /// Fixed binning range for the second series, series minimum to maximum if `None`
    pub y_range: Option<(f64, f64)>,
    /// Minimum number of paired samples a lag must retain, lags below this
    /// are recorded as missing
    pub min_overlap: usize,
}

impl Default for ScanSettings {
    fn default() -> Self {
        ScanSettings {
            expected_occupancy: 50.,
            x_range: None,
            y_range: None,
            min_overlap: 1,
        }
    }
}

// overlapping index range of x[t] paired with y[t + offset]
fn overlap_bounds(x_len: usize, y_len: usize, offset: isize) -> (usize, usize) {
    let start = if offset < 0 { (-offset) as usize } else { 0 };
    let end_from_y = y_len as isize - offset;
    let end = (x_len as isize).min(end_from_y).max(0) as usize;

    (start.min(end), end)
}

// mutual information at a single sample offset, `EmptyOverlap` if the shift
// retains fewer paired samples than the minimum
fn estimate_at_offset(
    x: &TimeSeries,
    y: &TimeSeries,
    offset: isize,
    min_overlap: usize,
    x_edges: &BinEdges,
    y_edges: &BinEdges,
) -> Result<f64, TdmiAnalysisError> {
    let (start, end) = overlap_bounds(x.len(), y.len(), offset);

    if end - start < min_overlap {
        return Err(ScanError::EmptyOverlap.into());
    }

    let x_window = &x.samples()[start..end];
    let y_start = (start as isize + offset) as usize;
    let y_window = &y.samples()[y_start..y_start + (end - start)];

    Ok(mutual_information(x_window, y_window, x_edges, y_edges)?)
}

/// Scans mutual information between `x` and `y` across the given lag range,
/// shifting `y` by each lag relative to `x` (a positive lag means `y` lags
/// `x`) and truncating both to the overlapping region before estimating
///
/// Bin edges are derived once from the unshifted marginal distributions so
/// they are stable across lags. A lag whose overlap is below
/// `settings.min_overlap` becomes a missing entry and the scan continues,
/// binning and estimator failures abort the scan. Deterministic for fixed
/// inputs.
pub fn scan(
    x: &TimeSeries,
    y: &TimeSeries,
    range: &LagRange,
    settings: &ScanSettings,
) -> Result<DelayProfile, TdmiAnalysisError> {
    if (x.dt() - y.dt()).abs() > f64::EPSILON * x.dt().abs() {
        return Err(ScanError::SamplingStepMismatch.into());
    }

    let x_edges = BinEdges::from_series(x, settings.expected_occupancy, settings.x_range)?;
    let y_edges = BinEdges::from_series(y, settings.expected_occupancy, settings.y_range)?;

    let min_overlap = settings.min_overlap.max(1);

    let mut points: Vec<DelayPoint> = Vec::with_capacity(range.num_lags());

    for i in 0..range.num_lags() {
        let lag = range.lag_at(i);
        let offset = (lag / x.dt()).round() as isize;

        // overlap failures are absorbed as missing entries so partial
        // profiles stay usable, estimator failures abort the scan
        let mi = match estimate_at_offset(x, y, offset, min_overlap, &x_edges, &y_edges) {
            Ok(value) => Some(value),
            Err(TdmiAnalysisError::ScanRelatedError(ScanError::EmptyOverlap)) => None,
            Err(error) => return Err(error),
        };

        points.push(DelayPoint { lag, mi });
    }

    Ok(DelayProfile { points })
}
