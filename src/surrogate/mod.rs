//! A tool to generate shuffled surrogate series and null delay profiles.

use std::result::Result;
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use crate::error::TdmiAnalysisError;
use crate::series::TimeSeries;
use crate::tdmi::{scan, DelayPoint, DelayProfile, LagRange, ScanSettings};


/// Produces randomly permuted copies of a series, destroying temporal
/// structure while preserving the marginal distribution, used to estimate
/// the no-dependency baseline of the delay scan
///
/// Seeded construction makes runs reproducible, unseeded construction draws
/// entropy so repeated trials are independent. The number of draws defaults
/// to one, matching a single swapped pass, averaging more draws reduces the
/// variance of the null estimate.
pub struct SurrogateGenerator {
    rng: StdRng,
    draws: usize,
}

impl Default for SurrogateGenerator {
    fn default() -> Self {
        SurrogateGenerator::new(1)
    }
}

impl SurrogateGenerator {
    /// Creates an unseeded generator averaging `draws` shuffles per null
    /// profile, `draws` is clamped to at least one
    pub fn new(draws: usize) -> SurrogateGenerator {
        SurrogateGenerator {
            rng: StdRng::from_entropy(),
            draws: draws.max(1),
        }
    }

    /// Creates a seeded generator for reproducible runs
    pub fn with_seed(draws: usize, seed: u64) -> SurrogateGenerator {
        SurrogateGenerator {
            rng: StdRng::seed_from_u64(seed),
            draws: draws.max(1),
        }
    }

    /// Number of shuffles averaged per null profile
    pub fn draws(&self) -> usize {
        self.draws
    }

    /// Returns a copy of the series with its sample order permuted
    pub fn shuffled(&mut self, series: &TimeSeries) -> TimeSeries {
        let mut samples = series.samples().to_vec();
        samples.shuffle(&mut self.rng);

        // length and step are preserved, reconstruction cannot fail
        TimeSeries::new(samples, series.dt()).unwrap()
    }

    /// Builds the null delay profile by scanning shuffled copies of `x`
    /// against the intact `y` with the same lag range and settings as the
    /// ordered scan, averaging the configured number of draws pointwise
    ///
    /// An entry is missing in the average if it is missing in any draw,
    /// overlap depends only on series lengths so in practice the missing
    /// pattern is identical across draws.
    pub fn null_profile(
        &mut self,
        x: &TimeSeries,
        y: &TimeSeries,
        range: &LagRange,
        settings: &ScanSettings,
    ) -> Result<DelayProfile, TdmiAnalysisError> {
        let mut summed: Option<Vec<DelayPoint>> = None;

        for _ in 0..self.draws {
            let shuffled = self.shuffled(x);
            let profile = scan(&shuffled, y, range, settings)?;

            summed = Some(match summed {
                None => profile.points().to_vec(),
                Some(mut points) => {
                    for (point, drawn) in points.iter_mut().zip(profile.points().iter()) {
                        point.mi = match (point.mi, drawn.mi) {
                            (Some(total), Some(value)) => Some(total + value),
                            _ => None,
                        };
                    }

                    points
                },
            });
        }

        let averaged = summed.unwrap_or_default()
            .into_iter()
            .map(|point| DelayPoint {
                lag: point.lag,
                mi: point.mi.map(|total| total / self.draws as f64),
            })
            .collect();

        Ok(DelayProfile::from_points(averaged))
    }
}
