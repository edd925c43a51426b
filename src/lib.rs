//! # TDMI Analysis
//!
//! `tdmi_analysis` is a package focused on quantifying directed information
//! transfer in simulated neuronal networks with time-delayed mutual
//! information. Given a spike-derived series and a field-potential-like
//! partner signal, the crate scans a plug-in histogram estimate of mutual
//! information across a signed range of time delays, compares the resulting
//! delay profile against a shuffled-surrogate null, and fits a parametric
//! peak-and-decay model to extract a peak lag, a signal-to-noise ratio, and
//! a decay time constant per neuron. Per-neuron features are aggregated
//! with connectivity-derived structure into a fixed-schema table.
//!
//! Histogram bins are sized adaptively from a target expected per-bin
//! occupancy so estimator bias stays comparable across recording lengths,
//! and bin edges are derived from the unshifted marginals so they are
//! stable across lags. Missing profile entries (lags whose shift leaves too
//! little overlap) are carried as absent values, never silently zeroed.
//!
//! ## Example Code
//!
//! ### Scanning a delay profile and fitting its decay
//!
//! ```rust
//! use rand::{rngs::StdRng, SeedableRng};
//! use tdmi_analysis::{
//!     error::TdmiAnalysisError,
//!     fitting::{fit_decay, FittingSettings},
//!     surrogate::SurrogateGenerator,
//!     synthetic::{coupled_pair, CoupledPairParameters},
//!     tdmi::{scan, LagRange, ScanSettings},
//! };
//!
//!
//! fn main() -> Result<(), TdmiAnalysisError> {
//!     // y mixes x delayed by 8 samples with unit-variance noise
//!     let mut rng = StdRng::seed_from_u64(0);
//!     let (x, y) = coupled_pair(&CoupledPairParameters::default(), &mut rng)?;
//!
//!     let range = LagRange::new(20., 20., 1.)?;
//!     let settings = ScanSettings::default();
//!
//!     // ordered profile and shuffled-surrogate null over the same lags
//!     let profile = scan(&x, &y, &range, &settings)?;
//!     let mut surrogate = SurrogateGenerator::with_seed(1, 42);
//!     let null_profile = surrogate.null_profile(&x, &y, &range, &settings)?;
//!
//!     // subtracting the null removes the finite-sample bias shared by
//!     // every lag
//!     let corrected = profile.subtract(&null_profile)?;
//!
//!     let (peak_lag, _) = corrected.peak().unwrap();
//!     assert!((peak_lag - 8.).abs() <= 1.);
//!
//!     // a unit whose fit does not converge is flagged, not fabricated
//!     match fit_decay(&corrected, &FittingSettings::default()) {
//!         Ok(fit) => println!("snr: {:.4}, tau: {:.4}", fit.signal_noise_ratio, fit.time_constant),
//!         Err(error) => println!("unfit unit: {}", error),
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ### Analyzing every neuron of a network into a feature table
//!
//! ```rust
//! use rand::{rngs::StdRng, SeedableRng};
//! use tdmi_analysis::{
//!     connectivity::{ConnectivityMatrix, NeuronType},
//!     error::TdmiAnalysisError,
//!     pipeline::{analyze_network, AnalysisParameters},
//!     series::TimeSeries,
//!     synthetic::{coupled_pair, CoupledPairParameters},
//!     tdmi::LagRange,
//! };
//!
//!
//! fn main() -> Result<(), TdmiAnalysisError> {
//!     let connectivity = ConnectivityMatrix::from_rows(vec![
//!         vec![0, 1, 1],
//!         vec![0, 0, 1],
//!         vec![1, 0, 0],
//!     ])?;
//!     let types = vec![
//!         NeuronType::Excitatory, NeuronType::Excitatory, NeuronType::Inhibitory,
//!     ];
//!
//!     let mut params = AnalysisParameters::new(LagRange::new(10., 10., 1.)?);
//!     params.surrogate_seed = Some(42);
//!
//!     // the collaborator interface: given a neuron index, return the two
//!     // series for that unit, here generated synthetically
//!     let source = |index: usize| -> Result<(TimeSeries, TimeSeries), TdmiAnalysisError> {
//!         let mut rng = StdRng::seed_from_u64(index as u64);
//!         let pair_params = CoupledPairParameters {
//!             length: 2_000,
//!             delay: 4,
//!             ..CoupledPairParameters::default()
//!         };
//!
//!         Ok(coupled_pair(&pair_params, &mut rng)?)
//!     };
//!
//!     let table = analyze_network(source, &connectivity, &types, &[0, 1, 2], &params)?;
//!     assert_eq!(table.len(), 3);
//!
//!     let mut serialized: Vec<u8> = Vec::new();
//!     table.write_delimited(&mut serialized, ',').unwrap();
//!
//!     Ok(())
//! }
//! ```

pub mod binning;
pub mod connectivity;
pub mod error;
pub mod features;
pub mod fitting;
pub mod histogram;
pub mod pipeline;
pub mod series;
pub mod surrogate;
pub mod synthetic;
pub mod tdmi;
