//! A set of tools to fit a peak-and-decay model to a delay profile.

use std::result::Result;
use crate::error::FittingError;
use crate::tdmi::DelayProfile;


/// Shape of the unimodal decay model fitted to a delay profile
///
/// `Symmetric` uses a single time constant for both flanks,
/// `amplitude * exp(-|lag - peak_lag| / tau)`, `Asymmetric` allows the
/// rising and falling flanks to decay at different rates. The asymmetric
/// form is the default since spike-to-field profiles are usually steeper
/// on the rising side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecayModel {
    /// One shared time constant across both flanks
    Symmetric,
    /// Separate rising and falling time constants
    Asymmetric,
}

impl DecayModel {
    fn num_params(&self) -> usize {
        match self {
            DecayModel::Symmetric => 3,
            DecayModel::Asymmetric => 4,
        }
    }
}

/// Settings controlling the nonlinear least squares fit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FittingSettings {
    /// Model family to fit
    pub model: DecayModel,
    /// Iteration budget for the optimizer
    pub max_iterations: usize,
    /// Relative residual improvement below which the fit is converged
    pub tolerance: f64,
    /// Off-peak region starts this many fitted time constants from the peak
    pub off_peak_tau_multiple: f64,
    /// Initial time constant guess as a fraction of the scanned lag span
    pub initial_tau_fraction: f64,
}

impl Default for FittingSettings {
    fn default() -> Self {
        FittingSettings {
            model: DecayModel::Asymmetric,
            max_iterations: 300,
            tolerance: 1e-8,
            off_peak_tau_multiple: 2.,
            initial_tau_fraction: 0.125,
        }
    }
}

/// Scalar features extracted from a fitted delay profile
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecayFit {
    /// Lag of the fitted peak (ms)
    pub peak_lag: f64,
    /// Height of the fitted peak (bits)
    pub peak_amplitude: f64,
    /// Peak amplitude over the standard deviation of the off-peak region
    pub signal_noise_ratio: f64,
    /// Decay time constant of the falling flank (ms)
    pub time_constant: f64,
    /// Root-mean-square residual of the accepted fit
    pub fit_residual: f64,
}

// model value at one lag, params are [a, p, tau] or [a, p, tau_rise, tau_fall]
fn model_value(model: DecayModel, params: &[f64], lag: f64) -> f64 {
    let (a, p) = (params[0], params[1]);

    match model {
        DecayModel::Symmetric => a * (-(lag - p).abs() / params[2]).exp(),
        DecayModel::Asymmetric => {
            if lag >= p {
                a * (-(lag - p) / params[3]).exp()
            } else {
                a * ((lag - p) / params[2]).exp()
            }
        },
    }
}

// one row of the jacobian of the model with respect to the parameters
fn model_gradient(model: DecayModel, params: &[f64], lag: f64) -> Vec<f64> {
    let (a, p) = (params[0], params[1]);

    match model {
        DecayModel::Symmetric => {
            let tau = params[2];
            let shape = (-(lag - p).abs() / tau).exp();
            let value = a * shape;
            let sign = if lag > p { 1. } else if lag < p { -1. } else { 0. };

            vec![
                shape,
                value * sign / tau,
                value * (lag - p).abs() / tau.powf(2.0),
            ]
        },
        DecayModel::Asymmetric => {
            let (tau_rise, tau_fall) = (params[2], params[3]);

            if lag >= p {
                let shape = (-(lag - p) / tau_fall).exp();
                let value = a * shape;

                vec![
                    shape,
                    value / tau_fall,
                    0.,
                    value * (lag - p) / tau_fall.powf(2.0),
                ]
            } else {
                let shape = ((lag - p) / tau_rise).exp();
                let value = a * shape;

                vec![
                    shape,
                    -value / tau_rise,
                    value * (p - lag) / tau_rise.powf(2.0),
                    0.,
                ]
            }
        },
    }
}

fn sum_of_squares(model: DecayModel, params: &[f64], points: &[(f64, f64)]) -> f64 {
    points.iter()
        .map(|(lag, value)| (model_value(model, params, *lag) - value).powf(2.0))
        .sum()
}

// solves a small system with gaussian elimination and partial pivoting,
// `None` if the system is singular
fn solve_linear_system(mut matrix: Vec<Vec<f64>>, mut rhs: Vec<f64>) -> Option<Vec<f64>> {
    let n = rhs.len();

    for col in 0..n {
        let pivot_row = (col..n).max_by(|a, b| {
            matrix[*a][col].abs().total_cmp(&matrix[*b][col].abs())
        })?;

        if matrix[pivot_row][col].abs() < 1e-300 {
            return None;
        }

        matrix.swap(col, pivot_row);
        rhs.swap(col, pivot_row);

        for row in (col + 1)..n {
            let factor = matrix[row][col] / matrix[col][col];

            for k in col..n {
                matrix[row][k] -= factor * matrix[col][k];
            }
            rhs[row] -= factor * rhs[col];
        }
    }

    let mut solution = vec![0.; n];
    for row in (0..n).rev() {
        let mut value = rhs[row];
        for col in (row + 1)..n {
            value -= matrix[row][col] * solution[col];
        }
        solution[row] = value / matrix[row][row];
    }

    Some(solution)
}

fn params_are_valid(model: DecayModel, params: &[f64]) -> bool {
    let taus_positive = match model {
        DecayModel::Symmetric => params[2] > 0.,
        DecayModel::Asymmetric => params[2] > 0. && params[3] > 0.,
    };

    taus_positive && params.iter().all(|value| value.is_finite())
}

/// Fits the decay model to a delay profile (typically the ordered profile
/// with the surrogate baseline already subtracted) by Levenberg-Marquardt
/// nonlinear least squares and extracts scalar features
///
/// The initial guess places the peak at the profile maximum with an
/// amplitude equal to that maximum and a time constant of
/// `initial_tau_fraction` of the scanned span. Missing profile entries are
/// skipped. Errors with `TooFewPoints` if fewer non-missing points remain
/// than parameters plus one, and with `FitDidNotConverge` if the iteration
/// budget runs out, the damping explodes, or the converged amplitude is not
/// a positive finite peak, callers decide whether to retry with adjusted
/// settings or flag the record as unfit.
pub fn fit_decay(
    profile: &DelayProfile,
    settings: &FittingSettings,
) -> Result<DecayFit, FittingError> {
    let points = profile.present();
    let num_params = settings.model.num_params();

    if points.len() < num_params + 1 {
        return Err(FittingError::TooFewPoints);
    }

    let (peak_lag, peak_value) = points.iter()
        .cloned()
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .ok_or(FittingError::TooFewPoints)?;

    let span = points[points.len() - 1].0 - points[0].0;
    let initial_tau = (span * settings.initial_tau_fraction).max(f64::MIN_POSITIVE);

    let mut params = match settings.model {
        DecayModel::Symmetric => vec![peak_value, peak_lag, initial_tau],
        DecayModel::Asymmetric => vec![peak_value, peak_lag, initial_tau, initial_tau],
    };

    let mut cost = sum_of_squares(settings.model, &params, &points);
    let mut lambda = 1e-3;
    // an exact initial guess leaves no residual to improve
    let mut converged = cost == 0.;

    for _ in 0..settings.max_iterations {
        if converged {
            break;
        }

        let mut jtj = vec![vec![0.; num_params]; num_params];
        let mut jtr = vec![0.; num_params];

        for (lag, value) in points.iter() {
            let residual = model_value(settings.model, &params, *lag) - value;
            let gradient = model_gradient(settings.model, &params, *lag);

            for row in 0..num_params {
                jtr[row] += gradient[row] * residual;
                for col in 0..num_params {
                    jtj[row][col] += gradient[row] * gradient[col];
                }
            }
        }

        // damped normal equations, the floor keeps flat directions solvable
        let mut damped = jtj.clone();
        for (i, row) in damped.iter_mut().enumerate() {
            row[i] += lambda * jtj[i][i].max(1e-12);
        }

        let rhs: Vec<f64> = jtr.iter().map(|value| -value).collect();

        let step = match solve_linear_system(damped, rhs) {
            Some(step) => step,
            None => {
                lambda *= 10.;
                if lambda > 1e10 {
                    return Err(FittingError::FitDidNotConverge);
                }
                continue;
            },
        };

        let candidate: Vec<f64> = params.iter().zip(step.iter())
            .map(|(value, delta)| value + delta)
            .collect();

        if !params_are_valid(settings.model, &candidate) {
            lambda *= 10.;
            if lambda > 1e10 {
                return Err(FittingError::FitDidNotConverge);
            }
            continue;
        }

        let candidate_cost = sum_of_squares(settings.model, &candidate, &points);

        if candidate_cost < cost {
            let improvement = (cost - candidate_cost) / cost.max(f64::MIN_POSITIVE);

            params = candidate;
            cost = candidate_cost;
            lambda = (lambda / 10.).max(1e-12);

            if improvement <= settings.tolerance {
                converged = true;
                break;
            }
        } else {
            lambda *= 10.;
            if lambda > 1e10 {
                return Err(FittingError::FitDidNotConverge);
            }
        }
    }

    if !converged {
        return Err(FittingError::FitDidNotConverge);
    }

    let amplitude = params[0];
    let fitted_peak = params[1];
    let time_constant = match settings.model {
        DecayModel::Symmetric => params[2],
        DecayModel::Asymmetric => params[3],
    };

    if amplitude <= 0. || !amplitude.is_finite() {
        return Err(FittingError::FitDidNotConverge);
    }

    let fit_residual = (cost / points.len() as f64).sqrt();

    let off_peak: Vec<f64> = points.iter()
        .filter(|(lag, _)| {
            (lag - fitted_peak).abs() > settings.off_peak_tau_multiple * time_constant
        })
        .map(|(_, value)| *value)
        .collect();

    let noise_std = if off_peak.len() >= 2 {
        crate::series::std(&off_peak, crate::series::mean(&off_peak))
    } else {
        // not enough room beyond the peak, fall back to the fit residuals
        let residuals: Vec<f64> = points.iter()
            .map(|(lag, value)| model_value(settings.model, &params, *lag) - value)
            .collect();

        crate::series::std(&residuals, crate::series::mean(&residuals))
    };

    let signal_noise_ratio = if noise_std > 0. {
        amplitude / noise_std
    } else {
        f64::INFINITY
    };

    Ok(DecayFit {
        peak_lag: fitted_peak,
        peak_amplitude: amplitude,
        signal_noise_ratio,
        time_constant,
        fit_residual,
    })
}
