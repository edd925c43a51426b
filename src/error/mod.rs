use std::fmt::{Display, Debug, Formatter, Result};


/// Error set for time series construction and statistics
pub enum SeriesError {
    /// Series has no samples
    EmptySeries,
    /// Sampling step must be greater than zero
    NonPositiveTimestep,
    /// Both series must have the same length
    SeriesAreNotSameLength,
    /// Downsampling window must be greater than zero
    InvalidDownsampleWindow,
}

impl Display for SeriesError {
    fn fmt(&self, f: &mut Formatter) -> Result {
        let err_msg = match self {
            SeriesError::EmptySeries => "Series must contain at least one sample",
            SeriesError::NonPositiveTimestep => "Sampling step must be greater than zero",
            SeriesError::SeriesAreNotSameLength => "Series must be of the same length",
            SeriesError::InvalidDownsampleWindow => "Downsampling window must be greater than zero",
        };

        write!(f, "{}", err_msg)
    }
}

impl Debug for SeriesError {
    fn fmt(&self, f: &mut Formatter) -> Result {
        write!(f, "file: {}, line: {}, error: {}", file!(), line!(), self)
    }
}

/// Error set for the adaptive binning policy
pub enum BinningError {
    /// Series has zero variance so no meaningful bin edges exist
    DegenerateSeries,
    /// Series has no samples to derive edges from
    EmptySeries,
    /// Expected occupancy must be greater than zero
    NonPositiveOccupancy,
}

impl Display for BinningError {
    fn fmt(&self, f: &mut Formatter) -> Result {
        let err_msg = match self {
            BinningError::DegenerateSeries => "Series is constant, bin edges would be degenerate",
            BinningError::EmptySeries => "Series must contain at least one sample",
            BinningError::NonPositiveOccupancy => "Expected occupancy must be greater than zero",
        };

        write!(f, "{}", err_msg)
    }
}

impl Debug for BinningError {
    fn fmt(&self, f: &mut Formatter) -> Result {
        write!(f, "file: {}, line: {}, error: {}", file!(), line!(), self)
    }
}

/// Error set for the joint histogram estimator
pub enum EstimatorError {
    /// No paired samples to estimate from
    InsufficientData,
    /// Both series must have the same length after alignment
    SeriesAreNotSameLength,
}

impl Display for EstimatorError {
    fn fmt(&self, f: &mut Formatter) -> Result {
        let err_msg = match self {
            EstimatorError::InsufficientData => "No paired samples to build a histogram from",
            EstimatorError::SeriesAreNotSameLength => "Aligned series must be of the same length",
        };

        write!(f, "{}", err_msg)
    }
}

impl Debug for EstimatorError {
    fn fmt(&self, f: &mut Formatter) -> Result {
        write!(f, "file: {}, line: {}, error: {}", file!(), line!(), self)
    }
}

/// Error set for the time-delay scanner
pub enum ScanError {
    /// Lag range extents must be non-negative and the step must be positive
    InvalidLagRange(String),
    /// Both series must share a sampling step
    SamplingStepMismatch,
    /// A lag shift left fewer paired samples than the configured minimum,
    /// recorded as a missing profile entry rather than aborting the scan
    EmptyOverlap,
    /// Profiles combined pointwise must cover the same lags
    ProfilesAreNotSameLength,
}

impl Display for ScanError {
    fn fmt(&self, f: &mut Formatter) -> Result {
        match self {
            ScanError::InvalidLagRange(msg) => write!(f, "Invalid lag range: {}", msg),
            ScanError::SamplingStepMismatch => write!(f, "Series must share a sampling step"),
            ScanError::EmptyOverlap => write!(f, "Lag shift leaves too few paired samples"),
            ScanError::ProfilesAreNotSameLength => {
                write!(f, "Profiles combined pointwise must cover the same lags")
            },
        }
    }
}

impl Debug for ScanError {
    fn fmt(&self, f: &mut Formatter) -> Result {
        write!(f, "file: {}, line: {}, error: {}", file!(), line!(), self)
    }
}

/// Error set for the decay-curve fitter
pub enum FittingError {
    /// Optimizer ran out of iterations or could not improve the residual
    FitDidNotConverge,
    /// Profile does not contain enough non-missing points to constrain the model
    TooFewPoints,
}

impl Display for FittingError {
    fn fmt(&self, f: &mut Formatter) -> Result {
        let err_msg = match self {
            FittingError::FitDidNotConverge => "Decay fit did not converge",
            FittingError::TooFewPoints => "Too few non-missing points to fit the decay model",
        };

        write!(f, "{}", err_msg)
    }
}

impl Debug for FittingError {
    fn fmt(&self, f: &mut Formatter) -> Result {
        write!(f, "file: {}, line: {}, error: {}", file!(), line!(), self)
    }
}

/// Error set for the feature table aggregator
pub enum TableError {
    /// A record with the given neuron index was already written
    DuplicateIndex(usize),
}

impl Display for TableError {
    fn fmt(&self, f: &mut Formatter) -> Result {
        match self {
            TableError::DuplicateIndex(index) => {
                write!(f, "Feature record for neuron {} already written", index)
            },
        }
    }
}

impl Debug for TableError {
    fn fmt(&self, f: &mut Formatter) -> Result {
        write!(f, "file: {}, line: {}, error: {}", file!(), line!(), self)
    }
}

/// Error set for connectivity inputs
pub enum ConnectivityError {
    /// Adjacency matrix must be square
    MatrixNotSquare,
    /// Neuron index is outside the matrix
    IndexOutOfBounds(usize),
    /// Type vector length must match the matrix dimension
    TypeLengthMismatch,
}

impl Display for ConnectivityError {
    fn fmt(&self, f: &mut Formatter) -> Result {
        match self {
            ConnectivityError::MatrixNotSquare => write!(f, "Adjacency matrix must be square"),
            ConnectivityError::IndexOutOfBounds(index) => {
                write!(f, "Neuron index {} is outside the adjacency matrix", index)
            },
            ConnectivityError::TypeLengthMismatch => {
                write!(f, "Type vector length must match the adjacency matrix dimension")
            },
        }
    }
}

impl Debug for ConnectivityError {
    fn fmt(&self, f: &mut Formatter) -> Result {
        write!(f, "file: {}, line: {}, error: {}", file!(), line!(), self)
    }
}

/// A set of errors that may occur when using the library
pub enum TdmiAnalysisError {
    /// Errors related to time series inputs
    SeriesRelatedError(SeriesError),
    /// Errors related to the binning policy
    BinningRelatedError(BinningError),
    /// Errors related to the histogram estimator
    EstimatorRelatedError(EstimatorError),
    /// Errors related to delay scanning
    ScanRelatedError(ScanError),
    /// Errors related to decay fitting
    FittingRelatedError(FittingError),
    /// Errors related to the feature table
    TableRelatedError(TableError),
    /// Errors related to connectivity inputs
    ConnectivityRelatedError(ConnectivityError),
}

impl Display for TdmiAnalysisError {
    fn fmt(&self, f: &mut Formatter) -> Result {
        match self {
            TdmiAnalysisError::SeriesRelatedError(err) => write!(f, "{}", err),
            TdmiAnalysisError::BinningRelatedError(err) => write!(f, "{}", err),
            TdmiAnalysisError::EstimatorRelatedError(err) => write!(f, "{}", err),
            TdmiAnalysisError::ScanRelatedError(err) => write!(f, "{}", err),
            TdmiAnalysisError::FittingRelatedError(err) => write!(f, "{}", err),
            TdmiAnalysisError::TableRelatedError(err) => write!(f, "{}", err),
            TdmiAnalysisError::ConnectivityRelatedError(err) => write!(f, "{}", err),
        }
    }
}

impl Debug for TdmiAnalysisError {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "file: {}, line: {}, error: {}", file!(), line!(), self)
    }
}

impl From<SeriesError> for TdmiAnalysisError {
    fn from(err: SeriesError) -> TdmiAnalysisError {
        TdmiAnalysisError::SeriesRelatedError(err)
    }
}

impl From<BinningError> for TdmiAnalysisError {
    fn from(err: BinningError) -> TdmiAnalysisError {
        TdmiAnalysisError::BinningRelatedError(err)
    }
}

impl From<EstimatorError> for TdmiAnalysisError {
    fn from(err: EstimatorError) -> TdmiAnalysisError {
        TdmiAnalysisError::EstimatorRelatedError(err)
    }
}

impl From<ScanError> for TdmiAnalysisError {
    fn from(err: ScanError) -> TdmiAnalysisError {
        TdmiAnalysisError::ScanRelatedError(err)
    }
}

impl From<FittingError> for TdmiAnalysisError {
    fn from(err: FittingError) -> TdmiAnalysisError {
        TdmiAnalysisError::FittingRelatedError(err)
    }
}

impl From<TableError> for TdmiAnalysisError {
    fn from(err: TableError) -> TdmiAnalysisError {
        TdmiAnalysisError::TableRelatedError(err)
    }
}

impl From<ConnectivityError> for TdmiAnalysisError {
    fn from(err: ConnectivityError) -> TdmiAnalysisError {
        TdmiAnalysisError::ConnectivityRelatedError(err)
    }
}
