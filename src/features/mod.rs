//! Aggregation of per-neuron features and fixed-format serialization.

use std::{
    collections::HashSet,
    fs::File,
    io::{BufWriter, Result, Write},
    path::Path,
    result,
};
use crate::connectivity::{ConnectionCounts, NeuronType};
use crate::error::TableError;
use crate::fitting::DecayFit;
use crate::tdmi::DelayProfile;


/// One row of the feature table, the structural attributes come from the
/// connectivity inputs and the fit fields from the decay fitter, a `None`
/// fit flags a unit whose profile could not be fit rather than fabricating
/// values
#[derive(Debug, Clone, PartialEq)]
pub struct NeuronFeatures {
    /// Neuron index, unique per row
    pub index: usize,
    /// Excitatory or inhibitory
    pub neuron_type: NeuronType,
    /// Mean firing rate of the spike series (spikes per second)
    pub mean_rate: f64,
    /// Outgoing connection counts split by target polarity
    pub connections: ConnectionCounts,
    /// Decay fit features, `None` if the fit did not converge
    pub fit: Option<DecayFit>,
}

/// An append-only table of per-neuron feature records preserving insertion
/// order, repeated indices are rejected rather than overwritten
///
/// Example functionality:
/// ```rust
/// use tdmi_analysis::connectivity::{ConnectionCounts, NeuronType};
/// use tdmi_analysis::features::{FeatureTable, NeuronFeatures};
///
///
/// let record = NeuronFeatures {
///     index: 20,
///     neuron_type: NeuronType::Excitatory,
///     mean_rate: 12.5,
///     connections: ConnectionCounts { total: 8, excitatory: 6, inhibitory: 2 },
///     fit: None,
/// };
///
/// let mut table = FeatureTable::new();
/// table.insert(record.clone()).unwrap();
///
/// assert_eq!(table.len(), 1);
/// assert!(table.insert(record).is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct FeatureTable {
    records: Vec<NeuronFeatures>,
    seen: HashSet<usize>,
}

impl FeatureTable {
    pub fn new() -> FeatureTable {
        FeatureTable { records: Vec::new(), seen: HashSet::new() }
    }

    /// Number of records written so far
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table has no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in insertion order
    pub fn records(&self) -> &[NeuronFeatures] {
        &self.records
    }

    /// Appends a record, errors with `DuplicateIndex` if a record with the
    /// same neuron index was already written
    pub fn insert(&mut self, record: NeuronFeatures) -> result::Result<(), TableError> {
        if !self.seen.insert(record.index) {
            return Err(TableError::DuplicateIndex(record.index));
        }

        self.records.push(record);

        Ok(())
    }

    /// Serializes the table with the fixed column order
    /// `index,type,mean_rate,num_connections,num_excitatory,num_inhibitory,snr,peak_lag,time_constant`,
    /// floats formatted to 4 decimal digits and the fit columns of an
    /// unconverged row written as `NaN`
    pub fn write_delimited<W: Write>(&self, file: &mut W, delimiter: char) -> Result<()> {
        let columns = [
            "index", "type", "mean_rate", "num_connections",
            "num_excitatory", "num_inhibitory", "snr", "peak_lag", "time_constant",
        ];
        writeln!(file, "{}", columns.join(&delimiter.to_string()))?;

        for record in self.records.iter() {
            let (snr, peak_lag, time_constant) = match record.fit {
                Some(fit) => (fit.signal_noise_ratio, fit.peak_lag, fit.time_constant),
                None => (f64::NAN, f64::NAN, f64::NAN),
            };

            writeln!(
                file,
                "{1}{0}{2}{0}{3:.4}{0}{4}{0}{5}{0}{6}{0}{7:.4}{0}{8:.4}{0}{9:.4}",
                delimiter,
                record.index,
                record.neuron_type.label(),
                record.mean_rate,
                record.connections.total,
                record.connections.excitatory,
                record.connections.inhibitory,
                snr,
                peak_lag,
                time_constant,
            )?;
        }

        Ok(())
    }

    /// Writes the table as a comma-delimited file at the given path
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut file = BufWriter::new(File::create(path)?);

        self.write_delimited(&mut file, ',')
    }
}

/// Writes a delay profile with the header `timelag,mi`, missing entries
/// are written as `NaN`
pub fn write_profile<W: Write>(file: &mut W, profile: &DelayProfile) -> Result<()> {
    writeln!(file, "timelag,mi")?;

    for point in profile.points().iter() {
        writeln!(file, "{:.4},{:.4}", point.lag, point.mi.unwrap_or(f64::NAN))?;
    }

    Ok(())
}

/// Writes an ordered profile next to its surrogate baseline with the header
/// `timelag,ordered,random`, missing entries are written as `NaN`
pub fn write_profile_with_baseline<W: Write>(
    file: &mut W,
    ordered: &DelayProfile,
    random: &DelayProfile,
) -> Result<()> {
    writeln!(file, "timelag,ordered,random")?;

    for (point, baseline) in ordered.points().iter().zip(random.points().iter()) {
        writeln!(
            file,
            "{:.4},{:.4},{:.4}",
            point.lag,
            point.mi.unwrap_or(f64::NAN),
            baseline.mi.unwrap_or(f64::NAN),
        )?;
    }

    Ok(())
}
