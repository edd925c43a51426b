//! Network structure inputs used to annotate per-neuron analysis results.

use std::result::Result;
use crate::error::ConnectivityError;


/// Polarity of a neuron's outgoing synapses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NeuronType {
    Excitatory,
    Inhibitory,
}

impl NeuronType {
    /// Short label used in serialized feature tables
    pub fn label(&self) -> &'static str {
        match self {
            NeuronType::Excitatory => "exc",
            NeuronType::Inhibitory => "inh",
        }
    }
}

/// Connection counts for one neuron, split by the polarity of the
/// connected neurons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionCounts {
    /// Total number of outgoing connections
    pub total: usize,
    /// Connections onto excitatory neurons
    pub excitatory: usize,
    /// Connections onto inhibitory neurons
    pub inhibitory: usize,
}

/// A square binary adjacency matrix over neuron indices, a nonzero entry at
/// row `i`, column `j` denotes an edge from neuron `i` to neuron `j`,
/// consumed read-only
///
/// Example functionality:
/// ```rust
/// use tdmi_analysis::connectivity::{ConnectivityMatrix, NeuronType};
///
///
/// let matrix = ConnectivityMatrix::from_rows(vec![
///     vec![0, 1, 1],
///     vec![0, 0, 1],
///     vec![0, 0, 0],
/// ]).unwrap();
///
/// assert_eq!(matrix.neuron_count(), 3);
/// assert_eq!(matrix.outgoing(0).unwrap(), vec![1, 2]);
/// assert_eq!(matrix.incoming(2).unwrap(), vec![0, 1]);
///
/// let types = vec![
///     NeuronType::Excitatory, NeuronType::Excitatory, NeuronType::Inhibitory,
/// ];
/// let counts = matrix.connection_counts(0, &types).unwrap();
/// assert_eq!(counts.total, 2);
/// assert_eq!(counts.excitatory, 1);
/// assert_eq!(counts.inhibitory, 1);
///
/// assert!(matrix.outgoing(5).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectivityMatrix {
    rows: Vec<Vec<u8>>,
}

impl ConnectivityMatrix {
    /// Builds the matrix from 0/1 rows, errors if the rows do not form a
    /// square matrix
    pub fn from_rows(rows: Vec<Vec<u8>>) -> Result<ConnectivityMatrix, ConnectivityError> {
        let n = rows.len();

        if rows.iter().any(|row| row.len() != n) {
            return Err(ConnectivityError::MatrixNotSquare);
        }

        Ok(ConnectivityMatrix { rows })
    }

    /// Number of neurons the matrix covers
    pub fn neuron_count(&self) -> usize {
        self.rows.len()
    }

    fn check_index(&self, index: usize) -> Result<(), ConnectivityError> {
        if index >= self.rows.len() {
            return Err(ConnectivityError::IndexOutOfBounds(index));
        }

        Ok(())
    }

    /// Whether an edge runs from `pre` to `post`
    pub fn connected(&self, pre: usize, post: usize) -> Result<bool, ConnectivityError> {
        self.check_index(pre)?;
        self.check_index(post)?;

        Ok(self.rows[pre][post] != 0)
    }

    /// Indices of neurons the given neuron projects onto, in index order
    pub fn outgoing(&self, index: usize) -> Result<Vec<usize>, ConnectivityError> {
        self.check_index(index)?;

        Ok(
            self.rows[index].iter()
                .enumerate()
                .filter_map(|(i, entry)| if *entry != 0 { Some(i) } else { None })
                .collect()
        )
    }

    /// Indices of neurons projecting onto the given neuron, in index order
    pub fn incoming(&self, index: usize) -> Result<Vec<usize>, ConnectivityError> {
        self.check_index(index)?;

        Ok(
            self.rows.iter()
                .enumerate()
                .filter_map(|(i, row)| if row[index] != 0 { Some(i) } else { None })
                .collect()
        )
    }

    /// Counts the given neuron's outgoing connections split by the type of
    /// each connected neuron, errors if the type vector does not match the
    /// matrix dimension
    pub fn connection_counts(
        &self,
        index: usize,
        types: &[NeuronType],
    ) -> Result<ConnectionCounts, ConnectivityError> {
        if types.len() != self.rows.len() {
            return Err(ConnectivityError::TypeLengthMismatch);
        }

        let targets = self.outgoing(index)?;

        let excitatory = targets.iter()
            .filter(|i| types[**i] == NeuronType::Excitatory)
            .count();

        Ok(ConnectionCounts {
            total: targets.len(),
            excitatory,
            inhibitory: targets.len() - excitatory,
        })
    }
}
