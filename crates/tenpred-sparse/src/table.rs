//! Labeled coordinate tables
//!
//! A table holds one named integer column per mode plus exactly one float
//! value column, the layout ratings data usually arrives in
//! (`user, movie, rating`). Index columns keep the order they were added in,
//! which becomes the mode order of the resulting container.

use crate::coo::CooTensor;
use crate::error::{SparseResult, ValidationError};

/// Column-oriented table of coordinates and values
///
/// ```
/// use tenpred_sparse::table::CoordinateTable;
///
/// let table = CoordinateTable::new()
///     .with_index("user", vec![0, 2, 1])
///     .with_index("movie", vec![1, 0, 3])
///     .with_values("rating", vec![4.0, 3.5, 5.0]);
///
/// let coo = table.to_coo(None).unwrap();
/// assert_eq!(coo.shape(), &[3, 4]);
/// assert_eq!(coo.get(&[2, 0]), Some(3.5));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoordinateTable {
    index_columns: Vec<(String, Vec<i64>)>,
    value_columns: Vec<(String, Vec<f64>)>,
}

impl CoordinateTable {
    /// Empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an integer index column
    pub fn with_index(mut self, name: impl Into<String>, column: Vec<i64>) -> Self {
        self.index_columns.push((name.into(), column));
        self
    }

    /// Append a float value column
    pub fn with_values(mut self, name: impl Into<String>, column: Vec<f64>) -> Self {
        self.value_columns.push((name.into(), column));
        self
    }

    /// Names of the index columns, in mode order
    pub fn index_names(&self) -> Vec<&str> {
        self.index_columns.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Number of rows, taken from the first column
    pub fn num_rows(&self) -> usize {
        self.index_columns
            .first()
            .map(|(_, c)| c.len())
            .or_else(|| self.value_columns.first().map(|(_, c)| c.len()))
            .unwrap_or(0)
    }

    /// Convert to a coordinate container
    ///
    /// Without an explicit `shape` each mode's extent is the column maximum
    /// plus one (zero for an empty table).
    ///
    /// # Errors
    ///
    /// Fails unless there is at least one index column and exactly one value
    /// column of equal length, on negative indices, and on anything
    /// [`CooTensor::new`] rejects.
    pub fn to_coo(&self, shape: Option<Vec<usize>>) -> SparseResult<CooTensor<f64>> {
        if self.index_columns.is_empty() {
            return Err(ValidationError::NoIndexColumns.into());
        }
        let (value_name, values) = match self.value_columns.as_slice() {
            [single] => single,
            other => {
                return Err(ValidationError::ValueColumns { found: other.len() }.into());
            }
        };

        let rows = values.len();
        for (name, column) in &self.index_columns {
            if column.len() != rows {
                return Err(ValidationError::ColumnLength {
                    column: name.clone(),
                    expected: rows,
                    got: column.len(),
                }
                .into());
            }
        }

        let mut indices = vec![Vec::with_capacity(self.index_columns.len()); rows];
        for (name, column) in &self.index_columns {
            for (row, &value) in column.iter().enumerate() {
                if value < 0 {
                    return Err(ValidationError::NegativeIndex {
                        column: name.clone(),
                        row,
                        value,
                    }
                    .into());
                }
                indices[row].push(value as usize);
            }
        }

        let shape = match shape {
            Some(shape) => shape,
            None => self
                .index_columns
                .iter()
                .map(|(_, column)| column.iter().max().map_or(0, |&m| m as usize + 1))
                .collect(),
        };

        log::debug!(
            "table -> container: {} rows, value column '{}', shape {:?}",
            rows,
            value_name,
            shape
        );
        CooTensor::new(indices, values.clone(), shape)
    }
}
