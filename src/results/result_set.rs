use std::collections::HashMap;
use std::sync::Arc;

use super::row::{StoreRow, index_columns};
use crate::types::RowValues;

/// The fully materialized rows of one statement.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    /// The rows returned by the query
    pub results: Vec<StoreRow>,
    column_names: Option<Arc<Vec<String>>>,
    column_index: Option<Arc<HashMap<String, usize>>>,
}

impl ResultSet {
    #[must_use]
    pub fn with_capacity(capacity: usize) -> ResultSet {
        ResultSet {
            results: Vec::with_capacity(capacity),
            column_names: None,
            column_index: None,
        }
    }

    /// Set the column names for this result set (shared by all rows)
    pub fn set_column_names(&mut self, column_names: Arc<Vec<String>>) {
        self.column_index = Some(index_columns(&column_names));
        self.column_names = Some(column_names);
    }

    /// Add a row to the result set. Rows added before the column names are set are dropped.
    pub fn add_row_values(&mut self, row_values: Vec<RowValues>) {
        if let (Some(column_names), Some(column_index)) = (&self.column_names, &self.column_index) {
            self.results.push(StoreRow::with_index(
                Arc::clone(column_names),
                row_values,
                Arc::clone(column_index),
            ));
        }
    }

    /// Map each row through `f`, stopping at the first failure.
    ///
    /// # Errors
    /// Propagates the first error returned by `f`.
    pub fn map_rows<T, E>(&self, f: impl Fn(&StoreRow) -> Result<T, E>) -> Result<Vec<T>, E> {
        self.results.iter().map(f).collect()
    }
}
