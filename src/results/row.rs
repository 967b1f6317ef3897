use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;

use crate::error::StoreError;
use crate::types::RowValues;

/// A single row from a query result, addressable by column name.
#[derive(Debug, Clone)]
pub struct StoreRow {
    /// The column names for this row (shared across all rows in a result set)
    pub column_names: Arc<Vec<String>>,
    /// The values for this row
    pub values: Vec<RowValues>,
    // First occurrence wins when a join repeats a column name.
    column_index: Arc<HashMap<String, usize>>,
}

pub(super) fn index_columns(column_names: &[String]) -> Arc<HashMap<String, usize>> {
    let mut index = HashMap::with_capacity(column_names.len());
    for (i, name) in column_names.iter().enumerate() {
        index.entry(name.clone()).or_insert(i);
    }
    Arc::new(index)
}

impl StoreRow {
    #[must_use]
    pub fn new(column_names: Arc<Vec<String>>, values: Vec<RowValues>) -> Self {
        let column_index = index_columns(&column_names);
        Self {
            column_names,
            values,
            column_index,
        }
    }

    pub(super) fn with_index(
        column_names: Arc<Vec<String>>,
        values: Vec<RowValues>,
        column_index: Arc<HashMap<String, usize>>,
    ) -> Self {
        Self {
            column_names,
            values,
            column_index,
        }
    }

    #[must_use]
    pub fn get_column_index(&self, column_name: &str) -> Option<usize> {
        self.column_index.get(column_name).copied()
    }

    /// Get a value from the row by column name
    #[must_use]
    pub fn get(&self, column_name: &str) -> Option<&RowValues> {
        self.get_column_index(column_name)
            .and_then(|idx| self.values.get(idx))
    }

    fn required(&self, column_name: &str) -> Result<&RowValues, StoreError> {
        self.get(column_name).ok_or_else(|| {
            StoreError::RowMapping(format!("column '{column_name}' missing from result"))
        })
    }

    fn mismatch(column_name: &str, expected: &str, found: &RowValues) -> StoreError {
        StoreError::RowMapping(format!(
            "column '{column_name}' expected {expected}, found {found:?}"
        ))
    }

    /// # Errors
    /// Returns `StoreError::RowMapping` if the column is missing or not an integer.
    pub fn int(&self, column_name: &str) -> Result<i64, StoreError> {
        let value = self.required(column_name)?;
        value
            .as_int()
            .ok_or_else(|| Self::mismatch(column_name, "an integer", value))
    }

    /// # Errors
    /// Returns `StoreError::RowMapping` if the column is missing or not text.
    pub fn text(&self, column_name: &str) -> Result<String, StoreError> {
        let value = self.required(column_name)?;
        value
            .as_text()
            .map(str::to_string)
            .ok_or_else(|| Self::mismatch(column_name, "text", value))
    }

    /// # Errors
    /// Returns `StoreError::RowMapping` if the column is missing or holds non-text.
    pub fn opt_text(&self, column_name: &str) -> Result<Option<String>, StoreError> {
        match self.required(column_name)? {
            RowValues::Null => Ok(None),
            RowValues::Text(s) => Ok(Some(s.clone())),
            other => Err(Self::mismatch(column_name, "text or null", other)),
        }
    }

    /// # Errors
    /// Returns `StoreError::RowMapping` if the column is missing or not numeric.
    pub fn opt_float(&self, column_name: &str) -> Result<Option<f64>, StoreError> {
        match self.required(column_name)? {
            RowValues::Null => Ok(None),
            other => other
                .as_float()
                .map(Some)
                .ok_or_else(|| Self::mismatch(column_name, "a number or null", other)),
        }
    }

    /// # Errors
    /// Returns `StoreError::RowMapping` if the column is missing or not a boolean.
    pub fn boolean(&self, column_name: &str) -> Result<bool, StoreError> {
        let value = self.required(column_name)?;
        value
            .as_bool()
            .ok_or_else(|| Self::mismatch(column_name, "a boolean", value))
    }

    /// # Errors
    /// Returns `StoreError::RowMapping` if the column is missing or not a date.
    pub fn date(&self, column_name: &str) -> Result<NaiveDate, StoreError> {
        let value = self.required(column_name)?;
        value
            .as_date()
            .ok_or_else(|| Self::mismatch(column_name, "a date", value))
    }
}
