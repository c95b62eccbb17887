use std::collections::HashMap;
use std::sync::Arc;

use crate::types::RowValues;

/// One result row: an ordered set of (column name, value) pairs.
///
/// Column names and the name-to-index cache are shared across all rows of a
/// result set, so a row is two `Arc` clones plus its values.
#[derive(Debug, Clone)]
pub struct Row {
    pub(crate) column_names: Arc<Vec<String>>,
    pub(crate) values: Vec<RowValues>,
    pub(crate) column_index: Arc<HashMap<String, usize>>,
}

impl Row {
    /// Column names in backend-returned order.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.column_names
    }

    /// Look up a value by column name.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&RowValues> {
        self.column_index
            .get(column)
            .and_then(|&idx| self.values.get(idx))
    }

    /// Look up a value by column position.
    #[must_use]
    pub fn get_by_index(&self, index: usize) -> Option<&RowValues> {
        self.values.get(index)
    }

    /// The row's values in column order.
    #[must_use]
    pub fn values(&self) -> &[RowValues] {
        &self.values
    }
}
