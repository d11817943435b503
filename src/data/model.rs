use std::collections::BTreeSet;

use crate::error::{ConfoundsError, Result};

// ---------------------------------------------------------------------------
// ConfoundTable – named numeric columns, one row per time point
// ---------------------------------------------------------------------------

/// An in-memory confounds table.
///
/// Columns are uniquely named, equal-length `f64` sequences; rows are
/// temporally ordered and aligned across columns. Missing values are
/// represented as `NaN`. The table is read-only to the selection and
/// reduction stages; every transformation produces a new table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfoundTable {
    names: Vec<String>,
    columns: Vec<Vec<f64>>,
}

impl ConfoundTable {
    /// An empty table (no columns, no rows).
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from `(name, values)` pairs, preserving their order.
    ///
    /// Fails with [`ConfoundsError::InvalidInput`] on a duplicate column
    /// name or mismatched column lengths.
    pub fn from_columns<I, S>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Vec<f64>)>,
        S: Into<String>,
    {
        let mut table = Self::new();
        for (name, values) in pairs {
            table.push_column(name, values)?;
        }
        Ok(table)
    }

    /// Append a column. The first column fixes the row count.
    pub fn push_column<S: Into<String>>(&mut self, name: S, values: Vec<f64>) -> Result<()> {
        let name = name.into();
        if self.names.iter().any(|n| *n == name) {
            return Err(ConfoundsError::InvalidInput(format!(
                "duplicate column name '{name}'"
            )));
        }
        if let Some(first) = self.columns.first() {
            if values.len() != first.len() {
                return Err(ConfoundsError::InvalidInput(format!(
                    "column '{name}' has {} rows, expected {}",
                    values.len(),
                    first.len()
                )));
            }
        }
        self.names.push(name);
        self.columns.push(values);
        Ok(())
    }

    /// Ordered column names.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of rows (time points).
    pub fn n_rows(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }

    /// Number of columns.
    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    /// Whether the table has no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Borrow a column by name.
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| self.columns[i].as_slice())
    }

    /// Slice out the named columns, in the order given.
    ///
    /// This is the stage that enforces presence: any name absent from the
    /// table fails with [`ConfoundsError::MissingColumn`].
    pub fn select<'a, I>(&self, names: I) -> Result<ConfoundTable>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut out = ConfoundTable::new();
        for name in names {
            let values = self
                .column(name)
                .ok_or_else(|| ConfoundsError::MissingColumn {
                    name: name.to_string(),
                })?;
            out.push_column(name, values.to_vec())?;
        }
        Ok(out)
    }

    /// Keep only the given row indices, in the order given.
    pub fn take_rows(&self, rows: &[usize]) -> ConfoundTable {
        let columns = self
            .columns
            .iter()
            .map(|col| rows.iter().map(|&r| col[r]).collect())
            .collect();
        ConfoundTable {
            names: self.names.clone(),
            columns,
        }
    }

    /// Concatenate another table's columns to the right of this one.
    ///
    /// Both tables must agree on row count (unless one side is empty) and
    /// the combined names must stay unique.
    pub fn hstack(mut self, other: ConfoundTable) -> Result<ConfoundTable> {
        if !self.is_empty() && !other.is_empty() && self.n_rows() != other.n_rows() {
            return Err(ConfoundsError::InvalidInput(format!(
                "cannot concatenate tables with {} and {} rows",
                self.n_rows(),
                other.n_rows()
            )));
        }
        for (name, values) in other.names.into_iter().zip(other.columns) {
            self.push_column(name, values)?;
        }
        Ok(self)
    }

    /// Sorted set of column names, for membership checks during selection.
    pub fn name_set(&self) -> BTreeSet<&str> {
        self.names.iter().map(String::as_str).collect()
    }
}
