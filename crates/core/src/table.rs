//! Table payload and the convenience constructors used by the builder API

use crate::error::{Error, Result};
use std::fmt::Display;

/// Headings used by key/value tables
pub const KEY_VALUE_HEADINGS: [&str; 2] = ["Nombre", "Valor"];

/// Rectangular table of strings with optional text before and after it
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Table {
    pub headings: Vec<String>,
    /// Every row has exactly `headings.len()` cells
    pub rows: Vec<Vec<String>>,
    /// Rendered before the table; empty means none
    pub pre: String,
    /// Rendered after the table; empty means none
    pub post: String,
}

impl Table {
    /// Build a table from a rectangular grid
    pub fn new(headings: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self> {
        for (index, row) in rows.iter().enumerate() {
            check_row_width(&headings, row, index)?;
        }
        Ok(Self {
            headings,
            rows,
            pre: String::new(),
            post: String::new(),
        })
    }

    /// Two-column table: index in the first column, value in the second
    ///
    /// Headings are the index name and the series name (empty if unnamed).
    pub fn from_series<K, V, I>(index_name: &str, series_name: &str, series: I) -> Result<Self>
    where
        K: Display,
        V: Display,
        I: IntoIterator<Item = (K, V)>,
    {
        let rows = series
            .into_iter()
            .map(|(key, value)| vec![key.to_string(), value.to_string()])
            .collect();
        Self::new(vec![index_name.to_string(), series_name.to_string()], rows)
    }

    /// Table from a labelled 2-D grid
    pub fn from_frame<V: Display>(frame: &Frame<V>) -> Result<Self> {
        let mut headings = Vec::with_capacity(frame.columns.len() + 1);
        headings.push(frame.corner_heading());
        headings.extend(frame.columns.iter().cloned());

        let rows = frame
            .rows
            .iter()
            .map(|(label, cells)| {
                let mut row = Vec::with_capacity(cells.len() + 1);
                row.push(label.clone());
                row.extend(cells.iter().map(|cell| cell.to_string()));
                row
            })
            .collect();
        Self::new(headings, rows)
    }

    /// `Nombre`/`Valor` table from name/value pairs
    pub fn key_value<K, V, I>(pairs: I) -> Result<Self>
    where
        K: Display,
        V: Display,
        I: IntoIterator<Item = (K, V)>,
    {
        Self::from_series(KEY_VALUE_HEADINGS[0], KEY_VALUE_HEADINGS[1], pairs)
    }

    pub fn with_pre(mut self, pre: impl Into<String>) -> Self {
        self.pre = pre.into();
        self
    }

    pub fn with_post(mut self, post: impl Into<String>) -> Self {
        self.post = post.into();
        self
    }

    /// Append a data row
    pub fn add_row(&mut self, row: Vec<String>) -> Result<()> {
        check_row_width(&self.headings, &row, self.rows.len())?;
        self.rows.push(row);
        Ok(())
    }

    pub fn width(&self) -> usize {
        self.headings.len()
    }
}

fn check_row_width(headings: &[String], row: &[String], index: usize) -> Result<()> {
    if row.len() != headings.len() {
        return Err(Error::validation(format!(
            "Row {} has {} cells but the table has {} headings",
            index,
            row.len(),
            headings.len()
        )));
    }
    Ok(())
}

/// A 2-D grid with row labels and column labels
///
/// Row labels become the first table column; cells are stringified with
/// `Display`.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame<V> {
    /// Name of the row axis (e.g. "Region")
    pub row_axis: Option<String>,
    /// Name of the column axis (e.g. "Sales Channel")
    pub column_axis: Option<String>,
    pub columns: Vec<String>,
    pub rows: Vec<(String, Vec<V>)>,
}

impl<V> Frame<V> {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            row_axis: None,
            column_axis: None,
            columns,
            rows: Vec::new(),
        }
    }

    pub fn with_axes(mut self, row_axis: impl Into<String>, column_axis: impl Into<String>) -> Self {
        self.row_axis = Some(row_axis.into());
        self.column_axis = Some(column_axis.into());
        self
    }

    pub fn push_row(&mut self, label: impl Into<String>, cells: Vec<V>) {
        self.rows.push((label.into(), cells));
    }

    /// `row_axis/column_axis`, or whichever is set
    fn corner_heading(&self) -> String {
        let rows = self.row_axis.as_deref().unwrap_or("");
        let cols = self.column_axis.as_deref().unwrap_or("");
        if !rows.is_empty() && !cols.is_empty() {
            format!("{}/{}", rows, cols)
        } else {
            format!("{}{}", rows, cols)
        }
    }
}
