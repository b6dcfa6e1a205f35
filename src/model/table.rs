//! Raw and normalized table types.

use serde::{Deserialize, Serialize};

/// An unprocessed tabular region detected on a single page.
///
/// Rows may be ragged: whitespace-based detection drops trailing empty
/// cells, so different rows can carry different cell counts. Use
/// [`normalize`](crate::normalize::normalize) to obtain a rectangular
/// [`Grid`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawTable {
    /// Origin page number (1-indexed)
    pub page: u32,

    /// Rows of raw text cells, in reading order
    pub rows: Vec<Vec<String>>,

    /// Detector alignment score (0.0-1.0); informational only, nothing
    /// downstream consumes it
    pub accuracy: f32,
}

impl RawTable {
    /// Create a raw table for a page.
    pub fn new(page: u32, rows: Vec<Vec<String>>) -> Self {
        Self {
            page,
            rows,
            accuracy: 0.0,
        }
    }

    /// Set the detector accuracy and return self.
    pub fn with_accuracy(mut self, accuracy: f32) -> Self {
        self.accuracy = accuracy;
        self
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// The widest row's cell count.
    pub fn max_row_len(&self) -> usize {
        self.rows.iter().map(|r| r.len()).max().unwrap_or(0)
    }

    /// Check if the region contains no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A rectangular grid of text cells.
///
/// Invariant: every row has exactly [`column_count`](Grid::column_count)
/// cells. Construct via [`normalize`](crate::normalize::normalize) or
/// [`Grid::from_rows`], both of which pad ragged input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    /// Origin page number (1-indexed)
    pub page: u32,

    /// Cell values, row-major
    pub rows: Vec<Vec<String>>,

    /// Uniform column count
    pub columns: usize,
}

impl Grid {
    /// Create an empty grid (zero rows, zero columns).
    pub fn empty(page: u32) -> Self {
        Self {
            page,
            rows: Vec::new(),
            columns: 0,
        }
    }

    /// Build a grid from rows, right-padding shorter rows with empty cells
    /// so every row matches the widest one.
    pub fn from_rows(page: u32, mut rows: Vec<Vec<String>>) -> Self {
        let columns = rows.iter().map(|r| r.len()).max().unwrap_or(0);
        for row in &mut rows {
            row.resize(columns, String::new());
        }
        Self {
            page,
            rows,
            columns,
        }
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get the uniform column count.
    pub fn column_count(&self) -> usize {
        self.columns
    }

    /// Check if the grid has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get a cell value by row and column, if present.
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row).and_then(|r| r.get(col)).map(|s| s.as_str())
    }
}
