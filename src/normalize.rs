//! Raw table normalization.
//!
//! Whitespace-based detection produces ragged rows: a row with no text in
//! its trailing columns carries fewer cells than its neighbors. Indexing
//! and display both want rectangles, so normalization squares every region
//! off before anything downstream sees it.

use crate::model::{Grid, RawTable};

/// Normalize a raw table region into a rectangular grid.
///
/// The column count is the maximum cell count across all rows; shorter rows
/// are right-padded with empty-string cells. Row order, cell order, and
/// cell contents are preserved verbatim — no trimming, no numeric
/// coercion. Total over any input: a zero-row region normalizes to a
/// zero-row, zero-column grid.
pub fn normalize(raw: RawTable) -> Grid {
    Grid::from_rows(raw.page, raw.rows)
}

/// Normalize a batch of raw table regions, preserving order.
pub fn normalize_all(raw: impl IntoIterator<Item = RawTable>) -> Vec<Grid> {
    raw.into_iter().map(normalize).collect()
}
