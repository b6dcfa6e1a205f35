//! Grid rendering.
//!
//! A grid serializes to exactly one text unit: a whitespace-aligned block
//! with one row per line, every column padded to its widest cell. Header
//! rows are not distinguished — every row renders the same way.

use crate::error::Result;
use crate::model::Grid;

/// Column separator in aligned output.
const COLUMN_GAP: &str = "  ";

/// Render a grid as whitespace-aligned text, one row per line.
///
/// Cells are right-justified within their column, columns separated by two
/// spaces, trailing whitespace trimmed from each line. The empty grid
/// renders as the empty string. Deterministic: equal grids always produce
/// identical output.
pub fn to_aligned_text(grid: &Grid) -> String {
    if grid.is_empty() || grid.column_count() == 0 {
        return String::new();
    }

    let mut widths = vec![0usize; grid.column_count()];
    for row in &grid.rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let mut lines = Vec::with_capacity(grid.row_count());
    for row in &grid.rows {
        let line = row
            .iter()
            .enumerate()
            .map(|(i, cell)| format!("{:>width$}", cell, width = widths[i]))
            .collect::<Vec<_>>()
            .join(COLUMN_GAP);
        lines.push(line.trim_end().to_string());
    }

    lines.join("\n")
}

/// Render a batch of grids to JSON.
pub fn to_json(grids: &[Grid], pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(grids)
    } else {
        serde_json::to_string(grids)
    };
    json.map_err(|e| crate::error::Error::Render(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[&str]]) -> Grid {
        Grid::from_rows(
            1,
            rows.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn test_aligned_text() {
        let g = grid(&[&["Name", "Age"], &["Alice", "30"], &["Bob", "25"]]);
        let text = to_aligned_text(&g);

        assert_eq!(text, " Name  Age\nAlice   30\n  Bob   25");
    }

    #[test]
    fn test_aligned_text_columns_line_up() {
        let g = grid(&[&["a", "bb"], &["ccc", "d"]]);
        let text = to_aligned_text(&g);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].len(), lines[1].len());
    }

    #[test]
    fn test_empty_grid_renders_empty() {
        assert_eq!(to_aligned_text(&Grid::empty(1)), "");
    }

    #[test]
    fn test_deterministic() {
        let g = grid(&[&["x", "y"], &["1", "2"]]);
        assert_eq!(to_aligned_text(&g), to_aligned_text(&g));
    }

    #[test]
    fn test_one_row_per_line() {
        let g = grid(&[&["a"], &["b"], &["c"]]);
        assert_eq!(to_aligned_text(&g).lines().count(), 3);
    }

    #[test]
    fn test_to_json_round_trips() {
        let g = grid(&[&["Name", "Age"], &["Alice", "30"]]);
        let json = to_json(std::slice::from_ref(&g), false).unwrap();
        let parsed: Vec<Grid> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, vec![g]);
    }
}
