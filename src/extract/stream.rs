//! Stream-mode table detection.
//!
//! Tables are inferred from text alignment patterns instead of ruled lines:
//! spans are grouped into rows by Y proximity, column boundaries come from
//! left edges that repeat across rows, and contiguous runs of well-aligned
//! rows become table regions. Works on the borderless, whitespace-delimited
//! tables common in reports and statements.

use std::collections::{HashMap, HashSet};

use crate::model::RawTable;

use super::layout::TextSpan;

/// A detected table region with its content.
#[derive(Debug, Clone)]
pub struct Detection {
    /// Detected column boundaries (X coordinates, left to right)
    pub columns: Vec<f32>,
    /// Right X boundary of the region
    pub right_x: f32,
    /// Rows of text spans grouped by Y position
    pub rows: Vec<RowGroup>,
    /// Mean per-row alignment score (0.0-1.0)
    pub score: f32,
}

/// A row of text spans at one baseline.
#[derive(Debug, Clone)]
pub struct RowGroup {
    /// Y position of this row
    pub y: f32,
    /// Spans in this row, sorted by X
    pub spans: Vec<TextSpan>,
}

/// Stream detector configuration.
#[derive(Debug, Clone)]
pub struct StreamConfig {
    /// Minimum number of rows to consider as table
    pub min_rows: usize,
    /// Minimum number of columns to consider as table
    pub min_columns: usize,
    /// Maximum number of columns (above this, likely word-level splitting)
    pub max_columns: usize,
    /// Y tolerance for grouping spans into rows (fraction of font size)
    pub y_tolerance_factor: f32,
    /// Minimum column alignment ratio (0.0-1.0)
    pub min_alignment_ratio: f32,
    /// Minimum gap between columns (points)
    pub min_column_gap: f32,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            min_rows: 2,
            min_columns: 2,
            max_columns: 8,
            y_tolerance_factor: 0.4,
            min_alignment_ratio: 0.3,
            min_column_gap: 15.0,
        }
    }
}

/// Detects tables in a page's text spans.
pub struct StreamDetector {
    config: StreamConfig,
}

impl StreamDetector {
    /// Create a detector with default configuration.
    pub fn new() -> Self {
        Self {
            config: StreamConfig::default(),
        }
    }

    /// Create a detector with custom configuration.
    pub fn with_config(config: StreamConfig) -> Self {
        Self { config }
    }

    /// Detect table regions in the given spans.
    ///
    /// Returns regions in top-to-bottom page order; an empty result means
    /// the page holds no tabular content.
    pub fn detect(&self, spans: Vec<TextSpan>) -> Vec<Detection> {
        log::debug!("StreamDetector: starting with {} spans", spans.len());

        if spans.len() < self.config.min_rows * self.config.min_columns {
            return vec![];
        }

        let rows = self.group_into_rows(spans);
        if rows.len() < self.config.min_rows {
            return vec![];
        }

        let columns = self.detect_columns(&rows);
        log::debug!(
            "StreamDetector: {} rows, column edges at {:?}",
            rows.len(),
            columns
        );
        if columns.len() < self.config.min_columns {
            return vec![];
        }

        let mut detections = Vec::new();

        for (start, end) in self.find_regions(&rows, &columns) {
            let region_rows: Vec<RowGroup> = rows[start..=end].to_vec();

            // Column edges re-derived per region: a page can hold tables
            // with different shapes.
            let region_columns = self.detect_columns(&region_rows);
            if region_columns.len() < self.config.min_columns {
                continue;
            }
            if region_columns.len() > self.config.max_columns {
                log::debug!(
                    "StreamDetector: skipping region with {} columns (max {})",
                    region_columns.len(),
                    self.config.max_columns
                );
                continue;
            }
            if self.is_list_pattern(&region_rows, &region_columns) {
                log::debug!("StreamDetector: skipping region that reads as a list");
                continue;
            }

            let right_x = region_rows
                .iter()
                .flat_map(|r| r.spans.iter())
                .map(|s| s.x + s.width)
                .fold(0.0f32, f32::max);

            let score = {
                let total: f32 = region_rows
                    .iter()
                    .map(|r| self.alignment_score(r, &region_columns))
                    .sum();
                total / region_rows.len() as f32
            };

            detections.push(Detection {
                columns: region_columns,
                right_x,
                rows: region_rows,
                score,
            });
        }

        detections
    }

    /// Convert a detection into the raw table model.
    ///
    /// Spans are assigned to the nearest column; cells sharing a column are
    /// joined with a space. Trailing empty cells are dropped, so rows can be
    /// ragged — normalization squares them off later.
    pub fn to_raw_table(&self, detection: &Detection, page: u32) -> RawTable {
        let columns = &detection.columns;
        let mut rows: Vec<Vec<String>> = Vec::with_capacity(detection.rows.len());

        for row in &detection.rows {
            let mut cell_contents: Vec<Vec<&str>> = vec![Vec::new(); columns.len()];

            for span in &row.spans {
                let col = find_column(span.x, columns, detection.right_x);
                if col < cell_contents.len() {
                    cell_contents[col].push(span.text.trim());
                }
            }

            let mut cells: Vec<String> =
                cell_contents.into_iter().map(|c| c.join(" ")).collect();

            while cells.last().is_some_and(|c| c.is_empty()) {
                cells.pop();
            }

            rows.push(cells);
        }

        RawTable::new(page, rows).with_accuracy(detection.score)
    }

    /// Group spans into rows by Y proximity, top of page first.
    fn group_into_rows(&self, mut spans: Vec<TextSpan>) -> Vec<RowGroup> {
        if spans.is_empty() {
            return vec![];
        }

        // Descending Y (PDF origin is bottom-left), then X.
        spans.sort_by(|a, b| {
            let y_cmp = b.y.partial_cmp(&a.y).unwrap_or(std::cmp::Ordering::Equal);
            if y_cmp == std::cmp::Ordering::Equal {
                a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal)
            } else {
                y_cmp
            }
        });

        let mut rows: Vec<RowGroup> = Vec::new();
        let mut current: Vec<TextSpan> = Vec::new();
        let mut current_y: Option<f32> = None;

        for span in spans {
            let tolerance = span.font_size * self.config.y_tolerance_factor;

            match current_y {
                Some(y) if (span.y - y).abs() <= tolerance => {
                    current.push(span);
                }
                _ => {
                    if !current.is_empty() {
                        rows.push(make_row(std::mem::take(&mut current)));
                    }
                    current_y = Some(span.y);
                    current.push(span);
                }
            }
        }

        if !current.is_empty() {
            rows.push(make_row(current));
        }

        rows
    }

    /// Detect column boundaries: left edges that repeat across rows, with
    /// each row counting an edge bucket at most once.
    fn detect_columns(&self, rows: &[RowGroup]) -> Vec<f32> {
        if rows.is_empty() {
            return vec![];
        }

        let bucket_size = 5.0;
        let mut edge_counts: HashMap<i32, usize> = HashMap::new();

        let multi_span_rows: Vec<&RowGroup> =
            rows.iter().filter(|r| r.spans.len() >= 2).collect();
        let counted: Vec<&RowGroup> = if multi_span_rows.len() >= self.config.min_rows {
            multi_span_rows
        } else {
            // Too few multi-span rows to vote; fall back to all rows.
            rows.iter().collect()
        };

        for row in &counted {
            let mut row_buckets: HashSet<i32> = HashSet::new();
            for span in &row.spans {
                row_buckets.insert((span.x / bucket_size).round() as i32);
            }
            for bucket in row_buckets {
                *edge_counts.entry(bucket).or_insert(0) += 1;
            }
        }

        let min_occurrences =
            ((counted.len() as f32 * self.config.min_alignment_ratio) as usize).max(2);

        let mut edges: Vec<f32> = edge_counts
            .iter()
            .filter(|(_, count)| **count >= min_occurrences)
            .map(|(bucket, _)| *bucket as f32 * bucket_size)
            .collect();
        edges.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        // Merge edges closer together than the minimum column gap.
        let mut merged: Vec<f32> = Vec::new();
        for edge in edges {
            match merged.last() {
                Some(&last) if edge - last < self.config.min_column_gap => {}
                _ => merged.push(edge),
            }
        }

        merged
    }

    /// Find contiguous runs of rows whose spans line up with the columns.
    fn find_regions(&self, rows: &[RowGroup], columns: &[f32]) -> Vec<(usize, usize)> {
        let mut regions: Vec<(usize, usize)> = Vec::new();
        let mut run_start: Option<usize> = None;

        for (i, row) in rows.iter().enumerate() {
            if self.alignment_score(row, columns) >= self.config.min_alignment_ratio {
                run_start.get_or_insert(i);
            } else if let Some(start) = run_start.take() {
                if i - start >= self.config.min_rows {
                    regions.push((start, i - 1));
                }
            }
        }

        if let Some(start) = run_start {
            if rows.len() - start >= self.config.min_rows {
                regions.push((start, rows.len() - 1));
            }
        }

        regions
    }

    /// Fraction of a row's spans whose left edge sits on a column boundary.
    fn alignment_score(&self, row: &RowGroup, columns: &[f32]) -> f32 {
        if row.spans.is_empty() || columns.is_empty() {
            return 0.0;
        }

        let tolerance = 5.0;
        let aligned = row
            .spans
            .iter()
            .filter(|span| columns.iter().any(|col| (span.x - col).abs() <= tolerance))
            .count();

        aligned as f32 / row.spans.len() as f32
    }

    /// Reject regions that are really bulleted or numbered lists: a list
    /// marker and its text split into separate spans look exactly like a
    /// two-column table.
    fn is_list_pattern(&self, rows: &[RowGroup], columns: &[f32]) -> bool {
        if columns.len() < 2 || rows.is_empty() {
            return false;
        }

        let mut bullets = 0;
        let mut numbers = 0;

        for row in rows {
            let first = row.spans.iter().min_by(|a, b| {
                a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal)
            });
            if let Some(span) = first {
                let text = span.text.trim();
                if is_bullet_marker(text) {
                    bullets += 1;
                } else if is_number_marker(text) {
                    numbers += 1;
                }
            }
        }

        let bullet_ratio = bullets as f32 / rows.len() as f32;
        if bullet_ratio >= 0.5 {
            return true;
        }

        // Numbered markers only disqualify two-column regions; wider tables
        // legitimately start with a numeric column.
        let total_ratio = (bullets + numbers) as f32 / rows.len() as f32;
        columns.len() == 2 && total_ratio >= 0.5
    }
}

impl Default for StreamDetector {
    fn default() -> Self {
        Self::new()
    }
}

fn make_row(spans: Vec<TextSpan>) -> RowGroup {
    let y = spans.iter().map(|s| s.y).sum::<f32>() / spans.len() as f32;
    RowGroup { y, spans }
}

/// Find which column a span belongs to based on its X position.
fn find_column(span_x: f32, columns: &[f32], right_x: f32) -> usize {
    if columns.is_empty() {
        return 0;
    }

    for (i, &col_start) in columns.iter().enumerate() {
        let col_end = columns.get(i + 1).copied().unwrap_or(right_x + 100.0);
        if span_x >= col_start - 10.0 && span_x < col_end - 10.0 {
            return i;
        }
    }

    // No band matched; take the closest boundary.
    let mut closest = 0;
    let mut min_dist = f32::MAX;
    for (i, &col_start) in columns.iter().enumerate() {
        let dist = (span_x - col_start).abs();
        if dist < min_dist {
            min_dist = dist;
            closest = i;
        }
    }
    closest
}

/// Check if text is a bullet marker.
fn is_bullet_marker(text: &str) -> bool {
    matches!(
        text.trim(),
        "-" | "–" | "—" | "•" | "·" | "*" | "○" | "▪" | "◦" | "▸" | "►" | "■" | "●"
    )
}

/// Check if text is a number-style list marker ("1.", "12)", "a.", bare "3").
fn is_number_marker(text: &str) -> bool {
    let cleaned: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    if cleaned.is_empty() {
        return false;
    }

    if let Some(pos) = cleaned.find(|c: char| !c.is_ascii_digit()) {
        let prefix = &cleaned[..pos];
        let suffix = &cleaned[pos..];
        if !prefix.is_empty() && (suffix == "." || suffix == ")") {
            return true;
        }
    }

    if cleaned.parse::<u32>().is_ok() {
        return true;
    }

    if cleaned.len() == 2 {
        let chars: Vec<char> = cleaned.chars().collect();
        if chars[0].is_alphabetic() && (chars[1] == '.' || chars[1] == ')') {
            return true;
        }
    }

    false
}
