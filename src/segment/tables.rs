//! Table detection from text alignment (Stream-mode style).
//!
//! Tables in contracts rarely have drawn rules, so detection works purely
//! from text positions: runs are grouped into rows by baseline, column edges
//! are the X positions that repeat across rows, and contiguous spans of
//! multi-column rows become tables.

use std::collections::{HashMap, HashSet};

use crate::extract::TextRun;
use crate::model::{Table, TableRow};
use crate::normalize::Normalizer;

/// Table detector configuration.
#[derive(Debug, Clone)]
pub struct TableDetectorConfig {
    /// Minimum number of rows to consider as table
    pub min_rows: usize,
    /// Minimum number of columns to consider as table
    pub min_columns: usize,
    /// Maximum number of columns (above this, likely word-level splitting)
    pub max_columns: usize,
    /// Y tolerance for grouping runs into rows (fraction of font size)
    pub y_tolerance_factor: f32,
    /// Minimum fraction of multi-run rows a column edge must appear in
    pub min_alignment_ratio: f32,
    /// Minimum gap between column edges (points)
    pub min_column_gap: f32,
}

impl Default for TableDetectorConfig {
    fn default() -> Self {
        Self {
            min_rows: 2,
            min_columns: 2,
            max_columns: 6,
            y_tolerance_factor: 0.4,
            min_alignment_ratio: 0.3,
            min_column_gap: 15.0,
        }
    }
}

/// A detected table with its vertical position, for interleaving with the
/// surrounding text in reading order.
#[derive(Debug, Clone)]
pub struct DetectedTable {
    /// Y coordinate of the table's top row (PDF coordinates)
    pub top_y: f32,
    /// The extracted table
    pub table: Table,
}

/// A row of run indices grouped by baseline.
struct RowGroup {
    y: f32,
    indices: Vec<usize>,
}

/// Detects tables in one page's text runs.
pub struct TableDetector<'a> {
    config: &'a TableDetectorConfig,
    normalizer: Normalizer,
}

impl<'a> TableDetector<'a> {
    /// Create a new detector with the given configuration.
    pub fn new(config: &'a TableDetectorConfig) -> Self {
        Self {
            config,
            normalizer: Normalizer::new(),
        }
    }

    /// Detect tables in the given runs.
    ///
    /// Returns detected tables and the runs that were NOT part of any table,
    /// in their original order.
    pub fn detect(&self, runs: Vec<TextRun>) -> (Vec<DetectedTable>, Vec<TextRun>) {
        if runs.len() < self.config.min_rows * self.config.min_columns {
            return (vec![], runs);
        }

        let rows = self.group_into_rows(&runs);
        if rows.len() < self.config.min_rows {
            return (vec![], runs);
        }

        let columns = self.detect_columns(&runs, &rows);
        log::debug!(
            "table detector: {} rows, column edges {:?}",
            rows.len(),
            columns
        );

        if columns.len() < self.config.min_columns || columns.len() > self.config.max_columns {
            return (vec![], runs);
        }

        let regions = self.find_table_regions(&runs, &rows, &columns);
        if regions.is_empty() {
            return (vec![], runs);
        }

        let mut detected = Vec::new();
        let mut used: HashSet<usize> = HashSet::new();

        for (start, end) in regions {
            let region_rows = &rows[start..=end];
            let table = self.build_table(&runs, region_rows, &columns);

            if self.is_list_pattern(&table) {
                log::debug!("table detector: region rejected as list pattern");
                continue;
            }

            for row in region_rows {
                used.extend(row.indices.iter().copied());
            }
            detected.push(DetectedTable {
                top_y: region_rows.first().map(|r| r.y).unwrap_or(0.0),
                table,
            });
        }

        let leftover: Vec<TextRun> = runs
            .into_iter()
            .enumerate()
            .filter(|(i, _)| !used.contains(i))
            .map(|(_, run)| run)
            .collect();

        (detected, leftover)
    }

    /// Group run indices into rows by Y position.
    fn group_into_rows(&self, runs: &[TextRun]) -> Vec<RowGroup> {
        let mut order: Vec<usize> = (0..runs.len()).collect();
        order.sort_by(|&a, &b| {
            let y_cmp = runs[b]
                .y
                .partial_cmp(&runs[a].y)
                .unwrap_or(std::cmp::Ordering::Equal);
            if y_cmp == std::cmp::Ordering::Equal {
                runs[a]
                    .x
                    .partial_cmp(&runs[b].x)
                    .unwrap_or(std::cmp::Ordering::Equal)
            } else {
                y_cmp
            }
        });

        let mut rows: Vec<RowGroup> = Vec::new();
        for i in order {
            let run = &runs[i];
            let y_tolerance = run.font_size * self.config.y_tolerance_factor;

            match rows.last_mut() {
                Some(row) if (run.y - row.y).abs() <= y_tolerance => {
                    row.indices.push(i);
                }
                _ => rows.push(RowGroup {
                    y: run.y,
                    indices: vec![i],
                }),
            }
        }
        rows
    }

    /// Column edges: bucketed left X positions that repeat across multi-run
    /// rows, merged when closer than the minimum column gap.
    fn detect_columns(&self, runs: &[TextRun], rows: &[RowGroup]) -> Vec<f32> {
        let multi_rows: Vec<&RowGroup> = rows.iter().filter(|r| r.indices.len() >= 2).collect();
        if multi_rows.len() < self.config.min_rows {
            return vec![];
        }

        let bucket_size = 5.0;
        let mut edge_counts: HashMap<i32, usize> = HashMap::new();
        for row in &multi_rows {
            let mut row_buckets: HashSet<i32> = HashSet::new();
            for &i in &row.indices {
                row_buckets.insert((runs[i].x / bucket_size).round() as i32);
            }
            for bucket in row_buckets {
                *edge_counts.entry(bucket).or_insert(0) += 1;
            }
        }

        let min_occurrences =
            ((multi_rows.len() as f32 * self.config.min_alignment_ratio) as usize).max(2);

        let mut edges: Vec<f32> = edge_counts
            .iter()
            .filter(|(_, count)| **count >= min_occurrences)
            .map(|(bucket, _)| *bucket as f32 * bucket_size)
            .collect();
        edges.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let mut merged: Vec<f32> = Vec::new();
        for edge in edges {
            match merged.last() {
                Some(&last) if edge - last < self.config.min_column_gap => {}
                _ => merged.push(edge),
            }
        }
        merged
    }

    /// Contiguous row ranges where each row lines up with at least
    /// `min_columns` distinct column edges.
    fn find_table_regions(
        &self,
        runs: &[TextRun],
        rows: &[RowGroup],
        columns: &[f32],
    ) -> Vec<(usize, usize)> {
        let mut regions = Vec::new();
        let mut region_start: Option<usize> = None;

        for (i, row) in rows.iter().enumerate() {
            let aligned = self.aligned_column_count(runs, row, columns);
            let is_table_row = aligned >= self.config.min_columns;

            match (is_table_row, region_start) {
                (true, None) => region_start = Some(i),
                (false, Some(start)) => {
                    if i - start >= self.config.min_rows {
                        regions.push((start, i - 1));
                    }
                    region_start = None;
                }
                _ => {}
            }
        }
        if let Some(start) = region_start {
            if rows.len() - start >= self.config.min_rows {
                regions.push((start, rows.len() - 1));
            }
        }
        regions
    }

    /// Number of distinct column edges the row's runs align with.
    fn aligned_column_count(&self, runs: &[TextRun], row: &RowGroup, columns: &[f32]) -> usize {
        let mut hit: HashSet<usize> = HashSet::new();
        for &i in &row.indices {
            if let Some(col) = nearest_column(columns, runs[i].x, self.config.min_column_gap) {
                hit.insert(col);
            }
        }
        hit.len()
    }

    /// Build a table from a row range, distributing runs into cells by
    /// nearest column edge. Runs landing in the same cell are concatenated.
    fn build_table(&self, runs: &[TextRun], rows: &[RowGroup], columns: &[f32]) -> Table {
        let mut table = Table::new();

        for row in rows {
            let mut cells: Vec<String> = vec![String::new(); columns.len()];
            let mut indices = row.indices.clone();
            indices.sort_by(|&a, &b| {
                runs[a]
                    .x
                    .partial_cmp(&runs[b].x)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });

            for i in indices {
                let run = &runs[i];
                let col = nearest_column(columns, run.x, self.config.min_column_gap)
                    .unwrap_or_else(|| fallback_column(columns, run.x));
                if !cells[col].is_empty() {
                    cells[col].push(' ');
                }
                cells[col].push_str(&run.text);
            }

            let cells: Vec<String> = cells
                .into_iter()
                .map(|c| self.normalizer.normalize(&c))
                .collect();
            table.add_row(TableRow::new(cells));
        }

        table
    }

    /// Two-column regions where the first column is only list markers are
    /// bulleted lists, not tables.
    fn is_list_pattern(&self, table: &Table) -> bool {
        if table.column_count() != 2 {
            return false;
        }
        table.rows.iter().all(|row| {
            row.cells
                .first()
                .map(|c| {
                    let c = c.trim();
                    c.len() <= 3
                        && (c == "-"
                            || c == "*"
                            || c.trim_end_matches(['.', ')']).chars().all(|ch| ch.is_ascii_digit()))
                })
                .unwrap_or(false)
        })
    }
}

/// Index of the column edge within gap tolerance of `x`, if any.
fn nearest_column(columns: &[f32], x: f32, tolerance: f32) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &edge) in columns.iter().enumerate() {
        let dist = (x - edge).abs();
        if dist <= tolerance {
            match best {
                Some((_, d)) if d <= dist => {}
                _ => best = Some((i, dist)),
            }
        }
    }
    best.map(|(i, _)| i)
}

/// Last column edge at or left of `x` (for runs between edges).
fn fallback_column(columns: &[f32], x: f32) -> usize {
    let mut col = 0;
    for (i, &edge) in columns.iter().enumerate() {
        if x >= edge {
            col = i;
        }
    }
    col
}
