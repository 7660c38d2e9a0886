use crate::config::NO_EMOTION;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;

#[derive(Debug, Clone, Copy, Default)]
struct Cell {
    sum: f64,
    count: usize,
}

/// Mean of values grouped by a composite row key and one column key.
#[derive(Debug, Clone)]
pub struct PivotTable {
    index_names: Vec<String>,
    cells: BTreeMap<Vec<String>, BTreeMap<String, Cell>>,
    columns: BTreeSet<String>,
}

impl PivotTable {
    pub fn new(index_names: &[&str]) -> Self {
        Self {
            index_names: index_names.iter().map(ToString::to_string).collect(),
            cells: BTreeMap::new(),
            columns: BTreeSet::new(),
        }
    }

    pub fn add(&mut self, row: Vec<String>, column: &str, value: f64) {
        let cell = self
            .cells
            .entry(row)
            .or_default()
            .entry(column.to_string())
            .or_default();
        cell.sum += value;
        cell.count += 1;
        self.columns.insert(column.to_string());
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Sorted column keys with `no_emotion` moved to the front.
    pub fn columns(&self) -> Vec<String> {
        let mut columns: Vec<String> = self.columns.iter().cloned().collect();
        if let Some(pos) = columns.iter().position(|c| c == NO_EMOTION) {
            let baseline = columns.remove(pos);
            columns.insert(0, baseline);
        }
        columns
    }

    pub fn rows(&self) -> impl Iterator<Item = &[String]> {
        self.cells.keys().map(Vec::as_slice)
    }

    pub fn mean(&self, row: &[String], column: &str) -> Option<f64> {
        self.cells
            .get(row)
            .and_then(|cols| cols.get(column))
            .filter(|cell| cell.count > 0)
            .map(|cell| cell.sum / cell.count as f64)
    }

    /// Aligned plain-text table; empty cells print as `-`.
    pub fn render_text(&self) -> String {
        let columns = self.columns();
        let mut header: Vec<String> = self.index_names.clone();
        header.extend(columns.iter().cloned());

        let mut lines: Vec<Vec<String>> = vec![header];
        for row in self.rows() {
            let mut line = row.to_vec();
            for column in &columns {
                line.push(
                    self.mean(row, column)
                        .map_or_else(|| "-".to_string(), |v| format!("{v:.2}")),
                );
            }
            lines.push(line);
        }

        let width = lines.iter().map(Vec::len).max().unwrap_or(0);
        let widths: Vec<usize> = (0..width)
            .map(|i| {
                lines
                    .iter()
                    .filter_map(|l| l.get(i))
                    .map(|s| s.chars().count())
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let mut out = String::new();
        for line in &lines {
            let cells: Vec<String> = line
                .iter()
                .zip(&widths)
                .map(|(cell, &w)| format!("{cell:<w$}"))
                .collect();
            let _ = writeln!(out, "{}", cells.join("  ").trim_end());
        }
        out
    }

    /// CSV with a header row; empty cells stay empty.
    pub fn render_csv(&self) -> String {
        let columns = self.columns();
        let mut header = self.index_names.clone();
        header.extend(columns.iter().cloned());

        let mut out = String::new();
        out.push_str(&crate::logger::csv::encode_row(&header));
        for row in self.rows() {
            let mut fields = row.to_vec();
            for column in &columns {
                fields.push(
                    self.mean(row, column)
                        .map(|v| format!("{v:.2}"))
                        .unwrap_or_default(),
                );
            }
            out.push_str(&crate::logger::csv::encode_row(&fields));
        }
        out
    }
}
