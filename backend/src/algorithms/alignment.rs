//! Pivoting long-form tables into entity x interval matrices and aligning
//! the matrices of two scenarios onto a shared shape.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::error::{AnalysisResult, ErrorContext};
use crate::models::MetricTable;

/// Value written into cells that are missing after alignment.
pub const FILL_VALUE: f64 = 0.0;

/// Dense entity (row) x interval key (column) matrix for one metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PivotedMatrix {
    rows: IndexSet<String>,
    columns: IndexSet<String>,
    /// Row-major, `rows.len() * columns.len()` cells
    cells: Vec<Option<f64>>,
}

impl PivotedMatrix {
    /// Empty matrix with the given labels; every cell missing.
    pub fn with_labels(rows: IndexSet<String>, columns: IndexSet<String>) -> Self {
        let cells = vec![None; rows.len() * columns.len()];
        Self {
            rows,
            columns,
            cells,
        }
    }

    pub fn rows(&self) -> &IndexSet<String> {
        &self.rows
    }

    pub fn columns(&self) -> &IndexSet<String> {
        &self.columns
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.columns.len())
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<f64> {
        self.cells[row * self.columns.len() + column]
    }

    /// Cell by labels; `None` when either label is unknown or the cell is missing.
    pub fn get(&self, entity_id: &str, interval_key: &str) -> Option<f64> {
        let row = self.rows.get_index_of(entity_id)?;
        let column = self.columns.get_index_of(interval_key)?;
        self.cell(row, column)
    }

    pub fn set(&mut self, row: usize, column: usize, value: Option<f64>) {
        let width = self.columns.len();
        self.cells[row * width + column] = value;
    }

    /// Cells of one row in column order.
    pub fn row_cells(&self, row: usize) -> &[Option<f64>] {
        let width = self.columns.len();
        &self.cells[row * width..(row + 1) * width]
    }

    /// Reindex onto `rows` x `columns`, filling every absent cell with `fill`.
    pub fn reindex(
        &self,
        rows: &IndexSet<String>,
        columns: &IndexSet<String>,
        fill: f64,
    ) -> PivotedMatrix {
        let column_map: Vec<Option<usize>> = columns
            .iter()
            .map(|c| self.columns.get_index_of(c.as_str()))
            .collect();

        let mut out = PivotedMatrix::with_labels(rows.clone(), columns.clone());
        for (r, row_label) in rows.iter().enumerate() {
            let source_row = self.rows.get_index_of(row_label.as_str());
            for (c, source_column) in column_map.iter().enumerate() {
                let value = match (source_row, source_column) {
                    (Some(sr), Some(sc)) => self.cell(sr, *sc),
                    _ => None,
                };
                out.set(r, c, Some(value.unwrap_or(fill)));
            }
        }
        out
    }
}

/// Pivot `table` on one metric column.
///
/// Rows and columns follow first appearance in the table; cells without a
/// source row stay missing. Duplicate `(entity, interval)` rows are averaged.
pub fn pivot(table: &MetricTable, metric_column: &str) -> AnalysisResult<PivotedMatrix> {
    let idx = table.column_index(metric_column).map_err(|_| {
        crate::error::AnalysisError::missing_column(
            metric_column,
            ErrorContext::new("pivot").with_entity(table.entity_column().to_string()),
        )
    })?;

    let mut rows = IndexSet::new();
    let mut columns = IndexSet::new();
    for row in table.rows() {
        rows.insert(row.entity_id.clone());
        columns.insert(row.interval.key());
    }

    let width = columns.len();
    let mut sums = vec![0.0; rows.len() * width];
    let mut counts = vec![0u32; rows.len() * width];
    for row in table.rows() {
        let Some(value) = row.values[idx] else {
            continue;
        };
        let r = rows.get_index_of(row.entity_id.as_str()).unwrap_or_default();
        let c = columns.get_index_of(row.interval.key().as_str()).unwrap_or_default();
        sums[r * width + c] += value;
        counts[r * width + c] += 1;
    }

    let cells = sums
        .into_iter()
        .zip(counts)
        .map(|(sum, n)| (n > 0).then(|| sum / n as f64))
        .collect();

    log::debug!(
        "pivoted {} on {}: {} entities x {} intervals",
        table.entity_column(),
        metric_column,
        rows.len(),
        width
    );

    Ok(PivotedMatrix {
        rows,
        columns,
        cells,
    })
}

/// Align two matrices onto the union of their labels.
///
/// Row order is the order rows are first met scanning `a` then `b`, and the
/// same for columns. Every cell absent from a source, including cells that
/// were already missing, becomes [`FILL_VALUE`].
pub fn align(a: &PivotedMatrix, b: &PivotedMatrix) -> (PivotedMatrix, PivotedMatrix) {
    let mut rows = a.rows.clone();
    rows.extend(b.rows.iter().cloned());
    let mut columns = a.columns.clone();
    columns.extend(b.columns.iter().cloned());

    (
        a.reindex(&rows, &columns, FILL_VALUE),
        b.reindex(&rows, &columns, FILL_VALUE),
    )
}

/// Both scenarios of one metric after alignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignedPair {
    pub without: PivotedMatrix,
    pub with: PivotedMatrix,
}

impl AlignedPair {
    /// Pivot both tables on `metric_column` and align the results.
    pub fn build(
        without: &MetricTable,
        with: &MetricTable,
        metric_column: &str,
    ) -> AnalysisResult<Self> {
        let (without, with) = align(&pivot(without, metric_column)?, &pivot(with, metric_column)?);
        Ok(Self { without, with })
    }
}
