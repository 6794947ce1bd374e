//! Typed long-form tables produced by the loading layer.
//!
//! A [`MetricTable`] holds one row per `(interval, entity)` with a cell for
//! every metric column; missing cells are `None`. A [`TripTable`] holds one
//! row per vehicle trip.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::time::{Interval, Timeline};
use crate::error::{AnalysisError, AnalysisResult, ErrorContext};

/// Entity column of edge exports.
pub const EDGE_ID_COLUMN: &str = "edge_id";

/// Entity column of trip exports.
pub const TRIP_ID_COLUMN: &str = "tripinfo_id";

/// The two simulation runs being compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scenario {
    /// Baseline run
    Without,
    /// Perturbed run, e.g. with road closures
    With,
}

impl Scenario {
    pub fn label(self) -> &'static str {
        match self {
            Scenario::Without => "Without deviations",
            Scenario::With => "With deviations",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRow {
    pub interval: Interval,
    pub entity_id: String,
    /// Parallel to the table's metric columns
    pub values: Vec<Option<f64>>,
}

/// Long-form `(interval, entity) -> metrics` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricTable {
    entity_column: String,
    metric_columns: Vec<String>,
    rows: Vec<MetricRow>,
}

impl MetricTable {
    pub fn new(entity_column: impl Into<String>, metric_columns: Vec<String>) -> Self {
        Self {
            entity_column: entity_column.into(),
            metric_columns,
            rows: Vec::new(),
        }
    }

    /// Empty edge table with the given metric columns.
    pub fn edges(metric_columns: &[&str]) -> Self {
        Self::new(
            EDGE_ID_COLUMN,
            metric_columns.iter().map(|c| c.to_string()).collect(),
        )
    }

    pub fn entity_column(&self) -> &str {
        &self.entity_column
    }

    pub fn metric_columns(&self) -> &[String] {
        &self.metric_columns
    }

    pub fn rows(&self) -> &[MetricRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.metric_columns.iter().any(|c| c == column)
    }

    /// Position of `column` among the metric columns.
    pub fn column_index(&self, column: &str) -> AnalysisResult<usize> {
        self.metric_columns
            .iter()
            .position(|c| c == column)
            .ok_or_else(|| {
                AnalysisError::missing_column(
                    column,
                    ErrorContext::new("column_index").with_entity(self.entity_column.clone()),
                )
            })
    }

    /// Append a row; `values` must be parallel to the metric columns.
    pub fn push_row(
        &mut self,
        interval: Interval,
        entity_id: impl Into<String>,
        values: Vec<Option<f64>>,
    ) -> AnalysisResult<()> {
        if values.len() != self.metric_columns.len() {
            return Err(AnalysisError::format(
                format!(
                    "row has {} values for {} metric columns",
                    values.len(),
                    self.metric_columns.len()
                ),
                ErrorContext::new("push_row").with_entity(self.entity_column.clone()),
            ));
        }
        self.rows.push(MetricRow {
            interval,
            entity_id: entity_id.into(),
            values,
        });
        Ok(())
    }

    /// Concatenate export chunks of one scenario.
    ///
    /// The metric columns are the union of the chunks' columns in first-seen
    /// order; cells for columns a chunk lacks are missing.
    pub fn concat(chunks: Vec<MetricTable>) -> AnalysisResult<Self> {
        let mut chunks = chunks.into_iter();
        let Some(first) = chunks.next() else {
            return Ok(Self::new(EDGE_ID_COLUMN, Vec::new()));
        };

        let mut merged = first;
        for chunk in chunks {
            if chunk.entity_column != merged.entity_column {
                return Err(AnalysisError::format(
                    format!(
                        "cannot concatenate '{}' rows into a '{}' table",
                        chunk.entity_column, merged.entity_column
                    ),
                    ErrorContext::new("concat"),
                ));
            }

            for column in &chunk.metric_columns {
                if !merged.has_column(column) {
                    merged.metric_columns.push(column.clone());
                    for row in &mut merged.rows {
                        row.values.push(None);
                    }
                }
            }

            let positions: Vec<usize> = chunk
                .metric_columns
                .iter()
                .map(|c| merged.column_index(c))
                .collect::<AnalysisResult<_>>()?;

            for row in chunk.rows {
                let mut values = vec![None; merged.metric_columns.len()];
                for (value, &pos) in row.values.into_iter().zip(&positions) {
                    values[pos] = value;
                }
                merged.rows.push(MetricRow { values, ..row });
            }
        }
        Ok(merged)
    }

    /// Order rows by `(interval start, entity id)`, keeping ties stable.
    pub fn sort(&mut self) {
        self.rows.sort_by(|a, b| {
            a.interval
                .start_seconds
                .cmp(&b.interval.start_seconds)
                .then_with(|| a.entity_id.cmp(&b.entity_id))
        });
    }

    pub fn timeline(&self) -> Timeline {
        Timeline::new(self.rows.iter().map(|r| r.interval))
    }

    pub fn entity_count(&self) -> usize {
        self.rows
            .iter()
            .map(|r| r.entity_id.as_str())
            .collect::<HashSet<_>>()
            .len()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripRow {
    pub trip_id: String,
    pub values: Vec<Option<f64>>,
}

/// One row per vehicle trip.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TripTable {
    metric_columns: Vec<String>,
    rows: Vec<TripRow>,
}

impl TripTable {
    pub fn new(metric_columns: Vec<String>) -> Self {
        Self {
            metric_columns,
            rows: Vec::new(),
        }
    }

    pub fn metric_columns(&self) -> &[String] {
        &self.metric_columns
    }

    pub fn rows(&self) -> &[TripRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.metric_columns.iter().any(|c| c == column)
    }

    pub fn push_row(
        &mut self,
        trip_id: impl Into<String>,
        values: Vec<Option<f64>>,
    ) -> AnalysisResult<()> {
        if values.len() != self.metric_columns.len() {
            return Err(AnalysisError::format(
                format!(
                    "row has {} values for {} metric columns",
                    values.len(),
                    self.metric_columns.len()
                ),
                ErrorContext::new("push_row").with_entity("trip"),
            ));
        }
        self.rows.push(TripRow {
            trip_id: trip_id.into(),
            values,
        });
        Ok(())
    }

    fn column_index(&self, column: &str) -> AnalysisResult<usize> {
        self.metric_columns
            .iter()
            .position(|c| c == column)
            .ok_or_else(|| {
                AnalysisError::missing_column(column, ErrorContext::new("trip_column").with_entity("trip"))
            })
    }

    /// `(trip id, cell)` for every trip, missing cells included.
    pub fn column_cells(&self, column: &str) -> AnalysisResult<Vec<(&str, Option<f64>)>> {
        let idx = self.column_index(column)?;
        Ok(self
            .rows
            .iter()
            .map(|r| (r.trip_id.as_str(), r.values[idx]))
            .collect())
    }

    /// `(trip id, value)` pairs of one metric column, skipping missing cells.
    pub fn column_values(&self, column: &str) -> AnalysisResult<Vec<(&str, f64)>> {
        let idx = self.column_index(column)?;
        Ok(self
            .rows
            .iter()
            .filter_map(|r| r.values[idx].map(|v| (r.trip_id.as_str(), v)))
            .collect())
    }
}
