//! Differential engine.
//!
//! Per-query recomputation over the cached aligned matrices: window means per
//! street or per interval, the signed `with - without` difference, display
//! magnitudes and top-N ranking.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::algorithms::{AlignedPair, PivotedMatrix};
use crate::models::{format_hms, MetricInfo};

/// Number of streets ranked when nothing is selected.
pub const DEFAULT_TOP_N: usize = 15;

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 {
        0.0
    } else {
        sum / n as f64
    }
}

/// Mean of every row over the columns in `interval_subset`.
///
/// Subset entries the matrix does not carry are dropped. A row with no
/// remaining cells averages to 0.0.
pub fn row_means(matrix: &PivotedMatrix, interval_subset: &[String]) -> IndexMap<String, f64> {
    let columns: Vec<usize> = interval_subset
        .iter()
        .filter_map(|key| matrix.columns().get_index_of(key.as_str()))
        .collect();

    matrix
        .rows()
        .iter()
        .enumerate()
        .map(|(r, entity)| {
            let cells = matrix.row_cells(r);
            let value = mean(columns.iter().filter_map(|&c| cells[c]));
            (entity.clone(), value)
        })
        .collect()
}

/// Mean of every column in `interval_subset` across rows.
///
/// Columns are returned in subset order; only rows named in `entities` take
/// part when it is given.
pub fn column_means(
    matrix: &PivotedMatrix,
    interval_subset: &[String],
    entities: Option<&HashSet<String>>,
) -> IndexMap<String, f64> {
    let rows: Vec<usize> = matrix
        .rows()
        .iter()
        .enumerate()
        .filter(|(_, id)| entities.map_or(true, |set| set.contains(id.as_str())))
        .map(|(r, _)| r)
        .collect();

    interval_subset
        .iter()
        .filter_map(|key| {
            let c = matrix.columns().get_index_of(key.as_str())?;
            let value = mean(rows.iter().filter_map(|&r| matrix.cell(r, c)));
            Some((key.clone(), value))
        })
        .collect()
}

/// Both scenario means of one entity and their signed difference.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifferenceEntry {
    pub mean_without: f64,
    pub mean_with: f64,
    /// `mean_with - mean_without`; positive means the perturbed run is higher
    pub difference: f64,
}

/// Entity id to difference, in union insertion order (without, then with).
pub type DifferenceRecord = IndexMap<String, DifferenceEntry>;

/// Signed per-entity difference over the union of both mappings; an entity
/// missing on one side counts as 0.0 there.
pub fn difference(
    means_without: &IndexMap<String, f64>,
    means_with: &IndexMap<String, f64>,
) -> DifferenceRecord {
    let mut record = DifferenceRecord::with_capacity(means_without.len().max(means_with.len()));
    for id in means_without.keys().chain(means_with.keys()) {
        if record.contains_key(id) {
            continue;
        }
        let mean_without = means_without.get(id).copied().unwrap_or(0.0);
        let mean_with = means_with.get(id).copied().unwrap_or(0.0);
        record.insert(
            id.clone(),
            DifferenceEntry {
                mean_without,
                mean_with,
                difference: mean_with - mean_without,
            },
        );
    }
    record
}

/// Window difference of every street of an aligned pair.
pub fn window_difference(pair: &AlignedPair, tokens: &[String]) -> DifferenceRecord {
    difference(
        &row_means(&pair.without, tokens),
        &row_means(&pair.with, tokens),
    )
}

/// Display form of a difference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayValue {
    /// Absolute magnitude
    pub value: f64,
    /// `H:MM:SS` for durations, two decimals otherwise
    pub label: String,
}

pub fn magnitude_transform(value: f64, metric: &MetricInfo) -> DisplayValue {
    let magnitude = value.abs();
    let label = if metric.duration_like && magnitude.is_finite() {
        format_hms(magnitude.trunc() as u64)
    } else {
        format!("{:.2}", magnitude)
    };
    DisplayValue {
        value: magnitude,
        label,
    }
}

/// Entity ids sorted by signed difference descending, first `n` kept.
///
/// The sort is stable, so ties keep record order.
pub fn rank_top_n(record: &DifferenceRecord, n: usize) -> Vec<String> {
    let mut ranked: Vec<(&String, f64)> = record
        .iter()
        .map(|(id, entry)| (id, entry.difference))
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked
        .into_iter()
        .take(n)
        .map(|(id, _)| id.clone())
        .collect()
}
