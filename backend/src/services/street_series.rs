//! Per-interval series for the street detail chart.

use std::collections::HashSet;

use crate::algorithms::PivotedMatrix;
use crate::error::AnalysisResult;
use crate::models::geo::street_label;
use crate::models::{Metric, MetricDescriptor, Scenario, TimeWindow};
use crate::routes::streets::{SeriesPoint, StreetSeries, StreetSeriesData};
use crate::services::differential::column_means;
use crate::services::selection::{SelectionState, ViewMode};
use crate::services::session::{Session, StreetQuery};

pub const ALL_STREETS_LABEL: &str = "All streets (average)";

fn points_from(values: impl Iterator<Item = (String, f64)>, window: &TimeWindow) -> Vec<SeriesPoint> {
    values
        .map(|(key, value)| {
            let label = window
                .tokens
                .iter()
                .position(|t| *t == key)
                .and_then(|i| window.labels.get(i).cloned())
                .unwrap_or_default();
            SeriesPoint {
                interval_key: key,
                label,
                value,
            }
        })
        .collect()
}

fn row_series(matrix: &PivotedMatrix, id: &str, window: &TimeWindow) -> Option<Vec<SeriesPoint>> {
    let row = matrix.rows().get_index_of(id)?;
    let cells = matrix.row_cells(row);
    let values = window.tokens.iter().filter_map(|key| {
        let c = matrix.columns().get_index_of(key.as_str())?;
        Some((key.clone(), cells[c].unwrap_or(0.0)))
    });
    Some(points_from(values, window))
}

pub fn street_series(
    session: &Session,
    query: &StreetQuery,
    selection: &SelectionState,
) -> AnalysisResult<StreetSeriesData> {
    let (pair, window) = session.resolve(query)?;
    let mode = selection.mode();
    let scenarios = [(Scenario::Without, &pair.without), (Scenario::With, &pair.with)];

    let mut series = Vec::new();
    let mut missing_ids = Vec::new();
    match mode {
        ViewMode::NoSelection => {
            for (scenario, matrix) in scenarios {
                let means = column_means(matrix, &window.tokens, None::<&HashSet<String>>);
                series.push(StreetSeries {
                    entity_id: None,
                    label: format!("{} - {}", ALL_STREETS_LABEL, scenario.label()),
                    scenario,
                    points: points_from(means.into_iter(), &window),
                });
            }
        }
        ViewMode::SingleSelected | ViewMode::MultiSelected => {
            for id in selection.ids() {
                let name = selection
                    .name_of(&id)
                    .filter(|n| !n.is_empty())
                    .or_else(|| session.street_name(&id));
                let street = street_label(name, &id);

                let mut found = false;
                for (scenario, matrix) in scenarios {
                    if let Some(points) = row_series(matrix, &id, &window) {
                        found = true;
                        series.push(StreetSeries {
                            entity_id: Some(id.clone()),
                            label: format!("{} - {}", street, scenario.label()),
                            scenario,
                            points,
                        });
                    }
                }
                if !found {
                    missing_ids.push(id);
                }
            }
            if !missing_ids.is_empty() {
                log::warn!("selected streets without data: {:?}", missing_ids);
            }
        }
    }

    Ok(StreetSeriesData {
        metric: MetricDescriptor::from(query.metric.info()),
        covers_all: window.covers_all,
        window,
        mode,
        series,
        missing_ids,
    })
}
