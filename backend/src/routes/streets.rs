use serde::{Deserialize, Serialize};

use crate::error::AnalysisResult;
use crate::models::{EdgeMetric, MetricDescriptor, Scenario, TimeWindow};
use crate::services::differential::DisplayValue;
use crate::services::selection::{SelectionState, ViewMode};
use crate::services::{Session, StreetQuery};

// =========================================================
// Per-street types + routes
// =========================================================

/// One bar of the impacted-streets chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactedStreet {
    pub entity_id: String,
    pub label: String,
    pub mean_without: f64,
    pub mean_with: f64,
    /// Signed `with - without`
    pub difference: f64,
    pub display: DisplayValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactedStreetsData {
    pub metric: MetricDescriptor,
    pub window: TimeWindow,
    pub mode: ViewMode,
    pub streets: Vec<ImpactedStreet>,
    /// Selected ids with no data in either scenario
    pub missing_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub interval_key: String,
    pub label: String,
    pub value: f64,
}

/// One line of the time-series chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreetSeries {
    /// `None` for the all-streets average
    pub entity_id: Option<String>,
    pub label: String,
    pub scenario: Scenario,
    pub points: Vec<SeriesPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreetSeriesData {
    pub metric: MetricDescriptor,
    pub window: TimeWindow,
    pub mode: ViewMode,
    pub series: Vec<StreetSeries>,
    pub missing_ids: Vec<String>,
    pub covers_all: bool,
}

pub fn get_impacted_streets(
    session: &Session,
    metric: EdgeMetric,
    from_index: usize,
    to_index: usize,
    top_n: Option<usize>,
    selection: &SelectionState,
) -> AnalysisResult<ImpactedStreetsData> {
    crate::services::impacted::impacted_streets(
        session,
        &StreetQuery::new(metric, from_index, to_index).with_top_n(top_n),
        selection,
    )
}

pub fn get_street_series(
    session: &Session,
    metric: EdgeMetric,
    from_index: usize,
    to_index: usize,
    selection: &SelectionState,
) -> AnalysisResult<StreetSeriesData> {
    crate::services::street_series::street_series(
        session,
        &StreetQuery::new(metric, from_index, to_index),
        selection,
    )
}
