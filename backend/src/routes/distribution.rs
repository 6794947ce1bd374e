use serde::{Deserialize, Serialize};

use crate::error::AnalysisResult;
use crate::models::{EdgeMetric, MetricDescriptor, TimeWindow, VehicleMetric};
use crate::services::selection::SelectionState;
use crate::services::{Session, StreetQuery};

// =========================================================
// Distribution types + routes
// =========================================================

/// Distribution statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionStats {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub sum: f64,
}

/// Histogram bin shared by both scenarios; `upper` is inclusive on the last bin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count_without: usize,
    pub count_with: usize,
}

/// Complete distribution dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionData {
    pub metric: MetricDescriptor,
    /// `None` for whole-simulation vehicle distributions
    pub window: Option<TimeWindow>,
    pub bins: Vec<HistogramBin>,
    pub without_stats: DistributionStats,
    pub with_stats: DistributionStats,
    /// Ids of the selected streets without data
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing_ids: Vec<String>,
}

pub fn get_street_distribution(
    session: &Session,
    metric: EdgeMetric,
    from_index: usize,
    to_index: usize,
    selection: &SelectionState,
    bins: usize,
) -> AnalysisResult<DistributionData> {
    crate::services::distributions::street_distribution(
        session,
        &StreetQuery::new(metric, from_index, to_index),
        selection,
        bins,
    )
}

pub fn get_vehicle_distribution(
    session: &Session,
    metric: VehicleMetric,
    bins: usize,
) -> AnalysisResult<DistributionData> {
    crate::services::distributions::vehicle_distribution(session, metric, bins)
}
