use serde::{Deserialize, Serialize};

use crate::error::AnalysisResult;
use crate::models::{MetricDescriptor, VehicleMetric};
use crate::services::Session;

// =========================================================
// Vehicle types + route
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactedVehicle {
    pub trip_id: String,
    pub without: f64,
    pub with: f64,
    /// `with - without`, 0 when the trip is missing from the perturbed run
    pub diff: f64,
    /// e.g. `"42(s)"`
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactedVehiclesData {
    pub metric: MetricDescriptor,
    pub unit_suffix: String,
    pub vehicles: Vec<ImpactedVehicle>,
    /// Trips of the baseline run
    pub total_trips: usize,
}

pub fn get_impacted_vehicles(
    session: &Session,
    metric: VehicleMetric,
    n: usize,
) -> AnalysisResult<ImpactedVehiclesData> {
    crate::services::vehicles::most_impacted_vehicles(session, metric, n)
}
