//! Vehicles whose trips changed the most between the two runs.

use std::collections::HashMap;

use crate::error::AnalysisResult;
use crate::models::{Metric, MetricDescriptor, VehicleMetric};
use crate::routes::vehicles::{ImpactedVehicle, ImpactedVehiclesData};
use crate::services::session::Session;

pub fn unit_suffix(metric: VehicleMetric) -> &'static str {
    match metric {
        VehicleMetric::RouteLength => "(m)",
        _ => "(s)",
    }
}

/// Baseline trips left-joined with the perturbed trips by id, ranked by
/// `with - without` descending. Missing values count as 0.
pub fn most_impacted_vehicles(
    session: &Session,
    metric: VehicleMetric,
    n: usize,
) -> AnalysisResult<ImpactedVehiclesData> {
    session.require_vehicle_metric(metric)?;
    let column = metric.info().column;
    let dataset = session.dataset();

    let baseline = dataset.trips_without.column_cells(column)?;
    let perturbed: HashMap<&str, Option<f64>> =
        dataset.trips_with.column_cells(column)?.into_iter().collect();
    let suffix = unit_suffix(metric);

    let mut vehicles: Vec<ImpactedVehicle> = baseline
        .iter()
        .map(|&(trip_id, without)| {
            let with = perturbed.get(trip_id).copied().flatten();
            let diff = match (without, with) {
                (Some(x), Some(y)) => y - x,
                _ => 0.0,
            };
            ImpactedVehicle {
                trip_id: trip_id.to_string(),
                without: without.unwrap_or(0.0),
                with: with.unwrap_or(0.0),
                diff,
                label: format!("{}{}", diff, suffix),
            }
        })
        .collect();
    vehicles.sort_by(|a, b| b.diff.total_cmp(&a.diff));
    vehicles.truncate(n);

    Ok(ImpactedVehiclesData {
        metric: MetricDescriptor::from(metric.info()),
        unit_suffix: suffix.to_string(),
        vehicles,
        total_trips: baseline.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fixtures::session;

    #[test]
    fn test_left_join_and_ranking() {
        let data = most_impacted_vehicles(&session(), VehicleMetric::Duration, 15).unwrap();
        let ids: Vec<&str> = data.vehicles.iter().map(|v| v.trip_id.as_str()).collect();
        // v1 +60, v3 missing in the perturbed run -> 0, v2 -50
        assert_eq!(ids, vec!["v1", "v3", "v2"]);
        assert_eq!(data.vehicles[0].label, "60(s)");
        assert_eq!(data.vehicles[1].with, 0.0);
        assert_eq!(data.total_trips, 3);
    }

    #[test]
    fn test_route_length_suffix_and_limit() {
        let data = most_impacted_vehicles(&session(), VehicleMetric::RouteLength, 1).unwrap();
        assert_eq!(data.vehicles.len(), 1);
        assert_eq!(data.unit_suffix, "(m)");
        assert!(data.vehicles[0].label.ends_with("(m)"));
    }
}
