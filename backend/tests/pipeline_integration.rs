//! End-to-end runs from exports on disk to dashboard views.

mod support;

use traffic_twin::error::AnalysisError;
use traffic_twin::models::{EdgeMetric, VehicleMetric};
use traffic_twin::services::{
    differential_map, impacted_streets, most_impacted_vehicles, street_distribution,
    street_series, vehicle_distribution, SelectionState, StreetQuery, ViewMode,
};

fn full_range() -> StreetQuery {
    StreetQuery::new(EdgeMetric::TravelTime, 0, 0)
}

#[test]
fn test_session_summary() {
    let fixture = support::fixture();
    let session = fixture.session();
    let summary = session.summary();

    assert_eq!(summary.timeline.tokens, vec!["0_to_300", "300_to_600"]);
    assert_eq!(summary.timeline.marks, vec!["0:00:00", "0:05:00", "0:10:00"]);
    assert_eq!(summary.street_count, 3);
    assert_eq!(summary.feature_count, 3);
    assert_eq!(summary.trips_without, 3);
    assert_eq!(summary.trips_with, 2);
    assert_eq!(summary.closed_roads, vec!["E2"]);
    assert_eq!(summary.fingerprint.len(), 64);

    let edge_slugs: Vec<&str> = summary.metrics.edge_metrics.iter().map(|m| m.slug.as_str()).collect();
    assert_eq!(edge_slugs, vec!["travel_time", "density"]);
    assert_eq!(summary.metrics.vehicle_metrics.len(), 2);
}

#[test]
fn test_zero_filled_means_over_full_range() {
    let session = support::fixture().session();
    let data = impacted_streets(&session, &full_range(), &SelectionState::new()).unwrap();

    assert_eq!(data.mode, ViewMode::NoSelection);
    let e1 = &data.streets[0];
    assert_eq!(e1.entity_id, "E1");
    assert_eq!(e1.label, "Rue Royale (id:E1)");
    assert_eq!(e1.mean_without, 15.0);
    assert_eq!(e1.mean_with, 25.0);
    assert_eq!(e1.difference, 10.0);
    assert_eq!(e1.display.label, "0:00:10");

    let ids: Vec<&str> = data.streets.iter().map(|s| s.entity_id.as_str()).collect();
    assert_eq!(ids, vec!["E1", "E2", "E4"]);
    assert_eq!(data.streets[2].label, "E4");
}

#[test]
fn test_window_restricts_intervals() {
    let session = support::fixture().session();
    let query = StreetQuery::new(EdgeMetric::TravelTime, 1, 2);
    let data = impacted_streets(&session, &query, &SelectionState::new()).unwrap();

    assert_eq!(data.window.tokens, vec!["300_to_600"]);
    assert!(!data.window.covers_all);
    let e1 = data.streets.iter().find(|s| s.entity_id == "E1").unwrap();
    assert_eq!(e1.difference, 30.0);
    let e4 = data.streets.iter().find(|s| s.entity_id == "E4").unwrap();
    assert_eq!(e4.difference, 0.0);
}

#[test]
fn test_reversed_window_is_rejected() {
    let session = support::fixture().session();
    let query = StreetQuery::new(EdgeMetric::TravelTime, 2, 1);
    let err = impacted_streets(&session, &query, &SelectionState::new()).unwrap_err();
    assert!(matches!(err, AnalysisError::InvalidRange { .. }));
}

#[test]
fn test_missing_metric_column() {
    let session = support::fixture().session();
    let query = StreetQuery::new(EdgeMetric::Speed, 0, 0);
    let err = differential_map(&session, &query, &SelectionState::new()).unwrap_err();
    assert!(matches!(err, AnalysisError::MissingColumnError { .. }));
}

#[test]
fn test_map_classifies_and_flags_closures() {
    let session = support::fixture().session();
    let data = differential_map(&session, &full_range(), &SelectionState::new()).unwrap();

    assert_eq!(data.network.features.len(), 3);
    assert_eq!(data.legend.len(), 5);
    assert!(data.boundaries.windows(2).all(|w| w[0] <= w[1]));

    let e1 = &data.network.features[0].properties;
    assert_eq!(e1.metric_value, 10.0);
    assert_eq!(e1.bucket_index, 4);
    assert_eq!(e1.color, "#822F2B");

    let e2 = &data.network.features[1].properties;
    assert!(e2.closed);

    // E3 has no data in either run
    let e3 = &data.network.features[2].properties;
    assert_eq!(e3.metric_value, 0.0);
    assert_eq!(e3.bucket_index, 0);
    assert!(data.selected.features.is_empty());
}

#[test]
fn test_selection_drives_street_views() {
    let session = support::fixture().session();
    let mut selection = SelectionState::new();
    assert_eq!(selection.toggle("E2", "Avenue Louise"), ViewMode::SingleSelected);

    let series = street_series(&session, &full_range(), &selection).unwrap();
    assert_eq!(series.series.len(), 2);
    assert_eq!(series.series[0].label, "Avenue Louise (id:E2) - Without deviations");
    assert_eq!(series.series[1].label, "Avenue Louise (id:E2) - With deviations");
    let values: Vec<f64> = series.series[1].points.iter().map(|p| p.value).collect();
    assert_eq!(values, vec![8.0, 8.0]);

    assert_eq!(selection.toggle("E3", ""), ViewMode::MultiSelected);
    let impacted = impacted_streets(&session, &full_range(), &selection).unwrap();
    assert_eq!(impacted.streets.len(), 1);
    assert_eq!(impacted.missing_ids, vec!["E3"]);

    let distribution = street_distribution(&session, &full_range(), &selection, 4).unwrap();
    assert_eq!(distribution.without_stats.count, 1);
    assert_eq!(distribution.missing_ids, vec!["E3"]);

    assert_eq!(selection.toggle("E2", ""), ViewMode::SingleSelected);
    assert_eq!(selection.toggle("E3", ""), ViewMode::NoSelection);
    let average = street_series(&session, &full_range(), &selection).unwrap();
    assert_eq!(average.series.len(), 2);
    assert!(average.series.iter().all(|s| s.entity_id.is_none()));
}

#[test]
fn test_vehicle_views() {
    let session = support::fixture().session();

    let impacted = most_impacted_vehicles(&session, VehicleMetric::Duration, 15).unwrap();
    let ids: Vec<&str> = impacted.vehicles.iter().map(|v| v.trip_id.as_str()).collect();
    assert_eq!(ids, vec!["v1", "v3", "v2"]);
    assert_eq!(impacted.vehicles[0].diff, 60.0);
    assert_eq!(impacted.vehicles[0].label, "60(s)");
    assert_eq!(impacted.vehicles[1].with, 0.0);
    assert_eq!(impacted.vehicles[1].diff, 0.0);
    assert_eq!(impacted.total_trips, 3);

    let lengths = most_impacted_vehicles(&session, VehicleMetric::RouteLength, 1).unwrap();
    assert_eq!(lengths.vehicles.len(), 1);
    assert_eq!(lengths.vehicles[0].label, "200(m)");

    let distribution = vehicle_distribution(&session, VehicleMetric::Duration, 5).unwrap();
    assert!(distribution.window.is_none());
    assert_eq!(distribution.bins.len(), 5);
    let counted: usize = distribution.bins.iter().map(|b| b.count_without).sum();
    assert_eq!(counted, 3);

    let err = most_impacted_vehicles(&session, VehicleMetric::WaitingTime, 5).unwrap_err();
    assert!(matches!(err, AnalysisError::MissingColumnError { .. }));
}
