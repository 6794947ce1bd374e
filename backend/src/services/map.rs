//! Differential map of the whole network.

use crate::algorithms::classify;
use crate::error::AnalysisResult;
use crate::models::{Metric, MetricDescriptor};
use crate::routes::map::{DifferentialMapData, RenderCollection};
use crate::services::differential::window_difference;
use crate::services::geo_join::{attach, filter_by_selection};
use crate::services::selection::SelectionState;
use crate::services::session::{Session, StreetQuery};

/// Classify the window difference of every street and paint the network.
///
/// The selected streets are also returned on their own so the detail views
/// can highlight them; the classification always covers every street.
pub fn differential_map(
    session: &Session,
    query: &StreetQuery,
    selection: &SelectionState,
) -> AnalysisResult<DifferentialMapData> {
    let (pair, window) = session.resolve(query)?;
    let record = window_difference(pair, &window.tokens);

    let differences: Vec<f64> = record.values().map(|e| e.difference).collect();
    let classification = classify(&differences);
    let features = attach(
        &session.network().features,
        &record,
        &classification,
        session.closed_roads(),
    );

    let selected = if selection.is_empty() {
        Vec::new()
    } else {
        let picked: Vec<_> = filter_by_selection(&session.network().features, &selection.id_set())
            .into_iter()
            .cloned()
            .collect();
        attach(&picked, &record, &classification, session.closed_roads())
    };

    log::debug!(
        "map {} over {} intervals: {} streets, {} features",
        query.metric.info().slug,
        window.tokens.len(),
        record.len(),
        features.len()
    );

    Ok(DifferentialMapData {
        metric: MetricDescriptor::from(query.metric.info()),
        window,
        boundaries: classification.boundaries,
        legend: classification.legend(),
        network: RenderCollection::new(features),
        selected: RenderCollection::new(selected),
        street_count: record.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalysisError;
    use crate::models::EdgeMetric;
    use crate::services::fixtures::session;

    #[test]
    fn test_map_paints_every_feature() {
        let session = session();
        let data = differential_map(&session, &StreetQuery::new(EdgeMetric::TravelTime, 0, 0), &SelectionState::new()).unwrap();

        assert_eq!(data.street_count, 4);
        assert_eq!(data.network.features.len(), 3);
        assert_eq!(data.legend.len(), 5);
        assert_eq!(data.boundaries[0], -1.0);
        assert_eq!(data.boundaries[5], 10.0);

        let e1 = &data.network.features[0].properties;
        assert_eq!(e1.id, "E1");
        assert_eq!(e1.metric_value, 10.0);
        assert_eq!(e1.bucket_index, 4);

        let unmatched = &data.network.features[2].properties;
        assert_eq!(unmatched.metric_value, 0.0);
        assert_eq!(unmatched.bucket_index, 0);
        assert!(data.window.covers_all);
    }

    #[test]
    fn test_map_flags_closed_roads() {
        let session = session();
        let data = differential_map(&session, &StreetQuery::new(EdgeMetric::TravelTime, 0, 0), &SelectionState::new()).unwrap();
        let closed: Vec<&str> = data
            .network
            .features
            .iter()
            .filter(|f| f.properties.closed)
            .map(|f| f.id())
            .collect();
        assert_eq!(closed, vec!["E2"]);
    }

    #[test]
    fn test_map_rejects_bad_window_and_metric() {
        let session = session();
        assert!(matches!(
            differential_map(&session, &StreetQuery::new(EdgeMetric::TravelTime, 2, 1), &SelectionState::new()),
            Err(AnalysisError::InvalidRange { .. })
        ));
        assert!(matches!(
            differential_map(&session, &StreetQuery::new(EdgeMetric::Occupancy, 0, 0), &SelectionState::new()),
            Err(AnalysisError::MissingColumnError { .. })
        ));
    }

    #[test]
    fn test_map_returns_selected_streets() {
        let session = session();
        let mut selection = SelectionState::new();
        selection.toggle("E1", "Rue Royale");
        selection.toggle("E9", "");

        let data = differential_map(&session, &StreetQuery::new(EdgeMetric::TravelTime, 0, 0), &selection).unwrap();
        assert_eq!(data.network.features.len(), 3);
        assert_eq!(data.selected.features.len(), 1);
        assert_eq!(data.selected.features[0].id(), "E1");
        assert_eq!(data.selected.features[0].properties.bucket_index, 4);
    }
}
