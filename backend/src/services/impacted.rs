//! Most impacted streets, or the selected ones.

use crate::error::AnalysisResult;
use crate::models::{Metric, MetricDescriptor};
use crate::routes::streets::{ImpactedStreet, ImpactedStreetsData};
use crate::services::differential::{
    magnitude_transform, rank_top_n, window_difference, DifferenceRecord,
};
use crate::services::selection::{SelectionState, ViewMode};
use crate::services::session::{Session, StreetQuery};

pub fn impacted_streets(
    session: &Session,
    query: &StreetQuery,
    selection: &SelectionState,
) -> AnalysisResult<ImpactedStreetsData> {
    let (pair, window) = session.resolve(query)?;
    let record = window_difference(pair, &window.tokens);
    let info = query.metric.info();
    let mode = selection.mode();

    let mut missing_ids = Vec::new();
    let ranked = match mode {
        ViewMode::NoSelection => {
            rank_top_n(&record, query.top_n.unwrap_or(session.settings().top_n))
        }
        ViewMode::SingleSelected | ViewMode::MultiSelected => {
            let mut selected = DifferenceRecord::new();
            for id in selection.ids() {
                match record.get(&id) {
                    Some(entry) => {
                        selected.insert(id, *entry);
                    }
                    None => missing_ids.push(id),
                }
            }
            if !missing_ids.is_empty() {
                log::warn!("selected streets without data: {:?}", missing_ids);
            }
            rank_top_n(&selected, selected.len())
        }
    };

    let streets = ranked
        .into_iter()
        .filter_map(|id| {
            let entry = record.get(&id)?;
            Some(ImpactedStreet {
                label: session.street_label(&id),
                mean_without: entry.mean_without,
                mean_with: entry.mean_with,
                difference: entry.difference,
                display: magnitude_transform(entry.difference, info),
                entity_id: id,
            })
        })
        .collect();

    Ok(ImpactedStreetsData {
        metric: MetricDescriptor::from(info),
        window,
        mode,
        streets,
        missing_ids,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EdgeMetric;
    use crate::services::fixtures::session;

    fn query() -> StreetQuery {
        StreetQuery::new(EdgeMetric::TravelTime, 0, 0)
    }

    #[test]
    fn test_top_n_without_selection() {
        let data = impacted_streets(&session(), &query(), &SelectionState::new()).unwrap();
        let ids: Vec<&str> = data.streets.iter().map(|s| s.entity_id.as_str()).collect();
        assert_eq!(ids, vec!["E1", "E2", "E4"]);
        assert_eq!(data.mode, ViewMode::NoSelection);
        assert_eq!(data.streets[0].label, "Rue Royale (id:E1)");
        assert_eq!(data.streets[0].display.label, "0:00:10");
    }

    #[test]
    fn test_selection_restricts_and_sorts() {
        let mut selection = SelectionState::new();
        selection.toggle("E3", "");
        selection.toggle("E2", "Avenue Louise");
        selection.toggle("GHOST", "");

        let data = impacted_streets(&session(), &query(), &selection).unwrap();
        let ids: Vec<&str> = data.streets.iter().map(|s| s.entity_id.as_str()).collect();
        assert_eq!(ids, vec!["E2", "E3"]);
        assert_eq!(data.missing_ids, vec!["GHOST"]);
        assert_eq!(data.mode, ViewMode::MultiSelected);
        assert_eq!(data.streets[1].difference, -1.0);
        assert_eq!(data.streets[1].display.value, 1.0);
    }

    #[test]
    fn test_sub_window() {
        // second interval only: E1 20 -> 50
        let data = impacted_streets(
            &session(),
            &StreetQuery::new(EdgeMetric::TravelTime, 1, 2),
            &SelectionState::new(),
        )
        .unwrap();
        assert_eq!(data.streets[0].entity_id, "E1");
        assert_eq!(data.streets[0].difference, 30.0);
        assert_eq!(data.window.tokens, vec!["300_to_600"]);
    }

    #[test]
    fn test_requested_ranking_length() {
        let data = impacted_streets(
            &session(),
            &query().with_top_n(Some(1)),
            &SelectionState::new(),
        )
        .unwrap();
        assert_eq!(data.streets.len(), 1);
        assert_eq!(data.streets[0].entity_id, "E1");
    }
}
