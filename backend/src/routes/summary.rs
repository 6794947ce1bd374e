use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::MetricDescriptor;
use crate::services::Session;

// =========================================================
// Summary / timeline / metric catalogue types + routes
// =========================================================

/// Reporting intervals of the baseline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineData {
    pub interval_count: usize,
    /// Canonical `"{start}_to_{end}"` keys
    pub tokens: Vec<String>,
    /// `"H:MM:SS to H:MM:SS"` labels parallel to `tokens`
    pub labels: Vec<String>,
    /// Slider marks, one more than the interval count
    pub marks: Vec<String>,
}

/// Metrics that can be selected for the loaded data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricCatalogue {
    pub edge_metrics: Vec<MetricDescriptor>,
    pub vehicle_metrics: Vec<MetricDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub timeline: TimelineData,
    pub metrics: MetricCatalogue,
    pub street_count: usize,
    pub feature_count: usize,
    pub trips_without: usize,
    pub trips_with: usize,
    pub closed_roads: Vec<String>,
    pub fingerprint: String,
    pub loaded_at: DateTime<Utc>,
}

pub fn get_summary(session: &Session) -> DatasetSummary {
    session.summary()
}

pub fn get_timeline(session: &Session) -> TimelineData {
    session.timeline_data()
}

pub fn get_metrics(session: &Session) -> MetricCatalogue {
    session.metric_catalogue()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeline_data_serializes() {
        let data = TimelineData {
            interval_count: 1,
            tokens: vec!["0_to_300".into()],
            labels: vec!["0:00:00 to 0:05:00".into()],
            marks: vec!["0:00:00".into(), "0:05:00".into()],
        };
        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json["tokens"][0], "0_to_300");
        assert_eq!(json["marks"].as_array().unwrap().len(), 2);
    }
}
