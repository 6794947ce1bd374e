use serde::{Deserialize, Serialize};

use crate::algorithms::LegendEntry;
use crate::error::AnalysisResult;
use crate::models::{EdgeMetric, MetricDescriptor, RenderFeature, TimeWindow};
use crate::services::selection::SelectionState;
use crate::services::{Session, StreetQuery};

// =========================================================
// Differential map types + route
// =========================================================

/// GeoJSON feature collection of render features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderCollection {
    #[serde(rename = "type")]
    pub kind: String,
    pub features: Vec<RenderFeature>,
}

impl RenderCollection {
    pub fn new(features: Vec<RenderFeature>) -> Self {
        Self {
            kind: "FeatureCollection".to_string(),
            features,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifferentialMapData {
    pub metric: MetricDescriptor,
    pub window: TimeWindow,
    /// `[min, p25, p45, p65, p85, max]` of the differences
    pub boundaries: [f64; 6],
    pub legend: Vec<LegendEntry>,
    pub network: RenderCollection,
    /// Selected streets only, painted with the same classification
    pub selected: RenderCollection,
    /// Streets with data in either scenario
    pub street_count: usize,
}

pub fn get_differential_map(
    session: &Session,
    metric: EdgeMetric,
    from_index: usize,
    to_index: usize,
    selection: &SelectionState,
) -> AnalysisResult<DifferentialMapData> {
    crate::services::map::differential_map(
        session,
        &StreetQuery::new(metric, from_index, to_index),
        selection,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_collection_type() {
        let json = serde_json::to_value(RenderCollection::new(vec![])).unwrap();
        assert_eq!(json["type"], "FeatureCollection");
        assert!(json["features"].as_array().unwrap().is_empty());
    }
}
