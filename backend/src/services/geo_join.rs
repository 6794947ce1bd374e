//! Joins differential values onto the road network geometry.

use std::collections::{HashMap, HashSet};

use crate::algorithms::{bucket_index, color_for, QuantileClassification};
use crate::models::{GeoFeature, RenderFeature, RenderProperties};
use crate::services::differential::DifferenceRecord;

/// Build one render feature per network feature.
///
/// Features without a record get value 0.0 and bucket 0. Records without a
/// feature are not rendered. The base features are only read.
pub fn attach(
    features: &[GeoFeature],
    record: &DifferenceRecord,
    classification: &QuantileClassification,
    closed: &HashSet<String>,
) -> Vec<RenderFeature> {
    let index: HashMap<&str, f64> = record
        .iter()
        .map(|(id, entry)| (id.as_str(), entry.difference))
        .collect();

    features
        .iter()
        .map(|feature| {
            let (metric_value, bucket) = match index.get(feature.id()) {
                Some(&value) => (value, bucket_index(value, classification)),
                None => (0.0, 0),
            };
            RenderFeature {
                kind: feature.kind.clone(),
                geometry: feature.geometry.clone(),
                properties: RenderProperties {
                    id: feature.id().to_string(),
                    name: feature.name().to_string(),
                    metric_value,
                    bucket_index: bucket,
                    color: color_for(bucket).to_string(),
                    closed: closed.contains(feature.id()),
                },
            }
        })
        .collect()
}

/// Keep only the features whose id is selected; everything when nothing is.
pub fn filter_by_selection<'a>(
    features: &'a [GeoFeature],
    selected_ids: &HashSet<String>,
) -> Vec<&'a GeoFeature> {
    features
        .iter()
        .filter(|f| selected_ids.is_empty() || selected_ids.contains(f.id()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::classify;
    use crate::models::Geometry;
    use crate::services::differential::difference;
    use indexmap::IndexMap;

    fn feature(id: &str) -> GeoFeature {
        GeoFeature::new(
            id,
            format!("street {}", id),
            Geometry::LineString {
                coordinates: vec![vec![0.0, 0.0], vec![1.0, 1.0]],
            },
        )
    }

    fn record(pairs: &[(&str, f64)]) -> DifferenceRecord {
        let with: IndexMap<String, f64> = pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect();
        difference(&IndexMap::new(), &with)
    }

    #[test]
    fn test_attach_assigns_values_and_defaults() {
        let features = vec![feature("a"), feature("b"), feature("c")];
        let rec = record(&[("a", -2.0), ("b", 8.0), ("zz", 100.0)]);
        let cls = classify(&rec.values().map(|e| e.difference).collect::<Vec<_>>());
        let closed: HashSet<String> = ["b".to_string()].into_iter().collect();

        let rendered = attach(&features, &rec, &cls, &closed);
        assert_eq!(rendered.len(), 3);
        assert_eq!(rendered[0].properties.bucket_index, 0);
        assert_eq!(rendered[1].properties.metric_value, 8.0);
        assert!(rendered[1].properties.closed);
        assert_eq!(rendered[2].id(), "c");
        assert_eq!(rendered[2].properties.metric_value, 0.0);
        assert_eq!(rendered[2].properties.bucket_index, 0);
        assert_eq!(rendered[2].properties.color, "#0F9D58");
        assert!(!rendered.iter().any(|f| f.id() == "zz"));
        // source geometry untouched
        assert_eq!(features[0].properties.extra.len(), 0);
    }

    #[test]
    fn test_attach_empty_inputs() {
        let cls = classify(&[]);
        assert!(attach(&[], &DifferenceRecord::new(), &cls, &HashSet::new()).is_empty());
    }

    #[test]
    fn test_filter_by_selection() {
        let features = vec![feature("a"), feature("b")];
        assert_eq!(filter_by_selection(&features, &HashSet::new()).len(), 2);
        let picked: HashSet<String> = ["b".to_string()].into_iter().collect();
        let filtered = filter_by_selection(&features, &picked);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id(), "b");
    }
}
