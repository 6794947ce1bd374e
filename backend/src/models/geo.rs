//! Road network geometry.
//!
//! The network is a GeoJSON-like feature collection whose features carry
//! `properties.id` (the street / edge id) and `properties.name`. Render
//! features are freshly built per query and never alias the base network.

use serde::{Deserialize, Serialize};

/// Line geometry of a street.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    LineString { coordinates: Vec<Vec<f64>> },
    MultiLineString { coordinates: Vec<Vec<Vec<f64>>> },
}

/// Static properties of a street feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureProperties {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Any other properties are carried through untouched
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A base network feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoFeature {
    #[serde(rename = "type", default = "feature_type")]
    pub kind: String,
    pub geometry: Geometry,
    pub properties: FeatureProperties,
}

fn feature_type() -> String {
    "Feature".to_string()
}

impl GeoFeature {
    pub fn new(id: impl Into<String>, name: impl Into<String>, geometry: Geometry) -> Self {
        Self {
            kind: feature_type(),
            geometry,
            properties: FeatureProperties {
                id: id.into(),
                name: name.into(),
                extra: serde_json::Map::new(),
            },
        }
    }

    pub fn id(&self) -> &str {
        &self.properties.id
    }

    pub fn name(&self) -> &str {
        &self.properties.name
    }

    /// `"{name} (id:{id})"`, or the bare id when the street is unnamed.
    pub fn display_label(&self) -> String {
        street_label(Some(self.name()), self.id())
    }
}

/// Display label for a street given an optional name.
pub fn street_label(name: Option<&str>, id: &str) -> String {
    match name {
        Some(name) if !name.is_empty() => format!("{} (id:{})", name, id),
        _ => id.to_string(),
    }
}

/// The road network.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type", default = "collection_type")]
    pub kind: String,
    #[serde(default)]
    pub features: Vec<GeoFeature>,
}

fn collection_type() -> String {
    "FeatureCollection".to_string()
}

impl FeatureCollection {
    pub fn new(features: Vec<GeoFeature>) -> Self {
        Self {
            kind: collection_type(),
            features,
        }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn find(&self, id: &str) -> Option<&GeoFeature> {
        self.features.iter().find(|f| f.id() == id)
    }
}

/// Computed properties attached to a street for one query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderProperties {
    pub id: String,
    pub name: String,
    pub metric_value: f64,
    pub bucket_index: usize,
    pub color: String,
    /// Street is one of the configured closures of the perturbed scenario
    pub closed: bool,
}

/// Base geometry plus per-query values, shaped as a GeoJSON feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderFeature {
    #[serde(rename = "type")]
    pub kind: String,
    pub geometry: Geometry,
    pub properties: RenderProperties,
}

impl RenderFeature {
    pub fn id(&self) -> &str {
        &self.properties.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NETWORK: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "geometry": {"type": "LineString", "coordinates": [[4.36, 50.82], [4.37, 50.83]]},
                "properties": {"id": "4726710#0", "name": "Rue Royale", "lanes": 2}
            },
            {
                "type": "Feature",
                "geometry": {"type": "MultiLineString", "coordinates": [[[4.36, 50.82, 0.0], [4.37, 50.83, 0.0]]]},
                "properties": {"id": "8384928"}
            }
        ]
    }"#;

    #[test]
    fn test_parse_network() {
        let network: FeatureCollection = serde_json::from_str(NETWORK).unwrap();
        assert_eq!(network.len(), 2);
        let first = network.find("4726710#0").unwrap();
        assert_eq!(first.name(), "Rue Royale");
        assert_eq!(first.properties.extra["lanes"], 2);
        assert!(matches!(
            network.features[1].geometry,
            Geometry::MultiLineString { .. }
        ));
    }

    #[test]
    fn test_display_labels() {
        let network: FeatureCollection = serde_json::from_str(NETWORK).unwrap();
        assert_eq!(
            network.features[0].display_label(),
            "Rue Royale (id:4726710#0)"
        );
        assert_eq!(network.features[1].display_label(), "8384928");
    }

    #[test]
    fn test_geometry_serializes_as_geojson() {
        let geometry = Geometry::LineString {
            coordinates: vec![vec![0.0, 1.0]],
        };
        let json = serde_json::to_value(&geometry).unwrap();
        assert_eq!(json["type"], "LineString");
    }
}
