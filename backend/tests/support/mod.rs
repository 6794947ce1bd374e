//! Shared fixtures for the integration tests.
//!
//! Writes a two-interval pair of runs as semicolon-delimited exports plus a
//! small GeoJSON network into a temporary directory.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use traffic_twin::config::{AppConfig, DataSettings};
use traffic_twin::services::Session;

pub const EDGES_WITHOUT: &str = "\
interval_id;interval_begin;interval_end;edge_id;edge_traveltime;edge_density
0_to_300;0;300;E1;10;1.5
0_to_300;0;300;E2;5;2.0
300_to_600;300;600;E1;20;1.0
300_to_600;300;600;E2;5;2.0
";

/// E1 is absent from the first interval, E4 only exists in this run.
pub const EDGES_WITH: &str = "\
interval_id;interval_begin;interval_end;edge_id;edge_traveltime;edge_density
300_to_600;300;600;E1;50;3.0
0_to_300;0;300;E2;8;2.5
300_to_600;300;600;E2;8;2.5
0_to_300;0;300;E4;2;0.5
";

pub const TRIPS_WITHOUT: &str = "\
tripinfo_id;tripinfo_duration;tripinfo_routeLength
v1;100;1000
v2;200;1500
v3;50;300
";

pub const TRIPS_WITH: &str = "\
tripinfo_id;tripinfo_duration;tripinfo_routeLength
v1;160;1200
v2;150;1500
";

pub const NETWORK: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {"type": "Feature", "geometry": {"type": "LineString", "coordinates": [[4.35, 50.84], [4.36, 50.85]]},
     "properties": {"id": "E1", "name": "Rue Royale"}},
    {"type": "Feature", "geometry": {"type": "LineString", "coordinates": [[4.36, 50.85], [4.37, 50.85]]},
     "properties": {"id": "E2", "name": "Avenue Louise", "lanes": 2}},
    {"type": "Feature", "geometry": {"type": "MultiLineString", "coordinates": [[[4.37, 50.85], [4.38, 50.86]]]},
     "properties": {"id": "E3"}}
  ]
}"#;

/// Inputs on disk plus a configuration pointing at them.
pub struct Fixture {
    pub dir: TempDir,
    pub config: AppConfig,
}

impl Fixture {
    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn session(&self) -> Session {
        Session::from_config(&self.config).expect("fixture session")
    }
}

pub fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).expect("write fixture file");
    path
}

pub fn fixture() -> Fixture {
    let dir = tempfile::tempdir().expect("tempdir");
    let root = dir.path();

    let mut config = AppConfig {
        data: DataSettings {
            edgedata_without: vec![write(root, "edgedata_without.csv", EDGES_WITHOUT)],
            edgedata_with: vec![write(root, "edgedata_with.csv", EDGES_WITH)],
            tripinfo_without: Some(write(root, "tripinfo_without.csv", TRIPS_WITHOUT)),
            tripinfo_with: Some(write(root, "tripinfo_with.csv", TRIPS_WITH)),
            road_network: write(root, "network.geojson", NETWORK),
        },
        ..Default::default()
    };
    config.analysis.closed_roads = vec!["E2".to_string()];

    Fixture { dir, config }
}
