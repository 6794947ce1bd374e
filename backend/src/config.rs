//! Configuration file support.
//!
//! Settings are read from a TOML file (`traffic_twin.toml`) and may be
//! overridden from the command line.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{AnalysisError, AnalysisResult};
use crate::services::differential::DEFAULT_TOP_N;

pub const CONFIG_FILE_NAME: &str = "traffic_twin.toml";

pub const DEFAULT_HISTOGRAM_BINS: usize = 20;

/// Full configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub data: DataSettings,
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub analysis: AnalysisSettings,
}

/// Input files of both scenarios.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataSettings {
    #[serde(default)]
    pub edgedata_without: Vec<PathBuf>,
    #[serde(default)]
    pub edgedata_with: Vec<PathBuf>,
    #[serde(default)]
    pub tripinfo_without: Option<PathBuf>,
    #[serde(default)]
    pub tripinfo_with: Option<PathBuf>,
    #[serde(default)]
    pub road_network: PathBuf,
}

impl DataSettings {
    /// Every configured input in a fixed order.
    pub fn all_paths(&self) -> Vec<PathBuf> {
        self.edgedata_without
            .iter()
            .chain(&self.edgedata_with)
            .chain(&self.tripinfo_without)
            .chain(&self.tripinfo_with)
            .chain(std::iter::once(&self.road_network))
            .cloned()
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8050
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSettings {
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    #[serde(default = "default_histogram_bins")]
    pub histogram_bins: usize,
    /// Streets closed in the perturbed scenario
    #[serde(default)]
    pub closed_roads: Vec<String>,
}

fn default_top_n() -> usize {
    DEFAULT_TOP_N
}

fn default_histogram_bins() -> usize {
    DEFAULT_HISTOGRAM_BINS
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
            histogram_bins: default_histogram_bins(),
            closed_roads: Vec::new(),
        }
    }
}

/// Values given on the command line; `None` / empty keeps the file value.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub edgedata_without: Vec<PathBuf>,
    pub edgedata_with: Vec<PathBuf>,
    pub tripinfo_without: Option<PathBuf>,
    pub tripinfo_with: Option<PathBuf>,
    pub road_network: Option<PathBuf>,
    pub host: Option<String>,
    pub port: Option<u16>,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> AnalysisResult<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            AnalysisError::configuration(format!("Failed to read config file: {}", e))
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> AnalysisResult<Self> {
        toml::from_str(content).map_err(|e| {
            AnalysisError::configuration(format!("Failed to parse config file: {}", e))
        })
    }

    /// Load from the first `traffic_twin.toml` found in `.`, `backend/`, `..`.
    ///
    /// Returns `Ok(None)` when no file exists.
    pub fn from_default_location() -> AnalysisResult<Option<Self>> {
        let search_paths = [
            PathBuf::from(CONFIG_FILE_NAME),
            PathBuf::from("backend").join(CONFIG_FILE_NAME),
            PathBuf::from("..").join(CONFIG_FILE_NAME),
        ];

        for path in search_paths {
            if path.exists() {
                log::info!("Using configuration {}", path.display());
                return Self::from_file(&path).map(Some);
            }
        }
        Ok(None)
    }

    /// Apply command-line values on top of the file.
    pub fn apply(&mut self, overrides: ConfigOverrides) {
        if !overrides.edgedata_without.is_empty() {
            self.data.edgedata_without = overrides.edgedata_without;
        }
        if !overrides.edgedata_with.is_empty() {
            self.data.edgedata_with = overrides.edgedata_with;
        }
        if overrides.tripinfo_without.is_some() {
            self.data.tripinfo_without = overrides.tripinfo_without;
        }
        if overrides.tripinfo_with.is_some() {
            self.data.tripinfo_with = overrides.tripinfo_with;
        }
        if let Some(network) = overrides.road_network {
            self.data.road_network = network;
        }
        if let Some(host) = overrides.host {
            self.server.host = host;
        }
        if let Some(port) = overrides.port {
            self.server.port = port;
        }
    }

    pub fn validate(&self) -> AnalysisResult<()> {
        if self.data.edgedata_without.is_empty() || self.data.edgedata_with.is_empty() {
            return Err(AnalysisError::configuration(
                "edge data is required for both scenarios",
            ));
        }
        if self.data.road_network.as_os_str().is_empty() {
            return Err(AnalysisError::configuration("a road network is required"));
        }
        if self.analysis.histogram_bins == 0 {
            return Err(AnalysisError::configuration(
                "analysis.histogram_bins must be positive",
            ));
        }
        Ok(())
    }
}
