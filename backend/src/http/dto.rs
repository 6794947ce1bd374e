//! Data Transfer Objects for the HTTP API.
//!
//! Response bodies are the route DTOs re-exported from [`crate::api`]; this
//! module only adds query parameters and the health response.

use serde::{Deserialize, Serialize};

pub use crate::api::{
    DatasetSummary, DifferentialMapData, DistributionData, ImpactedStreetsData,
    ImpactedVehiclesData, MetricCatalogue, SelectionData, StreetSeriesData, TimelineData,
    ToggleRequest,
};

/// Query parameters of the street endpoints.
///
/// `from` / `to` are slider mark indices; leaving both out (or equal) selects
/// the whole simulation.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StreetQueryParams {
    /// Metric slug, label or column; defaults to the first available metric
    #[serde(default)]
    pub metric: Option<String>,
    #[serde(default)]
    pub from: Option<usize>,
    #[serde(default)]
    pub to: Option<usize>,
    /// Number of streets to rank (impacted endpoint only)
    #[serde(default)]
    pub n: Option<usize>,
    /// Histogram bin count (distribution endpoint only)
    #[serde(default)]
    pub bins: Option<usize>,
}

/// Query parameters of the vehicle endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct VehicleQueryParams {
    #[serde(default)]
    pub metric: Option<String>,
    /// Number of vehicles to rank
    #[serde(default)]
    pub n: Option<usize>,
    #[serde(default)]
    pub bins: Option<usize>,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,
    /// Version of the API
    pub version: String,
    /// Fingerprint of the loaded inputs
    pub dataset: String,
}
