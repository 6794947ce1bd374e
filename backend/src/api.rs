//! Public API surface of the crate.
//!
//! This file consolidates the DTO types served by the HTTP API. All types
//! derive Serialize/Deserialize for JSON serialization.

pub use crate::algorithms::LegendEntry;
pub use crate::models::{
    FeatureCollection, MetricDescriptor, RenderFeature, RenderProperties, Scenario, TimeWindow,
};
pub use crate::routes::distribution::{DistributionData, DistributionStats, HistogramBin};
pub use crate::routes::map::{DifferentialMapData, RenderCollection};
pub use crate::routes::selection::{SelectionData, ToggleRequest};
pub use crate::routes::streets::{
    ImpactedStreet, ImpactedStreetsData, SeriesPoint, StreetSeries, StreetSeriesData,
};
pub use crate::routes::summary::{DatasetSummary, MetricCatalogue, TimelineData};
pub use crate::routes::vehicles::{ImpactedVehicle, ImpactedVehiclesData};
pub use crate::services::differential::DisplayValue;
pub use crate::services::selection::ViewMode;
