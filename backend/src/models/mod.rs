//! Domain types shared by the loaders, the analysis core and the API.

pub mod geo;
pub mod metric;
pub mod table;
pub mod time;

pub use geo::{FeatureCollection, GeoFeature, Geometry, RenderFeature, RenderProperties};
pub use metric::{EdgeMetric, Metric, MetricDescriptor, MetricInfo, VehicleMetric};
pub use table::{MetricRow, MetricTable, Scenario, TripRow, TripTable};
pub use time::{
    format_hms, parse_hms, parse_interval, seconds_key_from_label_range,
    seconds_key_from_labels, to_label, tokens_in_range, Interval, TimeWindow, Timeline,
};
