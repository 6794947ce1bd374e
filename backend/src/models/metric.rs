//! Metric catalogue.
//!
//! Every selectable indicator is described exactly once in a lookup table:
//! its source column, labels, unit, and whether it measures a duration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AnalysisError;

/// Static description of a metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricInfo {
    /// URL-friendly identifier
    pub slug: &'static str,
    /// Column name in the exported table
    pub column: &'static str,
    /// Label shown in selectors
    pub label: &'static str,
    /// Longer description used in chart titles
    pub description: &'static str,
    /// Axis label for difference charts
    pub axis_label: &'static str,
    /// Unit abbreviation
    pub unit: &'static str,
    /// Durations are additionally rendered as `H:MM:SS`
    pub duration_like: bool,
}

/// Per-street (edge) indicators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeMetric {
    TravelTime,
    Density,
    Occupancy,
    TimeLoss,
    WaitingTime,
    Speed,
    SpeedRelative,
    SampledSeconds,
}

static EDGE_METRICS: [(EdgeMetric, MetricInfo); 8] = [
    (
        EdgeMetric::TravelTime,
        MetricInfo {
            slug: "travel_time",
            column: "edge_traveltime",
            label: "Travel time (seconds)",
            description: "travel time (seconds) of the vehicles",
            axis_label: "travel time (hh:mm:ss)",
            unit: "s",
            duration_like: true,
        },
    ),
    (
        EdgeMetric::Density,
        MetricInfo {
            slug: "density",
            column: "edge_density",
            label: "Density (vehicles/kilometres)",
            description: "vehicle density (vehicles/kilometres)",
            axis_label: "density (vehicles/kilometres)",
            unit: "veh/km",
            duration_like: false,
        },
    ),
    (
        EdgeMetric::Occupancy,
        MetricInfo {
            slug: "occupancy",
            column: "edge_occupancy",
            label: "Occupancy (%)",
            description: "vehicle occupancy (%)",
            axis_label: "occupancy (%)",
            unit: "%",
            duration_like: false,
        },
    ),
    (
        EdgeMetric::TimeLoss,
        MetricInfo {
            slug: "time_loss",
            column: "edge_timeLoss",
            label: "Time loss (seconds)",
            description: "time lost by vehicles due to driving slower than the desired speed (seconds)",
            axis_label: "time loss (seconds)",
            unit: "s",
            duration_like: true,
        },
    ),
    (
        EdgeMetric::WaitingTime,
        MetricInfo {
            slug: "waiting_time",
            column: "edge_waitingTime",
            label: "Waiting time (seconds)",
            description: "waiting time (seconds) of the vehicles",
            axis_label: "waiting time (seconds)",
            unit: "s",
            duration_like: true,
        },
    ),
    (
        EdgeMetric::Speed,
        MetricInfo {
            slug: "speed",
            column: "edge_speed",
            label: "Speed (meters/seconds)",
            description: "average speed (meters/seconds) of the vehicles",
            axis_label: "speed (meters/seconds)",
            unit: "m/s",
            duration_like: false,
        },
    ),
    (
        EdgeMetric::SpeedRelative,
        MetricInfo {
            slug: "speed_relative",
            column: "edge_speedRelative",
            label: "Speed relative (average speed / speed limit)",
            description: "speed relative (average speed / speed limit) of the vehicles",
            axis_label: "speed relative (average speed / speed limit)",
            unit: "ratio",
            duration_like: false,
        },
    ),
    (
        EdgeMetric::SampledSeconds,
        MetricInfo {
            slug: "sampled_seconds",
            column: "edge_sampledSeconds",
            label: "Sampled seconds (vehicles/seconds)",
            description: "sampled seconds (vehicles/seconds) of the vehicles",
            axis_label: "sampled seconds (vehicles/seconds)",
            unit: "veh/s",
            duration_like: false,
        },
    ),
];

/// Per-vehicle (trip) indicators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleMetric {
    Duration,
    RouteLength,
    TimeLoss,
    WaitingTime,
}

static VEHICLE_METRICS: [(VehicleMetric, MetricInfo); 4] = [
    (
        VehicleMetric::Duration,
        MetricInfo {
            slug: "duration",
            column: "tripinfo_duration",
            label: "Duration (seconds)",
            description: "duration (seconds)",
            axis_label: "duration (s)",
            unit: "s",
            duration_like: true,
        },
    ),
    (
        VehicleMetric::RouteLength,
        MetricInfo {
            slug: "route_length",
            column: "tripinfo_routeLength",
            label: "Route length (meters)",
            description: "route length (meters)",
            axis_label: "route length (m)",
            unit: "m",
            duration_like: false,
        },
    ),
    (
        VehicleMetric::TimeLoss,
        MetricInfo {
            slug: "time_loss",
            column: "tripinfo_timeLoss",
            label: "Time loss (seconds)",
            description: "time loss (seconds)",
            axis_label: "time loss (s)",
            unit: "s",
            duration_like: true,
        },
    ),
    (
        VehicleMetric::WaitingTime,
        MetricInfo {
            slug: "waiting_time",
            column: "tripinfo_waitingTime",
            label: "Waiting time (seconds)",
            description: "waiting time (seconds)",
            axis_label: "waiting time (s)",
            unit: "s",
            duration_like: true,
        },
    ),
];

/// Common behaviour of the two catalogues.
pub trait Metric: Copy + Sized + 'static {
    fn catalogue() -> &'static [(Self, MetricInfo)];

    fn info(self) -> &'static MetricInfo;

    fn all() -> Vec<Self> {
        Self::catalogue().iter().map(|(m, _)| *m).collect()
    }

    /// Look up by slug, display label, or column name.
    fn lookup(name: &str) -> Result<Self, AnalysisError> {
        let needle = name.trim();
        Self::catalogue()
            .iter()
            .find(|(_, info)| {
                info.slug == needle
                    || info.column == needle
                    || info.label.eq_ignore_ascii_case(needle)
            })
            .map(|(m, _)| *m)
            .ok_or_else(|| AnalysisError::unknown_metric(needle))
    }
}

impl Metric for EdgeMetric {
    fn catalogue() -> &'static [(Self, MetricInfo)] {
        &EDGE_METRICS
    }

    fn info(self) -> &'static MetricInfo {
        // The catalogue lists every variant in declaration order.
        &EDGE_METRICS[self as usize].1
    }
}

impl Metric for VehicleMetric {
    fn catalogue() -> &'static [(Self, MetricInfo)] {
        &VEHICLE_METRICS
    }

    fn info(self) -> &'static MetricInfo {
        &VEHICLE_METRICS[self as usize].1
    }
}

impl FromStr for EdgeMetric {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::lookup(s)
    }
}

impl FromStr for VehicleMetric {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::lookup(s)
    }
}

impl fmt::Display for EdgeMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.info().label)
    }
}

impl fmt::Display for VehicleMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.info().label)
    }
}

/// Serializable view of a catalogue entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricDescriptor {
    pub slug: String,
    pub column: String,
    pub label: String,
    pub axis_label: String,
    pub unit: String,
    pub duration_like: bool,
}

impl From<&MetricInfo> for MetricDescriptor {
    fn from(info: &MetricInfo) -> Self {
        Self {
            slug: info.slug.to_string(),
            column: info.column.to_string(),
            label: info.label.to_string(),
            axis_label: info.axis_label.to_string(),
            unit: info.unit.to_string(),
            duration_like: info.duration_like,
        }
    }
}
