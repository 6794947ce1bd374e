//! The analysis session.
//!
//! A [`Session`] is built once from the loaded inputs. It pivots and aligns
//! every available edge metric up front, so a query only recomputes means,
//! differences, classification and the geometry join.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::algorithms::AlignedPair;
use crate::config::{AnalysisSettings, AppConfig};
use crate::error::{AnalysisError, AnalysisResult, ErrorContext};
use crate::models::geo::street_label;
use crate::models::{
    EdgeMetric, FeatureCollection, Metric, MetricDescriptor, MetricTable, TimeWindow, Timeline,
    TripTable, VehicleMetric,
};
use crate::routes::summary::{DatasetSummary, MetricCatalogue, TimelineData};

/// Everything the loading layer produces.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub edges_without: MetricTable,
    pub edges_with: MetricTable,
    pub trips_without: TripTable,
    pub trips_with: TripTable,
    pub network: FeatureCollection,
    /// SHA-256 over the input files
    pub fingerprint: String,
    pub loaded_at: DateTime<Utc>,
}

/// Edge metrics whose column is present in both scenario tables, in
/// catalogue order.
pub fn available_edge_metrics(without: &MetricTable, with: &MetricTable) -> Vec<EdgeMetric> {
    EdgeMetric::all()
        .into_iter()
        .filter(|m| without.has_column(m.info().column) && with.has_column(m.info().column))
        .collect()
}

pub fn available_vehicle_metrics(without: &TripTable, with: &TripTable) -> Vec<VehicleMetric> {
    VehicleMetric::all()
        .into_iter()
        .filter(|m| without.has_column(m.info().column) && with.has_column(m.info().column))
        .collect()
}

/// Metric and time-slider selection of a street query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StreetQuery {
    pub metric: EdgeMetric,
    pub from_index: usize,
    pub to_index: usize,
    /// Ranking length override; the configured `top_n` when unset
    pub top_n: Option<usize>,
}

impl StreetQuery {
    pub fn new(metric: EdgeMetric, from_index: usize, to_index: usize) -> Self {
        Self {
            metric,
            from_index,
            to_index,
            top_n: None,
        }
    }

    pub fn with_top_n(mut self, top_n: Option<usize>) -> Self {
        self.top_n = top_n;
        self
    }
}

/// Immutable per-run analysis context.
#[derive(Debug)]
pub struct Session {
    dataset: Dataset,
    settings: AnalysisSettings,
    timeline: Timeline,
    aligned: IndexMap<EdgeMetric, AlignedPair>,
    vehicle_metrics: Vec<VehicleMetric>,
    closed_roads: HashSet<String>,
    street_names: HashMap<String, String>,
}

impl Session {
    pub fn new(dataset: Dataset, settings: AnalysisSettings) -> AnalysisResult<Self> {
        let timeline = Timeline::from_table(&dataset.edges_without);

        let mut aligned = IndexMap::new();
        for metric in available_edge_metrics(&dataset.edges_without, &dataset.edges_with) {
            let pair = AlignedPair::build(
                &dataset.edges_without,
                &dataset.edges_with,
                metric.info().column,
            )?;
            log::debug!("aligned {} as {:?}", metric.info().column, pair.without.shape());
            aligned.insert(metric, pair);
        }

        let vehicle_metrics = available_vehicle_metrics(&dataset.trips_without, &dataset.trips_with);

        let street_names = dataset
            .network
            .features
            .iter()
            .map(|f| (f.id().to_string(), f.name().to_string()))
            .collect();
        let closed_roads = settings.closed_roads.iter().cloned().collect();

        log::info!(
            "Session ready: {} intervals, {} edge metrics, {} vehicle metrics",
            timeline.len(),
            aligned.len(),
            vehicle_metrics.len()
        );

        Ok(Self {
            dataset,
            settings,
            timeline,
            aligned,
            vehicle_metrics,
            closed_roads,
            street_names,
        })
    }

    /// Load every configured input and build the session.
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        config.validate()?;
        let dataset = crate::io::load_dataset(&config.data)?;
        Ok(Self::new(dataset, config.analysis.clone())?)
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn settings(&self) -> &AnalysisSettings {
        &self.settings
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn network(&self) -> &FeatureCollection {
        &self.dataset.network
    }

    pub fn closed_roads(&self) -> &HashSet<String> {
        &self.closed_roads
    }

    pub fn window(&self, from_index: usize, to_index: usize) -> AnalysisResult<TimeWindow> {
        self.timeline.window(from_index, to_index)
    }

    /// Aligned matrices and time window of a street query.
    pub fn resolve(&self, query: &StreetQuery) -> AnalysisResult<(&AlignedPair, TimeWindow)> {
        let pair = self.aligned(query.metric)?;
        let window = self.window(query.from_index, query.to_index)?;
        Ok((pair, window))
    }

    pub fn edge_metrics(&self) -> Vec<EdgeMetric> {
        self.aligned.keys().copied().collect()
    }

    pub fn vehicle_metrics(&self) -> &[VehicleMetric] {
        &self.vehicle_metrics
    }

    /// Cached aligned matrices of `metric`.
    pub fn aligned(&self, metric: EdgeMetric) -> AnalysisResult<&AlignedPair> {
        self.aligned.get(&metric).ok_or_else(|| {
            AnalysisError::missing_column(
                metric.info().column,
                ErrorContext::new("aligned").with_entity("edge"),
            )
        })
    }

    /// Fails with `MissingColumnError` unless both trip tables carry `metric`.
    pub fn require_vehicle_metric(&self, metric: VehicleMetric) -> AnalysisResult<()> {
        if self.vehicle_metrics.contains(&metric) {
            Ok(())
        } else {
            Err(AnalysisError::missing_column(
                metric.info().column,
                ErrorContext::new("vehicle_metric").with_entity("trip"),
            ))
        }
    }

    pub fn street_name(&self, id: &str) -> Option<&str> {
        self.street_names.get(id).map(String::as_str)
    }

    /// `"{name} (id:{id})"` from the network, or the bare id.
    pub fn street_label(&self, id: &str) -> String {
        street_label(self.street_name(id), id)
    }

    pub fn timeline_data(&self) -> TimelineData {
        TimelineData {
            interval_count: self.timeline.len(),
            tokens: self.timeline.tokens(),
            labels: self.timeline.labels(),
            marks: self.timeline.marks(),
        }
    }

    pub fn metric_catalogue(&self) -> MetricCatalogue {
        MetricCatalogue {
            edge_metrics: self
                .aligned
                .keys()
                .map(|m| MetricDescriptor::from(m.info()))
                .collect(),
            vehicle_metrics: self
                .vehicle_metrics
                .iter()
                .map(|m| MetricDescriptor::from(m.info()))
                .collect(),
        }
    }

    pub fn summary(&self) -> DatasetSummary {
        let mut closed_roads: Vec<String> = self.closed_roads.iter().cloned().collect();
        closed_roads.sort();

        let street_count = self
            .aligned
            .values()
            .next()
            .map(|pair| pair.without.rows().len())
            .unwrap_or_else(|| self.dataset.edges_without.entity_count());

        DatasetSummary {
            timeline: self.timeline_data(),
            metrics: self.metric_catalogue(),
            street_count,
            feature_count: self.dataset.network.len(),
            trips_without: self.dataset.trips_without.len(),
            trips_with: self.dataset.trips_with.len(),
            closed_roads,
            fingerprint: self.dataset.fingerprint.clone(),
            loaded_at: self.dataset.loaded_at,
        }
    }
}
