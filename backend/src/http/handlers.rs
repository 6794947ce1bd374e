//! HTTP handlers for the REST API.
//!
//! Each handler parses its parameters, snapshots the selection when needed
//! and runs the recomputation pass on the blocking pool.

use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

use super::dto::{
    DatasetSummary, DifferentialMapData, DistributionData, HealthResponse, ImpactedStreetsData,
    ImpactedVehiclesData, MetricCatalogue, SelectionData, StreetQueryParams, StreetSeriesData,
    TimelineData, ToggleRequest, VehicleQueryParams,
};
use super::error::AppError;
use super::state::AppState;
use crate::error::AnalysisResult;
use crate::models::{EdgeMetric, FeatureCollection, Metric, VehicleMetric};
use crate::routes;
use crate::services::{QueryKind, Session};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

/// Run one recomputation pass; a result overtaken by a newer query of the
/// same kind is discarded.
async fn run_query<T, F>(state: &AppState, kind: QueryKind, query: F) -> HandlerResult<T>
where
    T: Send + 'static,
    F: FnOnce(&Session) -> AnalysisResult<T> + Send + 'static,
{
    let ticket = state.queries.begin(kind);
    let session = Arc::clone(&state.session);

    let result = match tokio::task::spawn_blocking(move || query(session.as_ref())).await {
        Ok(result) => result,
        Err(e) => {
            state.queries.fail(&ticket);
            tracing::error!("{:?} query aborted: {}", kind, e);
            return Err(AppError::Internal(format!("Task join error: {}", e)));
        }
    };

    match result {
        Ok(data) if state.queries.complete(&ticket) => Ok(Json(data)),
        Ok(_) => {
            tracing::debug!("discarding superseded {:?} query #{}", kind, ticket.seq);
            Err(AppError::Superseded(kind))
        }
        Err(e) => {
            state.queries.fail(&ticket);
            if e.is_rejected_query() {
                tracing::warn!("{:?} query rejected: {}", kind, e);
            } else {
                tracing::error!("{:?} query failed: {}", kind, e);
            }
            Err(e.into())
        }
    }
}

fn edge_metric(session: &Session, name: Option<&str>) -> Result<EdgeMetric, AppError> {
    match name {
        Some(name) => Ok(EdgeMetric::lookup(name)?),
        None => session
            .edge_metrics()
            .first()
            .copied()
            .ok_or_else(|| AppError::BadRequest("no edge metric is available".to_string())),
    }
}

fn vehicle_metric(session: &Session, name: Option<&str>) -> Result<VehicleMetric, AppError> {
    match name {
        Some(name) => Ok(VehicleMetric::lookup(name)?),
        None => session
            .vehicle_metrics()
            .first()
            .copied()
            .ok_or_else(|| AppError::BadRequest("no vehicle metric is available".to_string())),
    }
}

/// Upper bound on a client-requested histogram bin count.
pub const MAX_HISTOGRAM_BINS: usize = 1000;

fn bins(state: &AppState, requested: Option<usize>) -> Result<usize, AppError> {
    match requested {
        Some(0) => Err(AppError::BadRequest("bins must be positive".to_string())),
        Some(n) if n > MAX_HISTOGRAM_BINS => Err(AppError::BadRequest(format!(
            "bins must not exceed {}",
            MAX_HISTOGRAM_BINS
        ))),
        Some(n) => Ok(n),
        None => Ok(state.session.settings().histogram_bins),
    }
}

// =============================================================================
// Health / dataset
// =============================================================================

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        dataset: state.session.dataset().fingerprint.clone(),
    }))
}

/// GET /v1/summary
pub async fn get_summary(State(state): State<AppState>) -> HandlerResult<DatasetSummary> {
    Ok(Json(routes::summary::get_summary(&state.session)))
}

/// GET /v1/timeline
pub async fn get_timeline(State(state): State<AppState>) -> HandlerResult<TimelineData> {
    Ok(Json(routes::summary::get_timeline(&state.session)))
}

/// GET /v1/metrics
pub async fn get_metrics(State(state): State<AppState>) -> HandlerResult<MetricCatalogue> {
    Ok(Json(routes::summary::get_metrics(&state.session)))
}

/// GET /v1/network
///
/// The base road network, unmodified.
pub async fn get_network(State(state): State<AppState>) -> HandlerResult<FeatureCollection> {
    Ok(Json(state.session.network().clone()))
}

// =============================================================================
// Street views
// =============================================================================

/// GET /v1/map?metric=&from=&to=
///
/// Also returns the currently selected streets as a separate layer.
pub async fn get_map(
    State(state): State<AppState>,
    Query(params): Query<StreetQueryParams>,
) -> HandlerResult<DifferentialMapData> {
    let metric = edge_metric(&state.session, params.metric.as_deref())?;
    let (from, to) = (params.from.unwrap_or(0), params.to.unwrap_or(0));
    let selection = state.selection_snapshot();

    run_query(&state, QueryKind::Map, move |session| {
        routes::map::get_differential_map(session, metric, from, to, &selection)
    })
    .await
}

/// GET /v1/streets/impacted?metric=&from=&to=&n=
pub async fn get_impacted_streets(
    State(state): State<AppState>,
    Query(params): Query<StreetQueryParams>,
) -> HandlerResult<ImpactedStreetsData> {
    let metric = edge_metric(&state.session, params.metric.as_deref())?;
    let (from, to) = (params.from.unwrap_or(0), params.to.unwrap_or(0));
    let n = params.n;
    let selection = state.selection_snapshot();

    run_query(&state, QueryKind::ImpactedStreets, move |session| {
        routes::streets::get_impacted_streets(session, metric, from, to, n, &selection)
    })
    .await
}

/// GET /v1/streets/series?metric=&from=&to=
pub async fn get_street_series(
    State(state): State<AppState>,
    Query(params): Query<StreetQueryParams>,
) -> HandlerResult<StreetSeriesData> {
    let metric = edge_metric(&state.session, params.metric.as_deref())?;
    let (from, to) = (params.from.unwrap_or(0), params.to.unwrap_or(0));
    let selection = state.selection_snapshot();

    run_query(&state, QueryKind::StreetSeries, move |session| {
        routes::streets::get_street_series(session, metric, from, to, &selection)
    })
    .await
}

/// GET /v1/streets/distribution?metric=&from=&to=&bins=
pub async fn get_street_distribution(
    State(state): State<AppState>,
    Query(params): Query<StreetQueryParams>,
) -> HandlerResult<DistributionData> {
    let metric = edge_metric(&state.session, params.metric.as_deref())?;
    let (from, to) = (params.from.unwrap_or(0), params.to.unwrap_or(0));
    let bins = bins(&state, params.bins)?;
    let selection = state.selection_snapshot();

    run_query(&state, QueryKind::StreetDistribution, move |session| {
        routes::distribution::get_street_distribution(session, metric, from, to, &selection, bins)
    })
    .await
}

// =============================================================================
// Vehicle views
// =============================================================================

/// GET /v1/vehicles/distribution?metric=&bins=
pub async fn get_vehicle_distribution(
    State(state): State<AppState>,
    Query(params): Query<VehicleQueryParams>,
) -> HandlerResult<DistributionData> {
    let metric = vehicle_metric(&state.session, params.metric.as_deref())?;
    let bins = bins(&state, params.bins)?;

    run_query(&state, QueryKind::VehicleDistribution, move |session| {
        routes::distribution::get_vehicle_distribution(session, metric, bins)
    })
    .await
}

/// GET /v1/vehicles/impacted?metric=&n=
pub async fn get_impacted_vehicles(
    State(state): State<AppState>,
    Query(params): Query<VehicleQueryParams>,
) -> HandlerResult<ImpactedVehiclesData> {
    let metric = vehicle_metric(&state.session, params.metric.as_deref())?;
    let n = params.n.unwrap_or(state.session.settings().top_n);

    run_query(&state, QueryKind::ImpactedVehicles, move |session| {
        routes::vehicles::get_impacted_vehicles(session, metric, n)
    })
    .await
}

// =============================================================================
// Selection
// =============================================================================

/// GET /v1/selection
pub async fn get_selection(State(state): State<AppState>) -> HandlerResult<SelectionData> {
    let selection = state.selection.read();
    Ok(Json(SelectionData::from(&*selection)))
}

/// POST /v1/selection/toggle
///
/// Adds the street when absent and removes it when present.
pub async fn toggle_selection(
    State(state): State<AppState>,
    Json(request): Json<ToggleRequest>,
) -> HandlerResult<SelectionData> {
    let id = request.id.trim();
    if id.is_empty() {
        return Err(AppError::BadRequest("street id must not be empty".to_string()));
    }
    let name = request
        .name
        .or_else(|| state.session.street_name(id).map(str::to_string))
        .unwrap_or_default();

    let mut selection = state.selection.write();
    let mode = selection.toggle(id, name);
    tracing::info!("selection toggled {}: {:?} ({} selected)", id, mode, selection.len());
    Ok(Json(SelectionData::from(&*selection)))
}
