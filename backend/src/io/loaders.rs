use anyhow::{Context, Result};
use polars::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::DataSettings;
use crate::error::{AnalysisError, ErrorContext};
use crate::io::checksum::fingerprint_files;
use crate::models::table::{EDGE_ID_COLUMN, TRIP_ID_COLUMN};
use crate::models::{
    parse_interval, EdgeMetric, FeatureCollection, Interval, Metric, MetricTable, TripTable,
    VehicleMetric,
};
use crate::services::session::Dataset;

pub const INTERVAL_ID_COLUMN: &str = "interval_id";
pub const INTERVAL_BEGIN_COLUMN: &str = "interval_begin";
pub const INTERVAL_END_COLUMN: &str = "interval_end";

/// Read a semicolon-delimited simulator export into a DataFrame.
///
/// Id columns are forced to strings and every catalogue metric column that
/// is present is cast to Float64; unparseable cells become null.
pub fn read_export(path: &Path) -> Result<DataFrame> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .with_parse_options(CsvParseOptions::default().with_separator(b';'))
        .try_into_reader_with_file_path(Some(path.into()))
        .with_context(|| format!("Failed to open export {}", path.display()))?
        .finish()
        .with_context(|| format!("Failed to parse export {}", path.display()))?;

    let column_names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();
    let has = |name: &str| column_names.iter().any(|c| c == name);

    let mut lazy_df = df.lazy();
    for id_col in [INTERVAL_ID_COLUMN, EDGE_ID_COLUMN, TRIP_ID_COLUMN] {
        if has(id_col) {
            lazy_df = lazy_df.with_column(col(id_col).cast(DataType::String));
        }
    }

    let numeric = [INTERVAL_BEGIN_COLUMN, INTERVAL_END_COLUMN]
        .into_iter()
        .chain(EdgeMetric::catalogue().iter().map(|(_, info)| info.column))
        .chain(VehicleMetric::catalogue().iter().map(|(_, info)| info.column));
    for col_name in numeric {
        if has(col_name) {
            lazy_df = lazy_df.with_column(col(col_name).cast(DataType::Float64));
        }
    }

    lazy_df
        .collect()
        .with_context(|| format!("Failed to cast columns of {}", path.display()))
}

fn present_columns<M: Metric>(df: &DataFrame) -> Vec<String> {
    let names = df.get_column_names();
    M::catalogue()
        .iter()
        .map(|(_, info)| info.column)
        .filter(|c| names.iter().any(|n| n.as_str() == *c))
        .map(str::to_string)
        .collect()
}

fn row_interval(
    ids: Option<&StringChunked>,
    begins: Option<&Float64Chunked>,
    ends: Option<&Float64Chunked>,
    i: usize,
) -> Result<Interval> {
    if let Some(token) = ids.and_then(|c| c.get(i)) {
        if let Ok(interval) = parse_interval(token) {
            return Ok(interval);
        }
    }
    match (begins.and_then(|c| c.get(i)), ends.and_then(|c| c.get(i))) {
        (Some(begin), Some(end)) if begin >= 0.0 && end >= 0.0 => {
            Ok(Interval::new(begin.round() as u64, end.round() as u64)?)
        }
        _ => Err(AnalysisError::load(
            "row has neither a parseable interval_id nor interval_begin/interval_end",
            ErrorContext::new("row_interval").with_entity("row").with_entity_id(i),
        )
        .into()),
    }
}

/// Convert an edge export into a [`MetricTable`] over the catalogue columns it carries.
pub fn dataframe_to_metric_table(df: &DataFrame) -> Result<MetricTable> {
    let entity_ids = df
        .column(EDGE_ID_COLUMN)
        .map_err(|_| {
            AnalysisError::missing_column(EDGE_ID_COLUMN, ErrorContext::new("load_edges"))
        })?
        .str()?;
    let interval_ids = df.column(INTERVAL_ID_COLUMN).ok().and_then(|c| c.str().ok());
    let begins = df.column(INTERVAL_BEGIN_COLUMN).ok().and_then(|c| c.f64().ok());
    let ends = df.column(INTERVAL_END_COLUMN).ok().and_then(|c| c.f64().ok());

    let metric_columns = present_columns::<EdgeMetric>(df);
    let metrics = metric_columns
        .iter()
        .map(|name| Ok(df.column(name)?.f64()?))
        .collect::<Result<Vec<_>>>()?;

    let mut table = MetricTable::new(EDGE_ID_COLUMN, metric_columns.clone());
    for i in 0..df.height() {
        let Some(entity_id) = entity_ids.get(i) else {
            log::warn!("skipping edge row {} without {}", i, EDGE_ID_COLUMN);
            continue;
        };
        let interval = row_interval(interval_ids, begins, ends, i)?;
        let values = metrics.iter().map(|c| c.get(i)).collect();
        table.push_row(interval, entity_id, values)?;
    }
    Ok(table)
}

/// Convert a trip export into a [`TripTable`].
pub fn dataframe_to_trip_table(df: &DataFrame) -> Result<TripTable> {
    let trip_ids = df
        .column(TRIP_ID_COLUMN)
        .map_err(|_| {
            AnalysisError::missing_column(TRIP_ID_COLUMN, ErrorContext::new("load_trips"))
        })?
        .str()?;

    let metric_columns = present_columns::<VehicleMetric>(df);
    let metrics = metric_columns
        .iter()
        .map(|name| Ok(df.column(name)?.f64()?))
        .collect::<Result<Vec<_>>>()?;

    let mut table = TripTable::new(metric_columns.clone());
    for i in 0..df.height() {
        let Some(trip_id) = trip_ids.get(i) else {
            continue;
        };
        table.push_row(trip_id, metrics.iter().map(|c| c.get(i)).collect())?;
    }
    Ok(table)
}

/// Load and concatenate the edge exports of one scenario, sorted by
/// `(interval start, edge id)`.
pub fn load_edge_table(paths: &[PathBuf]) -> Result<MetricTable> {
    let chunks = paths
        .iter()
        .map(|path| {
            let df = read_export(path)?;
            dataframe_to_metric_table(&df)
                .with_context(|| format!("Invalid edge export {}", path.display()))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut table = MetricTable::concat(chunks)?;
    table.sort();
    Ok(table)
}

pub fn load_trip_table(path: &Path) -> Result<TripTable> {
    let df = read_export(path)?;
    dataframe_to_trip_table(&df).with_context(|| format!("Invalid trip export {}", path.display()))
}

/// Parse the GeoJSON road network.
pub fn load_network(path: &Path) -> Result<FeatureCollection> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read road network {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse road network {}", path.display()))
}

/// Load every input named by `settings`.
pub fn load_dataset(settings: &DataSettings) -> Result<Dataset> {
    log::info!(
        "Loading {} + {} edge exports",
        settings.edgedata_without.len(),
        settings.edgedata_with.len()
    );

    let edges_without = load_edge_table(&settings.edgedata_without)?;
    let edges_with = load_edge_table(&settings.edgedata_with)?;

    let trips_without = match &settings.tripinfo_without {
        Some(path) => load_trip_table(path)?,
        None => TripTable::default(),
    };
    let trips_with = match &settings.tripinfo_with {
        Some(path) => load_trip_table(path)?,
        None => TripTable::default(),
    };

    let network = load_network(&settings.road_network)?;
    let fingerprint = fingerprint_files(&settings.all_paths())?;

    log::info!(
        "Loaded {} / {} edge rows, {} / {} trips, {} network features",
        edges_without.len(),
        edges_with.len(),
        trips_without.len(),
        trips_with.len(),
        network.len()
    );

    Ok(Dataset {
        edges_without,
        edges_with,
        trips_without,
        trips_with,
        network,
        fingerprint,
        loaded_at: chrono::Utc::now(),
    })
}
