//! # Traffic Twin
//!
//! Comparative analysis core for a traffic digital twin.
//!
//! Two simulation runs of the same road network are compared: a baseline
//! ("without deviations") and a perturbed run ("with deviations") in which
//! some roads are closed. The crate loads the per-edge and per-trip exports
//! of both runs, aligns them, and answers the questions a dashboard asks:
//! which streets changed the most over a time window, how their values
//! evolve, how the distributions differ and which vehicles were hit hardest.
//!
//! ## Architecture
//!
//! - [`models`]: time intervals, metric catalogue, tables and road geometry
//! - [`algorithms`]: pivot/align of scenario tables and quantile classification
//! - [`services`]: differential engine, geometry join, selection state and
//!   the per-view computations over a loaded [`services::Session`]
//! - [`routes`]: response types and route-level entry points
//! - [`io`]: readers for the semicolon-delimited exports and the GeoJSON network
//! - [`config`]: TOML configuration with command-line overrides
//! - [`http`]: Axum-based HTTP server and request handlers
//!
//! ## Quick start
//!
//! ```no_run
//! use traffic_twin::config::AppConfig;
//! use traffic_twin::models::EdgeMetric;
//! use traffic_twin::services::{Session, StreetQuery, SelectionState};
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = AppConfig::from_file("traffic_twin.toml")?;
//! let session = Session::from_config(&config)?;
//! let query = StreetQuery::new(EdgeMetric::TravelTime, 0, 0);
//! let impacted =
//!     traffic_twin::services::impacted_streets(&session, &query, &SelectionState::new())?;
//! println!("{} streets ranked", impacted.streets.len());
//! # Ok(())
//! # }
//! ```

// Allow large error types - AnalysisError carries an ErrorContext for debugging
#![allow(clippy::result_large_err)]

pub mod algorithms;
pub mod api;
pub mod config;
pub mod error;
pub mod io;
pub mod models;
pub mod routes;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
