//! Analysis services: the differential engine, the geometry join, the
//! selection state machine and the per-view query handlers built on them.

pub mod differential;
pub mod distributions;
pub mod geo_join;
pub mod impacted;
pub mod map;
pub mod query_tracker;
pub mod selection;
pub mod session;
pub mod street_series;
pub mod vehicles;

pub use differential::{
    column_means, difference, magnitude_transform, rank_top_n, row_means, window_difference,
    DifferenceEntry, DifferenceRecord, DisplayValue, DEFAULT_TOP_N,
};
pub use distributions::{compute_stats, histogram, street_distribution, vehicle_distribution};
pub use geo_join::{attach, filter_by_selection};
pub use impacted::impacted_streets;
pub use map::differential_map;
pub use query_tracker::{QueryKind, QueryTicket, QueryTracker};
pub use selection::{SelectionState, ViewMode};
pub use session::{Dataset, Session, StreetQuery};
pub use street_series::street_series;
pub use vehicles::most_impacted_vehicles;
