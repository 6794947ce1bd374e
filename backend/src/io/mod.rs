//! Reading the tabular simulator exports and the road network.

pub mod checksum;
pub mod loaders;

pub use checksum::{calculate_checksum, fingerprint_files};
pub use loaders::{
    dataframe_to_metric_table, dataframe_to_trip_table, load_dataset, load_edge_table,
    load_network, load_trip_table, read_export,
};
