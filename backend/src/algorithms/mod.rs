//! Pure data-shaping algorithms: pivot/align and quantile classification.

pub mod alignment;
pub mod quantiles;

pub use alignment::{align, pivot, AlignedPair, PivotedMatrix, FILL_VALUE};
pub use quantiles::{
    bucket_index, classify, color_for, quantile, LegendEntry, QuantileClassification,
    BUCKET_COUNT, COLOR_SCALE,
};
