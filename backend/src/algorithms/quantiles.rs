//! Quantile classification of differential values into five colored buckets.

use serde::{Deserialize, Serialize};

/// Fixed color scale, least to most impacted. Paired 1:1 with the buckets.
pub const COLOR_SCALE: [&str; BUCKET_COUNT] = ["#0F9D58", "#fff757", "#fbbc09", "#E94335", "#822F2B"];

pub const BUCKET_COUNT: usize = 5;

/// Interior cut points between min and max.
pub const QUANTILE_CUTS: [f64; 4] = [0.25, 0.45, 0.65, 0.85];

/// Six non-decreasing boundaries `[min, p25, p45, p65, p85, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuantileClassification {
    pub boundaries: [f64; BUCKET_COUNT + 1],
}

/// One legend row of the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub bucket_index: usize,
    pub color: String,
    pub lower: f64,
    pub upper: f64,
    pub label: String,
}

/// Quantile `q` in `[0, 1]` of already sorted values, linear interpolation
/// between the two nearest ranks.
pub fn quantile(sorted: &[f64], q: f64) -> f64 {
    match sorted.len() {
        0 => 0.0,
        1 => sorted[0],
        n => {
            let pos = q.clamp(0.0, 1.0) * (n - 1) as f64;
            let lower = pos.floor() as usize;
            let upper = pos.ceil() as usize;
            let frac = pos - lower as f64;
            sorted[lower] + (sorted[upper] - sorted[lower]) * frac
        }
    }
}

/// Classify `values` into quantile boundaries.
///
/// NaN values are ignored. An empty input yields all-zero boundaries and
/// equal values collapse every boundary onto that value.
pub fn classify(values: &[f64]) -> QuantileClassification {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    sorted.sort_by(f64::total_cmp);

    let mut boundaries = [0.0; BUCKET_COUNT + 1];
    if let (Some(&min), Some(&max)) = (sorted.first(), sorted.last()) {
        boundaries[0] = min;
        for (slot, q) in boundaries[1..BUCKET_COUNT].iter_mut().zip(QUANTILE_CUTS) {
            *slot = quantile(&sorted, q);
        }
        boundaries[BUCKET_COUNT] = max;
    }
    QuantileClassification { boundaries }
}

/// Bucket of `value`: the highest `i` with `b[i] <= value <= b[i + 1]`.
///
/// Values below the minimum land in bucket 0, values above the maximum in
/// the last bucket. NaN maps to bucket 0.
pub fn bucket_index(value: f64, classification: &QuantileClassification) -> usize {
    let b = &classification.boundaries;
    if value.is_nan() {
        return 0;
    }
    for i in (0..BUCKET_COUNT).rev() {
        if b[i] <= value && value <= b[i + 1] {
            return i;
        }
    }
    if value > b[BUCKET_COUNT] {
        BUCKET_COUNT - 1
    } else {
        0
    }
}

pub fn color_for(bucket: usize) -> &'static str {
    COLOR_SCALE[bucket.min(BUCKET_COUNT - 1)]
}

impl QuantileClassification {
    pub fn bucket_of(&self, value: f64) -> usize {
        bucket_index(value, self)
    }

    pub fn legend(&self) -> Vec<LegendEntry> {
        (0..BUCKET_COUNT)
            .map(|i| {
                let (lower, upper) = (self.boundaries[i], self.boundaries[i + 1]);
                LegendEntry {
                    bucket_index: i,
                    color: COLOR_SCALE[i].to_string(),
                    lower,
                    upper,
                    label: format!("{:.2} - {:.2}", lower, upper),
                }
            })
            .collect()
    }
}
