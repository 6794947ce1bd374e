//! Frequency distributions of per-street window means and of trip metrics.

use std::collections::HashSet;

use crate::error::AnalysisResult;
use crate::models::{Metric, MetricDescriptor, VehicleMetric};
use crate::routes::distribution::{DistributionData, DistributionStats, HistogramBin};
use crate::services::differential::row_means;
use crate::services::selection::SelectionState;
use crate::services::session::{Session, StreetQuery};

/// Compute statistics for a set of values.
/// This is a helper function that calculates mean, median, std dev, min, max, and sum.
pub fn compute_stats(values: &[f64]) -> DistributionStats {
    if values.is_empty() {
        return DistributionStats {
            count: 0,
            mean: 0.0,
            median: 0.0,
            std_dev: 0.0,
            min: 0.0,
            max: 0.0,
            sum: 0.0,
        };
    }

    let count = values.len();
    let sum: f64 = values.iter().sum();
    let mean = sum / count as f64;

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let median = if count % 2 == 0 {
        (sorted[count / 2 - 1] + sorted[count / 2]) / 2.0
    } else {
        sorted[count / 2]
    };

    // Population standard deviation
    let variance = values
        .iter()
        .map(|v| {
            let diff = v - mean;
            diff * diff
        })
        .sum::<f64>()
        / count as f64;
    let std_dev = variance.sqrt();

    let min = sorted.first().copied().unwrap_or(0.0);
    let max = sorted.last().copied().unwrap_or(0.0);

    DistributionStats {
        count,
        mean,
        median,
        std_dev,
        min,
        max,
        sum,
    }
}

/// Bin both scenarios on shared, equally wide edges spanning their joint range.
///
/// When every value is equal a single bin of width 1 centred on it is used.
pub fn histogram(without: &[f64], with: &[f64], bins: usize) -> Vec<HistogramBin> {
    let finite = without.iter().chain(with).copied().filter(|v| v.is_finite());
    let Some((lo, hi)) = finite.fold(None, |acc: Option<(f64, f64)>, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    }) else {
        return Vec::new();
    };

    let (lo, hi, bins) = if hi > lo {
        (lo, hi, bins.max(1))
    } else {
        (lo - 0.5, hi + 0.5, 1)
    };
    let width = (hi - lo) / bins as f64;

    let mut out: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            lower: lo + width * i as f64,
            upper: if i + 1 == bins { hi } else { lo + width * (i + 1) as f64 },
            count_without: 0,
            count_with: 0,
        })
        .collect();

    let slot = |v: f64| (((v - lo) / width).floor() as usize).min(bins - 1);
    for v in without.iter().copied().filter(|v| v.is_finite()) {
        out[slot(v)].count_without += 1;
    }
    for v in with.iter().copied().filter(|v| v.is_finite()) {
        out[slot(v)].count_with += 1;
    }
    out
}

/// Distribution of per-street window means, for all streets or the selection.
pub fn street_distribution(
    session: &Session,
    query: &StreetQuery,
    selection: &SelectionState,
    bins: usize,
) -> AnalysisResult<DistributionData> {
    let (pair, window) = session.resolve(query)?;
    let without = row_means(&pair.without, &window.tokens);
    let with = row_means(&pair.with, &window.tokens);

    let (without, with, missing_ids): (Vec<f64>, Vec<f64>, Vec<String>) = if selection.is_empty() {
        (without.values().copied().collect(), with.values().copied().collect(), Vec::new())
    } else {
        let picked: HashSet<String> = selection.id_set();
        let missing = selection
            .ids()
            .into_iter()
            .filter(|id| !without.contains_key(id))
            .collect();
        let keep = |means: &indexmap::IndexMap<String, f64>| -> Vec<f64> {
            means
                .iter()
                .filter(|(id, _)| picked.contains(id.as_str()))
                .map(|(_, v)| *v)
                .collect()
        };
        (keep(&without), keep(&with), missing)
    };

    Ok(DistributionData {
        metric: MetricDescriptor::from(query.metric.info()),
        bins: histogram(&without, &with, bins),
        without_stats: compute_stats(&without),
        with_stats: compute_stats(&with),
        window: Some(window),
        missing_ids,
    })
}

/// Whole-simulation distribution of one trip metric.
pub fn vehicle_distribution(
    session: &Session,
    metric: VehicleMetric,
    bins: usize,
) -> AnalysisResult<DistributionData> {
    session.require_vehicle_metric(metric)?;
    let column = metric.info().column;
    let dataset = session.dataset();

    let values = |trips: &crate::models::TripTable| -> AnalysisResult<Vec<f64>> {
        Ok(trips.column_values(column)?.into_iter().map(|(_, v)| v).collect())
    };
    let without = values(&dataset.trips_without)?;
    let with = values(&dataset.trips_with)?;

    Ok(DistributionData {
        metric: MetricDescriptor::from(metric.info()),
        window: None,
        bins: histogram(&without, &with, bins),
        without_stats: compute_stats(&without),
        with_stats: compute_stats(&with),
        missing_ids: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalysisError;
    use crate::models::EdgeMetric;
    use crate::services::fixtures::session;

    #[test]
    fn test_compute_stats() {
        let values = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let stats = compute_stats(&values);

        assert_eq!(stats.count, 5);
        assert_eq!(stats.mean, 3.0);
        assert_eq!(stats.median, 3.0);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 5.0);
        assert_eq!(stats.sum, 15.0);
        assert!((stats.std_dev - std::f64::consts::SQRT_2).abs() < 0.001);
    }

    #[test]
    fn test_compute_stats_empty() {
        let stats = compute_stats(&[]);
        assert_eq!(stats.count, 0);
        assert_eq!(stats.mean, 0.0);
    }

    #[test]
    fn test_histogram_shared_edges() {
        let bins = histogram(&[0.0, 1.0, 2.0], &[4.0, 4.0], 4);
        assert_eq!(bins.len(), 4);
        assert_eq!(bins[0].lower, 0.0);
        assert_eq!(bins[3].upper, 4.0);
        assert_eq!(bins.iter().map(|b| b.count_without).sum::<usize>(), 3);
        // max value lands in the last bin
        assert_eq!(bins[3].count_with, 2);
    }

    #[test]
    fn test_histogram_degenerate() {
        assert!(histogram(&[], &[], 10).is_empty());
        let bins = histogram(&[3.0], &[3.0, 3.0], 10);
        assert_eq!(bins.len(), 1);
        assert_eq!(bins[0].count_without, 1);
        assert_eq!(bins[0].count_with, 2);
    }

    #[test]
    fn test_street_distribution_with_selection() {
        let mut selection = SelectionState::new();
        selection.toggle("E1", "");
        selection.toggle("E9", "");
        let data = street_distribution(
            &session(),
            &StreetQuery::new(EdgeMetric::TravelTime, 0, 0),
            &selection,
            5,
        )
        .unwrap();
        assert_eq!(data.without_stats.count, 1);
        assert_eq!(data.without_stats.mean, 15.0);
        assert_eq!(data.with_stats.mean, 25.0);
        assert_eq!(data.missing_ids, vec!["E9"]);
    }

    #[test]
    fn test_vehicle_distribution() {
        let data = vehicle_distribution(&session(), VehicleMetric::Duration, 20).unwrap();
        assert_eq!(data.without_stats.count, 3);
        assert_eq!(data.with_stats.count, 2);
        assert!(data.window.is_none());
        assert!(matches!(
            vehicle_distribution(&session(), VehicleMetric::WaitingTime, 20),
            Err(AnalysisError::MissingColumnError { .. })
        ));
    }
}
