//! Simulation time intervals and the timeline built from them.
//!
//! Interval tokens come from the simulator's reporting windows and look like
//! `"0_to_300"` (or `"0_300"`). Labels render elapsed seconds as `H:MM:SS`
//! with no calendar semantics, so hours keep counting past 24.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{AnalysisError, AnalysisResult, ErrorContext};

/// Separator used by canonical interval keys.
pub const KEY_SEPARATOR: &str = "_to_";

/// Separator between the two bounds of an interval label.
pub const LABEL_SEPARATOR: &str = " to ";

/// A reporting window of the simulation, in whole seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Interval {
    pub start_seconds: u64,
    pub end_seconds: u64,
}

impl Interval {
    /// Create an interval, rejecting empty or inverted bounds.
    pub fn new(start_seconds: u64, end_seconds: u64) -> AnalysisResult<Self> {
        if end_seconds <= start_seconds {
            return Err(AnalysisError::format(
                format!(
                    "interval end {} must be greater than start {}",
                    end_seconds, start_seconds
                ),
                ErrorContext::new("interval").with_entity("interval"),
            ));
        }
        Ok(Self {
            start_seconds,
            end_seconds,
        })
    }

    /// Canonical string key, `"{start}_to_{end}"`.
    pub fn key(&self) -> String {
        format!("{}{}{}", self.start_seconds, KEY_SEPARATOR, self.end_seconds)
    }

    pub fn duration_seconds(&self) -> u64 {
        self.end_seconds - self.start_seconds
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

/// Parse an interval token of the form `<start>_to_<end>` or `<start>_<end>`.
pub fn parse_interval(token: &str) -> AnalysisResult<Interval> {
    let ctx = || {
        ErrorContext::new("parse_interval")
            .with_entity("interval")
            .with_entity_id(token)
    };
    let trimmed = token.trim();
    let parts: Vec<&str> = if trimmed.contains(KEY_SEPARATOR) {
        trimmed.split(KEY_SEPARATOR).collect()
    } else {
        trimmed.split('_').collect()
    };

    if parts.len() != 2 {
        return Err(AnalysisError::format(
            format!("expected two bounds, found {}", parts.len()),
            ctx(),
        ));
    }

    let bound = |part: &str| {
        part.trim().parse::<u64>().map_err(|e| {
            AnalysisError::format(format!("bound '{}' is not an integer: {}", part, e), ctx())
        })
    };
    let start = bound(parts[0])?;
    let end = bound(parts[1])?;

    Interval::new(start, end).map_err(|e| AnalysisError::format(e.to_string(), ctx()))
}

/// Render elapsed seconds as `H:MM:SS`.
pub fn format_hms(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    format!("{}:{:02}:{:02}", hours, minutes, secs)
}

/// Parse an `H:MM:SS` string back into elapsed seconds.
pub fn parse_hms(label: &str) -> AnalysisResult<u64> {
    let ctx = || {
        ErrorContext::new("parse_hms")
            .with_entity("time_label")
            .with_entity_id(label)
    };
    let parts: Vec<&str> = label.trim().split(':').collect();
    if parts.len() != 3 {
        return Err(AnalysisError::format("expected H:MM:SS", ctx()));
    }

    let mut fields = [0u64; 3];
    for (slot, part) in fields.iter_mut().zip(&parts) {
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AnalysisError::format(
                format!("'{}' is not a number", part),
                ctx(),
            ));
        }
        *slot = part
            .parse()
            .map_err(|e| AnalysisError::format(format!("{}", e), ctx()))?;
    }

    let [hours, minutes, secs] = fields;
    if minutes >= 60 || secs >= 60 {
        return Err(AnalysisError::format(
            "minutes and seconds must be below 60",
            ctx(),
        ));
    }
    Ok(hours * 3600 + minutes * 60 + secs)
}

/// Human-readable label for an interval, `"H:MM:SS to H:MM:SS"`.
pub fn to_label(interval: &Interval) -> String {
    format!(
        "{}{}{}",
        format_hms(interval.start_seconds),
        LABEL_SEPARATOR,
        format_hms(interval.end_seconds)
    )
}

/// Inverse of [`to_label`] given both bounds separately.
pub fn seconds_key_from_labels(label_from: &str, label_to: &str) -> AnalysisResult<String> {
    let start = parse_hms(label_from)?;
    let end = parse_hms(label_to)?;
    Ok(Interval::new(start, end)?.key())
}

/// Inverse of [`to_label`]: `"0:05:00 to 0:10:00"` becomes `"300_to_600"`.
pub fn seconds_key_from_label_range(label: &str) -> AnalysisResult<String> {
    let (from, to) = label.split_once(LABEL_SEPARATOR).ok_or_else(|| {
        AnalysisError::format(
            format!("missing '{}' separator", LABEL_SEPARATOR.trim()),
            ErrorContext::new("seconds_key_from_label_range").with_entity_id(label),
        )
    })?;
    seconds_key_from_labels(from, to)
}

/// Tokens selected by a pair of slider indices.
///
/// Indices address the timeline marks, so `from..to` picks intervals `from`
/// up to but excluding `to`. Equal indices mean the whole range.
pub fn tokens_in_range(
    from_index: usize,
    to_index: usize,
    all_tokens: &[String],
) -> AnalysisResult<Vec<String>> {
    if from_index == to_index {
        return Ok(all_tokens.to_vec());
    }
    if from_index > to_index || to_index > all_tokens.len() {
        return Err(AnalysisError::invalid_range(
            format!(
                "selection {}..{} is outside 0..={}",
                from_index,
                to_index,
                all_tokens.len()
            ),
            ErrorContext::new("tokens_in_range"),
        ));
    }
    Ok(all_tokens[from_index..to_index].to_vec())
}

/// A resolved time-range selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeWindow {
    /// Canonical interval keys in timeline order
    pub tokens: Vec<String>,
    /// Labels parallel to `tokens`
    pub labels: Vec<String>,
    /// Start of the first selected interval
    pub from_label: String,
    /// End of the last selected interval
    pub to_label: String,
    /// Whether every interval of the timeline is selected
    pub covers_all: bool,
}

/// Ordered reporting intervals of a dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    intervals: Vec<Interval>,
}

impl Timeline {
    /// Build from any set of intervals; duplicates are removed and the
    /// result is ordered by start.
    pub fn new(intervals: impl IntoIterator<Item = Interval>) -> Self {
        let mut intervals: Vec<Interval> = intervals.into_iter().collect();
        intervals.sort();
        intervals.dedup();
        Self { intervals }
    }

    /// Reporting resolution of a loaded table.
    pub fn from_table(table: &crate::models::MetricTable) -> Self {
        table.timeline()
    }

    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn tokens(&self) -> Vec<String> {
        self.intervals.iter().map(Interval::key).collect()
    }

    pub fn labels(&self) -> Vec<String> {
        self.intervals.iter().map(to_label).collect()
    }

    /// Slider marks: every interval start plus the final end.
    pub fn marks(&self) -> Vec<String> {
        let mut marks: Vec<String> = self
            .intervals
            .iter()
            .map(|i| format_hms(i.start_seconds))
            .collect();
        if let Some(last) = self.intervals.last() {
            marks.push(format_hms(last.end_seconds));
        }
        marks
    }

    /// Resolve a slider selection into a [`TimeWindow`].
    pub fn window(&self, from_index: usize, to_index: usize) -> AnalysisResult<TimeWindow> {
        let all = self.tokens();
        let tokens = tokens_in_range(from_index, to_index, &all)?;
        let selected: Vec<Interval> = if from_index == to_index {
            self.intervals.clone()
        } else {
            self.intervals[from_index..to_index].to_vec()
        };

        let first = selected
            .first()
            .map(|i| format_hms(i.start_seconds))
            .unwrap_or_default();
        let last = selected
            .last()
            .map(|i| format_hms(i.end_seconds))
            .unwrap_or_default();

        Ok(TimeWindow {
            covers_all: tokens.len() == all.len(),
            labels: selected.iter().map(to_label).collect(),
            tokens,
            from_label: first,
            to_label: last,
        })
    }
}
