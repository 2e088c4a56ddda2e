//! Per-period series and smoothing helpers.
//!
//! Every series is sorted by period and only contains periods with at least
//! one event; gaps are not filled.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use evkg_content::{EventTable, Granularity};

/// Number of events in one period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodCount {
    /// First day of the period.
    pub period: NaiveDate,
    /// Events dated within the period.
    pub events: usize,
}

/// Mean sentiment of one period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeriodSentiment {
    /// First day of the period.
    pub period: NaiveDate,
    /// Mean event sentiment.
    pub sentiment: f64,
}

/// Occurrences of one event type in one period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeCount {
    /// First day of the period.
    pub period: NaiveDate,
    /// Event type.
    pub event_type: String,
    /// Occurrences.
    pub count: usize,
}

/// Event counts per period.
pub fn frequency(table: &EventTable, granularity: Granularity) -> Vec<PeriodCount> {
    let mut counts: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for record in table {
        *counts.entry(record.period(granularity)).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|(period, events)| PeriodCount { period, events })
        .collect()
}

/// Mean sentiment per period.
pub fn avg_sentiment(table: &EventTable, granularity: Granularity) -> Vec<PeriodSentiment> {
    let mut sums: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();
    for record in table {
        let entry = sums.entry(record.period(granularity)).or_default();
        entry.0 += record.sentiment;
        entry.1 += 1;
    }
    sums.into_iter()
        .map(|(period, (sum, n))| PeriodSentiment {
            period,
            sentiment: sum / n as f64,
        })
        .collect()
}

/// The `top_k` most frequent event types, most frequent first.
///
/// Ties are broken by type name.
pub fn top_types(table: &EventTable, top_k: usize) -> Vec<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for record in table {
        for event_type in &record.event_types {
            *counts.entry(event_type.as_str()).or_default() += 1;
        }
    }
    let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ranked
        .into_iter()
        .take(top_k)
        .map(|(t, _)| t.to_string())
        .collect()
}

/// Per-period occurrences of the `top_k` most frequent event types.
///
/// Rows are ordered by period, then type name.
pub fn type_frequencies(table: &EventTable, granularity: Granularity, top_k: usize) -> Vec<TypeCount> {
    let top: HashSet<String> = top_types(table, top_k).into_iter().collect();
    let mut counts: BTreeMap<(NaiveDate, &str), usize> = BTreeMap::new();
    for record in table {
        let period = record.period(granularity);
        for event_type in &record.event_types {
            if top.contains(event_type) {
                *counts.entry((period, event_type.as_str())).or_default() += 1;
            }
        }
    }
    counts
        .into_iter()
        .map(|((period, event_type), count)| TypeCount {
            period,
            event_type: event_type.to_string(),
            count,
        })
        .collect()
}

/// Centred rolling mean with a minimum of one observation.
///
/// The window covers `window / 2` values before and `(window - 1) / 2`
/// after each position and is truncated at the edges. A window of 0 is
/// treated as 1.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    let window = window.max(1);
    let after = (window - 1) / 2;
    let before = window - 1 - after;

    (0..values.len())
        .map(|i| {
            let start = i.saturating_sub(before);
            let end = (i + after + 1).min(values.len());
            let slice = &values[start..end];
            slice.iter().sum::<f64>() / slice.len() as f64
        })
        .collect()
}

/// Indices strictly greater than both neighbours.
///
/// The first and last positions are never peaks.
pub fn local_peaks(values: &[f64]) -> Vec<usize> {
    values
        .windows(3)
        .enumerate()
        .filter(|(_, w)| w[1] > w[0] && w[1] > w[2])
        .map(|(i, _)| i + 1)
        .collect()
}
