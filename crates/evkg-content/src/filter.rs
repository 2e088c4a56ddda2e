//! Row predicates shared by all views.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::EventRecord;

/// Default lower bound of the sentiment filter.
pub const MIN_SENTIMENT: f64 = -10.0;
/// Default upper bound of the sentiment filter.
pub const MAX_SENTIMENT: f64 = 10.0;

/// Conjunction of optional row predicates.
///
/// The default filter keeps every row whose sentiment lies in
/// [`MIN_SENTIMENT`, `MAX_SENTIMENT`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EventFilter {
    /// Inclusive lower date bound.
    #[serde(default)]
    pub date_from: Option<NaiveDate>,
    /// Inclusive upper date bound.
    #[serde(default)]
    pub date_to: Option<NaiveDate>,
    /// Inclusive sentiment bounds.
    #[serde(default = "default_sentiment_range")]
    pub sentiment_range: (f64, f64),
    /// Keep rows carrying at least one of these types (ignored when empty).
    #[serde(default)]
    pub event_types: Vec<String>,
    /// Case-insensitive substring matched against entity names.
    #[serde(default)]
    pub entity_query: Option<String>,
}

fn default_sentiment_range() -> (f64, f64) {
    (MIN_SENTIMENT, MAX_SENTIMENT)
}

impl Default for EventFilter {
    fn default() -> Self {
        Self {
            date_from: None,
            date_to: None,
            sentiment_range: default_sentiment_range(),
            event_types: Vec::new(),
            entity_query: None,
        }
    }
}

impl EventFilter {
    /// Creates a filter with default bounds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts to dates within `[from, to]`; either side may be open.
    pub fn with_dates(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.date_from = from;
        self.date_to = to;
        self
    }

    /// Restricts sentiment to `[min, max]`.
    pub fn with_sentiment(mut self, min: f64, max: f64) -> Self {
        self.sentiment_range = (min, max);
        self
    }

    /// Keeps rows having any of `types`.
    pub fn with_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.event_types = types.into_iter().map(Into::into).collect();
        self
    }

    /// Keeps rows with an entity whose name contains `query`.
    pub fn with_entity(mut self, query: impl Into<String>) -> Self {
        self.entity_query = Some(query.into());
        self
    }

    /// Returns `true` if `record` passes every active predicate.
    pub fn matches(&self, record: &EventRecord) -> bool {
        if self.date_from.is_some_and(|from| record.date < from) {
            return false;
        }
        if self.date_to.is_some_and(|to| record.date > to) {
            return false;
        }

        let (min, max) = self.sentiment_range;
        if record.sentiment < min || record.sentiment > max {
            return false;
        }

        if !self.event_types.is_empty() && !record.has_any_type(&self.event_types) {
            return false;
        }

        match self.normalized_query() {
            Some(q) => record
                .entity_names
                .iter()
                .any(|name| name.to_lowercase().contains(&q)),
            None => true,
        }
    }

    fn normalized_query(&self) -> Option<String> {
        self.entity_query
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_lowercase)
    }
}
