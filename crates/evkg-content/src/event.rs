//! Raw event records as they appear in the source JSON.
//!
//! The events document is an array of groups, each group an array of event
//! objects. Every field is optional; unknown fields are ignored here and
//! preserved in [`crate::EventRecord::raw`].
//!
//! Fields are read leniently: a field of the wrong type reads as absent, and
//! list elements of the wrong type are skipped, so one bad field never costs
//! the whole event.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::Taxonomy;

/// Day-first date format used throughout the source data.
pub const DATE_FORMAT: &str = "%d/%m/%Y";

// ============================================================================
// EventDate
// ============================================================================

/// When an event occurred.
///
/// Unknown kinds and missing fields deserialize fine and simply fail to
/// [`resolve`](EventDate::resolve).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EventDate {
    /// `"single"` or `"range"`.
    #[serde(default)]
    pub kind: Option<String>,
    /// Date of a single-day event.
    #[serde(default)]
    pub date: Option<String>,
    /// First day of a ranged event.
    #[serde(default)]
    pub start: Option<String>,
    /// Last day of a ranged event.
    #[serde(default)]
    pub end: Option<String>,
}

impl EventDate {
    /// Creates a single-day date.
    pub fn single(date: impl Into<String>) -> Self {
        Self {
            kind: Some("single".to_string()),
            date: Some(date.into()),
            ..Self::default()
        }
    }

    /// Creates a date range.
    pub fn range(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            kind: Some("range".to_string()),
            start: Some(start.into()),
            end: Some(end.into()),
            ..Self::default()
        }
    }

    /// The calendar date an event is attributed to.
    ///
    /// Single-day events use `date`; ranges use their `end`. Anything else,
    /// including an unparseable date string, yields `None`.
    pub fn resolve(&self) -> Option<NaiveDate> {
        let raw = match self.kind.as_deref() {
            Some("single") => self.date.as_deref()?,
            Some("range") => self.end.as_deref()?,
            _ => return None,
        };
        NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).ok()
    }
}

// ============================================================================
// Entity
// ============================================================================

/// A named entity mentioned by an event.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Surface name (e.g. "European Union").
    #[serde(default)]
    pub name: Option<String>,
    /// Entity tag (e.g. "ORG", "PERSON").
    #[serde(default)]
    pub tag: Option<String>,
}

impl Entity {
    /// Creates an entity with name and tag.
    pub fn new(name: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            tag: Some(tag.into()),
        }
    }
}

// ============================================================================
// RawEvent
// ============================================================================

/// One event object from the events document.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RawEvent {
    /// Headline of the event.
    #[serde(default, deserialize_with = "lenient::string")]
    pub event_title: Option<String>,
    /// Free-text location, later geocoded.
    #[serde(default, deserialize_with = "lenient::string")]
    pub event_location: Option<String>,
    /// Occurrence date under the spelling used by the source data.
    #[serde(default, deserialize_with = "lenient::date")]
    pub event_date_occured: Option<EventDate>,
    /// Occurrence date under the corrected spelling.
    #[serde(default, deserialize_with = "lenient::date")]
    pub event_date_occurred: Option<EventDate>,
    /// Entities involved.
    #[serde(default, deserialize_with = "lenient::entities")]
    pub entities: Option<Vec<Entity>>,
    /// Taxonomy labels keyed by category, in document order.
    #[serde(
        default,
        deserialize_with = "lenient::classifications",
        serialize_with = "lenient::serialize_classifications"
    )]
    pub event_classifications: Vec<(String, Vec<String>)>,
}

impl RawEvent {
    /// Parses an event from JSON.
    ///
    /// Only a value that is not a JSON object fails; off-type fields read as
    /// absent.
    pub fn from_value(value: &Value) -> evkg_core::Result<Self> {
        Ok(serde_json::from_value(value.clone())?)
    }

    /// Title, or the empty string.
    pub fn title(&self) -> &str {
        self.event_title.as_deref().unwrap_or_default()
    }

    /// Location, or the empty string.
    pub fn location(&self) -> &str {
        self.event_location.as_deref().unwrap_or_default()
    }

    /// Resolved occurrence date.
    ///
    /// The misspelt `event_date_occured` is tried first, since that is what
    /// the upstream extractor emits; `event_date_occurred` is used when the
    /// first is missing or does not resolve.
    pub fn date(&self) -> Option<NaiveDate> {
        self.event_date_occured
            .as_ref()
            .and_then(EventDate::resolve)
            .or_else(|| self.event_date_occurred.as_ref().and_then(EventDate::resolve))
    }

    /// Non-empty entity names in document order.
    pub fn entity_names(&self) -> Vec<String> {
        self.entities
            .iter()
            .flatten()
            .filter_map(|e| e.name.clone())
            .filter(|n| !n.is_empty())
            .collect()
    }

    /// Non-empty entity tags in document order.
    pub fn entity_tags(&self) -> Vec<String> {
        self.entities
            .iter()
            .flatten()
            .filter_map(|e| e.tag.clone())
            .filter(|t| !t.is_empty())
            .collect()
    }

    /// All taxonomy labels across categories.
    ///
    /// Categories and labels are visited in document order. Duplicates are
    /// kept.
    pub fn event_types(&self) -> Vec<String> {
        self.event_classifications
            .iter()
            .flat_map(|(_, labels)| labels.iter().cloned())
            .collect()
    }

    /// Mean taxonomy sentiment over every (category, label) pair.
    ///
    /// Events without classifications score 0.0.
    pub fn sentiment(&self, taxonomy: &Taxonomy) -> f64 {
        let scores: Vec<f64> = self
            .event_classifications
            .iter()
            .flat_map(|(category, labels)| {
                labels
                    .iter()
                    .map(move |label| taxonomy.sentiment(category, label))
            })
            .collect();

        if scores.is_empty() {
            0.0
        } else {
            scores.iter().sum::<f64>() / scores.len() as f64
        }
    }
}

/// Concatenate event groups in order.
pub fn flatten_events<T>(groups: Vec<Vec<T>>) -> Vec<T> {
    groups.into_iter().flatten().collect()
}

// ============================================================================
// Lenient field readers
// ============================================================================

mod lenient {
    use serde::{Deserialize, Deserializer, Serializer};
    use serde_json::{Map, Value};

    use super::{Entity, EventDate};

    /// Strings as-is, numbers and booleans in their JSON spelling.
    fn scalar(value: &Value) -> Option<String> {
        match value {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    fn field(map: &Map<String, Value>, key: &str) -> Option<String> {
        map.get(key).and_then(scalar)
    }

    pub(super) fn string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(scalar(&Value::deserialize(deserializer)?))
    }

    pub(super) fn date<'de, D>(deserializer: D) -> Result<Option<EventDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::Object(map) => Some(EventDate {
                kind: field(&map, "kind"),
                date: field(&map, "date"),
                start: field(&map, "start"),
                end: field(&map, "end"),
            }),
            _ => None,
        })
    }

    pub(super) fn entities<'de, D>(deserializer: D) -> Result<Option<Vec<Entity>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::Array(items) => Some(
                items
                    .iter()
                    .filter_map(Value::as_object)
                    .map(|obj| Entity {
                        name: field(obj, "name"),
                        tag: field(obj, "tag"),
                    })
                    .collect(),
            ),
            _ => None,
        })
    }

    /// Categories whose value is not a list are skipped, as are non-scalar
    /// labels.
    pub(super) fn classifications<'de, D>(
        deserializer: D,
    ) -> Result<Vec<(String, Vec<String>)>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let Value::Object(map) = Value::deserialize(deserializer)? else {
            return Ok(Vec::new());
        };
        Ok(map
            .into_iter()
            .filter_map(|(category, labels)| match labels {
                Value::Array(items) => {
                    Some((category, items.iter().filter_map(scalar).collect()))
                }
                _ => None,
            })
            .collect())
    }

    pub(super) fn serialize_classifications<S>(
        classifications: &[(String, Vec<String>)],
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_map(classifications.iter().map(|(category, labels)| (category, labels)))
    }
}
