//! The unified event table.
//!
//! One row per event with a resolvable date. Rows carry the derived columns
//! every view needs (sentiment, month/week bucket, coordinates) so the
//! graph, map and timeline crates never look at raw JSON.

use std::collections::BTreeSet;
use std::io::Write;
use std::path::Path;

use chrono::NaiveDate;
use evkg_core::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::event::{RawEvent, flatten_events};
use crate::{EventFilter, Granularity, Taxonomy};

/// Separator used for list columns in CSV export.
pub const LIST_SEPARATOR: &str = "|";

// ============================================================================
// Coordinates
// ============================================================================

/// A WGS84 latitude/longitude pair.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lon: f64,
}

impl Coordinates {
    /// Creates a coordinate pair.
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

// ============================================================================
// EventRecord
// ============================================================================

/// A cleaned event row.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Position in the table at build time.
    pub id: usize,
    /// Headline (empty when absent).
    pub title: String,
    /// Free-text location (empty when absent).
    pub location: String,
    /// Occurrence date.
    pub date: NaiveDate,
    /// First day of the occurrence month.
    pub month: NaiveDate,
    /// Monday of the occurrence week.
    pub week: NaiveDate,
    /// Entity names in document order.
    pub entity_names: Vec<String>,
    /// Entity tags in document order.
    pub entity_tags: Vec<String>,
    /// Mean taxonomy sentiment.
    pub sentiment: f64,
    /// Taxonomy labels.
    pub event_types: Vec<String>,
    /// Geocoded location, once resolved.
    pub coordinates: Option<Coordinates>,
    /// The original event object.
    #[serde(skip)]
    pub raw: Value,
}

impl EventRecord {
    /// Bucket key for the given granularity.
    pub fn period(&self, granularity: Granularity) -> NaiveDate {
        match granularity {
            Granularity::Month => self.month,
            Granularity::Week => self.week,
        }
    }

    /// Returns `true` if any of the event's types is in `types`.
    pub fn has_any_type(&self, types: &[String]) -> bool {
        self.event_types.iter().any(|t| types.contains(t))
    }
}

// ============================================================================
// BuildStats
// ============================================================================

/// Statistics from building a table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BuildStats {
    /// Events seen across all groups.
    pub events_seen: usize,
    /// Rows kept.
    pub rows: usize,
    /// Events dropped because their date did not resolve.
    pub dropped_undated: usize,
    /// Events dropped because they were not JSON objects of the expected shape.
    pub dropped_malformed: usize,
}

// ============================================================================
// EventTable
// ============================================================================

/// The flat event table.
#[derive(Clone, Debug, Default)]
pub struct EventTable {
    records: Vec<EventRecord>,
    stats: BuildStats,
}

impl EventTable {
    /// Builds a table from event groups and a taxonomy.
    ///
    /// Events whose date does not resolve are dropped, as are entries that
    /// are not JSON objects; both are counted in [`BuildStats`]. Off-type
    /// fields inside an event do not drop it.
    pub fn build(groups: Vec<Vec<Value>>, taxonomy: &Taxonomy) -> Self {
        let mut stats = BuildStats::default();
        let mut records = Vec::new();

        for raw in flatten_events(groups) {
            stats.events_seen += 1;

            if !raw.is_object() {
                log::warn!("Skipping non-object event #{}", stats.events_seen);
                stats.dropped_malformed += 1;
                continue;
            }

            let event = match RawEvent::from_value(&raw) {
                Ok(event) => event,
                Err(e) => {
                    log::warn!("Skipping malformed event #{}: {e}", stats.events_seen);
                    stats.dropped_malformed += 1;
                    continue;
                }
            };

            let Some(date) = event.date() else {
                log::debug!("Dropping undated event '{}'", event.title());
                stats.dropped_undated += 1;
                continue;
            };

            records.push(EventRecord {
                id: records.len(),
                title: event.title().to_string(),
                location: event.location().to_string(),
                date,
                month: Granularity::Month.period_start(date),
                week: Granularity::Week.period_start(date),
                entity_names: event.entity_names(),
                entity_tags: event.entity_tags(),
                sentiment: event.sentiment(taxonomy),
                event_types: event.event_types(),
                coordinates: None,
                raw,
            });
        }

        stats.rows = records.len();
        Self { records, stats }
    }

    /// Builds a table from a parsed events document.
    pub fn from_json(events: Value, taxonomy: &Taxonomy) -> Result<Self> {
        let groups: Vec<Vec<Value>> = serde_json::from_value(events).map_err(|e| {
            Error::parse(format!("Events must be an array of event arrays: {e}"))
        })?;
        Ok(Self::build(groups, taxonomy))
    }

    /// Loads both input files and builds the table.
    pub fn load(events_path: impl AsRef<Path>, taxonomy_path: impl AsRef<Path>) -> Result<Self> {
        let taxonomy = Taxonomy::load(taxonomy_path)?;
        let events_path = events_path.as_ref();
        let groups: Vec<Vec<Value>> = evkg_core::load_json(events_path)?;
        let table = Self::build(groups, &taxonomy);
        log::info!(
            "Loaded {} events from {} ({} undated, {} malformed dropped)",
            table.stats.rows,
            events_path.display(),
            table.stats.dropped_undated,
            table.stats.dropped_malformed
        );
        Ok(table)
    }

    /// Wraps existing records.
    pub fn from_records(records: Vec<EventRecord>) -> Self {
        let stats = BuildStats {
            events_seen: records.len(),
            rows: records.len(),
            ..BuildStats::default()
        };
        Self { records, stats }
    }

    /// All rows.
    pub fn records(&self) -> &[EventRecord] {
        &self.records
    }

    /// Iterates rows.
    pub fn iter(&self) -> impl Iterator<Item = &EventRecord> {
        self.records.iter()
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Build statistics.
    pub fn stats(&self) -> &BuildStats {
        &self.stats
    }

    /// Rows matching `filter`, as a new table.
    pub fn filtered(&self, filter: &EventFilter) -> Self {
        let records: Vec<EventRecord> = self
            .records
            .iter()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();
        log::debug!("{} of {} events match filters", records.len(), self.len());
        Self {
            stats: BuildStats {
                rows: records.len(),
                ..self.stats.clone()
            },
            records,
        }
    }

    /// Resolves coordinates for every row through `lookup`.
    ///
    /// Rows with an empty location, or whose location `lookup` cannot
    /// resolve, keep `None`. Returns the number of rows with coordinates.
    pub fn attach_coordinates<F>(&mut self, lookup: F) -> usize
    where
        F: Fn(&str) -> Option<Coordinates>,
    {
        let mut resolved = 0;
        for record in &mut self.records {
            record.coordinates = if record.location.is_empty() {
                None
            } else {
                lookup(&record.location)
            };
            if record.coordinates.is_some() {
                resolved += 1;
            }
        }
        resolved
    }

    /// Earliest and latest event date.
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let min = self.records.iter().map(|r| r.date).min()?;
        let max = self.records.iter().map(|r| r.date).max()?;
        Some((min, max))
    }

    /// Every event type present, sorted and de-duplicated.
    pub fn all_event_types(&self) -> Vec<String> {
        self.records
            .iter()
            .flat_map(|r| r.event_types.iter().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Every non-empty location, sorted and de-duplicated.
    pub fn unique_locations(&self) -> Vec<String> {
        self.records
            .iter()
            .filter(|r| !r.location.is_empty())
            .map(|r| r.location.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Writes the table as CSV. List columns are joined with [`LIST_SEPARATOR`].
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record([
            "id",
            "title",
            "location",
            "date",
            "month",
            "week",
            "sentiment",
            "event_types",
            "entity_names",
            "entity_tags",
            "lat",
            "lon",
        ])?;

        for r in &self.records {
            let (lat, lon) = match r.coordinates {
                Some(c) => (c.lat.to_string(), c.lon.to_string()),
                None => (String::new(), String::new()),
            };
            csv.write_record([
                r.id.to_string(),
                r.title.clone(),
                r.location.clone(),
                r.date.to_string(),
                r.month.to_string(),
                r.week.to_string(),
                r.sentiment.to_string(),
                r.event_types.join(LIST_SEPARATOR),
                r.entity_names.join(LIST_SEPARATOR),
                r.entity_tags.join(LIST_SEPARATOR),
                lat,
                lon,
            ])?;
        }

        csv.flush()
            .map_err(|e| Error::operation(format!("Failed to flush CSV output: {e}")))?;
        Ok(())
    }
}

impl<'a> IntoIterator for &'a EventTable {
    type Item = &'a EventRecord;
    type IntoIter = std::slice::Iter<'a, EventRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
