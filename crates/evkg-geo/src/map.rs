//! Per-location aggregation and Leaflet map artifacts.
//!
//! Events are grouped by their location string. Each geocoded location
//! becomes a circle marker whose colour follows either the average
//! sentiment or the dominant event type, and whose radius grows with the
//! number of events reported there.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use evkg_content::EventTable;
use evkg_core::{Result, escape_html, script_json, write_artifact};

use crate::{ColorMode, MapConfig};

/// Taxonomy labels and their marker colours, matched in this order.
pub const TAXONOMY_PALETTE: [(&str, &str); 8] = [
    ("Treaty", "#2ecc71"),
    ("Sanctions", "#e74c3c"),
    ("Protest", "#e67e22"),
    ("Attack", "#c0392b"),
    ("Negotiation", "#27ae60"),
    ("Aid", "#1abc9c"),
    ("Diplomacy", "#3498db"),
    ("Trade", "#9b59b6"),
];

/// Marker colour when no palette label matches.
pub const TAXONOMY_FALLBACK_COLOR: &str = "#95a5a6";

/// Map center used when no location has coordinates.
pub const DEFAULT_CENTER: (f64, f64) = (20.0, 0.0);

/// Number of event types listed per location.
pub const TOP_TYPES: usize = 3;

/// File name of the GeoJSON document.
pub const MAP_GEOJSON_FILE: &str = "map.geojson";
/// File name of the map HTML page.
pub const MAP_HTML_FILE: &str = "map.html";

const LEAFLET_CSS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.css";
const LEAFLET_JS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.js";
const TILE_URL: &str = "https://{s}.basemaps.cartocdn.com/light_all/{z}/{x}/{y}{r}.png";
const TILE_ATTRIBUTION: &str =
    "&copy; OpenStreetMap contributors &copy; CARTO";

// ============================================================================
// Aggregation
// ============================================================================

/// Everything reported at one location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationSummary {
    /// Location string as it appears in the events.
    pub location: String,
    /// Number of events.
    pub n_events: usize,
    /// Mean event sentiment.
    pub avg_sentiment: f64,
    /// Escaped titles of the first events, joined with `<br>`.
    pub titles_preview: String,
    /// Most frequent event types, joined with `, `.
    pub top_types: String,
}

#[derive(Default)]
struct LocationAccumulator<'a> {
    n_events: usize,
    sentiment_sum: f64,
    titles: Vec<&'a str>,
    type_counts: HashMap<&'a str, usize>,
}

/// Groups the rows of `table` by non-empty location, in location order.
pub fn aggregate_by_location(table: &EventTable, max_titles: usize) -> Vec<LocationSummary> {
    let mut groups: BTreeMap<&str, LocationAccumulator<'_>> = BTreeMap::new();

    for record in table {
        if record.location.is_empty() {
            continue;
        }
        let acc = groups.entry(record.location.as_str()).or_default();
        acc.n_events += 1;
        acc.sentiment_sum += record.sentiment;
        if acc.titles.len() < max_titles {
            acc.titles.push(record.title.as_str());
        }
        for event_type in &record.event_types {
            *acc.type_counts.entry(event_type.as_str()).or_default() += 1;
        }
    }

    groups
        .into_iter()
        .map(|(location, acc)| {
            let mut types: Vec<(&str, usize)> = acc.type_counts.into_iter().collect();
            types.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

            LocationSummary {
                location: location.to_string(),
                n_events: acc.n_events,
                avg_sentiment: acc.sentiment_sum / acc.n_events as f64,
                titles_preview: acc
                    .titles
                    .iter()
                    .map(|t| escape_html(t))
                    .collect::<Vec<_>>()
                    .join("<br>"),
                top_types: types
                    .iter()
                    .take(TOP_TYPES)
                    .map(|(t, _)| *t)
                    .collect::<Vec<_>>()
                    .join(", "),
            }
        })
        .collect()
}

// ============================================================================
// Styling
// ============================================================================

/// `green`, `red` or `gray` depending on where `avg_sentiment` falls.
pub fn sentiment_color(avg_sentiment: f64, negative_threshold: f64, positive_threshold: f64) -> &'static str {
    if avg_sentiment > positive_threshold {
        "green"
    } else if avg_sentiment < negative_threshold {
        "red"
    } else {
        "gray"
    }
}

/// Colour of the first palette label contained in `top_types`.
///
/// Matching is a case-insensitive substring test.
pub fn taxonomy_color(top_types: &str) -> &'static str {
    let haystack = top_types.to_lowercase();
    TAXONOMY_PALETTE
        .iter()
        .find(|(label, _)| haystack.contains(&label.to_lowercase()))
        .map(|(_, color)| *color)
        .unwrap_or(TAXONOMY_FALLBACK_COLOR)
}

/// Radius for a location with `n` events, scaled linearly between
/// `min_radius` and `max_radius` over the observed `[n_min, n_max]`.
pub fn marker_radius(n: usize, n_min: usize, n_max: usize, min_radius: u32, max_radius: u32) -> u32 {
    if n_max <= n_min {
        return (min_radius + max_radius) / 2;
    }
    let span = f64::from(max_radius) - f64::from(min_radius);
    let scaled = f64::from(min_radius)
        + (n.saturating_sub(n_min)) as f64 * span / (n_max - n_min) as f64;
    scaled as u32
}

/// Mean of the given coordinates, or [`DEFAULT_CENTER`] when there are none.
pub fn map_center(coords: &[(String, f64, f64)]) -> (f64, f64) {
    if coords.is_empty() {
        return DEFAULT_CENTER;
    }
    let n = coords.len() as f64;
    let lat = coords.iter().map(|c| c.1).sum::<f64>() / n;
    let lon = coords.iter().map(|c| c.2).sum::<f64>() / n;
    (lat, lon)
}

// ============================================================================
// Markers
// ============================================================================

/// A styled circle marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapMarker {
    /// Aggregated data for the location.
    #[serde(flatten)]
    pub summary: LocationSummary,
    /// Latitude.
    pub lat: f64,
    /// Longitude.
    pub lon: f64,
    /// Stroke and fill colour.
    pub color: String,
    /// Circle radius in pixels.
    pub radius: u32,
    /// Popup HTML.
    pub popup: String,
}

/// A complete location map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationMap {
    /// Initial view center as `(lat, lon)`.
    pub center: (f64, f64),
    /// Colouring used for the markers.
    pub color_mode: ColorMode,
    /// One marker per geocoded location with events.
    pub markers: Vec<MapMarker>,
}

fn popup_html(summary: &LocationSummary) -> String {
    let top_types = if summary.top_types.is_empty() {
        "n/a".to_string()
    } else {
        escape_html(&summary.top_types)
    };
    format!(
        "<b>{}</b><br>Events: {}<br>Avg sentiment: {:.2}<br>Top types: {}<br><br>{}",
        escape_html(&summary.location),
        summary.n_events,
        summary.avg_sentiment,
        top_types,
        summary.titles_preview
    )
}

/// Builds the map for `table` from the resolved `(location, lat, lon)` list.
///
/// Locations without coordinates, and coordinates without events, produce
/// no marker. Radii are scaled over every location with events.
pub fn build_location_map(
    table: &EventTable,
    coords: &[(String, f64, f64)],
    config: &MapConfig,
) -> LocationMap {
    let summaries = aggregate_by_location(table, config.max_titles);
    let n_min = summaries.iter().map(|s| s.n_events).min().unwrap_or(1);
    let n_max = summaries.iter().map(|s| s.n_events).max().unwrap_or(1);
    let by_location: HashMap<&str, &LocationSummary> =
        summaries.iter().map(|s| (s.location.as_str(), s)).collect();

    let markers = coords
        .iter()
        .filter_map(|(location, lat, lon)| {
            let summary = by_location.get(location.as_str())?;
            let color = match config.color_mode {
                ColorMode::Sentiment => sentiment_color(
                    summary.avg_sentiment,
                    config.negative_threshold,
                    config.positive_threshold,
                ),
                ColorMode::Taxonomy => taxonomy_color(&summary.top_types),
            };
            Some(MapMarker {
                summary: (*summary).clone(),
                lat: *lat,
                lon: *lon,
                color: color.to_string(),
                radius: marker_radius(
                    summary.n_events,
                    n_min,
                    n_max,
                    config.min_radius,
                    config.max_radius,
                ),
                popup: popup_html(summary),
            })
        })
        .collect();

    LocationMap {
        center: map_center(coords),
        color_mode: config.color_mode,
        markers,
    }
}

// ============================================================================
// Artifacts
// ============================================================================

/// Paths of the written map artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapArtifacts {
    /// GeoJSON feature collection.
    pub geojson: PathBuf,
    /// Standalone Leaflet page.
    pub html: PathBuf,
}

/// The markers as a GeoJSON `FeatureCollection` of points.
pub fn to_geojson(map: &LocationMap) -> Value {
    let features: Vec<Value> = map
        .markers
        .iter()
        .map(|m| {
            json!({
                "type": "Feature",
                "geometry": { "type": "Point", "coordinates": [m.lon, m.lat] },
                "properties": {
                    "location": m.summary.location,
                    "n_events": m.summary.n_events,
                    "avg_sentiment": m.summary.avg_sentiment,
                    "top_types": m.summary.top_types,
                    "titles_preview": m.summary.titles_preview,
                    "color": m.color,
                    "radius": m.radius,
                }
            })
        })
        .collect();

    json!({ "type": "FeatureCollection", "features": features })
}

fn legend_html(map: &LocationMap, config: &MapConfig) -> String {
    let swatch = |color: &str| {
        format!("<span style=\"display:inline-block;width:12px;height:12px;background:{color};margin-right:6px;\"></span>")
    };

    let mut out = String::new();
    out.push_str("<div class=\"legend\">\n");
    match map.color_mode {
        ColorMode::Sentiment => {
            let (neg, pos) = (config.negative_threshold, config.positive_threshold);
            out.push_str("<b>Legend (sentiment)</b><br>\n");
            out.push_str(&format!("{} &lt; {neg}<br>\n", swatch("red")));
            out.push_str(&format!("{} [{neg}, {pos}]<br>\n", swatch("gray")));
            out.push_str(&format!("{} &gt; {pos}<br>\n", swatch("green")));
        }
        ColorMode::Taxonomy => {
            out.push_str("<b>Legend (taxonomy)</b><br>\n");
            for (label, color) in TAXONOMY_PALETTE {
                out.push_str(&format!("{} {label}<br>\n", swatch(color)));
            }
            out.push_str(&format!("{} other<br>\n", swatch(TAXONOMY_FALLBACK_COLOR)));
        }
    }
    out.push_str("</div>\n");
    out
}

/// Renders a standalone Leaflet page for `map`.
pub fn render_html(map: &LocationMap, config: &MapConfig, title: &str) -> Result<String> {
    let markers = script_json(&map.markers)?;
    let (lat, lon) = map.center;
    let mut output = String::new();

    output.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
    output.push_str("<meta charset=\"UTF-8\">\n");
    output.push_str(&format!("<title>{}</title>\n", escape_html(title)));
    output.push_str(&format!("<link rel=\"stylesheet\" href=\"{LEAFLET_CSS}\">\n"));
    output.push_str(&format!("<script src=\"{LEAFLET_JS}\"></script>\n"));
    output.push_str("<style>\n");
    output.push_str("body { margin: 0; font-family: sans-serif; }\n");
    output.push_str("#map { width: 100%; height: 100vh; }\n");
    output.push_str(".legend { position: fixed; bottom: 25px; left: 25px; z-index: 9999; background: white; padding: 10px 12px; border-radius: 6px; box-shadow: 0 1px 4px rgba(0,0,0,0.3); font-size: 12px; }\n");
    output.push_str("</style>\n</head>\n<body>\n");
    output.push_str("<div id=\"map\"></div>\n");

    if config.legend {
        output.push_str(&legend_html(map, config));
    }

    output.push_str("<script>\n");
    output.push_str(&format!("const map = L.map('map', {{ zoomControl: true }}).setView([{lat}, {lon}], 2);\n"));
    output.push_str(&format!(
        "L.tileLayer('{TILE_URL}', {{ attribution: '{TILE_ATTRIBUTION}', subdomains: 'abcd', maxZoom: 19 }}).addTo(map);\n"
    ));
    output.push_str("L.control.scale().addTo(map);\n");
    output.push_str(&format!("const markers = {markers};\n"));
    output.push_str("markers.forEach((m) => {\n");
    output.push_str("  L.circleMarker([m.lat, m.lon], { radius: m.radius, color: m.color, fill: true, fillColor: m.color, fillOpacity: 0.85 })\n");
    output.push_str("    .bindPopup(m.popup, { maxWidth: 360 })\n");
    output.push_str("    .addTo(map);\n");
    output.push_str("});\n");
    output.push_str("</script>\n</body>\n</html>\n");

    Ok(output)
}

/// Writes `map.geojson` and `map.html` into `dir`.
pub fn write_map_artifacts(map: &LocationMap, config: &MapConfig, dir: &Path) -> Result<MapArtifacts> {
    let geojson = dir.join(MAP_GEOJSON_FILE);
    write_artifact(&geojson, serde_json::to_string_pretty(&to_geojson(map))?)?;

    let html = dir.join(MAP_HTML_FILE);
    write_artifact(&html, render_html(map, config, "Event Locations")?)?;

    log::info!(
        "Wrote map artifacts ({} markers, {} colouring) to {}",
        map.markers.len(),
        map.color_mode,
        dir.display()
    );

    Ok(MapArtifacts { geojson, html })
}
