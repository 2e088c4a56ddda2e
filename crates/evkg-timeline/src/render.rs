//! Plotly figures and the timeline HTML page.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use evkg_content::EventTable;
use evkg_core::{Result, escape_html, script_json, write_artifact};

use crate::TimelineConfig;
use crate::series::{
    avg_sentiment, frequency, local_peaks, rolling_mean, top_types, type_frequencies,
};

/// File name of the figures JSON document.
pub const TIMELINE_JSON_FILE: &str = "timeline.json";
/// File name of the timeline HTML page.
pub const TIMELINE_HTML_FILE: &str = "timeline.html";

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// A Plotly figure: traces plus layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Figure {
    /// Trace objects.
    pub data: Vec<Value>,
    /// Layout object.
    pub layout: Value,
}

impl Figure {
    fn new(title: String, y_title: &str) -> Self {
        Self {
            data: Vec::new(),
            layout: json!({
                "title": { "text": title },
                "xaxis": { "title": { "text": "period" } },
                "yaxis": { "title": { "text": y_title } },
            }),
        }
    }

    /// Title text from the layout.
    pub fn title(&self) -> Option<&str> {
        self.layout["title"]["text"].as_str()
    }
}

fn x_values(periods: &[NaiveDate]) -> Vec<String> {
    periods.iter().map(|p| p.format(DATE_FORMAT).to_string()).collect()
}

/// Series line, rolling mean, and (if any) peak markers.
fn series_figure(
    title: String,
    y_title: &str,
    periods: &[NaiveDate],
    values: &[f64],
    window: usize,
    peak_symbol: &str,
) -> Figure {
    let mut figure = Figure::new(title, y_title);
    let x = x_values(periods);

    figure.data.push(json!({
        "type": "scatter",
        "mode": "lines+markers",
        "name": y_title,
        "x": x,
        "y": values,
    }));
    figure.data.push(json!({
        "type": "scatter",
        "mode": "lines",
        "name": "Rolling mean",
        "x": x,
        "y": rolling_mean(values, window),
    }));

    let peaks = local_peaks(values);
    if !peaks.is_empty() {
        figure.data.push(json!({
            "type": "scatter",
            "mode": "markers",
            "name": "Local peaks",
            "x": peaks.iter().map(|&i| x[i].clone()).collect::<Vec<_>>(),
            "y": peaks.iter().map(|&i| values[i]).collect::<Vec<_>>(),
            "marker": { "size": 10, "symbol": peak_symbol },
        }));
    }

    figure
}

/// Builds the frequency, sentiment and event-type figures.
///
/// Returns no figures for an empty table.
pub fn build_figures(table: &EventTable, config: &TimelineConfig) -> Vec<Figure> {
    if table.is_empty() {
        log::info!("No events in range; timeline has no figures");
        return Vec::new();
    }

    let g = config.granularity;

    let freq = frequency(table, g);
    let periods: Vec<NaiveDate> = freq.iter().map(|p| p.period).collect();
    let counts: Vec<f64> = freq.iter().map(|p| p.events as f64).collect();
    let fig_freq = series_figure(
        format!("Events {}", g.per_label()),
        "events",
        &periods,
        &counts,
        config.rolling_window,
        "star",
    );

    let sent = avg_sentiment(table, g);
    let periods: Vec<NaiveDate> = sent.iter().map(|p| p.period).collect();
    let means: Vec<f64> = sent.iter().map(|p| p.sentiment).collect();
    let fig_sent = series_figure(
        format!("Average Sentiment {}", g.per_label()),
        "sentiment",
        &periods,
        &means,
        config.rolling_window,
        "triangle-up",
    );

    let rows = type_frequencies(table, g, config.top_k);
    let mut fig_types = Figure::new(
        format!("Top Event Types Over Time ({})", g.adjective()),
        "count",
    );
    for event_type in top_types(table, config.top_k) {
        let (x, y): (Vec<String>, Vec<usize>) = rows
            .iter()
            .filter(|r| r.event_type == event_type)
            .map(|r| (r.period.format(DATE_FORMAT).to_string(), r.count))
            .unzip();
        fig_types.data.push(json!({
            "type": "scatter",
            "mode": "lines+markers",
            "name": event_type,
            "x": x,
            "y": y,
        }));
    }

    vec![fig_freq, fig_sent, fig_types]
}

/// Renders a standalone page with one Plotly chart per figure.
pub fn render_html(figures: &[Figure], title: &str) -> Result<String> {
    let mut output = String::new();

    output.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
    output.push_str("<meta charset=\"UTF-8\">\n");
    output.push_str(&format!("<title>{}</title>\n", escape_html(title)));
    output.push_str(&format!("<script src=\"{PLOTLY_CDN}\"></script>\n"));
    output.push_str("<style>\n");
    output.push_str("body { font-family: sans-serif; max-width: 1200px; margin: 0 auto; padding: 20px; }\n");
    output.push_str(".chart { width: 100%; height: 420px; margin-bottom: 24px; }\n");
    output.push_str("</style>\n</head>\n<body>\n");
    output.push_str(&format!("<h1>{}</h1>\n", escape_html(title)));

    if figures.is_empty() {
        output.push_str("<p>No events in the selected range.</p>\n");
    }

    for i in 0..figures.len() {
        output.push_str(&format!("<div id=\"chart-{i}\" class=\"chart\"></div>\n"));
    }

    output.push_str("<script>\n");
    output.push_str(&format!("const figures = {};\n", script_json(figures)?));
    output.push_str("figures.forEach((f, i) => Plotly.newPlot('chart-' + i, f.data, f.layout, { responsive: true }));\n");
    output.push_str("</script>\n</body>\n</html>\n");

    Ok(output)
}

/// Paths of the written timeline artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineArtifacts {
    /// Figures as JSON.
    pub json: PathBuf,
    /// Standalone HTML page.
    pub html: PathBuf,
    /// Number of figures written.
    pub figures: usize,
}

/// Writes `timeline.json` and `timeline.html` into `dir`.
pub fn write_timeline_artifacts(
    table: &EventTable,
    config: &TimelineConfig,
    dir: &Path,
) -> Result<TimelineArtifacts> {
    let figures = build_figures(table, config);

    let json = dir.join(TIMELINE_JSON_FILE);
    write_artifact(&json, serde_json::to_string_pretty(&figures)?)?;

    let html = dir.join(TIMELINE_HTML_FILE);
    write_artifact(&html, render_html(&figures, "Event Timeline")?)?;

    log::info!(
        "Wrote {} timeline figures ({}) to {}",
        figures.len(),
        config.granularity,
        dir.display()
    );

    Ok(TimelineArtifacts {
        json,
        html,
        figures: figures.len(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use evkg_content::{EventRecord, Granularity};

    fn record(m: u32, sentiment: f64, types: &[&str]) -> EventRecord {
        let date = NaiveDate::from_ymd_opt(2024, m, 10).unwrap();
        EventRecord {
            id: 0,
            title: String::new(),
            location: String::new(),
            date,
            month: Granularity::Month.period_start(date),
            week: Granularity::Week.period_start(date),
            entity_names: Vec::new(),
            entity_tags: Vec::new(),
            sentiment,
            event_types: types.iter().map(|s| s.to_string()).collect(),
            coordinates: None,
            raw: serde_json::Value::Null,
        }
    }

    fn table() -> EventTable {
        // Counts per month: 1, 3, 1. Sentiment per month: 0, 2, -1.
        EventTable::from_records(vec![
            record(1, 0.0, &["Aid"]),
            record(2, 1.0, &["Aid", "Treaty"]),
            record(2, 2.0, &["Treaty"]),
            record(2, 3.0, &[]),
            record(3, -1.0, &["Protest"]),
        ])
    }

    #[test]
    fn test_build_figures_titles() {
        let figures = build_figures(&table(), &TimelineConfig::default());
        let titles: Vec<&str> = figures.iter().filter_map(Figure::title).collect();
        assert_eq!(
            titles,
            vec![
                "Events per Month",
                "Average Sentiment per Month",
                "Top Event Types Over Time (Monthly)"
            ]
        );
    }

    #[test]
    fn test_frequency_figure_peaks() {
        let figures = build_figures(&table(), &TimelineConfig::default());
        let freq = &figures[0];

        assert_eq!(freq.data.len(), 3);
        assert_eq!(freq.data[0]["x"][1], "2024-02-01");
        assert_eq!(freq.data[1]["name"], "Rolling mean");
        assert_eq!(freq.data[2]["marker"]["symbol"], "star");
        assert_eq!(freq.data[2]["y"][0], 3.0);

        let sent = &figures[1];
        assert_eq!(sent.data[2]["marker"]["symbol"], "triangle-up");
    }

    #[test]
    fn test_no_peak_trace_without_peaks() {
        let table = EventTable::from_records(vec![record(1, 1.0, &[]), record(2, 2.0, &[])]);
        let figures = build_figures(&table, &TimelineConfig::default());
        assert_eq!(figures[0].data.len(), 2);
    }

    #[test]
    fn test_type_traces_weekly() {
        let config = TimelineConfig {
            granularity: Granularity::Week,
            top_k: 2,
            ..TimelineConfig::default()
        };
        let figures = build_figures(&table(), &config);
        let types = &figures[2];
        assert_eq!(types.title(), Some("Top Event Types Over Time (Weekly)"));
        let names: Vec<&str> = types.data.iter().filter_map(|t| t["name"].as_str()).collect();
        assert_eq!(names, vec!["Aid", "Treaty"]);
    }

    #[test]
    fn test_empty_table_has_no_figures() {
        assert!(build_figures(&EventTable::default(), &TimelineConfig::default()).is_empty());
        let html = render_html(&[], "Timeline").unwrap();
        assert!(html.contains("No events in the selected range."));
    }

    #[test]
    fn test_write_timeline_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let out = write_timeline_artifacts(&table(), &TimelineConfig::default(), dir.path()).unwrap();
        assert_eq!(out.figures, 3);

        let figures: Vec<Figure> =
            serde_json::from_str(&std::fs::read_to_string(&out.json).unwrap()).unwrap();
        assert_eq!(figures.len(), 3);
        let html = std::fs::read_to_string(&out.html).unwrap();
        assert!(html.contains("chart-2"));
        assert!(html.contains("Plotly.newPlot"));
    }
}
