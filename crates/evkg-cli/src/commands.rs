//! Handlers for the view commands.
//!
//! Every handler loads the event table named in the configuration, applies
//! the command-line filters, and writes its report to `out`. Artifacts land
//! in the configured output directory.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use evkg_content::EventTable;
use evkg_core::{Error, Result};
use evkg_geo::{
    GeoCache, GeocodeOptions, GeocodeReport, Geocoder, MapArtifacts, NominatimGeocoder,
    build_location_map, geocode_new_locations, resolved_coordinates, write_map_artifacts,
};
use evkg_graph::{CentralityRow, GraphArtifacts, GraphBuilder, top_centralities, write_graph_artifacts};
use evkg_timeline::{TimelineArtifacts, write_timeline_artifacts};

use crate::cli::{Command, FilterArgs};
use crate::config::EvkgConfig;
use crate::config_handlers::handle_config_command;

fn io_err(e: std::io::Error) -> Error {
    Error::io_with_path(e, "<stdout>")
}

// ============================================================================
// Dispatch
// ============================================================================

/// Runs `command` with the configuration found through `config_path`.
pub async fn run_command(
    command: Command,
    config_path: Option<&str>,
    out: &mut dyn Write,
) -> Result<()> {
    if let Command::Config { action } = command {
        return handle_config_command(config_path, action, out);
    }

    let mut config = EvkgConfig::load(config_path)?;

    match command {
        Command::Summary { filters } => cmd_summary(&config, &filters, out),
        Command::Table { out: path, filters } => {
            cmd_table(&config, &filters, &path, out).map(|_| ())
        }
        Command::Geocode { max_new, filters } => {
            if let Some(max_new) = max_new {
                config.geocoding.max_new = max_new;
            }
            let geocoder = NominatimGeocoder::new(&config.geocoding)?;
            cmd_geocode(&config, &filters, &geocoder, out).await.map(|_| ())
        }
        Command::Graph { min_weight, top, filters } => {
            if let Some(w) = min_weight {
                config.graph.min_edge_weight = w;
            }
            if let Some(n) = top {
                config.graph.top_n = n;
            }
            cmd_graph(&config, &filters, out).map(|_| ())
        }
        Command::Map { color_mode, filters } => {
            if let Some(mode) = color_mode {
                config.map.color_mode = mode;
            }
            cmd_map(&config, &filters, out).map(|_| ())
        }
        Command::Timeline { granularity, filters } => {
            if let Some(g) = granularity {
                config.timeline.granularity = g;
            }
            cmd_timeline(&config, &filters, out).map(|_| ())
        }
        Command::Build { filters } => cmd_build(&config, &filters, out),
        Command::Config { .. } => Ok(()),
    }
}

// ============================================================================
// Loading
// ============================================================================

/// Loads the configured inputs and applies `filters`.
pub fn load_table(config: &EvkgConfig, filters: &FilterArgs) -> Result<EventTable> {
    let table = EventTable::load(&config.data.events_path, &config.data.taxonomy_path)?;
    let filtered = table.filtered(&filters.to_filter());
    tracing::info!(
        loaded = table.len(),
        kept = filtered.len(),
        "Applied event filters"
    );
    Ok(filtered)
}

// ============================================================================
// Commands
// ============================================================================

/// Prints counts, date bounds, locations and event types.
pub fn cmd_summary(config: &EvkgConfig, filters: &FilterArgs, out: &mut dyn Write) -> Result<()> {
    let full = EventTable::load(&config.data.events_path, &config.data.taxonomy_path)?;
    let table = full.filtered(&filters.to_filter());
    let stats = full.stats();

    writeln!(out, "Events: {} of {} loaded", table.len(), full.len()).map_err(io_err)?;
    writeln!(
        out,
        "Dropped: {} undated, {} malformed",
        stats.dropped_undated, stats.dropped_malformed
    )
    .map_err(io_err)?;
    match table.date_bounds() {
        Some((first, last)) => writeln!(out, "Dates: {first} to {last}"),
        None => writeln!(out, "Dates: none"),
    }
    .map_err(io_err)?;
    writeln!(out, "Locations: {}", table.unique_locations().len()).map_err(io_err)?;

    let types = table.all_event_types();
    writeln!(out, "Event types ({}): {}", types.len(), types.join(", ")).map_err(io_err)?;
    Ok(())
}

/// Writes the filtered table as CSV, with coordinates from the geocache.
///
/// Returns the number of rows written.
pub fn cmd_table(
    config: &EvkgConfig,
    filters: &FilterArgs,
    path: &Path,
    out: &mut dyn Write,
) -> Result<usize> {
    let mut table = load_table(config, filters)?;
    let cache = GeoCache::load(&config.data.geocache_path);
    let located = table.attach_coordinates(|loc| cache.get(loc));

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| Error::io_with_path(e, parent))?;
        }
    }
    let file = File::create(path).map_err(|e| Error::io_with_path(e, path))?;
    table.write_csv(BufWriter::new(file))?;

    writeln!(
        out,
        "Wrote {} rows ({} with coordinates) to {}",
        table.len(),
        located,
        path.display()
    )
    .map_err(io_err)?;
    Ok(table.len())
}

/// Geocodes uncached locations of the filtered table and saves the cache.
pub async fn cmd_geocode<G>(
    config: &EvkgConfig,
    filters: &FilterArgs,
    geocoder: &G,
    out: &mut dyn Write,
) -> Result<GeocodeReport>
where
    G: Geocoder + ?Sized,
{
    let table = load_table(config, filters)?;
    let locations = table.unique_locations();
    let mut cache = GeoCache::load(&config.data.geocache_path);

    let report = geocode_new_locations(
        geocoder,
        locations.iter().map(String::as_str),
        &mut cache,
        GeocodeOptions::from(&config.geocoding),
    )
    .await;

    if report.attempted == 0 {
        writeln!(out, "No new locations to geocode; everything is already cached.")
            .map_err(io_err)?;
        return Ok(report);
    }

    cache.save(&config.data.geocache_path)?;
    writeln!(
        out,
        "Geocoded {} new locations ({} resolved, {} failed); cache holds {}",
        report.attempted,
        report.resolved,
        report.failed,
        cache.len()
    )
    .map_err(io_err)?;
    Ok(report)
}

fn write_centrality_table(rows: &[CentralityRow], out: &mut dyn Write) -> std::io::Result<()> {
    let width = rows.iter().map(|r| r.entity.chars().count()).max().unwrap_or(0).max(6);
    writeln!(
        out,
        "{:<width$}  {:>8}  {:>11}  {:>11}  {:>6}",
        "entity", "degree", "betweenness", "eigenvector", "links"
    )?;
    for row in rows {
        writeln!(
            out,
            "{:<width$}  {:>8.3}  {:>11.3}  {:>11.3}  {:>6}",
            row.entity, row.degree, row.betweenness, row.eigenvector, row.degree_raw
        )?;
    }
    Ok(())
}

/// Builds the graph, prints the centrality table and writes graph artifacts.
pub fn cmd_graph(
    config: &EvkgConfig,
    filters: &FilterArgs,
    out: &mut dyn Write,
) -> Result<(Vec<CentralityRow>, GraphArtifacts)> {
    let table = load_table(config, filters)?;
    let (graph, _stats) = GraphBuilder::new()
        .with_min_edge_weight(config.graph.min_edge_weight)
        .build(&table)?;

    let rows = top_centralities(&graph, config.graph.top_n);
    if graph.edge_count() == 0 {
        writeln!(out, "No edges remaining after filters or threshold.").map_err(io_err)?;
    } else {
        writeln!(
            out,
            "Graph: {} entities, {} links",
            graph.node_count(),
            graph.edge_count()
        )
        .map_err(io_err)?;
        write_centrality_table(&rows, out).map_err(io_err)?;
    }

    let artifacts = write_graph_artifacts(&graph, &config.graph, config.output_dir())?;
    writeln!(out, "Graph page: {}", artifacts.html.display()).map_err(io_err)?;
    Ok((rows, artifacts))
}

/// Writes map artifacts for every cached location of the filtered table.
pub fn cmd_map(config: &EvkgConfig, filters: &FilterArgs, out: &mut dyn Write) -> Result<MapArtifacts> {
    let table = load_table(config, filters)?;
    let cache = GeoCache::load(&config.data.geocache_path);
    let locations = table.unique_locations();
    let coords = resolved_coordinates(locations.iter().map(String::as_str), &cache);

    if coords.is_empty() {
        writeln!(
            out,
            "No geocoded locations found yet. Run `evkg geocode` to add coordinates."
        )
        .map_err(io_err)?;
    }

    let map = build_location_map(&table, &coords, &config.map);
    let artifacts = write_map_artifacts(&map, &config.map, config.output_dir())?;
    writeln!(
        out,
        "Map: {} of {} locations placed; page: {}",
        map.markers.len(),
        locations.len(),
        artifacts.html.display()
    )
    .map_err(io_err)?;
    Ok(artifacts)
}

/// Writes timeline artifacts for the filtered table.
pub fn cmd_timeline(
    config: &EvkgConfig,
    filters: &FilterArgs,
    out: &mut dyn Write,
) -> Result<TimelineArtifacts> {
    let table = load_table(config, filters)?;
    let artifacts = write_timeline_artifacts(&table, &config.timeline, config.output_dir())?;

    if artifacts.figures == 0 {
        writeln!(out, "No events available for selected filters.").map_err(io_err)?;
    }
    writeln!(
        out,
        "Timeline ({}): {} figures; page: {}",
        config.timeline.granularity,
        artifacts.figures,
        artifacts.html.display()
    )
    .map_err(io_err)?;
    Ok(artifacts)
}

/// Runs the graph, map and timeline commands in turn.
pub fn cmd_build(config: &EvkgConfig, filters: &FilterArgs, out: &mut dyn Write) -> Result<()> {
    cmd_graph(config, filters, out)?;
    cmd_map(config, filters, out)?;
    cmd_timeline(config, filters, out)?;
    tracing::info!(dir = %config.output_dir().display(), "All artifacts written");
    Ok(())
}
