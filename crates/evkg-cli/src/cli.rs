//! Command-line argument definitions.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use evkg_content::{EventFilter, Granularity};
use evkg_content::filter::{MAX_SENTIMENT, MIN_SENTIMENT};
use evkg_geo::ColorMode;

/// evkg: graph, map and timeline views over news-derived events
#[derive(Parser, Debug)]
#[command(name = "evkg", author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Row filters shared by the view commands.
#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct FilterArgs {
    /// Earliest event date (YYYY-MM-DD, inclusive)
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Latest event date (YYYY-MM-DD, inclusive)
    #[arg(long)]
    pub to: Option<NaiveDate>,

    /// Lowest event sentiment kept
    #[arg(long, allow_negative_numbers = true)]
    pub min_sentiment: Option<f64>,

    /// Highest event sentiment kept
    #[arg(long, allow_negative_numbers = true)]
    pub max_sentiment: Option<f64>,

    /// Keep events of this type (repeatable; any match keeps the event)
    #[arg(long = "type", value_name = "TYPE")]
    pub types: Vec<String>,

    /// Keep events naming an entity containing this text
    #[arg(long)]
    pub entity: Option<String>,
}

impl FilterArgs {
    /// Converts the flags into an [`EventFilter`].
    pub fn to_filter(&self) -> EventFilter {
        let mut filter = EventFilter::new()
            .with_dates(self.from, self.to)
            .with_sentiment(
                self.min_sentiment.unwrap_or(MIN_SENTIMENT),
                self.max_sentiment.unwrap_or(MAX_SENTIMENT),
            )
            .with_types(self.types.iter().cloned());
        if let Some(entity) = &self.entity {
            filter = filter.with_entity(entity.as_str());
        }
        filter
    }
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print event counts, date bounds and event types
    Summary {
        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Write the filtered event table as CSV
    Table {
        /// Output CSV file
        #[arg(long)]
        out: PathBuf,

        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Geocode locations missing from the cache
    Geocode {
        /// Maximum number of new locations to look up
        #[arg(long)]
        max_new: Option<usize>,

        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Build the co-occurrence graph, print centralities, write graph artifacts
    Graph {
        /// Drop edges lighter than this
        #[arg(long)]
        min_weight: Option<u32>,

        /// Rows in the centrality table
        #[arg(long)]
        top: Option<usize>,

        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Write map artifacts from cached coordinates
    Map {
        /// Marker colouring: sentiment or taxonomy
        #[arg(long)]
        color_mode: Option<ColorMode>,

        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Write timeline artifacts
    Timeline {
        /// Period size: month or week
        #[arg(long)]
        granularity: Option<Granularity>,

        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Write graph, map and timeline artifacts in one run
    Build {
        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Configuration file management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ConfigAction {
    /// Show the resolved config file path
    Path,

    /// Print a value by dotted key (e.g. graph.min_edge_weight)
    Get {
        /// Dotted key
        key: String,
    },

    /// Set a value by dotted key in the config file
    Set {
        /// Dotted key
        key: String,
        /// New value (bool, integer, float, or string)
        value: String,
    },

    /// Write a default configuration file
    Init {
        /// Target file (defaults to the platform config path)
        #[arg(long)]
        file: Option<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
