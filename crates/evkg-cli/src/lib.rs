//! Command-line front end for evkg.
//!
//! The `evkg` binary wires the view crates together: it loads the event
//! table named in the configuration, applies row filters from the command
//! line, and writes graph, map and timeline artifacts.
//!
//! # Modules
//!
//! - [`cli`]: clap argument definitions
//! - [`config`]: `EvkgConfig` and config file resolution
//! - [`config_handlers`]: `evkg config path|get|set|init`
//! - [`commands`]: handlers for the view commands

pub mod cli;
pub mod commands;
pub mod config;
pub mod config_handlers;

pub use cli::{Cli, Command, ConfigAction, FilterArgs};
pub use commands::{
    cmd_build, cmd_geocode, cmd_graph, cmd_map, cmd_summary, cmd_table, cmd_timeline, load_table,
    run_command,
};
pub use config::{CONFIG_ENV_VAR, DataConfig, EvkgConfig, PROJECT_NAME};
pub use config_handlers::handle_config_command;
