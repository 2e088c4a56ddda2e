mod build;
mod config;
mod geocode;
mod views;
