//! Temporal view for evkg.
//!
//! Events are bucketed by month or by week (starting Monday) and summarized
//! as event counts, mean sentiment and per-type counts. The counts and
//! sentiment series are smoothed with a centred rolling mean, and their
//! local peaks are marked on the figures.
//!
//! # Modules
//!
//! - [`types`]: `TimelineConfig`
//! - [`series`]: Period series, rolling mean, and peak detection
//! - [`render`]: Plotly figures and the HTML page

mod proptests;
pub mod render;
pub mod series;
pub mod types;

pub use types::TimelineConfig;

pub use series::{
    PeriodCount, PeriodSentiment, TypeCount, avg_sentiment, frequency, local_peaks,
    rolling_mean, top_types, type_frequencies,
};

pub use render::{Figure, TimelineArtifacts, build_figures, render_html, write_timeline_artifacts};
