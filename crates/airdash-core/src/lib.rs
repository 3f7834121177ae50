//! # airdash-core
//!
//! **A terminal dashboard for indoor air quality.**
//!
//! `airdash-core` keeps a bounded history per metric (CO2, temperature,
//! humidity, particulates, VOC and NOx indices), classifies each reading into a
//! severity band, and renders scrolling bar graphs into a plain character
//! grid. It has no terminal dependency: the `airdash` CLI owns the screen and
//! maps severities to colors.
//!
//! ## Quick Start
//!
//! ```
//! use std::time::SystemTime;
//! use airdash_core::{ChannelPreset, Dashboard, DashboardConfig, Frame, SampleSet, fields};
//!
//! let mut dash = Dashboard::new(DashboardConfig {
//!     preset: ChannelPreset::Co2,
//!     ..Default::default()
//! });
//!
//! let samples: SampleSet = [(fields::CO2_PPM, 612.0)].into_iter().collect();
//! dash.tick(Ok(Some(samples)), SystemTime::now());
//!
//! match dash.frame(30, 80) {
//!     Frame::Panels { panels, .. } => assert_eq!(panels.len(), 1),
//!     Frame::TooSmall { message } => panic!("{message}"),
//! }
//! ```
//!
//! ## Architecture
//!
//! Source → Dashboard (ingest) → Layout → Graph renderer → Grid
//!
//! Every backend implements the [`SampleSource`] trait. Each tick the caller
//! polls it, hands the result to [`Dashboard::tick`] and draws the
//! [`Frame`] built for the current terminal size. Completed ticks are appended
//! to a CSV log with [`LogWriter`].

pub mod channel;
pub mod dashboard;
pub mod graph;
pub mod history;
pub mod layout;
pub mod logbook;
pub mod severity;
pub mod source;
pub mod sources;

pub use channel::{Channel, ChannelPreset, ChannelSpec};
pub use dashboard::{Dashboard, DashboardConfig, Frame, Panel, TickOutcome};
pub use graph::{Cell, CellStyle, Grid, Region, render_channel, render_graph};
pub use history::{DEFAULT_RETENTION, History, Retention, Window};
pub use layout::{
    Assignment, ColumnHalf, MIN_COLS, MIN_ROWS, PanelGeometry, TooSmall, compute_layout,
    default_assignments,
};
pub use logbook::{
    ColumnSummary, LOG_COLUMNS, LogRecord, LogSummary, LogWriter, format_timestamp, read_log,
    summarize,
};
pub use severity::{
    BandedPolicy, Severity, TemperaturePolicy, ThresholdPolicy, classify_co2, classify_temp,
};
pub use source::{SampleSet, SampleSource, fields};
pub use sources::{ReplaySource, SimulatedConfig, SimulatedSource};

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
