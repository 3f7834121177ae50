//! `airdash monitor`: the live dashboard.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use airdash_core::{Dashboard, DashboardConfig, LogWriter};

/// Run the monitor command.
#[allow(clippy::too_many_arguments)]
pub fn run(
    interval_secs: f64,
    layout: &str,
    log_path: Option<&str>,
    source: &str,
    seed: Option<u64>,
    warmup: u32,
    retention: usize,
    debug_log: Option<&str>,
) {
    if let Err(e) = super::init_logging(debug_log.map(Path::new)) {
        eprintln!("Error opening debug log: {e}");
        std::process::exit(1);
    }

    if !interval_secs.is_finite() || interval_secs <= 0.0 {
        eprintln!("Error: --interval must be a positive number of seconds");
        std::process::exit(1);
    }

    let sample_source = match super::make_source(source, seed, warmup, log_path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error opening source '{source}': {e}");
            std::process::exit(1);
        }
    };

    let log = match log_path.map(LogWriter::open).transpose() {
        Ok(w) => w,
        Err(e) => {
            eprintln!("Error opening log {}: {e}", log_path.unwrap_or_default());
            std::process::exit(1);
        }
    };

    // SIGINT/SIGTERM from outside; Ctrl+C inside the raw-mode terminal is a
    // key event handled by the app.
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    if let Err(e) = ctrlc::set_handler(move || r.store(false, Ordering::SeqCst)) {
        eprintln!("Error setting Ctrl+C handler: {e}");
        std::process::exit(1);
    }

    let config = DashboardConfig {
        preset: super::parse_layout(layout),
        retention: super::parse_retention(retention),
    };
    log::info!(
        "monitor: layout={} source={} interval={interval_secs}s retention={:?}",
        config.preset,
        sample_source.name(),
        config.retention
    );

    let mut app = crate::tui::app::App::new(
        Dashboard::new(config),
        sample_source,
        log,
        Duration::from_secs_f64(interval_secs),
        running,
    );
    if let Err(e) = app.run() {
        eprintln!("TUI error: {e}");
        std::process::exit(1);
    }

    if let Some(path) = app.log_path() {
        println!("{} rows logged to {}", app.rows_logged(), path.display());
    }
}
