//! CLI for airdash: live air-quality graphs in your terminal.

mod commands;
mod tui;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "airdash")]
#[command(about = "airdash: scrolling, color-coded air-quality graphs in your terminal")]
#[command(version = airdash_core::VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Live dashboard: one bar graph per metric, refreshed every tick.
    /// Press q or Ctrl+C to quit.
    Monitor {
        /// Seconds between ticks
        #[arg(long, default_value = "20")]
        interval: f64,

        /// Panels to show: full (six metrics) or co2 (CO2 only)
        #[arg(long, default_value = "full", value_parser = ["full", "co2"])]
        layout: String,

        /// CSV log file; one row is appended per tick with readings
        #[arg(long, default_value = "airdash.csv")]
        log: String,

        /// Do not write a log file
        #[arg(long)]
        no_log: bool,

        /// Sample source: "sim" for the simulated sensor, or a log file to replay
        #[arg(long, default_value = "sim")]
        source: String,

        /// Seed for the simulated sensor (defaults to the clock)
        #[arg(long)]
        seed: Option<u64>,

        /// Ticks the simulated sensor reports "not ready" after start-up
        #[arg(long, default_value = "1")]
        warmup: u32,

        /// Samples kept per metric; 0 keeps everything
        #[arg(long, default_value_t = airdash_core::DEFAULT_RETENTION)]
        retention: usize,

        /// Write debug logs to this file (RUST_LOG overrides the level)
        #[arg(long)]
        debug_log: Option<String>,
    },

    /// Summarize a recorded log: rows, time span and per-metric statistics.
    Inspect {
        /// Log file written by `airdash monitor`
        log: String,

        /// Also write the summary as JSON
        #[arg(long)]
        output: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Monitor {
            interval,
            layout,
            log,
            no_log,
            source,
            seed,
            warmup,
            retention,
            debug_log,
        } => commands::monitor::run(
            interval,
            &layout,
            (!no_log).then_some(log.as_str()),
            &source,
            seed,
            warmup,
            retention,
            debug_log.as_deref(),
        ),
        Commands::Inspect { log, output } => commands::inspect::run(&log, output.as_deref()),
    }
}
