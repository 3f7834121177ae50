pub mod inspect;
pub mod monitor;

use std::fs::File;
use std::io;
use std::path::Path;

use airdash_core::{
    ChannelPreset, ReplaySource, Retention, SampleSource, SimulatedConfig, SimulatedSource,
};

/// Name of the built-in simulated sensor for `--source`.
pub const SIMULATED_SOURCE: &str = "sim";

/// Parse a layout name into the channel preset.
pub fn parse_layout(s: &str) -> ChannelPreset {
    match s {
        "full" | "all" => ChannelPreset::Full,
        "co2" | "CO2" => ChannelPreset::Co2,
        _ => {
            eprintln!("Unknown layout '{s}', using full");
            ChannelPreset::Full
        }
    }
}

/// `0` means keep every sample.
pub fn parse_retention(n: usize) -> Retention {
    match n {
        0 => Retention::Unbounded,
        cap => Retention::Capped(cap),
    }
}

/// Build the sample source named by `--source`: the simulated sensor, or a
/// log file to replay. A replay file may not also be the live log.
pub fn make_source(
    spec: &str,
    seed: Option<u64>,
    warmup_ticks: u32,
    log_path: Option<&str>,
) -> io::Result<Box<dyn SampleSource>> {
    if spec == SIMULATED_SOURCE {
        return Ok(Box::new(SimulatedSource::new(SimulatedConfig {
            seed,
            warmup_ticks,
        })));
    }
    if let Some(log) = log_path
        && same_file(Path::new(spec), Path::new(log))
    {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("cannot replay {spec} while logging to it; pass --no-log or another --log"),
        ));
    }
    Ok(Box::new(ReplaySource::open(spec)?))
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (std::fs::canonicalize(a), std::fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

/// Route `log` records to `path`, or to stderr when only `RUST_LOG` is set.
/// With neither, logging stays off so nothing scribbles over the dashboard.
pub fn init_logging(path: Option<&Path>) -> io::Result<()> {
    let env = env_logger::Env::default().default_filter_or("debug");
    match path {
        Some(path) => {
            let file = File::create(path)?;
            let _ = env_logger::Builder::from_env(env)
                .target(env_logger::Target::Pipe(Box::new(file)))
                .try_init();
        }
        None if std::env::var_os("RUST_LOG").is_some() => {
            let _ = env_logger::Builder::from_env(env).try_init();
        }
        None => {}
    }
    Ok(())
}

/// Serialize `value` as pretty JSON to `path`, reporting the outcome.
pub fn write_json<T: serde::Serialize>(value: &T, path: &str, what: &str) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => match std::fs::write(path, json) {
            Ok(()) => println!("{what} written to {path}"),
            Err(e) => eprintln!("Failed to write {path}: {e}"),
        },
        Err(e) => eprintln!("Failed to serialize {what}: {e}"),
    }
}
