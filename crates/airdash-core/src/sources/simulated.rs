//! Simulated air-quality sensor.
//!
//! Each field follows a bounded random walk from a plausible indoor starting
//! point. The walks are wide enough that CO2 and temperature cross every
//! color band over a long run. The first `warmup_ticks` polls report nothing
//! ready, like a real sensor that needs a measurement period after start-up.

use std::io;
use std::time::{SystemTime, UNIX_EPOCH};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::source::{SampleSet, SampleSource, fields};

/// Bounds and step size of one simulated field.
#[derive(Debug, Clone, Copy)]
struct FieldModel {
    field: &'static str,
    start: f64,
    step: f64,
    min: f64,
    max: f64,
}

const MODELS: [FieldModel; 11] = [
    FieldModel { field: fields::TEMPERATURE_C, start: 21.0, step: 0.6, min: -5.0, max: 35.0 },
    FieldModel { field: fields::HUMIDITY_PCT, start: 40.0, step: 1.5, min: 10.0, max: 95.0 },
    FieldModel { field: fields::CO2_PPM, start: 450.0, step: 80.0, min: 400.0, max: 2600.0 },
    FieldModel { field: fields::PM1_0, start: 2.0, step: 0.8, min: 0.0, max: 60.0 },
    FieldModel { field: fields::PM2_5, start: 3.0, step: 1.5, min: 0.0, max: 120.0 },
    FieldModel { field: fields::PM4_0, start: 3.5, step: 1.6, min: 0.0, max: 130.0 },
    FieldModel { field: fields::PM10_0, start: 4.0, step: 1.8, min: 0.0, max: 150.0 },
    FieldModel { field: fields::AMBIENT_HUMIDITY_PCT, start: 42.0, step: 1.5, min: 10.0, max: 95.0 },
    FieldModel { field: fields::AMBIENT_TEMPERATURE_C, start: 22.0, step: 0.5, min: -5.0, max: 35.0 },
    FieldModel { field: fields::VOC_INDEX, start: 100.0, step: 25.0, min: 1.0, max: 500.0 },
    FieldModel { field: fields::NOX_INDEX, start: 1.0, step: 15.0, min: 1.0, max: 500.0 },
];

/// Configuration for [`SimulatedSource`].
#[derive(Debug, Clone, Default)]
pub struct SimulatedConfig {
    /// Fixed seed for reproducible runs; `None` seeds from the clock.
    pub seed: Option<u64>,
    /// Polls that return "not ready" before the first reading.
    pub warmup_ticks: u32,
}

pub struct SimulatedSource {
    rng: StdRng,
    current: [f64; 11],
    warmup_left: u32,
}

impl SimulatedSource {
    pub fn new(config: SimulatedConfig) -> Self {
        let seed = config.seed.unwrap_or_else(clock_seed);
        Self {
            rng: StdRng::seed_from_u64(seed),
            current: MODELS.map(|m| m.start),
            warmup_left: config.warmup_ticks,
        }
    }

    fn step(&mut self) -> SampleSet {
        let mut set = SampleSet::new();
        for (value, model) in self.current.iter_mut().zip(MODELS.iter()) {
            let delta = self.rng.random_range(-model.step..=model.step);
            *value = (*value + delta).clamp(model.min, model.max);
            set.insert(model.field, *value);
        }
        set
    }
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0x5EED)
}

impl SampleSource for SimulatedSource {
    fn name(&self) -> &str {
        "simulated"
    }

    fn poll(&mut self) -> io::Result<Option<SampleSet>> {
        if self.warmup_left > 0 {
            self.warmup_left -= 1;
            return Ok(None);
        }
        Ok(Some(self.step()))
    }
}
