//! Sample source trait and the per-tick sample set.
//!
//! Every sensor backend implements [`SampleSource`]. The dashboard polls it
//! once per tick; `Ok(None)` means nothing is ready yet and is not an error.

use std::collections::BTreeMap;
use std::io;

use serde::{Deserialize, Serialize};

/// Field names shared by sample sets, channels and the log columns.
pub mod fields {
    pub const TEMPERATURE_C: &str = "temperature_C";
    pub const HUMIDITY_PCT: &str = "humidity_pct";
    pub const CO2_PPM: &str = "co2_ppm";
    pub const PM1_0: &str = "pm1_0";
    pub const PM2_5: &str = "pm2_5";
    pub const PM4_0: &str = "pm4_0";
    pub const PM10_0: &str = "pm10_0";
    pub const AMBIENT_HUMIDITY_PCT: &str = "ambient_humidity_pct";
    pub const AMBIENT_TEMPERATURE_C: &str = "ambient_temperature_C";
    pub const VOC_INDEX: &str = "voc_index";
    pub const NOX_INDEX: &str = "nox_index";

    /// Every measurement field, in log column order.
    pub const ALL: [&str; 11] = [
        TEMPERATURE_C,
        HUMIDITY_PCT,
        CO2_PPM,
        PM1_0,
        PM2_5,
        PM4_0,
        PM10_0,
        AMBIENT_HUMIDITY_PCT,
        AMBIENT_TEMPERATURE_C,
        VOC_INDEX,
        NOX_INDEX,
    ];
}

/// Readings produced in one tick, keyed by field name.
///
/// A field missing from the set means that sensor had nothing this tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SampleSet {
    values: BTreeMap<String, f64>,
}

impl SampleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: &str, value: f64) {
        self.values.insert(field.to_string(), value);
    }

    pub fn get(&self, field: &str) -> Option<f64> {
        self.values.get(field).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<'a> FromIterator<(&'a str, f64)> for SampleSet {
    fn from_iter<I: IntoIterator<Item = (&'a str, f64)>>(iter: I) -> Self {
        let mut set = SampleSet::new();
        for (k, v) in iter {
            set.insert(k, v);
        }
        set
    }
}

/// Trait that every sample backend implements.
///
/// `poll` may block on I/O for as long as the device needs; the caller
/// imposes no timeout.
pub trait SampleSource {
    /// Short identifier for status lines and logs.
    fn name(&self) -> &str;

    /// Readings for this tick, `Ok(None)` when nothing is ready.
    fn poll(&mut self) -> io::Result<Option<SampleSet>>;
}

impl<S: SampleSource + ?Sized> SampleSource for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn poll(&mut self) -> io::Result<Option<SampleSet>> {
        (**self).poll()
    }
}
