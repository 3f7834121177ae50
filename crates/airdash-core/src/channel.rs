//! Monitored metric channels and the preset channel sets.

use crate::history::{History, Retention, Window};
use crate::severity::{BandedPolicy, Severity, TemperaturePolicy, ThresholdPolicy};
use crate::source::fields;

/// Static description of one monitored metric.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelSpec {
    /// Log column / sample field this channel reads (e.g. `"co2_ppm"`).
    pub key: &'static str,
    /// Panel title (e.g. `"CO2 Level"`).
    pub label: &'static str,
    /// Display unit (e.g. `"ppm"`).
    pub unit: &'static str,
    /// Reading at which a bar reaches full graph height.
    pub scale_max: f64,
    pub policy: ThresholdPolicy,
}

impl ChannelSpec {
    pub fn co2() -> Self {
        Self {
            key: fields::CO2_PPM,
            label: "CO2 Level",
            unit: "ppm",
            scale_max: 2000.0,
            policy: ThresholdPolicy::Banded(BandedPolicy::co2()),
        }
    }

    pub fn temperature() -> Self {
        Self {
            key: fields::TEMPERATURE_C,
            label: "Temperature",
            unit: "°C",
            scale_max: 50.0,
            policy: ThresholdPolicy::Temperature(TemperaturePolicy::default()),
        }
    }

    pub fn humidity() -> Self {
        Self::percent(fields::HUMIDITY_PCT, "Humidity", "%")
    }

    pub fn pm2_5() -> Self {
        Self::percent(fields::PM2_5, "PM2.5", "µg/m³")
    }

    pub fn voc_index() -> Self {
        Self::index(fields::VOC_INDEX, "VOC Index")
    }

    pub fn nox_index() -> Self {
        Self::index(fields::NOX_INDEX, "NOx Index")
    }

    /// Generic 0-100 metric with proportional banding.
    fn percent(key: &'static str, label: &'static str, unit: &'static str) -> Self {
        Self {
            key,
            label,
            unit,
            scale_max: 100.0,
            policy: ThresholdPolicy::Banded(BandedPolicy::proportional(100.0)),
        }
    }

    /// Sensirion gas index, 1-500.
    fn index(key: &'static str, label: &'static str) -> Self {
        Self {
            key,
            label,
            unit: "",
            scale_max: 500.0,
            policy: ThresholdPolicy::Banded(BandedPolicy::proportional(500.0)),
        }
    }

    pub fn classify(&self, value: f64) -> Severity {
        self.policy.classify(value)
    }
}

/// Which channels the dashboard shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelPreset {
    /// Six panels: CO2, temperature, humidity, PM2.5, VOC and NOx.
    #[default]
    Full,
    /// A single CO2 panel.
    Co2,
}

impl ChannelPreset {
    pub fn specs(self) -> Vec<ChannelSpec> {
        match self {
            Self::Full => vec![
                ChannelSpec::co2(),
                ChannelSpec::temperature(),
                ChannelSpec::humidity(),
                ChannelSpec::pm2_5(),
                ChannelSpec::voc_index(),
                ChannelSpec::nox_index(),
            ],
            Self::Co2 => vec![ChannelSpec::co2()],
        }
    }
}

impl std::fmt::Display for ChannelPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Full => write!(f, "full"),
            Self::Co2 => write!(f, "co2"),
        }
    }
}

/// A channel together with its history.
#[derive(Debug, Clone)]
pub struct Channel {
    spec: ChannelSpec,
    history: History,
}

impl Channel {
    pub fn new(spec: ChannelSpec, retention: Retention) -> Self {
        Self {
            spec,
            history: History::new(retention),
        }
    }

    pub fn spec(&self) -> &ChannelSpec {
        &self.spec
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn push(&mut self, value: f64) {
        self.history.push(value);
    }

    pub fn recent(&self, n: usize) -> Window<'_> {
        self.history.recent(n)
    }

    pub fn latest(&self) -> Option<f64> {
        self.history.latest()
    }
}
