//! Threshold color policies.
//!
//! A policy turns a raw reading into a [`Severity`]. It never picks a concrete
//! terminal color: the terminal adapter maps each severity to whatever
//! attribute it can draw, so there is no shared color registry to set up.
//!
//! Breakpoints are inclusive on the upper edge of each band: a value exactly
//! at a breakpoint belongs to the lower-severity band.

// ---------------------------------------------------------------------------
// Severity
// ---------------------------------------------------------------------------

/// Categorical color class of a single reading.
///
/// The adapter colors are: Normal = cyan, Low = green, Elevated = yellow,
/// High = red, Critical = magenta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    Low,
    Normal,
    Elevated,
    High,
    Critical,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Normal => write!(f, "normal"),
            Self::Elevated => write!(f, "elevated"),
            Self::High => write!(f, "high"),
            Self::Critical => write!(f, "critical"),
        }
    }
}

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// CO2 breakpoints in ppm.
pub const CO2_BREAKPOINTS: [f64; 4] = [550.0, 1000.0, 1500.0, 2000.0];

/// Below this temperature (°C) a reading is too cold.
pub const TEMP_COLD_BELOW: f64 = 0.0;

/// Above this temperature (°C) a reading is too hot.
pub const TEMP_HOT_ABOVE: f64 = 27.0;

/// Generic banding as fractions of a channel's scale maximum. Same shape as
/// the CO2 breakpoints over a 2000 ppm scale.
const PROPORTIONAL_BANDS: [f64; 4] = [0.275, 0.5, 0.75, 1.0];

const _: () = assert!(CO2_BREAKPOINTS[0] < CO2_BREAKPOINTS[1]);
const _: () = assert!(CO2_BREAKPOINTS[1] < CO2_BREAKPOINTS[2]);
const _: () = assert!(CO2_BREAKPOINTS[2] < CO2_BREAKPOINTS[3]);
const _: () = assert!(TEMP_COLD_BELOW < TEMP_HOT_ABOVE);

// ---------------------------------------------------------------------------
// Policies
// ---------------------------------------------------------------------------

/// Five-band policy over four ascending breakpoints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandedPolicy {
    breakpoints: [f64; 4],
}

impl BandedPolicy {
    /// Build a policy from four breakpoints. Out-of-order input is sorted so
    /// the bands stay contiguous.
    pub fn new(mut breakpoints: [f64; 4]) -> Self {
        breakpoints.sort_by(|a, b| a.total_cmp(b));
        Self { breakpoints }
    }

    /// The CO2 banding: 550 / 1000 / 1500 / 2000 ppm.
    pub fn co2() -> Self {
        Self::new(CO2_BREAKPOINTS)
    }

    /// Breakpoints at 27.5 %, 50 %, 75 % and 100 % of `scale_max`.
    pub fn proportional(scale_max: f64) -> Self {
        Self::new(PROPORTIONAL_BANDS.map(|f| f * scale_max))
    }

    pub fn breakpoints(&self) -> [f64; 4] {
        self.breakpoints
    }

    pub fn classify(&self, value: f64) -> Severity {
        let [b1, b2, b3, b4] = self.breakpoints;
        if value <= b1 {
            Severity::Normal
        } else if value <= b2 {
            Severity::Low
        } else if value <= b3 {
            Severity::Elevated
        } else if value <= b4 {
            Severity::High
        } else {
            Severity::Critical
        }
    }
}

/// Three-band temperature policy: too cold, nominal, too hot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemperaturePolicy {
    cold_below: f64,
    hot_above: f64,
}

impl Default for TemperaturePolicy {
    fn default() -> Self {
        Self {
            cold_below: TEMP_COLD_BELOW,
            hot_above: TEMP_HOT_ABOVE,
        }
    }
}

impl TemperaturePolicy {
    pub fn classify(&self, value: f64) -> Severity {
        if value < self.cold_below {
            Severity::Critical
        } else if value <= self.hot_above {
            Severity::Low
        } else {
            Severity::High
        }
    }
}

/// The policy attached to a channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ThresholdPolicy {
    Banded(BandedPolicy),
    Temperature(TemperaturePolicy),
}

impl ThresholdPolicy {
    /// Classify a reading. Total over every real number.
    pub fn classify(&self, value: f64) -> Severity {
        match self {
            Self::Banded(p) => p.classify(value),
            Self::Temperature(p) => p.classify(value),
        }
    }
}

/// Classify a CO2 reading in ppm.
pub fn classify_co2(value: f64) -> Severity {
    BandedPolicy::co2().classify(value)
}

/// Classify a temperature reading in °C.
pub fn classify_temp(value: f64) -> Severity {
    TemperaturePolicy::default().classify(value)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
