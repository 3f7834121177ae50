//! Dashboard controller: owns the channels, ingests one sample set per tick
//! and builds the frame for the current terminal size.
//!
//! The controller is pure. The caller owns the clock and the terminal, calls
//! [`Dashboard::tick`] with whatever the source returned and draws the
//! resulting [`Frame`].

use std::io;
use std::time::SystemTime;

use crate::channel::{Channel, ChannelPreset};
use crate::graph::{Grid, format_reading, render_channel};
use crate::history::Retention;
use crate::layout::{Assignment, PanelGeometry, compute_layout, default_assignments};
use crate::logbook::format_timestamp;
use crate::source::SampleSet;

/// Dashboard settings.
#[derive(Debug, Clone, Default)]
pub struct DashboardConfig {
    pub preset: ChannelPreset,
    pub retention: Retention,
}

/// What happened on one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Samples arrived; this many channels were updated.
    Updated(usize),
    /// The source had nothing ready.
    NotReady,
    /// The source failed; the caller should skip this tick's render.
    Failed,
}

impl TickOutcome {
    pub fn should_render(self) -> bool {
        !matches!(self, TickOutcome::Failed)
    }
}

/// One rendered panel at its screen position.
#[derive(Debug, Clone)]
pub struct Panel {
    pub geometry: PanelGeometry,
    pub grid: Grid,
}

/// Everything the terminal adapter has to draw for one tick.
#[derive(Debug, Clone)]
pub enum Frame {
    /// Terminal below the minimum size; draw `message` and nothing else.
    TooSmall { message: String },
    Panels { header: String, panels: Vec<Panel> },
}

pub struct Dashboard {
    channels: Vec<Channel>,
    assignments: Vec<Assignment>,
    ticks: u64,
    last_sample_at: Option<SystemTime>,
}

impl Dashboard {
    pub fn new(config: DashboardConfig) -> Self {
        let channels: Vec<Channel> = config
            .preset
            .specs()
            .into_iter()
            .map(|spec| Channel::new(spec, config.retention))
            .collect();
        let assignments = default_assignments(channels.len());
        Self {
            channels,
            assignments,
            ticks: 0,
            last_sample_at: None,
        }
    }

    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn last_sample_at(&self) -> Option<SystemTime> {
        self.last_sample_at
    }

    /// Push every field of `samples` that a channel reads. Returns the number
    /// of channels updated; fields with no channel are ignored.
    pub fn ingest(&mut self, samples: &SampleSet) -> usize {
        let mut updated = 0;
        for channel in &mut self.channels {
            if let Some(v) = samples.get(channel.spec().key) {
                channel.push(v);
                updated += 1;
            }
        }
        updated
    }

    /// Account for one tick of the source, stamped with `at`.
    pub fn tick(&mut self, polled: io::Result<Option<SampleSet>>, at: SystemTime) -> TickOutcome {
        self.ticks += 1;
        match polled {
            Ok(Some(samples)) => {
                let n = self.ingest(&samples);
                self.last_sample_at = Some(at);
                log::debug!(
                    "tick {}: {} of {} channels updated",
                    self.ticks,
                    n,
                    self.channels.len()
                );
                TickOutcome::Updated(n)
            }
            Ok(None) => {
                log::debug!("tick {}: source not ready", self.ticks);
                TickOutcome::NotReady
            }
            Err(e) => {
                log::warn!("tick {}: sample acquisition failed: {e}", self.ticks);
                TickOutcome::Failed
            }
        }
    }

    /// Status line: tick counter, time of the last sample and every
    /// channel's latest reading.
    pub fn header(&self) -> String {
        let when = match self.last_sample_at {
            Some(t) => format!("{} UTC", format_timestamp(t)),
            None => "waiting for sensor".to_string(),
        };
        let mut line = format!("airdash  tick {}  {}", self.ticks, when);
        for channel in &self.channels {
            let spec = channel.spec();
            let reading = channel
                .latest()
                .map(format_reading)
                .unwrap_or_else(|| "--".to_string());
            line.push_str("  ");
            line.push_str(spec.label);
            line.push(' ');
            line.push_str(&reading);
            if !spec.unit.is_empty() {
                line.push(' ');
                line.push_str(spec.unit);
            }
        }
        line
    }

    /// Lay out and render every panel for a `rows` x `cols` terminal.
    pub fn frame(&self, rows: usize, cols: usize) -> Frame {
        match compute_layout(rows, cols, &self.assignments) {
            Err(too_small) => Frame::TooSmall {
                message: too_small.to_string(),
            },
            Ok(geometries) => {
                let panels = geometries
                    .into_iter()
                    .filter_map(|geometry| {
                        let channel = self.channels.get(geometry.channel)?;
                        Some(Panel {
                            geometry,
                            grid: render_channel(channel, geometry.region()),
                        })
                    })
                    .collect();
                Frame::Panels {
                    header: self.header(),
                    panels,
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
