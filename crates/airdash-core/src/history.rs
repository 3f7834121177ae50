//! Per-channel sample history.
//!
//! A [`History`] is an append-only sequence of readings. The renderer never
//! copies it: [`History::recent`] hands out a borrowed [`Window`] over the
//! newest samples, so the history cannot change while a render pass holds it.

use std::collections::VecDeque;
use std::collections::vec_deque;

/// Default cap on retained samples. At a 20 s tick this is a little over
/// 45 hours, far wider than any terminal.
pub const DEFAULT_RETENTION: usize = 8192;

/// How many samples a history keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Retention {
    /// Keep every sample for the process lifetime.
    Unbounded,
    /// Keep at most this many samples, dropping the oldest first.
    Capped(usize),
}

impl Default for Retention {
    fn default() -> Self {
        Self::Capped(DEFAULT_RETENTION)
    }
}

/// Ordered readings of one channel, oldest first.
#[derive(Debug, Clone, Default)]
pub struct History {
    samples: VecDeque<f64>,
    retention: Retention,
}

impl History {
    pub fn new(retention: Retention) -> Self {
        Self {
            samples: VecDeque::new(),
            retention,
        }
    }

    /// Append a reading. Never fails; evicts from the front when capped.
    pub fn push(&mut self, value: f64) {
        self.samples.push_back(value);
        if let Retention::Capped(cap) = self.retention
            && self.samples.len() > cap
        {
            let excess = self.samples.len() - cap;
            self.samples.drain(..excess);
        }
    }

    /// View over the last `n` samples in chronological order.
    pub fn recent(&self, n: usize) -> Window<'_> {
        let start = self.samples.len().saturating_sub(n);
        Window {
            samples: &self.samples,
            start,
        }
    }

    pub fn latest(&self) -> Option<f64> {
        self.samples.back().copied()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn retention(&self) -> Retention {
        self.retention
    }
}

/// Borrowed, restartable view over the tail of a [`History`].
///
/// Cheap to copy; every call to [`Window::iter`] starts again from the
/// oldest sample in the window.
#[derive(Debug, Clone, Copy)]
pub struct Window<'a> {
    samples: &'a VecDeque<f64>,
    start: usize,
}

impl<'a> Window<'a> {
    /// An empty window, for channels with no history yet.
    pub fn empty() -> Window<'static> {
        static EMPTY: VecDeque<f64> = VecDeque::new();
        Window {
            samples: &EMPTY,
            start: 0,
        }
    }

    pub fn iter(&self) -> std::iter::Copied<vec_deque::Iter<'a, f64>> {
        self.samples.range(self.start..).copied()
    }

    pub fn len(&self) -> usize {
        self.samples.len() - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Narrow to the last `n` samples of this window.
    pub fn tail(&self, n: usize) -> Window<'a> {
        let skip = self.len().saturating_sub(n);
        Window {
            samples: self.samples,
            start: self.start + skip,
        }
    }
}

impl<'a> IntoIterator for Window<'a> {
    type Item = f64;
    type IntoIter = std::iter::Copied<vec_deque::Iter<'a, f64>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
