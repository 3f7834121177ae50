//! TUI application state and event loop.
//!
//! Single-threaded: each tick polls the source (blocking for as long as the
//! sensor needs), appends a log row, feeds the dashboard and redraws. Between
//! ticks the loop only watches for quit keys and the signal flag.

use std::io;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant, SystemTime};

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;

use airdash_core::{Dashboard, LogWriter, SampleSource, TickOutcome};

/// Granularity of the quit-key check while waiting for the next tick.
const KEY_POLL: Duration = Duration::from_millis(50);

pub struct App {
    dashboard: Dashboard,
    source: Box<dyn SampleSource>,
    log: Option<LogWriter>,
    interval: Duration,
    running: Arc<AtomicBool>,
    last_outcome: Option<TickOutcome>,
    /// Last log write failure, shown in the status line.
    log_error: Option<String>,
}

impl App {
    pub fn new(
        dashboard: Dashboard,
        source: Box<dyn SampleSource>,
        log: Option<LogWriter>,
        interval: Duration,
        running: Arc<AtomicBool>,
    ) -> Self {
        Self {
            dashboard,
            source,
            log,
            interval,
            running,
            last_outcome: None,
            log_error: None,
        }
    }

    pub fn run(&mut self) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        // Install panic hook that restores terminal before printing the panic.
        let original_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen, crossterm::cursor::Show);
            original_hook(info);
        }));

        let result = self.run_loop(&mut terminal);

        // Always restore terminal, even if the loop returned an error.
        let _ = std::panic::take_hook();
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            crossterm::cursor::Show
        )?;

        result
    }

    fn run_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> io::Result<()> {
        terminal.clear()?;
        while self.is_running() {
            let outcome = self.tick();
            if outcome.should_render() {
                terminal.draw(|f| super::ui::draw(f, self))?;
            }
            self.wait_for_next_tick()?;
        }
        Ok(())
    }

    /// Poll the source once, log the readings and feed the dashboard.
    pub fn tick(&mut self) -> TickOutcome {
        let polled = self.source.poll();
        let now = SystemTime::now();

        if let (Ok(Some(samples)), Some(writer)) = (&polled, self.log.as_mut()) {
            match writer.append_samples(now, samples) {
                Ok(_) => self.log_error = None,
                Err(e) => {
                    log::warn!("log write to {} failed: {e}", writer.path().display());
                    self.log_error = Some(e.to_string());
                }
            }
        }

        let outcome = self.dashboard.tick(polled, now);
        self.last_outcome = Some(outcome);
        outcome
    }

    fn wait_for_next_tick(&mut self) -> io::Result<()> {
        let started = Instant::now();
        while self.is_running() {
            let left = self.interval.saturating_sub(started.elapsed());
            if left.is_zero() {
                break;
            }
            if event::poll(left.min(KEY_POLL))?
                && let Event::Key(key) = event::read()?
                && key.kind == KeyEventKind::Press
            {
                self.handle_key(key);
            }
        }
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) {
        let ctrl_c = key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL);
        if ctrl_c || matches!(key.code, KeyCode::Char('q') | KeyCode::Esc) {
            self.stop();
        }
    }

    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    pub fn last_outcome(&self) -> Option<TickOutcome> {
        self.last_outcome
    }

    pub fn log_path(&self) -> Option<&Path> {
        self.log.as_ref().map(LogWriter::path)
    }

    pub fn rows_logged(&self) -> u64 {
        self.log.as_ref().map_or(0, LogWriter::rows_written)
    }

    pub fn log_error(&self) -> Option<&str> {
        self.log_error.as_deref()
    }
}
