//! TUI rendering: header, status line and one bar-graph panel per channel.
//!
//! ┌──────────────────────────────────────────────────────────────┐
//! │airdash  tick 42  2026-10-16 09:12:40 UTC  CO2 Level 612 ppm …│
//! │source: simulated   log: airdash.csv (41 rows)   q: quit      │
//! │CO2 Level (ppm): 612             Temperature (°C): 21.4       │
//! │2000 |                             50 |                       │
//! │1500 |        #                  37.5 |                       │
//! │1000 |      ###                    25 |   ##########          │
//! │ 500 |  #######                  12.5 |   ##########          │
//! │   0 |#########                     0 |###########            │
//! └──────────────────────────────────────────────────────────────┘
//!
//! The core renders every panel into a plain [`Grid`]; this module only maps
//! cell styles to terminal colors and copies the grids into the frame buffer.

use super::app::App;
use airdash_core::{CellStyle, Frame as DashFrame, Grid, Severity, TickOutcome};
use ratatui::{prelude::*, widgets::*};

pub fn draw(f: &mut Frame, app: &App) {
    let area = f.area();
    match app
        .dashboard()
        .frame(usize::from(area.height), usize::from(area.width))
    {
        DashFrame::TooSmall { message } => {
            f.render_widget(Paragraph::new(message), area);
        }
        DashFrame::Panels { header, panels } => {
            draw_header(f, area, &header);
            draw_status(f, area, app);
            for panel in &panels {
                let g = panel.geometry;
                let rect = Rect::new(
                    area.x.saturating_add(to_u16(g.col)),
                    area.y.saturating_add(to_u16(g.row)),
                    to_u16(g.width),
                    to_u16(g.height),
                )
                .intersection(area);
                f.render_widget(GraphPanel::new(&panel.grid), rect);
            }
        }
    }
}

fn to_u16(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

fn draw_header(f: &mut Frame, area: Rect, header: &str) {
    let line = Rect::new(area.x, area.y, area.width, area.height.min(1));
    let p = Paragraph::new(Span::styled(
        header.to_string(),
        Style::default().bold().fg(Color::Cyan),
    ));
    f.render_widget(p, line);
}

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
    if area.height < 2 {
        return;
    }
    let mut spans = vec![Span::styled(
        format!("source: {}", app.source_name()),
        Style::default().fg(Color::DarkGray),
    )];
    if app.last_outcome() == Some(TickOutcome::NotReady) {
        spans.push(Span::styled(
            "  (not ready)",
            Style::default().fg(Color::DarkGray),
        ));
    }
    if let Some(path) = app.log_path() {
        spans.push(Span::styled(
            format!("   log: {} ({} rows)", path.display(), app.rows_logged()),
            Style::default().fg(Color::DarkGray),
        ));
    }
    if let Some(err) = app.log_error() {
        spans.push(Span::styled(
            format!("   log error: {err}"),
            Style::default().fg(Color::Red),
        ));
    }
    spans.push(Span::styled(
        "   q: quit",
        Style::default().fg(Color::DarkGray),
    ));

    let line = Rect::new(area.x, area.y + 1, area.width, 1);
    f.render_widget(Paragraph::new(Line::from(spans)), line);
}

/// Terminal color for each severity band.
pub fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Normal => Color::Cyan,
        Severity::Low => Color::Green,
        Severity::Elevated => Color::Yellow,
        Severity::High => Color::Red,
        Severity::Critical => Color::Magenta,
    }
}

fn cell_style(style: CellStyle) -> Style {
    match style {
        CellStyle::Plain => Style::default(),
        CellStyle::Bold => Style::default().add_modifier(Modifier::BOLD),
        CellStyle::Severity(s) => Style::default().fg(severity_color(s)),
    }
}

/// Copies a rendered panel grid into the buffer, clipped to the area.
pub struct GraphPanel<'a> {
    grid: &'a Grid,
}

impl<'a> GraphPanel<'a> {
    pub fn new(grid: &'a Grid) -> Self {
        Self { grid }
    }
}

impl Widget for GraphPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for (row, col, cell) in self.grid.cells() {
            let (dy, dx) = (to_u16(row), to_u16(col));
            if dy >= area.height || dx >= area.width {
                continue;
            }
            if let Some(target) = buf.cell_mut(Position::new(area.x + dx, area.y + dy)) {
                target.set_char(cell.ch).set_style(cell_style(cell.style));
            }
        }
    }
}
