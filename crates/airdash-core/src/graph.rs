//! Scrolling ASCII bar graph for one channel.
//!
//! ```text
//! CO2 Level (ppm): 1412          <- row 0: label
//! 2000 |                         <- row 1: top of axis (M)
//!      |
//! 1500 |              #
//!      |            # #
//! 1000 |          # # #
//!      |        # # # #
//!  500 |    # # # # # #
//!    0 |# # # # # # # #          <- row H+1: bar level 0
//! ```
//!
//! (Bars are adjacent in the real output; they are spaced out here for
//! readability.) A region of height R leaves `H = R - 2` rows for bars. Bar
//! level `j` (0 = bottom) lands on row `H + 1 - j`, so a full-height bar fills
//! rows `2..=H+1` and never reaches the label row.

use crate::channel::Channel;
use crate::history::Window;
use crate::severity::{Severity, ThresholdPolicy};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Width of the right-aligned numeric axis labels.
pub const AXIS_GUTTER: usize = 4;

/// Drawn after each axis label.
pub const AXIS_SEPARATOR: &str = " |";

/// Columns taken by the axis before the first bar.
pub const AXIS_WIDTH: usize = AXIS_GUTTER + AXIS_SEPARATOR.len();

/// Rows above the bars: the label row and the top-of-axis row.
pub const CHROME_ROWS: usize = 2;

/// Number of axis labels (0, M/4, M/2, 3M/4, M).
pub const AXIS_LABELS: usize = 5;

pub const BAR_GLYPH: char = '#';

/// Stand-in scale for a non-positive or non-finite maximum.
const FALLBACK_SCALE: f64 = 1.0;

// ---------------------------------------------------------------------------
// Grid
// ---------------------------------------------------------------------------

/// How a grid cell should be drawn. The terminal adapter picks the colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellStyle {
    #[default]
    Plain,
    Bold,
    Severity(Severity),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub style: CellStyle,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            style: CellStyle::Plain,
        }
    }
}

/// Fixed-size character grid. Writes outside the grid are clipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Grid {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![Cell::default(); rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&Cell> {
        if row < self.rows && col < self.cols {
            self.cells.get(row * self.cols + col)
        } else {
            None
        }
    }

    pub fn put(&mut self, row: usize, col: usize, ch: char, style: CellStyle) {
        if row < self.rows && col < self.cols {
            self.cells[row * self.cols + col] = Cell { ch, style };
        }
    }

    /// Write `text` starting at `(row, col)`, clipped at the right edge.
    pub fn put_str(&mut self, row: usize, col: usize, text: &str, style: CellStyle) {
        for (i, ch) in text.chars().enumerate() {
            let c = col + i;
            if c >= self.cols {
                break;
            }
            self.put(row, c, ch, style);
        }
    }

    /// The characters of one row, trailing spaces trimmed.
    pub fn row_text(&self, row: usize) -> String {
        if row >= self.rows {
            return String::new();
        }
        let start = row * self.cols;
        let s: String = self.cells[start..start + self.cols]
            .iter()
            .map(|c| c.ch)
            .collect();
        s.trim_end().to_string()
    }

    /// Iterate `(row, col, cell)` over every cell.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, &Cell)> {
        let cols = self.cols.max(1);
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, c)| (i / cols, i % cols, c))
    }
}

// ---------------------------------------------------------------------------
// Region
// ---------------------------------------------------------------------------

/// Size of the rectangle a graph is drawn into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Region {
    pub height: usize,
    pub width: usize,
}

impl Region {
    pub fn new(height: usize, width: usize) -> Self {
        Self { height, width }
    }

    /// Rows available to bars.
    pub fn graph_height(&self) -> usize {
        self.height.saturating_sub(CHROME_ROWS)
    }

    /// Columns available to bars, i.e. how many samples are visible.
    pub fn plot_width(&self) -> usize {
        self.width.saturating_sub(AXIS_WIDTH)
    }
}

// ---------------------------------------------------------------------------
// Scaling
// ---------------------------------------------------------------------------

/// One scaled sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bar {
    pub height: usize,
    pub severity: Severity,
}

fn sanitize_scale(scale_max: f64) -> f64 {
    if scale_max.is_finite() && scale_max > 0.0 {
        scale_max
    } else {
        FALLBACK_SCALE
    }
}

/// `floor(value / scale_max * graph_height)`, clamped to `[0, graph_height]`.
///
/// Zero, negative and NaN readings give an empty bar; anything at or above
/// the scale maximum gives a full one.
pub fn bar_height(value: f64, scale_max: f64, graph_height: usize) -> usize {
    if value.is_nan() || value <= 0.0 {
        return 0;
    }
    let max = sanitize_scale(scale_max);
    let scaled = (value / max * graph_height as f64).floor();
    if scaled >= graph_height as f64 {
        graph_height
    } else {
        scaled as usize
    }
}

/// Scale the newest `plot_width` samples of `window` into bars, oldest first.
pub fn scale_bars(
    policy: &ThresholdPolicy,
    window: Window<'_>,
    plot_width: usize,
    scale_max: f64,
    graph_height: usize,
) -> Vec<Bar> {
    window
        .tail(plot_width)
        .iter()
        .map(|v| Bar {
            height: bar_height(v, scale_max, graph_height),
            severity: policy.classify(v),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Axis
// ---------------------------------------------------------------------------

/// Format an axis value to fit the gutter: `500`, `12.5`, `10k`, `7.5M`.
///
/// Each unit is tried with one decimal, then rounded to a whole number; the
/// first form that fits wins. Values past the largest unit fall back to
/// exponent notation.
pub fn format_axis_value(value: f64) -> String {
    const UNITS: [(f64, &str); 4] = [(1.0, ""), (1e3, "k"), (1e6, "M"), (1e9, "G")];
    for (div, suffix) in UNITS {
        let scaled = value / div;
        let tenths = (scaled * 10.0).round() / 10.0;
        let precise = if tenths.fract() == 0.0 {
            format!("{tenths:.0}{suffix}")
        } else {
            format!("{tenths:.1}{suffix}")
        };
        if precise.chars().count() <= AXIS_GUTTER {
            return precise;
        }
        let whole = format!("{:.0}{suffix}", scaled.round());
        if whole.chars().count() <= AXIS_GUTTER {
            return whole;
        }
    }
    format!("{value:.0e}")
}

/// The five axis values 0, M/4, M/2, 3M/4, M.
pub fn axis_values(scale_max: f64) -> [f64; AXIS_LABELS] {
    let max = sanitize_scale(scale_max);
    std::array::from_fn(|i| max * i as f64 / (AXIS_LABELS - 1) as f64)
}

/// Grid row of axis label `i` for a graph of height `graph_height`.
fn axis_row(i: usize, graph_height: usize) -> usize {
    1 + graph_height - i * graph_height / (AXIS_LABELS - 1)
}

fn draw_axis(grid: &mut Grid, scale_max: f64, graph_height: usize) {
    let sep_col = AXIS_WIDTH - 1;
    for row in 1..=graph_height + 1 {
        grid.put(row, sep_col, '|', CellStyle::Plain);
    }
    for (i, value) in axis_values(scale_max).iter().enumerate() {
        let text = format!(
            "{:>width$}{AXIS_SEPARATOR}",
            format_axis_value(*value),
            width = AXIS_GUTTER
        );
        grid.put_str(axis_row(i, graph_height), 0, &text, CellStyle::Plain);
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Draw a bar graph of `window` into a grid the size of `region`.
///
/// Only the newest `region.plot_width()` samples are drawn; older ones scroll
/// off the left edge. Each bar is colored by classifying its own sample.
pub fn render_graph(
    policy: &ThresholdPolicy,
    window: Window<'_>,
    region: Region,
    scale_max: f64,
    label: &str,
) -> Grid {
    let mut grid = Grid::new(region.height, region.width);
    if region.height == 0 || region.width == 0 {
        return grid;
    }

    grid.put_str(0, 0, label, CellStyle::Bold);
    if region.height < CHROME_ROWS {
        return grid;
    }

    let graph_height = region.graph_height();
    draw_axis(&mut grid, scale_max, graph_height);

    let bars = scale_bars(
        policy,
        window,
        region.plot_width(),
        scale_max,
        graph_height,
    );
    for (i, bar) in bars.iter().enumerate() {
        let col = AXIS_WIDTH + i;
        for level in 0..bar.height {
            grid.put(
                1 + graph_height - level,
                col,
                BAR_GLYPH,
                CellStyle::Severity(bar.severity),
            );
        }
    }

    grid
}

/// Panel title: `"CO2 Level (ppm): 1412"`, or `"... : --"` before any data.
pub fn caption(channel: &Channel) -> String {
    let spec = channel.spec();
    let head = if spec.unit.is_empty() {
        spec.label.to_string()
    } else {
        format!("{} ({})", spec.label, spec.unit)
    };
    match channel.latest() {
        Some(v) => format!("{head}: {}", format_reading(v)),
        None => format!("{head}: --"),
    }
}

/// Readings print as integers when whole and with one decimal otherwise.
pub fn format_reading(value: f64) -> String {
    if (value - value.round()).abs() < 1e-9 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}

/// Render a channel's recent history into `region`.
pub fn render_channel(channel: &Channel, region: Region) -> Grid {
    let spec = channel.spec();
    render_graph(
        &spec.policy,
        channel.recent(region.plot_width()),
        region,
        spec.scale_max,
        &caption(channel),
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::ChannelSpec;
    use crate::history::{History, Retention};
    use crate::severity::{BandedPolicy, TemperaturePolicy};

    fn co2() -> ThresholdPolicy {
        ThresholdPolicy::Banded(BandedPolicy::co2())
    }

    fn history(values: &[f64]) -> History {
        let mut h = History::new(Retention::Unbounded);
        for &v in values {
            h.push(v);
        }
        h
    }

    /// Height of the bar drawn in plot column `i`.
    fn drawn_height(grid: &Grid, i: usize) -> usize {
        (0..grid.rows())
            .filter(|&r| grid.get(r, AXIS_WIDTH + i).is_some_and(|c| c.ch == BAR_GLYPH))
            .count()
    }

    // -----------------------------------------------------------------------
    // bar_height
    // -----------------------------------------------------------------------

    #[test]
    fn test_bar_height_endpoints() {
        assert_eq!(bar_height(0.0, 2000.0, 10), 0);
        assert_eq!(bar_height(2000.0, 2000.0, 10), 10);
        assert_eq!(bar_height(50.0, 50.0, 7), 7);
    }

    #[test]
    fn test_bar_height_clamps() {
        assert_eq!(bar_height(-12.0, 50.0, 10), 0);
        assert_eq!(bar_height(9000.0, 2000.0, 10), 10);
        assert_eq!(bar_height(f64::INFINITY, 2000.0, 10), 10);
        assert_eq!(bar_height(f64::NAN, 2000.0, 10), 0);
    }

    #[test]
    fn test_bar_height_monotonic() {
        let mut prev = 0;
        for step in 0..=2500 {
            let h = bar_height(step as f64, 2000.0, 13);
            assert!(h >= prev, "height dropped at {step}");
            assert!(h <= 13);
            prev = h;
        }
        assert_eq!(prev, 13);
    }

    #[test]
    fn test_bar_height_zero_graph() {
        assert_eq!(bar_height(2000.0, 2000.0, 0), 0);
    }

    #[test]
    fn test_bar_height_bad_scale_is_clamped() {
        assert_eq!(bar_height(0.5, 0.0, 10), 5);
        assert_eq!(bar_height(0.5, -100.0, 10), 5);
        assert_eq!(bar_height(0.5, f64::NAN, 10), 5);
    }

    // -----------------------------------------------------------------------
    // scale_bars
    // -----------------------------------------------------------------------

    #[test]
    fn test_co2_scenario_heights_and_colors() {
        let h = history(&[400.0, 600.0, 1100.0, 1600.0, 2100.0]);
        let bars = scale_bars(&co2(), h.recent(100), 100, 2000.0, 10);
        let heights: Vec<usize> = bars.iter().map(|b| b.height).collect();
        let colors: Vec<Severity> = bars.iter().map(|b| b.severity).collect();
        assert_eq!(heights, vec![2, 3, 5, 8, 10]);
        assert_eq!(
            colors,
            vec![
                Severity::Normal,
                Severity::Low,
                Severity::Elevated,
                Severity::High,
                Severity::Critical
            ]
        );
    }

    #[test]
    fn test_scale_bars_truncates_to_newest() {
        let values: Vec<f64> = (0..50).map(|v| v as f64 * 10.0).collect();
        let h = history(&values);
        let bars = scale_bars(&co2(), h.recent(50), 8, 2000.0, 200);
        assert_eq!(bars.len(), 8);
        let expected: Vec<usize> = (42..50).map(|v| v as usize).collect();
        let got: Vec<usize> = bars.iter().map(|b| b.height).collect();
        assert_eq!(got, expected);
    }

    // -----------------------------------------------------------------------
    // Axis
    // -----------------------------------------------------------------------

    #[test]
    fn test_axis_values() {
        assert_eq!(axis_values(2000.0), [0.0, 500.0, 1000.0, 1500.0, 2000.0]);
        assert_eq!(axis_values(50.0), [0.0, 12.5, 25.0, 37.5, 50.0]);
    }

    #[test]
    fn test_format_axis_value_fits_gutter() {
        assert_eq!(format_axis_value(0.0), "0");
        assert_eq!(format_axis_value(12.5), "12.5");
        assert_eq!(format_axis_value(2000.0), "2000");
        assert_eq!(format_axis_value(10_000.0), "10k");
        assert_eq!(format_axis_value(2500.5), "2501");
        for v in [1.0, 99.9, 375.0, 12_345.0, 250_000.0, 7_500_000.0, 1e15] {
            assert!(format_axis_value(v).chars().count() <= AXIS_GUTTER, "{v}");
        }
    }

    #[test]
    fn test_format_axis_value_keeps_magnitude() {
        assert_eq!(format_axis_value(9_999.5), "10k");
        assert_eq!(format_axis_value(12_345.0), "12k");
        assert_eq!(format_axis_value(37_500.0), "38k");
        assert_eq!(format_axis_value(250_000.0), "250k");
        assert_eq!(format_axis_value(7_500_000.0), "7.5M");
        assert_eq!(format_axis_value(99_999_999.0), "100M");
        assert_eq!(format_axis_value(2.5e9), "2.5G");
        assert_eq!(format_axis_value(1e15), "1e15");
    }

    #[test]
    fn test_axis_labels_rows() {
        let h = history(&[]);
        let grid = render_graph(&co2(), h.recent(10), Region::new(17, 30), 2000.0, "CO2");
        // graph height 15, same placement as the classic 15-row CO2 graph
        assert_eq!(grid.row_text(1), "2000 |");
        assert_eq!(grid.row_text(1 + 15 - 11), "1500 |");
        assert_eq!(grid.row_text(1 + 15 - 7), "1000 |");
        assert_eq!(grid.row_text(1 + 15 - 3), " 500 |");
        assert_eq!(grid.row_text(16), "   0 |");
        assert_eq!(grid.row_text(2), "     |");
    }

    // -----------------------------------------------------------------------
    // render_graph
    // -----------------------------------------------------------------------

    #[test]
    fn test_label_on_first_row() {
        let h = history(&[500.0]);
        let grid = render_graph(&co2(), h.recent(10), Region::new(12, 40), 2000.0, "CO2 Level");
        assert_eq!(grid.row_text(0), "CO2 Level");
        assert_eq!(grid.get(0, 0).unwrap().style, CellStyle::Bold);
    }

    #[test]
    fn test_full_height_bar_does_not_overflow() {
        let h = history(&[2000.0]);
        let region = Region::new(12, 20);
        let grid = render_graph(&co2(), h.recent(20), region, 2000.0, "x");
        assert_eq!(drawn_height(&grid, 0), region.graph_height());
        // top axis row and label row stay clear of the bar
        assert_ne!(grid.get(1, AXIS_WIDTH).unwrap().ch, BAR_GLYPH);
        assert_ne!(grid.get(0, AXIS_WIDTH).unwrap().ch, BAR_GLYPH);
        assert_eq!(grid.get(region.height - 1, AXIS_WIDTH).unwrap().ch, BAR_GLYPH);
    }

    #[test]
    fn test_single_point_draws_axis_and_one_bar() {
        let h = history(&[1000.0]);
        let grid = render_graph(&co2(), h.recent(34), Region::new(12, 40), 2000.0, "x");
        assert_eq!(drawn_height(&grid, 0), 5);
        assert_eq!(drawn_height(&grid, 1), 0);
        assert_eq!(grid.row_text(11), "   0 |#");
    }

    #[test]
    fn test_zero_graph_height_draws_axis_and_label_only() {
        let h = history(&[2000.0, 1500.0]);
        let grid = render_graph(&co2(), h.recent(10), Region::new(2, 20), 2000.0, "CO2");
        assert_eq!(grid.row_text(0), "CO2");
        assert!(grid.row_text(1).ends_with('|'));
        assert!(grid.cells().all(|(_, _, c)| c.ch != BAR_GLYPH));
    }

    #[test]
    fn test_degenerate_regions_do_not_panic() {
        let h = history(&[1.0, 2.0, 3.0]);
        let empty = render_graph(&co2(), h.recent(3), Region::new(0, 0), 2000.0, "x");
        assert_eq!(empty.rows(), 0);
        let narrow = render_graph(&co2(), h.recent(3), Region::new(10, 3), 2000.0, "label");
        assert_eq!(narrow.row_text(0), "lab");
        assert!(narrow.cells().all(|(_, _, c)| c.ch != BAR_GLYPH));
        let one_row = render_graph(&co2(), h.recent(3), Region::new(1, 30), 2000.0, "x");
        assert_eq!(one_row.row_text(0), "x");
    }

    #[test]
    fn test_truncation_right_aligns_newest() {
        // plot width 4, history of 6 rising values
        let values = [100.0, 200.0, 300.0, 400.0, 500.0, 2000.0];
        let h = history(&values);
        let region = Region::new(22, AXIS_WIDTH + 4);
        let grid = render_graph(&co2(), h.recent(region.plot_width()), region, 2000.0, "x");
        let heights: Vec<usize> = (0..4).map(|i| drawn_height(&grid, i)).collect();
        assert_eq!(heights, vec![3, 4, 5, 20]);
    }

    #[test]
    fn test_per_bar_colors() {
        let h = history(&[540.0, 560.0]);
        let grid = render_graph(&co2(), h.recent(10), Region::new(12, 20), 2000.0, "x");
        let bottom = 11;
        assert_eq!(
            grid.get(bottom, AXIS_WIDTH).unwrap().style,
            CellStyle::Severity(Severity::Normal)
        );
        assert_eq!(
            grid.get(bottom, AXIS_WIDTH + 1).unwrap().style,
            CellStyle::Severity(Severity::Low)
        );
    }

    #[test]
    fn test_negative_temperature_draws_empty_bar() {
        let policy = ThresholdPolicy::Temperature(TemperaturePolicy::default());
        let h = history(&[-8.0, 22.0]);
        let grid = render_graph(&policy, h.recent(10), Region::new(12, 20), 50.0, "T");
        assert_eq!(drawn_height(&grid, 0), 0);
        assert_eq!(drawn_height(&grid, 1), 4);
    }

    // -----------------------------------------------------------------------
    // Channel helpers
    // -----------------------------------------------------------------------

    #[test]
    fn test_caption() {
        let mut ch = Channel::new(ChannelSpec::co2(), Retention::Unbounded);
        assert_eq!(caption(&ch), "CO2 Level (ppm): --");
        ch.push(612.0);
        assert_eq!(caption(&ch), "CO2 Level (ppm): 612");
        let mut voc = Channel::new(ChannelSpec::voc_index(), Retention::Unbounded);
        voc.push(101.34);
        assert_eq!(caption(&voc), "VOC Index: 101.3");
    }

    #[test]
    fn test_render_channel_uses_plot_width() {
        let mut ch = Channel::new(ChannelSpec::co2(), Retention::Unbounded);
        for v in 0..100 {
            ch.push(v as f64 * 20.0);
        }
        let region = Region::new(12, AXIS_WIDTH + 10);
        let grid = render_channel(&ch, region);
        // the newest sample (1980 ppm) is in the last column
        assert_eq!(drawn_height(&grid, 9), 9);
        assert_eq!(
            grid.get(region.height - 1, AXIS_WIDTH + 9).unwrap().style,
            CellStyle::Severity(Severity::High)
        );
    }
}
