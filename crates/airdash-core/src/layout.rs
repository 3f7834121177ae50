//! Panel layout.
//!
//! Splits the terminal into a header strip and a grid of panels, two columns
//! wide and as many rows as the assignments need. Below [`MIN_ROWS`] x
//! [`MIN_COLS`] no panels are produced at all.

use crate::graph::Region;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Smallest terminal height that gets panels.
pub const MIN_ROWS: usize = 30;

/// Smallest terminal width that gets panels.
pub const MIN_COLS: usize = 80;

/// Rows reserved above the panels for the status header.
pub const HEADER_ROWS: usize = 2;

/// Blank rows between panel rows.
pub const ROW_GAP: usize = 1;

/// Blank columns between the left and right halves.
pub const COLUMN_GAP: usize = 2;

/// Blank columns left of every panel. The axis labels start right after it.
pub const LEFT_MARGIN: usize = 1;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnHalf {
    Left,
    Right,
    /// Both halves, for a lone channel.
    Full,
}

impl ColumnHalf {
    fn covers(self, other: ColumnHalf) -> bool {
        self == ColumnHalf::Full || other == ColumnHalf::Full || self == other
    }
}

/// Where a channel wants to be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assignment {
    /// Index into the dashboard's channel list.
    pub channel: usize,
    pub row: usize,
    pub column: ColumnHalf,
}

/// Screen rectangle of one panel, in terminal cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelGeometry {
    pub row: usize,
    pub col: usize,
    pub height: usize,
    pub width: usize,
    pub channel: usize,
}

impl PanelGeometry {
    pub fn region(&self) -> Region {
        Region::new(self.height, self.width)
    }

    pub fn bottom(&self) -> usize {
        self.row + self.height
    }

    pub fn right(&self) -> usize {
        self.col + self.width
    }

    pub fn overlaps(&self, other: &PanelGeometry) -> bool {
        self.row < other.bottom()
            && other.row < self.bottom()
            && self.col < other.right()
            && other.col < self.right()
    }
}

/// The terminal is below the minimum size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TooSmall {
    pub rows: usize,
    pub cols: usize,
}

impl std::fmt::Display for TooSmall {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Terminal too small: {}x{} (need at least {}x{})",
            self.cols, self.rows, MIN_COLS, MIN_ROWS
        )
    }
}

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

/// Default arrangement: channels fill a 2-column grid row by row; a single
/// channel takes the full width.
pub fn default_assignments(channel_count: usize) -> Vec<Assignment> {
    if channel_count == 1 {
        return vec![Assignment {
            channel: 0,
            row: 0,
            column: ColumnHalf::Full,
        }];
    }
    (0..channel_count)
        .map(|i| Assignment {
            channel: i,
            row: i / 2,
            column: if i % 2 == 0 {
                ColumnHalf::Left
            } else {
                ColumnHalf::Right
            },
        })
        .collect()
}

/// Keep the assignments whose slot is still free, in order.
fn resolve_collisions(assignments: &[Assignment]) -> Vec<Assignment> {
    let mut kept: Vec<Assignment> = Vec::with_capacity(assignments.len());
    for a in assignments {
        let taken = kept
            .iter()
            .any(|k| k.row == a.row && k.column.covers(a.column));
        if taken {
            log::debug!(
                "dropping panel for channel {} at row {} ({:?}): slot taken",
                a.channel,
                a.row,
                a.column
            );
        } else {
            kept.push(*a);
        }
    }
    kept
}

/// Most grid rows that fit in `body_rows` with one-row panels.
fn max_grid_rows(body_rows: usize) -> usize {
    (body_rows + ROW_GAP) / (1 + ROW_GAP)
}

/// Compute panel rectangles for a `rows` x `cols` terminal. Assignments
/// whose row cannot fit are dropped.
pub fn compute_layout(
    rows: usize,
    cols: usize,
    assignments: &[Assignment],
) -> Result<Vec<PanelGeometry>, TooSmall> {
    if rows < MIN_ROWS || cols < MIN_COLS {
        return Err(TooSmall { rows, cols });
    }

    let body_rows = rows - HEADER_ROWS;
    let kept: Vec<Assignment> = resolve_collisions(assignments)
        .into_iter()
        .filter(|a| {
            let fits = a.row < max_grid_rows(body_rows);
            if !fits {
                log::debug!(
                    "dropping panel for channel {} at row {} ({:?}): below the last line",
                    a.channel,
                    a.row,
                    a.column
                );
            }
            fits
        })
        .collect();
    let Some(grid_rows) = kept.iter().map(|a| a.row + 1).max() else {
        return Ok(Vec::new());
    };

    // grid_rows <= max_grid_rows(body_rows), so every panel is at least one
    // row tall and the last one ends on or above the last line.
    let gaps = ROW_GAP * (grid_rows - 1);
    let panel_height = (body_rows - gaps) / grid_rows;

    let usable_width = cols - LEFT_MARGIN;
    let half_width = (usable_width - COLUMN_GAP) / 2;

    Ok(kept
        .iter()
        .map(|a| {
            let (col, width) = match a.column {
                ColumnHalf::Left => (LEFT_MARGIN, half_width),
                ColumnHalf::Right => (LEFT_MARGIN + half_width + COLUMN_GAP, half_width),
                ColumnHalf::Full => (LEFT_MARGIN, usable_width),
            };
            PanelGeometry {
                row: HEADER_ROWS + a.row * (panel_height + ROW_GAP),
                col,
                height: panel_height,
                width,
                channel: a.channel,
            }
        })
        .collect())
}
