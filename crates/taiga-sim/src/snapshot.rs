//! Immutable per-tick state snapshots for the renderer boundary.

use taiga_core::{SessionStatus, TickId};
use taiga_grid::Cell;

/// Read-only copy of everything a renderer or controller needs.
///
/// Published once per tick; consumers never see partially-updated state
/// and cannot mutate the simulation through it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    /// Tick this snapshot was taken at.
    pub tick: TickId,
    /// Grid width (columns).
    pub width: u32,
    /// Grid height (rows).
    pub height: u32,
    /// Live tiger positions, in arena order.
    pub tigers: Vec<Cell>,
    /// Live human positions, in arena order.
    pub humans: Vec<Cell>,
    /// Remaining food cells.
    pub food: Vec<Cell>,
    /// The placed power-up cell, if one is on the grid.
    pub power_up: Option<Cell>,
    /// The four safe-zone corners.
    pub safe_zones: [Cell; 4],
    /// Points scored so far.
    pub score: u64,
    /// Lives remaining.
    pub lives: u32,
    /// Whether the power-up buff is currently active.
    pub power_active: bool,
    /// Session lifecycle state.
    pub status: SessionStatus,
}

impl Snapshot {
    /// Whether the session ended with all lives lost.
    pub fn game_over(&self) -> bool {
        self.status == SessionStatus::Lost
    }

    /// Whether the session ended with every food cell collected.
    pub fn game_won(&self) -> bool {
        self.status == SessionStatus::Won
    }
}
