//! Rejection-sampling placement of food, power-ups, and agents.
//!
//! All placement draws from the session's seeded RNG, so spawn layouts
//! are reproducible. Every sampler is attempt-bounded: food degrades to
//! a partial set, the power-up reports "no placement available", and
//! agent placement fails loudly — nothing retries forever.

use std::error::Error;
use std::fmt;

use indexmap::IndexSet;
use rand::Rng;
use tracing::warn;

use taiga_grid::{Cell, Grid};

/// Upper bound on rejection-sampling attempts for one placement batch.
pub const MAX_SPAWN_ATTEMPTS: u32 = 1000;

/// Errors from agent placement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SpawnError {
    /// The attempt bound was exhausted before every agent found a free
    /// cell.
    Saturated {
        /// Agents requested.
        requested: usize,
        /// Agents actually placed.
        placed: usize,
    },
}

impl fmt::Display for SpawnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Saturated { requested, placed } => write!(
                f,
                "placed {placed} of {requested} agents within {MAX_SPAWN_ATTEMPTS} attempts; \
                 grid saturated"
            ),
        }
    }
}

impl Error for SpawnError {}

/// A uniformly random cell on `grid`.
pub fn random_cell<R: Rng + ?Sized>(grid: &Grid, rng: &mut R) -> Cell {
    Cell::new(
        rng.random_range(0..grid.height() as i32),
        rng.random_range(0..grid.width() as i32),
    )
}

/// Place up to `count` food cells avoiding `occupied`.
///
/// Non-fatal on saturation: returns however many cells fit within the
/// attempt bound. The caller records the shortfall; a degraded spawn is
/// logged here at warn level.
pub fn spawn_food<R: Rng + ?Sized>(
    grid: &Grid,
    occupied: &IndexSet<Cell>,
    count: usize,
    rng: &mut R,
) -> IndexSet<Cell> {
    let mut food = IndexSet::new();
    let mut attempts = 0;
    while food.len() < count && attempts < MAX_SPAWN_ATTEMPTS {
        let cell = random_cell(grid, rng);
        if !occupied.contains(&cell) {
            food.insert(cell);
        }
        attempts += 1;
    }
    if food.len() < count {
        warn!(
            requested = count,
            placed = food.len(),
            "degraded food spawn: grid too saturated"
        );
    }
    food
}

/// Place the power-up on a cell avoiding `occupied`, or report that no
/// placement is available.
///
/// `None` is an expected outcome on a saturated grid, not an error; the
/// caller skips the spawn and may try again on a later tick.
pub fn spawn_power<R: Rng + ?Sized>(
    grid: &Grid,
    occupied: &IndexSet<Cell>,
    rng: &mut R,
) -> Option<Cell> {
    for _ in 0..MAX_SPAWN_ATTEMPTS {
        let cell = random_cell(grid, rng);
        if !occupied.contains(&cell) {
            return Some(cell);
        }
    }
    warn!("power-up placement unavailable: grid saturated");
    None
}

/// Place `count` agents on cells not in `occupied`, extending `occupied`
/// with each placement so later callers keep the cross-species
/// no-overlap guarantee.
///
/// # Errors
///
/// Returns [`SpawnError::Saturated`] when the attempt bound is exhausted
/// first. Placements made before the failure remain in `occupied`.
pub fn spawn_agents<R: Rng + ?Sized>(
    grid: &Grid,
    count: usize,
    occupied: &mut IndexSet<Cell>,
    rng: &mut R,
) -> Result<Vec<Cell>, SpawnError> {
    let mut placed = Vec::with_capacity(count);
    let mut attempts = 0;
    while placed.len() < count && attempts < MAX_SPAWN_ATTEMPTS {
        let cell = random_cell(grid, rng);
        if occupied.insert(cell) {
            placed.push(cell);
        }
        attempts += 1;
    }
    if placed.len() < count {
        return Err(SpawnError::Saturated {
            requested: count,
            placed: placed.len(),
        });
    }
    Ok(placed)
}
