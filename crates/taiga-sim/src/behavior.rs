//! Movement decisions and discretized observations.
//!
//! Everything here is a pure function of positions. The scripted tiger
//! selector is deliberately separate from the learning machinery in
//! [`session`](crate::session): the policy tables observe every
//! transition but do not yet drive movement, and keeping the selector
//! isolated lets a future variant swap in policy-driven movement without
//! touching reward or update code.

use indexmap::IndexSet;
use smallvec::SmallVec;

use taiga_grid::{optimal_step, Cell, Dir, Grid};
use taiga_policy::bucket;

// ── Observations ───────────────────────────────────────────────────

/// Discretized observation for a human: bucketed offsets to the nearest
/// food and the nearest tiger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HumanState {
    /// Row offset to the nearest food, bucketed to `[-2, 2]`.
    pub food_dx: i8,
    /// Column offset to the nearest food, bucketed.
    pub food_dy: i8,
    /// Row offset to the nearest tiger, bucketed.
    pub tiger_dx: i8,
    /// Column offset to the nearest tiger, bucketed.
    pub tiger_dy: i8,
}

impl HumanState {
    /// Observe from `pos` against previously-resolved nearest cells.
    ///
    /// The nearest references may predate the move that produced `pos`;
    /// the decision step resolves them once and reuses them for the
    /// post-move observation.
    pub fn observe(pos: Cell, nearest_food: Cell, nearest_tiger: Cell) -> HumanState {
        HumanState {
            food_dx: bucket(nearest_food.x - pos.x),
            food_dy: bucket(nearest_food.y - pos.y),
            tiger_dx: bucket(nearest_tiger.x - pos.x),
            tiger_dy: bucket(nearest_tiger.y - pos.y),
        }
    }
}

/// Discretized observation for a tiger: bucketed offsets to the nearest
/// human and the nearest food.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TigerState {
    /// Row offset to the nearest human, bucketed to `[-2, 2]`.
    pub human_dx: i8,
    /// Column offset to the nearest human, bucketed.
    pub human_dy: i8,
    /// Row offset to the nearest food, bucketed.
    pub food_dx: i8,
    /// Column offset to the nearest food, bucketed.
    pub food_dy: i8,
}

impl TigerState {
    /// Observe from `pos` against previously-resolved nearest cells.
    pub fn observe(pos: Cell, nearest_human: Cell, nearest_food: Cell) -> TigerState {
        TigerState {
            human_dx: bucket(nearest_human.x - pos.x),
            human_dy: bucket(nearest_human.y - pos.y),
            food_dx: bucket(nearest_food.x - pos.x),
            food_dy: bucket(nearest_food.y - pos.y),
        }
    }
}

// ── Tiger movement ─────────────────────────────────────────────────

/// Scripted tiger targeting: attack the nearest human when it is within
/// `attack_radius`, otherwise guard the nearest food.
///
/// With no humans on the grid the nearest-human query collapses to
/// `pos` itself, which reads as distance zero and parks the tiger.
pub fn tiger_target(
    pos: Cell,
    nearest_human: Cell,
    nearest_food: Cell,
    attack_radius: u32,
) -> Cell {
    if pos.manhattan(nearest_human) <= attack_radius {
        nearest_human
    } else {
        nearest_food
    }
}

/// The single Manhattan-optimal unit move from `pos` toward `target`.
pub fn scripted_step(pos: Cell, target: Cell) -> (i32, i32) {
    optimal_step(target.x - pos.x, target.y - pos.y)
}

// ── Human movement ─────────────────────────────────────────────────

/// In-bounds moves whose destination keeps the nearest tiger strictly
/// farther than one step away, in canonical action order.
pub fn safe_moves(grid: &Grid, pos: Cell, tigers: &[Cell]) -> SmallVec<[Dir; 8]> {
    Dir::ALL
        .into_iter()
        .filter(|dir| {
            grid.step(pos, dir.offset()).is_some_and(|next| {
                tigers
                    .iter()
                    .map(|t| next.manhattan(*t))
                    .min()
                    .is_none_or(|d| d > 1)
            })
        })
        .collect()
}

/// Movement decision for a human heading toward `goal` (the nearest food
/// while foraging, the safe-zone corner while retreating).
///
/// Picks the safe move minimizing the Manhattan distance to `goal`,
/// first-minimum in canonical order. When no safe move exists, falls
/// back to the optimal step toward `goal` even if unsafe.
pub fn human_move(grid: &Grid, pos: Cell, goal: Cell, tigers: &[Cell]) -> (i32, i32) {
    let mut best: Option<((i32, i32), u32)> = None;
    for dir in safe_moves(grid, pos, tigers) {
        let offset = dir.offset();
        let dist = pos.offset(offset.0, offset.1).manhattan(goal);
        match best {
            Some((_, d)) if dist >= d => {}
            _ => best = Some((offset, dist)),
        }
    }
    best.map_or_else(|| scripted_step(pos, goal), |(offset, _)| offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> Grid {
        Grid::new(20, 20).unwrap()
    }

    // ── Observations ────────────────────────────────────────────

    #[test]
    fn observations_bucket_offsets() {
        let s = HumanState::observe(Cell::new(5, 5), Cell::new(9, 5), Cell::new(4, 3));
        assert_eq!((s.food_dx, s.food_dy), (2, 0));
        assert_eq!((s.tiger_dx, s.tiger_dy), (-1, -2));

        let t = TigerState::observe(Cell::new(0, 0), Cell::new(0, 1), Cell::new(19, 19));
        assert_eq!((t.human_dx, t.human_dy), (0, 1));
        assert_eq!((t.food_dx, t.food_dy), (2, 2));
    }

    #[test]
    fn human_and_tiger_states_are_distinct_types() {
        // Same raw tuple, different key spaces: the two policy tables
        // can never exchange entries.
        let h = HumanState::observe(Cell::new(0, 0), Cell::new(1, 1), Cell::new(2, 2));
        let t = TigerState::observe(Cell::new(0, 0), Cell::new(1, 1), Cell::new(2, 2));
        assert_eq!((h.food_dx, h.food_dy), (t.human_dx, t.human_dy));
    }

    // ── Tiger targeting ─────────────────────────────────────────

    #[test]
    fn tiger_attacks_within_radius_else_guards() {
        let pos = Cell::new(10, 10);
        let human = Cell::new(10, 13);
        let food = Cell::new(0, 0);
        assert_eq!(tiger_target(pos, human, food, 3), human);
        let far_human = Cell::new(10, 14);
        assert_eq!(tiger_target(pos, far_human, food, 3), food);
    }

    #[test]
    fn scripted_step_resolves_rows_first() {
        assert_eq!(scripted_step(Cell::new(5, 5), Cell::new(9, 9)), (1, 0));
        assert_eq!(scripted_step(Cell::new(5, 5), Cell::new(5, 2)), (0, -1));
        assert_eq!(scripted_step(Cell::new(5, 5), Cell::new(5, 5)), (0, 0));
    }

    // ── Safe moves ──────────────────────────────────────────────

    #[test]
    fn safe_moves_exclude_cells_adjacent_to_tigers() {
        let g = grid();
        // Tiger directly east: every move landing within distance 1 of
        // it is unsafe, including staying on the east side.
        let moves = safe_moves(&g, Cell::new(10, 10), &[Cell::new(10, 12)]);
        for dir in &moves {
            let next = g.step(Cell::new(10, 10), dir.offset()).unwrap();
            assert!(next.manhattan(Cell::new(10, 12)) > 1, "{dir:?} is unsafe");
        }
        assert!(!moves.contains(&Dir::East));
        assert!(moves.contains(&Dir::West));
    }

    #[test]
    fn safe_moves_respect_bounds() {
        let g = grid();
        let moves = safe_moves(&g, Cell::new(0, 0), &[Cell::new(19, 19)]);
        // Only south, east, and south-east stay on the grid.
        assert_eq!(moves.len(), 3);
        assert!(moves.contains(&Dir::South));
        assert!(moves.contains(&Dir::East));
        assert!(moves.contains(&Dir::SouthEast));
    }

    #[test]
    fn no_tigers_means_everything_is_safe() {
        let g = grid();
        assert_eq!(safe_moves(&g, Cell::new(10, 10), &[]).len(), 8);
    }

    // ── Human movement ──────────────────────────────────────────

    #[test]
    fn human_moves_toward_goal_when_safe() {
        let g = grid();
        let mv = human_move(&g, Cell::new(5, 5), Cell::new(5, 8), &[Cell::new(19, 0)]);
        assert_eq!(mv, (0, 1));
    }

    #[test]
    fn human_tie_break_is_first_in_canonical_order() {
        let g = grid();
        // Diagonal goal: NE is the unique minimizer.
        let mv = human_move(&g, Cell::new(5, 5), Cell::new(3, 7), &[Cell::new(19, 0)]);
        assert_eq!(mv, (-1, 1));
        // Degenerate goal (own cell, e.g. no food left): the four
        // cardinals tie at distance 1 and N wins as first in order.
        let mv = human_move(&g, Cell::new(5, 5), Cell::new(5, 5), &[Cell::new(19, 0)]);
        assert_eq!(mv, (-1, 0));
    }

    #[test]
    fn human_falls_back_to_optimal_step_when_trapped() {
        let g = grid();
        // A tiger on the corner diagonal covers all three in-bounds
        // moves: no safe candidate remains.
        let pos = Cell::new(0, 0);
        let tigers = [Cell::new(1, 1)];
        assert!(safe_moves(&g, pos, &tigers).is_empty());
        let mv = human_move(&g, pos, Cell::new(0, 10), &tigers);
        assert_eq!(mv, (0, 1)); // optimal step toward the goal, unsafe or not
    }
}
