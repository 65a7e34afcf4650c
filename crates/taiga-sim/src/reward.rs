//! The reward model: pure, stateless shaping functions.
//!
//! Recomputed every decision step from before/after positions. All terms
//! are additive, never exclusive. Degenerate nearest-entity results
//! (empty candidate sets collapse to the query point) are deliberately
//! not special-cased here; they fall out of the same arithmetic.

use indexmap::IndexSet;

use taiga_grid::{Cell, Grid};

/// Per-step cost applied to every human decision.
pub const HUMAN_STEP_COST: f32 = -0.1;
/// Bonus when the human's new cell holds food.
pub const HUMAN_FOOD_BONUS: f32 = 10.0;
/// Bonus when the distance to the nearest food strictly decreased.
pub const HUMAN_APPROACH_BONUS: f32 = 1.0;
/// Penalty when the nearest tiger ends up within [`HUMAN_DANGER_RADIUS`].
pub const HUMAN_DANGER_PENALTY: f32 = -5.0;
/// Manhattan radius at which tiger proximity is penalized.
pub const HUMAN_DANGER_RADIUS: u32 = 2;

/// Per-step cost applied to every tiger decision.
pub const TIGER_STEP_COST: f32 = -0.05;
/// Bonus while the tiger sits within [`TIGER_GUARD_RADIUS`] of food.
pub const TIGER_GUARD_BONUS: f32 = 2.0;
/// Manhattan radius at which food guarding is rewarded.
pub const TIGER_GUARD_RADIUS: u32 = 2;
/// Bonus when the distance to the nearest human strictly decreased.
pub const TIGER_PURSUIT_BONUS: f32 = 2.0;
/// Flat bonus per step while the power-up buff is active.
pub const TIGER_BUFF_BONUS: f32 = 1.0;

/// Shaped reward for a human move from `old_pos` to `new_pos`.
///
/// The nearest-food reference is re-derived from each endpoint, so the
/// approach bonus compares against whichever food was closest at the
/// time rather than tracking one fixed target.
pub fn human_reward(
    grid: &Grid,
    old_pos: Cell,
    new_pos: Cell,
    food: &IndexSet<Cell>,
    tigers: &[Cell],
) -> f32 {
    let mut reward = HUMAN_STEP_COST;
    if food.contains(&new_pos) {
        reward += HUMAN_FOOD_BONUS;
    }
    let before = old_pos.manhattan(grid.nearest(old_pos, food.iter().copied()));
    let after = new_pos.manhattan(grid.nearest(new_pos, food.iter().copied()));
    if after < before {
        reward += HUMAN_APPROACH_BONUS;
    }
    let nearest_tiger = grid.nearest(new_pos, tigers.iter().copied());
    if new_pos.manhattan(nearest_tiger) <= HUMAN_DANGER_RADIUS {
        reward += HUMAN_DANGER_PENALTY;
    }
    reward
}

/// Shaped reward for a tiger move from `old_pos` to `new_pos`.
///
/// The pursuit term fixes the human nearest to the *new* position and
/// compares the old and new distances to that one cell.
pub fn tiger_reward(
    grid: &Grid,
    old_pos: Cell,
    new_pos: Cell,
    humans: &[Cell],
    food: &IndexSet<Cell>,
    buff_active: bool,
) -> f32 {
    let mut reward = TIGER_STEP_COST;
    let nearest_food = grid.nearest(new_pos, food.iter().copied());
    if new_pos.manhattan(nearest_food) <= TIGER_GUARD_RADIUS {
        reward += TIGER_GUARD_BONUS;
    }
    let nearest_human = grid.nearest(new_pos, humans.iter().copied());
    if new_pos.manhattan(nearest_human) < old_pos.manhattan(nearest_human) {
        reward += TIGER_PURSUIT_BONUS;
    }
    if buff_active {
        reward += TIGER_BUFF_BONUS;
    }
    reward
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> Grid {
        Grid::new(20, 20).unwrap()
    }

    fn food(cells: &[Cell]) -> IndexSet<Cell> {
        cells.iter().copied().collect()
    }

    const EPS: f32 = 1e-6;

    // ── Human ───────────────────────────────────────────────────

    #[test]
    fn human_pays_step_cost_alone_when_nothing_applies() {
        let g = grid();
        // Moving away from the only food, tiger far away.
        let r = human_reward(
            &g,
            Cell::new(5, 5),
            Cell::new(5, 6),
            &food(&[Cell::new(5, 0)]),
            &[Cell::new(19, 19)],
        );
        assert!((r - HUMAN_STEP_COST).abs() < EPS);
    }

    #[test]
    fn human_terms_are_additive() {
        let g = grid();
        // New cell holds food (+10), distance decreased (+1), and a
        // tiger sits two cells away (−5): all three stack on the base.
        let r = human_reward(
            &g,
            Cell::new(5, 5),
            Cell::new(5, 4),
            &food(&[Cell::new(5, 4)]),
            &[Cell::new(5, 2)],
        );
        let expected =
            HUMAN_STEP_COST + HUMAN_FOOD_BONUS + HUMAN_APPROACH_BONUS + HUMAN_DANGER_PENALTY;
        assert!((r - expected).abs() < EPS, "got {r}, expected {expected}");
    }

    #[test]
    fn human_approach_bonus_requires_strict_decrease() {
        let g = grid();
        // Sidestep keeps the distance at 3: no bonus.
        let r = human_reward(
            &g,
            Cell::new(5, 5),
            Cell::new(4, 5),
            &food(&[Cell::new(3, 7)]),
            &[Cell::new(19, 19)],
        );
        assert!((r - (HUMAN_STEP_COST + HUMAN_APPROACH_BONUS)).abs() < EPS);
        let r = human_reward(
            &g,
            Cell::new(5, 5),
            Cell::new(6, 5),
            &food(&[Cell::new(4, 6)]),
            &[Cell::new(19, 19)],
        );
        assert!((r - HUMAN_STEP_COST).abs() < EPS);
    }

    #[test]
    fn human_danger_fires_at_radius_boundary() {
        let g = grid();
        let base = Cell::new(10, 10);
        let close = human_reward(&g, base, base, &food(&[]), &[Cell::new(10, 12)]);
        assert!((close - (HUMAN_STEP_COST + HUMAN_DANGER_PENALTY)).abs() < EPS);
        let safe = human_reward(&g, base, base, &food(&[]), &[Cell::new(10, 13)]);
        assert!((safe - HUMAN_STEP_COST).abs() < EPS);
    }

    #[test]
    fn human_empty_food_gives_no_approach_bonus() {
        let g = grid();
        // nearest() collapses to the query point on both endpoints, so
        // both distances are zero and the bonus cannot fire.
        let r = human_reward(
            &g,
            Cell::new(5, 5),
            Cell::new(5, 6),
            &food(&[]),
            &[Cell::new(19, 19)],
        );
        assert!((r - HUMAN_STEP_COST).abs() < EPS);
    }

    // ── Tiger ───────────────────────────────────────────────────

    #[test]
    fn tiger_guard_bonus_at_radius() {
        let g = grid();
        let r = tiger_reward(
            &g,
            Cell::new(5, 5),
            Cell::new(5, 6),
            &[Cell::new(19, 0)],
            &food(&[Cell::new(5, 8)]),
            false,
        );
        assert!((r - (TIGER_STEP_COST + TIGER_GUARD_BONUS)).abs() < EPS);
    }

    #[test]
    fn tiger_pursuit_requires_strict_decrease() {
        let g = grid();
        let humans = [Cell::new(5, 9)];
        let closing = tiger_reward(
            &g,
            Cell::new(5, 5),
            Cell::new(5, 6),
            &humans,
            &food(&[]),
            false,
        );
        // Empty food collapses to the new position: distance zero, so
        // the guard bonus rides along.
        let expected = TIGER_STEP_COST + TIGER_GUARD_BONUS + TIGER_PURSUIT_BONUS;
        assert!((closing - expected).abs() < EPS);

        let retreating = tiger_reward(
            &g,
            Cell::new(5, 6),
            Cell::new(5, 5),
            &humans,
            &food(&[]),
            false,
        );
        assert!((retreating - (TIGER_STEP_COST + TIGER_GUARD_BONUS)).abs() < EPS);
    }

    #[test]
    fn tiger_buff_adds_flat_bonus() {
        let g = grid();
        let quiet = tiger_reward(
            &g,
            Cell::new(0, 0),
            Cell::new(0, 1),
            &[Cell::new(0, 0)],
            &food(&[Cell::new(19, 19)]),
            false,
        );
        let buffed = tiger_reward(
            &g,
            Cell::new(0, 0),
            Cell::new(0, 1),
            &[Cell::new(0, 0)],
            &food(&[Cell::new(19, 19)]),
            true,
        );
        assert!((buffed - quiet - TIGER_BUFF_BONUS).abs() < EPS);
    }
}
