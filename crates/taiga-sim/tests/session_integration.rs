//! End-to-end session scenarios driven through the public API.

use taiga_core::{SessionStatus, SimTime, TickId};
use taiga_grid::Cell;
use taiga_sim::{Session, SessionConfig, WorldLayout};

fn config() -> SessionConfig {
    SessionConfig {
        // Park the power-up far in the future so scenarios stay exact.
        power_delay_ms: 600_000..=600_000,
        seed: 11,
        ..SessionConfig::default()
    }
}

fn layout(humans: &[Cell], tigers: &[Cell], food: &[Cell]) -> WorldLayout {
    WorldLayout {
        humans: humans.to_vec(),
        tigers: tigers.to_vec(),
        food: food.to_vec(),
    }
}

fn run_until(session: &mut Session, sim_ms: u64) {
    while session.now() < SimTime(sim_ms) && !session.status().is_terminal() {
        session.tick();
    }
}

// ── Catch scenario ─────────────────────────────────────────────────

#[test]
fn catch_decrements_lives_and_freezes_tiger() {
    // Tiger one row south of its prey; a second human keeps the world
    // alive after the catch.
    let mut session = Session::with_layout(
        config(),
        layout(
            &[Cell::new(5, 5), Cell::new(15, 15)],
            &[Cell::new(6, 5)],
            &[Cell::new(0, 10)],
        ),
    )
    .unwrap();

    // First tiger pass (200 ms): attack mode, optimal step north onto
    // the human. Humans have not moved yet (their first pass is 500 ms).
    run_until(&mut session, 200);
    let snap = session.snapshot();
    assert_eq!(snap.lives, 2, "catch must cost exactly one life");
    assert_eq!(snap.humans.len(), 1, "caught human leaves the world");
    assert_eq!(snap.humans[0], Cell::new(15, 15));
    assert_eq!(snap.tigers[0], Cell::new(5, 5));
    assert_eq!(session.metrics().catches, 1);
    let updates_at_catch = session.metrics().tiger_updates;
    assert!(updates_at_catch >= 1, "the catch tick still updates policy");

    // Digestion: 4000 ms with no movement and no policy updates, even
    // though tiger passes keep coming due.
    run_until(&mut session, 4100);
    assert_eq!(session.snapshot().tigers[0], Cell::new(5, 5));
    assert_eq!(session.metrics().tiger_updates, updates_at_catch);

    // Past the deadline the tiger hunts again.
    run_until(&mut session, 4400);
    assert!(session.metrics().tiger_updates > updates_at_catch);
}

// ── Food collection scenario ───────────────────────────────────────

#[test]
fn food_collection_scores_and_triggers_retreat() {
    let mut session = Session::with_layout(
        config(),
        layout(&[Cell::new(3, 4)], &[Cell::new(19, 19)], &[Cell::new(3, 3)]),
    )
    .unwrap();

    // First human pass (500 ms): one step west onto the food.
    run_until(&mut session, 500);
    let snap = session.snapshot();
    assert_eq!(snap.score, 10, "food is worth exactly 10 points");
    assert!(snap.food.is_empty(), "collected food leaves the set");
    assert_eq!(snap.humans[0], Cell::new(3, 3));
    assert_eq!(session.metrics().food_collected, 1);

    // The last food also ends the session, exactly once.
    assert_eq!(snap.status, SessionStatus::Won);
    assert!(snap.game_won());
    assert!(!snap.game_over());
}

#[test]
fn collection_tick_skips_policy_update() {
    let mut session = Session::with_layout(
        config(),
        layout(&[Cell::new(3, 4)], &[Cell::new(19, 19)], &[Cell::new(3, 3)]),
    )
    .unwrap();
    run_until(&mut session, 500);
    // The only human decision so far was the collection, which must not
    // close a SARSA pair.
    assert_eq!(session.metrics().human_updates, 0);
}

// ── Terminal latching ──────────────────────────────────────────────

#[test]
fn won_session_ignores_further_ticks() {
    let mut session = Session::with_layout(
        config(),
        layout(&[Cell::new(3, 4)], &[Cell::new(19, 19)], &[Cell::new(3, 3)]),
    )
    .unwrap();
    run_until(&mut session, 500);
    assert_eq!(session.status(), SessionStatus::Won);

    let frozen = session.snapshot();
    for _ in 0..10 {
        session.tick();
    }
    let after = session.snapshot();
    assert_eq!(after, frozen, "terminal sessions must not mutate");
    assert_eq!(after.tick, frozen.tick);
    assert_eq!(session.metrics().ticks, 5, "no-op calls are not ticks");
}

#[test]
fn lives_exhaustion_reports_game_over_once() {
    let cfg = SessionConfig {
        lives: 1,
        ..config()
    };
    let mut session = Session::with_layout(
        cfg,
        layout(&[Cell::new(5, 5)], &[Cell::new(6, 5)], &[Cell::new(0, 10)]),
    )
    .unwrap();

    run_until(&mut session, 200);
    let snap = session.snapshot();
    assert_eq!(snap.lives, 0);
    assert_eq!(snap.status, SessionStatus::Lost);
    assert!(snap.game_over());
    assert!(snap.humans.is_empty());
    assert!(!snap.food.is_empty(), "loss does not consume the food set");

    let frozen = session.snapshot();
    for _ in 0..10 {
        session.tick();
    }
    assert_eq!(session.snapshot(), frozen);
}

// ── Boundary containment ───────────────────────────────────────────

#[test]
fn every_agent_stays_in_bounds_for_a_long_run() {
    let mut session = Session::new(SessionConfig {
        seed: 99,
        ..config()
    })
    .unwrap();
    for _ in 0..2000 {
        session.tick();
        let snap = session.snapshot();
        for cell in snap.tigers.iter().chain(&snap.humans).chain(&snap.food) {
            assert!(
                (0..20).contains(&cell.x) && (0..20).contains(&cell.y),
                "out-of-bounds entity at {cell} on tick {}",
                snap.tick
            );
        }
        if snap.status.is_terminal() {
            break;
        }
    }
}

// ── Score and lives monotonicity ───────────────────────────────────

#[test]
fn score_never_decreases_and_lives_never_increase() {
    let mut session = Session::new(SessionConfig {
        seed: 4,
        ..config()
    })
    .unwrap();
    let mut last_score = 0;
    let mut last_lives = session.lives();
    for _ in 0..1500 {
        session.tick();
        let snap = session.snapshot();
        assert!(snap.score >= last_score);
        assert!(snap.lives <= last_lives);
        last_score = snap.score;
        last_lives = snap.lives;
        if snap.status.is_terminal() {
            break;
        }
    }
}

// ── Snapshot shape ─────────────────────────────────────────────────

#[test]
fn snapshot_carries_the_renderer_contract() {
    let session = Session::with_layout(
        config(),
        layout(
            &[Cell::new(1, 1)],
            &[Cell::new(10, 10)],
            &[Cell::new(2, 2), Cell::new(3, 3)],
        ),
    )
    .unwrap();
    let snap = session.snapshot();
    assert_eq!((snap.width, snap.height), (20, 20));
    assert_eq!(snap.tick, TickId(0));
    assert_eq!(snap.humans, vec![Cell::new(1, 1)]);
    assert_eq!(snap.tigers, vec![Cell::new(10, 10)]);
    assert_eq!(snap.food, vec![Cell::new(2, 2), Cell::new(3, 3)]);
    assert_eq!(snap.power_up, None);
    assert_eq!(
        snap.safe_zones,
        [
            Cell::new(0, 0),
            Cell::new(0, 19),
            Cell::new(19, 0),
            Cell::new(19, 19),
        ]
    );
    assert!(!snap.power_active);
}
