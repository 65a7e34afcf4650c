//! The session: single-threaded owner of all mutable world state.
//!
//! [`Session::tick`] advances the world one deterministic step: power-up
//! spawn, tiger pass, human pass, power-up pickup, buff expiry, win/loss
//! detection, then arena compaction. Passes run in a fixed total order
//! (tigers before humans, each in spawn order) so identical seeds give
//! identical runs.
//!
//! Learning note: tigers move by a scripted target-seeking step while
//! the SARSA machinery observes every transition in parallel. The
//! learned tiger policy does not drive behavior yet — swapping it in
//! changes emergent behavior, so the selector and the update live in
//! separate functions and must be exchanged explicitly, never merged.

use std::error::Error;
use std::fmt;

use indexmap::IndexSet;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use taiga_core::{SessionStatus, SimTime, Species, TickId};
use taiga_grid::{Cell, Dir, Grid};
use taiga_policy::PolicyTable;

use crate::agent::{AgentArena, AgentKind, HumanPhase, TigerPhase};
use crate::behavior::{self, HumanState, TigerState};
use crate::clock::SimClock;
use crate::config::{ConfigError, SessionConfig, WorldLayout};
use crate::metrics::SessionMetrics;
use crate::reward;
use crate::snapshot::Snapshot;
use crate::spawn::{self, SpawnError};

// ── SessionError ───────────────────────────────────────────────────

/// Errors from session construction or reset.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionError {
    /// Configuration or explicit layout validation failed.
    Config(ConfigError),
    /// Agent placement could not fit on the grid.
    Spawn(SpawnError),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Spawn(e) => write!(f, "spawn: {e}"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Spawn(e) => Some(e),
        }
    }
}

impl From<ConfigError> for SessionError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<SpawnError> for SessionError {
    fn from(e: SpawnError) -> Self {
        Self::Spawn(e)
    }
}

// ── Power-up state ─────────────────────────────────────────────────

/// Power-up lifecycle. The spawn delay is drawn once per world build;
/// after a pickup the delay has long expired, so a fresh power-up is
/// placed on the next spawn step.
#[derive(Clone, Copy, Debug)]
struct PowerUp {
    spawn_at: SimTime,
    placed: Option<Cell>,
    buff_until: Option<SimTime>,
}

// ── Session ────────────────────────────────────────────────────────

/// A complete simulation session.
///
/// Owns the grid, the agent arena, the food set, the power-up, score
/// and lives, both policy tables, and the seeded RNG. The tick loop is
/// the sole mutator; everything escapes as an immutable [`Snapshot`].
pub struct Session {
    config: SessionConfig,
    grid: Grid,
    clock: SimClock,
    tick: TickId,
    arena: AgentArena,
    food: IndexSet<Cell>,
    power: PowerUp,
    score: u64,
    lives: u32,
    status: SessionStatus,
    last_tiger_pass: SimTime,
    last_human_pass: SimTime,
    human_policy: PolicyTable<HumanState, Dir>,
    tiger_policy: PolicyTable<TigerState, Dir>,
    rng: ChaCha8Rng,
    metrics: SessionMetrics,
}

impl Session {
    /// Build a session with randomized populations and placements.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Config`] for invalid configuration and
    /// [`SessionError::Spawn`] when agent placement cannot fit.
    pub fn new(config: SessionConfig) -> Result<Session, SessionError> {
        config.validate()?;
        let grid = Grid::new(config.width, config.height).map_err(|_| ConfigError::EmptyGrid)?;
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let (layout, shortfall) = draw_layout(&config, &grid, &mut rng)?;
        let mut session = Session::assemble(config, grid, rng);
        session.metrics.food_spawn_shortfall += shortfall;
        session.populate(layout);
        Ok(session)
    }

    /// Build a session from an explicit [`WorldLayout`], for reproducible
    /// setups.
    ///
    /// # Errors
    ///
    /// As [`Session::new`], plus [`ConfigError::InvalidLayout`] when the
    /// layout places entities off-grid or overlaps agents.
    pub fn with_layout(
        config: SessionConfig,
        layout: WorldLayout,
    ) -> Result<Session, SessionError> {
        config.validate()?;
        let grid = Grid::new(config.width, config.height).map_err(|_| ConfigError::EmptyGrid)?;
        validate_layout(&grid, &layout)?;
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        let mut session = Session::assemble(config, grid, rng);
        session.populate(layout);
        Ok(session)
    }

    fn assemble(config: SessionConfig, grid: Grid, rng: ChaCha8Rng) -> Session {
        let lives = config.lives;
        Session {
            config,
            grid,
            clock: SimClock::new(),
            tick: TickId(0),
            arena: AgentArena::new(),
            food: IndexSet::new(),
            power: PowerUp {
                spawn_at: SimTime::ZERO,
                placed: None,
                buff_until: None,
            },
            score: 0,
            lives,
            status: SessionStatus::Running,
            last_tiger_pass: SimTime::ZERO,
            last_human_pass: SimTime::ZERO,
            human_policy: PolicyTable::new(&Dir::ALL),
            tiger_policy: PolicyTable::new(&Dir::ALL),
            rng,
            metrics: SessionMetrics::default(),
        }
    }

    /// Install a layout into an otherwise-reset world: food, power-up
    /// delay, then agents with their initial carried state/action pairs
    /// (humans first, then tigers — spawn order defines pass order).
    fn populate(&mut self, layout: WorldLayout) {
        self.food = layout.food.iter().copied().collect();
        let delay = self.rng.random_range(self.config.power_delay_ms.clone());
        self.power = PowerUp {
            spawn_at: SimTime(delay),
            placed: None,
            buff_until: None,
        };
        let epsilon = self.config.learning.epsilon;
        for &pos in &layout.humans {
            let nearest_food = self.grid.nearest(pos, self.food.iter().copied());
            let nearest_tiger = self.grid.nearest(pos, layout.tigers.iter().copied());
            let state = HumanState::observe(pos, nearest_food, nearest_tiger);
            let action = self.human_policy.select_action(state, epsilon, &mut self.rng);
            self.arena.spawn(
                pos,
                AgentKind::Human {
                    phase: HumanPhase::Foraging,
                    pending: (state, action),
                },
            );
        }
        for &pos in &layout.tigers {
            let nearest_human = self.grid.nearest(pos, layout.humans.iter().copied());
            let nearest_food = self.grid.nearest(pos, self.food.iter().copied());
            let state = TigerState::observe(pos, nearest_human, nearest_food);
            let action = self.tiger_policy.select_action(state, epsilon, &mut self.rng);
            self.arena.spawn(
                pos,
                AgentKind::Tiger {
                    phase: TigerPhase::Active,
                    pending: (state, action),
                },
            );
        }
    }

    // ── Accessors ──────────────────────────────────────────────

    /// The active configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The grid.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Current simulation time.
    pub fn now(&self) -> SimTime {
        self.clock.now()
    }

    /// Current tick.
    pub fn tick_id(&self) -> TickId {
        self.tick
    }

    /// Session lifecycle state.
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// Points scored so far.
    pub fn score(&self) -> u64 {
        self.score
    }

    /// Lives remaining.
    pub fn lives(&self) -> u32 {
        self.lives
    }

    /// Cumulative counters.
    pub fn metrics(&self) -> &SessionMetrics {
        &self.metrics
    }

    /// The human policy table. Persists across [`reset`](Session::reset).
    pub fn human_policy(&self) -> &PolicyTable<HumanState, Dir> {
        &self.human_policy
    }

    /// The tiger policy table. Persists across [`reset`](Session::reset).
    pub fn tiger_policy(&self) -> &PolicyTable<TigerState, Dir> {
        &self.tiger_policy
    }

    /// Read-only copy of the world for the renderer boundary.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            tick: self.tick,
            width: self.grid.width(),
            height: self.grid.height(),
            tigers: self.arena.positions(Species::Tiger),
            humans: self.arena.positions(Species::Human),
            food: self.food.iter().copied().collect(),
            power_up: self.power.placed,
            safe_zones: self.grid.safe_zones(),
            score: self.score,
            lives: self.lives,
            power_active: self.power.buff_until.is_some(),
            status: self.status,
        }
    }

    // ── Tick loop ──────────────────────────────────────────────

    /// Advance the simulation one tick. No-op once the session has
    /// ended.
    pub fn tick(&mut self) {
        if self.status.is_terminal() {
            return;
        }
        self.clock.advance(self.config.tick_ms);
        self.tick = TickId(self.tick.0 + 1);
        let now = self.clock.now();

        self.power_spawn_step(now);

        if now.since(self.last_tiger_pass) >= self.config.tiger_interval_ms {
            self.tiger_pass(now);
            self.last_tiger_pass = now;
        }
        if self.status == SessionStatus::Running {
            if now.since(self.last_human_pass) >= self.config.human_interval_ms {
                self.human_pass(now);
                self.last_human_pass = now;
            }
            self.power_pickup_step(now);
            self.power_expiry_step(now);
            if self.food.is_empty() {
                self.status = SessionStatus::Won;
                debug!(score = self.score, "session won: all food collected");
            }
        }
        self.arena.compact();
        self.metrics.ticks += 1;
    }

    /// Tear down and rebuild the world. Learned policy tables and
    /// cumulative metrics persist; everything else starts fresh.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Spawn`] when the fresh layout cannot be
    /// placed. The old world is already gone at that point.
    pub fn reset(&mut self) -> Result<(), SessionError> {
        let (layout, shortfall) = draw_layout(&self.config, &self.grid, &mut self.rng)?;
        self.metrics.food_spawn_shortfall += shortfall;
        self.arena = AgentArena::new();
        self.clock = SimClock::new();
        self.tick = TickId(0);
        self.score = 0;
        self.lives = self.config.lives;
        self.status = SessionStatus::Running;
        self.last_tiger_pass = SimTime::ZERO;
        self.last_human_pass = SimTime::ZERO;
        self.populate(layout);
        self.metrics.resets += 1;
        Ok(())
    }

    // ── Power-up steps ─────────────────────────────────────────

    fn power_spawn_step(&mut self, now: SimTime) {
        if self.power.placed.is_some() || now < self.power.spawn_at {
            return;
        }
        let mut occupied: IndexSet<Cell> = self.arena.iter().map(|a| a.pos).collect();
        occupied.extend(self.food.iter().copied());
        match spawn::spawn_power(&self.grid, &occupied, &mut self.rng) {
            Some(cell) => {
                self.power.placed = Some(cell);
                debug!(%cell, "power-up placed");
            }
            None => self.metrics.power_spawn_misses += 1,
        }
    }

    fn power_pickup_step(&mut self, now: SimTime) {
        let Some(cell) = self.power.placed else {
            return;
        };
        let picked = self
            .arena
            .iter()
            .any(|a| a.species() == Species::Tiger && a.pos == cell);
        if picked {
            self.power.placed = None;
            self.power.buff_until = Some(now.after(self.config.buff_ms));
            self.metrics.power_pickups += 1;
            debug!(%cell, "power-up collected: tiger buff active");
        }
    }

    fn power_expiry_step(&mut self, now: SimTime) {
        if let Some(until) = self.power.buff_until {
            if now > until {
                self.power.buff_until = None;
            }
        }
    }

    // ── Movement passes ────────────────────────────────────────

    /// One tiger movement pass in arena order. At most one catch per
    /// pass: the first capturing tiger ends the loop.
    fn tiger_pass(&mut self, now: SimTime) {
        self.metrics.tiger_passes += 1;
        let params = self.config.learning;
        for id in self.arena.ids(Species::Tiger) {
            let Some(agent) = self.arena.get(id) else {
                continue;
            };
            let AgentKind::Tiger { phase, pending } = agent.kind else {
                continue;
            };
            let old_pos = agent.pos;
            match phase {
                // Digesting tigers are skipped entirely: no movement,
                // no policy update.
                TigerPhase::Digesting { until } if now < until => continue,
                TigerPhase::Digesting { .. } => self.set_tiger_phase(id, TigerPhase::Active),
                TigerPhase::Active => {}
            }

            let humans = self.arena.positions(Species::Human);
            let nearest_human = self.grid.nearest(old_pos, humans.iter().copied());
            let nearest_food = self.grid.nearest(old_pos, self.food.iter().copied());
            let target = behavior::tiger_target(
                old_pos,
                nearest_human,
                nearest_food,
                self.config.attack_radius,
            );
            // The applied move is the scripted step, not the learned
            // action; the policy trains on the observed transition.
            let step = behavior::scripted_step(old_pos, target);
            let new_pos = self.grid.step(old_pos, step).unwrap_or(old_pos);
            if let Some(a) = self.arena.get_mut(id) {
                a.pos = new_pos;
            }

            let victim = self
                .arena
                .iter()
                .find(|a| a.species() == Species::Human && a.pos == new_pos)
                .map(|a| a.id);

            let r = reward::tiger_reward(
                &self.grid,
                old_pos,
                new_pos,
                &humans,
                &self.food,
                self.power.buff_until.is_some(),
            );
            let next_state = TigerState::observe(new_pos, nearest_human, nearest_food);
            let next_action = self
                .tiger_policy
                .select_action(next_state, params.epsilon, &mut self.rng);
            let (state, action) = pending;
            self.tiger_policy
                .update(state, action, r, next_state, next_action, &params);
            self.metrics.tiger_updates += 1;
            if let Some(a) = self.arena.get_mut(id) {
                if let AgentKind::Tiger { pending, .. } = &mut a.kind {
                    *pending = (next_state, next_action);
                }
            }

            if let Some(victim) = victim {
                self.set_tiger_phase(
                    id,
                    TigerPhase::Digesting {
                        until: now.after(self.config.digest_ms),
                    },
                );
                self.arena.mark_removed(victim);
                self.lives = self.lives.saturating_sub(1);
                self.metrics.catches += 1;
                debug!(tiger = %id, human = %victim, lives = self.lives, "human caught");
                if self.lives == 0 {
                    self.status = SessionStatus::Lost;
                    debug!(score = self.score, "session lost: out of lives");
                }
                break;
            }
        }
    }

    /// One human movement pass in arena order.
    fn human_pass(&mut self, now: SimTime) {
        self.metrics.human_passes += 1;
        let params = self.config.learning;
        let tigers = self.arena.positions(Species::Tiger);
        for id in self.arena.ids(Species::Human) {
            let Some(agent) = self.arena.get(id) else {
                continue;
            };
            let AgentKind::Human { phase, pending } = agent.kind else {
                continue;
            };
            let pos = agent.pos;

            if let HumanPhase::Retreating { target, since } = phase {
                if pos == target {
                    if now.since(since) < self.config.dwell_ms {
                        continue;
                    }
                    // Dwell complete: forage again within this pass.
                    self.set_human_phase(id, HumanPhase::Foraging);
                } else {
                    let mv = behavior::human_move(&self.grid, pos, target, &tigers);
                    let new_pos = self.grid.step(pos, mv).unwrap_or(pos);
                    if let Some(a) = self.arena.get_mut(id) {
                        a.pos = new_pos;
                    }
                    continue; // no reward or policy update while retreating
                }
            }

            let old_pos = pos;
            let nearest_food = self.grid.nearest(old_pos, self.food.iter().copied());
            let nearest_tiger = self.grid.nearest(old_pos, tigers.iter().copied());
            let mv = behavior::human_move(&self.grid, old_pos, nearest_food, &tigers);
            let new_pos = self.grid.step(old_pos, mv).unwrap_or(old_pos);
            if let Some(a) = self.arena.get_mut(id) {
                a.pos = new_pos;
            }

            if self.food.shift_remove(&new_pos) {
                self.score += 10;
                self.metrics.food_collected += 1;
                let corner = self.grid.nearest(new_pos, self.grid.safe_zones());
                self.set_human_phase(
                    id,
                    HumanPhase::Retreating {
                        target: corner,
                        since: now,
                    },
                );
                debug!(human = %id, cell = %new_pos, score = self.score, "food collected");
                // No update on the collection tick; the carried pair
                // stays pending through the retreat and resumes stale.
                continue;
            }

            let r = reward::human_reward(&self.grid, old_pos, new_pos, &self.food, &tigers);
            let next_state = HumanState::observe(new_pos, nearest_food, nearest_tiger);
            let next_action = self
                .human_policy
                .select_action(next_state, params.epsilon, &mut self.rng);
            let (state, action) = pending;
            self.human_policy
                .update(state, action, r, next_state, next_action, &params);
            self.metrics.human_updates += 1;
            if let Some(a) = self.arena.get_mut(id) {
                if let AgentKind::Human { pending, .. } = &mut a.kind {
                    *pending = (next_state, next_action);
                }
            }
        }
    }

    fn set_tiger_phase(&mut self, id: taiga_core::AgentId, new_phase: TigerPhase) {
        if let Some(a) = self.arena.get_mut(id) {
            if let AgentKind::Tiger { phase, .. } = &mut a.kind {
                *phase = new_phase;
            }
        }
    }

    fn set_human_phase(&mut self, id: taiga_core::AgentId, new_phase: HumanPhase) {
        if let Some(a) = self.arena.get_mut(id) {
            if let AgentKind::Human { phase, .. } = &mut a.kind {
                *phase = new_phase;
            }
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("tick", &self.tick)
            .field("now", &self.clock.now())
            .field("status", &self.status)
            .field("score", &self.score)
            .field("lives", &self.lives)
            .finish()
    }
}

// ── World building helpers ─────────────────────────────────────────

/// Draw a randomized layout: human count and cells, tiger count and
/// cells, then food. Returns the layout plus the food shortfall (cells
/// requested but not placed).
fn draw_layout(
    config: &SessionConfig,
    grid: &Grid,
    rng: &mut ChaCha8Rng,
) -> Result<(WorldLayout, u64), SpawnError> {
    let num_humans = rng.random_range(config.humans.clone()) as usize;
    let mut occupied = IndexSet::new();
    let humans = spawn::spawn_agents(grid, num_humans, &mut occupied, rng)?;
    let num_tigers = rng.random_range(config.tigers.clone()) as usize;
    let tigers = spawn::spawn_agents(grid, num_tigers, &mut occupied, rng)?;
    let num_food = rng.random_range(config.food.clone()) as usize;
    let food = spawn::spawn_food(grid, &occupied, num_food, rng);
    let shortfall = (num_food - food.len()) as u64;
    Ok((
        WorldLayout {
            humans,
            tigers,
            food: food.into_iter().collect(),
        },
        shortfall,
    ))
}

fn validate_layout(grid: &Grid, layout: &WorldLayout) -> Result<(), ConfigError> {
    for (name, cells) in [
        ("humans", &layout.humans),
        ("tigers", &layout.tigers),
        ("food", &layout.food),
    ] {
        for cell in cells.iter() {
            if !grid.in_bounds(*cell) {
                return Err(ConfigError::InvalidLayout {
                    reason: format!("{name} cell {cell} is out of bounds"),
                });
            }
        }
    }
    let mut agents = IndexSet::new();
    for cell in layout.humans.iter().chain(layout.tigers.iter()) {
        if !agents.insert(*cell) {
            return Err(ConfigError::InvalidLayout {
                reason: format!("agents overlap at {cell}"),
            });
        }
    }
    Ok(())
}
