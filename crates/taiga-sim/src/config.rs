//! Session configuration, validation, and explicit world layouts.

use std::error::Error;
use std::fmt;
use std::ops::RangeInclusive;

use taiga_grid::Cell;
use taiga_policy::LearningParams;

// ── SessionConfig ──────────────────────────────────────────────────

/// Builder-input for constructing a [`Session`](crate::session::Session).
///
/// Defaults: a 20×20 grid, 2–5 agents
/// per species, 5–20 food cells, 3 lives, tiger passes every 200 ms and
/// human passes every 500 ms of simulation time, a 4 s digestion pause,
/// a 2 s retreat dwell, an 8 s power-up buff, and a randomized 5–10 s
/// power-up spawn delay.
#[derive(Clone, Debug)]
pub struct SessionConfig {
    /// Grid width (columns).
    pub width: u32,
    /// Grid height (rows).
    pub height: u32,
    /// How many humans to spawn, drawn uniformly from this range.
    pub humans: RangeInclusive<u32>,
    /// How many tigers to spawn, drawn uniformly from this range.
    pub tigers: RangeInclusive<u32>,
    /// How many food cells to request, drawn uniformly from this range.
    pub food: RangeInclusive<u32>,
    /// Lives at session start. The session ends when they reach zero.
    pub lives: u32,
    /// Simulation milliseconds added per tick.
    pub tick_ms: u64,
    /// Minimum interval between tiger movement passes.
    pub tiger_interval_ms: u64,
    /// Minimum interval between human movement passes.
    pub human_interval_ms: u64,
    /// How long a tiger digests a caught human.
    pub digest_ms: u64,
    /// How long a human waits at its safe-zone corner before foraging
    /// again.
    pub dwell_ms: u64,
    /// How long the session-wide buff lasts after a power-up pickup.
    pub buff_ms: u64,
    /// Delay before the power-up becomes eligible to spawn, drawn
    /// uniformly from this range.
    pub power_delay_ms: RangeInclusive<u64>,
    /// Manhattan radius within which a tiger switches from guarding food
    /// to attacking the nearest human.
    pub attack_radius: u32,
    /// SARSA hyperparameters shared by both policy tables.
    pub learning: LearningParams,
    /// Seed for the session RNG. Identical seeds give identical runs.
    pub seed: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            width: 20,
            height: 20,
            humans: 2..=5,
            tigers: 2..=5,
            food: 5..=20,
            lives: 3,
            tick_ms: 100,
            tiger_interval_ms: 200,
            human_interval_ms: 500,
            digest_ms: 4000,
            dwell_ms: 2000,
            buff_ms: 8000,
            power_delay_ms: 5000..=10_000,
            attack_radius: 3,
            learning: LearningParams::default(),
            seed: 0,
        }
    }
}

impl SessionConfig {
    /// Check structural invariants.
    ///
    /// # Errors
    ///
    /// Returns the first violated [`ConfigError`]. Called by the session
    /// constructor; hosts may also call it early to fail fast.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::EmptyGrid);
        }
        if self.tick_ms == 0 {
            return Err(ConfigError::ZeroTickInterval);
        }
        for (name, range) in [
            ("humans", &self.humans),
            ("tigers", &self.tigers),
            ("food", &self.food),
        ] {
            if range.is_empty() {
                return Err(ConfigError::EmptyRange { name });
            }
        }
        if self.power_delay_ms.is_empty() {
            return Err(ConfigError::EmptyRange {
                name: "power_delay_ms",
            });
        }
        if self.lives == 0 {
            return Err(ConfigError::ZeroLives);
        }
        let cells = (self.width as u64) * (self.height as u64);
        let peak_agents = u64::from(*self.humans.end()) + u64::from(*self.tigers.end());
        if peak_agents > cells {
            return Err(ConfigError::TooManyAgents {
                requested: peak_agents,
                capacity: cells,
            });
        }
        let l = &self.learning;
        if !(l.alpha > 0.0 && l.alpha <= 1.0) {
            return Err(ConfigError::InvalidLearning {
                reason: format!("alpha must be in (0, 1], got {}", l.alpha),
            });
        }
        if !(0.0..=1.0).contains(&l.gamma) {
            return Err(ConfigError::InvalidLearning {
                reason: format!("gamma must be in [0, 1], got {}", l.gamma),
            });
        }
        if !(0.0..=1.0).contains(&l.epsilon) {
            return Err(ConfigError::InvalidLearning {
                reason: format!("epsilon must be in [0, 1], got {}", l.epsilon),
            });
        }
        Ok(())
    }
}

// ── WorldLayout ────────────────────────────────────────────────────

/// Explicit initial placement for a session.
///
/// Normal construction draws a layout from the seeded RNG; tests and
/// replay tooling can instead pin every starting position via
/// [`Session::with_layout`](crate::session::Session::with_layout).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WorldLayout {
    /// Starting cells for humans, one agent per entry.
    pub humans: Vec<Cell>,
    /// Starting cells for tigers, one agent per entry.
    pub tigers: Vec<Cell>,
    /// Initial food cells.
    pub food: Vec<Cell>,
}

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected while validating a [`SessionConfig`] or an explicit
/// [`WorldLayout`].
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// Grid width or height is zero.
    EmptyGrid,
    /// `tick_ms` is zero; the clock could never advance.
    ZeroTickInterval,
    /// A count or delay range is empty (start > end).
    EmptyRange {
        /// Name of the offending field.
        name: &'static str,
    },
    /// Zero lives would end the session before the first tick.
    ZeroLives,
    /// The agent populations cannot fit on the grid.
    TooManyAgents {
        /// Peak combined population.
        requested: u64,
        /// Total cells available.
        capacity: u64,
    },
    /// A learning hyperparameter is out of range.
    InvalidLearning {
        /// Description of the violation.
        reason: String,
    },
    /// An explicit layout places an entity off-grid or overlaps agents.
    InvalidLayout {
        /// Description of the violation.
        reason: String,
    },
    /// The runner thread could not be spawned.
    ThreadSpawnFailed {
        /// Description of the failure.
        reason: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyGrid => write!(f, "grid has zero cells"),
            Self::ZeroTickInterval => write!(f, "tick_ms must be nonzero"),
            Self::EmptyRange { name } => write!(f, "range '{name}' is empty"),
            Self::ZeroLives => write!(f, "lives must be nonzero"),
            Self::TooManyAgents {
                requested,
                capacity,
            } => write!(
                f,
                "up to {requested} agents requested but the grid has only {capacity} cells"
            ),
            Self::InvalidLearning { reason } => write!(f, "invalid learning params: {reason}"),
            Self::InvalidLayout { reason } => write!(f, "invalid layout: {reason}"),
            Self::ThreadSpawnFailed { reason } => write!(f, "thread spawn failed: {reason}"),
        }
    }
}

impl Error for ConfigError {}
