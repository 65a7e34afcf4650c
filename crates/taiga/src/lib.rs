//! Taiga: a predator/forager grid-world simulation with online tabular
//! learning.
//!
//! Two populations share a 20×20 grid: tigers hunt humans and guard
//! food, humans collect food and retreat to the safe-zone corners.
//! Both species train tabular SARSA policies online while a
//! deterministic tick loop advances the world. This is the top-level
//! facade crate re-exporting the public API from all Taiga sub-crates;
//! for most users, adding `taiga` as a single dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use taiga::prelude::*;
//!
//! // A reproducible world: one human one step east of the only food.
//! let layout = WorldLayout {
//!     humans: vec![Cell::new(3, 4)],
//!     tigers: vec![Cell::new(19, 19)],
//!     food: vec![Cell::new(3, 3)],
//! };
//! let config = SessionConfig {
//!     seed: 11,
//!     ..SessionConfig::default()
//! };
//! let mut session = Session::with_layout(config, layout).unwrap();
//!
//! // Five ticks reach the first human movement pass: the human steps
//! // onto the food, scores, and empties the food set — session won.
//! for _ in 0..5 {
//!     session.tick();
//! }
//! let snapshot = session.snapshot();
//! assert_eq!(snapshot.score, 10);
//! assert!(snapshot.game_won());
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in
//! the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `taiga-core` | IDs, sim time, species, commands, status |
//! | [`grid`] | `taiga-grid` | Cells, directions, grid queries |
//! | [`policy`] | `taiga-policy` | Tabular SARSA store and hyperparameters |
//! | [`sim`] | `taiga-sim` | Session engine, runner, snapshots, spawning |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, identifiers, and the controller boundary (`taiga-core`).
pub use taiga_core as types;

/// Grid model and spatial queries (`taiga-grid`).
pub use taiga_grid as grid;

/// Tabular on-policy learning (`taiga-policy`).
pub use taiga_policy as policy;

/// Session engine, tick loop, and runner (`taiga-sim`).
pub use taiga_sim as sim;

/// Common imports for typical Taiga usage.
///
/// ```rust
/// use taiga::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use taiga_core::{
        AgentId, ControlCommand, InputError, SessionStatus, SimTime, Species, TickId, WindowSpec,
    };

    // Grid
    pub use taiga_grid::{optimal_step, Cell, Dir, Grid};

    // Learning
    pub use taiga_policy::{bucket, LearningParams, PolicyTable};

    // Engine
    pub use taiga_sim::{
        Session, SessionConfig, SessionError, SessionHandle, SessionMetrics, Snapshot, WorldLayout,
    };
}
