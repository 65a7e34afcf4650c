//! Simulation engine orchestrating Taiga sessions.
//!
//! A [`Session`] owns all mutable world state — the agent arena, the food
//! set, the power-up, score and lives, the two policy tables, and the
//! seeded RNG — and advances it one deterministic [`tick`](Session::tick)
//! at a time. Everything leaves the session as an immutable [`Snapshot`];
//! everything enters it as a queued command applied at a tick boundary.
//!
//! [`SessionHandle`] wraps a session in a dedicated tick thread behind
//! that command/snapshot boundary for hosts with a renderer and
//! controller.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod agent;
pub mod behavior;
pub mod clock;
pub mod config;
pub mod metrics;
pub mod reward;
pub mod runner;
pub mod session;
pub mod snapshot;
pub mod spawn;

pub use agent::{Agent, AgentArena, AgentKind, HumanPhase, TigerPhase};
pub use behavior::{HumanState, TigerState};
pub use clock::SimClock;
pub use config::{ConfigError, SessionConfig, WorldLayout};
pub use metrics::SessionMetrics;
pub use runner::SessionHandle;
pub use session::{Session, SessionError};
pub use snapshot::Snapshot;
pub use spawn::SpawnError;
