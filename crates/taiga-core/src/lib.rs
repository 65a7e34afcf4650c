//! Core types and identifiers for the Taiga simulation engine.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the fundamental abstractions used throughout the Taiga workspace:
//! tick and agent identifiers, the simulation time scale, species tags,
//! the controller command boundary, and shared error types.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod command;
pub mod error;
pub mod id;
pub mod species;

pub use command::{ControlCommand, SessionStatus, WindowSpec, GRID_SIDE};
pub use error::InputError;
pub use id::{AgentId, SimTime, TickId};
pub use species::Species;
