//! Grid model and spatial queries for the Taiga simulation engine.
//!
//! Defines the [`Cell`] coordinate type, the eight-compass [`Dir`] action
//! set, and the [`Grid`] with its pure spatial queries: bounds checks,
//! Manhattan distance, nearest-entity lookup, safe-zone corners, and the
//! Manhattan-optimal unit step used by scripted movement.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod direction;
pub mod grid;

pub use direction::Dir;
pub use grid::{optimal_step, Cell, Grid, GridError};
