//! Tabular on-policy learning for the Taiga simulation engine.
//!
//! Provides [`PolicyTable`], a lazily-initialized action-value store with
//! ε-greedy selection and the SARSA bootstrap, plus the [`bucket`]
//! discretizer used to build compact state keys from relative offsets.
//!
//! The update rule is deliberately on-policy: it bootstraps off the value
//! of the action actually chosen for the next step, never the greedy
//! maximum. Swapping in a max-Q target changes learned behavior.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod encode;
pub mod params;
pub mod table;

pub use encode::bucket;
pub use params::LearningParams;
pub use table::PolicyTable;
