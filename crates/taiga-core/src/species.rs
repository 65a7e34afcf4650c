//! Species tags for the two agent populations.

use std::fmt;

/// Which population an agent belongs to.
///
/// Tigers are predators: they hunt humans and guard food. Humans are
/// foragers: they collect food and retreat to the safe-zone corners.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Species {
    /// Predator population.
    Tiger,
    /// Forager population.
    Human,
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tiger => write!(f, "tiger"),
            Self::Human => write!(f, "human"),
        }
    }
}
