//! Cumulative per-session counters.

/// Counters accumulated across the lifetime of a [`Session`].
///
/// Counters survive [`reset`](crate::session::Session::reset) so a host
/// can observe totals for the whole process run, in the same way the
/// learned policy tables persist.
///
/// [`Session`]: crate::session::Session
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionMetrics {
    /// Ticks executed (terminal no-op calls excluded).
    pub ticks: u64,
    /// Tiger movement passes run.
    pub tiger_passes: u64,
    /// Human movement passes run.
    pub human_passes: u64,
    /// SARSA updates applied to the tiger table.
    pub tiger_updates: u64,
    /// SARSA updates applied to the human table.
    pub human_updates: u64,
    /// Humans caught by tigers.
    pub catches: u64,
    /// Food cells collected by humans.
    pub food_collected: u64,
    /// Power-ups picked up by tigers.
    pub power_pickups: u64,
    /// Power-up spawn steps that found no free cell.
    pub power_spawn_misses: u64,
    /// Food cells requested but not placed due to grid saturation.
    pub food_spawn_shortfall: u64,
    /// World rebuilds via reset.
    pub resets: u64,
}
