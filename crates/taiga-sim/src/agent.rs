//! Agents, behavioral phases, and the session arena.
//!
//! Agents are owned exclusively by the session's tick loop and addressed
//! by stable [`AgentId`] handles. A capture marks its victim removed;
//! the slot is reclaimed by a compaction pass that runs strictly between
//! ticks, never during one, so no pass ever iterates a list it is
//! mutating.

use taiga_core::{AgentId, SimTime, Species};
use taiga_grid::{Cell, Dir};

use crate::behavior::{HumanState, TigerState};

// ── Phases ─────────────────────────────────────────────────────────

/// Tiger behavioral phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TigerPhase {
    /// Hunting or guarding; acts on every due tiger pass.
    Active,
    /// Digesting a caught human. The tiger neither moves nor updates
    /// its policy until the deadline passes.
    Digesting {
        /// Simulation time at which the tiger resumes.
        until: SimTime,
    },
}

/// Human behavioral phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HumanPhase {
    /// Seeking food under tiger avoidance.
    Foraging,
    /// Heading to a safe-zone corner after collecting food. Reward and
    /// policy updates are suspended for the whole retreat.
    Retreating {
        /// The corner being retreated to.
        target: Cell,
        /// When the retreat began; the dwell timer runs from arrival.
        since: SimTime,
    },
}

// ── Agent ──────────────────────────────────────────────────────────

/// Per-species behavior data carried by an agent.
///
/// The `pending` pair is the state/action awaiting its on-policy
/// bootstrap closure: the next decision step supplies the reward and
/// successor pair that complete the update.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AgentKind {
    /// A predator.
    Tiger {
        /// Current behavioral phase.
        phase: TigerPhase,
        /// State/action pair awaiting its SARSA closure.
        pending: (TigerState, Dir),
    },
    /// A forager.
    Human {
        /// Current behavioral phase.
        phase: HumanPhase,
        /// State/action pair awaiting its SARSA closure.
        pending: (HumanState, Dir),
    },
}

impl AgentKind {
    /// The species tag for this kind.
    pub fn species(&self) -> Species {
        match self {
            Self::Tiger { .. } => Species::Tiger,
            Self::Human { .. } => Species::Human,
        }
    }
}

/// A movable agent owned by the session.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Agent {
    /// Stable handle, unique within the session.
    pub id: AgentId,
    /// Current cell; always within grid bounds.
    pub pos: Cell,
    /// Species-specific phase and learning context.
    pub kind: AgentKind,
}

impl Agent {
    /// The agent's species tag.
    pub fn species(&self) -> Species {
        self.kind.species()
    }
}

// ── Arena ──────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
struct Slot {
    agent: Agent,
    removed: bool,
}

/// Arena of agents with stable handles and deferred reclamation.
///
/// Iteration order is spawn order, which defines the deterministic
/// total order of movement passes. `mark_removed` tombstones a slot
/// without disturbing that order; [`compact`](AgentArena::compact)
/// reclaims tombstones and must only be called between ticks.
#[derive(Clone, Debug, Default)]
pub struct AgentArena {
    slots: Vec<Slot>,
    next_id: u32,
}

impl AgentArena {
    /// An empty arena.
    pub fn new() -> AgentArena {
        AgentArena::default()
    }

    /// Add an agent, returning its stable handle.
    pub fn spawn(&mut self, pos: Cell, kind: AgentKind) -> AgentId {
        let id = AgentId(self.next_id);
        self.next_id += 1;
        self.slots.push(Slot {
            agent: Agent { id, pos, kind },
            removed: false,
        });
        id
    }

    /// The live agent with handle `id`, if any.
    pub fn get(&self, id: AgentId) -> Option<&Agent> {
        self.slots
            .iter()
            .find(|s| !s.removed && s.agent.id == id)
            .map(|s| &s.agent)
    }

    /// Mutable access to the live agent with handle `id`.
    pub fn get_mut(&mut self, id: AgentId) -> Option<&mut Agent> {
        self.slots
            .iter_mut()
            .find(|s| !s.removed && s.agent.id == id)
            .map(|s| &mut s.agent)
    }

    /// Tombstone an agent. Returns whether a live agent was removed.
    ///
    /// The slot survives until the next [`compact`](AgentArena::compact),
    /// so handles held by an in-flight pass stay unambiguous.
    pub fn mark_removed(&mut self, id: AgentId) -> bool {
        match self
            .slots
            .iter_mut()
            .find(|s| !s.removed && s.agent.id == id)
        {
            Some(slot) => {
                slot.removed = true;
                true
            }
            None => false,
        }
    }

    /// Reclaim tombstoned slots. Must only run between ticks.
    pub fn compact(&mut self) {
        self.slots.retain(|s| !s.removed);
    }

    /// Live agents in spawn order.
    pub fn iter(&self) -> impl Iterator<Item = &Agent> {
        self.slots.iter().filter(|s| !s.removed).map(|s| &s.agent)
    }

    /// Handles of live agents of `species`, in spawn order.
    pub fn ids(&self, species: Species) -> Vec<AgentId> {
        self.iter()
            .filter(|a| a.species() == species)
            .map(|a| a.id)
            .collect()
    }

    /// Positions of live agents of `species`, in spawn order.
    pub fn positions(&self, species: Species) -> Vec<Cell> {
        self.iter()
            .filter(|a| a.species() == species)
            .map(|a| a.pos)
            .collect()
    }

    /// Number of live agents of `species`.
    pub fn count(&self, species: Species) -> usize {
        self.iter().filter(|a| a.species() == species).count()
    }
}
