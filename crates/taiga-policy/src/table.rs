//! The tabular action-value store.

use std::hash::Hash;

use indexmap::IndexMap;
use rand::Rng;

use crate::params::LearningParams;

/// Tabular action-value store with ε-greedy selection and the SARSA
/// update.
///
/// Generic over the state key `S` and the action encoding `A`. The
/// action set is supplied at construction and fixed for the table's
/// lifetime; per-state values are stored densely in action-set order and
/// lazily initialized to 0.0 on first access.
///
/// Species that must never share entries get distinct `S` types, making
/// cross-table contamination a compile error rather than a bug class.
/// Iteration order of the underlying map is insertion order, keeping
/// debug dumps and serial sweeps deterministic.
#[derive(Clone, Debug)]
pub struct PolicyTable<S, A: 'static> {
    values: IndexMap<S, Box<[f32]>>,
    actions: &'static [A],
}

impl<S, A> PolicyTable<S, A>
where
    S: Copy + Eq + Hash,
    A: Copy + PartialEq + 'static,
{
    /// Create an empty table over the given action set.
    ///
    /// # Panics
    ///
    /// Panics if `actions` is empty.
    pub fn new(actions: &'static [A]) -> Self {
        assert!(!actions.is_empty(), "PolicyTable needs at least one action");
        Self {
            values: IndexMap::new(),
            actions,
        }
    }

    /// The action set this table selects from.
    pub fn actions(&self) -> &'static [A] {
        self.actions
    }

    /// Number of distinct states seen so far.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no state has been seen yet.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The stored values for `state` in action-set order, if the state
    /// has been seen.
    pub fn values(&self, state: S) -> Option<&[f32]> {
        self.values.get(&state).map(|row| &row[..])
    }

    /// The stored value of `(state, action)`.
    ///
    /// Unseen states are initialized with 0.0 for every action.
    ///
    /// # Panics
    ///
    /// Panics if `action` is not a member of the table's action set.
    pub fn value(&mut self, state: S, action: A) -> f32 {
        let idx = self.action_index(action);
        self.row(state)[idx]
    }

    /// ε-greedy selection for `state`.
    ///
    /// With probability `epsilon`, picks uniformly among all actions.
    /// Otherwise picks uniformly among the actions achieving the maximum
    /// stored value — ties break by uniform random choice, not
    /// first-seen, avoiding directional bias.
    pub fn select_action<R: Rng + ?Sized>(&mut self, state: S, epsilon: f64, rng: &mut R) -> A {
        if rng.random::<f64>() < epsilon {
            return self.actions[rng.random_range(0..self.actions.len())];
        }
        let row = self.row(state);
        let max = row.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        let ties: Vec<usize> = row
            .iter()
            .enumerate()
            .filter(|(_, &q)| q == max)
            .map(|(i, _)| i)
            .collect();
        self.actions[ties[rng.random_range(0..ties.len())]]
    }

    /// The on-policy bootstrap:
    /// `Q(s,a) ← Q(s,a) + α · (r + γ·Q(s',a') − Q(s,a))`.
    ///
    /// `next_action` is the action actually chosen for the next step via
    /// [`select_action`](Self::select_action), not the greedy maximum.
    ///
    /// # Panics
    ///
    /// Panics if either action is not a member of the table's action set.
    pub fn update(
        &mut self,
        state: S,
        action: A,
        reward: f32,
        next_state: S,
        next_action: A,
        params: &LearningParams,
    ) {
        let next_q = self.value(next_state, next_action);
        let idx = self.action_index(action);
        let q = &mut self.row(state)[idx];
        *q += params.alpha * (reward + params.gamma * next_q - *q);
    }

    fn row(&mut self, state: S) -> &mut [f32] {
        let n = self.actions.len();
        self.values
            .entry(state)
            .or_insert_with(|| vec![0.0; n].into_boxed_slice())
    }

    fn action_index(&self, action: A) -> usize {
        self.actions
            .iter()
            .position(|a| *a == action)
            .expect("action outside the table's action set")
    }
}
