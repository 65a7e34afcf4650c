//! Learning hyperparameters.

/// Fixed hyperparameters for the on-policy update.
///
/// Neither rate is annealed; both stay constant for the whole session.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LearningParams {
    /// Learning rate α.
    pub alpha: f32,
    /// Discount factor γ.
    pub gamma: f32,
    /// Exploration probability ε for action selection.
    pub epsilon: f64,
}

impl Default for LearningParams {
    fn default() -> Self {
        Self {
            alpha: 0.1,
            gamma: 0.9,
            epsilon: 0.1,
        }
    }
}
