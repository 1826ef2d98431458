use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SpringOptions {
    /// The run converges once no node moved further than this in an iteration.
    pub epsilon: f64,
    pub max_iterations: usize,
    pub repulsion_constant: f64,
    pub ideal_length: f64,
    pub spring_constant: f64,
    /// Added to the squared distance in the repulsion denominator.
    pub repulsion_softening: f64,
    /// Two nodes closer than this on both axes share a position.
    pub same_position_tolerance: f64,
    /// Jitter is drawn from `[-shift_range, shift_range]` on each axis.
    pub shift_range: f64,
    pub max_shift_attempts: usize,
    pub random_seed: u64,
    /// Yield to the executor after every iteration of [`crate::ForceLayout::run`].
    pub yield_each_iteration: bool,
}

impl Default for SpringOptions {
    fn default() -> Self {
        Self {
            epsilon: 0.01,
            max_iterations: 5000,
            repulsion_constant: 20000.0,
            ideal_length: 150.0,
            spring_constant: 20.0,
            repulsion_softening: 0.01,
            same_position_tolerance: 1e-6,
            shift_range: 50.0,
            max_shift_attempts: 100,
            random_seed: 0,
            yield_each_iteration: true,
        }
    }
}
