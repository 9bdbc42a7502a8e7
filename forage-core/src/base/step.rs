//! Environment step.
use super::{Env, InfoSnapshot};

/// The result of one interaction step: the gymnasium-style five-tuple.
///
/// An environment emits a [`Step`] object at every interaction step. The
/// episode ends when either [`Step::terminated`] (the environment decided)
/// or [`Step::truncated`] (the step limit was reached) is set.
pub struct Step<E: Env> {
    /// Observation after the step.
    pub obs: E::Obs,

    /// Reward obtained by the step.
    pub reward: f32,

    /// The episode ended inside the environment, e.g. the agent died.
    pub terminated: bool,

    /// The episode was cut off by the step limit.
    pub truncated: bool,

    /// Status snapshot after the step.
    pub info: InfoSnapshot,
}

impl<E: Env> Step<E> {
    /// Constructs a [`Step`] object.
    pub fn new(
        obs: E::Obs,
        reward: f32,
        terminated: bool,
        truncated: bool,
        info: InfoSnapshot,
    ) -> Self {
        Step {
            obs,
            reward,
            terminated,
            truncated,
            info,
        }
    }

    /// Terminated or truncated.
    #[inline]
    pub fn is_done(&self) -> bool {
        self.terminated || self.truncated
    }
}
