//! Policy and agent.
use super::{Env, InfoSnapshot};
use anyhow::Result;
use serde::de::DeserializeOwned;
use std::path::Path;

/// A policy on an environment.
///
/// Policy is a mapping from an observation and the current status snapshot
/// to an action. The mapping can be either deterministic or stochastic.
pub trait Policy<E: Env> {
    /// Chooses an action given an observation.
    fn select_action(&mut self, obs: &E::Obs, info: &InfoSnapshot) -> E::Act;
}

/// A policy with a train/eval mode switch and persistent parameters.
///
/// Inference-time callers (the evaluator, the episode recorder) are expected
/// to put the agent into evaluation mode before the rollout rather than
/// passing a training flag on every action.
pub trait Agent<E: Env>: Policy<E> {
    /// Sets the policy to training mode.
    fn train(&mut self);

    /// Sets the policy to evaluation mode.
    fn eval(&mut self);

    /// Returns if it is in training mode.
    fn is_train(&self) -> bool;

    /// Saves the parameters of the agent to the given path.
    fn save_params(&self, path: &Path) -> Result<()>;

    /// Loads the parameters of the agent from the given path.
    fn load_params(&mut self, path: &Path) -> Result<()>;
}

/// A configurable object.
pub trait Configurable {
    /// Configuration.
    type Config: Clone + DeserializeOwned;

    /// Builds the object.
    fn build(config: Self::Config) -> Self;

    /// Builds the object with the configuration in the YAML file of the given path.
    fn build_from_path(path: impl AsRef<Path>) -> Result<Self>
    where
        Self: Sized,
    {
        let file = std::fs::File::open(path)?;
        let rdr = std::io::BufReader::new(file);
        let config = serde_yaml::from_reader(rdr)?;
        Ok(Self::build(config))
    }
}
