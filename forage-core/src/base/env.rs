//! Environment.
use super::{Act, InfoSnapshot, Obs, Step};
use crate::Frame;
use anyhow::Result;

/// Represents an environment, typically an MDP.
///
/// Unlike a raw gymnasium-style interface, the status snapshot is a required
/// accessor: [`Env::info`] can be queried at any time, so callers never need
/// a recovery path for a missing info mapping. Resource release happens on
/// drop; there is no explicit `close`.
pub trait Env {
    /// Configuration of the environment.
    type Config: Clone;

    /// Observation of the environment.
    type Obs: Obs;

    /// Action of the environment.
    type Act: Act;

    /// Builds the environment with a given random seed.
    fn build(config: &Self::Config, seed: u64) -> Result<Self>
    where
        Self: Sized;

    /// Resets the environment, returning the initial observation and status.
    fn reset(&mut self) -> Result<(Self::Obs, InfoSnapshot)>;

    /// Performs one environment step.
    fn step(&mut self, act: &Self::Act) -> Result<Step<Self>>
    where
        Self: Sized;

    /// Renders the current state as an RGB frame.
    ///
    /// Environments without a visual representation return `None`.
    fn render(&self) -> Option<Frame>;

    /// Returns the current status snapshot.
    fn info(&self) -> InfoSnapshot;
}
