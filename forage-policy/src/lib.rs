//! Backend-free DQN policy for the survival gridworld.
//!
//! The policy replays trained Q-networks without a tensor backend: a
//! checkpoint is a plain serialization of layer weights, and the forward
//! pass runs on [`Mat`], a minimal matrix type. This keeps inference-time
//! tooling (episode recording, value-function sweeps) free of native
//! dependencies.
mod dqn;
mod mat;
mod mlp;

pub use dqn::{DqnPolicy, DqnPolicyConfig};
pub use mat::Mat;
pub use mlp::{Mlp, MlpConfig};
