//! A survival gridworld for the forage visualization suite.
//!
//! The agent forages on a square board that also hosts food items and
//! roaming threats. Hunger decays every step and turns into starvation at
//! zero; food restores it. Threats chase the agent once it enters their
//! perception range and fight it on contact. The episode ends when the
//! agent's health reaches zero or the step limit is hit.
//!
//! The environment exists so the visualization pipeline has a real
//! counterpart to replay policies against: it renders RGB frames of the
//! full board and reports the agent status snapshot required by the video
//! overlay.
//!
//! ```no_run
//! use anyhow::Result;
//! use forage_core::Env as _;
//! use forage_env::{Move, SurvivalEnv, SurvivalEnvConfig};
//!
//! fn main() -> Result<()> {
//!     let config = SurvivalEnvConfig::default().size(8).max_steps(50);
//!     let mut env = SurvivalEnv::build(&config, 42)?;
//!     let (_obs, _info) = env.reset()?;
//!     loop {
//!         let step = env.step(&Move::Up)?;
//!         if step.is_done() {
//!             break;
//!         }
//!     }
//!     Ok(())
//! }
//! ```
mod act;
mod env;
mod obs;
pub use act::Move;
pub use env::{SurvivalEnv, SurvivalEnvConfig};
pub use obs::{GridObs, CELL_AGENT, CELL_EMPTY, CELL_FOOD, CELL_THREAT};
