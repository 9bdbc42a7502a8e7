//! Core abstractions.
mod env;
mod info;
mod policy;
mod step;
pub use env::Env;
pub use info::InfoSnapshot;
pub use policy::{Agent, Configurable, Policy};
use std::fmt::Debug;
pub use step::Step;

/// An observation emitted by an environment.
pub trait Obs: Clone + Debug {}

/// An action accepted by an environment.
pub trait Act: Clone + Debug {}
