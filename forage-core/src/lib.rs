#![warn(missing_docs)]
//! Base components of the forage visualization suite.
//!
//! This crate defines the seams between the three collaborators of an
//! episode: the environment ([`Env`]), the policy acting in it ([`Policy`],
//! [`Agent`]) and everything that consumes what they produce (frames,
//! steps, status snapshots). Concrete implementations live in the
//! `forage-env` and `forage-policy` crates.
mod base;
mod frame;

pub use base::{Act, Agent, Configurable, Env, InfoSnapshot, Obs, Policy, Step};
pub use frame::Frame;
