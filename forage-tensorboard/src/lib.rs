#![warn(missing_docs)]
//! Reader for tensorboard scalar event files.
//!
//! The training side of an experiment logs scalars through a tensorboard
//! `SummaryWriter`; this crate reads those files back so charts can be
//! produced without a Python toolchain. Only what scalar charts need is
//! decoded: TFRecord framing with checksum verification, and the
//! `wall_time` / `step` / `summary.value.{tag, simple_value}` fields of
//! each event. Everything else in an event file is skipped.
pub mod error;

mod crc32c;
mod proto;
mod record;
mod scalars;

pub use error::EventReadError;
pub use scalars::{ScalarEntry, ScalarEvents};
