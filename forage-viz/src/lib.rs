#![warn(missing_docs)]
//! Post-hoc visualization for survival gridworld training runs.
//!
//! The crate turns the artifacts a run leaves behind, tensorboard scalar
//! logs, an evaluation results file and a policy checkpoint, into charts
//! and an annotated episode video:
//!
//! * `training_curves.png`, the 2x2 figure of reward, health and loss
//!   curves,
//! * `action_distribution.png`, a bar chart over the action set,
//! * `state_heatmap.png`, where on the board the agent spent its time,
//! * `value_function.png`, the learned state value per board cell,
//! * `episode.mp4` (or `episode.gif` without ffmpeg), one recorded episode
//!   with a status overlay.
//!
//! The `forage-viz` binary drives the whole pipeline from the command line;
//! the library exposes the pieces. [`Visualizer`] writes artifacts into a
//! save directory, [`EpisodeRecorder`] rolls out and encodes episodes, and
//! [`collect_eval_results`] produces the evaluation file the charts read.
//!
//! All charts are rendered into plain RGB buffers, so nothing here needs a
//! display server or system fonts.

mod charts;
mod colormap;
mod eval;
mod recorder;
mod text;
mod video;
mod visualizer;

pub use eval::{collect_eval_results, EpisodeRecord, EvalConfig, EvalResults};
pub use recorder::{EpisodeRecorder, RecordResult, DEFAULT_FRAME_RATE};
pub use video::{encoder_for, EncodeError, GifVideo, Mpeg4Video, VideoEncoder};
pub use visualizer::Visualizer;
