//! Artifact writer: owns the save directory, one operation per output file.

use crate::charts;
use crate::eval::EvalResults;
use crate::recorder::{EpisodeRecorder, RecordResult};
use crate::video::Mpeg4Video;
use anyhow::{Context, Result};
use forage_core::{Env, Frame, Policy};
use forage_policy::DqnPolicy;
use forage_tensorboard::ScalarEvents;
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// Writes every visualization artifact of a run into one save directory.
pub struct Visualizer {
    save_dir: PathBuf,
}

impl Visualizer {
    /// Creates the save directory, parents included, if it does not exist.
    pub fn new<P: Into<PathBuf>>(save_dir: P) -> Result<Self> {
        let save_dir = save_dir.into();
        fs::create_dir_all(&save_dir)
            .with_context(|| format!("creating save directory {}", save_dir.display()))?;
        Ok(Self { save_dir })
    }

    /// The directory artifacts are written into.
    pub fn save_dir(&self) -> &Path {
        &self.save_dir
    }

    /// Writes `training_curves.png` from the scalars of a training run.
    pub fn training_curves(&self, events: &ScalarEvents) -> Result<PathBuf> {
        self.save_png("training_curves.png", &charts::training_curves(events)?)
    }

    /// Writes `action_distribution.png` from evaluation results.
    pub fn action_distribution(&self, results: &EvalResults) -> Result<PathBuf> {
        self.save_png(
            "action_distribution.png",
            &charts::action_distribution(&results.results)?,
        )
    }

    /// Writes `state_heatmap.png` from evaluation results, sized by the
    /// board of the evaluated environment.
    pub fn state_heatmap(&self, results: &EvalResults) -> Result<PathBuf> {
        let grid_size = results.config.environment.size;
        self.save_png(
            "state_heatmap.png",
            &charts::state_heatmap(&results.results, grid_size)?,
        )
    }

    /// Writes `value_function.png` by sweeping the policy over synthetic
    /// single-agent boards.
    pub fn value_function(&self, policy: &DqnPolicy) -> Result<PathBuf> {
        self.save_png("value_function.png", &charts::value_function(policy)?)
    }

    /// Records one episode as `episode.mp4`, falling back to
    /// `episode.gif` when ffmpeg is not available.
    pub fn episode_video<E, P>(
        &self,
        env: &mut E,
        policy: &mut P,
        recorder: &EpisodeRecorder,
    ) -> Result<RecordResult>
    where
        E: Env,
        P: Policy<E>,
    {
        let path = if Mpeg4Video::available() {
            self.save_dir.join("episode.mp4")
        } else {
            warn!("ffmpeg not found, recording an animated GIF instead of MP4");
            self.save_dir.join("episode.gif")
        };
        recorder.record(env, policy, &path)
    }

    fn save_png(&self, name: &str, frame: &Frame) -> Result<PathBuf> {
        let path = self.save_dir.join(name);
        image::save_buffer(
            &path,
            frame.as_raw(),
            frame.width() as u32,
            frame.height() as u32,
            image::ColorType::Rgb8,
        )
        .with_context(|| format!("writing {}", path.display()))?;
        info!("wrote {}", path.display());
        Ok(path)
    }
}
