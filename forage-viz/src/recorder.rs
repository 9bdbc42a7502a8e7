//! Episode recording: run one inference episode and encode the annotated
//! frames as a video.

use crate::text;
use crate::video;
use anyhow::Result;
use forage_core::{Env, Frame, InfoSnapshot, Policy};
use log::{info, warn};
use std::path::{Path, PathBuf};

/// Default output frame rate in frames per second.
pub const DEFAULT_FRAME_RATE: f32 = 5.0;

const OVERLAY_COLOR: [u8; 3] = [0, 0, 0];
const OVERLAY_X: usize = 10;
const OVERLAY_SCALE: usize = 2;

/// Outcome of [`EpisodeRecorder::record`].
#[derive(Clone, Debug)]
pub struct RecordResult {
    /// Number of frames in the written artifact.
    pub frames_written: usize,

    /// Sum of the rewards of all completed steps.
    pub total_reward: f32,

    /// Whether the episode ran to termination or truncation rather than
    /// aborting on a step failure.
    pub completed: bool,

    /// Path of the written video, or `None` when no frame was rendered.
    pub artifact: Option<PathBuf>,
}

/// Records one episode of an environment under a policy.
///
/// Each loop iteration renders the current state, annotates the frame with
/// the status readout, then selects and applies an action. The frame of an
/// iteration is kept only once its step completes, so a failing step leaves
/// exactly the frames of the completed steps, and those are still encoded.
pub struct EpisodeRecorder {
    frame_rate: f32,
}

impl Default for EpisodeRecorder {
    fn default() -> Self {
        Self::new(DEFAULT_FRAME_RATE)
    }
}

impl EpisodeRecorder {
    /// Creates a recorder encoding at `frame_rate` frames per second.
    ///
    /// # Panics
    ///
    /// Panics unless `frame_rate` is positive.
    pub fn new(frame_rate: f32) -> Self {
        assert!(
            frame_rate > 0.0,
            "frame rate must be positive, got {}",
            frame_rate
        );
        Self { frame_rate }
    }

    /// Runs one episode and encodes the rendered frames into `path`.
    ///
    /// The container is chosen by the extension of `path`. Environments
    /// that do not render produce no artifact; a step failure aborts the
    /// rollout with a warning and the frames collected so far are encoded.
    pub fn record<E, P>(&self, env: &mut E, policy: &mut P, path: &Path) -> Result<RecordResult>
    where
        E: Env,
        P: Policy<E>,
    {
        let (mut obs, mut info) = env.reset()?;
        let mut frames: Vec<Frame> = Vec::new();
        let mut total_reward = 0.0;
        let mut completed = false;

        loop {
            let rendered = match env.render() {
                Some(mut frame) => {
                    overlay_status(&mut frame, &info, total_reward);
                    frames.push(frame);
                    true
                }
                None => false,
            };

            let act = policy.select_action(&obs, &info);
            match env.step(&act) {
                Ok(step) => {
                    total_reward += step.reward;
                    let done = step.is_done();
                    obs = step.obs;
                    info = step.info;
                    if done {
                        completed = true;
                        break;
                    }
                }
                Err(err) => {
                    // The frame of the aborted iteration never had its step
                    // complete, so it does not belong to the artifact.
                    if rendered {
                        frames.pop();
                    }
                    warn!("episode aborted after {} frames: {}", frames.len(), err);
                    break;
                }
            }
        }

        let artifact = if frames.is_empty() {
            warn!("no frames were rendered, skipping {}", path.display());
            None
        } else {
            Some(encode(&frames, self.frame_rate, path)?)
        };

        Ok(RecordResult {
            frames_written: frames.len(),
            total_reward,
            completed,
            artifact,
        })
    }
}

fn encode(frames: &[Frame], frame_rate: f32, path: &Path) -> Result<PathBuf> {
    let mut encoder = video::encoder_for(path, frame_rate)?;
    for frame in frames {
        encoder.write_frame(frame)?;
    }
    let written = encoder.finish()?;
    info!("saved episode video to {}", written.display());
    Ok(written)
}

/// Draws the status readout carried on every frame: health, hunger, attack
/// and the running reward, one decimal each, at fixed positions.
fn overlay_status(frame: &mut Frame, info: &InfoSnapshot, total_reward: f32) {
    let lines = [
        (format!("Health: {:.1}", info.health), 20),
        (format!("Hunger: {:.1}", info.hunger), 40),
        (format!("Attack: {:.1}", info.attack), 60),
        (format!("Reward: {:.1}", total_reward), 80),
    ];
    for (line, y) in lines.iter() {
        text::draw_text(frame, OVERLAY_X, *y, line, OVERLAY_SCALE, OVERLAY_COLOR);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::video::EncodeError;
    use anyhow::anyhow;
    use forage_core::{Act, Obs, Step};
    use std::fs;
    use tempdir::TempDir;

    #[derive(Clone, Debug)]
    struct StubObs;
    impl Obs for StubObs {}

    #[derive(Clone, Debug)]
    struct StubAct;
    impl Act for StubAct {}

    #[derive(Clone)]
    struct StubConfig;

    enum View {
        Always(usize, usize),
        Never,
        Growing(usize, usize),
    }

    struct StubEnv {
        budget: usize,
        steps: usize,
        rewards: Vec<f32>,
        fail_on: Option<usize>,
        view: View,
    }

    impl StubEnv {
        fn new(budget: usize) -> Self {
            Self {
                budget,
                steps: 0,
                rewards: Vec::new(),
                fail_on: None,
                view: View::Always(48, 32),
            }
        }
    }

    impl Env for StubEnv {
        type Config = StubConfig;
        type Obs = StubObs;
        type Act = StubAct;

        fn build(_config: &StubConfig, _seed: u64) -> Result<Self> {
            Ok(Self::new(3))
        }

        fn reset(&mut self) -> Result<(StubObs, InfoSnapshot)> {
            self.steps = 0;
            Ok((StubObs, self.info()))
        }

        fn step(&mut self, _act: &StubAct) -> Result<Step<Self>> {
            let call = self.steps + 1;
            if self.fail_on == Some(call) {
                return Err(anyhow!("stub failure on step {}", call));
            }
            self.steps = call;
            let reward = self.rewards.get(call - 1).copied().unwrap_or(0.0);
            let terminated = self.steps >= self.budget;
            Ok(Step::new(StubObs, reward, terminated, false, self.info()))
        }

        fn render(&self) -> Option<Frame> {
            match self.view {
                View::Never => None,
                View::Always(w, h) => Some(Frame::filled(w, h, [200, 200, 200])),
                View::Growing(w, h) => Some(Frame::filled(w + self.steps, h, [200, 200, 200])),
            }
        }

        fn info(&self) -> InfoSnapshot {
            InfoSnapshot::new(55.0, 12.34, 40.0)
        }
    }

    struct StubPolicy;

    impl Policy<StubEnv> for StubPolicy {
        fn select_action(&mut self, _obs: &StubObs, _info: &InfoSnapshot) -> StubAct {
            StubAct
        }
    }

    #[test]
    fn one_frame_per_completed_step() -> Result<()> {
        let dir = TempDir::new("recorder")?;
        let path = dir.path().join("episode.gif");
        let mut env = StubEnv::new(3);
        let result = EpisodeRecorder::new(5.0).record(&mut env, &mut StubPolicy, &path)?;
        assert_eq!(result.frames_written, 3);
        assert!(result.completed);
        assert_eq!(result.artifact.as_deref(), Some(path.as_path()));
        assert!(fs::metadata(&path)?.len() > 0);
        Ok(())
    }

    #[test]
    fn non_rendering_environment_yields_no_artifact() -> Result<()> {
        let dir = TempDir::new("recorder")?;
        let path = dir.path().join("episode.gif");
        let mut env = StubEnv::new(4);
        env.view = View::Never;
        let result = EpisodeRecorder::new(5.0).record(&mut env, &mut StubPolicy, &path)?;
        assert_eq!(result.frames_written, 0);
        assert!(result.completed);
        assert!(result.artifact.is_none());
        assert!(!path.exists());
        Ok(())
    }

    #[test]
    fn step_failure_salvages_the_completed_frames() -> Result<()> {
        let dir = TempDir::new("recorder")?;
        let path = dir.path().join("episode.gif");
        let mut env = StubEnv::new(10);
        env.fail_on = Some(3);
        let result = EpisodeRecorder::new(5.0).record(&mut env, &mut StubPolicy, &path)?;
        assert_eq!(result.frames_written, 2);
        assert!(!result.completed);
        assert_eq!(result.artifact.as_deref(), Some(path.as_path()));
        assert!(fs::metadata(&path)?.len() > 0);
        Ok(())
    }

    #[test]
    fn failure_on_the_first_step_leaves_nothing() -> Result<()> {
        let dir = TempDir::new("recorder")?;
        let path = dir.path().join("episode.gif");
        let mut env = StubEnv::new(10);
        env.fail_on = Some(1);
        let result = EpisodeRecorder::new(5.0).record(&mut env, &mut StubPolicy, &path)?;
        assert_eq!(result.frames_written, 0);
        assert!(!result.completed);
        assert!(result.artifact.is_none());
        assert!(!path.exists());
        Ok(())
    }

    #[test]
    fn frames_of_mixed_sizes_fail_encoding() -> Result<()> {
        let dir = TempDir::new("recorder")?;
        let path = dir.path().join("episode.gif");
        let mut env = StubEnv::new(3);
        env.view = View::Growing(48, 32);
        let err = EpisodeRecorder::new(5.0)
            .record(&mut env, &mut StubPolicy, &path)
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<EncodeError>(),
            Some(EncodeError::FrameSize { .. })
        ));
        Ok(())
    }

    #[test]
    fn rewards_accumulate_across_steps() -> Result<()> {
        let dir = TempDir::new("recorder")?;
        let mut env = StubEnv::new(3);
        env.rewards = vec![1.0, -0.5, 2.25];
        env.view = View::Never;
        let result =
            EpisodeRecorder::new(5.0).record(&mut env, &mut StubPolicy, &dir.path().join("e.gif"))?;
        assert_eq!(result.total_reward, 2.75);
        Ok(())
    }

    #[test]
    fn overlay_prints_one_decimal_at_fixed_positions() {
        let background = [239, 239, 239];
        let mut frame = Frame::filled(200, 120, background);
        overlay_status(&mut frame, &InfoSnapshot::new(55.0, 12.34, 40.0), 7.89);

        let expected = [
            ("Health: 55.0", 20),
            ("Hunger: 12.3", 40),
            ("Attack: 40.0", 60),
            ("Reward: 7.9", 80),
        ];
        for (line, y) in expected.iter() {
            let mut wanted = Frame::filled(200, 120, background);
            text::draw_text(&mut wanted, 10, *y, line, 2, [0, 0, 0]);
            assert_eq!(
                band(&frame, *y, *y + 10),
                band(&wanted, *y, *y + 10),
                "line {:?} at y={}",
                line,
                y
            );
        }
    }

    fn band(frame: &Frame, y0: usize, y1: usize) -> &[u8] {
        &frame.as_raw()[y0 * frame.width() * 3..y1 * frame.width() * 3]
    }

    #[test]
    #[should_panic]
    fn zero_frame_rate_panics() {
        EpisodeRecorder::new(0.0);
    }
}
