//! Evaluation results: the JSON file consumed by the chart renderers, and a
//! rollout helper that produces one.

use anyhow::{Context, Result};
use forage_core::{Agent, Configurable, Env, Policy};
use forage_env::{GridObs, SurvivalEnv, SurvivalEnvConfig};
use forage_policy::{DqnPolicy, DqnPolicyConfig};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Contents of an evaluation results file.
///
/// Unknown JSON keys are ignored and missing keys fall back to defaults, so
/// files written by other tooling stay readable as long as they are valid
/// JSON.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EvalResults {
    /// Configuration the evaluation ran with.
    #[serde(default)]
    pub config: EvalConfig,

    /// One record per evaluated episode.
    #[serde(default)]
    pub results: Vec<EpisodeRecord>,
}

/// The `config` section of an evaluation results file.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EvalConfig {
    /// Environment the episodes ran on.
    #[serde(default)]
    pub environment: SurvivalEnvConfig,

    /// Policy network layout used by the evaluated agent.
    #[serde(default)]
    pub agent: DqnPolicyConfig,
}

/// One evaluated episode: the action taken at each step, the observed grid
/// before each action, and the episode return.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EpisodeRecord {
    /// Action indices in step order.
    #[serde(default)]
    pub actions: Vec<usize>,

    /// Observation grids in step order, row major.
    #[serde(default)]
    pub states: Vec<Vec<Vec<f32>>>,

    /// Sum of all step rewards.
    #[serde(default)]
    pub total_reward: f32,
}

impl EvalResults {
    /// Reads a results file. A missing or malformed file is a hard error.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
        let results = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("parsing evaluation results {}", path.display()))?;
        Ok(results)
    }

    /// Writes the results as pretty-printed JSON.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)
            .with_context(|| format!("writing evaluation results {}", path.display()))?;
        Ok(())
    }
}

/// Rolls out `episodes` episodes of a policy and packages them as
/// [`EvalResults`].
///
/// The policy runs in evaluation mode; when `model` is given its parameters
/// are loaded first. The environment is freshly built from `env_config` and
/// seeded with `seed`, so two calls with the same inputs produce the same
/// records.
pub fn collect_eval_results(
    env_config: &SurvivalEnvConfig,
    agent_config: &DqnPolicyConfig,
    model: Option<&Path>,
    episodes: usize,
    seed: u64,
) -> Result<EvalResults> {
    let mut env = SurvivalEnv::build(env_config, seed)?;
    let mut agent = DqnPolicy::build(agent_config.clone());
    if let Some(path) = model {
        agent
            .load_params(path)
            .with_context(|| format!("loading model {}", path.display()))?;
    }
    agent.eval();

    let mut results = Vec::with_capacity(episodes);
    for _ in 0..episodes {
        let (mut obs, mut info) = env.reset()?;
        let mut record = EpisodeRecord::default();
        loop {
            record.states.push(grid_rows(&obs));
            let act = agent.select_action(&obs, &info);
            record.actions.push(act.index());
            let step = env.step(&act)?;
            record.total_reward += step.reward;
            let done = step.is_done();
            obs = step.obs;
            info = step.info;
            if done {
                break;
            }
        }
        results.push(record);
    }

    Ok(EvalResults {
        config: EvalConfig {
            environment: env_config.clone(),
            agent: agent_config.clone(),
        },
        results,
    })
}

fn grid_rows(obs: &GridObs) -> Vec<Vec<f32>> {
    obs.grid().rows().into_iter().map(|row| row.to_vec()).collect()
}
