//! DQN policy over the survival gridworld.
use crate::{Mlp, MlpConfig};
use anyhow::{bail, Result};
use forage_core::{Agent, Configurable, InfoSnapshot, Policy};
use forage_env::{GridObs, Move, SurvivalEnv};
use log::info;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, BufWriter},
    path::Path,
};

/// Number of scalar status inputs appended to the flattened grid.
const AUX_INPUTS: usize = 3;

/// Configuration of [`DqnPolicy`].
///
/// Mirrors the `agent` section of an evaluation results file; unknown keys
/// there (optimizer settings and the like) are ignored, recognized keys
/// override the defaults.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct DqnPolicyConfig {
    /// Side length of the observed board; fixes the network input size.
    pub board_size: usize,
    /// Hidden layer sizes of the Q-network.
    pub hidden_sizes: Vec<usize>,
    /// Exploration rate in training mode.
    pub epsilon: f32,
    /// Seed for weight initialization and exploration.
    pub seed: u64,
}

impl Default for DqnPolicyConfig {
    fn default() -> Self {
        Self {
            board_size: 16,
            hidden_sizes: vec![128, 128],
            epsilon: 0.1,
            seed: 42,
        }
    }
}

impl DqnPolicyConfig {
    /// Sets the board side length.
    pub fn board_size(mut self, board_size: usize) -> Self {
        self.board_size = board_size;
        self
    }

    /// Sets the hidden layer sizes.
    pub fn hidden_sizes(mut self, hidden_sizes: Vec<usize>) -> Self {
        self.hidden_sizes = hidden_sizes;
        self
    }

    /// Layer sizes of the Q-network this configuration describes.
    fn dims(&self) -> Vec<usize> {
        let mut dims = vec![self.board_size * self.board_size + AUX_INPUTS];
        dims.extend(&self.hidden_sizes);
        dims.push(Move::ALL.len());
        dims
    }
}

/// A Q-network policy: greedy at evaluation time, epsilon-greedy in
/// training mode.
///
/// The network input is the flattened observation grid followed by the
/// three normalized status fields.
pub struct DqnPolicy {
    mlp: Mlp,
    board_size: usize,
    epsilon: f32,
    train: bool,
    rng: fastrand::Rng,
}

impl DqnPolicy {
    /// Q-values for a flattened grid and normalized status fields.
    pub fn q_values(&self, grid: &[f32], aux: &[f32; 3]) -> Vec<f32> {
        let mut input = Vec::with_capacity(grid.len() + aux.len());
        input.extend_from_slice(grid);
        input.extend_from_slice(aux);
        self.mlp.forward(&input.into()).data
    }

    /// Side length of the board the network was built for.
    pub fn board_size(&self) -> usize {
        self.board_size
    }

    fn greedy(&self, obs: &GridObs, info: &InfoSnapshot) -> Move {
        let q = self.q_values(&obs.to_flat(), &info.normalized());
        let mut best = 0;
        for i in 1..q.len() {
            if q[i] > q[best] {
                best = i;
            }
        }
        Move::ALL[best]
    }
}

impl Configurable for DqnPolicy {
    type Config = DqnPolicyConfig;

    fn build(config: Self::Config) -> Self {
        let mut rng = fastrand::Rng::with_seed(config.seed);
        let mlp = Mlp::random(&MlpConfig::new(config.dims()), &mut rng);
        Self {
            mlp,
            board_size: config.board_size,
            epsilon: config.epsilon,
            train: false,
            rng,
        }
    }
}

impl Policy<SurvivalEnv> for DqnPolicy {
    fn select_action(&mut self, obs: &GridObs, info: &InfoSnapshot) -> Move {
        if self.train && self.rng.f32() < self.epsilon {
            Move::ALL[self.rng.usize(..Move::ALL.len())]
        } else {
            self.greedy(obs, info)
        }
    }
}

impl Agent<SurvivalEnv> for DqnPolicy {
    fn train(&mut self) {
        self.train = true;
    }

    fn eval(&mut self) {
        self.train = false;
    }

    fn is_train(&self) -> bool {
        self.train
    }

    fn save_params(&self, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        bincode::serialize_into(BufWriter::new(file), &self.mlp)?;
        info!("Saved policy parameters to {}", path.display());
        Ok(())
    }

    fn load_params(&mut self, path: &Path) -> Result<()> {
        let file = File::open(path)?;
        let mlp: Mlp = bincode::deserialize_from(BufReader::new(file))?;
        if mlp.dims() != self.mlp.dims() {
            bail!(
                "checkpoint layer sizes {:?} do not match the configured network {:?}",
                mlp.dims(),
                self.mlp.dims()
            );
        }
        self.mlp = mlp;
        info!("Loaded policy parameters from {}", path.display());
        Ok(())
    }
}
