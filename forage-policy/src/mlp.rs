use crate::Mat;
use serde::{Deserialize, Serialize};

/// Layer sizes of an [`Mlp`], input first, output last.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct MlpConfig {
    pub dims: Vec<usize>,
}

impl MlpConfig {
    /// Creates a configuration from layer sizes.
    pub fn new(dims: Vec<usize>) -> Self {
        Self { dims }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
/// Multilayer perceptron with ReLU activation function.
///
/// The output layer is linear: the network predicts Q-values, which are
/// unbounded in both directions.
pub struct Mlp {
    /// Weights of layers.
    ws: Vec<Mat>,

    /// Biases of layers.
    bs: Vec<Mat>,
}

impl Mlp {
    /// Builds a network with uniform random weights in
    /// `[-1/sqrt(fan_in), 1/sqrt(fan_in)]`.
    pub fn random(config: &MlpConfig, rng: &mut fastrand::Rng) -> Self {
        assert!(
            config.dims.len() >= 2,
            "an MLP needs at least an input and an output dimension"
        );
        let mut ws = Vec::new();
        let mut bs = Vec::new();
        for pair in config.dims.windows(2) {
            let (fan_in, fan_out) = (pair[0], pair[1]);
            let scale = 1.0 / (fan_in as f32).sqrt();
            let data = (0..fan_in * fan_out)
                .map(|_| scale * (2.0 * rng.f32() - 1.0))
                .collect();
            ws.push(Mat {
                data,
                shape: vec![fan_out as i32, fan_in as i32],
            });
            bs.push(Mat {
                data: vec![0.0; fan_out],
                shape: vec![fan_out as i32, 1],
            });
        }

        Self { ws, bs }
    }

    /// Builds a network from explicit layer weights.
    pub fn from_parts(ws: Vec<Mat>, bs: Vec<Mat>) -> Self {
        assert_eq!(ws.len(), bs.len(), "one bias per weight layer");
        Self { ws, bs }
    }

    /// The forward pass; `x` is a single-column matrix.
    pub fn forward(&self, x: &Mat) -> Mat {
        let n_layers = self.ws.len();
        let mut x = x.clone();
        for i in 0..n_layers {
            x = self.ws[i].matmul(&x).add(&self.bs[i]);
            if i != n_layers - 1 {
                x = x.relu();
            }
        }
        x
    }

    /// Layer sizes, input first, output last.
    pub fn dims(&self) -> Vec<usize> {
        let mut dims = vec![self.ws[0].shape[1] as usize];
        dims.extend(self.ws.iter().map(|w| w.shape[0] as usize));
        dims
    }
}
