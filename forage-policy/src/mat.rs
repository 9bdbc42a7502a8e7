use serde::{Deserialize, Serialize};

/// A dense `f32` matrix in row-major order.
///
/// Just enough linear algebra for replaying a Q-network: matrix product,
/// elementwise add and ReLU. Shapes are `[rows, cols]`; a vector is a
/// single-column matrix.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct Mat {
    pub data: Vec<f32>,
    pub shape: Vec<i32>,
}

impl Mat {
    /// Matrix product `self * x`.
    pub fn matmul(&self, x: &Mat) -> Self {
        assert_eq!(
            self.shape[1], x.shape[0],
            "matmul shape mismatch: {:?} * {:?}",
            self.shape, x.shape
        );
        let (m, l, n) = (
            self.shape[0] as usize,
            self.shape[1] as usize,
            x.shape[1] as usize,
        );
        let mut data = vec![0.0f32; m * n];
        for i in 0..m {
            for j in 0..n {
                let kk = i * n + j;
                for k in 0..l {
                    data[kk] += self.data[i * l + k] * x.data[k * n + j];
                }
            }
        }

        Self {
            shape: vec![m as _, n as _],
            data,
        }
    }

    /// Elementwise sum.
    pub fn add(&self, x: &Mat) -> Self {
        if self.shape[0] != x.shape[0] || self.shape[1] != x.shape[1] {
            panic!(
                "Trying to add matrices of different sizes: {:?}",
                (&self.shape, &x.shape)
            );
        }

        let data = self
            .data
            .iter()
            .zip(x.data.iter())
            .map(|(a, b)| *a + *b)
            .collect();

        Mat {
            data,
            shape: self.shape.clone(),
        }
    }

    /// Elementwise ReLU.
    pub fn relu(&self) -> Self {
        let data = self
            .data
            .iter()
            .map(|a| match *a < 0. {
                true => 0.,
                false => *a,
            })
            .collect();

        Self {
            data,
            shape: self.shape.clone(),
        }
    }
}

impl From<Vec<f32>> for Mat {
    fn from(x: Vec<f32>) -> Self {
        let shape = vec![x.len() as i32, 1];
        Self { shape, data: x }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matmul_matrix_times_vector() {
        let w = Mat {
            data: vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
            shape: vec![2, 3],
        };
        let x = Mat::from(vec![1.0, 0.0, -1.0]);
        let y = w.matmul(&x);
        assert_eq!(y.shape, vec![2, 1]);
        assert_eq!(y.data, vec![-2.0, -2.0]);
    }

    #[test]
    #[should_panic]
    fn matmul_rejects_mismatched_inner_dims() {
        let w = Mat {
            data: vec![1.0, 2.0],
            shape: vec![1, 2],
        };
        let x = Mat::from(vec![1.0, 2.0, 3.0]);
        let _ = w.matmul(&x);
    }

    #[test]
    fn add_and_relu() {
        let a = Mat::from(vec![1.0, -2.0]);
        let b = Mat::from(vec![0.5, -0.5]);
        let sum = a.add(&b);
        assert_eq!(sum.data, vec![1.5, -2.5]);
        assert_eq!(sum.relu().data, vec![1.5, 0.0]);
    }

    #[test]
    fn vector_conversion_is_a_column() {
        let x = Mat::from(vec![1.0, 2.0, 3.0]);
        assert_eq!(x.shape, vec![3, 1]);
    }
}
