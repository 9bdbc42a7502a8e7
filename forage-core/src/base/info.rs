//! Status snapshot.
use serde::{Deserialize, Serialize};

/// Scalar status fields reported by an environment at every step.
///
/// The snapshot travels alongside observation and reward in [`Step`]
/// objects and feeds both the video overlay and the auxiliary input of the
/// policy network.
///
/// [`Step`]: super::Step
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct InfoSnapshot {
    /// Remaining health of the agent.
    pub health: f32,

    /// Satiety gauge; starvation sets in at zero.
    pub hunger: f32,

    /// Attack strength of the agent.
    pub attack: f32,
}

impl InfoSnapshot {
    /// Health value mapped to 1.0 by [`InfoSnapshot::normalized`].
    pub const FULL_HEALTH: f32 = 100.0;

    /// Hunger value mapped to 1.0 by [`InfoSnapshot::normalized`].
    pub const FULL_HUNGER: f32 = 100.0;

    /// Attack value mapped to 1.0 by [`InfoSnapshot::normalized`].
    pub const FULL_ATTACK: f32 = 50.0;

    /// Constructs a snapshot.
    pub fn new(health: f32, hunger: f32, attack: f32) -> Self {
        Self {
            health,
            hunger,
            attack,
        }
    }

    /// The three fields scaled so that a full gauge reads 1.0.
    ///
    /// This is the auxiliary input layout expected by the policy network;
    /// the value-function sweep feeds all ones, i.e. an agent at full
    /// strength.
    pub fn normalized(&self) -> [f32; 3] {
        [
            self.health / Self::FULL_HEALTH,
            self.hunger / Self::FULL_HUNGER,
            self.attack / Self::FULL_ATTACK,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_full_gauges_read_one() {
        let info = InfoSnapshot::new(100.0, 100.0, 50.0);
        assert_eq!(info.normalized(), [1.0, 1.0, 1.0]);
    }

    #[test]
    fn normalized_scales_each_field() {
        let info = InfoSnapshot::new(50.0, 25.0, 40.0);
        let [h, g, a] = info.normalized();
        assert!((h - 0.5).abs() < 1e-6);
        assert!((g - 0.25).abs() < 1e-6);
        assert!((a - 0.8).abs() < 1e-6);
    }
}
