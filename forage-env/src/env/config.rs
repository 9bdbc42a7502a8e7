//! Configuration of [SurvivalEnv](super::SurvivalEnv).
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// Configuration of [`SurvivalEnv`](super::SurvivalEnv).
///
/// Every recognized option is an explicit typed field rather than an entry
/// in a loose mapping. Each field has a serde default, so the `environment`
/// section of an evaluation results file may provide any subset; unknown
/// keys are ignored.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SurvivalEnvConfig {
    /// Side length of the square board.
    pub size: usize,
    /// Step limit; the episode is truncated when it is reached.
    pub max_steps: usize,
    /// Number of food items kept on the board.
    pub num_food: usize,
    /// Number of threats kept on the board.
    pub num_threats: usize,
    /// Lower bound of the hunger restored by one food item.
    pub food_value_min: f32,
    /// Upper bound of the hunger restored by one food item.
    pub food_value_max: f32,
    /// Lower bound of a threat's attack strength.
    pub threat_attack_min: f32,
    /// Upper bound of a threat's attack strength.
    pub threat_attack_max: f32,
    /// Lower bound of the agent's attack strength, drawn at reset.
    pub agent_attack_min: f32,
    /// Upper bound of the agent's attack strength, drawn at reset.
    pub agent_attack_max: f32,
    /// Hunger lost per step; converts to health loss at zero hunger.
    pub hungry_decay: f32,
    /// Chebyshev radius of the agent's view; cells beyond it are blanked.
    pub observation_range: usize,
    /// Chebyshev radius within which a threat chases the agent.
    pub threat_perception_range: usize,
}

impl Default for SurvivalEnvConfig {
    fn default() -> Self {
        Self {
            size: 16,
            max_steps: 1000,
            num_food: 10,
            num_threats: 5,
            food_value_min: 10.0,
            food_value_max: 30.0,
            threat_attack_min: 20.0,
            threat_attack_max: 40.0,
            agent_attack_min: 30.0,
            agent_attack_max: 50.0,
            hungry_decay: 2.0,
            observation_range: 4,
            threat_perception_range: 2,
        }
    }
}

impl SurvivalEnvConfig {
    /// Sets the side length of the board.
    pub fn size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    /// Sets the step limit.
    pub fn max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Sets the number of food items.
    pub fn num_food(mut self, num_food: usize) -> Self {
        self.num_food = num_food;
        self
    }

    /// Sets the number of threats.
    pub fn num_threats(mut self, num_threats: usize) -> Self {
        self.num_threats = num_threats;
        self
    }

    /// Sets the hunger restored by one food item.
    pub fn food_value(mut self, min: f32, max: f32) -> Self {
        self.food_value_min = min;
        self.food_value_max = max;
        self
    }

    /// Sets the attack range of threats.
    pub fn threat_attack(mut self, min: f32, max: f32) -> Self {
        self.threat_attack_min = min;
        self.threat_attack_max = max;
        self
    }

    /// Sets the attack range of the agent.
    pub fn agent_attack(mut self, min: f32, max: f32) -> Self {
        self.agent_attack_min = min;
        self.agent_attack_max = max;
        self
    }

    /// Sets the hunger decay per step.
    pub fn hungry_decay(mut self, hungry_decay: f32) -> Self {
        self.hungry_decay = hungry_decay;
        self
    }

    /// Sets the observation range.
    pub fn observation_range(mut self, observation_range: usize) -> Self {
        self.observation_range = observation_range;
        self
    }

    /// Sets the threat perception range.
    pub fn threat_perception_range(mut self, threat_perception_range: usize) -> Self {
        self.threat_perception_range = threat_perception_range;
        self
    }

    /// Checks that the configuration describes a playable board.
    pub fn validate(&self) -> Result<()> {
        if self.size < 2 {
            bail!("board size must be at least 2, got {}", self.size);
        }
        if self.max_steps == 0 {
            bail!("max_steps must be positive");
        }
        // Respawning needs at least one unoccupied cell at all times.
        if self.num_food + self.num_threats + 1 >= self.size * self.size {
            bail!(
                "{} food and {} threats leave no free cell on a {}x{} board",
                self.num_food,
                self.num_threats,
                self.size,
                self.size
            );
        }
        if self.food_value_min > self.food_value_max {
            bail!(
                "food_value_min {} exceeds food_value_max {}",
                self.food_value_min,
                self.food_value_max
            );
        }
        if self.threat_attack_min > self.threat_attack_max {
            bail!(
                "threat_attack_min {} exceeds threat_attack_max {}",
                self.threat_attack_min,
                self.threat_attack_max
            );
        }
        if self.agent_attack_min > self.agent_attack_max {
            bail!(
                "agent_attack_min {} exceeds agent_attack_max {}",
                self.agent_attack_min,
                self.agent_attack_max
            );
        }
        if self.hungry_decay < 0.0 {
            bail!("hungry_decay must not be negative");
        }
        Ok(())
    }
}
