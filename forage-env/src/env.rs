mod config;
mod render;

use crate::{GridObs, Move, CELL_AGENT, CELL_EMPTY, CELL_FOOD, CELL_THREAT};
use anyhow::Result;
use forage_core::{Env, Frame, InfoSnapshot, Step};
use log::warn;
use ndarray::Array2;

pub use config::SurvivalEnvConfig;

const SURVIVE_REWARD: f32 = 0.1;
const EAT_REWARD: f32 = 1.0;
const DEFEAT_REWARD: f32 = 2.0;
const DEATH_PENALTY: f32 = 10.0;
const DAMAGE_PENALTY_SCALE: f32 = 0.1;

/// A food item on the board.
struct Food {
    pos: (usize, usize),
    value: f32,
}

/// A threat roaming the board.
struct Threat {
    pos: (usize, usize),
    attack: f32,
}

/// The survival gridworld.
///
/// Positions are `(row, col)` on a `size x size` board. The board keeps a
/// constant population: eaten food and defeated threats respawn on a free
/// cell with freshly drawn values.
pub struct SurvivalEnv {
    config: SurvivalEnvConfig,

    rng: fastrand::Rng,

    // Agent state
    agent: (usize, usize),
    health: f32,
    hunger: f32,
    attack: f32,

    // Board population
    food: Vec<Food>,
    threats: Vec<Threat>,

    // Steps taken since the last reset
    steps: usize,
}

impl SurvivalEnv {
    /// Places the agent, food and threats for a fresh episode.
    fn populate(&mut self) {
        let size = self.config.size;
        self.steps = 0;
        self.health = InfoSnapshot::FULL_HEALTH;
        self.hunger = InfoSnapshot::FULL_HUNGER;
        self.attack = self.uniform(self.config.agent_attack_min, self.config.agent_attack_max);
        self.food.clear();
        self.threats.clear();
        self.agent = (self.rng.usize(..size), self.rng.usize(..size));

        for _ in 0..self.config.num_food {
            let pos = self.free_cell();
            let value = self.uniform(self.config.food_value_min, self.config.food_value_max);
            self.food.push(Food { pos, value });
        }
        for _ in 0..self.config.num_threats {
            let pos = self.free_cell();
            let attack = self.uniform(self.config.threat_attack_min, self.config.threat_attack_max);
            self.threats.push(Threat { pos, attack });
        }
    }

    fn uniform(&mut self, min: f32, max: f32) -> f32 {
        min + self.rng.f32() * (max - min)
    }

    fn is_free(&self, pos: (usize, usize)) -> bool {
        pos != self.agent
            && !self.food.iter().any(|f| f.pos == pos)
            && !self.threats.iter().any(|t| t.pos == pos)
    }

    /// Picks a random unoccupied cell.
    fn free_cell(&mut self) -> (usize, usize) {
        let size = self.config.size;
        for _ in 0..8 * size * size {
            let pos = (self.rng.usize(..size), self.rng.usize(..size));
            if self.is_free(pos) {
                return pos;
            }
        }
        // The board is nearly saturated; scan instead of sampling further.
        warn!("random cell placement exhausted, scanning the board");
        for row in 0..size {
            for col in 0..size {
                if self.is_free((row, col)) {
                    return (row, col);
                }
            }
        }
        unreachable!("a validated config always leaves a free cell");
    }

    /// The masked observation grid.
    fn observe(&self) -> GridObs {
        let size = self.config.size;
        let range = self.config.observation_range;
        let mut grid = Array2::from_elem((size, size), CELL_EMPTY);
        for food in &self.food {
            if chebyshev(food.pos, self.agent) <= range {
                grid[[food.pos.0, food.pos.1]] = CELL_FOOD;
            }
        }
        for threat in &self.threats {
            if chebyshev(threat.pos, self.agent) <= range {
                grid[[threat.pos.0, threat.pos.1]] = CELL_THREAT;
            }
        }
        grid[[self.agent.0, self.agent.1]] = CELL_AGENT;
        GridObs::new(grid)
    }
}

impl Env for SurvivalEnv {
    type Config = SurvivalEnvConfig;
    type Obs = GridObs;
    type Act = Move;

    fn build(config: &Self::Config, seed: u64) -> Result<Self>
    where
        Self: Sized,
    {
        config.validate()?;
        let mut env = Self {
            config: config.clone(),
            rng: fastrand::Rng::with_seed(seed),
            agent: (0, 0),
            health: InfoSnapshot::FULL_HEALTH,
            hunger: InfoSnapshot::FULL_HUNGER,
            attack: 0.0,
            food: Vec::new(),
            threats: Vec::new(),
            steps: 0,
        };
        env.populate();
        Ok(env)
    }

    fn reset(&mut self) -> Result<(Self::Obs, InfoSnapshot)> {
        self.populate();
        Ok((self.observe(), self.info()))
    }

    fn step(&mut self, act: &Self::Act) -> Result<Step<Self>>
    where
        Self: Sized,
    {
        let size = self.config.size;
        let mut reward = SURVIVE_REWARD;

        self.agent = shifted(self.agent, *act, size);

        // Hunger drains every step and starves once empty.
        if self.hunger > 0.0 {
            self.hunger = (self.hunger - self.config.hungry_decay).max(0.0);
        } else {
            self.health -= self.config.hungry_decay;
        }

        if let Some(ix) = self.food.iter().position(|f| f.pos == self.agent) {
            let value = self.food[ix].value;
            self.hunger = (self.hunger + value).min(InfoSnapshot::FULL_HUNGER);
            reward += EAT_REWARD;
            let pos = self.free_cell();
            let value = self.uniform(self.config.food_value_min, self.config.food_value_max);
            self.food[ix] = Food { pos, value };
        }

        // Threats chase inside their perception range, otherwise wander.
        for i in 0..self.threats.len() {
            let pos = self.threats[i].pos;
            let next = if chebyshev(pos, self.agent) <= self.config.threat_perception_range {
                step_toward(pos, self.agent)
            } else {
                shifted(pos, Move::ALL[self.rng.usize(..Move::ALL.len())], size)
            };
            self.threats[i].pos = next;
        }

        for i in 0..self.threats.len() {
            if self.threats[i].pos != self.agent {
                continue;
            }
            if self.attack >= self.threats[i].attack {
                reward += DEFEAT_REWARD;
                let pos = self.free_cell();
                let attack =
                    self.uniform(self.config.threat_attack_min, self.config.threat_attack_max);
                self.threats[i] = Threat { pos, attack };
            } else {
                let damage = self.threats[i].attack - self.attack;
                self.health -= damage;
                reward -= damage * DAMAGE_PENALTY_SCALE;
            }
        }

        let terminated = self.health <= 0.0;
        if terminated {
            self.health = 0.0;
            reward -= DEATH_PENALTY;
        }
        self.steps += 1;
        let truncated = !terminated && self.steps >= self.config.max_steps;

        Ok(Step::new(
            self.observe(),
            reward,
            terminated,
            truncated,
            self.info(),
        ))
    }

    fn render(&self) -> Option<Frame> {
        Some(render::draw_board(self))
    }

    fn info(&self) -> InfoSnapshot {
        InfoSnapshot::new(self.health, self.hunger, self.attack)
    }
}

fn chebyshev(a: (usize, usize), b: (usize, usize)) -> usize {
    a.0.abs_diff(b.0).max(a.1.abs_diff(b.1))
}

/// Applies a move, clamping at the board edges.
fn shifted(pos: (usize, usize), mv: Move, size: usize) -> (usize, usize) {
    let (row, col) = pos;
    match mv {
        Move::Stay => (row, col),
        Move::Up => (row.saturating_sub(1), col),
        Move::Down => ((row + 1).min(size - 1), col),
        Move::Left => (row, col.saturating_sub(1)),
        Move::Right => (row, (col + 1).min(size - 1)),
    }
}

/// One chasing step of a threat.
fn step_toward(pos: (usize, usize), target: (usize, usize)) -> (usize, usize) {
    let row = if pos.0 < target.0 {
        pos.0 + 1
    } else if pos.0 > target.0 {
        pos.0 - 1
    } else {
        pos.0
    };
    let col = if pos.1 < target.1 {
        pos.1 + 1
    } else if pos.1 > target.1 {
        pos.1 - 1
    } else {
        pos.1
    };
    (row, col)
}
