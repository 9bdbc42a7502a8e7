//! Action for [SurvivalEnv](crate::SurvivalEnv)
use forage_core::Act;
use serde::{Deserialize, Serialize};

/// Discrete movement action of the agent.
///
/// The index order (`Stay=0`, `Up=1`, `Down=2`, `Left=3`, `Right=4`) is part
/// of the evaluation-file contract: action indices recorded there are decoded
/// with [`Move::from_index`], and the action-distribution chart labels its
/// bars in this order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Move {
    /// Do not move.
    Stay,
    /// One cell up.
    Up,
    /// One cell down.
    Down,
    /// One cell left.
    Left,
    /// One cell right.
    Right,
}

impl Move {
    /// All actions in index order.
    pub const ALL: [Move; 5] = [Move::Stay, Move::Up, Move::Down, Move::Left, Move::Right];

    /// Decodes an action index, `None` if out of range.
    pub fn from_index(ix: usize) -> Option<Self> {
        Move::ALL.get(ix).copied()
    }

    /// The action index.
    pub fn index(self) -> usize {
        match self {
            Move::Stay => 0,
            Move::Up => 1,
            Move::Down => 2,
            Move::Left => 3,
            Move::Right => 4,
        }
    }

    /// Display name used for chart labels.
    pub fn name(self) -> &'static str {
        match self {
            Move::Stay => "Stay",
            Move::Up => "Up",
            Move::Down => "Down",
            Move::Left => "Left",
            Move::Right => "Right",
        }
    }
}

impl Act for Move {}
