use forage_core::Obs;
use ndarray::Array2;

/// Cell code of an empty cell.
pub const CELL_EMPTY: f32 = 0.0;
/// Cell code of a food item.
pub const CELL_FOOD: f32 = 1.0;
/// Cell code of a threat.
pub const CELL_THREAT: f32 = 2.0;
/// Cell code of the agent.
///
/// Recorded evaluation states locate the agent by this code, so it must not
/// change. Code 3 is deliberately unassigned.
pub const CELL_AGENT: f32 = 4.0;

/// Observation of [SurvivalEnv](crate::SurvivalEnv).
///
/// A full `size x size` grid of cell codes, indexed `[row, col]`. Cells
/// beyond the agent's observation range are blanked to [`CELL_EMPTY`]; the
/// agent's own cell always carries [`CELL_AGENT`].
#[derive(Clone, Debug, PartialEq)]
pub struct GridObs {
    grid: Array2<f32>,
}

impl GridObs {
    pub(crate) fn new(grid: Array2<f32>) -> Self {
        Self { grid }
    }

    /// Side length of the board.
    pub fn size(&self) -> usize {
        self.grid.nrows()
    }

    /// The grid of cell codes.
    pub fn grid(&self) -> &Array2<f32> {
        &self.grid
    }

    /// Row-major flattening, the layout the policy network consumes.
    pub fn to_flat(&self) -> Vec<f32> {
        self.grid.iter().copied().collect()
    }

    /// Position of the first cell carrying [`CELL_AGENT`] in row-major
    /// order, as `(row, col)`.
    pub fn agent_position(&self) -> Option<(usize, usize)> {
        self.grid
            .indexed_iter()
            .find(|(_, &code)| code == CELL_AGENT)
            .map(|((row, col), _)| (row, col))
    }
}

impl Obs for GridObs {}
