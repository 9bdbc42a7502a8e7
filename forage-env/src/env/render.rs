//! Tile renderer for [SurvivalEnv](super::SurvivalEnv).
use super::SurvivalEnv;
use forage_core::Frame;

/// Pixels per board cell.
pub(super) const CELL_PX: usize = 32;

const BACKGROUND: [u8; 3] = [239, 239, 239];
const GRID_LINE: [u8; 3] = [204, 204, 204];
const FOOD: [u8; 3] = [46, 160, 67];
const THREAT: [u8; 3] = [203, 56, 55];
pub(super) const AGENT: [u8; 3] = [39, 110, 218];

/// Draws the full board (not the agent's masked view) as an RGB frame.
pub(super) fn draw_board(env: &SurvivalEnv) -> Frame {
    let size = env.config.size;
    let side = size * CELL_PX;
    let mut frame = Frame::filled(side, side, BACKGROUND);

    for i in 0..=size {
        let p = (i * CELL_PX).min(side - 1);
        frame.fill_rect(0, p, side, p + 1, GRID_LINE);
        frame.fill_rect(p, 0, p + 1, side, GRID_LINE);
    }

    for food in &env.food {
        fill_cell(&mut frame, food.pos, FOOD, 8);
    }
    for threat in &env.threats {
        fill_cell(&mut frame, threat.pos, THREAT, 6);
    }
    fill_cell(&mut frame, env.agent, AGENT, 4);

    frame
}

/// Fills one board cell, inset from the cell borders.
fn fill_cell(frame: &mut Frame, pos: (usize, usize), color: [u8; 3], inset: usize) {
    let (row, col) = pos;
    let x0 = col * CELL_PX + inset;
    let y0 = row * CELL_PX + inset;
    let x1 = (col + 1) * CELL_PX - inset;
    let y1 = (row + 1) * CELL_PX - inset;
    frame.fill_rect(x0, y0, x1, y1, color);
}
