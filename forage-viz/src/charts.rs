//! Chart renderers: training curves, action distribution and the two board
//! heatmaps.
//!
//! Every chart is drawn with plotters series primitives into an RGB buffer
//! and lettered with the crate's own glyph font, so rendering needs neither
//! a display server nor system fonts. [`crate::Visualizer`] writes the
//! finished frames to PNG files.

use crate::colormap::{self, ColorStop, VIRIDIS, YL_OR_RD};
use crate::eval::EpisodeRecord;
use crate::text;
use anyhow::Result;
use forage_core::Frame;
use forage_env::{Move, CELL_AGENT};
use forage_policy::DqnPolicy;
use forage_tensorboard::ScalarEvents;
use itertools::{Itertools, MinMaxResult};
use log::warn;
use ndarray::Array2;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters_bitmap::BitMapBackendError;

/// Dimensions of the training curves figure.
pub(crate) const TRAINING_CURVES_SIZE: (usize, usize) = (1500, 1200);

/// Dimensions of the action distribution chart.
pub(crate) const ACTION_DISTRIBUTION_SIZE: (usize, usize) = (1000, 600);

/// Dimensions of the position heatmap.
pub(crate) const STATE_HEATMAP_SIZE: (usize, usize) = (1000, 1000);

/// Dimensions of the value function heatmap.
pub(crate) const VALUE_FUNCTION_SIZE: (usize, usize) = (1000, 800);

const BACKGROUND: [u8; 3] = [255, 255, 255];
const INK: [u8; 3] = [40, 40, 40];
const SERIES_BLUE: RGBColor = RGBColor(31, 119, 180);
const AXIS_GRAY: RGBColor = RGBColor(120, 120, 120);
const GRID_GRAY: RGBColor = RGBColor(220, 220, 220);

// Panel insets. The glyph labels are placed with the same constants the
// chart margins use, so ticks line up with the data area.
const PANEL_TITLE_H: usize = 34;
const PANEL_MARGIN_BOTTOM: usize = 8;
const PANEL_MARGIN_LEFT: usize = 8;
const PANEL_MARGIN_RIGHT: usize = 16;
const X_LABEL_AREA: usize = 34;
const Y_LABEL_AREA: usize = 64;

const COLORBAR_W: usize = 46;
const COLORBAR_GAP: usize = 18;

type PlotResult = Result<(), DrawingAreaErrorKind<BitMapBackendError>>;

/// A sub-rectangle of a frame, `x1`/`y1` exclusive.
#[derive(Clone, Copy, Debug)]
struct Rect {
    x0: usize,
    y0: usize,
    x1: usize,
    y1: usize,
}

impl Rect {
    fn width(&self) -> usize {
        self.x1 - self.x0
    }

    fn height(&self) -> usize {
        self.y1 - self.y0
    }

    fn center_x(&self) -> usize {
        (self.x0 + self.x1) / 2
    }
}

/// Renders the 2x2 training progress figure from tensorboard scalars.
///
/// Panels: training rewards, evaluation rewards, agent health and training
/// loss. A panel whose scalar tag was never logged keeps its axes and stays
/// empty.
pub fn training_curves(events: &ScalarEvents) -> Result<Frame> {
    let (width, height) = TRAINING_CURVES_SIZE;
    let mut frame = Frame::filled(width, height, BACKGROUND);
    text::draw_text_centered(&mut frame, width / 2, 14, "Training Progress", 4, INK);

    let panels = [
        ("Train/Episode_Reward", "Training Rewards", "Reward"),
        ("Eval/Average_Reward", "Evaluation Rewards", "Average Reward"),
        ("Train/Health", "Agent Health", "Health"),
        ("Train/Average_Loss", "Training Loss", "Loss"),
    ];
    let top = 52;
    let panel_w = width / 2;
    let panel_h = (height - top) / 2;
    for (i, (tag, title, y_label)) in panels.iter().enumerate() {
        let (col, row) = (i % 2, i / 2);
        let rect = Rect {
            x0: col * panel_w,
            y0: top + row * panel_h,
            x1: (col + 1) * panel_w,
            y1: top + (row + 1) * panel_h,
        };
        let points = scalar_points(events, tag);
        line_panel(&mut frame, rect, title, "Episode", y_label, &points)?;
    }
    Ok(frame)
}

fn scalar_points(events: &ScalarEvents, tag: &str) -> Vec<(f64, f64)> {
    events
        .scalars(tag)
        .map(|entries| {
            entries
                .iter()
                .map(|e| (e.step as f64, f64::from(e.value)))
                .filter(|(_, v)| v.is_finite())
                .collect()
        })
        .unwrap_or_default()
}

/// Renders the bar chart of actions taken across all evaluated episodes.
///
/// Action indices outside the known set are dropped from the counts; one
/// log line reports how many were seen.
pub fn action_distribution(episodes: &[EpisodeRecord]) -> Result<Frame> {
    let mut counts = vec![0u64; Move::ALL.len()];
    let mut unknown = 0u64;
    for episode in episodes {
        for &action in &episode.actions {
            match counts.get_mut(action) {
                Some(count) => *count += 1,
                None => unknown += 1,
            }
        }
    }
    if unknown > 0 {
        warn!("{} recorded actions were outside the known action set", unknown);
    }

    let (width, height) = ACTION_DISTRIBUTION_SIZE;
    let mut frame = Frame::filled(width, height, BACKGROUND);
    text::draw_text_centered(
        &mut frame,
        width / 2,
        12,
        "Distribution of Actions During Evaluation",
        3,
        INK,
    );

    let rect = Rect {
        x0: 0,
        y0: 40,
        x1: width,
        y1: height,
    };
    let n = Move::ALL.len() as f64;
    let y_max = counts.iter().copied().max().unwrap_or(0).max(1) as f64 * 1.1;

    paint(&mut frame, rect, |area| {
        let mut chart = ChartBuilder::on(&area)
            .margin_left(PANEL_MARGIN_LEFT as i32)
            .margin_right(PANEL_MARGIN_RIGHT as i32)
            .margin_top(PANEL_TITLE_H as i32)
            .margin_bottom(PANEL_MARGIN_BOTTOM as i32)
            .x_label_area_size(X_LABEL_AREA as i32)
            .y_label_area_size(Y_LABEL_AREA as i32)
            .build_cartesian_2d(0f64..n, 0f64..y_max)?;
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(0)
            .y_labels(0)
            .axis_style(&AXIS_GRAY)
            .light_line_style(&GRID_GRAY)
            .draw()?;
        chart.draw_series(counts.iter().enumerate().map(|(i, &count)| {
            let x = i as f64;
            Rectangle::new([(x + 0.2, 0.0), (x + 0.8, count as f64)], SERIES_BLUE.filled())
        }))?;
        Ok(())
    })?;

    let plot = plot_area(rect);
    for (i, mv) in Move::ALL.iter().enumerate() {
        let cx = plot.x0 + ((i as f64 + 0.5) / n * plot.width() as f64) as usize;
        text::draw_text_centered(&mut frame, cx, plot.y1 + 6, mv.name(), 2, INK);
        if counts[i] > 0 {
            let top = value_to_y(plot, counts[i] as f64, 0.0, y_max);
            text::draw_text_centered(
                &mut frame,
                cx,
                top.saturating_sub(14),
                &counts[i].to_string(),
                2,
                INK,
            );
        }
    }
    draw_y_tick(&mut frame, plot, plot.y1, "0");
    draw_y_tick(&mut frame, plot, value_to_y(plot, y_max, 0.0, y_max), &fmt_tick(y_max));
    text::draw_text_centered(&mut frame, plot.center_x(), plot.y1 + 22, "Action", 2, INK);
    text::draw_text(&mut frame, rect.x0 + 6, plot.y0.saturating_sub(12), "Count", 1, INK);
    Ok(frame)
}

/// Renders the agent position heatmap over all recorded states.
///
/// The agent cell of a stored grid is the first agent-coded cell in row
/// major order; grids without one are skipped. Visit counts are normalized
/// by the maximum.
pub fn state_heatmap(episodes: &[EpisodeRecord], grid_size: usize) -> Result<Frame> {
    let mut visits = Array2::<f64>::zeros((grid_size, grid_size));
    for episode in episodes {
        for state in &episode.states {
            if let Some((row, col)) = agent_cell(state) {
                if row < grid_size && col < grid_size {
                    visits[[row, col]] += 1.0;
                }
            }
        }
    }
    let max = visits.iter().copied().fold(0.0f64, f64::max);
    if max > 0.0 {
        visits.mapv_inplace(|v| v / max);
    }

    let (width, height) = STATE_HEATMAP_SIZE;
    let mut frame = Frame::filled(width, height, BACKGROUND);
    text::draw_text_centered(&mut frame, width / 2, 12, "Agent Position Heatmap", 3, INK);
    let rect = Rect {
        x0: 0,
        y0: 40,
        x1: width,
        y1: height,
    };
    heat_panel(&mut frame, rect, &visits, &YL_OR_RD, 0.0, 1.0)?;
    Ok(frame)
}

/// Row-major position of the first agent-coded cell of a stored grid.
fn agent_cell(state: &[Vec<f32>]) -> Option<(usize, usize)> {
    for (row, cells) in state.iter().enumerate() {
        for (col, &cell) in cells.iter().enumerate() {
            if cell == CELL_AGENT {
                return Some((row, col));
            }
        }
    }
    None
}

/// Renders the per-cell state value heatmap.
///
/// For every board cell a synthetic observation with the agent alone on
/// that cell, at full strength, is pushed through the Q-network; the cell
/// takes the value of the best action. Values are min-max scaled over the
/// board before coloring.
pub fn value_function(policy: &DqnPolicy) -> Result<Frame> {
    let size = policy.board_size();
    let mut values = Array2::<f64>::zeros((size, size));
    let aux = [1.0, 1.0, 1.0];
    let mut grid = vec![0.0f32; size * size];
    for row in 0..size {
        for col in 0..size {
            let cell = row * size + col;
            grid[cell] = CELL_AGENT;
            let q = policy.q_values(&grid, &aux);
            grid[cell] = 0.0;
            let best = q.iter().copied().fold(f32::NEG_INFINITY, f32::max);
            values[[row, col]] = f64::from(best);
        }
    }

    let (lo, hi) = match bounds(values.iter().copied()) {
        Some((lo, hi)) if hi > lo => (lo, hi),
        Some((v, _)) => (v - 0.5, v + 0.5),
        None => (0.0, 1.0),
    };

    let (width, height) = VALUE_FUNCTION_SIZE;
    let mut frame = Frame::filled(width, height, BACKGROUND);
    text::draw_text_centered(&mut frame, width / 2, 12, "State Value Function", 3, INK);
    let rect = Rect {
        x0: 0,
        y0: 40,
        x1: width,
        y1: height,
    };
    heat_panel(&mut frame, rect, &values, &VIRIDIS, lo, hi)?;
    Ok(frame)
}

/// One line-chart panel: framed axes, light grid, the series, and the
/// title, axis labels and min/max ticks in the glyph font. Without points
/// only the axes are drawn.
fn line_panel(
    frame: &mut Frame,
    rect: Rect,
    title: &str,
    x_label: &str,
    y_label: &str,
    points: &[(f64, f64)],
) -> Result<()> {
    if points.is_empty() {
        paint(frame, rect, |area| {
            let mut chart = ChartBuilder::on(&area)
                .margin_left(PANEL_MARGIN_LEFT as i32)
                .margin_right(PANEL_MARGIN_RIGHT as i32)
                .margin_top(PANEL_TITLE_H as i32)
                .margin_bottom(PANEL_MARGIN_BOTTOM as i32)
                .x_label_area_size(X_LABEL_AREA as i32)
                .y_label_area_size(Y_LABEL_AREA as i32)
                .build_cartesian_2d(0f64..1f64, 0f64..1f64)?;
            chart
                .configure_mesh()
                .x_labels(0)
                .y_labels(0)
                .axis_style(&AXIS_GRAY)
                .light_line_style(&GRID_GRAY)
                .draw()?;
            Ok(())
        })?;
        return Ok(());
    }

    let (x_lo, x_hi) = bounds(points.iter().map(|p| p.0)).unwrap_or((0.0, 1.0));
    let (y_lo, y_hi) = bounds(points.iter().map(|p| p.1)).unwrap_or((0.0, 1.0));
    let x_range = padded(x_lo, x_hi);
    let y_range = padded(y_lo, y_hi);

    paint(frame, rect, |area| {
        let mut chart = ChartBuilder::on(&area)
            .margin_left(PANEL_MARGIN_LEFT as i32)
            .margin_right(PANEL_MARGIN_RIGHT as i32)
            .margin_top(PANEL_TITLE_H as i32)
            .margin_bottom(PANEL_MARGIN_BOTTOM as i32)
            .x_label_area_size(X_LABEL_AREA as i32)
            .y_label_area_size(Y_LABEL_AREA as i32)
            .build_cartesian_2d(x_range.0..x_range.1, y_range.0..y_range.1)?;
        chart
            .configure_mesh()
            .x_labels(0)
            .y_labels(0)
            .axis_style(&AXIS_GRAY)
            .light_line_style(&GRID_GRAY)
            .draw()?;
        chart.draw_series(LineSeries::new(points.iter().copied(), &SERIES_BLUE))?;
        Ok(())
    })?;

    let plot = plot_area(rect);
    text::draw_text_centered(frame, rect.center_x(), rect.y0 + 10, title, 2, INK);
    let x0 = value_to_x(plot, x_lo, x_range.0, x_range.1);
    let x1 = value_to_x(plot, x_hi, x_range.0, x_range.1);
    text::draw_text_centered(frame, x0, plot.y1 + 6, &format!("{:.0}", x_lo), 2, INK);
    text::draw_text_centered(frame, x1, plot.y1 + 6, &format!("{:.0}", x_hi), 2, INK);
    draw_y_tick(frame, plot, value_to_y(plot, y_lo, y_range.0, y_range.1), &fmt_tick(y_lo));
    draw_y_tick(frame, plot, value_to_y(plot, y_hi, y_range.0, y_range.1), &fmt_tick(y_hi));
    text::draw_text_centered(frame, plot.center_x(), plot.y1 + 22, x_label, 2, INK);
    text::draw_text(frame, rect.x0 + 6, plot.y0.saturating_sub(12), y_label, 1, INK);
    Ok(())
}

/// Draws a matrix as colored cells with row zero at the top, plus the axis
/// labels and a colorbar scaled `lo..hi`.
fn heat_panel(
    frame: &mut Frame,
    rect: Rect,
    grid: &Array2<f64>,
    stops: &[ColorStop],
    lo: f64,
    hi: f64,
) -> Result<()> {
    let (rows, cols) = grid.dim();
    if rows == 0 || cols == 0 {
        return Ok(());
    }
    let panel = Rect {
        x1: rect.x1 - COLORBAR_W - COLORBAR_GAP,
        ..rect
    };
    let span = (hi - lo).max(f64::EPSILON);

    paint(frame, panel, |area| {
        let mut chart = ChartBuilder::on(&area)
            .margin_left(PANEL_MARGIN_LEFT as i32)
            .margin_right(PANEL_MARGIN_RIGHT as i32)
            .margin_top(PANEL_TITLE_H as i32)
            .margin_bottom(PANEL_MARGIN_BOTTOM as i32)
            .x_label_area_size(X_LABEL_AREA as i32)
            .y_label_area_size(Y_LABEL_AREA as i32)
            .build_cartesian_2d(0f64..cols as f64, 0f64..rows as f64)?;
        chart
            .configure_mesh()
            .disable_mesh()
            .x_labels(0)
            .y_labels(0)
            .axis_style(&AXIS_GRAY)
            .draw()?;
        chart.draw_series(grid.indexed_iter().map(|((row, col), &value)| {
            let t = ((value - lo) / span) as f32;
            let [r, g, b] = colormap::sample(stops, t);
            // Row zero is drawn at the top, matrix orientation.
            let ty = (rows - 1 - row) as f64;
            Rectangle::new(
                [(col as f64, ty), (col as f64 + 1.0, ty + 1.0)],
                RGBColor(r, g, b).filled(),
            )
        }))?;
        Ok(())
    })?;

    let plot = plot_area(panel);
    text::draw_text_centered(frame, plot.x0, plot.y1 + 6, "0", 2, INK);
    text::draw_text_centered(frame, plot.x1, plot.y1 + 6, &(cols - 1).to_string(), 2, INK);
    draw_y_tick(frame, plot, plot.y0, "0");
    draw_y_tick(frame, plot, plot.y1, &(rows - 1).to_string());
    text::draw_text_centered(frame, plot.center_x(), plot.y1 + 22, "X Position", 2, INK);
    text::draw_text(frame, rect.x0 + 6, plot.y0.saturating_sub(12), "Y Position", 1, INK);

    let bar = Rect {
        x0: rect.x1 - COLORBAR_W,
        y0: plot.y0,
        x1: rect.x1 - COLORBAR_W + 18,
        y1: plot.y1,
    };
    colorbar(frame, bar, stops, lo, hi);
    Ok(())
}

/// Vertical gradient legend, high values at the top.
fn colorbar(frame: &mut Frame, rect: Rect, stops: &[ColorStop], lo: f64, hi: f64) {
    let height = rect.height().max(1);
    for i in 0..height {
        let t = 1.0 - i as f32 / (height - 1).max(1) as f32;
        let color = colormap::sample(stops, t);
        frame.fill_rect(rect.x0, rect.y0 + i, rect.x1, rect.y0 + i + 1, color);
    }
    text::draw_text(frame, rect.x0, rect.y0.saturating_sub(12), &fmt_tick(hi), 1, INK);
    text::draw_text(frame, rect.x0, rect.y1 + 4, &fmt_tick(lo), 1, INK);
}

/// Renders a plotters drawing into the given sub-rectangle of `frame`.
fn paint<F>(frame: &mut Frame, rect: Rect, draw: F) -> Result<()>
where
    F: FnOnce(DrawingArea<BitMapBackend<'_>, Shift>) -> PlotResult,
{
    let (width, height) = (rect.width(), rect.height());
    let mut buffer = vec![0u8; width * height * 3];
    {
        let area =
            BitMapBackend::with_buffer(&mut buffer, (width as u32, height as u32)).into_drawing_area();
        area.fill(&WHITE)?;
        draw(area)?;
    }
    for y in 0..height {
        let row = &buffer[y * width * 3..(y + 1) * width * 3];
        for x in 0..width {
            let color = [row[x * 3], row[x * 3 + 1], row[x * 3 + 2]];
            frame.put_pixel(rect.x0 + x, rect.y0 + y, color);
        }
    }
    Ok(())
}

/// Data area of a panel, mirroring the chart margins used in `paint`
/// closures.
fn plot_area(rect: Rect) -> Rect {
    Rect {
        x0: rect.x0 + PANEL_MARGIN_LEFT + Y_LABEL_AREA,
        y0: rect.y0 + PANEL_TITLE_H,
        x1: rect.x1 - PANEL_MARGIN_RIGHT,
        y1: rect.y1 - PANEL_MARGIN_BOTTOM - X_LABEL_AREA,
    }
}

fn bounds(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    match values.minmax() {
        MinMaxResult::NoElements => None,
        MinMaxResult::OneElement(v) => Some((v, v)),
        MinMaxResult::MinMax(lo, hi) => Some((lo, hi)),
    }
}

fn padded(lo: f64, hi: f64) -> (f64, f64) {
    if hi > lo {
        let pad = (hi - lo) * 0.05;
        (lo - pad, hi + pad)
    } else {
        (lo - 1.0, hi + 1.0)
    }
}

fn value_to_x(plot: Rect, value: f64, lo: f64, hi: f64) -> usize {
    let t = ((value - lo) / (hi - lo)).clamp(0.0, 1.0);
    plot.x0 + (t * plot.width() as f64) as usize
}

fn value_to_y(plot: Rect, value: f64, lo: f64, hi: f64) -> usize {
    let t = ((value - lo) / (hi - lo)).clamp(0.0, 1.0);
    plot.y1 - (t * plot.height() as f64) as usize
}

fn fmt_tick(value: f64) -> String {
    if value.abs() >= 1000.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.1}", value)
    }
}

fn draw_y_tick(frame: &mut Frame, plot: Rect, y: usize, label: &str) {
    let w = text::text_width(label, 2);
    text::draw_text(frame, plot.x0.saturating_sub(w + 8), y.saturating_sub(4), label, 2, INK);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colormap::sample;
    use forage_core::Configurable;
    use forage_policy::DqnPolicyConfig;

    fn episode(actions: Vec<usize>, states: Vec<Vec<Vec<f32>>>) -> EpisodeRecord {
        EpisodeRecord {
            actions,
            states,
            total_reward: 0.0,
        }
    }

    fn grid_with_agent(size: usize, at: &[(usize, usize)]) -> Vec<Vec<f32>> {
        let mut grid = vec![vec![0.0f32; size]; size];
        for &(row, col) in at {
            grid[row][col] = CELL_AGENT;
        }
        grid
    }

    fn column_has_color(frame: &Frame, x: usize, y0: usize, y1: usize, color: [u8; 3]) -> bool {
        (y0..y1).any(|y| frame.get_pixel(x, y) == Some(color))
    }

    #[test]
    fn action_distribution_draws_bars_for_counted_actions() -> Result<()> {
        let episodes = vec![episode(vec![0, 0, 0, 1], vec![])];
        let frame = action_distribution(&episodes)?;
        assert_eq!(frame.dimensions(), ACTION_DISTRIBUTION_SIZE);

        let rect = Rect {
            x0: 0,
            y0: 40,
            x1: ACTION_DISTRIBUTION_SIZE.0,
            y1: ACTION_DISTRIBUTION_SIZE.1,
        };
        let plot = plot_area(rect);
        let n = Move::ALL.len() as f64;
        let bar = |i: usize| plot.x0 + ((i as f64 + 0.5) / n * plot.width() as f64) as usize;
        // Stay was taken three times, Up once, the rest never.
        assert!(column_has_color(&frame, bar(0), plot.y0, plot.y1, [31, 119, 180]));
        assert!(column_has_color(&frame, bar(1), plot.y0, plot.y1, [31, 119, 180]));
        assert!(!column_has_color(&frame, bar(2), plot.y0, plot.y1, [31, 119, 180]));
        Ok(())
    }

    #[test]
    fn action_distribution_without_data_has_no_bars() -> Result<()> {
        let frame = action_distribution(&[])?;
        let rect = Rect {
            x0: 0,
            y0: 40,
            x1: ACTION_DISTRIBUTION_SIZE.0,
            y1: ACTION_DISTRIBUTION_SIZE.1,
        };
        let plot = plot_area(rect);
        for x in plot.x0..plot.x1 {
            assert!(!column_has_color(&frame, x, plot.y0, plot.y1, [31, 119, 180]));
        }
        Ok(())
    }

    #[test]
    fn out_of_range_actions_are_dropped() -> Result<()> {
        let episodes = vec![episode(vec![0, 17, 99], vec![])];
        let frame = action_distribution(&episodes)?;
        assert_eq!(frame.dimensions(), ACTION_DISTRIBUTION_SIZE);
        Ok(())
    }

    #[test]
    fn state_heatmap_colors_follow_visit_counts() -> Result<()> {
        let size = 4;
        let states = vec![
            grid_with_agent(size, &[(0, 0)]),
            grid_with_agent(size, &[(0, 0)]),
            grid_with_agent(size, &[(3, 3)]),
        ];
        let frame = state_heatmap(&[episode(vec![], states)], size)?;
        assert_eq!(frame.dimensions(), STATE_HEATMAP_SIZE);

        let rect = Rect {
            x0: 0,
            y0: 40,
            x1: STATE_HEATMAP_SIZE.0,
            y1: STATE_HEATMAP_SIZE.1,
        };
        let panel = Rect {
            x1: rect.x1 - COLORBAR_W - COLORBAR_GAP,
            ..rect
        };
        let plot = plot_area(panel);
        let center = |row: usize, col: usize| {
            (
                plot.x0 + ((col as f64 + 0.5) / size as f64 * plot.width() as f64) as usize,
                plot.y0 + ((row as f64 + 0.5) / size as f64 * plot.height() as f64) as usize,
            )
        };
        let (x, y) = center(0, 0);
        assert_eq!(frame.get_pixel(x, y), Some(sample(&YL_OR_RD, 1.0)));
        let (x, y) = center(3, 3);
        assert_eq!(frame.get_pixel(x, y), Some(sample(&YL_OR_RD, 0.5)));
        let (x, y) = center(1, 1);
        assert_eq!(frame.get_pixel(x, y), Some(sample(&YL_OR_RD, 0.0)));
        Ok(())
    }

    #[test]
    fn only_the_first_agent_cell_of_a_grid_counts() -> Result<()> {
        let size = 4;
        let states = vec![grid_with_agent(size, &[(0, 0), (2, 2)])];
        let frame = state_heatmap(&[episode(vec![], states)], size)?;

        let rect = Rect {
            x0: 0,
            y0: 40,
            x1: STATE_HEATMAP_SIZE.0,
            y1: STATE_HEATMAP_SIZE.1,
        };
        let panel = Rect {
            x1: rect.x1 - COLORBAR_W - COLORBAR_GAP,
            ..rect
        };
        let plot = plot_area(panel);
        let x = plot.x0 + ((2.5) / size as f64 * plot.width() as f64) as usize;
        let y = plot.y0 + ((2.5) / size as f64 * plot.height() as f64) as usize;
        assert_eq!(frame.get_pixel(x, y), Some(sample(&YL_OR_RD, 0.0)));
        Ok(())
    }

    #[test]
    fn grids_without_an_agent_are_skipped() -> Result<()> {
        let size = 4;
        let states = vec![vec![vec![0.0f32; size]; size]];
        let frame = state_heatmap(&[episode(vec![], states)], size)?;
        assert_eq!(frame.dimensions(), STATE_HEATMAP_SIZE);
        Ok(())
    }

    #[test]
    fn value_function_extremes_take_the_gradient_endpoints() -> Result<()> {
        let size = 4;
        let policy = DqnPolicy::build(
            DqnPolicyConfig::default().board_size(size).hidden_sizes(vec![8]),
        );
        let frame = value_function(&policy)?;
        assert_eq!(frame.dimensions(), VALUE_FUNCTION_SIZE);

        // Recompute the per-cell values the renderer colored.
        let aux = [1.0, 1.0, 1.0];
        let mut grid = vec![0.0f32; size * size];
        let mut best_cell = (0, 0);
        let mut worst_cell = (0, 0);
        let (mut best, mut worst) = (f32::NEG_INFINITY, f32::INFINITY);
        for row in 0..size {
            for col in 0..size {
                grid[row * size + col] = CELL_AGENT;
                let q = policy.q_values(&grid, &aux);
                grid[row * size + col] = 0.0;
                let v = q.iter().copied().fold(f32::NEG_INFINITY, f32::max);
                if v > best {
                    best = v;
                    best_cell = (row, col);
                }
                if v < worst {
                    worst = v;
                    worst_cell = (row, col);
                }
            }
        }

        let rect = Rect {
            x0: 0,
            y0: 40,
            x1: VALUE_FUNCTION_SIZE.0,
            y1: VALUE_FUNCTION_SIZE.1,
        };
        let panel = Rect {
            x1: rect.x1 - COLORBAR_W - COLORBAR_GAP,
            ..rect
        };
        let plot = plot_area(panel);
        let center = |row: usize, col: usize| {
            (
                plot.x0 + ((col as f64 + 0.5) / size as f64 * plot.width() as f64) as usize,
                plot.y0 + ((row as f64 + 0.5) / size as f64 * plot.height() as f64) as usize,
            )
        };
        let (x, y) = center(best_cell.0, best_cell.1);
        assert_eq!(frame.get_pixel(x, y), Some(sample(&VIRIDIS, 1.0)));
        let (x, y) = center(worst_cell.0, worst_cell.1);
        assert_eq!(frame.get_pixel(x, y), Some(sample(&VIRIDIS, 0.0)));
        Ok(())
    }

    #[test]
    fn gradient_sampling_is_used_for_intermediate_cells() {
        // Midpoint of YlOrRd is an anchor; the same value must come out of
        // the heatmap normalization path.
        assert_eq!(sample(&YL_OR_RD, 0.5), [253, 141, 60]);
    }
}
