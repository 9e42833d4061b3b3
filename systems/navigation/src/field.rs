//! Dense flow field rebuilt from scratch on every recompute.

use std::collections::VecDeque;

use spooknloot_core::{CellCoord, Rect, Vec2};

pub(crate) const UNREACHABLE: u32 = u32::MAX;

/// Breadth-first costs toward a single target cell plus the steering
/// direction derived from them.
///
/// Costs default to [`UNREACHABLE`] so callers can tell blocked or sealed-off
/// cells from traversable ones.
#[derive(Clone, Debug, Default)]
pub(crate) struct FlowField {
    columns: u32,
    rows: u32,
    cell_size: f32,
    blocked: Vec<bool>,
    costs: Vec<u32>,
    directions: Vec<Vec2>,
}

impl FlowField {
    /// Rebuilds the field for the provided obstacles and target position.
    pub(crate) fn rebuild(&mut self, cell_size: f32, obstacles: &[Rect], target: Vec2) {
        let (columns, rows) = grid_extent(cell_size, obstacles);
        self.resize(columns, rows, cell_size);
        if self.costs.is_empty() {
            return;
        }

        for obstacle in obstacles {
            self.mark_blocked(obstacle);
        }

        if let Some(seed) = self.cell_at(target) {
            self.expand_from(seed);
        }

        self.derive_directions();
    }

    pub(crate) const fn columns(&self) -> u32 {
        self.columns
    }

    pub(crate) const fn rows(&self) -> u32 {
        self.rows
    }

    pub(crate) const fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Grid cell containing a world position, if it lies inside the field.
    pub(crate) fn cell_at(&self, position: Vec2) -> Option<CellCoord> {
        if self.cell_size <= 0.0 || !position.is_finite() || position.x < 0.0 || position.y < 0.0 {
            return None;
        }

        let column = (position.x / self.cell_size).floor() as u32;
        let row = (position.y / self.cell_size).floor() as u32;
        if column >= self.columns || row >= self.rows {
            return None;
        }
        Some(CellCoord::new(column, row))
    }

    pub(crate) fn is_blocked(&self, cell: CellCoord) -> bool {
        self.index(cell)
            .map_or(true, |index| self.blocked[index])
    }

    pub(crate) fn cost(&self, cell: CellCoord) -> Option<u32> {
        self.index(cell)
            .map(|index| self.costs[index])
            .filter(|cost| *cost != UNREACHABLE)
    }

    pub(crate) fn direction(&self, cell: CellCoord) -> Option<Vec2> {
        self.index(cell).map(|index| self.directions[index])
    }

    fn resize(&mut self, columns: u32, rows: u32, cell_size: f32) {
        let cell_count = (columns as usize).saturating_mul(rows as usize);
        if self.costs.len() != cell_count || self.columns != columns || self.rows != rows {
            self.blocked = vec![false; cell_count];
            self.costs = vec![UNREACHABLE; cell_count];
            self.directions = vec![Vec2::ZERO; cell_count];
        } else {
            self.blocked.fill(false);
            self.costs.fill(UNREACHABLE);
            self.directions.fill(Vec2::ZERO);
        }
        self.columns = columns;
        self.rows = rows;
        self.cell_size = cell_size;
    }

    fn mark_blocked(&mut self, obstacle: &Rect) {
        let Some((first_column, last_column)) =
            covered_span(obstacle.x, obstacle.max_x(), self.cell_size, self.columns)
        else {
            return;
        };
        let Some((first_row, last_row)) =
            covered_span(obstacle.y, obstacle.max_y(), self.cell_size, self.rows)
        else {
            return;
        };

        for row in first_row..=last_row {
            for column in first_column..=last_column {
                if let Some(index) = self.index(CellCoord::new(column, row)) {
                    self.blocked[index] = true;
                }
            }
        }
    }

    fn expand_from(&mut self, seed: CellCoord) {
        let Some(seed_index) = self.index(seed) else {
            return;
        };
        if self.blocked[seed_index] {
            return;
        }

        self.costs[seed_index] = 0;
        let mut queue = VecDeque::new();
        queue.push_back(seed);

        while let Some(cell) = queue.pop_front() {
            let Some(current_index) = self.index(cell) else {
                continue;
            };
            let next_cost = self.costs[current_index].saturating_add(1);

            for (neighbor, _) in neighbors(cell, self.columns, self.rows) {
                let Some(neighbor_index) = self.index(neighbor) else {
                    continue;
                };
                if self.blocked[neighbor_index] || self.costs[neighbor_index] <= next_cost {
                    continue;
                }

                self.costs[neighbor_index] = next_cost;
                queue.push_back(neighbor);
            }
        }
    }

    fn derive_directions(&mut self) {
        for row in 0..self.rows {
            for column in 0..self.columns {
                let cell = CellCoord::new(column, row);
                let Some(index) = self.index(cell) else {
                    continue;
                };
                let cost = self.costs[index];
                if self.blocked[index] || cost == UNREACHABLE || cost == 0 {
                    continue;
                }

                // First strictly cheaper neighbour wins.
                let step = neighbors(cell, self.columns, self.rows).find_map(|(neighbor, step)| {
                    let neighbor_cost = self.index(neighbor).map(|i| self.costs[i])?;
                    (neighbor_cost < cost).then_some(step)
                });
                if let Some(step) = step {
                    self.directions[index] = step;
                }
            }
        }
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() >= self.columns || cell.row() >= self.rows {
            return None;
        }
        let width = usize::try_from(self.columns).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let row = usize::try_from(cell.row()).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }
}

/// Grid dimensions covering the far edges of every obstacle.
fn grid_extent(cell_size: f32, obstacles: &[Rect]) -> (u32, u32) {
    if cell_size <= 0.0 {
        return (0, 0);
    }

    let (max_x, max_y) = obstacles
        .iter()
        .fold((0.0f32, 0.0f32), |(x, y), rect| {
            (x.max(rect.max_x()), y.max(rect.max_y()))
        });
    (
        (max_x / cell_size).ceil().max(0.0) as u32,
        (max_y / cell_size).ceil().max(0.0) as u32,
    )
}

/// Inclusive range of cells whose interior overlaps `[start, end)`.
fn covered_span(start: f32, end: f32, cell_size: f32, count: u32) -> Option<(u32, u32)> {
    if count == 0 || end <= 0.0 || end <= start {
        return None;
    }

    let first = (start.max(0.0) / cell_size).floor() as u32;
    let last = ((end / cell_size).ceil() as u32).saturating_sub(1);
    if first >= count {
        return None;
    }
    Some((first, last.min(count - 1)))
}

/// Four-connected neighbours in east, west, south, north order, paired with
/// the unit step leading to them.
fn neighbors(cell: CellCoord, columns: u32, rows: u32) -> impl Iterator<Item = (CellCoord, Vec2)> {
    let mut candidates = [None; 4];
    let mut count = 0;

    if let Some(column) = cell.column().checked_add(1) {
        if column < columns {
            candidates[count] = Some((CellCoord::new(column, cell.row()), Vec2::X));
            count += 1;
        }
    }

    if let Some(column) = cell.column().checked_sub(1) {
        candidates[count] = Some((CellCoord::new(column, cell.row()), Vec2::NEG_X));
        count += 1;
    }

    if let Some(row) = cell.row().checked_add(1) {
        if row < rows {
            candidates[count] = Some((CellCoord::new(cell.column(), row), Vec2::Y));
            count += 1;
        }
    }

    if let Some(row) = cell.row().checked_sub(1) {
        candidates[count] = Some((CellCoord::new(cell.column(), row), Vec2::NEG_Y));
        count += 1;
    }

    candidates.into_iter().take(count).flatten()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rebuild_sets_target_cell_to_zero() {
        let mut field = FlowField::default();
        field.resize(3, 4, 16.0);
        field.expand_from(CellCoord::new(1, 2));
        field.derive_directions();

        assert_eq!(field.cost(CellCoord::new(1, 2)), Some(0));
        assert_eq!(field.cost(CellCoord::new(1, 1)), Some(1));
        assert_eq!(field.cost(CellCoord::new(1, 0)), Some(2));
        assert_eq!(field.cost(CellCoord::new(0, 0)), Some(3));
        assert_eq!(field.direction(CellCoord::new(1, 2)), Some(Vec2::ZERO));
        assert_eq!(field.direction(CellCoord::new(0, 0)), Some(Vec2::X));
    }

    #[test]
    fn obstacles_block_every_touched_cell() {
        let mut field = FlowField::default();
        let obstacles = [
            Rect::new(16.0, 16.0, 16.0, 16.0),
            Rect::new(40.0, 0.0, 8.0, 8.0),
            Rect::new(0.0, 48.0, 64.0, 16.0),
        ];
        field.rebuild(16.0, &obstacles, Vec2::new(8.0, 8.0));

        assert_eq!((field.columns(), field.rows()), (4, 4));
        assert!(field.is_blocked(CellCoord::new(1, 1)));
        assert!(!field.is_blocked(CellCoord::new(0, 1)));
        assert!(!field.is_blocked(CellCoord::new(2, 1)));
        assert!(field.is_blocked(CellCoord::new(2, 0)));
        assert!(!field.is_blocked(CellCoord::new(3, 0)));
        assert!((0..4).all(|column| field.is_blocked(CellCoord::new(column, 3))));
        assert!(field.is_blocked(CellCoord::new(9, 9)), "outside counts as blocked");
    }

    #[test]
    fn blocked_target_leaves_field_unreachable() {
        let mut field = FlowField::default();
        let obstacles = [Rect::new(0.0, 0.0, 16.0, 16.0), Rect::new(48.0, 48.0, 16.0, 16.0)];
        field.rebuild(16.0, &obstacles, Vec2::new(4.0, 4.0));

        for row in 0..field.rows() {
            for column in 0..field.columns() {
                let cell = CellCoord::new(column, row);
                assert_eq!(field.cost(cell), None);
                assert_eq!(field.direction(cell), Some(Vec2::ZERO));
            }
        }
    }

    #[test]
    fn covered_span_excludes_touching_cells() {
        assert_eq!(covered_span(16.0, 32.0, 16.0, 10), Some((1, 1)));
        assert_eq!(covered_span(15.0, 33.0, 16.0, 10), Some((0, 2)));
        assert_eq!(covered_span(-20.0, 4.0, 16.0, 10), Some((0, 0)));
        assert_eq!(covered_span(200.0, 220.0, 16.0, 10), None);
    }
}
