#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared flow-field navigation toward a single moving target.
//!
//! Instead of searching a path per agent, the navigator runs one
//! breadth-first expansion from the target cell across a grid derived from
//! the obstacle rectangles and stores, for every reachable cell, the cardinal
//! step leading to a cheaper neighbour. Agents only sample the field. The
//! field is rebuilt when obstacles change or after a fixed number of ticks,
//! so a moving target is tracked with bounded staleness.

mod field;

use log::debug;
use serde::{Deserialize, Serialize};
use spooknloot_core::{CellCoord, ConfigError, Rect, Vec2};

use crate::field::FlowField;

/// Tuning for the navigator.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigatorConfig {
    /// Side length of a navigation cell in pixels.
    pub cell_size: f32,
    /// Ticks between rebuilds while obstacles stay unchanged.
    pub recompute_interval: u32,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            cell_size: 16.0,
            recompute_interval: 6,
        }
    }
}

impl NavigatorConfig {
    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cell_size <= 0.0 || !self.cell_size.is_finite() {
            return Err(ConfigError::ZeroCellSize);
        }
        if self.recompute_interval == 0 {
            return Err(ConfigError::ZeroInterval {
                field: "recompute_interval",
            });
        }
        Ok(())
    }
}

/// Owns the obstacle set and the flow field computed from it.
#[derive(Clone, Debug)]
pub struct Navigator {
    config: NavigatorConfig,
    obstacles: Vec<Rect>,
    field: FlowField,
    built: bool,
    dirty: bool,
    ticks_since_rebuild: u32,
    rebuilds: u64,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(NavigatorConfig::default())
    }
}

impl Navigator {
    /// Creates an inactive navigator.
    #[must_use]
    pub fn new(config: NavigatorConfig) -> Self {
        Self {
            config,
            obstacles: Vec::new(),
            field: FlowField::default(),
            built: false,
            dirty: false,
            ticks_since_rebuild: 0,
            rebuilds: 0,
        }
    }

    /// Replaces the obstacle set and forces a rebuild on the next tick.
    pub fn set_obstacles(&mut self, obstacles: Vec<Rect>) {
        debug!("navigator received {} obstacles", obstacles.len());
        self.obstacles = obstacles;
        self.dirty = true;
    }

    /// Drops every obstacle and the field built from them.
    pub fn clear_obstacles(&mut self) {
        self.obstacles.clear();
        self.field = FlowField::default();
        self.built = false;
        self.dirty = false;
        self.ticks_since_rebuild = 0;
    }

    /// Current obstacle set.
    #[must_use]
    pub fn obstacles(&self) -> &[Rect] {
        &self.obstacles
    }

    /// Reports whether obstacles are installed and sampling is meaningful.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.obstacles.is_empty()
    }

    /// Reports whether a rebuild is pending because obstacles changed.
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Number of rebuilds performed since construction.
    #[must_use]
    pub const fn rebuild_count(&self) -> u64 {
        self.rebuilds
    }

    /// Advances the elapsed-tick counter and rebuilds the field toward
    /// `target` when it is dirty, missing or older than the recompute
    /// interval. Returns whether a rebuild happened.
    pub fn tick(&mut self, target: Vec2) -> bool {
        if !self.is_active() {
            return false;
        }

        self.ticks_since_rebuild = self.ticks_since_rebuild.saturating_add(1);
        let stale = self.ticks_since_rebuild >= self.config.recompute_interval.max(1);
        if !(self.dirty || !self.built || stale) {
            return false;
        }

        self.rebuild(target);
        true
    }

    /// Rebuilds the field immediately regardless of cadence.
    pub fn rebuild(&mut self, target: Vec2) {
        self.field
            .rebuild(self.config.cell_size, &self.obstacles, target);
        self.built = true;
        self.dirty = false;
        self.ticks_since_rebuild = 0;
        self.rebuilds = self.rebuilds.saturating_add(1);
        debug!(
            "flow field rebuilt at {}x{} toward {:?}",
            self.field.columns(),
            self.field.rows(),
            target
        );
    }

    /// Samples the steering direction at a world position.
    ///
    /// Returns `None` before the first rebuild, outside the grid, on blocked
    /// cells and on cells without an improving neighbour (the target cell and
    /// unreachable cells). Callers steer directly toward the target instead.
    #[must_use]
    pub fn sample(&self, position: Vec2) -> Option<Vec2> {
        if !self.built {
            return None;
        }

        let cell = self.field.cell_at(position)?;
        if self.field.is_blocked(cell) {
            return None;
        }

        self.field
            .direction(cell)
            .filter(|direction| *direction != Vec2::ZERO)
    }

    /// Center of the navigation cell containing a world position.
    #[must_use]
    pub fn cell_center(&self, position: Vec2) -> Option<Vec2> {
        if !self.built {
            return None;
        }
        let cell = self.field.cell_at(position)?;
        Some(cell.to_rect(self.field.cell_size()).center())
    }

    /// Read-only view of the current field for debug overlays.
    #[must_use]
    pub fn view(&self) -> FlowFieldView<'_> {
        FlowFieldView {
            field: &self.field,
            built: self.built,
        }
    }
}

/// Borrowed view of a flow field.
#[derive(Clone, Copy, Debug)]
pub struct FlowFieldView<'a> {
    field: &'a FlowField,
    built: bool,
}

impl FlowFieldView<'_> {
    /// Reports whether the field has been built at least once.
    #[must_use]
    pub const fn is_built(&self) -> bool {
        self.built
    }

    /// Dimensions of the grid as `(columns, rows)`.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.field.columns(), self.field.rows())
    }

    /// Side length of a cell in pixels.
    #[must_use]
    pub const fn cell_size(&self) -> f32 {
        self.field.cell_size()
    }

    /// Cell containing a world position.
    #[must_use]
    pub fn cell_at(&self, position: Vec2) -> Option<CellCoord> {
        self.field.cell_at(position)
    }

    /// Reports whether a cell is blocked. Cells outside the grid count as blocked.
    #[must_use]
    pub fn is_blocked(&self, cell: CellCoord) -> bool {
        self.field.is_blocked(cell)
    }

    /// Breadth-first cost of a cell, or `None` when it is blocked, unreachable
    /// or outside the grid.
    #[must_use]
    pub fn cost(&self, cell: CellCoord) -> Option<u32> {
        self.field.cost(cell)
    }

    /// Stored direction of a cell; the zero vector marks cells without an
    /// improving neighbour.
    #[must_use]
    pub fn direction(&self, cell: CellCoord) -> Option<Vec2> {
        self.field.direction(cell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inactive_navigator_never_rebuilds() {
        let mut navigator = Navigator::default();
        assert!(!navigator.tick(Vec2::new(10.0, 10.0)));
        assert_eq!(navigator.sample(Vec2::new(10.0, 10.0)), None);
        assert_eq!(navigator.rebuild_count(), 0);
    }

    #[test]
    fn cell_center_needs_a_built_field() {
        let mut navigator = Navigator::default();
        navigator.set_obstacles(vec![Rect::new(48.0, 48.0, 16.0, 16.0)]);
        assert_eq!(navigator.cell_center(Vec2::new(20.0, 35.0)), None);

        navigator.rebuild(Vec2::new(8.0, 8.0));
        assert_eq!(
            navigator.cell_center(Vec2::new(20.0, 35.0)),
            Some(Vec2::new(24.0, 40.0))
        );
        assert_eq!(navigator.cell_center(Vec2::new(100.0, 10.0)), None);
    }

    #[test]
    fn validation_rejects_degenerate_values() {
        let zero_cell = NavigatorConfig {
            cell_size: 0.0,
            ..NavigatorConfig::default()
        };
        assert_eq!(zero_cell.validate(), Err(ConfigError::ZeroCellSize));

        let zero_interval = NavigatorConfig {
            recompute_interval: 0,
            ..NavigatorConfig::default()
        };
        assert_eq!(
            zero_interval.validate(),
            Err(ConfigError::ZeroInterval {
                field: "recompute_interval"
            })
        );
        assert_eq!(NavigatorConfig::default().validate(), Ok(()));
    }
}
