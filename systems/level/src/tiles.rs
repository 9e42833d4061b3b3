use spooknloot_core::{CellCoord, TileCode};

/// Row-major grid of tile codes describing a generated level.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileMap {
    columns: u32,
    rows: u32,
    codes: Vec<TileCode>,
}

impl TileMap {
    pub(crate) fn filled(columns: u32, rows: u32, code: TileCode) -> Self {
        let len = (columns as usize).saturating_mul(rows as usize);
        Self {
            columns,
            rows,
            codes: vec![code; len],
        }
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Code stored at the provided cell, or `None` outside the grid.
    #[must_use]
    pub fn code(&self, column: u32, row: u32) -> Option<TileCode> {
        self.index(column, row).map(|index| self.codes[index])
    }

    /// Code stored at the provided cell coordinate.
    #[must_use]
    pub fn code_at(&self, cell: CellCoord) -> Option<TileCode> {
        self.code(cell.column(), cell.row())
    }

    /// Iterates over every cell in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, TileCode)> + '_ {
        let columns = self.columns.max(1);
        self.codes.iter().enumerate().map(move |(index, code)| {
            let index = index as u32;
            (CellCoord::new(index % columns, index / columns), *code)
        })
    }

    /// Reports whether the cell holds walkable floor.
    #[must_use]
    pub fn is_floor(&self, column: u32, row: u32) -> bool {
        self.code(column, row) == Some(TileCode::Floor)
    }

    pub(crate) fn set(&mut self, cell: CellCoord, code: TileCode) {
        if let Some(index) = self.index(cell.column(), cell.row()) {
            self.codes[index] = code;
        }
    }

    /// Carves the inclusive straight run between two cells sharing a row or column.
    pub(crate) fn carve_line(&mut self, from: CellCoord, to: CellCoord) {
        if from.column() == to.column() {
            let (start, end) = ordered(from.row(), to.row());
            for row in start..=end {
                self.set(CellCoord::new(from.column(), row), TileCode::Floor);
            }
        } else if from.row() == to.row() {
            let (start, end) = ordered(from.column(), to.column());
            for column in start..=end {
                self.set(CellCoord::new(column, from.row()), TileCode::Floor);
            }
        }
    }

    fn index(&self, column: u32, row: u32) -> Option<usize> {
        if column >= self.columns || row >= self.rows {
            return None;
        }
        let width = usize::try_from(self.columns).ok()?;
        let row = usize::try_from(row).ok()?;
        let column = usize::try_from(column).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }
}

fn ordered(a: u32, b: u32) -> (u32, u32) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Replaces every non-floor, non-exit cell with the wall variant matching
/// its neighbourhood. Neighbours are read from a snapshot taken before the
/// pass so the scan order cannot influence the result.
pub(crate) fn classify_walls(tiles: &mut TileMap) {
    let snapshot = tiles.clone();
    let is_floor = |column: i64, row: i64| -> bool {
        match (u32::try_from(column), u32::try_from(row)) {
            (Ok(column), Ok(row)) => snapshot.is_floor(column, row),
            _ => false,
        }
    };

    for (cell, code) in snapshot.iter() {
        if matches!(code, TileCode::Floor | TileCode::Exit) {
            continue;
        }

        let column = i64::from(cell.column());
        let row = i64::from(cell.row());
        let neighbourhood = Neighbourhood {
            up: is_floor(column, row - 1),
            down: is_floor(column, row + 1),
            left: is_floor(column - 1, row),
            right: is_floor(column + 1, row),
            up_left: is_floor(column - 1, row - 1),
            up_right: is_floor(column + 1, row - 1),
            down_left: is_floor(column - 1, row + 1),
            down_right: is_floor(column + 1, row + 1),
        };
        tiles.set(cell, neighbourhood.classify(cell.row() == 0));
    }
}

/// Floor occupancy of the eight cells surrounding a wall.
#[derive(Clone, Copy, Debug, Default)]
struct Neighbourhood {
    up: bool,
    down: bool,
    left: bool,
    right: bool,
    up_left: bool,
    up_right: bool,
    down_left: bool,
    down_right: bool,
}

impl Neighbourhood {
    fn any_floor(&self) -> bool {
        self.up
            || self.down
            || self.left
            || self.right
            || self.up_left
            || self.up_right
            || self.down_left
            || self.down_right
    }

    fn classify(&self, top_row: bool) -> TileCode {
        if !self.any_floor() {
            return TileCode::Void;
        }

        // Outer corners touch floor only diagonally.
        if self.down_right && !self.right && !self.down {
            return TileCode::CornerTopLeft;
        }
        if self.down_left && !self.left && !self.down {
            return TileCode::CornerTopRight;
        }
        if self.up_right && !self.right && !self.up {
            return TileCode::CornerBottomLeft;
        }
        if self.up_left && !self.left && !self.up {
            return TileCode::CornerBottomRight;
        }

        if top_row && self.down {
            return TileCode::WallTop;
        }
        if self.down && !self.up {
            return TileCode::WallTop;
        }
        if self.up && !self.down {
            return TileCode::WallBottom;
        }
        if self.right && !self.left {
            return TileCode::WallLeft;
        }
        if self.left && !self.right {
            return TileCode::WallRight;
        }

        // Floor on opposing sides has no dedicated sprite.
        TileCode::WallTop
    }
}
