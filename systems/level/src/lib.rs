#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Procedural dungeon generator.
//!
//! A level is carved out of solid rock in three passes: rooms are scattered
//! at random and rejected when they touch an earlier room, consecutive rooms
//! are joined with L-shaped corridors, and every remaining wall cell is
//! classified into an edge or corner variant by inspecting its neighbourhood.
//! The result is published as an immutable [`Level`] snapshot carrying the
//! tile map, the spawn and exit points and one collider per wall tile.

mod decor;
mod tiles;

use log::{debug, warn};
use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use spooknloot_core::{CellCoord, ConfigError, Hitbox, Rect, TileCode, Vec2};

pub use decor::{Decor, DecorConfig, FloorOverlay};
pub use tiles::TileMap;

/// Grid dimensions and room tuning for generated levels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    /// Grid width in tiles.
    pub columns: u32,
    /// Grid height in tiles.
    pub rows: u32,
    /// Side length of a tile in pixels.
    pub tile_length: f32,
    /// Number of room placement attempts.
    pub max_rooms: u32,
    /// Smallest room side in tiles.
    pub min_room_size: u32,
    /// Largest room side in tiles.
    pub max_room_size: u32,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            columns: 40,
            rows: 25,
            tile_length: 16.0,
            max_rooms: 8,
            min_room_size: 4,
            max_room_size: 8,
        }
    }
}

impl LevelConfig {
    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.columns == 0 || self.rows == 0 {
            return Err(ConfigError::EmptyGrid);
        }
        if self.tile_length <= 0.0 {
            return Err(ConfigError::NonPositive {
                field: "tile_length",
            });
        }
        if self.min_room_size == 0 {
            return Err(ConfigError::NonPositive {
                field: "min_room_size",
            });
        }
        if self.min_room_size > self.max_room_size {
            return Err(ConfigError::RoomSizeRange {
                min: self.min_room_size,
                max: self.max_room_size,
            });
        }
        // Rooms keep one wall tile on the near side and two on the far side.
        let needed = self.max_room_size.saturating_add(3);
        if needed > self.columns || needed > self.rows {
            return Err(ConfigError::RoomTooLarge {
                size: self.max_room_size,
                columns: self.columns,
                rows: self.rows,
            });
        }
        Ok(())
    }
}

/// Rectangular room measured in tiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Room {
    /// Leftmost column.
    pub x: u32,
    /// Topmost row.
    pub y: u32,
    /// Width in tiles.
    pub width: u32,
    /// Height in tiles.
    pub height: u32,
}

impl Room {
    /// Creates a new room.
    #[must_use]
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Center tile, rounding half sizes down.
    #[must_use]
    pub const fn center(&self) -> CellCoord {
        CellCoord::new(self.x + self.width / 2, self.y + self.height / 2)
    }

    /// Inclusive bounds test; rooms that share an edge or touch corners intersect.
    #[must_use]
    pub const fn intersects(&self, other: &Room) -> bool {
        self.x <= other.x + other.width
            && self.x + self.width >= other.x
            && self.y <= other.y + other.height
            && self.y + self.height >= other.y
    }

    /// Iterates over the interior tiles of the room in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = CellCoord> {
        let (x, width) = (self.x, self.width);
        (self.y..self.y + self.height)
            .flat_map(move |row| (x..x + width).map(move |column| CellCoord::new(column, row)))
    }
}

/// Immutable result of a generation run.
#[derive(Clone, Debug, PartialEq)]
pub struct Level {
    tiles: TileMap,
    rooms: Vec<Room>,
    tile_length: f32,
    spawn_tile: CellCoord,
    exit_tile: CellCoord,
    colliders: Vec<Rect>,
    decor: Decor,
    fallback: bool,
}

impl Level {
    /// Classified tile codes.
    #[must_use]
    pub fn tiles(&self) -> &TileMap {
        &self.tiles
    }

    /// Rooms accepted by the generator in placement order.
    #[must_use]
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// Side length of a tile in pixels.
    #[must_use]
    pub const fn tile_length(&self) -> f32 {
        self.tile_length
    }

    /// Tile the player starts on.
    #[must_use]
    pub const fn spawn_tile(&self) -> CellCoord {
        self.spawn_tile
    }

    /// Pixel position of the top-left corner of the spawn tile.
    #[must_use]
    pub fn spawn(&self) -> Vec2 {
        self.spawn_tile.to_rect(self.tile_length).origin()
    }

    /// Tile holding the exit.
    #[must_use]
    pub const fn exit_tile(&self) -> CellCoord {
        self.exit_tile
    }

    /// Pixel rectangle of the exit tile.
    #[must_use]
    pub fn exit(&self) -> Rect {
        self.exit_tile.to_rect(self.tile_length)
    }

    /// One rectangle per wall tile, in row-major order.
    #[must_use]
    pub fn colliders(&self) -> &[Rect] {
        &self.colliders
    }

    /// Cosmetic side content.
    #[must_use]
    pub fn decor(&self) -> &Decor {
        &self.decor
    }

    /// Reports whether no room could be placed and default points were used.
    #[must_use]
    pub const fn is_fallback(&self) -> bool {
        self.fallback
    }

    /// Pixel center of a tile.
    #[must_use]
    pub fn tile_center(&self, cell: CellCoord) -> Vec2 {
        cell.to_rect(self.tile_length).center()
    }

    /// Reports whether a rectangle strictly overlaps the exit tile.
    #[must_use]
    pub fn exit_overlaps(&self, rect: &Rect) -> bool {
        self.exit().overlaps(rect)
    }

    /// Picks up to `count` distinct floor tiles at random and returns the
    /// sprite positions that center `hitbox` on each of them.
    pub fn random_floor_positions<R: Rng + ?Sized>(
        &self,
        count: usize,
        hitbox: &Hitbox,
        rng: &mut R,
    ) -> Vec<Vec2> {
        if count == 0 {
            return Vec::new();
        }

        let mut floor: Vec<CellCoord> = self
            .tiles
            .iter()
            .filter(|(_, code)| *code == TileCode::Floor)
            .map(|(cell, _)| cell)
            .collect();
        floor.shuffle(rng);
        floor.truncate(count);
        floor
            .into_iter()
            .map(|cell| hitbox.sprite_origin_within(&cell.to_rect(self.tile_length)))
            .collect()
    }
}

/// Builds dungeon levels from a fixed configuration.
#[derive(Clone, Debug, Default)]
pub struct LevelGenerator {
    config: LevelConfig,
    decor: DecorConfig,
}

impl LevelGenerator {
    /// Creates a generator with the provided tuning.
    #[must_use]
    pub const fn new(config: LevelConfig, decor: DecorConfig) -> Self {
        Self { config, decor }
    }

    /// Generates a level reproducibly from a seed.
    #[must_use]
    pub fn generate_seeded(&self, seed: u64) -> Level {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        self.generate_with(&mut rng)
    }

    /// Generates a level seeded from operating system entropy.
    #[must_use]
    pub fn generate(&self) -> Level {
        let mut rng = ChaCha8Rng::from_entropy();
        self.generate_with(&mut rng)
    }

    /// Generates a level drawing every random decision from `rng`.
    pub fn generate_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Level {
        let config = &self.config;
        let mut tiles = TileMap::filled(config.columns, config.rows, TileCode::WallTop);
        let mut rooms: Vec<Room> = Vec::new();

        for _ in 0..config.max_rooms {
            let Some(candidate) = self.roll_room(rng) else {
                continue;
            };
            if rooms.iter().any(|room| room.intersects(&candidate)) {
                continue;
            }

            for cell in candidate.cells() {
                tiles.set(cell, TileCode::Floor);
            }

            if let Some(previous) = rooms.last() {
                let from = previous.center();
                let to = candidate.center();
                if rng.gen_bool(0.5) {
                    let elbow = CellCoord::new(to.column(), from.row());
                    tiles.carve_line(from, elbow);
                    tiles.carve_line(elbow, to);
                } else {
                    let elbow = CellCoord::new(from.column(), to.row());
                    tiles.carve_line(from, elbow);
                    tiles.carve_line(elbow, to);
                }
            }

            rooms.push(candidate);
        }

        let (spawn_tile, exit_tile, fallback) = match (rooms.first(), rooms.last()) {
            (Some(first), Some(last)) => {
                tiles.set(last.center(), TileCode::Exit);
                (first.center(), last.center(), false)
            }
            _ => {
                warn!(
                    "no room fit a {}x{} grid, using default spawn and exit",
                    config.columns, config.rows
                );
                (
                    CellCoord::new(2, 2),
                    CellCoord::new(
                        config.columns.saturating_sub(3),
                        config.rows.saturating_sub(3),
                    ),
                    true,
                )
            }
        };

        tiles::classify_walls(&mut tiles);

        let colliders: Vec<Rect> = tiles
            .iter()
            .filter(|(_, code)| code.is_wall())
            .map(|(cell, _)| cell.to_rect(config.tile_length))
            .collect();

        let decor = decor::decorate(&self.decor, &tiles, &rooms, spawn_tile, rng);

        debug!(
            "generated level with {} rooms, {} colliders, spawn {:?}, exit {:?}",
            rooms.len(),
            colliders.len(),
            spawn_tile,
            exit_tile
        );

        Level {
            tiles,
            rooms,
            tile_length: config.tile_length,
            spawn_tile,
            exit_tile,
            colliders,
            decor,
            fallback,
        }
    }

    fn roll_room<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Room> {
        let config = &self.config;
        if config.min_room_size == 0 || config.min_room_size > config.max_room_size {
            return None;
        }

        let width = rng.gen_range(config.min_room_size..=config.max_room_size);
        let height = rng.gen_range(config.min_room_size..=config.max_room_size);
        let x_span = config.columns.checked_sub(width.checked_add(2)?)?;
        let y_span = config.rows.checked_sub(height.checked_add(2)?)?;
        if x_span == 0 || y_span == 0 {
            return None;
        }

        let x = rng.gen_range(0..x_span) + 1;
        let y = rng.gen_range(0..y_span) + 1;
        Some(Room::new(x, y, width, height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(LevelConfig::default().validate(), Ok(()));
        assert_eq!(DecorConfig::default().validate(), Ok(()));
    }

    #[test]
    fn validation_rejects_rooms_that_do_not_fit() {
        let config = LevelConfig {
            columns: 10,
            ..LevelConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::RoomTooLarge {
                size: 8,
                columns: 10,
                rows: 25
            })
        );

        let inverted = LevelConfig {
            min_room_size: 6,
            max_room_size: 5,
            ..LevelConfig::default()
        };
        assert_eq!(
            inverted.validate(),
            Err(ConfigError::RoomSizeRange { min: 6, max: 5 })
        );
    }

    #[test]
    fn rooms_touching_edges_intersect() {
        let room = Room::new(2, 2, 4, 4);
        assert!(room.intersects(&Room::new(6, 2, 4, 4)));
        assert!(room.intersects(&Room::new(6, 6, 3, 3)));
        assert!(!room.intersects(&Room::new(7, 2, 4, 4)));
    }

    #[test]
    fn room_center_rounds_down() {
        assert_eq!(Room::new(1, 1, 5, 4).center(), CellCoord::new(3, 3));
    }

    #[test]
    fn rooms_stay_inside_margins() {
        let generator = LevelGenerator::default();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for _ in 0..500 {
            let room = generator.roll_room(&mut rng).expect("default config fits");
            assert!(room.x >= 1 && room.y >= 1);
            assert!(room.x + room.width <= 40 - 2);
            assert!(room.y + room.height <= 25 - 2);
        }
    }
}
