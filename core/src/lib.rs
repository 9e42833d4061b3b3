#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the spooknloot game core.
//!
//! This crate defines the vocabulary that connects the excluded presentation
//! collaborators (rendering, audio, input), the authoritative session in the
//! world crate, and the pure systems. Collaborators submit [`Command`] values,
//! the world executes them through its `apply` entry point and broadcasts
//! [`Event`] values describing what happened. Systems only ever see the
//! geometric snapshots defined here, never raw session state.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use glam::Vec2;

/// Describes which part of the game the session is currently simulating.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    /// Hand-authored hub map; collisions come from tile layers.
    Overworld,
    /// Procedurally generated dungeon level.
    Dungeon,
    /// Hand-authored arena hosting the boss fight.
    BossArena,
}

/// Commands that express all permissible session mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Installs the overworld collision layers and mob spawn tiles.
    ConfigureOverworld {
        /// Side length of a single overworld tile in pixels.
        tile_length: f32,
        /// Tile layers flagged as solid by the map loader.
        collider_layers: Vec<TileLayer>,
        /// Tiles mobs may appear on while the player roams the overworld.
        spawn_tiles: Vec<CellCoord>,
    },
    /// Installs the geometry of the boss arena.
    ConfigureBossArena {
        /// Solid rectangles derived from the arena's collider layers.
        colliders: Vec<Rect>,
        /// Pixel position the player is moved to on entry.
        player_spawn: Vec2,
        /// Pixel position the boss appears at.
        boss_spawn: Vec2,
    },
    /// Generates a fresh dungeon level and populates it with a wave.
    EnterDungeon,
    /// Abandons the dungeon and returns to the overworld.
    LeaveDungeon,
    /// Advances the simulation by one frame.
    Tick {
        /// Current hitbox of the player; its origin is the mobs' target.
        player_hitbox: Rect,
    },
    /// Applies damage to the mob stored at the provided index.
    DamageMob {
        /// Index of the mob receiving damage.
        mob: MobIndex,
        /// Amount of health removed.
        amount: f32,
    },
    /// Applies damage to the living mob closest to a point if it is within reach.
    StrikeClosest {
        /// Point the strike originates from.
        from: Vec2,
        /// Maximum distance between the point and the mob's hitbox center.
        reach: f32,
        /// Amount of health removed.
        amount: f32,
    },
    /// Restarts the run after the player died.
    ResetRun,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Announces that the session switched to another mode.
    ModeChanged {
        /// Mode active after processing the command.
        mode: Mode,
    },
    /// Confirms that a dungeon level was generated.
    LevelGenerated {
        /// Zero-based index of the level within the current run.
        level_index: u32,
        /// Pixel position where the player starts.
        spawn: Vec2,
        /// Tile rectangle of the exit.
        exit: Rect,
        /// Number of rooms accepted by the generator.
        rooms: usize,
        /// Whether the generator fell back to default spawn and exit points.
        fallback: bool,
    },
    /// Requests that the player collaborator move the player.
    PlayerRelocated {
        /// New pixel position of the player.
        position: Vec2,
    },
    /// Confirms that mobs were added to the population.
    MobsSpawned {
        /// Number of mobs added.
        count: usize,
    },
    /// Reports that a mob's swing connected with the player.
    PlayerStruck {
        /// Index of the attacking mob.
        mob: MobIndex,
        /// Damage the player collaborator should apply.
        damage: f32,
    },
    /// Reports that a mob lost health.
    MobDamaged {
        /// Index of the damaged mob.
        mob: MobIndex,
        /// Health remaining after the damage was applied.
        health: f32,
    },
    /// Reports that a mob's health reached zero.
    MobDied {
        /// Index of the mob that died.
        mob: MobIndex,
    },
    /// Reports that a dead mob finished its death animation and rose again.
    MobRevived {
        /// Index of the revived mob.
        mob: MobIndex,
    },
    /// Reports that the boss entered the arena.
    BossSpawned {
        /// Index assigned to the boss.
        mob: MobIndex,
    },
    /// Reports that the player picked up the level's health potion.
    PotionCollected {
        /// Fraction of the player's maximum health to restore, limited by
        /// the health actually missing.
        heal_fraction: f32,
    },
    /// Reports that the exit tile became visible.
    ExitRevealed,
    /// Reports that the exit tile was hidden again.
    ExitHidden,
    /// Reports that the player left a cleared level through its exit.
    LevelCleared {
        /// Number of levels cleared during the current run.
        cleared: u32,
    },
}

/// Errors reported when validating tuning values.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// The tile grid has no cells.
    #[error("grid must have at least one column and one row")]
    EmptyGrid,
    /// The minimum room size exceeds the maximum room size.
    #[error("room size range {min}..={max} is empty")]
    RoomSizeRange {
        /// Configured minimum side length.
        min: u32,
        /// Configured maximum side length.
        max: u32,
    },
    /// The largest room cannot be placed inside the grid margins.
    #[error("rooms of up to {size} tiles do not fit a {columns}x{rows} grid")]
    RoomTooLarge {
        /// Configured maximum side length.
        size: u32,
        /// Configured grid columns.
        columns: u32,
        /// Configured grid rows.
        rows: u32,
    },
    /// The navigation cell size is zero or negative.
    #[error("navigation cell size must be positive")]
    ZeroCellSize,
    /// A frame interval was configured as zero.
    #[error("{field} must be at least one frame")]
    ZeroInterval {
        /// Name of the offending field.
        field: &'static str,
    },
    /// The engagement band does not contain any distance.
    #[error("engagement band {min}..{max} is empty")]
    EngagementBand {
        /// Configured inner radius.
        min: f32,
        /// Configured outer radius.
        max: f32,
    },
    /// A uniform spawn range is inverted.
    #[error("spawn range {min}..={max} is empty")]
    SpawnRange {
        /// Configured lower bound.
        min: u32,
        /// Configured upper bound.
        max: u32,
    },
    /// A quantity that must be strictly positive was not.
    #[error("{field} must be positive")]
    NonPositive {
        /// Name of the offending field.
        field: &'static str,
    },
}

/// Axis-aligned rectangle measured in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Horizontal extent.
    pub width: f32,
    /// Vertical extent.
    pub height: f32,
}

impl Rect {
    /// Creates a rectangle from its top-left corner and extents.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates a rectangle from a top-left corner and a size vector.
    #[must_use]
    pub fn from_origin_and_size(origin: Vec2, size: Vec2) -> Self {
        Self::new(origin.x, origin.y, size.x, size.y)
    }

    /// Top-left corner.
    #[must_use]
    pub fn origin(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Extents as a vector.
    #[must_use]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Right edge.
    #[must_use]
    pub fn max_x(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge.
    #[must_use]
    pub fn max_y(&self) -> f32 {
        self.y + self.height
    }

    /// Geometric center.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Reports whether the interiors of two rectangles intersect.
    ///
    /// Rectangles that merely share an edge do not overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.max_x()
            && self.max_x() > other.x
            && self.y < other.max_y()
            && self.max_y() > other.y
    }
}

/// Sub-rectangle of an entity's sprite used for collision and targeting.
///
/// The hitbox is stored as an offset from the sprite's top-left corner so it
/// can be recomputed from the current position whenever it is needed.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Hitbox {
    offset: Vec2,
    size: Vec2,
}

impl Hitbox {
    /// Creates a hitbox from an explicit offset and size.
    #[must_use]
    pub const fn new(offset: Vec2, size: Vec2) -> Self {
        Self { offset, size }
    }

    /// Creates a hitbox horizontally centered in a sprite, starting
    /// `vertical_offset` pixels below the sprite's vertical midpoint.
    #[must_use]
    pub fn centered(sprite: Vec2, size: Vec2, vertical_offset: f32) -> Self {
        Self::new(
            Vec2::new(sprite.x / 2.0 - size.x / 2.0, sprite.y / 2.0 + vertical_offset),
            size,
        )
    }

    /// Places the hitbox for a sprite whose top-left corner sits at `position`.
    #[must_use]
    pub fn at(&self, position: Vec2) -> Rect {
        Rect::from_origin_and_size(position + self.offset, self.size)
    }

    /// Sprite top-left corner that centers the hitbox on `area`.
    #[must_use]
    pub fn sprite_origin_within(&self, area: &Rect) -> Vec2 {
        area.center() - self.offset - self.size / 2.0
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Pixel rectangle covered by the cell on a grid of square tiles.
    #[must_use]
    pub fn to_rect(self, tile_length: f32) -> Rect {
        Rect::new(
            self.column as f32 * tile_length,
            self.row as f32 * tile_length,
            tile_length,
            tile_length,
        )
    }
}

/// Named list of tiles exported by the map loader.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileLayer {
    /// Layer name as authored in the map file.
    pub name: String,
    /// Cells occupied by the layer.
    pub cells: Vec<CellCoord>,
}

/// Solid geometry mobs and the player collide against.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Colliders {
    /// Nothing is solid.
    #[default]
    None,
    /// Tile cells whose rectangles are synthesised on demand.
    Tiles {
        /// Side length of a tile in pixels.
        tile_length: f32,
        /// Solid cells.
        cells: Vec<CellCoord>,
    },
    /// Precomputed rectangles, one per solid tile.
    Rects(Vec<Rect>),
}

impl Colliders {
    /// Flattens tile layers into a single tile collider set.
    #[must_use]
    pub fn from_layers(tile_length: f32, layers: &[TileLayer]) -> Self {
        let cells: Vec<CellCoord> = layers
            .iter()
            .flat_map(|layer| layer.cells.iter().copied())
            .collect();
        if cells.is_empty() {
            Self::None
        } else {
            Self::Tiles { tile_length, cells }
        }
    }
}

/// Code stored for each cell of a generated dungeon.
///
/// The integer codes double as sprite-sheet indices for the tile renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileCode {
    /// Unreferenced rock far from any floor; never drawn.
    Void,
    /// Walkable floor.
    Floor,
    /// Wall with floor below it.
    WallTop,
    /// Wall with floor above it.
    WallBottom,
    /// Wall with floor to its right.
    WallLeft,
    /// Wall with floor to its left.
    WallRight,
    /// Outer corner with floor diagonally down-right.
    CornerTopLeft,
    /// Outer corner with floor diagonally down-left.
    CornerTopRight,
    /// Outer corner with floor diagonally up-right.
    CornerBottomLeft,
    /// Outer corner with floor diagonally up-left.
    CornerBottomRight,
    /// Level exit.
    Exit,
}

impl TileCode {
    /// Integer code understood by the tile renderer.
    #[must_use]
    pub const fn code(self) -> i8 {
        match self {
            Self::Void => -1,
            Self::Floor => 0,
            Self::WallTop => 1,
            Self::WallBottom => 2,
            Self::WallLeft => 3,
            Self::WallRight => 4,
            Self::CornerTopLeft => 5,
            Self::CornerTopRight => 6,
            Self::CornerBottomLeft => 7,
            Self::CornerBottomRight => 8,
            Self::Exit => 9,
        }
    }


    /// Reports whether the code is one of the eight wall variants.
    #[must_use]
    pub const fn is_wall(self) -> bool {
        matches!(self.code(), 1..=8)
    }
}

/// Direction a sprite faces, in sprite-sheet row order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Facing {
    /// Facing the bottom of the screen.
    Down,
    /// Facing the left of the screen.
    Left,
    /// Facing the right of the screen.
    Right,
    /// Facing the top of the screen.
    Up,
}

impl Facing {
    /// Picks the facing for a movement vector.
    ///
    /// The axis with the larger magnitude wins; equal magnitudes resolve to
    /// the horizontal axis. Returns `None` for the zero vector.
    #[must_use]
    pub fn from_vector(vector: Vec2) -> Option<Self> {
        if vector == Vec2::ZERO {
            return None;
        }

        if vector.x.abs() >= vector.y.abs() {
            if vector.x < 0.0 {
                Some(Self::Left)
            } else {
                Some(Self::Right)
            }
        } else if vector.y < 0.0 {
            Some(Self::Up)
        } else {
            Some(Self::Down)
        }
    }

    const fn index(self) -> u32 {
        match self {
            Self::Down => 0,
            Self::Left => 1,
            Self::Right => 2,
            Self::Up => 3,
        }
    }
}

/// Animation a mob is playing, independent of its facing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pose {
    /// Standing still.
    Idle,
    /// Walking.
    Walk,
    /// Swinging at the player.
    Attack,
    /// Flashing after taking damage.
    Hurt,
    /// Playing the death animation.
    Dying,
}

impl Pose {
    /// Sprite-sheet row combining the pose with a facing.
    #[must_use]
    pub const fn row(self, facing: Facing) -> u32 {
        let base = match self {
            Self::Idle => 0,
            Self::Walk => 1,
            Self::Attack => 2,
            Self::Hurt => 3,
            Self::Dying => 4,
        };
        base * 4 + facing.index()
    }
}

/// Five-step bucket of remaining health used by the health bar.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HealthTier {
    /// At least 80% health remaining.
    Healthy,
    /// At least 60% health remaining.
    Scratched,
    /// At least 40% health remaining.
    Wounded,
    /// At least 20% health remaining.
    Battered,
    /// Less than 20% health remaining.
    Critical,
}

impl HealthTier {
    /// Buckets the health ratio. A non-positive maximum maps to `Critical`.
    #[must_use]
    pub fn from_health(health: f32, max_health: f32) -> Self {
        if max_health <= 0.0 {
            return Self::Critical;
        }

        let percent = (health / max_health * 100.0).round();
        if percent >= 80.0 {
            Self::Healthy
        } else if percent >= 60.0 {
            Self::Scratched
        } else if percent >= 40.0 {
            Self::Wounded
        } else if percent >= 20.0 {
            Self::Battered
        } else {
            Self::Critical
        }
    }
}

/// Species of a mob.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MobKind {
    /// Common dungeon and overworld ghost.
    Ghost,
    /// Arena boss.
    Boss,
}

impl MobKind {
    /// Size of the mob's sprite in pixels.
    #[must_use]
    pub fn sprite_size(self) -> Vec2 {
        match self {
            Self::Ghost => Vec2::new(16.0, 30.0),
            Self::Boss => Vec2::new(64.0, 64.0),
        }
    }

    /// Collision and targeting box relative to the sprite.
    #[must_use]
    pub fn hitbox(self) -> Hitbox {
        match self {
            Self::Ghost => Hitbox::centered(self.sprite_size(), Vec2::new(10.0, 10.0), 3.0),
            Self::Boss => Hitbox::centered(self.sprite_size(), Vec2::new(32.0, 32.0), -16.0),
        }
    }

    /// Health the mob spawns with.
    #[must_use]
    pub const fn max_health(self) -> f32 {
        match self {
            Self::Ghost => 5.0,
            Self::Boss => 100.0,
        }
    }
}

/// Position of a mob within the population.
///
/// Indices stay valid until the population is reset; stale indices are
/// answered with neutral values rather than errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MobIndex(usize);

impl MobIndex {
    /// Wraps a raw index.
    #[must_use]
    pub const fn new(value: usize) -> Self {
        Self(value)
    }

    /// Retrieves the raw index.
    #[must_use]
    pub const fn get(&self) -> usize {
        self.0
    }
}

/// Immutable render state of a single mob.
#[derive(Clone, Debug, PartialEq)]
pub struct MobSnapshot {
    /// Index of the mob within the population.
    pub index: MobIndex,
    /// Species of the mob.
    pub kind: MobKind,
    /// Top-left corner of the sprite.
    pub position: Vec2,
    /// Current hitbox.
    pub hitbox: Rect,
    /// Direction the sprite faces.
    pub facing: Facing,
    /// Animation being played.
    pub pose: Pose,
    /// Frame within the animation row.
    pub frame: u32,
    /// Remaining health.
    pub health: f32,
    /// Health the mob spawned with.
    pub max_health: f32,
    /// Health-bar bucket.
    pub health_tier: HealthTier,
    /// Whether the mob is dead.
    pub dead: bool,
}

/// Read-only snapshot describing all mobs in index order.
#[derive(Clone, Debug, Default)]
pub struct MobView {
    snapshots: Vec<MobSnapshot>,
}

impl MobView {
    /// Creates a new view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<MobSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.index);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots.
    pub fn iter(&self) -> impl Iterator<Item = &MobSnapshot> {
        self.snapshots.iter()
    }

    /// Number of captured snapshots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<MobSnapshot> {
        self.snapshots
    }
}
