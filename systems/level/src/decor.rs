use rand::{seq::SliceRandom, Rng};
use serde::{Deserialize, Serialize};
use spooknloot_core::{CellCoord, ConfigError, TileCode};

use crate::{tiles::TileMap, Room};

/// Tuning for the cosmetic pass run after a level is carved.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecorConfig {
    /// Maximum floor overlays scattered in each room.
    pub overlays_per_room: u32,
    /// Number of distinct overlay sprites.
    pub overlay_variants: u32,
    /// Maximum wall torches hung above each room.
    pub max_torches_per_room: u32,
}

impl Default for DecorConfig {
    fn default() -> Self {
        Self {
            overlays_per_room: 7,
            overlay_variants: 4,
            max_torches_per_room: 3,
        }
    }
}

impl DecorConfig {
    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.overlay_variants == 0 {
            return Err(ConfigError::NonPositive {
                field: "overlay_variants",
            });
        }
        Ok(())
    }
}

/// Floor decoration placed on a single tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FloorOverlay {
    /// Tile the overlay covers.
    pub cell: CellCoord,
    /// Sprite variant in `0..overlay_variants`.
    pub variant: u32,
}

/// Cosmetic content of a level. None of it affects navigation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Decor {
    overlays: Vec<FloorOverlay>,
    torches: Vec<CellCoord>,
    potion: Option<CellCoord>,
}

impl Decor {
    /// Floor overlays in placement order.
    #[must_use]
    pub fn overlays(&self) -> &[FloorOverlay] {
        &self.overlays
    }

    /// Wall tiles carrying a torch.
    #[must_use]
    pub fn torches(&self) -> &[CellCoord] {
        &self.torches
    }

    /// Tile holding the level's health potion, if one could be placed.
    #[must_use]
    pub const fn potion(&self) -> Option<CellCoord> {
        self.potion
    }
}

pub(crate) fn decorate<R: Rng + ?Sized>(
    config: &DecorConfig,
    tiles: &TileMap,
    rooms: &[Room],
    spawn_tile: CellCoord,
    rng: &mut R,
) -> Decor {
    let mut decor = Decor::default();
    for room in rooms {
        scatter_overlays(config, tiles, room, spawn_tile, rng, &mut decor.overlays);
    }
    for room in rooms {
        hang_torches(config, tiles, room, rng, &mut decor.torches);
    }

    let floor: Vec<CellCoord> = tiles
        .iter()
        .filter(|(cell, code)| *code == TileCode::Floor && *cell != spawn_tile)
        .map(|(cell, _)| cell)
        .collect();
    decor.potion = floor.choose(rng).copied();
    decor
}

fn scatter_overlays<R: Rng + ?Sized>(
    config: &DecorConfig,
    tiles: &TileMap,
    room: &Room,
    spawn_tile: CellCoord,
    rng: &mut R,
    out: &mut Vec<FloorOverlay>,
) {
    let mut candidates: Vec<CellCoord> = room
        .cells()
        .filter(|cell| *cell != spawn_tile && tiles.code_at(*cell) == Some(TileCode::Floor))
        .collect();
    if candidates.is_empty() {
        return;
    }
    candidates.shuffle(rng);

    let mut variants: Vec<u32> = (0..config.overlay_variants).collect();
    if variants.is_empty() {
        return;
    }
    variants.shuffle(rng);
    let mut cursor = 0;

    let count = (config.overlays_per_room as usize).min(candidates.len());
    for cell in candidates.into_iter().take(count) {
        let variant = variants[cursor];
        cursor += 1;
        if cursor == variants.len() {
            // Reshuffle without repeating the last variant across the seam.
            let last = variants[variants.len() - 1];
            variants.shuffle(rng);
            if variants.len() > 1 && variants[0] == last {
                variants.swap(0, 1);
            }
            cursor = 0;
        }
        out.push(FloorOverlay { cell, variant });
    }
}

fn hang_torches<R: Rng + ?Sized>(
    config: &DecorConfig,
    tiles: &TileMap,
    room: &Room,
    rng: &mut R,
    out: &mut Vec<CellCoord>,
) {
    let Some(row) = room.y.checked_sub(1) else {
        return;
    };

    let mut candidates: Vec<CellCoord> = (room.x..room.x + room.width)
        .filter(|column| {
            tiles.code(*column, row) == Some(TileCode::WallTop) && tiles.is_floor(*column, row + 1)
        })
        .map(|column| CellCoord::new(column, row))
        .collect();
    candidates.shuffle(rng);

    let limit = (config.max_torches_per_room as usize).min(candidates.len());
    if limit == 0 {
        return;
    }
    let count = rng.gen_range(1..=limit);
    out.extend(candidates.into_iter().take(count));
}
