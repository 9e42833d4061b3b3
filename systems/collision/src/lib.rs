#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Axis-separated collision resolution against axis-aligned colliders.
//!
//! The resolver never computes penetration depths. It only asks a
//! [`ColliderSource`] whether a candidate hitbox overlaps anything and walks
//! through a fixed retry ladder: accept the move, revert X, revert Y, revert
//! both.

use spooknloot_core::{CellCoord, Colliders, Hitbox, Rect, Vec2};

/// Anything that can answer overlap queries for a hitbox.
pub trait ColliderSource {
    /// Reports whether the hitbox strictly overlaps any solid rectangle.
    fn overlaps(&self, hitbox: &Rect) -> bool;
}

impl ColliderSource for [Rect] {
    fn overlaps(&self, hitbox: &Rect) -> bool {
        self.iter().any(|rect| rect.overlaps(hitbox))
    }
}

impl ColliderSource for Vec<Rect> {
    fn overlaps(&self, hitbox: &Rect) -> bool {
        self.as_slice().overlaps(hitbox)
    }
}

impl<T: ColliderSource + ?Sized> ColliderSource for &T {
    fn overlaps(&self, hitbox: &Rect) -> bool {
        (**self).overlaps(hitbox)
    }
}

/// Tile cells whose rectangles are synthesised on the fly.
#[derive(Clone, Copy, Debug)]
pub struct TileColliders<'a> {
    tile_length: f32,
    cells: &'a [CellCoord],
}

impl<'a> TileColliders<'a> {
    /// Creates a view over solid tile cells.
    #[must_use]
    pub const fn new(tile_length: f32, cells: &'a [CellCoord]) -> Self {
        Self { tile_length, cells }
    }

    /// Iterates over the synthesised rectangles.
    pub fn rects(&self) -> impl Iterator<Item = Rect> + 'a {
        let tile_length = self.tile_length;
        let cells = self.cells;
        cells.iter().map(move |cell| cell.to_rect(tile_length))
    }
}

impl ColliderSource for TileColliders<'_> {
    fn overlaps(&self, hitbox: &Rect) -> bool {
        self.rects().any(|rect| rect.overlaps(hitbox))
    }
}

impl ColliderSource for Colliders {
    fn overlaps(&self, hitbox: &Rect) -> bool {
        match self {
            Colliders::None => false,
            Colliders::Tiles { tile_length, cells } => {
                TileColliders::new(*tile_length, cells).overlaps(hitbox)
            }
            Colliders::Rects(rects) => rects.as_slice().overlaps(hitbox),
        }
    }
}

/// Which rung of the retry ladder produced the final position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// The proposed position was accepted as is.
    Unobstructed,
    /// X was reverted; the mover slides along a vertical surface.
    SlidVertically,
    /// Y was reverted; the mover slides along a horizontal surface.
    SlidHorizontally,
    /// Both axes were reverted.
    Blocked,
}

/// Final position chosen by [`resolve`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Resolution {
    /// Accepted sprite position.
    pub position: Vec2,
    /// Rung of the retry ladder that accepted the position.
    pub outcome: Outcome,
}

/// Resolves a proposed move against solid geometry.
///
/// `previous` is assumed to be free; when it is not, a fully blocked move
/// still returns it unchanged.
pub fn resolve<S>(previous: Vec2, proposed: Vec2, hitbox: &Hitbox, source: &S) -> Resolution
where
    S: ColliderSource + ?Sized,
{
    let candidates = [
        (proposed, Outcome::Unobstructed),
        (Vec2::new(previous.x, proposed.y), Outcome::SlidVertically),
        (Vec2::new(proposed.x, previous.y), Outcome::SlidHorizontally),
    ];

    for (position, outcome) in candidates {
        if !source.overlaps(&hitbox.at(position)) {
            return Resolution { position, outcome };
        }
    }

    Resolution {
        position: previous,
        outcome: Outcome::Blocked,
    }
}
