//! Tile kinds and tile values.
//!
//! A tile is a pure value: a lattice position plus an optional kind. `None`
//! means the cell is empty (cleared and awaiting regeneration).

use std::fmt;

use glam::IVec2;
use serde::{Deserialize, Serialize};

/// Tile kind identifier.
///
/// The palette is fixed. Each kind carries the sprite name the rendering
/// collaborator uses for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum TileKind {
    /// Red fire mask
    Fire = 0,
    /// Blue water mask
    Water = 1,
    /// Green earth mask
    Earth = 2,
    /// Yellow lightning mask
    Lightning = 3,
}

impl TileKind {
    /// Total number of kinds.
    pub const COUNT: usize = 4;

    /// Get all kinds as a slice.
    #[must_use]
    pub const fn all() -> &'static [TileKind] {
        &[
            TileKind::Fire,
            TileKind::Water,
            TileKind::Earth,
            TileKind::Lightning,
        ]
    }

    /// Get the index of this kind.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Sprite name used by the renderer for this kind.
    #[must_use]
    pub const fn sprite_name(self) -> &'static str {
        match self {
            TileKind::Fire => "red_mask",
            TileKind::Water => "water_mask",
            TileKind::Earth => "earth_mask",
            TileKind::Lightning => "lightning_mask",
        }
    }

    /// Look up a kind by its sprite name.
    #[must_use]
    pub fn from_sprite_name(name: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|kind| kind.sprite_name() == name)
    }
}

impl fmt::Display for TileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sprite_name())
    }
}

/// A tile at a lattice position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tile {
    /// Lattice coordinate (x grows right, y grows up)
    pub pos: IVec2,
    /// Kind, or `None` when the cell is empty
    pub kind: Option<TileKind>,
}

impl Tile {
    /// Create a tile.
    #[must_use]
    pub const fn new(pos: IVec2, kind: Option<TileKind>) -> Self {
        Self { pos, kind }
    }

    /// Whether the cell is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.kind.is_none()
    }
}
