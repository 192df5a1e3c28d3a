//! Run detection.
//!
//! Matches are found by scanning outward from an origin cell along one axis
//! and collecting neighbours of the same kind. Nothing here mutates the
//! lattice.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::lattice::Lattice;
use crate::tile::{Tile, TileKind};

/// Minimum run length (origin included) that counts as a match.
pub const MIN_RUN: usize = 3;

/// Scan axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// Along x
    Horizontal,
    /// Along y
    Vertical,
}

impl Axis {
    /// Both axes, horizontal first.
    pub const ALL: [Axis; 2] = [Axis::Horizontal, Axis::Vertical];

    /// Unit step in the positive direction.
    #[must_use]
    pub const fn step(self) -> IVec2 {
        match self {
            Axis::Horizontal => IVec2::X,
            Axis::Vertical => IVec2::Y,
        }
    }
}

/// Find the same-kind run through `origin` along `axis`.
///
/// The result excludes the origin. Tiles in the negative direction come first
/// (nearest to farthest), then the positive direction (nearest to farthest).
/// Scanning stops at a different kind, an empty cell, or the boundary. An
/// empty or out-of-bounds origin yields an empty run.
#[must_use]
pub fn find_run(lattice: &Lattice, origin: IVec2, axis: Axis) -> Vec<Tile> {
    let Some(kind) = lattice.kind_at(origin) else {
        return Vec::new();
    };

    let step = axis.step();
    let mut run = Vec::new();
    for direction in [-step, step] {
        let mut pos = origin + direction;
        while lattice.kind_at(pos) == Some(kind) {
            run.push(Tile::new(pos, Some(kind)));
            pos += direction;
        }
    }
    run
}

/// Whether a run found by [`find_run`] qualifies as a match.
#[must_use]
pub fn qualifies(run: &[Tile]) -> bool {
    1 + run.len() >= MIN_RUN
}

/// Union of qualifying runs through one origin.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSet {
    origin: Option<Tile>,
    axes: Vec<Axis>,
    tiles: Vec<Tile>,
}

impl MatchSet {
    /// Whether any axis qualified.
    #[must_use]
    pub fn is_match(&self) -> bool {
        !self.axes.is_empty()
    }

    /// The axes that produced a qualifying run.
    #[must_use]
    pub fn axes(&self) -> &[Axis] {
        &self.axes
    }

    /// Matched tiles, origin first. Empty when nothing qualified.
    #[must_use]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Kind of the origin tile, if it was non-empty.
    #[must_use]
    pub fn kind(&self) -> Option<TileKind> {
        self.origin.and_then(|tile| tile.kind)
    }

    /// Matched positions, origin first.
    pub fn positions(&self) -> impl Iterator<Item = IVec2> + '_ {
        self.tiles.iter().map(|tile| tile.pos)
    }
}

/// Run both axes through `origin` and union the qualifying runs.
#[must_use]
pub fn detect_matches(lattice: &Lattice, origin: IVec2) -> MatchSet {
    let Some(origin_tile) = lattice.tile(origin).filter(|tile| !tile.is_empty()) else {
        return MatchSet::default();
    };

    let mut set = MatchSet {
        origin: Some(origin_tile),
        ..MatchSet::default()
    };
    for axis in Axis::ALL {
        let run = find_run(lattice, origin, axis);
        if qualifies(&run) {
            if set.tiles.is_empty() {
                set.tiles.push(origin_tile);
            }
            set.axes.push(axis);
            set.tiles.extend(run);
        }
    }
    set
}
