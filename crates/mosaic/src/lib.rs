//! # Mosaic
//!
//! Rectangular tile lattice for match-three style puzzles.
//!
//! Mosaic stores a `width × height` grid of optional tile kinds and provides:
//!
//! - **Anti-run generation**: fresh lattices never repeat a kind with the
//!   immediate left or immediate lower neighbour
//! - **Match detection**: pure run searches along either axis
//! - **State hashing**: deterministic hashes for replay verification
//!
//! ## Quick Start
//!
//! ```
//! use glam::IVec2;
//! use mosaic::{detect_matches, Extent, Lattice, TileKind};
//!
//! let extent = Extent::new(8, 8).unwrap();
//! let mut lattice = Lattice::generate_seeded(extent, TileKind::all(), 42).unwrap();
//!
//! // Freshly generated lattices never contain a run of three.
//! let matches = detect_matches(&lattice, IVec2::new(3, 3));
//! assert!(!matches.is_match());
//!
//! lattice.clear(IVec2::new(3, 3));
//! assert!(lattice.kind_at(IVec2::new(3, 3)).is_none());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod detect;
pub mod hash;
pub mod lattice;
pub mod tile;

// Re-exports for convenience
pub use detect::{detect_matches, find_run, Axis, MatchSet, MIN_RUN};
pub use hash::hash_lattice;
pub use lattice::{Lattice, LatticeError};
pub use tile::{Tile, TileKind};

use glam::IVec2;
use serde::{Deserialize, Serialize};

/// Lattice dimensions.
///
/// Both dimensions are at least 1. Coordinates run from `(0, 0)` at the
/// bottom-left to `(width - 1, height - 1)` at the top-right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Extent {
    width: u16,
    height: u16,
}

impl Extent {
    /// Create an extent.
    ///
    /// # Errors
    ///
    /// Returns [`LatticeError::ZeroSized`] if either dimension is zero.
    pub fn new(width: u16, height: u16) -> Result<Self, LatticeError> {
        if width == 0 || height == 0 {
            return Err(LatticeError::ZeroSized { width, height });
        }
        Ok(Self { width, height })
    }

    /// Width in cells.
    #[must_use]
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Height in cells.
    #[must_use]
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Total number of cells.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }

    /// The largest valid coordinate.
    #[must_use]
    pub fn max(&self) -> IVec2 {
        IVec2::new(i32::from(self.width) - 1, i32::from(self.height) - 1)
    }

    /// Check if a coordinate lies inside the lattice.
    #[must_use]
    pub fn contains(&self, pos: IVec2) -> bool {
        let max = self.max();
        pos.x >= 0 && pos.y >= 0 && pos.x <= max.x && pos.y <= max.y
    }

    /// Clamp a coordinate onto the lattice.
    #[must_use]
    pub fn clamp(&self, pos: IVec2) -> IVec2 {
        pos.clamp(IVec2::ZERO, self.max())
    }

    /// Row-major storage index for a coordinate, if it is inside.
    #[must_use]
    pub fn index(&self, pos: IVec2) -> Option<usize> {
        if !self.contains(pos) {
            return None;
        }
        let x = usize::try_from(pos.x).ok()?;
        let y = usize::try_from(pos.y).ok()?;
        Some(y * usize::from(self.width) + x)
    }

    /// All coordinates in storage order (rows bottom to top, left to right).
    pub fn positions(&self) -> impl Iterator<Item = IVec2> {
        let width = i32::from(self.width);
        let height = i32::from(self.height);
        (0..height).flat_map(move |y| (0..width).map(move |x| IVec2::new(x, y)))
    }
}
