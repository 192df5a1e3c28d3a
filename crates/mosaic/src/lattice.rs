//! Lattice storage and anti-run generation.
//!
//! The lattice is a dense row-major grid of `Option<TileKind>`. Generation
//! visits cells bottom row first, left to right, so a cell's left and lower
//! neighbours are always assigned before it. Each cell draws uniformly from
//! the palette minus those two kinds.

use glam::IVec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::tile::{Tile, TileKind};
use crate::Extent;

/// Minimum palette size for anti-run generation.
///
/// Two kinds can be excluded per cell, so at least one must remain.
pub const MIN_PALETTE: usize = 3;

/// Errors raised while constructing a lattice.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LatticeError {
    /// A dimension was zero.
    #[error("lattice must be at least 1x1 (got {width}x{height})")]
    ZeroSized {
        /// Requested width
        width: u16,
        /// Requested height
        height: u16,
    },
    /// The palette cannot satisfy the anti-run rule.
    #[error("palette needs at least {MIN_PALETTE} distinct kinds (got {distinct})")]
    PaletteTooSmall {
        /// Number of distinct kinds supplied
        distinct: usize,
    },
    /// A textual layout had rows of different lengths.
    #[error("layout row {row} has {len} cells, expected {expected}")]
    RaggedLayout {
        /// Row index from the top
        row: usize,
        /// Row length found
        len: usize,
        /// Length of the first row
        expected: usize,
    },
    /// A textual layout used an unknown cell character.
    #[error("unknown layout cell '{0}' (expected F, W, E, L or .)")]
    UnknownCell(char),
    /// A textual layout was too large for the lattice dimensions.
    #[error("layout is too large")]
    LayoutTooLarge,
    /// A snapshot's cell count did not match its extent.
    #[error("snapshot has {found} cells, extent needs {expected}")]
    CellCountMismatch {
        /// Cells required by the extent
        expected: usize,
        /// Cells present in the snapshot
        found: usize,
    },
}

/// A rectangular tile lattice.
///
/// Deserialization re-checks the extent, the palette and the cell count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "LatticeSnapshot")]
pub struct Lattice {
    extent: Extent,
    palette: Vec<TileKind>,
    cells: Vec<Option<TileKind>>,
}

impl Lattice {
    /// Create an all-empty lattice.
    ///
    /// # Errors
    ///
    /// Returns [`LatticeError::PaletteTooSmall`] if the palette has fewer than
    /// [`MIN_PALETTE`] distinct kinds.
    pub fn empty(extent: Extent, palette: &[TileKind]) -> Result<Self, LatticeError> {
        Ok(Self {
            extent,
            palette: distinct_palette(palette)?,
            cells: vec![None; extent.cell_count()],
        })
    }

    /// Generate a full lattice under the anti-run rule.
    ///
    /// # Errors
    ///
    /// Returns [`LatticeError::PaletteTooSmall`] if the palette has fewer than
    /// [`MIN_PALETTE`] distinct kinds.
    pub fn generate<R: Rng + ?Sized>(
        extent: Extent,
        palette: &[TileKind],
        rng: &mut R,
    ) -> Result<Self, LatticeError> {
        let mut lattice = Self::empty(extent, palette)?;
        lattice.regenerate(rng);
        Ok(lattice)
    }

    /// Generate a full lattice from a seed.
    ///
    /// # Errors
    ///
    /// See [`Lattice::generate`].
    pub fn generate_seeded(
        extent: Extent,
        palette: &[TileKind],
        seed: u64,
    ) -> Result<Self, LatticeError> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        Self::generate(extent, palette, &mut rng)
    }

    /// Build a lattice from text rows, top row first.
    ///
    /// `F`, `W`, `E`, `L` are fire, water, earth and lightning; `.` is empty.
    /// The palette is the full kind set. The anti-run rule is not applied, so
    /// this is the way to set up specific boards.
    ///
    /// # Errors
    ///
    /// Returns a layout error for ragged rows, unknown characters, or zero size.
    pub fn from_rows(rows: &[&str]) -> Result<Self, LatticeError> {
        let expected = rows.first().map_or(0, |row| row.chars().count());
        for (row, text) in rows.iter().enumerate() {
            let len = text.chars().count();
            if len != expected {
                return Err(LatticeError::RaggedLayout { row, len, expected });
            }
        }
        let width = u16::try_from(expected).map_err(|_| LatticeError::LayoutTooLarge)?;
        let height = u16::try_from(rows.len()).map_err(|_| LatticeError::LayoutTooLarge)?;
        let mut lattice = Self::empty(Extent::new(width, height)?, TileKind::all())?;

        // Text is written top-down, lattice y grows upward.
        for (y, text) in rows.iter().rev().enumerate() {
            for (x, ch) in text.chars().enumerate() {
                let kind = match ch {
                    'F' => Some(TileKind::Fire),
                    'W' => Some(TileKind::Water),
                    'E' => Some(TileKind::Earth),
                    'L' => Some(TileKind::Lightning),
                    '.' => None,
                    other => return Err(LatticeError::UnknownCell(other)),
                };
                let idx = y * usize::from(width) + x;
                lattice.cells[idx] = kind;
            }
        }
        Ok(lattice)
    }

    /// Discard every tile and refill the lattice under the anti-run rule.
    pub fn regenerate<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let width = usize::from(self.extent.width());
        let mut candidates = Vec::with_capacity(self.palette.len());

        for idx in 0..self.cells.len() {
            let left = if idx % width == 0 {
                None
            } else {
                self.cells[idx - 1]
            };
            let below = idx.checked_sub(width).and_then(|i| self.cells[i]);

            candidates.clear();
            candidates.extend(
                self.palette
                    .iter()
                    .copied()
                    .filter(|kind| Some(*kind) != left && Some(*kind) != below),
            );
            // Palette size >= MIN_PALETTE guarantees a candidate remains.
            let pick = candidates[rng.gen_range(0..candidates.len())];
            self.cells[idx] = Some(pick);
        }

        tracing::trace!(
            width = self.extent.width(),
            height = self.extent.height(),
            "lattice regenerated"
        );
    }

    /// Lattice dimensions.
    #[must_use]
    pub fn extent(&self) -> Extent {
        self.extent
    }

    /// Kinds used for generation.
    #[must_use]
    pub fn palette(&self) -> &[TileKind] {
        &self.palette
    }

    /// Raw cells in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[Option<TileKind>] {
        &self.cells
    }

    /// Kind at a coordinate. `None` for empty cells and out-of-bounds coordinates.
    #[must_use]
    pub fn kind_at(&self, pos: IVec2) -> Option<TileKind> {
        self.extent.index(pos).and_then(|idx| self.cells[idx])
    }

    /// Tile at a coordinate, or `None` if out of bounds.
    #[must_use]
    pub fn tile(&self, pos: IVec2) -> Option<Tile> {
        self.extent
            .index(pos)
            .map(|idx| Tile::new(pos, self.cells[idx]))
    }

    /// Set the kind at a coordinate. Out-of-bounds writes are ignored.
    pub fn set(&mut self, pos: IVec2, kind: Option<TileKind>) {
        if let Some(idx) = self.extent.index(pos) {
            self.cells[idx] = kind;
        }
    }

    /// Empty the cell at a coordinate.
    pub fn clear(&mut self, pos: IVec2) {
        self.set(pos, None);
    }

    /// Exchange the kinds of two cells.
    ///
    /// Returns `false` (and changes nothing) if either coordinate is out of bounds.
    pub fn swap(&mut self, a: IVec2, b: IVec2) -> bool {
        match (self.extent.index(a), self.extent.index(b)) {
            (Some(ia), Some(ib)) => {
                self.cells.swap(ia, ib);
                true
            }
            _ => false,
        }
    }

    /// All tiles in storage order.
    pub fn tiles(&self) -> impl Iterator<Item = Tile> + '_ {
        self.extent
            .positions()
            .zip(self.cells.iter())
            .map(|(pos, kind)| Tile::new(pos, *kind))
    }

    /// Whether every cell holds a tile.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// Number of empty cells.
    #[must_use]
    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_none()).count()
    }
}

/// Unchecked wire form of [`Lattice`].
#[derive(Deserialize)]
struct LatticeSnapshot {
    extent: Extent,
    palette: Vec<TileKind>,
    cells: Vec<Option<TileKind>>,
}

impl TryFrom<LatticeSnapshot> for Lattice {
    type Error = LatticeError;

    fn try_from(snapshot: LatticeSnapshot) -> Result<Self, Self::Error> {
        let extent = Extent::new(snapshot.extent.width(), snapshot.extent.height())?;
        let palette = distinct_palette(&snapshot.palette)?;
        if snapshot.cells.len() != extent.cell_count() {
            return Err(LatticeError::CellCountMismatch {
                expected: extent.cell_count(),
                found: snapshot.cells.len(),
            });
        }
        Ok(Self {
            extent,
            palette,
            cells: snapshot.cells,
        })
    }
}

fn distinct_palette(palette: &[TileKind]) -> Result<Vec<TileKind>, LatticeError> {
    let mut distinct = Vec::with_capacity(palette.len());
    for kind in palette {
        if !distinct.contains(kind) {
            distinct.push(*kind);
        }
    }
    if distinct.len() < MIN_PALETTE {
        return Err(LatticeError::PaletteTooSmall {
            distinct: distinct.len(),
        });
    }
    Ok(distinct)
}
