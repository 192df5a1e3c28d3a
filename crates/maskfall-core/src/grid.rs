//! Puzzle grid: cursor, selection, swaps and clears.
//!
//! # State machine
//!
//! ```text
//!            confirm on tile              confirm on held tile
//!   Idle ─────────────────────► Held ─────────────────────► Idle
//!    ▲                           │
//!    │                           │ confirm elsewhere: swap attempt
//!    │   no match / rejected     ▼
//!    ◄───────────────────────── swap ──── match ──► Locked { until }
//!    ▲                                                   │
//!    └────────────── tick at or after `until` ───────────┘
//!                        (lattice regenerated)
//! ```
//!
//! Every input is ignored while locked. Illegal input never fails; it is
//! dropped with a trace log.

use std::time::Duration;

use glam::IVec2;
use mosaic::{detect_matches, Lattice, TileKind};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::event::{Event, EventLog};

/// Grid input state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GridState {
    /// Waiting for a selection.
    Idle,
    /// A tile is held at this coordinate.
    Held(IVec2),
    /// Input is closed until the lattice regenerates.
    Locked {
        /// Clock time of regeneration
        until: Duration,
    },
}

/// Tiles removed by a successful swap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clear {
    /// Kind of the first matching origin (held cell first)
    pub kind: TileKind,
    /// Every cleared coordinate, without duplicates
    pub tiles: Vec<IVec2>,
}

/// Grid timing settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridTiming {
    /// Lock time after a clear
    pub regen_delay: Duration,
    /// Minimum gap between accepted cursor moves
    pub move_repeat_delay: Duration,
}

/// Lattice plus the input state around it.
#[derive(Debug, Clone)]
pub struct GridEngine {
    lattice: Lattice,
    cursor: IVec2,
    state: GridState,
    timing: GridTiming,
    last_move: Option<Duration>,
    rng: ChaCha8Rng,
    events: EventLog,
}

impl GridEngine {
    /// Wrap a lattice. The cursor starts at the bottom-left cell.
    #[must_use]
    pub fn new(lattice: Lattice, timing: GridTiming, rng: ChaCha8Rng) -> Self {
        Self {
            lattice,
            cursor: IVec2::ZERO,
            state: GridState::Idle,
            timing,
            last_move: None,
            rng,
            events: EventLog::new(),
        }
    }

    // =========================================================================
    // Input
    // =========================================================================

    /// Move the cursor by `delta`, clamped to the lattice.
    ///
    /// While a tile is held the target is also clamped onto the held cell's
    /// 4-neighbourhood. A diagonal result keeps the axis of the larger delta
    /// component. A move that leaves the cursor where it is does not count
    /// against the repeat delay.
    pub fn pointer_move(&mut self, delta: IVec2, now: Duration) {
        if delta == IVec2::ZERO {
            return;
        }
        if self.is_locked() {
            tracing::trace!(?delta, "move ignored while locked");
            return;
        }
        if let Some(last) = self.last_move {
            if !self.timing.move_repeat_delay.is_zero()
                && now.saturating_sub(last) < self.timing.move_repeat_delay
            {
                tracing::trace!(?delta, "move ignored by repeat delay");
                return;
            }
        }

        let mut target = self.lattice.extent().clamp(self.cursor.saturating_add(delta));
        if let GridState::Held(held) = self.state {
            target = clamp_to_neighbourhood(target, held, delta);
        }
        if target == self.cursor {
            tracing::trace!(?delta, cursor = ?self.cursor, "move clamped in place");
            return;
        }

        self.cursor = target;
        self.last_move = Some(now);
    }

    /// Confirm at the cursor.
    ///
    /// Returns the cleared tiles when a swap produced a match.
    pub fn confirm(&mut self, now: Duration) -> Option<Clear> {
        match self.state {
            GridState::Locked { .. } => {
                tracing::trace!("confirm ignored while locked");
                None
            }
            GridState::Idle => {
                if self.lattice.kind_at(self.cursor).is_none() {
                    tracing::trace!(cursor = ?self.cursor, "confirm on empty cell ignored");
                } else {
                    self.state = GridState::Held(self.cursor);
                    self.events.push(Event::TileSelected { pos: self.cursor });
                    tracing::debug!(pos = ?self.cursor, "tile selected");
                }
                None
            }
            GridState::Held(held) if held == self.cursor => {
                self.state = GridState::Idle;
                self.events.push(Event::TileDeselected { pos: held });
                tracing::debug!(pos = ?held, "tile deselected");
                None
            }
            GridState::Held(held) => {
                self.state = GridState::Idle;
                self.try_swap(held, self.cursor, now)
            }
        }
    }

    fn try_swap(&mut self, from: IVec2, to: IVec2, now: Duration) -> Option<Clear> {
        let (a, b) = (self.lattice.kind_at(from), self.lattice.kind_at(to));
        if a.is_none() || b.is_none() || a == b {
            self.events.push(Event::SwapRejected { from, to });
            tracing::trace!(?from, ?to, "swap rejected");
            return None;
        }

        self.lattice.swap(from, to);
        self.events.push(Event::Swapped { from, to });
        tracing::debug!(?from, ?to, "swapped");

        let mut kind = None;
        let mut tiles: Vec<IVec2> = Vec::new();
        for origin in [from, to] {
            let set = detect_matches(&self.lattice, origin);
            if !set.is_match() {
                continue;
            }
            kind = kind.or(set.kind());
            for pos in set.positions() {
                if !tiles.contains(&pos) {
                    tiles.push(pos);
                }
            }
        }
        let kind = kind?;

        for pos in &tiles {
            self.lattice.clear(*pos);
        }
        let until = now.saturating_add(self.timing.regen_delay);
        self.state = GridState::Locked { until };
        tracing::debug!(%kind, count = tiles.len(), ?until, "tiles cleared");
        self.events.push(Event::TilesCleared {
            kind,
            tiles: tiles.clone(),
        });
        Some(Clear { kind, tiles })
    }

    // =========================================================================
    // Timers
    // =========================================================================

    /// Regenerate and unlock once the lock deadline has passed.
    pub fn update(&mut self, now: Duration) {
        if let GridState::Locked { until } = self.state {
            if now >= until {
                self.lattice.regenerate(&mut self.rng);
                self.state = GridState::Idle;
                self.events.push(Event::LatticeRegenerated);
                tracing::debug!("lattice regenerated");
            }
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// The lattice.
    #[must_use]
    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    /// Cursor coordinate.
    #[must_use]
    pub fn cursor(&self) -> IVec2 {
        self.cursor
    }

    /// Held coordinate, if any.
    #[must_use]
    pub fn held(&self) -> Option<IVec2> {
        match self.state {
            GridState::Held(pos) => Some(pos),
            _ => None,
        }
    }

    /// Current input state.
    #[must_use]
    pub fn state(&self) -> GridState {
        self.state
    }

    /// Whether input is closed.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        matches!(self.state, GridState::Locked { .. })
    }

    /// Take the events produced since the last drain.
    pub fn drain_events(&mut self) -> Vec<Event> {
        self.events.drain()
    }

    /// Swap in a hand-built lattice and reset input.
    #[cfg(test)]
    pub(crate) fn set_lattice(&mut self, lattice: Lattice) {
        self.lattice = lattice;
        self.state = GridState::Idle;
        self.cursor = self.lattice.extent().clamp(self.cursor);
    }
}

/// Clamp `target` onto `held` or one of its orthogonal neighbours.
///
/// `target` and `held` must both lie inside the lattice.
fn clamp_to_neighbourhood(target: IVec2, held: IVec2, delta: IVec2) -> IVec2 {
    let clamped = target.clamp(held - IVec2::ONE, held + IVec2::ONE);
    if clamped.x == held.x || clamped.y == held.y {
        clamped
    } else if delta.x.abs() >= delta.y.abs() {
        IVec2::new(clamped.x, held.y)
    } else {
        IVec2::new(held.x, clamped.y)
    }
}
