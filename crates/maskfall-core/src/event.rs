//! Cues for the presentation layer.
//!
//! The engine never plays sounds or draws sprites. It records what happened
//! as [`Event`]s and the host drains them once per frame.

use glam::IVec2;
use mosaic::TileKind;
use serde::{Deserialize, Serialize};

use crate::combat::Side;
use crate::effect::{EffectId, EffectKind};
use crate::outcome::Outcome;

/// Something a collaborator may want to react to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// A tile was picked up.
    TileSelected {
        /// Held coordinate
        pos: IVec2,
    },
    /// The held tile was put back.
    TileDeselected {
        /// Previously held coordinate
        pos: IVec2,
    },
    /// Two tiles exchanged kinds.
    Swapped {
        /// Held coordinate
        from: IVec2,
        /// Cursor coordinate
        to: IVec2,
    },
    /// A swap was refused (same kind or empty cell).
    SwapRejected {
        /// Held coordinate
        from: IVec2,
        /// Cursor coordinate
        to: IVec2,
    },
    /// Matched tiles were removed.
    TilesCleared {
        /// Kind that triggers the attack
        kind: TileKind,
        /// Every cleared coordinate
        tiles: Vec<IVec2>,
    },
    /// The lattice was refilled and input reopened.
    LatticeRegenerated,
    /// An effect was requested and started.
    EffectStarted {
        /// Effect id
        id: EffectId,
        /// Effect kind
        kind: EffectKind,
        /// Receiving side
        target: Side,
        /// Casting side
        origin: Side,
    },
    /// An effect was swept.
    EffectEnded {
        /// Effect id
        id: EffectId,
        /// Effect kind
        kind: EffectKind,
        /// Receiving side
        target: Side,
    },
    /// A side tried to cast while its gate was closed.
    CastBlocked {
        /// Side that was blocked
        side: Side,
        /// Kind it tried to cast
        kind: EffectKind,
    },
    /// The match ended.
    OutcomeReached {
        /// Terminal outcome
        outcome: Outcome,
    },
}

/// Append-only event buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an event.
    pub fn push(&mut self, event: Event) {
        self.events.push(event);
    }

    /// Append everything from an iterator.
    pub fn extend(&mut self, events: impl IntoIterator<Item = Event>) {
        self.events.extend(events);
    }

    /// Take every recorded event, leaving the log empty.
    pub fn drain(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    /// Number of pending events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether no events are pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
