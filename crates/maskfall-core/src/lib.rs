//! # Maskfall Core
//!
//! A tile-matching puzzle whose matches drive a two-sided timed combat.
//!
//! Clearing a run of three or more same-kind masks casts an attack for the
//! attacker: fire burns, water heals, earth freezes and lightning strikes.
//! The defender answers with its own timed casts. A frozen side cannot act.
//!
//! ## Architecture
//!
//! - **Grid** ([`grid`]): cursor, selection, swaps, clears and locked
//!   regeneration over a [`mosaic::Lattice`]
//! - **Effects** ([`effect`], [`scheduler`]): a closed set of effect kinds
//!   dispatched through a static table, advanced once per tick
//! - **Combat** ([`combat`]): health pools, action gates and status flags
//! - **Opponent** ([`opponent`]): the defender's autonomous caster
//! - **Engine** ([`engine`]): owns everything above and defines the tick,
//!   input, attack trigger and query boundaries
//!
//! Presentation (sprites, audio, scene changes) lives outside the crate and
//! consumes drained [`Event`]s.
//!
//! ## Usage
//!
//! ```
//! use std::time::Duration;
//!
//! use glam::IVec2;
//! use maskfall_core::{Engine, EngineConfig, Side};
//!
//! let mut engine = Engine::new(EngineConfig::default()).unwrap();
//!
//! engine.confirm();
//! assert_eq!(engine.held(), Some(IVec2::ZERO));
//!
//! engine.tick(Duration::from_millis(250));
//! engine.pointer_move(IVec2::X);
//! engine.confirm();
//! assert_eq!(engine.held(), None);
//!
//! for _ in 0..60 {
//!     engine.tick(Duration::from_millis(16));
//! }
//! assert!(engine.outcome().is_none());
//! assert!(engine.health(Side::Defender) <= 10);
//!
//! let cues = engine.drain_events();
//! assert!(!cues.is_empty());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub use mosaic;

pub mod clock;
pub mod combat;
pub mod config;
pub mod effect;
pub mod engine;
pub mod error;
pub mod event;
pub mod grid;
pub mod opponent;
pub mod outcome;
pub mod scheduler;

// Re-exports for convenience
pub use clock::{delta_from_millis, Clock, ManualClock, SystemClock};
pub use combat::{CombatState, HealthPool, Side, StatusFlags};
pub use config::{EffectTuning, EngineConfig, OpponentConfig, RollRange};
pub use effect::{Effect, EffectId, EffectKind, EffectState};
pub use engine::Engine;
pub use error::{ConfigError, UnknownEffectKind};
pub use event::Event;
pub use grid::GridState;
pub use outcome::Outcome;
pub use scheduler::RequestOutcome;

#[cfg(test)]
mod tests;
