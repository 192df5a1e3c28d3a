//! Timed combat effects.
//!
//! Effects form a closed set. Each [`EffectKind`] maps to a static
//! [`Behavior`] row holding plain function pointers for its start and update
//! hooks plus two policy bits:
//!
//! | Kind             | oneshot | gate exempt |
//! |------------------|---------|-------------|
//! | `InstantDamage`  | yes     | yes         |
//! | `InstantHeal`    | yes     | yes         |
//! | `DamageOverTime` | no      | no          |
//! | `Freeze`         | no      | yes         |
//!
//! The scheduler owns live [`Effect`]s and calls the hooks with an
//! [`EffectContext`] carrying the current time, the combat state and the
//! effect RNG stream.

mod burn;
mod damage;
mod freeze;
mod heal;

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use mosaic::TileKind;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::combat::{CombatState, Side, StatusFlags};
use crate::config::EffectTuning;
use crate::error::UnknownEffectKind;

// =============================================================================
// EffectKind
// =============================================================================

/// Kind of attack an effect performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[repr(u8)]
pub enum EffectKind {
    /// One-off damage (lightning)
    InstantDamage = 0,
    /// One-off heal (water)
    InstantHeal = 1,
    /// Periodic damage for a while (fire)
    DamageOverTime = 2,
    /// Damage plus a temporary action lock (earth)
    Freeze = 3,
}

impl EffectKind {
    /// Total number of kinds.
    pub const COUNT: usize = 4;

    /// All kinds.
    #[must_use]
    pub const fn all() -> &'static [EffectKind] {
        &[
            EffectKind::InstantDamage,
            EffectKind::InstantHeal,
            EffectKind::DamageOverTime,
            EffectKind::Freeze,
        ]
    }

    /// Index of this kind.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Symbolic name, as accepted by [`FromStr`].
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            EffectKind::InstantDamage => "instant-damage",
            EffectKind::InstantHeal => "instant-heal",
            EffectKind::DamageOverTime => "damage-over-time",
            EffectKind::Freeze => "freeze",
        }
    }

    /// Dispatch row for this kind.
    #[must_use]
    pub fn behavior(self) -> &'static Behavior {
        match self {
            EffectKind::InstantDamage => &damage::BEHAVIOR,
            EffectKind::InstantHeal => &heal::BEHAVIOR,
            EffectKind::DamageOverTime => &burn::BEHAVIOR,
            EffectKind::Freeze => &freeze::BEHAVIOR,
        }
    }

    /// Status flag that shows this kind's visual, if it has one.
    #[must_use]
    pub const fn visual_flag(self) -> Option<StatusFlags> {
        match self {
            EffectKind::DamageOverTime => Some(StatusFlags::BURNING),
            EffectKind::Freeze => Some(StatusFlags::FROZEN),
            EffectKind::InstantDamage | EffectKind::InstantHeal => None,
        }
    }
}

impl From<TileKind> for EffectKind {
    fn from(kind: TileKind) -> Self {
        match kind {
            TileKind::Fire => EffectKind::DamageOverTime,
            TileKind::Water => EffectKind::InstantHeal,
            TileKind::Earth => EffectKind::Freeze,
            TileKind::Lightning => EffectKind::InstantDamage,
        }
    }
}

impl FromStr for EffectKind {
    type Err = UnknownEffectKind;

    /// Parse a symbolic name (`"freeze"`) or a mask sprite name (`"earth_mask"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|kind| kind.name() == s)
            .or_else(|| TileKind::from_sprite_name(s).map(EffectKind::from))
            .ok_or_else(|| UnknownEffectKind(s.to_owned()))
    }
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// Effect
// =============================================================================

/// Identifier of an effect, unique within one scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EffectId(pub u64);

impl fmt::Display for EffectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "effect#{}", self.0)
    }
}

/// Variant-specific timer data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectState {
    /// Not started, or an instant with nothing to track.
    Instant,
    /// Burn timers.
    Burn {
        /// Total burn time
        duration: Duration,
        /// Time of the last strike; `None` until the first one
        last_strike: Option<Duration>,
    },
    /// Freeze timer.
    Freeze {
        /// Time until the gate reopens
        duration: Duration,
    },
}

/// A live effect.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Effect {
    /// Identifier
    pub id: EffectId,
    /// What the effect does
    pub kind: EffectKind,
    /// Side receiving the effect
    pub target: Side,
    /// Side that cast it
    pub origin: Side,
    /// Clock time at creation
    pub started_at: Duration,
    /// Variant timers
    pub state: EffectState,
    /// Set once the effect has finished; it is swept on the next advance
    pub over: bool,
}

impl Effect {
    /// Create an unstarted effect.
    #[must_use]
    pub fn new(id: EffectId, kind: EffectKind, target: Side, origin: Side, now: Duration) -> Self {
        Self {
            id,
            kind,
            target,
            origin,
            started_at: now,
            state: EffectState::Instant,
            over: false,
        }
    }

    /// Time since the effect was created.
    #[must_use]
    pub fn elapsed(&self, now: Duration) -> Duration {
        now.saturating_sub(self.started_at)
    }
}

// =============================================================================
// Dispatch
// =============================================================================

/// Everything a hook may touch.
pub struct EffectContext<'a> {
    /// Current clock time
    pub now: Duration,
    /// Combat state to mutate
    pub combat: &'a mut CombatState,
    /// Effect RNG stream
    pub rng: &'a mut ChaCha8Rng,
    /// Roll ranges
    pub tuning: &'a EffectTuning,
}

/// Start hook.
pub type StartFn = fn(&mut Effect, &mut EffectContext<'_>);

/// Update hook. The flag says whether the origin side may act this tick.
pub type UpdateFn = fn(&mut Effect, &mut EffectContext<'_>, bool);

/// Dispatch row for one effect kind.
#[derive(Debug, Clone, Copy)]
pub struct Behavior {
    /// Runs once when the effect is requested
    pub start: StartFn,
    /// Runs once per advance while the effect is live
    pub update: UpdateFn,
    /// Removed on the first sweep after creation
    pub oneshot: bool,
    /// Runs even while the origin's gate is closed
    pub gate_exempt: bool,
}

/// Update hook for effects that finish in `start`.
fn no_update(_effect: &mut Effect, _ctx: &mut EffectContext<'_>, _permitted: bool) {}
