//! Combat state shared by both sides.
//!
//! [`CombatState`] owns the two health pools, the two action gates and the
//! per-side status flags. Effects, the opponent and the engine mutate it
//! only through the methods here.

use std::hash::{Hash, Hasher};

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

// =============================================================================
// Side
// =============================================================================

/// One of the two combatants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Side {
    /// The player solving the puzzle
    Attacker = 0,
    /// The enemy being attacked
    Defender = 1,
}

impl Side {
    /// Total number of sides.
    pub const COUNT: usize = 2;

    /// Both sides.
    #[must_use]
    pub const fn all() -> &'static [Side] {
        &[Side::Attacker, Side::Defender]
    }

    /// Index into per-side storage.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The other side.
    #[must_use]
    pub const fn opponent(self) -> Side {
        match self {
            Side::Attacker => Side::Defender,
            Side::Defender => Side::Attacker,
        }
    }
}

// =============================================================================
// Health
// =============================================================================

/// Unsigned health. Damage saturates at zero; heals have no cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HealthPool(u32);

impl HealthPool {
    /// Create a pool.
    #[must_use]
    pub const fn new(health: u32) -> Self {
        Self(health)
    }

    /// Current health.
    #[must_use]
    pub const fn current(self) -> u32 {
        self.0
    }

    /// Whether health has reached zero.
    #[must_use]
    pub const fn is_depleted(self) -> bool {
        self.0 == 0
    }

    /// Remove health. Returns the remaining health.
    pub fn damage(&mut self, points: u32) -> u32 {
        self.0 = self.0.saturating_sub(points);
        self.0
    }

    /// Add health. Returns the new health.
    pub fn heal(&mut self, points: u32) -> u32 {
        self.0 = self.0.saturating_add(points);
        self.0
    }
}

// =============================================================================
// Status Flags
// =============================================================================

bitflags! {
    /// Visual and gating status per side.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct StatusFlags: u8 {
        /// Held by a freeze; drives the stone shield visual.
        const FROZEN  = 1 << 0;
        /// Targeted by a live burn; drives the fire visual.
        const BURNING = 1 << 1;
    }
}

// =============================================================================
// CombatState
// =============================================================================

/// Health, gates and flags for both sides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatState {
    health: [HealthPool; Side::COUNT],
    gates: [bool; Side::COUNT],
    flags: [StatusFlags; Side::COUNT],
}

impl CombatState {
    /// Create a state with the given starting health. Both sides can act.
    #[must_use]
    pub fn new(attacker_health: u32, defender_health: u32) -> Self {
        Self {
            health: [
                HealthPool::new(attacker_health),
                HealthPool::new(defender_health),
            ],
            gates: [true; Side::COUNT],
            flags: [StatusFlags::empty(); Side::COUNT],
        }
    }

    /// Current health of a side.
    #[must_use]
    pub fn health(&self, side: Side) -> u32 {
        self.health[side.index()].current()
    }

    /// Whether a side's action gate is open.
    #[must_use]
    pub fn can_act(&self, side: Side) -> bool {
        self.gates[side.index()]
    }

    /// Status flags of a side.
    #[must_use]
    pub fn flags(&self, side: Side) -> StatusFlags {
        self.flags[side.index()]
    }

    /// Whether a side is frozen.
    #[must_use]
    pub fn is_frozen(&self, side: Side) -> bool {
        self.flags(side).contains(StatusFlags::FROZEN)
    }

    /// Whether a side is burning.
    #[must_use]
    pub fn is_burning(&self, side: Side) -> bool {
        self.flags(side).contains(StatusFlags::BURNING)
    }

    /// Damage a side. Returns the remaining health.
    pub fn damage(&mut self, side: Side, points: u32) -> u32 {
        let remaining = self.health[side.index()].damage(points);
        tracing::debug!(?side, points, remaining, "damage");
        remaining
    }

    /// Heal a side. Returns the new health.
    pub fn heal(&mut self, side: Side, points: u32) -> u32 {
        let health = self.health[side.index()].heal(points);
        tracing::debug!(?side, points, health, "heal");
        health
    }

    /// Open or close a side's action gate.
    pub fn set_gate(&mut self, side: Side, can_act: bool) {
        self.gates[side.index()] = can_act;
    }

    /// Set or clear `FROZEN`.
    pub fn set_frozen(&mut self, side: Side, frozen: bool) {
        self.flags[side.index()].set(StatusFlags::FROZEN, frozen);
    }

    /// Set or clear `BURNING`.
    pub fn set_burning(&mut self, side: Side, burning: bool) {
        self.flags[side.index()].set(StatusFlags::BURNING, burning);
    }

    /// Feed this state into a hasher.
    pub fn hash_into<H: Hasher>(&self, hasher: &mut H) {
        self.health.hash(hasher);
        self.gates.hash(hasher);
        for flags in &self.flags {
            flags.bits().hash(hasher);
        }
    }
}
