//! Engine facade.
//!
//! [`Engine`] owns the clock, the combat state, the effect scheduler, the
//! grid and the opponent, and is the only thing a host talks to.
//!
//! # Tick order
//!
//! 1. Advance the clock by `dt`
//! 2. Grid timers (unlock and regenerate)
//! 3. Effect updates and sweep
//! 4. Opponent
//! 5. Win evaluation
//!
//! Once an outcome is reached it is returned from exactly one `tick`. After
//! that every mutating call is a no-op.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//!
//! use maskfall_core::{EffectKind, Engine, EngineConfig, Outcome, Side};
//!
//! let config = EngineConfig {
//!     opponent: None,
//!     ..EngineConfig::default()
//! };
//! let mut engine = Engine::new(config).unwrap();
//!
//! while engine.health(Side::Defender) > 0 {
//!     engine.request_effect(EffectKind::InstantDamage, Side::Defender);
//! }
//! assert_eq!(engine.tick(Duration::from_millis(16)), Some(Outcome::AttackerWins));
//! assert_eq!(engine.tick(Duration::from_millis(16)), None);
//! ```

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::Duration;

use glam::IVec2;
use mosaic::{hash::hash_lattice_into, Lattice, TileKind};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::clock::{Clock, ManualClock};
use crate::combat::{CombatState, Side};
use crate::config::EngineConfig;
use crate::effect::{Effect, EffectKind};
use crate::error::ConfigError;
use crate::event::{Event, EventLog};
use crate::grid::{GridEngine, GridState, GridTiming};
use crate::opponent::Opponent;
use crate::outcome::{self, Outcome};
use crate::scheduler::{EffectScheduler, RequestOutcome};

// Stream ids carved out of the master seed.
const GRID_STREAM: u64 = 1;
const EFFECT_STREAM: u64 = 2;
const OPPONENT_STREAM: u64 = 3;

fn stream(seed: u64, id: u64) -> ChaCha8Rng {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(id);
    rng
}

/// The puzzle-combat engine.
#[derive(Debug)]
pub struct Engine {
    config: EngineConfig,
    clock: Box<dyn Clock>,
    combat: CombatState,
    scheduler: EffectScheduler,
    grid: GridEngine,
    opponent: Option<Opponent>,
    outcome: Option<Outcome>,
    events: EventLog,
}

impl Engine {
    /// Build an engine on a [`ManualClock`].
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the configuration is invalid.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        Self::with_clock(config, Box::new(ManualClock::new()))
    }

    /// Build an engine from a JSON config.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for malformed or invalid configuration.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Self::new(EngineConfig::from_json(json)?)
    }

    /// Build an engine on a caller-supplied clock.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the configuration is invalid.
    pub fn with_clock(config: EngineConfig, clock: Box<dyn Clock>) -> Result<Self, ConfigError> {
        config.validate()?;

        let now = clock.now();
        let mut grid_rng = stream(config.seed, GRID_STREAM);
        let lattice = Lattice::generate(config.extent()?, &config.palette, &mut grid_rng)?;
        let grid = GridEngine::new(
            lattice,
            GridTiming {
                regen_delay: config.regen_delay(),
                move_repeat_delay: config.move_repeat_delay(),
            },
            grid_rng,
        );
        let scheduler =
            EffectScheduler::new(config.effects.clone(), stream(config.seed, EFFECT_STREAM));
        let opponent = config
            .opponent
            .clone()
            .map(|opp| Opponent::new(opp, stream(config.seed, OPPONENT_STREAM), now));

        tracing::debug!(
            seed = config.seed,
            width = config.width,
            height = config.height,
            opponent = opponent.is_some(),
            "engine created"
        );

        Ok(Self {
            combat: CombatState::new(config.attacker_health, config.defender_health),
            config,
            clock,
            scheduler,
            grid,
            opponent,
            outcome: None,
            events: EventLog::new(),
        })
    }

    // =========================================================================
    // Tick
    // =========================================================================

    /// Advance the simulation by one frame.
    ///
    /// Returns the outcome on the tick that reaches it, and `None` otherwise.
    pub fn tick(&mut self, dt: Duration) -> Option<Outcome> {
        if self.outcome.is_some() {
            return None;
        }

        self.clock.advance(dt);
        let now = self.clock.now();

        self.grid.update(now);
        self.collect_events();

        self.scheduler.advance(now, &mut self.combat);
        self.collect_events();

        if let Some(opponent) = &mut self.opponent {
            opponent.update(now, &mut self.combat, &mut self.scheduler);
        }
        self.collect_events();

        let outcome = outcome::evaluate(&self.combat)?;
        self.outcome = Some(outcome);
        self.events.push(Event::OutcomeReached { outcome });
        tracing::debug!(%outcome, ?now, "match over");
        Some(outcome)
    }

    // =========================================================================
    // Input
    // =========================================================================

    /// Move the cursor.
    pub fn pointer_move(&mut self, delta: IVec2) {
        if self.is_finished() {
            return;
        }
        self.grid.pointer_move(delta, self.clock.now());
    }

    /// Select, deselect or swap at the cursor.
    ///
    /// A swap that clears tiles casts the cleared kind's effect for the
    /// attacker: water heals the attacker, everything else hits the defender
    /// and needs the attacker's gate open.
    pub fn confirm(&mut self) {
        if self.is_finished() {
            return;
        }
        let now = self.clock.now();
        let clear = self.grid.confirm(now);
        self.collect_events();

        if let Some(clear) = clear {
            self.cast_for_attacker(clear.kind, now);
        }
    }

    fn cast_for_attacker(&mut self, tile: TileKind, now: Duration) {
        let kind = EffectKind::from(tile);
        if kind == EffectKind::InstantHeal {
            self.scheduler
                .request(kind, Side::Attacker, Side::Attacker, now, &mut self.combat);
        } else if self.combat.can_act(Side::Attacker) {
            self.scheduler
                .request(kind, Side::Defender, Side::Attacker, now, &mut self.combat);
        } else {
            tracing::debug!(%kind, "attacker cast blocked");
            self.events.push(Event::CastBlocked {
                side: Side::Attacker,
                kind,
            });
        }
        self.collect_events();
    }

    // =========================================================================
    // Attack trigger
    // =========================================================================

    /// Start an effect on `target`, cast by the other side.
    pub fn request_effect(&mut self, kind: EffectKind, target: Side) -> RequestOutcome {
        if self.is_finished() {
            return RequestOutcome::Rejected;
        }
        let now = self.clock.now();
        let outcome = self
            .scheduler
            .request_effect(kind, target, now, &mut self.combat);
        self.collect_events();
        outcome
    }

    /// Start an effect by symbolic name. Unknown names are rejected.
    pub fn request_named(&mut self, name: &str, target: Side) -> RequestOutcome {
        if self.is_finished() {
            return RequestOutcome::Rejected;
        }
        let now = self.clock.now();
        let outcome = self
            .scheduler
            .request_named(name, target, now, &mut self.combat);
        self.collect_events();
        outcome
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Health of a side.
    #[must_use]
    pub fn health(&self, side: Side) -> u32 {
        self.combat.health(side)
    }

    /// Whether a side's gate is open.
    #[must_use]
    pub fn can_act(&self, side: Side) -> bool {
        self.combat.can_act(side)
    }

    /// Whether the visual for `kind` should show on `side`.
    ///
    /// Freeze shows while the side is frozen and burns while it is burning.
    /// Instants have no lasting visual.
    #[must_use]
    pub fn is_effect_visual_active(&self, kind: EffectKind, side: Side) -> bool {
        kind.visual_flag()
            .is_some_and(|flag| self.combat.flags(side).contains(flag))
    }

    /// The lattice.
    #[must_use]
    pub fn lattice(&self) -> &Lattice {
        self.grid.lattice()
    }

    /// Cursor coordinate.
    #[must_use]
    pub fn cursor(&self) -> IVec2 {
        self.grid.cursor()
    }

    /// Held coordinate, if any.
    #[must_use]
    pub fn held(&self) -> Option<IVec2> {
        self.grid.held()
    }

    /// Grid input state.
    #[must_use]
    pub fn grid_state(&self) -> GridState {
        self.grid.state()
    }

    /// Whether grid input is closed.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.grid.is_locked()
    }

    /// Terminal outcome, once reached.
    #[must_use]
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// Whether the match has ended.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    /// Live effects in creation order.
    #[must_use]
    pub fn active_effects(&self) -> &[Effect] {
        self.scheduler.active()
    }

    /// Combat state.
    #[must_use]
    pub fn combat(&self) -> &CombatState {
        &self.combat
    }

    /// Clock time.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    /// Configuration the engine was built from.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Take every event recorded since the last drain.
    pub fn drain_events(&mut self) -> Vec<Event> {
        self.events.drain()
    }

    /// Hash of the complete simulation state.
    ///
    /// Two engines built from the same config and fed the same inputs report
    /// the same hash.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.clock.now().hash(&mut hasher);
        self.combat.hash_into(&mut hasher);
        self.scheduler.hash_into(&mut hasher);
        hash_lattice_into(self.grid.lattice(), &mut hasher);
        self.grid.cursor().hash(&mut hasher);
        self.grid.state().hash(&mut hasher);
        if let Some(opponent) = &self.opponent {
            opponent.last_cast().hash(&mut hasher);
            opponent.wait().hash(&mut hasher);
        }
        self.outcome.hash(&mut hasher);
        hasher.finish()
    }

    /// Replace the generated lattice with a fixed layout.
    #[cfg(test)]
    pub(crate) fn set_lattice(&mut self, lattice: Lattice) {
        self.grid.set_lattice(lattice);
    }

    fn collect_events(&mut self) {
        self.events.extend(self.grid.drain_events());
        self.events.extend(self.scheduler.drain_events());
        if let Some(opponent) = &mut self.opponent {
            self.events.extend(opponent.drain_events());
        }
    }
}
