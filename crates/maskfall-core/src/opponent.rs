//! The defender's autonomous caster.
//!
//! After a rolled wait the opponent picks a kind from its repertoire and
//! casts it at the attacker. A closed defender gate blocks every cast except
//! heals; a blocked cast leaves the timer alone so the opponent tries again
//! on the next tick.

use std::time::Duration;

use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

use crate::combat::{CombatState, Side};
use crate::config::OpponentConfig;
use crate::effect::EffectKind;
use crate::event::{Event, EventLog};
use crate::scheduler::{EffectScheduler, RequestOutcome};

/// Timer-driven caster for the defender.
#[derive(Debug, Clone)]
pub struct Opponent {
    config: OpponentConfig,
    last_cast: Duration,
    wait: Duration,
    blocked: bool,
    rng: ChaCha8Rng,
    events: EventLog,
}

impl Opponent {
    /// Create an opponent whose first wait starts at `now`.
    #[must_use]
    pub fn new(config: OpponentConfig, mut rng: ChaCha8Rng, now: Duration) -> Self {
        let wait = config.wait_ms.roll_millis(&mut rng);
        Self {
            config,
            last_cast: now,
            wait,
            blocked: false,
            rng,
            events: EventLog::new(),
        }
    }

    /// Cast if the wait has elapsed and the defender may act.
    pub fn update(
        &mut self,
        now: Duration,
        combat: &mut CombatState,
        scheduler: &mut EffectScheduler,
    ) -> Option<RequestOutcome> {
        if now.saturating_sub(self.last_cast) < self.wait {
            return None;
        }
        let kind = *self.config.repertoire.choose(&mut self.rng)?;

        if kind != EffectKind::InstantHeal && !combat.can_act(Side::Defender) {
            if !self.blocked {
                self.blocked = true;
                self.events.push(Event::CastBlocked {
                    side: Side::Defender,
                    kind,
                });
            }
            tracing::debug!(%kind, "opponent cast blocked, retrying next tick");
            return None;
        }
        self.blocked = false;

        // Heals are self-targeted.
        let target = if kind == EffectKind::InstantHeal {
            Side::Defender
        } else {
            Side::Attacker
        };
        let outcome = scheduler.request(kind, target, Side::Defender, now, combat);

        self.last_cast = now;
        self.wait = self.config.wait_ms.roll_millis(&mut self.rng);
        tracing::debug!(%kind, next_wait = ?self.wait, "opponent cast");
        Some(outcome)
    }

    /// Time of the last successful cast (or of creation).
    #[must_use]
    pub fn last_cast(&self) -> Duration {
        self.last_cast
    }

    /// Current wait before the next cast.
    #[must_use]
    pub fn wait(&self) -> Duration {
        self.wait
    }

    /// Take the events produced since the last drain.
    pub fn drain_events(&mut self) -> Vec<Event> {
        self.events.drain()
    }
}
