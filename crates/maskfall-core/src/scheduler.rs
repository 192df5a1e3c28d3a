//! Effect scheduler.
//!
//! Owns every in-flight [`Effect`]. A request builds the effect and runs its
//! start hook immediately; [`EffectScheduler::advance`] runs update hooks and
//! then sweeps finished effects in a single `retain` pass.
//!
//! # Gating
//!
//! An update runs with `permitted = gate_exempt || can_act(origin)`. Burns
//! are not exempt, so a frozen caster's burn keeps ticking but deals no
//! damage. Freezes are exempt, so a frozen side always thaws.

use std::hash::{Hash, Hasher};
use std::time::Duration;

use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::combat::{CombatState, Side};
use crate::config::EffectTuning;
use crate::effect::{Effect, EffectContext, EffectId, EffectKind};
use crate::event::{Event, EventLog};

/// Result of an effect request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestOutcome {
    /// The effect was created and started.
    Accepted(EffectId),
    /// Nothing happened.
    Rejected,
}

impl RequestOutcome {
    /// Whether the request was accepted.
    #[must_use]
    pub fn is_accepted(self) -> bool {
        matches!(self, RequestOutcome::Accepted(_))
    }

    /// The new effect's id, if accepted.
    #[must_use]
    pub fn id(self) -> Option<EffectId> {
        match self {
            RequestOutcome::Accepted(id) => Some(id),
            RequestOutcome::Rejected => None,
        }
    }
}

/// Owner of all live effects.
#[derive(Debug, Clone)]
pub struct EffectScheduler {
    effects: Vec<Effect>,
    next_id: u64,
    rng: ChaCha8Rng,
    tuning: EffectTuning,
    events: EventLog,
}

impl EffectScheduler {
    /// Create an empty scheduler.
    #[must_use]
    pub fn new(tuning: EffectTuning, rng: ChaCha8Rng) -> Self {
        Self {
            effects: Vec::new(),
            next_id: 0,
            rng,
            tuning,
            events: EventLog::new(),
        }
    }

    /// Start an effect of `kind` cast by `origin` on `target`.
    pub fn request(
        &mut self,
        kind: EffectKind,
        target: Side,
        origin: Side,
        now: Duration,
        combat: &mut CombatState,
    ) -> RequestOutcome {
        let id = EffectId(self.next_id);
        self.next_id += 1;

        let mut effect = Effect::new(id, kind, target, origin, now);
        let mut ctx = EffectContext {
            now,
            combat,
            rng: &mut self.rng,
            tuning: &self.tuning,
        };
        (kind.behavior().start)(&mut effect, &mut ctx);

        tracing::debug!(%id, %kind, ?target, ?origin, "effect started");
        self.events.push(Event::EffectStarted {
            id,
            kind,
            target,
            origin,
        });
        self.effects.push(effect);
        RequestOutcome::Accepted(id)
    }

    /// Start an effect on `target`, cast by the other side.
    pub fn request_effect(
        &mut self,
        kind: EffectKind,
        target: Side,
        now: Duration,
        combat: &mut CombatState,
    ) -> RequestOutcome {
        self.request(kind, target, target.opponent(), now, combat)
    }

    /// Start an effect named symbolically (`"freeze"`, `"earth_mask"`, ...).
    ///
    /// Unknown names are logged and rejected.
    pub fn request_named(
        &mut self,
        name: &str,
        target: Side,
        now: Duration,
        combat: &mut CombatState,
    ) -> RequestOutcome {
        match name.parse::<EffectKind>() {
            Ok(kind) => self.request_effect(kind, target, now, combat),
            Err(err) => {
                tracing::warn!(%err, "effect request rejected");
                RequestOutcome::Rejected
            }
        }
    }

    /// Update every live effect, then sweep the finished ones.
    pub fn advance(&mut self, now: Duration, combat: &mut CombatState) {
        {
            let mut ctx = EffectContext {
                now,
                combat: &mut *combat,
                rng: &mut self.rng,
                tuning: &self.tuning,
            };
            for effect in &mut self.effects {
                if effect.over {
                    continue;
                }
                let behavior = effect.kind.behavior();
                let permitted = behavior.gate_exempt || ctx.combat.can_act(effect.origin);
                (behavior.update)(effect, &mut ctx, permitted);
            }
        }

        let events = &mut self.events;
        self.effects.retain(|effect| {
            let done = effect.over || effect.kind.behavior().oneshot;
            if done {
                events.push(Event::EffectEnded {
                    id: effect.id,
                    kind: effect.kind,
                    target: effect.target,
                });
            }
            !done
        });

        // An expiring burn clears the flag even if another burn still holds it.
        for effect in &self.effects {
            if effect.kind == EffectKind::DamageOverTime {
                combat.set_burning(effect.target, true);
            }
        }
    }

    /// Live effects in creation order.
    #[must_use]
    pub fn active(&self) -> &[Effect] {
        &self.effects
    }

    /// Number of live effects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.effects.len()
    }

    /// Whether no effects are live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Take the events produced since the last drain.
    pub fn drain_events(&mut self) -> Vec<Event> {
        self.events.drain()
    }

    /// Feed the live effects into a hasher.
    pub fn hash_into<H: Hasher>(&self, hasher: &mut H) {
        self.next_id.hash(hasher);
        self.effects.hash(hasher);
    }
}
