//! Freeze.
//!
//! Landing a freeze always deals its damage. If the target is already frozen
//! the new freeze ends at once and leaves the running one alone; otherwise it
//! closes the target's gate until its duration has passed.

use std::time::Duration;

use super::{Behavior, Effect, EffectContext, EffectState};

pub(super) static BEHAVIOR: Behavior = Behavior {
    start,
    update,
    oneshot: false,
    gate_exempt: true,
};

fn start(effect: &mut Effect, ctx: &mut EffectContext<'_>) {
    let points = ctx.tuning.freeze_damage.roll(ctx.rng);
    ctx.combat.damage(effect.target, points);

    if ctx.combat.is_frozen(effect.target) {
        tracing::debug!(id = %effect.id, target = ?effect.target, "target already frozen, not stacking");
        effect.state = EffectState::Freeze {
            duration: Duration::ZERO,
        };
        effect.over = true;
        return;
    }

    let duration = ctx.tuning.freeze_duration_ms.roll_millis(ctx.rng);
    ctx.combat.set_frozen(effect.target, true);
    ctx.combat.set_gate(effect.target, false);
    effect.state = EffectState::Freeze { duration };
    tracing::debug!(id = %effect.id, target = ?effect.target, ?duration, "freeze started");
}

fn update(effect: &mut Effect, ctx: &mut EffectContext<'_>, _permitted: bool) {
    if effect.over {
        return;
    }
    let EffectState::Freeze { duration } = effect.state else {
        effect.over = true;
        return;
    };
    if effect.elapsed(ctx.now) >= duration {
        ctx.combat.set_gate(effect.target, true);
        ctx.combat.set_frozen(effect.target, false);
        effect.over = true;
        tracing::debug!(id = %effect.id, target = ?effect.target, "thawed");
    }
}
