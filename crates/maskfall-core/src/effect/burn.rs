//! Damage over time.
//!
//! A burn lives for a rolled duration. Its strike interval is re-rolled on
//! every update, and a strike lands only while the caster may act. The first
//! update after the start is always due. The clock keeps running while the
//! caster is gated. A burn never strikes on the update that expires it.

use super::{Behavior, Effect, EffectContext, EffectState};

pub(super) static BEHAVIOR: Behavior = Behavior {
    start,
    update,
    oneshot: false,
    gate_exempt: false,
};

fn start(effect: &mut Effect, ctx: &mut EffectContext<'_>) {
    let duration = ctx.tuning.burn_duration_ms.roll_millis(ctx.rng);
    effect.state = EffectState::Burn {
        duration,
        last_strike: None,
    };
    ctx.combat.set_burning(effect.target, true);
    tracing::debug!(id = %effect.id, target = ?effect.target, ?duration, "burn started");
}

fn update(effect: &mut Effect, ctx: &mut EffectContext<'_>, permitted: bool) {
    let elapsed = effect.elapsed(ctx.now);
    let EffectState::Burn {
        duration,
        last_strike,
    } = &mut effect.state
    else {
        effect.over = true;
        return;
    };

    if elapsed >= *duration {
        effect.over = true;
        ctx.combat.set_burning(effect.target, false);
        tracing::debug!(id = %effect.id, target = ?effect.target, "burn expired");
        return;
    }

    let interval = ctx.tuning.burn_interval_ms.roll_millis(ctx.rng);
    let due = match *last_strike {
        Some(at) => ctx.now.saturating_sub(at) >= interval,
        None => true,
    };
    if due {
        *last_strike = Some(ctx.now);
        if permitted {
            ctx.combat.damage(effect.target, ctx.tuning.burn_strike_damage);
        } else {
            tracing::trace!(id = %effect.id, "burn strike withheld while caster is gated");
        }
    }
}
