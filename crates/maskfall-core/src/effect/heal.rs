//! Instant heal.
//!
//! A side healing itself rolls the larger `passive_heal` range; a heal cast
//! on the other side rolls `heal`.

use super::{no_update, Behavior, Effect, EffectContext};

pub(super) static BEHAVIOR: Behavior = Behavior {
    start,
    update: no_update,
    oneshot: true,
    gate_exempt: true,
};

fn start(effect: &mut Effect, ctx: &mut EffectContext<'_>) {
    let range = if effect.origin == effect.target {
        ctx.tuning.passive_heal
    } else {
        ctx.tuning.heal
    };
    let points = range.roll(ctx.rng);
    ctx.combat.heal(effect.target, points);
    effect.over = true;
}
