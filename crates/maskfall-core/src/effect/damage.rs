//! Instant damage.

use super::{no_update, Behavior, Effect, EffectContext};

pub(super) static BEHAVIOR: Behavior = Behavior {
    start,
    update: no_update,
    oneshot: true,
    gate_exempt: true,
};

fn start(effect: &mut Effect, ctx: &mut EffectContext<'_>) {
    let points = ctx.tuning.damage.roll(ctx.rng);
    ctx.combat.damage(effect.target, points);
    effect.over = true;
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::super::harness::Harness;
    use super::super::EffectKind;
    use crate::combat::Side;
    use crate::config::{EffectTuning, RollRange};

    #[test]
    fn damages_target_and_finishes() {
        let mut h = Harness::new(EffectTuning {
            damage: RollRange::fixed(3),
            ..EffectTuning::default()
        });
        let effect = h.start(EffectKind::InstantDamage, Side::Defender, Side::Attacker, Duration::ZERO);
        assert!(effect.over);
        assert_eq!(h.combat.health(Side::Defender), 7);
        assert_eq!(h.combat.health(Side::Attacker), 10);
    }

    #[test]
    fn default_roll_is_one_or_two() {
        let mut h = Harness::new(EffectTuning::default());
        for _ in 0..20 {
            let before = h.combat.health(Side::Defender);
            h.combat.heal(Side::Defender, 2);
            h.start(EffectKind::InstantDamage, Side::Defender, Side::Attacker, Duration::ZERO);
            let dealt = before + 2 - h.combat.health(Side::Defender);
            assert!((1..=2).contains(&dealt));
        }
    }
}
