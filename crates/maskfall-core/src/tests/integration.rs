//! End-to-end scenarios through the engine surface.

use glam::IVec2;
use mosaic::{detect_matches, TileKind};

use crate::clock::SystemClock;
use crate::combat::Side;
use crate::config::EngineConfig;
use crate::effect::EffectKind;
use crate::engine::Engine;
use crate::event::Event;
use crate::outcome::Outcome;
use crate::scheduler::RequestOutcome;

use super::helpers::{
    engine_with_rows, fixed_opponent, ms, quiet_config, run_for, started_count, started_kinds,
    swap, walk_to,
};

// Layouts are written top row first. In each, swapping (1,0) with (1,1)
// completes the middle row with the named kind.
const LIGHTNING_ROW: [&str; 3] = ["WFE", "LWL", "WLE"];
const WATER_ROW: [&str; 3] = ["FEL", "WLW", "EWF"];
const EARTH_ROW: [&str; 3] = ["FLW", "EFE", "LEW"];
const FIRE_ROW: [&str; 3] = ["LWE", "FLF", "EFW"];

const LOWER: IVec2 = IVec2::new(1, 0);
const MIDDLE: IVec2 = IVec2::new(1, 1);

// =============================================================================
// Combat Scenarios
// =============================================================================

#[test]
fn instant_damage_hits_only_the_target() {
    let mut engine = Engine::new(quiet_config()).unwrap();
    let outcome = engine.request_effect(EffectKind::InstantDamage, Side::Defender);
    assert!(outcome.is_accepted());
    assert_eq!(engine.health(Side::Defender), 7);
    assert_eq!(engine.health(Side::Attacker), 10);
}

#[test]
fn freeze_locks_attacker_for_its_duration() {
    let mut engine = Engine::new(quiet_config()).unwrap();
    engine.request_effect(EffectKind::Freeze, Side::Attacker);
    assert_eq!(engine.health(Side::Attacker), 6);
    assert!(!engine.can_act(Side::Attacker));
    assert!(engine.is_effect_visual_active(EffectKind::Freeze, Side::Attacker));

    engine.tick(ms(4999));
    assert!(!engine.can_act(Side::Attacker));

    engine.tick(ms(1));
    assert!(engine.can_act(Side::Attacker));
    assert!(!engine.is_effect_visual_active(EffectKind::Freeze, Side::Attacker));
    assert!(engine.active_effects().is_empty());
}

#[test]
fn heal_has_no_upper_clamp() {
    let mut engine = Engine::new(quiet_config()).unwrap();
    engine.request_effect(EffectKind::InstantHeal, Side::Attacker);
    assert_eq!(engine.health(Side::Attacker), 12);
}

#[test]
fn burn_strikes_at_once_then_once_per_interval_until_expiry() {
    let mut engine = Engine::new(quiet_config()).unwrap();
    engine.request_effect(EffectKind::DamageOverTime, Side::Defender);
    assert!(engine.is_effect_visual_active(EffectKind::DamageOverTime, Side::Defender));

    let mut strikes = Vec::new();
    let mut health = engine.health(Side::Defender);
    for _ in 0..400 {
        engine.tick(ms(16));
        let now = engine.health(Side::Defender);
        if now < health {
            assert_eq!(health - now, 1);
            strikes.push(engine.now());
        }
        health = now;
    }

    assert_eq!(strikes, vec![ms(16), ms(1024), ms(2032)]);
    assert_eq!(engine.health(Side::Defender), 7);
    assert!(!engine.is_effect_visual_active(EffectKind::DamageOverTime, Side::Defender));
    assert!(engine.active_effects().is_empty());
}

#[test]
fn instant_kinds_have_no_visual() {
    let mut engine = Engine::new(quiet_config()).unwrap();
    engine.request_effect(EffectKind::InstantDamage, Side::Defender);
    engine.request_effect(EffectKind::InstantHeal, Side::Defender);
    for side in Side::all() {
        assert!(!engine.is_effect_visual_active(EffectKind::InstantDamage, *side));
        assert!(!engine.is_effect_visual_active(EffectKind::InstantHeal, *side));
    }
}

#[test]
fn named_requests() {
    let mut engine = Engine::new(quiet_config()).unwrap();

    assert_eq!(
        engine.request_named("summon-dragon", Side::Defender),
        RequestOutcome::Rejected
    );
    assert!(engine.drain_events().is_empty());
    assert_eq!(engine.health(Side::Defender), 10);

    assert!(engine
        .request_named("earth_mask", Side::Defender)
        .is_accepted());
    assert!(!engine.can_act(Side::Defender));
    assert_eq!(started_kinds(&engine.drain_events()), vec![EffectKind::Freeze]);
}

// =============================================================================
// Outcome
// =============================================================================

#[test]
fn attacker_wins_reported_once_and_freezes_state() {
    let mut engine = Engine::new(quiet_config()).unwrap();
    // A burn on the attacker must not keep ticking after the match ends.
    engine.request_effect(EffectKind::DamageOverTime, Side::Attacker);
    for _ in 0..4 {
        engine.request_effect(EffectKind::InstantDamage, Side::Defender);
    }
    assert_eq!(engine.health(Side::Defender), 0);

    assert_eq!(engine.tick(ms(16)), Some(Outcome::AttackerWins));
    assert_eq!(engine.outcome(), Some(Outcome::AttackerWins));

    let hash = engine.state_hash();
    let attacker = engine.health(Side::Attacker);
    assert_eq!(run_for(&mut engine, ms(10_000), ms(16)), None);
    assert_eq!(
        engine.request_effect(EffectKind::InstantHeal, Side::Defender),
        RequestOutcome::Rejected
    );
    assert_eq!(
        engine.request_named("freeze", Side::Attacker),
        RequestOutcome::Rejected
    );
    engine.pointer_move(IVec2::X);
    engine.confirm();

    assert_eq!(engine.health(Side::Attacker), attacker);
    assert_eq!(engine.health(Side::Defender), 0);
    assert_eq!(engine.state_hash(), hash);

    let reached = engine
        .drain_events()
        .iter()
        .filter(|e| matches!(e, Event::OutcomeReached { .. }))
        .count();
    assert_eq!(reached, 1);
}

#[test]
fn attacker_loss_checked_first() {
    let mut engine = Engine::new(quiet_config()).unwrap();
    for _ in 0..4 {
        engine.request_effect(EffectKind::InstantDamage, Side::Defender);
        engine.request_effect(EffectKind::InstantDamage, Side::Attacker);
    }
    assert_eq!(engine.tick(ms(16)), Some(Outcome::AttackerDefeated));
}

// =============================================================================
// Grid To Combat
// =============================================================================

#[test]
fn equal_kind_swap_changes_nothing() {
    let mut engine = engine_with_rows(quiet_config(), &["FFW", "WEL"]);
    let before = engine.lattice().clone();
    engine.drain_events();

    // (0,1) and (1,1) are both fire.
    swap(&mut engine, IVec2::new(0, 1), IVec2::new(1, 1));

    assert_eq!(engine.lattice(), &before);
    assert_eq!(engine.held(), None);
    let events = engine.drain_events();
    assert_eq!(started_count(&events), 0);
    assert!(events.iter().any(|e| matches!(e, Event::SwapRejected { .. })));
    assert_eq!(engine.health(Side::Defender), 10);
}

#[test]
fn differing_swap_commits_without_match() {
    let mut engine = engine_with_rows(quiet_config(), &["FWE", "WEL"]);
    swap(&mut engine, IVec2::new(0, 0), IVec2::new(1, 0));

    assert_eq!(engine.lattice().kind_at(IVec2::new(0, 0)), Some(TileKind::Earth));
    assert_eq!(engine.lattice().kind_at(IVec2::new(1, 0)), Some(TileKind::Water));
    assert!(!engine.is_locked());
    assert_eq!(started_count(&engine.drain_events()), 0);
}

#[test]
fn lightning_match_clears_run_and_casts_once() {
    let mut engine = engine_with_rows(quiet_config(), &LIGHTNING_ROW);
    engine.drain_events();
    swap(&mut engine, LOWER, MIDDLE);

    let lattice = engine.lattice();
    for x in 0..3 {
        assert_eq!(lattice.kind_at(IVec2::new(x, 1)), None);
    }
    assert_eq!(lattice.empty_count(), 3);
    assert!(engine.is_locked());

    let events = engine.drain_events();
    assert_eq!(started_kinds(&events), vec![EffectKind::InstantDamage]);
    assert_eq!(engine.health(Side::Defender), 7);
    assert_eq!(engine.health(Side::Attacker), 10);

    assert!(matches!(
        events.as_slice(),
        [
            Event::TileSelected { .. },
            Event::Swapped { .. },
            Event::TilesCleared {
                kind: TileKind::Lightning,
                ..
            },
            Event::EffectStarted {
                target: Side::Defender,
                origin: Side::Attacker,
                ..
            },
        ]
    ));
}

#[test]
fn water_match_heals_attacker() {
    let mut engine = engine_with_rows(quiet_config(), &WATER_ROW);
    swap(&mut engine, LOWER, MIDDLE);
    assert_eq!(engine.health(Side::Attacker), 15);
    assert_eq!(engine.health(Side::Defender), 10);
}

#[test]
fn earth_match_freezes_defender() {
    let mut engine = engine_with_rows(quiet_config(), &EARTH_ROW);
    swap(&mut engine, LOWER, MIDDLE);
    assert_eq!(engine.health(Side::Defender), 6);
    assert!(!engine.can_act(Side::Defender));
    assert!(engine.is_effect_visual_active(EffectKind::Freeze, Side::Defender));
}

#[test]
fn fire_match_burns_defender() {
    let mut engine = engine_with_rows(quiet_config(), &FIRE_ROW);
    swap(&mut engine, LOWER, MIDDLE);
    assert!(engine.is_effect_visual_active(EffectKind::DamageOverTime, Side::Defender));
    run_for(&mut engine, ms(4000), ms(100));
    assert_eq!(engine.health(Side::Defender), 7);
}

#[test]
fn frozen_attacker_cannot_cast_but_still_clears() {
    let mut engine = engine_with_rows(quiet_config(), &LIGHTNING_ROW);
    engine.request_effect(EffectKind::Freeze, Side::Attacker);
    engine.drain_events();

    swap(&mut engine, LOWER, MIDDLE);

    assert_eq!(engine.lattice().empty_count(), 3);
    assert_eq!(engine.health(Side::Defender), 10);
    let events = engine.drain_events();
    assert_eq!(started_count(&events), 0);
    assert!(events.contains(&Event::CastBlocked {
        side: Side::Attacker,
        kind: EffectKind::InstantDamage,
    }));
}

#[test]
fn frozen_attacker_can_still_heal() {
    let mut engine = engine_with_rows(quiet_config(), &WATER_ROW);
    engine.request_effect(EffectKind::Freeze, Side::Attacker);
    swap(&mut engine, LOWER, MIDDLE);
    assert_eq!(engine.health(Side::Attacker), 11);
}

// =============================================================================
// Grid Timers And Input
// =============================================================================

#[test]
fn locked_grid_ignores_input_then_regenerates() {
    let mut engine = engine_with_rows(quiet_config(), &LIGHTNING_ROW);
    swap(&mut engine, LOWER, MIDDLE);
    let cleared = engine.lattice().clone();
    let cursor = engine.cursor();
    engine.drain_events();

    engine.pointer_move(IVec2::X);
    engine.confirm();
    assert_eq!(engine.cursor(), cursor);
    assert_eq!(engine.held(), None);
    assert_eq!(engine.lattice(), &cleared);

    engine.tick(ms(499));
    assert!(engine.is_locked());
    engine.tick(ms(1));
    assert!(!engine.is_locked());
    assert!(engine.lattice().is_full());
    assert!(engine.drain_events().contains(&Event::LatticeRegenerated));

    let extent = engine.lattice().extent();
    for pos in extent.positions() {
        assert!(!detect_matches(engine.lattice(), pos).is_match());
    }
}

#[test]
fn move_repeat_delay_debounces_cursor() {
    let config = EngineConfig {
        move_repeat_delay_ms: 200,
        ..quiet_config()
    };
    let mut engine = Engine::new(config).unwrap();

    engine.pointer_move(IVec2::X);
    engine.pointer_move(IVec2::X);
    assert_eq!(engine.cursor(), IVec2::new(1, 0));

    engine.tick(ms(199));
    engine.pointer_move(IVec2::X);
    assert_eq!(engine.cursor(), IVec2::new(1, 0));

    engine.tick(ms(1));
    engine.pointer_move(IVec2::X);
    assert_eq!(engine.cursor(), IVec2::new(2, 0));
}

#[test]
fn held_tile_clamps_cursor_to_neighbours() {
    let mut engine = Engine::new(quiet_config()).unwrap();
    walk_to(&mut engine, IVec2::new(3, 3));
    engine.confirm();

    engine.pointer_move(IVec2::new(2, 0));
    assert_eq!(engine.cursor(), IVec2::new(4, 3));
    engine.pointer_move(IVec2::new(0, -1));
    assert_eq!(engine.cursor(), IVec2::new(3, 2));
    engine.pointer_move(IVec2::new(0, -4));
    assert_eq!(engine.cursor(), IVec2::new(3, 2));
    engine.pointer_move(IVec2::new(-5, 1));
    assert_eq!(engine.cursor(), IVec2::new(2, 3));

    // The clamped cursor always names a swappable neighbour.
    engine.confirm();
    assert_eq!(engine.held(), None);
    assert!(engine
        .drain_events()
        .iter()
        .any(|e| matches!(e, Event::Swapped { .. } | Event::SwapRejected { .. })));
}

// =============================================================================
// Opponent
// =============================================================================

#[test]
fn opponent_waits_for_thaw_then_casts() {
    let config = EngineConfig {
        opponent: Some(fixed_opponent(1000, vec![EffectKind::InstantDamage])),
        ..quiet_config()
    };
    let mut engine = Engine::new(config).unwrap();
    engine.request_effect(EffectKind::Freeze, Side::Defender);

    run_for(&mut engine, ms(4900), ms(100));
    assert_eq!(engine.health(Side::Attacker), 10);
    let blocked: Vec<Event> = engine
        .drain_events()
        .into_iter()
        .filter(|e| matches!(e, Event::CastBlocked { .. }))
        .collect();
    assert_eq!(
        blocked,
        vec![Event::CastBlocked {
            side: Side::Defender,
            kind: EffectKind::InstantDamage,
        }]
    );

    // Thaw and cast land on the same tick.
    engine.tick(ms(100));
    assert!(engine.can_act(Side::Defender));
    assert_eq!(engine.health(Side::Attacker), 7);
}

#[test]
fn default_opponent_attacks_eventually() {
    let config = EngineConfig {
        seed: 9,
        ..EngineConfig::default()
    };
    let mut engine = Engine::new(config).unwrap();
    run_for(&mut engine, ms(20_000), ms(16));

    let from_defender = engine
        .drain_events()
        .iter()
        .filter(|e| {
            matches!(
                e,
                Event::EffectStarted {
                    origin: Side::Defender,
                    target: Side::Attacker,
                    ..
                }
            )
        })
        .count();
    assert!(from_defender >= 2);
    assert!(engine.health(Side::Attacker) < 10 || engine.outcome().is_some());
}

// =============================================================================
// Construction
// =============================================================================

#[test]
fn engine_from_json() {
    let engine = Engine::from_json(r#"{ "width": 6, "height": 5, "opponent": null }"#).unwrap();
    assert_eq!(engine.lattice().extent().width(), 6);
    assert_eq!(engine.lattice().extent().height(), 5);
    assert!(engine.lattice().is_full());
}

#[test]
fn invalid_config_is_rejected() {
    let config = EngineConfig {
        palette: vec![TileKind::Fire, TileKind::Water],
        ..EngineConfig::default()
    };
    assert!(Engine::new(config).is_err());
}

#[test]
fn system_clock_engine_ticks() {
    let mut engine = Engine::with_clock(quiet_config(), Box::new(SystemClock::new())).unwrap();
    engine.request_effect(EffectKind::InstantDamage, Side::Defender);
    assert_eq!(engine.tick(ms(16)), None);
    assert!(engine.active_effects().is_empty());
}
