//! Test helpers for building engines and scripting input.

use std::time::Duration;

use glam::IVec2;
use mosaic::Lattice;

use crate::config::{EffectTuning, EngineConfig, OpponentConfig, RollRange};
use crate::effect::EffectKind;
use crate::engine::Engine;
use crate::event::Event;
use crate::outcome::Outcome;

// =============================================================================
// Configuration
// =============================================================================

/// Milliseconds as a `Duration`.
pub fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

/// Effect tuning with every roll pinned.
///
/// Damage 3, heal 2, self heal 5, burn 3000 ms striking every 1000 ms for 1,
/// freeze 4 damage for 5000 ms.
pub fn fixed_tuning() -> EffectTuning {
    EffectTuning {
        damage: RollRange::fixed(3),
        heal: RollRange::fixed(2),
        passive_heal: RollRange::fixed(5),
        burn_duration_ms: RollRange::fixed(3000),
        burn_interval_ms: RollRange::fixed(1000),
        burn_strike_damage: 1,
        freeze_damage: RollRange::fixed(4),
        freeze_duration_ms: RollRange::fixed(5000),
    }
}

/// 10/10 health, pinned rolls, no opponent and no move debounce.
pub fn quiet_config() -> EngineConfig {
    EngineConfig {
        effects: fixed_tuning(),
        opponent: None,
        move_repeat_delay_ms: 0,
        regen_delay_ms: 500,
        ..EngineConfig::default()
    }
}

/// An opponent that casts `repertoire` every `wait` milliseconds.
pub fn fixed_opponent(wait: u32, repertoire: Vec<EffectKind>) -> OpponentConfig {
    OpponentConfig {
        wait_ms: RollRange::fixed(wait),
        repertoire,
    }
}

/// Build an engine and replace its lattice with `rows` (top row first).
pub fn engine_with_rows(config: EngineConfig, rows: &[&str]) -> Engine {
    let lattice = Lattice::from_rows(rows).unwrap();
    let config = EngineConfig {
        width: lattice.extent().width(),
        height: lattice.extent().height(),
        ..config
    };
    let mut engine = Engine::new(config).unwrap();
    engine.set_lattice(lattice);
    engine
}

// =============================================================================
// Input
// =============================================================================

/// Walk the cursor to `pos` one step at a time.
pub fn walk_to(engine: &mut Engine, pos: IVec2) {
    let delta = pos - engine.cursor();
    for _ in 0..delta.x.abs() {
        engine.pointer_move(IVec2::new(delta.x.signum(), 0));
    }
    for _ in 0..delta.y.abs() {
        engine.pointer_move(IVec2::new(0, delta.y.signum()));
    }
    assert_eq!(engine.cursor(), pos, "cursor did not reach {pos}");
}

/// Select `from`, move to the adjacent `to`, and confirm.
pub fn swap(engine: &mut Engine, from: IVec2, to: IVec2) {
    walk_to(engine, from);
    engine.confirm();
    assert_eq!(engine.held(), Some(from));
    walk_to(engine, to);
    engine.confirm();
}

// =============================================================================
// Time
// =============================================================================

/// Tick in `step` increments until `total` has passed.
///
/// Returns the first outcome seen.
pub fn run_for(engine: &mut Engine, total: Duration, step: Duration) -> Option<Outcome> {
    let mut elapsed = Duration::ZERO;
    let mut outcome = None;
    while elapsed < total {
        if let Some(o) = engine.tick(step) {
            outcome.get_or_insert(o);
        }
        elapsed += step;
    }
    outcome
}

// =============================================================================
// Events
// =============================================================================

/// Number of `EffectStarted` events in `events`.
pub fn started_count(events: &[Event]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, Event::EffectStarted { .. }))
        .count()
}

/// Kinds of every `EffectStarted` event, in order.
pub fn started_kinds(events: &[Event]) -> Vec<EffectKind> {
    events
        .iter()
        .filter_map(|e| match e {
            Event::EffectStarted { kind, .. } => Some(*kind),
            _ => None,
        })
        .collect()
}
