//! # Maskfall Python Bindings
//!
//! PyO3 bindings exposing the Maskfall engine to a Python host.
//!
//! ## Usage
//!
//! ```python
//! import maskfall
//! from maskfall import EffectKind, Side
//!
//! maskfall.enable_logging("debug")
//!
//! engine = maskfall.PyEngine(seed=42)
//!
//! # Per-frame loop
//! engine.pointer_move(1, 0)
//! engine.confirm()
//! outcome = engine.tick(16.0)
//!
//! # Cues for audio and visuals
//! for event in engine.drain_events():
//!     print(event.name, event.json)
//!
//! # Lattice as an int8 array indexed [y, x]; -1 marks an empty cell
//! grid = engine.lattice()
//!
//! # Attack triggers take the enum or a symbolic name
//! engine.request_effect(EffectKind.FREEZE, Side.DEFENDER)
//! engine.request_effect("red_mask", Side.DEFENDER)
//! ```

use std::str::FromStr;

use glam::IVec2;
use maskfall_core::{delta_from_millis, Effect, Engine, EngineConfig, Event};
use numpy::{PyArray2, PyArrayMethods, ToPyArray};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

/// Combatant side for Python.
#[pyclass(eq, eq_int, hash, frozen)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[allow(non_camel_case_types)] // Python convention uses SCREAMING_SNAKE_CASE for enums
pub enum Side {
    /// The player
    ATTACKER,
    /// The enemy
    DEFENDER,
}

impl From<Side> for maskfall_core::Side {
    fn from(s: Side) -> Self {
        match s {
            Side::ATTACKER => maskfall_core::Side::Attacker,
            Side::DEFENDER => maskfall_core::Side::Defender,
        }
    }
}

impl From<maskfall_core::Side> for Side {
    fn from(s: maskfall_core::Side) -> Self {
        match s {
            maskfall_core::Side::Attacker => Side::ATTACKER,
            maskfall_core::Side::Defender => Side::DEFENDER,
        }
    }
}

/// Effect kind for Python.
#[pyclass(eq, eq_int, hash, frozen)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[allow(non_camel_case_types)]
pub enum EffectKind {
    /// One-off damage
    INSTANT_DAMAGE,
    /// One-off heal
    INSTANT_HEAL,
    /// Periodic damage
    DAMAGE_OVER_TIME,
    /// Damage plus action lock
    FREEZE,
}

impl From<EffectKind> for maskfall_core::EffectKind {
    fn from(k: EffectKind) -> Self {
        match k {
            EffectKind::INSTANT_DAMAGE => maskfall_core::EffectKind::InstantDamage,
            EffectKind::INSTANT_HEAL => maskfall_core::EffectKind::InstantHeal,
            EffectKind::DAMAGE_OVER_TIME => maskfall_core::EffectKind::DamageOverTime,
            EffectKind::FREEZE => maskfall_core::EffectKind::Freeze,
        }
    }
}

impl From<maskfall_core::EffectKind> for EffectKind {
    fn from(k: maskfall_core::EffectKind) -> Self {
        match k {
            maskfall_core::EffectKind::InstantDamage => EffectKind::INSTANT_DAMAGE,
            maskfall_core::EffectKind::InstantHeal => EffectKind::INSTANT_HEAL,
            maskfall_core::EffectKind::DamageOverTime => EffectKind::DAMAGE_OVER_TIME,
            maskfall_core::EffectKind::Freeze => EffectKind::FREEZE,
        }
    }
}

/// Accept either the enum or a symbolic name.
#[derive(FromPyObject)]
enum EffectKindOrStr {
    Kind(EffectKind),
    Str(String),
}

/// Match outcome for Python.
#[pyclass(eq, eq_int, hash, frozen)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[allow(non_camel_case_types)]
pub enum Outcome {
    /// Defender reached zero health
    ATTACKER_WINS,
    /// Attacker reached zero health
    ATTACKER_DEFEATED,
}

impl From<maskfall_core::Outcome> for Outcome {
    fn from(o: maskfall_core::Outcome) -> Self {
        match o {
            maskfall_core::Outcome::AttackerWins => Outcome::ATTACKER_WINS,
            maskfall_core::Outcome::AttackerDefeated => Outcome::ATTACKER_DEFEATED,
        }
    }
}

/// A live effect snapshot.
#[pyclass(frozen)]
#[derive(Clone)]
pub struct PyEffect {
    /// Effect id.
    #[pyo3(get)]
    pub id: u64,
    /// Effect kind.
    #[pyo3(get)]
    pub kind: EffectKind,
    /// Receiving side.
    #[pyo3(get)]
    pub target: Side,
    /// Casting side.
    #[pyo3(get)]
    pub origin: Side,
    /// Creation time in milliseconds.
    #[pyo3(get)]
    pub started_at_ms: f64,
}

impl From<&Effect> for PyEffect {
    fn from(e: &Effect) -> Self {
        Self {
            id: e.id.0,
            kind: e.kind.into(),
            target: e.target.into(),
            origin: e.origin.into(),
            started_at_ms: e.started_at.as_secs_f64() * 1000.0,
        }
    }
}

#[pymethods]
impl PyEffect {
    fn __repr__(&self) -> String {
        format!(
            "Effect(id={}, kind={:?}, target={:?}, origin={:?})",
            self.id, self.kind, self.target, self.origin
        )
    }
}

/// A presentation cue.
///
/// `name` is the snake_case event type; `json` is the full event payload.
#[pyclass(frozen)]
#[derive(Clone)]
pub struct PyEvent {
    /// Event type, e.g. `"tiles_cleared"`.
    #[pyo3(get)]
    pub name: String,
    /// JSON payload including the type tag.
    #[pyo3(get)]
    pub json: String,
}

impl PyEvent {
    fn from_event(event: &Event) -> PyResult<Self> {
        let value =
            serde_json::to_value(event).map_err(|e| PyValueError::new_err(e.to_string()))?;
        let name = value
            .get("type")
            .and_then(serde_json::Value::as_str)
            .unwrap_or_default()
            .to_owned();
        Ok(Self {
            name,
            json: value.to_string(),
        })
    }
}

#[pymethods]
impl PyEvent {
    fn __repr__(&self) -> String {
        format!("Event({})", self.json)
    }
}

/// Engine wrapper for Python.
#[pyclass]
pub struct PyEngine {
    inner: Engine,
}

#[pymethods]
impl PyEngine {
    /// Create an engine from an optional JSON config.
    ///
    /// `seed` overrides the config's seed when given.
    #[new]
    #[pyo3(signature = (config_json=None, seed=None))]
    fn new(config_json: Option<&str>, seed: Option<u64>) -> PyResult<Self> {
        let mut config = match config_json {
            Some(json) => EngineConfig::from_json(json).map_err(to_py_err)?,
            None => EngineConfig::default(),
        };
        if let Some(seed) = seed {
            config.seed = seed;
        }
        let inner = Engine::new(config).map_err(to_py_err)?;
        Ok(Self { inner })
    }

    /// Default configuration as JSON.
    #[staticmethod]
    fn default_config_json() -> PyResult<String> {
        EngineConfig::default().to_json().map_err(to_py_err)
    }

    /// Advance by `dt_ms` milliseconds.
    ///
    /// Returns the outcome on the tick that reaches it. Releases the GIL
    /// while the engine runs. Negative, NaN or overflowing deltas raise
    /// `ValueError`.
    fn tick(&mut self, py: Python, dt_ms: f64) -> PyResult<Option<Outcome>> {
        let dt = delta_from_millis(dt_ms).map_err(to_py_err)?;
        Ok(py.allow_threads(|| self.inner.tick(dt)).map(Outcome::from))
    }

    /// Move the cursor.
    fn pointer_move(&mut self, dx: i32, dy: i32) {
        self.inner.pointer_move(IVec2::new(dx, dy));
    }

    /// Select, deselect or swap at the cursor.
    fn confirm(&mut self) {
        self.inner.confirm();
    }

    /// Start an effect on `target`. Returns whether it was accepted.
    fn request_effect(&mut self, kind: EffectKindOrStr, target: Side) -> bool {
        let outcome = match kind {
            EffectKindOrStr::Kind(kind) => self.inner.request_effect(kind.into(), target.into()),
            EffectKindOrStr::Str(name) => self.inner.request_named(&name, target.into()),
        };
        outcome.is_accepted()
    }

    /// Health of a side.
    fn health(&self, side: Side) -> u32 {
        self.inner.health(side.into())
    }

    /// Whether a side may act.
    fn can_act(&self, side: Side) -> bool {
        self.inner.can_act(side.into())
    }

    /// Whether an effect's visual should show on a side.
    fn is_effect_visual_active(&self, kind: EffectKindOrStr, side: Side) -> PyResult<bool> {
        let kind = match kind {
            EffectKindOrStr::Kind(kind) => kind.into(),
            EffectKindOrStr::Str(name) => {
                maskfall_core::EffectKind::from_str(&name).map_err(to_py_err)?
            }
        };
        Ok(self.inner.is_effect_visual_active(kind, side.into()))
    }

    /// Lattice as an `int8` array indexed `[y, x]`.
    ///
    /// Values are tile kind indices (fire 0, water 1, earth 2, lightning 3)
    /// and -1 for empty cells.
    fn lattice<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyArray2<i8>>> {
        let lattice = self.inner.lattice();
        let extent = lattice.extent();
        let flat: Vec<i8> = lattice
            .cells()
            .iter()
            .map(|cell| cell.map_or(-1, |kind| kind as i8))
            .collect();
        flat.to_pyarray(py)
            .reshape([usize::from(extent.height()), usize::from(extent.width())])
    }

    /// Sprite name for a lattice value.
    #[staticmethod]
    fn sprite_name(value: i8) -> Option<&'static str> {
        let index = usize::try_from(value).ok()?;
        mosaic::TileKind::all()
            .get(index)
            .map(|kind| kind.sprite_name())
    }

    /// Cursor as `(x, y)`.
    #[getter]
    fn cursor(&self) -> (i32, i32) {
        let c = self.inner.cursor();
        (c.x, c.y)
    }

    /// Held coordinate as `(x, y)`, or `None`.
    #[getter]
    fn held(&self) -> Option<(i32, i32)> {
        self.inner.held().map(|h| (h.x, h.y))
    }

    /// Whether grid input is closed.
    #[getter]
    fn is_locked(&self) -> bool {
        self.inner.is_locked()
    }

    /// Terminal outcome, once reached.
    #[getter]
    fn outcome(&self) -> Option<Outcome> {
        self.inner.outcome().map(Outcome::from)
    }

    /// Clock time in milliseconds.
    #[getter]
    fn now_ms(&self) -> f64 {
        self.inner.now().as_secs_f64() * 1000.0
    }

    /// Live effects.
    fn active_effects(&self) -> Vec<PyEffect> {
        self.inner.active_effects().iter().map(PyEffect::from).collect()
    }

    /// Deterministic hash of the full state.
    fn state_hash(&self) -> u64 {
        self.inner.state_hash()
    }

    /// Take every event recorded since the last drain.
    fn drain_events(&mut self) -> PyResult<Vec<PyEvent>> {
        self.inner
            .drain_events()
            .iter()
            .map(PyEvent::from_event)
            .collect()
    }

    fn __repr__(&self) -> String {
        format!(
            "Engine(attacker={}, defender={}, now_ms={:.0})",
            self.inner.health(maskfall_core::Side::Attacker),
            self.inner.health(maskfall_core::Side::Defender),
            self.now_ms()
        )
    }
}

/// Install a `tracing` subscriber that prints engine logs to stderr.
///
/// `level` is one of `trace`, `debug`, `info`, `warn`, `error`. Calling this
/// more than once keeps the first subscriber.
#[pyfunction]
#[pyo3(signature = (level="info"))]
fn enable_logging(level: &str) -> PyResult<()> {
    let level = tracing::Level::from_str(level).map_err(to_py_err)?;
    // Err means a subscriber is already installed.
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .try_init();
    Ok(())
}

fn to_py_err(err: impl std::fmt::Display) -> PyErr {
    PyValueError::new_err(err.to_string())
}

/// Python module definition.
#[pymodule]
fn _maskfall(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyEngine>()?;
    m.add_class::<PyEffect>()?;
    m.add_class::<PyEvent>()?;
    m.add_class::<Side>()?;
    m.add_class::<EffectKind>()?;
    m.add_class::<Outcome>()?;
    m.add_function(wrap_pyfunction!(enable_logging, m)?)?;
    Ok(())
}
