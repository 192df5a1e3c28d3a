//! Engine configuration.
//!
//! Every tunable lives in [`EngineConfig`]. Missing fields take their
//! defaults, so a config file only needs the values it overrides:
//!
//! ```
//! use maskfall_core::config::EngineConfig;
//!
//! let config = EngineConfig::from_json(r#"{ "seed": 7, "defender_health": 25 }"#).unwrap();
//! assert_eq!(config.seed, 7);
//! assert_eq!(config.defender_health, 25);
//! assert_eq!(config.attacker_health, 10);
//! ```

use std::time::Duration;

use mosaic::{Extent, Lattice, TileKind};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::effect::EffectKind;
use crate::error::ConfigError;

/// Inclusive integer roll range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RollRange {
    /// Smallest value rolled
    pub min: u32,
    /// Largest value rolled
    pub max: u32,
}

impl RollRange {
    /// Create a range.
    #[must_use]
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    /// A range that always rolls `value`.
    #[must_use]
    pub const fn fixed(value: u32) -> Self {
        Self::new(value, value)
    }

    /// Roll a value in `[min, max]`.
    pub fn roll<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        let (lo, hi) = if self.min <= self.max {
            (self.min, self.max)
        } else {
            (self.max, self.min)
        };
        rng.gen_range(lo..=hi)
    }

    /// Roll a value in milliseconds.
    pub fn roll_millis<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        Duration::from_millis(u64::from(self.roll(rng)))
    }

    fn check(&self, name: &'static str) -> Result<(), ConfigError> {
        if self.min > self.max {
            return Err(ConfigError::InvertedRange {
                name,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

/// Per-effect tuning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectTuning {
    /// Instant damage points
    pub damage: RollRange,
    /// Heal points when the healer targets someone else
    pub heal: RollRange,
    /// Heal points when the healer targets itself
    pub passive_heal: RollRange,
    /// Total burn time in milliseconds
    pub burn_duration_ms: RollRange,
    /// Gap between burn strikes in milliseconds, rolled every update
    pub burn_interval_ms: RollRange,
    /// Damage per burn strike
    pub burn_strike_damage: u32,
    /// Damage dealt when a freeze lands
    pub freeze_damage: RollRange,
    /// Freeze time in milliseconds
    pub freeze_duration_ms: RollRange,
}

impl Default for EffectTuning {
    fn default() -> Self {
        Self {
            damage: RollRange::new(1, 2),
            heal: RollRange::new(1, 3),
            passive_heal: RollRange::new(3, 7),
            burn_duration_ms: RollRange::new(3000, 5000),
            burn_interval_ms: RollRange::new(1000, 2000),
            burn_strike_damage: 1,
            freeze_damage: RollRange::new(3, 4),
            freeze_duration_ms: RollRange::new(5000, 8000),
        }
    }
}

impl EffectTuning {
    fn validate(&self) -> Result<(), ConfigError> {
        self.damage.check("damage")?;
        self.heal.check("heal")?;
        self.passive_heal.check("passive_heal")?;
        self.burn_duration_ms.check("burn_duration_ms")?;
        self.burn_interval_ms.check("burn_interval_ms")?;
        self.freeze_damage.check("freeze_damage")?;
        self.freeze_duration_ms.check("freeze_duration_ms")
    }
}

/// Defender's autonomous caster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpponentConfig {
    /// Wait between casts in milliseconds
    pub wait_ms: RollRange,
    /// Kinds the opponent picks from
    pub repertoire: Vec<EffectKind>,
}

impl Default for OpponentConfig {
    fn default() -> Self {
        Self {
            wait_ms: RollRange::new(3000, 7500),
            repertoire: vec![
                EffectKind::DamageOverTime,
                EffectKind::Freeze,
                EffectKind::InstantDamage,
            ],
        }
    }
}

impl OpponentConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.wait_ms.check("opponent.wait_ms")?;
        if self.repertoire.is_empty() {
            return Err(ConfigError::EmptyRepertoire);
        }
        Ok(())
    }
}

/// Complete engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Lattice width in cells
    pub width: u16,
    /// Lattice height in cells
    pub height: u16,
    /// Kinds used for generation (at least three distinct)
    pub palette: Vec<TileKind>,
    /// Attacker starting health
    pub attacker_health: u32,
    /// Defender starting health
    pub defender_health: u32,
    /// Master seed for every random stream
    pub seed: u64,
    /// Time the lattice stays locked after a clear
    pub regen_delay_ms: u64,
    /// Minimum gap between accepted cursor moves; 0 disables
    pub move_repeat_delay_ms: u64,
    /// Effect tuning
    pub effects: EffectTuning,
    /// Opponent settings, or `None` for a passive defender
    pub opponent: Option<OpponentConfig>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            width: 8,
            height: 8,
            palette: TileKind::all().to_vec(),
            attacker_health: 10,
            defender_health: 10,
            seed: 0,
            regen_delay_ms: 1000,
            move_repeat_delay_ms: 200,
            effects: EffectTuning::default(),
            opponent: Some(OpponentConfig::default()),
        }
    }
}

impl EngineConfig {
    /// Parse a config from JSON. The result is validated.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] for malformed input and any
    /// [`EngineConfig::validate`] error.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] if serialization fails.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check every setting.
    ///
    /// # Errors
    ///
    /// Returns the first invalid setting found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let extent = self.extent()?;
        Lattice::empty(extent, &self.palette)?;
        if self.attacker_health == 0 {
            return Err(ConfigError::ZeroHealth("attacker"));
        }
        if self.defender_health == 0 {
            return Err(ConfigError::ZeroHealth("defender"));
        }
        self.effects.validate()?;
        if let Some(opponent) = &self.opponent {
            opponent.validate()?;
        }
        Ok(())
    }

    /// Lattice dimensions.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Lattice`] if either dimension is zero.
    pub fn extent(&self) -> Result<Extent, ConfigError> {
        Ok(Extent::new(self.width, self.height)?)
    }

    /// Lock time after a clear.
    #[must_use]
    pub fn regen_delay(&self) -> Duration {
        Duration::from_millis(self.regen_delay_ms)
    }

    /// Cursor debounce.
    #[must_use]
    pub fn move_repeat_delay(&self) -> Duration {
        Duration::from_millis(self.move_repeat_delay_ms)
    }
}
