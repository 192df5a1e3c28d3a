//! Error types.
//!
//! A running engine never fails; these only surface from configuration and
//! from parsing symbolic effect names.

use mosaic::LatticeError;
use thiserror::Error;

/// Invalid engine configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The JSON document could not be parsed.
    #[error("malformed config: {0}")]
    Json(#[from] serde_json::Error),

    /// The lattice could not be built from the configured size and palette.
    #[error(transparent)]
    Lattice(#[from] LatticeError),

    /// A roll range has `min > max`.
    #[error("roll range `{name}` is inverted ({min} > {max})")]
    InvertedRange {
        /// Which setting
        name: &'static str,
        /// Configured minimum
        min: u32,
        /// Configured maximum
        max: u32,
    },

    /// A side starts with no health.
    #[error("initial health for {0} must be non-zero")]
    ZeroHealth(&'static str),

    /// The opponent has nothing to cast.
    #[error("opponent repertoire is empty")]
    EmptyRepertoire,
}

/// A symbolic effect name that matches no effect kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown effect kind `{0}`")]
pub struct UnknownEffectKind(pub String);
