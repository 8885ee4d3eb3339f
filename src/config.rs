//! Coder configuration.

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::model::FrequencyModel;

/// Width of the `low`/`high`/`code` registers.
///
/// The E1/E2/E3 renormalization tests are expressed relative to this width,
/// so every variant runs the same state machine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Precision {
    /// 16-bit interval.
    #[default]
    Bits16,
    /// 32-bit interval.
    Bits32,
    /// 64-bit interval.
    Bits64,
}

impl Precision {
    /// Register width in bits.
    #[must_use]
    pub const fn bits(self) -> u32 {
        match self {
            Self::Bits16 => 16,
            Self::Bits32 => 32,
            Self::Bits64 => 64,
        }
    }

    /// All-ones register value, the initial `high`.
    #[must_use]
    pub const fn mask(self) -> u64 {
        u64::MAX >> (64 - self.bits())
    }

    /// Most-significant bit of a register.
    #[must_use]
    pub const fn half(self) -> u64 {
        1 << (self.bits() - 1)
    }

    /// Second-most-significant bit of a register.
    #[must_use]
    pub const fn quarter(self) -> u64 {
        1 << (self.bits() - 2)
    }

    /// Exclusive upper bound on a model's total frequency.
    ///
    /// After renormalization the interval spans more than a quarter of the
    /// register, so totals below `2^(bits - 2)` give every symbol with a
    /// non-zero count a non-empty sub-interval.
    #[must_use]
    pub const fn frequency_limit(self) -> u64 {
        self.quarter()
    }
}

/// Configuration shared by model construction and decoding.
///
/// ```
/// use arith::{CoderConfig, Precision};
///
/// let config = CoderConfig {
///     precision: Precision::Bits32,
///     ..CoderConfig::default()
/// };
/// let model = config.build_model(&[3, 3, 3]).unwrap();
/// assert_eq!(model.precision(), Precision::Bits32);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoderConfig {
    /// Interval width.
    ///
    /// Default: 16 bits
    #[serde(default)]
    pub precision: Precision,

    /// Upper bound on symbols produced by one decode call.
    ///
    /// A corrupted stream can keep decoding ordinary symbols for a long time
    /// before (if ever) reaching end-of-message. `None` disables the bound.
    ///
    /// Default: `None`
    #[serde(default)]
    pub max_decoded_symbols: Option<usize>,
}

impl CoderConfig {
    /// Build a model with this configuration's precision.
    ///
    /// # Errors
    ///
    /// See [`FrequencyModel::with_precision`].
    pub fn build_model(&self, counts: &[u32]) -> Result<FrequencyModel, ModelError> {
        FrequencyModel::with_precision(counts, self.precision)
    }
}
