//! Static cumulative-frequency model.
//!
//! The model is built once from a symbol histogram and shared, read-only, by
//! the encoder and the decoder. It is never transmitted in the bitstream: both
//! sides must hold bit-for-bit the same table.

use crate::config::Precision;
use crate::error::ModelError;

/// One entry of the cumulative-frequency table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Symbol {
    /// Symbol value; the end-of-message symbol takes the last value.
    pub value: u32,
    /// Occurrence count.
    pub frequency: u32,
    /// Running sum of the frequencies of all preceding symbols.
    pub cumulative_low: u64,
    /// `cumulative_low + frequency`.
    pub cumulative_high: u64,
}

impl Symbol {
    /// Whether `scaled` falls in `[cumulative_low, cumulative_high)`.
    #[must_use]
    pub fn contains(&self, scaled: u64) -> bool {
        self.cumulative_low <= scaled && scaled < self.cumulative_high
    }
}

/// Cumulative-frequency table with an explicit end-of-message symbol.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrequencyModel {
    symbols: Vec<Symbol>,
    total_frequency: u64,
    precision: Precision,
}

impl FrequencyModel {
    /// Build a 16-bit model from a histogram indexed by symbol value.
    ///
    /// `counts[v]` is the number of occurrences of symbol `v`. An
    /// end-of-message symbol with value `counts.len()` and frequency 1 is
    /// appended.
    ///
    /// # Errors
    /// See [`FrequencyModel::with_precision`].
    pub fn build(counts: &[u32]) -> Result<Self, ModelError> {
        Self::with_precision(counts, Precision::default())
    }

    /// Build a model for the given interval width.
    ///
    /// # Errors
    /// - `ModelError::EmptyAlphabet` if `counts` is empty or all zero.
    /// - `ModelError::AlphabetTooLarge` if the end-of-message value would not
    ///   fit in a `u32`.
    /// - `ModelError::OverflowRisk` if the total frequency reaches
    ///   `2^(bits - 2)`.
    pub fn with_precision(counts: &[u32], precision: Precision) -> Result<Self, ModelError> {
        if counts.iter().all(|&c| c == 0) {
            return Err(ModelError::EmptyAlphabet);
        }
        let too_large = ModelError::AlphabetTooLarge { len: counts.len() };
        let eom_value = u32::try_from(counts.len()).map_err(|_| too_large.clone())?;
        if eom_value == u32::MAX {
            return Err(too_large);
        }

        let limit = precision.frequency_limit();
        let mut symbols = Vec::with_capacity(counts.len() + 1);
        let mut running = 0u64;
        for (value, &frequency) in (0u32..).zip(counts.iter().chain(std::iter::once(&1))) {
            let cumulative_low = running;
            running = running.saturating_add(u64::from(frequency));
            symbols.push(Symbol {
                value,
                frequency,
                cumulative_low,
                cumulative_high: running,
            });
        }

        if running >= limit {
            return Err(ModelError::OverflowRisk {
                total: running,
                limit,
                bits: precision.bits(),
            });
        }

        Ok(Self {
            symbols,
            total_frequency: running,
            precision,
        })
    }

    /// Count the histogram of `message` over `alphabet_len` symbols and build.
    ///
    /// Values `>= alphabet_len` are ignored; the encoder rejects them later.
    ///
    /// # Errors
    /// See [`FrequencyModel::with_precision`].
    pub fn from_message(
        message: &[u32],
        alphabet_len: usize,
        precision: Precision,
    ) -> Result<Self, ModelError> {
        let mut counts = vec![0u32; alphabet_len];
        for &s in message {
            if let Some(c) = counts.get_mut(s as usize) {
                *c = c.saturating_add(1);
            }
        }
        Self::with_precision(&counts, precision)
    }

    /// All records, end-of-message last.
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// Record for `value`, end-of-message included.
    pub fn symbol(&self, value: u32) -> Option<&Symbol> {
        self.symbols.get(value as usize)
    }

    /// The end-of-message record.
    pub fn eom(&self) -> &Symbol {
        // Construction always pushes the end-of-message record.
        &self.symbols[self.symbols.len() - 1]
    }

    /// Value of the end-of-message symbol, equal to the alphabet length.
    pub fn eom_value(&self) -> u32 {
        self.eom().value
    }

    /// Number of symbols excluding end-of-message.
    pub fn alphabet_len(&self) -> u32 {
        self.eom_value()
    }

    /// Sum of all frequencies, end-of-message included.
    pub fn total_frequency(&self) -> u64 {
        self.total_frequency
    }

    /// Interval width this model was validated against.
    pub fn precision(&self) -> Precision {
        self.precision
    }

    /// Record whose cumulative range contains `scaled`.
    ///
    /// Binary search over the monotone upper bounds; zero-frequency records
    /// have empty ranges and are never returned.
    pub fn find(&self, scaled: u64) -> Option<&Symbol> {
        let idx = self.symbols.partition_point(|s| s.cumulative_high <= scaled);
        self.symbols.get(idx)
    }
}
