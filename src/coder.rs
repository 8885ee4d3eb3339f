//! Coding interval and the renormalization state machine.
//!
//! Encoder and decoder drive the same machine. After a symbol narrows the
//! interval (`Narrowed`), each iteration classifies `(low, high)`:
//!
//! ```text
//! Narrowed ──► ConvergedTop (E1/E2): MSBs agree, the bit is settled
//!     │    ──► Underflow    (E3):    low = 01…, high = 10…
//!     └──────► Stable:               neither; take the next symbol
//! ```
//!
//! `ConvergedTop` and `Underflow` both double the interval and loop back;
//! `Stable` exits. All bit positions are derived from the [`Precision`].

use tracing::trace;

use crate::config::Precision;
use crate::model::Symbol;

/// Outcome of one renormalization step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Renorm {
    /// The most-significant bits of `low` and `high` agree on `bit`.
    ConvergedTop {
        /// The settled bit.
        bit: bool,
    },
    /// The interval straddles the midpoint inside the middle half.
    Underflow,
    /// Nothing left to shift out.
    Stable,
}

/// A state transition reported to an [`Observer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CoderEvent {
    /// The interval was narrowed to `symbol`'s slice.
    Narrowed {
        /// Symbol value, end-of-message included.
        symbol: u32,
        /// New lower bound.
        low: u64,
        /// New upper bound.
        high: u64,
    },
    /// E1/E2: a settled bit was shifted out.
    ConvergedTop {
        /// The settled bit.
        bit: bool,
    },
    /// E3: the second bit was spliced out and one more bit deferred.
    Underflow,
    /// Renormalization finished for the current symbol.
    Stable {
        /// Lower bound after renormalization.
        low: u64,
        /// Upper bound after renormalization.
        high: u64,
    },
}

/// Receives every state transition of an encode or decode run.
///
/// Implemented for any `FnMut(&CoderEvent)` closure. Observers cannot alter
/// the coding; they only watch it.
pub trait Observer {
    /// Called once per transition, in order.
    fn on_event(&mut self, event: &CoderEvent);
}

impl<F: FnMut(&CoderEvent)> Observer for F {
    fn on_event(&mut self, event: &CoderEvent) {
        self(event)
    }
}

/// Observer that ignores every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct Silent;

impl Observer for Silent {
    fn on_event(&mut self, _event: &CoderEvent) {}
}

pub(crate) fn emit<O: Observer>(observer: &mut O, event: CoderEvent) {
    trace!(?event, "coder transition");
    observer.on_event(&event);
}

/// The `[low, high]` coding interval.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Interval {
    low: u64,
    high: u64,
    precision: Precision,
}

impl Interval {
    /// Full interval `[0, 2^bits - 1]`.
    pub fn new(precision: Precision) -> Self {
        Self {
            low: 0,
            high: precision.mask(),
            precision,
        }
    }

    /// Lower bound.
    pub fn low(&self) -> u64 {
        self.low
    }

    /// Upper bound, inclusive.
    pub fn high(&self) -> u64 {
        self.high
    }

    /// `high - low + 1`; may be `2^64` for the 64-bit width.
    pub fn range(&self) -> u128 {
        u128::from(self.high - self.low) + 1
    }

    /// Whether `code` lies in `[low, high]`.
    pub fn contains(&self, code: u64) -> bool {
        self.low <= code && code <= self.high
    }

    /// Zoom in on `symbol`'s slice of the interval.
    ///
    /// Floor division on both bounds; the upper bound stays inclusive.
    pub fn narrow(&mut self, symbol: &Symbol, total: u64) {
        let range = self.range();
        let total = u128::from(total);
        let base = u128::from(self.low);
        let high = base + range * u128::from(symbol.cumulative_high) / total - 1;
        let low = base + range * u128::from(symbol.cumulative_low) / total;
        self.high = high as u64;
        self.low = low as u64;
    }

    /// Classify the current interval.
    pub fn classify(&self) -> Renorm {
        let half = self.precision.half();
        let quarter = self.precision.quarter();
        if self.low & half == self.high & half {
            Renorm::ConvergedTop {
                bit: self.low & half != 0,
            }
        } else if self.low & quarter != 0 && self.high & quarter == 0 {
            Renorm::Underflow
        } else {
            Renorm::Stable
        }
    }

    /// E1/E2: drop the shared MSB; `low` takes a 0, `high` a 1.
    pub fn shift(&mut self) {
        let mask = self.precision.mask();
        self.low = (self.low << 1) & mask;
        self.high = ((self.high << 1) & mask) | 1;
    }

    /// E3: splice out the second bit, keeping the MSB; `high` takes a 1.
    pub fn splice(&mut self) {
        let quarter = self.precision.quarter();
        self.low = (self.low - quarter) << 1;
        self.high = ((self.high - quarter) << 1) | 1;
    }

    /// Apply the E1/E2 shift to a code register, feeding in `bit`.
    pub fn shift_code(&self, code: u64, bit: bool) -> u64 {
        ((code << 1) & self.precision.mask()) | u64::from(bit)
    }

    /// Apply the E3 splice to a code register lying in the interval.
    pub fn splice_code(&self, code: u64, bit: bool) -> u64 {
        ((code - self.precision.quarter()) << 1) | u64::from(bit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FrequencyModel;

    #[test]
    fn test_narrow_keeps_top_slice_inclusive() {
        let model = FrequencyModel::build(&[3, 3, 3]).unwrap();
        let mut interval = Interval::new(Precision::Bits16);
        interval.narrow(model.eom(), model.total_frequency());
        assert_eq!(interval.high(), 0xFFFF);
        assert_eq!(interval.low(), 0x10000 * 9 / 10);

        let mut interval = Interval::new(Precision::Bits16);
        interval.narrow(&model.symbols()[0], model.total_frequency());
        assert_eq!(interval.low(), 0);
        assert_eq!(interval.high(), 0x10000 * 3 / 10 - 1);
    }

    #[test]
    fn test_classify_and_shift() {
        let mut interval = Interval {
            low: 0b1010_0000_0000_0000,
            high: 0b1100_0000_0000_0000,
            precision: Precision::Bits16,
        };
        assert_eq!(interval.classify(), Renorm::ConvergedTop { bit: true });
        interval.shift();
        assert_eq!(interval.low(), 0b0100_0000_0000_0000);
        assert_eq!(interval.high(), 0b1000_0000_0000_0001);
        assert_eq!(interval.classify(), Renorm::Underflow);
        interval.splice();
        assert_eq!(interval.low(), 0b0000_0000_0000_0000);
        assert_eq!(interval.high(), 0b1000_0000_0000_0011);
        assert_eq!(interval.classify(), Renorm::Stable);
    }

    #[test]
    fn test_splice_matches_bit_surgery() {
        // Removing bit 14 while keeping bit 15, as a mask-and-shift.
        for (low, high) in [(0x4000u64, 0xBFFFu64), (0x7123, 0x8456), (0x5555, 0xAAAA)] {
            let mut interval = Interval {
                low,
                high,
                precision: Precision::Bits16,
            };
            interval.splice();
            let low_ref = ((low & 0x3FFF) << 1) | (low & 0x8000);
            let high_ref = ((((high | 0x4000) << 1) | 1) & 0xFFFF) | (high & 0x8000);
            assert_eq!(interval.low(), low_ref);
            assert_eq!(interval.high(), high_ref);

            for code in [low, high, (low + high) / 2] {
                let spliced = interval.splice_code(code, true);
                let code_ref = ((code & 0x3FFF) << 1) | 1 | (code & 0x8000);
                assert_eq!(spliced, code_ref);
            }
        }
    }

    #[test]
    fn test_full_range_64_bit() {
        let interval = Interval::new(Precision::Bits64);
        assert_eq!(interval.range(), 1u128 << 64);
        let mut interval = interval;
        interval.shift();
        assert_eq!(interval.low(), 0);
        assert_eq!(interval.high(), u64::MAX);
    }
}
