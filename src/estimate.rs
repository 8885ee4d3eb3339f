//! Expected encoded size under a static model.
//!
//! A message whose empirical frequencies equal the model costs
//! `sum_s f_s * -log2(p_s)` bits. The encoder spends at most a couple of bits
//! more (terminator, finite-precision rounding), so this is used to reserve
//! its output buffer before coding starts.

use crate::model::FrequencyModel;

/// Word width of the packed bitstream.
pub const WORD_BITS: usize = 32;

/// Expected number of bits to encode a message matching `model`, EOM included.
///
/// Each symbol's probability is taken as the width of its slice of the
/// normalized `[0, 1)` cumulative space rather than `freq / total` directly.
pub fn estimate_bits(model: &FrequencyModel) -> u64 {
    let total = model.total_frequency() as f64;
    let mut upper = 0.0f64;
    let mut size = 0.0f64;
    for s in model.symbols() {
        let p = f64::from(s.frequency) / total;
        upper += p;
        if p != 0.0 {
            let lower = upper - p;
            size += f64::from(s.frequency) * -(upper - lower).log2();
        }
    }
    size.ceil() as u64
}

/// Number of 32-bit words to reserve for an encoded message matching `model`.
pub fn estimate_words(model: &FrequencyModel) -> usize {
    (estimate_bits(model) as usize).div_ceil(WORD_BITS) + 1
}
