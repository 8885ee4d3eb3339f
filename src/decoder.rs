//! Arithmetic decoder.
//!
//! Mirrors the encoder: the same narrowing and renormalization run on
//! `(low, high)`, and each bit the encoder shifted out is shifted into the
//! `code` register from the stream.

use tracing::debug;

use crate::bits::BitReader;
use crate::coder::{emit, CoderEvent, Interval, Observer, Renorm, Silent};
use crate::config::CoderConfig;
use crate::error::DecodeError;
use crate::model::FrequencyModel;

/// Incremental arithmetic decoder.
///
/// The model must be the one used for encoding; it is not recoverable from
/// the stream. Bits past `bit_count` read as 1, matching the encoder's word
/// padding, for at most one register width.
pub struct Decoder<'a, 'm, O: Observer = Silent> {
    model: &'m FrequencyModel,
    reader: BitReader<'a>,
    interval: Interval,
    code: u64,
    decoded: usize,
    done: bool,
    observer: O,
}

impl<'a, 'm> Decoder<'a, 'm> {
    /// Create a decoder over the first `bit_count` bits of `bits`.
    ///
    /// # Errors
    /// See [`Decoder::with_observer`].
    pub fn new(
        bits: &'a [u32],
        bit_count: usize,
        model: &'m FrequencyModel,
    ) -> Result<Self, DecodeError> {
        Self::with_observer(bits, bit_count, model, Silent)
    }
}

impl<'a, 'm, O: Observer> Decoder<'a, 'm, O> {
    /// Create a decoder that reports every state transition to `observer`.
    ///
    /// # Errors
    /// - `DecodeError::BitCountOutOfRange` if `bit_count > 32 * bits.len()`.
    /// - `DecodeError::TruncatedStream` if the initial register load runs
    ///   past the padding allowance.
    pub fn with_observer(
        bits: &'a [u32],
        bit_count: usize,
        model: &'m FrequencyModel,
        observer: O,
    ) -> Result<Self, DecodeError> {
        let precision = model.precision();
        let width = precision.bits();
        let mut reader = BitReader::new(bits, bit_count, width as usize)?;
        let mut code = 0u64;
        for _ in 0..width {
            code = (code << 1) | u64::from(reader.read_bit()?);
        }
        Ok(Self {
            model,
            reader,
            interval: Interval::new(precision),
            code,
            decoded: 0,
            done: false,
            observer,
        })
    }

    /// Decode the next symbol; `None` once end-of-message has been read.
    ///
    /// # Errors
    /// - `DecodeError::TruncatedStream` if the stream ends before
    ///   end-of-message.
    /// - `DecodeError::ModelMismatch` if the code value leaves the interval.
    pub fn decode_symbol(&mut self) -> Result<Option<u32>, DecodeError> {
        if self.done {
            return Ok(None);
        }
        if !self.interval.contains(self.code) {
            return Err(DecodeError::ModelMismatch);
        }

        let total = self.model.total_frequency();
        let offset = u128::from(self.code - self.interval.low()) + 1;
        let scaled = ((offset * u128::from(total) - 1) / self.interval.range()) as u64;
        let symbol = *self.model.find(scaled).ok_or(DecodeError::ModelMismatch)?;

        if symbol.value == self.model.eom_value() {
            self.done = true;
            debug!(
                symbols = self.decoded,
                bits_read = self.reader.position(),
                "decoded message"
            );
            return Ok(None);
        }

        self.interval.narrow(&symbol, total);
        emit(
            &mut self.observer,
            CoderEvent::Narrowed {
                symbol: symbol.value,
                low: self.interval.low(),
                high: self.interval.high(),
            },
        );
        if !self.interval.contains(self.code) {
            return Err(DecodeError::ModelMismatch);
        }

        loop {
            match self.interval.classify() {
                Renorm::ConvergedTop { bit } => {
                    let next = self.reader.read_bit()?;
                    self.code = self.interval.shift_code(self.code, next);
                    self.interval.shift();
                    emit(&mut self.observer, CoderEvent::ConvergedTop { bit });
                }
                Renorm::Underflow => {
                    let next = self.reader.read_bit()?;
                    self.code = self.interval.splice_code(self.code, next);
                    self.interval.splice();
                    emit(&mut self.observer, CoderEvent::Underflow);
                }
                Renorm::Stable => {
                    emit(
                        &mut self.observer,
                        CoderEvent::Stable {
                            low: self.interval.low(),
                            high: self.interval.high(),
                        },
                    );
                    break;
                }
            }
        }

        self.decoded += 1;
        Ok(Some(symbol.value))
    }

    /// Symbols decoded so far.
    pub fn decoded(&self) -> usize {
        self.decoded
    }

    /// Whether end-of-message has been read.
    pub fn is_finished(&self) -> bool {
        self.done
    }
}

impl<O: Observer> Iterator for Decoder<'_, '_, O> {
    type Item = Result<u32, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.decode_symbol() {
            Ok(Some(value)) => Some(Ok(value)),
            Ok(None) => None,
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// Decode a stream produced by [`encode`](crate::encode) with the same model.
///
/// # Errors
/// See [`Decoder::decode_symbol`]. Nothing is returned on failure.
pub fn decode(
    bits: &[u32],
    bit_count: usize,
    model: &FrequencyModel,
) -> Result<Vec<u32>, DecodeError> {
    decode_with_config(bits, bit_count, model, &CoderConfig::default())
}

/// [`decode`] honoring `config.max_decoded_symbols`.
///
/// The interval width always comes from `model`; `config.precision` only
/// matters when building the model.
///
/// # Errors
/// Additionally returns `DecodeError::SymbolLimitExceeded` if more than
/// `max_decoded_symbols` symbols precede end-of-message.
pub fn decode_with_config(
    bits: &[u32],
    bit_count: usize,
    model: &FrequencyModel,
    config: &CoderConfig,
) -> Result<Vec<u32>, DecodeError> {
    collect(Decoder::new(bits, bit_count, model)?, config.max_decoded_symbols)
}

/// [`decode`] with an observer receiving every state transition.
///
/// # Errors
/// See [`Decoder::decode_symbol`].
pub fn decode_with_observer<O: Observer>(
    bits: &[u32],
    bit_count: usize,
    model: &FrequencyModel,
    observer: O,
) -> Result<Vec<u32>, DecodeError> {
    collect(Decoder::with_observer(bits, bit_count, model, observer)?, None)
}

fn collect<O: Observer>(
    mut decoder: Decoder<'_, '_, O>,
    limit: Option<usize>,
) -> Result<Vec<u32>, DecodeError> {
    let mut out = Vec::new();
    while let Some(value) = decoder.decode_symbol()? {
        if let Some(limit) = limit {
            if out.len() >= limit {
                return Err(DecodeError::SymbolLimitExceeded { limit });
            }
        }
        out.push(value);
    }
    Ok(out)
}
