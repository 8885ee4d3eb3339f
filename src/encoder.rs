//! Arithmetic encoder.

use tracing::debug;

use crate::bits::{BitWriter, Bitstream};
use crate::coder::{emit, CoderEvent, Interval, Observer, Renorm, Silent};
use crate::error::EncodeError;
use crate::estimate::estimate_words;
use crate::model::{FrequencyModel, Symbol};

/// Incremental arithmetic encoder.
///
/// Symbols are fed one at a time with [`Encoder::encode`]; [`Encoder::finish`]
/// codes the end-of-message symbol, writes the terminator and returns the
/// packed stream.
pub struct Encoder<'m, O: Observer = Silent> {
    model: &'m FrequencyModel,
    interval: Interval,
    underflow: u64,
    writer: BitWriter,
    symbols: usize,
    observer: O,
}

impl<'m> Encoder<'m> {
    /// Create an encoder for `model`.
    pub fn new(model: &'m FrequencyModel) -> Self {
        Self::with_observer(model, Silent)
    }
}

impl<'m, O: Observer> Encoder<'m, O> {
    /// Create an encoder that reports every state transition to `observer`.
    pub fn with_observer(model: &'m FrequencyModel, observer: O) -> Self {
        Self {
            model,
            interval: Interval::new(model.precision()),
            underflow: 0,
            writer: BitWriter::with_capacity(estimate_words(model)),
            symbols: 0,
            observer,
        }
    }

    /// Encode one symbol.
    ///
    /// # Errors
    /// - `EncodeError::SymbolOutOfAlphabet` if `symbol` is not below the
    ///   model's alphabet length. The end-of-message value is rejected too;
    ///   it is coded by [`Encoder::finish`].
    /// - `EncodeError::ZeroFrequency` if the symbol's count is zero.
    pub fn encode(&mut self, symbol: u32) -> Result<(), EncodeError> {
        let alphabet_len = self.model.alphabet_len();
        let record = match self.model.symbol(symbol) {
            Some(record) if symbol < alphabet_len => *record,
            _ => {
                return Err(EncodeError::SymbolOutOfAlphabet {
                    symbol,
                    alphabet_len,
                })
            }
        };
        if record.frequency == 0 {
            return Err(EncodeError::ZeroFrequency { symbol });
        }
        self.code(&record);
        self.symbols += 1;
        Ok(())
    }

    /// Bits emitted so far. Deferred underflow bits are not counted.
    pub fn bit_count(&self) -> usize {
        self.writer.bit_count()
    }

    /// Code end-of-message, terminate and pack the stream.
    ///
    /// The terminator is `0`, the pending underflow complements, then `1`.
    /// With no pending bits that is the plain `01` suffix; with pending bits
    /// it spells out exactly the 1-bits the decoder would otherwise pad in.
    pub fn finish(mut self) -> Bitstream {
        let eom = *self.model.eom();
        self.code(&eom);
        self.writer.write_bit(false);
        self.writer.write_repeated(true, self.underflow);
        self.writer.write_bit(true);
        let stream = self.writer.finish();
        debug!(
            symbols = self.symbols,
            bits = stream.bit_count(),
            words = stream.words().len(),
            "encoded message"
        );
        stream
    }

    fn code(&mut self, symbol: &Symbol) {
        self.interval.narrow(symbol, self.model.total_frequency());
        emit(
            &mut self.observer,
            CoderEvent::Narrowed {
                symbol: symbol.value,
                low: self.interval.low(),
                high: self.interval.high(),
            },
        );

        loop {
            match self.interval.classify() {
                Renorm::ConvergedTop { bit } => {
                    self.writer.write_bit(bit);
                    self.writer.write_repeated(!bit, self.underflow);
                    self.underflow = 0;
                    self.interval.shift();
                    emit(&mut self.observer, CoderEvent::ConvergedTop { bit });
                }
                Renorm::Underflow => {
                    self.underflow += 1;
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
    }
}

/// Encode `symbols` followed by the implicit end-of-message symbol.
///
/// # Errors
/// See [`Encoder::encode`]. Nothing is returned on failure.
///
/// ```
/// use arith::{decode, encode, FrequencyModel};
///
/// let model = FrequencyModel::build(&[3, 3, 3]).unwrap();
/// let stream = encode(&[0, 1, 2], &model).unwrap();
/// assert_eq!(decode(stream.words(), stream.bit_count(), &model).unwrap(), vec![0, 1, 2]);
/// ```
pub fn encode(symbols: &[u32], model: &FrequencyModel) -> Result<Bitstream, EncodeError> {
    encode_with_observer(symbols, model, Silent)
}

/// [`encode`] with an observer receiving every state transition.
///
/// # Errors
/// See [`Encoder::encode`].
pub fn encode_with_observer<O: Observer>(
    symbols: &[u32],
    model: &FrequencyModel,
    observer: O,
) -> Result<Bitstream, EncodeError> {
    let mut encoder = Encoder::with_observer(model, observer);
    for &symbol in symbols {
        encoder.encode(symbol)?;
    }
    Ok(encoder.finish())
}
