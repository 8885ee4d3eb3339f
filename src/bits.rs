//! Word-packed bit I/O.
//!
//! Bits are packed MSB-first into `u32` words. The writer pads an incomplete
//! trailing word with 1-bits; the reader hands out 1-bits past the end of the
//! stream, up to a fixed allowance, so both sides agree on the padding.

use crate::error::DecodeError;
use crate::estimate::WORD_BITS;

/// A packed bitstream produced by the encoder.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Bitstream {
    words: Vec<u32>,
    bit_count: usize,
}

impl Bitstream {
    /// Packed words; `len() == ceil(bit_count / 32)`.
    pub fn words(&self) -> &[u32] {
        &self.words
    }

    /// Number of meaningful bits.
    pub fn bit_count(&self) -> usize {
        self.bit_count
    }

    /// Split into `(words, bit_count)`.
    pub fn into_parts(self) -> (Vec<u32>, usize) {
        (self.words, self.bit_count)
    }
}

/// Append-only bit writer.
#[derive(Debug, Default)]
pub struct BitWriter {
    words: Vec<u32>,
    current: u32,
    filled: u32,
    bit_count: usize,
}

impl BitWriter {
    /// Create an empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a writer with room for `words` packed words.
    pub fn with_capacity(words: usize) -> Self {
        Self {
            words: Vec::with_capacity(words),
            ..Self::default()
        }
    }

    /// Append one bit.
    pub fn write_bit(&mut self, bit: bool) {
        self.current = (self.current << 1) | u32::from(bit);
        self.filled += 1;
        self.bit_count += 1;
        if self.filled == WORD_BITS as u32 {
            self.words.push(self.current);
            self.current = 0;
            self.filled = 0;
        }
    }

    /// Append `n` copies of `bit`.
    pub fn write_repeated(&mut self, bit: bool, n: u64) {
        for _ in 0..n {
            self.write_bit(bit);
        }
    }

    /// Bits written so far.
    pub fn bit_count(&self) -> usize {
        self.bit_count
    }

    /// Flush the trailing word, padding with 1-bits.
    pub fn finish(mut self) -> Bitstream {
        if self.filled > 0 {
            let pad = WORD_BITS as u32 - self.filled;
            self.words.push((self.current << pad) | ((1u32 << pad) - 1));
        }
        Bitstream {
            words: self.words,
            bit_count: self.bit_count,
        }
    }
}

/// Bit reader over packed words.
#[derive(Debug)]
pub struct BitReader<'a> {
    words: &'a [u32],
    bit_count: usize,
    pos: usize,
    pad_limit: usize,
}

impl<'a> BitReader<'a> {
    /// Create a reader over the first `bit_count` bits of `words`.
    ///
    /// Up to `pad_limit` reads past `bit_count` return 1; the next one fails.
    ///
    /// # Errors
    /// Returns `DecodeError::BitCountOutOfRange` if `bit_count` exceeds the
    /// bits held by `words`.
    pub fn new(words: &'a [u32], bit_count: usize, pad_limit: usize) -> Result<Self, DecodeError> {
        let capacity = words.len().saturating_mul(WORD_BITS);
        if bit_count > capacity {
            return Err(DecodeError::BitCountOutOfRange {
                bit_count,
                capacity,
            });
        }
        Ok(Self {
            words,
            bit_count,
            pos: 0,
            pad_limit,
        })
    }

    /// Read the next bit.
    ///
    /// # Errors
    /// Returns `DecodeError::TruncatedStream` once the pad allowance is spent.
    pub fn read_bit(&mut self) -> Result<bool, DecodeError> {
        let pos = self.pos;
        if pos >= self.bit_count + self.pad_limit {
            return Err(DecodeError::TruncatedStream {
                read: pos,
                bit_count: self.bit_count,
            });
        }
        self.pos += 1;
        if pos >= self.bit_count {
            return Ok(true);
        }
        let word = self.words[pos / WORD_BITS];
        let shift = WORD_BITS - 1 - pos % WORD_BITS;
        Ok((word >> shift) & 1 == 1)
    }

    /// Bits consumed so far, pad bits included.
    pub fn position(&self) -> usize {
        self.pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_and_pad() {
        let mut writer = BitWriter::new();
        for bit in [true, false, true, false] {
            writer.write_bit(bit);
        }
        let stream = writer.finish();
        assert_eq!(stream.bit_count(), 4);
        assert_eq!(stream.words(), &[0xAFFF_FFFF]);
    }

    #[test]
    fn test_full_word_has_no_pad() {
        let mut writer = BitWriter::new();
        writer.write_repeated(false, 32);
        writer.write_bit(false);
        let stream = writer.finish();
        assert_eq!(stream.words(), &[0, 0x7FFF_FFFF]);
        assert_eq!(stream.bit_count(), 33);
    }

    #[test]
    fn test_reader_crosses_words_and_pads() {
        let words = [0x0000_0001, 0x8000_0000];
        let mut reader = BitReader::new(&words, 33, 2).unwrap();
        let bits: Vec<bool> = (0..33).map(|_| reader.read_bit().unwrap()).collect();
        assert!(bits[..31].iter().all(|&b| !b));
        assert!(bits[31]);
        assert!(bits[32]);
        assert!(reader.read_bit().unwrap());
        assert!(reader.read_bit().unwrap());
        assert_eq!(
            reader.read_bit(),
            Err(DecodeError::TruncatedStream {
                read: 35,
                bit_count: 33
            })
        );
    }

    #[test]
    fn test_reader_rejects_bad_bit_count() {
        let err = BitReader::new(&[0], 33, 0).unwrap_err();
        assert_eq!(
            err,
            DecodeError::BitCountOutOfRange {
                bit_count: 33,
                capacity: 32
            }
        );
    }
}
