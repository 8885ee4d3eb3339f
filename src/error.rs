//! Error types for arithmetic coding.

use thiserror::Error;

/// Errors raised while building a [`FrequencyModel`](crate::FrequencyModel).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// No symbol in the histogram has a non-zero count.
    #[error("empty alphabet: no symbol has a non-zero count")]
    EmptyAlphabet,

    /// The total frequency leaves too little headroom for the interval width.
    #[error("total frequency {total} must be below {limit} for a {bits}-bit interval")]
    OverflowRisk {
        /// Sum of all frequencies, end-of-message included.
        total: u64,
        /// Exclusive upper bound, `2^(bits - 2)`.
        limit: u64,
        /// Interval width in bits.
        bits: u32,
    },

    /// The alphabet plus end-of-message does not fit the symbol value space.
    #[error("alphabet of {len} symbols is too large")]
    AlphabetTooLarge {
        /// Number of non-EOM symbols supplied.
        len: usize,
    },
}

/// Errors raised while encoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// The symbol is not a value of the model's alphabet.
    #[error("symbol {symbol} is outside the alphabet of {alphabet_len} symbols")]
    SymbolOutOfAlphabet {
        /// The rejected symbol value.
        symbol: u32,
        /// Number of non-EOM symbols in the model.
        alphabet_len: u32,
    },

    /// The symbol is in the alphabet but has frequency zero.
    #[error("symbol {symbol} has zero frequency")]
    ZeroFrequency {
        /// The rejected symbol value.
        symbol: u32,
    },
}

/// Errors raised while decoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The stream ran out before the end-of-message symbol was found.
    #[error("stream truncated: read {read} bits of a {bit_count}-bit stream")]
    TruncatedStream {
        /// Bits consumed, pad bits included.
        read: usize,
        /// Length of the supplied stream.
        bit_count: usize,
    },

    /// The code register left the coding interval.
    ///
    /// Decoding requires the exact model used for encoding; this is a
    /// precondition, not something the stream can prove. The decoder only
    /// checks its own invariant `low <= code <= high`, so a foreign model
    /// usually decodes silently to other symbols instead of raising this.
    #[error("code value left the coding interval (model mismatch or corrupted stream)")]
    ModelMismatch,

    /// `bit_count` claims more bits than the supplied words hold.
    #[error("bit count {bit_count} exceeds the {capacity} bits supplied")]
    BitCountOutOfRange {
        /// Claimed stream length.
        bit_count: usize,
        /// `32 * words.len()`.
        capacity: usize,
    },

    /// More symbols were decoded than the configured limit allows.
    #[error("decoded symbol limit of {limit} reached before end-of-message")]
    SymbolLimitExceeded {
        /// The configured limit.
        limit: usize,
    },
}

/// Any error produced by this crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Model construction failed.
    #[error("model error: {0}")]
    Model(#[from] ModelError),

    /// Encoding failed.
    #[error("encode error: {0}")]
    Encode(#[from] EncodeError),

    /// Decoding failed.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),
}

/// A specialized Result type for arithmetic coding operations.
pub type Result<T> = std::result::Result<T, Error>;
