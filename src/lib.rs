//! # Arithmetic Coding
//!
//! *Finite-precision integer arithmetic coding with underflow handling.*
//!
//! ## Intuition First
//!
//! Picture the interval `[0, 1)` as a ruler. Each symbol owns a slice of the
//! ruler proportional to its frequency. To encode a message, zoom into the
//! first symbol's slice, then into the second symbol's slice *of that slice*,
//! and so on. Any number inside the final, tiny slice identifies the whole
//! message, and writing that number down takes about `-log2(p)` bits for a
//! message of probability `p`.
//!
//! ## The Problem
//!
//! Real machines cannot zoom forever: after a handful of symbols the slice is
//! narrower than any fixed-width integer can express. The finite-precision
//! coder keeps `low` and `high` in `w`-bit registers and *renormalizes*:
//! - **E1/E2**: once both bounds share their top bit, that bit of the answer
//!   is settled. Emit it and double the interval.
//! - **E3**: when the interval shrinks around the midpoint (`low = 01…`,
//!   `high = 10…`) no bit is settled yet. Double the interval around the
//!   midpoint and remember to emit the complement of the next settled bit.
//!
//! ## Historical Context
//!
//! ```text
//! 1948  Shannon          Entropy as the fundamental limit
//! 1952  Huffman          Optimal prefix codes, whole bits per symbol
//! 1976  Rissanen/Pasco   Arithmetic coding in finite precision
//! 1979  Rubin            Renormalization with fixed-width registers
//! 1987  Witten et al.    "Arithmetic Coding for Data Compression" (CACM)
//! 1998  Moffat et al.    Revisited: carry-less range coding variants
//! ```
//!
//! ## Mathematical Formulation
//!
//! With cumulative counts `C(s)` and total `T`, one coding step maps the
//! inclusive integer interval `[L, H]` (range `R = H - L + 1`) to
//!
//! ```text
//! H' = L + floor(R * C(s+1) / T) - 1
//! L' = L + floor(R * C(s)   / T)
//! ```
//!
//! and the decoder recovers `s` from its code register `V` as the unique
//! symbol with `C(s) <= floor(((V - L + 1) * T - 1) / R) < C(s+1)`.
//!
//! ## Complexity Analysis
//!
//! - **Time**: `O(1)` arithmetic per symbol plus one step per emitted bit;
//!   symbol lookup in the decoder is `O(log n)` over the cumulative table.
//! - **Space**: `O(n)` for the model, `O(bits)` for the stream.
//!
//! ## Failure Modes
//!
//! 1. **Precision exhaustion**: a total frequency close to the register width
//!    can give a symbol an empty slice. Models are rejected unless
//!    `T < 2^(w-2)`.
//! 2. **Model mismatch**: the model is not in the stream; decoding with a
//!    different table yields garbage, usually without an error.
//! 3. **Truncation masking**: missing trailing bits read as 1s, the same
//!    convention the encoder pads with, so a short stream can still decode.
//!
//! ## Implementation Notes
//!
//! - [`FrequencyModel`]: static cumulative table with an end-of-message symbol.
//! - [`estimate_bits`]: Shannon size estimate used to pre-size output.
//! - [`encode`] / [`Encoder`] and [`decode`] / [`Decoder`]: the coder pair,
//!   generic over 16/32/64-bit registers ([`Precision`]).
//! - [`Observer`]: optional per-transition tracing hook.
//!
//! ```
//! use arith::{decode, encode, estimate_bits, FrequencyModel};
//!
//! let message = [0, 1, 2, 2, 1, 0, 1, 2, 0];
//! let model = FrequencyModel::build(&[3, 3, 3]).unwrap();
//! let stream = encode(&message, &model).unwrap();
//! assert!(stream.bit_count() as u64 + 1 >= estimate_bits(&model));
//! assert_eq!(decode(stream.words(), stream.bit_count(), &model).unwrap(), message);
//! ```
//!
//! ## References
//!
//! - Witten, I. H., Neal, R. M., Cleary, J. G. (1987). "Arithmetic coding for data compression."
//! - Moffat, A., Neal, R. M., Witten, I. H. (1998). "Arithmetic coding revisited."

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bits;
pub mod coder;
pub mod config;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod estimate;
pub mod model;

pub use bits::Bitstream;
pub use coder::{CoderEvent, Observer, Silent};
pub use config::{CoderConfig, Precision};
pub use decoder::{decode, decode_with_config, decode_with_observer, Decoder};
pub use encoder::{encode, encode_with_observer, Encoder};
pub use error::{DecodeError, EncodeError, Error, ModelError, Result};
pub use estimate::{estimate_bits, estimate_words};
pub use model::{FrequencyModel, Symbol};
