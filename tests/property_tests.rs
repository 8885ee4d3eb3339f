use std::sync::Once;

use arith::{
    decode, decode_with_config, encode, estimate_bits, CoderConfig, DecodeError, FrequencyModel,
    ModelError, Precision,
};
use proptest::prelude::*;
use proptest::sample::Index;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INIT: Once = Once::new();

fn init_test_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("arith=debug"));
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_test_writer().compact())
            .init();
    });
}

/// Map random indices onto the symbols that have a non-zero count.
fn message_for(counts: &[u32], picks: &[Index]) -> Vec<u32> {
    let live: Vec<u32> = (0u32..)
        .zip(counts)
        .filter(|&(_, &c)| c > 0)
        .map(|(s, _)| s)
        .collect();
    picks.iter().map(|i| live[i.index(live.len())]).collect()
}

fn precision() -> impl Strategy<Value = Precision> {
    prop_oneof![
        Just(Precision::Bits16),
        Just(Precision::Bits32),
        Just(Precision::Bits64)
    ]
}

#[test]
fn test_concrete_abc_tracing() {
    init_test_tracing();
    let model = FrequencyModel::build(&[3, 3, 3]).unwrap();
    let stream = encode(&[0, 1, 2], &model).unwrap();
    assert!(stream.bit_count() > 0);
    assert_eq!(stream.words().len(), stream.bit_count().div_ceil(32));
    assert_eq!(decode(stream.words(), stream.bit_count(), &model).unwrap(), vec![0, 1, 2]);
}

#[test]
fn test_overflow_guard_per_precision() {
    assert!(matches!(
        FrequencyModel::build(&[u32::MAX]),
        Err(ModelError::OverflowRisk { bits: 16, .. })
    ));
    // 2^32 - 1 + EOM overflows 32-bit headroom but fits 64-bit.
    assert!(matches!(
        FrequencyModel::with_precision(&[u32::MAX], Precision::Bits32),
        Err(ModelError::OverflowRisk { bits: 32, .. })
    ));
    let model = FrequencyModel::with_precision(&[u32::MAX, 7], Precision::Bits64).unwrap();
    let msg = [0, 0, 1, 0, 1, 1, 0];
    let stream = encode(&msg, &model).unwrap();
    assert_eq!(decode(stream.words(), stream.bit_count(), &model).unwrap(), msg);
}

#[test]
fn test_skewed_distribution_costs() {
    let model = FrequencyModel::with_precision(&[1, 1, 1000], Precision::Bits32).unwrap();

    let common: Vec<u32> = vec![2; 1000];
    let common_bits = encode(&common, &model).unwrap().bit_count();
    assert!((common_bits as f64) / 1000.0 < 0.02, "{common_bits}");

    let mut full = vec![0, 1];
    full.extend_from_slice(&common);
    let stream = encode(&full, &model).unwrap();
    let per_rare = (stream.bit_count() - common_bits) as f64 / 2.0;
    assert!((per_rare - 1000f64.log2()).abs() < 1.5, "{per_rare}");

    let estimate = estimate_bits(&model);
    assert!(stream.bit_count() as u64 + 1 >= estimate);
    assert!(stream.bit_count() as u64 <= estimate + 3);
    assert_eq!(decode(stream.words(), stream.bit_count(), &model).unwrap(), full);
}

#[test]
fn test_shared_model_across_threads() {
    let model = FrequencyModel::build(&[4, 1, 9, 3, 3]).unwrap();
    let messages: Vec<Vec<u32>> = (0..8u32)
        .map(|t| (0..300u32).map(|i| (i * (t + 3) + t) % 5).collect())
        .collect();
    std::thread::scope(|scope| {
        for msg in &messages {
            let model = &model;
            scope.spawn(move || {
                let stream = encode(msg, model).unwrap();
                let out = decode(stream.words(), stream.bit_count(), model).unwrap();
                assert_eq!(&out, msg);
            });
        }
    });
}

proptest! {
    #[test]
    fn prop_roundtrip(
        counts in prop::collection::vec(0u32..64, 1..24),
        picks in prop::collection::vec(any::<Index>(), 0..300),
        precision in precision(),
    ) {
        prop_assume!(counts.iter().any(|&c| c > 0));
        let model = FrequencyModel::with_precision(&counts, precision).unwrap();
        let msg = message_for(&counts, &picks);

        let stream = encode(&msg, &model).unwrap();
        prop_assert_eq!(stream.words().len(), stream.bit_count().div_ceil(32));
        let out = decode(stream.words(), stream.bit_count(), &model).unwrap();
        prop_assert_eq!(out, msg);
    }

    #[test]
    fn prop_deterministic(
        counts in prop::collection::vec(1u32..32, 1..10),
        picks in prop::collection::vec(any::<Index>(), 0..100),
    ) {
        let model = FrequencyModel::build(&counts).unwrap();
        let msg = message_for(&counts, &picks);
        prop_assert_eq!(encode(&msg, &model).unwrap(), encode(&msg, &model).unwrap());
    }

    #[test]
    fn prop_size_estimate_bounds(
        alphabet in 1usize..16,
        raw in prop::collection::vec(any::<Index>(), 1..300),
    ) {
        let msg: Vec<u32> = raw.iter().map(|i| i.index(alphabet) as u32).collect();
        let model = FrequencyModel::from_message(&msg, alphabet, Precision::Bits32).unwrap();
        let bits = encode(&msg, &model).unwrap().bit_count() as u64;
        let estimate = estimate_bits(&model);
        prop_assert!(bits + 1 >= estimate, "{} < {}", bits, estimate);
        prop_assert!(bits <= estimate + 3, "{} > {}", bits, estimate);
    }

    #[test]
    fn prop_corrupted_streams_never_panic(
        counts in prop::collection::vec(1u32..20, 1..8),
        picks in prop::collection::vec(any::<Index>(), 1..100),
        flips in prop::collection::vec(any::<Index>(), 0..4),
        cut in any::<Index>(),
    ) {
        let model = FrequencyModel::build(&counts).unwrap();
        let msg = message_for(&counts, &picks);
        let stream = encode(&msg, &model).unwrap();
        let (mut words, bit_count) = stream.into_parts();
        for flip in &flips {
            let bit = flip.index(bit_count);
            words[bit / 32] ^= 1 << (31 - bit % 32);
        }
        let config = CoderConfig {
            max_decoded_symbols: Some(10_000),
            ..CoderConfig::default()
        };
        let short = cut.index(bit_count + 1);
        match decode_with_config(&words, short, &model, &config) {
            Ok(out) => prop_assert!(out.len() <= 10_000),
            Err(e) => prop_assert!(matches!(
                e,
                DecodeError::TruncatedStream { .. }
                    | DecodeError::SymbolLimitExceeded { .. }
                    | DecodeError::ModelMismatch
            ), "unexpected error {:?}", e),
        }
    }
}
