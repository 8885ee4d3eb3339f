use arith::{decode, encode, FrequencyModel, Precision};

fn main() {
    let input = (0..10000).map(|i| [0u32, 0, 1, 0, 2][i % 5]).collect::<Vec<_>>();
    let model = FrequencyModel::from_message(&input, 3, Precision::Bits32)
        .expect("histogram of a fixed pattern fits 32-bit precision");

    for _ in 0..1000 {
        let stream = encode(&input, &model).expect("input is drawn from the model");
        let output = decode(stream.words(), stream.bit_count(), &model).expect("stream is intact");
        assert_eq!(output.len(), input.len());
    }
}
