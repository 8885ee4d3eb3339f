#![no_main]
use arith::{decode, encode, FrequencyModel, Precision};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: (Vec<u8>, u8)| {
    let (input_bytes, width) = data;
    let precision = match width % 3 {
        0 => Precision::Bits16,
        1 => Precision::Bits32,
        _ => Precision::Bits64,
    };

    if input_bytes.is_empty() {
        return;
    }

    // Model straight from the input histogram over the byte alphabet.
    let input: Vec<u32> = input_bytes.iter().map(|&b| u32::from(b)).collect();
    let Ok(model) = FrequencyModel::from_message(&input, 256, precision) else {
        return;
    };

    let stream = encode(&input, &model).expect("every input byte has a non-zero count");
    let output = decode(stream.words(), stream.bit_count(), &model).expect("intact stream decodes");
    assert_eq!(input, output);
});
