#![no_main]

use libfuzzer_sys::fuzz_target;
use lzjwm::{decode, decode_stream, CodecConfig, Encoder};

fuzz_target!(|data: &[u8]| {
    // First byte picks the codec configuration, the rest is the payload
    let Some((&selector, payload)) = data.split_first() else {
        return;
    };
    let count_bits = 1 + selector % 4;
    let zero_bits = (selector >> 2) % (7 - count_bits);
    let Ok(config) = CodecConfig::new(count_bits, zero_bits) else {
        return;
    };

    let input: Vec<u8> = payload.iter().map(|b| b & 0x7f).collect();
    let compressed = Encoder::new(config).encode(&input).expect("7-bit input must encode");
    assert!(compressed.len() <= input.len());

    let buffered = decode(&config, &compressed).expect("encoder output must decode");
    assert_eq!(buffered, input);

    let mut streamed = Vec::with_capacity(input.len());
    decode_stream(&config, &compressed, None, |c| {
        streamed.push(c);
        Ok(())
    })
    .expect("encoder output must stream");
    assert_eq!(streamed, input);
});
