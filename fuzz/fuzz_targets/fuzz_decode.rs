#![no_main]

use libfuzzer_sys::fuzz_target;
use lzjwm::{decode, decompressed_size, CodecConfig, StreamDecoder};

fuzz_target!(|data: &[u8]| {
    let config = CodecConfig::default();

    // Arbitrary bytes may be rejected, but never panic
    let buffered = decode(&config, data);

    // Bound the stream so long self-references cannot stall the fuzzer
    let size = decompressed_size(&config, data);
    let streamed: Result<Vec<u8>, _> = StreamDecoder::new(&config, data).take(size + 1).collect();

    // When the buffered decoder accepts the input, both must agree
    if let Ok(expected) = buffered {
        assert_eq!(streamed.expect("stream must accept valid input"), expected);
    }
});
