#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // The probe must decode arbitrary bytes or fail cleanly.
    let config = avstamning::core::Config::default();
    let _ = avstamning::sie::decode_bytes(data, &config);
});
