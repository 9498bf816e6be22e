#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Must not panic — skipped vouchers are fine, panics are bugs.
        let config = avstamning::core::Config::default();
        let _ = avstamning::sie::parse_sie(s, &config);
    }
});
