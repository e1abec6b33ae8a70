#![no_main]

use libfuzzer_sys::fuzz_target;
use syscap::size::parse_size;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        let _ = parse_size(input);
    }
});
