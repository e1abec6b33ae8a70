#![no_main]

use libfuzzer_sys::fuzz_target;
use syscap::tagger::{parse_line, scan};

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes must never panic the streaming scan
    let _ = scan(data);

    if let Ok(input) = std::str::from_utf8(data) {
        for (i, line) in input.lines().enumerate() {
            let _ = parse_line(line, i + 1);
        }
    }
});
