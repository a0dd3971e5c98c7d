#![no_main]

use libfuzzer_sys::fuzz_target;
use simregress::baseline::parse_reference;

fuzz_target!(|data: &[u8]| {
    // First byte picks the value column, the rest is reference text
    if let Some((&column, rest)) = data.split_first() {
        let text = String::from_utf8_lossy(rest);
        let _ = parse_reference(&text, column as usize);
    }
});
