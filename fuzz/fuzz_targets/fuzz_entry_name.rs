#![no_main]

use libfuzzer_sys::fuzz_target;
use fabbanana::archive::processed_entry_name;

fuzz_target!(|data: &[u8]| {
    // Archive entry naming must never panic on arbitrary filenames
    if let Ok(s) = std::str::from_utf8(data) {
        let name = processed_entry_name(s);
        assert!(name.ends_with("_processed.png"));
    }
});
