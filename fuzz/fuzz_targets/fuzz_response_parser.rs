//! Fuzz target: `parse_remote_reading`
//!
//! Feeds arbitrary lines to the response scanner.  It must never panic,
//! and anything it accepts must lie inside the documented ranges.
//!
//! cargo fuzz run fuzz_response_parser

#![no_main]

use libfuzzer_sys::fuzz_target;
use plantcare::link::parse::{HUMIDITY_RANGE, TEMPERATURE_RANGE, parse_remote_reading};

fuzz_target!(|data: &[u8]| {
    if let Ok(r) = parse_remote_reading(data) {
        assert!(TEMPERATURE_RANGE.contains(&r.temperature_c));
        assert!(HUMIDITY_RANGE.contains(&r.humidity_pct));
    }
});
