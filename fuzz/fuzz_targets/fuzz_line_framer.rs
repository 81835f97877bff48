//! Fuzz target: `LineFramer::push`
//!
//! Drives arbitrary byte sequences into the streaming line framer and
//! asserts that it never panics, never yields an empty or oversized
//! message, and frames cleanly again after a reset.
//!
//! cargo fuzz run fuzz_line_framer

#![no_main]

use libfuzzer_sys::fuzz_target;
use plantcare::link::framer::{LineFramer, MAX_LINE_LEN};

fuzz_target!(|data: &[u8]| {
    let mut framer = LineFramer::new();

    for &b in data {
        if let Some(msg) = framer.push(b) {
            assert!(msg.len() <= MAX_LINE_LEN, "message exceeds line buffer");
            assert!(!msg.is_empty(), "framer must not yield empty lines");
            assert!(!msg.as_bytes().contains(&b'\n'), "terminator leaked into payload");
            assert!(!msg.is_truncated() || msg.len() == MAX_LINE_LEN);
        }
        assert!(framer.pending() < MAX_LINE_LEN + 1);
    }

    // After a reset the framer must accept a fresh line.
    framer.reset();
    let out: Vec<_> = b"x\n".iter().filter_map(|&b| framer.push(b)).collect();
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].as_bytes(), b"x");
});
