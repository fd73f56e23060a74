//! Fuzz target: `parse_line` + `evaluate`
//!
//! Any line must produce either a reading or a typed failure, and any
//! reading must evaluate without panicking.
//!
//! cargo fuzz run fuzz_reading_parser

#![no_main]

use libfuzzer_sys::fuzz_target;
use vitalwatch::link::parser::parse_line;
use vitalwatch::vitals::{Thresholds, evaluate};

fuzz_target!(|data: &[u8]| {
    let line = String::from_utf8_lossy(data);
    if let Ok(reading) = parse_line(&line) {
        let eval = evaluate(&reading, &Thresholds::default());
        assert_eq!(eval.verdict.triggered, !eval.verdict.exceeded.is_empty());
        assert!(eval.observations.len() <= 5);
    }
});
