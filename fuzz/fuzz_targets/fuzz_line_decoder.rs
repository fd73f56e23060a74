//! Fuzz target: `LineDecoder::feed`
//!
//! Splits arbitrary bytes at a fuzzer-chosen point and feeds both halves.
//! The decoder must never panic, never hold more than `MAX_LINE_BYTES`,
//! and must yield the same lines as a single feed of the whole input.
//!
//! cargo fuzz run fuzz_line_decoder

#![no_main]

use libfuzzer_sys::fuzz_target;
use vitalwatch::link::codec::{LineDecoder, MAX_LINE_BYTES};

fuzz_target!(|data: &[u8]| {
    let Some((&split, body)) = data.split_first() else {
        return;
    };
    let cut = (split as usize).min(body.len());

    let mut whole = LineDecoder::new();
    let expected = whole.feed(body);
    assert!(whole.pending().len() <= MAX_LINE_BYTES);

    let mut halves = LineDecoder::new();
    let mut got = halves.feed(&body[..cut]);
    got.extend(halves.feed(&body[cut..]));
    assert!(halves.pending().len() <= MAX_LINE_BYTES);

    for line in got.iter().flatten() {
        assert!(!line.contains('\n'), "separator leaked into a line");
    }
    assert_eq!(got, expected);
});
