//! Fuzz target: `LineDecoder::feed` + `parse_line`
//!
//! Drives arbitrary byte sequences, split at an arbitrary point, into the
//! streaming line decoder and parses whatever it yields.
//!
//! Checks:
//! - No panics under any byte sequence or split
//! - Yielded lines fit the decoder buffer and contain no `\n`
//! - Any line that parses re-formats to a line that parses again
//!
//! cargo fuzz run fuzz_line_decoder

#![no_main]

use envirocontrol::protocol::{LineDecoder, MAX_LINE_LEN, format_line, parse_line};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Some((&split, rest)) = data.split_first() else {
        return;
    };
    let at = usize::from(split).min(rest.len());
    let (head, tail) = rest.split_at(at);

    let mut decoder = LineDecoder::new();
    for chunk in [head, tail] {
        decoder.feed(chunk, |item| {
            let Ok(line) = item else { return };
            assert!(line.len() <= MAX_LINE_LEN, "line exceeds decoder buffer");
            assert!(!line.contains('\n'), "terminator leaked into line");
            if let Ok(reading) = parse_line(line) {
                // Huge magnitudes do not fit the outbound buffer and are
                // refused; anything that formats must parse again.
                if let Ok(again) = format_line(&reading) {
                    assert!(parse_line(&again).is_ok(), "re-formatted line rejected");
                }
            }
        });
    }
    assert!(decoder.pending() <= MAX_LINE_LEN);

    decoder.reset();
    assert_eq!(decoder.pending(), 0);
});
