//! Bidirectional run resolution (UAX #9, consumed via `unicode-bidi`).

use unicode_bidi::{BidiInfo, Level};
use vectext_core::types::{BidiRun, Direction};

/// Partition `text` into maximal same-direction runs, in logical order.
///
/// The paragraph embedding level is fixed left-to-right; the document format
/// has no per-paragraph direction attribute, so base direction is never
/// auto-detected. The returned runs cover the text with no gaps or overlaps,
/// and concatenating them in order reproduces the input exactly.
///
/// Reordering is NOT performed here: an RTL run is reversed later at grapheme
/// cluster granularity so combining marks stay attached to their base.
pub fn resolve_runs(text: &str) -> Vec<BidiRun> {
    if text.is_empty() {
        return Vec::new();
    }

    let bidi = BidiInfo::new(text, Some(Level::ltr()));

    // One resolved level per byte of the input; all bytes of a scalar share
    // its level, so parity boundaries always land on char boundaries.
    let mut runs: Vec<BidiRun> = Vec::new();
    for (index, level) in bidi.levels.iter().enumerate() {
        let direction = if level.is_rtl() {
            Direction::RightToLeft
        } else {
            Direction::LeftToRight
        };

        match runs.last_mut() {
            Some(run) if run.direction == direction => run.end = index + 1,
            _ => runs.push(BidiRun {
                start: index,
                end: index + 1,
                direction,
            }),
        }
    }

    runs
}
