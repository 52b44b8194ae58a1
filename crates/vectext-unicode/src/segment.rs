//! Extended grapheme cluster segmentation (UAX #29).

use icu_segmenter::GraphemeClusterSegmenter;

/// Split `text` into extended grapheme clusters, in storage order.
///
/// Combining marks, ZWJ emoji sequences, flag sequences, and keycap
/// sequences each come back as a single slice. Idempotent: re-segmenting the
/// concatenation of the output yields the same sequence. Empty input yields
/// an empty vector.
pub fn graphemes(text: &str) -> Vec<&str> {
    if text.is_empty() {
        return Vec::new();
    }

    let boundaries: Vec<usize> = GraphemeClusterSegmenter::new().segment_str(text).collect();
    boundaries
        .windows(2)
        .map(|pair| &text[pair[0]..pair[1]])
        .collect()
}
