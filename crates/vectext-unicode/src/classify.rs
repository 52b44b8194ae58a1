//! Cluster classification: emoji detection and script lookup.
//!
//! Emoji classification takes priority over script classification. A cluster
//! is emoji when its leading code point falls in one of the emoji intervals,
//! when it contains the combining enclosing keycap, or when a known base
//! character is combined with the emoji variation selector.

use icu_properties::props::{GeneralCategory, Script};
use icu_properties::{CodePointMapData, CodePointMapDataBorrowed};

/// What a grapheme cluster turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClusterClass {
    /// Rendered from pre-fetched artwork, never shaped.
    Emoji,
    /// Carries a significant script; may have a script-specific font.
    Script(Script),
    /// Whitespace, punctuation, or digit with no inherent direction.
    Neutral,
    /// No script, not emoji, not neutral. Primary-font territory.
    Unclassified,
}

const VS16: char = '\u{FE0F}';
const KEYCAP: char = '\u{20E3}';

/// Ordered, immutable emoji code-point intervals (inclusive), built once.
///
/// Covers the presentation-default emoji blocks plus regional indicators.
/// Text-default symbols outside these intervals only classify as emoji via
/// the variation-selector rule.
const EMOJI_RANGES: &[(u32, u32)] = &[
    (0x1F004, 0x1F004), // mahjong red dragon
    (0x1F0CF, 0x1F0CF), // playing card joker
    (0x1F1E6, 0x1F1FF), // regional indicators (flags)
    (0x1F300, 0x1F5FF), // misc symbols and pictographs
    (0x1F600, 0x1F64F), // emoticons
    (0x1F680, 0x1F6FF), // transport and map
    (0x1F900, 0x1F9FF), // supplemental symbols and pictographs
    (0x1FA70, 0x1FAFF), // symbols and pictographs extended-A
    (0x231A, 0x231B),   // watch, hourglass
    (0x23E9, 0x23FA),   // media controls
    (0x25FD, 0x25FE),   // small squares
    (0x2614, 0x2615),   // umbrella, hot beverage
    (0x2648, 0x2653),   // zodiac
    (0x267F, 0x267F),   // wheelchair
    (0x26A1, 0x26A1),   // high voltage
    (0x26C4, 0x26C5),   // snowman, sun behind cloud
    (0x26CE, 0x26CE),   // ophiuchus
    (0x26D4, 0x26D4),   // no entry
    (0x26EA, 0x26EA),   // church
    (0x26F2, 0x26F5),   // fountain..sailboat
    (0x26FA, 0x26FA),   // tent
    (0x26FD, 0x26FD),   // fuel pump
    (0x2705, 0x2705),   // check mark button
    (0x270A, 0x270B),   // fists
    (0x2728, 0x2728),   // sparkles
    (0x274C, 0x274C),   // cross mark
    (0x274E, 0x274E),   // cross mark button
    (0x2753, 0x2755),   // question/exclamation ornaments
    (0x2757, 0x2757),   // exclamation mark
    (0x2795, 0x2797),   // heavy plus/minus/division
    (0x27B0, 0x27B0),   // curly loop
    (0x27BF, 0x27BF),   // double curly loop
    (0x2B1B, 0x2B1C),   // large squares
    (0x2B50, 0x2B50),   // star
    (0x2B55, 0x2B55),   // circle
];

/// Classifies grapheme clusters using ICU property data and the emoji
/// interval table.
pub struct ClusterClassifier {
    script_map: CodePointMapDataBorrowed<'static, Script>,
    category_map: CodePointMapDataBorrowed<'static, GeneralCategory>,
}

impl ClusterClassifier {
    pub fn new() -> Self {
        Self {
            script_map: CodePointMapData::<Script>::new(),
            category_map: CodePointMapData::<GeneralCategory>::new(),
        }
    }

    /// Classify one grapheme cluster. Emoji wins over script; script wins
    /// over neutral; anything left is unclassified.
    pub fn classify(&self, cluster: &str) -> ClusterClass {
        let Some(first) = cluster.chars().next() else {
            return ClusterClass::Neutral;
        };

        if Self::is_emoji_cluster(cluster, first) {
            return ClusterClass::Emoji;
        }

        for ch in cluster.chars() {
            let script = self.script_map.get(ch);
            if Self::is_significant_script(script) {
                return ClusterClass::Script(script);
            }
        }

        if cluster.chars().all(|ch| self.is_neutral_char(ch)) {
            ClusterClass::Neutral
        } else {
            ClusterClass::Unclassified
        }
    }

    fn is_emoji_cluster(cluster: &str, first: char) -> bool {
        if in_emoji_ranges(first as u32) {
            return true;
        }
        if cluster.contains(KEYCAP) {
            return true;
        }
        cluster.contains(VS16) && is_emoji_vs_base(first)
    }

    fn is_significant_script(script: Script) -> bool {
        !matches!(script, Script::Common | Script::Inherited | Script::Unknown)
    }

    fn is_neutral_char(&self, ch: char) -> bool {
        if ch.is_whitespace() {
            return true;
        }
        matches!(
            self.category_map.get(ch),
            GeneralCategory::DecimalNumber
                | GeneralCategory::ConnectorPunctuation
                | GeneralCategory::DashPunctuation
                | GeneralCategory::OpenPunctuation
                | GeneralCategory::ClosePunctuation
                | GeneralCategory::InitialPunctuation
                | GeneralCategory::FinalPunctuation
                | GeneralCategory::OtherPunctuation
        )
    }
}

impl Default for ClusterClassifier {
    fn default() -> Self {
        Self::new()
    }
}

fn in_emoji_ranges(cp: u32) -> bool {
    // Table is small; first match wins, order is documentation only.
    EMOJI_RANGES.iter().any(|&(lo, hi)| cp >= lo && cp <= hi)
}

/// Base characters that render as emoji when followed by U+FE0F.
fn is_emoji_vs_base(ch: char) -> bool {
    matches!(
        ch,
        '#' | '*'
            | '0'..='9'
            | '\u{A9}'   // copyright
            | '\u{AE}'   // registered
            | '\u{203C}' // double exclamation
            | '\u{2049}' // exclamation question
            | '\u{2122}' // trade mark
            | '\u{2139}' // information
            | '\u{2194}'..='\u{21AA}' // arrows
            | '\u{24C2}' // circled M
            | '\u{2600}'..='\u{27BF}' // misc symbols, dingbats
            | '\u{2934}' | '\u{2935}' // arrow curves
            | '\u{3030}' | '\u{303D}' // wavy dash, part alternation
            | '\u{3297}' | '\u{3299}' // circled ideographs
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> ClusterClassifier {
        ClusterClassifier::new()
    }

    #[test]
    fn latin_letter_is_script() {
        assert_eq!(classifier().classify("A"), ClusterClass::Script(Script::Latin));
    }

    #[test]
    fn arabic_letter_is_script() {
        assert_eq!(classifier().classify("م"), ClusterClass::Script(Script::Arabic));
    }

    #[test]
    fn han_character_is_script() {
        assert_eq!(classifier().classify("漢"), ClusterClass::Script(Script::Han));
    }

    #[test]
    fn plain_pictograph_is_emoji() {
        assert_eq!(classifier().classify("\u{1F600}"), ClusterClass::Emoji);
    }

    #[test]
    fn zwj_family_sequence_is_emoji() {
        let family = "\u{1F468}\u{200D}\u{1F469}\u{200D}\u{1F466}";
        assert_eq!(classifier().classify(family), ClusterClass::Emoji);
    }

    #[test]
    fn flag_sequence_is_emoji() {
        assert_eq!(classifier().classify("\u{1F1EF}\u{1F1F5}"), ClusterClass::Emoji);
    }

    #[test]
    fn keycap_sequence_is_emoji_not_digit() {
        // digit + VS16 + combining enclosing keycap must never fall back to
        // a digit rendering
        let keycap = "1\u{FE0F}\u{20E3}";
        assert_eq!(classifier().classify(keycap), ClusterClass::Emoji);
    }

    #[test]
    fn vs16_base_is_emoji() {
        assert_eq!(classifier().classify("\u{2122}\u{FE0F}"), ClusterClass::Emoji);
    }

    #[test]
    fn bare_digit_is_neutral() {
        assert_eq!(classifier().classify("7"), ClusterClass::Neutral);
    }

    #[test]
    fn whitespace_and_punctuation_are_neutral() {
        let c = classifier();
        assert_eq!(c.classify(" "), ClusterClass::Neutral);
        assert_eq!(c.classify(","), ClusterClass::Neutral);
        assert_eq!(c.classify("\u{201C}"), ClusterClass::Neutral);
    }

    #[test]
    fn unmatched_symbol_is_unclassified() {
        // U+2200 FOR ALL: Common script, not punctuation, not emoji
        assert_eq!(classifier().classify("\u{2200}"), ClusterClass::Unclassified);
    }

    #[test]
    fn combining_mark_cluster_follows_base_script() {
        assert_eq!(
            classifier().classify("e\u{301}"),
            ClusterClass::Script(Script::Latin)
        );
    }
}
