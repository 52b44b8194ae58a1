use super::*;
use proptest::prelude::*;
use vectext_core::types::Direction;

// Property: bidi runs partition any input exactly (gapless, non-overlapping,
// logical-order concatenation reproduces the input)
proptest! {
    #[test]
    fn prop_bidi_runs_partition_input(s in "\\PC*") {
        let runs = resolve_runs(&s);
        let mut cursor = 0;
        for run in &runs {
            prop_assert_eq!(run.start, cursor);
            prop_assert!(run.end > run.start);
            cursor = run.end;
        }
        prop_assert_eq!(cursor, s.len());
        let rebuilt: String = runs.iter().map(|r| &s[r.start..r.end]).collect();
        prop_assert_eq!(rebuilt, s);
    }
}

// Property: adjacent runs never share a direction (runs are maximal)
proptest! {
    #[test]
    fn prop_bidi_runs_are_maximal(s in "\\PC*") {
        let runs = resolve_runs(&s);
        for pair in runs.windows(2) {
            prop_assert_ne!(pair[0].direction, pair[1].direction);
        }
    }
}

// Property: grapheme segmentation is idempotent under re-segmentation of
// its own concatenated output
proptest! {
    #[test]
    fn prop_grapheme_segmentation_idempotent(s in "\\PC*") {
        let first = graphemes(&s);
        let joined: String = first.concat();
        prop_assert_eq!(graphemes(&joined), first);
    }
}

// Property: segmentation loses no bytes
proptest! {
    #[test]
    fn prop_graphemes_cover_input(s in "\\PC*") {
        let joined: String = graphemes(&s).concat();
        prop_assert_eq!(joined, s);
    }
}

// Property: ASCII text is always a single LTR run
proptest! {
    #[test]
    fn prop_ascii_is_single_ltr_run(s in "[ -~]+") {
        let runs = resolve_runs(&s);
        prop_assert_eq!(runs.len(), 1);
        prop_assert_eq!(runs[0].direction, Direction::LeftToRight);
    }
}
