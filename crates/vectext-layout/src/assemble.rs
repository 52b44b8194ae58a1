//! Assembles visual-order runs into an SVG fragment.
//!
//! The assembler owns the cursor. It starts at the node origin and advances
//! left to right through the runs it is fed (already visual order), emitting
//! `<path>` elements for shaped glyphs, `<g>`-wrapped artwork for emoji,
//! and `<text>` elements for clusters with no loadable font. Output is a
//! fragment for the host to splice into its document, never a standalone
//! SVG document.

use std::collections::{BTreeMap, HashMap};
use std::fmt::Write;

use icu_properties::props::Script;
use kurbo::{BezPath, PathEl, Point};
use vectext_core::types::{Anchor, Direction, TextNode};
use vectext_fontdb::resolver::{css_fallback_family, is_cjk_class};
use vectext_fontdb::FontHandle;
use vectext_shape::ShapingEngine;
use vectext_unicode::{graphemes, ClusterClass, ClusterClassifier};

use crate::runs::TextRun;

/// Decimal places for emitted coordinates and path data.
const PRECISION: usize = 2;

/// Emoji artwork is authored in a fixed square grid of this many units.
const EMOJI_ART_UNITS: f32 = 36.0;

/// Fraction of the font size the emoji box rises above the baseline.
const EMOJI_BASELINE_LIFT: f32 = 0.75;

/// Line advance as a multiple of the font size.
const LINE_HEIGHT: f32 = 1.2;

/// Advance estimate for fallback clusters, as a multiple of the font size.
const FALLBACK_ADVANCE: f32 = 0.6;

/// The assembled output for one text node.
#[derive(Debug, Clone)]
pub struct LayoutFragment {
    pub svg: String,
    /// Final cursor offset from the node origin; what anchoring shifted by.
    pub width: f32,
}

/// Streaming assembler: feed runs in visual order, then [`finish`].
///
/// [`finish`]: PathAssembler::finish
pub struct PathAssembler<'a> {
    node: &'a TextNode,
    shaper: &'a ShapingEngine,
    classifier: &'a ClusterClassifier,
    /// Primary-font stylistic substitutions; empty when none were requested.
    substitutions: &'a HashMap<u32, u32>,
    /// Pre-fetched artwork per emoji cluster; `None` records a failed or
    /// missing fetch.
    emoji_art: &'a BTreeMap<String, Option<String>>,
    cursor_x: f32,
    cursor_y: f32,
    body: String,
}

impl<'a> PathAssembler<'a> {
    pub fn new(
        node: &'a TextNode,
        shaper: &'a ShapingEngine,
        classifier: &'a ClusterClassifier,
        substitutions: &'a HashMap<u32, u32>,
        emoji_art: &'a BTreeMap<String, Option<String>>,
    ) -> Self {
        Self {
            node,
            shaper,
            classifier,
            substitutions,
            emoji_art,
            cursor_x: node.x,
            cursor_y: node.y,
            body: String::new(),
        }
    }

    /// Current pen position, for the engine's bookkeeping and for tests.
    pub fn cursor(&self) -> (f32, f32) {
        (self.cursor_x, self.cursor_y)
    }

    pub fn push_run(&mut self, run: &TextRun, direction: Direction) {
        match run {
            TextRun::LineBreak => {
                self.cursor_x = self.node.x;
                self.cursor_y += LINE_HEIGHT * self.node.font_size;
            }
            TextRun::Emoji { cluster } => self.push_emoji(cluster),
            TextRun::Fallback { clusters, script } => {
                for cluster in clusters {
                    self.push_fallback_cluster(cluster, *script);
                }
            }
            TextRun::Text {
                font,
                text,
                is_primary,
            } => self.push_text(font, text, *is_primary, direction),
        }
    }

    /// Wrap up: anchor the body and report the total advance.
    pub fn finish(self) -> LayoutFragment {
        let width = self.cursor_x - self.node.x;
        let svg = match self.node.anchor {
            Anchor::Start => self.body,
            Anchor::Middle => wrap_translated(&self.body, -width / 2.0),
            Anchor::End => wrap_translated(&self.body, -width),
        };
        LayoutFragment { svg, width }
    }

    fn push_emoji(&mut self, cluster: &str) {
        let size = self.node.font_size;
        let x = self.cursor_x;
        let y = self.cursor_y - EMOJI_BASELINE_LIFT * size;

        match self.emoji_art.get(cluster) {
            Some(Some(art)) => {
                let scale = size / EMOJI_ART_UNITS;
                let _ = write!(
                    self.body,
                    "<g transform=\"translate({x:.p$}, {y:.p$}) scale({scale:.p$})\">{art}</g>",
                    p = PRECISION
                );
            }
            _ => {
                // No artwork: a neutral box of comparable size keeps the
                // line metrics stable.
                let _ = write!(
                    self.body,
                    "<rect x=\"{x:.p$}\" y=\"{y:.p$}\" width=\"{size:.p$}\" \
                     height=\"{size:.p$}\" fill=\"#cccccc\"/>",
                    p = PRECISION
                );
            }
        }

        self.cursor_x += size;
    }

    fn push_fallback_cluster(&mut self, cluster: &str, script: Option<Script>) {
        let size = self.node.font_size;
        let _ = write!(
            self.body,
            "<text x=\"{x:.p$}\" y=\"{y:.p$}\" font-size=\"{size:.p$}\" \
             font-family=\"{family}\" fill=\"{fill}\">{text}</text>",
            x = self.cursor_x,
            y = self.cursor_y,
            family = css_fallback_family(script),
            fill = xml_escape(&self.node.fill),
            text = xml_escape(cluster),
            p = PRECISION
        );

        let advance = match script {
            Some(script) if is_cjk_class(script) => size,
            _ => FALLBACK_ADVANCE * size,
        };
        self.cursor_x += advance;
    }

    fn push_text(&mut self, font: &FontHandle, text: &str, is_primary: bool, direction: Direction) {
        let substitutions = (is_primary && !self.substitutions.is_empty())
            .then_some(self.substitutions);
        let features: &[String] = if is_primary {
            &self.node.feature_tags
        } else {
            &[]
        };

        let glyphs = match self.shaper.shape(font, text, features, direction, substitutions) {
            Ok(glyphs) => glyphs,
            Err(err) => {
                log::warn!(
                    "shaping failed for '{}' with font '{}': {err}; degrading run",
                    text,
                    font.family()
                );
                self.degrade_run(text, direction);
                return;
            }
        };

        let scale = self.node.font_size / f32::from(font.units_per_em());
        for glyph in glyphs {
            if let Some(path) = font.glyph_outline(glyph.glyph_id) {
                let x = self.cursor_x + glyph.x_offset * scale;
                let y = self.cursor_y - glyph.y_offset * scale;
                let _ = write!(
                    self.body,
                    "<path d=\"{d}\" fill=\"{fill}\" transform=\"translate({x:.p$}, {y:.p$}) \
                     scale({s:.p$}, {neg_s:.p$})\"/>",
                    d = path_to_string(&path, PRECISION),
                    fill = xml_escape(&self.node.fill),
                    s = scale,
                    neg_s = -scale,
                    p = PRECISION
                );
            }
            // Whitespace glyphs have no outline but still advance.
            self.cursor_x += glyph.x_advance * scale;
        }
    }

    /// Shaping failed: render the run's clusters one by one as native text.
    fn degrade_run(&mut self, text: &str, direction: Direction) {
        let mut clusters = graphemes(text);
        if direction.is_rtl() {
            clusters.reverse();
        }
        for cluster in clusters {
            let script = match self.classifier.classify(cluster) {
                ClusterClass::Script(script) => Some(script),
                _ => None,
            };
            self.push_fallback_cluster(cluster, script);
        }
    }
}

fn wrap_translated(body: &str, dx: f32) -> String {
    format!(
        "<g transform=\"translate({dx:.p$})\">{body}</g>",
        p = PRECISION
    )
}

fn xml_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn path_to_string(path: &BezPath, precision: usize) -> String {
    if path.elements().is_empty() {
        return String::new();
    }

    let mut data = String::with_capacity(path.elements().len() * 16);
    let mut first = true;

    for &el in path.elements() {
        if !first {
            data.push(' ');
        }
        first = false;
        match el {
            PathEl::MoveTo(p) => append_command(&mut data, 'M', &[p], precision),
            PathEl::LineTo(p) => append_command(&mut data, 'L', &[p], precision),
            PathEl::QuadTo(p1, p2) => append_command(&mut data, 'Q', &[p1, p2], precision),
            PathEl::CurveTo(p1, p2, p3) => append_command(&mut data, 'C', &[p1, p2, p3], precision),
            PathEl::ClosePath => data.push('Z'),
        }
    }

    data
}

fn append_command(buf: &mut String, cmd: char, points: &[Point], precision: usize) {
    buf.push(cmd);
    let mut iter = points.iter();
    if let Some(first_point) = iter.next() {
        append_point(buf, *first_point, precision);
        for point in iter {
            buf.push(' ');
            append_point(buf, *point, precision);
        }
    }
}

fn append_point(buf: &mut String, point: Point, precision: usize) {
    let _ = write!(buf, "{x:.p$},{y:.p$}", x = point.x, y = point.y, p = precision);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::Arc;

    fn node() -> TextNode {
        TextNode::new("unused", 10.0, 50.0, 20.0)
    }

    fn fixture_font() -> Arc<FontHandle> {
        let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .parent()
            .and_then(std::path::Path::parent)
            .map(|root| root.join("test-fonts/DejaVuSansMono.ttf"))
            .expect("workspace root exists");
        let bytes = std::fs::read(path).expect("fixture font readable");
        Arc::new(
            FontHandle::from_bytes("DejaVu Sans Mono", 400, bytes).expect("fixture font parses"),
        )
    }

    fn assembler_parts() -> (ShapingEngine, ClusterClassifier, HashMap<u32, u32>, BTreeMap<String, Option<String>>) {
        (
            ShapingEngine::new(),
            ClusterClassifier::new(),
            HashMap::new(),
            BTreeMap::new(),
        )
    }

    #[test]
    fn line_break_resets_x_and_advances_y() {
        let node = node();
        let (shaper, classifier, subst, art) = assembler_parts();
        let mut assembler = PathAssembler::new(&node, &shaper, &classifier, &subst, &art);

        assembler.push_run(
            &TextRun::Fallback {
                clusters: vec!["a".to_string()],
                script: Some(Script::Latin),
            },
            Direction::LeftToRight,
        );
        assert_eq!(assembler.cursor(), (10.0 + 12.0, 50.0));

        assembler.push_run(&TextRun::LineBreak, Direction::LeftToRight);
        assert_eq!(assembler.cursor(), (10.0, 50.0 + 24.0));
    }

    #[test]
    fn cjk_fallback_advances_a_full_em() {
        let node = node();
        let (shaper, classifier, subst, art) = assembler_parts();
        let mut assembler = PathAssembler::new(&node, &shaper, &classifier, &subst, &art);

        assembler.push_run(
            &TextRun::Fallback {
                clusters: vec!["漢".to_string()],
                script: Some(Script::Han),
            },
            Direction::LeftToRight,
        );
        assert_eq!(assembler.cursor().0, 10.0 + 20.0);
    }

    #[test]
    fn emoji_with_artwork_is_translated_and_scaled() {
        let node = node();
        let (shaper, classifier, subst, mut art) = assembler_parts();
        art.insert(
            "\u{1F600}".to_string(),
            Some("<circle cx=\"18\" cy=\"18\" r=\"18\"/>".to_string()),
        );
        let mut assembler = PathAssembler::new(&node, &shaper, &classifier, &subst, &art);

        assembler.push_run(
            &TextRun::Emoji {
                cluster: "\u{1F600}".to_string(),
            },
            Direction::LeftToRight,
        );

        let fragment = assembler.finish();
        // 36-unit art at font size 20: scale 20/36, box top 15 units above
        // the baseline at y=50.
        assert!(fragment.svg.contains("translate(10.00, 35.00) scale(0.56)"));
        assert!(fragment.svg.contains("<circle"));
        assert_eq!(fragment.width, 20.0);
    }

    #[test]
    fn emoji_without_artwork_gets_a_placeholder() {
        let node = node();
        let (shaper, classifier, subst, art) = assembler_parts();
        let mut assembler = PathAssembler::new(&node, &shaper, &classifier, &subst, &art);

        assembler.push_run(
            &TextRun::Emoji {
                cluster: "\u{1F680}".to_string(),
            },
            Direction::LeftToRight,
        );

        let fragment = assembler.finish();
        assert!(fragment.svg.contains("<rect"));
        assert_eq!(fragment.width, 20.0);
    }

    #[test]
    fn fallback_text_is_escaped() {
        let node = node();
        let (shaper, classifier, subst, art) = assembler_parts();
        let mut assembler = PathAssembler::new(&node, &shaper, &classifier, &subst, &art);

        assembler.push_run(
            &TextRun::Fallback {
                clusters: vec!["<".to_string()],
                script: None,
            },
            Direction::LeftToRight,
        );

        let fragment = assembler.finish();
        assert!(fragment.svg.contains("&lt;"));
        assert!(!fragment.svg.contains("><<"));
    }

    #[test]
    fn middle_anchor_wraps_with_half_width_shift() {
        let mut node = node();
        node.anchor = Anchor::Middle;
        let (shaper, classifier, subst, art) = assembler_parts();
        let mut assembler = PathAssembler::new(&node, &shaper, &classifier, &subst, &art);

        assembler.push_run(
            &TextRun::Emoji {
                cluster: "\u{1F600}".to_string(),
            },
            Direction::LeftToRight,
        );

        let fragment = assembler.finish();
        assert!(fragment.svg.starts_with("<g transform=\"translate(-10.00)\">"));
        assert!(fragment.svg.ends_with("</g>"));
    }

    #[test]
    fn end_anchor_shifts_by_full_width() {
        let mut node = node();
        node.anchor = Anchor::End;
        let (shaper, classifier, subst, art) = assembler_parts();
        let mut assembler = PathAssembler::new(&node, &shaper, &classifier, &subst, &art);

        assembler.push_run(
            &TextRun::Emoji {
                cluster: "\u{1F600}".to_string(),
            },
            Direction::LeftToRight,
        );

        let fragment = assembler.finish();
        assert!(fragment.svg.starts_with("<g transform=\"translate(-20.00)\">"));
    }

    #[test]
    fn shaped_glyphs_advance_the_cursor_rightward() {
        let node = node();
        let (shaper, classifier, subst, art) = assembler_parts();
        let mut assembler = PathAssembler::new(&node, &shaper, &classifier, &subst, &art);

        assembler.push_run(
            &TextRun::Text {
                font: fixture_font(),
                text: "Hi".to_string(),
                is_primary: true,
            },
            Direction::LeftToRight,
        );

        let (x, y) = assembler.cursor();
        assert!(x > 10.0);
        assert_eq!(y, 50.0);
        let fragment = assembler.finish();
        assert_eq!(fragment.svg.matches("<path").count(), 2);
    }

    #[test]
    fn substitutions_apply_only_to_primary_runs() {
        let node = node();
        let (shaper, classifier, _, art) = assembler_parts();
        let font = fixture_font();
        let from = font.glyph_id('H').expect("H is mapped");
        let to = font.glyph_id('o').expect("o is mapped");
        let table = HashMap::from([(from, to)]);
        let empty = HashMap::new();

        let render = |substitutions: &HashMap<u32, u32>, is_primary: bool| {
            let mut assembler =
                PathAssembler::new(&node, &shaper, &classifier, substitutions, &art);
            assembler.push_run(
                &TextRun::Text {
                    font: Arc::clone(&font),
                    text: "H".to_string(),
                    is_primary,
                },
                Direction::LeftToRight,
            );
            assembler.finish().svg
        };

        // A fallback-font run ignores the table entirely; a primary run
        // draws the alternate outline.
        assert_eq!(render(&table, false), render(&empty, false));
        assert_ne!(render(&table, true), render(&empty, true));
    }

    #[test]
    fn path_serialization_matches_svg_grammar() {
        let mut path = BezPath::new();
        path.move_to((0.0, 0.0));
        path.line_to((10.0, 0.0));
        path.quad_to((15.0, 5.0), (10.0, 10.0));
        path.close_path();
        assert_eq!(
            path_to_string(&path, 2),
            "M0.00,0.00 L10.00,0.00 Q15.00,5.00 10.00,10.00 Z"
        );
    }

    #[test]
    fn xml_escape_covers_markup_characters() {
        assert_eq!(xml_escape("a&b<c>\"d'"), "a&amp;b&lt;c&gt;&quot;d&apos;");
        assert_eq!(xml_escape("plain"), "plain");
    }
}
