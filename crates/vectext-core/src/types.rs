//! The data structures that flow through the layout pipeline.

/// Unique identifier for a glyph within a font.
pub type GlyphId = u32;

/// Which way a resolved run of text flows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    LeftToRight,
    RightToLeft,
}

impl Direction {
    pub fn is_rtl(self) -> bool {
        matches!(self, Direction::RightToLeft)
    }
}

/// A maximal substring with a uniform resolved bidi direction.
///
/// Runs partition the input text: no gaps, no overlaps, and concatenating
/// `text[start..end]` for every run in logical order reproduces the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BidiRun {
    /// Byte offset of the run start in the source text.
    pub start: usize,
    /// Byte offset one past the run end.
    pub end: usize,
    pub direction: Direction,
}

/// One glyph as the shaper positioned it, in font units.
///
/// Offsets are relative to the pen position; the caller scales by
/// `font_size / units_per_em` when placing the glyph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapedGlyph {
    pub glyph_id: GlyphId,
    pub x_advance: f32,
    pub y_advance: f32,
    pub x_offset: f32,
    pub y_offset: f32,
}

/// Horizontal anchoring of the assembled fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Anchor {
    #[default]
    Start,
    Middle,
    End,
}

/// A styled text node as extracted by the document-parsing collaborator.
#[derive(Debug, Clone)]
pub struct TextNode {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub font_size: f32,
    /// CSS color string applied to emitted paths.
    pub fill: String,
    pub font_weight: u16,
    pub anchor: Anchor,
    /// OpenType feature tags requested for the primary font (e.g. "ss01").
    pub feature_tags: Vec<String>,
}

impl TextNode {
    pub fn new(text: impl Into<String>, x: f32, y: f32, font_size: f32) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            font_size,
            fill: "#000000".to_string(),
            font_weight: 400,
            anchor: Anchor::Start,
            feature_tags: Vec::new(),
        }
    }
}
