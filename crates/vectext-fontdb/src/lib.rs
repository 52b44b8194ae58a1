//! Fonts for the vectext pipeline: handles, caching, and script fallback.
//!
//! Font bytes arrive from the host through the `FontBytesProvider`
//! collaborator; this crate owns everything after that byte boundary. A
//! [`FontHandle`] stores the raw data and creates parsed views on demand,
//! which keeps handles cheap to share and avoids leaking 'static references.
//!
//! The [`cache::FontCache`] is the only state shared across concurrent
//! render calls: append-only, keyed by (family, weight), with concurrent
//! requests for one key coalesced into a single provider call.

pub mod cache;
pub mod resolver;
pub mod subst;

#[cfg(test)]
pub(crate) mod test_font;

pub use cache::{FontCache, FontKey};
pub use resolver::{FontResolver, ScriptFontTable};
pub use subst::build_substitution_table;

use kurbo::BezPath;
use skrifa::instance::{LocationRef, Size};
use skrifa::outline::{DrawSettings, OutlinePen};
use skrifa::{FontRef, GlyphId, MetadataProvider};
use vectext_core::error::FontLoadError;

use read_fonts::TableProvider;

/// A loaded font, shared and immutable once constructed.
///
/// Stores the raw font data and creates `FontRef` on demand for parsing.
/// Exposes exactly what the pipeline needs: units-per-em, character mapping,
/// outline extraction, and (via [`subst`]) the GSUB feature walk.
pub struct FontHandle {
    family: String,
    weight: u16,
    data: Vec<u8>,
    units_per_em: u16,
}

impl FontHandle {
    /// Validate raw bytes and wrap them into a handle.
    pub fn from_bytes(family: &str, weight: u16, data: Vec<u8>) -> Result<Self, FontLoadError> {
        let font_ref = FontRef::new(&data).map_err(|_| FontLoadError::InvalidData {
            family: family.to_string(),
        })?;

        // A zero units-per-em would poison every downstream scale factor,
        // so it gets the same default as a missing head table.
        let units_per_em = match font_ref.head() {
            Ok(head) if head.units_per_em() != 0 => head.units_per_em(),
            _ => 1000,
        };

        Ok(Self {
            family: family.to_string(),
            weight,
            data,
            units_per_em,
        })
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    pub fn weight(&self) -> u16 {
        self.weight
    }

    /// Raw font bytes as provided by the host.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// The font's internal coordinate grid size.
    pub fn units_per_em(&self) -> u16 {
        self.units_per_em
    }

    fn font_ref(&self) -> Option<FontRef<'_>> {
        FontRef::new(&self.data).ok()
    }

    /// Finds which glyph draws this character.
    pub fn glyph_id(&self, ch: char) -> Option<u32> {
        self.font_ref()
            .and_then(|font| font.charmap().map(ch).map(|gid| gid.to_u32()))
    }

    /// Extract a glyph outline in font units, Y-up.
    ///
    /// The caller applies `scale(s, -s)` when placing the path in Y-down
    /// document space, so no flipping happens here.
    pub fn glyph_outline(&self, glyph_id: u32) -> Option<BezPath> {
        let font = self.font_ref()?;
        let outlines = font.outline_glyphs();
        let glyph = outlines.get(GlyphId::new(glyph_id))?;

        let mut pen = BezPathPen::default();
        let settings = DrawSettings::unhinted(Size::unscaled(), LocationRef::default());
        glyph.draw(settings, &mut pen).ok()?;

        let path = pen.finish();
        (!path.elements().is_empty()).then_some(path)
    }
}

impl std::fmt::Debug for FontHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontHandle")
            .field("family", &self.family)
            .field("weight", &self.weight)
            .field("units_per_em", &self.units_per_em)
            .field("bytes", &self.data.len())
            .finish()
    }
}

/// Records skrifa pen callbacks straight into a `kurbo::BezPath`.
#[derive(Default)]
struct BezPathPen {
    path: BezPath,
}

impl BezPathPen {
    fn finish(self) -> BezPath {
        self.path
    }
}

impl OutlinePen for BezPathPen {
    fn move_to(&mut self, x: f32, y: f32) {
        self.path.move_to((x as f64, y as f64));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.path.line_to((x as f64, y as f64));
    }

    fn quad_to(&mut self, cx0: f32, cy0: f32, x: f32, y: f32) {
        self.path
            .quad_to((cx0 as f64, cy0 as f64), (x as f64, y as f64));
    }

    fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32) {
        self.path.curve_to(
            (cx0 as f64, cy0 as f64),
            (cx1 as f64, cy1 as f64),
            (x as f64, y as f64),
        );
    }

    fn close(&mut self) {
        self.path.close_path();
    }
}
