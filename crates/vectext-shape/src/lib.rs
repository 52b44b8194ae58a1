//! Text shaping adapter over harfrust.
//!
//! Harfrust is a pure Rust port of HarfBuzz, so contextual substitution,
//! mark positioning, and joining forms come without any C dependencies.
//! This adapter's job is deliberately narrow: build the shaping input,
//! attach the explicit direction decided by the owning bidi run (never
//! re-guessed per character), forward the requested feature tags, and
//! normalize the output into font-unit [`ShapedGlyph`] records. Scaling to
//! document space is the assembler's business.

use std::collections::HashMap;

use harfrust::{
    Direction as HrDirection, Feature, FontRef as HrFontRef, ShaperData, Tag, UnicodeBuffer,
};

use vectext_core::error::ShapingError;
use vectext_core::types::{Direction, ShapedGlyph};
use vectext_fontdb::FontHandle;

/// Stateless shaping engine; construct once and share.
#[derive(Debug, Default)]
pub struct ShapingEngine;

impl ShapingEngine {
    pub fn new() -> Self {
        Self
    }

    /// Shape `text` with `font`, returning positioned glyphs in font units.
    ///
    /// `substitutions` is the primary-font stylistic table; pass `None` for
    /// script and fallback fonts. Failure is reported, never raised: the
    /// caller degrades the run to native-text fallback.
    pub fn shape(
        &self,
        font: &FontHandle,
        text: &str,
        features: &[String],
        direction: Direction,
        substitutions: Option<&HashMap<u32, u32>>,
    ) -> Result<Vec<ShapedGlyph>, ShapingError> {
        if text.is_empty() {
            return Ok(Vec::new());
        }

        let hr_font = HrFontRef::new(font.data()).map_err(|_| ShapingError::InvalidFont)?;

        // ShaperData caches font tables; shaping-engine invocations scale
        // with font switches, so rebuilding per run is acceptable here.
        let shaper_data = ShaperData::new(&hr_font);
        let shaper = shaper_data.shaper(&hr_font).build();

        let mut buffer = UnicodeBuffer::new();
        buffer.push_str(text);
        buffer.set_direction(to_hr_direction(direction));

        let features: Vec<Feature> = features
            .iter()
            .filter_map(|name| {
                let tag = parse_tag(name);
                if tag.is_none() {
                    log::warn!("ignoring malformed feature tag '{name}'");
                }
                tag.map(|tag| Feature {
                    tag,
                    value: 1,
                    start: 0,
                    end: u32::MAX,
                })
            })
            .collect();

        let output = shaper.shape(buffer, &features);

        let infos = output.glyph_infos();
        let positions = output.glyph_positions();
        let mut glyphs = Vec::with_capacity(infos.len());

        for (info, pos) in infos.iter().zip(positions.iter()) {
            let glyph_id = match substitutions {
                Some(table) => vectext_fontdb::subst::apply_substitutions(table, info.glyph_id),
                None => info.glyph_id,
            };
            glyphs.push(ShapedGlyph {
                glyph_id,
                x_advance: pos.x_advance as f32,
                y_advance: pos.y_advance as f32,
                x_offset: pos.x_offset as f32,
                y_offset: pos.y_offset as f32,
            });
        }

        Ok(glyphs)
    }
}

fn to_hr_direction(direction: Direction) -> HrDirection {
    match direction {
        Direction::LeftToRight => HrDirection::LeftToRight,
        Direction::RightToLeft => HrDirection::RightToLeft,
    }
}

/// Parse a 4-character tag string into a harfrust Tag.
fn parse_tag(tag_str: &str) -> Option<Tag> {
    let bytes = tag_str.as_bytes();
    if bytes.len() == 4 {
        Some(Tag::new(&[bytes[0], bytes[1], bytes[2], bytes[3]]))
    } else {
        None
    }
}
