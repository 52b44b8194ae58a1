//! Hand-assembled font binaries for tests.
//!
//! The pipeline never needs to write fonts, so rather than pulling in a
//! font-compilation dependency the tests build the few tables they exercise
//! byte by byte. The synthetic font carries exactly two tables: a `head`
//! with a configurable units-per-em, and a `GSUB` with one `ss01` feature
//! whose single lookup substitutes glyph 10 with glyph 42 (format 1,
//! delta +32).

fn be16(buf: &mut Vec<u8>, value: u16) {
    buf.extend_from_slice(&value.to_be_bytes());
}

fn be32(buf: &mut Vec<u8>, value: u32) {
    buf.extend_from_slice(&value.to_be_bytes());
}

fn gsub_table() -> Vec<u8> {
    let mut gsub = Vec::new();
    // Header 1.0; offsets are from the table start.
    be16(&mut gsub, 1); // majorVersion
    be16(&mut gsub, 0); // minorVersion
    be16(&mut gsub, 10); // scriptListOffset
    be16(&mut gsub, 12); // featureListOffset
    be16(&mut gsub, 26); // lookupListOffset

    // ScriptList: no scripts; the lookup is reached via the feature walk.
    be16(&mut gsub, 0);

    // FeatureList: one record, tag ss01, feature table 8 bytes in.
    be16(&mut gsub, 1);
    gsub.extend_from_slice(b"ss01");
    be16(&mut gsub, 8);
    // Feature table: no params, one lookup index (0).
    be16(&mut gsub, 0);
    be16(&mut gsub, 1);
    be16(&mut gsub, 0);

    // LookupList: one lookup 4 bytes in.
    be16(&mut gsub, 1);
    be16(&mut gsub, 4);
    // Lookup: type 1 (single substitution), one subtable 8 bytes in.
    be16(&mut gsub, 1);
    be16(&mut gsub, 0);
    be16(&mut gsub, 1);
    be16(&mut gsub, 8);
    // SingleSubstFormat1: coverage 6 bytes in, deltaGlyphID +32.
    be16(&mut gsub, 1);
    be16(&mut gsub, 6);
    be16(&mut gsub, 32);
    // Coverage format 1: the single glyph 10.
    be16(&mut gsub, 1);
    be16(&mut gsub, 1);
    be16(&mut gsub, 10);

    gsub
}

fn head_table(units_per_em: u16) -> Vec<u8> {
    let mut head = Vec::new();
    be16(&mut head, 1); // majorVersion
    be16(&mut head, 0); // minorVersion
    be32(&mut head, 0x0001_0000); // fontRevision 1.0
    be32(&mut head, 0); // checksumAdjustment
    be32(&mut head, 0x5F0F_3CF5); // magicNumber
    be16(&mut head, 0); // flags
    be16(&mut head, units_per_em);
    head.extend_from_slice(&[0u8; 8]); // created
    head.extend_from_slice(&[0u8; 8]); // modified
    be16(&mut head, 0); // xMin
    be16(&mut head, 0); // yMin
    be16(&mut head, 0); // xMax
    be16(&mut head, 0); // yMax
    be16(&mut head, 0); // macStyle
    be16(&mut head, 0); // lowestRecPPEM
    be16(&mut head, 2); // fontDirectionHint
    be16(&mut head, 0); // indexToLocFormat
    be16(&mut head, 0); // glyphDataFormat
    head
}

/// Build a minimal parsable font with the given units-per-em and a GSUB
/// `ss01` feature mapping glyph 10 to glyph 42.
pub fn synthetic_font(units_per_em: u16) -> Vec<u8> {
    let gsub = gsub_table();
    let head = head_table(units_per_em);

    // Table records must be sorted by tag for the directory lookup.
    let gsub_offset = 12 + 2 * 16;
    let head_offset = gsub_offset + gsub.len() + (4 - gsub.len() % 4) % 4;

    let mut font = Vec::new();
    be32(&mut font, 0x0001_0000); // sfnt version
    be16(&mut font, 2); // numTables
    be16(&mut font, 32); // searchRange
    be16(&mut font, 1); // entrySelector
    be16(&mut font, 0); // rangeShift

    font.extend_from_slice(b"GSUB");
    be32(&mut font, 0); // checksum, unchecked by the parser
    be32(&mut font, gsub_offset as u32);
    be32(&mut font, gsub.len() as u32);

    font.extend_from_slice(b"head");
    be32(&mut font, 0);
    be32(&mut font, head_offset as u32);
    be32(&mut font, head.len() as u32);

    font.extend_from_slice(&gsub);
    font.resize(head_offset, 0);
    font.extend_from_slice(&head);

    font
}

#[cfg(test)]
mod tests {
    use super::*;
    use read_fonts::{FontRef, TableProvider};

    #[test]
    fn synthetic_font_parses_with_both_tables() {
        let bytes = synthetic_font(1000);
        let font = FontRef::new(&bytes).expect("directory parses");
        assert_eq!(font.head().expect("head parses").units_per_em(), 1000);
        assert!(font.gsub().is_ok());
    }
}
