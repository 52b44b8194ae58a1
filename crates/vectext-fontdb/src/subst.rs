//! Stylistic substitution tables from GSUB single-substitution lookups.
//!
//! For each requested feature tag this walks the font's GSUB feature records
//! and collects `default glyph id -> alternate glyph id` pairs from
//! single-substitution lookups (formats 1 and 2, including ones wrapped in
//! extension lookups). Ligature and contextual lookups are left entirely to
//! the shaping engine.
//!
//! The resulting table is applied only to glyphs shaped with the primary
//! document font; script and generic fallback fonts are never remapped.

use read_fonts::tables::gsub::{ExtensionSubtable, SingleSubst, SubstitutionLookup};
use read_fonts::types::Tag;
use read_fonts::{FontRef, TableProvider};
use std::collections::HashMap;

use crate::FontHandle;

/// Build the default→alternate glyph map for the requested feature tags.
///
/// Unknown tags, fonts without GSUB, and malformed subtables all degrade to
/// an empty (or partial) map; substitution is best-effort and never fails a
/// render.
pub fn build_substitution_table(font: &FontHandle, features: &[String]) -> HashMap<u32, u32> {
    let mut table = HashMap::new();
    if features.is_empty() {
        return table;
    }

    let wanted: Vec<Tag> = features
        .iter()
        .filter_map(|tag| Tag::new_checked(tag.as_bytes()).ok())
        .collect();
    if wanted.is_empty() {
        return table;
    }

    let Ok(font_ref) = FontRef::new(font.data()) else {
        return table;
    };
    let Ok(gsub) = font_ref.gsub() else {
        return table;
    };
    let (Ok(feature_list), Ok(lookup_list)) = (gsub.feature_list(), gsub.lookup_list()) else {
        return table;
    };

    for record in feature_list.feature_records() {
        if !wanted.contains(&record.feature_tag()) {
            continue;
        }
        let Ok(feature) = record.feature(feature_list.offset_data()) else {
            continue;
        };

        for index in feature.lookup_list_indices() {
            let Ok(lookup) = lookup_list.lookups().get(index.get() as usize) else {
                continue;
            };

            match lookup {
                SubstitutionLookup::Single(single) => {
                    for subtable in single.subtables().iter().flatten() {
                        collect_single(&subtable, &mut table);
                    }
                }
                SubstitutionLookup::Extension(extension) => {
                    for subtable in extension.subtables().iter().flatten() {
                        if let ExtensionSubtable::Single(wrapper) = subtable {
                            if let Ok(single) = wrapper.extension() {
                                collect_single(&single, &mut table);
                            }
                        }
                    }
                }
                // Ligature/contextual substitution belongs to the shaper.
                _ => {}
            }
        }
    }

    table
}

fn collect_single(subtable: &SingleSubst<'_>, table: &mut HashMap<u32, u32>) {
    match subtable {
        SingleSubst::Format1(format1) => {
            let Ok(coverage) = format1.coverage() else {
                return;
            };
            let delta = i32::from(format1.delta_glyph_id());
            for glyph in coverage.iter() {
                let from = glyph.to_u32();
                // OpenType glyph id arithmetic wraps modulo 65536.
                let to = ((from as i32 + delta) & 0xFFFF) as u32;
                table.entry(from).or_insert(to);
            }
        }
        SingleSubst::Format2(format2) => {
            let Ok(coverage) = format2.coverage() else {
                return;
            };
            let substitutes = format2.substitute_glyph_ids();
            for (index, glyph) in coverage.iter().enumerate() {
                if let Some(substitute) = substitutes.get(index) {
                    table
                        .entry(glyph.to_u32())
                        .or_insert_with(|| substitute.get().to_u32());
                }
            }
        }
    }
}

/// Remap shaped glyph ids through a substitution table.
///
/// Identity for glyphs without an entry.
pub fn apply_substitutions(table: &HashMap<u32, u32>, glyph_id: u32) -> u32 {
    table.get(&glyph_id).copied().unwrap_or(glyph_id)
}
