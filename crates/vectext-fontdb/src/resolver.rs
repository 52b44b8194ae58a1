//! Script-to-family mapping and chain-walking font resolution.

use icu_properties::props::Script;
use parking_lot::RwLock;
use std::sync::Arc;

use crate::cache::FontCache;
use crate::FontHandle;

/// Ordered script → prioritized family list.
///
/// This is the configuration surface an embedding host mutates to steer
/// fallback; the defaults cover the scripts the stock artwork set ships
/// fonts for. First entry for a script wins when candidates tie.
#[derive(Debug, Clone)]
pub struct ScriptFontTable {
    entries: Vec<(Script, Vec<String>)>,
}

impl ScriptFontTable {
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Candidate families for a script, highest priority first.
    pub fn families(&self, script: Script) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(entry, _)| *entry == script)
            .map(|(_, families)| families.as_slice())
    }

    /// Replace (or add) the candidate chain for a script.
    pub fn set_families(&mut self, script: Script, families: Vec<String>) {
        match self.entries.iter_mut().find(|(entry, _)| *entry == script) {
            Some((_, existing)) => *existing = families,
            None => self.entries.push((script, families)),
        }
    }

}

impl Default for ScriptFontTable {
    fn default() -> Self {
        fn chain(families: &[&str]) -> Vec<String> {
            families.iter().map(|family| (*family).to_string()).collect()
        }

        Self {
            entries: vec![
                (Script::Arabic, chain(&["Noto Naskh Arabic", "Noto Sans Arabic"])),
                (Script::Hebrew, chain(&["Noto Sans Hebrew"])),
                (Script::Devanagari, chain(&["Noto Sans Devanagari"])),
                (Script::Bengali, chain(&["Noto Sans Bengali"])),
                (Script::Gurmukhi, chain(&["Noto Sans Gurmukhi"])),
                (Script::Gujarati, chain(&["Noto Sans Gujarati"])),
                (Script::Tamil, chain(&["Noto Sans Tamil"])),
                (Script::Telugu, chain(&["Noto Sans Telugu"])),
                (Script::Kannada, chain(&["Noto Sans Kannada"])),
                (Script::Malayalam, chain(&["Noto Sans Malayalam"])),
                (Script::Sinhala, chain(&["Noto Sans Sinhala"])),
                (Script::Thai, chain(&["Noto Sans Thai"])),
                (Script::Lao, chain(&["Noto Sans Lao"])),
                (Script::Khmer, chain(&["Noto Sans Khmer"])),
                (Script::Myanmar, chain(&["Noto Sans Myanmar"])),
                (Script::Ethiopic, chain(&["Noto Sans Ethiopic"])),
                (Script::Georgian, chain(&["Noto Sans Georgian"])),
                (Script::Armenian, chain(&["Noto Sans Armenian"])),
                (Script::Han, chain(&["Noto Sans SC", "Noto Sans TC"])),
                (Script::Hiragana, chain(&["Noto Sans JP"])),
                (Script::Katakana, chain(&["Noto Sans JP"])),
                (Script::Hangul, chain(&["Noto Sans KR"])),
            ],
        }
    }
}

/// Scripts whose fallback text advances a full em (square glyphs).
pub fn is_cjk_class(script: Script) -> bool {
    matches!(
        script,
        Script::Han | Script::Hiragana | Script::Katakana | Script::Hangul | Script::Bopomofo
    )
}

/// CSS font-family string for native-text fallback nodes, derived from the
/// cluster's script classification.
pub fn css_fallback_family(script: Option<Script>) -> &'static str {
    match script {
        Some(Script::Han) | Some(Script::Hiragana) | Some(Script::Katakana) => {
            "'Noto Sans CJK SC', 'Hiragino Sans', sans-serif"
        }
        Some(Script::Hangul) => "'Noto Sans CJK KR', 'Apple SD Gothic Neo', sans-serif",
        Some(Script::Arabic) => "'Noto Naskh Arabic', 'Geeza Pro', sans-serif",
        Some(Script::Hebrew) => "'Noto Sans Hebrew', 'Arial Hebrew', sans-serif",
        Some(Script::Thai) => "'Noto Sans Thai', 'Thonburi', sans-serif",
        Some(Script::Devanagari) => "'Noto Sans Devanagari', 'Devanagari MT', sans-serif",
        _ => "sans-serif",
    }
}

/// Walks a script's family chain against the coalescing cache.
pub struct FontResolver {
    table: RwLock<ScriptFontTable>,
    cache: Arc<FontCache>,
}

impl FontResolver {
    pub fn new(cache: Arc<FontCache>, table: ScriptFontTable) -> Self {
        Self {
            table: RwLock::new(table),
            cache,
        }
    }

    /// Candidate families for a script, or `None` when the table has no
    /// entry (primary-font territory).
    pub fn candidate_families(&self, script: Script) -> Option<Vec<String>> {
        self.table.read().families(script).map(<[String]>::to_vec)
    }

    /// Mutate the script table (external configuration surface).
    pub fn set_families(&self, script: Script, families: Vec<String>) {
        self.table.write().set_families(script, families);
    }

    /// Resolve a script to a loaded font, advancing through the candidate
    /// chain on load failure. An exhausted chain yields `None`: a fallback
    /// signal for downstream, never an abort.
    pub fn resolve_script(&self, script: Script, weight: u16) -> Option<Arc<FontHandle>> {
        let candidates = self.candidate_families(script)?;

        for family in &candidates {
            if let Some(handle) = self.cache.get_or_load(family, weight) {
                return Some(handle);
            }
        }

        log::warn!("font chain exhausted for script {script:?} weight {weight}");
        None
    }
}
