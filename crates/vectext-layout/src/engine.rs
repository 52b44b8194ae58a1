//! The layout engine facade: prefetch, segment, shape, assemble.
//!
//! `render_node` is the one entry point hosts call. Renders are independent
//! and safe to issue concurrently; the font cache is the only shared state
//! and it is append-only. Each render runs two prefetch batches in parallel
//! (emoji artwork and fonts), joins them, then performs the synchronous
//! layout pass with every remote resource already in hand.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use icu_properties::props::Script;
use rayon::prelude::*;

use vectext_core::cancel::CancelToken;
use vectext_core::error::{LayoutError, Result};
use vectext_core::traits::{EmojiArtProvider, FontBytesProvider};
use vectext_core::types::TextNode;
use vectext_fontdb::{build_substitution_table, FontCache, FontHandle, FontResolver, ScriptFontTable};
use vectext_shape::ShapingEngine;
use vectext_unicode::{graphemes, resolve_runs, ClusterClass, ClusterClassifier};

use crate::assemble::{LayoutFragment, PathAssembler};
use crate::runs::{segment_bidi_run, ResolvedFonts};

/// Family tried when neither a script entry nor the primary font applies.
const DEFAULT_GENERIC_FAMILY: &str = "Noto Sans";

/// Orchestrates a full text render. Construct once via [`builder`],
/// share behind an `Arc`, call [`render_node`] per text node.
///
/// [`builder`]: TextLayoutEngine::builder
/// [`render_node`]: TextLayoutEngine::render_node
pub struct TextLayoutEngine {
    cache: Arc<FontCache>,
    resolver: FontResolver,
    shaper: ShapingEngine,
    classifier: ClusterClassifier,
    emoji_provider: Arc<dyn EmojiArtProvider>,
    primary: Option<Arc<FontHandle>>,
    generic_family: String,
}

impl TextLayoutEngine {
    pub fn builder(
        font_provider: Arc<dyn FontBytesProvider>,
        emoji_provider: Arc<dyn EmojiArtProvider>,
    ) -> TextLayoutEngineBuilder {
        TextLayoutEngineBuilder {
            font_provider,
            emoji_provider,
            script_table: ScriptFontTable::default(),
            primary_font: None,
            generic_family: DEFAULT_GENERIC_FAMILY.to_string(),
        }
    }

    /// Replace the candidate family chain for a script at runtime.
    pub fn set_script_families(&self, script: Script, families: Vec<String>) {
        self.resolver.set_families(script, families);
    }

    pub fn font_cache(&self) -> &Arc<FontCache> {
        &self.cache
    }

    /// Lay out one text node into an SVG fragment.
    ///
    /// Fails only on malformed input or cancellation; every resource-level
    /// failure (fonts, artwork, shaping) degrades the affected clusters and
    /// the render still completes.
    pub fn render_node(&self, node: &TextNode, cancel: &CancelToken) -> Result<LayoutFragment> {
        validate(node)?;
        if node.text.is_empty() {
            return Ok(LayoutFragment {
                svg: String::new(),
                width: 0.0,
            });
        }
        cancel.check()?;

        let bidi_runs = resolve_runs(&node.text);

        // Pre-scan: collect what the prefetch batches need to pull in.
        let mut emoji: BTreeSet<String> = BTreeSet::new();
        let mut scripts: Vec<Script> = Vec::new();
        for run in &bidi_runs {
            for cluster in graphemes(&node.text[run.start..run.end]) {
                match self.classifier.classify(cluster) {
                    ClusterClass::Emoji => {
                        emoji.insert(cluster.to_string());
                    }
                    ClusterClass::Script(script) if !scripts.contains(&script) => {
                        scripts.push(script);
                    }
                    _ => {}
                }
            }
        }

        let (emoji_art, fonts) = rayon::join(
            || self.fetch_emoji_batch(&emoji, cancel),
            || self.load_font_batch(&scripts, node.font_weight, cancel),
        );
        // A cancelled render surfaces no partial output, even though both
        // batches ran to completion.
        cancel.check()?;

        let substitutions = match (&self.primary, node.feature_tags.is_empty()) {
            (Some(primary), false) => build_substitution_table(primary, &node.feature_tags),
            _ => HashMap::new(),
        };

        let mut assembler =
            PathAssembler::new(node, &self.shaper, &self.classifier, &substitutions, &emoji_art);
        for run in &bidi_runs {
            let segment = &node.text[run.start..run.end];
            for text_run in segment_bidi_run(segment, run.direction, &self.classifier, &fonts) {
                assembler.push_run(&text_run, run.direction);
            }
        }

        Ok(assembler.finish())
    }

    /// Fetch artwork for every distinct emoji cluster, concurrently.
    /// Failures degrade to `None` (a placeholder downstream), and a tripped
    /// token skips the remaining fetches.
    fn fetch_emoji_batch(
        &self,
        clusters: &BTreeSet<String>,
        cancel: &CancelToken,
    ) -> BTreeMap<String, Option<String>> {
        clusters
            .par_iter()
            .map(|cluster| {
                if cancel.is_cancelled() {
                    return (cluster.clone(), None);
                }
                let art = match self.emoji_provider.fetch_art(cluster) {
                    Ok(art) => art,
                    Err(err) => {
                        log::warn!("{err}");
                        None
                    }
                };
                (cluster.clone(), art)
            })
            .collect()
    }

    /// Resolve every script chain plus the generic fallback, concurrently.
    fn load_font_batch(
        &self,
        scripts: &[Script],
        weight: u16,
        cancel: &CancelToken,
    ) -> ResolvedFonts {
        let generic = (!cancel.is_cancelled())
            .then(|| self.cache.get_or_load(&self.generic_family, weight))
            .flatten();
        let mut fonts = ResolvedFonts::new(self.primary.clone(), generic);

        let resolved: Vec<(Script, Option<Arc<FontHandle>>)> = scripts
            .par_iter()
            .map(|&script| {
                if cancel.is_cancelled() {
                    return (script, None);
                }
                (script, self.resolver.resolve_script(script, weight))
            })
            .collect();
        for (script, font) in resolved {
            fonts.set_script_font(script, font);
        }

        fonts
    }
}

fn validate(node: &TextNode) -> Result<()> {
    if !node.x.is_finite() || !node.y.is_finite() {
        return Err(LayoutError::InvalidInput(
            "text node position must be finite".to_string(),
        ));
    }
    if !node.font_size.is_finite() || node.font_size <= 0.0 {
        return Err(LayoutError::InvalidInput(format!(
            "font size must be positive, got {}",
            node.font_size
        )));
    }
    Ok(())
}

/// Configures and constructs a [`TextLayoutEngine`].
pub struct TextLayoutEngineBuilder {
    font_provider: Arc<dyn FontBytesProvider>,
    emoji_provider: Arc<dyn EmojiArtProvider>,
    script_table: ScriptFontTable,
    primary_font: Option<(String, u16, Vec<u8>)>,
    generic_family: String,
}

impl TextLayoutEngineBuilder {
    /// Replace the default script-to-family table.
    pub fn script_table(mut self, table: ScriptFontTable) -> Self {
        self.script_table = table;
        self
    }

    /// Register document-embedded primary font bytes. Validated at build
    /// time; a rejected primary font fails construction rather than every
    /// render after it.
    pub fn primary_font(mut self, family: impl Into<String>, weight: u16, bytes: Vec<u8>) -> Self {
        self.primary_font = Some((family.into(), weight, bytes));
        self
    }

    /// Family used as the last resort before native-text fallback.
    pub fn generic_family(mut self, family: impl Into<String>) -> Self {
        self.generic_family = family.into();
        self
    }

    pub fn build(self) -> Result<TextLayoutEngine> {
        let cache = Arc::new(FontCache::new(self.font_provider));

        let primary = match self.primary_font {
            Some((family, weight, bytes)) => {
                let handle = Arc::new(FontHandle::from_bytes(&family, weight, bytes)?);
                cache.insert_handle(Arc::clone(&handle));
                Some(handle)
            }
            None => None,
        };

        Ok(TextLayoutEngine {
            resolver: FontResolver::new(Arc::clone(&cache), self.script_table),
            cache,
            shaper: ShapingEngine::new(),
            classifier: ClusterClassifier::new(),
            emoji_provider: self.emoji_provider,
            primary,
            generic_family: self.generic_family,
        })
    }
}
