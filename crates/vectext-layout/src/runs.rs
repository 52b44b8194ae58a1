//! Per-cluster font source resolution and run merging.
//!
//! Works on one bidi run at a time: every grapheme cluster is assigned a
//! source (emoji artwork, a loaded font, or native-text fallback), then
//! adjacent clusters sharing a source merge into a single [`TextRun`].
//! Merging happens in logical order; for right-to-left runs the merged run
//! list is reversed afterwards so runs are emitted in visual order, with
//! fallback clusters reversed inside their run. Shaped text runs keep their
//! logical text because the shaper itself emits glyphs in visual order.

use std::sync::Arc;

use icu_properties::props::Script;
use vectext_core::types::Direction;
use vectext_fontdb::FontHandle;
use vectext_unicode::{graphemes, ClusterClass, ClusterClassifier};

/// Every font the current render can draw with, resolved ahead of the
/// synchronous pass. Script entries are the outcome of walking each
/// candidate chain; `None` records an exhausted chain.
#[derive(Debug, Default)]
pub struct ResolvedFonts {
    pub primary: Option<Arc<FontHandle>>,
    /// The generic fallback family, tried after the primary font.
    pub generic: Option<Arc<FontHandle>>,
    by_script: Vec<(Script, Option<Arc<FontHandle>>)>,
}

impl ResolvedFonts {
    pub fn new(primary: Option<Arc<FontHandle>>, generic: Option<Arc<FontHandle>>) -> Self {
        Self {
            primary,
            generic,
            by_script: Vec::new(),
        }
    }

    pub fn set_script_font(&mut self, script: Script, font: Option<Arc<FontHandle>>) {
        match self.by_script.iter_mut().find(|(s, _)| *s == script) {
            Some((_, existing)) => *existing = font,
            None => self.by_script.push((script, font)),
        }
    }

    pub fn script_font(&self, script: Script) -> Option<Arc<FontHandle>> {
        self.by_script
            .iter()
            .find(|(s, _)| *s == script)
            .and_then(|(_, font)| font.clone())
    }
}

/// A maximal group of adjacent clusters sharing one rendering source.
#[derive(Debug, Clone)]
pub enum TextRun {
    /// Explicit `\n`; resets the cursor to the next line.
    LineBreak,
    /// One emoji cluster, rendered from pre-fetched artwork.
    Emoji { cluster: String },
    /// Clusters shaped together with a loaded font.
    Text {
        font: Arc<FontHandle>,
        text: String,
        is_primary: bool,
    },
    /// Clusters with no loadable font, rendered as native text elements.
    /// `script` drives the CSS family hint and the advance estimate.
    Fallback {
        clusters: Vec<String>,
        script: Option<Script>,
    },
}

/// Where one cluster will be drawn from. The merge step folds equal
/// adjacent sources into runs.
#[derive(Clone)]
enum ClusterSource {
    LineBreak,
    Skip,
    Emoji,
    Font {
        font: Arc<FontHandle>,
        is_primary: bool,
    },
    Missing(Option<Script>),
}

impl ClusterSource {
    /// Sources a trailing neutral can inherit inside an RTL run.
    fn inheritable(&self) -> bool {
        matches!(self, ClusterSource::Font { .. } | ClusterSource::Missing(_))
    }
}

/// Segment one bidi run into renderable runs, in visual order.
pub fn segment_bidi_run(
    text: &str,
    direction: Direction,
    classifier: &ClusterClassifier,
    fonts: &ResolvedFonts,
) -> Vec<TextRun> {
    let mut runs: Vec<TextRun> = Vec::new();
    // Last font-bearing source, for neutral inheritance in RTL runs.
    let mut previous: Option<ClusterSource> = None;

    for cluster in graphemes(text) {
        let source = resolve_cluster(cluster, direction, classifier, fonts, previous.as_ref());
        if source.inheritable() {
            previous = Some(source.clone());
        }
        push_cluster(&mut runs, cluster, source);
    }

    if direction.is_rtl() {
        runs.reverse();
        for run in &mut runs {
            if let TextRun::Fallback { clusters, .. } = run {
                clusters.reverse();
            }
        }
    }

    runs
}

fn resolve_cluster(
    cluster: &str,
    direction: Direction,
    classifier: &ClusterClassifier,
    fonts: &ResolvedFonts,
    previous: Option<&ClusterSource>,
) -> ClusterSource {
    if cluster == "\n" || cluster == "\r\n" {
        return ClusterSource::LineBreak;
    }
    if cluster == "\r" {
        return ClusterSource::Skip;
    }

    match classifier.classify(cluster) {
        ClusterClass::Emoji => ClusterSource::Emoji,
        ClusterClass::Script(script) => fonts
            .script_font(script)
            .map(|font| ClusterSource::Font {
                font,
                is_primary: false,
            })
            .or_else(|| default_font(fonts))
            .unwrap_or(ClusterSource::Missing(Some(script))),
        ClusterClass::Neutral => {
            // Inside an RTL run a neutral binds to the preceding cluster so
            // punctuation stays with the word it follows.
            if direction.is_rtl() {
                if let Some(source) = previous {
                    return source.clone();
                }
            }
            default_font(fonts).unwrap_or(ClusterSource::Missing(None))
        }
        ClusterClass::Unclassified => {
            default_font(fonts).unwrap_or(ClusterSource::Missing(None))
        }
    }
}

/// Primary font, then the generic fallback family.
fn default_font(fonts: &ResolvedFonts) -> Option<ClusterSource> {
    if let Some(font) = &fonts.primary {
        return Some(ClusterSource::Font {
            font: Arc::clone(font),
            is_primary: true,
        });
    }
    fonts.generic.as_ref().map(|font| ClusterSource::Font {
        font: Arc::clone(font),
        is_primary: false,
    })
}

fn push_cluster(runs: &mut Vec<TextRun>, cluster: &str, source: ClusterSource) {
    match source {
        ClusterSource::Skip => {}
        ClusterSource::LineBreak => runs.push(TextRun::LineBreak),
        ClusterSource::Emoji => runs.push(TextRun::Emoji {
            cluster: cluster.to_string(),
        }),
        ClusterSource::Font { font, is_primary } => {
            if let Some(TextRun::Text {
                font: run_font,
                text,
                is_primary: run_primary,
            }) = runs.last_mut()
            {
                if Arc::ptr_eq(run_font, &font) && *run_primary == is_primary {
                    text.push_str(cluster);
                    return;
                }
            }
            runs.push(TextRun::Text {
                font,
                text: cluster.to_string(),
                is_primary,
            });
        }
        ClusterSource::Missing(script) => {
            if let Some(TextRun::Fallback {
                clusters,
                script: run_script,
            }) = runs.last_mut()
            {
                if *run_script == script {
                    clusters.push(cluster.to_string());
                    return;
                }
            }
            runs.push(TextRun::Fallback {
                clusters: vec![cluster.to_string()],
                script,
            });
        }
    }
}
