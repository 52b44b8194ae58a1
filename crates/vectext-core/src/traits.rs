//! Seams to the external collaborators.
//!
//! The layout engine never does file or network I/O itself. Font bytes and
//! emoji artwork arrive through these traits; hosts plug in whatever source
//! they have (network, bundle, document-embedded).

use crate::error::{EmojiFetchError, FontLoadError};

/// Supplies raw font bytes for a (family, weight) request.
///
/// Implementations must be safe to call from the concurrent prefetch batch.
/// The cache in `vectext-fontdb` guarantees at most one call per distinct
/// (family, weight) key for the lifetime of the cache.
pub trait FontBytesProvider: Send + Sync {
    fn load_font_bytes(&self, family: &str, weight: u16) -> Result<Vec<u8>, FontLoadError>;
}

/// Supplies vector artwork for an emoji grapheme cluster.
///
/// Returns `Ok(None)` when no artwork exists for the cluster; the assembler
/// emits a placeholder in that case. Artwork is SVG markup in a 36-unit
/// square coordinate space.
pub trait EmojiArtProvider: Send + Sync {
    fn fetch_art(&self, cluster: &str) -> Result<Option<String>, EmojiFetchError>;
}
