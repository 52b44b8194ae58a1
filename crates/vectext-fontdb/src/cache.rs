//! The process-wide font cache: append-only, coalescing, keyed by
//! (family, weight).
//!
//! Concurrency contract: N callers racing on the same key result in exactly
//! one `FontBytesProvider` call. The per-key `OnceCell` provides both the
//! coalescing (late arrivals block on the in-flight load) and the
//! first-writer-wins guarantee. Entries are never replaced or evicted for
//! the cache's lifetime; a terminal load failure is cached as `None` so a
//! dead family is not re-fetched on every render.

use dashmap::DashMap;
use once_cell::sync::OnceCell;
use std::sync::Arc;
use vectext_core::traits::FontBytesProvider;

use crate::FontHandle;

/// Cache key: family identifier plus weight.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct FontKey {
    pub family: String,
    pub weight: u16,
}

type Slot = Arc<OnceCell<Option<Arc<FontHandle>>>>;

/// Coalescing font cache backed by a `FontBytesProvider`.
///
/// Created with the layout engine and shared across its render calls; this
/// is deliberately an explicit service instance, not ambient global state.
pub struct FontCache {
    provider: Arc<dyn FontBytesProvider>,
    entries: DashMap<FontKey, Slot>,
}

impl FontCache {
    pub fn new(provider: Arc<dyn FontBytesProvider>) -> Self {
        Self {
            provider,
            entries: DashMap::new(),
        }
    }

    /// Return the cached handle for (family, weight), loading it through the
    /// provider on first request. `None` means the load failed terminally;
    /// callers treat that as "advance the candidate chain".
    pub fn get_or_load(&self, family: &str, weight: u16) -> Option<Arc<FontHandle>> {
        let key = FontKey {
            family: family.to_string(),
            weight,
        };
        let slot = self.entries.entry(key).or_default().clone();

        slot.get_or_init(|| self.load(family, weight)).clone()
    }

    /// Seed the cache with an already-constructed handle (document-embedded
    /// primary fonts). First writer wins; a racing entry is left in place.
    pub fn insert_handle(&self, handle: Arc<FontHandle>) {
        let key = FontKey {
            family: handle.family().to_string(),
            weight: handle.weight(),
        };
        let slot = self.entries.entry(key).or_default().clone();
        let _ = slot.set(Some(handle));
    }

    /// Number of keys ever requested (loaded or failed).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn load(&self, family: &str, weight: u16) -> Option<Arc<FontHandle>> {
        let bytes = match self.provider.load_font_bytes(family, weight) {
            Ok(bytes) => bytes,
            Err(err) => {
                log::warn!("font load failed for '{family}' weight {weight}: {err}");
                return None;
            }
        };

        match FontHandle::from_bytes(family, weight, bytes) {
            Ok(handle) => {
                log::debug!("font cache: loaded '{family}' weight {weight}");
                Some(Arc::new(handle))
            }
            Err(err) => {
                log::warn!("font parse failed for '{family}' weight {weight}: {err}");
                None
            }
        }
    }
}
