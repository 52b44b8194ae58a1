//! Error types for vectext.
//!
//! The recovery contract: failures scoped to one cluster or run degrade that
//! cluster or run and never escalate past it. Only malformed top-level input
//! and cancellation are fatal for a render.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, LayoutError>;

/// Render-level errors. Anything here aborts the current render call.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Render cancelled before completion")]
    Cancelled,

    #[error("Primary font rejected: {0}")]
    PrimaryFont(#[from] FontLoadError),
}

/// A candidate font failed to fetch or parse.
///
/// Recovered by advancing to the next candidate in the family chain; an
/// exhausted chain degrades the affected clusters to native-text fallback.
#[derive(Debug, Clone, Error)]
pub enum FontLoadError {
    #[error("Provider failed for '{family}' weight {weight}: {reason}")]
    Provider {
        family: String,
        weight: u16,
        reason: String,
    },

    #[error("Invalid font data for '{family}'")]
    InvalidData { family: String },
}

/// The shaper rejected a run.
///
/// Recovered by rendering the run's clusters individually via native-text
/// fallback.
#[derive(Debug, Clone, Error)]
pub enum ShapingError {
    #[error("Font data could not be parsed by the shaper")]
    InvalidFont,

    #[error("Shaper backend error: {0}")]
    Backend(String),
}

/// Emoji artwork retrieval failed for one cluster.
///
/// Recovered per-cluster with a placeholder; sibling clusters are unaffected.
#[derive(Debug, Clone, Error)]
#[error("Emoji artwork fetch failed for '{cluster}': {reason}")]
pub struct EmojiFetchError {
    pub cluster: String,
    pub reason: String,
}
