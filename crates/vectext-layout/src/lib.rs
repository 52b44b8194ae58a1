//! Vectext layout: from styled text node to positioned vector geometry.
//!
//! The orchestration lives here. A render call flows:
//!
//! 1. [`vectext_unicode::resolve_runs`] partitions the text by direction
//! 2. the prefetch batches load every required font and emoji artwork,
//!    joined before any synchronous work ([`engine::TextLayoutEngine`])
//! 3. [`runs::segment_bidi_run`] assigns a font source per cluster and
//!    merges adjacent clusters sharing one
//! 4. [`assemble::PathAssembler`] shapes text runs and emits the SVG
//!    fragment the host splices into its document
//!
//! Everything is created fresh per render except the font cache, which the
//! engine owns for its lifetime.

pub mod assemble;
pub mod engine;
pub mod runs;

pub use assemble::{LayoutFragment, PathAssembler};
pub use engine::{TextLayoutEngine, TextLayoutEngineBuilder};
pub use runs::{segment_bidi_run, ResolvedFonts, TextRun};
