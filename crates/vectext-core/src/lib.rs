//! Vectext Core: the shared vocabulary of the layout pipeline
//!
//! Text enters as a styled node from a vector document and leaves as
//! positioned glyph geometry. This crate holds everything the stages agree
//! on to make that happen:
//!
//! - [`types`] - the data that flows between stages
//! - [`error`] - the failure taxonomy and recovery contract
//! - [`traits`] - seams to the external collaborators (font bytes, emoji art)
//! - [`cancel`] - the token threaded through the prefetch batches
//!
//! The pipeline itself lives in `vectext-layout`; the stages it orchestrates
//! live in `vectext-unicode`, `vectext-fontdb`, and `vectext-shape`.

pub mod cancel;
pub mod error;
pub mod traits;
pub mod types;

pub use cancel::CancelToken;
pub use error::{EmojiFetchError, FontLoadError, LayoutError, Result, ShapingError};
pub use traits::{EmojiArtProvider, FontBytesProvider};
