//! Text Codec
//!
//! Maps a subtree to and from a bracketed, line-oriented textual
//! grammar:
//!
//! ```text
//! node    := '{' payload children '}'
//! payload := '[' <payload-lines> ']'
//! children := node*
//! ```
//!
//! Structural tokens stand alone on their line (whitespace around them
//! is ignored); payload lines between `[` and `]` belong to the
//! externally supplied [`PayloadCodec`] hooks and are never interpreted
//! here.

pub mod payload;
pub mod restore;
pub mod store;

pub use payload::{is_token, LineSource, PayloadCodec, TextPayload};
pub use restore::{restore_subtree, restore_tree};
pub use store::{store_subtree, store_tree};
