//! Diagnostics
//!
//! Read-only dumps of arena contents for external visualization; the
//! free-list dump lives on [`crate::pool::ObjectPool`] itself.

pub mod graphviz;

pub use graphviz::dump_graphviz;
