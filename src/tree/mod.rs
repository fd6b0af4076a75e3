//! Generalized Tree
//!
//! First-child/next-sibling tree built entirely out of object-pool
//! identities. All structural mutation (insert, delete, splice, clone,
//! replace) lives here; the codec and diagnostics modules only read slot
//! contents or go through the same alloc/link primitives.

pub mod node;
pub mod tree;

pub use node::Node;
pub use tree::{Children, ReplaceOutcome, Tree};
