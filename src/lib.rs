// ArborDB - Rust Implementation
// A generalized in-memory tree store over a slab object pool

#![warn(rust_2018_idioms)]

pub mod codec;
pub mod dump;
pub mod pool;
pub mod tree;

// Re-exports for convenience
pub use codec::{PayloadCodec, TextPayload};
pub use pool::{NodeId, ObjectPool};
pub use tree::{ReplaceOutcome, Tree};

/// ArborDB error types
pub mod error {
    use crate::pool::NodeId;
    use thiserror::Error;

    #[derive(Error, Debug)]
    pub enum Error {
        #[error("invalid node id {0}")]
        InvalidId(NodeId),

        #[error("position {pos} out of range ({count} children)")]
        InvalidPosition { pos: usize, count: usize },

        #[error("the root node cannot be deleted")]
        CannotDeleteRoot,

        #[error("object pool exhausted ({capacity} slots)")]
        AllocationFailed { capacity: usize },

        #[error("node {0} is not detached")]
        NotDetached(NodeId),

        #[error("restore failed: {0}")]
        Restore(String),

        #[error("i/o error: {0}")]
        Io(#[from] std::io::Error),

        #[error("payload codec error: {0}")]
        Payload(String),
    }

    pub type Result<T> = std::result::Result<T, Error>;
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
