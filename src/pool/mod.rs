//! Object Pool
//!
//! Slab-style backing store for tree nodes. All node memory lives here;
//! the pool hands out stable, generation-tagged identities and reclaims
//! freed slots through a LIFO free list.
//!
//! # Architecture
//!
//! ```text
//! ObjectPool<T>
//!   ├─→ slots: [Occupied(a), Free→2, Occupied(b), Free→NONE, ...]
//!   ├─→ free_head ──→ slot 1 ──→ slot 3 ──→ NONE
//!   └─→ live count / optional capacity bound
//! ```
//!
//! A `NodeId` is a slot index plus the slot's generation at allocation
//! time. Freeing a slot bumps its generation, so a handle minted before
//! a free+reuse cycle no longer matches and is rejected instead of
//! silently aliasing the new occupant.

pub mod object_pool;
pub mod slot;

pub use object_pool::{ObjectPool, PoolStats};
pub use slot::{NodeId, Slot};
