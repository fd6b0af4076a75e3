//! Generalized tree over the object pool

use super::node::Node;
use crate::error::{Error, Result};
use crate::pool::{NodeId, ObjectPool, PoolStats};
use tracing::{debug, warn};

/// Result of [`Tree::replace_node`]
///
/// Replacing the root (or any parentless node) performs no structural
/// change; callers must check for that case explicitly.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplaceOutcome {
    /// The replacement took the old node's position.
    Replaced,
    /// The target was parentless; nothing changed.
    RootUntouched,
}

/// In-memory tree with an unbounded number of children per node
///
/// Every node lives in an [`ObjectPool`] and is addressed by its
/// [`NodeId`]. The root exists for the whole lifetime of the tree and is
/// never part of any sibling chain.
#[derive(Debug, Clone)]
pub struct Tree<T> {
    root: NodeId,
    pool: ObjectPool<Node<T>>,
}

impl<T: Default> Tree<T> {
    /// Create a tree holding just the root node.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create a tree with preallocated pool storage.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut pool = ObjectPool::with_capacity(capacity);
        let root = pool
            .alloc(Node::detached(T::default()))
            .expect("unbounded pool always has room for the root");
        Self { root, pool }
    }

    /// Create a tree whose pool never grows beyond `max_slots` nodes.
    pub fn bounded(max_slots: usize) -> Result<Self> {
        let mut pool = ObjectPool::bounded(max_slots);
        let root = pool.alloc(Node::detached(T::default()))?;
        Ok(Self { root, pool })
    }
}

impl<T: Default> Default for Tree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Tree<T> {
    /// Id of the root node.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of live nodes, root included.
    pub fn node_count(&self) -> usize {
        self.pool.len()
    }

    /// Defensive validity probe for a handle.
    pub fn contains(&self, id: NodeId) -> bool {
        self.pool.contains(id)
    }

    /// Borrow the backing pool (diagnostics only; read-only access).
    pub fn pool(&self) -> &ObjectPool<Node<T>> {
        &self.pool
    }

    /// Get pool statistics.
    pub fn stats(&self) -> PoolStats {
        self.pool.stats()
    }

    /// Borrow a node's payload.
    pub fn payload(&self, id: NodeId) -> Result<&T> {
        Ok(&self.pool.get(id)?.payload)
    }

    /// Mutably borrow a node's payload.
    pub fn payload_mut(&mut self, id: NodeId) -> Result<&mut T> {
        Ok(&mut self.pool.get_mut(id)?.payload)
    }

    /// A node's structural parent (NONE for the root).
    pub fn parent(&self, id: NodeId) -> Result<NodeId> {
        Ok(self.pool.get(id)?.parent)
    }

    /// A node's first child (NONE for leaves).
    pub fn first_child(&self, id: NodeId) -> Result<NodeId> {
        Ok(self.pool.get(id)?.child)
    }

    /// A node's right sibling (NONE at the end of the chain).
    pub fn next_sibling(&self, id: NodeId) -> Result<NodeId> {
        Ok(self.pool.get(id)?.sibling)
    }

    /// Iterate over a node's children in sibling order.
    pub fn children(&self, id: NodeId) -> Result<Children<'_, T>> {
        Ok(Children {
            tree: self,
            cursor: self.pool.get(id)?.child,
        })
    }

    /// Number of children of a node.
    pub fn child_count(&self, id: NodeId) -> Result<usize> {
        Ok(self.children(id)?.count())
    }

    /// Child of `parent` at zero-based position `pos`.
    pub fn child_at(&self, parent: NodeId, pos: usize) -> Result<NodeId> {
        let mut count = 0;
        for child in self.children(parent)? {
            if count == pos {
                return Ok(child);
            }
            count += 1;
        }
        Err(Error::InvalidPosition { pos, count })
    }

    /// Number of nodes in the subtree rooted at `id`, `id` included.
    pub fn subtree_size(&self, id: NodeId) -> Result<usize> {
        let mut size = 1;
        for child in self.children(id)? {
            size += self.subtree_size(child)?;
        }
        Ok(size)
    }

    /// Append a new node as the last child of `parent`
    ///
    /// Walks `parent`'s sibling chain to its end, so this is O(existing
    /// children). Fails with `InvalidId` if `parent` does not exist and
    /// `AllocationFailed` if the pool is bounded and full; the tree is
    /// untouched on failure.
    pub fn add_child(&mut self, parent: NodeId, payload: T) -> Result<NodeId> {
        let prev = self.last_child(parent)?;
        let id = self.pool.alloc(Node::detached(payload))?;
        self.link_child_after(parent, prev, id)?;
        debug!("added {} as last child of {}", id, parent);
        Ok(id)
    }

    /// Append a new node at the end of `member`'s sibling chain
    ///
    /// Walks forward from `member` (any member of the chain, not
    /// necessarily its head) to the last sibling and links the new node
    /// there; the new node takes the chain's parent. Equivalent to
    /// appending one more child to `member`'s parent. Fails with
    /// `InvalidId` when `member` is the root or a detached node, since
    /// there is no parent chain to extend.
    pub fn append_sibling(&mut self, member: NodeId, payload: T) -> Result<NodeId> {
        let mut last = member;
        loop {
            let next = self.pool.get(last)?.sibling;
            if next.is_none() {
                break;
            }
            last = next;
        }
        let parent = self.pool.get(last)?.parent;
        if parent.is_none() {
            return Err(Error::InvalidId(member));
        }
        let id = self.pool.alloc(Node::detached(payload))?;
        self.link_child_after(parent, last, id)?;
        debug!("appended {} to the sibling chain of {}", id, member);
        Ok(id)
    }

    /// Attach an already-allocated, detached node as the last child of
    /// `parent`
    ///
    /// Fails with `NotDetached` when `child` still has a parent or a
    /// sibling link, or is the root.
    pub fn attach_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        let node = self.pool.get(child)?;
        if child == self.root || child == parent || node.parent.is_some() || node.sibling.is_some()
        {
            return Err(Error::NotDetached(child));
        }
        let prev = self.last_child(parent)?;
        self.link_child_after(parent, prev, child)?;
        debug!("attached {} under {}", child, parent);
        Ok(())
    }

    /// Remove the child of `parent` at position `pos`, promoting its
    /// children
    ///
    /// The removed node's children are reparented to `parent` and
    /// spliced into the chain at the removed node's position, keeping
    /// their relative order; its former next sibling follows them. The
    /// removed node's slot is freed and its payload returned.
    pub fn remove_child(&mut self, parent: NodeId, pos: usize) -> Result<T> {
        let mut prev = NodeId::NONE;
        let mut cursor = self.pool.get(parent)?.child;
        let mut walked = 0;
        while cursor.is_some() && walked < pos {
            prev = cursor;
            cursor = self.pool.get(cursor)?.sibling;
            walked += 1;
        }
        if cursor.is_none() {
            // the walk consumed the whole chain, so `walked` is the count
            return Err(Error::InvalidPosition { pos, count: walked });
        }
        let victim = cursor;
        let (first_grandchild, successor) = {
            let node = self.pool.get(victim)?;
            (node.child, node.sibling)
        };

        // Reparent the victim's children and find the last of them
        let mut tail = NodeId::NONE;
        let mut child = first_grandchild;
        while child.is_some() {
            let node = self.pool.get_mut(child)?;
            node.parent = parent;
            tail = child;
            child = node.sibling;
        }

        // Splice: either the grandchild run or the successor takes the
        // victim's position
        let head = if first_grandchild.is_some() {
            self.pool.get_mut(tail)?.sibling = successor;
            first_grandchild
        } else {
            successor
        };
        if prev.is_none() {
            self.pool.get_mut(parent)?.child = head;
        } else {
            self.pool.get_mut(prev)?.sibling = head;
        }

        let node = self.pool.free(victim)?;
        debug!("removed child {} of {} ({})", pos, parent, victim);
        Ok(node.payload)
    }

    /// Free every node of the subtree rooted at `id`, `id` included
    ///
    /// External links of `id` are left as they are; this is meant for a
    /// subtree that is already unlinked (see [`Tree::remove_subtree`]).
    /// Refuses the root.
    pub fn free_subtree(&mut self, id: NodeId) -> Result<()> {
        if id == self.root {
            return Err(Error::CannotDeleteRoot);
        }
        self.pool.get(id)?;
        self.free_subtree_rec(id)
    }

    /// Unlink the subtree rooted at `id` from its parent and free all of
    /// it
    ///
    /// Fails with `CannotDeleteRoot` on the root. A detached subtree is
    /// freed without any unlinking.
    pub fn remove_subtree(&mut self, id: NodeId) -> Result<()> {
        if id == self.root {
            return Err(Error::CannotDeleteRoot);
        }
        let (parent, successor) = {
            let node = self.pool.get(id)?;
            (node.parent, node.sibling)
        };
        if parent.is_some() {
            let prev = self.predecessor(parent, id)?;
            if prev.is_none() {
                self.pool.get_mut(parent)?.child = successor;
            } else {
                self.pool.get_mut(prev)?.sibling = successor;
            }
        }
        let size = self.subtree_size(id)?;
        self.free_subtree_rec(id)?;
        debug!("removed subtree of {} nodes at {}", size, id);
        Ok(())
    }

    /// Deep-copy the subtree rooted at `id`
    ///
    /// The copy gets freshly allocated nodes with cloned payloads, its
    /// children in the original sibling order, and is returned detached.
    /// On allocation failure the partial copy is freed again before the
    /// error is returned.
    pub fn clone_subtree(&mut self, id: NodeId) -> Result<NodeId>
    where
        T: Clone,
    {
        let payload = self.pool.get(id)?.payload.clone();
        let copy = self.pool.alloc(Node::detached(payload))?;
        if let Err(err) = self.clone_children(id, copy) {
            self.free_subtree_rec(copy).ok();
            return Err(err);
        }
        debug!("cloned subtree at {} into {}", id, copy);
        Ok(copy)
    }

    /// Put a detached node in another node's structural position
    ///
    /// `replacement` takes `current`'s parent and chain position;
    /// `current` ends up detached, keeping its own children, and is not
    /// freed. When `current` is parentless (the root in particular)
    /// nothing changes and `ReplaceOutcome::RootUntouched` is returned.
    pub fn replace_node(&mut self, current: NodeId, replacement: NodeId) -> Result<ReplaceOutcome> {
        let node = self.pool.get(replacement)?;
        if replacement == self.root || node.parent.is_some() || node.sibling.is_some() {
            return Err(Error::NotDetached(replacement));
        }
        let (parent, successor) = {
            let node = self.pool.get(current)?;
            (node.parent, node.sibling)
        };
        if parent.is_none() {
            warn!("replace_node on parentless {} is a no-op", current);
            return Ok(ReplaceOutcome::RootUntouched);
        }
        let prev = self.predecessor(parent, current)?;
        if prev.is_none() {
            self.pool.get_mut(parent)?.child = replacement;
        } else {
            self.pool.get_mut(prev)?.sibling = replacement;
        }
        {
            let node = self.pool.get_mut(replacement)?;
            node.parent = parent;
            node.sibling = successor;
        }
        {
            let node = self.pool.get_mut(current)?;
            node.parent = NodeId::NONE;
            node.sibling = NodeId::NONE;
        }
        debug!("replaced {} with {}", current, replacement);
        Ok(ReplaceOutcome::Replaced)
    }

    /// Allocate a detached node without linking it anywhere.
    pub(crate) fn alloc_detached(&mut self, payload: T) -> Result<NodeId> {
        self.pool.alloc(Node::detached(payload))
    }

    /// O(1) splice of `node` after `prev` in `parent`'s child chain
    ///
    /// `prev == NONE` inserts at the chain head. `node` must be
    /// allocated and detached; the previous successor of `prev` becomes
    /// the successor of `node`.
    pub(crate) fn link_child_after(
        &mut self,
        parent: NodeId,
        prev: NodeId,
        node: NodeId,
    ) -> Result<()> {
        let successor = if prev.is_none() {
            let head = self.pool.get_mut(parent)?;
            std::mem::replace(&mut head.child, node)
        } else {
            let before = self.pool.get_mut(prev)?;
            std::mem::replace(&mut before.sibling, node)
        };
        let linked = self.pool.get_mut(node)?;
        linked.parent = parent;
        linked.sibling = successor;
        Ok(())
    }

    /// Last child of `parent`, NONE when childless.
    fn last_child(&self, parent: NodeId) -> Result<NodeId> {
        let mut last = NodeId::NONE;
        let mut cursor = self.pool.get(parent)?.child;
        while cursor.is_some() {
            last = cursor;
            cursor = self.pool.get(cursor)?.sibling;
        }
        Ok(last)
    }

    /// Predecessor of `id` in `parent`'s child chain, NONE when `id` is
    /// the first child.
    fn predecessor(&self, parent: NodeId, id: NodeId) -> Result<NodeId> {
        let mut prev = NodeId::NONE;
        let mut cursor = self.pool.get(parent)?.child;
        while cursor.is_some() {
            if cursor == id {
                return Ok(prev);
            }
            prev = cursor;
            cursor = self.pool.get(cursor)?.sibling;
        }
        Err(Error::InvalidId(id))
    }

    fn free_subtree_rec(&mut self, id: NodeId) -> Result<()> {
        let mut child = self.pool.get(id)?.child;
        while child.is_some() {
            let next = self.pool.get(child)?.sibling;
            self.free_subtree_rec(child)?;
            child = next;
        }
        self.pool.free(id)?;
        Ok(())
    }

    fn clone_children(&mut self, src: NodeId, dst: NodeId) -> Result<()>
    where
        T: Clone,
    {
        let mut last = NodeId::NONE;
        let mut child = self.pool.get(src)?.child;
        while child.is_some() {
            let next = self.pool.get(child)?.sibling;
            let copy = self.clone_subtree(child)?;
            self.link_child_after(dst, last, copy)?;
            last = copy;
            child = next;
        }
        Ok(())
    }
}

/// Iterator over the children of one node, in sibling order
pub struct Children<'a, T> {
    tree: &'a Tree<T>,
    cursor: NodeId,
}

impl<T> Iterator for Children<'_, T> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        if self.cursor.is_none() {
            return None;
        }
        let id = self.cursor;
        self.cursor = self
            .tree
            .pool
            .get(id)
            .map(|node| node.sibling)
            .unwrap_or(NodeId::NONE);
        Some(id)
    }
}
