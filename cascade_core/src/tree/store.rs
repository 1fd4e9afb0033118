// Copyright 2026 the Cascade Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Slot storage for render tree nodes.

use alloc::vec::Vec;

use understory_dirty::{Channel, CycleHandling, DirtyTracker};

use super::changes::TickChanges;
use super::id::NodeId;
use super::traverse::Children;
use crate::dirty;
use crate::stream::{INVALID, StreamId};

/// The streams making up one node's pipeline.
///
/// `size` is lifted from `size_spec` and `parent_size`; `layout` is lifted
/// from `parent_layout`, `layout_decl`, and `size`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodeStreams {
    /// Declared size; option patches are merged into it.
    pub size_spec: StreamId,
    /// Relay fed by the parent's `size` (or a viewport for roots).
    pub parent_size: StreamId,
    /// Resolved size.
    pub size: StreamId,
    /// Declared layout; option patches are merged into it.
    pub layout_decl: StreamId,
    /// Relay fed by the parent's `layout` (or the identity for roots).
    pub parent_layout: StreamId,
    /// Resolved layout.
    pub layout: StreamId,
}

impl NodeStreams {
    /// Every stream, in creation order.
    #[must_use]
    pub const fn all(&self) -> [StreamId; 6] {
        [
            self.size_spec,
            self.parent_size,
            self.size,
            self.layout_decl,
            self.parent_layout,
            self.layout,
        ]
    }
}

/// The render tree: topology, pipelines, and per-tick change tracking.
///
/// Nodes live in reusable slots addressed by [`NodeId`]. Each slot keeps its
/// parent and an ordered child list. Size and layout dependencies between a
/// child and its parent are mirrored into [`understory_dirty`] channels so a
/// tick can report which nodes changed; see [`dirty`](crate::dirty).
#[derive(Debug)]
pub struct NodeStore {
    parent: Vec<u32>,
    children: Vec<Vec<u32>>,
    pub(crate) streams: Vec<NodeStreams>,
    /// Streams a node keeps alive besides its pipeline.
    pub(crate) owned: Vec<Vec<StreamId>>,
    pub(crate) generation: Vec<u32>,
    alive: Vec<bool>,
    vacant: Vec<u32>,
    pub(crate) dirty: DirtyTracker<u32>,
    order: Vec<u32>,
    order_stale: bool,
    added: Vec<u32>,
    removed: Vec<u32>,
}

impl NodeStore {
    /// An empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self {
            parent: Vec::new(),
            children: Vec::new(),
            streams: Vec::new(),
            owned: Vec::new(),
            generation: Vec::new(),
            alive: Vec::new(),
            vacant: Vec::new(),
            dirty: DirtyTracker::with_cycle_handling(CycleHandling::Error),
            order: Vec::new(),
            order_stale: false,
            added: Vec::new(),
            removed: Vec::new(),
        }
    }

    fn slots(&self) -> u32 {
        u32::try_from(self.parent.len()).unwrap_or(INVALID)
    }

    // -- Slots --

    pub(crate) fn alloc(&mut self, streams: NodeStreams) -> NodeId {
        let idx = match self.vacant.pop() {
            Some(idx) => {
                let i = idx as usize;
                self.parent[i] = INVALID;
                self.children[i].clear();
                self.streams[i] = streams;
                self.owned[i].clear();
                self.alive[i] = true;
                idx
            }
            None => {
                let idx = self.slots();
                self.parent.push(INVALID);
                self.children.push(Vec::new());
                self.streams.push(streams);
                self.owned.push(Vec::new());
                self.generation.push(0);
                self.alive.push(true);
                idx
            }
        };
        self.order_stale = true;
        self.added.push(idx);
        self.dirty.mark(idx, dirty::TOPOLOGY);
        self.id_at(idx)
    }

    /// Releases a childless node, unlinking it from its parent.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale or the node still has children.
    pub(crate) fn free(&mut self, id: NodeId) {
        let i = self.checked(id);
        assert!(
            self.children[i].is_empty(),
            "cannot free node with children"
        );
        let idx = id.idx;
        let p = core::mem::replace(&mut self.parent[i], INVALID);
        if p != INVALID {
            self.children[p as usize].retain(|&k| k != idx);
        }
        self.dirty.remove_key(idx);
        self.alive[i] = false;
        // Bumped here so that handles go stale the moment the node dies.
        self.generation[i] = self.generation[i].wrapping_add(1);
        self.vacant.push(idx);
        self.order_stale = true;
        self.added.retain(|&a| a != idx);
        self.removed.push(idx);
    }

    /// Whether `id` refers to a live node.
    #[must_use]
    pub fn is_alive(&self, id: NodeId) -> bool {
        let i = id.idx as usize;
        self.alive.get(i).copied().unwrap_or(false) && self.generation[i] == id.generation
    }

    /// Number of live nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.parent.len() - self.vacant.len()
    }

    /// Whether there are no live nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // -- Topology --

    /// Appends `child` to the children of `parent`.
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale, if `child` already has a parent, or
    /// if `child` is `parent` or one of its ancestors.
    pub(crate) fn add_child(&mut self, parent: NodeId, child: NodeId) {
        let p = self.checked(parent);
        let c = self.checked(child);
        assert!(self.parent[c] == INVALID, "child already has a parent");
        assert!(
            !self.ancestors(parent.idx).any(|a| a == child.idx),
            "cannot add a node beneath itself"
        );

        self.parent[c] = parent.idx;
        self.children[p].push(child.idx);

        let _ = self.dirty.add_dependency(child.idx, parent.idx, dirty::SIZE);
        let _ = self
            .dirty
            .add_dependency(child.idx, parent.idx, dirty::LAYOUT);
        self.order_stale = true;
        self.dirty.mark(parent.idx, dirty::TOPOLOGY);
    }

    /// Detaches `child` and marks its whole subtree as resized and relaid.
    ///
    /// Returns the former parent's slot.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale or the node has no parent.
    pub(crate) fn remove_from_parent(&mut self, child: NodeId) -> u32 {
        let c = self.checked(child);
        let p = self.parent[c];
        assert!(p != INVALID, "node has no parent");

        self.children[p as usize].retain(|&k| k != child.idx);
        self.parent[c] = INVALID;

        self.dirty.remove_dependency(child.idx, p, dirty::SIZE);
        self.dirty.remove_dependency(child.idx, p, dirty::LAYOUT);
        for channel in [dirty::SIZE, dirty::LAYOUT] {
            dirty::mark_subtree(&mut self.dirty, child.idx, channel);
        }
        self.order_stale = true;
        self.dirty.mark(p, dirty::TOPOLOGY);
        p
    }

    /// The parent of `id`, if attached.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        let p = self.parent[self.checked(id)];
        (p != INVALID).then(|| self.id_at(p))
    }

    /// The children of `id`, in insertion order.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children::new(self, &self.children[self.checked(id)])
    }

    /// Every live, parentless node, in slot order.
    #[must_use]
    pub fn roots(&self) -> Vec<NodeId> {
        self.root_slots().map(|idx| self.id_at(idx)).collect()
    }

    fn root_slots(&self) -> impl Iterator<Item = u32> + '_ {
        (0..self.slots())
            .filter(|&idx| self.alive[idx as usize] && self.parent[idx as usize] == INVALID)
    }

    /// Slots of the subtree under `idx`, parents before children.
    pub(crate) fn subtree(&self, idx: u32) -> Vec<u32> {
        let mut out = Vec::new();
        self.push_pre_order(idx, &mut out);
        out
    }

    fn push_pre_order(&self, idx: u32, out: &mut Vec<u32>) {
        let mut stack = alloc::vec![idx];
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children[next as usize].iter().rev());
        }
    }

    /// The pipeline of a live node.
    #[must_use]
    pub fn streams(&self, id: NodeId) -> Option<NodeStreams> {
        self.is_alive(id).then(|| self.streams[id.idx as usize])
    }

    /// Walks from `idx` up to its root, starting with `idx`.
    fn ancestors(&self, idx: u32) -> impl Iterator<Item = u32> + '_ {
        core::iter::successors(Some(idx), |&i| {
            let p = self.parent[i as usize];
            (p != INVALID).then_some(p)
        })
    }

    // -- Change collection --

    /// Moves everything that changed since the last call into `changes`.
    pub(crate) fn collect_changes(&mut self, changes: &mut TickChanges) {
        changes.clear();

        if self.order_stale {
            let mut order = core::mem::take(&mut self.order);
            order.clear();
            for root in self.root_slots().collect::<Vec<_>>() {
                self.push_pre_order(root, &mut order);
            }
            self.order = order;
            self.order_stale = false;
            changes.topology_changed = true;
        }

        changes.resized = self.drain_live(dirty::SIZE);
        changes.relaid = self.drain_live(dirty::LAYOUT);
        // Topology marks only exist to keep the tracker's keys in step.
        self.dirty.drain(dirty::TOPOLOGY).deterministic().run().for_each(drop);

        changes.added = core::mem::take(&mut self.added);
        changes.removed = core::mem::take(&mut self.removed);
    }

    fn drain_live(&mut self, channel: Channel) -> Vec<u32> {
        let alive = &self.alive;
        self.dirty
            .drain(channel)
            .affected()
            .deterministic()
            .run()
            .filter(|&idx| alive.get(idx as usize).copied().unwrap_or(false))
            .collect()
    }

    /// Every live node, each root followed by its subtree in pre-order.
    ///
    /// Refreshed by the tick that changes topology.
    #[must_use]
    pub fn traversal_order(&self) -> &[u32] {
        &self.order
    }

    // -- Handles --

    #[inline]
    pub(crate) fn id_at(&self, idx: u32) -> NodeId {
        NodeId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    /// The slot of `id`.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    fn checked(&self, id: NodeId) -> usize {
        assert!(self.is_alive(id), "stale NodeId: {id:?}");
        id.idx as usize
    }
}

impl Default for NodeStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;
    use crate::stream::{StreamKind, StreamStore};

    fn pipeline(streams: &mut StreamStore) -> NodeStreams {
        let mut next = || streams.alloc(StreamKind::Relay, false, None);
        NodeStreams {
            size_spec: next(),
            parent_size: next(),
            size: next(),
            layout_decl: next(),
            parent_layout: next(),
            layout: next(),
        }
    }

    fn store_with(n: usize) -> (NodeStore, Vec<NodeId>) {
        let mut streams = StreamStore::new();
        let mut store = NodeStore::new();
        let ids = (0..n).map(|_| store.alloc(pipeline(&mut streams))).collect();
        (store, ids)
    }

    #[test]
    fn freed_handles_go_stale() {
        let (mut store, ids) = store_with(1);
        assert!(store.is_alive(ids[0]), "fresh node");
        store.free(ids[0]);
        assert!(!store.is_alive(ids[0]), "freed node");
        assert!(store.streams(ids[0]).is_none(), "no pipeline");
        assert!(store.is_empty(), "nothing left");
    }

    #[test]
    fn reused_slot_gets_new_generation() {
        let mut streams = StreamStore::new();
        let mut store = NodeStore::new();
        let old = store.alloc(pipeline(&mut streams));
        store.free(old);
        let new = store.alloc(pipeline(&mut streams));
        assert_eq!(new.index(), old.index());
        assert_ne!(new, old);
        assert!(!store.is_alive(old), "old handle stays stale");
    }

    #[test]
    fn children_keep_insertion_order() {
        let (mut store, ids) = store_with(4);
        for &c in &ids[1..] {
            store.add_child(ids[0], c);
        }
        assert_eq!(store.parent(ids[1]), Some(ids[0]));
        assert_eq!(store.roots(), vec![ids[0]]);

        assert_eq!(store.remove_from_parent(ids[2]), ids[0].idx);
        let kids: Vec<_> = store.children(ids[0]).collect();
        assert_eq!(kids, vec![ids[1], ids[3]]);
        assert_eq!(store.parent(ids[2]), None);
        assert_eq!(store.roots(), vec![ids[0], ids[2]]);
    }

    #[test]
    fn traversal_is_pre_order() {
        let (mut store, ids) = store_with(5);
        store.add_child(ids[0], ids[1]);
        store.add_child(ids[1], ids[2]);
        store.add_child(ids[0], ids[3]);
        store.add_child(ids[1], ids[4]);
        let mut changes = TickChanges::default();
        store.collect_changes(&mut changes);
        assert!(changes.topology_changed, "nodes were added");
        assert_eq!(store.traversal_order(), &[0, 1, 2, 4, 3]);
        assert_eq!(changes.added, vec![0, 1, 2, 3, 4]);
        assert_eq!(store.subtree(1), vec![1, 2, 4]);
    }

    #[test]
    fn detach_reports_whole_subtree() {
        let (mut store, ids) = store_with(3);
        store.add_child(ids[0], ids[1]);
        store.add_child(ids[1], ids[2]);
        let mut changes = TickChanges::default();
        store.collect_changes(&mut changes);

        store.remove_from_parent(ids[1]);
        store.collect_changes(&mut changes);
        assert_eq!(changes.relaid, vec![1, 2]);
        assert_eq!(changes.resized, vec![1, 2]);
    }

    #[test]
    fn freed_nodes_are_reported_once() {
        let (mut store, ids) = store_with(2);
        let mut changes = TickChanges::default();
        store.collect_changes(&mut changes);
        store.free(ids[1]);
        store.collect_changes(&mut changes);
        assert_eq!(changes.removed, vec![1]);
        assert!(changes.added.is_empty(), "no new nodes");
        store.collect_changes(&mut changes);
        assert!(changes.is_empty(), "{changes:?}");
    }

    #[test]
    fn freeing_a_leaf_unlinks_it() {
        let (mut store, ids) = store_with(3);
        store.add_child(ids[0], ids[1]);
        store.add_child(ids[0], ids[2]);
        store.free(ids[1]);
        let kids: Vec<_> = store.children(ids[0]).collect();
        assert_eq!(kids, vec![ids[2]]);
    }

    #[test]
    #[should_panic(expected = "child already has a parent")]
    fn double_parent_panics() {
        let (mut store, ids) = store_with(3);
        store.add_child(ids[0], ids[2]);
        store.add_child(ids[1], ids[2]);
    }

    #[test]
    #[should_panic(expected = "cannot add a node beneath itself")]
    fn ancestor_as_child_panics() {
        let (mut store, ids) = store_with(3);
        store.add_child(ids[0], ids[1]);
        store.add_child(ids[1], ids[2]);
        store.add_child(ids[2], ids[0]);
    }

    #[test]
    #[should_panic(expected = "cannot free node with children")]
    fn free_with_children_panics() {
        let (mut store, ids) = store_with(2);
        store.add_child(ids[0], ids[1]);
        store.free(ids[0]);
    }

    #[test]
    #[should_panic(expected = "stale NodeId")]
    fn stale_handle_panics_on_parent() {
        let (mut store, ids) = store_with(1);
        store.free(ids[0]);
        let _ = store.parent(ids[0]);
    }
}
