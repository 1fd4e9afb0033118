// Copyright 2026 the Cascade Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Struct-of-arrays stream storage.

use alloc::vec;
use alloc::vec::Vec;

use super::event::{EventKind, Lifecycle};
use super::id::StreamId;
use super::kind::StreamKind;
use super::value::Value;
use crate::dirty::Mark;
use crate::engine::Engine;
use crate::router::EventRouter;
use crate::scheduler::Scheduler;

/// The router type every stream carries: handlers may only defer work.
pub type StreamRouter = EventRouter<Scheduler<Engine>>;

/// Struct-of-arrays storage for every stream of an [`Engine`].
///
/// Each stream is identified by a [`StreamId`] (index + generation). Edges
/// are stored on both ends: `subscribers[s]` lists the slots that receive
/// what `s` emits, in subscription order, and `sources[t]` lists the slots
/// `t` is subscribed to.
///
/// Read access is public so filter handlers can consult other streams.
/// Mutation goes through the engine.
#[derive(Debug)]
pub struct StreamStore {
    pub(crate) kind: Vec<StreamKind>,
    pub(crate) value: Vec<Option<Value>>,
    pub(crate) lifecycle: Vec<Lifecycle>,
    pub(crate) resize: Vec<bool>,
    pub(crate) subscribers: Vec<Vec<u32>>,
    pub(crate) sources: Vec<Vec<u32>>,
    pub(crate) router: Vec<StreamRouter>,
    /// Node slot and channel to mark dirty when the stream emits.
    pub(crate) mark: Vec<Option<(u32, Mark)>>,
    /// Set while the slot is on the delivery stack; breaks subscription cycles.
    pub(crate) delivering: Vec<bool>,
    /// Topological height: above every source outside a cycle.
    pub(crate) rank: Vec<u32>,
    /// Kind of the first input event a queued lift received this pass.
    pub(crate) pending: Vec<Option<EventKind>>,
    /// Set once a lift has been recomputed in the current pass.
    pub(crate) settled: Vec<bool>,
    generation: Vec<u32>,
    alive: Vec<bool>,
    free_list: Vec<u32>,
    len: u32,
}

impl Default for StreamStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            kind: Vec::new(),
            value: Vec::new(),
            lifecycle: Vec::new(),
            resize: Vec::new(),
            subscribers: Vec::new(),
            sources: Vec::new(),
            router: Vec::new(),
            mark: Vec::new(),
            delivering: Vec::new(),
            rank: Vec::new(),
            pending: Vec::new(),
            settled: Vec::new(),
            generation: Vec::new(),
            alive: Vec::new(),
            free_list: Vec::new(),
            len: 0,
        }
    }

    pub(crate) fn alloc(
        &mut self,
        kind: StreamKind,
        resize: bool,
        initial: Option<Value>,
    ) -> StreamId {
        let idx = if let Some(idx) = self.free_list.pop() {
            let i = idx as usize;
            self.generation[i] += 1;
            self.kind[i] = kind;
            self.value[i] = initial;
            self.lifecycle[i] = Lifecycle::Uninitialized;
            self.resize[i] = resize;
            self.mark[i] = None;
            self.delivering[i] = false;
            self.rank[i] = 0;
            self.pending[i] = None;
            self.settled[i] = false;
            self.alive[i] = true;
            idx
        } else {
            let idx = self.len;
            self.len += 1;
            self.kind.push(kind);
            self.value.push(initial);
            self.lifecycle.push(Lifecycle::Uninitialized);
            self.resize.push(resize);
            self.subscribers.push(Vec::new());
            self.sources.push(Vec::new());
            self.router.push(EventRouter::new());
            self.mark.push(None);
            self.delivering.push(false);
            self.rank.push(0);
            self.pending.push(None);
            self.settled.push(false);
            self.generation.push(0);
            self.alive.push(true);
            idx
        };
        self.id_at(idx)
    }

    /// Unlinks and frees the slot. Returns `false` for a stale handle.
    pub(crate) fn free(&mut self, id: StreamId) -> bool {
        let Some(i) = self.slot(id) else {
            return false;
        };
        let idx = id.idx;
        for s in core::mem::take(&mut self.sources[i]) {
            self.subscribers[s as usize].retain(|&t| t != idx);
        }
        for t in core::mem::take(&mut self.subscribers[i]) {
            self.sources[t as usize].retain(|&s| s != idx);
        }
        self.kind[i] = StreamKind::Source;
        self.value[i] = None;
        self.router[i].clear();
        self.mark[i] = None;
        self.pending[i] = None;
        self.alive[i] = false;
        // Bump generation so old handles immediately fail validation.
        self.generation[i] += 1;
        self.free_list.push(idx);
        true
    }

    /// Adds the edge `source -> target`. Returns `false` if it already
    /// existed.
    pub(crate) fn link(&mut self, target: u32, source: u32) -> bool {
        if self.sources[target as usize].contains(&source) {
            return false;
        }
        self.sources[target as usize].push(source);
        self.subscribers[source as usize].push(target);
        self.raise_rank(target, self.rank[source as usize] + 1);
        true
    }

    /// Lifts `target` to at least `rank`, and its subscribers above it.
    ///
    /// Ranks never decrease, so one that outlives its edge only orders a
    /// lift later than needed. A rank past the slot count closes a cycle
    /// and is not raised further.
    fn raise_rank(&mut self, target: u32, rank: u32) {
        let mut work = vec![(target, rank)];
        while let Some((t, r)) = work.pop() {
            let i = t as usize;
            if r <= self.rank[i] || r > self.len {
                continue;
            }
            self.rank[i] = r;
            work.extend(self.subscribers[i].iter().map(|&s| (s, r + 1)));
        }
    }

    /// Removes the edge `source -> target`. Returns `false` if absent.
    pub(crate) fn unlink(&mut self, target: u32, source: u32) -> bool {
        let sources = &mut self.sources[target as usize];
        let Some(pos) = sources.iter().position(|&s| s == source) else {
            return false;
        };
        sources.remove(pos);
        self.subscribers[source as usize].retain(|&t| t != target);
        true
    }

    /// Slot index of a live handle.
    #[inline]
    pub(crate) fn slot(&self, id: StreamId) -> Option<usize> {
        let i = id.idx as usize;
        (id.idx < self.len && self.alive[i] && self.generation[i] == id.generation).then_some(i)
    }

    #[inline]
    pub(crate) fn id_at(&self, idx: u32) -> StreamId {
        StreamId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    /// Whether `id` refers to a live stream.
    #[must_use]
    pub fn is_alive(&self, id: StreamId) -> bool {
        self.slot(id).is_some()
    }

    /// Last value the stream observed, or `None` if unresolved or stale.
    #[must_use]
    pub fn value(&self, id: StreamId) -> Option<&Value> {
        self.slot(id).and_then(|i| self.value[i].as_ref())
    }

    /// Lifecycle state, or `None` for a stale handle.
    #[must_use]
    pub fn lifecycle(&self, id: StreamId) -> Option<Lifecycle> {
        self.slot(id).map(|i| self.lifecycle[i])
    }

    /// Whether the stream carries sizes (emits `Resize`).
    #[must_use]
    pub fn is_resize(&self, id: StreamId) -> bool {
        self.slot(id).is_some_and(|i| self.resize[i])
    }

    /// Live subscribers of `id`, in subscription order.
    #[must_use]
    pub fn subscribers(&self, id: StreamId) -> Vec<StreamId> {
        self.slot(id)
            .map(|i| self.subscribers[i].iter().map(|&t| self.id_at(t)).collect())
            .unwrap_or_default()
    }

    /// Number of live streams.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len as usize - self.free_list.len()
    }

    /// Whether no stream is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Latest values of `inputs`, in order; stale inputs read as `None`.
    pub(crate) fn gather(&self, inputs: &[StreamId]) -> Vec<Option<&Value>> {
        inputs.iter().map(|&id| self.value(id)).collect()
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;

    #[test]
    fn alloc_and_free() {
        let mut store = StreamStore::new();
        let id = store.alloc(StreamKind::Source, false, Some(Value::Scalar(1.0)));
        assert!(store.is_alive(id));
        assert_eq!(store.value(id), Some(&Value::Scalar(1.0)));
        assert!(store.free(id));
        assert!(!store.is_alive(id));
        assert_eq!(store.value(id), None);
        assert!(!store.free(id), "second free is a no-op");
    }

    #[test]
    fn generation_prevents_stale_access() {
        let mut store = StreamStore::new();
        let a = store.alloc(StreamKind::Source, false, None);
        store.free(a);
        let b = store.alloc(StreamKind::Relay, false, Some(Value::Bool(true)));
        assert_eq!(a.index(), b.index());
        assert_ne!(a.generation(), b.generation());
        assert!(!store.is_alive(a));
        assert_eq!(store.value(a), None);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn link_is_idempotent_and_ordered() {
        let mut store = StreamStore::new();
        let s = store.alloc(StreamKind::Source, false, None);
        let t1 = store.alloc(StreamKind::Relay, false, None);
        let t2 = store.alloc(StreamKind::Relay, false, None);
        assert!(store.link(t2.idx, s.idx));
        assert!(store.link(t1.idx, s.idx));
        assert!(!store.link(t1.idx, s.idx));
        assert_eq!(store.subscribers(s), vec![t2, t1]);
        assert!(store.unlink(t2.idx, s.idx));
        assert!(!store.unlink(t2.idx, s.idx));
        assert_eq!(store.subscribers(s), vec![t1]);
    }

    #[test]
    fn ranks_follow_links() {
        let mut store = StreamStore::new();
        let a = store.alloc(StreamKind::Source, false, None);
        let b = store.alloc(StreamKind::Relay, false, None);
        let c = store.alloc(StreamKind::Relay, false, None);
        store.link(c.idx, b.idx);
        assert_eq!(store.rank[c.idx as usize], 1);
        // Linking upstream later raises everything below.
        store.link(b.idx, a.idx);
        assert_eq!(store.rank[b.idx as usize], 1);
        assert_eq!(store.rank[c.idx as usize], 2);
    }

    #[test]
    fn cyclic_ranks_stay_bounded() {
        let mut store = StreamStore::new();
        let a = store.alloc(StreamKind::Relay, false, None);
        let b = store.alloc(StreamKind::Relay, false, None);
        store.link(b.idx, a.idx);
        store.link(a.idx, b.idx);
        let max = store.len;
        assert!(store.rank[a.idx as usize] <= max);
        assert!(store.rank[b.idx as usize] <= max);
    }

    #[test]
    fn free_unlinks_both_directions() {
        let mut store = StreamStore::new();
        let s = store.alloc(StreamKind::Source, false, None);
        let mid = store.alloc(StreamKind::Relay, false, None);
        let t = store.alloc(StreamKind::Relay, false, None);
        store.link(mid.idx, s.idx);
        store.link(t.idx, mid.idx);
        store.free(mid);
        assert!(store.subscribers(s).is_empty());
        assert!(store.sources[t.idx as usize].is_empty());
    }

    #[test]
    fn gather_reads_stale_as_unresolved() {
        let mut store = StreamStore::new();
        let a = store.alloc(StreamKind::Source, false, Some(Value::Scalar(2.0)));
        let b = store.alloc(StreamKind::Source, false, Some(Value::Scalar(3.0)));
        store.free(b);
        assert_eq!(store.gather(&[a, b]), vec![Some(&Value::Scalar(2.0)), None]);
    }
}
