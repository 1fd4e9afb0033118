// Copyright 2026 the Cascade Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Child iteration.

use core::iter::FusedIterator;
use core::slice;

use super::id::NodeId;
use super::store::NodeStore;

/// The children of one node, in insertion order.
///
/// Created by [`NodeStore::children`].
#[derive(Clone, Debug)]
pub struct Children<'a> {
    store: &'a NodeStore,
    slots: slice::Iter<'a, u32>,
}

impl<'a> Children<'a> {
    pub(crate) fn new(store: &'a NodeStore, slots: &'a [u32]) -> Self {
        Self {
            store,
            slots: slots.iter(),
        }
    }
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        self.slots.next().map(|&idx| self.store.id_at(idx))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.slots.size_hint()
    }
}

impl DoubleEndedIterator for Children<'_> {
    fn next_back(&mut self) -> Option<NodeId> {
        self.slots.next_back().map(|&idx| self.store.id_at(idx))
    }
}

impl ExactSizeIterator for Children<'_> {}

impl FusedIterator for Children<'_> {}
