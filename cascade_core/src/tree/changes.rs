// Copyright 2026 the Cascade Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-tick change sets.
//!
//! [`TickChanges`] uses raw slot indices (`u32`) rather than [`NodeId`]
//! handles so painters can read resolved geometry through
//! [`Engine::resolved_at`](crate::engine::Engine::resolved_at) without a
//! generation check per access.
//!
//! [`NodeId`]: super::NodeId

use alloc::vec::Vec;

/// What changed during one [`Engine::tick`](crate::engine::Engine::tick).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickChanges {
    /// Nodes whose size stream emitted or was invalidated.
    pub resized: Vec<u32>,
    /// Nodes whose layout stream emitted or was invalidated.
    pub relaid: Vec<u32>,
    /// Nodes created since the last tick.
    pub added: Vec<u32>,
    /// Nodes destroyed since the last tick.
    pub removed: Vec<u32>,
    /// Whether the traversal order was rebuilt.
    pub topology_changed: bool,
}

impl TickChanges {
    /// Clears all change lists.
    pub fn clear(&mut self) {
        self.resized.clear();
        self.relaid.clear();
        self.added.clear();
        self.removed.clear();
        self.topology_changed = false;
    }

    /// Whether nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resized.is_empty()
            && self.relaid.is_empty()
            && self.added.is_empty()
            && self.removed.is_empty()
            && !self.topology_changed
    }
}
