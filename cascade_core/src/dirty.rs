// Copyright 2026 the Cascade Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-tracking channel constants.
//!
//! Cascade records which nodes changed during a tick with multi-channel dirty
//! tracking (via [`understory_dirty`]). The channels do not drive
//! recomputation, since streams already propagate eagerly; they collect the
//! per-tick change set handed to a [`Painter`](crate::paint::Painter).
//!
//! - [`SIZE`] is marked whenever a node's size stream emits, and on detach.
//! - [`LAYOUT`] is marked whenever a node's layout stream emits, and on
//!   detach.
//! - [`TOPOLOGY`] is marked on node creation and attachment. It is drained
//!   and discarded; the traversal order is rebuilt instead.
//!
//! `SIZE` and `LAYOUT` carry dependency edges from child to parent, so a
//! drain reports a marked node together with its descendants. Detaching a
//! node marks its subtree with [`EagerPolicy`], since the edges are gone by
//! drain time.
//!
//! [`Engine::tick`](crate::engine::Engine::tick) drains every channel and
//! reports the result as [`TickChanges`](crate::tree::TickChanges).

use understory_dirty::{Channel, DirtyTracker, EagerPolicy};

/// A node's resolved size was emitted.
pub const SIZE: Channel = Channel::new(0);

/// A node's resolved layout was emitted or invalidated.
pub const LAYOUT: Channel = Channel::new(1);

/// Tree topology changed.
pub const TOPOLOGY: Channel = Channel::new(2);

/// Which channel a node-owned stream marks when it emits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum Mark {
    Size,
    Layout,
}

impl Mark {
    pub(crate) const fn channel(self) -> Channel {
        match self {
            Self::Size => SIZE,
            Self::Layout => LAYOUT,
        }
    }
}

/// Marks `node` and its descendants on `ch`.
pub(crate) fn mark_subtree(tracker: &mut DirtyTracker<u32>, node: u32, ch: Channel) {
    tracker.mark_with(node, ch, &EagerPolicy);
}
