// Copyright 2026 the Cascade Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stream identity.

use core::fmt;

/// Slot index meaning "none", used for absent parents and unresolvable slots.
pub const INVALID: u32 = u32::MAX;

/// A handle to a stream in a [`StreamStore`](super::StreamStore).
///
/// The generation counter makes handles to destroyed streams detectably
/// stale: every operation through a stale handle is a silent no-op, so work
/// queued before a teardown can still run safely after it.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct StreamId {
    pub(crate) idx: u32,
    pub(crate) generation: u32,
}

impl StreamId {
    /// Slot index, as reported in emission records.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.idx
    }

    /// How many times the slot had been reused when this handle was made.
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for StreamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s{}v{}", self.idx, self.generation)
    }
}
