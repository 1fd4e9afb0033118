// Copyright 2026 the Cascade Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Events and the stream lifecycle.

use super::value::Value;

/// What an event means to the stream receiving it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A new run of values begins.
    Start,
    /// A new value within a run.
    Update,
    /// The run is over; the value is the last one.
    End,
    /// A size-carrying stream observed a new size. Not subject to the
    /// start/update/end lifecycle.
    Resize,
}

impl EventKind {
    /// All kinds, in handler-table order.
    pub const ALL: [Self; 4] = [Self::Start, Self::Update, Self::End, Self::Resize];

    /// Stable index for per-kind tables.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Start => 0,
            Self::Update => 1,
            Self::End => 2,
            Self::Resize => 3,
        }
    }
}

/// A value pushed through a stream.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Event {
    /// What the event means.
    pub kind: EventKind,
    /// The payload.
    pub value: Value,
}

impl Event {
    /// Creates an event.
    #[inline]
    #[must_use]
    pub fn new(kind: EventKind, value: impl Into<Value>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }

    /// A `Start` event.
    #[inline]
    #[must_use]
    pub fn start(value: impl Into<Value>) -> Self {
        Self::new(EventKind::Start, value)
    }

    /// An `Update` event.
    #[inline]
    #[must_use]
    pub fn update(value: impl Into<Value>) -> Self {
        Self::new(EventKind::Update, value)
    }

    /// An `End` event.
    #[inline]
    #[must_use]
    pub fn end(value: impl Into<Value>) -> Self {
        Self::new(EventKind::End, value)
    }

    /// A `Resize` event.
    #[inline]
    #[must_use]
    pub fn resize(value: impl Into<Value>) -> Self {
        Self::new(EventKind::Resize, value)
    }
}

/// Where a stream is in its start/update/end lifecycle.
///
/// A lifecycle is a sequence of runs, one per gesture or animation. `End`
/// closes the current run, not the stream: a later `Start` or `Update`
/// opens the next run with `Start`. Nothing is terminal here; a stream
/// stops emitting for good only when it is destroyed with
/// [`Engine::destroy_stream`](crate::engine::Engine::destroy_stream).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Lifecycle {
    /// Nothing emitted yet.
    #[default]
    Uninitialized,
    /// Between a `Start` and its `End`.
    Started,
    /// The last run ended; the next `Start` or `Update` opens a new run.
    Ended,
}

impl Lifecycle {
    /// Decides what a stream emits for an outgoing event of `kind`, and
    /// advances the lifecycle.
    ///
    /// Size-carrying streams (`resize == true`) emit everything as
    /// [`EventKind::Resize`] and never change state. Other streams see
    /// `Resize` as `Update`, never emit `Update` before `Start` (it is
    /// promoted), fold a repeated `Start` into `Update`, and drop an `End`
    /// that has no open run.
    pub(crate) fn admit(&mut self, kind: EventKind, resize: bool) -> Option<EventKind> {
        if resize {
            return Some(EventKind::Resize);
        }
        let kind = match kind {
            EventKind::Resize => EventKind::Update,
            k => k,
        };
        match (*self, kind) {
            (Self::Started, EventKind::Start | EventKind::Update) => Some(EventKind::Update),
            (Self::Started, EventKind::End) => {
                *self = Self::Ended;
                Some(EventKind::End)
            }
            (_, EventKind::Start | EventKind::Update) => {
                *self = Self::Started;
                Some(EventKind::Start)
            }
            (_, EventKind::End | EventKind::Resize) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_before_start_is_promoted() {
        let mut l = Lifecycle::default();
        assert_eq!(l.admit(EventKind::Update, false), Some(EventKind::Start));
        assert_eq!(l, Lifecycle::Started);
    }

    #[test]
    fn repeated_start_becomes_update() {
        let mut l = Lifecycle::default();
        assert_eq!(l.admit(EventKind::Start, false), Some(EventKind::Start));
        assert_eq!(l.admit(EventKind::Start, false), Some(EventKind::Update));
    }

    #[test]
    fn end_closes_and_later_end_is_dropped() {
        let mut l = Lifecycle::default();
        assert_eq!(l.admit(EventKind::End, false), None, "no run to end");
        l.admit(EventKind::Start, false);
        assert_eq!(l.admit(EventKind::End, false), Some(EventKind::End));
        assert_eq!(l, Lifecycle::Ended);
        assert_eq!(l.admit(EventKind::End, false), None);
    }

    #[test]
    fn ended_stream_reopens_with_start() {
        let mut l = Lifecycle::Ended;
        assert_eq!(l.admit(EventKind::Update, false), Some(EventKind::Start));
        assert_eq!(l, Lifecycle::Started);
    }

    #[test]
    fn resize_streams_bypass_lifecycle() {
        let mut l = Lifecycle::default();
        for kind in EventKind::ALL {
            assert_eq!(l.admit(kind, true), Some(EventKind::Resize));
        }
        assert_eq!(l, Lifecycle::Uninitialized);
    }

    #[test]
    fn resize_into_lifecycle_stream_is_update() {
        let mut l = Lifecycle::Started;
        assert_eq!(l.admit(EventKind::Resize, false), Some(EventKind::Update));
    }
}
