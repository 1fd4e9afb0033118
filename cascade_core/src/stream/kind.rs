// Copyright 2026 the Cascade Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! How each stream turns incoming events into outgoing values.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use super::event::{Event, EventKind};
use super::id::StreamId;
use super::store::StreamStore;
use super::transition::ActiveTween;
use super::value::Value;

/// Recomputes a lift from the latest value of each input, in input order.
pub type LiftFn = Box<dyn Fn(&[Option<&Value>]) -> Option<Value>>;

/// A stateless per-value transform.
pub type MapFn = Box<dyn Fn(&Value) -> Option<Value>>;

/// Folds a patch into the current value.
pub type MergeFn = Box<dyn Fn(Option<&Value>, &Value) -> Option<Value>>;

/// A filter handler for one event kind.
///
/// Receives the incoming value and a read-only view of every stream.
pub type FilterFn = Box<dyn Fn(&Value, &StreamStore) -> Option<Value>>;

/// Per-kind input handlers of a filter stream.
///
/// A kind with no handler passes its value through unchanged. A handler that
/// returns `None` swallows the event. `Resize` uses the update handler.
#[derive(Default)]
pub struct Filter {
    start: Option<FilterFn>,
    update: Option<FilterFn>,
    end: Option<FilterFn>,
}

impl Filter {
    /// A filter that passes everything through.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the `Start` handler.
    #[must_use]
    pub fn on_start(
        mut self,
        f: impl Fn(&Value, &StreamStore) -> Option<Value> + 'static,
    ) -> Self {
        self.start = Some(Box::new(f));
        self
    }

    /// Sets the `Update` (and `Resize`) handler.
    #[must_use]
    pub fn on_update(
        mut self,
        f: impl Fn(&Value, &StreamStore) -> Option<Value> + 'static,
    ) -> Self {
        self.update = Some(Box::new(f));
        self
    }

    /// Sets the `End` handler.
    #[must_use]
    pub fn on_end(mut self, f: impl Fn(&Value, &StreamStore) -> Option<Value> + 'static) -> Self {
        self.end = Some(Box::new(f));
        self
    }

    pub(crate) fn apply(&self, event: &Event, streams: &StreamStore) -> Option<Value> {
        let handler = match event.kind {
            EventKind::Start => &self.start,
            EventKind::Update | EventKind::Resize => &self.update,
            EventKind::End => &self.end,
        };
        match handler {
            Some(f) => f(&event.value, streams),
            None => Some(event.value),
        }
    }
}

impl fmt::Debug for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Filter")
            .field("start", &self.start.is_some())
            .field("update", &self.update.is_some())
            .field("end", &self.end.is_some())
            .finish()
    }
}

/// The processing rule of a stream slot.
pub(crate) enum StreamKind {
    /// Emits only what is pushed into it with `emit`, unchanged.
    Source,
    /// Echoes every event it receives.
    Relay,
    /// Recomputed from its inputs whenever one of them emits.
    Lift { inputs: Vec<StreamId>, f: LiftFn },
    /// Running total of scalar deltas.
    Accumulator { total: f64 },
    /// Difference between consecutive scalars.
    Differencer { previous: Option<f64> },
    Map(MapFn),
    Filter(Filter),
    Merge(MergeFn),
    /// Animated scalar; emits on its own through the engine's transition API.
    Transition { active: Option<ActiveTween> },
}

impl StreamKind {
    /// Short name for diagnostics.
    pub(crate) fn name(&self) -> &'static str {
        match self {
            Self::Source => "source",
            Self::Relay => "relay",
            Self::Lift { .. } => "lift",
            Self::Accumulator { .. } => "accumulator",
            Self::Differencer { .. } => "differencer",
            Self::Map(_) => "map",
            Self::Filter(_) => "filter",
            Self::Merge(_) => "merge",
            Self::Transition { .. } => "transition",
        }
    }
}

impl fmt::Debug for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
