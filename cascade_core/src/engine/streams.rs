// Copyright 2026 the Cascade Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stream creation, wiring, and listeners.

use alloc::boxed::Box;
use alloc::vec::Vec;

use super::Engine;
use crate::router::Direction;
use crate::scheduler::Scheduler;
use crate::stream::{Event, EventKind, Filter, Lifecycle, StreamId, StreamKind, Value};

impl Engine {
    // -- Creation --

    /// Creates a stream that emits only what is pushed into it.
    pub fn create_source(&mut self, initial: Option<Value>) -> StreamId {
        self.streams.alloc(StreamKind::Source, false, initial)
    }

    /// Creates a stream that echoes everything it receives.
    pub fn create_relay(&mut self) -> StreamId {
        self.streams.alloc(StreamKind::Relay, false, None)
    }

    /// Creates a lift over `inputs` and subscribes it to each of them.
    ///
    /// Whenever any input emits, `f` is called with the latest value of every
    /// input, in order (`None` for unresolved inputs). The event kind of the
    /// triggering emission is kept. Returning `None` emits nothing.
    pub fn lift(
        &mut self,
        inputs: &[StreamId],
        f: impl Fn(&[Option<&Value>]) -> Option<Value> + 'static,
    ) -> StreamId {
        self.lift_with(inputs, false, Box::new(f))
    }

    /// A [`lift`](Self::lift) that stays unresolved until every input is
    /// resolved.
    pub fn lift_all(
        &mut self,
        inputs: &[StreamId],
        f: impl Fn(&[&Value]) -> Option<Value> + 'static,
    ) -> StreamId {
        self.lift(inputs, move |values| {
            let all: Option<Vec<&Value>> = values.iter().copied().collect();
            f(&all?)
        })
    }

    pub(crate) fn lift_with(
        &mut self,
        inputs: &[StreamId],
        resize: bool,
        f: crate::stream::LiftFn,
    ) -> StreamId {
        let live: Vec<StreamId> = inputs
            .iter()
            .copied()
            .filter(|&id| self.streams.is_alive(id))
            .collect();
        let lift = self.streams.alloc(
            StreamKind::Lift {
                inputs: inputs.to_vec(),
                f,
            },
            resize,
            None,
        );
        for input in live {
            self.subscribe(lift, input);
        }
        // Resolve immediately from whatever the inputs already hold.
        if let Some(i) = self.streams.slot(lift) {
            if let StreamKind::Lift { inputs, f } = &self.streams.kind[i] {
                let value = f(&self.streams.gather(inputs));
                self.streams.value[i] = value;
            }
        }
        lift
    }

    /// Creates a running total of scalar deltas, starting at `seed`.
    ///
    /// Every incoming `Start`, `Update`, and `End` adds its value to the
    /// total, which is then emitted with the incoming kind.
    pub fn accumulator(&mut self, seed: f64) -> StreamId {
        self.streams.alloc(
            StreamKind::Accumulator { total: seed },
            false,
            Some(Value::Scalar(seed)),
        )
    }

    /// Creates a stream emitting the difference between consecutive scalars.
    ///
    /// `Start(v)` records `v` and emits `Start(0)`; later events emit the
    /// change since the previous value.
    pub fn differencer(&mut self) -> StreamId {
        self.streams
            .alloc(StreamKind::Differencer { previous: None }, false, None)
    }

    /// Creates a stateless transform stream.
    pub fn map(&mut self, f: impl Fn(&Value) -> Option<Value> + 'static) -> StreamId {
        self.streams.alloc(StreamKind::Map(Box::new(f)), false, None)
    }

    /// Creates a stream with per-kind input handlers.
    pub fn filter(&mut self, filter: Filter) -> StreamId {
        self.streams.alloc(StreamKind::Filter(filter), false, None)
    }

    /// Creates a stream that folds incoming patches into its current value.
    ///
    /// `f(current, patch)` returns the new value, or `None` to ignore the
    /// patch.
    pub fn merge(
        &mut self,
        initial: Option<Value>,
        f: impl Fn(Option<&Value>, &Value) -> Option<Value> + 'static,
    ) -> StreamId {
        self.streams
            .alloc(StreamKind::Merge(Box::new(f)), false, initial)
    }

    // -- Wiring --

    /// Feeds everything `source` emits into `target`.
    ///
    /// Returns `false` if either handle is stale or the edge already exists.
    pub fn subscribe(&mut self, target: StreamId, source: StreamId) -> bool {
        match (self.streams.slot(target), self.streams.slot(source)) {
            (Some(_), Some(_)) if target != source => self.streams.link(target.idx, source.idx),
            _ => false,
        }
    }

    /// Removes the edge `source -> target`.
    ///
    /// Returns `false` if either handle is stale or there was no such edge.
    pub fn unsubscribe(&mut self, target: StreamId, source: StreamId) -> bool {
        match (self.streams.slot(target), self.streams.slot(source)) {
            (Some(_), Some(_)) => self.streams.unlink(target.idx, source.idx),
            _ => false,
        }
    }

    /// Destroys a stream and every edge touching it.
    ///
    /// Returns `false` for a stale handle.
    pub fn destroy_stream(&mut self, stream: StreamId) -> bool {
        self.streams.free(stream)
    }

    // -- Listeners --

    /// Calls `handler` for every event of `kind` that `stream` emits.
    ///
    /// The handler only gets the scheduler: any follow-up work, including
    /// registering further handlers, is deferred. No-op for a stale handle.
    pub fn on(
        &mut self,
        stream: StreamId,
        kind: EventKind,
        handler: impl FnMut(&Event, &mut Scheduler<Self>) + 'static,
    ) {
        self.register(stream, Direction::Output, kind, handler);
    }

    /// Calls `handler` for every event of `kind` delivered to `stream`,
    /// before the stream processes it.
    pub fn on_input(
        &mut self,
        stream: StreamId,
        kind: EventKind,
        handler: impl FnMut(&Event, &mut Scheduler<Self>) + 'static,
    ) {
        self.register(stream, Direction::Input, kind, handler);
    }

    fn register(
        &mut self,
        stream: StreamId,
        direction: Direction,
        kind: EventKind,
        handler: impl FnMut(&Event, &mut Scheduler<Self>) + 'static,
    ) {
        if let Some(i) = self.streams.slot(stream) {
            self.streams.router[i].register(direction, kind, handler);
        }
    }

    // -- Queries --

    /// Last value `stream` observed; `None` if unresolved or stale.
    #[must_use]
    pub fn value(&self, stream: StreamId) -> Option<&Value> {
        self.streams.value(stream)
    }

    /// Last scalar `stream` observed.
    #[must_use]
    pub fn scalar(&self, stream: StreamId) -> Option<f64> {
        self.value(stream).and_then(Value::as_scalar)
    }

    /// Lifecycle state of `stream`.
    #[must_use]
    pub fn lifecycle(&self, stream: StreamId) -> Option<Lifecycle> {
        self.streams.lifecycle(stream)
    }
}
