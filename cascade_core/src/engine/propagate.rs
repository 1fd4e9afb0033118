// Copyright 2026 the Cascade Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Synchronous, depth-first event propagation.
//!
//! An event delivered to a stream runs, in order:
//!
//! 1. the stream's input handlers;
//! 2. the stream's kind, producing an outgoing value (or nothing);
//! 3. the lifecycle gate, which may rewrite or drop the outgoing kind;
//! 4. the stream's output handlers;
//! 5. delivery to every subscriber, in subscription order.
//!
//! The stream's value is updated at step 2 even when the gate drops the
//! event. A stream already on the delivery stack ignores further deliveries,
//! so a subscription cycle ends after one pass.
//!
//! Lifts are the exception: a delivery only queues them. Once the
//! emission that reached them has fanned out, queued lifts are recomputed
//! lowest rank first, each at most once per pass. Outside a cycle, a
//! stream's rank exceeds the rank of every stream it is subscribed to, so a
//! lift reads its inputs only after all of them have been updated.

use core::cmp::Reverse;

use super::Engine;
use crate::router::Direction;
use crate::stream::{Event, EventKind, Lifecycle, StreamId, StreamKind, Value};
#[cfg(feature = "trace-rich")]
use crate::trace::EmissionRecord;

impl Engine {
    /// Pushes `event` through `stream` and everything downstream of it.
    ///
    /// No-op for a stale handle.
    pub fn emit(&mut self, stream: StreamId, event: Event) {
        let Some(i) = self.streams.slot(stream) else {
            return;
        };
        self.deliver(i, event);
        self.settle_lifts();
    }

    fn deliver(&mut self, i: usize, event: Event) {
        if self.streams.delivering[i] {
            return;
        }
        self.streams.router[i].dispatch(Direction::Input, &event, &mut self.scheduler);
        if matches!(self.streams.kind[i], StreamKind::Lift { .. }) {
            self.queue_lift(i, event.kind);
        } else if let Some(value) = self.process(i, &event) {
            self.fan_out(i, event.kind, value);
        }
    }

    /// Runs `event` through the kind of slot `i`. Lifts are never processed
    /// here.
    fn process(&mut self, i: usize, event: &Event) -> Option<Value> {
        let streams = &self.streams;
        let stateless = match &streams.kind[i] {
            StreamKind::Source | StreamKind::Relay | StreamKind::Transition { .. } => {
                Some(Some(event.value))
            }
            StreamKind::Map(f) => Some(f(&event.value)),
            StreamKind::Filter(filter) => Some(filter.apply(event, streams)),
            StreamKind::Merge(f) => Some(f(streams.value[i].as_ref(), &event.value)),
            StreamKind::Lift { .. }
            | StreamKind::Accumulator { .. }
            | StreamKind::Differencer { .. } => None,
        };
        if let Some(out) = stateless {
            return out;
        }

        let v = event.value.as_scalar()?;
        match &mut self.streams.kind[i] {
            StreamKind::Accumulator { total } => {
                *total += v;
                Some(Value::Scalar(*total))
            }
            StreamKind::Differencer { previous } => {
                let diff = match (event.kind, *previous) {
                    (EventKind::Start, _) | (_, None) => 0.0,
                    (_, Some(p)) => v - p,
                };
                *previous = Some(v);
                Some(Value::Scalar(diff))
            }
            _ => None,
        }
    }

    fn queue_lift(&mut self, i: usize, kind: EventKind) {
        let streams = &mut self.streams;
        if streams.settled[i] || streams.pending[i].is_some() {
            return;
        }
        streams.pending[i] = Some(kind);
        self.lift_queue.push(Reverse((streams.rank[i], i)));
    }

    /// Recomputes queued lifts, lowest rank first, until none is left.
    fn settle_lifts(&mut self) {
        while let Some(Reverse((_, i))) = self.lift_queue.pop() {
            let Some(kind) = self.streams.pending[i].take() else {
                continue;
            };
            self.streams.settled[i] = true;
            self.settled_lifts.push(i);
            let value = match &self.streams.kind[i] {
                StreamKind::Lift { inputs, f } => f(&self.streams.gather(inputs)),
                _ => None,
            };
            if let Some(value) = value {
                self.fan_out(i, kind, value);
            }
        }
        for i in self.settled_lifts.drain(..) {
            self.streams.settled[i] = false;
        }
    }

    /// Stores `value` in slot `i`, emits it, and settles the lifts it
    /// reaches.
    pub(crate) fn publish(&mut self, i: usize, kind: EventKind, value: Value) {
        self.fan_out(i, kind, value);
        self.settle_lifts();
    }

    fn fan_out(&mut self, i: usize, kind: EventKind, value: Value) {
        self.streams.value[i] = Some(value);
        let resize = self.streams.resize[i];
        let Some(kind) = self.streams.lifecycle[i].admit(kind, resize) else {
            return;
        };

        if let Some((node, mark)) = self.streams.mark[i] {
            self.tree.dirty.mark(node, mark.channel());
        }
        self.emissions += 1;
        #[cfg(feature = "trace-rich")]
        self.emission_log.push(EmissionRecord {
            stream_index: u32::try_from(i).unwrap_or(crate::stream::INVALID),
            kind,
            node: self.streams.mark[i].map(|(n, _)| n),
        });

        let event = Event { kind, value };
        self.streams.router[i].dispatch(Direction::Output, &event, &mut self.scheduler);

        let was = core::mem::replace(&mut self.streams.delivering[i], true);
        let mut k = 0;
        while let Some(&target) = self.streams.subscribers[i].get(k) {
            self.deliver(target as usize, event);
            k += 1;
        }
        self.streams.delivering[i] = was;
    }

    /// Re-emits the current value of each of `streams` without reprocessing
    /// it, as one pass.
    ///
    /// Size-carrying streams re-emit `Resize`; started lifecycle streams
    /// re-emit `Update`. Unresolved, never-started, and ended streams stay
    /// quiet, as do stale handles. A lift already queued by an earlier
    /// stream of the list is recomputed instead of re-emitted, so it emits
    /// once.
    pub(crate) fn republish(&mut self, streams: &[StreamId]) {
        for &stream in streams {
            let Some(i) = self.streams.slot(stream) else {
                continue;
            };
            if self.streams.pending[i].is_some() || self.streams.delivering[i] {
                continue;
            }
            let Some(value) = self.streams.value[i] else {
                continue;
            };
            let kind = if self.streams.resize[i] {
                EventKind::Resize
            } else if self.streams.lifecycle[i] == Lifecycle::Started {
                EventKind::Update
            } else {
                continue;
            };
            self.fan_out(i, kind, value);
        }
        self.settle_lifts();
    }
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::cell::RefCell;

    use super::*;

    type Log = Rc<RefCell<Vec<Event>>>;

    fn record(engine: &mut Engine, stream: StreamId) -> Log {
        let log: Log = Rc::default();
        for kind in EventKind::ALL {
            let log = Rc::clone(&log);
            engine.on(stream, kind, move |e, _| log.borrow_mut().push(*e));
        }
        log
    }

    #[test]
    fn relay_echoes_in_subscription_order() {
        let mut engine = Engine::default();
        let src = engine.create_source(None);
        let a = engine.create_relay();
        let b = engine.create_relay();
        engine.subscribe(a, src);
        engine.subscribe(b, src);

        let order: Rc<RefCell<Vec<char>>> = Rc::default();
        for (id, name) in [(a, 'a'), (b, 'b')] {
            let order = Rc::clone(&order);
            engine.on(id, EventKind::Start, move |_, _| order.borrow_mut().push(name));
        }
        engine.emit(src, Event::start(1.0));
        assert_eq!(*order.borrow(), vec!['a', 'b']);
        assert_eq!(engine.value(b), Some(&Value::Scalar(1.0)));
    }

    #[test]
    fn emission_is_depth_first() {
        let mut engine = Engine::default();
        let src = engine.create_source(None);
        let a = engine.create_relay();
        let a_child = engine.create_relay();
        let b = engine.create_relay();
        engine.subscribe(a, src);
        engine.subscribe(a_child, a);
        engine.subscribe(b, src);

        let order: Rc<RefCell<Vec<&'static str>>> = Rc::default();
        for (id, name) in [(a, "a"), (a_child, "a.child"), (b, "b")] {
            let order = Rc::clone(&order);
            engine.on(id, EventKind::Start, move |_, _| order.borrow_mut().push(name));
        }
        engine.emit(src, Event::start(0.0));
        assert_eq!(*order.borrow(), vec!["a", "a.child", "b"]);
    }

    #[test]
    fn lifecycle_gate_applies_downstream() {
        let mut engine = Engine::default();
        let src = engine.create_source(None);
        let relay = engine.create_relay();
        engine.subscribe(relay, src);
        let log = record(&mut engine, relay);

        engine.emit(src, Event::update(1.0));
        engine.emit(src, Event::start(2.0));
        engine.emit(src, Event::end(3.0));
        engine.emit(src, Event::end(4.0));
        engine.emit(src, Event::update(5.0));

        let kinds: Vec<_> = log.borrow().iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![
            EventKind::Start,
            EventKind::Update,
            EventKind::End,
            EventKind::Start,
        ]);
        assert_eq!(engine.streams().lifecycle(relay), Some(Lifecycle::Started));
    }

    #[test]
    fn input_handlers_see_raw_events() {
        let mut engine = Engine::default();
        let relay = engine.create_relay();
        let seen: Rc<RefCell<Vec<EventKind>>> = Rc::default();
        let s = Rc::clone(&seen);
        engine.on_input(relay, EventKind::End, move |e, _| s.borrow_mut().push(e.kind));
        engine.emit(relay, Event::end(1.0));
        assert_eq!(*seen.borrow(), vec![EventKind::End], "input sees the event the gate drops");
        assert_eq!(engine.streams().lifecycle(relay), Some(Lifecycle::Uninitialized));
    }

    #[test]
    fn cycles_terminate() {
        let mut engine = Engine::default();
        let a = engine.create_relay();
        let b = engine.create_relay();
        engine.subscribe(b, a);
        engine.subscribe(a, b);
        let log = record(&mut engine, b);
        engine.emit(a, Event::start(1.0));
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn diamond_lift_emits_once_with_both_inputs() {
        let mut engine = Engine::default();
        let src = engine.create_source(None);
        let doubled = engine.map(|v| Some(Value::Scalar(v.as_scalar()? * 2.0)));
        let sum = engine.lift_all(&[src, doubled], |v| {
            Some(Value::Scalar(v[0].as_scalar()? + v[1].as_scalar()?))
        });
        // `sum` hears from `src` before `doubled` has caught up.
        engine.subscribe(doubled, src);
        let log = record(&mut engine, sum);

        engine.emit(src, Event::start(1.0));
        engine.emit(src, Event::update(5.0));
        let values: Vec<_> = log.borrow().iter().map(|e| e.value).collect();
        assert_eq!(values, vec![Value::Scalar(3.0), Value::Scalar(15.0)]);
    }

    #[test]
    fn lift_waits_for_deeper_inputs() {
        let mut engine = Engine::default();
        let src = engine.create_source(None);
        // `sum` is created before the chain feeding its second input.
        let near = engine.create_relay();
        let far = engine.create_relay();
        let sum = engine.lift_all(&[near, far], |v| {
            Some(Value::Scalar(v[0].as_scalar()? + v[1].as_scalar()?))
        });
        let mid = engine.create_relay();
        engine.subscribe(near, src);
        engine.subscribe(mid, src);
        engine.subscribe(far, mid);
        let log = record(&mut engine, sum);

        engine.emit(src, Event::start(1.0));
        engine.emit(src, Event::update(4.0));
        let values: Vec<_> = log.borrow().iter().map(|e| e.value).collect();
        assert_eq!(values, vec![Value::Scalar(2.0), Value::Scalar(8.0)]);
    }

    #[test]
    fn lift_cycles_terminate() {
        let mut engine = Engine::default();
        let relay = engine.create_relay();
        let plus_one = engine.lift(&[relay], |v| Some(Value::Scalar(v[0]?.as_scalar()? + 1.0)));
        engine.subscribe(relay, plus_one);
        let log = record(&mut engine, plus_one);
        engine.emit(relay, Event::start(1.0));
        assert_eq!(log.borrow().len(), 1);
        assert_eq!(engine.scalar(plus_one), Some(2.0));
    }

    #[test]
    fn handler_registered_during_dispatch_waits() {
        let mut engine = Engine::default();
        let src = engine.create_source(None);
        let hits: Rc<RefCell<u32>> = Rc::default();
        let h = Rc::clone(&hits);
        engine.on(src, EventKind::Update, move |_, scheduler| {
            let h = Rc::clone(&h);
            scheduler.enqueue_dirty(move |engine: &mut Engine| {
                engine.on(src, EventKind::Update, move |_, _| *h.borrow_mut() += 1);
            });
        });
        engine.emit(src, Event::start(0.0));
        engine.emit(src, Event::update(1.0));
        assert_eq!(*hits.borrow(), 0);
        engine.tick();
        assert_eq!(*hits.borrow(), 0, "registration alone does not dispatch");
        engine.emit(src, Event::update(2.0));
        assert_eq!(*hits.borrow(), 1);
    }

    #[test]
    fn republish_respects_lifecycle() {
        let mut engine = Engine::default();
        let src = engine.create_source(None);
        let relay = engine.create_relay();
        engine.subscribe(relay, src);
        let log = record(&mut engine, relay);

        engine.republish(&[src]);
        assert!(log.borrow().is_empty(), "unresolved stays quiet");
        engine.emit(src, Event::start(1.0));
        engine.republish(&[src]);
        engine.emit(src, Event::end(2.0));
        engine.republish(&[src]);

        let kinds: Vec<_> = log.borrow().iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![EventKind::Start, EventKind::Update, EventKind::End]);
    }
}
