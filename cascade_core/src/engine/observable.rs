// Copyright 2026 the Cascade Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Size observables: externally writable size streams (viewports).

use kurbo::Size;

use super::Engine;
use crate::stream::{Event, StreamId, StreamKind, Value};

impl Engine {
    /// Creates a size-carrying source.
    ///
    /// `initial` is readable right away with
    /// [`size_observable_get`](Self::size_observable_get). It is also
    /// written with [`size_observable_set`](Self::size_observable_set), so
    /// subscribers see it during the next tick.
    pub fn create_size_observable(&mut self, initial: Option<Size>) -> StreamId {
        let id = self
            .streams
            .alloc(StreamKind::Source, true, initial.map(Value::Size));
        if let Some(size) = initial {
            self.size_observable_set(id, size);
        }
        id
    }

    /// The initial size, or the last one written and settled by a tick.
    #[must_use]
    pub fn size_observable_get(&self, id: StreamId) -> Option<Size> {
        self.streams.value(id).and_then(Value::as_size)
    }

    /// Writes a new size.
    ///
    /// A pre-tick task stores the value and emits `Resize`; it queues a
    /// dirty task that emits `Resize` again with the same value so that
    /// streams updated during the pre-tick phase settle. Subscribers thus
    /// see exactly two emissions per write.
    pub fn size_observable_set(&mut self, id: StreamId, size: Size) {
        self.scheduler.enqueue_pre_tick(move |engine: &mut Self| {
            engine.emit(id, Event::resize(size));
            engine
                .scheduler
                .enqueue_dirty(move |engine: &mut Self| engine.emit(id, Event::resize(size)));
        });
    }
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::cell::{Cell, RefCell};

    use super::*;
    use crate::stream::EventKind;

    #[test]
    fn initial_size_is_readable_at_once() {
        let mut engine = Engine::default();
        let vp = engine.create_size_observable(Some(Size::new(800.0, 600.0)));
        assert_eq!(engine.size_observable_get(vp), Some(Size::new(800.0, 600.0)));
        let empty = engine.create_size_observable(None);
        assert_eq!(engine.size_observable_get(empty), None);
    }

    #[test]
    fn set_is_visible_after_tick() {
        let mut engine = Engine::default();
        let vp = engine.create_size_observable(Some(Size::new(800.0, 600.0)));
        engine.tick();
        engine.size_observable_set(vp, Size::new(640.0, 480.0));
        assert_eq!(engine.size_observable_get(vp), Some(Size::new(800.0, 600.0)));
        engine.tick();
        assert_eq!(engine.size_observable_get(vp), Some(Size::new(640.0, 480.0)));
    }

    #[test]
    fn listener_added_during_pre_tick_sees_settle_pass() {
        let mut engine = Engine::default();
        let vp = engine.create_size_observable(None);
        let late: Rc<RefCell<Vec<Size>>> = Rc::default();
        let armed = Rc::new(Cell::new(true));
        let l = Rc::clone(&late);
        engine.on(vp, EventKind::Resize, move |_, scheduler| {
            if !armed.replace(false) {
                return;
            }
            let l = Rc::clone(&l);
            scheduler.enqueue_dirty(move |engine: &mut Engine| {
                engine.on(vp, EventKind::Resize, move |e, _| {
                    l.borrow_mut().extend(e.value.as_size());
                });
            });
        });
        engine.size_observable_set(vp, Size::new(30.0, 40.0));
        engine.tick();
        assert_eq!(*late.borrow(), vec![Size::new(30.0, 40.0)]);
    }

    #[test]
    fn one_set_emits_resize_twice() {
        let mut engine = Engine::default();
        let vp = engine.create_size_observable(None);
        let seen: Rc<RefCell<Vec<Size>>> = Rc::default();
        let s = Rc::clone(&seen);
        engine.on(vp, EventKind::Resize, move |e, _| {
            s.borrow_mut().extend(e.value.as_size());
        });
        engine.size_observable_set(vp, Size::new(10.0, 20.0));
        let report = engine.tick();
        assert_eq!(*seen.borrow(), vec![Size::new(10.0, 20.0); 2]);
        assert_eq!(report.drain.pre_tick_tasks, 1);
        assert_eq!(report.drain.dirty_tasks, 1);
    }

    #[test]
    fn size_streams_never_start() {
        let mut engine = Engine::default();
        let vp = engine.create_size_observable(Some(Size::new(1.0, 1.0)));
        let kinds: Rc<RefCell<Vec<EventKind>>> = Rc::default();
        for kind in EventKind::ALL {
            let k = Rc::clone(&kinds);
            engine.on(vp, kind, move |e, _| k.borrow_mut().push(e.kind));
        }
        engine.tick();
        assert_eq!(*kinds.borrow(), vec![EventKind::Resize, EventKind::Resize]);
    }

    #[test]
    fn set_on_destroyed_observable_is_a_no_op() {
        let mut engine = Engine::default();
        let vp = engine.create_size_observable(None);
        engine.size_observable_set(vp, Size::new(5.0, 5.0));
        engine.destroy_stream(vp);
        let report = engine.tick();
        assert_eq!(report.emissions, 0);
        assert_eq!(engine.size_observable_get(vp), None);
    }
}
