// Copyright 2026 the Cascade Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Animated scalar streams.
//!
//! A transition emits `Start(from)` when it begins moving, `Update(v)` for
//! each frame sampled by [`Engine::advance`], and `End(target)` when it
//! arrives. Jumps and untweened moves begin and end in one call. Starting a
//! new move cancels the running one.
//!
//! These calls emit synchronously, like [`Engine::emit`]. Code outside a
//! tick usually wraps them in a queued task.

use super::Engine;
use crate::stream::{ActiveTween, EventKind, Step, StreamId, StreamKind, Tween, Value};
use crate::time::HostTime;

impl Engine {
    /// Creates a transition resting at `initial`.
    pub fn create_transition(&mut self, initial: f64) -> StreamId {
        self.streams.alloc(
            StreamKind::Transition { active: None },
            false,
            Some(Value::Scalar(initial)),
        )
    }

    /// Moves to `value` at once: emits `Start(value)` then `End(value)`.
    pub fn transition_jump(&mut self, id: StreamId, value: f64) {
        let Some(i) = self.transition_slot(id) else {
            return;
        };
        self.publish(i, EventKind::Start, Value::Scalar(value));
        self.publish(i, EventKind::End, Value::Scalar(value));
    }

    /// Moves from the current value to `target`.
    ///
    /// Without a tween (or with a zero-length one) this emits `Start(from)`
    /// and `End(target)` immediately. Otherwise it emits `Start(from)`, and
    /// later ticks driven by [`advance`](Self::advance) emit the frames.
    pub fn transition_to(&mut self, id: StreamId, target: f64, tween: Option<Tween>) {
        let Some(i) = self.transition_slot(id) else {
            return;
        };
        let from = self.streams.value[i]
            .and_then(|v| v.as_scalar())
            .unwrap_or(target);
        self.publish(i, EventKind::Start, Value::Scalar(from));
        match tween {
            Some(tween) if !tween.duration.is_zero() => {
                if let StreamKind::Transition { active } = &mut self.streams.kind[i] {
                    *active = Some(ActiveTween::new(from, target, tween));
                }
                if !self.animating.contains(&id) {
                    self.animating.push(id);
                }
            }
            _ => self.publish(i, EventKind::End, Value::Scalar(target)),
        }
    }

    /// Cancels a running tween, leaving the value where it is.
    ///
    /// Emits `End(current)` if the transition was moving.
    pub fn transition_halt(&mut self, id: StreamId) {
        let Some(i) = self.streams.slot(id) else {
            return;
        };
        let was_active = match &mut self.streams.kind[i] {
            StreamKind::Transition { active } => active.take().is_some(),
            _ => false,
        };
        if was_active {
            self.animating.retain(|&a| a != id);
            if let Some(v) = self.streams.value[i] {
                self.publish(i, EventKind::End, v);
            }
        }
    }

    /// Whether `id` has a running tween.
    #[must_use]
    pub fn is_animating(&self, id: StreamId) -> bool {
        self.streams.slot(id).is_some_and(|i| {
            matches!(self.streams.kind[i], StreamKind::Transition {
                active: Some(_)
            })
        })
    }

    /// Cancels any running tween of `id` and returns its slot.
    fn transition_slot(&mut self, id: StreamId) -> Option<usize> {
        let i = self.streams.slot(id)?;
        match &mut self.streams.kind[i] {
            StreamKind::Transition { active } => {
                *active = None;
                Some(i)
            }
            _ => None,
        }
    }

    /// Samples every running tween at `now`.
    pub(crate) fn step_transitions(&mut self, now: HostTime) {
        let running = core::mem::take(&mut self.animating);
        for id in running {
            let Some(i) = self.streams.slot(id) else {
                continue;
            };
            let step = match &mut self.streams.kind[i] {
                StreamKind::Transition {
                    active: Some(active),
                } => active.step(now),
                _ => continue,
            };
            match step {
                Step::Running(v) => {
                    self.publish(i, EventKind::Update, Value::Scalar(v));
                    self.animating.push(id);
                }
                Step::Done(v) => {
                    if let StreamKind::Transition { active } = &mut self.streams.kind[i] {
                        *active = None;
                    }
                    self.publish(i, EventKind::End, Value::Scalar(v));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::cell::RefCell;

    use super::*;
    use crate::stream::Curve;
    use crate::time::Duration;

    type Log = Rc<RefCell<Vec<(EventKind, f64)>>>;

    fn record(engine: &mut Engine, id: StreamId) -> Log {
        let log: Log = Rc::default();
        for kind in EventKind::ALL {
            let log = Rc::clone(&log);
            engine.on(id, kind, move |e, _| {
                log.borrow_mut()
                    .push((e.kind, e.value.as_scalar().unwrap_or(f64::NAN)));
            });
        }
        log
    }

    #[test]
    fn jump_starts_and_ends() {
        let mut engine = Engine::default();
        let t = engine.create_transition(0.0);
        let log = record(&mut engine, t);
        engine.transition_jump(t, 4.0);
        assert_eq!(*log.borrow(), vec![(EventKind::Start, 4.0), (EventKind::End, 4.0)]);
        assert_eq!(engine.scalar(t), Some(4.0));
    }

    #[test]
    fn untweened_move_is_immediate() {
        let mut engine = Engine::default();
        let t = engine.create_transition(1.0);
        let log = record(&mut engine, t);
        engine.transition_to(t, 3.0, None);
        assert_eq!(*log.borrow(), vec![(EventKind::Start, 1.0), (EventKind::End, 3.0)]);
        assert!(!engine.is_animating(t));
    }

    #[test]
    fn tweened_move_emits_frames() {
        let mut engine = Engine::default();
        let t = engine.create_transition(0.0);
        let log = record(&mut engine, t);
        engine.transition_to(t, 10.0, Some(Tween::new(Duration(100), Curve::Linear)));
        assert!(engine.is_animating(t));

        engine.advance(HostTime(1_000));
        engine.advance(HostTime(1_050));
        engine.advance(HostTime(1_100));
        engine.advance(HostTime(1_200));

        assert_eq!(*log.borrow(), vec![
            (EventKind::Start, 0.0),
            (EventKind::Update, 0.0),
            (EventKind::Update, 5.0),
            (EventKind::End, 10.0),
        ]);
        assert!(!engine.is_animating(t));
        assert!(!engine.has_pending_work());
    }

    #[test]
    fn new_move_cancels_running_one() {
        let mut engine = Engine::default();
        let t = engine.create_transition(0.0);
        let tween = Some(Tween::linear(Duration(100)));
        engine.transition_to(t, 10.0, tween);
        engine.advance(HostTime(0));
        engine.advance(HostTime(50));
        engine.transition_to(t, 0.0, tween);
        engine.advance(HostTime(60));
        engine.advance(HostTime(160));
        assert_eq!(engine.scalar(t), Some(0.0));
        assert!(!engine.is_animating(t));
    }

    #[test]
    fn halt_ends_in_place() {
        let mut engine = Engine::default();
        let t = engine.create_transition(0.0);
        engine.transition_to(t, 10.0, Some(Tween::linear(Duration(100))));
        engine.advance(HostTime(0));
        engine.advance(HostTime(25));
        let log = record(&mut engine, t);
        engine.transition_halt(t);
        assert_eq!(*log.borrow(), vec![(EventKind::End, 2.5)]);
        assert!(!engine.has_pending_work());
    }

    #[test]
    fn destroyed_transition_stops_animating() {
        let mut engine = Engine::default();
        let t = engine.create_transition(0.0);
        engine.transition_to(t, 1.0, Some(Tween::linear(Duration(10))));
        engine.destroy_stream(t);
        let report = engine.advance(HostTime(5));
        assert_eq!(report.emissions, 0);
        assert!(!engine.has_pending_work());
    }
}
