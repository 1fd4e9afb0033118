// Copyright 2026 the Cascade Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Two-phase cooperative task scheduling.
//!
//! A [`Scheduler`] holds two FIFO queues of deferred tasks:
//!
//! - **pre-tick**: mutations requested from outside a tick (option setters,
//!   size observable writes, transition frames);
//! - **dirty**: re-emissions that settle dependent streams after the
//!   pre-tick work of a round has run.
//!
//! [`drain_all`] runs rounds. A round drains the pre-tick queue to
//! exhaustion (tasks enqueued while draining run in the same phase), then
//! the dirty queue the same way. If the dirty phase queued fresh pre-tick
//! work another round follows, up to [`SchedulerConfig::max_rounds`].
//!
//! Tasks receive the context `C` by `&mut`, and `C` gives access back to its
//! scheduler through [`Schedule`], so a task can enqueue further work.

use alloc::boxed::Box;
use alloc::collections::VecDeque;
use core::fmt;

/// A deferred unit of work over context `C`.
pub type Task<C> = Box<dyn FnOnce(&mut C)>;

/// Which queue a task lives in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Phase one.
    PreTick,
    /// Phase two.
    Dirty,
}

/// Configuration for the [`Scheduler`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Upper bound on pre-tick/dirty rounds per drain. Work enqueued past
    /// the bound stays queued for the next drain.
    pub max_rounds: u32,
}

impl SchedulerConfig {
    /// Sixteen rounds.
    #[must_use]
    pub const fn standard() -> Self {
        Self { max_rounds: 16 }
    }

    /// A single round per drain; cross-phase feedback waits a tick.
    #[must_use]
    pub const fn single_round() -> Self {
        Self { max_rounds: 1 }
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self::standard()
    }
}

/// The two task queues.
pub struct Scheduler<C> {
    config: SchedulerConfig,
    pre_tick: VecDeque<Task<C>>,
    dirty: VecDeque<Task<C>>,
}

impl<C> Scheduler<C> {
    /// Creates an idle scheduler.
    #[must_use]
    pub fn new(config: SchedulerConfig) -> Self {
        Self {
            config,
            pre_tick: VecDeque::new(),
            dirty: VecDeque::new(),
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Queues `task` for the pre-tick phase.
    pub fn enqueue_pre_tick(&mut self, task: impl FnOnce(&mut C) + 'static) {
        self.pre_tick.push_back(Box::new(task));
    }

    /// Queues `task` for the dirty phase.
    pub fn enqueue_dirty(&mut self, task: impl FnOnce(&mut C) + 'static) {
        self.dirty.push_back(Box::new(task));
    }

    /// Queues `task` for `phase`.
    pub fn enqueue(&mut self, phase: Phase, task: impl FnOnce(&mut C) + 'static) {
        match phase {
            Phase::PreTick => self.enqueue_pre_tick(task),
            Phase::Dirty => self.enqueue_dirty(task),
        }
    }

    /// Number of tasks waiting in `phase`.
    #[must_use]
    pub fn pending(&self, phase: Phase) -> usize {
        match phase {
            Phase::PreTick => self.pre_tick.len(),
            Phase::Dirty => self.dirty.len(),
        }
    }

    /// Whether both queues are empty.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.pre_tick.is_empty() && self.dirty.is_empty()
    }

    /// Drops every queued task without running it.
    pub fn clear(&mut self) {
        self.pre_tick.clear();
        self.dirty.clear();
    }

    fn pop(&mut self, phase: Phase) -> Option<Task<C>> {
        match phase {
            Phase::PreTick => self.pre_tick.pop_front(),
            Phase::Dirty => self.dirty.pop_front(),
        }
    }
}

impl<C> Default for Scheduler<C> {
    fn default() -> Self {
        Self::new(SchedulerConfig::default())
    }
}

impl<C> fmt::Debug for Scheduler<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scheduler")
            .field("config", &self.config)
            .field("pre_tick", &self.pre_tick.len())
            .field("dirty", &self.dirty.len())
            .finish()
    }
}

/// A context that owns a [`Scheduler`] over itself.
pub trait Schedule: Sized {
    /// The scheduler whose tasks receive `self`.
    fn scheduler(&mut self) -> &mut Scheduler<Self>;
}

/// A phase boundary reported by [`drain_all_observed`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PhaseMark {
    /// A phase is about to drain.
    Begin {
        /// 1-based round number.
        round: u32,
        /// The phase.
        phase: Phase,
    },
    /// A phase has drained.
    End {
        /// 1-based round number.
        round: u32,
        /// The phase.
        phase: Phase,
        /// Tasks run during the phase.
        tasks: usize,
    },
}

/// Summary of one [`drain_all`] call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DrainReport {
    /// Rounds executed.
    pub rounds: u32,
    /// Pre-tick tasks run, over all rounds.
    pub pre_tick_tasks: usize,
    /// Dirty tasks run, over all rounds.
    pub dirty_tasks: usize,
    /// `false` if the round bound was hit with work still queued.
    pub settled: bool,
}

impl DrainReport {
    /// Total tasks run.
    #[must_use]
    pub fn tasks(&self) -> usize {
        self.pre_tick_tasks + self.dirty_tasks
    }
}

/// Drains both queues of `cx`'s scheduler in rounds.
pub fn drain_all<C: Schedule>(cx: &mut C) -> DrainReport {
    drain_all_observed(cx, |_| {})
}

/// [`drain_all`], reporting every phase boundary to `observe`.
pub fn drain_all_observed<C: Schedule>(
    cx: &mut C,
    mut observe: impl FnMut(PhaseMark),
) -> DrainReport {
    let max_rounds = cx.scheduler().config.max_rounds.max(1);
    let mut report = DrainReport::default();
    while !cx.scheduler().is_idle() {
        if report.rounds == max_rounds {
            return report;
        }
        report.rounds += 1;
        let round = report.rounds;
        for phase in [Phase::PreTick, Phase::Dirty] {
            observe(PhaseMark::Begin { round, phase });
            let tasks = drain_phase(cx, phase);
            observe(PhaseMark::End {
                round,
                phase,
                tasks,
            });
            match phase {
                Phase::PreTick => report.pre_tick_tasks += tasks,
                Phase::Dirty => report.dirty_tasks += tasks,
            }
        }
    }
    report.settled = true;
    report
}

fn drain_phase<C: Schedule>(cx: &mut C, phase: Phase) -> usize {
    let mut ran = 0;
    while let Some(task) = cx.scheduler().pop(phase) {
        task(cx);
        ran += 1;
    }
    ran
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;

    #[derive(Default)]
    struct Log {
        scheduler: Scheduler<Self>,
        entries: Vec<&'static str>,
    }

    impl Schedule for Log {
        fn scheduler(&mut self) -> &mut Scheduler<Self> {
            &mut self.scheduler
        }
    }

    #[test]
    fn pre_tick_drains_before_dirty() {
        let mut cx = Log::default();
        cx.scheduler.enqueue_dirty(|cx: &mut Log| cx.entries.push("dirty"));
        cx.scheduler.enqueue_pre_tick(|cx: &mut Log| cx.entries.push("pre"));
        let report = drain_all(&mut cx);
        assert_eq!(cx.entries, vec!["pre", "dirty"]);
        assert_eq!(report.rounds, 1);
        assert!(report.settled);
    }

    #[test]
    fn tasks_enqueued_while_draining_run_in_same_phase() {
        let mut cx = Log::default();
        cx.scheduler.enqueue_pre_tick(|cx: &mut Log| {
            cx.entries.push("a");
            cx.scheduler.enqueue_dirty(|cx: &mut Log| cx.entries.push("c"));
            cx.scheduler.enqueue_pre_tick(|cx: &mut Log| cx.entries.push("b"));
        });
        let report = drain_all(&mut cx);
        assert_eq!(cx.entries, vec!["a", "b", "c"]);
        assert_eq!(report.pre_tick_tasks, 2);
        assert_eq!(report.dirty_tasks, 1);
    }

    #[test]
    fn dirty_feeding_pre_tick_runs_another_round() {
        let mut cx = Log::default();
        cx.scheduler.enqueue_dirty(|cx: &mut Log| {
            cx.entries.push("dirty");
            cx.scheduler.enqueue_pre_tick(|cx: &mut Log| cx.entries.push("pre"));
        });
        let report = drain_all(&mut cx);
        assert_eq!(cx.entries, vec!["dirty", "pre"]);
        assert_eq!(report.rounds, 2);
    }

    fn bounce(cx: &mut Log) {
        cx.entries.push("bounce");
        cx.scheduler.enqueue_dirty(|cx: &mut Log| {
            cx.scheduler.enqueue_pre_tick(bounce);
        });
    }

    #[test]
    fn round_bound_leaves_work_queued() {
        let mut cx = Log {
            scheduler: Scheduler::new(SchedulerConfig { max_rounds: 3 }),
            entries: Vec::new(),
        };
        cx.scheduler.enqueue_pre_tick(bounce);
        let report = drain_all(&mut cx);
        assert_eq!(report.rounds, 3);
        assert!(!report.settled);
        assert_eq!(cx.entries.len(), 3);
        assert_eq!(cx.scheduler.pending(Phase::PreTick), 1);
    }

    #[test]
    fn idle_drain_is_settled_with_zero_rounds() {
        let mut cx = Log::default();
        let report = drain_all(&mut cx);
        assert_eq!(report, DrainReport {
            rounds: 0,
            pre_tick_tasks: 0,
            dirty_tasks: 0,
            settled: true,
        });
    }

    #[test]
    fn observer_sees_phase_boundaries() {
        let mut cx = Log::default();
        cx.scheduler.enqueue_pre_tick(|cx: &mut Log| cx.entries.push("x"));
        let mut marks = Vec::new();
        drain_all_observed(&mut cx, |m| marks.push(m));
        assert_eq!(marks, vec![
            PhaseMark::Begin {
                round: 1,
                phase: Phase::PreTick
            },
            PhaseMark::End {
                round: 1,
                phase: Phase::PreTick,
                tasks: 1
            },
            PhaseMark::Begin {
                round: 1,
                phase: Phase::Dirty
            },
            PhaseMark::End {
                round: 1,
                phase: Phase::Dirty,
                tasks: 0
            },
        ]);
    }

    #[test]
    fn clear_drops_tasks() {
        let mut cx = Log::default();
        cx.scheduler.enqueue(Phase::Dirty, |cx: &mut Log| cx.entries.push("never"));
        cx.scheduler.clear();
        drain_all(&mut cx);
        assert!(cx.entries.is_empty());
    }
}
