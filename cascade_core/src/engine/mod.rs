// Copyright 2026 the Cascade Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The engine: owner of every stream, node, and queued task.
//!
//! All mutation goes through [`Engine`]. Stream emission is synchronous;
//! mutations requested from outside a tick (option setters, size observable
//! writes, node attachment pushes) are queued on the engine's
//! [`Scheduler`] and settled by [`Engine::tick`].
//!
//! # One tick
//!
//! 1. When driven by [`Engine::advance`], a pre-tick task samples every
//!    running transition.
//! 2. [`drain_all`](crate::scheduler::drain_all) runs pre-tick and dirty
//!    rounds until both queues are idle or the round bound is hit.
//! 3. The node store's dirty channels are drained into [`TickChanges`].

mod nodes;
mod observable;
mod propagate;
mod streams;
mod transition;

use alloc::collections::BinaryHeap;
use alloc::vec::Vec;
use core::cmp::Reverse;
use core::fmt;

#[cfg(feature = "trace-rich")]
use crate::trace::EmissionRecord;
use crate::scheduler::{
    DrainReport, Phase, PhaseMark, Schedule, Scheduler, SchedulerConfig, drain_all_observed,
};
use crate::stream::{StreamId, StreamStore};
use crate::time::HostTime;
use crate::trace::{PhaseBeginEvent, PhaseEndEvent, PhaseKind, TickBeginEvent, TickSummary, Tracer};
use crate::tree::{NodeStore, TickChanges};

/// Configuration for an [`Engine`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EngineConfig {
    /// Scheduler settings.
    pub scheduler: SchedulerConfig,
}

impl EngineConfig {
    /// The standard configuration.
    #[must_use]
    pub const fn standard() -> Self {
        Self {
            scheduler: SchedulerConfig::standard(),
        }
    }
}

/// The outcome of one tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TickReport {
    /// Index of the tick (0 for the first).
    pub tick_index: u64,
    /// Queue drain statistics.
    pub drain: DrainReport,
    /// Events emitted during the tick.
    pub emissions: u64,
    /// What changed.
    pub changes: TickChanges,
}

/// A reactive layout engine.
pub struct Engine {
    pub(crate) streams: StreamStore,
    pub(crate) tree: NodeStore,
    pub(crate) scheduler: Scheduler<Self>,
    /// Transition streams with an active tween.
    pub(crate) animating: Vec<StreamId>,
    /// Lifts awaiting recomputation, lowest `(rank, slot)` first.
    pub(crate) lift_queue: BinaryHeap<Reverse<(u32, usize)>>,
    /// Lifts recomputed in the current pass.
    pub(crate) settled_lifts: Vec<usize>,
    tick_index: u64,
    pub(crate) emissions: u64,
    #[cfg(feature = "trace-rich")]
    pub(crate) emission_log: Vec<EmissionRecord>,
}

impl Engine {
    /// Creates an empty engine.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self {
            streams: StreamStore::new(),
            tree: NodeStore::new(),
            scheduler: Scheduler::new(config.scheduler),
            animating: Vec::new(),
            lift_queue: BinaryHeap::new(),
            settled_lifts: Vec::new(),
            tick_index: 0,
            emissions: 0,
            #[cfg(feature = "trace-rich")]
            emission_log: Vec::new(),
        }
    }

    /// Read access to every stream.
    #[must_use]
    pub fn streams(&self) -> &StreamStore {
        &self.streams
    }

    /// Read access to the render tree.
    #[must_use]
    pub fn tree(&self) -> &NodeStore {
        &self.tree
    }

    /// Index the next tick will carry.
    #[must_use]
    pub fn tick_index(&self) -> u64 {
        self.tick_index
    }

    /// Queues `task` for the pre-tick phase of the next tick.
    pub fn enqueue_pre_tick(&mut self, task: impl FnOnce(&mut Self) + 'static) {
        self.scheduler.enqueue_pre_tick(task);
    }

    /// Queues `task` for the dirty phase of the next tick.
    pub fn enqueue_dirty(&mut self, task: impl FnOnce(&mut Self) + 'static) {
        self.scheduler.enqueue_dirty(task);
    }

    /// Whether any work is queued or any transition is running.
    #[must_use]
    pub fn has_pending_work(&self) -> bool {
        !self.scheduler.is_idle() || !self.animating.is_empty()
    }

    /// Settles all queued work.
    pub fn tick(&mut self) -> TickReport {
        self.run_tick(None, &mut Tracer::none())
    }

    /// [`tick`](Self::tick), reporting to `tracer`.
    pub fn tick_with(&mut self, tracer: &mut Tracer<'_>) -> TickReport {
        self.run_tick(None, tracer)
    }

    /// Samples running transitions at `now`, then settles all queued work.
    pub fn advance(&mut self, now: HostTime) -> TickReport {
        self.advance_with(now, &mut Tracer::none())
    }

    /// [`advance`](Self::advance), reporting to `tracer`.
    pub fn advance_with(&mut self, now: HostTime, tracer: &mut Tracer<'_>) -> TickReport {
        if !self.animating.is_empty() {
            self.scheduler
                .enqueue_pre_tick(move |engine: &mut Self| engine.step_transitions(now));
        }
        self.run_tick(Some(now), tracer)
    }

    fn run_tick(&mut self, now: Option<HostTime>, tracer: &mut Tracer<'_>) -> TickReport {
        let tick_index = self.tick_index;
        self.emissions = 0;
        #[cfg(feature = "trace-rich")]
        self.emission_log.clear();

        tracer.tick_begin(&TickBeginEvent {
            tick_index,
            now,
            pre_tick_pending: self.scheduler.pending(Phase::PreTick),
            dirty_pending: self.scheduler.pending(Phase::Dirty),
        });

        let drain = drain_all_observed(self, |mark| match mark {
            PhaseMark::Begin { round, phase } => tracer.phase_begin(&PhaseBeginEvent {
                tick_index,
                round,
                phase: phase.into(),
            }),
            PhaseMark::End {
                round,
                phase,
                tasks,
            } => tracer.phase_end(&PhaseEndEvent {
                tick_index,
                round,
                phase: phase.into(),
                tasks,
            }),
        });

        tracer.phase_begin(&PhaseBeginEvent {
            tick_index,
            round: 0,
            phase: PhaseKind::Collect,
        });
        let mut changes = TickChanges::default();
        self.tree.collect_changes(&mut changes);
        tracer.phase_end(&PhaseEndEvent {
            tick_index,
            round: 0,
            phase: PhaseKind::Collect,
            tasks: 0,
        });

        #[cfg(feature = "trace-rich")]
        tracer.emissions(tick_index, &self.emission_log);
        tracer.tick_summary(&TickSummary::new(
            tick_index,
            &drain,
            self.emissions,
            &changes,
        ));

        self.tick_index += 1;
        TickReport {
            tick_index,
            drain,
            emissions: self.emissions,
            changes,
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl Schedule for Engine {
    fn scheduler(&mut self) -> &mut Scheduler<Self> {
        &mut self.scheduler
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("streams", &self.streams.len())
            .field("nodes", &self.tree.len())
            .field("scheduler", &self.scheduler)
            .field("animating", &self.animating.len())
            .field("tick_index", &self.tick_index)
            .finish_non_exhaustive()
    }
}
