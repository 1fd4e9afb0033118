// Copyright 2026 the Cascade Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the tick loop.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that
//! [`Engine::tick_with`](crate::engine::Engine::tick_with) calls at each
//! stage. All method bodies default to no-ops, so implementing only the
//! events you care about is fine.
//!
//! [`Tracer`] is what the tick loop actually talks to. It holds an optional
//! sink, and without the `trace` feature it holds nothing at all.
//!
//! # Crate features
//!
//! - `trace` lets a `Tracer` reach its sink.
//! - `trace-rich` (implies `trace`) records every emission of a tick as an
//!   [`EmissionRecord`] and adds the corresponding `TraceSink` method.

use crate::scheduler::{DrainReport, Phase};
#[cfg(feature = "trace-rich")]
use crate::stream::EventKind;
use crate::time::HostTime;
use crate::tree::TickChanges;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Which stage of a tick is being reported.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PhaseKind {
    /// Draining the pre-tick queue.
    PreTick,
    /// Draining the dirty queue.
    Dirty,
    /// Collecting the tick's change set.
    Collect,
}

impl From<Phase> for PhaseKind {
    fn from(phase: Phase) -> Self {
        match phase {
            Phase::PreTick => Self::PreTick,
            Phase::Dirty => Self::Dirty,
        }
    }
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted when a tick starts.
#[derive(Clone, Copy, Debug)]
pub struct TickBeginEvent {
    /// Monotonic tick counter.
    pub tick_index: u64,
    /// Host time passed to [`Engine::advance`](crate::engine::Engine::advance),
    /// if the tick is time-driven.
    pub now: Option<HostTime>,
    /// Tasks waiting in the pre-tick queue.
    pub pre_tick_pending: usize,
    /// Tasks waiting in the dirty queue.
    pub dirty_pending: usize,
}

/// Marks the beginning of a tick stage.
#[derive(Clone, Copy, Debug)]
pub struct PhaseBeginEvent {
    /// Tick counter.
    pub tick_index: u64,
    /// 1-based drain round (0 for [`PhaseKind::Collect`]).
    pub round: u32,
    /// Which stage is starting.
    pub phase: PhaseKind,
}

/// Marks the end of a tick stage.
#[derive(Clone, Copy, Debug)]
pub struct PhaseEndEvent {
    /// Tick counter.
    pub tick_index: u64,
    /// 1-based drain round (0 for [`PhaseKind::Collect`]).
    pub round: u32,
    /// Which stage is ending.
    pub phase: PhaseKind,
    /// Tasks run during the stage.
    pub tasks: usize,
}

/// Per-tick summary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickSummary {
    /// Tick counter.
    pub tick_index: u64,
    /// Drain rounds executed.
    pub rounds: u32,
    /// Pre-tick tasks run.
    pub pre_tick_tasks: usize,
    /// Dirty tasks run.
    pub dirty_tasks: usize,
    /// Events emitted by any stream.
    pub emissions: u64,
    /// Nodes reported as resized.
    pub resized: usize,
    /// Nodes reported as relaid.
    pub relaid: usize,
    /// Nodes added.
    pub added: usize,
    /// Nodes removed.
    pub removed: usize,
    /// Whether the queues drained completely.
    pub settled: bool,
}

impl TickSummary {
    /// Builds a summary from a drain report and the collected changes.
    #[must_use]
    pub fn new(tick_index: u64, drain: &DrainReport, emissions: u64, changes: &TickChanges) -> Self {
        Self {
            tick_index,
            rounds: drain.rounds,
            pre_tick_tasks: drain.pre_tick_tasks,
            dirty_tasks: drain.dirty_tasks,
            emissions,
            resized: changes.resized.len(),
            relaid: changes.relaid.len(),
            added: changes.added.len(),
            removed: changes.removed.len(),
            settled: drain.settled,
        }
    }
}

/// One emission observed during a tick.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EmissionRecord {
    /// Slot of the emitting stream.
    pub stream_index: u32,
    /// Kind after the lifecycle gate.
    pub kind: EventKind,
    /// Node slot owning the stream, if any.
    pub node: Option<u32>,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the tick loop.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when a tick starts.
    fn on_tick_begin(&mut self, e: &TickBeginEvent) {
        _ = e;
    }

    /// Called at the beginning of a tick stage.
    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        _ = e;
    }

    /// Called at the end of a tick stage.
    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        _ = e;
    }

    /// Called with the per-tick summary.
    fn on_tick_summary(&mut self, s: &TickSummary) {
        _ = s;
    }

    /// Called with every emission of the tick (requires `trace-rich`).
    #[cfg(feature = "trace-rich")]
    fn on_emissions(&mut self, tick_index: u64, emissions: &[EmissionRecord]) {
        _ = (tick_index, emissions);
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Where [`Engine::tick_with`](crate::engine::Engine::tick_with) reports to.
///
/// Without the `trace` feature a tracer holds nothing and every report is
/// dropped at compile time, whatever sink it was built from.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _sink: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer")
            .field("active", &self.is_active())
            .finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Reports to `sink`.
    #[inline]
    #[must_use]
    #[cfg_attr(
        not(feature = "trace"),
        expect(unused_variables, reason = "sink is compiled out")
    )]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        Self {
            #[cfg(feature = "trace")]
            sink: Some(sink),
            #[cfg(not(feature = "trace"))]
            _sink: core::marker::PhantomData,
        }
    }

    /// Reports nowhere.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        Self {
            #[cfg(feature = "trace")]
            sink: None,
            #[cfg(not(feature = "trace"))]
            _sink: core::marker::PhantomData,
        }
    }

    /// Whether reports reach a sink.
    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        #[cfg(feature = "trace")]
        {
            self.sink.is_some()
        }
        #[cfg(not(feature = "trace"))]
        {
            false
        }
    }

    #[inline]
    #[cfg_attr(
        not(feature = "trace"),
        expect(unused_variables, reason = "reports are compiled out")
    )]
    fn report(&mut self, f: impl FnOnce(&mut dyn TraceSink)) {
        #[cfg(feature = "trace")]
        if let Some(sink) = self.sink.as_deref_mut() {
            f(sink);
        }
    }

    /// Reports the start of a tick.
    #[inline]
    pub fn tick_begin(&mut self, e: &TickBeginEvent) {
        self.report(|sink| sink.on_tick_begin(e));
    }

    /// Reports the start of a stage.
    #[inline]
    pub fn phase_begin(&mut self, e: &PhaseBeginEvent) {
        self.report(|sink| sink.on_phase_begin(e));
    }

    /// Reports the end of a stage.
    #[inline]
    pub fn phase_end(&mut self, e: &PhaseEndEvent) {
        self.report(|sink| sink.on_phase_end(e));
    }

    /// Reports the end of a tick.
    #[inline]
    pub fn tick_summary(&mut self, s: &TickSummary) {
        self.report(|sink| sink.on_tick_summary(s));
    }

    /// Reports every emission of a tick.
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn emissions(&mut self, tick_index: u64, emissions: &[EmissionRecord]) {
        self.report(|sink| sink.on_emissions(tick_index, emissions));
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
