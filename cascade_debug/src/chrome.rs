// Copyright 2026 the Cascade Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`ChromeTraceSink`] collects tick events and writes them as
//! [Chrome Trace Event Format][spec] JSON, suitable for loading into
//! `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
//!
//! Ticks carry no per-phase timestamps, so events are laid out on a logical
//! clock: one microsecond per event, jumping forward to a tick's host time
//! when it has one.
//!
//! [spec]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use cascade_core::time::Timebase;
use cascade_core::trace::{
    EmissionRecord, PhaseBeginEvent, PhaseEndEvent, PhaseKind, TickBeginEvent, TickSummary,
    TraceSink,
};

/// Collects trace events as Chrome Trace Event Format objects.
#[derive(Debug)]
pub struct ChromeTraceSink {
    events: Vec<Value>,
    timebase: Timebase,
    clock_us: f64,
}

impl ChromeTraceSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new(timebase: Timebase) -> Self {
        Self {
            events: Vec::new(),
            timebase,
            clock_us: 0.0,
        }
    }

    /// Events collected so far.
    #[must_use]
    pub fn events(&self) -> &[Value] {
        &self.events
    }

    /// Writes every collected event as one JSON array.
    pub fn write_to(&self, writer: &mut dyn Write) -> io::Result<()> {
        serde_json::to_writer_pretty(writer, &self.events)?;
        Ok(())
    }

    fn stamp(&mut self) -> f64 {
        let ts = self.clock_us;
        self.clock_us += 1.0;
        ts
    }
}

fn phase_name(phase: PhaseKind) -> &'static str {
    match phase {
        PhaseKind::PreTick => "PreTick",
        PhaseKind::Dirty => "Dirty",
        PhaseKind::Collect => "Collect",
    }
}

impl TraceSink for ChromeTraceSink {
    fn on_tick_begin(&mut self, e: &TickBeginEvent) {
        if let Some(now) = e.now {
            self.clock_us = self.clock_us.max(self.timebase.micros(now));
        }
        let ts = self.stamp();
        self.events.push(json!({
            "ph": "i",
            "name": "Tick",
            "cat": "Engine",
            "ts": ts,
            "pid": 0,
            "tid": 0,
            "s": "g",
            "args": {
                "tick_index": e.tick_index,
                "pre_tick_pending": e.pre_tick_pending,
                "dirty_pending": e.dirty_pending,
            }
        }));
    }

    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        let ts = self.stamp();
        self.events.push(json!({
            "ph": "B",
            "name": phase_name(e.phase),
            "cat": "Tick",
            "ts": ts,
            "pid": 0,
            "tid": 0,
            "args": {
                "tick_index": e.tick_index,
                "round": e.round,
            }
        }));
    }

    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        let ts = self.stamp();
        self.events.push(json!({
            "ph": "E",
            "name": phase_name(e.phase),
            "cat": "Tick",
            "ts": ts,
            "pid": 0,
            "tid": 0,
            "args": {
                "tick_index": e.tick_index,
                "round": e.round,
                "tasks": e.tasks,
            }
        }));
    }

    fn on_tick_summary(&mut self, s: &TickSummary) {
        let ts = self.stamp();
        self.events.push(json!({
            "ph": "i",
            "name": "TickSummary",
            "cat": "Summary",
            "ts": ts,
            "pid": 0,
            "tid": 0,
            "s": "g",
            "args": {
                "tick_index": s.tick_index,
                "rounds": s.rounds,
                "pre_tick_tasks": s.pre_tick_tasks,
                "dirty_tasks": s.dirty_tasks,
                "emissions": s.emissions,
                "resized": s.resized,
                "relaid": s.relaid,
                "added": s.added,
                "removed": s.removed,
                "settled": s.settled,
            }
        }));
    }

    fn on_emissions(&mut self, tick_index: u64, emissions: &[EmissionRecord]) {
        let ts = self.stamp();
        self.events.push(json!({
            "ph": "i",
            "name": "Emissions",
            "cat": "Rich",
            "ts": ts,
            "pid": 0,
            "tid": 0,
            "s": "p",
            "args": {
                "tick_index": tick_index,
                "count": emissions.len(),
            }
        }));
    }
}
