// Copyright 2026 the Cascade Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr). Host times
//! are printed in microseconds using a [`Timebase`].

use std::io::Write;

use cascade_core::stream::EventKind;
use cascade_core::time::Timebase;
use cascade_core::trace::{
    EmissionRecord, PhaseBeginEvent, PhaseEndEvent, PhaseKind, TickBeginEvent, TickSummary,
    TraceSink,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
    timebase: Timebase,
    /// Also print one line per emission.
    verbose: bool,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink")
            .field("timebase", &self.timebase)
            .field("verbose", &self.verbose)
            .finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr(timebase: Timebase) -> Self {
        Self::with_writer(Box::new(std::io::stderr()), timebase)
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>, timebase: Timebase) -> Self {
        Self::with_writer(writer, timebase)
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W, timebase: Timebase) -> Self {
        Self {
            writer,
            timebase,
            verbose: false,
        }
    }

    /// Prints every emission, not just the per-tick count.
    #[must_use]
    pub fn verbose(mut self) -> Self {
        self.verbose = true;
        self
    }

    /// Returns the destination.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn phase_name(phase: PhaseKind) -> &'static str {
    match phase {
        PhaseKind::PreTick => "pre-tick",
        PhaseKind::Dirty => "dirty",
        PhaseKind::Collect => "collect",
    }
}

fn kind_name(kind: EventKind) -> &'static str {
    match kind {
        EventKind::Start => "start",
        EventKind::Update => "update",
        EventKind::End => "end",
        EventKind::Resize => "resize",
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_tick_begin(&mut self, e: &TickBeginEvent) {
        let _ = match e.now {
            Some(now) => writeln!(
                self.writer,
                "[tick] tick={} now={:.1}µs queued={}+{}",
                e.tick_index,
                self.timebase.micros(now),
                e.pre_tick_pending,
                e.dirty_pending,
            ),
            None => writeln!(
                self.writer,
                "[tick] tick={} queued={}+{}",
                e.tick_index, e.pre_tick_pending, e.dirty_pending,
            ),
        };
    }

    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        let _ = writeln!(
            self.writer,
            "[phase:begin] tick={} round={} {}",
            e.tick_index,
            e.round,
            phase_name(e.phase),
        );
    }

    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        let _ = writeln!(
            self.writer,
            "[phase:end] tick={} round={} {} tasks={}",
            e.tick_index,
            e.round,
            phase_name(e.phase),
            e.tasks,
        );
    }

    fn on_tick_summary(&mut self, s: &TickSummary) {
        let settled = if s.settled { "ok" } else { "UNSETTLED" };
        let _ = writeln!(
            self.writer,
            "[summary] tick={} rounds={} tasks={}+{} emissions={} \
             resized={} relaid={} added={} removed={} settled={settled}",
            s.tick_index,
            s.rounds,
            s.pre_tick_tasks,
            s.dirty_tasks,
            s.emissions,
            s.resized,
            s.relaid,
            s.added,
            s.removed,
        );
    }

    fn on_emissions(&mut self, tick_index: u64, emissions: &[EmissionRecord]) {
        let _ = writeln!(
            self.writer,
            "[emissions] tick={tick_index} count={}",
            emissions.len(),
        );
        if !self.verbose {
            return;
        }
        for r in emissions {
            let _ = match r.node {
                Some(node) => writeln!(
                    self.writer,
                    "  stream={} {} node={node}",
                    r.stream_index,
                    kind_name(r.kind),
                ),
                None => writeln!(
                    self.writer,
                    "  stream={} {}",
                    r.stream_index,
                    kind_name(r.kind),
                ),
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use cascade_core::time::HostTime;

    use super::*;

    fn output(sink: PrettyPrintSink<Vec<u8>>) -> String {
        String::from_utf8(sink.into_inner()).unwrap()
    }

    #[test]
    fn pretty_print_tick() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new(), Timebase::NANOS);
        sink.on_tick_begin(&TickBeginEvent {
            tick_index: 1,
            now: Some(HostTime(2_000)),
            pre_tick_pending: 3,
            dirty_pending: 0,
        });
        let output = output(sink);
        assert!(output.contains("[tick]"), "got: {output}");
        assert!(output.contains("tick=1"), "got: {output}");
        assert!(output.contains("now=2.0µs"), "got: {output}");
    }

    #[test]
    fn unsettled_summary_is_flagged() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new(), Timebase::NANOS);
        sink.on_tick_summary(&TickSummary {
            tick_index: 4,
            rounds: 16,
            pre_tick_tasks: 16,
            dirty_tasks: 16,
            emissions: 0,
            resized: 0,
            relaid: 0,
            added: 0,
            removed: 0,
            settled: false,
        });
        let output = output(sink);
        assert!(output.contains("settled=UNSETTLED"), "got: {output}");
    }

    #[test]
    fn verbose_lists_emissions() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new(), Timebase::NANOS).verbose();
        sink.on_emissions(0, &[
            EmissionRecord {
                stream_index: 7,
                kind: EventKind::Resize,
                node: Some(2),
            },
            EmissionRecord {
                stream_index: 9,
                kind: EventKind::Start,
                node: None,
            },
        ]);
        let output = output(sink);
        assert!(output.contains("count=2"), "got: {output}");
        assert!(output.contains("stream=7 resize node=2"), "got: {output}");
        assert!(output.contains("stream=9 start\n"), "got: {output}");
    }

    #[test]
    fn traces_a_real_tick() {
        use cascade_core::engine::Engine;
        use cascade_core::trace::Tracer;
        use cascade_core::tree::NodeOptions;
        use kurbo::Size;

        let mut engine = Engine::default();
        let viewport = engine.create_size_observable(Some(Size::new(4.0, 3.0)));
        engine.create_root(viewport, NodeOptions::EMPTY);

        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new(), Timebase::NANOS);
        let mut tracer = Tracer::new(&mut sink);
        engine.tick_with(&mut tracer);
        drop(tracer);

        let output = output(sink);
        assert!(output.contains("pre-tick"), "got: {output}");
        assert!(output.contains("collect"), "got: {output}");
        assert!(output.contains("added=1"), "got: {output}");
    }
}
