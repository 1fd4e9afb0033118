// Copyright 2026 the Cascade Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-stream event routing.
//!
//! Every stream carries an [`EventRouter`] with two handler tables: `input`
//! handlers observe events delivered *to* the stream, `output` handlers
//! observe events the stream emits. Handlers are keyed by [`EventKind`] and
//! run in registration order.
//!
//! A handler receives the event and a mutable context `C`. Inside the engine
//! `C` is the [`Scheduler`](crate::scheduler::Scheduler), so a handler can
//! only defer work. In particular a handler cannot register another handler
//! on the router that is currently dispatching; it enqueues the registration,
//! which then runs after the dispatch has finished.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use crate::stream::{Event, EventKind};

/// A boxed event handler.
pub type Handler<C> = Box<dyn FnMut(&Event, &mut C)>;

/// Which of a router's two tables a handler belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Events delivered to the stream.
    Input,
    /// Events emitted by the stream.
    Output,
}

/// Handlers per [`EventKind`].
struct HandlerTable<C> {
    by_kind: [Vec<Handler<C>>; 4],
}

impl<C> HandlerTable<C> {
    fn new() -> Self {
        Self {
            by_kind: [Vec::new(), Vec::new(), Vec::new(), Vec::new()],
        }
    }

    fn len(&self) -> usize {
        self.by_kind.iter().map(Vec::len).sum()
    }
}

/// Input and output handler tables for one stream.
pub struct EventRouter<C> {
    input: HandlerTable<C>,
    output: HandlerTable<C>,
}

impl<C> EventRouter<C> {
    /// Creates a router with no handlers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            input: HandlerTable::new(),
            output: HandlerTable::new(),
        }
    }

    fn table_mut(&mut self, direction: Direction) -> &mut HandlerTable<C> {
        match direction {
            Direction::Input => &mut self.input,
            Direction::Output => &mut self.output,
        }
    }

    /// Appends a handler for `kind` to the `direction` table.
    pub fn register(
        &mut self,
        direction: Direction,
        kind: EventKind,
        handler: impl FnMut(&Event, &mut C) + 'static,
    ) {
        self.table_mut(direction).by_kind[kind.index()].push(Box::new(handler));
    }

    /// Runs every `direction` handler registered for `event.kind`.
    pub fn dispatch(&mut self, direction: Direction, event: &Event, cx: &mut C) {
        for handler in &mut self.table_mut(direction).by_kind[event.kind.index()] {
            handler(event, cx);
        }
    }

    /// Number of handlers in the `direction` table, across all kinds.
    #[must_use]
    pub fn handler_count(&self, direction: Direction) -> usize {
        match direction {
            Direction::Input => self.input.len(),
            Direction::Output => self.output.len(),
        }
    }

    /// Whether no handler is registered in either table.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.input.len() == 0 && self.output.len() == 0
    }

    /// Drops every handler.
    pub fn clear(&mut self) {
        self.input = HandlerTable::new();
        self.output = HandlerTable::new();
    }
}

impl<C> Default for EventRouter<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for EventRouter<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventRouter")
            .field("input", &self.input.len())
            .field("output", &self.output.len())
            .finish()
    }
}
