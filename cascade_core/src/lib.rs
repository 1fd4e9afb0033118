// Copyright 2026 the Cascade Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Push-based dataflow engine that resolves geometry for a tree of nodes.
//!
//! `cascade_core` propagates size, transform, and opacity through a
//! hierarchy of composable streams. Each node declares a partial size and
//! layout spec; the engine resolves it against the parent's resolved
//! geometry and reports what changed once per tick. It is `no_std`
//! compatible (with `alloc`) and single-threaded.
//!
//! # Architecture
//!
//! ```text
//!   setters / size observables / gestures
//!       │ (queued)
//!       ▼
//!   Engine::tick() ──► pre-tick tasks ──► dirty tasks ──► TickChanges
//!                          │                  │               │
//!                          └─ Engine::emit ◄──┘               ▼
//!                              (synchronous)           Painter::paint()
//! ```
//!
//! **[`stream`]**: Arena of streams with a `Start`/`Update`/`End`
//! lifecycle, a `Resize` state event, and ordered subscriber fan-out.
//!
//! **[`router`]**: Per-stream input and output handler tables keyed by
//! event kind.
//!
//! **[`scheduler`]**: Two-phase (pre-tick, dirty) task queues drained in
//! bounded rounds.
//!
//! **[`engine`]**: Owner of every stream, node, and queued task. Stream
//! combinators (lift, accumulator, differencer, map, filter, merge,
//! transition), size observables, and the node pipelines live here.
//!
//! **[`tree`]**: Slot-based render tree with ordered child lists and
//! generational handles.
//!
//! **[`algebra`]**: Pure size and layout resolution over the value types in
//! [`geometry`] and [`transform`].
//!
//! **[`dirty`]**: Multi-channel change tracking via `understory_dirty`.
//!
//! **[`paint`]**: The [`Painter`](paint::Painter) contract consuming a
//! tick's changes.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types for
//! tick instrumentation, with a [`Tracer`](trace::Tracer) that compiles away
//! without the `trace` feature. Host timestamps are [`time`] values.
//!
//! # Example
//!
//! ```
//! use cascade_core::engine::Engine;
//! use cascade_core::tree::NodeOptions;
//! use kurbo::Size;
//!
//! let mut engine = Engine::default();
//! let viewport = engine.create_size_observable(Some(Size::new(400.0, 300.0)));
//! let root = engine.create_root(viewport, NodeOptions::EMPTY);
//! let panel = engine.create_node(NodeOptions::EMPTY.with_proportions(0.5, 1.0));
//! engine.add_child(root, panel);
//!
//! engine.tick();
//! assert_eq!(engine.size(panel), Some(Size::new(200.0, 300.0)));
//! ```
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Lets a `Tracer` reach its sink.
//! - `trace-rich` (disabled by default, implies `trace`): Gates per-emission
//!   records.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod algebra;
pub mod dirty;
pub mod engine;
pub mod geometry;
pub mod paint;
pub mod router;
pub mod scheduler;
pub mod stream;
pub mod time;
pub mod trace;
pub mod transform;
pub mod tree;
