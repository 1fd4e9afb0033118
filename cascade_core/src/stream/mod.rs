// Copyright 2026 the Cascade Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Push-based streams.
//!
//! A stream is a slot in the [`StreamStore`] holding its last value, its
//! lifecycle state, its edges, and a processing rule (its kind) that turns
//! incoming events into outgoing values. Streams are created, wired, and
//! pushed through the [`Engine`](crate::engine::Engine).
//!
//! Emission is synchronous and depth-first: an event runs through the
//! stream's rule, passes the [`Lifecycle`] gate, and is delivered to every
//! subscriber in subscription order before `emit` returns. Lifts are
//! recomputed last, once every stream upstream of them has settled.

mod event;
mod id;
mod kind;
mod store;
mod transition;
mod value;

pub use event::{Event, EventKind, Lifecycle};
pub use id::{INVALID, StreamId};
pub use kind::{Filter, FilterFn, LiftFn, MapFn, MergeFn};
pub(crate) use kind::StreamKind;
pub use store::{StreamRouter, StreamStore};
pub(crate) use transition::{ActiveTween, Step};
pub use transition::{Curve, Tween};
pub use value::{GestureSample, Value};
