// Copyright 2026 the Cascade Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Paint contract for rendering integrations.
//!
//! Cascade decides where and when nodes are drawn, never what they look
//! like. A rendering integration implements [`Painter`] and is handed the
//! engine together with the [`TickChanges`] of each tick. It reads resolved
//! geometry with [`Engine::resolved_at`] for the slots it was told about and
//! applies them to its own retained tree (DOM elements, GPU quads, native
//! views).
//!
//! # Tick loop pseudocode
//!
//! ```rust,ignore
//! fn on_frame(now: HostTime) {
//!     // Feed input: gestures, viewport changes, option setters.
//!     engine.size_observable_set(viewport, window_size());
//!
//!     // Settle: advance transitions, drain both queues, collect changes.
//!     let report = engine.advance(now);
//!
//!     // Paint: apply incremental changes.
//!     painter.paint(&engine, &report.changes);
//! }
//! ```

use crate::engine::Engine;
use crate::tree::TickChanges;

/// Applies resolved geometry to a presentation tree.
pub trait Painter {
    /// Applies `changes`, reading current geometry from `engine` as needed.
    fn paint(&mut self, engine: &Engine, changes: &TickChanges);
}
