// Copyright 2026 the Cascade Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Render tree topology.
//!
//! The [`NodeStore`] keeps parent/child links and each node's stream
//! pipeline. Nodes are created, attached, and destroyed through the
//! [`Engine`](crate::engine::Engine), which also wires the pipelines.

mod changes;
mod id;
mod options;
mod store;
mod traverse;

pub use changes::TickChanges;
pub use id::NodeId;
pub use options::NodeOptions;
pub use store::{NodeStore, NodeStreams};
pub use traverse::Children;
