// Copyright 2026 the Cascade Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Render tree nodes and their stream pipelines.
//!
//! Every node owns six streams (see [`NodeStreams`]):
//!
//! ```text
//! size_spec ─┐
//!            ├─ size ─────────┐
//! parent_size┘                │
//! parent_layout ─┐            │
//! layout_decl ───┼─ layout ◄──┘
//! ```
//!
//! A child's `parent_size` and `parent_layout` are fed by its parent's
//! `size` and `layout`. Roots are fed by a size observable and an identity
//! layout source instead.
//!
//! Attachment, option setters, and bindings are queued as two-phase
//! mutations: a pre-tick task pushes the new input, and a dirty task
//! re-emits the affected resolved stream so that everything downstream
//! settles within the same tick.

use alloc::boxed::Box;
use kurbo::Size;

use super::Engine;
use crate::algebra::{resolve_layout, resolve_size};
use crate::dirty::Mark;
use crate::geometry::{Layout, LayoutDecl, Resolved, SizeSpec};
use crate::stream::{Event, EventKind, Lifecycle, StreamId, StreamKind, Value};
use crate::transform::Transform3d;
use crate::tree::{NodeId, NodeOptions, NodeStreams};

impl Engine {
    // -- Creation --

    /// Creates a detached node declaring `options`.
    ///
    /// The node stays unresolved until it is attached under a parent or
    /// turned into a root with [`create_root`](Self::create_root).
    pub fn create_node(&mut self, options: NodeOptions) -> NodeId {
        let size_spec = self.streams.alloc(
            StreamKind::Merge(Box::new(merge_size_spec)),
            true,
            Some(Value::SizeSpec(options.size_spec())),
        );
        let parent_size = self.streams.alloc(StreamKind::Relay, true, None);
        let size = self.lift_with(&[size_spec, parent_size], true, Box::new(size_lift));

        let layout_decl = self.streams.alloc(
            StreamKind::Merge(Box::new(merge_layout_decl)),
            false,
            Some(Value::LayoutDecl(options.layout_decl())),
        );
        let parent_layout = self.streams.alloc(StreamKind::Relay, false, None);
        let layout = self.lift_with(
            &[parent_layout, layout_decl, size],
            false,
            Box::new(layout_lift),
        );

        let node = self.tree.alloc(NodeStreams {
            size_spec,
            parent_size,
            size,
            layout_decl,
            parent_layout,
            layout,
        });
        self.streams.mark[size.idx as usize] = Some((node.idx, Mark::Size));
        self.streams.mark[layout.idx as usize] = Some((node.idx, Mark::Layout));
        node
    }

    /// Creates a root node sized by `viewport`.
    ///
    /// `viewport` is usually a [size observable](Self::create_size_observable).
    /// It is not owned by the node and outlives it.
    pub fn create_root(&mut self, viewport: StreamId, options: NodeOptions) -> NodeId {
        let node = self.create_node(options);
        let streams = self.tree.streams[node.idx as usize];
        let identity = self.create_source(Some(Value::Layout(Layout::ROOT)));
        self.tree.owned[node.idx as usize].push(identity);

        self.subscribe(streams.parent_size, viewport);
        self.subscribe(streams.parent_layout, identity);
        self.scheduler.enqueue_pre_tick(move |engine: &mut Self| {
            engine.push_current(streams.parent_size, viewport);
            engine.push_current(streams.parent_layout, identity);
            engine.settle_node(streams);
        });
        node
    }

    // -- Topology --

    /// Adds `child` as the last child of `parent`.
    ///
    /// The child resolves against the parent during the next tick, whether
    /// or not the parent has resolved already.
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale, if `child` already has a parent, or
    /// if `child` is `parent` or one of its ancestors.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) {
        self.tree.add_child(parent, child);
        let from = self.tree.streams[parent.idx as usize];
        let to = self.tree.streams[child.idx as usize];

        self.subscribe(to.parent_size, from.size);
        self.subscribe(to.parent_layout, from.layout);
        self.scheduler.enqueue_pre_tick(move |engine: &mut Self| {
            engine.push_current(to.parent_size, from.size);
            engine.push_current(to.parent_layout, from.layout);
            engine.settle_node(to);
        });
    }

    /// Detaches `node` from its parent.
    ///
    /// The node and its descendants become unresolved until reattached.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale or the node has no parent.
    pub fn remove_from_parent(&mut self, node: NodeId) {
        let parent = self.tree.remove_from_parent(node);
        let from = self.tree.streams[parent as usize];
        let to = self.tree.streams[node.idx as usize];
        self.unsubscribe(to.parent_size, from.size);
        self.unsubscribe(to.parent_layout, from.layout);

        for idx in self.tree.subtree(node.idx) {
            let s = self.tree.streams[idx as usize];
            for stream in [s.parent_size, s.size, s.parent_layout, s.layout] {
                if let Some(i) = self.streams.slot(stream) {
                    self.streams.value[i] = None;
                    self.streams.lifecycle[i] = Lifecycle::Uninitialized;
                }
            }
        }
    }

    /// Destroys `node`, its descendants, and every stream they own.
    ///
    /// Streams bound into the node with [`bind_size_spec`](Self::bind_size_spec)
    /// or [`bind_layout`](Self::bind_layout) survive. Returns `false` for a
    /// stale handle.
    pub fn destroy_node(&mut self, node: NodeId) -> bool {
        if !self.tree.is_alive(node) {
            return false;
        }
        if self.tree.parent(node).is_some() {
            self.remove_from_parent(node);
        }
        let mut doomed = self.tree.subtree(node.idx);
        doomed.reverse();
        for idx in doomed {
            let id = self.tree.id_at(idx);
            for stream in self.tree.streams[idx as usize].all() {
                self.streams.free(stream);
            }
            for stream in core::mem::take(&mut self.tree.owned[idx as usize]) {
                self.streams.free(stream);
            }
            self.tree.free(id);
        }
        true
    }

    /// Hands `stream` over to `node`: it is destroyed together with the node.
    ///
    /// Returns `false` if either handle is stale.
    pub fn own_stream(&mut self, node: NodeId, stream: StreamId) -> bool {
        if !self.tree.is_alive(node) || !self.streams.is_alive(stream) {
            return false;
        }
        let owned = &mut self.tree.owned[node.idx as usize];
        if !owned.contains(&stream) {
            owned.push(stream);
        }
        true
    }

    // -- Options --

    /// Applies every option set in `options`.
    pub fn apply_options(&mut self, node: NodeId, options: NodeOptions) {
        let size = options.size_spec();
        if !size.is_empty() {
            self.patch_size_spec(node, size);
        }
        let layout = options.layout_decl();
        if layout != LayoutDecl::EMPTY {
            self.patch_layout_decl(node, layout);
        }
    }

    /// Sets the explicit size; `None` on an axis leaves it free.
    pub fn set_size(&mut self, node: NodeId, size: [Option<f64>; 2]) {
        self.patch_size_spec(node, SizeSpec {
            size: Some(size),
            ..SizeSpec::EMPTY
        });
    }

    /// Sets the proportions of the parent size.
    pub fn set_proportions(&mut self, node: NodeId, proportions: [Option<f64>; 2]) {
        self.patch_size_spec(node, SizeSpec {
            proportions: Some(proportions),
            ..SizeSpec::EMPTY
        });
    }

    /// Sets the margins.
    pub fn set_margins(&mut self, node: NodeId, margins: [f64; 2]) {
        self.patch_size_spec(node, SizeSpec::with_margins(margins[0], margins[1]));
    }

    /// Sets the aspect ratio (width / height).
    pub fn set_aspect_ratio(&mut self, node: NodeId, ratio: f64) {
        self.patch_size_spec(node, SizeSpec::with_aspect_ratio(ratio));
    }

    /// Sets the normalized origin.
    pub fn set_origin(&mut self, node: NodeId, origin: [f64; 2]) {
        self.patch_layout_decl(node, LayoutDecl {
            origin: Some(origin),
            ..LayoutDecl::EMPTY
        });
    }

    /// Sets the opacity.
    pub fn set_opacity(&mut self, node: NodeId, opacity: f32) {
        self.patch_layout_decl(node, LayoutDecl {
            opacity: Some(opacity),
            ..LayoutDecl::EMPTY
        });
    }

    /// Sets the local transform.
    pub fn set_transform(&mut self, node: NodeId, transform: Transform3d) {
        self.patch_layout_decl(node, LayoutDecl::transformed(transform));
    }

    /// Feeds `stream` into the node's size spec.
    ///
    /// `stream` may carry [`Value::SizeSpec`] patches or plain
    /// [`Value::Size`]s, which declare an explicit size.
    pub fn bind_size_spec(&mut self, node: NodeId, stream: StreamId) {
        let Some(streams) = self.tree.streams(node) else {
            return;
        };
        self.subscribe(streams.size_spec, stream);
        self.scheduler.enqueue_pre_tick(move |engine: &mut Self| {
            engine.push_current(streams.size_spec, stream);
            engine.settle_node(streams);
        });
    }

    /// Feeds `stream` into the node's layout declaration.
    ///
    /// `stream` may carry [`Value::LayoutDecl`] patches or plain
    /// [`Value::Transform`]s.
    pub fn bind_layout(&mut self, node: NodeId, stream: StreamId) {
        let Some(streams) = self.tree.streams(node) else {
            return;
        };
        self.subscribe(streams.layout_decl, stream);
        self.scheduler.enqueue_pre_tick(move |engine: &mut Self| {
            engine.push_current(streams.layout_decl, stream);
            engine.settle_node(streams);
        });
    }

    fn patch_size_spec(&mut self, node: NodeId, patch: SizeSpec) {
        let Some(streams) = self.tree.streams(node) else {
            return;
        };
        self.scheduler.enqueue_pre_tick(move |engine: &mut Self| {
            engine.emit(streams.size_spec, Event::resize(patch));
            engine.settle_node(streams);
        });
    }

    fn patch_layout_decl(&mut self, node: NodeId, patch: LayoutDecl) {
        let Some(streams) = self.tree.streams(node) else {
            return;
        };
        self.scheduler.enqueue_pre_tick(move |engine: &mut Self| {
            engine.emit(streams.layout_decl, Event::update(patch));
            engine.settle_node(streams);
        });
    }

    /// Feeds the current value of `source` into `target` as if `source` had
    /// just emitted it.
    fn push_current(&mut self, target: StreamId, source: StreamId) {
        let Some(&value) = self.streams.value(source) else {
            return;
        };
        let kind = if self.streams.is_resize(source) {
            EventKind::Resize
        } else {
            EventKind::Update
        };
        self.emit(target, Event::new(kind, value));
    }

    /// Queues the dirty half of a two-phase mutation of `streams`.
    fn settle_node(&mut self, streams: NodeStreams) {
        // A size that re-emits reaches `layout` through the lift, so the
        // layout emits once either way.
        self.scheduler.enqueue_dirty(move |engine: &mut Self| {
            engine.republish(&[streams.size, streams.layout]);
        });
    }

    // -- Queries --

    /// Resolved size of `node`; `None` while unresolved or stale.
    #[must_use]
    pub fn size(&self, node: NodeId) -> Option<Size> {
        let streams = self.tree.streams(node)?;
        self.streams.value(streams.size).and_then(Value::as_size)
    }

    /// Resolved layout of `node`; `None` while unresolved or stale.
    #[must_use]
    pub fn layout(&self, node: NodeId) -> Option<Layout> {
        let streams = self.tree.streams(node)?;
        self.streams.value(streams.layout).and_then(Value::as_layout)
    }

    /// Resolved geometry of `node`, once both size and layout resolved.
    #[must_use]
    pub fn resolved(&self, node: NodeId) -> Option<Resolved> {
        let size = self.size(node)?;
        let layout = self.layout(node)?;
        Some(Resolved {
            size,
            transform: layout.transform,
            opacity: layout.opacity,
        })
    }

    /// [`resolved`](Self::resolved) by raw slot index, as reported in
    /// [`TickChanges`](crate::tree::TickChanges).
    #[must_use]
    pub fn resolved_at(&self, idx: u32) -> Option<Resolved> {
        let generation = *self.tree.generation.get(idx as usize)?;
        self.resolved(NodeId { idx, generation })
    }

    /// The stream carrying the resolved size of `node`.
    #[must_use]
    pub fn size_stream(&self, node: NodeId) -> Option<StreamId> {
        self.tree.streams(node).map(|s| s.size)
    }

    /// The stream carrying the resolved layout of `node`.
    #[must_use]
    pub fn layout_stream(&self, node: NodeId) -> Option<StreamId> {
        self.tree.streams(node).map(|s| s.layout)
    }

    /// Every pipeline stream of `node`.
    #[must_use]
    pub fn node_streams(&self, node: NodeId) -> Option<NodeStreams> {
        self.tree.streams(node)
    }
}

fn merge_size_spec(current: Option<&Value>, patch: &Value) -> Option<Value> {
    let base = current.and_then(Value::as_size_spec).unwrap_or_default();
    let patch = match *patch {
        Value::SizeSpec(spec) => spec,
        Value::Size(size) => SizeSpec::sized(size.width, size.height),
        _ => return None,
    };
    Some(Value::SizeSpec(base.merge(patch)))
}

fn merge_layout_decl(current: Option<&Value>, patch: &Value) -> Option<Value> {
    let base = current.and_then(Value::as_layout_decl).unwrap_or_default();
    let patch = match *patch {
        Value::LayoutDecl(decl) => decl,
        Value::Transform(transform) => LayoutDecl::transformed(transform),
        _ => return None,
    };
    Some(Value::LayoutDecl(base.merge(patch)))
}

/// `[size_spec, parent_size]`
fn size_lift(inputs: &[Option<&Value>]) -> Option<Value> {
    let spec = inputs[0]?.as_size_spec()?;
    let parent = inputs[1].and_then(Value::as_size);
    resolve_size(&spec, parent).map(Value::Size)
}

/// `[parent_layout, layout_decl, size]`
fn layout_lift(inputs: &[Option<&Value>]) -> Option<Value> {
    let parent = inputs[0].and_then(Value::as_layout);
    let decl = inputs[1].and_then(Value::as_layout_decl).unwrap_or_default();
    let size = inputs[2].and_then(Value::as_size);
    resolve_layout(parent.as_ref(), &decl, size).map(Value::Layout)
}
