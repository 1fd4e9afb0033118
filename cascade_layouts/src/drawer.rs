// Copyright 2026 the Cascade Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A drawer revealed by sliding content along one edge.
//!
//! The drawer sits behind the content. Dragging moves the content by the
//! gesture delta, clamped to `[0, drawer_length]` along the side's
//! orientation. On release, [`release`] decides whether the drawer commits
//! to the opposite state or springs back.
//!
//! ```text
//! input ─► gesture ─► position ─► output (Progress)
//!                       ▲   └───► content translation
//! inertia ─► differential
//! ```
//!
//! `position` is an accumulator fed by two sources: clamped gesture deltas
//! while dragging, and the per-frame deltas of the `inertia` transition
//! while animating. Both can therefore drive the content without either
//! knowing the absolute position.
//!
//! Operations that change state ([`open`](DrawerLayout::open),
//! [`close`](DrawerLayout::close), and friends) are queued for the next
//! tick, as is the release decision taken when a gesture ends.

use cascade_core::engine::Engine;
use cascade_core::stream::{Event, EventKind, Filter, GestureSample, StreamId, Tween, Value};
use cascade_core::transform::Transform3d;
use cascade_core::tree::{NodeId, NodeOptions};

/// Positions within this distance of a bound count as resting on it.
pub const REST_EPSILON: f64 = 1e-6;

/// The edge the drawer is attached to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Side {
    /// Drawer on the left; content slides right.
    #[default]
    Left,
    /// Drawer on top; content slides down.
    Top,
    /// Drawer on the right; content slides left.
    Right,
    /// Drawer at the bottom; content slides up.
    Bottom,
}

/// The axis the content slides along.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Horizontal.
    X,
    /// Vertical.
    Y,
}

impl Side {
    /// The axis the content slides along.
    #[must_use]
    pub const fn direction(self) -> Direction {
        match self {
            Self::Left | Self::Right => Direction::X,
            Self::Top | Self::Bottom => Direction::Y,
        }
    }

    /// `1.0` if opening moves the content toward positive coordinates,
    /// `-1.0` otherwise.
    #[must_use]
    pub const fn orientation(self) -> f64 {
        match self {
            Self::Left | Self::Top => 1.0,
            Self::Right | Self::Bottom => -1.0,
        }
    }
}

/// Drawer configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawerConfig {
    /// Edge the drawer is attached to.
    pub side: Side,
    /// Travel between closed and open, as a positive distance.
    pub drawer_length: f64,
    /// Release speed beyond which the drawer toggles regardless of position.
    pub velocity_threshold: f64,
    /// Travel beyond which a release commits to the opposite state.
    ///
    /// Zero means half of `drawer_length`.
    pub position_threshold: f64,
    /// Animation when opening; `None` jumps.
    pub transition_open: Option<Tween>,
    /// Animation when closing; `None` jumps.
    pub transition_close: Option<Tween>,
}

impl DrawerConfig {
    /// A left drawer of zero length with no thresholds and no animation.
    pub const DEFAULT: Self = Self {
        side: Side::Left,
        drawer_length: 0.0,
        velocity_threshold: 0.0,
        position_threshold: 0.0,
        transition_open: None,
        transition_close: None,
    };

    /// A drawer on `side` travelling `drawer_length`.
    #[must_use]
    pub const fn new(side: Side, drawer_length: f64) -> Self {
        Self {
            side,
            drawer_length,
            ..Self::DEFAULT
        }
    }

    /// Sets both release thresholds.
    #[must_use]
    pub const fn with_thresholds(mut self, position: f64, velocity: f64) -> Self {
        self.position_threshold = position;
        self.velocity_threshold = velocity;
        self
    }

    /// Sets the open and close animations.
    #[must_use]
    pub const fn with_transitions(mut self, open: Option<Tween>, close: Option<Tween>) -> Self {
        self.transition_open = open;
        self.transition_close = close;
        self
    }

    /// Signed position of the open state.
    #[must_use]
    pub fn open_position(&self) -> f64 {
        self.side.orientation() * self.drawer_length.abs()
    }

    /// `[min, max]` travel along the axis.
    #[must_use]
    pub fn bounds(&self) -> [f64; 2] {
        let open = self.open_position();
        [open.min(0.0), open.max(0.0)]
    }

    /// The thresholds [`release`] compares against.
    #[must_use]
    pub fn thresholds(&self) -> Thresholds {
        let length = self.drawer_length.abs();
        let position = if self.position_threshold > 0.0 {
            self.position_threshold
        } else {
            length / 2.0
        };
        Thresholds {
            length,
            orientation: self.side.orientation(),
            position,
            velocity: self.velocity_threshold,
        }
    }
}

impl Default for DrawerConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Inputs of the release decision besides position, velocity, and state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Thresholds {
    /// Travel between closed and open (positive).
    pub length: f64,
    /// `1.0` or `-1.0`; see [`Side::orientation`].
    pub orientation: f64,
    /// Travel threshold (positive).
    pub position: f64,
    /// Speed threshold (positive).
    pub velocity: f64,
}

/// What a gesture release commits to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Release {
    /// Already resting closed; just record the state.
    SettleClosed,
    /// Already resting open; just record the state.
    SettleOpen,
    /// Animate to the opposite state.
    Toggle,
    /// Animate back to the current state.
    Reset,
}

/// Returns the delta that keeps `position + delta` within `bounds`.
#[must_use]
pub fn clamp_delta(position: f64, delta: f64, bounds: [f64; 2]) -> f64 {
    let [min, max] = bounds;
    (position + delta).clamp(min, max) - position
}

/// Decides what a release at `position` moving at `velocity` commits to.
///
/// Position and velocity are signed along the axis; they are projected onto
/// the opening direction before being compared. A release toggles when the
/// speed away from the current state exceeds the velocity threshold, or when
/// the travel has crossed the position threshold away from it.
#[must_use]
pub fn release(position: f64, velocity: f64, is_open: bool, t: &Thresholds) -> Release {
    let travel = position * t.orientation;
    let speed = velocity * t.orientation;

    if travel.abs() <= REST_EPSILON {
        return Release::SettleClosed;
    }
    if (travel - t.length).abs() <= REST_EPSILON {
        return Release::SettleOpen;
    }

    let toggle = if is_open {
        -speed > t.velocity || travel < t.position
    } else {
        speed > t.velocity || travel > t.position
    };
    if toggle {
        Release::Toggle
    } else {
        Release::Reset
    }
}

/// Handles to the streams and node of one drawer.
///
/// All handles are plain ids, so the layout is `Copy` and can be captured by
/// queued tasks. Methods taking `&mut Engine` operate on the engine the
/// layout was created in.
#[derive(Clone, Copy, Debug)]
pub struct DrawerLayout {
    config: DrawerConfig,
    node: NodeId,
    input: StreamId,
    gesture: StreamId,
    position: StreamId,
    inertia: StreamId,
    differential: StreamId,
    output: StreamId,
    is_open: StreamId,
}

impl DrawerLayout {
    /// Builds the drawer pipeline and its container node.
    ///
    /// The container is detached; add it under a parent (or make it a root)
    /// with the usual engine calls.
    pub fn new(engine: &mut Engine, config: DrawerConfig) -> Self {
        let node = engine.create_node(NodeOptions::EMPTY);
        let input = engine.create_relay();
        let position = engine.accumulator(0.0);

        let bounds = config.bounds();
        let gesture = engine.filter(
            Filter::new()
                .on_start(|_, _| Some(Value::Scalar(0.0)))
                .on_update(move |value, streams| {
                    let GestureSample { delta, .. } = value.as_gesture()?;
                    let current = streams
                        .value(position)
                        .and_then(Value::as_scalar)
                        .unwrap_or(0.0);
                    Some(Value::Scalar(clamp_delta(current, delta, bounds)))
                })
                .on_end(|_, _| Some(Value::Scalar(0.0))),
        );
        engine.subscribe(gesture, input);
        engine.subscribe(position, gesture);

        let inertia = engine.create_transition(0.0);
        let differential = engine.differencer();
        engine.subscribe(differential, inertia);
        engine.subscribe(position, differential);

        let length = config.drawer_length.abs();
        let output = engine.map(move |value| {
            let value = value.as_scalar()?;
            let progress = if length > 0.0 { value / length } else { 0.0 };
            Some(Value::Progress { value, progress })
        });
        engine.subscribe(output, position);

        let is_open = engine.create_source(Some(Value::Bool(false)));

        let layout = Self {
            config,
            node,
            input,
            gesture,
            position,
            inertia,
            differential,
            output,
            is_open,
        };
        for stream in [
            input,
            gesture,
            position,
            inertia,
            differential,
            output,
            is_open,
        ] {
            engine.own_stream(node, stream);
        }

        engine.on_input(gesture, EventKind::End, move |event, scheduler| {
            let velocity = event.value.as_gesture().map_or(0.0, |g| g.velocity);
            scheduler.enqueue_pre_tick(move |engine: &mut Engine| {
                layout.on_release(engine, velocity);
            });
        });
        layout
    }

    /// The configuration.
    #[must_use]
    pub fn config(&self) -> &DrawerConfig {
        &self.config
    }

    /// The container node holding drawer and content.
    #[must_use]
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Where gesture events go: [`Value::Gesture`] as `Start`, `Update`, `End`.
    #[must_use]
    pub fn input(&self) -> StreamId {
        self.input
    }

    /// Emits [`Value::Progress`] whenever the position changes.
    #[must_use]
    pub fn output(&self) -> StreamId {
        self.output
    }

    /// Emits [`Value::Bool`] whenever the open state changes.
    #[must_use]
    pub fn is_open_stream(&self) -> StreamId {
        self.is_open
    }

    /// Current signed position.
    #[must_use]
    pub fn position(&self, engine: &Engine) -> f64 {
        engine.scalar(self.position).unwrap_or(0.0)
    }

    /// Whether the drawer is open or committed to opening.
    #[must_use]
    pub fn is_open(&self, engine: &Engine) -> bool {
        engine
            .value(self.is_open)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// Places `drawer` behind the content.
    ///
    /// Returns the wrapper node that carries the depth offset.
    pub fn add_drawer(&self, engine: &mut Engine, drawer: NodeId) -> NodeId {
        let wrapper = engine.create_node(NodeOptions::EMPTY.with_transform(Transform3d::BEHIND));
        engine.add_child(self.node, wrapper);
        engine.add_child(wrapper, drawer);
        wrapper
    }

    /// Adds `content`, translated by the drawer position.
    ///
    /// Returns the wrapper node whose layout follows the position.
    pub fn add_content(&self, engine: &mut Engine, content: NodeId) -> NodeId {
        let direction = self.config.side.direction();
        let translate = engine.map(move |value| {
            let p = value.as_scalar()?;
            Some(Value::Transform(match direction {
                Direction::X => Transform3d::translate_x(p),
                Direction::Y => Transform3d::translate_y(p),
            }))
        });
        engine.subscribe(translate, self.position);

        let wrapper = engine.create_node(NodeOptions::EMPTY);
        engine.own_stream(wrapper, translate);
        engine.bind_layout(wrapper, translate);
        engine.add_child(self.node, wrapper);
        engine.add_child(wrapper, content);
        wrapper
    }

    /// Opens the drawer with the configured animation.
    pub fn open(&self, engine: &mut Engine) {
        let this = *self;
        engine.enqueue_pre_tick(move |engine: &mut Engine| this.open_now(engine));
    }

    /// Closes the drawer with the configured animation.
    pub fn close(&self, engine: &mut Engine) {
        let this = *self;
        engine.enqueue_pre_tick(move |engine: &mut Engine| this.close_now(engine));
    }

    /// Switches between open and closed.
    pub fn toggle(&self, engine: &mut Engine) {
        let this = *self;
        engine.enqueue_pre_tick(move |engine: &mut Engine| this.toggle_now(engine));
    }

    /// Returns to the bound of the current state.
    pub fn reset(&self, engine: &mut Engine) {
        let this = *self;
        engine.enqueue_pre_tick(move |engine: &mut Engine| this.reset_now(engine));
    }

    /// Moves the content to `position` without changing the open state.
    pub fn set_position(&self, engine: &mut Engine, position: f64, tween: Option<Tween>) {
        let this = *self;
        engine.enqueue_pre_tick(move |engine: &mut Engine| this.move_to(engine, position, tween));
    }

    /// Destroys the container node, everything beneath it, and the pipeline.
    pub fn destroy(self, engine: &mut Engine) {
        engine.destroy_node(self.node);
    }

    fn open_now(&self, engine: &mut Engine) {
        self.move_to(
            engine,
            self.config.open_position(),
            self.config.transition_open,
        );
        self.set_open(engine, true);
    }

    fn close_now(&self, engine: &mut Engine) {
        self.move_to(engine, 0.0, self.config.transition_close);
        self.set_open(engine, false);
    }

    fn toggle_now(&self, engine: &mut Engine) {
        if self.is_open(engine) {
            self.close_now(engine);
        } else {
            self.open_now(engine);
        }
    }

    fn reset_now(&self, engine: &mut Engine) {
        if self.is_open(engine) {
            self.open_now(engine);
        } else {
            self.close_now(engine);
        }
    }

    fn move_to(&self, engine: &mut Engine, target: f64, tween: Option<Tween>) {
        // Re-anchor the inertia at the current position so that only the
        // animated travel reaches the accumulator.
        let current = self.position(engine);
        engine.transition_jump(self.inertia, current);
        engine.transition_to(self.inertia, target, tween);
    }

    fn set_open(&self, engine: &mut Engine, open: bool) {
        if self.is_open(engine) != open {
            engine.emit(self.is_open, Event::update(open));
        }
    }

    fn on_release(&self, engine: &mut Engine, velocity: f64) {
        let position = self.position(engine);
        match release(position, velocity, self.is_open(engine), &self.config.thresholds()) {
            Release::SettleClosed => self.set_open(engine, false),
            Release::SettleOpen => self.set_open(engine, true),
            Release::Toggle => self.toggle_now(engine),
            Release::Reset => self.reset_now(engine),
        }
    }
}

#[cfg(test)]
mod tests {
    use cascade_core::time::{Duration, HostTime};
    use kurbo::Size;

    use super::*;

    const LEFT: Thresholds = Thresholds {
        length: 200.0,
        orientation: 1.0,
        position: 100.0,
        velocity: 50.0,
    };

    fn drag(engine: &mut Engine, drawer: &DrawerLayout, deltas: &[f64], velocity: f64) {
        let input = drawer.input();
        engine.emit(input, Event::start(GestureSample::default()));
        for &delta in deltas {
            engine.emit(input, Event::update(GestureSample { delta, velocity }));
        }
        engine.emit(input, Event::end(GestureSample { delta: 0.0, velocity }));
    }

    fn left_drawer(engine: &mut Engine) -> DrawerLayout {
        DrawerLayout::new(
            engine,
            DrawerConfig::new(Side::Left, 200.0).with_thresholds(100.0, 50.0),
        )
    }

    #[test]
    fn sides_map_to_axes() {
        assert_eq!(Side::Left.direction(), Direction::X);
        assert_eq!(Side::Bottom.direction(), Direction::Y);
        assert_eq!(Side::Top.orientation(), 1.0);
        assert_eq!(Side::Right.orientation(), -1.0);
        assert_eq!(DrawerConfig::new(Side::Right, 80.0).bounds(), [-80.0, 0.0]);
    }

    #[test]
    fn zero_position_threshold_is_half_length() {
        let t = DrawerConfig::new(Side::Top, 300.0).thresholds();
        assert_eq!(t.position, 150.0);
        let t = DrawerConfig::new(Side::Top, 300.0)
            .with_thresholds(40.0, 0.0)
            .thresholds();
        assert_eq!(t.position, 40.0);
    }

    #[test]
    fn clamp_keeps_position_in_bounds() {
        let bounds = [0.0, 200.0];
        assert_eq!(clamp_delta(190.0, 30.0, bounds), 10.0);
        assert_eq!(clamp_delta(10.0, -30.0, bounds), -10.0);
        assert_eq!(clamp_delta(200.0, 5.0, bounds), 0.0);
        assert_eq!(clamp_delta(50.0, 25.0, bounds), 25.0);
        assert_eq!(clamp_delta(-20.0, -5.0, [-80.0, 0.0]), -5.0);
    }

    #[test]
    fn release_past_position_threshold_opens() {
        assert_eq!(release(120.0, 10.0, false, &LEFT), Release::Toggle);
    }

    #[test]
    fn release_short_of_thresholds_resets() {
        assert_eq!(release(60.0, 10.0, false, &LEFT), Release::Reset);
        assert_eq!(release(150.0, -10.0, true, &LEFT), Release::Reset);
    }

    #[test]
    fn fast_release_toggles_only_away_from_state() {
        assert_eq!(release(20.0, 80.0, false, &LEFT), Release::Toggle);
        assert_eq!(release(20.0, -80.0, false, &LEFT), Release::Reset);
        assert_eq!(release(180.0, -80.0, true, &LEFT), Release::Toggle);
    }

    #[test]
    fn release_at_rest_settles() {
        assert_eq!(release(1e-9, 500.0, true, &LEFT), Release::SettleClosed);
        assert_eq!(release(200.0, -500.0, false, &LEFT), Release::SettleOpen);
    }

    #[test]
    fn negative_side_projects_onto_opening_direction() {
        let right = Thresholds {
            orientation: -1.0,
            ..LEFT
        };
        assert_eq!(release(-120.0, -10.0, false, &right), Release::Toggle);
        assert_eq!(release(-60.0, -10.0, false, &right), Release::Reset);
        assert_eq!(release(-200.0, 0.0, false, &right), Release::SettleOpen);
    }

    #[test]
    fn drag_is_clamped_to_drawer_length() {
        let mut engine = Engine::default();
        let drawer = left_drawer(&mut engine);
        engine.emit(drawer.input(), Event::start(GestureSample::default()));
        engine.emit(drawer.input(), Event::update(GestureSample {
            delta: 150.0,
            velocity: 0.0,
        }));
        engine.emit(drawer.input(), Event::update(GestureSample {
            delta: 150.0,
            velocity: 0.0,
        }));
        assert_eq!(drawer.position(&engine), 200.0);
        engine.emit(drawer.input(), Event::update(GestureSample {
            delta: -500.0,
            velocity: 0.0,
        }));
        assert_eq!(drawer.position(&engine), 0.0);
    }

    #[test]
    fn release_past_threshold_commits_open() {
        let mut engine = Engine::default();
        let drawer = left_drawer(&mut engine);
        drag(&mut engine, &drawer, &[120.0], 10.0);
        assert_eq!(drawer.position(&engine), 120.0);
        assert!(!drawer.is_open(&engine), "decision waits for the tick");

        engine.tick();
        assert!(drawer.is_open(&engine), "travel passed the threshold");
        assert_eq!(drawer.position(&engine), 200.0);
        assert_eq!(
            engine.value(drawer.output()),
            Some(&Value::Progress {
                value: 200.0,
                progress: 1.0
            })
        );
    }

    #[test]
    fn short_drag_springs_back() {
        let mut engine = Engine::default();
        let drawer = left_drawer(&mut engine);
        drag(&mut engine, &drawer, &[30.0, 20.0], 5.0);
        engine.tick();
        assert!(!drawer.is_open(&engine), "short drag stays closed");
        assert_eq!(drawer.position(&engine), 0.0);
    }

    #[test]
    fn animated_open_runs_over_frames() {
        let mut engine = Engine::default();
        let tween = Some(Tween::linear(Duration(100)));
        let drawer = DrawerLayout::new(
            &mut engine,
            DrawerConfig::new(Side::Left, 200.0).with_transitions(tween, tween),
        );
        drawer.open(&mut engine);
        engine.advance(HostTime(0));
        assert!(drawer.is_open(&engine), "state commits before the animation");
        assert_eq!(drawer.position(&engine), 0.0);

        engine.advance(HostTime(10));
        engine.advance(HostTime(60));
        assert!((drawer.position(&engine) - 100.0).abs() < 1e-9, "halfway at t=50");
        engine.advance(HostTime(110));
        assert!((drawer.position(&engine) - 200.0).abs() < 1e-9, "arrived");
        assert!(!engine.has_pending_work(), "animation finished");
    }

    #[test]
    fn toggle_and_reset() {
        let mut engine = Engine::default();
        let drawer = left_drawer(&mut engine);
        drawer.toggle(&mut engine);
        engine.tick();
        assert!(drawer.is_open(&engine), "toggled open");

        drawer.set_position(&mut engine, 50.0, None);
        engine.tick();
        assert_eq!(drawer.position(&engine), 50.0);
        assert!(drawer.is_open(&engine), "moving keeps the state");

        drawer.reset(&mut engine);
        engine.tick();
        assert_eq!(drawer.position(&engine), 200.0);

        drawer.toggle(&mut engine);
        engine.tick();
        assert!(!drawer.is_open(&engine), "toggled closed");
        assert_eq!(drawer.position(&engine), 0.0);
    }

    #[test]
    fn content_follows_position() {
        let mut engine = Engine::default();
        let viewport = engine.create_size_observable(Some(Size::new(320.0, 480.0)));
        let root = engine.create_root(viewport, NodeOptions::EMPTY);
        let drawer = DrawerLayout::new(&mut engine, DrawerConfig::new(Side::Bottom, 100.0));
        engine.add_child(root, drawer.node());

        let menu = engine.create_node(NodeOptions::EMPTY);
        let page = engine.create_node(NodeOptions::EMPTY);
        drawer.add_drawer(&mut engine, menu);
        drawer.add_content(&mut engine, page);
        engine.tick();

        let depth = engine.layout(menu).unwrap().transform.translation()[2];
        assert!(depth < 0.0, "drawer sits behind, got z={depth}");
        assert_eq!(engine.layout(page).unwrap().transform.translation(), [0.0, 0.0, 0.0]);

        drawer.open(&mut engine);
        engine.tick();
        assert_eq!(engine.layout(page).unwrap().transform.translation(), [0.0, -100.0, 0.0]);
    }

    #[test]
    fn destroy_releases_pipeline() {
        let mut engine = Engine::default();
        let before = engine.streams().len();
        let drawer = left_drawer(&mut engine);
        let page = engine.create_node(NodeOptions::EMPTY);
        drawer.add_content(&mut engine, page);
        drawer.destroy(&mut engine);
        assert_eq!(engine.streams().len(), before);
        assert!(engine.tree().is_empty(), "all nodes freed");
    }
}
