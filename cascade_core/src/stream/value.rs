// Copyright 2026 the Cascade Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Values carried by streams.

use kurbo::Size;

use crate::geometry::{Layout, LayoutDecl, SizeSpec};
use crate::transform::Transform3d;

/// One sample of a pointer or touch drag along the drawer axis.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GestureSample {
    /// Movement since the previous sample.
    pub delta: f64,
    /// Current velocity, in units per second.
    pub velocity: f64,
}

/// Tagged payload of an [`Event`](super::Event).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Value {
    /// A plain number.
    Scalar(f64),
    /// A flag.
    Bool(bool),
    /// A resolved size.
    Size(Size),
    /// A size spec or patch.
    SizeSpec(SizeSpec),
    /// A layout declaration or patch.
    LayoutDecl(LayoutDecl),
    /// A resolved layout.
    Layout(Layout),
    /// A bare transform.
    Transform(Transform3d),
    /// A gesture sample.
    Gesture(GestureSample),
    /// A position along with its normalized progress.
    Progress {
        /// Absolute position.
        value: f64,
        /// `value` divided by the full extent.
        progress: f64,
    },
}

impl Value {
    /// The scalar, if this is one. Progress values yield their position.
    #[must_use]
    pub fn as_scalar(&self) -> Option<f64> {
        match *self {
            Self::Scalar(v) | Self::Progress { value: v, .. } => Some(v),
            _ => None,
        }
    }

    /// The flag, if this is one.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            Self::Bool(b) => Some(b),
            _ => None,
        }
    }

    /// The size, if this is one.
    #[must_use]
    pub fn as_size(&self) -> Option<Size> {
        match *self {
            Self::Size(s) => Some(s),
            _ => None,
        }
    }

    /// The size spec, if this is one.
    #[must_use]
    pub fn as_size_spec(&self) -> Option<SizeSpec> {
        match *self {
            Self::SizeSpec(s) => Some(s),
            _ => None,
        }
    }

    /// The layout declaration, if this is one.
    #[must_use]
    pub fn as_layout_decl(&self) -> Option<LayoutDecl> {
        match *self {
            Self::LayoutDecl(d) => Some(d),
            _ => None,
        }
    }

    /// The resolved layout, if this is one.
    #[must_use]
    pub fn as_layout(&self) -> Option<Layout> {
        match *self {
            Self::Layout(l) => Some(l),
            _ => None,
        }
    }

    /// The transform, if this is one.
    #[must_use]
    pub fn as_transform(&self) -> Option<Transform3d> {
        match *self {
            Self::Transform(t) => Some(t),
            _ => None,
        }
    }

    /// The gesture sample, if this is one.
    #[must_use]
    pub fn as_gesture(&self) -> Option<GestureSample> {
        match *self {
            Self::Gesture(g) => Some(g),
            _ => None,
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Scalar(v)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<Size> for Value {
    fn from(s: Size) -> Self {
        Self::Size(s)
    }
}

impl From<SizeSpec> for Value {
    fn from(s: SizeSpec) -> Self {
        Self::SizeSpec(s)
    }
}

impl From<LayoutDecl> for Value {
    fn from(d: LayoutDecl) -> Self {
        Self::LayoutDecl(d)
    }
}

impl From<Layout> for Value {
    fn from(l: Layout) -> Self {
        Self::Layout(l)
    }
}

impl From<Transform3d> for Value {
    fn from(t: Transform3d) -> Self {
        Self::Transform(t)
    }
}

impl From<GestureSample> for Value {
    fn from(g: GestureSample) -> Self {
        Self::Gesture(g)
    }
}
