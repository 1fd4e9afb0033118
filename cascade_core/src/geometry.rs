// Copyright 2026 the Cascade Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Declarative size and layout specs, and their resolved counterparts.
//!
//! Declared specs are partial: every field is optional, and [`merge`] lets a
//! later patch override only the fields it names. Resolution into absolute
//! geometry is done by the [`algebra`](crate::algebra) functions.
//!
//! [`merge`]: SizeSpec::merge

use kurbo::Size;

use crate::transform::Transform3d;

/// Horizontal axis index.
pub const X: usize = 0;
/// Vertical axis index.
pub const Y: usize = 1;

/// A node's declared size.
///
/// Per axis, an explicit size wins over an aspect-ratio derivation, which wins
/// over proportions, which win over the parent size minus margins. See
/// [`resolve_size`](crate::algebra::resolve_size).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SizeSpec {
    /// Explicit absolute size per axis; `None` on an axis leaves it free.
    pub size: Option<[Option<f64>; 2]>,
    /// Fraction of the parent size per axis.
    pub proportions: Option<[Option<f64>; 2]>,
    /// Margins subtracted from both ends of each axis.
    pub margins: Option<[f64; 2]>,
    /// Width divided by height.
    pub aspect_ratio: Option<f64>,
}

impl SizeSpec {
    /// A spec that declares nothing and resolves to the parent size.
    pub const EMPTY: Self = Self {
        size: None,
        proportions: None,
        margins: None,
        aspect_ratio: None,
    };

    /// A spec with an explicit size on both axes.
    #[must_use]
    pub const fn sized(width: f64, height: f64) -> Self {
        Self {
            size: Some([Some(width), Some(height)]),
            ..Self::EMPTY
        }
    }

    /// A spec with proportions on both axes.
    #[must_use]
    pub const fn proportional(x: f64, y: f64) -> Self {
        Self {
            proportions: Some([Some(x), Some(y)]),
            ..Self::EMPTY
        }
    }

    /// A spec with symmetric margins.
    #[must_use]
    pub const fn with_margins(x: f64, y: f64) -> Self {
        Self {
            margins: Some([x, y]),
            ..Self::EMPTY
        }
    }

    /// A spec with only an aspect ratio.
    #[must_use]
    pub const fn with_aspect_ratio(ratio: f64) -> Self {
        Self {
            aspect_ratio: Some(ratio),
            ..Self::EMPTY
        }
    }

    /// Returns `self` with every field named by `patch` replaced.
    #[must_use]
    pub fn merge(self, patch: Self) -> Self {
        Self {
            size: patch.size.or(self.size),
            proportions: patch.proportions.or(self.proportions),
            margins: patch.margins.or(self.margins),
            aspect_ratio: patch.aspect_ratio.or(self.aspect_ratio),
        }
    }

    /// Whether no field is declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::EMPTY
    }

    /// Explicit size on `axis`, if declared.
    #[inline]
    #[must_use]
    pub fn explicit(&self, axis: usize) -> Option<f64> {
        self.size.and_then(|s| s[axis])
    }

    /// Proportion on `axis`, if declared.
    #[inline]
    #[must_use]
    pub fn proportion(&self, axis: usize) -> Option<f64> {
        self.proportions.and_then(|p| p[axis])
    }
}

/// A node's declared transform, opacity, and origin.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LayoutDecl {
    /// Transform applied in the node's own frame.
    pub transform: Option<Transform3d>,
    /// Opacity multiplied into the parent's.
    pub opacity: Option<f32>,
    /// Normalized anchor point (`[0, 0]` top-left, `[1, 1]` bottom-right).
    pub origin: Option<[f64; 2]>,
}

impl LayoutDecl {
    /// A declaration with nothing set; resolves to the parent layout.
    pub const EMPTY: Self = Self {
        transform: None,
        opacity: None,
        origin: None,
    };

    /// A declaration carrying only a transform.
    #[must_use]
    pub const fn transformed(transform: Transform3d) -> Self {
        Self {
            transform: Some(transform),
            ..Self::EMPTY
        }
    }

    /// Returns `self` with every field named by `patch` replaced.
    #[must_use]
    pub fn merge(self, patch: Self) -> Self {
        Self {
            transform: patch.transform.or(self.transform),
            opacity: patch.opacity.or(self.opacity),
            origin: patch.origin.or(self.origin),
        }
    }
}

/// A resolved transform and opacity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Layout {
    /// Transform from the node's frame to the root frame.
    pub transform: Transform3d,
    /// Effective opacity in `[0, 1]`.
    pub opacity: f32,
}

impl Layout {
    /// The layout of a root: identity transform, fully opaque.
    pub const ROOT: Self = Self {
        transform: Transform3d::IDENTITY,
        opacity: 1.0,
    };
}

impl Default for Layout {
    fn default() -> Self {
        Self::ROOT
    }
}

/// The final geometry handed to a [`Painter`](crate::paint::Painter).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Resolved {
    /// Absolute size.
    pub size: Size,
    /// Transform into the root frame.
    pub transform: Transform3d,
    /// Effective opacity.
    pub opacity: f32,
}
