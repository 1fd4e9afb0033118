// Copyright 2026 the Cascade Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Declarative node options.

use crate::geometry::{LayoutDecl, SizeSpec};
use crate::transform::Transform3d;

/// Everything a node can declare about its geometry.
///
/// Every field is optional. Options are split into a [`SizeSpec`] and a
/// [`LayoutDecl`] that feed the node's size and layout streams.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NodeOptions {
    /// Explicit absolute size per axis.
    pub size: Option<[Option<f64>; 2]>,
    /// Fraction of the parent size per axis.
    pub proportions: Option<[Option<f64>; 2]>,
    /// Margins subtracted from both ends of each axis.
    pub margins: Option<[f64; 2]>,
    /// Width divided by height.
    pub aspect_ratio: Option<f64>,
    /// Normalized anchor point.
    pub origin: Option<[f64; 2]>,
    /// Opacity in `[0, 1]`.
    pub opacity: Option<f32>,
    /// Local transform.
    pub transform: Option<Transform3d>,
}

impl NodeOptions {
    /// No options.
    pub const EMPTY: Self = Self {
        size: None,
        proportions: None,
        margins: None,
        aspect_ratio: None,
        origin: None,
        opacity: None,
        transform: None,
    };

    /// Sets an explicit size on both axes.
    #[must_use]
    pub const fn with_size(mut self, width: f64, height: f64) -> Self {
        self.size = Some([Some(width), Some(height)]);
        self
    }

    /// Sets proportions on both axes.
    #[must_use]
    pub const fn with_proportions(mut self, x: f64, y: f64) -> Self {
        self.proportions = Some([Some(x), Some(y)]);
        self
    }

    /// Sets margins.
    #[must_use]
    pub const fn with_margins(mut self, x: f64, y: f64) -> Self {
        self.margins = Some([x, y]);
        self
    }

    /// Sets the aspect ratio.
    #[must_use]
    pub const fn with_aspect_ratio(mut self, ratio: f64) -> Self {
        self.aspect_ratio = Some(ratio);
        self
    }

    /// Sets the origin.
    #[must_use]
    pub const fn with_origin(mut self, x: f64, y: f64) -> Self {
        self.origin = Some([x, y]);
        self
    }

    /// Sets the opacity.
    #[must_use]
    pub const fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = Some(opacity);
        self
    }

    /// Sets the transform.
    #[must_use]
    pub const fn with_transform(mut self, transform: Transform3d) -> Self {
        self.transform = Some(transform);
        self
    }

    /// Returns `self` with every field set in `patch` replaced.
    #[must_use]
    pub fn merge(self, patch: Self) -> Self {
        Self {
            size: patch.size.or(self.size),
            proportions: patch.proportions.or(self.proportions),
            margins: patch.margins.or(self.margins),
            aspect_ratio: patch.aspect_ratio.or(self.aspect_ratio),
            origin: patch.origin.or(self.origin),
            opacity: patch.opacity.or(self.opacity),
            transform: patch.transform.or(self.transform),
        }
    }

    /// The size half of the options.
    #[must_use]
    pub const fn size_spec(&self) -> SizeSpec {
        SizeSpec {
            size: self.size,
            proportions: self.proportions,
            margins: self.margins,
            aspect_ratio: self.aspect_ratio,
        }
    }

    /// The layout half of the options.
    #[must_use]
    pub const fn layout_decl(&self) -> LayoutDecl {
        LayoutDecl {
            transform: self.transform,
            opacity: self.opacity,
            origin: self.origin,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_keeps_unpatched_fields() {
        let base = NodeOptions::EMPTY.with_size(10.0, 10.0).with_opacity(0.5);
        let merged = base.merge(NodeOptions::EMPTY.with_opacity(0.25).with_origin(0.5, 0.5));
        assert_eq!(merged.size, Some([Some(10.0), Some(10.0)]));
        assert_eq!(merged.opacity, Some(0.25));
        assert_eq!(merged.origin, Some([0.5, 0.5]));
    }

    #[test]
    fn split_into_specs() {
        let opts = NodeOptions::EMPTY
            .with_proportions(0.5, 1.0)
            .with_transform(Transform3d::translate_x(3.0));
        assert_eq!(opts.size_spec(), SizeSpec::proportional(0.5, 1.0));
        assert_eq!(
            opts.layout_decl(),
            LayoutDecl::transformed(Transform3d::translate_x(3.0))
        );
    }
}
