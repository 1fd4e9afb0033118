// Copyright 2026 the Cascade Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The 3D transform carried by layouts.
//!
//! Layouts compose parent-then-child: `parent * child` takes a point in the
//! child's frame to the parent's frame. Painters that only draw in 2D can
//! flatten a transform with [`Transform3d::to_affine`].

use core::ops::Mul;

use kurbo::Affine;
#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

/// Depth of [`Transform3d::BEHIND`].
const BEHIND_DEPTH: f64 = -1e-3;

/// A 4×4 affine transform.
///
/// `cols[j][i]` is row `i` of column `j`; the last column holds the
/// translation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform3d {
    /// Columns `[x, y, z, w]`.
    pub cols: [[f64; 4]; 4],
}

impl Transform3d {
    /// No transformation.
    pub const IDENTITY: Self = Self::diagonal(1.0, 1.0, 1.0);

    /// A tiny step back along z, so a node stacks behind siblings at the
    /// same depth.
    pub const BEHIND: Self = Self::from_translation(0.0, 0.0, BEHIND_DEPTH);

    const fn diagonal(sx: f64, sy: f64, sz: f64) -> Self {
        Self {
            cols: [
                [sx, 0.0, 0.0, 0.0],
                [0.0, sy, 0.0, 0.0],
                [0.0, 0.0, sz, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    /// Moves by `(x, y, z)`.
    #[must_use]
    pub const fn from_translation(x: f64, y: f64, z: f64) -> Self {
        let mut t = Self::IDENTITY;
        t.cols[3] = [x, y, z, 1.0];
        t
    }

    /// Moves along x.
    #[must_use]
    pub const fn translate_x(x: f64) -> Self {
        Self::from_translation(x, 0.0, 0.0)
    }

    /// Moves along y.
    #[must_use]
    pub const fn translate_y(y: f64) -> Self {
        Self::from_translation(0.0, y, 0.0)
    }

    /// Scales each axis independently.
    #[must_use]
    pub const fn from_scale(sx: f64, sy: f64, sz: f64) -> Self {
        Self::diagonal(sx, sy, sz)
    }

    /// Rotates counterclockwise about z by `radians`.
    #[must_use]
    pub fn from_rotation_z(radians: f64) -> Self {
        let (s, c) = (radians.sin(), radians.cos());
        let mut t = Self::IDENTITY;
        t.cols[0] = [c, s, 0.0, 0.0];
        t.cols[1] = [-s, c, 0.0, 0.0];
        t
    }

    /// Embeds a 2D affine transform in the xy plane.
    #[must_use]
    pub fn from_affine(affine: Affine) -> Self {
        let [a, b, c, d, e, f] = affine.as_coeffs();
        let mut t = Self::IDENTITY;
        t.cols[0] = [a, b, 0.0, 0.0];
        t.cols[1] = [c, d, 0.0, 0.0];
        t.cols[3] = [e, f, 0.0, 1.0];
        t
    }

    /// The xy part of this transform, dropping depth.
    #[must_use]
    pub fn to_affine(self) -> Affine {
        let [x, y, _, t] = self.cols;
        Affine::new([x[0], x[1], y[0], y[1], t[0], t[1]])
    }

    /// Where the origin ends up.
    #[must_use]
    pub const fn translation(self) -> [f64; 3] {
        let [x, y, z, _] = self.cols[3];
        [x, y, z]
    }

    /// Maps the point `p` (with w = 1).
    #[must_use]
    pub fn transform_point(self, p: [f64; 3]) -> [f64; 3] {
        let [cx, cy, cz, ct] = self.cols;
        core::array::from_fn(|i| cx[i] * p[0] + cy[i] * p[1] + cz[i] * p[2] + ct[i])
    }

    /// Whether no entry is NaN or infinite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.cols.as_flattened().iter().all(|v| v.is_finite())
    }

    /// Whether every entry is within `eps` of the matching entry of `other`.
    #[must_use]
    pub fn approx_eq(&self, other: &Self, eps: f64) -> bool {
        let a = self.cols.as_flattened();
        let b = other.cols.as_flattened();
        a.iter().zip(b).all(|(a, b)| (a - b).abs() <= eps)
    }
}

impl Default for Transform3d {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Transform3d {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        // Column j of the product is `self` applied to column j of `rhs`.
        let cols = rhs.cols.map(|col| {
            core::array::from_fn(|i| (0..4).map(|k| self.cols[k][i] * col[k]).sum())
        });
        Self { cols }
    }
}
