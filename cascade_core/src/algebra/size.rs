// Copyright 2026 the Cascade Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Size resolution.

use kurbo::Size;

use crate::geometry::{SizeSpec, X, Y};

/// Resolves `spec` against the parent's size.
///
/// Per axis:
///
/// 1. an explicit size wins;
/// 2. else, with an aspect ratio (width / height), the axis is derived from
///    the other one when the other is declared (explicit or proportional);
///    with neither axis declared, width anchors and height is derived;
/// 3. else proportions multiply the parent size;
/// 4. else the parent size minus the margin at both ends.
///
/// Returns `None` while the parent is unresolved or non-finite. Negative
/// results clamp to zero and a non-positive aspect ratio is ignored, so a
/// spec that is transiently malformed still resolves deterministically.
#[must_use]
pub fn resolve_size(spec: &SizeSpec, parent: Option<Size>) -> Option<Size> {
    let parent = parent.filter(|p| p.width.is_finite() && p.height.is_finite())?;
    let parent = [parent.width, parent.height];

    let explicit = [spec.explicit(X), spec.explicit(Y)];
    let proportional = [
        spec.proportion(X).map(|p| p * parent[X]),
        spec.proportion(Y).map(|p| p * parent[Y]),
    ];
    let margins = spec.margins.unwrap_or([0.0, 0.0]);

    let mut out = [0.0; 2];
    for axis in [X, Y] {
        out[axis] = explicit[axis]
            .or(proportional[axis])
            .unwrap_or(parent[axis] - 2.0 * margins[axis]);
    }

    if let Some(ratio) = spec.aspect_ratio.filter(|r| r.is_finite() && *r > 0.0) {
        let derived = match (explicit[X].is_some(), explicit[Y].is_some()) {
            (true, true) => None,
            (true, false) => Some(Y),
            (false, true) => Some(X),
            (false, false) => {
                if proportional[X].is_none() && proportional[Y].is_some() {
                    Some(X)
                } else {
                    Some(Y)
                }
            }
        };
        match derived {
            Some(Y) => out[Y] = out[X] / ratio,
            Some(_) => out[X] = out[Y] * ratio,
            None => {}
        }
    }

    if !(out[X].is_finite() && out[Y].is_finite()) {
        return None;
    }
    Some(Size::new(out[X].max(0.0), out[Y].max(0.0)))
}
