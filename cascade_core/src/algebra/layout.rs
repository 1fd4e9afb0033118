// Copyright 2026 the Cascade Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout resolution.

use kurbo::Size;

use crate::geometry::{Layout, LayoutDecl};
use crate::transform::Transform3d;

/// Composes the parent's resolved layout with a node's declaration.
///
/// `transform = parent × origin_offset × own`, where the origin offset moves
/// the node by `-origin × size` so the normalized origin lands on the
/// parent's anchor point. `opacity = parent × own`, clamped to `[0, 1]`.
///
/// Returns `None` when the parent layout or the node's size is unresolved,
/// or when the result is not finite.
#[must_use]
pub fn resolve_layout(
    parent: Option<&Layout>,
    decl: &LayoutDecl,
    size: Option<Size>,
) -> Option<Layout> {
    let parent = parent?;
    let size = size?;

    let offset = match decl.origin {
        Some([ox, oy]) if ox != 0.0 || oy != 0.0 => {
            Transform3d::from_translation(-ox * size.width, -oy * size.height, 0.0)
        }
        _ => Transform3d::IDENTITY,
    };
    let transform = parent.transform * offset * decl.transform.unwrap_or_default();
    let opacity = parent.opacity * decl.opacity.unwrap_or(1.0);

    if !transform.is_finite() || !opacity.is_finite() {
        return None;
    }
    Some(Layout {
        transform,
        opacity: opacity.clamp(0.0, 1.0),
    })
}
