// Copyright 2026 the Cascade Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pure resolution functions.
//!
//! Each algebra turns a node's declared spec plus its parent's resolved
//! geometry into the node's own resolved geometry. They never fail loudly:
//! anything that cannot be computed comes back as `None` ("unresolved"), and
//! the stream that lifted the algebra emits nothing for that pass.

mod layout;
mod size;

pub use layout::resolve_layout;
pub use size::resolve_size;
