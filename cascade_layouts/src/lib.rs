// Copyright 2026 the Cascade Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Gesture-driven layouts built on `cascade_core`.
//!
//! **[`drawer`]**: A content panel that slides along one edge to reveal a
//! drawer behind it, tracking drag gestures and settling open or closed on
//! release.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod drawer;
