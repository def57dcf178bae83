// Copyright 2025 the Halo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Halo Scene: a Kurbo-native retained mirror of a chart's rendering surface.
//!
//! Charting libraries draw nodes as vector graphics: a group per node holding a
//! boundary shape and a text label (sometimes split into one span per line).
//! This crate keeps a structural copy of that output so that other components can
//! measure it without touching the chart, and so that decorations can be layered
//! above it.
//!
//! - Represents a hierarchy of elements with kinds, local bounds, transforms, text and flags.
//! - Provides read-only structural queries: children, descendants in document order,
//!   nearest enclosing element of a kind, text content, committed world/relative bounds.
//! - Hosts an overlay layer: inert elements appended above the chart, carrying an
//!   [`OverlayStyle`] (node, tier, state flags, container-relative geometry).
//! - Counts every mutation in [`Scene::revision`] so callers can assert that a pass
//!   left the visual tree untouched.
//!
//! ## Not a layout engine
//!
//! The chart library computes positions. Its adapter mirrors the result here and calls
//! [`Scene::commit`] once the layout pass is complete. Until then, mutated elements
//! report no world bounds, which is how readers detect a frame whose layout is pending.
//!
//! ## API overview
//!
//! - [`Scene`]: container managing elements, world geometry and overlays.
//! - [`LocalElement`]: per-element local data (kind, bounds, transform, text, flags).
//! - [`ElementKind`], [`ElementFlags`]: structure, visibility and pointer participation.
//! - [`ElementId`]: generational handle of an element.
//! - [`OverlayStyle`], [`OverlayFlags`]: the presentation contract of overlays.
//!
//! ## Example
//!
//! ```rust
//! use halo_scene::{ElementKind, LocalElement, OverlayFlags, OverlayStyle, Scene};
//! use kurbo::{Affine, Rect, Vec2};
//!
//! let mut scene = Scene::new(Rect::new(0.0, 0.0, 800.0, 600.0));
//!
//! // One chart node: group → (shape, text).
//! let group = scene.insert(None, LocalElement::group(Affine::translate(Vec2::new(40.0, 40.0))));
//! let shape = scene.insert(Some(group), LocalElement::shape(Rect::new(0.0, 0.0, 120.0, 40.0)));
//! let label = scene.insert(Some(group), LocalElement::text(Rect::new(4.0, 4.0, 116.0, 36.0), "Data Quality"));
//! scene.commit();
//!
//! assert_eq!(scene.enclosing(label, ElementKind::Group), Some(group));
//! assert_eq!(scene.relative_bounds(shape), Some(Rect::new(40.0, 40.0, 160.0, 80.0)));
//!
//! // Decorate it.
//! let before = scene.revision();
//! let overlay = scene.attach_overlay(OverlayStyle {
//!     node: Some("DQ".into()),
//!     flags: OverlayFlags::HOVERED,
//!     geometry: scene.relative_bounds(shape).map(|r| r.inflate(2.0, 2.0)),
//!     ..Default::default()
//! });
//! assert_eq!(scene.revision(), before + 1);
//! assert!(scene.is_inert(overlay) && !scene.is_inert(shape));
//! assert!(scene.detach_overlay(overlay));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod tree;
mod types;
mod util;

pub use tree::Scene;
pub use types::{ElementFlags, ElementId, ElementKind, LocalElement, OverlayFlags, OverlayStyle};
