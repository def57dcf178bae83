// Copyright 2025 the Halo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the scene: element identifiers, kinds, flags, local geometry and overlay styles.

use alloc::string::String;
use kurbo::{Affine, Rect};

/// Identifier for an element in the scene.
///
/// This is a small, copyable handle that stays stable across updates but becomes
/// invalid when the underlying slot is reused.
/// It consists of a slot index and a generation counter.
///
/// ## Semantics
///
/// - On insert, a fresh slot is allocated with generation `1`.
/// - On remove, the slot is freed; any existing `ElementId` that pointed to that slot is now stale.
/// - On reuse of a freed slot, its generation is incremented, producing a new, distinct `ElementId`.
///
/// ### Liveness
///
/// Use [`Scene::is_alive`](crate::Scene::is_alive) to check whether an `ElementId` still refers to a live element.
/// Stale `ElementId`s never alias a different live element because the generation must match.
/// Overlay owners rely on this when they detach elements that the host may already have torn down.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ElementId(pub(crate) u32, pub(crate) u32);

impl ElementId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }

    pub(crate) const fn generation(self) -> u32 {
        self.1
    }
}

/// Structural role of an element in the rendered chart.
///
/// Kinds mirror the vector-graphic vocabulary a charting library emits:
/// groups wrap one node's drawing, shapes draw its boundary, text and spans carry its label.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ElementKind {
    /// The rendering surface root. Exactly one per scene.
    Container,
    /// A grouping element (for example one chart node or annotation).
    Group,
    /// A boundary shape (path, rect) whose bounding box is a node's geometry.
    Shape,
    /// A text element. Its label may be split over [`Span`](Self::Span) children.
    Text,
    /// One line of a multi-line text element.
    Span,
    /// A decorative element appended by an overlay owner, never by the chart.
    Overlay,
}

impl ElementKind {
    /// Whether elements of this kind carry text.
    pub const fn is_textual(self) -> bool {
        matches!(self, Self::Text | Self::Span)
    }
}

bitflags::bitflags! {
    /// Element flags controlling visibility and pointer participation.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ElementFlags: u8 {
        /// Element is rendered. Hidden elements are skipped by structural queries.
        const VISIBLE = 0b0000_0001;
        /// Element is transparent to pointer input.
        const INERT   = 0b0000_0010;
    }
}

impl Default for ElementFlags {
    fn default() -> Self {
        Self::VISIBLE
    }
}

/// Local data for an element.
#[derive(Clone, Debug)]
pub struct LocalElement {
    /// Structural role.
    pub kind: ElementKind,
    /// Local (untransformed) bounds. For non-axis-aligned content, use a conservative AABB.
    pub local_bounds: Rect,
    /// Local transform relative to parent space.
    pub local_transform: Affine,
    /// Text carried by [`ElementKind::Text`] and [`ElementKind::Span`] elements.
    pub text: Option<String>,
    /// Visibility and pointer flags.
    pub flags: ElementFlags,
}

impl LocalElement {
    /// A group at the given transform.
    pub fn group(local_transform: Affine) -> Self {
        Self {
            kind: ElementKind::Group,
            local_transform,
            ..Default::default()
        }
    }

    /// A boundary shape covering `bounds`.
    pub fn shape(bounds: Rect) -> Self {
        Self {
            kind: ElementKind::Shape,
            local_bounds: bounds,
            ..Default::default()
        }
    }

    /// A text element covering `bounds`.
    pub fn text(bounds: Rect, text: impl Into<String>) -> Self {
        Self {
            kind: ElementKind::Text,
            local_bounds: bounds,
            text: Some(text.into()),
            ..Default::default()
        }
    }

    /// One line of a multi-line text element.
    pub fn span(text: impl Into<String>) -> Self {
        Self {
            kind: ElementKind::Span,
            text: Some(text.into()),
            ..Default::default()
        }
    }
}

impl Default for LocalElement {
    fn default() -> Self {
        Self {
            kind: ElementKind::Group,
            local_bounds: Rect::ZERO,
            local_transform: Affine::IDENTITY,
            text: None,
            flags: ElementFlags::default(),
        }
    }
}

bitflags::bitflags! {
    /// Discrete presentation states exposed by an overlay element.
    ///
    /// The stylesheet keys all colors and shapes off these flags plus the tier.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct OverlayFlags: u8 {
        /// The pointer is over the decorated node.
        const HOVERED    = 0b0000_0001;
        /// The decorated node is selected.
        const SELECTED   = 0b0000_0010;
        /// The overlay is fading out and will be removed.
        const FADING_OUT = 0b0000_0100;
        /// One-shot selection pulse is playing.
        const PULSE      = 0b0000_1000;
    }
}

/// Per-node attributes and inline geometry of an overlay element.
///
/// A default style is the reset state: no node, no tier, no flags, no geometry.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OverlayStyle {
    /// Node identifier attribute.
    pub node: Option<String>,
    /// Tier attribute consumed by the stylesheet.
    pub tier: Option<String>,
    /// State flags.
    pub flags: OverlayFlags,
    /// Absolute position in container-relative coordinates.
    pub geometry: Option<Rect>,
}

impl OverlayStyle {
    /// True when no per-node state remains.
    pub fn is_reset(&self) -> bool {
        self.node.is_none()
            && self.tier.is_none()
            && self.flags.is_empty()
            && self.geometry.is_none()
    }
}
