// Copyright 2025 the Halo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Position resolver: node id → container-relative rectangle.
//!
//! ## Overview
//!
//! The chart does not tag its elements with node ids, so the resolver finds a
//! node's boundary shape by inspecting the rendered structure and text. It runs an
//! ordered chain of [`Matcher`]s; the first hit wins:
//!
//! 1. [`ExactStructure`]: a group holding both a matching text and a boundary shape.
//! 2. [`NearestAncestor`]: any matching text, then the shape in its enclosing group.
//! 3. [`WrappedLabel`]: a multi-line text whose line spans all occur in the label.
//! 4. [`NodeIdSubstring`]: any text containing the node id.
//!
//! A hit is the shape's bounding box relative to the container, inflated by the
//! configured padding on every side.
//!
//! ## Ambiguity
//!
//! When two nodes render identical labels, the first match in document order wins.
//!
//! ## Timing
//!
//! Callers must only resolve after the host finished the frame's layout pass; elements
//! whose layout is still pending have no world bounds and never match.

mod matchers;

use halo_scene::{ElementId, ElementKind, Scene};
use kurbo::Rect;

use crate::catalog::NodeInfo;

pub use matchers::{ExactStructure, NearestAncestor, NodeIdSubstring, WrappedLabel};

/// One strategy in the resolver chain.
pub trait Matcher: core::fmt::Debug {
    /// Short name used in diagnostics.
    fn name(&self) -> &'static str;

    /// Find the boundary shape drawn for `node_id`.
    fn find_boundary(&self, scene: &Scene, node_id: &str, info: &NodeInfo) -> Option<ElementId>;

    /// Container-relative bounding box of the boundary shape, unpadded.
    fn try_match(&self, scene: &Scene, node_id: &str, info: &NodeInfo) -> Option<Rect> {
        let shape = self.find_boundary(scene, node_id, info)?;
        scene.relative_bounds(shape)
    }
}

/// Why a resolver pass produced no rectangle.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ResolveMiss {
    /// The container itself has no committed geometry.
    #[error("rendering surface has no committed geometry")]
    NoContainer,
    /// Every strategy ran without a hit.
    #[error("no rendered element matched after {strategies} strategies")]
    NoMatch {
        /// Number of strategies tried.
        strategies: usize,
    },
}

/// A successful resolution.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Resolution {
    /// Padded, container-relative rectangle.
    pub geometry: Rect,
    /// Name of the strategy that matched.
    pub strategy: &'static str,
}

/// Ordered chain of matchers.
#[derive(Debug)]
pub struct Resolver {
    matchers: Vec<Box<dyn Matcher>>,
    padding: f64,
}

impl Resolver {
    /// The default four-strategy chain.
    pub fn new(padding: f64) -> Self {
        Self::with_matchers(
            vec![
                Box::new(ExactStructure),
                Box::new(NearestAncestor),
                Box::new(WrappedLabel),
                Box::new(NodeIdSubstring),
            ],
            padding,
        )
    }

    /// A custom chain, tried in order.
    pub fn with_matchers(matchers: Vec<Box<dyn Matcher>>, padding: f64) -> Self {
        Self { matchers, padding }
    }

    /// Padding applied to every hit.
    pub fn padding(&self) -> f64 {
        self.padding
    }

    /// Strategy names in chain order.
    pub fn strategies(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.matchers.iter().map(|m| m.name())
    }

    /// Resolve `node_id` against the current frame.
    pub fn resolve(
        &self,
        scene: &Scene,
        node_id: &str,
        info: &NodeInfo,
    ) -> Result<Resolution, ResolveMiss> {
        if scene.world_bounds(scene.container()).is_none() {
            return Err(ResolveMiss::NoContainer);
        }
        for matcher in &self.matchers {
            if let Some(rect) = matcher.try_match(scene, node_id, info) {
                tracing::trace!(node = node_id, strategy = matcher.name(), "resolved");
                return Ok(Resolution {
                    geometry: rect.inflate(self.padding, self.padding),
                    strategy: matcher.name(),
                });
            }
            tracing::trace!(node = node_id, strategy = matcher.name(), "no match");
        }
        Err(ResolveMiss::NoMatch {
            strategies: self.matchers.len(),
        })
    }
}

/// Whether rendered `text` equals or contains `label` (both trimmed, non-empty).
pub(crate) fn label_matches(text: &str, label: &str) -> bool {
    let text = text.trim();
    let label = label.trim();
    !text.is_empty() && !label.is_empty() && text.contains(label)
}

/// Rendered text elements in document order.
pub(crate) fn rendered_texts(scene: &Scene) -> impl Iterator<Item = ElementId> + '_ {
    scene
        .descendants(scene.container())
        .into_iter()
        .filter(move |id| scene.kind(*id) == Some(ElementKind::Text) && scene.is_rendered(*id))
}

/// First rendered shape among the direct children of `group` that has committed geometry.
pub(crate) fn boundary_of_group(scene: &Scene, group: ElementId) -> Option<ElementId> {
    scene.children(group).iter().copied().find(|c| {
        scene.kind(*c) == Some(ElementKind::Shape)
            && scene.is_rendered(*c)
            && scene.world_bounds(*c).is_some()
    })
}

/// Boundary shape of the group enclosing a text element.
pub(crate) fn boundary_near(scene: &Scene, text: ElementId) -> Option<ElementId> {
    let group = scene.enclosing(text, ElementKind::Group)?;
    boundary_of_group(scene, group)
}
