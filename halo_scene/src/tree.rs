// Copyright 2025 the Halo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core scene implementation: structure, updates, structural queries and the overlay layer.

use alloc::string::String;
use alloc::vec::Vec;
use kurbo::{Affine, Rect, Vec2};

use crate::types::{ElementFlags, ElementId, ElementKind, LocalElement, OverlayStyle};
use crate::util::transform_rect_bbox;

/// Retained mirror of a rendering surface.
///
/// The host (the chart library's adapter) owns every element except overlays:
/// it inserts and updates chart elements and calls [`Scene::commit`] once its
/// layout pass is complete. Overlay owners only use the read-only queries and the
/// `*_overlay` methods.
#[derive(Clone)]
pub struct Scene {
    elements: Vec<Option<Element>>, // slots
    generations: Vec<u32>,          // last generation per slot (persists across frees)
    free_list: Vec<usize>,
    container: ElementId,
    revision: u64,
    epoch: u64,
}

impl core::fmt::Debug for Scene {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.elements.len();
        let alive = self.elements.iter().filter(|n| n.is_some()).count();
        f.debug_struct("Scene")
            .field("elements_total", &total)
            .field("elements_alive", &alive)
            .field("free_list", &self.free_list.len())
            .field("revision", &self.revision)
            .field("epoch", &self.epoch)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Debug, Default)]
struct WorldElement {
    world_transform: Affine,
    world_bounds: Rect, // AABB of transformed local bounds
}

#[derive(Clone, Copy, Debug, Default)]
struct Dirty {
    layout: bool,
    transform: bool,
}

impl Dirty {
    const ALL: Self = Self {
        layout: true,
        transform: true,
    };

    fn any(self) -> bool {
        self.layout || self.transform
    }
}

#[derive(Clone, Debug)]
struct Element {
    generation: u32,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    local: LocalElement,
    world: WorldElement,
    dirty: Dirty,
    overlay: Option<OverlayStyle>,
}

impl Element {
    fn new(generation: u32, local: LocalElement) -> Self {
        Self {
            generation,
            parent: None,
            children: Vec::new(),
            local,
            world: WorldElement::default(),
            dirty: Dirty::ALL,
            overlay: None,
        }
    }
}

impl Scene {
    /// Create a scene whose container covers `container_bounds` in world space.
    pub fn new(container_bounds: Rect) -> Self {
        let mut scene = Self {
            elements: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            container: ElementId::new(0, 0),
            revision: 0,
            epoch: 0,
        };
        scene.container = scene.alloc(Element::new(
            0,
            LocalElement {
                kind: ElementKind::Container,
                local_bounds: container_bounds,
                ..Default::default()
            },
        ));
        scene
    }

    /// The rendering surface root.
    pub fn container(&self) -> ElementId {
        self.container
    }

    /// Number of visual-tree mutations applied so far.
    ///
    /// Every insert, removal, property update and overlay attach/restyle/detach
    /// bumps the revision. [`Scene::commit`] does not: it only recomputes geometry.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Number of completed layout passes.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    fn alloc(&mut self, mut element: Element) -> ElementId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            element.generation = generation;
            self.elements[idx] = Some(element);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "ElementId uses 32-bit indices by design."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            element.generation = generation;
            self.elements.push(Some(element));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "ElementId uses 32-bit indices by design."
            )]
            ((self.elements.len() - 1) as u32, generation)
        };
        self.revision += 1;
        ElementId::new(idx, generation)
    }

    fn mark_subtree_dirty(&mut self, id: ElementId, flags: Dirty) {
        let Some(n) = self.element_opt_mut(id) else {
            return;
        };
        n.dirty.layout |= flags.layout;
        n.dirty.transform |= flags.transform;
        let children = n.children.clone();
        for c in children {
            self.mark_subtree_dirty(c, flags);
        }
    }

    /// Insert a chart element as the last child of `parent` (or of the container if `None`).
    ///
    /// A stale `parent` also falls back to the container.
    pub fn insert(&mut self, parent: Option<ElementId>, local: LocalElement) -> ElementId {
        debug_assert!(
            !matches!(local.kind, ElementKind::Container | ElementKind::Overlay),
            "containers are created by Scene::new and overlays by Scene::attach_overlay"
        );
        let parent = parent
            .filter(|p| self.is_alive(*p))
            .unwrap_or(self.container);
        let id = self.alloc(Element::new(0, local));
        self.link_parent(id, parent);
        id
    }

    /// Remove an element (and its subtree). The container cannot be removed.
    pub fn remove(&mut self, id: ElementId) {
        if !self.is_alive(id) || id == self.container {
            return;
        }
        if let Some(parent) = self.element(id).parent {
            self.unlink_parent(id, parent);
        }
        self.free_subtree(id);
        self.revision += 1;
    }

    fn free_subtree(&mut self, id: ElementId) {
        let children = core::mem::take(&mut self.element_mut(id).children);
        for child in children {
            self.free_subtree(child);
        }
        self.elements[id.idx()] = None;
        self.free_list.push(id.idx());
    }

    /// Update local bounds.
    pub fn set_local_bounds(&mut self, id: ElementId, bounds: Rect) {
        if let Some(n) = self.element_opt_mut(id) {
            n.local.local_bounds = bounds;
            n.dirty.layout = true;
            self.revision += 1;
        }
    }

    /// Update local transform. Descendants become layout-pending as well.
    pub fn set_local_transform(&mut self, id: ElementId, tf: Affine) {
        if let Some(n) = self.element_opt_mut(id) {
            n.local.local_transform = tf;
            self.revision += 1;
            self.mark_subtree_dirty(
                id,
                Dirty {
                    layout: false,
                    transform: true,
                },
            );
        }
    }

    /// Replace the text of a text or span element.
    pub fn set_text(&mut self, id: ElementId, text: Option<String>) {
        if let Some(n) = self.element_opt_mut(id) {
            n.local.text = text;
            self.revision += 1;
        }
    }

    /// Update element flags.
    pub fn set_flags(&mut self, id: ElementId, flags: ElementFlags) {
        if let Some(n) = self.element_opt_mut(id) {
            n.local.flags = flags;
            self.revision += 1;
        }
    }

    /// Run the layout pass. Every element has world bounds afterwards.
    pub fn commit(&mut self) {
        let root = self.container;
        self.update_world_recursive(root, Affine::IDENTITY);
        self.epoch += 1;
    }

    // --- read-only queries ---

    /// Returns true if `id` refers to a live element.
    pub fn is_alive(&self, id: ElementId) -> bool {
        self.elements
            .get(id.idx())
            .and_then(|n| n.as_ref())
            .map(|n| n.generation == id.generation())
            .unwrap_or(false)
    }

    /// Kind of a live element.
    pub fn kind(&self, id: ElementId) -> Option<ElementKind> {
        self.element_opt(id).map(|n| n.local.kind)
    }

    /// Own text of a live element (not including descendants).
    pub fn text(&self, id: ElementId) -> Option<&str> {
        self.element_opt(id).and_then(|n| n.local.text.as_deref())
    }

    /// Parent of a live element.
    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.element_opt(id).and_then(|n| n.parent)
    }

    /// Children of a live element in document order.
    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.element_opt(id)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    /// Whether a live element is transparent to pointer input.
    ///
    /// Hosts that hit-test the mirrored surface skip inert elements; every overlay is inert.
    pub fn is_inert(&self, id: ElementId) -> bool {
        self.element_opt(id)
            .is_some_and(|n| n.local.flags.contains(ElementFlags::INERT))
    }

    /// Whether the element and all its ancestors are visible.
    pub fn is_rendered(&self, id: ElementId) -> bool {
        let mut cur = Some(id);
        while let Some(c) = cur {
            let Some(n) = self.element_opt(c) else {
                return false;
            };
            if !n.local.flags.contains(ElementFlags::VISIBLE) {
                return false;
            }
            cur = n.parent;
        }
        true
    }

    /// All descendants of `id` in document (pre-)order, excluding `id` itself.
    pub fn descendants(&self, id: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut stack: Vec<ElementId> = self.children(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    /// Nearest strict ancestor of `id` with the given kind.
    pub fn enclosing(&self, id: ElementId, kind: ElementKind) -> Option<ElementId> {
        let mut cur = self.parent(id);
        while let Some(c) = cur {
            if self.kind(c) == Some(kind) {
                return Some(c);
            }
            cur = self.parent(c);
        }
        None
    }

    /// Text content of `id`: its own text followed by its descendants' text, without separators.
    pub fn text_content(&self, id: ElementId) -> String {
        let mut out = String::new();
        if let Some(t) = self.text(id) {
            out.push_str(t);
        }
        for d in self.descendants(id) {
            if self.kind(d).is_some_and(ElementKind::is_textual)
                && let Some(t) = self.text(d)
            {
                out.push_str(t);
            }
        }
        out
    }

    /// World-space bounding box from the last layout pass.
    ///
    /// Returns `None` for stale ids and for elements whose layout is pending
    /// (mutated since the last [`Scene::commit`]).
    pub fn world_bounds(&self, id: ElementId) -> Option<Rect> {
        let n = self.element_opt(id)?;
        if n.dirty.any() {
            return None;
        }
        Some(n.world.world_bounds)
    }

    /// Bounding box of `id` relative to the container's bounding box.
    pub fn relative_bounds(&self, id: ElementId) -> Option<Rect> {
        let container = self.world_bounds(self.container)?;
        let bounds = self.world_bounds(id)?;
        Some(bounds - container.origin().to_vec2())
    }

    // --- overlay layer ---

    /// Append an overlay element above every chart element.
    ///
    /// Overlays are inert (pointer-transparent) and positioned by the style's
    /// container-relative geometry.
    pub fn attach_overlay(&mut self, style: OverlayStyle) -> ElementId {
        let local = LocalElement {
            kind: ElementKind::Overlay,
            local_bounds: self.overlay_bounds(&style),
            flags: ElementFlags::VISIBLE | ElementFlags::INERT,
            ..Default::default()
        };
        let mut element = Element::new(0, local);
        element.overlay = Some(style);
        let id = self.alloc(element);
        let container = self.container;
        self.link_parent(id, container);
        id
    }

    /// Replace the style of an attached overlay. Returns `false` if `id` is not a live overlay.
    pub fn restyle_overlay(&mut self, id: ElementId, style: OverlayStyle) -> bool {
        let bounds = self.overlay_bounds(&style);
        let Some(n) = self.element_opt_mut(id) else {
            return false;
        };
        let Some(current) = n.overlay.as_mut() else {
            return false;
        };
        if *current == style {
            return true;
        }
        *current = style;
        if n.local.local_bounds != bounds {
            n.local.local_bounds = bounds;
            n.dirty.layout = true;
        }
        self.revision += 1;
        true
    }

    /// Detach an overlay. Returns `false` if `id` is stale or not an overlay.
    ///
    /// Chart-owned elements are never removed through this method.
    pub fn detach_overlay(&mut self, id: ElementId) -> bool {
        if self.overlay_style(id).is_none() {
            return false;
        }
        self.remove(id);
        true
    }

    /// Style of a live overlay.
    pub fn overlay_style(&self, id: ElementId) -> Option<&OverlayStyle> {
        self.element_opt(id).and_then(|n| n.overlay.as_ref())
    }

    /// Attached overlays in stacking order.
    pub fn overlays(&self) -> impl Iterator<Item = (ElementId, &OverlayStyle)> + '_ {
        self.children(self.container)
            .iter()
            .filter_map(move |id| self.overlay_style(*id).map(|s| (*id, s)))
    }

    /// Number of attached overlays.
    pub fn overlay_count(&self) -> usize {
        self.overlays().count()
    }

    // --- internals ---

    fn overlay_bounds(&self, style: &OverlayStyle) -> Rect {
        let origin = self.element(self.container).local.local_bounds.origin();
        style
            .geometry
            .map(|g| g + Vec2::new(origin.x, origin.y))
            .unwrap_or(Rect::ZERO)
    }

    fn element(&self, id: ElementId) -> &Element {
        self.elements[id.idx()].as_ref().expect("dangling ElementId")
    }

    fn element_mut(&mut self, id: ElementId) -> &mut Element {
        self.elements[id.idx()].as_mut().expect("dangling ElementId")
    }

    fn element_opt(&self, id: ElementId) -> Option<&Element> {
        let n = self.elements.get(id.idx())?.as_ref()?;
        (n.generation == id.generation()).then_some(n)
    }

    fn element_opt_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        let n = self.elements.get_mut(id.idx())?.as_mut()?;
        if n.generation != id.generation() {
            return None;
        }
        Some(n)
    }

    fn link_parent(&mut self, id: ElementId, parent: ElementId) {
        self.element_mut(parent).children.push(id);
        self.element_mut(id).parent = Some(parent);
    }

    fn unlink_parent(&mut self, id: ElementId, parent: ElementId) {
        let p = self.element_mut(parent);
        p.children.retain(|c| *c != id);
        self.element_mut(id).parent = None;
    }

    fn update_world_recursive(&mut self, id: ElementId, parent_tf: Affine) {
        let (world_tf, child_ids) = {
            let n = self.element_mut(id);
            n.world.world_transform = parent_tf * n.local.local_transform;
            n.world.world_bounds = transform_rect_bbox(n.world.world_transform, n.local.local_bounds);
            n.dirty = Dirty::default();
            (n.world.world_transform, n.children.clone())
        };

        for child in child_ids {
            self.update_world_recursive(child, world_tf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::OverlayFlags;
    use alloc::string::ToString;
    use alloc::vec;

    fn chart_node(scene: &mut Scene, at: Vec2, label: &str) -> (ElementId, ElementId, ElementId) {
        let g = scene.insert(None, LocalElement::group(Affine::translate(at)));
        let shape = scene.insert(Some(g), LocalElement::shape(Rect::new(0.0, 0.0, 80.0, 30.0)));
        let text = scene.insert(
            Some(g),
            LocalElement::text(Rect::new(5.0, 5.0, 75.0, 25.0), label),
        );
        (g, shape, text)
    }

    #[test]
    fn commit_computes_world_and_relative_bounds() {
        let mut scene = Scene::new(Rect::new(100.0, 50.0, 700.0, 450.0));
        let (_, shape, _) = chart_node(&mut scene, Vec2::new(120.0, 60.0), "Data");
        assert_eq!(scene.world_bounds(shape), None, "layout pending before commit");
        scene.commit();
        assert_eq!(
            scene.world_bounds(shape),
            Some(Rect::new(120.0, 60.0, 200.0, 90.0))
        );
        assert_eq!(
            scene.relative_bounds(shape),
            Some(Rect::new(20.0, 10.0, 100.0, 40.0))
        );
    }

    #[test]
    fn transform_marks_descendants_pending() {
        let mut scene = Scene::new(Rect::new(0.0, 0.0, 500.0, 500.0));
        let (g, shape, _) = chart_node(&mut scene, Vec2::ZERO, "A");
        scene.commit();
        scene.set_local_transform(g, Affine::translate(Vec2::new(50.0, 0.0)));
        assert_eq!(scene.world_bounds(shape), None);
        scene.commit();
        assert_eq!(scene.world_bounds(shape).map(|r| r.x0), Some(50.0));
        scene.commit();
        assert_eq!(scene.world_bounds(shape).map(|r| r.x0), Some(50.0));
        assert_eq!(scene.epoch(), 3);
    }

    #[test]
    fn liveness_insert_remove_reuse() {
        let mut scene = Scene::new(Rect::new(0.0, 0.0, 10.0, 10.0));
        let a = scene.insert(None, LocalElement::shape(Rect::new(0.0, 0.0, 1.0, 1.0)));
        assert!(scene.is_alive(a));
        scene.remove(a);
        assert!(!scene.is_alive(a));
        let b = scene.insert(None, LocalElement::shape(Rect::new(0.0, 0.0, 1.0, 1.0)));
        assert!(scene.is_alive(b));
        assert!(!scene.is_alive(a));
        if a.0 == b.0 {
            assert!(b.1 > a.1, "generation must increase on reuse");
        }
    }

    #[test]
    fn container_cannot_be_removed() {
        let mut scene = Scene::new(Rect::new(0.0, 0.0, 10.0, 10.0));
        let root = scene.container();
        scene.remove(root);
        assert!(scene.is_alive(root));
    }

    #[test]
    fn text_content_concatenates_spans() {
        let mut scene = Scene::new(Rect::new(0.0, 0.0, 10.0, 10.0));
        let text = scene.insert(None, LocalElement::text(Rect::ZERO, ""));
        let _ = scene.insert(Some(text), LocalElement::span("Data Gover"));
        let _ = scene.insert(Some(text), LocalElement::span("nance"));
        assert_eq!(scene.text_content(text), "Data Governance".to_string());
    }

    #[test]
    fn descendants_are_preorder() {
        let mut scene = Scene::new(Rect::new(0.0, 0.0, 10.0, 10.0));
        let (g1, s1, t1) = chart_node(&mut scene, Vec2::ZERO, "A");
        let (g2, s2, t2) = chart_node(&mut scene, Vec2::ZERO, "B");
        assert_eq!(
            scene.descendants(scene.container()),
            vec![g1, s1, t1, g2, s2, t2]
        );
        assert_eq!(scene.enclosing(t2, ElementKind::Group), Some(g2));
        assert_eq!(scene.enclosing(g2, ElementKind::Group), None);
    }

    #[test]
    fn hidden_ancestor_hides_descendants() {
        let mut scene = Scene::new(Rect::new(0.0, 0.0, 10.0, 10.0));
        let (g, _, t) = chart_node(&mut scene, Vec2::ZERO, "A");
        assert!(scene.is_rendered(t));
        scene.set_flags(g, ElementFlags::empty());
        assert!(!scene.is_rendered(t));
    }

    #[test]
    fn overlay_lifecycle_counts_mutations() {
        let mut scene = Scene::new(Rect::new(10.0, 10.0, 110.0, 110.0));
        let (_, shape, _) = chart_node(&mut scene, Vec2::ZERO, "A");
        let before = scene.revision();

        let style = OverlayStyle {
            node: Some("A".into()),
            tier: Some("Foundational".into()),
            flags: OverlayFlags::HOVERED,
            geometry: Some(Rect::new(-2.0, -2.0, 82.0, 32.0)),
        };
        let overlay = scene.attach_overlay(style.clone());
        assert_eq!(scene.revision(), before + 1);
        assert_eq!(scene.kind(overlay), Some(ElementKind::Overlay));
        assert_eq!(scene.overlay_count(), 1);

        // Identical style is not a mutation.
        assert!(scene.restyle_overlay(overlay, style.clone()));
        assert_eq!(scene.revision(), before + 1);

        let selected = OverlayStyle {
            flags: OverlayFlags::HOVERED | OverlayFlags::SELECTED,
            ..style
        };
        assert!(scene.restyle_overlay(overlay, selected));
        assert_eq!(scene.revision(), before + 2);

        assert!(!scene.detach_overlay(shape), "chart elements are not overlays");
        assert!(scene.is_alive(shape));
        assert!(scene.detach_overlay(overlay));
        assert!(!scene.detach_overlay(overlay), "second detach is a no-op");
        assert_eq!(scene.overlay_count(), 0);
    }

    #[test]
    fn overlay_geometry_is_container_relative() {
        let mut scene = Scene::new(Rect::new(10.0, 20.0, 110.0, 120.0));
        let overlay = scene.attach_overlay(OverlayStyle {
            geometry: Some(Rect::new(0.0, 0.0, 5.0, 5.0)),
            ..Default::default()
        });
        scene.commit();
        assert_eq!(
            scene.relative_bounds(overlay),
            Some(Rect::new(0.0, 0.0, 5.0, 5.0))
        );
    }

    #[test]
    fn overlays_are_inert_chart_elements_are_not() {
        let mut scene = Scene::new(Rect::new(0.0, 0.0, 100.0, 100.0));
        let (g, shape, text) = chart_node(&mut scene, Vec2::ZERO, "A");
        let overlay = scene.attach_overlay(OverlayStyle::default());
        assert!(scene.is_inert(overlay));
        assert!(!scene.is_inert(g) && !scene.is_inert(shape) && !scene.is_inert(text));

        let pulsing = OverlayStyle {
            flags: OverlayFlags::PULSE,
            ..Default::default()
        };
        assert!(scene.restyle_overlay(overlay, pulsing));
        assert!(scene.is_inert(overlay));

        assert!(scene.detach_overlay(overlay));
        assert!(!scene.is_inert(overlay), "stale ids are not inert");
    }
}
