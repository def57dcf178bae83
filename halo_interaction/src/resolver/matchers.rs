// Copyright 2025 the Halo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The four built-in matching strategies.

use halo_scene::{ElementId, ElementKind, Scene};

use super::{Matcher, boundary_near, boundary_of_group, label_matches, rendered_texts};
use crate::catalog::NodeInfo;

/// A group that directly holds both a matching text and a boundary shape.
#[derive(Clone, Copy, Debug, Default)]
pub struct ExactStructure;

impl Matcher for ExactStructure {
    fn name(&self) -> &'static str {
        "exact-structure"
    }

    fn find_boundary(&self, scene: &Scene, _node_id: &str, info: &NodeInfo) -> Option<ElementId> {
        scene
            .descendants(scene.container())
            .into_iter()
            .filter(|g| scene.kind(*g) == Some(ElementKind::Group) && scene.is_rendered(*g))
            .find_map(|group| {
                let labelled = scene.children(group).iter().any(|c| {
                    scene.kind(*c) == Some(ElementKind::Text)
                        && scene.is_rendered(*c)
                        && label_matches(&scene.text_content(*c), &info.label)
                });
                if labelled {
                    boundary_of_group(scene, group)
                } else {
                    None
                }
            })
    }
}

/// Any matching text, wherever it is nested, then the shape of its nearest enclosing group.
#[derive(Clone, Copy, Debug, Default)]
pub struct NearestAncestor;

impl Matcher for NearestAncestor {
    fn name(&self) -> &'static str {
        "nearest-ancestor"
    }

    fn find_boundary(&self, scene: &Scene, _node_id: &str, info: &NodeInfo) -> Option<ElementId> {
        rendered_texts(scene)
            .filter(|t| label_matches(&scene.text_content(*t), &info.label))
            .find_map(|t| boundary_near(scene, t))
    }
}

/// A multi-line text whose every line span occurs in the label.
///
/// Lines broken mid-word carry a trailing hyphen, which is ignored. When the catalog
/// knows the wrapped form of the label, spans equal to its lines also match.
#[derive(Clone, Copy, Debug, Default)]
pub struct WrappedLabel;

impl WrappedLabel {
    fn spans_match(scene: &Scene, text: ElementId, info: &NodeInfo) -> bool {
        let lines: Vec<&str> = scene
            .children(text)
            .iter()
            .filter(|c| scene.kind(**c) == Some(ElementKind::Span) && scene.is_rendered(**c))
            .filter_map(|c| scene.text(*c))
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();
        if lines.len() < 2 {
            return false;
        }
        let known: Vec<&str> = info.label_lines().collect();
        lines.iter().all(|line| {
            let line: &str = line;
            let stem = line.strip_suffix('-').unwrap_or(line).trim_end();
            (!stem.is_empty() && info.label.contains(stem)) || known.contains(&line)
        })
    }
}

impl Matcher for WrappedLabel {
    fn name(&self) -> &'static str {
        "wrapped-label"
    }

    fn find_boundary(&self, scene: &Scene, _node_id: &str, info: &NodeInfo) -> Option<ElementId> {
        rendered_texts(scene)
            .filter(|t| Self::spans_match(scene, *t, info))
            .find_map(|t| boundary_near(scene, t))
    }
}

/// Last resort: any text that contains the node id itself.
#[derive(Clone, Copy, Debug, Default)]
pub struct NodeIdSubstring;

impl Matcher for NodeIdSubstring {
    fn name(&self) -> &'static str {
        "node-id-substring"
    }

    fn find_boundary(&self, scene: &Scene, node_id: &str, _info: &NodeInfo) -> Option<ElementId> {
        rendered_texts(scene)
            .filter(|t| label_matches(&scene.text_content(*t), node_id))
            .find_map(|t| boundary_near(scene, t))
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{node, scene, wrapped_node};
    use super::*;
    use halo_scene::{ElementFlags, LocalElement};
    use kurbo::{Affine, Rect, Vec2};

    fn info(label: &str) -> NodeInfo {
        NodeInfo::new(label, "Foundational")
    }

    #[test]
    fn exact_structure_picks_labelled_group() {
        let mut s = scene();
        let (_, _, _) = node(&mut s, 0.0, 0.0, "Alpha");
        let (_, beta, _) = node(&mut s, 200.0, 0.0, "Beta");
        s.commit();
        assert_eq!(
            ExactStructure.find_boundary(&s, "B", &info("Beta")),
            Some(beta)
        );
        assert_eq!(
            ExactStructure.try_match(&s, "B", &info("Beta")),
            Some(Rect::new(200.0, 0.0, 320.0, 40.0))
        );
    }

    #[test]
    fn exact_structure_ignores_nested_text() {
        // Text nested one level deeper than the shape's group.
        let mut s = scene();
        let group = s.insert(None, LocalElement::group(Affine::IDENTITY));
        let shape = s.insert(Some(group), LocalElement::shape(Rect::new(0.0, 0.0, 50.0, 20.0)));
        let inner = s.insert(Some(group), LocalElement::group(Affine::IDENTITY));
        let _ = s.insert(Some(inner), LocalElement::text(Rect::ZERO, "Gamma"));
        s.commit();
        assert_eq!(ExactStructure.find_boundary(&s, "G", &info("Gamma")), None);
        // The inner group has no shape of its own; the walk stops at the nearest group.
        assert_eq!(NearestAncestor.find_boundary(&s, "G", &info("Gamma")), None);
        let _ = shape;
    }

    #[test]
    fn nearest_ancestor_walks_up_from_text() {
        let mut s = scene();
        let group = s.insert(
            None,
            LocalElement::group(Affine::translate(Vec2::new(150.0, 120.0))),
        );
        let shape = s.insert(Some(group), LocalElement::shape(Rect::new(0.0, 0.0, 90.0, 30.0)));
        // The label sits inside a non-group wrapper (a text element with a child text).
        let outer = s.insert(Some(group), LocalElement::text(Rect::ZERO, ""));
        let _ = s.insert(Some(outer), LocalElement::text(Rect::ZERO, "Delta Layer"));
        s.commit();
        assert_eq!(
            NearestAncestor.find_boundary(&s, "D", &info("Delta Layer")),
            Some(shape)
        );
    }

    #[test]
    fn wrapped_label_matches_line_spans() {
        let mut s = scene();
        let (_, shape) = wrapped_node(&mut s, 0.0, 0.0, &["Data Quality", "Management"]);
        s.commit();
        let target = info("Data Quality Management");
        // Concatenated text content has no separator, so label containment fails.
        assert_eq!(NearestAncestor.find_boundary(&s, "DQM", &target), None);
        assert_eq!(WrappedLabel.find_boundary(&s, "DQM", &target), Some(shape));
    }

    #[test]
    fn wrapped_label_ignores_break_hyphens() {
        let mut s = scene();
        let (_, shape) = wrapped_node(&mut s, 0.0, 0.0, &["Interoperab-", "ility Layer"]);
        s.commit();
        assert_eq!(
            WrappedLabel.find_boundary(&s, "IL", &info("Interoperability Layer")),
            Some(shape)
        );
    }

    #[test]
    fn wrapped_label_uses_known_line_breaks() {
        let mut s = scene();
        let (_, shape) = wrapped_node(&mut s, 0.0, 0.0, &["Data &", "AI Ops"]);
        s.commit();
        let target = info("Data and AI Ops").with_wrapped_label("Data &<br>AI Ops");
        assert_eq!(WrappedLabel.find_boundary(&s, "DAO", &target), Some(shape));
    }

    #[test]
    fn wrapped_label_requires_every_line() {
        let mut s = scene();
        let _ = wrapped_node(&mut s, 0.0, 0.0, &["Data Quality", "Dashboard"]);
        s.commit();
        assert_eq!(
            WrappedLabel.find_boundary(&s, "DQM", &info("Data Quality Management")),
            None
        );
    }

    #[test]
    fn node_id_substring_is_last_resort() {
        let mut s = scene();
        let (_, shape, _) = node(&mut s, 0.0, 0.0, "[N-42] Metrics");
        s.commit();
        assert_eq!(
            NodeIdSubstring.find_boundary(&s, "N-42", &info("Completely different")),
            Some(shape)
        );
        assert_eq!(
            NodeIdSubstring.find_boundary(&s, "N-43", &info("Metrics")),
            None
        );
    }

    #[test]
    fn hidden_and_pending_elements_never_match() {
        let mut s = scene();
        let (group, _, _) = node(&mut s, 0.0, 0.0, "Alpha");
        s.commit();
        s.set_flags(group, ElementFlags::empty());
        assert_eq!(ExactStructure.find_boundary(&s, "A", &info("Alpha")), None);

        s.set_flags(group, ElementFlags::VISIBLE);
        s.set_local_transform(group, Affine::translate(Vec2::new(5.0, 5.0)));
        assert_eq!(
            ExactStructure.find_boundary(&s, "A", &info("Alpha")),
            None,
            "layout pending until commit"
        );
        s.commit();
        assert!(ExactStructure.find_boundary(&s, "A", &info("Alpha")).is_some());
    }

    #[test]
    fn identical_labels_resolve_to_first_in_document_order() {
        let mut s = scene();
        let (_, first, _) = node(&mut s, 0.0, 0.0, "Twin");
        let _ = node(&mut s, 300.0, 0.0, "Twin");
        s.commit();
        assert_eq!(
            ExactStructure.find_boundary(&s, "T2", &info("Twin")),
            Some(first)
        );
    }
}
