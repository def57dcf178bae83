// Copyright 2025 the Halo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Page teardown.

use halo_scene::Scene;

use super::{InteractionController, Lifecycle};
use crate::timer::TimerKind;

impl InteractionController {
    /// Stop scheduling, drop the hovered node at once and arm the grace timer.
    pub(super) fn begin_teardown(&mut self, scene: &mut Scene) {
        self.lifecycle = Lifecycle::TearingDown;
        self.frame_requested = false;
        self.in_flight = None;
        self.pending_hover = None;
        self.pending_selections.clear();
        if let Some(node) = self.hovered.take() {
            self.release_node(scene, &node);
        }
        let at = self.now + self.config.teardown_grace;
        self.teardown_timer = Some(self.timers.schedule(at, TimerKind::Teardown));
        tracing::debug!(active = self.store.len(), "teardown started");
    }

    /// Detach every remaining overlay and return it to the pool.
    pub(super) fn finish_teardown(&mut self, scene: &mut Scene) {
        let mut detached = 0_usize;
        for record in self.store.drain() {
            let (overlay, _) = record.into_parts();
            self.pool.release(scene, overlay);
            detached += 1;
        }
        self.timers.clear();
        self.selected.clear();
        self.teardown_timer = None;
        self.lifecycle = Lifecycle::Closed;
        tracing::debug!(detached, pooled = self.pool.len(), "teardown complete");
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use halo_scene::Scene;

    use crate::catalog::{NodeCatalog, NodeInfo};
    use crate::config::OverlayConfig;
    use crate::controller::{InteractionController, Lifecycle};
    use crate::resolver::testing::{node, scene};

    fn setup() -> (Scene, InteractionController) {
        let mut s = scene();
        let _ = node(&mut s, 0.0, 0.0, "Alpha");
        let _ = node(&mut s, 200.0, 0.0, "Beta");
        s.commit();
        let catalog: NodeCatalog = [
            ("A", NodeInfo::new("Alpha", "Foundational")),
            ("B", NodeInfo::new("Beta", "Compilatory")),
        ]
        .into_iter()
        .collect();
        (s, InteractionController::init(OverlayConfig::default(), &true, catalog))
    }

    const fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn hovered_goes_at_once_rest_after_grace() {
        let (mut s, mut c) = setup();
        c.create_selection_interaction(&mut s, "B", false);
        c.on_frame(&mut s);
        c.create_hover_interaction(&mut s, "A");
        c.on_frame(&mut s);
        assert_eq!(s.overlay_count(), 2);

        c.cleanup(&mut s);
        assert_eq!(c.lifecycle(), Lifecycle::TearingDown);
        assert_eq!(s.overlay_count(), 1, "hovered overlay removed without fade");
        assert!(c.record("B").is_some());

        c.advance_to(&mut s, ms(149));
        assert_eq!(s.overlay_count(), 1);
        c.advance_to(&mut s, ms(150));
        assert_eq!(s.overlay_count(), 0);
        assert_eq!(c.lifecycle(), Lifecycle::Closed);
        assert_eq!(c.selected().count(), 0);
        assert_eq!(c.pool().len(), 2);
        assert_eq!(c.next_deadline(), None);
    }

    #[test]
    fn pending_work_is_cancelled() {
        let (mut s, mut c) = setup();
        c.create_hover_interaction(&mut s, "A");
        c.create_hover_interaction(&mut s, "B");
        assert!(c.wants_frame());
        c.cleanup(&mut s);
        assert!(!c.wants_frame());
        assert!(!c.is_processing());
        assert_eq!(c.pending_hover(), None);
        c.on_frame(&mut s);
        assert_eq!(s.overlay_count(), 0);
    }

    #[test]
    fn operations_after_cleanup_are_ignored() {
        let (mut s, mut c) = setup();
        c.cleanup(&mut s);
        c.cleanup(&mut s);
        c.create_hover_interaction(&mut s, "A");
        assert!(!c.wants_frame());
        c.advance_to(&mut s, ms(1_000));
        assert_eq!(c.lifecycle(), Lifecycle::Closed);
        c.create_selection_interaction(&mut s, "B", true);
        assert!(!c.wants_frame());
        assert_eq!(s.overlay_count(), 0);
    }

    #[test]
    fn tolerates_overlays_removed_by_the_host() {
        let (mut s, mut c) = setup();
        c.create_selection_interaction(&mut s, "A", false);
        c.on_frame(&mut s);
        let id = c.record("A").and_then(|r| r.overlay().attachment()).unwrap();
        s.remove(id);
        c.cleanup(&mut s);
        c.advance_to(&mut s, ms(150));
        assert_eq!(c.lifecycle(), Lifecycle::Closed);
        assert_eq!(c.pool().len(), 1);
    }
}
