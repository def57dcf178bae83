// Copyright 2025 the Halo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Selection, pulse and teardown.
//!
//! Select a node with a pulse, hover across it, deselect, then tear the page down.
//!
//! Run:
//! - `cargo run -p halo_demos --example selection_pulse`

use std::time::Duration;

use halo_interaction::{InteractionController, Lifecycle, NodeCatalog, NodeInfo, OverlayConfig};
use halo_scene::{LocalElement, Scene};
use kurbo::{Affine, Rect, Vec2};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "halo_interaction=debug".into()),
        )
        .init();

    let mut scene = Scene::new(Rect::new(0.0, 0.0, 600.0, 300.0));
    let mut catalog = NodeCatalog::new();
    for (i, (id, label)) in [("SEC", "Security"), ("PRV", "Privacy")].into_iter().enumerate() {
        let group = scene.insert(
            None,
            LocalElement::group(Affine::translate(Vec2::new(40.0 + i as f64 * 260.0, 100.0))),
        );
        let _ = scene.insert(Some(group), LocalElement::shape(Rect::new(0.0, 0.0, 200.0, 70.0)));
        let _ = scene.insert(Some(group), LocalElement::text(Rect::new(10.0, 10.0, 190.0, 60.0), label));
        let _ = catalog.insert(id, NodeInfo::new(label, "Foundational"));
    }
    scene.commit();

    let mut controller = InteractionController::init(OverlayConfig::default(), &true, catalog);
    let mut now = Duration::ZERO;
    let mut tick = |controller: &mut InteractionController, scene: &mut Scene, ms: u64| {
        now += Duration::from_millis(ms);
        controller.advance_to(scene, now);
        while controller.wants_frame() {
            controller.on_frame(scene);
        }
        let states: Vec<_> = ["SEC", "PRV"]
            .iter()
            .map(|n| format!("{n}={:?}", controller.state(n)))
            .collect();
        println!("t={:>4}ms {}", now.as_millis(), states.join(" "));
    };

    controller.create_selection_interaction(&mut scene, "SEC", true);
    tick(&mut controller, &mut scene, 0);
    tick(&mut controller, &mut scene, 150);
    tick(&mut controller, &mut scene, 150);

    controller.create_hover_interaction(&mut scene, "SEC");
    tick(&mut controller, &mut scene, 10);
    controller.create_hover_interaction(&mut scene, "PRV");
    tick(&mut controller, &mut scene, 10);
    controller.end_hover_interaction(&mut scene, "PRV", None);
    tick(&mut controller, &mut scene, 200);

    controller.clear_selection(&mut scene, Some("SEC"));
    controller.clear_selection(&mut scene, Some("SEC"));
    tick(&mut controller, &mut scene, 10);

    controller.create_selection_interaction(&mut scene, "PRV", false);
    tick(&mut controller, &mut scene, 10);
    controller.cleanup(&mut scene);
    tick(&mut controller, &mut scene, 150);
    assert_eq!(controller.lifecycle(), Lifecycle::Closed);
    println!("overlays left: {}", scene.overlay_count());
}
