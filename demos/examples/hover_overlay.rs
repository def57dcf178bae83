// Copyright 2025 the Halo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hover overlays.
//!
//! Mirror a three-node chart, sweep the pointer across it faster than the display
//! refreshes, and print the overlay layer after each step.
//!
//! Run:
//! - `RUST_LOG=halo_interaction=trace cargo run -p halo_demos --example hover_overlay`

use std::time::Duration;

use halo_interaction::{GlowSettings, InteractionController, NodeCatalog, OverlayConfig};
use halo_scene::{LocalElement, Scene};
use kurbo::{Affine, Rect, Vec2};

const NODES: &str = r#"{
    "DG": {"label": "Data Governance", "tier": "Foundational", "lineCount": 1},
    "DQ": {"label": "Data Quality", "tier": "Tier 1 Dependency", "lineCount": 1},
    "MD": {"label": "Metadata Management", "tier": "Compilatory", "wrappedLabel": "Metadata<br>Management"}
}"#;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "halo_interaction=debug".into()),
        )
        .init();

    // The chart adapter mirrors what the chart drew.
    let mut scene = Scene::new(Rect::new(20.0, 20.0, 820.0, 420.0));
    for (i, lines) in [&["Data Governance"][..], &["Data Quality"], &["Metadata", "Management"]]
        .into_iter()
        .enumerate()
    {
        let at = Vec2::new(60.0 + i as f64 * 240.0, 180.0);
        let group = scene.insert(None, LocalElement::group(Affine::translate(at)));
        let _ = scene.insert(Some(group), LocalElement::shape(Rect::new(0.0, 0.0, 180.0, 60.0)));
        let text_bounds = Rect::new(8.0, 8.0, 172.0, 52.0);
        if let [single] = lines {
            let _ = scene.insert(Some(group), LocalElement::text(text_bounds, *single));
        } else {
            let text = scene.insert(Some(group), LocalElement::text(text_bounds, ""));
            for line in lines {
                let _ = scene.insert(Some(text), LocalElement::span(*line));
            }
        }
    }
    scene.commit();

    let catalog = match NodeCatalog::from_json(NODES) {
        Ok(catalog) => catalog,
        Err(err) => {
            tracing::error!(%err, "cannot load node table");
            return;
        }
    };
    let settings = GlowSettings { enabled: true };
    let mut controller = InteractionController::init(OverlayConfig::default(), &settings, catalog);

    let mut now = Duration::ZERO;
    let mut step = |controller: &mut InteractionController, scene: &mut Scene, ms: u64, label: &str| {
        now += Duration::from_millis(ms);
        controller.advance_to(scene, now);
        if controller.wants_frame() {
            controller.on_frame(scene);
        }
        println!("t={:>4}ms {label}", now.as_millis());
        for (_, style) in scene.overlays() {
            println!(
                "    {:<3} {:<18} {:?} {:?}",
                style.node.as_deref().unwrap_or("-"),
                style.tier.as_deref().unwrap_or("-"),
                style.flags,
                style.geometry
            );
        }
    };

    // Three hovers inside one refresh: only the last one is ever measured.
    controller.create_hover_interaction(&mut scene, "DG");
    controller.create_hover_interaction(&mut scene, "DQ");
    controller.create_hover_interaction(&mut scene, "MD");
    step(&mut controller, &mut scene, 0, "first frame drops the superseded pass");
    step(&mut controller, &mut scene, 16, "second frame measures MD");

    controller.create_hover_interaction(&mut scene, "DQ");
    step(&mut controller, &mut scene, 16, "DQ hovered, MD fading");
    step(&mut controller, &mut scene, 120, "MD returned to the pool");

    controller.end_hover_interaction(&mut scene, "DQ", None);
    step(&mut controller, &mut scene, 50, "debounce elapsed, DQ fading");
    step(&mut controller, &mut scene, 120, "nothing left");

    let stats = controller.pool().stats();
    println!(
        "pool: {} idle, {} allocated, {} reused",
        controller.pool().len(),
        stats.allocated,
        stats.reused
    );
}
