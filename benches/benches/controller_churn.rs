// Copyright 2025 the Halo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::time::Duration;

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use halo_interaction::{InteractionController, NodeCatalog, NodeInfo, OverlayConfig};
use halo_scene::{LocalElement, Scene};
use kurbo::{Affine, Rect, Vec2};

fn gen_page(n: usize) -> (Scene, NodeCatalog) {
    let mut scene = Scene::new(Rect::new(0.0, 0.0, 4000.0, 4000.0));
    let mut catalog = NodeCatalog::new();
    for i in 0..n {
        let tf = Affine::translate(Vec2::new((i % 10) as f64 * 200.0, (i / 10) as f64 * 80.0));
        let group = scene.insert(None, LocalElement::group(tf));
        let _ = scene.insert(Some(group), LocalElement::shape(Rect::new(0.0, 0.0, 160.0, 60.0)));
        let label = format!("Capability {i:03}");
        let _ = scene.insert(
            Some(group),
            LocalElement::text(Rect::new(4.0, 4.0, 156.0, 56.0), label.as_str()),
        );
        let _ = catalog.insert(format!("C{i}"), NodeInfo::new(label, "Foundational"));
    }
    scene.commit();
    (scene, catalog)
}

/// Pointer sweeping across `n` nodes, one refresh and 16ms per node.
fn sweep(scene: &mut Scene, controller: &mut InteractionController, n: usize) {
    let mut now = Duration::ZERO;
    for i in 0..n {
        now += Duration::from_millis(16);
        controller.advance_to(scene, now);
        let node = format!("C{i}");
        controller.create_hover_interaction(scene, &node);
        if controller.wants_frame() {
            controller.on_frame(scene);
        }
        controller.end_hover_interaction(scene, &node, None);
    }
    controller.advance_to(scene, now + Duration::from_secs(1));
}

fn bench_sweep(c: &mut Criterion) {
    let mut group = c.benchmark_group("controller_churn");
    for &n in &[10_usize, 50, 100] {
        let (scene, catalog) = gen_page(n);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("hover_sweep_n{n}"), |b| {
            b.iter_batched(
                || {
                    (
                        scene.clone(),
                        InteractionController::init(OverlayConfig::default(), &true, catalog.clone()),
                    )
                },
                |(mut scene, mut controller)| {
                    sweep(&mut scene, &mut controller, n);
                    black_box(controller.pool().stats())
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_sweep);
criterion_main!(benches);
