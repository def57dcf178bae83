// Copyright 2025 the Halo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use halo_interaction::NodeInfo;
use halo_interaction::resolver::{
    ExactStructure, Matcher, NearestAncestor, NodeIdSubstring, Resolver, WrappedLabel,
};
use halo_scene::{LocalElement, Scene};
use kurbo::{Affine, Rect, Vec2};

/// `n × n` chart nodes. Labels are single text elements, or one span per word when `wrapped`.
fn gen_chart(n: usize, wrapped: bool) -> Scene {
    let mut scene = Scene::new(Rect::new(0.0, 0.0, n as f64 * 200.0, n as f64 * 80.0));
    for y in 0..n {
        for x in 0..n {
            let tf = Affine::translate(Vec2::new(x as f64 * 200.0, y as f64 * 80.0));
            let group = scene.insert(None, LocalElement::group(tf));
            let _ = scene.insert(Some(group), LocalElement::shape(Rect::new(0.0, 0.0, 160.0, 60.0)));
            let bounds = Rect::new(4.0, 4.0, 156.0, 56.0);
            if wrapped {
                let text = scene.insert(Some(group), LocalElement::text(bounds, ""));
                let _ = scene.insert(Some(text), LocalElement::span(format!("Node {x:02}")));
                let _ = scene.insert(Some(text), LocalElement::span(format!("Row {y:02}")));
            } else {
                let _ = scene.insert(
                    Some(group),
                    LocalElement::text(bounds, format!("Node {x:02} Row {y:02} [id{x}_{y}]")),
                );
            }
        }
    }
    scene.commit();
    scene
}

fn last(n: usize) -> (String, NodeInfo) {
    let i = n - 1;
    (
        format!("id{i}_{i}"),
        NodeInfo::new(format!("Node {i:02} Row {i:02}"), "Foundational"),
    )
}

fn bench_strategies(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolver_strategies");
    for &n in &[8_usize, 16, 32] {
        let flat = gen_chart(n, false);
        let wrapped = gen_chart(n, true);
        let (id, info) = last(n);
        // The target is the last node in document order.
        let cases: [(&str, &Scene, Box<dyn Matcher>); 4] = [
            ("exact_structure", &flat, Box::new(ExactStructure)),
            ("nearest_ancestor", &flat, Box::new(NearestAncestor)),
            ("wrapped_label", &wrapped, Box::new(WrappedLabel)),
            ("node_id_substring", &flat, Box::new(NodeIdSubstring)),
        ];
        group.throughput(Throughput::Elements((n * n) as u64));
        for (name, scene, matcher) in cases {
            group.bench_function(format!("{name}_n{n}"), |b| {
                b.iter(|| black_box(matcher.try_match(scene, &id, &info)));
            });
        }
    }
    group.finish();
}

fn bench_full_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolver_chain");
    for &n in &[8_usize, 16, 32] {
        let flat = gen_chart(n, false);
        let wrapped = gen_chart(n, true);
        let (id, info) = last(n);
        let resolver = Resolver::new(2.0);
        let miss = NodeInfo::new("Not on the chart", "Foundational");
        group.throughput(Throughput::Elements((n * n) as u64));
        group.bench_function(format!("first_strategy_hit_n{n}"), |b| {
            b.iter(|| black_box(resolver.resolve(&flat, &id, &info)));
        });
        group.bench_function(format!("third_strategy_hit_n{n}"), |b| {
            b.iter(|| black_box(resolver.resolve(&wrapped, &id, &info)));
        });
        group.bench_function(format!("exhausted_n{n}"), |b| {
            b.iter(|| black_box(resolver.resolve(&flat, "absent", &miss)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_strategies, bench_full_chain);
criterion_main!(benches);
