// Copyright 2025 the Perch Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::cell::Cell;
use std::rc::Rc;

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use perch_display::DisplayNode;
use perch_event::EventType;

/// A root with `n` children, each holding `n` leaves that listen for `render`.
fn grid(n: usize, hits: &Rc<Cell<u64>>) -> DisplayNode {
    let root = DisplayNode::new_root();
    for _ in 0..n {
        let branch = DisplayNode::new();
        for _ in 0..n {
            let leaf = DisplayNode::new();
            let hits = Rc::clone(hits);
            leaf.dispatcher()
                .add_event_listener(EventType::RENDER, move |_| hits.set(hits.get() + 1))
                .unwrap();
            branch.add_child(&leaf).unwrap();
        }
        root.add_child(&branch).unwrap();
    }
    root
}

fn bench_broadcast(c: &mut Criterion) {
    let mut group = c.benchmark_group("broadcast_render");
    for n in [8_usize, 32] {
        let hits = Rc::new(Cell::new(0_u64));
        let root = grid(n, &hits);
        group.throughput(Throughput::Elements((n * n) as u64));
        group.bench_function(format!("grid_n{}", n), |b| {
            b.iter(|| root.broadcast_event_with(EventType::RENDER, None).unwrap());
        });
        black_box(hits.get());
    }
    group.finish();
}

fn bench_attach_detach(c: &mut Criterion) {
    let mut group = c.benchmark_group("attach_detach");
    for n in [8_usize, 32] {
        group.throughput(Throughput::Elements((n * n) as u64));
        group.bench_function(format!("subtree_n{}", n), |b| {
            let hits = Rc::new(Cell::new(0_u64));
            let stage = DisplayNode::new_root();
            b.iter_batched(
                || {
                    let detached = grid(n, &hits);
                    let branches = detached.children();
                    detached.remove_all_children();
                    branches
                },
                |branches| {
                    for branch in &branches {
                        stage.add_child(branch).unwrap();
                    }
                    stage.remove_all_children();
                    black_box(stage.num_children())
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_reorder(c: &mut Criterion) {
    let parent = DisplayNode::new();
    let children: Vec<DisplayNode> = (0..256).map(|_| DisplayNode::new()).collect();
    for child in &children {
        parent.add_child(child).unwrap();
    }
    c.bench_function("set_child_index_256", |b| {
        let mut i = 0_usize;
        b.iter(|| {
            let child = &children[i % children.len()];
            parent.set_child_index(child, (i * 7) % children.len()).unwrap();
            i += 1;
        });
    });
}

criterion_group!(benches, bench_broadcast, bench_attach_detach, bench_reorder);
criterion_main!(benches);
