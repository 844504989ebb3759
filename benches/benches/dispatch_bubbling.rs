// Copyright 2025 the Perch Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::cell::Cell;
use std::rc::Rc;

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use perch_event::{Event, EventDispatcher, EventType, ListenerKey};

/// A parent chain of `depth` dispatchers; returns them leaf first.
fn chain(depth: usize) -> Vec<EventDispatcher> {
    let nodes: Vec<EventDispatcher> = (0..depth).map(|_| EventDispatcher::new()).collect();
    for pair in nodes.windows(2) {
        pair[0].set_parent(Some(&pair[1]));
    }
    nodes
}

fn counter(hits: &Rc<Cell<u64>>) -> impl Fn(&mut Event) + 'static {
    let hits = Rc::clone(hits);
    move |_: &mut Event| hits.set(hits.get() + 1)
}

fn bench_bubbling_depth(c: &mut Criterion) {
    let mut group = c.benchmark_group("bubbling_depth");
    for depth in [4_usize, 16, 64] {
        let nodes = chain(depth);
        let hits = Rc::new(Cell::new(0_u64));
        for node in &nodes {
            node.add_event_listener(EventType::PRESS, counter(&hits)).unwrap();
        }
        group.throughput(Throughput::Elements(depth as u64));
        group.bench_function(format!("press_depth{}", depth), |b| {
            let mut event = Event::new(EventType::PRESS, true).unwrap();
            b.iter(|| {
                nodes[0].dispatch(black_box(&mut event));
            });
        });
        black_box(hits.get());
    }
    group.finish();
}

fn bench_many_listeners(c: &mut Criterion) {
    let mut group = c.benchmark_group("listeners_per_node");
    for count in [1_usize, 8, 128] {
        let node = EventDispatcher::new();
        let hits = Rc::new(Cell::new(0_u64));
        for _ in 0..count {
            node.add_event_listener(EventType::TRIGGERED, counter(&hits)).unwrap();
        }
        group.throughput(Throughput::Elements(count as u64));
        group.bench_function(format!("triggered_n{}", count), |b| {
            let mut event = Event::new(EventType::TRIGGERED, false).unwrap();
            b.iter(|| node.dispatch(black_box(&mut event)));
        });
    }
    group.finish();
}

fn bench_skipped_dispatch(c: &mut Criterion) {
    let node = EventDispatcher::new();
    node.add_event_listener(EventType::PRESS, |_| {}).unwrap();
    c.bench_function("dispatch_event_with_no_listener", |b| {
        b.iter(|| {
            node.dispatch_event_with(black_box(EventType::RENDER), false, None)
                .unwrap();
        });
    });
}

fn bench_register_remove(c: &mut Criterion) {
    c.bench_function("register_then_remove_64", |b| {
        b.iter_batched(
            EventDispatcher::new,
            |node| {
                let keys: Vec<ListenerKey> = (0..64)
                    .map(|_| node.add_event_listener("tick", |_| {}).unwrap())
                    .collect();
                for key in keys {
                    node.remove_listener("tick", key);
                }
                black_box(node.has_listener("tick"))
            },
            BatchSize::SmallInput,
        );
    });
}

fn bench_self_removing_listeners(c: &mut Criterion) {
    c.bench_function("self_removing_listeners_32", |b| {
        b.iter_batched(
            || {
                let node = EventDispatcher::new();
                for _ in 0..32 {
                    let key = ListenerKey::unique();
                    let weak = node.downgrade();
                    node.add_listener("once", key, move |_| {
                        if let Some(node) = weak.upgrade() {
                            node.remove_listener("once", key);
                        }
                    })
                    .unwrap();
                }
                node
            },
            |node| {
                node.dispatch_event_with("once", false, None).unwrap();
                black_box(node.listener_count("once"))
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(
    benches,
    bench_bubbling_depth,
    bench_many_listeners,
    bench_skipped_dispatch,
    bench_register_remove,
    bench_self_removing_listeners,
);
criterion_main!(benches);
