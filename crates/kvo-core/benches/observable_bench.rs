//! Benchmarks for `Observable` notification fan-out.
//!
//! Run with: cargo bench -p kvo-core --bench observable_bench

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use kvo_core::Observable;
use std::cell::Cell;
use std::hint::black_box;
use std::rc::Rc;

fn bench_set_fanout(c: &mut Criterion) {
    let mut group = c.benchmark_group("observable/set");

    for subscribers in [0usize, 1, 8, 64] {
        let obs = Observable::new(0u64);
        let sum = Rc::new(Cell::new(0u64));
        let _subs: Vec<_> = (0..subscribers)
            .map(|_| {
                let sum = Rc::clone(&sum);
                obs.subscribe_scoped(move |_, new: &u64| sum.set(sum.get().wrapping_add(*new)))
            })
            .collect();

        group.throughput(Throughput::Elements(subscribers.max(1) as u64));
        group.bench_with_input(
            BenchmarkId::new("subscribers", subscribers),
            &subscribers,
            |b, _| {
                let mut next = 0u64;
                b.iter(|| {
                    next += 1;
                    obs.set(black_box(next));
                })
            },
        );
    }

    group.finish();
}

fn bench_subscribe_unsubscribe(c: &mut Criterion) {
    let obs = Observable::new(String::new());
    c.bench_function("observable/subscribe_unsubscribe", |b| {
        b.iter(|| {
            let sub = obs.subscribe(|_, _| {});
            obs.unsubscribe(black_box(sub));
        })
    });
}

criterion_group!(benches, bench_set_fanout, bench_subscribe_unsubscribe);
criterion_main!(benches);
