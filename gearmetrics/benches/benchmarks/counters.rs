use std::{
    cmp::{max, min},
    time::Instant,
};

use criterion::Criterion;
use gearmetrics::MetricRegistry;

pub fn counters(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("counters");
    group.throughput(criterion::Throughput::Elements(1));

    let registry = MetricRegistry::new();

    for threads in [1, 2, 4, 8, 16] {
        group.bench_function(format!("concurrency-{threads:02}"), |bencher| {
            bencher.iter_custom(|iterations| {
                let thread_count = max(1, min(threads, iterations));
                let iterations_per_thread = iterations / thread_count;

                let start = Instant::now();
                std::thread::scope(|scope| {
                    for _ in 0..thread_count {
                        scope.spawn(|| {
                            for _ in 0..iterations_per_thread {
                                registry.increment("contention");
                            }
                        });
                    }
                });

                start.elapsed()
            });
        });
    }

    group.bench_function("flush", |bencher| {
        bencher.iter(|| {
            for i in 0..64 {
                registry.increment(format!("counter_{}", i % 16));
            }
            registry.take_window().1
        });
    });
}

criterion::criterion_group!(benches, counters);
