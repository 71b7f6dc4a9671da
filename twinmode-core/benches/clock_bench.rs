#[macro_use]
extern crate criterion;

use criterion::Criterion;

use twinmode_core::Clock;

fn bench_null_clock_timers(c: &mut Criterion) {
    let mut group = c.benchmark_group("null_clock_timers");
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap();

    for count in [16, 256, 4096] {
        group.throughput(criterion::Throughput::Elements(count as u64));
        group.bench_function(format!("timers_{}", count), |b| {
            b.iter(|| {
                let clock = Clock::create_null();
                for delay in 0..count {
                    clock.set_timer(delay % 97, || {}).unwrap();
                }
                runtime.block_on(clock.advance_all_timers_async()).unwrap();
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_null_clock_timers);
criterion_main!(benches);
