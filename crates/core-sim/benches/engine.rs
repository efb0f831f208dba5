use core_sim::{MarketEngine, MemoryStore, RecoveryPolicy};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn bench_engine(c: &mut Criterion) {
    c.bench_function("update_prices", |b| {
        let mut engine =
            MarketEngine::open_seeded(MemoryStore::new(), RecoveryPolicy::Defaults, 11)
                .expect("memory store should load");
        b.iter(|| {
            engine.update_prices().expect("memory store should save");
            black_box(engine.catalog());
        });
    });

    c.bench_function("buy_sell_round_trip", |b| {
        let mut engine =
            MarketEngine::open_seeded(MemoryStore::new(), RecoveryPolicy::Defaults, 13)
                .expect("memory store should load");
        b.iter(|| {
            let bought = engine.buy(black_box("aapl"), 1).expect("cash should cover one share");
            let sold = engine.sell(black_box("AAPL"), 1).expect("share was just bought");
            black_box((bought, sold));
        });
    });
}

criterion_group!(benches, bench_engine);
criterion_main!(benches);
