use chain_hashtable::{ChainedHashTable, TableConfig};
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use std::time::Duration;

fn lcg(mut s: u64) -> impl Iterator<Item = u64> {
    std::iter::from_fn(move || {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        Some(s)
    })
}

fn key(n: u64) -> String {
    format!("k{:016x}", n)
}

fn filled(seed: u64, n: usize) -> (ChainedHashTable<String, u64>, Vec<String>) {
    let mut t = ChainedHashTable::new();
    let keys: Vec<String> = lcg(seed).take(n).map(key).collect();
    for (i, k) in keys.iter().enumerate() {
        t.set(k.clone(), i as u64);
    }
    (t, keys)
}

fn bench_set_fresh_100k(c: &mut Criterion) {
    c.bench_function("chained::set_fresh_100k", |b| {
        b.iter_batched(
            ChainedHashTable::<String, u64>::new,
            |mut t| {
                for (i, x) in lcg(1).take(100_000).enumerate() {
                    t.set(key(x), i as u64);
                }
                black_box(t)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_set_presized_100k(c: &mut Criterion) {
    c.bench_function("chained::set_presized_100k", |b| {
        b.iter_batched(
            || {
                let config = TableConfig::new().initial_capacity(1 << 22);
                ChainedHashTable::<String, u64>::with_config(config).unwrap()
            },
            |mut t| {
                for (i, x) in lcg(1).take(100_000).enumerate() {
                    t.set(key(x), i as u64);
                }
                black_box(t)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_overwrite_10k(c: &mut Criterion) {
    c.bench_function("chained::overwrite_10k_on_100k", |b| {
        let (mut t, keys) = filled(3, 100_000);
        let mut n = 0u64;
        b.iter(|| {
            for k in keys.iter().take(10_000) {
                n = n.wrapping_add(1);
                black_box(t.set(k.clone(), n));
            }
        })
    });
}

fn bench_remove_random_10k(c: &mut Criterion) {
    c.bench_function("chained::remove_random_10k_of_110k", |b| {
        b.iter_batched(
            || {
                let (t, keys) = filled(5, 110_000);
                let mut s = 0x9e3779b97f4a7c15u64;
                let to_remove: Vec<String> = (0..10_000)
                    .map(|_| {
                        s = s.wrapping_mul(2862933555777941757).wrapping_add(3037000493);
                        keys[(s as usize) % keys.len()].clone()
                    })
                    .collect();
                (t, to_remove)
            },
            |(mut t, to_remove)| {
                for k in &to_remove {
                    black_box(t.remove(k.as_str()));
                }
                black_box(t)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_get_hit_10k(c: &mut Criterion) {
    c.bench_function("chained::get_hit_10k_on_100k", |b| {
        let (t, keys) = filled(7, 100_000);
        let mut s = 0x9e3779b97f4a7c15u64;
        let queries: Vec<String> = (0..10_000)
            .map(|_| {
                s = s.wrapping_mul(2862933555777941757).wrapping_add(3037000493);
                keys[(s as usize) % keys.len()].clone()
            })
            .collect();
        b.iter(|| {
            for k in &queries {
                let _ = black_box(t.get(k.as_str()));
            }
        })
    });
}

fn bench_contains_miss_10k(c: &mut Criterion) {
    c.bench_function("chained::contains_miss_10k_on_100k", |b| {
        let (t, _keys) = filled(11, 100_000);
        let mut miss = lcg(0xdead_beef);
        b.iter(|| {
            for _ in 0..10_000 {
                let k = key(miss.next().unwrap_or_default());
                black_box(t.contains(k.as_str()));
            }
        })
    });
}

fn bench_iteration(c: &mut Criterion) {
    c.bench_function("chained::iter_all_100k", |b| {
        let (t, _keys) = filled(999, 100_000);
        b.iter(|| {
            let mut sum = 0u64;
            for (_k, v) in t.iter() {
                sum = sum.wrapping_add(*v);
            }
            black_box(sum)
        })
    });

    c.bench_function("chained::bucket_sizes_100k", |b| {
        let (t, _keys) = filled(1001, 100_000);
        b.iter(|| {
            let mut longest = 0usize;
            for i in 0..t.bucket_count() {
                longest = longest.max(t.bucket_size(i).unwrap_or(0));
            }
            black_box(longest)
        })
    });
}

fn bench_config() -> Criterion {
    Criterion::default()
        .sample_size(12)
        .measurement_time(Duration::from_secs(5))
        .warm_up_time(Duration::from_secs(1))
}

criterion_group! {
    name = benches_insert;
    config = bench_config();
    targets = bench_set_fresh_100k, bench_set_presized_100k, bench_overwrite_10k
}
criterion_group! {
    name = benches_ops;
    config = bench_config();
    targets = bench_remove_random_10k,
              bench_get_hit_10k,
              bench_contains_miss_10k,
              bench_iteration
}
criterion_main!(benches_insert, benches_ops);
