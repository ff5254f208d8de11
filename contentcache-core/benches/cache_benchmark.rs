use contentcache_core::{predicate, AssetEntry, ContentCache, KeyNormalizer, OrderedStore, Platform};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::cell::RefCell;
use std::hint::black_box;
use std::rc::Rc;

struct Texture(u32);
struct Sound(u32);

fn populated_cache(size: usize) -> ContentCache<OrderedStore> {
    let cache = ContentCache::new(
        Rc::new(RefCell::new(OrderedStore::with_capacity(size))),
        KeyNormalizer::for_platform(Platform::Unix),
    );
    for i in 0..size {
        if i % 2 == 0 {
            cache.set(format!("Maps/Area{}", i), AssetEntry::new(Texture(i as u32)));
        } else {
            cache.set(format!("Sounds/Clip{}", i), AssetEntry::new(Sound(i as u32)));
        }
    }
    cache
}

fn bench_normalize_key(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize_key");

    let keys = [
        ("canonical", "Maps/Farm"),
        ("mixed_separators", "Maps\\\\Town//Buildings\\Saloon"),
        ("bundle", "Characters\\Dialogue\\Abigail.xnb"),
        ("dot_segments", "Mods/Pack/../Other/./assets/a.png"),
    ];

    for platform in [Platform::Unix, Platform::Windows] {
        let normalizer = KeyNormalizer::for_platform(platform);
        for (name, key) in keys.iter() {
            group.bench_with_input(
                BenchmarkId::new(format!("{:?}", platform), name),
                key,
                |b, key| b.iter(|| black_box(normalizer.normalize_key(black_box(key)))),
            );
        }
    }

    group.finish();
}

fn bench_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("get");

    for size in [10, 100, 1000].iter() {
        let cache = populated_cache(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            b.iter(|| {
                for i in (0..size).step_by(2) {
                    black_box(cache.get(&format!("Maps/Area{}", i)).is_ok());
                }
            });
        });
    }

    group.finish();
}

fn bench_remove_matching(c: &mut Criterion) {
    let mut group = c.benchmark_group("remove_matching");

    for size in [10, 100, 1000].iter() {
        group.bench_with_input(BenchmarkId::new("by_type", size), size, |b, &size| {
            b.iter_with_setup(
                || populated_cache(size),
                |cache| black_box(cache.remove_matching(predicate::of_type::<Texture>(), false)),
            );
        });

        group.bench_with_input(BenchmarkId::new("by_prefix", size), size, |b, &size| {
            b.iter_with_setup(
                || populated_cache(size),
                |cache| black_box(cache.remove_matching(predicate::key_prefix("Sounds/"), false)),
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_normalize_key, bench_get, bench_remove_matching);
criterion_main!(benches);
