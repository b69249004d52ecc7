use backoffice_server::cache::{
    CacheKey, CompositeKeyStrategy, KeyStrategy, RequestKeyParts, ResponseCache,
};
use backoffice_store::{KeyValueStore, MemoryStore};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::runtime::Runtime;

/// Lista de partner configs de prueba con N elementos
fn create_test_list(num_results: usize) -> Value {
    let results: Vec<Value> = (0..num_results)
        .map(|i| {
            json!({
                "id": i,
                "name": format!("partner-{i}"),
                "description": format!("partner number {i} used for benchmarking"),
            })
        })
        .collect();
    json!({ "results": results })
}

fn memory_cache() -> ResponseCache {
    ResponseCache::new(Arc::new(MemoryStore::new(100_000, Duration::from_secs(300))))
}

/// Benchmark: derivacion de keys
fn bench_key_derivation(c: &mut Criterion) {
    let full = RequestKeyParts::new("/partner-config/42")
        .with_partner_id("p1")
        .with_origin("https://partner.example.com")
        .with_authorization("0123456789abcdef0123456789abcdef");
    let auth_only = RequestKeyParts::new("/partner-config")
        .with_authorization("0123456789abcdef0123456789abcdef");

    c.bench_function("key_derive_composite", |b| {
        b.iter(|| std::hint::black_box(CompositeKeyStrategy.derive(&full)));
    });
    c.bench_function("key_derive_authorization_only", |b| {
        b.iter(|| std::hint::black_box(CompositeKeyStrategy.derive(&auth_only)));
    });
}

/// Benchmark: get con hit (incluye parseo JSON)
fn bench_cache_get_hit(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let cache = memory_cache();
    let key = CacheKey::new("p1_https://a.com_tok123_/partner-config");

    rt.block_on(async {
        cache.set_response(&key, &create_test_list(100)).await;
    });

    c.bench_function("cache_get_hit", |b| {
        b.to_async(&rt).iter(|| async {
            let result = cache.get_response(&key).await;
            std::hint::black_box(result)
        });
    });
}

/// Benchmark: get con miss
fn bench_cache_get_miss(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let cache = memory_cache();
    let key = CacheKey::new("nonexistent");

    c.bench_function("cache_get_miss", |b| {
        b.to_async(&rt).iter(|| async {
            let result = cache.get_response(&key).await;
            std::hint::black_box(result)
        });
    });
}

/// Benchmark: set con diferentes tamanos de response
fn bench_cache_set_varying_sizes(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("cache_set_sizes");

    for size in [10, 100, 500, 1000].iter() {
        let cache = memory_cache();
        let value = Arc::new(create_test_list(*size));

        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _size| {
            let counter = Arc::new(AtomicU64::new(0));
            b.to_async(&rt).iter(|| {
                let cache = cache.clone();
                let value = Arc::clone(&value);
                let counter = Arc::clone(&counter);
                async move {
                    let count = counter.fetch_add(1, Ordering::Relaxed);
                    let key = CacheKey::new(format!("p{count}_tok_/partner-config"));
                    cache.set_response(&key, &value).await;
                }
            });
        });
    }

    group.finish();
}

/// Benchmark: invalidacion por patron sobre 1000 keys
fn bench_pattern_invalidation(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let store = Arc::new(MemoryStore::new(100_000, Duration::from_secs(300)));

    c.bench_function("memory_delete_matching_1000", |b| {
        b.to_async(&rt).iter(|| {
            let store = Arc::clone(&store);
            async move {
                for i in 0..1000 {
                    store
                        .set(&format!("p{}_tok_/partner-config/{i}", i % 10), b"{}", None)
                        .await
                        .unwrap();
                }
                let deleted = store.delete_matching("*/partner-config*").await.unwrap();
                std::hint::black_box(deleted)
            }
        });
    });
}

criterion_group!(
    benches,
    bench_key_derivation,
    bench_cache_get_hit,
    bench_cache_get_miss,
    bench_cache_set_varying_sizes,
    bench_pattern_invalidation,
);

criterion_main!(benches);
