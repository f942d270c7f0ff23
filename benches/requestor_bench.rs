//! Request composition and response interpretation benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use qonversion::services::interpret_response;
use qonversion::utils::headers::request_headers;
use qonversion::utils::url::{build_api_url, encode_params};
use qonversion::{Headers, Params};

fn create_params(count: usize) -> Params {
    (0..count)
        .map(|i| (format!("key_{}", i), format!("value {} & more", i)))
        .collect()
}

fn bench_url_building(c: &mut Criterion) {
    let mut group = c.benchmark_group("url_building");

    for count in [1, 10, 100] {
        let params = create_params(count);
        group.bench_with_input(BenchmarkId::new("encode_and_append", count), &params, |b, params| {
            b.iter(|| {
                let query = encode_params(black_box(params));
                build_api_url(black_box("https://api.qonversion.io/v3/users?a=1#frag"), &query)
            })
        });
    }

    group.finish();
}

fn bench_headers(c: &mut Criterion) {
    c.bench_function("request_headers", |b| {
        b.iter(|| request_headers(black_box("sk_bench_1234567890")))
    });
}

fn bench_interpretation(c: &mut Criterion) {
    let mut group = c.benchmark_group("interpret_response");

    let success = r#"{"id": "u1", "environment": "sandbox", "entitlements": [{"id": "premium", "active": true}]}"#;
    let failure = r#"{"error": {"code": "x", "type": "invalid", "message": "bad param", "param": "id"}}"#;

    group.bench_function("success", |b| {
        b.iter(|| interpret_response(black_box(success.to_string()), 200, Headers::new()))
    });
    group.bench_function("invalid_request", |b| {
        b.iter(|| interpret_response(black_box(failure.to_string()), 400, Headers::new()))
    });
    group.bench_function("unparseable", |b| {
        b.iter(|| interpret_response(black_box("<html></html>".to_string()), 502, Headers::new()))
    });

    group.finish();
}

criterion_group!(benches, bench_url_building, bench_headers, bench_interpretation);
criterion_main!(benches);
