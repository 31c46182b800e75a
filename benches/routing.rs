//! Benchmarks for routing normalization and config parsing.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use oracle::config::{OracleConfig, EXAMPLE_CONFIG};
use oracle::routing::WireDecision;
use serde_json::json;

fn bench_normalize_current_shape(c: &mut Criterion) {
    let raw = json!({
        "agents": ["financial-regulator", "trade-office", "sanitary-office", "trade-office"],
        "primary_agent": "trade-office",
        "confidence": 0.87,
        "reason": "Import financing and sanitary requirements"
    });

    c.bench_function("normalize_current_shape", |b| {
        b.iter(|| {
            let wire: WireDecision = serde_json::from_value(black_box(raw.clone())).unwrap();
            black_box(wire.normalize())
        });
    });
}

fn bench_normalize_legacy_shape(c: &mut Criterion) {
    let raw = json!({"agent": "senasa", "confidence": 0.92, "reason": "Food safety"});

    c.bench_function("normalize_legacy_shape", |b| {
        b.iter(|| {
            let wire: WireDecision = serde_json::from_value(black_box(raw.clone())).unwrap();
            black_box(wire.normalize())
        });
    });
}

fn bench_config_parse_example(c: &mut Criterion) {
    c.bench_function("config_parse_example", |b| {
        b.iter(|| {
            let config: OracleConfig = toml::from_str(black_box(EXAMPLE_CONFIG)).unwrap();
            black_box(config)
        });
    });
}

criterion_group!(
    benches,
    bench_normalize_current_shape,
    bench_normalize_legacy_shape,
    bench_config_parse_example
);
criterion_main!(benches);
