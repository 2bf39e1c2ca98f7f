//! Criterion benchmarks for the envelope codec.
//!
//! Measures encoding and decoding latency for the request and response
//! shapes the client actually sends, plus a pathological large-value case.
//!
//! Run with:
//! ```bash
//! cargo bench --package ebooking-core --bench codec_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ebooking_core::{decode_envelope, encode_envelope, Envelope};

// ── Envelope fixtures ─────────────────────────────────────────────────────────

fn make_login() -> Envelope {
    Envelope::login("benchmark-user", "benchmark-password")
}

fn make_register() -> Envelope {
    Envelope::register("benchmark-user", "benchmark-password", "1234567890")
}

fn make_success() -> Envelope {
    Envelope::bare("success")
}

fn make_large_value() -> Envelope {
    Envelope::login("benchmark-user", &"x".repeat(64 * 1024))
}

// ── Benchmarks ────────────────────────────────────────────────────────────────

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");
    for (name, env) in [
        ("login", make_login()),
        ("register", make_register()),
        ("success", make_success()),
        ("large_value", make_large_value()),
    ] {
        group.bench_function(name, |b| {
            b.iter(|| encode_envelope(black_box(&env)).unwrap());
        });
    }
    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");
    for (name, env) in [
        ("login", make_login()),
        ("register", make_register()),
        ("success", make_success()),
        ("large_value", make_large_value()),
    ] {
        let bytes = encode_envelope(&env).unwrap();
        group.bench_function(name, |b| {
            b.iter(|| decode_envelope(black_box(&bytes)).unwrap());
        });
    }
    group.finish();
}

criterion_group!(benches, bench_encode, bench_decode);
criterion_main!(benches);
