//! Benchmarks for the noted-op wire format

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use opledger_core::{OpTable, SyncNotedOp};
use opledger_wire::NotedOpCodec;

fn bench_encode(c: &mut Criterion) {
    let registry = OpTable::standard();
    let codec = NotedOpCodec::default();
    let op = SyncNotedOp::new(27, Some("voice-notes".into()), &registry).unwrap();

    c.bench_function("noted_op_encode", |b| b.iter(|| codec.encode(black_box(&op))));
}

fn bench_decode(c: &mut Criterion) {
    let registry = OpTable::standard();
    let codec = NotedOpCodec::default();
    let op = SyncNotedOp::new(27, Some("voice-notes".into()), &registry).unwrap();
    let bytes = codec.encode(&op);

    c.bench_function("noted_op_decode", |b| {
        b.iter(|| codec.decode(black_box(&bytes), &registry))
    });
}

fn bench_batch_roundtrip(c: &mut Criterion) {
    let registry = OpTable::standard();
    let codec = NotedOpCodec::default();
    let ops: Vec<SyncNotedOp> = (0..16)
        .map(|i| {
            let tag = (i % 2 == 0).then(|| format!("feature-{}", i));
            SyncNotedOp::new(i, tag, &registry).unwrap()
        })
        .collect();
    let bytes = codec.encode_batch(&ops).unwrap();

    c.bench_function("noted_op_batch_roundtrip", |b| {
        b.iter(|| {
            let decoded = codec.decode_batch(black_box(&bytes), &registry).unwrap();
            black_box(decoded)
        })
    });
}

criterion_group!(benches, bench_encode, bench_decode, bench_batch_roundtrip);
criterion_main!(benches);
