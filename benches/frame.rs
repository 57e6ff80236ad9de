//! Frame parsing benchmarks

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use glovebridge::core::frame::{parse_channel_payload, Channel};

fn parser_benchmark(c: &mut Criterion) {
    let payload = "412.0,388.5,401.2,395.8,407.1";

    let mut group = c.benchmark_group("frame");
    group.throughput(Throughput::Bytes(payload.len() as u64));

    group.bench_function("parse_payload", |b| {
        b.iter(|| {
            let values = parse_channel_payload(black_box(payload));
            black_box(values)
        })
    });

    group.bench_function("parse_payload_malformed", |b| {
        let bad = "412.0,x88.5,401.2,395.8,407.1";
        b.iter(|| {
            let values = parse_channel_payload(black_box(bad));
            black_box(values)
        })
    });

    group.bench_function("classify", |b| {
        let line = "Accel:9.81,0.02,0.44";
        b.iter(|| {
            let channel = Channel::classify(black_box(line));
            black_box(channel)
        })
    });

    group.finish();
}

criterion_group!(benches, parser_benchmark);
criterion_main!(benches);
