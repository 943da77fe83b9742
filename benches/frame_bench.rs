//! Criterion benchmark untuk framing dan packet codec
//!
//! Run dengan: cargo bench

use std::io::Cursor;

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use osilink::core::{envelope, strip_envelope};
use osilink::protocol::{read_frame, write_frame, PacketMessage};

fn bench_framing(c: &mut Criterion) {
    let mut group = c.benchmark_group("frame");

    for size in [64usize, 1024, 8000] {
        let body = vec![b'x'; size];
        group.throughput(Throughput::Bytes(size as u64));

        group.bench_function(format!("write_read_{}", size), |b| {
            let mut buf = Vec::with_capacity(size + 4);
            b.iter(|| {
                buf.clear();
                write_frame(&mut buf, black_box(&body)).unwrap();
                let mut cursor = Cursor::new(&buf);
                black_box(read_frame(&mut cursor, 8192).unwrap());
            });
        });
    }

    group.finish();
}

fn bench_packet(c: &mut Criterion) {
    let mut group = c.benchmark_group("packet");
    group.throughput(Throughput::Elements(1));

    let packet = PacketMessage::new("Hello, OSI");
    let json = packet.to_json().unwrap();

    group.bench_function("to_json", |b| {
        b.iter(|| black_box(black_box(&packet).to_json().unwrap()));
    });

    group.bench_function("from_json_lossy", |b| {
        b.iter(|| black_box(PacketMessage::from_json_lossy(black_box(&json))));
    });

    group.bench_function("envelope_strip", |b| {
        b.iter(|| {
            let wire = envelope(black_box("Hello, OSI"));
            black_box(strip_envelope(&wire).map(str::len));
        });
    });

    group.finish();
}

criterion_group!(benches, bench_framing, bench_packet);
criterion_main!(benches);
