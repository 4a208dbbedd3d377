use baudsweep::probe::{classify, display_text, hex_dump};
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use std::time::Duration;

pub fn bench_classification(c: &mut Criterion) {
    let ascii = b"Bootloader v2.1 ready\r\nlogin: ".repeat(3);
    let binary: Vec<u8> = (0u8..100).map(|b| b.wrapping_mul(37)).collect();

    c.bench_function("classify_ascii_reply", |b| {
        b.iter(|| black_box(classify(black_box(&ascii))))
    });
    c.bench_function("classify_binary_reply", |b| {
        b.iter(|| black_box(classify(black_box(&binary))))
    });
    c.bench_function("display_text_binary", |b| {
        b.iter(|| black_box(display_text(black_box(&binary), 100)))
    });
    c.bench_function("hex_dump_reply", |b| {
        b.iter(|| black_box(hex_dump(black_box(&ascii))))
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default()
        .warm_up_time(Duration::from_millis(300))
        .measurement_time(Duration::from_secs(2));
    targets = bench_classification
}
criterion_main!(benches);
