use criterion::{black_box, criterion_group, criterion_main, Criterion};
use busmonitor::{convert_batch, decode, Encoding};

fn benchmark_decode(c: &mut Criterion) {
    c.bench_function("decode_i16", |b| {
        b.iter(|| decode(black_box("8000"), black_box(Encoding::SignedInt16)).unwrap())
    });

    c.bench_function("decode_f64", |b| {
        b.iter(|| decode(black_box("400921FB54442D18"), black_box(Encoding::Float64)).unwrap())
    });
}

fn benchmark_batch(c: &mut Criterion) {
    // Bloc de 1000 lignes, comme un relevé de bus collé dans le formulaire
    let text: String = (0..1000u32)
        .map(|i| format!("{:08X}\n", i.wrapping_mul(0x9E37_79B9)))
        .collect();

    c.bench_function("convert_batch_1000", |b| {
        b.iter(|| convert_batch(black_box(&text), black_box(Encoding::TwosComplement32)).unwrap())
    });
}

criterion_group!(benches, benchmark_decode, benchmark_batch);
criterion_main!(benches);
