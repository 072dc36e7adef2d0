use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

use mpi::mpi::signed::mul_mpi;
use mpi::Mpi;

fn mpi_from_hex(s: &str) -> Mpi {
    Mpi::read_string(s, 16).unwrap()
}

pub fn bench_mul_2048bit(c: &mut Criterion) {
    let a = mpi_from_hex(&"A5".repeat(256));
    let b = mpi_from_hex(&"5A".repeat(256));

    c.bench_function("mul_mpi 2048-bit", |bencher| {
        bencher.iter(|| mul_mpi(black_box(&a), black_box(&b)).unwrap())
    });
}

pub fn bench_mul_256bit(c: &mut Criterion) {
    let a = mpi_from_hex(&"A5".repeat(32));
    let b = mpi_from_hex(&"5A".repeat(32));

    c.bench_function("mul_mpi 256-bit", |bencher| {
        bencher.iter(|| mul_mpi(black_box(&a), black_box(&b)).unwrap())
    });
}

criterion_group!(benches, bench_mul_256bit, bench_mul_2048bit);
criterion_main!(benches);
