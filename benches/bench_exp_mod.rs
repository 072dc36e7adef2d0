use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

use mpi::mpi::expmod::exp_mod;
use mpi::mpi::montgomery::MontgomeryCache;
use mpi::Mpi;

fn mpi_from_hex(s: &str) -> Mpi {
    Mpi::read_string(s, 16).unwrap()
}

/// A 2048-bit RSA-style modulus: odd, top bit set, composite (this
/// benchmark never needs it to be prime, only a realistic operand size).
fn rsa_sized_modulus() -> Mpi {
    let mut n = mpi_from_hex(&"F1".repeat(256));
    n.set_bit(0, 1).unwrap();
    n
}

pub fn bench_exp_mod_2048bit_no_cache(c: &mut Criterion) {
    let a = mpi_from_hex(&"A5".repeat(256));
    let e = mpi_from_hex("10001"); // the common RSA public exponent, 65537
    let n = rsa_sized_modulus();

    c.bench_function("exp_mod 2048-bit, fresh cache", |bencher| {
        bencher.iter(|| exp_mod(black_box(&a), black_box(&e), black_box(&n), None).unwrap())
    });
}

pub fn bench_exp_mod_2048bit_reused_cache(c: &mut Criterion) {
    let a = mpi_from_hex(&"A5".repeat(256));
    let e = mpi_from_hex("10001");
    let n = rsa_sized_modulus();
    let mut cache = MontgomeryCache::new(&n).unwrap();

    c.bench_function("exp_mod 2048-bit, reused cache", |bencher| {
        bencher.iter(|| {
            exp_mod(black_box(&a), black_box(&e), black_box(&n), Some(&mut cache)).unwrap()
        })
    });
}

criterion_group!(
    benches,
    bench_exp_mod_2048bit_no_cache,
    bench_exp_mod_2048bit_reused_cache
);
criterion_main!(benches);
