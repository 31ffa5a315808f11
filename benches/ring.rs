use bfv_core::context::Context;
use bfv_core::math::int_mod::mul_mod;
use bfv_core::math::ntt::NttTables;
use bfv_core::math::number_theory::find_ntt_prime;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use std::sync::Arc;

fn criterion_benchmark(c: &mut Criterion) {
    const N: usize = 4096;
    let q = find_ntt_prime(45, 2 * N as u64).unwrap();
    let mut rng = ChaCha20Rng::from_entropy();

    let a = bfv_core::math::sampling::uniform(&mut rng, N, q);
    let b = bfv_core::math::sampling::uniform(&mut rng, N, q);

    c.bench_function("math::poly mul_schoolbook N=4096", |bencher| {
        bencher.iter(|| black_box(&a).mul_schoolbook(black_box(&b)));
    });

    let tables = NttTables::new(N, q);
    c.bench_function("math::poly mul_ntt N=4096", |bencher| {
        bencher.iter(|| black_box(&a).mul_ntt(black_box(&b), &tables));
    });

    c.bench_function("math::ntt forward N=4096", |bencher| {
        let mut points = a.coeffs.clone();
        bencher.iter(|| tables.forward(black_box(&mut points)));
    });

    c.bench_function("math::ntt backward N=4096", |bencher| {
        let mut points = a.coeffs.clone();
        tables.forward(&mut points);
        bencher.iter(|| tables.backward(black_box(&mut points)));
    });

    c.bench_function("math::int_mod mul_mod", |bencher| {
        let x = q - 3;
        let y = q - 5;
        bencher.iter(|| mul_mod(black_box(x), black_box(y), black_box(q)));
    });

    let ctx = Arc::new(Context::new(N, 65537, 45, 3.2).unwrap());
    c.bench_function("context::keygen N=4096", |bencher| {
        bencher.iter(|| bfv_core::keys::keygen(&ctx, &mut rng));
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
