//! Elementwise vector arithmetic benchmarks.
//!
//! Compares, for each operation over packed f64 data:
//!
//! - the sequential scalar reference loop
//! - packed vectors on every compiled backend, applied sequentially
//! - packed vectors dispatched through the rayon parallel-for
//! - an ndarray baseline for the binary operations

use std::hint::black_box;
use std::time::Instant;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ndarray::Array1;
use num::complex::Complex64;
use simdlanes::harness::{self, pack, random_scalars};
use simdlanes::{AddOp, DivideOp, Generic, Kernel, MultiplyOp, Operation, Scalar, Vector};

// ================================================================================================
// BENCHMARK CONFIGURATION
// ================================================================================================

/// Scalar counts, from the validation driver's 32768 up to sizes that spill
/// out of L2.
const SIZES: &[usize] = &[4_096, 32_768, 262_144, 1_048_576];

// ================================================================================================
// BENCHMARK IMPLEMENTATIONS
// ================================================================================================

fn sequential<O, T, const L: usize, B>(
    a: &[Vector<T, L, B>],
    b: &[Vector<T, L, B>],
    c: &mut [Vector<T, L, B>],
) where
    O: Operation<Vector<T, L, B>>,
    T: Scalar,
    B: Kernel<T>,
{
    for ((c, a), b) in c.iter_mut().zip(a).zip(b) {
        O::apply(a, b, c);
    }
}

/// Registers the sequential and parallel packed variants of `O` on one backend.
fn bench_packed<O, T, const L: usize, B>(
    group: &mut criterion::BenchmarkGroup<'_, criterion::measurement::WallTime>,
    a: &[T],
    b: &[T],
) where
    O: Operation<Vector<T, L, B>>,
    T: Scalar,
    B: Kernel<T>,
{
    let (Ok(pa), Ok(pb)) = (pack::<T, L, B>(a), pack::<T, L, B>(b)) else {
        return;
    };
    let mut pc = pa.clone();
    let size = a.len();

    group.bench_function(BenchmarkId::new(format!("{}_x{}", B::NAME, L), size), |bench| {
        bench.iter(|| sequential::<O, T, L, B>(black_box(&pa), black_box(&pb), &mut pc))
    });

    let mut pc = pa.clone();
    group.bench_function(
        BenchmarkId::new(format!("{}_x{}_parallel", B::NAME, L), size),
        |bench| {
            bench.iter(|| {
                harness::parallel_for::<O, Vector<T, L, B>>(black_box(&pa), black_box(&pb), &mut pc)
            })
        },
    );
}

macro_rules! bench_operation {
    ($c:expr, $name:literal, $op:ty, $nd:tt) => {{
        let mut group = $c.benchmark_group(format!("{}_f64", $name));
        for &size in SIZES {
            group.throughput(Throughput::Bytes((size * std::mem::size_of::<f64>() * 2) as u64));

            let a = random_scalars::<f64>(size, 42);
            let b = random_scalars::<f64>(size, 43);

            let mut out = vec![0.0f64; size];
            group.bench_function(BenchmarkId::new("scalar", size), |bench| {
                bench.iter(|| harness::reference::<$op, f64>(black_box(&a), black_box(&b), &mut out))
            });

            bench_packed::<$op, f64, 8, Generic>(&mut group, &a, &b);

            #[cfg(all(avx, any(target_arch = "x86", target_arch = "x86_64")))]
            bench_packed::<$op, f64, 8, simdlanes::Avx>(&mut group, &a, &b);

            #[cfg(all(avx512, any(target_arch = "x86", target_arch = "x86_64")))]
            bench_packed::<$op, f64, 8, simdlanes::Avx512>(&mut group, &a, &b);

            let a_nd = Array1::from_vec(a.clone());
            let b_nd = Array1::from_vec(b.clone());
            group.bench_function(BenchmarkId::new("ndarray", size), |bench| {
                bench.iter(|| black_box(&a_nd $nd &b_nd))
            });
        }
        group.finish();
    }};
}

fn benchmark_real_operations(c: &mut Criterion) {
    bench_operation!(c, "add", AddOp, +);
    bench_operation!(c, "multiply", MultiplyOp, *);
    bench_operation!(c, "divide", DivideOp, /);
}

fn benchmark_complex_multiply(c: &mut Criterion) {
    let size = 32_768;
    let mut group = c.benchmark_group("multiply_complex64");
    group.throughput(Throughput::Bytes(
        (size * std::mem::size_of::<Complex64>() * 2) as u64,
    ));

    let a = random_scalars::<Complex64>(size, 42);
    let b = random_scalars::<Complex64>(size, 43);

    let mut out = vec![Complex64::new(0.0, 0.0); size];
    group.bench_function(BenchmarkId::new("scalar", size), |bench| {
        bench.iter(|| harness::reference::<MultiplyOp, Complex64>(black_box(&a), black_box(&b), &mut out))
    });

    bench_packed::<MultiplyOp, Complex64, 4, Generic>(&mut group, &a, &b);

    #[cfg(all(avx, fma, any(target_arch = "x86", target_arch = "x86_64")))]
    bench_packed::<MultiplyOp, Complex64, 4, simdlanes::Avx>(&mut group, &a, &b);

    #[cfg(all(avx512, any(target_arch = "x86", target_arch = "x86_64")))]
    bench_packed::<MultiplyOp, Complex64, 4, simdlanes::Avx512>(&mut group, &a, &b);

    group.finish();
}

fn all_benchmarks(c: &mut Criterion) {
    println!(
        "Compiled backends: {}",
        simdlanes::simd::compiled_backends().join(", ")
    );

    let start_time = Instant::now();

    benchmark_real_operations(c);
    benchmark_complex_multiply(c);

    println!(
        "Benchmark suite completed in {:.2} seconds",
        start_time.elapsed().as_secs_f64()
    );
}

criterion_group!(benches, all_benchmarks);
criterion_main!(benches);
