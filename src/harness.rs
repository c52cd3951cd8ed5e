//! Validation driver: packs scalar arrays into vectors, runs an operation over
//! them in parallel and compares the result with a sequential scalar loop.
//!
//! ```rust
//! use simdlanes::harness::{self, Config};
//! use simdlanes::{AddOp, Generic};
//!
//! let config = Config { len: 1024, warmup: 1, iterations: 2, ..Config::default() };
//! let report = harness::verify::<AddOp, f64, 4, Generic>(&config).unwrap();
//! assert!(report.is_exact());
//! ```

use std::fmt;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;

use crate::capability::capabilities;
use crate::error::{length_error, Result};
use crate::op::{ArithOp, Operation};
use crate::scalar::Scalar;
use crate::simd::Kernel;
use crate::vector::Vector;

/// Runtime knobs of [`verify`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Scalars per operand array; must be a multiple of the lane count.
    pub len: usize,
    /// Seed of the operand generator. `a`, `b` and `c` use `seed`, `seed + 1`
    /// and `seed + 2`.
    pub seed: u64,
    /// Unmeasured runs before timing starts.
    pub warmup: u32,
    /// Measured runs; reported times are the mean over these.
    pub iterations: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            len: 32768,
            seed: 0x5eed,
            warmup: 10,
            iterations: 100,
        }
    }
}

/// Groups every `L` consecutive scalars into one vector.
///
/// Lane `j` of vector `i` is `scalars[i * L + j]`.
pub fn pack<T: Scalar, const L: usize, B: Kernel<T>>(scalars: &[T]) -> Result<Vec<Vector<T, L, B>>> {
    if scalars.len() % L != 0 {
        return Err(length_error(
            scalars.len(),
            L,
            format!("cannot pack {} scalars into {}-lane vectors", scalars.len(), L),
        ));
    }

    scalars.chunks_exact(L).map(Vector::from_slice).collect()
}

/// Flattens vectors back into scalars, the inverse of [`pack`].
pub fn unpack<T: Scalar, const L: usize, B: Kernel<T>>(vectors: &[Vector<T, L, B>]) -> Vec<T> {
    let mut scalars = Vec::with_capacity(vectors.len() * L);
    for vector in vectors {
        scalars.extend_from_slice(vector.as_slice());
    }
    scalars
}

/// `n` reproducible scalars, each real component uniform in `[-1, 1)`.
pub fn random_scalars<T: Scalar>(n: usize, seed: u64) -> Vec<T> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n).map(|_| T::random(&mut rng)).collect()
}

/// The reference computation: `O` applied element by element, in order.
pub fn reference<O: Operation<T>, T: Scalar>(a: &[T], b: &[T], c: &mut [T]) {
    assert_eq!(a.len(), b.len(), "Operands must have the same size");
    assert_eq!(a.len(), c.len(), "Operands must have the same size");

    for ((c, a), b) in c.iter_mut().zip(a).zip(b) {
        O::apply(a, b, c);
    }
}

/// Applies `O` to every element on the rayon pool. Each task owns exactly one
/// element of `c`.
pub fn parallel_for<O, V>(a: &[V], b: &[V], c: &mut [V])
where
    O: Operation<V>,
    V: Send + Sync,
{
    assert_eq!(a.len(), b.len(), "Operands must have the same size");
    assert_eq!(a.len(), c.len(), "Operands must have the same size");

    c.par_iter_mut()
        .zip(a.par_iter())
        .zip(b.par_iter())
        .for_each(|((c, a), b)| O::apply(a, b, c));
}

/// Outcome of one [`verify`] run.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub op: ArithOp,
    pub backend: &'static str,
    pub scalar: &'static str,
    pub lanes: usize,
    pub len: usize,
    /// Mean time of one reference pass.
    pub reference_time: Duration,
    /// Mean time of one packed pass.
    pub vector_time: Duration,
    pub sum_abs_diff: f64,
    pub max_abs_diff: f64,
    /// Largest magnitude among the reference results.
    pub max_magnitude: f64,
    /// Machine epsilon of the element type's real component.
    pub epsilon: f64,
}

impl Report {
    /// The summed absolute difference is below `f64::EPSILON`.
    pub fn is_exact(&self) -> bool {
        self.sum_abs_diff < f64::EPSILON
    }

    /// Every lane is within `k` ulps of the largest reference magnitude.
    pub fn within_ulps(&self, k: u32) -> bool {
        self.max_abs_diff <= f64::from(k) * self.epsilon * self.max_magnitude
    }

    /// Reference time over vector time.
    pub fn speedup(&self) -> f64 {
        self.reference_time.as_secs_f64() / self.vector_time.as_secs_f64().max(f64::MIN_POSITIVE)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} x {} on {}: {} scalars, reference {:?}, vector {:?} ({:.2}x), \
             sum |diff| {:e}, max |diff| {:e}",
            self.op,
            self.scalar,
            self.lanes,
            self.backend,
            self.len,
            self.reference_time,
            self.vector_time,
            self.speedup(),
            self.sum_abs_diff,
            self.max_abs_diff
        )
    }
}

/// Difference between a reference lane and a vector lane: the modulus of the
/// per-component differences.
///
/// Each real or imaginary component that is identical on both sides, or NaN
/// on both sides, counts as zero, so matching infinities and NaNs from a zero
/// divisor do not poison the sums. A NaN facing a number still does.
fn lane_diff<T: Scalar>(expected: T, actual: T) -> f64 {
    let (expected_re, expected_im) = expected.parts();
    let (actual_re, actual_im) = actual.parts();

    component_diff(expected_re, actual_re).hypot(component_diff(expected_im, actual_im))
}

fn component_diff(expected: f64, actual: f64) -> f64 {
    if expected == actual || (expected.is_nan() && actual.is_nan()) {
        0.0
    } else {
        (expected - actual).abs()
    }
}

fn time_runs(config: &Config, mut run: impl FnMut()) -> Duration {
    for _ in 0..config.warmup {
        run();
    }

    let start = Instant::now();
    for _ in 0..config.iterations {
        run();
    }

    start
        .elapsed()
        .checked_div(config.iterations)
        .unwrap_or_default()
}

/// Runs `O` over `config.len` random scalars through both the reference loop
/// and `L`-lane vectors on backend `B`, and compares the two.
///
/// Every measured pass starts from the same initial `c`, so in-place
/// operations give the same answer however many passes run.
pub fn verify<O, T, const L: usize, B>(config: &Config) -> Result<Report>
where
    O: Operation<T> + Operation<Vector<T, L, B>>,
    T: Scalar,
    B: Kernel<T>,
{
    let op = <O as Operation<T>>::OP;
    let caps = capabilities::<T, B>();
    caps.check(op)?;
    caps.check_lanes(L)?;

    log::debug!(
        "verifying {} for {} x {} on {} over {} scalars (seed {})",
        op,
        T::NAME,
        L,
        B::NAME,
        config.len,
        config.seed
    );

    let a = random_scalars::<T>(config.len, config.seed);
    let b = random_scalars::<T>(config.len, config.seed.wrapping_add(1));
    let c = random_scalars::<T>(config.len, config.seed.wrapping_add(2));

    let packed_a = pack::<T, L, B>(&a)?;
    let packed_b = pack::<T, L, B>(&b)?;
    let packed_c = pack::<T, L, B>(&c)?;

    let mut expected = c.clone();
    let reference_time = time_runs(config, || {
        expected.copy_from_slice(&c);
        reference::<O, T>(&a, &b, &mut expected);
    });

    let mut packed = packed_c.clone();
    let vector_time = time_runs(config, || {
        packed.copy_from_slice(&packed_c);
        parallel_for::<O, Vector<T, L, B>>(&packed_a, &packed_b, &mut packed);
    });

    // The compared pass is untimed, so it exists even with zero iterations.
    expected.copy_from_slice(&c);
    reference::<O, T>(&a, &b, &mut expected);
    packed.copy_from_slice(&packed_c);
    parallel_for::<O, Vector<T, L, B>>(&packed_a, &packed_b, &mut packed);

    let actual = unpack(&packed);

    let mut sum_abs_diff = 0.0;
    let mut max_abs_diff = 0.0f64;
    let mut max_magnitude = 0.0f64;
    for (&e, &v) in expected.iter().zip(&actual) {
        let diff = lane_diff(e, v);
        sum_abs_diff += diff;
        max_abs_diff = max_abs_diff.max(diff);
        max_magnitude = max_magnitude.max(e.magnitude());
    }

    let report = Report {
        op,
        backend: B::NAME,
        scalar: T::NAME,
        lanes: L,
        len: config.len,
        reference_time,
        vector_time,
        sum_abs_diff,
        max_abs_diff,
        max_magnitude,
        epsilon: T::EPSILON,
    };
    log::info!("{report}");

    Ok(report)
}
