//! Element types that can occupy a vector lane.
//!
//! The set is closed: `f32`, `f64` and their complex counterparts from
//! `num::complex`. Complex values are `#[repr(C)]` `{ re, im }` pairs, which
//! is what lets the wide backends treat a complex lane as two adjacent reals.

use std::fmt::{Debug, Display};
use std::ops::{Add, Div, Mul, Neg, Sub};

use num::complex::Complex;
use rand::Rng;

mod sealed {
    pub trait Sealed {}

    impl Sealed for f32 {}
    impl Sealed for f64 {}
    impl Sealed for num::complex::Complex<f32> {}
    impl Sealed for num::complex::Complex<f64> {}
}

/// A lane element: a real scalar or a complex pair of reals.
pub trait Scalar:
    sealed::Sealed
    + Copy
    + Default
    + PartialEq
    + Debug
    + Display
    + Send
    + Sync
    + 'static
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
{
    /// Type name used in reports and errors.
    const NAME: &'static str;

    /// Machine epsilon of the underlying real type, widened to `f64`.
    const EPSILON: f64;

    fn zero() -> Self;

    /// Magnitude, widened to `f64` (modulus for complex values).
    fn magnitude(self) -> f64;

    /// Real and imaginary parts widened to `f64`; reals have a zero
    /// imaginary part.
    fn parts(self) -> (f64, f64);

    /// A uniform sample in `[-1, 1)` per real component.
    fn random<R: Rng>(rng: &mut R) -> Self;
}

macro_rules! impl_real_scalar {
    ($real:ty) => {
        impl Scalar for $real {
            const NAME: &'static str = stringify!($real);
            const EPSILON: f64 = <$real>::EPSILON as f64;

            #[inline(always)]
            fn zero() -> Self {
                0.0
            }

            #[inline(always)]
            fn magnitude(self) -> f64 {
                self.abs() as f64
            }

            #[inline(always)]
            fn parts(self) -> (f64, f64) {
                (self as f64, 0.0)
            }

            fn random<R: Rng>(rng: &mut R) -> Self {
                rng.random_range(-1.0..1.0)
            }
        }
    };
}

macro_rules! impl_complex_scalar {
    ($real:ty) => {
        impl Scalar for Complex<$real> {
            const NAME: &'static str = concat!("Complex<", stringify!($real), ">");
            const EPSILON: f64 = <$real>::EPSILON as f64;

            #[inline(always)]
            fn zero() -> Self {
                Complex::new(0.0, 0.0)
            }

            #[inline(always)]
            fn magnitude(self) -> f64 {
                self.norm() as f64
            }

            #[inline(always)]
            fn parts(self) -> (f64, f64) {
                (self.re as f64, self.im as f64)
            }

            fn random<R: Rng>(rng: &mut R) -> Self {
                Complex::new(rng.random_range(-1.0..1.0), rng.random_range(-1.0..1.0))
            }
        }
    };
}

impl_real_scalar!(f32);
impl_real_scalar!(f64);
impl_complex_scalar!(f32);
impl_complex_scalar!(f64);
