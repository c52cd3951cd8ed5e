//! AVX 2-lane complex f64 SIMD vector implementation.
//!
//! A `Complex<f64>` is `#[repr(C)] { re, im }`, so two complex lanes load into
//! one `__m256d` as `[re0, im0, re1, im1]`. Addition, subtraction and negation
//! are plain real operations on that layout.
//!
//! Multiplication and division need the alternating add/subtract of
//! `_mm256_fmaddsub_pd`/`_mm256_fmsubadd_pd` (FMA3) and are only compiled
//! under `cfg(fma)`. The fused steps round once instead of twice, so products
//! can differ from scalar `Complex<f64>` arithmetic in the last bit.
//!
//! Near overflow the special values differ too. The unfused formula rounds
//! both partial products to infinity first, so `(1e300 + 1e300i)^2` gives
//! `NaN + inf i`; the fused form subtracts infinity from the exact finite
//! product and gives `-inf + inf i`.

#[cfg(target_arch = "x86")]
use std::arch::x86::*;

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use std::ops::{Add, Neg, Sub};

use num::complex::Complex64;

use crate::simd::avx::{is_aligned, Avx};
use crate::simd::traits::Kernel;

/// Number of complex f64 elements that fit in an AVX 256-bit vector.
pub(crate) const LANE_COUNT: usize = 2;

/// AVX SIMD vector containing 2 packed, interleaved complex f64 values.
#[derive(Copy, Clone, Debug)]
pub struct C64x2 {
    /// `[re0, im0, re1, im1]`
    pub elements: __m256d,
}

impl C64x2 {
    /// Loads exactly 2 complex elements.
    ///
    /// # Safety
    ///
    /// Pointer must not be null and must point to at least 2 valid complex values.
    #[inline(always)]
    pub unsafe fn load(ptr: *const Complex64) -> Self {
        debug_assert!(!ptr.is_null(), "Pointer must not be null");

        let ptr = ptr as *const f64;
        Self {
            elements: match is_aligned(ptr) {
                true => _mm256_load_pd(ptr),
                false => _mm256_loadu_pd(ptr),
            },
        }
    }

    /// Stores both complex lanes.
    ///
    /// # Safety
    ///
    /// Pointer must not be null and must point to 2 writable complex locations.
    #[inline(always)]
    pub unsafe fn store_at(&self, ptr: *mut Complex64) {
        debug_assert!(!ptr.is_null(), "Pointer must not be null");

        let ptr = ptr as *mut f64;
        match is_aligned(ptr) {
            true => _mm256_store_pd(ptr, self.elements),
            false => _mm256_storeu_pd(ptr, self.elements),
        }
    }

    #[inline(always)]
    pub fn to_array(self) -> [Complex64; LANE_COUNT] {
        let mut lanes = [Complex64::new(0.0, 0.0); LANE_COUNT];
        unsafe { self.store_at(lanes.as_mut_ptr()) };
        lanes
    }
}

impl From<&[Complex64]> for C64x2 {
    /// Loads the first 2 elements of `slice`.
    ///
    /// # Panics
    ///
    /// Panics if the slice holds fewer than 2 elements.
    fn from(slice: &[Complex64]) -> Self {
        assert!(
            slice.len() >= LANE_COUNT,
            "Size must be >= {LANE_COUNT}, got {}",
            slice.len()
        );

        unsafe { Self::load(slice.as_ptr()) }
    }
}

impl Add for C64x2 {
    type Output = Self;

    #[inline(always)]
    fn add(self, rhs: Self) -> Self::Output {
        Self {
            elements: unsafe { _mm256_add_pd(self.elements, rhs.elements) },
        }
    }
}

impl Sub for C64x2 {
    type Output = Self;

    #[inline(always)]
    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            elements: unsafe { _mm256_sub_pd(self.elements, rhs.elements) },
        }
    }
}

impl Neg for C64x2 {
    type Output = Self;

    #[inline(always)]
    fn neg(self) -> Self::Output {
        Self {
            elements: unsafe { _mm256_xor_pd(self.elements, _mm256_set1_pd(-0.0)) },
        }
    }
}

#[cfg(fma)]
mod product {
    #[cfg(target_arch = "x86")]
    use std::arch::x86::*;

    #[cfg(target_arch = "x86_64")]
    use std::arch::x86_64::*;

    use std::ops::{Div, Mul};

    use super::C64x2;

    impl Mul for C64x2 {
        type Output = Self;

        /// `(ar + i ai)(br + i bi) = (ar br - ai bi) + i (ar bi + ai br)`
        #[inline(always)]
        fn mul(self, rhs: Self) -> Self::Output {
            unsafe {
                let (a, b) = (self.elements, rhs.elements);

                let a_re = _mm256_movedup_pd(a); // [ar, ar]
                let a_im = _mm256_permute_pd(a, 0b1111); // [ai, ai]
                let b_swapped = _mm256_permute_pd(b, 0b0101); // [bi, br]
                let cross = _mm256_mul_pd(a_im, b_swapped); // [ai bi, ai br]

                Self {
                    elements: _mm256_fmaddsub_pd(a_re, b, cross),
                }
            }
        }
    }

    impl Div for C64x2 {
        type Output = Self;

        /// `a / b = a conj(b) / |b|^2`
        #[inline(always)]
        fn div(self, rhs: Self) -> Self::Output {
            unsafe {
                let (a, b) = (self.elements, rhs.elements);

                let b_re = _mm256_movedup_pd(b); // [br, br]
                let b_im = _mm256_permute_pd(b, 0b1111); // [bi, bi]
                let a_swapped = _mm256_permute_pd(a, 0b0101); // [ai, ar]
                let cross = _mm256_mul_pd(b_im, a_swapped); // [bi ai, bi ar]

                // [br ar + bi ai, br ai - bi ar]
                let numerator = _mm256_fmsubadd_pd(b_re, a, cross);

                let squares = _mm256_mul_pd(b, b);
                let norm = _mm256_hadd_pd(squares, squares); // [br^2 + bi^2, same]

                Self {
                    elements: _mm256_div_pd(numerator, norm),
                }
            }
        }
    }
}

// ================================================================================================
// SLICE KERNELS
// ================================================================================================

macro_rules! binary_kernel {
    ($name:ident, $op:tt, $features:literal) => {
        /// # Safety
        ///
        /// The CPU must support the enabled target features. All slices must
        /// have the same length, a multiple of 2.
        #[inline]
        #[target_feature(enable = $features)]
        pub(crate) unsafe fn $name(a: &[Complex64], b: &[Complex64], out: &mut [Complex64]) {
            debug_assert!(
                a.len() == b.len() && a.len() == out.len(),
                "Operands must have the same size (got {}, {} and {})",
                a.len(),
                b.len(),
                out.len()
            );
            debug_assert!(out.len() % LANE_COUNT == 0, "Size must be a multiple of {LANE_COUNT}");

            for ((c, x), y) in out
                .chunks_exact_mut(LANE_COUNT)
                .zip(a.chunks_exact(LANE_COUNT))
                .zip(b.chunks_exact(LANE_COUNT))
            {
                let result = C64x2::load(x.as_ptr()) $op C64x2::load(y.as_ptr());
                result.store_at(c.as_mut_ptr());
            }
        }
    };
}

binary_kernel!(add, +, "avx");
binary_kernel!(sub, -, "avx");
#[cfg(fma)]
binary_kernel!(mul, *, "avx,fma");
#[cfg(fma)]
binary_kernel!(div, /, "avx,fma");

/// # Safety
///
/// The CPU must support AVX. The slice length must be a multiple of 2.
#[inline]
#[target_feature(enable = "avx")]
pub(crate) unsafe fn neg(a: &mut [Complex64]) {
    debug_assert!(a.len() % LANE_COUNT == 0, "Size must be a multiple of {LANE_COUNT}");

    for chunk in a.chunks_exact_mut(LANE_COUNT) {
        let negated = -C64x2::load(chunk.as_ptr());
        negated.store_at(chunk.as_mut_ptr());
    }
}

// SAFETY (all impls below): `Avx` only exists when the build script detected
// AVX, and the product impl only when it also detected FMA.

impl Kernel<Complex64> for Avx {
    const LANES_PER_REGISTER: usize = LANE_COUNT;
    const SUPPORTS_PRODUCT: bool = cfg!(fma);

    #[inline(always)]
    fn add(a: &[Complex64], b: &[Complex64], out: &mut [Complex64]) {
        unsafe { add(a, b, out) }
    }

    #[inline(always)]
    fn sub(a: &[Complex64], b: &[Complex64], out: &mut [Complex64]) {
        unsafe { sub(a, b, out) }
    }

    #[inline(always)]
    fn neg(a: &mut [Complex64]) {
        unsafe { neg(a) }
    }
}

#[cfg(fma)]
impl crate::simd::traits::ProductKernel<Complex64> for Avx {
    #[inline(always)]
    fn mul(a: &[Complex64], b: &[Complex64], out: &mut [Complex64]) {
        unsafe { mul(a, b, out) }
    }

    #[inline(always)]
    fn div(a: &[Complex64], b: &[Complex64], out: &mut [Complex64]) {
        unsafe { div(a, b, out) }
    }
}
