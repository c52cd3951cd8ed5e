//! AVX-512 4-lane complex f64 SIMD vector implementation.
//!
//! Same interleaved `[re, im]` layout as the 256-bit `C64x2`, twice as wide.
//! There is no 512-bit horizontal add, so `|b|^2` is formed by adding the
//! squares to their pair-swapped copy, which rounds identically.
//!
//! Products use the same fused forms, with the same last-bit and overflow
//! differences from scalar `Complex<f64>` arithmetic: `(1e300 + 1e300i)^2` is
//! `-inf + inf i` here and `NaN + inf i` in the scalar formula.

#[cfg(target_arch = "x86")]
use std::arch::x86::*;

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use std::ops::{Add, Div, Mul, Neg, Sub};

use num::complex::Complex64;

use crate::simd::avx512::{flip_sign, is_aligned, Avx512};
use crate::simd::traits::{Kernel, ProductKernel};

/// The number of complex f64 lanes in an AVX-512 vector.
pub const LANE_COUNT: usize = 4;

// `_mm512_permute_pd` picks within each 128-bit pair, one bit per element.
const SWAP_PAIRS: i32 = 0b0101_0101;
const HIGH_OF_PAIRS: i32 = 0b1111_1111;

#[derive(Copy, Clone, Debug)]
#[repr(C)]
pub struct C64x4 {
    elements: __m512d,
}

impl C64x4 {
    /// # Safety
    ///
    /// `ptr` must be valid for reading 4 complex values.
    #[inline(always)]
    pub unsafe fn load(ptr: *const Complex64) -> Self {
        debug_assert!(!ptr.is_null(), "Pointer must not be null");

        let ptr = ptr as *const f64;
        Self {
            elements: match is_aligned(ptr) {
                true => _mm512_load_pd(ptr),
                false => _mm512_loadu_pd(ptr),
            },
        }
    }

    /// # Safety
    ///
    /// `ptr` must be valid for writing 4 complex values.
    #[inline(always)]
    pub unsafe fn store_at(&self, ptr: *mut Complex64) {
        debug_assert!(!ptr.is_null(), "Pointer must not be null");

        let ptr = ptr as *mut f64;
        match is_aligned(ptr) {
            true => _mm512_store_pd(ptr, self.elements),
            false => _mm512_storeu_pd(ptr, self.elements),
        }
    }

    #[inline(always)]
    pub fn to_array(self) -> [Complex64; LANE_COUNT] {
        let mut lanes = [Complex64::new(0.0, 0.0); LANE_COUNT];
        unsafe { self.store_at(lanes.as_mut_ptr()) };
        lanes
    }
}

impl Add for C64x4 {
    type Output = Self;

    #[inline(always)]
    fn add(self, rhs: Self) -> Self::Output {
        Self {
            elements: unsafe { _mm512_add_pd(self.elements, rhs.elements) },
        }
    }
}

impl Sub for C64x4 {
    type Output = Self;

    #[inline(always)]
    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            elements: unsafe { _mm512_sub_pd(self.elements, rhs.elements) },
        }
    }
}

impl Mul for C64x4 {
    type Output = Self;

    #[inline(always)]
    fn mul(self, rhs: Self) -> Self::Output {
        unsafe {
            let (a, b) = (self.elements, rhs.elements);

            let a_re = _mm512_movedup_pd(a);
            let a_im = _mm512_permute_pd(a, HIGH_OF_PAIRS);
            let cross = _mm512_mul_pd(a_im, _mm512_permute_pd(b, SWAP_PAIRS));

            Self {
                elements: _mm512_fmaddsub_pd(a_re, b, cross),
            }
        }
    }
}

impl Div for C64x4 {
    type Output = Self;

    #[inline(always)]
    fn div(self, rhs: Self) -> Self::Output {
        unsafe {
            let (a, b) = (self.elements, rhs.elements);

            let b_re = _mm512_movedup_pd(b);
            let b_im = _mm512_permute_pd(b, HIGH_OF_PAIRS);
            let cross = _mm512_mul_pd(b_im, _mm512_permute_pd(a, SWAP_PAIRS));
            let numerator = _mm512_fmsubadd_pd(b_re, a, cross);

            let squares = _mm512_mul_pd(b, b);
            let norm = _mm512_add_pd(squares, _mm512_permute_pd(squares, SWAP_PAIRS));

            Self {
                elements: _mm512_div_pd(numerator, norm),
            }
        }
    }
}

impl Neg for C64x4 {
    type Output = Self;

    #[inline(always)]
    fn neg(self) -> Self::Output {
        Self {
            elements: unsafe { flip_sign(self.elements) },
        }
    }
}

macro_rules! binary_kernel {
    ($name:ident, $op:tt) => {
        /// # Safety
        ///
        /// The CPU must support AVX-512F. All slices must have the same
        /// length, a multiple of 4.
        #[inline]
        #[target_feature(enable = "avx512f")]
        pub(crate) unsafe fn $name(a: &[Complex64], b: &[Complex64], out: &mut [Complex64]) {
            debug_assert!(
                a.len() == b.len() && a.len() == out.len(),
                "Operands must have the same size (got {}, {} and {})",
                a.len(),
                b.len(),
                out.len()
            );

            for ((c, x), y) in out
                .chunks_exact_mut(LANE_COUNT)
                .zip(a.chunks_exact(LANE_COUNT))
                .zip(b.chunks_exact(LANE_COUNT))
            {
                let result = C64x4::load(x.as_ptr()) $op C64x4::load(y.as_ptr());
                result.store_at(c.as_mut_ptr());
            }
        }
    };
}

binary_kernel!(add, +);
binary_kernel!(sub, -);
binary_kernel!(mul, *);
binary_kernel!(div, /);

/// # Safety
///
/// The CPU must support AVX-512F. The slice length must be a multiple of 4.
#[inline]
#[target_feature(enable = "avx512f")]
pub(crate) unsafe fn neg(a: &mut [Complex64]) {
    for chunk in a.chunks_exact_mut(LANE_COUNT) {
        let negated = -C64x4::load(chunk.as_ptr());
        negated.store_at(chunk.as_mut_ptr());
    }
}

impl Kernel<Complex64> for Avx512 {
    const LANES_PER_REGISTER: usize = LANE_COUNT;
    const SUPPORTS_PRODUCT: bool = true;

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

impl ProductKernel<Complex64> for Avx512 {
    #[inline(always)]
    fn mul(a: &[Complex64], b: &[Complex64], out: &mut [Complex64]) {
        unsafe { mul(a, b, out) }
    }

    #[inline(always)]
    fn div(a: &[Complex64], b: &[Complex64], out: &mut [Complex64]) {
        unsafe { div(a, b, out) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conjugate_product_is_real() {
        let a: Vec<Complex64> = (1..=4)
            .map(|k| Complex64::new(k as f64 * 0.5, -(k as f64)))
            .collect();
        let conj: Vec<Complex64> = a.iter().map(|z| z.conj()).collect();
        let mut out = vec![Complex64::new(0.0, 0.0); 4];

        <Avx512 as ProductKernel<Complex64>>::mul(&a, &conj, &mut out);
        for (z, p) in a.iter().zip(&out) {
            assert_eq!(p.im, 0.0);
            assert!((p.re - z.norm_sqr()).abs() <= 2.0 * f64::EPSILON * z.norm_sqr());
        }
    }

    #[test]
    fn test_division_inverts_multiplication() {
        let a = [
            Complex64::new(1.0, 2.0),
            Complex64::new(-3.0, 0.5),
            Complex64::new(0.25, -0.75),
            Complex64::new(8.0, 8.0),
        ];
        let b = [
            Complex64::new(2.0, -1.0),
            Complex64::new(0.5, 0.5),
            Complex64::new(-4.0, 1.0),
            Complex64::new(1.0, 0.0),
        ];
        let mut out = [Complex64::new(0.0, 0.0); 4];

        <Avx512 as ProductKernel<Complex64>>::div(&a, &b, &mut out);
        for j in 0..4 {
            let expected = a[j] / b[j];
            assert!(
                (out[j] - expected).norm() <= 4.0 * f64::EPSILON * expected.norm(),
                "lane {j}: {} vs {expected}",
                out[j]
            );
        }
    }

    #[test]
    fn test_add_and_neg_are_exact() {
        let a = [
            Complex64::new(0.1, 0.2),
            Complex64::new(-0.3, 0.4),
            Complex64::new(0.0, -0.0),
            Complex64::new(5.0, -6.0),
        ];
        let sum = unsafe { C64x4::load(a.as_ptr()) + C64x4::load(a.as_ptr()) };
        let negated = unsafe { -C64x4::load(a.as_ptr()) };

        for j in 0..4 {
            assert_eq!(sum.to_array()[j], a[j] + a[j]);
            assert_eq!(negated.to_array()[j], -a[j]);
        }
    }
}
