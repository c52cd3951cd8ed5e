//! AVX 4-lane f64 SIMD vector implementation.
//!
//! `F64x4` wraps an `__m256d` register. The kernels at the bottom of this file
//! stream equal-length `f64` slices through it, one register at a time, and
//! back the `Kernel<f64>`/`ProductKernel<f64>` impls of [`Avx`].
//!
//! Every operation is a single IEEE instruction per lane, so results are
//! bit-identical to scalar `f64` arithmetic.

#[cfg(target_arch = "x86")]
use std::arch::x86::*;

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use std::ops::{Add, Div, Mul, Neg, Sub};

use crate::simd::avx::{is_aligned, Avx};
use crate::simd::traits::{Kernel, ProductKernel};

/// Number of f64 elements that fit in an AVX 256-bit vector.
pub(crate) const LANE_COUNT: usize = 4;

/// AVX SIMD vector containing 4 packed f64 values.
#[derive(Copy, Clone, Debug)]
pub struct F64x4 {
    /// AVX 256-bit register containing 4 packed f64 values
    pub elements: __m256d,
}

impl F64x4 {
    /// Loads exactly 4 elements, choosing the aligned load when possible.
    ///
    /// # Safety
    ///
    /// Pointer must not be null and must point to at least 4 valid f64 values.
    #[inline(always)]
    pub unsafe fn load(ptr: *const f64) -> Self {
        debug_assert!(!ptr.is_null(), "Pointer must not be null");

        match is_aligned(ptr) {
            true => Self::load_aligned(ptr),
            false => Self::load_unaligned(ptr),
        }
    }

    /// # Safety
    ///
    /// Pointer must be 32-byte aligned and point to at least 4 valid f64 values.
    #[inline(always)]
    pub unsafe fn load_aligned(ptr: *const f64) -> Self {
        Self {
            elements: _mm256_load_pd(ptr),
        }
    }

    /// # Safety
    ///
    /// Pointer must point to at least 4 valid f64 values.
    #[inline(always)]
    pub unsafe fn load_unaligned(ptr: *const f64) -> Self {
        Self {
            elements: _mm256_loadu_pd(ptr),
        }
    }

    /// Stores all 4 lanes, choosing the aligned store when possible.
    ///
    /// # Safety
    ///
    /// Pointer must not be null and must point to 4 writable f64 locations.
    #[inline(always)]
    pub unsafe fn store_at(&self, ptr: *mut f64) {
        debug_assert!(!ptr.is_null(), "Pointer must not be null");

        match is_aligned(ptr) {
            true => _mm256_store_pd(ptr, self.elements),
            false => _mm256_storeu_pd(ptr, self.elements),
        }
    }

    #[inline(always)]
    pub fn to_array(self) -> [f64; LANE_COUNT] {
        let mut lanes = [0.0f64; LANE_COUNT];
        unsafe { _mm256_storeu_pd(lanes.as_mut_ptr(), self.elements) };
        lanes
    }
}

impl From<&[f64]> for F64x4 {
    /// Loads the first 4 elements of `slice`.
    ///
    /// # Panics
    ///
    /// Panics if the slice holds fewer than 4 elements.
    fn from(slice: &[f64]) -> Self {
        assert!(
            slice.len() >= LANE_COUNT,
            "Size must be >= {LANE_COUNT}, got {}",
            slice.len()
        );

        unsafe { Self::load(slice.as_ptr()) }
    }
}

impl Add for F64x4 {
    type Output = Self;

    #[inline(always)]
    fn add(self, rhs: Self) -> Self::Output {
        Self {
            elements: unsafe { _mm256_add_pd(self.elements, rhs.elements) },
        }
    }
}

impl Sub for F64x4 {
    type Output = Self;

    #[inline(always)]
    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            elements: unsafe { _mm256_sub_pd(self.elements, rhs.elements) },
        }
    }
}

impl Mul for F64x4 {
    type Output = Self;

    #[inline(always)]
    fn mul(self, rhs: Self) -> Self::Output {
        Self {
            elements: unsafe { _mm256_mul_pd(self.elements, rhs.elements) },
        }
    }
}

impl Div for F64x4 {
    type Output = Self;

    #[inline(always)]
    fn div(self, rhs: Self) -> Self::Output {
        Self {
            elements: unsafe { _mm256_div_pd(self.elements, rhs.elements) },
        }
    }
}

impl Neg for F64x4 {
    type Output = Self;

    /// Flips the sign bit of every lane, so `-0.0` and NaN payloads behave
    /// exactly like scalar negation.
    #[inline(always)]
    fn neg(self) -> Self::Output {
        Self {
            elements: unsafe { _mm256_xor_pd(self.elements, _mm256_set1_pd(-0.0)) },
        }
    }
}

// ================================================================================================
// SLICE KERNELS
// ================================================================================================

macro_rules! binary_kernel {
    ($name:ident, $op:tt) => {
        /// # Safety
        ///
        /// The CPU must support AVX. All slices must have the same length, a
        /// multiple of 4.
        #[inline]
        #[target_feature(enable = "avx")]
        pub(crate) unsafe fn $name(a: &[f64], b: &[f64], out: &mut [f64]) {
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
                let result = F64x4::load(x.as_ptr()) $op F64x4::load(y.as_ptr());
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
/// The CPU must support AVX. The slice length must be a multiple of 4.
#[inline]
#[target_feature(enable = "avx")]
pub(crate) unsafe fn neg(a: &mut [f64]) {
    debug_assert!(a.len() % LANE_COUNT == 0, "Size must be a multiple of {LANE_COUNT}");

    for chunk in a.chunks_exact_mut(LANE_COUNT) {
        let negated = -F64x4::load(chunk.as_ptr());
        negated.store_at(chunk.as_mut_ptr());
    }
}

// SAFETY (all impls below): `Avx` only exists when the build script detected AVX.

impl Kernel<f64> for Avx {
    const LANES_PER_REGISTER: usize = LANE_COUNT;
    const SUPPORTS_PRODUCT: bool = true;

    #[inline(always)]
    fn add(a: &[f64], b: &[f64], out: &mut [f64]) {
        unsafe { add(a, b, out) }
    }

    #[inline(always)]
    fn sub(a: &[f64], b: &[f64], out: &mut [f64]) {
        unsafe { sub(a, b, out) }
    }

    #[inline(always)]
    fn neg(a: &mut [f64]) {
        unsafe { neg(a) }
    }
}

impl ProductKernel<f64> for Avx {
    #[inline(always)]
    fn mul(a: &[f64], b: &[f64], out: &mut [f64]) {
        unsafe { mul(a, b, out) }
    }

    #[inline(always)]
    fn div(a: &[f64], b: &[f64], out: &mut [f64]) {
        unsafe { div(a, b, out) }
    }
}
