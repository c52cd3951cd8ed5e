#[cfg(target_arch = "x86")]
use std::arch::x86::*;

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use std::ops::{Add, Div, Mul, Neg, Sub};

use crate::simd::avx512::{flip_sign, is_aligned, Avx512};
use crate::simd::traits::{Kernel, ProductKernel};

/// The number of f64 lanes in an AVX-512 vector.
pub const LANE_COUNT: usize = 8;

/// An 8-lane, 64-bit floating-point SIMD vector using AVX-512F intrinsics.
#[derive(Copy, Clone, Debug)]
#[repr(C)]
pub struct F64x8 {
    elements: __m512d,
}

impl F64x8 {
    /// Loads 8 elements from a pointer into a vector.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for reading 8 f64 values.
    #[inline(always)]
    pub unsafe fn load(ptr: *const f64) -> Self {
        debug_assert!(!ptr.is_null(), "Pointer must not be null");

        match is_aligned(ptr) {
            true => Self {
                elements: _mm512_load_pd(ptr),
            },
            false => Self {
                elements: _mm512_loadu_pd(ptr),
            },
        }
    }

    /// Stores all 8 vector lanes to the memory location pointed to by `ptr`.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for writing 8 f64 values.
    #[inline(always)]
    pub unsafe fn store_at(&self, ptr: *mut f64) {
        debug_assert!(!ptr.is_null(), "Pointer must not be null");

        match is_aligned(ptr) {
            true => _mm512_store_pd(ptr, self.elements),
            false => _mm512_storeu_pd(ptr, self.elements),
        }
    }

    #[inline(always)]
    pub fn to_array(self) -> [f64; LANE_COUNT] {
        let mut lanes = [0.0f64; LANE_COUNT];
        unsafe { _mm512_storeu_pd(lanes.as_mut_ptr(), self.elements) };
        lanes
    }
}

impl Add for F64x8 {
    type Output = Self;

    #[inline(always)]
    fn add(self, rhs: Self) -> Self::Output {
        Self {
            elements: unsafe { _mm512_add_pd(self.elements, rhs.elements) },
        }
    }
}

impl Sub for F64x8 {
    type Output = Self;

    #[inline(always)]
    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            elements: unsafe { _mm512_sub_pd(self.elements, rhs.elements) },
        }
    }
}

impl Mul for F64x8 {
    type Output = Self;

    #[inline(always)]
    fn mul(self, rhs: Self) -> Self::Output {
        Self {
            elements: unsafe { _mm512_mul_pd(self.elements, rhs.elements) },
        }
    }
}

impl Div for F64x8 {
    type Output = Self;

    #[inline(always)]
    fn div(self, rhs: Self) -> Self::Output {
        Self {
            elements: unsafe { _mm512_div_pd(self.elements, rhs.elements) },
        }
    }
}

impl Neg for F64x8 {
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
        /// length, a multiple of 8.
        #[inline]
        #[target_feature(enable = "avx512f")]
        pub(crate) unsafe fn $name(a: &[f64], b: &[f64], out: &mut [f64]) {
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
                let result = F64x8::load(x.as_ptr()) $op F64x8::load(y.as_ptr());
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
/// The CPU must support AVX-512F. The slice length must be a multiple of 8.
#[inline]
#[target_feature(enable = "avx512f")]
pub(crate) unsafe fn neg(a: &mut [f64]) {
    for chunk in a.chunks_exact_mut(LANE_COUNT) {
        let negated = -F64x8::load(chunk.as_ptr());
        negated.store_at(chunk.as_mut_ptr());
    }
}

// SAFETY (all impls below): `Avx512` only exists when the build script detected AVX-512F.

impl Kernel<f64> for Avx512 {
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

impl ProductKernel<f64> for Avx512 {
    #[inline(always)]
    fn mul(a: &[f64], b: &[f64], out: &mut [f64]) {
        unsafe { mul(a, b, out) }
    }

    #[inline(always)]
    fn div(a: &[f64], b: &[f64], out: &mut [f64]) {
        unsafe { div(a, b, out) }
    }
}
