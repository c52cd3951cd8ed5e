//! AVX-512 SIMD implementations for 512-bit vector operations.
//!
//! One 512-bit register holds 8 `f64` lanes or 4 interleaved `Complex<f64>`
//! lanes. AVX-512F includes `fmaddsub`/`fmsubadd`, so unlike the 256-bit
//! backend every operation is available for both element types.
//!
//! # Architecture Requirements
//!
//! - **CPU Support**: Intel Skylake-SP (2017+) or AMD Zen 4 (2022+)
//! - **Target Architecture**: x86 or x86_64
//! - **Toolchain**: nightly; the build script only emits `cfg(avx512)` there
//!
//! # Available Types
//!
//! - [`f64x8::F64x8`]: 8 packed `f64` values
//! - [`c64x4::C64x4`]: 4 packed `Complex<f64>` values

#[cfg(target_arch = "x86")]
use std::arch::x86::*;

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use crate::simd::traits::Backend;

pub mod c64x4;
pub mod f64x8;

pub const AVX512_ALIGNMENT: usize = 64;

/// 512-bit AVX-512 backend tag.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Avx512;

impl Backend for Avx512 {
    const NAME: &'static str = "avx512";
    const REGISTER_BYTES: usize = AVX512_ALIGNMENT;
}

#[inline(always)]
pub(crate) fn is_aligned<T>(ptr: *const T) -> bool {
    (ptr as usize) % AVX512_ALIGNMENT == 0
}

/// Flips the sign bit of every f64 lane.
///
/// `_mm512_xor_pd` needs AVX-512DQ, so this goes through the integer domain
/// which AVX-512F covers.
#[inline(always)]
pub(crate) unsafe fn flip_sign(elements: __m512d) -> __m512d {
    _mm512_castsi512_pd(_mm512_xor_si512(
        _mm512_castpd_si512(elements),
        _mm512_set1_epi64(i64::MIN),
    ))
}
