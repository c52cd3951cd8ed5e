//! AVX SIMD implementations for 256-bit vector operations.
//!
//! This module contains the `Avx` backend tag and its kernels, built on Intel's
//! Advanced Vector Extensions. One 256-bit register holds 4 `f64` lanes or 2
//! `Complex<f64>` lanes (interleaved `re, im`).
//!
//! # Architecture Requirements
//!
//! - **CPU Support**: Intel Sandy Bridge (2011+) or AMD Bulldozer (2011+)
//! - **Target Architecture**: x86 or x86_64
//! - **Detection**: The build script emits `cfg(avx)` when the build host (or
//!   `-C target-feature`) provides AVX; this module does not exist otherwise.
//!
//! # Capability Gap
//!
//! Complex multiplication and division use `fmaddsub`/`fmsubadd`, which belong
//! to FMA3 rather than AVX. They are compiled only under `cfg(fma)`. Without
//! it, `Vector<Complex<f64>, L, Avx>` has no `Mul`/`Div` impls and
//! [`capabilities`](crate::capabilities) reports `product: false`.
//!
//! # Available Types
//!
//! - [`f64x4::F64x4`]: 4 packed `f64` values
//! - [`c64x2::C64x2`]: 2 packed `Complex<f64>` values

use crate::simd::traits::Backend;

pub mod c64x2;
pub mod f64x4;

/// AVX memory alignment requirement in bytes.
pub(crate) const AVX_ALIGNMENT: usize = 32;

/// 256-bit AVX backend tag.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Avx;

impl Backend for Avx {
    const NAME: &'static str = "avx";
    const REGISTER_BYTES: usize = AVX_ALIGNMENT;
}

#[inline(always)]
pub(crate) fn is_aligned<T>(ptr: *const T) -> bool {
    (ptr as usize) % AVX_ALIGNMENT == 0
}
