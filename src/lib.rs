#![cfg_attr(
    all(
        avx512,
        any(target_arch = "x86", target_arch = "x86_64"),
        rustc_channel = "nightly"
    ),
    feature(avx512_target_feature, stdarch_x86_avx512)
)]

//! Fixed-width short vectors with interchangeable arithmetic backends.
//!
//! A [`Vector<T, L, B>`](Vector) holds `L` lanes of a real or complex element
//! type and implements `+`, `-`, `*`, `/` and unary `-` lane by lane. The
//! backend tag `B` picks the implementation at compile time:
//!
//! - [`Generic`]: a portable per-lane loop, always available.
//! - `Avx`: 256-bit registers, compiled when the build enables `cfg(avx)`.
//! - `Avx512`: 512-bit registers, compiled when the build enables
//!   `cfg(avx512)` (nightly toolchains).
//!
//! Every backend gives the same answers as a plain scalar loop. Real lanes
//! match bit for bit; complex products on the wide backends use fused
//! multiply-add and agree to within a few ulps.
//!
//! The [`harness`] module checks that claim: it packs random scalar arrays
//! into vectors, runs an operation over them in parallel and compares with
//! the scalar loop.

pub mod buffer;
pub mod capability;
pub mod error;
pub mod harness;
pub mod op;
pub mod scalar;
pub mod simd;
pub mod vector;

pub use buffer::LaneBuffer;
pub use capability::{capabilities, Capabilities};
pub use error::{Result, VectorError};
pub use op::{AddOp, ArithOp, DivideOp, MultiplyOp, Operation, SubtractOp, UnaryMinusOp};
pub use scalar::Scalar;
pub use simd::{Backend, Generic, Kernel, ProductKernel};
pub use vector::Vector;

#[cfg(all(avx, any(target_arch = "x86", target_arch = "x86_64")))]
pub use simd::Avx;

#[cfg(all(avx512, any(target_arch = "x86", target_arch = "x86_64")))]
pub use simd::Avx512;
