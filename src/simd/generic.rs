//! Portable lane-at-a-time backend.
//!
//! Works for every [`Scalar`] and any lane count. Each lane is computed with
//! the element type's own operators, so results are bit-identical to a naive
//! scalar loop; the optimizer is free to auto-vectorize the fixed-length loops.

use crate::scalar::Scalar;
use crate::simd::traits::{Backend, Kernel, ProductKernel};

/// Portable backend tag.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Generic;

impl Backend for Generic {
    const NAME: &'static str = "generic";
    const REGISTER_BYTES: usize = 0;
}

#[inline(always)]
fn zip_map<T: Scalar>(a: &[T], b: &[T], out: &mut [T], f: impl Fn(T, T) -> T) {
    debug_assert!(
        a.len() == b.len() && a.len() == out.len(),
        "Operands must have the same size (got {}, {} and {})",
        a.len(),
        b.len(),
        out.len()
    );

    for ((c, &x), &y) in out.iter_mut().zip(a).zip(b) {
        *c = f(x, y);
    }
}

impl<T: Scalar> Kernel<T> for Generic {
    const LANES_PER_REGISTER: usize = 1;
    const SUPPORTS_PRODUCT: bool = true;

    #[inline(always)]
    fn add(a: &[T], b: &[T], out: &mut [T]) {
        zip_map(a, b, out, |x, y| x + y);
    }

    #[inline(always)]
    fn sub(a: &[T], b: &[T], out: &mut [T]) {
        zip_map(a, b, out, |x, y| x - y);
    }

    #[inline(always)]
    fn neg(a: &mut [T]) {
        for x in a.iter_mut() {
            *x = -*x;
        }
    }
}

impl<T: Scalar> ProductKernel<T> for Generic {
    #[inline(always)]
    fn mul(a: &[T], b: &[T], out: &mut [T]) {
        zip_map(a, b, out, |x, y| x * y);
    }

    #[inline(always)]
    fn div(a: &[T], b: &[T], out: &mut [T]) {
        zip_map(a, b, out, |x, y| x / y);
    }
}
