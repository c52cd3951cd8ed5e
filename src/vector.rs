//! The fixed-width vector value type.
//!
//! `Vector<T, L, B>` packs `L` lanes of element type `T` and computes on them
//! with backend `B`. Operands of an operator must agree on all three
//! parameters; the compiler enforces it.
//!
//! # Examples
//!
//! ```rust
//! use simdlanes::{Generic, Vector};
//!
//! let a = Vector::<f64, 4, Generic>::new([1.0, 2.0, 3.0, 4.0]);
//! let b = Vector::<f64, 4, Generic>::splat(0.5);
//!
//! let c = a * b + a;
//! assert_eq!(c.to_array(), [1.5, 3.0, 4.5, 6.0]);
//! assert_eq!(c[2], 4.5);
//! ```
//!
//! Complex lanes use the standard complex product:
//!
//! ```rust
//! use num::complex::Complex64;
//! use simdlanes::{Generic, Vector};
//!
//! let z = Vector::<Complex64, 2, Generic>::new([Complex64::new(3.0, 4.0), Complex64::new(1.0, -1.0)]);
//! let zz = z * Vector::new([z[0].conj(), z[1].conj()]);
//! assert_eq!(zz[0], Complex64::new(25.0, 0.0));
//! assert_eq!(zz[1], Complex64::new(2.0, 0.0));
//! ```
//!
//! A lane count the backend cannot hold is rejected when the code is built:
//!
//! ```compile_fail
//! use simdlanes::{Generic, Vector};
//!
//! let empty = Vector::<f64, 0, Generic>::splat(1.0);
//! ```

use std::fmt;
use std::marker::PhantomData;
use std::ops::{
    Add, AddAssign, Div, DivAssign, Index, IndexMut, Mul, MulAssign, Neg, Sub, SubAssign,
};

use crate::buffer::LaneBuffer;
use crate::capability::{capabilities, Capabilities};
use crate::error::Result;
use crate::op::ArithOp;
use crate::scalar::Scalar;
use crate::simd::{Backend, Generic, Kernel, ProductKernel};

/// `L` lanes of `T`, computed on by backend `B`.
///
/// Each vector owns its lanes; copying a vector copies all of them.
#[derive(Clone, Copy, PartialEq)]
#[repr(transparent)]
pub struct Vector<T: Scalar, const L: usize, B: Backend = Generic> {
    lanes: LaneBuffer<T, L>,
    backend: PhantomData<B>,
}

impl<T: Scalar, const L: usize, B: Kernel<T>> Vector<T, L, B> {
    const LAYOUT: () = assert!(
        L > 0 && L % B::LANES_PER_REGISTER == 0,
        "lane count must be a positive multiple of the backend's lanes per register"
    );

    /// Number of lanes.
    pub const LANES: usize = L;

    #[inline(always)]
    fn from_buffer(lanes: LaneBuffer<T, L>) -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::LAYOUT;

        Self {
            lanes,
            backend: PhantomData,
        }
    }

    /// Packs `L` scalars, lane `j` taking `lanes[j]`.
    #[inline(always)]
    pub fn new(lanes: [T; L]) -> Self {
        Self::from_buffer(LaneBuffer::new(lanes))
    }

    #[inline(always)]
    pub fn splat(value: T) -> Self {
        Self::from_buffer(LaneBuffer::splat(value))
    }

    #[inline(always)]
    pub fn zero() -> Self {
        Self::from_buffer(LaneBuffer::zeroed())
    }

    /// Packs exactly `L` scalars from a slice.
    pub fn from_slice(slice: &[T]) -> Result<Self> {
        LaneBuffer::from_slice(slice).map(Self::from_buffer)
    }

    /// Reads lane `j`.
    ///
    /// # Panics
    ///
    /// Panics if `j >= L`.
    #[inline(always)]
    pub fn lane(&self, j: usize) -> T {
        self.lanes.get(j)
    }

    /// Writes lane `j`.
    ///
    /// # Panics
    ///
    /// Panics if `j >= L`.
    #[inline(always)]
    pub fn set_lane(&mut self, j: usize, value: T) {
        self.lanes.set(j, value);
    }

    /// Reads lane `j` with no bounds check in release builds.
    ///
    /// # Safety
    ///
    /// `j` must be less than `L`.
    #[inline(always)]
    pub unsafe fn lane_unchecked(&self, j: usize) -> T {
        self.lanes.get_unchecked(j)
    }

    /// Writes lane `j` with no bounds check in release builds.
    ///
    /// # Safety
    ///
    /// `j` must be less than `L`.
    #[inline(always)]
    pub unsafe fn set_lane_unchecked(&mut self, j: usize, value: T) {
        self.lanes.set_unchecked(j, value);
    }

    #[inline(always)]
    pub fn as_slice(&self) -> &[T] {
        self.lanes.as_slice()
    }

    #[inline(always)]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self.lanes.as_mut_slice()
    }

    #[inline(always)]
    pub fn to_array(self) -> [T; L] {
        self.lanes.into_array()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    /// Negates every lane in place.
    #[inline(always)]
    pub fn neg_assign(&mut self) {
        <B as Kernel<T>>::neg(self.lanes.as_mut_slice());
    }

    /// Name of the backend tag.
    pub const fn label() -> &'static str {
        B::NAME
    }

    pub const fn capabilities() -> Capabilities {
        capabilities::<T, B>()
    }

    pub const fn supports(op: ArithOp) -> bool {
        Self::capabilities().supports(op)
    }
}

impl<T: Scalar, const L: usize, B: Kernel<T>> Default for Vector<T, L, B> {
    fn default() -> Self {
        Self::zero()
    }
}

impl<T: Scalar, const L: usize, B: Kernel<T>> From<[T; L]> for Vector<T, L, B> {
    fn from(lanes: [T; L]) -> Self {
        Self::new(lanes)
    }
}

impl<T: Scalar, const L: usize, B: Kernel<T>> From<LaneBuffer<T, L>> for Vector<T, L, B> {
    fn from(lanes: LaneBuffer<T, L>) -> Self {
        Self::from_buffer(lanes)
    }
}

impl<T: Scalar, const L: usize, B: Backend> Index<usize> for Vector<T, L, B> {
    type Output = T;

    #[inline(always)]
    fn index(&self, j: usize) -> &T {
        &self.lanes[j]
    }
}

impl<T: Scalar, const L: usize, B: Backend> IndexMut<usize> for Vector<T, L, B> {
    #[inline(always)]
    fn index_mut(&mut self, j: usize) -> &mut T {
        &mut self.lanes[j]
    }
}

impl<T: Scalar, const L: usize, B: Backend> fmt::Debug for Vector<T, L, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Vector")
            .field("backend", &B::NAME)
            .field("lanes", &self.lanes.as_slice())
            .finish()
    }
}

impl<T: Scalar, const L: usize, B: Backend> fmt::Display for Vector<T, L, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (j, lane) in self.lanes.as_slice().iter().enumerate() {
            if j > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{lane}")?;
        }
        write!(f, "]")
    }
}

// ================================================================================================
// ARITHMETIC OPERATORS
// ================================================================================================

impl<T: Scalar, const L: usize, B: Kernel<T>> Add for Vector<T, L, B> {
    type Output = Self;

    #[inline(always)]
    fn add(self, rhs: Self) -> Self::Output {
        let mut out = self;
        <B as Kernel<T>>::add(self.as_slice(), rhs.as_slice(), out.as_mut_slice());
        out
    }
}

impl<T: Scalar, const L: usize, B: Kernel<T>> Sub for Vector<T, L, B> {
    type Output = Self;

    #[inline(always)]
    fn sub(self, rhs: Self) -> Self::Output {
        let mut out = self;
        <B as Kernel<T>>::sub(self.as_slice(), rhs.as_slice(), out.as_mut_slice());
        out
    }
}

impl<T: Scalar, const L: usize, B: ProductKernel<T>> Mul for Vector<T, L, B> {
    type Output = Self;

    #[inline(always)]
    fn mul(self, rhs: Self) -> Self::Output {
        let mut out = self;
        <B as ProductKernel<T>>::mul(self.as_slice(), rhs.as_slice(), out.as_mut_slice());
        out
    }
}

impl<T: Scalar, const L: usize, B: ProductKernel<T>> Div for Vector<T, L, B> {
    type Output = Self;

    /// Lane-wise IEEE division; zero denominators give infinity or NaN lanes.
    #[inline(always)]
    fn div(self, rhs: Self) -> Self::Output {
        let mut out = self;
        <B as ProductKernel<T>>::div(self.as_slice(), rhs.as_slice(), out.as_mut_slice());
        out
    }
}

impl<T: Scalar, const L: usize, B: Kernel<T>> Neg for Vector<T, L, B> {
    type Output = Self;

    #[inline(always)]
    fn neg(mut self) -> Self::Output {
        self.neg_assign();
        self
    }
}

impl<T: Scalar, const L: usize, B: Kernel<T>> AddAssign for Vector<T, L, B> {
    #[inline(always)]
    fn add_assign(&mut self, rhs: Self) {
        let lhs = *self;
        <B as Kernel<T>>::add(lhs.as_slice(), rhs.as_slice(), self.as_mut_slice());
    }
}

impl<T: Scalar, const L: usize, B: Kernel<T>> SubAssign for Vector<T, L, B> {
    #[inline(always)]
    fn sub_assign(&mut self, rhs: Self) {
        let lhs = *self;
        <B as Kernel<T>>::sub(lhs.as_slice(), rhs.as_slice(), self.as_mut_slice());
    }
}

impl<T: Scalar, const L: usize, B: ProductKernel<T>> MulAssign for Vector<T, L, B> {
    #[inline(always)]
    fn mul_assign(&mut self, rhs: Self) {
        let lhs = *self;
        <B as ProductKernel<T>>::mul(lhs.as_slice(), rhs.as_slice(), self.as_mut_slice());
    }
}

impl<T: Scalar, const L: usize, B: ProductKernel<T>> DivAssign for Vector<T, L, B> {
    #[inline(always)]
    fn div_assign(&mut self, rhs: Self) {
        let lhs = *self;
        <B as ProductKernel<T>>::div(lhs.as_slice(), rhs.as_slice(), self.as_mut_slice());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VectorError;
    use num::complex::Complex64;

    type F64x4 = Vector<f64, 4, Generic>;

    #[test]
    fn test_lane_access() {
        let mut v = F64x4::new([1.0, 2.0, 3.0, 4.0]);
        assert_eq!(v.lane(3), 4.0);

        v.set_lane(0, -1.0);
        v[1] = -2.0;
        assert_eq!(v.to_array(), [-1.0, -2.0, 3.0, 4.0]);
        assert_eq!(unsafe { v.lane_unchecked(2) }, 3.0);
        assert_eq!(v.iter().copied().sum::<f64>(), 4.0);
    }

    #[test]
    #[should_panic]
    fn test_lane_out_of_range_panics() {
        let v = F64x4::zero();
        let _ = v.lane(4);
    }

    #[test]
    fn test_from_slice_checks_length() {
        assert!(F64x4::from_slice(&[1.0, 2.0, 3.0, 4.0]).is_ok());
        assert!(matches!(
            F64x4::from_slice(&[1.0, 2.0]),
            Err(VectorError::Length { len: 2, lanes: 4, .. })
        ));
    }

    #[test]
    fn test_operators() {
        let a = F64x4::new([6.0, -3.0, 1.5, 0.0]);
        let b = F64x4::new([2.0, 3.0, 0.5, -4.0]);

        assert_eq!((a + b).to_array(), [8.0, 0.0, 2.0, -4.0]);
        assert_eq!((a - b).to_array(), [4.0, -6.0, 1.0, 4.0]);
        assert_eq!((a * b).to_array(), [12.0, -9.0, 0.75, -0.0]);
        assert_eq!((a / b).to_array(), [3.0, -1.0, 3.0, -0.0]);
        assert_eq!((-a).to_array(), [-6.0, 3.0, -1.5, -0.0]);
    }

    #[test]
    fn test_compound_assignment() {
        let b = F64x4::splat(2.0);
        let mut v = F64x4::new([1.0, 2.0, 3.0, 4.0]);

        v += b;
        assert_eq!(v.to_array(), [3.0, 4.0, 5.0, 6.0]);
        v *= b;
        assert_eq!(v.to_array(), [6.0, 8.0, 10.0, 12.0]);
        v -= b;
        assert_eq!(v.to_array(), [4.0, 6.0, 8.0, 10.0]);
        v /= b;
        assert_eq!(v.to_array(), [2.0, 3.0, 4.0, 5.0]);
        v.neg_assign();
        assert_eq!(v.to_array(), [-2.0, -3.0, -4.0, -5.0]);
    }

    #[test]
    fn test_copies_do_not_share_lanes() {
        let original = F64x4::splat(1.0);
        let mut copy = original;
        copy.neg_assign();

        assert_eq!(original.to_array(), [1.0; 4]);
        assert_eq!(copy.to_array(), [-1.0; 4]);
    }

    #[test]
    fn test_division_by_zero_is_a_value() {
        let a = F64x4::new([1.0, -1.0, 0.0, 2.0]);
        let b = F64x4::new([0.0, 0.0, 0.0, -0.0]);
        let c = a / b;

        assert_eq!(c[0], f64::INFINITY);
        assert_eq!(c[1], f64::NEG_INFINITY);
        assert!(c[2].is_nan());
        assert_eq!(c[3], f64::NEG_INFINITY);
    }

    #[test]
    fn test_complex_lanes() {
        type C64x2 = Vector<Complex64, 2, Generic>;
        let a = C64x2::new([Complex64::new(1.0, 1.0), Complex64::new(0.0, 2.0)]);
        let b = C64x2::new([Complex64::new(1.0, -1.0), Complex64::new(0.0, 1.0)]);

        assert_eq!((a * b)[0], Complex64::new(2.0, 0.0));
        assert_eq!((a / b)[1], Complex64::new(2.0, 0.0));
        assert_eq!((a + (-a)).to_array(), [Complex64::new(0.0, 0.0); 2]);
    }

    #[test]
    fn test_formatting() {
        let v = Vector::<f64, 2, Generic>::new([1.0, -2.5]);
        assert_eq!(v.to_string(), "[1, -2.5]");
        assert!(format!("{v:?}").contains("generic"));
    }

    #[test]
    fn test_metadata() {
        assert_eq!(F64x4::LANES, 4);
        assert_eq!(F64x4::label(), "generic");
        assert!(F64x4::supports(ArithOp::Divide));
        assert_eq!(F64x4::capabilities().scalar, "f64");
    }

    #[cfg(all(avx, any(target_arch = "x86", target_arch = "x86_64")))]
    mod avx_tests {
        use super::*;
        use crate::simd::Avx;

        #[test]
        fn test_avx_real_matches_generic_bits() {
            let lanes = [0.1, -0.2, 0.3, 1e-3, 7.0, -11.0, 0.0, 3.25];
            let other = [0.7, 0.11, -0.3, 1e3, 0.0, 4.0, -2.0, 0.5];

            let (a, b) = (
                Vector::<f64, 8, Avx>::new(lanes),
                Vector::<f64, 8, Avx>::new(other),
            );
            let (ga, gb) = (
                Vector::<f64, 8, Generic>::new(lanes),
                Vector::<f64, 8, Generic>::new(other),
            );

            for (wide, portable) in [
                ((a + b).to_array(), (ga + gb).to_array()),
                ((a - b).to_array(), (ga - gb).to_array()),
                ((a * b).to_array(), (ga * gb).to_array()),
                ((a / b).to_array(), (ga / gb).to_array()),
                ((-a).to_array(), (-ga).to_array()),
            ] {
                for j in 0..8 {
                    assert_eq!(wide[j].to_bits(), portable[j].to_bits(), "lane {j}");
                }
            }
        }

        #[test]
        fn test_avx_complex_additive_ops() {
            let a = Vector::<Complex64, 2, Avx>::new([Complex64::new(1.0, 2.0), Complex64::new(-3.0, 0.5)]);
            let b = Vector::<Complex64, 2, Avx>::splat(Complex64::new(0.25, -0.25));

            assert_eq!((a + b)[1], Complex64::new(-2.75, 0.25));
            assert_eq!((a - b)[0], Complex64::new(0.75, 2.25));
            assert_eq!((a + (-a)).to_array(), [Complex64::new(0.0, 0.0); 2]);
        }
    }
}
