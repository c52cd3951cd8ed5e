//! Fixed-capacity lane storage.

use std::ops::{Index, IndexMut};

use crate::error::{length_error, Result};
use crate::scalar::Scalar;

/// Contiguous storage for exactly `L` lanes of `T`.
///
/// `#[repr(C)]` pins lane `j` at byte offset `j * size_of::<T>()`, so a buffer
/// can be handed to the SIMD kernels as a flat run of `T` (or, for complex
/// lanes, of interleaved `re, im` reals). Copying a buffer copies every lane.
#[derive(Clone, Copy, PartialEq, Debug)]
#[repr(C)]
pub struct LaneBuffer<T, const L: usize> {
    lanes: [T; L],
}

impl<T: Scalar, const L: usize> LaneBuffer<T, L> {
    #[inline(always)]
    pub fn new(lanes: [T; L]) -> Self {
        Self { lanes }
    }

    #[inline(always)]
    pub fn splat(value: T) -> Self {
        Self { lanes: [value; L] }
    }

    #[inline(always)]
    pub fn zeroed() -> Self {
        Self::splat(T::zero())
    }

    /// Builds a buffer from exactly `L` scalars.
    pub fn from_slice(slice: &[T]) -> Result<Self> {
        let lanes: [T; L] = slice.try_into().map_err(|_| {
            length_error(slice.len(), L, "a lane buffer needs exactly one scalar per lane")
        })?;
        Ok(Self { lanes })
    }

    /// Reads lane `j`. Panics if `j >= L`.
    #[inline(always)]
    pub fn get(&self, j: usize) -> T {
        self.lanes[j]
    }

    /// Writes lane `j`. Panics if `j >= L`.
    #[inline(always)]
    pub fn set(&mut self, j: usize, value: T) {
        self.lanes[j] = value;
    }

    /// Reads lane `j` without a bounds check in release builds.
    ///
    /// # Safety
    ///
    /// `j` must be less than `L`. Debug builds assert this.
    #[inline(always)]
    pub unsafe fn get_unchecked(&self, j: usize) -> T {
        debug_assert!(j < L, "lane index {j} out of range for {L} lanes");
        *self.lanes.get_unchecked(j)
    }

    /// Writes lane `j` without a bounds check in release builds.
    ///
    /// # Safety
    ///
    /// `j` must be less than `L`. Debug builds assert this.
    #[inline(always)]
    pub unsafe fn set_unchecked(&mut self, j: usize, value: T) {
        debug_assert!(j < L, "lane index {j} out of range for {L} lanes");
        *self.lanes.get_unchecked_mut(j) = value;
    }

    #[inline(always)]
    pub fn as_slice(&self) -> &[T] {
        &self.lanes
    }

    #[inline(always)]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.lanes
    }

    #[inline(always)]
    pub fn into_array(self) -> [T; L] {
        self.lanes
    }
}

impl<T: Scalar, const L: usize> Default for LaneBuffer<T, L> {
    fn default() -> Self {
        Self::zeroed()
    }
}

impl<T: Scalar, const L: usize> From<[T; L]> for LaneBuffer<T, L> {
    fn from(lanes: [T; L]) -> Self {
        Self::new(lanes)
    }
}

impl<T: Scalar, const L: usize> Index<usize> for LaneBuffer<T, L> {
    type Output = T;

    #[inline(always)]
    fn index(&self, j: usize) -> &T {
        &self.lanes[j]
    }
}

impl<T: Scalar, const L: usize> IndexMut<usize> for LaneBuffer<T, L> {
    #[inline(always)]
    fn index_mut(&mut self, j: usize) -> &mut T {
        &mut self.lanes[j]
    }
}
