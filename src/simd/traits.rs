use std::fmt::Debug;

use crate::scalar::Scalar;

/// A backend tag: a zero-sized type naming one instruction-set implementation.
///
/// Tags never exist at runtime in any meaningful way; they only select which
/// [`Kernel`] implementation a [`Vector`](crate::Vector) monomorphizes against.
pub trait Backend: Copy + Clone + Debug + Default + PartialEq + Eq + Send + Sync + 'static {
    /// Tag name used in reports and errors.
    const NAME: &'static str;

    /// Native register width in bytes, `0` for lane-at-a-time backends.
    const REGISTER_BYTES: usize;
}

/// Additive lane kernels of a backend for element type `T`.
///
/// All slices passed to a kernel have the same length, a whole multiple of
/// [`Kernel::LANES_PER_REGISTER`]; [`Vector`](crate::Vector) guarantees both
/// before any kernel runs.
pub trait Kernel<T: Scalar>: Backend {
    /// How many `T` lanes one native register holds.
    const LANES_PER_REGISTER: usize;

    /// Whether [`ProductKernel`] is implemented for `T` on this backend.
    const SUPPORTS_PRODUCT: bool;

    fn add(a: &[T], b: &[T], out: &mut [T]);

    fn sub(a: &[T], b: &[T], out: &mut [T]);

    /// Negates every lane in place.
    fn neg(a: &mut [T]);
}

/// Multiplicative lane kernels.
///
/// Split from [`Kernel`] so a backend can lack them for an element type; the
/// `Mul`/`Div` operators of [`Vector`](crate::Vector) are bounded on this
/// trait and do not exist for such combinations.
pub trait ProductKernel<T: Scalar>: Kernel<T> {
    fn mul(a: &[T], b: &[T], out: &mut [T]);

    /// IEEE division; a zero denominator yields infinity or NaN.
    fn div(a: &[T], b: &[T], out: &mut [T]);
}
