//! What a backend can do for an element type.
//!
//! The type system already refuses unsupported combinations; this query lets a
//! caller that picks operations at runtime (a benchmark driver looping over
//! [`ArithOp::ALL`]) skip them up front instead of discovering them as compile
//! errors.

use crate::error::{configuration_error, unsupported_error, Result};
use crate::op::ArithOp;
use crate::scalar::Scalar;
use crate::simd::Kernel;

/// Capabilities of backend `backend` for element type `scalar`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub backend: &'static str,
    pub scalar: &'static str,
    /// Native register width in bytes, `0` for the generic backend.
    pub register_bytes: usize,
    pub lanes_per_register: usize,
    /// Multiply and divide are implemented.
    pub product: bool,
}

/// Capabilities of `B` for element type `T`.
pub const fn capabilities<T: Scalar, B: Kernel<T>>() -> Capabilities {
    Capabilities {
        backend: B::NAME,
        scalar: T::NAME,
        register_bytes: B::REGISTER_BYTES,
        lanes_per_register: B::LANES_PER_REGISTER,
        product: B::SUPPORTS_PRODUCT,
    }
}

impl Capabilities {
    pub const fn supports(&self, op: ArithOp) -> bool {
        !op.is_product() || self.product
    }

    /// The supported subset of [`ArithOp::ALL`].
    pub fn supported_ops(&self) -> Vec<ArithOp> {
        ArithOp::ALL
            .into_iter()
            .filter(|&op| self.supports(op))
            .collect()
    }

    /// Fails with [`VectorError::Unsupported`](crate::VectorError::Unsupported)
    /// if `op` is not implemented.
    pub fn check(&self, op: ArithOp) -> Result<()> {
        if self.supports(op) {
            return Ok(());
        }

        log::debug!(
            "rejecting {} for {} on the {} backend",
            op,
            self.scalar,
            self.backend
        );
        Err(unsupported_error(self.backend, self.scalar, op))
    }

    /// Fails with [`VectorError::Configuration`](crate::VectorError::Configuration)
    /// if a vector of `lanes` lanes cannot be built on this backend.
    pub fn check_lanes(&self, lanes: usize) -> Result<()> {
        if lanes == 0 {
            return Err(configuration_error(
                self.backend,
                self.scalar,
                lanes,
                "lane count must be positive",
            ));
        }
        if lanes % self.lanes_per_register != 0 {
            return Err(configuration_error(
                self.backend,
                self.scalar,
                lanes,
                format!(
                    "lane count must be a multiple of {} ({} lanes per {}-byte register)",
                    self.lanes_per_register, self.lanes_per_register, self.register_bytes
                ),
            ));
        }

        Ok(())
    }
}
