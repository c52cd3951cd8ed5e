//! Backend tags and their lane kernels.
//!
//! [`Generic`] is always available. The wide backends exist only when the
//! build script enabled their cfg flag for this build, so naming a missing
//! backend is a compile error rather than a runtime fallback.

#[cfg(all(avx, any(target_arch = "x86", target_arch = "x86_64")))]
pub mod avx;

#[cfg(all(avx512, any(target_arch = "x86", target_arch = "x86_64")))]
pub mod avx512;

pub mod generic;

pub mod traits;

#[cfg(all(avx, any(target_arch = "x86", target_arch = "x86_64")))]
pub use avx::Avx;

#[cfg(all(avx512, any(target_arch = "x86", target_arch = "x86_64")))]
pub use avx512::Avx512;

pub use generic::Generic;
pub use traits::{Backend, Kernel, ProductKernel};

/// Names of the backend tags compiled into this build, narrowest first.
pub fn compiled_backends() -> Vec<&'static str> {
    #[allow(unused_mut)]
    let mut backends = vec![Generic::NAME];

    #[cfg(all(avx, any(target_arch = "x86", target_arch = "x86_64")))]
    backends.push(Avx::NAME);

    #[cfg(all(avx512, any(target_arch = "x86", target_arch = "x86_64")))]
    backends.push(Avx512::NAME);

    backends
}
